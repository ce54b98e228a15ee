//! Radar Health Index: catalog, time-series store, scoring engine and the
//! aggregation service that rolls indicators up into a daily headline.

pub mod catalog;
pub mod ingest;
pub mod router;
pub mod scoring;
pub mod service;
pub mod store;
pub mod synthetic;
pub mod views;

pub use catalog::{
    CatalogError, Component, Frequency, IndicatorCatalog, IndicatorDefinition, ScoringType,
};
pub use ingest::{IngestError, ObservationCsvImporter};
pub use router::index_router;
pub use service::{DayResult, HealthIndexService};
pub use store::{Observation, StoreBuilder, TimeSeriesStore};
pub use synthetic::SyntheticSeeder;
pub use views::{
    ComponentSnapshot, Driver, HistoryPoint, HistorySeries, IndicatorScore, LatestSnapshot,
};
