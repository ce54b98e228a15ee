use super::catalog::IndicatorCatalog;
use super::store::{StoreBuilder, TimeSeriesStore};
use chrono::NaiveDate;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to read observation export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid observation CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: indicator '{indicator_id}' is not in the catalog")]
    UnknownIndicator { row: usize, indicator_id: String },
    #[error("row {row}: failed to parse '{raw}' as YYYY-MM-DD")]
    InvalidDate { row: usize, raw: String },
    #[error("row {row}: value for '{indicator_id}' is not a finite number")]
    NonFiniteValue { row: usize, indicator_id: String },
}

#[derive(Debug, Deserialize)]
struct ObservationRow {
    indicator_id: String,
    date: String,
    value: f64,
}

/// Loads `indicator_id,date,value` rows into a frozen store.
pub struct ObservationCsvImporter;

impl ObservationCsvImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        catalog: &IndicatorCatalog,
    ) -> Result<TimeSeriesStore, IngestError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, catalog)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        catalog: &IndicatorCatalog,
    ) -> Result<TimeSeriesStore, IngestError> {
        let mut builder = TimeSeriesStore::builder();
        Self::load_into(reader, catalog, &mut builder)?;
        info!(observations = builder.len(), "loaded observations from CSV");
        Ok(builder.finalize())
    }

    /// Append every row to `builder`; returns the number of rows written.
    pub fn load_into<R: Read>(
        reader: R,
        catalog: &IndicatorCatalog,
        builder: &mut StoreBuilder,
    ) -> Result<usize, IngestError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut written = 0;

        for (index, record) in csv_reader.deserialize::<ObservationRow>().enumerate() {
            let row_number = index + 1;
            let row = record?;

            let Some(definition) = catalog.get(&row.indicator_id) else {
                return Err(IngestError::UnknownIndicator {
                    row: row_number,
                    indicator_id: row.indicator_id,
                });
            };

            let date = NaiveDate::parse_from_str(&row.date, "%Y-%m-%d").map_err(|_| {
                IngestError::InvalidDate {
                    row: row_number,
                    raw: row.date.clone(),
                }
            })?;

            if !row.value.is_finite() {
                return Err(IngestError::NonFiniteValue {
                    row: row_number,
                    indicator_id: row.indicator_id,
                });
            }

            builder.put(definition.id, date, row.value);
            written += 1;
        }

        Ok(written)
    }
}
