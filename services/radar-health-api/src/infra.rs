use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use radar_health::config::IndexConfig;
use radar_health::error::AppError;
use radar_health::index::{
    HealthIndexService, IndicatorCatalog, ObservationCsvImporter, SyntheticSeeder,
};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Where the frozen store comes from at startup.
#[derive(Debug, Clone)]
pub(crate) enum ObservationSource {
    Synthetic { seed: u64, end: NaiveDate },
    Csv(PathBuf),
}

impl ObservationSource {
    pub(crate) fn from_args(csv: Option<PathBuf>, config: &IndexConfig, end: NaiveDate) -> Self {
        match csv {
            Some(path) => Self::Csv(path),
            None => Self::Synthetic {
                seed: config.seed,
                end,
            },
        }
    }

    pub(crate) fn label(&self) -> String {
        match self {
            Self::Synthetic { seed, .. } => format!("synthetic (seed {seed})"),
            Self::Csv(path) => format!("CSV import ({})", path.display()),
        }
    }
}

/// Load the store once, freeze it, and wrap it in a shareable service.
pub(crate) fn build_service(
    source: &ObservationSource,
    baseline_years: u32,
) -> Result<HealthIndexService, AppError> {
    let catalog = Arc::new(IndicatorCatalog::standard());
    let store = match source {
        ObservationSource::Synthetic { seed, end } => {
            SyntheticSeeder::new(*seed).seed(&catalog, *end)
        }
        ObservationSource::Csv(path) => ObservationCsvImporter::from_path(path, &catalog)?,
    };

    info!(
        source = %source.label(),
        observations = store.len(),
        baseline_years,
        "time-series store frozen"
    );

    Ok(HealthIndexService::new(
        catalog,
        Arc::new(store),
        baseline_years,
    ))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
