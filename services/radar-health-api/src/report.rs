use crate::infra::{build_service, ObservationSource};
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use clap::Args;
use radar_health::config::AppConfig;
use radar_health::error::AppError;
use radar_health::index::{HistorySeries, LatestSnapshot};
use radar_health::telemetry;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct LatestArgs {
    /// Evaluation date (YYYY-MM-DD). Defaults to today (UTC).
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) date: Option<NaiveDate>,
    /// Load observations from an `indicator_id,date,value` CSV instead of seeding
    #[arg(long)]
    pub(crate) observations_csv: Option<PathBuf>,
    /// Print the snapshot as JSON instead of a summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct HistoryArgs {
    /// Number of days to include (1-3650)
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..=3650))]
    pub(crate) days: u32,
    /// Last day of the series (YYYY-MM-DD). Defaults to today (UTC).
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) date: Option<NaiveDate>,
    /// Load observations from an `indicator_id,date,value` CSV instead of seeding
    #[arg(long)]
    pub(crate) observations_csv: Option<PathBuf>,
    /// Print the series as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

fn evaluation_instant(date: Option<NaiveDate>) -> DateTime<Utc> {
    let now = Utc::now();
    match date {
        Some(date) if date != now.date_naive() => {
            Utc.from_utc_datetime(&date.and_time(NaiveTime::default()))
        }
        _ => now,
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(err) => eprintln!("unable to serialize output: {err}"),
    }
}

pub(crate) fn run_latest_report(args: LatestArgs) -> Result<(), AppError> {
    let LatestArgs {
        date,
        observations_csv,
        json,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init_for_cli(&config.telemetry)?;

    let source =
        ObservationSource::from_args(observations_csv, &config.index, Utc::now().date_naive());
    let service = build_service(&source, config.index.baseline_years)?;
    let snapshot = service.latest_at(evaluation_instant(date));

    if json {
        print_json(&snapshot);
    } else {
        render_latest(&snapshot, &source);
    }

    Ok(())
}

pub(crate) fn run_history_report(args: HistoryArgs) -> Result<(), AppError> {
    let HistoryArgs {
        days,
        date,
        observations_csv,
        json,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init_for_cli(&config.telemetry)?;

    let today = Utc::now().date_naive();
    let source = ObservationSource::from_args(observations_csv, &config.index, today);
    let service = build_service(&source, config.index.baseline_years)?;
    let series = service.history_ending(date.unwrap_or(today), days);

    if json {
        print_json(&series);
    } else {
        render_history(&series);
    }

    Ok(())
}

pub(crate) fn render_latest(snapshot: &LatestSnapshot, source: &ObservationSource) {
    println!("Radar Health Index");
    println!("As of {} | data source: {}", snapshot.timestamp, source.label());
    println!("\nHeadline score: {:.2}", snapshot.headline_score);

    println!("\nComponents");
    for (component, entry) in &snapshot.components {
        println!(
            "- {}: {:.2} (weight {:.0}%)",
            component,
            entry.score,
            entry.weight * 100.0
        );
    }

    if snapshot.indicators.is_empty() {
        println!("\nIndicators: none reporting");
    } else {
        println!("\nIndicators");
        for score in &snapshot.indicators {
            println!(
                "- {} [{}]: health {:.2} | raw {:.2} | z {:+.3} | decay {:.3} | value {:.3} as of {}",
                score.name,
                score.component,
                score.health_score,
                score.raw_score,
                score.z_score,
                score.staleness_factor,
                score.raw_value,
                score.asof_date
            );
        }
    }

    if snapshot.driver_decomposition.is_empty() {
        println!("\nDrivers: no day-over-day movement");
    } else {
        println!("\nTop drivers vs previous day");
        for driver in &snapshot.driver_decomposition {
            println!(
                "- {} ({}): {:+.3}",
                driver.name, driver.category, driver.impact
            );
        }
    }
}

pub(crate) fn render_history(series: &HistorySeries) {
    println!("Radar Health Index history ({} days)", series.days);
    for point in &series.series {
        let components: Vec<String> = point
            .components
            .iter()
            .map(|(component, score)| format!("{component} {score:.2}"))
            .collect();
        println!(
            "{} | headline {:>6.2} | {}",
            point.date,
            point.headline_score,
            components.join(", ")
        );
    }
}
