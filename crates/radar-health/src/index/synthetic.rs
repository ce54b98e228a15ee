//! Deterministic demo data for the time-series store.
//!
//! Each indicator follows a floored random walk sampled at its catalog
//! frequency, with light seasonality and occasional shocks so the seasonal
//! baselines and staleness decay have something to react to.

use super::catalog::{Frequency, IndicatorCatalog};
use super::store::TimeSeriesStore;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use tracing::info;

pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_SPAN_DAYS: i64 = 365 * 5;
const SHOCK_PROBABILITY: f64 = 0.01;
const SHOCK_SCALE: f64 = 5.0;

#[derive(Debug, Clone, Copy)]
struct WalkProfile {
    start: f64,
    volatility: f64,
    shocks: bool,
}

fn walk_profile(indicator_id: &str) -> WalkProfile {
    let (start, volatility, shocks) = match indicator_id {
        "diesel_price" => (4.00, 0.08, false),
        "truck_tonnage" => (120.0, 0.4, false),
        "ocean_rate" => (1800.0, 25.0, true),
        "port_congestion" => (4.0, 0.25, true),
        "jet_fuel" => (2.50, 0.06, false),
        "cargo_flights" => (1500.0, 8.0, false),
        "rail_carloads" => (200_000.0, 1500.0, false),
        "pmi" => (51.0, 0.25, false),
        "tariff_friction" => (1.5, 0.03, false),
        _ => (100.0, 1.0, false),
    };
    WalkProfile {
        start,
        volatility,
        shocks,
    }
}

fn seasonal_drift(indicator_id: &str, date: NaiveDate) -> f64 {
    match indicator_id {
        "cargo_flights" if matches!(date.month(), 10..=12) => 20.0,
        "truck_tonnage" if date.month() == 2 => -2.0,
        _ => 0.0,
    }
}

fn emits_on(frequency: Frequency, date: NaiveDate) -> bool {
    match frequency {
        Frequency::Daily => true,
        Frequency::Weekly => date.weekday() == Weekday::Mon,
        Frequency::Monthly => date.day() == 1,
    }
}

/// Standard normal sample via the Box-Muller transform.
fn gaussian<R: Rng>(rng: &mut R, std_dev: f64) -> f64 {
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = rng.gen::<f64>();
    let radius = (-2.0 * u1.ln()).sqrt();
    radius * (std::f64::consts::TAU * u2).cos() * std_dev
}

#[derive(Debug, Clone)]
pub struct SyntheticSeeder {
    seed: u64,
    span_days: i64,
}

impl Default for SyntheticSeeder {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            span_days: DEFAULT_SPAN_DAYS,
        }
    }
}

impl SyntheticSeeder {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    pub fn with_span_days(mut self, span_days: i64) -> Self {
        self.span_days = span_days.max(0);
        self
    }

    /// Generate observations from `end - span` through `end` inclusive and
    /// return the frozen store.
    pub fn seed(&self, catalog: &IndicatorCatalog, end: NaiveDate) -> TimeSeriesStore {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut builder = TimeSeriesStore::builder();
        let mut levels: HashMap<&'static str, f64> = catalog
            .indicators()
            .iter()
            .map(|definition| (definition.id, walk_profile(definition.id).start))
            .collect();

        let mut date = end - Duration::days(self.span_days);
        while date <= end {
            for definition in catalog.indicators() {
                if !emits_on(definition.frequency, date) {
                    continue;
                }

                let profile = walk_profile(definition.id);
                let mut shock = 0.0;
                if profile.shocks && rng.gen_bool(SHOCK_PROBABILITY) {
                    let sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
                    shock = sign * SHOCK_SCALE * profile.volatility;
                }

                let step = gaussian(&mut rng, profile.volatility)
                    + shock
                    + seasonal_drift(definition.id, date) * 0.01;
                let level = levels.entry(definition.id).or_insert(profile.start);
                *level = (*level + step).max(0.0);
                builder.put(definition.id, date, *level);
            }
            date += Duration::days(1);
        }

        info!(
            seed = self.seed,
            observations = builder.len(),
            %end,
            "seeded synthetic observations"
        );
        builder.finalize()
    }
}
