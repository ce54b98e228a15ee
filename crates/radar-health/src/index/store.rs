use chrono::{Datelike, NaiveDate};
use std::collections::HashMap;

/// A single dated reading for one indicator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
}

/// Writable loading phase of the time-series store.
///
/// Observations may arrive in any order. `finalize` consumes the builder, so
/// no write can ever reach a store that readers already see.
#[derive(Debug, Default)]
pub struct StoreBuilder {
    series: HashMap<String, Vec<Observation>>,
}

impl StoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, indicator_id: &str, date: NaiveDate, value: f64) {
        let observation = Observation { date, value };
        match self.series.get_mut(indicator_id) {
            Some(series) => series.push(observation),
            None => {
                self.series
                    .insert(indicator_id.to_string(), vec![observation]);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.series.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sort every series ascending by date and freeze the store.
    ///
    /// The sort is stable: observations sharing a date keep their insertion
    /// order, so the last one written wins carried-forward lookups.
    pub fn finalize(mut self) -> TimeSeriesStore {
        for series in self.series.values_mut() {
            series.sort_by_key(|observation| observation.date);
        }

        TimeSeriesStore {
            series: self.series,
        }
    }
}

/// Frozen, read-only time-series snapshot.
///
/// Holds no interior mutability and is safe to share across threads.
#[derive(Debug, Clone)]
pub struct TimeSeriesStore {
    series: HashMap<String, Vec<Observation>>,
}

impl TimeSeriesStore {
    pub fn builder() -> StoreBuilder {
        StoreBuilder::new()
    }

    /// Most recent observation dated on or before `as_of` (LOCF).
    pub fn latest_as_of(&self, indicator_id: &str, as_of: NaiveDate) -> Option<Observation> {
        let series = self.series.get(indicator_id)?;
        let end = series.partition_point(|observation| observation.date <= as_of);
        end.checked_sub(1).map(|index| series[index])
    }

    pub fn latest_value_as_of(&self, indicator_id: &str, as_of: NaiveDate) -> Option<f64> {
        self.latest_as_of(indicator_id, as_of)
            .map(|observation| observation.value)
    }

    pub fn latest_date_as_of(&self, indicator_id: &str, as_of: NaiveDate) -> Option<NaiveDate> {
        self.latest_as_of(indicator_id, as_of)
            .map(|observation| observation.date)
    }

    /// Seasonal baseline: values strictly before `target` that fall in the
    /// same calendar month, from `target.year - baseline_years` onwards.
    pub fn month_bucket_history(
        &self,
        indicator_id: &str,
        target: NaiveDate,
        baseline_years: u32,
    ) -> Vec<f64> {
        let Some(series) = self.series.get(indicator_id) else {
            return Vec::new();
        };

        let start_year = target.year() - baseline_years as i32;
        let end = series.partition_point(|observation| observation.date < target);

        series[..end]
            .iter()
            .filter(|observation| {
                observation.date.month() == target.month() && observation.date.year() >= start_year
            })
            .map(|observation| observation.value)
            .collect()
    }

    pub fn indicator_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.series.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn observation_count(&self, indicator_id: &str) -> usize {
        self.series.get(indicator_id).map_or(0, Vec::len)
    }

    pub fn len(&self) -> usize {
        self.series.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
