use super::catalog::{Component, IndicatorCatalog, IndicatorDefinition};
use super::scoring::{
    apply_staleness, robust_z_score, round_to, staleness_factor, NEUTRAL_SCORE,
};
use super::store::TimeSeriesStore;
use super::views::{
    ComponentSnapshot, Driver, HistoryPoint, HistorySeries, IndicatorScore, LatestSnapshot,
};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::debug;

pub const DEFAULT_BASELINE_YEARS: u32 = 5;
pub const MAX_DRIVERS: usize = 10;
pub const IMPACT_EPSILON: f64 = 1e-6;
pub const MIN_HISTORY_DAYS: u32 = 1;
pub const MAX_HISTORY_DAYS: u32 = 3650;

/// Full computation for a single target date.
#[derive(Debug, Clone, PartialEq)]
pub struct DayResult {
    pub date: NaiveDate,
    pub headline: f64,
    pub components: BTreeMap<Component, f64>,
    pub indicator_scores: Vec<IndicatorScore>,
    /// Unnormalized `component weight * intra weight * health score` per
    /// indicator; only used to attribute day-over-day movement.
    pub contributions: HashMap<&'static str, f64>,
}

/// Scores and aggregates the index from a frozen store and a static catalog.
///
/// Holds no mutable state, so one instance serves concurrent callers.
#[derive(Debug, Clone)]
pub struct HealthIndexService {
    catalog: Arc<IndicatorCatalog>,
    store: Arc<TimeSeriesStore>,
    baseline_years: u32,
}

impl HealthIndexService {
    pub fn new(
        catalog: Arc<IndicatorCatalog>,
        store: Arc<TimeSeriesStore>,
        baseline_years: u32,
    ) -> Self {
        Self {
            catalog,
            store,
            baseline_years,
        }
    }

    pub fn catalog(&self) -> &IndicatorCatalog {
        &self.catalog
    }

    pub fn store(&self) -> &TimeSeriesStore {
        &self.store
    }

    pub fn baseline_years(&self) -> u32 {
        self.baseline_years
    }

    /// Score one indicator as of `target`.
    ///
    /// `None` means the indicator does not vote today: either nothing was
    /// observed on or before `target`, or there is no seasonal baseline.
    pub fn indicator_score(
        &self,
        definition: &IndicatorDefinition,
        target: NaiveDate,
    ) -> Option<IndicatorScore> {
        let observation = self.store.latest_as_of(definition.id, target)?;

        let history = self
            .store
            .month_bucket_history(definition.id, target, self.baseline_years);
        if history.is_empty() {
            return None;
        }

        let z = robust_z_score(observation.value, &history);
        let raw = definition.scoring_type.raw_score(z);
        let decay = staleness_factor(observation.date, target, definition.half_life_days);
        let health = apply_staleness(raw, decay);

        Some(IndicatorScore {
            id: definition.id,
            name: definition.name,
            component: definition.component,
            asof_date: observation.date,
            raw_value: observation.value,
            z_score: round_to(z, 3),
            raw_score: round_to(raw, 2),
            staleness_factor: round_to(decay, 3),
            health_score: round_to(health, 2),
        })
    }

    pub fn compute_day(&self, target: NaiveDate) -> DayResult {
        let indicator_scores: Vec<IndicatorScore> = self
            .catalog
            .indicators()
            .iter()
            .filter_map(|definition| self.indicator_score(definition, target))
            .collect();

        let components: BTreeMap<Component, f64> = self
            .catalog
            .component_weights()
            .keys()
            .map(|&component| (component, self.component_score(component, &indicator_scores)))
            .collect();

        let headline: f64 = self
            .catalog
            .component_weights()
            .iter()
            .map(|(component, weight)| {
                weight * components.get(component).copied().unwrap_or(NEUTRAL_SCORE)
            })
            .sum();

        let contributions: HashMap<&'static str, f64> = indicator_scores
            .iter()
            .filter_map(|score| {
                let definition = self.catalog.get(score.id)?;
                let contribution = self.catalog.component_weight(definition.component)
                    * definition.intra_component_weight
                    * score.health_score;
                Some((score.id, contribution))
            })
            .collect();

        debug!(
            %target,
            headline,
            reporting = indicator_scores.len(),
            "computed index day"
        );

        DayResult {
            date: target,
            headline,
            components,
            indicator_scores,
            contributions,
        }
    }

    /// Weighted mean of reporting indicators, or neutral when none report.
    fn component_score(&self, component: Component, scores: &[IndicatorScore]) -> f64 {
        let mut weight_sum = 0.0;
        let mut score_sum = 0.0;

        for score in scores.iter().filter(|score| score.component == component) {
            let weight = self
                .catalog
                .get(score.id)
                .map_or(0.0, |definition| definition.intra_component_weight);
            weight_sum += weight;
            score_sum += weight * score.health_score;
        }

        if weight_sum > 0.0 {
            score_sum / weight_sum
        } else {
            NEUTRAL_SCORE
        }
    }

    /// Attribute headline movement between two days to individual indicators.
    ///
    /// Only indicators that reported on both days are considered.
    pub fn driver_decomposition(&self, today: &DayResult, previous: &DayResult) -> Vec<Driver> {
        let mut drivers: Vec<Driver> = self
            .catalog
            .indicators()
            .iter()
            .filter_map(|definition| {
                let current = today.contributions.get(definition.id)?;
                let prior = previous.contributions.get(definition.id)?;
                let impact = current - prior;
                if impact.abs() < IMPACT_EPSILON {
                    return None;
                }

                Some(Driver {
                    id: definition.id,
                    name: definition.name,
                    impact: round_to(impact, 3),
                    category: definition.component,
                })
            })
            .collect();

        drivers.sort_by(|a, b| b.impact.abs().total_cmp(&a.impact.abs()));
        drivers.truncate(MAX_DRIVERS);
        drivers
    }

    pub fn latest(&self) -> LatestSnapshot {
        self.latest_at(Utc::now())
    }

    /// Snapshot for the UTC calendar day of `now`, with drivers measured
    /// against the previous day.
    pub fn latest_at(&self, now: DateTime<Utc>) -> LatestSnapshot {
        let today = now.date_naive();
        let today_result = self.compute_day(today);
        let previous_result = self.compute_day(today - Duration::days(1));
        let driver_decomposition = self.driver_decomposition(&today_result, &previous_result);

        let components = today_result
            .components
            .iter()
            .map(|(&component, &score)| {
                let snapshot = ComponentSnapshot {
                    score: round_to(score, 2),
                    weight: self.catalog.component_weight(component),
                };
                (component, snapshot)
            })
            .collect();

        LatestSnapshot {
            timestamp: now,
            headline_score: round_to(today_result.headline, 2),
            components,
            indicators: today_result.indicator_scores,
            driver_decomposition,
        }
    }

    pub fn history(&self, days: u32) -> HistorySeries {
        self.history_ending(Utc::now().date_naive(), days)
    }

    /// One point per calendar day for the `days` days ending at `end`,
    /// oldest first. `days` is clamped to `[1, 3650]`.
    pub fn history_ending(&self, end: NaiveDate, days: u32) -> HistorySeries {
        let days = days.clamp(MIN_HISTORY_DAYS, MAX_HISTORY_DAYS);

        let series = (0..days)
            .rev()
            .map(|offset| {
                let result = self.compute_day(end - Duration::days(i64::from(offset)));
                HistoryPoint {
                    date: result.date,
                    headline_score: round_to(result.headline, 2),
                    components: result
                        .components
                        .into_iter()
                        .map(|(component, score)| (component, round_to(score, 2)))
                        .collect(),
                }
            })
            .collect();

        HistorySeries { days, series }
    }
}
