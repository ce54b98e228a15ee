//! Normalization, scoring curves and staleness decay.
//!
//! Every function here is pure: identical inputs always produce identical
//! outputs, and nothing reads shared state.

use super::catalog::ScoringType;
use chrono::NaiveDate;

/// Scales MAD into a consistent estimator of the standard deviation under
/// normally distributed data.
pub const MAD_SCALE_FACTOR: f64 = 1.4826;
pub const MAD_FLOOR: f64 = 1e-6;
pub const NEUTRAL_SCORE: f64 = 50.0;
pub const DEFAULT_SIGMA_TARGET: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Positive,
    Negative,
}

fn median(values: &mut [f64]) -> f64 {
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

/// Median/MAD z-score of `value` against `history`.
///
/// Returns 0.0 when there is no history. MAD is floored at [`MAD_FLOOR`] so
/// constant histories yield a large but finite score.
pub fn robust_z_score(value: f64, history: &[f64]) -> f64 {
    if history.is_empty() {
        return 0.0;
    }

    let mut samples = history.to_vec();
    let center = median(&mut samples);
    let mut deviations: Vec<f64> = samples.iter().map(|sample| (sample - center).abs()).collect();
    let mad = median(&mut deviations).max(MAD_FLOOR);

    (value - center) / (MAD_SCALE_FACTOR * mad)
}

/// Gaussian stability curve: 100 at z = 0, falling symmetrically.
pub fn score_goldilocks(z: f64, sigma_target: f64) -> f64 {
    100.0 * (-(z * z) / (2.0 * sigma_target * sigma_target)).exp()
}

/// Linear curve `50 ± 25z`, saturating at |z| >= 2.
pub fn score_monotone(z: f64, direction: Direction) -> f64 {
    let score = match direction {
        Direction::Positive => NEUTRAL_SCORE + 25.0 * z,
        Direction::Negative => NEUTRAL_SCORE - 25.0 * z,
    };
    score.clamp(0.0, 100.0)
}

/// Exponential decay that halves every `half_life_days` of staleness.
///
/// Observations dated after `target` count as zero days old.
pub fn staleness_factor(last_observed: NaiveDate, target: NaiveDate, half_life_days: f64) -> f64 {
    let age_days = (target - last_observed).num_days().max(0) as f64;
    (-std::f64::consts::LN_2 * age_days / half_life_days).exp()
}

/// Pulls `raw_score` toward neutral as `decay` falls from 1 to 0.
pub fn apply_staleness(raw_score: f64, decay: f64) -> f64 {
    raw_score * decay + NEUTRAL_SCORE * (1.0 - decay)
}

impl ScoringType {
    pub fn raw_score(self, z: f64) -> f64 {
        match self {
            Self::Goldilocks => score_goldilocks(z, DEFAULT_SIGMA_TARGET),
            Self::MonotonePositive => score_monotone(z, Direction::Positive),
            Self::MonotoneNegative => score_monotone(z, Direction::Negative),
        }
    }
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
