use super::catalog::Component;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Scored view of one indicator on one day, intermediates included.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorScore {
    pub id: &'static str,
    pub name: &'static str,
    pub component: Component,
    pub asof_date: NaiveDate,
    pub raw_value: f64,
    pub z_score: f64,
    pub raw_score: f64,
    pub staleness_factor: f64,
    pub health_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Driver {
    pub id: &'static str,
    pub name: &'static str,
    pub impact: f64,
    pub category: Component,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComponentSnapshot {
    pub score: f64,
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LatestSnapshot {
    pub timestamp: DateTime<Utc>,
    pub headline_score: f64,
    pub components: BTreeMap<Component, ComponentSnapshot>,
    pub indicators: Vec<IndicatorScore>,
    pub driver_decomposition: Vec<Driver>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryPoint {
    pub date: NaiveDate,
    pub headline_score: f64,
    pub components: BTreeMap<Component, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistorySeries {
    pub days: u32,
    pub series: Vec<HistoryPoint>,
}
