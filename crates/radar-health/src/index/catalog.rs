use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

/// Modal segments of the logistics network that roll up into the headline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Component {
    Trucking,
    Ocean,
    Air,
    Rail,
    Macro,
}

impl Component {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Trucking,
            Self::Ocean,
            Self::Air,
            Self::Rail,
            Self::Macro,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Trucking => "Trucking",
            Self::Ocean => "Ocean",
            Self::Air => "Air",
            Self::Rail => "Rail",
            Self::Macro => "Macro",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

impl Frequency {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

/// Which scoring curve maps an indicator's z-score onto 0-100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringType {
    /// Higher readings are healthier.
    MonotonePositive,
    /// Lower readings are healthier.
    MonotoneNegative,
    /// Both extremes signal stress; stability scores best.
    Goldilocks,
}

impl ScoringType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::MonotonePositive => "monotone_pos",
            Self::MonotoneNegative => "monotone_neg",
            Self::Goldilocks => "goldilocks",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub component: Component,
    pub frequency: Frequency,
    pub scoring_type: ScoringType,
    pub half_life_days: f64,
    pub intra_component_weight: f64,
}

impl IndicatorDefinition {
    pub const fn new(
        id: &'static str,
        name: &'static str,
        component: Component,
        frequency: Frequency,
        scoring_type: ScoringType,
        half_life_days: f64,
        intra_component_weight: f64,
    ) -> Self {
        Self {
            id,
            name,
            component,
            frequency,
            scoring_type,
            half_life_days,
            intra_component_weight,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CatalogError {
    #[error("indicator '{0}' is defined more than once")]
    DuplicateIndicator(String),
    #[error("indicator '{id}' has a non-positive half-life ({half_life_days})")]
    InvalidHalfLife { id: String, half_life_days: f64 },
    #[error("indicator '{id}' has an invalid intra-component weight ({weight})")]
    InvalidIndicatorWeight { id: String, weight: f64 },
    #[error("component {0} has an invalid headline weight")]
    InvalidComponentWeight(Component),
    #[error("indicator '{id}' belongs to {component}, which has no headline weight")]
    MissingComponentWeight { id: String, component: Component },
}

const STANDARD_INDICATORS: [IndicatorDefinition; 9] = [
    IndicatorDefinition::new(
        "diesel_price",
        "Diesel Prices",
        Component::Trucking,
        Frequency::Weekly,
        ScoringType::MonotoneNegative,
        10.0,
        0.5,
    ),
    IndicatorDefinition::new(
        "truck_tonnage",
        "Truck Tonnage Index",
        Component::Trucking,
        Frequency::Monthly,
        ScoringType::MonotonePositive,
        45.0,
        0.5,
    ),
    IndicatorDefinition::new(
        "ocean_rate",
        "Ocean Spot Rates",
        Component::Ocean,
        Frequency::Weekly,
        ScoringType::Goldilocks,
        10.0,
        0.6,
    ),
    IndicatorDefinition::new(
        "port_congestion",
        "Port Congestion (Days)",
        Component::Ocean,
        Frequency::Daily,
        ScoringType::MonotoneNegative,
        3.0,
        0.4,
    ),
    IndicatorDefinition::new(
        "jet_fuel",
        "Jet Fuel Price",
        Component::Air,
        Frequency::Weekly,
        ScoringType::MonotoneNegative,
        10.0,
        0.5,
    ),
    IndicatorDefinition::new(
        "cargo_flights",
        "Weekly Cargo Flights",
        Component::Air,
        Frequency::Weekly,
        ScoringType::MonotonePositive,
        10.0,
        0.5,
    ),
    IndicatorDefinition::new(
        "rail_carloads",
        "Rail Carloads",
        Component::Rail,
        Frequency::Weekly,
        ScoringType::MonotonePositive,
        10.0,
        1.0,
    ),
    IndicatorDefinition::new(
        "pmi",
        "PMI Index",
        Component::Macro,
        Frequency::Monthly,
        ScoringType::MonotonePositive,
        45.0,
        0.7,
    ),
    IndicatorDefinition::new(
        "tariff_friction",
        "Tariff Friction Index",
        Component::Macro,
        Frequency::Monthly,
        ScoringType::MonotoneNegative,
        45.0,
        0.3,
    ),
];

const STANDARD_COMPONENT_WEIGHTS: [(Component, f64); 5] = [
    (Component::Trucking, 0.25),
    (Component::Ocean, 0.35),
    (Component::Air, 0.20),
    (Component::Rail, 0.15),
    (Component::Macro, 0.05),
];

/// Immutable indicator configuration and headline weights.
///
/// Built once at startup and shared by reference; there is no mutation API.
#[derive(Debug, Clone)]
pub struct IndicatorCatalog {
    indicators: Vec<IndicatorDefinition>,
    by_id: HashMap<&'static str, usize>,
    component_weights: BTreeMap<Component, f64>,
}

impl IndicatorCatalog {
    pub fn standard() -> Self {
        Self::new(
            STANDARD_INDICATORS.to_vec(),
            STANDARD_COMPONENT_WEIGHTS.into_iter().collect(),
        )
        .expect("standard catalog is valid")
    }

    pub fn new(
        indicators: Vec<IndicatorDefinition>,
        component_weights: BTreeMap<Component, f64>,
    ) -> Result<Self, CatalogError> {
        for (&component, &weight) in &component_weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(CatalogError::InvalidComponentWeight(component));
            }
        }

        let mut seen = HashSet::new();
        let mut by_id = HashMap::with_capacity(indicators.len());
        for (position, definition) in indicators.iter().enumerate() {
            if !seen.insert(definition.id) {
                return Err(CatalogError::DuplicateIndicator(definition.id.to_string()));
            }
            if !definition.half_life_days.is_finite() || definition.half_life_days <= 0.0 {
                return Err(CatalogError::InvalidHalfLife {
                    id: definition.id.to_string(),
                    half_life_days: definition.half_life_days,
                });
            }
            let weight = definition.intra_component_weight;
            if !weight.is_finite() || weight < 0.0 {
                return Err(CatalogError::InvalidIndicatorWeight {
                    id: definition.id.to_string(),
                    weight,
                });
            }
            if !component_weights.contains_key(&definition.component) {
                return Err(CatalogError::MissingComponentWeight {
                    id: definition.id.to_string(),
                    component: definition.component,
                });
            }
            by_id.insert(definition.id, position);
        }

        Ok(Self {
            indicators,
            by_id,
            component_weights,
        })
    }

    /// Indicators in declaration order.
    pub fn indicators(&self) -> &[IndicatorDefinition] {
        &self.indicators
    }

    pub fn get(&self, id: &str) -> Option<&IndicatorDefinition> {
        self.by_id.get(id).map(|&position| &self.indicators[position])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn component_weights(&self) -> &BTreeMap<Component, f64> {
        &self.component_weights
    }

    /// Headline weight for `component`, zero when the component is not weighted.
    pub fn component_weight(&self, component: Component) -> f64 {
        self.component_weights
            .get(&component)
            .copied()
            .unwrap_or(0.0)
    }

    pub fn indicators_for(&self, component: Component) -> Vec<&IndicatorDefinition> {
        self.indicators
            .iter()
            .filter(|definition| definition.component == component)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(id: &'static str, component: Component) -> IndicatorDefinition {
        IndicatorDefinition::new(
            id,
            "Test Indicator",
            component,
            Frequency::Daily,
            ScoringType::MonotonePositive,
            10.0,
            1.0,
        )
    }

    #[test]
    fn standard_catalog_covers_every_component() {
        let catalog = IndicatorCatalog::standard();
        assert_eq!(catalog.indicators().len(), 9);
        for component in Component::ordered() {
            assert!(
                !catalog.indicators_for(component).is_empty(),
                "{component} should own at least one indicator"
            );
        }

        let total: f64 = catalog.component_weights().values().sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn lookup_by_id_matches_declaration() {
        let catalog = IndicatorCatalog::standard();
        let ocean = catalog.get("ocean_rate").expect("ocean rate defined");
        assert_eq!(ocean.scoring_type, ScoringType::Goldilocks);
        assert_eq!(ocean.component, Component::Ocean);
        assert!(catalog.get("unknown").is_none());
        assert_eq!(catalog.component_weight(Component::Ocean), 0.35);
    }

    #[test]
    fn rejects_duplicate_indicator_ids() {
        let weights = BTreeMap::from([(Component::Rail, 1.0)]);
        let err = IndicatorCatalog::new(
            vec![
                definition("rail", Component::Rail),
                definition("rail", Component::Rail),
            ],
            weights,
        )
        .expect_err("duplicates rejected");
        assert_eq!(err, CatalogError::DuplicateIndicator("rail".to_string()));
    }

    #[test]
    fn rejects_indicator_without_component_weight() {
        let weights = BTreeMap::from([(Component::Rail, 1.0)]);
        let err = IndicatorCatalog::new(vec![definition("pmi", Component::Macro)], weights)
            .expect_err("missing weight rejected");
        assert!(matches!(err, CatalogError::MissingComponentWeight { .. }));
    }

    #[test]
    fn rejects_non_positive_half_life() {
        let mut bad = definition("rail", Component::Rail);
        bad.half_life_days = 0.0;
        let weights = BTreeMap::from([(Component::Rail, 1.0)]);
        let err = IndicatorCatalog::new(vec![bad], weights).expect_err("half-life rejected");
        assert!(matches!(err, CatalogError::InvalidHalfLife { .. }));
    }
}
