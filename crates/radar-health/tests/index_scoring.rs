use chrono::{Duration, NaiveDate, TimeZone, Utc};
use radar_health::index::scoring::MAD_SCALE_FACTOR;
use radar_health::index::{
    Component, Frequency, HealthIndexService, IndicatorCatalog, IndicatorDefinition,
    ScoringType, SyntheticSeeder, TimeSeriesStore,
};
use std::collections::BTreeMap;
use std::sync::Arc;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

fn daily(
    id: &'static str,
    component: Component,
    scoring_type: ScoringType,
    weight: f64,
) -> IndicatorDefinition {
    IndicatorDefinition::new(
        id,
        "Test Indicator",
        component,
        Frequency::Daily,
        scoring_type,
        10.0,
        weight,
    )
}

fn rail_only_catalog() -> Arc<IndicatorCatalog> {
    let catalog = IndicatorCatalog::new(
        vec![daily(
            "rail_carloads",
            Component::Rail,
            ScoringType::MonotonePositive,
            1.0,
        )],
        BTreeMap::from([(Component::Rail, 1.0)]),
    )
    .expect("catalog is valid");
    Arc::new(catalog)
}

fn service(catalog: Arc<IndicatorCatalog>, store: TimeSeriesStore) -> HealthIndexService {
    HealthIndexService::new(catalog, Arc::new(store), 5)
}

#[test]
fn value_at_baseline_median_scores_neutral() {
    let target = date(2025, 7, 15);
    let mut builder = TimeSeriesStore::builder();
    for (year, value) in [(2020, 10.0), (2021, 20.0), (2022, 30.0), (2023, 40.0), (2024, 50.0)] {
        builder.put("rail_carloads", date(year, 7, 10), value);
    }
    builder.put("rail_carloads", target, 30.0);

    let service = service(rail_only_catalog(), builder.finalize());
    let day = service.compute_day(target);

    assert_eq!(day.indicator_scores.len(), 1);
    let score = &day.indicator_scores[0];
    assert_eq!(score.asof_date, target);
    assert_eq!(score.z_score, 0.0);
    assert_eq!(score.raw_score, 50.0);
    assert_eq!(score.staleness_factor, 1.0);
    assert_eq!(score.health_score, 50.0);
    assert_eq!(day.components[&Component::Rail], 50.0);
    assert_eq!(day.headline, 50.0);
}

#[test]
fn observation_two_half_lives_old_decays_to_a_quarter() {
    let target = date(2025, 7, 25);
    let observed = target - Duration::days(20);
    let mut builder = TimeSeriesStore::builder();
    for (year, value) in [(2020, 10.0), (2021, 20.0), (2022, 30.0), (2023, 40.0), (2024, 50.0)] {
        builder.put("rail_carloads", date(year, 7, 10), value);
    }
    builder.put("rail_carloads", observed, 45.0);

    let service = service(rail_only_catalog(), builder.finalize());
    let day = service.compute_day(target);
    let score = &day.indicator_scores[0];

    // The stale July reading is itself part of the July baseline:
    // [10, 20, 30, 40, 45, 50] -> median 35, MAD 12.5.
    let z = 10.0 / (MAD_SCALE_FACTOR * 12.5);
    let raw = 50.0 + 25.0 * z;
    let expected = raw * 0.25 + 50.0 * 0.75;

    assert_eq!(score.asof_date, observed);
    assert_eq!(score.staleness_factor, 0.25);
    assert!((score.raw_score - raw).abs() < 0.005);
    assert!((score.health_score - expected).abs() < 0.005);
    assert_eq!(day.headline, score.health_score);
}

#[test]
fn missing_indicator_is_excluded_from_component_mean() {
    let catalog = IndicatorCatalog::new(
        vec![
            daily("diesel_price", Component::Trucking, ScoringType::MonotoneNegative, 0.3),
            daily("truck_tonnage", Component::Trucking, ScoringType::MonotonePositive, 0.7),
        ],
        BTreeMap::from([(Component::Trucking, 1.0)]),
    )
    .expect("catalog is valid");

    let target = date(2025, 3, 20);
    let mut builder = TimeSeriesStore::builder();
    for (year, value) in [(2021, 3.0), (2022, 4.0), (2023, 5.0)] {
        builder.put("diesel_price", date(year, 3, 2), value);
    }
    builder.put("diesel_price", target, 3.5);
    // truck_tonnage only has data after the target, so it cannot vote.
    builder.put("truck_tonnage", target + Duration::days(3), 120.0);

    let service = service(Arc::new(catalog), builder.finalize());
    let day = service.compute_day(target);

    assert_eq!(day.indicator_scores.len(), 1);
    let diesel = &day.indicator_scores[0];
    assert_eq!(diesel.id, "diesel_price");
    assert!((day.components[&Component::Trucking] - diesel.health_score).abs() < 1e-9);
    assert!(!day.contributions.contains_key("truck_tonnage"));
    assert!((day.contributions["diesel_price"] - 0.3 * diesel.health_score).abs() < 1e-9);
}

#[test]
fn empty_baseline_excludes_indicator_even_with_a_value() {
    let target = date(2025, 3, 20);
    let mut builder = TimeSeriesStore::builder();
    builder.put("rail_carloads", date(2024, 2, 1), 10.0);
    builder.put("rail_carloads", target, 12.0);

    let service = service(rail_only_catalog(), builder.finalize());
    let day = service.compute_day(target);

    assert!(day.indicator_scores.is_empty());
    assert!(day.contributions.is_empty());
    assert_eq!(day.components[&Component::Rail], 50.0);
    assert_eq!(day.headline, 50.0);
}

#[test]
fn empty_store_defaults_every_component_to_neutral() {
    let service = service(
        Arc::new(IndicatorCatalog::standard()),
        TimeSeriesStore::builder().finalize(),
    );
    let day = service.compute_day(date(2025, 10, 1));

    assert_eq!(day.components.len(), 5);
    assert!(day.components.values().all(|score| *score == 50.0));
    assert!((day.headline - 50.0).abs() < 1e-12);
}

#[test]
fn drivers_ignore_indicators_missing_on_either_day() {
    let catalog = IndicatorCatalog::new(
        vec![
            daily("ocean_rate", Component::Ocean, ScoringType::Goldilocks, 1.0),
            daily("rail_carloads", Component::Rail, ScoringType::MonotonePositive, 1.0),
        ],
        BTreeMap::from([(Component::Ocean, 0.5), (Component::Rail, 0.5)]),
    )
    .expect("catalog is valid");

    let today = date(2025, 8, 1);
    let mut builder = TimeSeriesStore::builder();
    for (year, value) in [(2021, 100.0), (2022, 110.0), (2023, 120.0), (2024, 130.0)] {
        builder.put("ocean_rate", date(year, 7, 15), value);
        builder.put("ocean_rate", date(year, 8, 15), value);
    }
    builder.put("ocean_rate", today - Duration::days(1), 140.0);
    builder.put("ocean_rate", today, 115.0);

    // Rail only has August history, so it has no July baseline yesterday.
    for (year, value) in [(2021, 1.0), (2022, 2.0), (2023, 3.0), (2024, 4.0)] {
        builder.put("rail_carloads", date(year, 8, 15), value);
    }
    builder.put("rail_carloads", today, 5.0);

    let service = service(Arc::new(catalog), builder.finalize());
    let now = Utc.with_ymd_and_hms(2025, 8, 1, 12, 0, 0).unwrap();
    let snapshot = service.latest_at(now);

    assert!(snapshot.indicators.iter().any(|score| score.id == "rail_carloads"));
    assert_eq!(snapshot.driver_decomposition.len(), 1);
    let driver = &snapshot.driver_decomposition[0];
    assert_eq!(driver.id, "ocean_rate");
    assert_eq!(driver.category, Component::Ocean);
    assert!(driver.impact > 0.0, "ocean stabilised, so its impact is positive");
}

#[test]
fn seeded_drivers_are_bounded_sorted_and_present_on_both_days() {
    let catalog = Arc::new(IndicatorCatalog::standard());
    let today = date(2025, 10, 13);
    let store = SyntheticSeeder::default()
        .with_span_days(365 * 3)
        .seed(&catalog, today);
    let service = service(catalog, store);

    let now = Utc.with_ymd_and_hms(2025, 10, 13, 9, 30, 0).unwrap();
    let snapshot = service.latest_at(now);
    let today_result = service.compute_day(today);
    let previous_result = service.compute_day(today - Duration::days(1));

    assert!(snapshot.driver_decomposition.len() <= 10);
    for pair in snapshot.driver_decomposition.windows(2) {
        assert!(pair[0].impact.abs() >= pair[1].impact.abs());
    }
    for driver in &snapshot.driver_decomposition {
        assert!(today_result.contributions.contains_key(driver.id));
        assert!(previous_result.contributions.contains_key(driver.id));
    }

    assert_eq!(snapshot.timestamp, now);
    assert_eq!(snapshot.components.len(), 5);
    for score in &snapshot.indicators {
        assert!((0.0..=100.0).contains(&score.health_score));
        assert!((0.0..=1.0).contains(&score.staleness_factor));
        assert!(score.asof_date <= today);
    }
}

#[test]
fn history_of_one_day_is_dated_at_the_end_and_repeatable() {
    let catalog = Arc::new(IndicatorCatalog::standard());
    let end = date(2025, 10, 13);
    let store = SyntheticSeeder::default()
        .with_span_days(365 * 2)
        .seed(&catalog, end);
    let service = service(catalog, store);

    let first = service.history_ending(end, 1);
    let second = service.history_ending(end, 1);

    assert_eq!(first.days, 1);
    assert_eq!(first.series.len(), 1);
    assert_eq!(first.series[0].date, end);
    assert_eq!(first, second);
}

#[test]
fn history_is_oldest_first_and_clamped() {
    let catalog = Arc::new(IndicatorCatalog::standard());
    let end = date(2025, 10, 13);
    let store = SyntheticSeeder::default()
        .with_span_days(400)
        .seed(&catalog, end);
    let service = service(catalog, store);

    let week = service.history_ending(end, 7);
    assert_eq!(week.series.len(), 7);
    assert_eq!(week.series[0].date, end - Duration::days(6));
    assert_eq!(week.series[6].date, end);
    for pair in week.series.windows(2) {
        assert_eq!(pair[1].date - pair[0].date, Duration::days(1));
    }

    // Each point matches an independent single-day computation.
    let middle = &week.series[3];
    let direct = service.compute_day(middle.date);
    assert!((middle.headline_score - direct.headline).abs() <= 0.005);

    assert_eq!(service.history_ending(end, 0).series.len(), 1);
    assert_eq!(service.history_ending(end, 5000).days, 3650);
}
