//! End-to-end advisory runs against the artifact fixtures in tests/fixtures

use std::collections::BTreeSet;
use std::path::PathBuf;

use advisor_app::app::{advise, advise_batch, BatchResults};
use advisor_app::models::open_bundle_at;
use advisor_domain::model::FarmObservation;
use advisor_domain::service::AdvisoryContext;
use advisor_infra::observation_csv::load_observations_from_csv;
use advisor_types::{Error, SchemaError};
use tempfile::tempdir;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("tests")
        .join("fixtures")
}

fn advisor() -> AdvisoryContext {
    open_bundle_at(&fixtures_dir().join("artifacts"))
        .expect("fixture artifacts should load")
        .into_context()
}

fn kerala_monsoon() -> FarmObservation {
    FarmObservation {
        crop_year: 2020,
        area: 2.0,
        annual_rainfall: 1200.0,
        fertilizer: 600.0,
        pesticide: 25.0,
        ..FarmObservation::new("Kerala", "Kharif")
    }
}

fn crops(recommendations: &[advisor_domain::model::Recommendation]) -> Vec<&str> {
    recommendations.iter().map(|r| r.crop.as_str()).collect()
}

#[test]
fn test_kerala_top_three() {
    let ctx = advisor();
    let report = advise(&ctx, kerala_monsoon(), 3).unwrap();

    assert_eq!(report.k, 3);
    assert_eq!(crops(&report.recommendations), ["Coconut", "Rice", "Banana"]);

    let expected_yields = [5.95, 2.6, 2.0];
    for (rec, expected) in report.recommendations.iter().zip(expected_yields) {
        assert!(
            (rec.predicted_yield - expected).abs() < 1e-9,
            "{}: {} != {}",
            rec.crop,
            rec.predicted_yield,
            expected
        );
        assert!(rec.predicted_yield >= 0.0);
    }

    // probabilities come out in non-increasing order
    for pair in report.recommendations.windows(2) {
        assert!(pair[0].probability >= pair[1].probability);
    }
}

#[test]
fn test_every_k_gives_distinct_known_crops() {
    let ctx = advisor();
    let labels: BTreeSet<&str> = ctx.crop_labels().iter().map(String::as_str).collect();

    for k in 1..=labels.len() {
        let recs = ctx.recommend(&kerala_monsoon(), k).unwrap();
        assert_eq!(recs.len(), k);
        let distinct: BTreeSet<&str> = recs.iter().map(|r| r.crop.as_str()).collect();
        assert_eq!(distinct.len(), k);
        assert!(distinct.is_subset(&labels));
    }
}

#[test]
fn test_equal_probabilities_keep_label_order() {
    let ctx = advisor();
    // Maize and Wheat score identically for this farm
    let recs = ctx.recommend(&kerala_monsoon(), 5).unwrap();
    assert_eq!(crops(&recs), ["Coconut", "Rice", "Banana", "Maize", "Wheat"]);
    assert_eq!(recs[3].probability, recs[4].probability);
}

#[test]
fn test_distribution_sums_to_one() {
    let ctx = advisor();
    let dist = ctx.crop_distribution(&kerala_monsoon()).unwrap();
    let labels: Vec<&str> = dist.iter().map(|p| p.crop.as_str()).collect();
    assert_eq!(labels, ["Banana", "Coconut", "Maize", "Rice", "Wheat"]);
    let sum: f64 = dist.iter().map(|p| p.probability).sum();
    assert!((sum - 1.0).abs() < 1e-9);
}

#[test]
fn test_rainfall_changes_yield_not_ranking() {
    let ctx = advisor();
    let dry = FarmObservation {
        annual_rainfall: 700.0,
        ..FarmObservation::new("Kerala", "Kharif")
    };
    let recs = ctx.recommend(&dry, 1).unwrap();
    assert_eq!(recs[0].crop, "Coconut");
    assert!((recs[0].predicted_yield - 5.35).abs() < 1e-9);
}

#[test]
fn test_repeated_requests_are_identical() {
    let ctx = advisor();
    let first = ctx.recommend(&kerala_monsoon(), 3).unwrap();
    let second = ctx.recommend(&kerala_monsoon(), 3).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_invalid_k() {
    let ctx = advisor();
    assert!(matches!(
        advise(&ctx, kerala_monsoon(), 0),
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
        advise(&ctx, kerala_monsoon(), 6),
        Err(Error::InvalidArgument(_))
    ));
}

#[test]
fn test_unknown_state_is_schema_error() {
    let ctx = advisor();
    let result = advise(&ctx, FarmObservation::new("Atlantis", "Kharif"), 3);
    match result {
        Err(Error::Schema(SchemaError::UnknownCategory { field, value })) => {
            assert_eq!(field, "State");
            assert_eq!(value, "Atlantis");
        }
        other => panic!("expected unknown category, got {:?}", other),
    }
}

#[test]
fn test_area_below_minimum_is_rejected() {
    let ctx = advisor();
    let tiny = FarmObservation {
        area: 0.05,
        ..kerala_monsoon()
    };
    assert!(matches!(advise(&ctx, tiny, 3), Err(Error::InvalidArgument(_))));
}

#[test]
fn test_form_choices_are_sorted() {
    let ctx = advisor();
    assert_eq!(
        ctx.known_states(),
        ["Assam", "Kerala", "Punjab", "Tamil Nadu"]
    );
    assert_eq!(
        ctx.known_seasons(),
        ["Autumn", "Kharif", "Rabi", "Summer", "Whole Year", "Winter"]
    );
}

#[test]
fn test_batch_records_failures_and_continues() {
    let ctx = advisor();
    let observations = load_observations_from_csv(&fixtures_dir().join("farms.csv")).unwrap();
    assert_eq!(observations.len(), 4);

    let mut seen = Vec::new();
    let results = advise_batch(&ctx, observations, 2, |entry| seen.push(entry.row)).unwrap();

    assert_eq!(seen, [1, 2, 3, 4]);
    assert_eq!(results.successful, 2);
    assert_eq!(results.failed, 2);

    assert!(results.entries[0].is_ok());
    assert_eq!(crops(&results.entries[0].recommendations), ["Coconut", "Rice"]);
    assert_eq!(results.entries[1].recommendations[0].crop, "Wheat");

    // unknown state
    assert!(results.entries[2].error.as_deref().unwrap().contains("Atlantis"));
    assert!(results.entries[2].recommendations.is_empty());
    // area below the form minimum
    assert!(!results.entries[3].is_ok());
}

#[test]
fn test_batch_rejects_bad_k_up_front() {
    let ctx = advisor();
    let mut calls = 0;
    let result = advise_batch(&ctx, vec![kerala_monsoon()], 0, |_| calls += 1);
    assert!(matches!(result, Err(Error::InvalidArgument(_))));
    assert_eq!(calls, 0);
}

#[test]
fn test_batch_results_survive_save_and_load() {
    let ctx = advisor();
    let results = advise_batch(&ctx, vec![kerala_monsoon()], 3, |_| {}).unwrap();

    let dir = tempdir().unwrap();
    let path = dir.path().join("results.json");
    results.save(&path).unwrap();
    let loaded = BatchResults::load(&path).unwrap();

    assert_eq!(loaded.k, 3);
    assert_eq!(loaded.successful, 1);
    assert_eq!(loaded.entries[0].observation, kerala_monsoon());
    assert_eq!(loaded.entries[0].recommendations, results.entries[0].recommendations);
}
