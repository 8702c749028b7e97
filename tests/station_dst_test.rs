//! Station Deterministic Simulation Tests
//!
//! DST tests for StationManager with multiple seeds.

use boombox_stations::stations::{
    run_station_batch, summarize_station_batch, StationDSTConfig, StationDSTHarness,
};

// =============================================================================
// Standard Configuration Tests - 100 Seeds
// =============================================================================

#[test]
fn test_station_dst_100_seeds_standard() {
    let results = run_station_batch(0, 100, 300, StationDSTConfig::new);
    let summary = summarize_station_batch(&results);
    println!("{}", summary);

    let passed = results.iter().filter(|r| r.is_success()).count();
    assert_eq!(passed, 100, "All 100 seeds should pass with standard config");
}

#[test]
fn test_station_dst_100_seeds_crowded() {
    let results = run_station_batch(1000, 100, 300, StationDSTConfig::crowded);
    let summary = summarize_station_batch(&results);
    println!("{}", summary);

    let passed = results.iter().filter(|r| r.is_success()).count();
    assert_eq!(passed, 100, "All 100 seeds should pass with crowded players");
}

#[test]
fn test_station_dst_100_seeds_high_churn() {
    let results = run_station_batch(2000, 100, 300, StationDSTConfig::high_churn);
    let summary = summarize_station_batch(&results);
    println!("{}", summary);

    let passed = results.iter().filter(|r| r.is_success()).count();
    assert_eq!(passed, 100, "All 100 seeds should pass with high churn");
}

// =============================================================================
// Stress Tests
// =============================================================================

#[test]
fn test_station_dst_stress_2000_ops() {
    let mut harness = StationDSTHarness::with_seed(42);
    harness.run(2000);
    let result = harness.result();
    println!("Stress 2000 ops: {}", result.summary());
    assert!(result.is_success(), "2000 ops should maintain invariants");
    assert!(harness.manager().data().ids_unique());
}

#[test]
fn test_station_dst_ids_recycled_under_churn() {
    let mut harness = StationDSTHarness::new(StationDSTConfig::high_churn(7));
    harness.run(1000);
    let result = harness.result();
    println!(
        "High churn: {} (removes:{}, clears:{})",
        result.summary(),
        result.removes,
        result.clears
    );
    assert!(result.is_success());
    assert!(result.removes > 0);

    // Recycled IDs stay dense: never above the number of records ever alive
    let data = harness.manager().data();
    let max_id = data.streams.iter().map(|s| s.id).max().unwrap_or(0);
    assert!((max_id as u64) < result.adds.max(1));
}

// =============================================================================
// Determinism
// =============================================================================

#[test]
fn test_station_dst_same_seed_same_outcome() {
    let run = |seed| {
        let mut harness = StationDSTHarness::with_seed(seed);
        harness.run(400);
        (harness.result().summary(), harness.manager().data().clone())
    };
    assert_eq!(run(2024), run(2024));
}
