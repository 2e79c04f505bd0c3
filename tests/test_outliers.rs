//! Tests for IQR-based target outlier removal

use pricefit::pipeline::{iqr_bounds, remove_target_outliers, quantile};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[path = "common/mod.rs"]
mod common;

fn uniform_targets(rows: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..rows).map(|_| rng.gen_range(100_000.0..500_000.0)).collect()
}

#[test]
fn test_single_extreme_outlier_is_the_only_row_removed() {
    let mut target = uniform_targets(20_000, 21);

    let mut sorted = target.clone();
    sorted.sort_by(f64::total_cmp);
    let p75 = quantile(&sorted, 0.75).unwrap();
    target[1234] = 50.0 * p75;

    let feature: Vec<f64> = (0..target.len()).map(|i| i as f64).collect();
    let frame = common::labeled_frame(vec![("x", feature)], target);

    let (filtered, report) = remove_target_outliers(&frame).unwrap();

    assert_eq!(report.removed(), 1);
    assert_eq!(report.removed_row_ids, vec![1234]);
    assert_eq!(filtered.height(), 19_999);
    assert!(!filtered.row_ids().unwrap().contains(&1234));
}

#[test]
fn test_survivors_respect_bound_of_original_distribution() {
    let mut target = uniform_targets(2_000, 22);
    for i in 0..20 {
        target[i * 50] = 2_000_000.0 + i as f64;
    }
    let bounds = iqr_bounds(&target).unwrap();

    let feature: Vec<f64> = (0..target.len()).map(|i| i as f64).collect();
    let frame = common::labeled_frame(vec![("x", feature)], target);
    let (filtered, report) = remove_target_outliers(&frame).unwrap();

    assert_eq!(report.bounds, bounds);
    assert_eq!(report.removed(), 20);
    assert!(filtered
        .target_values()
        .unwrap()
        .iter()
        .all(|&v| v <= bounds.upper_bound));
}

#[test]
fn test_order_and_alignment_preserved() {
    let target = vec![1.0, 2.0, 3.0, 4.0, 100.0, 5.0, 6.0, 7.0];
    let feature: Vec<f64> = target.iter().map(|v| v * 10.0).collect();
    let frame = common::labeled_frame(vec![("x", feature)], target);

    let (filtered, _) = remove_target_outliers(&frame).unwrap();

    assert_eq!(filtered.row_ids().unwrap(), vec![0, 1, 2, 3, 5, 6, 7]);
    let x = filtered.feature_values("x").unwrap();
    let y = filtered.target_values().unwrap();
    for (xi, yi) in x.iter().zip(&y) {
        assert_eq!(*xi, yi * 10.0);
    }
}

#[test]
fn test_low_tail_is_never_filtered() {
    let target = vec![-1_000_000.0, 10.0, 11.0, 12.0, 13.0, 14.0];
    let frame = common::labeled_frame(vec![("x", vec![0.0; 6])], target);

    let (filtered, report) = remove_target_outliers(&frame).unwrap();
    assert_eq!(report.removed(), 0);
    assert_eq!(filtered.height(), 6);
}

#[test]
fn test_zero_iqr_removes_only_values_above_q3() {
    let target = vec![5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 9.0];
    let feature: Vec<f64> = (0..target.len()).map(|i| i as f64).collect();
    let frame = common::labeled_frame(vec![("x", feature)], target);

    let (filtered, report) = remove_target_outliers(&frame).unwrap();

    assert_eq!(report.bounds.iqr, 0.0);
    assert_eq!(report.bounds.upper_bound, 5.0);
    assert_eq!(report.removed_row_ids, vec![7]);
    assert_eq!(filtered.height(), 7);
    assert_eq!(filtered.row_ids().unwrap(), vec![0, 1, 2, 3, 4, 5, 6]);
}
