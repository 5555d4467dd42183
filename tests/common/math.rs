//! Unit tests for moving-average math helpers

use screenix::common::math::{ema, sma, tail_mean};

#[test]
fn sma_requires_enough_values() {
    assert_eq!(sma(&[1.0, 2.0], 3), None);
    assert_eq!(sma(&[], 1), None);
    assert_eq!(sma(&[1.0, 2.0, 3.0], 0), None);
}

#[test]
fn sma_averages_the_tail() {
    let values = [1.0, 2.0, 3.0, 4.0, 5.0];
    assert_eq!(sma(&values, 2), Some(4.5));
    assert_eq!(sma(&values, 5), Some(3.0));
}

#[test]
fn ema_of_constant_series_is_the_constant() {
    let values = [10.0; 30];
    let result = ema(&values, 10).unwrap();
    assert!((result - 10.0).abs() < 1e-9);
}

#[test]
fn ema_tracks_recent_values_more_closely_than_sma() {
    let mut values: Vec<f64> = vec![100.0; 50];
    values.extend(std::iter::repeat(200.0).take(10));
    let ema_value = ema(&values, 20).unwrap();
    let sma_value = sma(&values, 20).unwrap();
    assert!(ema_value > 100.0);
    assert!(sma_value > 100.0);
}

#[test]
fn tail_mean_handles_short_slices() {
    assert_eq!(tail_mean(&[2.0, 4.0], 10), Some(3.0));
    assert_eq!(tail_mean(&[], 10), None);
}
