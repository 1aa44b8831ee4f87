//! Adaptive rate calibrator.
//!
//! Learns a single global synthesis-rate offset from the first `K` segments'
//! observed-vs-target durations, then freezes it for the rest of the job.

use crate::core::dub::types::{AdaptiveRate, CalibrationSample};

/// Computes `K = min(15, ceil(0.20 * n))`, the calibration population size.
pub fn calibration_population(n: usize, max_samples: usize, fraction: f32) -> usize {
    if n == 0 {
        return 0;
    }
    let fractional = (fraction as f64 * n as f64).ceil() as usize;
    fractional.min(max_samples).max(1).min(n)
}

/// Resolves the frozen rate from a completed population of calibration
/// samples, applying the variance gate.
///
/// Returns `AdaptiveRate::ZERO` unconditionally if `samples` is empty.
pub fn resolve_rate(
    samples: &[CalibrationSample],
    variance_gate: f32,
    rate_clamp_pct: i32,
) -> AdaptiveRate {
    if samples.is_empty() {
        return AdaptiveRate::ZERO;
    }

    let ratios: Vec<f64> = samples.iter().map(|s| s.ratio()).collect();
    let mean_ratio = ratios.iter().sum::<f64>() / ratios.len() as f64;

    let variance = ratios
        .iter()
        .map(|r| (r - mean_ratio).powi(2))
        .sum::<f64>()
        / ratios.len() as f64;
    let sigma = variance.sqrt();

    if sigma >= variance_gate as f64 {
        return AdaptiveRate::ZERO;
    }

    let mean_target = samples.iter().map(|s| s.target_s).sum::<f64>() / samples.len() as f64;
    let mean_actual = samples.iter().map(|s| s.actual_s).sum::<f64>() / samples.len() as f64;
    let ratio = if mean_target == 0.0 { 1.0 } else { mean_actual / mean_target };

    let pct = ((ratio - 1.0) * 100.0).round() as i32;
    AdaptiveRate::clamped(pct, rate_clamp_pct)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(target: f64, actual: f64) -> CalibrationSample {
        CalibrationSample {
            target_s: target,
            actual_s: actual,
        }
    }

    #[test]
    fn population_size_is_bounded_and_proportional() {
        assert_eq!(calibration_population(0, 15, 0.20), 0);
        assert_eq!(calibration_population(5, 15, 0.20), 1);
        assert_eq!(calibration_population(100, 15, 0.20), 15);
        assert_eq!(calibration_population(20, 15, 0.20), 4);
    }

    #[test]
    fn low_variance_population_yields_negative_rate() {
        let samples = vec![
            sample(1.0, 0.80),
            sample(1.0, 0.82),
            sample(1.0, 0.79),
            sample(1.0, 0.81),
            sample(1.0, 0.80),
        ];
        let rate = resolve_rate(&samples, 0.3, 100);
        assert_eq!(rate.pct(), -20);
    }

    #[test]
    fn high_variance_population_disables_adjustment() {
        let samples = vec![
            sample(1.0, 0.3),
            sample(1.0, 1.8),
            sample(1.0, 0.4),
            sample(1.0, 2.1),
            sample(1.0, 0.5),
        ];
        let rate = resolve_rate(&samples, 0.3, 100);
        assert_eq!(rate.pct(), 0);
    }

    #[test]
    fn empty_population_is_a_no_op() {
        assert_eq!(resolve_rate(&[], 0.3, 100).pct(), 0);
    }

    #[test]
    fn rate_is_always_within_clamp() {
        let samples = vec![sample(1.0, 10.0)];
        let rate = resolve_rate(&samples, 0.3, 100);
        assert!(rate.pct() <= 100 && rate.pct() >= -100);
    }

    #[test]
    fn rate_uses_ratio_of_means_not_mean_of_ratios() {
        // mean(actual/target) here is (0.5 + 2.0) / 2 = 1.25 -> would give +25%.
        // mean_actual/mean_target is (1.0 + 2.0) / (2.0 + 1.0) = 1.0 -> +0%.
        let samples = vec![sample(2.0, 1.0), sample(1.0, 2.0)];
        let rate = resolve_rate(&samples, 1.0, 100);
        assert_eq!(rate.pct(), 0);
    }
}
