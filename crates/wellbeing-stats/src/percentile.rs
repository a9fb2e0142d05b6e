use wellbeing_model::{Metric, RankDirection};

/// Share of `distribution` ranked at or below `value` (or at or above, for
/// [`RankDirection::AtOrAbove`]), as a percentage in `[0, 100]`.
///
/// Returns `NaN` for an empty distribution or a non-finite value. Non-finite
/// entries of the distribution are ignored.
pub fn percentile_rank(value: f64, distribution: &[f64], direction: RankDirection) -> f64 {
    if !value.is_finite() {
        return f64::NAN;
    }
    let mut total = 0usize;
    let mut ranked = 0usize;
    for &candidate in distribution.iter().filter(|d| d.is_finite()) {
        total += 1;
        let counts = match direction {
            RankDirection::AtOrBelow => candidate <= value,
            RankDirection::AtOrAbove => candidate >= value,
        };
        if counts {
            ranked += 1;
        }
    }
    if total == 0 {
        return f64::NAN;
    }
    100.0 * ranked as f64 / total as f64
}

/// [`percentile_rank`] in the metric's own direction.
pub fn metric_percentile(metric: Metric, value: f64, distribution: &[f64]) -> f64 {
    percentile_rank(value, distribution, metric.rank_direction())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_ties_as_ranked() {
        let dist = [1.0, 2.0, 2.0, 3.0];
        assert_eq!(percentile_rank(2.0, &dist, RankDirection::AtOrBelow), 75.0);
        assert_eq!(percentile_rank(2.0, &dist, RankDirection::AtOrAbove), 75.0);
        assert_eq!(percentile_rank(0.5, &dist, RankDirection::AtOrBelow), 0.0);
        assert_eq!(percentile_rank(3.0, &dist, RankDirection::AtOrBelow), 100.0);
    }

    #[test]
    fn corruption_ranks_low_values_high() {
        let dist = [0.2, 0.5, 0.8, 0.9];
        let clean = metric_percentile(Metric::PerceptionsOfCorruption, 0.2, &dist);
        let corrupt = metric_percentile(Metric::PerceptionsOfCorruption, 0.9, &dist);
        assert_eq!(clean, 100.0);
        assert_eq!(corrupt, 25.0);
    }

    #[test]
    fn empty_distribution_is_nan() {
        assert!(percentile_rank(1.0, &[], RankDirection::AtOrBelow).is_nan());
        assert!(percentile_rank(f64::NAN, &[1.0], RankDirection::AtOrBelow).is_nan());
    }
}
