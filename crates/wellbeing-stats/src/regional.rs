use std::collections::BTreeMap;

use wellbeing_model::{Metric, Record, Year};

use crate::percentile::metric_percentile;
use crate::summary::mean;

/// Mean of the observed (non-zero) values of `metric`, `NaN` when none.
pub fn regional_aggregate<'a>(records: impl IntoIterator<Item = &'a Record>, metric: Metric) -> f64 {
    mean(records.into_iter().filter_map(|record| record.observed(metric)))
}

/// Per-year mean of `metric` over the given records.
///
/// Every year that has at least one record gets an entry; a year whose
/// records all lack the metric maps to `NaN`.
pub fn regional_time_series<'a>(
    records: impl IntoIterator<Item = &'a Record>,
    metric: Metric,
) -> BTreeMap<Year, f64> {
    let mut by_year: BTreeMap<Year, Vec<f64>> = BTreeMap::new();
    for record in records {
        let values = by_year.entry(record.year).or_default();
        if let Some(value) = record.observed(metric) {
            values.push(value);
        }
    }
    by_year
        .into_iter()
        .map(|(year, values)| (year, mean(values)))
        .collect()
}

/// Observed values of `metric`, the distribution percentiles rank against.
pub fn observed_values<'a>(
    records: impl IntoIterator<Item = &'a Record>,
    metric: Metric,
) -> Vec<f64> {
    records
        .into_iter()
        .filter_map(|record| record.observed(metric))
        .collect()
}

/// Percentile of `value` within the year's observed distribution of `metric`.
///
/// A zero `value` is the missing marker and ranks as `NaN`.
pub fn percentile_in_year<'a>(
    value: f64,
    year_records: impl IntoIterator<Item = &'a Record>,
    metric: Metric,
) -> f64 {
    if value == 0.0 {
        return f64::NAN;
    }
    metric_percentile(metric, value, &observed_values(year_records, metric))
}

#[cfg(test)]
mod tests {
    use wellbeing_model::{CountryId, MetricMap};

    use super::*;

    fn record(id: u32, year: Year, happiness: f64) -> Record {
        let mut metrics = MetricMap::from_fn(|_| 1.0);
        metrics.set(Metric::HappinessScore, happiness);
        Record::new(CountryId::new(id).unwrap(), format!("C{id}"), year, metrics)
    }

    #[test]
    fn aggregate_ignores_missing_values() {
        let rows = [record(1, 2020, 4.0), record(2, 2020, 0.0), record(3, 2020, 6.0)];
        assert_eq!(regional_aggregate(&rows, Metric::HappinessScore), 5.0);
        assert!(regional_aggregate(std::iter::empty(), Metric::HappinessScore).is_nan());
    }

    #[test]
    fn time_series_has_one_point_per_year() {
        let rows = [
            record(1, 2019, 4.0),
            record(1, 2020, 5.0),
            record(2, 2020, 7.0),
            record(2, 2018, 0.0),
        ];
        let series = regional_time_series(&rows, Metric::HappinessScore);
        assert_eq!(series.keys().copied().collect::<Vec<_>>(), vec![2018, 2019, 2020]);
        assert!(series[&2018].is_nan());
        assert_eq!(series[&2020], 6.0);
    }

    #[test]
    fn percentile_in_year_skips_missing_distribution_entries() {
        let rows = [record(1, 2020, 4.0), record(2, 2020, 0.0), record(3, 2020, 6.0)];
        assert_eq!(percentile_in_year(4.0, &rows, Metric::HappinessScore), 50.0);
        assert!(percentile_in_year(0.0, &rows, Metric::HappinessScore).is_nan());
    }
}
