//! Pure statistics behind the dashboard views.
//!
//! Nothing here fails: empty or degenerate input produces `NaN`, an empty
//! vector or `None`, which the views render as gaps.

pub mod histogram;
pub mod percentile;
pub mod regional;
pub mod regression;
pub mod summary;

pub use histogram::{
    Bin, equal_width_edges, fixed_width_edges, histogram_counts, paired_histogram,
};
pub use percentile::{metric_percentile, percentile_rank};
pub use regional::{observed_values, percentile_in_year, regional_aggregate, regional_time_series};
pub use regression::{
    BandPoint, Interval, Regression, confidence_band, confidence_interval, linear_regression,
    linspace, t_critical,
};
pub use summary::{extent, mean};
