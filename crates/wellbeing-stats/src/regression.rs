//! Ordinary least squares and Student-t confidence bands for the fitted line.
//!
//! Degenerate inputs (too few finite points, zero x-variance) never fail:
//! coefficients and interval bounds come back as `NaN` and the renderer draws
//! nothing for them.

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Fitted line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Regression {
    pub slope: f64,
    pub intercept: f64,
}

impl Regression {
    pub const DEGENERATE: Regression = Regression {
        slope: f64::NAN,
        intercept: f64::NAN,
    };

    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    pub fn is_degenerate(&self) -> bool {
        !(self.slope.is_finite() && self.intercept.is_finite())
    }
}

/// Two-sided interval around the fitted value at one x position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Interval {
    pub lower: f64,
    pub upper: f64,
}

impl Interval {
    pub const DEGENERATE: Interval = Interval {
        lower: f64::NAN,
        upper: f64::NAN,
    };

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// One sample of a confidence band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BandPoint {
    pub x: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Sufficient statistics of a least-squares fit over the finite points.
struct Fit {
    n: usize,
    mean_x: f64,
    sxx: f64,
    line: Regression,
    residual_se: f64,
}

impl Fit {
    fn new(points: &[(f64, f64)]) -> Option<Self> {
        let finite: Vec<(f64, f64)> = points
            .iter()
            .copied()
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .collect();
        let n = finite.len();
        if n < 2 {
            return None;
        }
        let count = n as f64;
        let mean_x = finite.iter().map(|(x, _)| x).sum::<f64>() / count;
        let mean_y = finite.iter().map(|(_, y)| y).sum::<f64>() / count;
        let (sxx, sxy) = finite.iter().fold((0.0, 0.0), |(sxx, sxy), (x, y)| {
            let dx = x - mean_x;
            (sxx + dx * dx, sxy + dx * (y - mean_y))
        });
        if sxx == 0.0 {
            return None;
        }
        let slope = sxy / sxx;
        let line = Regression {
            slope,
            intercept: mean_y - slope * mean_x,
        };
        let residual_se = if n > 2 {
            let sse: f64 = finite
                .iter()
                .map(|(x, y)| {
                    let residual = y - line.predict(*x);
                    residual * residual
                })
                .sum();
            (sse / (count - 2.0)).sqrt()
        } else {
            f64::NAN
        };
        Some(Self {
            n,
            mean_x,
            sxx,
            line,
            residual_se,
        })
    }

    fn interval(&self, x: f64, t: f64) -> Interval {
        if self.n < 3 || !t.is_finite() || !x.is_finite() {
            return Interval::DEGENERATE;
        }
        let dx = x - self.mean_x;
        let se = self.residual_se * (1.0 / self.n as f64 + dx * dx / self.sxx).sqrt();
        let center = self.line.predict(x);
        Interval {
            lower: center - t * se,
            upper: center + t * se,
        }
    }

    fn t(&self, level: f64) -> f64 {
        t_critical(level, (self.n - 2) as f64)
    }
}

/// Least-squares slope and intercept over the finite points.
pub fn linear_regression(points: &[(f64, f64)]) -> Regression {
    Fit::new(points).map_or(Regression::DEGENERATE, |fit| fit.line)
}

/// Two-sided Student-t critical value for significance `level` (e.g. `0.05`
/// for a 95% interval), i.e. the `1 - level / 2` quantile with `df` degrees
/// of freedom. `NaN` outside `0 < level < 1` or for `df <= 0`.
pub fn t_critical(level: f64, df: f64) -> f64 {
    let valid = level > 0.0 && level < 1.0 && df > 0.0;
    if !valid {
        return f64::NAN;
    }
    match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => dist.inverse_cdf(1.0 - level / 2.0),
        Err(_) => f64::NAN,
    }
}

/// Confidence interval of the fitted mean response at `x`.
///
/// Needs at least three finite points with non-zero x-variance.
pub fn confidence_interval(points: &[(f64, f64)], x: f64, level: f64) -> Interval {
    match Fit::new(points) {
        Some(fit) => fit.interval(x, fit.t(level)),
        None => Interval::DEGENERATE,
    }
}

/// [`confidence_interval`] evaluated at every position in `xs`, fitting once.
///
/// A degenerate fit yields an empty band.
pub fn confidence_band(points: &[(f64, f64)], xs: &[f64], level: f64) -> Vec<BandPoint> {
    let Some(fit) = Fit::new(points) else {
        return Vec::new();
    };
    let t = fit.t(level);
    if fit.n < 3 || !t.is_finite() {
        return Vec::new();
    }
    xs.iter()
        .map(|&x| {
            let interval = fit.interval(x, t);
            BandPoint {
                x,
                lower: interval.lower,
                upper: interval.upper,
            }
        })
        .collect()
}

/// `count` evenly spaced positions from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count).map(|i| start + step * i as f64).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_points_fit_exactly_but_have_no_interval() {
        let points = [(0.0, 1.0), (2.0, 5.0)];
        let line = linear_regression(&points);
        assert_eq!(line.slope, 2.0);
        assert_eq!(line.intercept, 1.0);
        assert!(confidence_interval(&points, 1.0, 0.05).lower.is_nan());
    }

    #[test]
    fn vertical_points_are_degenerate() {
        let line = linear_regression(&[(1.0, 1.0), (1.0, 2.0), (1.0, 3.0)]);
        assert!(line.is_degenerate());
        assert!(confidence_band(&[(1.0, 1.0), (1.0, 2.0)], &[1.0], 0.05).is_empty());
    }

    #[test]
    fn t_critical_matches_tables() {
        assert!((t_critical(0.05, 10.0) - 2.228_138_85).abs() < 1e-4);
        assert!((t_critical(0.01, 5.0) - 4.032_142_98).abs() < 1e-4);
        assert!(t_critical(0.0, 5.0).is_nan());
        assert!(t_critical(0.05, 0.0).is_nan());
    }

    #[test]
    fn linspace_includes_both_ends() {
        assert_eq!(linspace(0.0, 1.0, 3), vec![0.0, 0.5, 1.0]);
        assert_eq!(linspace(2.0, 9.0, 1), vec![2.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }
}
