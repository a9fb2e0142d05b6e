//! Bin edges and counts.
//!
//! Edges are ascending. Bin `i` covers `[edges[i], edges[i + 1])`, except the
//! last bin, which also includes its upper edge so the domain maximum is
//! always counted.

use serde::Serialize;

/// Slack absorbed before rounding a bin count up, so that a span that is an
/// exact multiple of the width does not gain an empty trailing bin.
const EDGE_EPSILON: f64 = 1e-9;

/// One bin of a paired histogram: the full population and the highlighted
/// subset share the same edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub total: usize,
    pub highlighted: usize,
}

/// Edges stepping from `start` by `width` until `end` is covered.
///
/// At least one bin is produced when `end >= start`; an invalid width or
/// reversed domain yields no edges.
pub fn fixed_width_edges(start: f64, end: f64, width: f64) -> Vec<f64> {
    if !(start.is_finite() && end.is_finite() && width.is_finite()) || width <= 0.0 || end < start
    {
        return Vec::new();
    }
    let bins = ((end - start) / width - EDGE_EPSILON).ceil().max(1.0) as usize;
    (0..=bins).map(|i| start + width * i as f64).collect()
}

/// `count` equal-width bins spanning `[start, end]`.
///
/// A zero-width domain collapses to a single bin holding exactly `start`.
pub fn equal_width_edges(start: f64, end: f64, count: usize) -> Vec<f64> {
    if count == 0 || !(start.is_finite() && end.is_finite()) || end < start {
        return Vec::new();
    }
    if end == start {
        return vec![start, end];
    }
    let width = (end - start) / count as f64;
    let mut edges: Vec<f64> = (0..count).map(|i| start + width * i as f64).collect();
    edges.push(end);
    edges
}

fn bin_index(value: f64, edges: &[f64]) -> Option<usize> {
    let (&first, &last) = (edges.first()?, edges.last()?);
    if edges.len() < 2 || !value.is_finite() || value < first || value > last {
        return None;
    }
    if value == last {
        return Some(edges.len() - 2);
    }
    Some(edges.partition_point(|edge| *edge <= value) - 1)
}

/// Count of values per bin. Values outside the edges, or non-finite, are
/// not counted.
pub fn histogram_counts(values: &[f64], edges: &[f64]) -> Vec<usize> {
    let mut counts = vec![0; edges.len().saturating_sub(1)];
    for &value in values {
        if let Some(idx) = bin_index(value, edges) {
            counts[idx] += 1;
        }
    }
    counts
}

/// Full-population and subset counts over shared edges.
pub fn paired_histogram(full: &[f64], subset: &[f64], edges: &[f64]) -> Vec<Bin> {
    let totals = histogram_counts(full, edges);
    let highlighted = histogram_counts(subset, edges);
    edges
        .windows(2)
        .zip(totals.into_iter().zip(highlighted))
        .map(|(bounds, (total, highlighted))| Bin {
            lower: bounds[0],
            upper: bounds[1],
            total,
            highlighted,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_match_reference_example() {
        let values = [1.0, 2.0, 2.0, 3.0, 3.0, 3.0];
        assert_eq!(histogram_counts(&values, &[1.0, 2.0, 3.0, 4.0]), vec![1, 2, 3]);
    }

    #[test]
    fn upper_bound_lands_in_last_bin() {
        assert_eq!(histogram_counts(&[0.0, 3.0, 3.5], &[0.0, 1.0, 2.0, 3.0]), vec![1, 0, 1]);
    }

    #[test]
    fn fixed_width_covers_domain() {
        assert_eq!(fixed_width_edges(0.0, 7.8, 1.0).last(), Some(&8.0));
        assert_eq!(fixed_width_edges(0.0, 8.0, 1.0).len(), 9);
        assert_eq!(fixed_width_edges(5.0, 5.0, 0.5), vec![5.0, 5.5]);
        assert!(fixed_width_edges(0.0, 1.0, 0.0).is_empty());
    }

    #[test]
    fn fixed_width_tolerates_float_steps() {
        let edges = fixed_width_edges(0.0, 1.1, 0.1);
        assert_eq!(edges.len(), 12);
    }

    #[test]
    fn equal_width_ends_exactly_at_end() {
        let edges = equal_width_edges(0.0, 1.0, 3);
        assert_eq!(edges.len(), 4);
        assert_eq!(edges[3], 1.0);
        assert_eq!(equal_width_edges(2.0, 2.0, 4), vec![2.0, 2.0]);
        assert!(equal_width_edges(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn paired_bins_share_edges() {
        let bins = paired_histogram(&[0.5, 1.5, 1.7], &[1.7], &[0.0, 1.0, 2.0]);
        assert_eq!(bins.len(), 2);
        assert_eq!((bins[1].total, bins[1].highlighted), (2, 1));
        assert_eq!((bins[0].lower, bins[0].upper), (0.0, 1.0));
    }
}
