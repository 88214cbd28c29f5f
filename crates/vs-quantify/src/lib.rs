//! Scalar cost of a finished fill: empty-cell fraction, mean overlap,
//! directional mismatch, and path-count density, combined by caller weights.

use vs_pattern::{DesiredPattern, FilledPattern};

/// Per-metric weights and exponents for [`Quantifier::cost`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostWeights {
    pub w_empty: f64,
    pub w_overlap: f64,
    pub w_director: f64,
    pub w_path: f64,
    pub e_empty: f64,
    pub e_overlap: f64,
    pub e_director: f64,
    pub e_path: f64,
}

impl Default for CostWeights {
    /// The weights and exponents the non-obsolete optimiser path uses.
    fn default() -> Self {
        Self {
            w_empty: 10.0,
            w_overlap: 8.0,
            w_director: 100.0,
            w_path: 10.0,
            e_empty: 1.0,
            e_overlap: 1.0,
            e_director: 2.0,
            e_path: 2.0,
        }
    }
}

/// The four raw metrics of a finished [`FilledPattern`], before weighting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    pub empty: f64,
    pub overlap: f64,
    pub director_mismatch: f64,
    pub path_density: f64,
}

impl Metrics {
    pub fn measure(filled: &FilledPattern, desired: &DesiredPattern) -> Self {
        let mut interior = 0u64;
        let mut empty_count = 0u64;
        let mut total_filled = 0u64;
        let mut director_agreement = 0.0;
        let mut filled_elements = 0u64;

        for (i, j) in desired.interior_cells() {
            interior += 1;
            let count = filled.filled_count_at((i, j));
            total_filled += count as u64;
            if count == 0 {
                empty_count += 1;
                continue;
            }

            let (fx, fy) = filled.realised_at((i, j));
            let (dx, dy) = desired.field_at(i, j);
            let filled_norm = (fx * fx + fy * fy).sqrt();
            let desired_norm = (dx * dx + dy * dy).sqrt();
            if filled_norm == 0.0 || desired_norm == 0.0 {
                continue;
            }
            director_agreement += (fx * dx + fy * dy).abs() / (filled_norm * desired_norm);
            filled_elements += 1;
        }

        let interior = interior.max(1) as f64;
        let empty = empty_count as f64 / interior;
        let overlap = total_filled as f64 / interior - 1.0 + empty;
        let director_mismatch = if filled_elements == 0 {
            1.0
        } else {
            1.0 - director_agreement / filled_elements as f64
        };
        let perimeter_length = desired.width().max(desired.height()).max(1) as f64;
        let path_density = filled.paths().len() as f64 / perimeter_length;

        Self {
            empty,
            overlap,
            director_mismatch,
            path_density,
        }
    }
}

/// Scores a finished [`FilledPattern`] against its [`DesiredPattern`].
pub struct Quantifier;

impl Quantifier {
    /// Weighted, exponentiated sum of the four metrics.
    pub fn cost(filled: &FilledPattern, desired: &DesiredPattern, weights: CostWeights) -> f64 {
        let metrics = Metrics::measure(filled, desired);
        weights.w_empty * metrics.empty.powf(weights.e_empty)
            + weights.w_overlap * metrics.overlap.powf(weights.e_overlap)
            + weights.w_director * metrics.director_mismatch.powf(weights.e_director)
            + weights.w_path * metrics.path_density.powf(weights.e_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use vs_config::{FillingConfig, FillingMethod};
    use vs_geometry::StencilCache;

    fn uniform_pattern(n: usize) -> DesiredPattern {
        let shape = vec![vec![true; n]; n];
        let fx = vec![vec![1.0; n]; n];
        let fy = vec![vec![0.0; n]; n];
        DesiredPattern::new(shape, fx, fy).unwrap()
    }

    fn config() -> FillingConfig {
        FillingConfig::new(FillingMethod::ConsecutiveRadial, 1, 0.7, 2, 1, 1, 0)
    }

    #[test]
    fn unfilled_pattern_is_entirely_empty() {
        let desired = uniform_pattern(4);
        let filled = FilledPattern::new(&desired, config(), Arc::new(StencilCache::new()));
        let metrics = Metrics::measure(&filled, &desired);
        assert_eq!(metrics.empty, 1.0);
        assert_eq!(metrics.overlap, 0.0);
    }

    #[test]
    fn perfectly_aligned_coverage_has_zero_director_mismatch() {
        let desired = uniform_pattern(3);
        let mut filled = FilledPattern::new(&desired, config(), Arc::new(StencilCache::new()));
        for (i, j) in desired.interior_cells() {
            filled.fill_cells(&[(i, j)], (1.0, 0.0));
        }
        let metrics = Metrics::measure(&filled, &desired);
        assert_eq!(metrics.empty, 0.0);
        assert!(metrics.director_mismatch.abs() < 1e-9);
    }

    #[test]
    fn antiparallel_coverage_also_has_zero_mismatch_after_canonicalisation() {
        let desired = uniform_pattern(3);
        let mut filled = FilledPattern::new(&desired, config(), Arc::new(StencilCache::new()));
        for (i, j) in desired.interior_cells() {
            filled.fill_cells(&[(i, j)], (-1.0, 0.0));
        }
        let metrics = Metrics::measure(&filled, &desired);
        assert!(metrics.director_mismatch.abs() < 1e-9);
    }

    #[test]
    fn cost_increases_monotonically_with_empty_fraction() {
        let desired = uniform_pattern(4);
        let weights = CostWeights::default();
        let mut filled_low_empty = FilledPattern::new(&desired, config(), Arc::new(StencilCache::new()));
        for (i, j) in desired.interior_cells() {
            filled_low_empty.fill_cells(&[(i, j)], (1.0, 0.0));
        }
        let empty_filled = FilledPattern::new(&desired, config(), Arc::new(StencilCache::new()));

        let cost_low = Quantifier::cost(&filled_low_empty, &desired, weights);
        let cost_high = Quantifier::cost(&empty_filled, &desired, weights);
        assert!(cost_low < cost_high);
    }
}
