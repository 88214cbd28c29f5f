//! Repeatedly grows paths from the starting-point policy until the shape is saturated.

use vs_pattern::{DesiredPattern, FilledPattern};

use crate::grower::two_sided_grow;
use crate::policy::StartingPointPolicy;

/// Fills `filled` to saturation, appending one two-sided path per seed the
/// policy yields until it reports no more seeds are reachable.
pub fn fill_to_saturation(filled: &mut FilledPattern, desired: &DesiredPattern) {
    let collision_radius = filled.config().collision_radius;
    filled.search_all_fillable(desired, collision_radius);

    let mut policy = StartingPointPolicy::new();
    let mut iterations = 0usize;
    while let Some(seed) = policy.next_seed(filled, desired) {
        let path = two_sided_grow(seed, filled, desired);
        filled.push_path(path);
        iterations += 1;
        tracing::trace!(iterations, seed = ?seed, "grew path from seed");
    }
    tracing::debug!(paths = filled.paths().len(), iterations, "fill saturated");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use vs_config::{FillingConfig, FillingMethod};
    use vs_geometry::StencilCache;

    #[test]
    fn fill_to_saturation_leaves_no_fillable_cells() {
        let shape = vec![vec![true; 10]; 10];
        let fx = vec![vec![1.0; 10]; 10];
        let fy = vec![vec![0.0; 10]; 10];
        let desired = DesiredPattern::new(shape, fx, fy).unwrap();
        let config = FillingConfig::new(FillingMethod::ConsecutiveRadial, 1, 0.7, 2, 1, 3, 0);
        let mut filled = FilledPattern::new(&desired, config, Arc::new(StencilCache::new()));

        fill_to_saturation(&mut filled, &desired);

        assert!(!filled.paths().is_empty());
        filled.refine_fillable(&desired, config.collision_radius);
        assert!(filled.fillable().is_empty());
    }

    #[test]
    fn fill_to_saturation_terminates_on_a_single_cell() {
        let shape = vec![vec![true]];
        let fx = vec![vec![1.0]];
        let fy = vec![vec![0.0]];
        let desired = DesiredPattern::new(shape, fx, fy).unwrap();
        let config = FillingConfig::new(FillingMethod::ConsecutiveRadial, 0, 0.7, 1, 0, 1, 0);
        let mut filled = FilledPattern::new(&desired, config, Arc::new(StencilCache::new()));

        fill_to_saturation(&mut filled, &desired);

        assert_eq!(filled.paths().len(), 1);
        assert!(filled.filled_count_at((0, 0)) > 0);
    }
}
