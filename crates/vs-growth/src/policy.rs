//! Seed selection, with the consecutive/random x radial/perimeter method matrix
//! and the bounded-probe rescan fallback.

use rand::Rng;
use vs_config::FillingMethod;
use vs_pattern::{DesiredPattern, FilledPattern};

/// Consecutive probes that may land on a stale (already-collision) cell
/// before a [`FilledPattern::refine_fillable`] rescan is forced.
const MAX_PROBE: u32 = 100;

/// Walks `fillable` (radial methods) or `DesiredPattern::perimeter` filtered
/// live against the current fill state (perimeter methods), advancing a
/// cursor by `starting_point_separation` for the consecutive variants or
/// drawing from the pattern's owned PRNG for the random ones.
pub struct StartingPointPolicy {
    cursor: usize,
    tries: u32,
}

impl StartingPointPolicy {
    pub fn new() -> Self {
        Self { cursor: 0, tries: 0 }
    }

    /// Returns the next seed, or `None` once no more fillable cells exist.
    pub fn next_seed(&mut self, filled: &mut FilledPattern, desired: &DesiredPattern) -> Option<(i32, i32)> {
        let config = *filled.config();
        loop {
            let candidates = self.candidate_list(filled, desired);
            if candidates.is_empty() {
                return None;
            }

            let index = match config.method {
                FillingMethod::ConsecutiveRadial | FillingMethod::ConsecutivePerimeter => {
                    let index = self.cursor % candidates.len();
                    self.cursor = self.cursor.wrapping_add(config.starting_point_separation.max(1) as usize);
                    index
                }
                FillingMethod::RandomRadial | FillingMethod::RandomPerimeter => {
                    filled.rng_mut().gen_range(0..candidates.len())
                }
            };
            let candidate = candidates[index];

            if filled.is_collision_free(desired, candidate, config.collision_radius) {
                self.tries = 0;
                return Some(candidate);
            }

            self.tries += 1;
            if self.tries >= MAX_PROBE {
                self.tries = 0;
                let before = filled.fillable().len();
                filled.refine_fillable(desired, config.collision_radius);
                if filled.fillable().len() == before {
                    return None;
                }
            }
        }
    }

    fn candidate_list(&self, filled: &FilledPattern, desired: &DesiredPattern) -> Vec<(i32, i32)> {
        match filled.config().method {
            FillingMethod::ConsecutiveRadial | FillingMethod::RandomRadial => filled.fillable().to_vec(),
            FillingMethod::ConsecutivePerimeter | FillingMethod::RandomPerimeter => desired
                .perimeter()
                .iter()
                .filter(|&&p| filled.is_collision_free(desired, p, filled.config().collision_radius))
                .copied()
                .collect(),
        }
    }
}

impl Default for StartingPointPolicy {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use vs_config::FillingConfig;
    use vs_geometry::StencilCache;

    fn uniform_pattern(n: usize) -> DesiredPattern {
        let shape = vec![vec![true; n]; n];
        let fx = vec![vec![1.0; n]; n];
        let fy = vec![vec![0.0; n]; n];
        DesiredPattern::new(shape, fx, fy).unwrap()
    }

    #[test]
    fn consecutive_radial_returns_collision_free_seeds() {
        let desired = uniform_pattern(6);
        let config = FillingConfig::new(FillingMethod::ConsecutiveRadial, 1, 0.7, 2, 1, 2, 0);
        let mut filled = FilledPattern::new(&desired, config, Arc::new(StencilCache::new()));
        filled.search_all_fillable(&desired, config.collision_radius);
        let mut policy = StartingPointPolicy::new();
        let seed = policy.next_seed(&mut filled, &desired).unwrap();
        assert!(filled.is_collision_free(&desired, seed, config.collision_radius));
    }

    #[test]
    fn exhausted_fillable_set_yields_none() {
        let desired = uniform_pattern(2);
        let config = FillingConfig::new(FillingMethod::ConsecutiveRadial, 1, 0.7, 1, 1, 1, 0);
        let mut filled = FilledPattern::new(&desired, config, Arc::new(StencilCache::new()));
        // every interior cell filled: no cell can pass a collision_radius=1 check anymore
        for i in 0..2i32 {
            for j in 0..2i32 {
                filled.fill_cells(&[(i, j)], (1.0, 0.0));
            }
        }
        filled.search_all_fillable(&desired, config.collision_radius);
        let mut policy = StartingPointPolicy::new();
        assert_eq!(policy.next_seed(&mut filled, &desired), None);
    }

    #[test]
    fn perimeter_method_only_returns_edge_cells() {
        let desired = uniform_pattern(7);
        let config = FillingConfig::new(FillingMethod::ConsecutivePerimeter, 1, 0.7, 2, 1, 1, 0);
        let mut filled = FilledPattern::new(&desired, config, Arc::new(StencilCache::new()));
        filled.search_all_fillable(&desired, config.collision_radius);
        let mut policy = StartingPointPolicy::new();
        let seed = policy.next_seed(&mut filled, &desired).unwrap();
        assert!(desired.perimeter().contains(&seed));
    }
}
