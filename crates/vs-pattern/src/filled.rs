//! Mutable coverage/direction state for a single in-progress fill.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use vs_config::FillingConfig;
use vs_geometry::{Offset, StencilCache};

use crate::desired::DesiredPattern;
use crate::path::Path;

/// Coverage-count and realised-direction grids, plus the growing path list,
/// for one candidate [`FillingConfig`] applied to a [`DesiredPattern`].
///
/// Owns its PRNG so that running the same `(DesiredPattern, FillingConfig)`
/// pair on two different worker threads of an optimiser sweep produces
/// byte-identical fills (see the crate's determinism invariant).
pub struct FilledPattern {
    width: usize,
    height: usize,
    filled_count: Vec<u32>,
    realised_x: Vec<f64>,
    realised_y: Vec<f64>,
    paths: Vec<Path>,
    fillable: Vec<(i32, i32)>,
    stencils: Arc<StencilCache>,
    config: FillingConfig,
    rng: StdRng,
}

impl FilledPattern {
    pub fn new(desired: &DesiredPattern, config: FillingConfig, stencils: Arc<StencilCache>) -> Self {
        let width = desired.width();
        let height = desired.height();
        Self {
            width,
            height,
            filled_count: vec![0; width * height],
            realised_x: vec![0.0; width * height],
            realised_y: vec![0.0; width * height],
            paths: Vec::new(),
            fillable: Vec::new(),
            stencils,
            rng: StdRng::seed_from_u64(config.seed as u64),
            config,
        }
    }

    pub fn config(&self) -> &FillingConfig {
        &self.config
    }

    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    pub fn fillable(&self) -> &[(i32, i32)] {
        &self.fillable
    }

    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    pub fn filled_count_at(&self, p: (i32, i32)) -> u32 {
        self.idx(p).map(|k| self.filled_count[k]).unwrap_or(0)
    }

    fn idx(&self, p: (i32, i32)) -> Option<usize> {
        if p.0 < 0 || p.1 < 0 || p.0 as usize >= self.width || p.1 as usize >= self.height {
            None
        } else {
            Some(p.0 as usize * self.height + p.1 as usize)
        }
    }

    fn in_bounds(&self, p: (i32, i32)) -> bool {
        self.idx(p).is_some()
    }

    /// `true` iff `p` is interior and every in-bounds cell of `ring(collision_radius) + p`
    /// is still unfilled.
    pub fn is_collision_free(&self, desired: &DesiredPattern, p: (i32, i32), collision_radius: u32) -> bool {
        if !desired.shape_at(p.0, p.1) {
            return false;
        }
        let ring = self.stencils.ring(collision_radius);
        ring.iter().all(|&(di, dj)| {
            let q = (p.0 + di, p.1 + dj);
            !self.in_bounds(q) || self.filled_count_at(q) == 0
        })
    }

    /// `-rho * (sum of in-bounds, unfilled offsets of disc(print_radius) + p) / |that set|`.
    ///
    /// `(0, 0)` when the disc around `p` has no unfilled cell at all.
    pub fn repulsion_vector(&self, p: (i32, i32), print_radius: u32, rho: f64) -> (f64, f64) {
        let disc = self.stencils.disc(print_radius);
        let empty: Vec<Offset> = disc
            .iter()
            .copied()
            .filter(|&(di, dj)| {
                let q = (p.0 + di, p.1 + dj);
                self.in_bounds(q) && self.filled_count_at(q) == 0
            })
            .collect();
        if empty.is_empty() {
            return (0.0, 0.0);
        }
        let sum = empty
            .iter()
            .fold((0i64, 0i64), |acc, &(di, dj)| (acc.0 + di as i64, acc.1 + dj as i64));
        let count = empty.len() as f64;
        (-rho * sum.0 as f64 / count, -rho * sum.1 as f64 / count)
    }

    /// Increment `filled_count` and accumulate the canonicalised unit of `step`
    /// into `realised_*` for every in-bounds cell of `cells`.
    pub fn fill_cells(&mut self, cells: &[(i32, i32)], step: (f64, f64)) {
        let norm = (step.0 * step.0 + step.1 * step.1).sqrt();
        let (ux, uy) = if norm == 0.0 {
            (0.0, 0.0)
        } else if step.0 > 0.0 || (step.0 == 0.0 && step.1 > 0.0) {
            (step.0 / norm, step.1 / norm)
        } else {
            (-step.0 / norm, -step.1 / norm)
        };
        for &cell in cells {
            if let Some(k) = self.idx(cell) {
                self.filled_count[k] += 1;
                self.realised_x[k] += ux;
                self.realised_y[k] += uy;
            }
        }
    }

    /// Fill every in-bounds cell of `disc(print_radius) + p` with canonicalised `step`.
    pub fn fill_disc_at(&mut self, p: (i32, i32), print_radius: u32, step: (f64, f64)) {
        let disc = self.stencils.disc(print_radius);
        let cells: Vec<(i32, i32)> = disc.iter().map(|&(di, dj)| (p.0 + di, p.1 + dj)).collect();
        self.fill_cells(&cells, step);
    }

    /// Fill the half of `disc(print_radius) + p` whose offsets have a
    /// non-negative dot product with `direction` (the end-cap applied at a
    /// path's terminal vertex, oriented away from its penultimate vertex).
    ///
    /// A zero `direction` (a one-vertex path) fills nothing.
    pub fn fill_half_disc_at(&mut self, p: (i32, i32), print_radius: u32, direction: (i32, i32), step: (f64, f64)) {
        if direction == (0, 0) {
            return;
        }
        let disc = self.stencils.disc(print_radius);
        let cells: Vec<(i32, i32)> = disc
            .iter()
            .filter(|&&(di, dj)| di * direction.0 + dj * direction.1 >= 0)
            .map(|&(di, dj)| (p.0 + di, p.1 + dj))
            .collect();
        self.fill_cells(&cells, step);
    }

    pub fn push_path(&mut self, path: Path) {
        tracing::trace!(len = path.len(), start = ?path.first(), end = ?path.last(), "committed path");
        self.paths.push(path);
    }

    /// Recompute `fillable` from the whole interior.
    pub fn search_all_fillable(&mut self, desired: &DesiredPattern, collision_radius: u32) {
        let mut fillable = Vec::new();
        for i in 0..self.width as i32 {
            for j in 0..self.height as i32 {
                if self.is_collision_free(desired, (i, j), collision_radius) {
                    fillable.push((i, j));
                }
            }
        }
        self.fillable = fillable;
    }

    /// Recompute `fillable` by re-filtering the previous candidate list only.
    pub fn refine_fillable(&mut self, desired: &DesiredPattern, collision_radius: u32) {
        self.fillable
            .retain(|&p| self.is_collision_free(desired, p, collision_radius));
    }

    /// `filled_count` as a row-major `W x H` matrix, `row[i][j]`.
    pub fn export_coverage(&self) -> Vec<Vec<u32>> {
        (0..self.width)
            .map(|i| (0..self.height).map(|j| self.filled_count[i * self.height + j]).collect())
            .collect()
    }

    pub fn realised_at(&self, p: (i32, i32)) -> (f64, f64) {
        self.idx(p).map(|k| (self.realised_x[k], self.realised_y[k])).unwrap_or((0.0, 0.0))
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }
}
