//! Lattice stencils and segment rasterisation shared by the fill engine.
//!
//! Contract:
//! - All offsets are relative to an implicit origin `(0, 0)`; callers translate
//!   them onto a grid position themselves.
//! - `disc_offsets` and `ring_offsets` are pure functions of the radius and are
//!   memoised per-radius by [`StencilCache`] so an optimiser sweep that revisits
//!   the same collision/print radius many times does not re-derive the same
//!   offset list.
//! - Integer grid coordinates are `i32`; real positions are `f64`.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

pub type Offset = (i32, i32);

/// All lattice offsets `(di, dj)` with `di^2 + dj^2 <= r^2`.
pub fn disc_offsets(r: u32) -> Vec<Offset> {
    let r = r as i32;
    let r2 = r * r;
    let mut offsets = Vec::new();
    for di in -r..=r {
        for dj in -r..=r {
            if di * di + dj * dj <= r2 {
                offsets.push((di, dj));
            }
        }
    }
    offsets
}

/// All lattice offsets `(di, dj)` with `ceil(sqrt(di^2 + dj^2)) = r`.
///
/// `r = 0` yields the single offset `(0, 0)`.
pub fn ring_offsets(r: u32) -> Vec<Offset> {
    if r == 0 {
        return vec![(0, 0)];
    }
    let ri = r as i32;
    let r2 = (r * r) as f64;
    let prev2 = ((r - 1) * (r - 1)) as f64;
    let mut offsets = Vec::new();
    for di in -ri..=ri {
        for dj in -ri..=ri {
            let d2 = (di * di + dj * dj) as f64;
            // ceil(sqrt(d2)) == r  <=>  prev2 < d2 <= r2, for integer d2.
            if d2 > prev2 && d2 <= r2 {
                offsets.push((di, dj));
            }
        }
    }
    offsets
}

fn is_left_of_edge(point: (i32, i32), edge_a: (i32, i32), edge_b: (i32, i32)) -> bool {
    let cross = (edge_b.0 - edge_a.0) * (point.1 - edge_a.1) - (point.0 - edge_a.0) * (edge_b.1 - edge_a.1);
    cross > 0
}

fn in_rectangle(point: (i32, i32), corners: &[(i32, i32); 4]) -> bool {
    is_left_of_edge(point, corners[0], corners[1])
        && is_left_of_edge(point, corners[1], corners[2])
        && is_left_of_edge(point, corners[2], corners[3])
        && is_left_of_edge(point, corners[3], corners[0])
}

/// Lattice cells inside the rectangle of half-width `r + 1` centred on segment `p -> q`.
///
/// Degenerate `p == q` falls back to `disc_offsets(r)` translated by `p`.
pub fn segment_fill(p: (i32, i32), q: (i32, i32), r: u32) -> Vec<Offset> {
    let connecting = (q.0 - p.0, q.1 - p.1);
    if connecting == (0, 0) {
        return disc_offsets(r).into_iter().map(|(di, dj)| (p.0 + di, p.1 + dj)).collect();
    }
    let norm = ((connecting.0 * connecting.0 + connecting.1 * connecting.1) as f64).sqrt();
    let half_width = (r + 1) as f64;
    let perp = (
        (connecting.1 as f64 / norm * half_width).trunc() as i32,
        (-connecting.0 as f64 / norm * half_width).trunc() as i32,
    );

    let corners = [
        (p.0 + perp.0, p.1 + perp.1),
        (q.0 + perp.0, q.1 + perp.1),
        (q.0 - perp.0, q.1 - perp.1),
        (p.0 - perp.0, p.1 - perp.1),
    ];

    let x_min = corners.iter().map(|c| c.0).min().unwrap();
    let x_max = corners.iter().map(|c| c.0).max().unwrap();
    let y_min = corners.iter().map(|c| c.1).min().unwrap();
    let y_max = corners.iter().map(|c| c.1).max().unwrap();

    let mut cells = Vec::new();
    for x in x_min..=x_max {
        // Descend from the top edge to the first in-rectangle row for this column.
        // Monotonic: never re-ascends once past the rectangle's top.
        let mut y = y_max;
        while !in_rectangle((x, y), &corners) && y > y_min {
            y -= 1;
        }
        while in_rectangle((x, y), &corners) && y >= y_min {
            cells.push((x, y));
            y -= 1;
        }
    }
    cells
}

/// Per-radius memoisation of [`disc_offsets`] and [`ring_offsets`].
///
/// Pure functions of the radius; shared immutably (`Arc<[Offset]>`) across an
/// optimiser sweep that may request the same radius thousands of times.
#[derive(Default)]
pub struct StencilCache {
    discs: Mutex<HashMap<u32, Arc<[Offset]>>>,
    rings: Mutex<HashMap<u32, Arc<[Offset]>>>,
}

impl StencilCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn disc(&self, r: u32) -> Arc<[Offset]> {
        let mut cache = self.discs.lock().expect("stencil cache poisoned");
        cache
            .entry(r)
            .or_insert_with(|| disc_offsets(r).into())
            .clone()
    }

    pub fn ring(&self, r: u32) -> Arc<[Offset]> {
        let mut cache = self.rings.lock().expect("stencil cache poisoned");
        cache
            .entry(r)
            .or_insert_with(|| ring_offsets(r).into())
            .clone()
    }
}
