//! Two-sided path extension from a seed point.

use vs_config::FillingConfig;
use vs_geometry::segment_fill;
use vs_pattern::{DesiredPattern, FilledPattern, Path};

fn round_point(p: (f64, f64)) -> (i32, i32) {
    (p.0.round() as i32, p.1.round() as i32)
}

fn dot(a: (f64, f64), b: (f64, f64)) -> f64 {
    a.0 * b.0 + a.1 * b.1
}

/// Attempt one forward probe of length `length` from `pos`, mutating `path`
/// and `pos`/`prev_step` on success.
///
/// Returns `false` (leaving everything unchanged) when the probed cell is not
/// collision-free.
fn try_step(
    path: &mut Path,
    pos: &mut (f64, f64),
    prev_step: &mut (f64, f64),
    length: f64,
    filled: &mut FilledPattern,
    desired: &DesiredPattern,
    config: &FillingConfig,
) -> bool {
    let mut base = desired.preferred_dir_real(*pos, length);
    if dot(base, *prev_step) < 0.0 {
        base = (-base.0, -base.1);
    }

    let mut next_pos = (pos.0 + base.0, pos.1 + base.1);
    let mut q = round_point(next_pos);
    let repulsion = filled.repulsion_vector(q, config.print_radius, config.repulsion);
    next_pos = (next_pos.0 - repulsion.0, next_pos.1 - repulsion.1);
    q = round_point(next_pos);

    if !filled.is_collision_free(desired, q, config.collision_radius) {
        return false;
    }

    let p_prev = round_point(*pos);
    let cells = segment_fill(p_prev, q, config.print_radius);
    let step = ((q.0 - p_prev.0) as f64, (q.1 - p_prev.1) as f64);
    filled.fill_cells(&cells, step);
    path.push(q);
    *prev_step = step;
    *pos = next_pos;
    true
}

/// Grow a one-sided path from `seed` along `seed_step`, shrinking the probe
/// length from `config.step_length` down to `config.print_radius` whenever a
/// step fails, restarting at the longer length after every success.
///
/// If not a single step ever succeeds, the seed's print disc is filled as a
/// lone blob so it is not re-selected by the starting-point policy.
pub fn grow_from(
    seed: (i32, i32),
    seed_step: (f64, f64),
    filled: &mut FilledPattern,
    desired: &DesiredPattern,
    config: &FillingConfig,
) -> Path {
    let mut path = Path::seeded(seed);
    let mut pos = (seed.0 as f64, seed.1 as f64);
    let mut prev_step = seed_step;
    let mut any_success = false;

    for length in (config.print_radius..=config.step_length).rev() {
        while try_step(&mut path, &mut pos, &mut prev_step, length as f64, filled, desired, config) {
            any_success = true;
        }
    }

    if !any_success {
        filled.fill_disc_at(seed, config.print_radius, seed_step);
    }
    path
}

/// Grow both senses from `seed` and concatenate them into one path, then
/// apply the half-disc end-cap at each terminal vertex.
pub fn two_sided_grow(seed: (i32, i32), filled: &mut FilledPattern, desired: &DesiredPattern) -> Path {
    let config = *filled.config();
    let v0 = desired.preferred_dir_int(seed, config.step_length as f64);
    let v0_real = (v0.0 as f64, v0.1 as f64);

    let forward = grow_from(seed, v0_real, filled, desired, &config);
    let backward = grow_from(seed, (-v0_real.0, -v0_real.1), filled, desired, &config);
    let path = Path::two_sided(backward, forward);

    apply_end_caps(&path, filled, &config);
    path
}

fn apply_end_caps(path: &Path, filled: &mut FilledPattern, config: &FillingConfig) {
    if path.len() < 2 {
        return;
    }
    let cells = path.cells();
    let last = cells[cells.len() - 1];
    let penultimate = cells[cells.len() - 2];
    let end_direction = (last.0 - penultimate.0, last.1 - penultimate.1);
    filled.fill_half_disc_at(last, config.print_radius, end_direction, (end_direction.0 as f64, end_direction.1 as f64));

    let first = cells[0];
    let second = cells[1];
    let start_direction = (first.0 - second.0, first.1 - second.1);
    filled.fill_half_disc_at(first, config.print_radius, start_direction, (start_direction.0 as f64, start_direction.1 as f64));
}
