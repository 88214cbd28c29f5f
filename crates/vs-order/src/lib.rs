//! Greedy nearest-neighbour tour over path endpoints, minimising idle travel.

use vs_pattern::Path;

/// One traversal direction of a path in the fill's path list: either as
/// grown (`reversed = false`) or walked tail-to-head (`reversed = true`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct IndexedPath {
    index: usize,
    reversed: bool,
    start: (i32, i32),
    end: (i32, i32),
}

fn euclidean(a: (i32, i32), b: (i32, i32)) -> f64 {
    let dx = (a.0 - b.0) as f64;
    let dy = (a.1 - b.1) as f64;
    (dx * dx + dy * dy).sqrt()
}

fn distance_between(from: &IndexedPath, to: &IndexedPath) -> f64 {
    euclidean(from.end, to.start)
}

fn index_paths(paths: &[Path]) -> Vec<IndexedPath> {
    let mut indexed = Vec::with_capacity(paths.len() * 2);
    for (index, path) in paths.iter().enumerate() {
        indexed.push(IndexedPath {
            index,
            reversed: false,
            start: path.first(),
            end: path.last(),
        });
        indexed.push(IndexedPath {
            index,
            reversed: true,
            start: path.last(),
            end: path.first(),
        });
    }
    indexed
}

fn sort_from(mut remaining: Vec<IndexedPath>, start: (i32, i32)) -> Vec<IndexedPath> {
    let mut pen = IndexedPath {
        index: usize::MAX,
        reversed: false,
        start,
        end: start,
    };
    let mut sorted = Vec::with_capacity(remaining.len() / 2);
    while !remaining.is_empty() {
        let (best_idx, _) = remaining
            .iter()
            .enumerate()
            .map(|(i, candidate)| (i, distance_between(&pen, candidate)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .expect("remaining is non-empty");
        let chosen = remaining[best_idx];
        remaining.retain(|candidate| candidate.index != chosen.index);
        pen = chosen;
        sorted.push(chosen);
    }
    sorted
}

fn idle_travel(sorted: &[IndexedPath]) -> f64 {
    sorted.windows(2).map(|w| distance_between(&w[0], &w[1])).sum()
}

/// Bounding-rectangle corners plus `steps` evenly-spaced points along each
/// edge, used as candidate starting pen positions.
fn candidate_starting_points(width: i32, height: i32, steps: u32) -> Vec<(i32, i32)> {
    let mut points = vec![(0, 0), (width, 0), (width, height), (0, height)];
    if steps == 0 {
        return points;
    }
    let x_step = width as f64 / steps as f64;
    let y_step = height as f64 / steps as f64;
    for step in 0..steps as i32 {
        points.push(((x_step * step as f64) as i32, 0));
        points.push((width, (y_step * step as f64) as i32));
        points.push((width - (x_step * step as f64) as i32, height));
        points.push((0, height - (y_step * step as f64) as i32));
    }
    points
}

/// Greedy nearest-neighbour tour of a fill's paths, trying several starting
/// pen positions and keeping the one with the least idle travel.
pub struct PathOrderer;

/// Sorted output: the reordered paths (each materialised in its traversal
/// direction) and the total idle travel of the winning trial.
pub struct Ordering {
    pub paths: Vec<Path>,
    pub idle_travel: f64,
}

impl PathOrderer {
    /// `trial_steps` is the `steps` passed to [`candidate_starting_points`]
    /// for each of the bounding rectangle's four edges.
    pub fn order(paths: &[Path], width: i32, height: i32, trial_steps: u32) -> Ordering {
        let indexed = index_paths(paths);
        if indexed.is_empty() {
            return Ordering {
                paths: Vec::new(),
                idle_travel: 0.0,
            };
        }

        let mut best: Option<(Vec<IndexedPath>, f64)> = None;
        for start in candidate_starting_points(width, height, trial_steps) {
            let sorted = sort_from(indexed.clone(), start);
            let travel = idle_travel(&sorted);
            if best.as_ref().map_or(true, |(_, best_travel)| travel < *best_travel) {
                best = Some((sorted, travel));
            }
        }
        let (sorted, idle_travel) = best.expect("at least one trial was evaluated");
        tracing::debug!(paths = sorted.len(), idle_travel, "chose ordering with least idle travel");

        let ordered_paths = sorted
            .into_iter()
            .map(|entry| {
                let path = &paths[entry.index];
                if entry.reversed {
                    path.reversed()
                } else {
                    path.clone()
                }
            })
            .collect();

        Ordering {
            paths: ordered_paths,
            idle_travel,
        }
    }
}
