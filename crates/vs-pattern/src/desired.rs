//! The immutable shape mask and preferred-direction field the fill is grown against.

use crate::error::DataError;

/// Binary shape mask plus a bilinearly-interpolated preferred-direction field.
///
/// Both `field_x`/`field_y` are defined wherever `shape` holds; values outside
/// the shape are never read through [`DesiredPattern::preferred_dir_real`] for
/// a position that [`DesiredPattern::contains`] rejects, but are still sampled
/// as interpolation neighbours for positions on the interior/exterior boundary.
#[derive(Debug, Clone)]
pub struct DesiredPattern {
    width: usize,
    height: usize,
    shape: Vec<bool>,
    field_x: Vec<f64>,
    field_y: Vec<f64>,
    perimeter: Vec<(i32, i32)>,
}

impl DesiredPattern {
    /// Build from three equal-dimension row-major matrices (`shape[i][j]`
    /// becomes `shape_rows[i][j]`, `i` the outer/x index, `j` the inner/y index).
    pub fn new(
        shape_rows: Vec<Vec<bool>>,
        field_x_rows: Vec<Vec<f64>>,
        field_y_rows: Vec<Vec<f64>>,
    ) -> Result<Self, DataError> {
        let width = shape_rows.len();
        let height = width.checked_sub(1).map(|_| shape_rows[0].len()).unwrap_or(0);

        let shape_dims = (width, height);
        let fx_dims = (field_x_rows.len(), field_x_rows.first().map_or(0, Vec::len));
        let fy_dims = (field_y_rows.len(), field_y_rows.first().map_or(0, Vec::len));
        if fx_dims != shape_dims {
            return Err(DataError::DimensionMismatch {
                expected: shape_dims,
                found: fx_dims,
                file: "field_x".to_string(),
            });
        }
        if fy_dims != shape_dims {
            return Err(DataError::DimensionMismatch {
                expected: shape_dims,
                found: fy_dims,
                file: "field_y".to_string(),
            });
        }

        let mut shape = Vec::with_capacity(width * height);
        let mut field_x = Vec::with_capacity(width * height);
        let mut field_y = Vec::with_capacity(width * height);
        for i in 0..width {
            if shape_rows[i].len() != height {
                return Err(DataError::DimensionMismatch {
                    expected: (width, height),
                    found: (width, shape_rows[i].len()),
                    file: "shape".to_string(),
                });
            }
            if field_x_rows[i].len() != height {
                return Err(DataError::DimensionMismatch {
                    expected: (width, height),
                    found: (width, field_x_rows[i].len()),
                    file: "field_x".to_string(),
                });
            }
            if field_y_rows[i].len() != height {
                return Err(DataError::DimensionMismatch {
                    expected: (width, height),
                    found: (width, field_y_rows[i].len()),
                    file: "field_y".to_string(),
                });
            }
            shape.extend_from_slice(&shape_rows[i]);
            field_x.extend_from_slice(&field_x_rows[i]);
            field_y.extend_from_slice(&field_y_rows[i]);
        }

        if !shape.iter().any(|&interior| interior) {
            return Err(DataError::EmptyShape);
        }

        let mut pattern = Self {
            width,
            height,
            shape,
            field_x,
            field_y,
            perimeter: Vec::new(),
        };
        pattern.perimeter = pattern.sorted_perimeter();
        Ok(pattern)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn perimeter(&self) -> &[(i32, i32)] {
        &self.perimeter
    }

    fn idx(&self, i: i32, j: i32) -> Option<usize> {
        if i < 0 || j < 0 || i as usize >= self.width || j as usize >= self.height {
            None
        } else {
            Some(i as usize * self.height + j as usize)
        }
    }

    pub fn in_bounds(&self, i: i32, j: i32) -> bool {
        self.idx(i, j).is_some()
    }

    /// All `(i, j)` with `shape[i][j] == true`.
    pub fn interior_cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        (0..self.width as i32)
            .flat_map(move |i| (0..self.height as i32).map(move |j| (i, j)))
            .filter(move |&(i, j)| self.shape_at(i, j))
    }

    /// `shape[floor(x)][floor(y)] == true`.
    pub fn contains(&self, p: (f64, f64)) -> bool {
        self.shape_at(p.0.floor() as i32, p.1.floor() as i32)
    }

    pub fn shape_at(&self, i: i32, j: i32) -> bool {
        self.idx(i, j).map(|k| self.shape[k]).unwrap_or(false)
    }

    /// Raw (non-interpolated, non-renormalised) field components at `(i, j)`,
    /// `(0.0, 0.0)` out of bounds.
    pub fn field_at(&self, i: i32, j: i32) -> (f64, f64) {
        match self.idx(i, j) {
            Some(k) => (self.field_x[k], self.field_y[k]),
            None => (0.0, 0.0),
        }
    }

    /// `(round(L * field_x[p]), round(L * field_y[p]))`.
    pub fn preferred_dir_int(&self, p: (i32, i32), length: f64) -> (i32, i32) {
        let (fx, fy) = self.field_at(p.0, p.1);
        ((length * fx).round() as i32, (length * fy).round() as i32)
    }

    /// Bilinear interpolation of the preferred direction at a real position,
    /// renormalised to `length`; falls back to `(i-1, j)` on a zero-magnitude
    /// interpolation result (singularity).
    pub fn preferred_dir_real(&self, p: (f64, f64), length: f64) -> (f64, f64) {
        let x_frac = p.0 - p.0.floor();
        let y_frac = p.1 - p.1.floor();
        let i0 = p.0.floor() as i32;
        let j0 = p.1.floor() as i32;
        let i1 = (i0 + 1).min(self.width as i32 - 1);
        let j1 = (j0 + 1).min(self.height as i32 - 1);

        let (x00, y00) = self.field_at(i0, j0);
        let (x10, y10) = self.field_at(i1, j0);
        let (x11, y11) = self.field_at(i1, j1);
        let (x01, y01) = self.field_at(i0, j1);

        let field_x = x_frac * y_frac * x00
            + (1.0 - x_frac) * y_frac * x10
            + (1.0 - x_frac) * (1.0 - y_frac) * x11
            + x_frac * (1.0 - y_frac) * x01;
        let field_y = y_frac * x_frac * y00
            + (1.0 - x_frac) * y_frac * y10
            + (1.0 - x_frac) * (1.0 - y_frac) * y11
            + x_frac * (1.0 - y_frac) * y01;

        if field_x == 0.0 && field_y == 0.0 {
            return self.field_at(i0 - 1, j0);
        }

        let norm = (field_x * field_x + field_y * field_y).sqrt();
        (length * field_x / norm, length * field_y / norm)
    }

    /// Interior cells with at least one non-interior 8-neighbour, ordered by
    /// nearest-neighbour chaining starting from the first one found.
    pub fn sorted_perimeter(&self) -> Vec<(i32, i32)> {
        const NEIGHBOURS: [(i32, i32); 8] = [
            (-1, 0),
            (-1, 1),
            (0, 1),
            (1, 1),
            (1, 0),
            (1, -1),
            (0, -1),
            (-1, -1),
        ];

        let mut unsorted = Vec::new();
        for i in 0..self.width as i32 {
            for j in 0..self.height as i32 {
                if !self.shape_at(i, j) {
                    continue;
                }
                let on_edge = NEIGHBOURS
                    .iter()
                    .any(|&(di, dj)| !self.shape_at(i + di, j + dj));
                if on_edge {
                    unsorted.push((i, j));
                }
            }
        }

        let mut sorted = Vec::with_capacity(unsorted.len());
        if unsorted.is_empty() {
            return sorted;
        }
        let mut current = unsorted.swap_remove(0);
        sorted.push(current);
        while !unsorted.is_empty() {
            let (nearest_idx, _) = unsorted
                .iter()
                .enumerate()
                .map(|(idx, &cell)| (idx, euclidean(current, cell)))
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .expect("unsorted is non-empty");
            current = unsorted.swap_remove(nearest_idx);
            sorted.push(current);
        }
        sorted
    }
}

fn euclidean(a: (i32, i32), b: (i32, i32)) -> f64 {
    let dx = (a.0 - b.0) as f64;
    let dy = (a.1 - b.1) as f64;
    (dx * dx + dy * dy).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(width: usize, height: usize, fx: f64, fy: f64) -> DesiredPattern {
        let shape = vec![vec![true; height]; width];
        let field_x = vec![vec![fx; height]; width];
        let field_y = vec![vec![fy; height]; width];
        DesiredPattern::new(shape, field_x, field_y).unwrap()
    }

    #[test]
    fn dimension_mismatch_is_rejected() {
        let shape = vec![vec![true; 3]; 3];
        let field_x = vec![vec![1.0; 2]; 3];
        let field_y = vec![vec![1.0; 3]; 3];
        let err = DesiredPattern::new(shape, field_x, field_y).unwrap_err();
        assert!(matches!(err, DataError::DimensionMismatch { .. }));
    }

    #[test]
    fn empty_shape_is_rejected() {
        let shape = vec![vec![false; 3]; 3];
        let field_x = vec![vec![0.0; 3]; 3];
        let field_y = vec![vec![0.0; 3]; 3];
        let err = DesiredPattern::new(shape, field_x, field_y).unwrap_err();
        assert!(matches!(err, DataError::EmptyShape));
    }

    #[test]
    fn uniform_field_interpolates_to_itself() {
        let pattern = uniform(5, 5, 1.0, 0.0);
        let (fx, fy) = pattern.preferred_dir_real((2.5, 2.5), 1.0);
        assert!((fx - 1.0).abs() < 1e-9);
        assert!(fy.abs() < 1e-9);
    }

    #[test]
    fn preferred_dir_real_renormalises_to_requested_length() {
        let pattern = uniform(5, 5, 1.0, 0.0);
        let (fx, fy) = pattern.preferred_dir_real((2.1, 2.9), 3.0);
        let norm = (fx * fx + fy * fy).sqrt();
        assert!((norm - 3.0).abs() < 1e-9);
    }

    #[test]
    fn contains_checks_the_floored_cell() {
        let pattern = uniform(3, 3, 1.0, 0.0);
        assert!(pattern.contains((1.9, 1.9)));
        assert!(!pattern.contains((5.0, 5.0)));
    }

    #[test]
    fn perimeter_is_nonempty_for_a_square() {
        let pattern = uniform(5, 5, 1.0, 0.0);
        // every cell of a fully-filled 5x5 shape touches the boundary except a 3x3 interior core
        assert_eq!(pattern.perimeter().len(), 25 - 9);
    }

    #[test]
    fn singularity_falls_back_to_left_neighbour() {
        // zero field everywhere except one non-zero column to the left of the sampled cell
        let mut field_x = vec![vec![0.0; 3]; 3];
        field_x[1][1] = 5.0;
        let shape = vec![vec![true; 3]; 3];
        let field_y = vec![vec![0.0; 3]; 3];
        let pattern = DesiredPattern::new(shape, field_x, field_y).unwrap();
        let (fx, fy) = pattern.preferred_dir_real((2.0, 1.0), 2.0);
        assert_eq!((fx, fy), (5.0, 0.0));
    }
}
