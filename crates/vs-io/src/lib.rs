//! CSV/config loading and writing at the shape/field/paths/config boundary.
//!
//! Everything in this crate is glue: it never guesses a missing or malformed
//! value, it surfaces [`vs_pattern::DataError`] / [`vs_config::ConfigError`]
//! (or a plain [`std::io::Error`] for a missing file) instead.

use std::fs;
use std::path::Path;

use vs_config::{ConfigError, FillingConfig};
use vs_pattern::{DataError, DesiredPattern, FilledPattern};
use vs_pattern::Path as FillPath;

fn read_csv_bool(path: &Path) -> Result<Vec<Vec<bool>>, DataError> {
    let contents = fs::read_to_string(path)?;
    let file = path.display().to_string();
    parse_rows(&contents, &file, |cell, row, col| {
        cell.trim()
            .parse::<i32>()
            .map(|v| v != 0)
            .map_err(|_| DataError::ParseCell { file: file.clone(), row, col })
    })
}

fn read_csv_f64(path: &Path) -> Result<Vec<Vec<f64>>, DataError> {
    let contents = fs::read_to_string(path)?;
    let file = path.display().to_string();
    parse_rows(&contents, &file, |cell, row, col| {
        cell.trim()
            .parse::<f64>()
            .map_err(|_| DataError::ParseCell { file: file.clone(), row, col })
    })
}

fn parse_rows<T>(
    contents: &str,
    file: &str,
    parse_cell: impl Fn(&str, usize, usize) -> Result<T, DataError>,
) -> Result<Vec<Vec<T>>, DataError> {
    let mut rows = Vec::new();
    let mut width = None;
    for (row, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let cells: Result<Vec<T>, DataError> = line
            .split(',')
            .enumerate()
            .map(|(col, cell)| parse_cell(cell, row, col))
            .collect();
        let cells = cells?;
        match width {
            Some(w) if w != cells.len() => {
                return Err(DataError::RaggedRow { file: file.to_string(), row });
            }
            None => width = Some(cells.len()),
            _ => {}
        }
        rows.push(cells);
    }
    Ok(rows)
}

/// Reads `shape.csv`, `xField.csv`, `yField.csv` from `dir` and validates
/// them into a [`DesiredPattern`].
pub fn load_desired_pattern(dir: &Path) -> Result<DesiredPattern, DataError> {
    let shape = read_csv_bool(&dir.join("shape.csv"))?;
    let field_x = read_csv_f64(&dir.join("xField.csv"))?;
    let field_y = read_csv_f64(&dir.join("yField.csv"))?;
    tracing::debug!(dir = %dir.display(), "loaded desired pattern");
    DesiredPattern::new(shape, field_x, field_y).map_err(|err| name_dimension_mismatch(err, dir))
}

/// [`DesiredPattern::new`] tags a `DimensionMismatch` with the generic
/// `shape`/`field_x`/`field_y` matrix it came from; substitute the actual
/// file name now that we know which directory it was loaded from.
fn name_dimension_mismatch(err: DataError, dir: &Path) -> DataError {
    match err {
        DataError::DimensionMismatch { expected, found, file } => {
            let name = match file.as_str() {
                "shape" => "shape.csv",
                "field_x" => "xField.csv",
                "field_y" => "yField.csv",
                other => other,
            };
            DataError::DimensionMismatch {
                expected,
                found,
                file: dir.join(name).display().to_string(),
            }
        }
        other => other,
    }
}

/// Reads a `config.txt`-formatted file into a [`FillingConfig`].
pub fn load_config(path: &Path) -> Result<FillingConfig, ConfigError> {
    FillingConfig::load_from(path)
}

/// Writes `filled_count` as a `W x H` comma-separated integer matrix.
pub fn write_coverage(path: &Path, pattern: &FilledPattern) -> std::io::Result<()> {
    let coverage = pattern.export_coverage();
    let body = rows_to_csv(&coverage, |v| v.to_string());
    fs::write(path, body)?;
    tracing::debug!(path = %path.display(), "wrote coverage grid");
    Ok(())
}

/// Writes `x_best_paths.csv` and `y_best_paths.csv` into `dir`, one path per
/// row, in the order given (reversal, if any, must already be applied to
/// each [`FillPath`]).
pub fn write_paths(dir: &Path, paths: &[FillPath]) -> std::io::Result<()> {
    let x_body = paths
        .iter()
        .map(|path| path.cells().iter().map(|c| c.0.to_string()).collect::<Vec<_>>().join(","))
        .collect::<Vec<_>>()
        .join("\n");
    let y_body = paths
        .iter()
        .map(|path| path.cells().iter().map(|c| c.1.to_string()).collect::<Vec<_>>().join(","))
        .collect::<Vec<_>>()
        .join("\n");
    fs::write(dir.join("x_best_paths.csv"), x_body)?;
    fs::write(dir.join("y_best_paths.csv"), y_body)?;
    tracing::debug!(dir = %dir.display(), paths = paths.len(), "wrote best paths");
    Ok(())
}

/// Writes `best_config.txt` in the same format [`load_config`] accepts.
pub fn write_config(path: &Path, config: &FillingConfig) -> std::io::Result<()> {
    fs::write(path, config.to_config_string())?;
    tracing::debug!(path = %path.display(), "wrote best config");
    Ok(())
}

fn rows_to_csv<T>(rows: &[Vec<T>], render: impl Fn(&T) -> String) -> String {
    rows.iter()
        .map(|row| row.iter().map(&render).collect::<Vec<_>>().join(","))
        .collect::<Vec<_>>()
        .join("\n")
}
