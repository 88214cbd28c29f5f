//! Errors raised while constructing a [`crate::DesiredPattern`] from raw tables.

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("dimension mismatch in `{file}`: expected {expected:?}, found {found:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        found: (usize, usize),
        file: String,
    },
    #[error("ragged row {row} in `{file}`")]
    RaggedRow { file: String, row: usize },
    #[error("could not parse cell ({row}, {col}) in `{file}`")]
    ParseCell { file: String, row: usize, col: usize },
    #[error("io error loading pattern data")]
    Io(#[from] std::io::Error),
    #[error("shape mask has no interior cells")]
    EmptyShape,
}
