//! Shape/field state (`DesiredPattern`) and mutable fill state (`FilledPattern`)
//! shared by the growth, quantification, and optimisation crates.

mod desired;
mod error;
mod filled;
mod path;

pub use desired::DesiredPattern;
pub use error::DataError;
pub use filled::FilledPattern;
pub use path::Path;
