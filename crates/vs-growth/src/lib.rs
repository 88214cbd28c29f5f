//! Path growth: the `PathGrower` two-sided extension, `StartingPointPolicy`
//! seed selection, and the filler driver that runs them to saturation.

mod driver;
mod grower;
mod policy;

pub use driver::fill_to_saturation;
pub use grower::{grow_from, two_sided_grow};
pub use policy::StartingPointPolicy;
