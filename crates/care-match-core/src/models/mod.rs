//! Domain models for the care-match system.

mod analysis;
mod condition;
mod institution;

pub use analysis::*;
pub use condition::*;
pub use institution::*;
