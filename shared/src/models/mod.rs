//! Domain models for the Digital Farmer platform

mod analysis;
mod field;
mod task;
mod weather;

pub use analysis::*;
pub use field::*;
pub use task::*;
pub use weather::*;
