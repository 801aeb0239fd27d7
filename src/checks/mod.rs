//! Pre-merge checks run against the current phase: required artifacts exist
//! and the active mode's checklist has no unchecked items.

mod artifacts;
mod checklist;

pub use artifacts::*;
pub use checklist::*;
