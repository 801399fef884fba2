//! Domain models for the patient registry.

mod patient;
mod query;

pub use patient::*;
pub use query::*;
