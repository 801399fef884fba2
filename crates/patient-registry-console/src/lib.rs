//! Query console and directory helpers for the patient registry.
//!
//! This crate sits between a host UI and [`patient_registry_core`]: it gates
//! console runs on readiness, turns engine errors into friendly messages, and
//! lays result rows out as text or CSV.

pub mod console;
pub mod directory;
pub mod messages;
pub mod render;

pub use console::*;
pub use directory::*;
pub use messages::*;
pub use render::*;
