//! Test Utilities Crate
//!
//! Shared test infrastructure for the pet records workspace.
//!
//! # Modules
//!
//! - `fixtures`: Deterministic pet records and CRM payloads
//! - `builders`: Builder for pet records and submissions
//! - `assertions`: Assertions over calls recorded by the mock port
//! - `generators`: Property-based strategies and fake data

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;
