//! Core Kernel - Foundational types shared by every crate in the workspace
//!
//! This crate provides:
//! - Identifier newtypes for external (caller-supplied) and internal (CRM-assigned) ids
//! - The port error type and health-check contract used by adapters
//! - The kernel error type

pub mod identifiers;
pub mod error;
pub mod ports;

pub use identifiers::{ExternalId, InternalId};
pub use error::CoreError;
pub use ports::{
    PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth,
};
