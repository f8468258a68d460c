//! Pet domain errors
//!
//! Errors surfaced by the reconciliation service. Adapter failures are
//! wrapped unchanged so the HTTP layer can log the real cause.

use thiserror::Error;

use core_kernel::PortError;

/// Errors that can occur in the pet domain
#[derive(Debug, Error)]
pub enum PetError {
    /// A submission arrived without a usable external id
    #[error("External id is required")]
    MissingExternalId,

    /// No record carries the given external id
    #[error("Pet record not found: {0}")]
    NotFound(String),

    /// The CRM call failed
    #[error("CRM request failed: {0}")]
    Upstream(#[from] PortError),
}

impl PetError {
    /// Creates a NotFound error for the given external id
    pub fn not_found(id: impl std::fmt::Display) -> Self {
        PetError::NotFound(id.to_string())
    }

    /// Returns true if the caller supplied bad input
    pub fn is_client_error(&self) -> bool {
        matches!(self, PetError::MissingExternalId | PetError::NotFound(_))
    }
}
