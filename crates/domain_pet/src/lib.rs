//! Pet Records Domain
//!
//! This crate owns everything about pet records that is not HTTP: the record
//! model, the port to the CRM that stores them, the HubSpot adapter behind
//! that port, and the create-or-update reconciliation policy.
//!
//! # Examples
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use domain_pet::{MockPetRecordPort, PetFields, PetSubmission, ReconciliationService, SearchFailurePolicy};
//!
//! let port = Arc::new(MockPetRecordPort::new());
//! let service = ReconciliationService::new(port.clone(), SearchFailurePolicy::default());
//!
//! let fields = PetFields {
//!     name: Some("Rex".to_string()),
//!     species: Some("dog".to_string()),
//!     breed: Some("lab".to_string()),
//!     owner_name: Some("Ana".to_string()),
//! };
//!
//! // First submission creates, the second updates the same CRM object
//! let created = service.reconcile(PetSubmission::new("p1", fields.clone())).await?;
//! let updated = service.reconcile(PetSubmission::new("p1", fields)).await?;
//! assert!(created.is_created());
//! assert_eq!(created.internal_id(), updated.internal_id());
//! ```

pub mod pet;
pub mod error;
pub mod ports;
pub mod services;
pub mod adapters;

pub use pet::{PetFields, PetRecord, PetSubmission};
pub use error::PetError;
pub use ports::PetRecordPort;
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::{MockPetRecordPort, PortCall};
pub use services::{Reconciliation, ReconciliationService, SearchFailurePolicy};
pub use adapters::{CrmConfig, HubSpotClient};
