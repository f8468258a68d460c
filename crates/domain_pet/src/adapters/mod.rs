//! External Adapters for the Pet Domain
//!
//! Adapter implementations of `PetRecordPort` that talk to a real system of
//! record.
//!
//! # Available Adapters
//!
//! - **HubSpotClient**: HubSpot CRM v3 custom objects via REST
//! - **MockPetRecordPort**: In-memory mock for testing (re-exported from the ports module)
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_pet::adapters::{CrmConfig, HubSpotClient};
//! use domain_pet::PetRecordPort;
//! use std::sync::Arc;
//!
//! let config = CrmConfig::new("https://api.hubapi.com", token, "2-42115507");
//! let port: Arc<dyn PetRecordPort> = Arc::new(HubSpotClient::new(config)?);
//! ```

pub mod hubspot;

pub use hubspot::{CrmConfig, HubSpotClient, DEFAULT_BASE_URL};
