//! Pet Domain Ports
//!
//! This module defines the port interface between the reconciliation service
//! and the system of record that actually stores pet records.
//!
//! # Architecture
//!
//! The `PetRecordPort` trait covers the four CRM operations the application
//! needs. Two adapters implement it:
//!
//! - **HubSpot Adapter**: Calls the CRM objects REST API (see `adapters`)
//! - **Mock Adapter**: In-memory store for tests, with call recording
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_pet::ports::PetRecordPort;
//! use std::sync::Arc;
//!
//! let port: Arc<dyn PetRecordPort> = Arc::new(HubSpotClient::new(crm_config)?);
//! let service = ReconciliationService::new(port, SearchFailurePolicy::default());
//! ```

use async_trait::async_trait;

use core_kernel::{DomainPort, ExternalId, HealthCheckable, InternalId, PortError};

use crate::pet::{PetFields, PetRecord};

/// Port for pet record persistence
///
/// A search is tri-state: `Ok(Some(_))` for a hit, `Ok(None)` for a genuine
/// miss and `Err(_)` when the lookup itself failed. Adapters never fold an
/// error into a miss; that decision belongs to the service.
#[async_trait]
pub trait PetRecordPort: DomainPort + HealthCheckable {
    /// Looks up a record by its external id
    ///
    /// Returns the first match when the CRM holds more than one.
    async fn find_by_external_id(
        &self,
        external_id: &ExternalId,
    ) -> Result<Option<PetRecord>, PortError>;

    /// Lists records
    ///
    /// Only the first page the CRM returns is included.
    async fn list_records(&self) -> Result<Vec<PetRecord>, PortError>;

    /// Creates a record and returns the CRM-assigned id
    async fn create_record(
        &self,
        external_id: &ExternalId,
        fields: &PetFields,
    ) -> Result<InternalId, PortError>;

    /// Applies a partial update to the record with the given CRM id
    ///
    /// Fields set to `None` are not sent.
    async fn update_record(
        &self,
        internal_id: &InternalId,
        fields: &PetFields,
    ) -> Result<(), PortError>;
}

/// Mock implementation of PetRecordPort for testing
///
/// Stores records in memory, records every call it receives and can be told
/// to fail specific operations.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
    use std::sync::Arc;
    use tokio::sync::RwLock;
    use chrono::Utc;

    use core_kernel::{AdapterHealth, HealthCheckResult};

    /// A call observed by the mock
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum PortCall {
        Search(ExternalId),
        List,
        Create(ExternalId, PetFields),
        Update(InternalId, PetFields),
    }

    /// In-memory mock implementation of PetRecordPort
    #[derive(Debug, Default)]
    pub struct MockPetRecordPort {
        records: Arc<RwLock<BTreeMap<InternalId, PetRecord>>>,
        calls: Arc<RwLock<Vec<PortCall>>>,
        next_internal_id: AtomicU64,
        fail_searches: AtomicBool,
        fail_lists: AtomicBool,
        fail_writes: AtomicBool,
    }

    impl MockPetRecordPort {
        /// Creates a new, empty mock port
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with records for testing
        pub async fn with_records(records: Vec<PetRecord>) -> Self {
            let port = Self::new();
            {
                let mut store = port.records.write().await;
                for record in records {
                    store.insert(record.internal_id.clone(), record);
                }
            }
            port
        }

        /// Makes every subsequent search fail with a connection error
        pub fn fail_searches(&self, fail: bool) {
            self.fail_searches.store(fail, Ordering::SeqCst);
        }

        /// Makes every subsequent list fail with a service-unavailable error
        pub fn fail_lists(&self, fail: bool) {
            self.fail_lists.store(fail, Ordering::SeqCst);
        }

        /// Makes every subsequent create and update fail
        pub fn fail_writes(&self, fail: bool) {
            self.fail_writes.store(fail, Ordering::SeqCst);
        }

        /// Returns all calls received so far, in order
        pub async fn calls(&self) -> Vec<PortCall> {
            self.calls.read().await.clone()
        }

        /// Returns the create calls received so far
        pub async fn create_calls(&self) -> Vec<(ExternalId, PetFields)> {
            self.calls
                .read()
                .await
                .iter()
                .filter_map(|call| match call {
                    PortCall::Create(id, fields) => Some((id.clone(), fields.clone())),
                    _ => None,
                })
                .collect()
        }

        /// Returns the update calls received so far
        pub async fn update_calls(&self) -> Vec<(InternalId, PetFields)> {
            self.calls
                .read()
                .await
                .iter()
                .filter_map(|call| match call {
                    PortCall::Update(id, fields) => Some((id.clone(), fields.clone())),
                    _ => None,
                })
                .collect()
        }

        /// Returns the first stored record with the given external id,
        /// without recording a call
        pub async fn stored(&self, external_id: &ExternalId) -> Option<PetRecord> {
            self.first_match(external_id).await
        }

        async fn first_match(&self, external_id: &ExternalId) -> Option<PetRecord> {
            self.records
                .read()
                .await
                .values()
                .find(|r| r.has_external_id(external_id))
                .cloned()
        }

        async fn record_call(&self, call: PortCall) {
            self.calls.write().await.push(call);
        }

        fn allocate_internal_id(&self) -> Result<InternalId, PortError> {
            let next = self.next_internal_id.fetch_add(1, Ordering::SeqCst) + 1;
            InternalId::parse(format!("{}", 9000 + next))
                .map_err(|e| PortError::internal(e.to_string()))
        }
    }

    impl DomainPort for MockPetRecordPort {}

    #[async_trait]
    impl HealthCheckable for MockPetRecordPort {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult {
                adapter_id: "mock-pet-record-port".to_string(),
                status: AdapterHealth::Healthy,
                latency_ms: 0,
                message: Some("Mock adapter always healthy".to_string()),
                checked_at: Utc::now(),
            }
        }
    }

    #[async_trait]
    impl PetRecordPort for MockPetRecordPort {
        async fn find_by_external_id(
            &self,
            external_id: &ExternalId,
        ) -> Result<Option<PetRecord>, PortError> {
            self.record_call(PortCall::Search(external_id.clone())).await;

            if self.fail_searches.load(Ordering::SeqCst) {
                return Err(PortError::connection("mock search failure"));
            }

            Ok(self.first_match(external_id).await)
        }

        async fn list_records(&self) -> Result<Vec<PetRecord>, PortError> {
            self.record_call(PortCall::List).await;

            if self.fail_lists.load(Ordering::SeqCst) {
                return Err(PortError::ServiceUnavailable {
                    service: "mock list failure".to_string(),
                });
            }

            Ok(self.records.read().await.values().cloned().collect())
        }

        async fn create_record(
            &self,
            external_id: &ExternalId,
            fields: &PetFields,
        ) -> Result<InternalId, PortError> {
            self.record_call(PortCall::Create(external_id.clone(), fields.clone()))
                .await;

            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(PortError::internal("mock create failure"));
            }

            let internal_id = self.allocate_internal_id()?;
            let record = PetRecord::new(external_id.clone(), internal_id.clone(), fields.clone());
            // Like the CRM, a second create for the same external id keeps both
            self.records
                .write()
                .await
                .insert(internal_id.clone(), record);

            Ok(internal_id)
        }

        async fn update_record(
            &self,
            internal_id: &InternalId,
            fields: &PetFields,
        ) -> Result<(), PortError> {
            self.record_call(PortCall::Update(internal_id.clone(), fields.clone()))
                .await;

            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(PortError::internal("mock update failure"));
            }

            let mut records = self.records.write().await;
            let record = records
                .get_mut(internal_id)
                .ok_or_else(|| PortError::not_found("PetRecord", internal_id))?;

            if let Some(ref name) = fields.name {
                record.fields.name = Some(name.clone());
            }
            if let Some(ref species) = fields.species {
                record.fields.species = Some(species.clone());
            }
            if let Some(ref breed) = fields.breed {
                record.fields.breed = Some(breed.clone());
            }
            if let Some(ref owner_name) = fields.owner_name {
                record.fields.owner_name = Some(owner_name.clone());
            }

            Ok(())
        }
    }
}
