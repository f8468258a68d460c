//! Pet domain services
//!
//! The reconciliation service decides whether a form submission creates a
//! new CRM record or updates an existing one. It is the only place in the
//! application that makes that decision.
//!
//! # Concurrency
//!
//! Reconciliation is a read followed by a write with no lock in between.
//! Two concurrent submissions for the same external id can both miss on the
//! search and both create, leaving duplicate records in the CRM.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use core_kernel::{ExternalId, InternalId};

use crate::error::PetError;
use crate::pet::{PetRecord, PetSubmission};
use crate::ports::PetRecordPort;

/// How a failed search is interpreted
///
/// The CRM search cannot tell a real miss from a failed lookup on its own;
/// the port reports them separately and this policy decides what a failure
/// means for the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchFailurePolicy {
    /// A failed search is logged and handled as "not found"
    #[default]
    TreatAsNotFound,
    /// A failed search aborts the request as an upstream failure
    Propagate,
}

/// Outcome of a successful reconciliation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    /// No record matched, a new one was created
    Created {
        external_id: ExternalId,
        internal_id: InternalId,
    },
    /// An existing record was updated in place
    Updated {
        external_id: ExternalId,
        internal_id: InternalId,
    },
}

impl Reconciliation {
    /// Returns the external id the submission was reconciled under
    pub fn external_id(&self) -> &ExternalId {
        match self {
            Reconciliation::Created { external_id, .. }
            | Reconciliation::Updated { external_id, .. } => external_id,
        }
    }

    /// Returns the CRM id of the created or updated record
    pub fn internal_id(&self) -> &InternalId {
        match self {
            Reconciliation::Created { internal_id, .. }
            | Reconciliation::Updated { internal_id, .. } => internal_id,
        }
    }

    /// Returns true if a new record was created
    pub fn is_created(&self) -> bool {
        matches!(self, Reconciliation::Created { .. })
    }
}

/// Service that reconciles submissions against the CRM
///
/// Cheap to clone; the port is shared.
#[derive(Clone)]
pub struct ReconciliationService {
    port: Arc<dyn PetRecordPort>,
    search_failure_policy: SearchFailurePolicy,
}

impl std::fmt::Debug for ReconciliationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReconciliationService")
            .field("search_failure_policy", &self.search_failure_policy)
            .finish_non_exhaustive()
    }
}

impl ReconciliationService {
    /// Creates a new reconciliation service
    ///
    /// # Arguments
    ///
    /// * `port` - The record store to reconcile against
    /// * `search_failure_policy` - How failed searches are interpreted
    pub fn new(port: Arc<dyn PetRecordPort>, search_failure_policy: SearchFailurePolicy) -> Self {
        Self {
            port,
            search_failure_policy,
        }
    }

    /// Returns the underlying port
    pub fn port(&self) -> &Arc<dyn PetRecordPort> {
        &self.port
    }

    /// Creates or updates the record described by a submission
    ///
    /// 1. Rejects a missing or blank external id without touching the CRM
    /// 2. Searches for the external id
    /// 3. Updates the match by its CRM id, or creates a new record
    ///
    /// # Errors
    ///
    /// * `PetError::MissingExternalId` - No usable external id was submitted
    /// * `PetError::Upstream` - A CRM call failed (a failed search only under
    ///   `SearchFailurePolicy::Propagate`)
    pub async fn reconcile(&self, submission: PetSubmission) -> Result<Reconciliation, PetError> {
        let external_id = submission
            .external_id
            .as_deref()
            .and_then(|raw| ExternalId::parse(raw).ok())
            .ok_or(PetError::MissingExternalId)?;

        match self.lookup(&external_id).await? {
            Some(existing) => {
                info!(
                    external_id = %external_id,
                    internal_id = %existing.internal_id,
                    "Updating existing pet record"
                );
                self.port
                    .update_record(&existing.internal_id, &submission.fields)
                    .await?;

                Ok(Reconciliation::Updated {
                    external_id,
                    internal_id: existing.internal_id,
                })
            }
            None => {
                info!(external_id = %external_id, "Creating new pet record");
                let internal_id = self
                    .port
                    .create_record(&external_id, &submission.fields)
                    .await?;

                info!(
                    external_id = %external_id,
                    internal_id = %internal_id,
                    "Pet record created"
                );
                Ok(Reconciliation::Created {
                    external_id,
                    internal_id,
                })
            }
        }
    }

    /// Finds a record by its external id
    ///
    /// A blank id is reported as not found.
    ///
    /// # Errors
    ///
    /// * `PetError::NotFound` - No record matched (or, under the default
    ///   policy, the search failed)
    /// * `PetError::Upstream` - The search failed under `Propagate`
    pub async fn find(&self, raw_external_id: &str) -> Result<PetRecord, PetError> {
        let external_id = ExternalId::parse(raw_external_id)
            .map_err(|_| PetError::not_found(raw_external_id))?;

        self.lookup(&external_id)
            .await?
            .ok_or_else(|| PetError::not_found(&external_id))
    }

    /// Lists the records currently held by the CRM
    pub async fn list(&self) -> Result<Vec<PetRecord>, PetError> {
        let records = self.port.list_records().await?;
        debug!(count = records.len(), "Fetched pet records");
        Ok(records)
    }

    async fn lookup(&self, external_id: &ExternalId) -> Result<Option<PetRecord>, PetError> {
        match self.port.find_by_external_id(external_id).await {
            Ok(found) => {
                debug!(external_id = %external_id, found = found.is_some(), "Searched for pet record");
                Ok(found)
            }
            Err(error) => match self.search_failure_policy {
                SearchFailurePolicy::TreatAsNotFound => {
                    warn!(
                        external_id = %external_id,
                        error = %error,
                        transient = error.is_transient(),
                        "Search failed, treating as not found"
                    );
                    Ok(None)
                }
                SearchFailurePolicy::Propagate => Err(PetError::Upstream(error)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pet::PetFields;
    use crate::ports::mock::{MockPetRecordPort, PortCall};

    fn rex() -> PetFields {
        PetFields {
            name: Some("Rex".to_string()),
            species: Some("dog".to_string()),
            breed: Some("lab".to_string()),
            owner_name: Some("Ana".to_string()),
        }
    }

    fn service(port: &Arc<MockPetRecordPort>, policy: SearchFailurePolicy) -> ReconciliationService {
        ReconciliationService::new(port.clone(), policy)
    }

    #[tokio::test]
    async fn test_unknown_id_creates_once() {
        let port = Arc::new(MockPetRecordPort::new());
        let service = service(&port, SearchFailurePolicy::default());

        let outcome = service.reconcile(PetSubmission::new("p1", rex())).await.unwrap();

        assert!(outcome.is_created());
        assert_eq!(outcome.external_id().as_str(), "p1");
        let creates = port.create_calls().await;
        assert_eq!(creates.len(), 1);
        assert_eq!(creates[0].0.as_str(), "p1");
        assert_eq!(creates[0].1, rex());
        assert!(port.update_calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_known_id_updates_by_internal_id() {
        let port = Arc::new(MockPetRecordPort::new());
        let service = service(&port, SearchFailurePolicy::default());

        let created = service.reconcile(PetSubmission::new("p1", rex())).await.unwrap();
        let updated = service.reconcile(PetSubmission::new("p1", rex())).await.unwrap();

        assert!(!updated.is_created());
        assert_eq!(updated.internal_id(), created.internal_id());

        let updates = port.update_calls().await;
        assert_eq!(updates.len(), 1);
        assert_eq!(&updates[0].0, created.internal_id());
        assert_ne!(updates[0].0.as_str(), "p1");
        assert_eq!(port.create_calls().await.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_id_makes_no_calls() {
        let port = Arc::new(MockPetRecordPort::new());
        let service = service(&port, SearchFailurePolicy::default());

        let missing = service
            .reconcile(PetSubmission {
                external_id: None,
                fields: rex(),
            })
            .await;
        assert!(matches!(missing, Err(PetError::MissingExternalId)));

        let blank = service.reconcile(PetSubmission::new("   ", rex())).await;
        assert!(matches!(blank, Err(PetError::MissingExternalId)));

        assert!(port.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_failed_search_treated_as_not_found_by_default() {
        let port = Arc::new(MockPetRecordPort::new());
        port.fail_searches(true);
        let service = service(&port, SearchFailurePolicy::TreatAsNotFound);

        let outcome = service.reconcile(PetSubmission::new("p1", rex())).await.unwrap();

        assert!(outcome.is_created());
        assert_eq!(port.create_calls().await.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_search_propagates_when_configured() {
        let port = Arc::new(MockPetRecordPort::new());
        port.fail_searches(true);
        let service = service(&port, SearchFailurePolicy::Propagate);

        let result = service.reconcile(PetSubmission::new("p1", rex())).await;

        assert!(matches!(result, Err(PetError::Upstream(_))));
        let external_id = ExternalId::parse("p1").unwrap();
        assert_eq!(port.calls().await, vec![PortCall::Search(external_id)]);
    }

    #[tokio::test]
    async fn test_failed_write_is_upstream_error() {
        let port = Arc::new(MockPetRecordPort::new());
        port.fail_writes(true);
        let service = service(&port, SearchFailurePolicy::default());

        let result = service.reconcile(PetSubmission::new("p1", rex())).await;
        assert!(matches!(result, Err(PetError::Upstream(_))));
    }

    #[tokio::test]
    async fn test_find_blank_and_missing() {
        let port = Arc::new(MockPetRecordPort::new());
        let service = service(&port, SearchFailurePolicy::default());

        assert!(matches!(service.find(" ").await, Err(PetError::NotFound(_))));
        assert!(matches!(service.find("ghost").await, Err(PetError::NotFound(_))));
    }

    #[test]
    fn test_policy_serde_names() {
        let policy: SearchFailurePolicy = serde_json::from_str("\"propagate\"").unwrap();
        assert_eq!(policy, SearchFailurePolicy::Propagate);
        assert_eq!(SearchFailurePolicy::default(), SearchFailurePolicy::TreatAsNotFound);
    }
}
