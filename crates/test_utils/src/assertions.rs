//! Custom Test Assertions
//!
//! Assertion helpers over the calls recorded by `MockPetRecordPort`, giving
//! clearer failure messages than comparing call lists by hand.

use core_kernel::{ExternalId, InternalId};
use domain_pet::{MockPetRecordPort, PetFields, PortCall};

/// Asserts that exactly one create was issued, for the given id and fields,
/// and that no update was issued
pub async fn assert_created_once(port: &MockPetRecordPort, id: &ExternalId, fields: &PetFields) {
    let creates = port.create_calls().await;
    assert_eq!(creates.len(), 1, "expected one create, got {creates:?}");
    assert_eq!(&creates[0].0, id, "create issued for the wrong external id");
    assert_eq!(&creates[0].1, fields, "create issued with the wrong fields");

    let updates = port.update_calls().await;
    assert!(updates.is_empty(), "expected no update, got {updates:?}");
}

/// Asserts that exactly one update was issued, keyed by the given CRM id,
/// and that no create was issued
pub async fn assert_updated_once(port: &MockPetRecordPort, id: &InternalId, fields: &PetFields) {
    let updates = port.update_calls().await;
    assert_eq!(updates.len(), 1, "expected one update, got {updates:?}");
    assert_eq!(&updates[0].0, id, "update keyed by the wrong CRM id");
    assert_eq!(&updates[0].1, fields, "update issued with the wrong fields");

    let creates = port.create_calls().await;
    assert!(creates.is_empty(), "expected no create, got {creates:?}");
}

/// Asserts that the port received no calls at all
pub async fn assert_untouched(port: &MockPetRecordPort) {
    let calls = port.calls().await;
    assert!(calls.is_empty(), "expected no CRM calls, got {calls:?}");
}

/// Asserts that no write (create or update) reached the port
pub async fn assert_no_writes(port: &MockPetRecordPort) {
    let writes: Vec<PortCall> = port
        .calls()
        .await
        .into_iter()
        .filter(|c| matches!(c, PortCall::Create(..) | PortCall::Update(..)))
        .collect();
    assert!(writes.is_empty(), "expected no CRM writes, got {writes:?}");
}
