//! Pre-built Test Fixtures
//!
//! Ready-to-use pet records and CRM payloads. These fixtures are
//! deterministic so assertions can compare exact values.

use core_kernel::{ExternalId, InternalId};
use domain_pet::{PetFields, PetRecord, PetSubmission};
use serde_json::{json, Value};

/// Fixture for pet record test data
pub struct PetFixtures;

impl PetFixtures {
    /// External id used by the create-then-update scenario
    pub fn rex_external_id() -> ExternalId {
        ExternalId::parse("p1").unwrap()
    }

    /// CRM id assigned to Rex in fixtures that start with Rex stored
    pub fn rex_internal_id() -> InternalId {
        InternalId::parse("37260531").unwrap()
    }

    /// Rex the labrador, owned by Ana
    pub fn rex_fields() -> PetFields {
        PetFields {
            name: Some("Rex".to_string()),
            species: Some("dog".to_string()),
            breed: Some("lab".to_string()),
            owner_name: Some("Ana".to_string()),
        }
    }

    /// Rex as already stored in the CRM
    pub fn rex() -> PetRecord {
        PetRecord::new(Self::rex_external_id(), Self::rex_internal_id(), Self::rex_fields())
    }

    /// A form submission for Rex
    pub fn rex_submission() -> PetSubmission {
        PetSubmission::new("p1", Self::rex_fields())
    }

    /// Mittens the cat, a second stored record
    pub fn mittens() -> PetRecord {
        PetRecord::new(
            ExternalId::parse("p2").unwrap(),
            InternalId::parse("37260532").unwrap(),
            PetFields {
                name: Some("Mittens".to_string()),
                species: Some("cat".to_string()),
                breed: Some("siamese".to_string()),
                owner_name: Some("Luis".to_string()),
            },
        )
    }
}

/// Fixture for CRM wire payloads
pub struct CrmFixtures;

impl CrmFixtures {
    /// Access token used against mock CRM servers
    pub fn access_token() -> &'static str {
        "pat-test-0000"
    }

    /// Custom object type used against mock CRM servers
    pub fn object_type() -> &'static str {
        "2-42115507"
    }

    /// Path of the object collection on a mock CRM server
    pub fn collection_path() -> String {
        format!("/crm/v3/objects/{}", Self::object_type())
    }

    /// Renders a record the way the CRM returns it
    pub fn object_json(record: &PetRecord) -> Value {
        json!({
            "id": record.internal_id.as_str(),
            "properties": {
                "id": record.external_id.as_ref().map(|id| id.as_str()),
                "name": record.fields.name,
                "animal_species": record.fields.species,
                "breed": record.fields.breed,
                "pet_owner": record.fields.owner_name,
                "hs_object_id": record.internal_id.as_str(),
            },
            "createdAt": "2025-02-10T17:04:51.374Z",
            "updatedAt": "2025-02-10T17:04:51.374Z",
            "archived": false
        })
    }

    /// A search response with the given hits
    pub fn search_response(records: &[PetRecord]) -> Value {
        json!({
            "total": records.len(),
            "results": records.iter().map(Self::object_json).collect::<Vec<_>>()
        })
    }

    /// A list response with the given records
    pub fn list_response(records: &[PetRecord]) -> Value {
        json!({
            "results": records.iter().map(Self::object_json).collect::<Vec<_>>()
        })
    }

    /// An error body in the CRM's format
    pub fn error_body(category: &str, message: &str) -> Value {
        json!({
            "status": "error",
            "message": message,
            "correlationId": "4f2e9c3a-6b7d-4d8e-9a1b-2c3d4e5f6a7b",
            "category": category
        })
    }
}
