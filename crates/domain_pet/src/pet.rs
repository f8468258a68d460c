//! Pet record model
//!
//! A pet record lives only inside the CRM. This module holds the in-process
//! view of one record while a request is being served.
//!
//! # Identifiers
//!
//! Every record is addressed two ways:
//!
//! - **External id**: chosen by the person submitting the form and stored in
//!   the CRM's `id` property. It is the lookup key for create-or-update.
//! - **Internal id**: assigned by the CRM when the object is created. Only
//!   this one is accepted by the CRM's update endpoint.

use serde::{Deserialize, Serialize};

use core_kernel::{ExternalId, InternalId};

/// The attribute fields of a pet record
///
/// Each field is optional: an absent field is left untouched by the CRM,
/// while `Some(String::new())` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetFields {
    /// Pet name
    pub name: Option<String>,
    /// Animal species (dog, cat, ...)
    pub species: Option<String>,
    /// Breed
    pub breed: Option<String>,
    /// Name of the pet's owner
    pub owner_name: Option<String>,
}

impl PetFields {
    /// Returns the name, or an empty string when unset
    pub fn name_or_empty(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// Returns the species, or an empty string when unset
    pub fn species_or_empty(&self) -> &str {
        self.species.as_deref().unwrap_or_default()
    }

    /// Returns the breed, or an empty string when unset
    pub fn breed_or_empty(&self) -> &str {
        self.breed.as_deref().unwrap_or_default()
    }

    /// Returns the owner name, or an empty string when unset
    pub fn owner_name_or_empty(&self) -> &str {
        self.owner_name.as_deref().unwrap_or_default()
    }
}

/// A pet record as stored in the CRM
///
/// Objects created outside this application may lack the external id
/// property; they are still listed but cannot be looked up or edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetRecord {
    /// Caller-supplied identifier, if the CRM object has one
    pub external_id: Option<ExternalId>,
    /// CRM-assigned identifier
    pub internal_id: InternalId,
    /// Attribute fields
    pub fields: PetFields,
}

impl PetRecord {
    /// Creates a record from its parts
    pub fn new(external_id: ExternalId, internal_id: InternalId, fields: PetFields) -> Self {
        Self {
            external_id: Some(external_id),
            internal_id,
            fields,
        }
    }

    /// Creates a record for a CRM object that has no external id
    pub fn without_external_id(internal_id: InternalId, fields: PetFields) -> Self {
        Self {
            external_id: None,
            internal_id,
            fields,
        }
    }

    /// Returns the external id, or an empty string when unset
    pub fn external_id_or_empty(&self) -> &str {
        self.external_id.as_ref().map(ExternalId::as_str).unwrap_or_default()
    }

    /// Returns true if the record carries the given external id
    pub fn has_external_id(&self, external_id: &ExternalId) -> bool {
        self.external_id.as_ref() == Some(external_id)
    }
}

/// A raw create-or-update submission
///
/// The external id is kept as submitted; the reconciliation service decides
/// whether it is usable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PetSubmission {
    /// Submitted external id, if any
    pub external_id: Option<String>,
    /// Submitted attribute fields
    pub fields: PetFields,
}

impl PetSubmission {
    /// Creates a submission for the given external id
    pub fn new(external_id: impl Into<String>, fields: PetFields) -> Self {
        Self {
            external_id: Some(external_id.into()),
            fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_default_to_empty_strings() {
        let fields = PetFields::default();
        assert_eq!(fields.name_or_empty(), "");
        assert_eq!(fields.species_or_empty(), "");
        assert_eq!(fields.breed_or_empty(), "");
        assert_eq!(fields.owner_name_or_empty(), "");
    }

    #[test]
    fn test_fields_accessors_return_values() {
        let fields = PetFields {
            name: Some("Rex".to_string()),
            species: Some("dog".to_string()),
            breed: Some("lab".to_string()),
            owner_name: Some("Ana".to_string()),
        };
        assert_eq!(fields.name_or_empty(), "Rex");
        assert_eq!(fields.species_or_empty(), "dog");
        assert_eq!(fields.breed_or_empty(), "lab");
        assert_eq!(fields.owner_name_or_empty(), "Ana");
    }

    #[test]
    fn test_record_without_external_id() {
        let record = PetRecord::without_external_id(
            InternalId::parse("513").unwrap(),
            PetFields::default(),
        );
        assert_eq!(record.external_id_or_empty(), "");
        assert!(!record.has_external_id(&ExternalId::parse("p1").unwrap()));
    }

    #[test]
    fn test_record_matches_external_id_exactly() {
        let record = PetRecord::new(
            ExternalId::parse(" p1").unwrap(),
            InternalId::parse("512").unwrap(),
            PetFields::default(),
        );
        assert_eq!(record.external_id_or_empty(), " p1");
        assert!(record.has_external_id(&ExternalId::parse(" p1").unwrap()));
        assert!(!record.has_external_id(&ExternalId::parse("p1").unwrap()));
    }

    #[test]
    fn test_submission_new_sets_external_id() {
        let submission = PetSubmission::new("p1", PetFields::default());
        assert_eq!(submission.external_id.as_deref(), Some("p1"));
    }
}
