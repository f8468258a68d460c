//! Test Data Builders
//!
//! Builder for pet records with sensible defaults, so tests only spell out
//! the fields they care about.

use core_kernel::{ExternalId, InternalId};
use domain_pet::{PetFields, PetRecord};

use crate::fixtures::PetFixtures;

/// Builder for constructing test pet records
pub struct TestPetRecordBuilder {
    external_id: Option<ExternalId>,
    internal_id: InternalId,
    fields: PetFields,
}

impl Default for TestPetRecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestPetRecordBuilder {
    /// Creates a new builder seeded with Rex
    pub fn new() -> Self {
        Self {
            external_id: Some(PetFixtures::rex_external_id()),
            internal_id: PetFixtures::rex_internal_id(),
            fields: PetFixtures::rex_fields(),
        }
    }

    /// Sets the external id
    pub fn with_external_id(mut self, id: &str) -> Self {
        self.external_id = Some(ExternalId::parse(id).unwrap());
        self
    }

    /// Removes the external id, as for objects created outside the app
    pub fn without_external_id(mut self) -> Self {
        self.external_id = None;
        self
    }

    /// Sets the CRM id
    pub fn with_internal_id(mut self, id: &str) -> Self {
        self.internal_id = InternalId::parse(id).unwrap();
        self
    }

    /// Sets the name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.fields.name = Some(name.into());
        self
    }

    /// Sets the species
    pub fn with_species(mut self, species: impl Into<String>) -> Self {
        self.fields.species = Some(species.into());
        self
    }

    /// Sets the breed
    pub fn with_breed(mut self, breed: impl Into<String>) -> Self {
        self.fields.breed = Some(breed.into());
        self
    }

    /// Sets the owner name
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.fields.owner_name = Some(owner.into());
        self
    }

    /// Replaces all attribute fields
    pub fn with_fields(mut self, fields: PetFields) -> Self {
        self.fields = fields;
        self
    }

    /// Builds the record
    pub fn build(self) -> PetRecord {
        match self.external_id {
            Some(external_id) => PetRecord::new(external_id, self.internal_id, self.fields),
            None => PetRecord::without_external_id(self.internal_id, self.fields),
        }
    }
}
