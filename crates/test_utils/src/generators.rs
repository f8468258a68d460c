//! Test Data Generators
//!
//! Proptest strategies for property tests, plus `fake`-backed helpers for
//! tests that just need plausible values.

use fake::faker::name::en::{FirstName, Name};
use fake::Fake;
use proptest::prelude::*;

use core_kernel::ExternalId;
use domain_pet::{PetFields, PetSubmission};

const SPECIES: [&str; 5] = ["dog", "cat", "rabbit", "parrot", "hamster"];

/// Strategy for valid external ids
pub fn external_id_strategy() -> impl Strategy<Value = ExternalId> {
    "[A-Za-z0-9][A-Za-z0-9_-]{0,15}".prop_map(|raw| ExternalId::parse(raw).unwrap())
}

/// Strategy for optional free-text field values
pub fn field_value_strategy() -> impl Strategy<Value = Option<String>> {
    proptest::option::of("[A-Za-z ]{0,20}")
}

/// Strategy for pet attribute fields
pub fn pet_fields_strategy() -> impl Strategy<Value = PetFields> {
    (
        field_value_strategy(),
        prop::sample::select(SPECIES.to_vec()),
        field_value_strategy(),
        field_value_strategy(),
    )
        .prop_map(|(name, species, breed, owner_name)| PetFields {
            name,
            species: Some(species.to_string()),
            breed,
            owner_name,
        })
}

/// Strategy for submissions that carry a valid external id
pub fn submission_strategy() -> impl Strategy<Value = PetSubmission> {
    (external_id_strategy(), pet_fields_strategy())
        .prop_map(|(id, fields)| PetSubmission::new(id.into_inner(), fields))
}

/// Strategy for external id values a form could submit that are unusable
pub fn blank_id_strategy() -> impl Strategy<Value = Option<String>> {
    prop_oneof![Just(None), "[ \t]{0,4}".prop_map(Some)]
}

/// Random but plausible pet fields
pub fn fake_pet_fields() -> PetFields {
    let species = SPECIES[(0..SPECIES.len()).fake::<usize>()];
    PetFields {
        name: Some(FirstName().fake()),
        species: Some(species.to_string()),
        breed: Some("mixed".to_string()),
        owner_name: Some(Name().fake()),
    }
}
