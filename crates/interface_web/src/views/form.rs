//! Create and edit form

use domain_pet::PetRecord;

use super::{escape, layout};

pub const CREATE_TITLE: &str = "Add a New Pet Record | HubSpot Integration";
pub const EDIT_TITLE: &str = "Edit Pet Record | HubSpot Integration";

/// Renders the form, pre-filled when editing an existing record
///
/// The id input is read-only when editing; submitting then updates the
/// record found under that id.
pub fn render(pet: Option<&PetRecord>) -> String {
    let title = if pet.is_some() { EDIT_TITLE } else { CREATE_TITLE };

    let id = pet.map(PetRecord::external_id_or_empty).unwrap_or_default();
    let fields = pet.map(|p| p.fields.clone()).unwrap_or_default();
    let id_attrs = if pet.is_some() { " readonly" } else { " required" };

    let content = format!(
        r#"    <form method="post" action="/update-cobj">
      <label for="id">ID</label>
      <input type="text" id="id" name="id" value="{id}"{id_attrs}>
{name}{species}{breed}{owner}      <button type="submit">Save</button>
      <a href="/">Back to list</a>
    </form>
"#,
        id = escape(id),
        id_attrs = id_attrs,
        name = text_input("name", "Name", fields.name_or_empty()),
        species = text_input("animal_species", "Species", fields.species_or_empty()),
        breed = text_input("breed", "Breed", fields.breed_or_empty()),
        owner = text_input("pet_owner", "Owner", fields.owner_name_or_empty()),
    );

    layout(title, &content)
}

fn text_input(name: &str, label: &str, value: &str) -> String {
    format!(
        r#"      <label for="{name}">{label}</label>
      <input type="text" id="{name}" name="{name}" value="{value}">
"#,
        value = escape(value),
    )
}
