//! Listing page

use domain_pet::PetRecord;

use super::{escape, layout, path_segment};

pub const TITLE: &str = "Pet Records | HubSpot API";

/// Renders the table of all pet records
pub fn render(records: &[PetRecord]) -> String {
    let rows = if records.is_empty() {
        r#"        <tr><td colspan="6" class="empty">No pet records yet.</td></tr>
"#
        .to_string()
    } else {
        records.iter().map(row).collect::<String>()
    };

    let content = format!(
        r#"    <p><a class="button" href="/update-cobj">Add a new pet</a></p>
    <table>
      <thead>
        <tr><th>ID</th><th>Name</th><th>Species</th><th>Breed</th><th>Owner</th><th></th></tr>
      </thead>
      <tbody>
{rows}      </tbody>
    </table>
"#
    );

    layout(TITLE, &content)
}

fn row(record: &PetRecord) -> String {
    let fields = &record.fields;
    // Without an external id there is nothing to look the record up by
    let edit = match &record.external_id {
        Some(id) => format!(r#"<a href="/update-cobj/{}">Edit</a>"#, path_segment(id.as_str())),
        None => String::new(),
    };
    format!(
        r#"        <tr data-internal-id="{internal}"><td>{id}</td><td>{name}</td><td>{species}</td><td>{breed}</td><td>{owner}</td><td>{edit}</td></tr>
"#,
        internal = escape(record.internal_id.as_str()),
        id = escape(record.external_id_or_empty()),
        name = escape(fields.name_or_empty()),
        species = escape(fields.species_or_empty()),
        breed = escape(fields.breed_or_empty()),
        owner = escape(fields.owner_name_or_empty()),
    )
}
