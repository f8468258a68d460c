//! Pet form DTOs

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
    Form, Json,
};
use serde::Deserialize;

use domain_pet::{PetFields, PetSubmission};

/// Body of `POST /update-cobj`, urlencoded or JSON
///
/// Every field is optional so that a missing `id` reaches the reconciliation
/// service and is reported as a 400 rather than a form rejection.
#[derive(Debug, Default, Deserialize)]
pub struct PetForm {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub animal_species: Option<String>,
    #[serde(default)]
    pub breed: Option<String>,
    #[serde(default)]
    pub pet_owner: Option<String>,
}

/// Extracts a [`PetForm`] from either body encoding
///
/// JSON is used when the request says so; anything else goes through the
/// urlencoded `Form` extractor and keeps its rejections.
#[derive(Debug)]
pub struct PetPayload(pub PetForm);

fn is_json(request: &Request) -> bool {
    request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|mime| {
            let mime = mime.trim();
            mime.eq_ignore_ascii_case("application/json") || mime.ends_with("+json")
        })
        .unwrap_or(false)
}

#[async_trait]
impl<S> FromRequest<S> for PetPayload
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_json(&request) {
            let Json(form) = Json::<PetForm>::from_request(request, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(Self(form))
        } else {
            let Form(form) = Form::<PetForm>::from_request(request, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(Self(form))
        }
    }
}

impl From<PetForm> for PetSubmission {
    fn from(form: PetForm) -> Self {
        PetSubmission {
            external_id: form.id,
            fields: PetFields {
                name: form.name,
                species: form.animal_species,
                breed: form.breed,
                owner_name: form.pet_owner,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use proptest::prelude::*;

    fn request(content_type: &str, body: &'static str) -> Request {
        axum::http::Request::builder()
            .method("POST")
            .uri("/update-cobj")
            .header(CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_payload_reads_urlencoded() {
        let PetPayload(form) = PetPayload::from_request(
            request("application/x-www-form-urlencoded", "id=p1&name=Rex"),
            &(),
        )
        .await
        .unwrap();

        assert_eq!(form.id.as_deref(), Some("p1"));
        assert_eq!(form.name.as_deref(), Some("Rex"));
    }

    #[tokio::test]
    async fn test_payload_reads_json() {
        let PetPayload(form) = PetPayload::from_request(
            request("application/json; charset=utf-8", r#"{"id":"p1","pet_owner":"Ana"}"#),
            &(),
        )
        .await
        .unwrap();

        assert_eq!(form.id.as_deref(), Some("p1"));
        assert_eq!(form.pet_owner.as_deref(), Some("Ana"));
    }

    #[tokio::test]
    async fn test_payload_json_without_id() {
        let PetPayload(form) =
            PetPayload::from_request(request("application/json", r#"{"name":"Rex"}"#), &())
                .await
                .unwrap();

        assert!(form.id.is_none());
    }

    proptest! {
        #[test]
        fn form_fields_map_one_to_one(
            id in proptest::option::of(".{0,12}"),
            name in proptest::option::of(".{0,12}"),
            animal_species in proptest::option::of(".{0,12}"),
            breed in proptest::option::of(".{0,12}"),
            pet_owner in proptest::option::of(".{0,12}"),
        ) {
            let submission = PetSubmission::from(PetForm {
                id: id.clone(),
                name: name.clone(),
                animal_species: animal_species.clone(),
                breed: breed.clone(),
                pet_owner: pet_owner.clone(),
            });

            prop_assert_eq!(submission.external_id, id);
            prop_assert_eq!(submission.fields.name, name);
            prop_assert_eq!(submission.fields.species, animal_species);
            prop_assert_eq!(submission.fields.breed, breed);
            prop_assert_eq!(submission.fields.owner_name, pet_owner);
        }
    }

    #[test]
    fn test_form_maps_crm_field_names() {
        let form = PetForm {
            id: Some("p1".to_string()),
            name: Some("Rex".to_string()),
            animal_species: Some("dog".to_string()),
            breed: Some("lab".to_string()),
            pet_owner: Some("Ana".to_string()),
        };

        let submission = PetSubmission::from(form);
        assert_eq!(submission.external_id.as_deref(), Some("p1"));
        assert_eq!(submission.fields.species.as_deref(), Some("dog"));
        assert_eq!(submission.fields.owner_name.as_deref(), Some("Ana"));
    }

    #[test]
    fn test_empty_form_has_no_id() {
        let submission = PetSubmission::from(PetForm::default());
        assert!(submission.external_id.is_none());
    }
}
