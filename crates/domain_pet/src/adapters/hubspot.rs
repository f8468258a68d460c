//! HubSpot CRM Adapter
//!
//! Implements `PetRecordPort` against the HubSpot CRM v3 objects API, where
//! pet records are stored as a custom object type.
//!
//! # Endpoints
//!
//! | Operation | Request                                              |
//! |-----------|------------------------------------------------------|
//! | search    | `POST {base}/crm/v3/objects/{type}/search`           |
//! | list      | `GET  {base}/crm/v3/objects/{type}?properties=...`   |
//! | create    | `POST {base}/crm/v3/objects/{type}`                  |
//! | update    | `PATCH {base}/crm/v3/objects/{type}/{internalId}`    |
//!
//! Every request carries `Authorization: Bearer <access token>`. There is no
//! retry and no per-request timeout.
//!
//! # Error Handling
//!
//! Non-2xx responses are mapped to `PortError` variants:
//! - 400/422 -> `PortError::Validation`
//! - 401/403 -> `PortError::Unauthorized`
//! - 404 -> `PortError::NotFound`
//! - 409 -> `PortError::Conflict`
//! - 429 -> `PortError::RateLimited`
//! - 5xx -> `PortError::ServiceUnavailable`
//! - Transport failures -> `PortError::Connection`
//! - Undecodable bodies -> `PortError::Transformation`
//! - Other -> `PortError::Internal`

use std::fmt;
use std::time::Instant;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::RETRY_AFTER;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use core_kernel::{
    AdapterHealth, CoreError, DomainPort, ExternalId, HealthCheckResult, HealthCheckable,
    InternalId, PortError,
};

use crate::pet::{PetFields, PetRecord};
use crate::ports::PetRecordPort;
use crate::services::SearchFailurePolicy;

/// Default API host
pub const DEFAULT_BASE_URL: &str = "https://api.hubapi.com";

/// CRM property holding the external id
const EXTERNAL_ID_PROPERTY: &str = "id";

/// Properties requested on every search and list
const PET_PROPERTIES: [&str; 6] = [
    "id",
    "name",
    "animal_species",
    "breed",
    "pet_owner",
    "hs_object_id",
];

/// Seconds to back off when a 429 carries no usable `Retry-After`
const DEFAULT_RETRY_AFTER_SECS: u64 = 10;

/// Connection settings for the CRM
///
/// Loaded once at startup and handed to `HubSpotClient::new`; nothing reads
/// the credential from ambient state afterwards.
#[derive(Clone, Deserialize)]
pub struct CrmConfig {
    /// API host, without a trailing path
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Private app access token
    #[serde(default)]
    pub access_token: String,

    /// Custom object type id (e.g. "2-42115507") or fully qualified name
    #[serde(default)]
    pub object_type: String,

    /// How failed searches are interpreted
    #[serde(default)]
    pub search_failure_policy: SearchFailurePolicy,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl CrmConfig {
    /// Creates a configuration for the given credential and object type
    pub fn new(
        base_url: impl Into<String>,
        access_token: impl Into<String>,
        object_type: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            access_token: access_token.into(),
            object_type: object_type.into(),
            search_failure_policy: SearchFailurePolicy::default(),
        }
    }

    /// Sets the search failure policy
    pub fn with_search_failure_policy(mut self, policy: SearchFailurePolicy) -> Self {
        self.search_failure_policy = policy;
        self
    }

    /// Checks that the settings can address the CRM
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.access_token.trim().is_empty() {
            return Err(CoreError::configuration("CRM access token is not set"));
        }
        if self.object_type.trim().is_empty() {
            return Err(CoreError::configuration("CRM object type is not set"));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(CoreError::configuration(format!(
                "CRM base URL must be http(s): {}",
                self.base_url
            )));
        }
        Ok(())
    }

    /// URL of the object collection
    pub fn collection_url(&self) -> String {
        format!(
            "{}/crm/v3/objects/{}",
            self.base_url.trim_end_matches('/'),
            self.object_type.trim()
        )
    }
}

impl fmt::Debug for CrmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrmConfig")
            .field("base_url", &self.base_url)
            .field("access_token", &"<redacted>")
            .field("object_type", &self.object_type)
            .field("search_failure_policy", &self.search_failure_policy)
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Wire format
// ----------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest<'a> {
    filter_groups: Vec<FilterGroup<'a>>,
    properties: &'a [&'a str],
}

#[derive(Debug, Serialize)]
struct FilterGroup<'a> {
    filters: Vec<Filter<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Filter<'a> {
    property_name: &'a str,
    operator: &'a str,
    value: &'a str,
}

impl<'a> SearchRequest<'a> {
    fn by_external_id(external_id: &'a ExternalId) -> Self {
        Self {
            filter_groups: vec![FilterGroup {
                filters: vec![Filter {
                    property_name: EXTERNAL_ID_PROPERTY,
                    operator: "EQ",
                    value: external_id.as_str(),
                }],
            }],
            properties: &PET_PROPERTIES,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    total: u64,
    #[serde(default)]
    results: Vec<CrmObject>,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    results: Vec<CrmObject>,
}

#[derive(Debug, Deserialize)]
struct CrmObject {
    id: String,
    #[serde(default)]
    properties: PetProperties,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PetProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    animal_species: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    breed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pet_owner: Option<String>,
    #[serde(skip_serializing)]
    hs_object_id: Option<String>,
}

impl PetProperties {
    fn from_fields(external_id: Option<&ExternalId>, fields: &PetFields) -> Self {
        Self {
            id: external_id.map(|id| id.as_str().to_string()),
            name: fields.name.clone(),
            animal_species: fields.species.clone(),
            breed: fields.breed.clone(),
            pet_owner: fields.owner_name.clone(),
            hs_object_id: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct PropertiesEnvelope {
    properties: PetProperties,
}

#[derive(Debug, Deserialize)]
struct CrmErrorBody {
    message: Option<String>,
}

impl CrmObject {
    fn into_record(self) -> Result<PetRecord, PortError> {
        let CrmObject { id, properties } = self;

        let internal_raw = if id.trim().is_empty() {
            properties.hs_object_id.clone().unwrap_or_default()
        } else {
            id
        };
        let internal_id = InternalId::parse(&internal_raw)
            .map_err(|e| PortError::transformation(format!("CRM object without id: {e}")))?;

        let fields = PetFields {
            name: properties.name,
            species: properties.animal_species,
            breed: properties.breed,
            owner_name: properties.pet_owner,
        };

        match properties.id.as_deref().map(ExternalId::parse) {
            Some(Ok(external_id)) => Ok(PetRecord::new(external_id, internal_id, fields)),
            _ => Ok(PetRecord::without_external_id(internal_id, fields)),
        }
    }
}

// ----------------------------------------------------------------------------
// Client
// ----------------------------------------------------------------------------

/// HubSpot CRM client implementing the PetRecordPort trait
///
/// # Example
///
/// ```rust,ignore
/// use domain_pet::adapters::{CrmConfig, HubSpotClient};
///
/// let client = HubSpotClient::new(CrmConfig::new(
///     "https://api.hubapi.com",
///     std::env::var("CRM_ACCESS_TOKEN")?,
///     "2-42115507",
/// ))?;
///
/// let records = client.list_records().await?;
/// ```
#[derive(Debug, Clone)]
pub struct HubSpotClient {
    config: CrmConfig,
    http: reqwest::Client,
}

impl HubSpotClient {
    /// Creates a new client with the given configuration
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Configuration` if the configuration is incomplete
    /// or the HTTP client cannot be built.
    pub fn new(config: CrmConfig) -> Result<Self, CoreError> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .user_agent(concat!("pet-records/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CoreError::configuration(format!("HTTP client: {e}")))?;

        Ok(Self { config, http })
    }

    fn object_url(&self, internal_id: &InternalId) -> String {
        format!("{}/{}", self.config.collection_url(), internal_id)
    }

    /// Sends an authenticated request and decodes a 2xx JSON body
    async fn send<R: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<R, PortError> {
        let response = request
            .bearer_auth(&self.config.access_token)
            .send()
            .await
            .map_err(|e| PortError::connection_from(format!("{operation} request failed"), e))?;

        let status = response.status();
        debug!(operation, status = status.as_u16(), "CRM response");

        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok());
            let body = response.text().await.unwrap_or_default();
            let error = map_status(status, operation, retry_after, &body, &self.config.object_type);
            warn!(operation, status = status.as_u16(), error = %error, "CRM request rejected");
            return Err(error);
        }

        response
            .json::<R>()
            .await
            .map_err(|e| PortError::transformation(format!("{operation} response: {e}")))
    }
}

/// Maps a non-2xx CRM response onto a port error
fn map_status(
    status: StatusCode,
    operation: &str,
    retry_after: Option<u64>,
    body: &str,
    object_type: &str,
) -> PortError {
    let message = serde_json::from_str::<CrmErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| format!("{operation} returned {status}"));

    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => PortError::Validation {
            message,
            field: None,
        },
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PortError::Unauthorized { message },
        StatusCode::NOT_FOUND => PortError::not_found(object_type, operation),
        StatusCode::CONFLICT => PortError::Conflict { message },
        StatusCode::TOO_MANY_REQUESTS => PortError::RateLimited {
            retry_after_secs: retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS),
        },
        s if s.is_server_error() => PortError::ServiceUnavailable {
            service: format!("HubSpot CRM ({s})"),
        },
        _ => PortError::internal(message),
    }
}

impl DomainPort for HubSpotClient {}

#[async_trait]
impl HealthCheckable for HubSpotClient {
    /// Fetches a single object to prove the token and object type are usable
    async fn health_check(&self) -> HealthCheckResult {
        let start = Instant::now();
        let request = self
            .http
            .get(self.config.collection_url())
            .query(&[("limit", "1"), ("properties", EXTERNAL_ID_PROPERTY)]);

        let result: Result<IgnoredAny, PortError> = self.send("health", request).await;
        let latency_ms = start.elapsed().as_millis() as u64;

        let (status, message) = match result {
            Ok(_) => (AdapterHealth::Healthy, None),
            Err(e) if e.is_transient() => (AdapterHealth::Degraded, Some(e.to_string())),
            Err(e) => (AdapterHealth::Unhealthy, Some(e.to_string())),
        };

        HealthCheckResult {
            adapter_id: "hubspot-crm".to_string(),
            status,
            latency_ms,
            message,
            checked_at: Utc::now(),
        }
    }
}

#[async_trait]
impl PetRecordPort for HubSpotClient {
    async fn find_by_external_id(
        &self,
        external_id: &ExternalId,
    ) -> Result<Option<PetRecord>, PortError> {
        let url = format!("{}/search", self.config.collection_url());
        let request = self
            .http
            .post(url)
            .json(&SearchRequest::by_external_id(external_id));

        let response: SearchResponse = self.send("search", request).await?;
        debug!(external_id = %external_id, total = response.total, "CRM search complete");

        if response.total == 0 {
            return Ok(None);
        }
        response
            .results
            .into_iter()
            .next()
            .map(CrmObject::into_record)
            .transpose()
    }

    async fn list_records(&self) -> Result<Vec<PetRecord>, PortError> {
        let request = self
            .http
            .get(self.config.collection_url())
            .query(&[("properties", PET_PROPERTIES.join(","))]);

        let response: ListResponse = self.send("list", request).await?;

        let records = response
            .results
            .into_iter()
            .filter_map(|object| match object.into_record() {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable CRM object");
                    None
                }
            })
            .collect();
        Ok(records)
    }

    async fn create_record(
        &self,
        external_id: &ExternalId,
        fields: &PetFields,
    ) -> Result<InternalId, PortError> {
        let body = PropertiesEnvelope {
            properties: PetProperties::from_fields(Some(external_id), fields),
        };
        let request = self.http.post(self.config.collection_url()).json(&body);

        let created: CrmObject = self.send("create", request).await?;
        InternalId::parse(&created.id)
            .map_err(|e| PortError::transformation(format!("create response: {e}")))
    }

    async fn update_record(
        &self,
        internal_id: &InternalId,
        fields: &PetFields,
    ) -> Result<(), PortError> {
        let body = PropertiesEnvelope {
            properties: PetProperties::from_fields(None, fields),
        };
        let request = self.http.patch(self.object_url(internal_id)).json(&body);

        let _: IgnoredAny = self.send("update", request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> CrmConfig {
        CrmConfig::new("https://api.hubapi.com/", "pat-na1-token", "2-42115507")
    }

    #[test]
    fn test_collection_url_trims_trailing_slash() {
        assert_eq!(
            config().collection_url(),
            "https://api.hubapi.com/crm/v3/objects/2-42115507"
        );
    }

    #[test]
    fn test_validate_rejects_missing_token() {
        let config = CrmConfig::new(DEFAULT_BASE_URL, " ", "2-42115507");
        assert!(matches!(config.validate(), Err(CoreError::Configuration(_))));
    }

    #[test]
    fn test_validate_rejects_missing_object_type() {
        let config = CrmConfig::new(DEFAULT_BASE_URL, "token", "");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_http_base() {
        let config = CrmConfig::new("ftp://example.com", "token", "2-1");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_token() {
        let rendered = format!("{:?}", config());
        assert!(!rendered.contains("pat-na1-token"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_search_request_shape() {
        let id = ExternalId::parse("p1").unwrap();
        let body = serde_json::to_value(SearchRequest::by_external_id(&id)).unwrap();
        assert_eq!(
            body,
            json!({
                "filterGroups": [{
                    "filters": [{ "propertyName": "id", "operator": "EQ", "value": "p1" }]
                }],
                "properties": ["id", "name", "animal_species", "breed", "pet_owner", "hs_object_id"]
            })
        );
    }

    #[test]
    fn test_update_body_omits_external_id_and_unset_fields() {
        let fields = PetFields {
            name: Some("Rex".to_string()),
            breed: Some(String::new()),
            ..Default::default()
        };
        let body = serde_json::to_value(PropertiesEnvelope {
            properties: PetProperties::from_fields(None, &fields),
        })
        .unwrap();
        assert_eq!(body, json!({ "properties": { "name": "Rex", "breed": "" } }));
    }

    #[test]
    fn test_object_maps_to_record() {
        let object: CrmObject = serde_json::from_value(json!({
            "id": "512",
            "properties": {
                "id": "p1",
                "name": "Rex",
                "animal_species": "dog",
                "breed": null,
                "pet_owner": "Ana",
                "hs_object_id": "512"
            },
            "archived": false
        }))
        .unwrap();

        let record = object.into_record().unwrap();
        assert_eq!(record.external_id_or_empty(), "p1");
        assert_eq!(record.internal_id.as_str(), "512");
        assert_eq!(record.fields.species.as_deref(), Some("dog"));
        assert_eq!(record.fields.breed, None);
        assert_eq!(record.fields.owner_name.as_deref(), Some("Ana"));
    }

    #[test]
    fn test_object_without_external_id_keeps_fields() {
        let object: CrmObject = serde_json::from_value(json!({
            "id": "513",
            "properties": { "id": "  ", "name": "Nameless" }
        }))
        .unwrap();

        let record = object.into_record().unwrap();
        assert_eq!(record.external_id, None);
        assert_eq!(record.internal_id.as_str(), "513");
        assert_eq!(record.fields.name.as_deref(), Some("Nameless"));
    }

    #[test]
    fn test_object_keeps_padded_external_id() {
        let object: CrmObject = serde_json::from_value(json!({
            "id": "514",
            "properties": { "id": " p1" }
        }))
        .unwrap();

        let record = object.into_record().unwrap();
        assert_eq!(record.external_id_or_empty(), " p1");
    }

    #[test]
    fn test_object_without_any_id_is_rejected() {
        let object: CrmObject = serde_json::from_value(json!({
            "id": "",
            "properties": { "id": "p1" }
        }))
        .unwrap();

        assert!(matches!(
            object.into_record(),
            Err(PortError::Transformation { .. })
        ));
    }

    #[test]
    fn test_map_status_variants() {
        let body = r#"{"status":"error","message":"Property values were not valid"}"#;
        match map_status(StatusCode::BAD_REQUEST, "create", None, body, "2-1") {
            PortError::Validation { message, .. } => {
                assert_eq!(message, "Property values were not valid")
            }
            other => panic!("unexpected {other:?}"),
        }

        assert!(matches!(
            map_status(StatusCode::UNAUTHORIZED, "list", None, "", "2-1"),
            PortError::Unauthorized { .. }
        ));
        assert!(map_status(StatusCode::NOT_FOUND, "update", None, "", "2-1").is_not_found());
        assert!(matches!(
            map_status(StatusCode::CONFLICT, "create", None, "", "2-1"),
            PortError::Conflict { .. }
        ));
        assert!(matches!(
            map_status(StatusCode::TOO_MANY_REQUESTS, "search", Some(3), "", "2-1"),
            PortError::RateLimited { retry_after_secs: 3 }
        ));
        assert!(matches!(
            map_status(StatusCode::TOO_MANY_REQUESTS, "search", None, "", "2-1"),
            PortError::RateLimited { retry_after_secs: DEFAULT_RETRY_AFTER_SECS }
        ));
        assert!(matches!(
            map_status(StatusCode::BAD_GATEWAY, "list", None, "<html>", "2-1"),
            PortError::ServiceUnavailable { .. }
        ));
        assert!(matches!(
            map_status(StatusCode::IM_A_TEAPOT, "list", None, "", "2-1"),
            PortError::Internal { .. }
        ));
    }
}
