//! HTTP client for the BindPlane REST API.

use async_trait::async_trait;
use bpconsole_parameters::{ParameterDefinition, ResourceKind};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, error, instrument};

use crate::apply::ResourceApplier;
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::resource::{Resource, ResourceType};
use crate::status::{ApplyResponse, ResourceStatus};

/// Header carrying an API key.
pub const API_KEY_HEADER: &str = "X-Bindplane-Api-Key";

/// Extract a human-readable message from a JSON error body.
///
/// Tries `message`, then `error`, then falls back to the raw body.
fn extract_error_message(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        if let Some(msg) = json.get("message").and_then(|v| v.as_str()) {
            return msg.to_string();
        }
        if let Some(err) = json.get("error").and_then(|v| v.as_str()) {
            return err.to_string();
        }
    }
    body.to_string()
}

#[derive(Debug, Clone)]
enum Auth {
    None,
    ApiKey(String),
    Basic {
        username: String,
        password: Option<String>,
    },
}

/// Client for the BindPlane API.
#[derive(Debug, Clone)]
pub struct BindPlaneClient {
    client: Client,
    base_url: String,
    auth: Auth,
}

impl BindPlaneClient {
    /// Build a client from loaded configuration. An API key takes precedence
    /// over basic credentials.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("bpconsole/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let auth = match (&config.api_key, &config.username) {
            (Some(key), _) => Auth::ApiKey(key.clone()),
            (None, Some(username)) => Auth::Basic {
                username: username.clone(),
                password: config.password.clone(),
            },
            (None, None) => Auth::None,
        };

        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
            auth,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self.client.request(method, url);
        match &self.auth {
            Auth::None => builder,
            Auth::ApiKey(key) => builder.header(API_KEY_HEADER, key),
            Auth::Basic { username, password } => builder.basic_auth(username, password.as_ref()),
        }
    }

    /// Map an HTTP response to a `ClientError` based on status code.
    async fn check_response(&self, response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let status_code = status.as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = extract_error_message(&body);

        match status_code {
            401 => Err(ClientError::Unauthorized(message)),
            403 => Err(ClientError::Forbidden(message)),
            404 => Err(ClientError::NotFound(message)),
            _ => Err(ClientError::Api {
                status: status_code,
                body: message,
            }),
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = builder.send().await.inspect_err(|e| {
            error!(error = %e, "request to BindPlane failed");
        })?;
        let response = self.check_response(response).await?;
        Ok(response.json().await?)
    }

    async fn post_resources(&self, path: &str, resources: Vec<Resource>) -> Result<Vec<ResourceStatus>> {
        let body = json!({ "resources": resources });
        let response: ApplyResponse = self.send(self.request(Method::POST, path).json(&body)).await?;
        debug!(updates = response.updates.len(), "received updates");
        Ok(response.updates)
    }

    /// Fetch one resource by name.
    #[instrument(skip(self))]
    pub async fn get_resource(&self, kind: ResourceKind, name: &str) -> Result<Resource> {
        let path = format!("/v1/{}/{}", kind.plural(), urlencoding::encode(name));
        let value: Value = self.send(self.request(Method::GET, &path)).await?;
        Ok(serde_json::from_value(unwrap_document(value))?)
    }

    /// List every resource of `kind`.
    #[instrument(skip(self))]
    pub async fn list_resources(&self, kind: ResourceKind) -> Result<Vec<Resource>> {
        let path = format!("/v1/{}", kind.plural());
        let value: Value = self.send(self.request(Method::GET, &path)).await?;
        Ok(serde_json::from_value(unwrap_collection(value))?)
    }

    /// Names already taken by resources of `kind`, for name validation.
    pub async fn existing_names(&self, kind: ResourceKind) -> Result<Vec<String>> {
        Ok(self
            .list_resources(kind)
            .await?
            .into_iter()
            .map(|resource| resource.metadata.name)
            .collect())
    }

    /// Fetch the type describing a resource of `kind` (for example the source
    /// type behind a source).
    #[instrument(skip(self))]
    pub async fn get_resource_type(&self, kind: ResourceKind, type_name: &str) -> Result<ResourceType> {
        let type_kind = kind.type_kind().unwrap_or(kind);
        let path = format!("/v1/{}/{}", type_kind.plural(), urlencoding::encode(type_name));
        let value: Value = self.send(self.request(Method::GET, &path)).await?;
        Ok(serde_json::from_value(unwrap_document(value))?)
    }

    /// The parameter definitions of a resource type.
    pub async fn parameter_definitions(
        &self,
        kind: ResourceKind,
        type_name: &str,
    ) -> Result<Vec<ParameterDefinition>> {
        let resource_type = self.get_resource_type(kind, type_name).await?;
        Ok(resource_type.spec.parameters)
    }
}

#[async_trait]
impl ResourceApplier for BindPlaneClient {
    #[instrument(skip(self, resources), fields(count = resources.len()))]
    async fn apply(&self, resources: Vec<Resource>) -> Result<Vec<ResourceStatus>> {
        self.post_resources("/v1/apply", resources).await
    }

    #[instrument(skip(self, resources), fields(count = resources.len()))]
    async fn delete(&self, resources: Vec<Resource>) -> Result<Vec<ResourceStatus>> {
        self.post_resources("/v1/delete", resources).await
    }
}

/// Single-resource responses may wrap the document, as in `{"source": {...}}`.
fn unwrap_document(value: Value) -> Value {
    if let Value::Object(map) = &value {
        if map.len() == 1 && !map.contains_key("kind") {
            if let Some(inner) = map.values().next() {
                return inner.clone();
            }
        }
    }
    value
}

/// List responses may wrap the array, as in `{"sources": [...]}`.
fn unwrap_collection(value: Value) -> Value {
    if let Value::Object(map) = &value {
        if let Some(items) = map.values().find(|v| v.is_array()) {
            return items.clone();
        }
        return Value::Array(Vec::new());
    }
    value
}
