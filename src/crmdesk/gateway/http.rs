//! REST binding of the gateway.
//!
//! For a record type whose collection is `c`:
//!
//! ```text
//! GET    {base}/c/        -> [record, ...]
//! POST   {base}/c/        -> record
//! PUT    {base}/c/{id}    -> record
//! DELETE {base}/c/{id}    -> any 2xx
//! ```
//!
//! No timeout is configured on the client: a request that never answers
//! stays pending.

use super::Gateway;
use crate::config::DeskConfig;
use crate::error::{CrmError, Result};
use crate::model::{Record, RecordId};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Why a request did not produce a usable answer.
#[derive(Debug)]
enum Failure {
    NotFound,
    Status(StatusCode, String),
    Transport(String),
    Decode(String),
}

impl Failure {
    fn describe(&self) -> String {
        match self {
            Failure::NotFound => "not found".to_string(),
            Failure::Status(status, body) if body.is_empty() => format!("HTTP {status}"),
            Failure::Status(status, body) => format!("HTTP {status}: {body}"),
            Failure::Transport(e) => format!("request failed: {e}"),
            Failure::Decode(e) => format!("invalid response body: {e}"),
        }
    }

    fn into_load_error(self) -> CrmError {
        CrmError::LoadFailure(self.describe())
    }

    fn into_mutation_error(self, id: Option<&RecordId>) -> CrmError {
        match (self, id) {
            (Failure::NotFound, Some(id)) => CrmError::NotFound(id.clone()),
            (other, _) => CrmError::MutationFailure(other.describe()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| CrmError::Config(format!("cannot build HTTP client: {e}")))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            client,
            base_url,
            token: None,
        })
    }

    pub fn from_config(config: &DeskConfig) -> Result<Self> {
        Ok(Self::new(&config.api_base_url)?.with_token(config.api_token.clone()))
    }

    /// Sends `Authorization: Bearer <token>` on every request.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url<R: Record>(&self) -> String {
        format!("{}/{}/", self.base_url, R::COLLECTION)
    }

    fn record_url<R: Record>(&self, id: &RecordId) -> String {
        format!("{}/{}/{}", self.base_url, R::COLLECTION, id)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn execute(&self, request: RequestBuilder, what: &str) -> std::result::Result<Response, Failure> {
        let response = request.send().await.map_err(|e| {
            warn!("{what}: {e}");
            Failure::Transport(e.to_string())
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!("{what}: backend answered {status}: {body}");
        if status == StatusCode::NOT_FOUND {
            Err(Failure::NotFound)
        } else {
            Err(Failure::Status(status, body))
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response, what: &str) -> std::result::Result<T, Failure> {
        response.json::<T>().await.map_err(|e| {
            warn!("{what}: cannot decode response: {e}");
            Failure::Decode(e.to_string())
        })
    }
}

#[async_trait]
impl<R: Record> Gateway<R> for HttpGateway {
    async fn list(&self) -> Result<Vec<R>> {
        let url = self.collection_url::<R>();
        debug!("GET {url}");
        let what = format!("list {}", R::NOUN_PLURAL);

        let response = self
            .execute(self.request(Method::GET, &url), &what)
            .await
            .map_err(Failure::into_load_error)?;
        Self::decode(response, &what)
            .await
            .map_err(Failure::into_load_error)
    }

    async fn create(&self, draft: &R::Draft) -> Result<R> {
        let url = self.collection_url::<R>();
        debug!("POST {url}");
        let what = format!("create {}", R::NOUN);

        let response = self
            .execute(self.request(Method::POST, &url).json(draft), &what)
            .await
            .map_err(|f| f.into_mutation_error(None))?;
        Self::decode(response, &what)
            .await
            .map_err(|f| f.into_mutation_error(None))
    }

    async fn update(&self, id: &RecordId, draft: &R::Draft) -> Result<R> {
        let url = self.record_url::<R>(id);
        debug!("PUT {url}");
        let what = format!("update {} {id}", R::NOUN);

        let response = self
            .execute(self.request(Method::PUT, &url).json(draft), &what)
            .await
            .map_err(|f| f.into_mutation_error(Some(id)))?;
        Self::decode(response, &what)
            .await
            .map_err(|f| f.into_mutation_error(Some(id)))
    }

    async fn delete(&self, id: &RecordId) -> Result<()> {
        let url = self.record_url::<R>(id);
        debug!("DELETE {url}");
        let what = format!("delete {} {id}", R::NOUN);

        self.execute(self.request(Method::DELETE, &url), &what)
            .await
            .map(|_| ())
            .map_err(|f| f.into_mutation_error(Some(id)))
    }
}
