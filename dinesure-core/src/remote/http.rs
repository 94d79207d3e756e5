//! HTTP client for the managed document store.
//!
//! Speaks a small JSON REST contract:
//!
//! ```text
//! POST  {base}/v1/collections/{collection}/documents       {"fields": {...}}  -> {"id": "..."}
//! POST  {base}/v1/collections/{collection}/query           <Query>            -> {"documents": [...]}
//! PATCH {base}/v1/collections/{collection}/documents/{id}  {"fields": {...}}  -> 2xx
//! ```
//!
//! Requests carry `Authorization: Bearer <api_key>` when a key is configured.

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};

use super::{Document, Fields, Query, RemoteError, RemoteStore};

#[derive(Serialize)]
struct FieldsBody {
    fields: Fields,
}

#[derive(Deserialize)]
struct InsertResponse {
    id: String,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    documents: Vec<Document>,
}

#[derive(Debug, Clone)]
pub struct HttpRemoteStore {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpRemoteStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self, collection: &str) -> String {
        format!(
            "{}/v1/collections/{}",
            self.base_url,
            urlencoding::encode(collection)
        )
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    async fn check(response: Response) -> Result<Response, RemoteError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(RemoteError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    async fn insert_one(&self, collection: &str, fields: Fields) -> Result<String, RemoteError> {
        let url = format!("{}/documents", self.collection_url(collection));
        let response = self
            .authorize(self.client.post(&url))
            .json(&FieldsBody { fields })
            .send()
            .await?;

        let created: InsertResponse = Self::check(response).await?.json().await?;
        Ok(created.id)
    }

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, RemoteError> {
        let url = format!("{}/query", self.collection_url(collection));
        let response = self
            .authorize(self.client.post(&url))
            .json(query)
            .send()
            .await?;

        let result: QueryResponse = Self::check(response).await?.json().await?;
        Ok(result.documents)
    }

    async fn replace_fields(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
    ) -> Result<(), RemoteError> {
        let url = format!(
            "{}/documents/{}",
            self.collection_url(collection),
            urlencoding::encode(id)
        );
        let response = self
            .authorize(self.client.patch(&url))
            .json(&FieldsBody { fields })
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(RemoteError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        Self::check(response).await?;
        Ok(())
    }
}
