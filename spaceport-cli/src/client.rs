//! HTTP client for the Spaceport ship API.

use crate::CliResult;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use spaceport_core::{PageRequest, Ship, ShipDraft, ShipFilter};

/// Error payload returned by the server on 4xx/5xx responses.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: String,
}

/// Thin wrapper over the `/rest/ships` endpoints.
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client for the given server URL.
    pub fn new(server_url: &str) -> CliResult<Self> {
        Ok(Self {
            client: Client::builder().build()?,
            base_url: normalize_server_url(server_url)?,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/rest/ships{path}", self.base_url)
    }

    /// Fetch one page of ships matching the filter.
    pub async fn list(&self, filter: &ShipFilter, page: &PageRequest) -> CliResult<Vec<Ship>> {
        let request = self.client.get(self.url("")).query(filter).query(page);
        read_json(request).await
    }

    /// Count ships matching the filter.
    pub async fn count(&self, filter: &ShipFilter) -> CliResult<u64> {
        let request = self.client.get(self.url("/count")).query(filter);
        read_json(request).await
    }

    /// Fetch a ship by id.
    pub async fn get(&self, id: &str) -> CliResult<Ship> {
        let request = self.client.get(self.url(&format!("/{id}")));
        read_json(request).await
    }

    /// Create a ship from a draft.
    pub async fn create(&self, draft: &ShipDraft) -> CliResult<Ship> {
        let request = self.client.post(self.url("")).json(draft);
        read_json(request).await
    }

    /// Update the supplied fields of a ship.
    pub async fn update(&self, id: &str, draft: &ShipDraft) -> CliResult<Ship> {
        let request = self.client.post(self.url(&format!("/{id}"))).json(draft);
        read_json(request).await
    }

    /// Delete a ship.
    pub async fn delete(&self, id: &str) -> CliResult<()> {
        let request = self.client.delete(self.url(&format!("/{id}")));
        send(request).await?;
        Ok(())
    }
}

/// Normalize the server URL for consistent API requests.
fn normalize_server_url(server_url: &str) -> CliResult<String> {
    let trimmed = server_url.trim();
    if trimmed.is_empty() {
        return Err("server url is required".into());
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

async fn send(request: RequestBuilder) -> CliResult<reqwest::Response> {
    let response = request.send().await?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response
        .json::<ErrorResponse>()
        .await
        .map(|body| body.message)
        .unwrap_or_default();
    let error = match status {
        StatusCode::NOT_FOUND => "ship not found".to_string(),
        StatusCode::BAD_REQUEST if !message.is_empty() => format!("bad request: {message}"),
        StatusCode::BAD_REQUEST => "bad request".to_string(),
        _ if !message.is_empty() => format!("server error ({status}): {message}"),
        _ => format!("server error ({status})"),
    };
    Err(error.into())
}

async fn read_json<T: DeserializeOwned>(request: RequestBuilder) -> CliResult<T> {
    let response = send(request).await?;
    Ok(response.json::<T>().await?)
}
