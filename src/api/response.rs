//! Status-code handling shared by the authenticated endpoints.

use log::{debug, info};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::{ClientError, Result};
use crate::models::server_message;

use super::InventoryApi;

impl InventoryApi {
    /// Returns the `Authorization` value, or `NotSignedIn` without touching the network.
    pub(crate) fn require_credential(&self) -> Result<String> {
        self.session
            .current_credential_header()
            .ok_or(ClientError::NotSignedIn)
    }

    /// Passes 2xx responses through. A 401 forces logout; anything else
    /// becomes a `Server` error carrying the body text, or `fallback` if empty.
    pub(crate) async fn ensure_success(
        &mut self,
        response: Response,
        fallback: &str,
    ) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED {
            info!("{} returned 401", response.url().path());
            self.session.force_logout();
            return Err(ClientError::SessionExpired);
        }

        let body = response.text().await.unwrap_or_default();
        info!("Request failed with status {status}: {body}");
        Err(ClientError::Server {
            status,
            message: server_message(&body).unwrap_or_else(|| format!("{fallback} ({status})")),
        })
    }
}

/// Reads the body as text first so it can be logged, then parses it.
pub(crate) async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let text = response.text().await?;
    debug!("Response body: {text}");
    Ok(serde_json::from_str(&text)?)
}
