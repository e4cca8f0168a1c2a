//! Inventory service API client.
//!
//! Wraps the REST endpoints (`/auth/*`, `/products`) and owns the
//! [`SessionManager`] so every product-collection call can attach the bearer
//! token and react to a 401 by forcing a logout.

mod auth;
mod products;
mod response;

use reqwest::Client;

use crate::config::normalize_base_url;
use crate::session::SessionManager;

/// Inventory service API client.
pub struct InventoryApi {
    pub(crate) client: Client,
    pub(crate) base_url: String,
    pub(crate) session: SessionManager,
}

impl InventoryApi {
    /// Creates a client for the service at `base_url` using `session` for credentials.
    pub fn new(base_url: &str, session: SessionManager) -> Self {
        let base_url = normalize_base_url(base_url);
        log::info!("Creating inventory API client for {}", base_url);
        Self {
            client: Client::new(),
            base_url,
            session,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionManager {
        &mut self.session
    }

    pub(crate) fn products_url(&self) -> String {
        format!("{}/products", self.base_url)
    }

    pub(crate) fn product_url(&self, id: i64) -> String {
        format!("{}/products/{}", self.base_url, id)
    }
}

#[cfg(test)]
#[path = "tests/mod.rs"]
mod tests;
