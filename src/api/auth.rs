//! Login and registration.

use log::{debug, info};

use crate::error::{ClientError, Result};
use crate::models::{server_message, Credentials, Registration, TokenResponse};

use super::response::parse_json;
use super::InventoryApi;

impl InventoryApi {
    /// Exchanges credentials for a bearer token and starts the session.
    ///
    /// On rejection nothing is stored and the server's message is returned as
    /// `AuthFailure`.
    pub async fn login(&mut self, credentials: &Credentials) -> Result<()> {
        validate_credentials(&credentials.username, &credentials.password)?;

        let url = format!("{}/auth/login", self.base_url);
        debug!("Logging in as {} at {url}", credentials.username);

        let response = self.client.post(&url).form(credentials).send().await?;
        let status = response.status();
        debug!("Login response status: {status}");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            info!("Login failed with status {status}: {body}");
            return Err(ClientError::AuthFailure(
                server_message(&body).unwrap_or_else(|| "Login failed".to_string()),
            ));
        }

        let token: TokenResponse = parse_json(response).await?;
        if token.access_token.trim().is_empty() {
            return Err(ClientError::AuthFailure(
                "Login failed: server returned an empty token".to_string(),
            ));
        }
        self.session.begin(token.access_token);
        Ok(())
    }

    /// Creates an account, then signs in with the same credentials.
    pub async fn register(&mut self, registration: &Registration) -> Result<()> {
        validate_credentials(&registration.email, &registration.password)?;

        let url = format!("{}/auth/register", self.base_url);
        debug!("Registering {} at {url}", registration.email);

        let response = self.client.post(&url).json(registration).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            info!("Registration failed with status {status}: {body}");
            return Err(ClientError::AuthFailure(
                server_message(&body).unwrap_or_else(|| "Registration failed".to_string()),
            ));
        }

        info!("Registered {}, signing in", registration.email);
        self.login(&Credentials {
            username: registration.email.clone(),
            password: registration.password.clone(),
        })
        .await
    }
}

fn validate_credentials(email: &str, password: &str) -> Result<()> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(ClientError::Validation(
            "Email and password required".to_string(),
        ));
    }
    Ok(())
}
