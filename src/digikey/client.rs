//! Blocking HTTP client for the Digi-Key Product Search API.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::config::ApiConfig;
use crate::digikey::error::{FetchError, FetchResult};
use crate::digikey::transport::{Credential, SearchResponse, Transport};

/// OAuth2 client credentials read from the environment.
#[derive(Clone)]
pub struct ClientCredentials {
    client_id: String,
    client_secret: String,
}

impl ClientCredentials {
    /// Creates credentials from explicit values.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Reads credentials from the environment variables named in `api`.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first variable that is unset or empty.
    pub fn from_env(api: &ApiConfig) -> FetchResult<Self> {
        let read = |var: &str| {
            std::env::var(var)
                .ok()
                .filter(|v| !v.is_empty())
                .ok_or_else(|| FetchError::missing_credential(var))
        };

        Ok(Self::new(
            read(&api.client_id_env)?,
            read(&api.client_secret_env)?,
        ))
    }
}

impl std::fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// [`Transport`] implementation over HTTPS.
#[derive(Debug)]
pub struct DigikeyClient {
    http: Client,
    credentials: ClientCredentials,
    token_url: String,
    search_url: String,
}

impl DigikeyClient {
    /// Creates a client for the endpoints in `api`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(api: &ApiConfig, credentials: ClientCredentials) -> FetchResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(api.timeout_secs))
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| FetchError::network(&api.search_url, e))?;

        Ok(Self {
            http,
            credentials,
            token_url: api.token_url.clone(),
            search_url: api.search_url.clone(),
        })
    }
}

impl Transport for DigikeyClient {
    fn get_credential(&self) -> FetchResult<Credential> {
        let form = [
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("grant_type", "client_credentials"),
        ];

        let response = self
            .http
            .post(&self.token_url)
            .form(&form)
            .send()
            .map_err(|e| FetchError::network(&self.token_url, e))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| FetchError::network(&self.token_url, e))?;

        if !status.is_success() {
            return Err(FetchError::Token {
                status: status.as_u16(),
                message: body,
            });
        }

        let token: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| FetchError::invalid_body("token response", e))?;
        tracing::debug!("Obtained access token");

        Ok(Credential::new(token.access_token))
    }

    fn search(&self, payload: &Value, credential: &Credential) -> FetchResult<SearchResponse> {
        let response = self
            .http
            .post(&self.search_url)
            .header("X-DIGIKEY-Client-Id", &self.credentials.client_id)
            .bearer_auth(credential.token())
            .json(payload)
            .send()
            .map_err(|e| FetchError::network(&self.search_url, e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| FetchError::network(&self.search_url, e))?;

        Ok(SearchResponse::new(status, body))
    }
}
