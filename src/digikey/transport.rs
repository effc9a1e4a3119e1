//! Transport abstraction for the search API.
//!
//! The fetcher only needs two operations: obtain a bearer credential and run one
//! search request with it. [`crate::digikey::DigikeyClient`] implements them over
//! HTTP; tests implement them with scripted responses.

use std::fmt;

use serde_json::Value;

use crate::digikey::error::FetchResult;

/// A bearer credential for the search API.
///
/// The token is passed explicitly through each fetch call so that a refreshed
/// credential is visible to the caller instead of living in global state.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wraps an access token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw access token.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// How the fetcher should treat a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseClass {
    /// 2xx.
    Success,
    /// 401: the credential has expired.
    Unauthorized,
    /// Any other status.
    Failure,
}

/// Status and body of one search response.
#[derive(Debug, Clone)]
pub struct SearchResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: String,
}

impl SearchResponse {
    /// Creates a response.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Classifies the response status.
    #[must_use]
    pub const fn class(&self) -> ResponseClass {
        match self.status {
            200..=299 => ResponseClass::Success,
            401 => ResponseClass::Unauthorized,
            _ => ResponseClass::Failure,
        }
    }
}

/// A search API transport.
pub trait Transport {
    /// Requests a fresh bearer credential.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential cannot be obtained.
    fn get_credential(&self) -> FetchResult<Credential>;

    /// Runs one search request.
    ///
    /// Non-success statuses are returned as a [`SearchResponse`], not as an error.
    ///
    /// # Errors
    ///
    /// Returns an error only if no response was received.
    fn search(&self, payload: &Value, credential: &Credential) -> FetchResult<SearchResponse>;
}
