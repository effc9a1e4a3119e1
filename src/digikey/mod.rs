//! Digi-Key Product Search API access.
//!
//! - [`transport`] — the [`Transport`] seam and credential type
//! - [`client`] — HTTPS implementation of the transport
//! - [`filter`] — category and parametric search filters
//! - [`fetch`] — pagination and credential refresh
//!
//! # Failure policy
//!
//! A 401 response triggers exactly one credential refresh and one retry of the same
//! page. Any other non-success status aborts the whole fetch.

pub mod client;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod transport;

pub use client::{ClientCredentials, DigikeyClient};
pub use error::{FetchError, FetchResult};
pub use fetch::{fetch_all, fetch_page, BatchResponse};
pub use filter::SearchFilter;
pub use transport::{Credential, ResponseClass, SearchResponse, Transport};
