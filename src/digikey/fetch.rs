//! Paginated retrieval of search results.
//!
//! [`fetch_all`] requests the first page, reads the total result count from it and
//! then walks the remaining offsets in increasing order. Every page goes through
//! [`fetch_page`], which refreshes an expired credential once and retries.

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::digikey::error::{FetchError, FetchResult};
use crate::digikey::filter::SearchFilter;
use crate::digikey::transport::{Credential, ResponseClass, SearchResponse, Transport};
use crate::RawRecord;

/// One page of search results.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchResponse {
    /// Products on this page. Absent when the page carries no products.
    #[serde(rename = "Products", default)]
    pub products: Vec<RawRecord>,

    /// Total number of matching products across all pages.
    #[serde(rename = "ProductsCount", default)]
    pub total_count: u64,
}

impl BatchResponse {
    fn from_response(response: &SearchResponse, offset: u64) -> FetchResult<Self> {
        serde_json::from_str(&response.body)
            .map_err(|e| FetchError::invalid_body(format!("search page at offset {offset}"), e))
    }
}

/// Fetches one page, refreshing the credential once on expiry.
///
/// Returns the page together with the credential to use for the next request. When
/// the first attempt is rejected as unauthorised, a fresh credential is requested,
/// the same page is retried once, and the fresh credential is returned.
///
/// # Errors
///
/// Returns an error if the transport fails, if the response (or the retried
/// response) has a non-success status, or if the body is not valid JSON.
pub fn fetch_page<T: Transport + ?Sized>(
    transport: &T,
    filter: &SearchFilter,
    limit: u32,
    offset: u64,
    credential: Credential,
) -> FetchResult<(BatchResponse, Credential)> {
    let payload = filter.payload(limit, offset);
    let response = transport.search(&payload, &credential)?;

    let (response, credential) = match response.class() {
        ResponseClass::Success => (response, credential),
        ResponseClass::Unauthorized => {
            warn!(offset, "Credential expired, requesting a new one");
            let fresh = transport.get_credential()?;
            let retried = transport.search(&payload, &fresh)?;
            if retried.class() != ResponseClass::Success {
                return Err(FetchError::status(retried.status, retried.body));
            }
            (retried, fresh)
        }
        ResponseClass::Failure => {
            return Err(FetchError::status(response.status, response.body));
        }
    };

    let batch = BatchResponse::from_response(&response, offset)?;
    debug!(
        offset,
        products = batch.products.len(),
        total = batch.total_count,
        "Fetched page"
    );
    Ok((batch, credential))
}

/// Number of requests needed to cover `total` results at `page_size` per page.
///
/// At least one request is always made.
#[must_use]
pub const fn page_count(total: u64, page_size: u32) -> u64 {
    let page_size = page_size as u64;
    if page_size == 0 || total <= page_size {
        return 1;
    }
    total.div_ceil(page_size)
}

/// Fetches every page of results for `filter` and returns all products in request order.
///
/// # Errors
///
/// Returns an error if `page_size` is zero, if a credential cannot be obtained, or on
/// any fatal page error. No partial results are returned.
pub fn fetch_all<T: Transport + ?Sized>(
    transport: &T,
    filter: &SearchFilter,
    page_size: u32,
) -> FetchResult<Vec<RawRecord>> {
    if page_size == 0 {
        return Err(FetchError::InvalidPageSize);
    }

    let mut credential = transport.get_credential()?;

    info!(keywords = %filter.keywords, "Getting batch 1");
    let (first, next) = fetch_page(transport, filter, page_size, 0, credential)?;
    credential = next;

    let total = first.total_count;
    info!(total, "Found matching products");

    let mut products = first.products;
    let pages = page_count(total, page_size);

    for index in 1..pages {
        info!(batch = index + 1, of = pages, "Getting batch");
        let offset = index * u64::from(page_size);
        let (batch, next) = fetch_page(transport, filter, page_size, offset, credential)?;
        credential = next;
        products.extend(batch.products);
    }

    Ok(products)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_counts() {
        assert_eq!(page_count(0, 50), 1);
        assert_eq!(page_count(50, 50), 1);
        assert_eq!(page_count(51, 50), 2);
        assert_eq!(page_count(120, 50), 3);
        assert_eq!(page_count(150, 50), 3);
    }

    #[test]
    fn batch_without_products_is_empty() {
        let response = SearchResponse::new(200, r#"{"ProductsCount": 3}"#);
        let batch = BatchResponse::from_response(&response, 0).unwrap();
        assert!(batch.products.is_empty());
        assert_eq!(batch.total_count, 3);
    }

    #[test]
    fn invalid_body_is_an_error() {
        let response = SearchResponse::new(200, "<html>");
        let err = BatchResponse::from_response(&response, 50).unwrap_err();
        assert!(err.to_string().contains("offset 50"));
    }
}
