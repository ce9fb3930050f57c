//! HTTP helper
//!
//! Shared `reqwest::Client` construction for the OData and REST clients.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use std::time::Duration;

/// All payloads are exchanged as JSON
pub const MEDIA_TYPE_JSON: &str = "application/json";

/// Build a client that negotiates JSON and bounds every request by `timeout`
pub fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(MEDIA_TYPE_JSON));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(MEDIA_TYPE_JSON));

    Client::builder()
        .default_headers(headers)
        .timeout(timeout)
        .build()
}
