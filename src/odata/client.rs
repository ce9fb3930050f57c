//! OData Client module
//!
//! HTTP client for the Fred OData service. Supports OData v3 and v4
//! payloads and query conventions.

use crate::auth::BasicCredentials;
use crate::config::{ODataVersion, RuntimeConfig};
use crate::http::build_client;
use crate::odata::entities::Entity;
use crate::odata::query::EntityQuery;
use reqwest::{Client, Response, StatusCode, Url};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// OData client errors
#[derive(Error, Debug)]
pub enum ODataError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Server error ({0}): {1}")]
    ServerError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Expected at most one {entity_set} record, got {count}")]
    MultipleResults { entity_set: String, count: usize },
}

fn invalid_url(e: impl std::fmt::Display) -> ODataError {
    ODataError::InvalidUrl(e.to_string())
}

/// Query options for OData requests
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOptions {
    pub select: Option<Vec<String>>,
    pub filter: Option<String>,
    pub top: Option<usize>,
    pub skip: Option<usize>,
    pub orderby: Option<String>,
    pub expand: Option<Vec<String>>,
    pub count: bool, // Include the total count in the response
    /// Extra options passed through verbatim
    pub custom: Vec<(String, String)>,
}

impl QueryOptions {
    /// Build the (unencoded) query parameters from options
    pub fn to_query_pairs(&self, version: ODataVersion) -> Vec<(String, String)> {
        let mut params = Vec::new();

        if let Some(ref select) = self.select {
            params.push(("$select".to_string(), select.join(",")));
        }

        if let Some(ref filter) = self.filter {
            params.push(("$filter".to_string(), filter.clone()));
        }

        if let Some(top) = self.top {
            params.push(("$top".to_string(), top.to_string()));
        }

        if let Some(skip) = self.skip {
            params.push(("$skip".to_string(), skip.to_string()));
        }

        if let Some(ref orderby) = self.orderby {
            params.push(("$orderby".to_string(), orderby.clone()));
        }

        if let Some(ref expand) = self.expand {
            params.push(("$expand".to_string(), expand.join(",")));
        }

        if self.count {
            match version {
                ODataVersion::V4 => params.push(("$count".to_string(), "true".to_string())),
                ODataVersion::V3 => {
                    params.push(("$inlinecount".to_string(), "allpages".to_string()))
                }
            }
        }

        params.extend(self.custom.iter().cloned());
        params
    }

    /// Build query string from options, for logging
    pub fn to_query_string(&self, version: ODataVersion) -> String {
        let params: Vec<String> = self
            .to_query_pairs(version)
            .into_iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();

        if params.is_empty() {
            String::new()
        } else {
            format!("?{}", params.join("&"))
        }
    }
}

/// OData collection response with paging support
#[derive(Debug, Deserialize)]
pub struct ODataResponse {
    #[serde(rename = "@odata.context", alias = "odata.metadata")]
    pub context: Option<String>,

    #[serde(rename = "@odata.nextLink", alias = "odata.nextLink")]
    pub next_link: Option<String>,

    #[serde(
        rename = "@odata.count",
        alias = "odata.count",
        default,
        deserialize_with = "count_from_number_or_string"
    )]
    pub count: Option<i64>,

    #[serde(default)]
    pub value: Vec<Value>,
}

/// v3 services send the inline count as a string
fn count_from_number_or_string<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid count: {}", n))),
        Some(Value::String(s)) => s
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid count: {}", s))),
        Some(other) => Err(serde::de::Error::custom(format!("invalid count: {}", other))),
    }
}

/// OData client for the Fred service
#[derive(Debug, Clone)]
pub struct ODataClient {
    endpoint: Url,
    version: ODataVersion,
    credentials: Option<BasicCredentials>,
    http_client: Client,
}

impl ODataClient {
    /// Create a new OData client
    ///
    /// # Arguments
    /// * `endpoint` - Service root URL (e.g., "https://fred.example.com/odata/")
    /// * `version` - Protocol version spoken by the service
    /// * `credentials` - Basic credentials, if the service requires them
    /// * `timeout` - Upper bound for every request
    pub fn new(
        endpoint: Url,
        version: ODataVersion,
        credentials: Option<BasicCredentials>,
        timeout: Duration,
    ) -> Result<Self, ODataError> {
        // Ensure endpoint ends with /
        let endpoint = if endpoint.path().ends_with('/') {
            endpoint
        } else {
            Url::parse(&format!("{}/", endpoint)).map_err(invalid_url)?
        };

        Ok(Self {
            endpoint,
            version,
            credentials,
            http_client: build_client(timeout)?,
        })
    }

    pub fn from_config(config: &RuntimeConfig) -> Result<Self, ODataError> {
        Self::new(
            config.odata_base_url.clone(),
            config.odata_version,
            config.credentials(),
            config.http_timeout,
        )
    }

    /// Start a query against an arbitrary entity set
    pub fn query<T>(&self, entity_set: &str) -> EntityQuery<'_, T> {
        EntityQuery::new(self, entity_set)
    }

    /// Start a query against the entity set `T` is exposed as
    pub fn entity_set<T: Entity>(&self) -> EntityQuery<'_, T> {
        self.query(T::ENTITY_SET)
    }

    /// Full URL for an entity set with the given options applied
    pub fn entity_url(&self, entity: &str, options: &QueryOptions) -> Result<Url, ODataError> {
        let mut url = self.endpoint.join(entity).map_err(invalid_url)?;
        let pairs = options.to_query_pairs(self.version);
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(url)
    }

    /// Execute a single GET; no retries
    async fn execute(&self, url: Url) -> Result<Response, ODataError> {
        let mut request = self.http_client.get(url);
        request = match self.version {
            ODataVersion::V4 => request
                .header("OData-MaxVersion", "4.0")
                .header("OData-Version", "4.0"),
            ODataVersion::V3 => request
                .header("MaxDataServiceVersion", "3.0")
                .header("DataServiceVersion", "3.0"),
        };
        if let Some(ref credentials) = self.credentials {
            request = credentials.apply(request);
        }

        let response = request.send().await?;

        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::NOT_FOUND => {
                let body = response.text().await.unwrap_or_default();
                Err(ODataError::NotFound(body))
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                tracing::warn!("OData request failed ({}): {}", status, body);
                Err(ODataError::ServerError(status.as_u16(), body))
            }
        }
    }

    /// Fetch one page of entity data
    ///
    /// # Arguments
    /// * `entity` - Entity set name (e.g., "CustTables")
    /// * `next_link` - Optional next page URL from previous response
    /// * `options` - Query options
    pub async fn fetch_entity_page(
        &self,
        entity: &str,
        next_link: Option<&str>,
        options: &QueryOptions,
    ) -> Result<ODataResponse, ODataError> {
        let url = match next_link {
            Some(link) => self.endpoint.join(link).map_err(invalid_url)?,
            None => self.entity_url(entity, options)?,
        };

        tracing::debug!("Fetching: {}", url);

        let response = self.execute(url).await?;

        let odata_response: ODataResponse = response.json().await.map_err(|e| {
            ODataError::ParseError(format!("Failed to parse OData response: {}", e))
        })?;

        tracing::debug!(
            "Fetched {} records, next_link: {:?}",
            odata_response.value.len(),
            odata_response.next_link.is_some()
        );

        Ok(odata_response)
    }

    /// Fetch all pages for an entity
    pub async fn fetch_all_pages(
        &self,
        entity: &str,
        options: &QueryOptions,
    ) -> Result<Vec<Value>, ODataError> {
        let mut all_records = Vec::new();
        let mut next_link: Option<String> = None;
        let mut page = 0;

        loop {
            page += 1;
            let response = self
                .fetch_entity_page(entity, next_link.as_deref(), options)
                .await?;

            tracing::info!("Page {}: fetched {} records", page, response.value.len());

            all_records.extend(response.value);

            match response.next_link {
                Some(link) if next_link.as_deref() == Some(link.as_str()) => {
                    return Err(ODataError::ParseError(format!(
                        "Server repeated next link {} after page {}",
                        link, page
                    )));
                }
                Some(link) => next_link = Some(link),
                None => break,
            }
        }

        tracing::info!("Total records fetched: {}", all_records.len());
        Ok(all_records)
    }

    /// Get endpoint URL
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Get protocol version
    pub fn version(&self) -> ODataVersion {
        self.version
    }
}
