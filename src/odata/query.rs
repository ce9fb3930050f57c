//! Fluent entity-set queries
//!
//! Filter values are typed literals rendered by the builder, so a value
//! typed at the console cannot terminate the literal and extend the
//! expression. `add_query_option` still allows raw expressions.

use crate::config::ODataVersion;
use crate::odata::client::{ODataClient, ODataError, QueryOptions};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::marker::PhantomData;

/// A scalar value on the right-hand side of a filter comparison
#[derive(Debug, Clone, PartialEq)]
pub enum ODataLiteral {
    Null,
    Bool(bool),
    Int(i64),
    Decimal(Decimal),
    String(String),
}

impl ODataLiteral {
    /// Render as OData literal syntax
    pub fn render(&self, version: ODataVersion) -> String {
        match self {
            ODataLiteral::Null => "null".to_string(),
            ODataLiteral::Bool(b) => b.to_string(),
            ODataLiteral::Int(i) => i.to_string(),
            ODataLiteral::Decimal(d) => match version {
                ODataVersion::V4 => d.to_string(),
                ODataVersion::V3 => format!("{}M", d),
            },
            ODataLiteral::String(s) => format!("'{}'", s.replace('\'', "''")),
        }
    }
}

impl From<i64> for ODataLiteral {
    fn from(value: i64) -> Self {
        ODataLiteral::Int(value)
    }
}

impl From<i32> for ODataLiteral {
    fn from(value: i32) -> Self {
        ODataLiteral::Int(value.into())
    }
}

impl From<bool> for ODataLiteral {
    fn from(value: bool) -> Self {
        ODataLiteral::Bool(value)
    }
}

impl From<Decimal> for ODataLiteral {
    fn from(value: Decimal) -> Self {
        ODataLiteral::Decimal(value)
    }
}

impl From<&str> for ODataLiteral {
    fn from(value: &str) -> Self {
        ODataLiteral::String(value.to_string())
    }
}

impl From<String> for ODataLiteral {
    fn from(value: String) -> Self {
        ODataLiteral::String(value)
    }
}

impl<T: Into<ODataLiteral>> From<Option<T>> for ODataLiteral {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(ODataLiteral::Null)
    }
}

/// One page of typed results
#[derive(Debug, Clone)]
pub struct QueryResult<T> {
    /// Server-side total, when requested and supplied
    pub count: Option<i64>,
    pub items: Vec<T>,
    pub next_link: Option<String>,
}

/// Query under construction against one entity set
#[derive(Debug, Clone)]
pub struct EntityQuery<'a, T> {
    client: &'a ODataClient,
    entity_set: String,
    filters: Vec<String>,
    options: QueryOptions,
    _record: PhantomData<fn() -> T>,
}

impl<'a, T> EntityQuery<'a, T> {
    pub(crate) fn new(client: &'a ODataClient, entity_set: &str) -> Self {
        Self {
            client,
            entity_set: entity_set.to_string(),
            filters: Vec::new(),
            options: QueryOptions::default(),
            _record: PhantomData,
        }
    }

    pub fn entity_set_name(&self) -> &str {
        &self.entity_set
    }

    /// `field eq value`; repeated calls are combined with `and`
    pub fn filter_eq(mut self, field: &str, value: impl Into<ODataLiteral>) -> Self {
        let literal = value.into().render(self.client.version());
        self.filters.push(format!("{} eq {}", field, literal));
        self
    }

    pub fn top(mut self, top: usize) -> Self {
        self.options.top = Some(top);
        self
    }

    pub fn skip(mut self, skip: usize) -> Self {
        self.options.skip = Some(skip);
        self
    }

    pub fn select(mut self, fields: &[&str]) -> Self {
        self.options.select = Some(fields.iter().map(|f| f.to_string()).collect());
        self
    }

    pub fn order_by(mut self, expression: &str) -> Self {
        self.options.orderby = Some(expression.to_string());
        self
    }

    /// Ask the server for the total number of matching records
    pub fn include_count(mut self) -> Self {
        self.options.count = true;
        self
    }

    /// Inline a navigation property (parent to children)
    pub fn expand(mut self, navigation: &str) -> Self {
        self.options
            .expand
            .get_or_insert_with(Vec::new)
            .push(navigation.to_string());
        self
    }

    /// Append a raw query option such as `("$filter", "PurchId eq 'P1'")`.
    ///
    /// `$filter` joins the typed filters, `$top` and `$skip` replace the
    /// paging values when they parse; anything else is sent as given.
    pub fn add_query_option(mut self, name: &str, value: impl ToString) -> Self {
        let value = value.to_string();
        match name {
            "$filter" => self.filters.push(value),
            "$top" | "$skip" => match value.parse::<usize>() {
                Ok(n) if name == "$top" => self.options.top = Some(n),
                Ok(n) => self.options.skip = Some(n),
                Err(_) => {
                    tracing::warn!("Passing non-numeric {}={} through unchanged", name, value);
                    self.options.custom.push((name.to_string(), value));
                }
            },
            _ => self.options.custom.push((name.to_string(), value)),
        }
        self
    }

    /// The options that will be sent
    pub fn options(&self) -> QueryOptions {
        let mut options = self.options.clone();
        options.filter = match self.filters.len() {
            0 => None,
            1 => Some(self.filters[0].clone()),
            _ => Some(
                self.filters
                    .iter()
                    .map(|f| format!("({})", f))
                    .collect::<Vec<_>>()
                    .join(" and "),
            ),
        };
        options
    }
}

impl<'a, T: DeserializeOwned> EntityQuery<'a, T> {
    /// Fetch the first page
    pub async fn execute(self) -> Result<QueryResult<T>, ODataError> {
        let options = self.options();
        let response = self
            .client
            .fetch_entity_page(&self.entity_set, None, &options)
            .await?;

        Ok(QueryResult {
            count: response.count,
            items: decode_records(response.value)?,
            next_link: response.next_link,
        })
    }

    /// Fetch every page, following next links
    pub async fn execute_all(self) -> Result<Vec<T>, ODataError> {
        let options = self.options();
        let records = self.client.fetch_all_pages(&self.entity_set, &options).await?;
        decode_records(records)
    }

    /// The single matching record, `None` when nothing matches, and an
    /// error when more than one does.
    pub async fn single_or_default(self) -> Result<Option<T>, ODataError> {
        let entity_set = self.entity_set.clone();
        let mut items = self.top(2).execute().await?.items;
        match items.len() {
            0 => Ok(None),
            1 => Ok(items.pop()),
            count => Err(ODataError::MultipleResults { entity_set, count }),
        }
    }

    /// Number of matching records; uses the server total when it sends
    /// one, otherwise counts the returned page.
    pub async fn count(self) -> Result<i64, ODataError> {
        let result = self.include_count().execute().await?;
        Ok(result.count.unwrap_or(result.items.len() as i64))
    }
}

fn decode_records<T: DeserializeOwned>(records: Vec<Value>) -> Result<Vec<T>, ODataError> {
    records
        .into_iter()
        .map(|record| {
            serde_json::from_value(record).map_err(|e| {
                ODataError::ParseError(format!("Failed to decode record: {}", e))
            })
        })
        .collect()
}
