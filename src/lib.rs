//! Fred ERP client library
//!
//! Demo client for the Fred OData and REST APIs: typed OData queries,
//! purchase order DTOs, and the interactive console that drives them.

pub mod api;
pub mod auth;
pub mod config;
pub mod console;
pub mod http;
pub mod model;
pub mod odata;

pub use api::{ApiClient, ApiError, RestOutcome};
pub use auth::BasicCredentials;
pub use config::{Config, ODataVersion, RuntimeConfig};
pub use console::{Console, ConsoleError, Operations};
pub use model::{PoDetails, PoHeader, PoLine, PurchaseStatus, PurchaseType};
pub use odata::{ODataClient, ODataError, QueryOptions};
