//! OData module
//!
//! HTTP client, query builder and entity projections for the Fred OData
//! service

pub mod client;
pub mod entities;
pub mod printer;
pub mod query;

pub use client::{ODataClient, ODataError, ODataResponse, QueryOptions};
pub use entities::{CustTable, Entity, PurchTable, TaxOnItem, VendTable};
pub use printer::{print_top, PrintError};
pub use query::{EntityQuery, ODataLiteral, QueryResult};
