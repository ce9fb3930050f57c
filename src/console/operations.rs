//! The canned operations behind the menu
//!
//! Each operation returns data; formatting for the console happens in the
//! dispatcher.

use crate::api::{ApiClient, ApiError, RestOutcome};
use crate::config::RuntimeConfig;
use crate::model::PoDetails;
use crate::odata::{
    print_top, CustTable, Entity, ODataClient, ODataError, PrintError, PurchTable, TaxOnItem,
    VendTable,
};
use std::io::Write;

/// Operations against one configured Fred environment
#[derive(Debug)]
pub struct Operations {
    config: RuntimeConfig,
    container: ODataClient,
}

impl Operations {
    pub fn new(config: RuntimeConfig) -> Result<Self, ODataError> {
        let container = ODataClient::from_config(&config)?;
        Ok(Self { config, container })
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Total number of customer records
    pub async fn count_customers(&self) -> Result<i64, ODataError> {
        self.container.entity_set::<CustTable>().count().await
    }

    pub async fn customer_by_id(&self, rec_id: i64) -> Result<Option<CustTable>, ODataError> {
        self.container
            .entity_set::<CustTable>()
            .filter_eq("RecId", rec_id)
            .single_or_default()
            .await
    }

    /// Print the first tax-on-item records field by field
    pub async fn print_tax_on_items<W: Write>(&self, out: &mut W) -> Result<usize, PrintError> {
        let context = ODataClient::from_config(&self.config)?;
        print_top::<TaxOnItem, _>(&context, TaxOnItem::ENTITY_SET, out).await
    }

    pub async fn create_purchase_order(&self, details: &PoDetails) -> Result<RestOutcome, ApiError> {
        let client = ApiClient::from_config(&self.config)?;
        client.create_purchase_order(details).await
    }

    pub async fn user_stores(&self) -> Result<RestOutcome, ApiError> {
        let client = ApiClient::from_config(&self.config)?;
        client.get_all_user_stores().await
    }

    /// Every customer, across all server pages
    pub async fn list_customers(&self) -> Result<Vec<CustTable>, ODataError> {
        self.container.entity_set::<CustTable>().execute_all().await
    }

    pub async fn purch_by_id(&self, purch_id: &str) -> Result<Option<PurchTable>, ODataError> {
        self.container
            .entity_set::<PurchTable>()
            .filter_eq("PurchId", purch_id)
            .single_or_default()
            .await
    }

    /// Vendors with their purchase orders expanded
    pub async fn vendor_purchases(&self) -> Result<Vec<VendTable>, ODataError> {
        self.container
            .entity_set::<VendTable>()
            .expand(VendTable::PURCH_ITEMS)
            .execute_all()
            .await
    }
}
