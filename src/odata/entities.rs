//! Local projections of the Fred OData entities
//!
//! Only the fields this client reads are declared; anything else the
//! service returns is ignored on decode.

use crate::model::PurchaseStatus;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A record type exposed through a named entity set
pub trait Entity: Serialize + DeserializeOwned {
    const ENTITY_SET: &'static str;
}

/// Customer master record
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CustTable {
    pub rec_id: i64,
    pub account_num: Option<String>,
    pub party: i64,
}

impl Entity for CustTable {
    const ENTITY_SET: &'static str = "CustTables";
}

impl fmt::Display for CustTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}  {}   {}",
            self.account_num.as_deref().unwrap_or_default(),
            self.rec_id,
            self.party
        )
    }
}

/// Vendor master record, optionally with its purchase orders expanded
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct VendTable {
    pub rec_id: i64,
    pub account_num: Option<String>,
    pub party: i64,
    pub purch_items: Vec<PurchTable>,
}

impl VendTable {
    /// Navigation property linking a vendor to its purchase orders
    pub const PURCH_ITEMS: &'static str = "PurchItems";
}

impl Entity for VendTable {
    const ENTITY_SET: &'static str = "VendTables";
}

impl fmt::Display for VendTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}  {}   {}",
            self.account_num.as_deref().unwrap_or_default(),
            self.rec_id,
            self.party
        )
    }
}

/// Purchase order header as exposed by OData
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PurchTable {
    pub rec_id: i64,
    pub purch_id: Option<String>,
    pub order_account: Option<String>,
    pub purch_status: PurchaseStatus,
}

impl Entity for PurchTable {
    const ENTITY_SET: &'static str = "PurchTables";
}

impl fmt::Display for PurchTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}  {}   {}",
            self.order_account.as_deref().unwrap_or_default(),
            self.purch_id.as_deref().unwrap_or_default(),
            self.purch_status
        )
    }
}

/// Item sales tax group assignment
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct TaxOnItem {
    pub rec_id: i64,
    pub tax_item_group: Option<String>,
    pub tax_code: Option<String>,
    #[serde(rename = "dataAreaId")]
    pub data_area_id: Option<String>,
}

impl Entity for TaxOnItem {
    const ENTITY_SET: &'static str = "TaxOnItems";
}
