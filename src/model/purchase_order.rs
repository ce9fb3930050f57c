//! Purchase order header, lines and the aggregate sent to `PO/CreatePurchOrder`

use super::enums::{PurchaseStatus, PurchaseType};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Purchase order header
///
/// Serialized with both the integer enums (`PurchaseType`, `PurchStatus`)
/// and their names (`PurchaseTypeValue`, `PurchStatusValue`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(into = "HeaderWire", from = "HeaderWire")]
pub struct PoHeader {
    pub rec_id: i64,
    pub purch_id: Option<String>,
    pub vend_account: String,
    pub created_date_time: Option<DateTime<Utc>>,
    pub currency_code: String,
    pub invent_location_id: String,
    pub invent_site_id: String,
    pub purchase_type: PurchaseType,
    pub purch_status: PurchaseStatus,
}

impl PoHeader {
    pub fn purchase_type_value(&self) -> &'static str {
        self.purchase_type.name()
    }

    /// Unrecognised names fall back to `PurchaseType::Journal`
    pub fn set_purchase_type_value(&mut self, value: &str) {
        self.purchase_type = PurchaseType::parse_lenient(value);
    }

    pub fn purch_status_value(&self) -> &'static str {
        self.purch_status.name()
    }

    /// Unrecognised names fall back to `PurchaseStatus::None`
    pub fn set_purch_status_value(&mut self, value: &str) {
        self.purch_status = PurchaseStatus::parse_lenient(value);
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct HeaderWire {
    rec_id: i64,
    purch_id: Option<String>,
    vend_account: String,
    created_date_time: Option<DateTime<Utc>>,
    currency_code: String,
    invent_location_id: String,
    invent_site_id: String,
    purchase_type: PurchaseType,
    purch_status: PurchaseStatus,
    purchase_type_value: Option<String>,
    purch_status_value: Option<String>,
}

impl From<PoHeader> for HeaderWire {
    fn from(header: PoHeader) -> Self {
        Self {
            purchase_type_value: Some(header.purchase_type_value().to_string()),
            purch_status_value: Some(header.purch_status_value().to_string()),
            rec_id: header.rec_id,
            purch_id: header.purch_id,
            vend_account: header.vend_account,
            created_date_time: header.created_date_time,
            currency_code: header.currency_code,
            invent_location_id: header.invent_location_id,
            invent_site_id: header.invent_site_id,
            purchase_type: header.purchase_type,
            purch_status: header.purch_status,
        }
    }
}

impl From<HeaderWire> for PoHeader {
    fn from(wire: HeaderWire) -> Self {
        let mut header = PoHeader {
            rec_id: wire.rec_id,
            purch_id: wire.purch_id,
            vend_account: wire.vend_account,
            created_date_time: wire.created_date_time,
            currency_code: wire.currency_code,
            invent_location_id: wire.invent_location_id,
            invent_site_id: wire.invent_site_id,
            purchase_type: wire.purchase_type,
            purch_status: wire.purch_status,
        };
        // names win over discriminants
        if let Some(value) = wire.purchase_type_value.as_deref() {
            header.set_purchase_type_value(value);
        }
        if let Some(value) = wire.purch_status_value.as_deref() {
            header.set_purch_status_value(value);
        }
        header
    }
}

/// Purchase order line
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PoLine {
    #[serde(default)]
    pub rec_id: i64,
    #[serde(default)]
    pub purch_id: Option<String>,
    pub currency_code: String,
    pub invent_location_id: String,
    pub invent_site_id: String,
    pub item_id: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub purch_price: Decimal,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub purch_qty: Decimal,
    pub purch_unit: String,
}

impl PoLine {
    pub fn line_amount(&self) -> Decimal {
        self.purch_price * self.purch_qty
    }
}

/// Header plus ordered lines
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PoDetails {
    pub header: PoHeader,
    pub lines: Vec<PoLine>,
}

impl PoDetails {
    pub fn new(header: PoHeader, lines: Vec<PoLine>) -> Self {
        Self { header, lines }
    }

    /// Canned demo order for vendor SIG00001 with two lines
    pub fn sample() -> Self {
        let mut header = PoHeader {
            vend_account: "SIG00001".to_string(),
            currency_code: "AUD".to_string(),
            invent_location_id: "000001".to_string(),
            invent_site_id: "000001".to_string(),
            ..Default::default()
        };
        header.set_purchase_type_value("Purch");
        header.set_purch_status_value("Backorder");

        let line = |item_id: &str, price: i64, qty: i64| PoLine {
            currency_code: "AUD".to_string(),
            invent_location_id: "000001".to_string(),
            invent_site_id: "000001".to_string(),
            item_id: item_id.to_string(),
            purch_price: Decimal::from(price),
            purch_qty: Decimal::from(qty),
            purch_unit: "ea".to_string(),
            ..Default::default()
        };

        Self::new(header, vec![line("100895", 25, 10), line("106397", 15, 100)])
    }

    pub fn total_amount(&self) -> Decimal {
        self.lines.iter().map(PoLine::line_amount).sum()
    }
}
