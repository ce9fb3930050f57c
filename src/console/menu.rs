//! Menu text and selection parsing

use std::fmt;

pub const MENU_RULE: &str = "***************************************************";

pub const MENU_ITEMS: [&str; 6] = [
    "Please select one of the below, or press 0 to exit.",
    "Press 1 to get count of customers via OData",
    "Press 2 to search for customer by RecId via OData",
    "Press 3 to get first 3 Tax On item entries via OData",
    "Press 4 to create Purchase Order via API",
    "Press 5 to get current user store via API",
];

pub const INVALID_SELECTION: &str = "Invalid selection. Please try again.";

/// A menu choice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Exit,
    CountCustomers,
    CustomerById,
    TaxOnItems,
    CreatePurchaseOrder,
    UserStores,
    Invalid(i32),
}

impl From<i32> for Selection {
    fn from(value: i32) -> Self {
        match value {
            0 => Selection::Exit,
            1 => Selection::CountCustomers,
            2 => Selection::CustomerById,
            3 => Selection::TaxOnItems,
            4 => Selection::CreatePurchaseOrder,
            5 => Selection::UserStores,
            other => Selection::Invalid(other),
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::Exit => f.write_str("exit"),
            Selection::CountCustomers => f.write_str("count customers"),
            Selection::CustomerById => f.write_str("customer by RecId"),
            Selection::TaxOnItems => f.write_str("tax on items"),
            Selection::CreatePurchaseOrder => f.write_str("create purchase order"),
            Selection::UserStores => f.write_str("user stores"),
            Selection::Invalid(n) => write!(f, "invalid ({})", n),
        }
    }
}

/// The prompt shown before every selection
pub fn menu_text() -> String {
    let mut text = String::from("\n");
    text.push_str(MENU_RULE);
    text.push('\n');
    for item in MENU_ITEMS {
        text.push_str(item);
        text.push('\n');
    }
    text.push_str(MENU_RULE);
    text.push_str("\n\n");
    text
}
