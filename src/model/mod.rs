//! Purchase order DTOs
//!
//! Request bodies for the Fred purchasing API.

pub mod enums;
pub mod purchase_order;

pub use enums::{ParseEnumError, PurchaseStatus, PurchaseType};
pub use purchase_order::{PoDetails, PoHeader, PoLine};
