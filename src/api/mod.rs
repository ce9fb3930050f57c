//! REST API module
//!
//! Client for the Fred purchasing and user endpoints

pub mod client;

pub use client::{ApiClient, ApiError, RestOutcome};
