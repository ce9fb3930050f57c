//! Generic entity printer
//!
//! Prints the first few records of any entity set as `name=value` lines.
//! Field names and order come from the record's serde serialization, so no
//! per-type display code is needed.

use crate::odata::client::{ODataClient, ODataError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::io::{self, Write};
use thiserror::Error;

/// Records printed per call
pub const PRINT_LIMIT: usize = 3;

#[derive(Error, Debug)]
pub enum PrintError {
    #[error(transparent)]
    OData(#[from] ODataError),

    #[error("Failed to write output: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to inspect record: {0}")]
    Inspect(String),
}

/// Field names and display values of a record, in declaration order
pub fn describe<T: Serialize>(record: &T) -> Result<Vec<(String, String)>, PrintError> {
    match serde_json::to_value(record).map_err(|e| PrintError::Inspect(e.to_string()))? {
        Value::Object(fields) => Ok(fields
            .into_iter()
            .map(|(name, value)| (name, display_value(&value)))
            .collect()),
        other => Err(PrintError::Inspect(format!(
            "expected an object with fields, got {}",
            other
        ))),
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Write one record, one indented `name=value` line per field
pub fn write_record<T: Serialize, W: Write>(record: &T, out: &mut W) -> Result<(), PrintError> {
    for (name, value) in describe(record)? {
        writeln!(out, "    {}={}", name, value)?;
    }
    Ok(())
}

/// Query the top records of `entity_set` and print each, followed by a
/// blank line. Returns the number of records printed.
pub async fn print_top<T, W>(
    client: &ODataClient,
    entity_set: &str,
    out: &mut W,
) -> Result<usize, PrintError>
where
    T: Serialize + DeserializeOwned,
    W: Write,
{
    let records = client
        .query::<T>(entity_set)
        .top(PRINT_LIMIT)
        .execute()
        .await?
        .items;

    tracing::debug!("Printing {} {} records", records.len(), entity_set);

    for record in &records {
        write_record(record, out)?;
        writeln!(out)?;
    }
    Ok(records.len())
}
