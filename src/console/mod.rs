//! Interactive console
//!
//! Reads a menu selection, runs the matching operation, prints the result
//! and loops until the operator enters 0 or input ends.

pub mod menu;
pub mod operations;

pub use menu::Selection;
pub use operations::Operations;

use crate::api::{ApiError, RestOutcome};
use crate::model::PoDetails;
use crate::odata::{ODataError, PrintError, VendTable};
use std::io::{self, BufRead, Write};
use thiserror::Error;

/// Console errors
#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("Console I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("'{input}' is not a valid {expected}")]
    InvalidNumber { input: String, expected: &'static str },

    #[error("Input ended while waiting for {0}")]
    InputClosed(&'static str),

    #[error(transparent)]
    OData(#[from] ODataError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Failed to display record: {0}")]
    Display(String),
}

impl From<PrintError> for ConsoleError {
    fn from(e: PrintError) -> Self {
        match e {
            PrintError::OData(e) => ConsoleError::OData(e),
            PrintError::Io(e) => ConsoleError::Io(e),
            PrintError::Inspect(message) => ConsoleError::Display(message),
        }
    }
}

/// Menu loop over any line-based input and output
pub struct Console<R, W> {
    operations: Operations,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(operations: Operations, input: R, output: W) -> Self {
        Self {
            operations,
            input,
            output,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Run until selection 0 or end of input
    pub async fn run(&mut self) -> Result<(), ConsoleError> {
        loop {
            let selection = match self.display_prompt()? {
                Some(selection) => selection,
                None => {
                    tracing::info!("Input closed, exiting");
                    return Ok(());
                }
            };

            if selection == Selection::Exit {
                return Ok(());
            }

            self.dispatch(selection).await?;
        }
    }

    /// Run exactly one operation for `selection`
    pub async fn dispatch(&mut self, selection: Selection) -> Result<(), ConsoleError> {
        tracing::debug!("Selected: {}", selection);

        match selection {
            Selection::Exit => {}
            Selection::CountCustomers => {
                let count = self.operations.count_customers().await?;
                writeln!(self.output, "    Count of customers:{}", count)?;
            }
            Selection::CustomerById => {
                writeln!(
                    self.output,
                    "    Please enter the customer recId to search (ex:5637146827):"
                )?;
                self.output.flush()?;
                let rec_id = self.read_number::<i64>("customer RecId")?;
                if let Some(customer) = self.operations.customer_by_id(rec_id).await? {
                    writeln!(self.output, "    {}", customer)?;
                }
            }
            Selection::TaxOnItems => {
                self.operations.print_tax_on_items(&mut self.output).await?;
            }
            Selection::CreatePurchaseOrder => {
                let outcome = self
                    .operations
                    .create_purchase_order(&PoDetails::sample())
                    .await?;
                self.write_outcome(&outcome, "    Created order id=")?;
            }
            Selection::UserStores => {
                let outcome = self.operations.user_stores().await?;
                self.write_outcome(&outcome, "    Raw output: ")?;
            }
            Selection::Invalid(value) => {
                tracing::debug!("Ignoring selection {}", value);
                writeln!(self.output, "{}", menu::INVALID_SELECTION)?;
            }
        }
        Ok(())
    }

    fn write_outcome(&mut self, outcome: &RestOutcome, success_label: &str) -> Result<(), ConsoleError> {
        match outcome {
            RestOutcome::Success(body) => writeln!(self.output, "{}{}", success_label, body)?,
            RestOutcome::Failure { body, .. } => {
                writeln!(self.output, "    Error occurred:{}", body)?
            }
        }
        Ok(())
    }

    /// Show the menu and read a selection; `None` at end of input
    fn display_prompt(&mut self) -> Result<Option<Selection>, ConsoleError> {
        write!(self.output, "{}", menu::menu_text())?;
        self.output.flush()?;

        match self.read_line()? {
            Some(line) => Ok(Some(parse_number::<i32>(&line, "menu selection")?.into())),
            None => Ok(None),
        }
    }

    fn read_number<T: std::str::FromStr>(&mut self, expected: &'static str) -> Result<T, ConsoleError> {
        let line = self
            .read_line()?
            .ok_or(ConsoleError::InputClosed(expected))?;
        parse_number(&line, expected)
    }

    fn read_line(&mut self) -> Result<Option<String>, ConsoleError> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}

fn parse_number<T: std::str::FromStr>(line: &str, expected: &'static str) -> Result<T, ConsoleError> {
    let trimmed = line.trim();
    trimmed.parse().map_err(|_| ConsoleError::InvalidNumber {
        input: trimmed.to_string(),
        expected,
    })
}

/// Print each vendor followed by its expanded purchase orders
pub fn write_vendor_purchases<W: Write>(vendors: &[VendTable], out: &mut W) -> io::Result<()> {
    for vendor in vendors {
        writeln!(out, "    {}", vendor)?;
        for purch in &vendor.purch_items {
            writeln!(out, "    {}", purch)?;
        }
    }
    Ok(())
}
