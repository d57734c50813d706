use std::io;

use chrono::NaiveDate;
use thiserror::Error;

use crate::cascade::Field;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("IO Error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    #[error("Error decoding data file: {source}")]
    Format {
        #[from]
        source: serde_yaml::Error,
    },

    #[error("{referrer} refers to unknown {kind} '{code}'")]
    Reference {
        referrer: String,
        kind: &'static str,
        code: String,
    },

    #[error("Invoice {invoice} has no {field}")]
    Unresolved { invoice: String, field: Field },

    #[error(
        "Invoice {invoice} has a malformed price '{price}', \
        expected '<amount> <currency>'"
    )]
    PriceFormat { invoice: String, price: String },

    #[error("Invoice {invoice} has no exchange rate for {currency}")]
    ExchangeRate { invoice: String, currency: String },

    #[error("Invoice {invoice}: supplier has no account for {currency}")]
    NoAccount { invoice: String, currency: String },

    #[error("Invoice {invoice}: due date {days} days after {date} is out of range")]
    DueDate {
        invoice: String,
        date: NaiveDate,
        days: i64,
    },

    #[error("Invoice {invoice}: amounts are too large to compute")]
    Overflow { invoice: String },

    #[error("Invoice {code} appears more than once")]
    DuplicateInvoice { code: String },
}
