//! SEC EDGAR data access: ticker lookup, XBRL company facts and filings

pub mod client;
pub mod facts;
pub mod filings;
pub mod types;

pub use client::{FilingSource, SecClient};
pub use types::{Cik, SecError};
