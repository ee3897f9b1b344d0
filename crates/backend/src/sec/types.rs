use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SecError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("EDGAR returned status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Unknown ticker: {0}")]
    UnknownTicker(String),

    #[error("Only sec.gov documents can be fetched: {0}")]
    ForbiddenUrl(String),
}

/// Central Index Key. EDGAR URLs use the 10-digit zero-padded form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cik(pub u64);

impl Cik {
    pub fn padded(&self) -> String {
        format!("{:010}", self.0)
    }
}

impl fmt::Display for Cik {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.padded())
    }
}

/// One entry of `company_tickers.json`
#[derive(Debug, Clone, Deserialize)]
pub struct TickerEntry {
    pub cik_str: u64,
    pub ticker: String,
    pub title: String,
}

/// `company_tickers.json` is an object keyed by row number
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct TickerIndex(pub HashMap<String, TickerEntry>);

impl TickerIndex {
    pub fn find(&self, ticker: &str) -> Option<&TickerEntry> {
        let ticker = ticker.trim();
        self.0
            .values()
            .find(|e| e.ticker.eq_ignore_ascii_case(ticker))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Submissions {
    pub filings: SubmissionFilings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionFilings {
    pub recent: RecentFilings,
}

/// Column-oriented: the n-th element of every vector describes the same filing
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentFilings {
    #[serde(default)]
    pub accession_number: Vec<String>,
    #[serde(default)]
    pub filing_date: Vec<String>,
    #[serde(default)]
    pub form: Vec<String>,
    #[serde(default)]
    pub primary_document: Vec<String>,
}

/// `api/xbrl/companyfacts` payload. Maps keep the order EDGAR sends them in.
#[derive(Debug, Clone, Deserialize)]
pub struct CompanyFacts {
    pub cik: serde_json::Value,
    #[serde(rename = "entityName", default)]
    pub entity_name: String,
    #[serde(default)]
    pub facts: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Concept {
    pub label: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub units: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cik_is_zero_padded() {
        assert_eq!(Cik(320193).padded(), "0000320193");
        assert_eq!(Cik(320193).to_string(), "0000320193");
    }

    #[test]
    fn test_ticker_lookup_ignores_case() {
        let index: TickerIndex = serde_json::from_str(
            r#"{"0":{"cik_str":320193,"ticker":"AAPL","title":"Apple Inc."},
                "1":{"cik_str":789019,"ticker":"MSFT","title":"MICROSOFT CORP"}}"#,
        )
        .unwrap();
        assert_eq!(index.find("msft").map(|e| e.cik_str), Some(789019));
        assert_eq!(index.find(" aapl ").map(|e| e.title.as_str()), Some("Apple Inc."));
        assert!(index.find("ZZZZ").is_none());
    }
}
