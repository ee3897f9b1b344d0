//! Filing lists from EDGAR submissions and section anchors for the filing viewer

use super::types::{Cik, RecentFilings};
use regex::Regex;
use std::sync::OnceLock;

const ARCHIVES_BASE: &str = "https://www.sec.gov/Archives/edgar/data";

#[derive(Debug, Clone, PartialEq)]
pub struct FilingRef {
    pub form: String,
    pub filing_date: String,
    pub url: String,
}

/// Most recent filings first (EDGAR order), optionally restricted to one form type
pub fn recent_filings(
    cik: Cik,
    recent: &RecentFilings,
    form: Option<&str>,
    limit: usize,
) -> Vec<FilingRef> {
    let form = form.map(str::trim).filter(|f| !f.is_empty());
    recent
        .accession_number
        .iter()
        .enumerate()
        .filter_map(|(i, accession)| {
            let doc_form = recent.form.get(i)?;
            let document = recent.primary_document.get(i)?;
            if document.is_empty() {
                return None;
            }
            if let Some(wanted) = form {
                if !doc_form.eq_ignore_ascii_case(wanted) {
                    return None;
                }
            }
            Some(FilingRef {
                form: doc_form.clone(),
                filing_date: recent.filing_date.get(i).cloned().unwrap_or_default(),
                url: document_url(cik, accession, document),
            })
        })
        .take(limit)
        .collect()
}

/// Archive URL: the CIK without padding and the accession number without dashes
pub fn document_url(cik: Cik, accession: &str, document: &str) -> String {
    format!(
        "{}/{}/{}/{}",
        ARCHIVES_BASE,
        cik.0,
        accession.replace('-', ""),
        document
    )
}

/// Element id of a section title as the filing viewer writes it
pub fn section_anchor(title: &str) -> Option<String> {
    static INVALID: OnceLock<Option<Regex>> = OnceLock::new();
    let title = title.trim();
    if title.is_empty() {
        return None;
    }
    let invalid = INVALID
        .get_or_init(|| Regex::new(r"[^\w\-.:]+").ok())
        .as_ref()?;
    let mut id = invalid.replace_all(title, "-").into_owned();
    if !id.chars().next().is_some_and(char::is_alphabetic) {
        id = format!("section-{}", id);
    }
    Some(id.to_lowercase())
}
