use super::types::{Cik, CompanyFacts, SecError, Submissions, TickerIndex};
use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;

const TICKERS_URL: &str = "https://www.sec.gov/files/company_tickers.json";
const SUBMISSIONS_BASE: &str = "https://data.sec.gov/submissions";
const COMPANY_FACTS_BASE: &str = "https://data.sec.gov/api/xbrl/companyfacts";

/// Source of EDGAR data used by the assistant tools
#[async_trait]
pub trait FilingSource: Send + Sync {
    async fn ticker_index(&self) -> Result<TickerIndex, SecError>;

    async fn submissions(&self, cik: Cik) -> Result<Submissions, SecError>;

    async fn company_facts(&self, cik: Cik) -> Result<CompanyFacts, SecError>;

    /// Raw document from the EDGAR archive
    async fn document(&self, url: &str) -> Result<String, SecError>;
}

/// HTTP client for EDGAR. Every request carries the configured User-Agent.
pub struct SecClient {
    http: reqwest::Client,
}

impl SecClient {
    pub fn new(user_agent: &str) -> Result<Self, SecError> {
        let http = reqwest::Client::builder()
            .user_agent(user_agent.to_string())
            .gzip(true)
            .build()?;
        Ok(Self { http })
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, SecError> {
        tracing::debug!("EDGAR GET {}", url);
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SecError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, SecError> {
        Ok(self.get(url).await?.json::<T>().await?)
    }
}

#[async_trait]
impl FilingSource for SecClient {
    async fn ticker_index(&self) -> Result<TickerIndex, SecError> {
        self.get_json(TICKERS_URL).await
    }

    async fn submissions(&self, cik: Cik) -> Result<Submissions, SecError> {
        self.get_json(&format!("{}/CIK{}.json", SUBMISSIONS_BASE, cik.padded()))
            .await
    }

    async fn company_facts(&self, cik: Cik) -> Result<CompanyFacts, SecError> {
        self.get_json(&format!("{}/CIK{}.json", COMPANY_FACTS_BASE, cik.padded()))
            .await
    }

    async fn document(&self, url: &str) -> Result<String, SecError> {
        let url = ensure_sec_url(url)?;
        Ok(self.get(url.as_str()).await?.text().await?)
    }
}

/// The model chooses the URL, so only https documents on sec.gov hosts are fetched
pub fn ensure_sec_url(raw: &str) -> Result<Url, SecError> {
    let forbidden = || SecError::ForbiddenUrl(raw.to_string());
    let url = Url::parse(raw.trim()).map_err(|_| forbidden())?;
    let host = url.host_str().ok_or_else(forbidden)?;
    let on_sec = host == "sec.gov" || host.ends_with(".sec.gov");
    if url.scheme() != "https" || !on_sec {
        return Err(forbidden());
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sec_urls_accepted() {
        let url = ensure_sec_url(
            "https://www.sec.gov/Archives/edgar/data/320193/000032019324000123/aapl-20240928.htm",
        )
        .unwrap();
        assert_eq!(url.host_str(), Some("www.sec.gov"));
    }

    #[test]
    fn test_foreign_urls_rejected() {
        for raw in [
            "http://www.sec.gov/Archives/x.htm",
            "https://sec.gov.example.com/x.htm",
            "https://evilsec.gov/x.htm",
            "file:///etc/passwd",
            "not a url",
        ] {
            assert!(
                matches!(ensure_sec_url(raw), Err(SecError::ForbiddenUrl(_))),
                "{raw} should be rejected"
            );
        }
    }
}
