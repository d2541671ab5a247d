//! Rate-limited SEC EDGAR client.

use async_trait::async_trait;
use bdc_core::{
    BdcError, FactSet, FilerRef, FilingDescriptor, FilingSource, FormType, Result, lookup_filer,
};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

use crate::instance::{instance_file_name, parse_instance};
use crate::submissions::CompanySubmissions;

/// SEC EDGAR API base URL
const EDGAR_BASE_URL: &str = "https://data.sec.gov";

/// SEC filing archive base URL
const ARCHIVES_BASE_URL: &str = "https://www.sec.gov/Archives/edgar/data";

/// SEC company tickers URL
const COMPANY_TICKERS_URL: &str = "https://www.sec.gov/files/company_tickers.json";

/// Default rate limit: 10 requests per second (SEC requirement)
const DEFAULT_RATE_LIMIT: Duration = Duration::from_millis(100);

const SOURCE_NAME: &str = "SEC EDGAR";

/// Rate limiter to ensure we don't exceed SEC's rate limits
#[derive(Debug)]
struct RateLimiter {
    last_request: Instant,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval: Duration) -> Self {
        Self {
            last_request: Instant::now() - min_interval,
            min_interval,
        }
    }

    async fn wait(&mut self) {
        let elapsed = self.last_request.elapsed();
        if elapsed < self.min_interval {
            sleep(self.min_interval - elapsed).await;
        }
        self.last_request = Instant::now();
    }
}

/// Company ticker information from SEC JSON.
#[derive(Debug, Deserialize)]
struct CompanyTickerInfo {
    /// CIK as a number (SEC returns this as an integer)
    cik_str: u64,
    /// Ticker symbol
    ticker: String,
}

/// SEC EDGAR filing source.
///
/// Locates 10-K/10-Q filings through the submissions API, downloads primary
/// documents from the archive and parses the accompanying XBRL instance.
/// Requests are spaced at least 100 ms apart.
#[derive(Debug, Clone)]
pub struct EdgarClient {
    client: reqwest::Client,
    rate_limiter: Arc<Mutex<RateLimiter>>,
    user_agent: String,
}

impl EdgarClient {
    /// Creates a client identifying itself with `user_agent`.
    ///
    /// The SEC requires a contact in the user agent, e.g.
    /// `"Research Project research@example.com"`.
    pub fn new(user_agent: &str) -> Result<Self> {
        if user_agent.trim().is_empty() {
            return Err(BdcError::InvalidParameter("Empty user agent".to_string()));
        }
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| BdcError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(client, user_agent))
    }

    /// Creates a client from a pre-configured HTTP client.
    #[must_use]
    pub fn with_client(client: reqwest::Client, user_agent: &str) -> Self {
        Self {
            client,
            rate_limiter: Arc::new(Mutex::new(RateLimiter::new(DEFAULT_RATE_LIMIT))),
            user_agent: user_agent.to_string(),
        }
    }

    /// The identity sent with every request.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Rate-limited GET. `Ok(None)` on 404.
    async fn get(&self, url: &str) -> Result<Option<reqwest::Response>> {
        self.rate_limiter.lock().await.wait().await;

        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| BdcError::Network(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs);
            return Err(BdcError::RateLimited {
                source_name: SOURCE_NAME.to_string(),
                retry_after,
            });
        }
        if !status.is_success() {
            return Err(BdcError::Network(format!("HTTP {} for {}", status, url)));
        }
        Ok(Some(response))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>> {
        let Some(response) = self.get(url).await? else {
            return Ok(None);
        };
        let parsed = response
            .json()
            .await
            .map_err(|e| BdcError::Parse(format!("Failed to parse {}: {}", url, e)))?;
        Ok(Some(parsed))
    }

    async fn get_text(&self, url: &str) -> Result<Option<String>> {
        let Some(response) = self.get(url).await? else {
            return Ok(None);
        };
        let text = response
            .text()
            .await
            .map_err(|e| BdcError::Network(e.to_string()))?;
        Ok(Some(text))
    }

    /// Resolves a filer reference to a CIK (no leading zeros).
    ///
    /// Tickers are looked up in the SEC ticker file, falling back to the
    /// built-in registry when the file is unreachable or lacks the ticker.
    pub async fn resolve_cik(&self, filer: &FilerRef) -> Result<String> {
        if filer.is_cik() {
            return Ok(filer.as_str().to_string());
        }
        if filer.as_str().is_empty() {
            return Err(BdcError::InvalidParameter("Empty ticker".to_string()));
        }

        match self
            .get_json::<HashMap<String, CompanyTickerInfo>>(COMPANY_TICKERS_URL)
            .await
        {
            Ok(Some(tickers)) => {
                if let Some(company) = tickers
                    .values()
                    .find(|c| c.ticker.eq_ignore_ascii_case(filer.as_str()))
                {
                    debug!("Found CIK {} for ticker {}", company.cik_str, filer);
                    return Ok(company.cik_str.to_string());
                }
            }
            Ok(None) => warn!("Company ticker file not found"),
            Err(e) => warn!("Company ticker lookup failed: {}", e),
        }

        lookup_filer(filer.as_str())
            .map(|known| known.cik_string())
            .ok_or_else(|| BdcError::FilerNotFound(filer.to_string()))
    }

    /// Fetches the submissions metadata of a filer.
    pub async fn submissions(&self, cik: &str) -> Result<CompanySubmissions> {
        let url = format!("{}/submissions/CIK{:0>10}.json", EDGAR_BASE_URL, cik);
        self.get_json(&url)
            .await?
            .ok_or_else(|| BdcError::FilerNotFound(cik.to_string()))
    }

    fn archive_url(filing: &FilingDescriptor, file: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            ARCHIVES_BASE_URL,
            filing.cik,
            filing.accession_compact(),
            file
        )
    }
}

#[async_trait]
impl FilingSource for EdgarClient {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    async fn find_filing(
        &self,
        filer: &FilerRef,
        form: FormType,
        fiscal_year: Option<i32>,
    ) -> Result<FilingDescriptor> {
        let cik = self.resolve_cik(filer).await?;
        let submissions = self.submissions(&cik).await?;

        let filing = submissions
            .select(form, fiscal_year)
            .ok_or_else(|| BdcError::FilingNotFound {
                filer: filer.to_string(),
                form: form.to_string(),
                year: fiscal_year,
            })?;
        info!(
            "Selected {} {} filed {} for {}",
            filing.form, filing.accession_number, filing.filing_date, filer
        );
        Ok(filing)
    }

    async fn facts(&self, filing: &FilingDescriptor) -> Result<FactSet> {
        let Some(primary) = filing.primary_document.as_deref() else {
            return Ok(FactSet::default());
        };
        let url = Self::archive_url(filing, &instance_file_name(primary));
        match self.get_text(&url).await? {
            Some(xml) => {
                let facts = parse_instance(&xml)?;
                debug!(
                    "Parsed {} facts and {} contexts from {}",
                    facts.len(),
                    facts.context_count(),
                    url
                );
                Ok(facts)
            }
            None => {
                debug!("No XBRL instance at {}", url);
                Ok(FactSet::default())
            }
        }
    }

    async fn document(&self, filing: &FilingDescriptor) -> Result<String> {
        let primary = filing.primary_document.as_deref().ok_or_else(|| {
            BdcError::NotSupported(format!(
                "Filing {} has no primary document",
                filing.accession_number
            ))
        })?;
        let url = Self::archive_url(filing, primary);
        self.get_text(&url)
            .await?
            .ok_or_else(|| BdcError::Network(format!("Document not found: {}", url)))
    }

    async fn filer_name(&self, filer: &FilerRef) -> Result<Option<String>> {
        if let Some(known) = lookup_filer(filer.as_str()) {
            return Ok(Some(known.name.to_string()));
        }
        let cik = self.resolve_cik(filer).await?;
        let submissions = self.submissions(&cik).await?;
        Ok(Some(submissions.name).filter(|n| !n.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_client_identity() {
        let client = EdgarClient::new("Research research@example.com").unwrap();
        assert_eq!(client.name(), "SEC EDGAR");
        assert_eq!(client.user_agent(), "Research research@example.com");
        assert!(EdgarClient::new("  ").is_err());
    }

    #[test]
    fn test_archive_url() {
        let filing = FilingDescriptor {
            cik: "1287750".to_string(),
            accession_number: "0001287750-25-000010".to_string(),
            filing_date: NaiveDate::from_ymd_opt(2025, 2, 5).unwrap(),
            form: "10-K".to_string(),
            report_date: None,
            primary_document: Some("arcc-20241231.htm".to_string()),
        };
        assert_eq!(
            EdgarClient::archive_url(&filing, "arcc-20241231_htm.xml"),
            "https://www.sec.gov/Archives/edgar/data/1287750/000128775025000010/arcc-20241231_htm.xml"
        );
    }

    #[tokio::test]
    async fn test_cik_reference_needs_no_lookup() {
        let client = EdgarClient::new("Research research@example.com").unwrap();
        let cik = client.resolve_cik(&FilerRef::new("0001287750")).await.unwrap();
        assert_eq!(cik, "1287750");
    }

    #[tokio::test]
    async fn test_known_filer_name_is_local() {
        let client = EdgarClient::new("Research research@example.com").unwrap();
        let name = client.filer_name(&FilerRef::new("arcc")).await.unwrap();
        assert_eq!(name.as_deref(), Some("Ares Capital Corporation"));
    }
}
