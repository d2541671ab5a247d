//! Pipeline configuration.

use bdc_core::{BdcError, FormType, Result};
use bdc_extract::TableScanConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Environment variable overriding [`PipelineConfig::user_agent`].
pub const USER_AGENT_ENV: &str = "BDC_USER_AGENT";
/// Environment variable overriding [`PipelineConfig::db_path`].
pub const DB_PATH_ENV: &str = "BDC_DB_PATH";

/// Which disclosure format the pipeline reads holdings from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStrategy {
    /// Tagged facts only.
    Xbrl,
    /// HTML schedule tables only.
    Html,
    /// Tagged facts, falling back to HTML tables when they yield nothing or
    /// cannot be read.
    #[default]
    XbrlThenHtml,
}

impl ExtractionStrategy {
    /// Returns the configuration label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Xbrl => "xbrl",
            Self::Html => "html",
            Self::XbrlThenHtml => "xbrl_then_html",
        }
    }
}

impl fmt::Display for ExtractionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExtractionStrategy {
    type Err = BdcError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "xbrl" => Ok(Self::Xbrl),
            "html" => Ok(Self::Html),
            "xbrl_then_html" | "auto" => Ok(Self::XbrlThenHtml),
            other => Err(BdcError::InvalidParameter(format!(
                "Unknown extraction strategy: {other}"
            ))),
        }
    }
}

/// Settings for a pipeline run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Identity sent to the filing source, e.g. `"Research research@example.com"`.
    pub user_agent: String,
    /// Portfolio database file.
    pub db_path: PathBuf,
    /// Periodic report form to extract.
    pub form: FormType,
    /// Disclosure format to read.
    pub strategy: ExtractionStrategy,
    /// Directory for per-filing CSV exports, none when unset.
    pub export_dir: Option<PathBuf>,
    /// HTML table thresholds.
    pub table_scan: TableScanConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            user_agent: String::new(),
            db_path: PathBuf::from("data/bdc.db"),
            form: FormType::TenK,
            strategy: ExtractionStrategy::default(),
            export_dir: None,
            table_scan: TableScanConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Reads a JSON configuration file. Missing keys take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text)
            .map_err(|e| BdcError::Parse(format!("Invalid config {}: {}", path.display(), e)))
    }

    /// Loads from an optional file, then applies environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(config.with_env())
    }

    /// Applies `BDC_USER_AGENT` and `BDC_DB_PATH` from the process environment.
    #[must_use]
    pub fn with_env(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from a variable lookup. Empty values are ignored.
    #[must_use]
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(agent) = non_empty(USER_AGENT_ENV) {
            self.user_agent = agent;
        }
        if let Some(path) = non_empty(DB_PATH_ENV) {
            self.db_path = PathBuf::from(path);
        }
        self
    }

    /// Checks settings a network run needs.
    pub fn validate(&self) -> Result<()> {
        if self.user_agent.trim().is_empty() {
            return Err(BdcError::InvalidParameter(format!(
                "A user agent with a contact address is required; set `user_agent` or {USER_AGENT_ENV}"
            )));
        }
        Ok(())
    }
}
