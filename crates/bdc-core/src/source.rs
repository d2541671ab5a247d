//! Filing-source contract.
//!
//! A [`FilingSource`] locates periodic reports for a filer and exposes their
//! tagged facts and raw document text. The extraction pipeline consumes
//! nothing else from the retrieval layer.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};
use std::str::FromStr;

use crate::error::Result;
use crate::filing::{FactSet, FilingDescriptor, FormType};

/// A filer reference: a ticker symbol or a CIK.
///
/// Tickers are uppercased on creation; CIKs lose leading zeros.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilerRef(String);

impl FilerRef {
    /// Creates a filer reference.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        let s = s.into();
        let trimmed = s.trim();
        if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
            let stripped = trimmed.trim_start_matches('0');
            Self(if stripped.is_empty() { "0".to_string() } else { stripped.to_string() })
        } else {
            Self(trimmed.to_uppercase())
        }
    }

    /// Returns the reference as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if this reference is a numeric CIK.
    #[must_use]
    pub fn is_cik(&self) -> bool {
        !self.0.is_empty() && self.0.chars().all(|c| c.is_ascii_digit())
    }
}

impl fmt::Display for FilerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FilerRef {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for FilerRef {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Source of periodic filings and their contents.
#[async_trait]
pub trait FilingSource: Send + Sync + Debug {
    /// Returns the name of this source (e.g., "SEC EDGAR").
    fn name(&self) -> &str;

    /// Finds the filing of the given form for a filer.
    ///
    /// With `fiscal_year` set, returns the filing covering that fiscal year;
    /// otherwise the most recent one. Fails with
    /// [`BdcError::FilingNotFound`](crate::BdcError::FilingNotFound) when
    /// nothing matches.
    async fn find_filing(
        &self,
        filer: &FilerRef,
        form: FormType,
        fiscal_year: Option<i32>,
    ) -> Result<FilingDescriptor>;

    /// Returns the tagged facts and contexts of a filing.
    ///
    /// A filing without structured data yields an empty [`FactSet`].
    async fn facts(&self, filing: &FilingDescriptor) -> Result<FactSet>;

    /// Returns the raw HTML text of a filing's primary document.
    async fn document(&self, filing: &FilingDescriptor) -> Result<String>;

    /// Returns the display name of a filer, if the source knows it.
    async fn filer_name(&self, filer: &FilerRef) -> Result<Option<String>> {
        let _ = filer;
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filer_ref_normalization() {
        assert_eq!(FilerRef::new("arcc").as_str(), "ARCC");
        assert_eq!(FilerRef::new("0001287750").as_str(), "1287750");
        assert!(FilerRef::new("0001287750").is_cik());
        assert!(!FilerRef::new("MAIN").is_cik());
    }
}
