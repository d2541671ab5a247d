//! Registry of well-known BDC filers.

use serde::Serialize;

/// Static description of a known filer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct KnownFiler {
    /// Exchange ticker.
    pub ticker: &'static str,
    /// SEC Central Index Key.
    pub cik: u64,
    /// Registered name.
    pub name: &'static str,
    /// Whether recent filings tag the schedule with investment identifier dimensions.
    pub xbrl_compliant: bool,
}

impl KnownFiler {
    /// CIK as a string without leading zeros.
    #[must_use]
    pub fn cik_string(&self) -> String {
        self.cik.to_string()
    }
}

const fn filer(ticker: &'static str, cik: u64, name: &'static str, xbrl_compliant: bool) -> KnownFiler {
    KnownFiler {
        ticker,
        cik,
        name,
        xbrl_compliant,
    }
}

/// Publicly traded BDCs the pipeline knows how to locate.
pub const KNOWN_FILERS: &[KnownFiler] = &[
    filer("ARCC", 1_287_750, "Ares Capital Corporation", true),
    filer("FSK", 1_422_183, "FS KKR Capital Corp", true),
    filer("BXSL", 1_736_035, "Blackstone Secured Lending Fund", false),
    filer("ORCC", 1_655_888, "Blue Owl Capital Corp", false),
    filer("GBDC", 1_476_765, "Golub Capital BDC Inc", false),
    filer("PSEC", 1_287_032, "Prospect Capital Corporation", true),
    filer("MAIN", 1_396_440, "Main Street Capital Corporation", true),
    filer("HTGC", 1_280_784, "Hercules Capital Inc", false),
    filer("NMFC", 1_496_099, "New Mountain Finance Corporation", true),
    filer("OCSL", 1_414_932, "Oaktree Specialty Lending Corporation", true),
    filer("TPVG", 1_580_345, "TriplePoint Venture Growth BDC Corp", false),
    filer("TRIN", 1_760_542, "Trinity Capital Inc", false),
    filer("CSWC", 18_349, "Capital Southwest Corporation", true),
    filer("GLAD", 1_284_812, "Gladstone Capital Corporation", true),
    filer("GAIN", 1_284_806, "Gladstone Investment Corporation", true),
    filer("FDUS", 1_487_918, "Fidus Investment Corporation", true),
    filer("PNNT", 1_417_286, "PennantPark Investment Corporation", false),
    filer("PFLT", 1_418_076, "PennantPark Floating Rate Capital Ltd", false),
    filer("SLRC", 1_468_174, "SLR Investment Corp", false),
    filer("TCPC", 1_393_881, "BlackRock TCP Capital Corp", false),
];

/// Looks up a known filer by ticker (case-insensitive).
#[must_use]
pub fn lookup_filer(ticker: &str) -> Option<&'static KnownFiler> {
    KNOWN_FILERS
        .iter()
        .find(|f| f.ticker.eq_ignore_ascii_case(ticker.trim()))
}

/// Looks up a known filer by CIK.
#[must_use]
pub fn lookup_filer_by_cik(cik: u64) -> Option<&'static KnownFiler> {
    KNOWN_FILERS.iter().find(|f| f.cik == cik)
}

/// Tickers whose filings carry investment identifier dimensions.
pub fn xbrl_compliant_tickers() -> impl Iterator<Item = &'static str> {
    KNOWN_FILERS
        .iter()
        .filter(|f| f.xbrl_compliant)
        .map(|f| f.ticker)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let arcc = lookup_filer("arcc").unwrap();
        assert_eq!(arcc.cik, 1_287_750);
        assert_eq!(arcc.cik_string(), "1287750");
        assert_eq!(lookup_filer_by_cik(18_349).unwrap().ticker, "CSWC");
        assert!(lookup_filer("XXXX").is_none());
    }

    #[test]
    fn test_registry_shape() {
        assert_eq!(KNOWN_FILERS.len(), 20);
        assert_eq!(xbrl_compliant_tickers().count(), 10);
    }
}
