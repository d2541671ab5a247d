//! Asset-class, affiliation and industry classifiers.
//!
//! All classifiers are pure keyword scans: identical inputs always produce
//! identical outputs regardless of filer, period or ordering.

use bdc_core::{AffiliationCategory, AssetClass, Dimension};

/// Investment-type keywords that indicate a debt position.
pub const DEBT_KEYWORDS: &[&str] = &[
    "loan",
    "debt",
    "note",
    "bond",
    "credit",
    "mezzanine",
    "senior",
    "subordinated",
    "unitranche",
    "tranche",
    "secured",
    "unsecured",
    "term",
    "revolver",
    "revolving",
];

/// Investment-type keywords that indicate an equity position.
pub const EQUITY_KEYWORDS: &[&str] = &[
    "stock",
    "equity",
    "share",
    "warrant",
    "option",
    "unit",
    "membership",
    "partnership",
    "llc",
    "lp",
    "preferred",
    "common",
    "class a",
    "class b",
];

/// Classifies a position as debt or equity.
///
/// Investment-type keywords win when present; debt keywords are checked
/// before equity keywords. Otherwise field presence decides, with principal
/// taking precedence over shares.
#[must_use]
pub fn classify_asset_class(
    investment_type: Option<&str>,
    has_principal: bool,
    has_shares: bool,
) -> AssetClass {
    if let Some(kind) = investment_type {
        let lower = kind.to_lowercase();
        if DEBT_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
            return AssetClass::Debt;
        }
        if EQUITY_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
            return AssetClass::Equity;
        }
    }

    if has_principal {
        AssetClass::Debt
    } else if has_shares {
        AssetClass::Equity
    } else {
        AssetClass::Unknown
    }
}

/// Determines the affiliation category from an enumeration label or from
/// context dimension text.
///
/// Falls back to [`AffiliationCategory::Unaffiliated`] when neither carries
/// a signal.
#[must_use]
pub fn classify_affiliation(
    affiliation: Option<&str>,
    dimensions: &[Dimension],
) -> AffiliationCategory {
    if let Some(label) = affiliation {
        let lower = label.to_lowercase();
        if lower.contains("noncontrolled") || lower.contains("non-controlled") {
            return AffiliationCategory::NonControlledAffiliate;
        }
        if lower.contains("controlled") {
            return AffiliationCategory::ControlledAffiliate;
        }
        if lower.contains("unaffiliated") || lower.contains("nonaffiliated") {
            return AffiliationCategory::Unaffiliated;
        }
        if lower.contains("affiliate") {
            return AffiliationCategory::Affiliate;
        }
    }

    if !dimensions.is_empty() {
        let text = dimensions
            .iter()
            .map(|d| format!("{}={}", d.key, d.value))
            .collect::<Vec<_>>()
            .join(" ");
        if text.contains("NoncontrolledMember") || text.contains("NoncontrolledAffiliate") {
            return AffiliationCategory::NonControlledAffiliate;
        }
        if text.contains("ControlledMember") || text.contains("ControlledAffiliate") {
            return AffiliationCategory::ControlledAffiliate;
        }
        if text.contains("UnaffiliatedIssuerMember") || text.contains("NonaffiliatedIssuerMember") {
            return AffiliationCategory::Unaffiliated;
        }
        if text.contains("AffiliatedIssuerMember") {
            return AffiliationCategory::Affiliate;
        }
    }

    AffiliationCategory::Unaffiliated
}

/// Industry sector keywords, checked in order. More specific sectors first.
const INDUSTRY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "Software/Technology",
        &[
            "software", "saas", "platform", "cloud", "data analytics", "cybersecurity",
            "it services", "technology", "digital", "erp", "crm", "artificial intelligence",
            "machine learning", "app", "mobile", "internet", "web", "online", "e-learning",
            "information technology", "it solutions", "tech", "semiconductor",
        ],
    ),
    (
        "Healthcare Services",
        &[
            "healthcare", "medical", "hospital", "clinical", "patient", "pharmaceutical",
            "drug", "biotech", "life sciences", "dental", "veterinary", "health insurance",
            "physician", "healthcare services", "medical device", "healthcare equipment",
            "pharmacy", "diagnostic", "therapeutic", "wellness",
        ],
    ),
    (
        "Business Services",
        &[
            "staffing", "consulting", "outsourcing", "professional services",
            "human resources", "payroll", "marketing services", "advertising",
            "business process", "call center", "customer service", "research",
            "market research", "analytics", "legal services", "accounting",
        ],
    ),
    (
        "Financial Services",
        &[
            "insurance", "lending", "financial", "banking", "payments", "wealth management",
            "asset management", "credit", "fintech", "investment", "brokerage", "mortgage",
            "payment processing",
        ],
    ),
    (
        "Industrial/Manufacturing",
        &[
            "manufacturing", "industrial", "equipment", "machinery", "aerospace", "defense",
            "automotive", "construction", "fabrication", "metal", "plastic", "chemicals",
            "materials", "electrical", "mechanical", "tools", "components", "parts",
        ],
    ),
    (
        "Consumer Products",
        &[
            "consumer products", "consumer goods", "apparel", "clothing", "fashion",
            "footwear", "accessories", "beauty", "cosmetics", "personal care",
            "household products", "furniture", "home goods",
        ],
    ),
    (
        "Food & Beverage",
        &[
            "food", "beverage", "restaurant", "dining", "catering", "bakery", "brewery",
            "wine", "spirits", "coffee", "snack", "grocery", "culinary", "nutrition",
        ],
    ),
    (
        "Retail",
        &[
            "retail", "store", "shop", "e-commerce", "ecommerce", "merchant", "distribution",
            "wholesaler", "dealer",
        ],
    ),
    (
        "Media & Entertainment",
        &[
            "media", "entertainment", "broadcasting", "publishing", "content", "film",
            "music", "gaming", "sports", "events", "ticketing", "production", "creative",
            "agency",
        ],
    ),
    (
        "Education",
        &[
            "education", "school", "training", "learning", "university", "college",
            "educational", "tutoring", "curriculum",
        ],
    ),
    (
        "Energy & Utilities",
        &[
            "energy", "oil", "gas", "power", "utility", "utilities", "renewable", "solar",
            "wind", "pipeline", "electric", "natural gas", "petroleum", "fuel",
        ],
    ),
    (
        "Transportation & Logistics",
        &[
            "logistics", "transportation", "shipping", "freight", "trucking", "warehouse",
            "supply chain", "distribution", "delivery", "courier", "aviation", "airline",
            "cargo",
        ],
    ),
    (
        "Telecommunications",
        &[
            "telecommunications", "telecom", "wireless", "broadband", "network",
            "communication", "fiber", "tower",
        ],
    ),
    (
        "Real Estate",
        &[
            "real estate", "property", "housing", "commercial real estate", "residential",
            "leasing", "reit", "facilities",
        ],
    ),
    (
        "Hospitality",
        &["hospitality", "hotel", "resort", "lodging", "accommodation", "travel", "tourism", "venue"],
    ),
    (
        "Agriculture",
        &["agriculture", "farming", "agribusiness", "crop", "livestock", "agricultural", "farm"],
    ),
];

/// Sector returned when a description matches no keyword.
pub const OTHER_SECTOR: &str = "Other";

/// Sector returned when there is no description to classify.
pub const UNKNOWN_SECTOR: &str = "Unknown";

/// Classifies a business description into an industry sector.
#[must_use]
pub fn classify_industry(description: Option<&str>) -> &'static str {
    let Some(description) = description.map(str::trim).filter(|d| !d.is_empty()) else {
        return UNKNOWN_SECTOR;
    };
    let lower = description.to_lowercase();

    INDUSTRY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| lower.contains(kw)))
        .map_or(OTHER_SECTOR, |(sector, _)| sector)
}

/// Maps an industry sector label to the short code stored on portfolio companies.
///
/// Returns `None` for empty or unknown labels; unrecognized sectors map to `OTHER`.
#[must_use]
pub fn industry_code(sector: &str) -> Option<&'static str> {
    let lower = sector.trim().to_lowercase();
    let code = match lower.as_str() {
        "" | "unknown" => return None,
        "software/technology" | "software" | "technology" => "SOFTWARE",
        "healthcare" => "HEALTHCARE",
        "healthcare services" => "HEALTHCARE_SERVICES",
        "business services" => "BUSINESS_SERVICES",
        "financial services" => "FINANCIAL_SERVICES",
        "consumer products" | "consumer" => "CONSUMER",
        "consumer services" => "CONSUMER_SERVICES",
        "industrial/manufacturing" | "industrial" | "manufacturing" => "INDUSTRIAL",
        "transportation & logistics" | "transportation" | "logistics" => "TRANSPORTATION",
        "energy" | "energy & utilities" => "ENERGY",
        "media & entertainment" | "media" | "entertainment" => "MEDIA",
        "telecommunications" => "TELECOM",
        "real estate" => "REAL_ESTATE",
        "education" => "EDUCATION",
        "government services" => "GOVERNMENT",
        "food & beverage" => "FOOD_BEVERAGE",
        "retail" => "RETAIL",
        "hospitality" => "HOSPITALITY",
        "agriculture" => "AGRICULTURE",
        _ => "OTHER",
    };
    Some(code)
}
