//! Short symbols for filers created from a name alone.

/// Name fragments of filers whose symbol is not their initials.
const KNOWN_FRAGMENTS: &[(&str, &str)] = &[
    ("ares capital", "ARCC"),
    ("main street capital", "MAIN"),
    ("hercules capital", "HTGC"),
    ("fs kkr capital", "FSK"),
    ("blue owl capital", "OBDC"),
    ("golub capital", "GBDC"),
    ("owl rock", "ORCC"),
    ("prospect capital", "PSEC"),
    ("trinity capital", "TRIN"),
    ("blackstone secured", "BXSL"),
];

/// Derives a ticker-like symbol from a filer name.
///
/// Known name fragments map to their listed symbol; anything else becomes
/// the uppercased initials of the first four words.
///
/// ```
/// use bdc_store::derive_ticker;
///
/// assert_eq!(derive_ticker("Ares Capital Corporation"), "ARCC");
/// assert_eq!(derive_ticker("New Mountain Finance Corporation"), "NMFC");
/// ```
#[must_use]
pub fn derive_ticker(name: &str) -> String {
    let lower = name.to_lowercase();
    if let Some((_, ticker)) = KNOWN_FRAGMENTS.iter().find(|(fragment, _)| lower.contains(fragment)) {
        return (*ticker).to_string();
    }

    name.split_whitespace()
        .take(4)
        .filter_map(|word| word.chars().find(|c| c.is_alphanumeric()))
        .flat_map(char::to_uppercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_fragments() {
        assert_eq!(derive_ticker("FS KKR Capital Corp"), "FSK");
        assert_eq!(derive_ticker("Blue Owl Capital Corporation"), "OBDC");
    }

    #[test]
    fn test_initials() {
        assert_eq!(derive_ticker("Sixth Street Specialty Lending, Inc."), "SSSL");
        assert_eq!(derive_ticker("(The) Alpha Fund"), "TAF");
        assert_eq!(derive_ticker(""), "");
    }
}
