//! Subject identifier utilities
//!
//! Citizens are identified by a 12-digit national ID. The raw value is a
//! secret: it is only ever logged in masked form.

use once_cell::sync::Lazy;
use regex::Regex;

static IDENTIFIER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{12}$").expect("static regex")
});

/// Strip whitespace and check for exactly 12 ASCII digits
pub fn normalize_identifier(identifier: &str) -> Option<String> {
    let compact: String = identifier.chars().filter(|c| !c.is_whitespace()).collect();
    IDENTIFIER_REGEX.is_match(&compact).then_some(compact)
}

/// Mask an identifier for display (e.g., ********9012)
pub fn mask_identifier(identifier: &str) -> String {
    let len = identifier.chars().count();
    if len > 4 {
        let tail: String = identifier.chars().skip(len - 4).collect();
        format!("{}{}", "*".repeat(len - 4), tail)
    } else {
        "****".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_identifier() {
        assert_eq!(
            normalize_identifier("1234 5678 9012"),
            Some("123456789012".to_string())
        );
        assert_eq!(normalize_identifier("12345678901"), None);
        assert_eq!(normalize_identifier("1234567890123"), None);
        assert_eq!(normalize_identifier("12345678901a"), None);
        assert_eq!(normalize_identifier("1234-5678-9012"), None);
    }

    #[test]
    fn test_normalize_identifier_rejects_non_ascii_digits() {
        // Arabic-Indic and Devanagari digits
        assert_eq!(normalize_identifier("١٢٣٤٥٦٧٨٩٠١٢"), None);
        assert_eq!(normalize_identifier("१२३४५६७८९०१२"), None);
        assert_eq!(normalize_identifier("12345678901٢"), None);
    }

    #[test]
    fn test_mask_identifier() {
        assert_eq!(mask_identifier("123456789012"), "********9012");
        assert_eq!(mask_identifier("123"), "****");
    }
}
