//! Phone number utilities

use once_cell::sync::Lazy;
use regex::Regex;

// Ten-digit subscriber number (India mobile without country code)
static SUBSCRIBER_NUMBER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{10}$").expect("static regex")
});

/// Strip everything except ASCII digits
pub fn digits_only(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Normalize to a 10-digit subscriber number, or `None` if the digit count is wrong
pub fn normalize_subscriber_number(phone: &str) -> Option<String> {
    let digits = digits_only(phone);
    SUBSCRIBER_NUMBER_REGEX.is_match(&digits).then_some(digits)
}

/// Last ten digits of a number, tolerating country-code prefixes
pub fn last_ten_digits(phone: &str) -> String {
    let digits = digits_only(phone);
    let start = digits.len().saturating_sub(10);
    digits[start..].to_string()
}

/// Format a number in E.164, assuming India (+91) for bare 10-digit numbers
pub fn to_e164(phone: &str) -> String {
    let digits = digits_only(phone);
    if digits.len() == 10 {
        return format!("+91{}", digits);
    }
    format!("+{}", digits)
}

/// Mask a phone number for logs (e.g., 98****3210)
pub fn mask_phone_number(phone: &str) -> String {
    let digits = digits_only(phone);
    if digits.len() >= 6 {
        format!("{}****{}", &digits[..2], &digits[digits.len() - 4..])
    } else {
        "****".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_subscriber_number() {
        assert_eq!(
            normalize_subscriber_number("98765-43210"),
            Some("9876543210".to_string())
        );
        assert_eq!(
            normalize_subscriber_number("(987) 654 3210"),
            Some("9876543210".to_string())
        );
        assert_eq!(normalize_subscriber_number("+919876543210"), None);
        assert_eq!(normalize_subscriber_number("987654321"), None);
        assert_eq!(normalize_subscriber_number(""), None);
    }

    #[test]
    fn test_last_ten_digits() {
        assert_eq!(last_ten_digits("+91 98765 43210"), "9876543210");
        assert_eq!(last_ten_digits("9876543210"), "9876543210");
        assert_eq!(last_ten_digits("12345"), "12345");
    }

    #[test]
    fn test_to_e164() {
        assert_eq!(to_e164("9876543210"), "+919876543210");
        assert_eq!(to_e164("919876543210"), "+919876543210");
        assert_eq!(to_e164("+14155552671"), "+14155552671");
    }

    #[test]
    fn test_mask_phone_number() {
        assert_eq!(mask_phone_number("9876543210"), "98****3210");
        assert_eq!(mask_phone_number("+919876543210"), "91****3210");
        assert_eq!(mask_phone_number("12345"), "****");
    }
}
