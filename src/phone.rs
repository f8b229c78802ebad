//! Indian mobile number handling
//!
//! Duplicate detection keys on the canonical digits-only form so the same
//! number collides regardless of how it was entered ("9876543210",
//! "+919876543210", "+91 98765 43210").

/// Canonical duplicate-detection key: digits only, with a leading `91`
/// country code stripped from 12-digit values.
pub fn canonical_key(raw: &str) -> String {
    let mut digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() == 12 && digits.starts_with("91") {
        digits.drain(..2);
    }
    digits
}

/// Display formatting: `+91 XXXXX XXXXX` grouping for full numbers, a
/// best-effort prefix for partial input, empty for no digits.
pub fn format_display(raw: &str) -> String {
    let digits = canonical_key(raw);
    if digits.len() >= 10 {
        format!("+91 {} {}", &digits[..5], &digits[5..10])
    } else if digits.len() > 5 {
        format!("+91 {} {}", &digits[..5], &digits[5..])
    } else if !digits.is_empty() {
        format!("+91 {digits}")
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_key_strips_formatting_and_country_code() {
        assert_eq!(canonical_key("9876543210"), "9876543210");
        assert_eq!(canonical_key("+919876543210"), "9876543210");
        assert_eq!(canonical_key("+91 98765 43210"), "9876543210");
        assert_eq!(canonical_key("919876543210"), "9876543210");
        // A bare 10-digit number starting with 91 is not a country code.
        assert_eq!(canonical_key("9198765432"), "9198765432");
    }

    #[test]
    fn format_display_groups_full_numbers() {
        assert_eq!(format_display("9876543210"), "+91 98765 43210");
        assert_eq!(format_display("+919876543210"), "+91 98765 43210");
    }

    #[test]
    fn format_display_handles_partial_input() {
        assert_eq!(format_display("98765432"), "+91 98765 432");
        assert_eq!(format_display("987"), "+91 987");
        assert_eq!(format_display(""), "");
        assert_eq!(format_display("abc"), "");
    }
}
