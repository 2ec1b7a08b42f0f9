/// Normalizes a phone number to `+<country code><subscriber digits>`.
///
/// Every non-digit is dropped first, so `+256 712-345-678` and
/// `256712345678` end up the same. A leading trunk `0` is replaced by the
/// country code, a number already starting with the country code only gets
/// the `+`, anything else gets the full prefix.
pub fn normalize(phone_number: &str, country_code: &str) -> String {
    let digits: String = phone_number.chars().filter(|c| c.is_ascii_digit()).collect();

    if let Some(rest) = digits.strip_prefix('0') {
        format!("+{}{}", country_code, rest)
    } else if digits.starts_with(country_code) {
        format!("+{}", digits)
    } else {
        format!("+{}{}", country_code, digits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_number_gets_country_code() {
        assert_eq!(normalize("0712345678", "256"), "+256712345678");
    }

    #[test]
    fn number_with_country_code_gets_plus() {
        assert_eq!(normalize("256712345678", "256"), "+256712345678");
    }

    #[test]
    fn international_number_is_unchanged() {
        assert_eq!(normalize("+256712345678", "256"), "+256712345678");
    }

    #[test]
    fn separators_are_stripped() {
        assert_eq!(normalize("+256 712-345 678", "256"), "+256712345678");
        assert_eq!(normalize("(0712) 345 678", "256"), "+256712345678");
    }

    #[test]
    fn bare_subscriber_number_gets_full_prefix() {
        assert_eq!(normalize("712345678", "256"), "+256712345678");
    }
}
