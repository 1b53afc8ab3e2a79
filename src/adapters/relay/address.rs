//! Messaging address formatting.

/// Formats a raw contact number into a relay address.
///
/// The first two characters must be decimal digits; otherwise the contact is
/// unusable and `None` is returned. The country-code prefix is prepended
/// when the number does not already start with it, and the domain suffix is
/// appended when absent.
pub fn format_address(contact: &str, country_prefix: &str, suffix: &str) -> Option<String> {
    let head: String = contact.chars().take(2).collect();
    if head.is_empty() || !head.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let mut address = if head == country_prefix {
        contact.to_string()
    } else {
        format!("{country_prefix}{contact}")
    };

    if !address.ends_with(suffix) {
        address.push_str(suffix);
    }

    Some(address)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn prepends_country_code_when_absent() {
        assert_eq!(
            format_address("11999990000", "55", "@c.us").as_deref(),
            Some("5511999990000@c.us")
        );
    }

    #[test]
    fn keeps_existing_country_code() {
        assert_eq!(
            format_address("5511999990000", "55", "@c.us").as_deref(),
            Some("5511999990000@c.us")
        );
    }

    #[test]
    fn keeps_existing_suffix() {
        assert_eq!(
            format_address("5511999990000@c.us", "55", "@c.us").as_deref(),
            Some("5511999990000@c.us")
        );
    }

    #[test]
    fn rejects_non_digit_head() {
        assert!(format_address("ab11999990000", "55", "@c.us").is_none());
        assert!(format_address("+5511999990000", "55", "@c.us").is_none());
        assert!(format_address("", "55", "@c.us").is_none());
    }

    proptest! {
        #[test]
        fn formatted_addresses_always_carry_prefix_and_suffix(
            number in "[0-9]{4,13}",
        ) {
            let address = format_address(&number, "55", "@c.us").unwrap();
            prop_assert!(address.starts_with("55"));
            prop_assert!(address.ends_with("@c.us"));
        }

        #[test]
        fn formatting_is_idempotent(number in "[0-9]{4,13}") {
            let once = format_address(&number, "55", "@c.us").unwrap();
            let twice = format_address(&once, "55", "@c.us").unwrap();
            prop_assert_eq!(once, twice);
        }
    }
}
