//! Free-text extraction of package and account references.

use regex::Regex;
use std::sync::LazyLock;

static PACKAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:package|pkg|plan)\s*(\d+)").unwrap());

static ACCOUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:account|acct|number)\s*([A-Z0-9-]+)").unwrap());

static ACCOUNT_FORMAT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9-]{8,20}$").unwrap());

/// Pulls the first package id and account token out of a free-text message.
///
/// The package id is the first integer following "package", "pkg" or "plan";
/// the account is the first run of uppercase letters, digits and hyphens
/// following "account", "acct" or "number". Either may be absent. A package
/// number too large for `u32` counts as absent rather than an error.
pub fn extract_details(message: &str) -> (Option<u32>, Option<String>) {
    let package_id = PACKAGE_RE
        .captures(message)
        .and_then(|caps| caps[1].parse::<u32>().ok());
    let account = ACCOUNT_RE
        .captures(message)
        .map(|caps| caps[1].to_string());
    (package_id, account)
}

/// Validates the account number format: 8-20 uppercase alphanumerics or
/// hyphens, nothing else. Full-string match, not a substring search.
pub fn validate_account_number(account: &str) -> bool {
    ACCOUNT_FORMAT_RE.is_match(account)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_package_and_account() {
        let (pkg, acct) = extract_details("I want package 3 for account TV-12345678");
        assert_eq!(pkg, Some(3));
        assert_eq!(acct.as_deref(), Some("TV-12345678"));
    }

    #[test]
    fn test_extracts_nothing_from_smalltalk() {
        assert_eq!(extract_details("hello"), (None, None));
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        let (pkg, acct) = extract_details("PLAN 7, ACCT X1Y2Z3-99");
        assert_eq!(pkg, Some(7));
        assert_eq!(acct.as_deref(), Some("X1Y2Z3-99"));
    }

    #[test]
    fn test_partial_extraction() {
        let (pkg, acct) = extract_details("give me package 2 please");
        assert_eq!(pkg, Some(2));
        assert_eq!(acct, None);
    }

    #[test]
    fn test_oversized_package_number_is_absent() {
        let (pkg, _) = extract_details("package 99999999999999999999");
        assert_eq!(pkg, None);
    }

    #[test]
    fn test_account_validation() {
        assert!(validate_account_number("TV-12345678"));
        assert!(!validate_account_number("abc"));
        assert!(!validate_account_number("TV 123"));
        assert!(!validate_account_number("lowercase-1234"));
        // Boundary lengths
        assert!(validate_account_number("A2345678"));
        assert!(!validate_account_number("A234567"));
        assert!(validate_account_number("A2345678901234567890"));
        assert!(!validate_account_number("A23456789012345678901"));
    }
}
