use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A TV subscription package as advertised by the payment gateway.
///
/// Packages are read-only reference data. They are re-fetched from the
/// gateway on every selection rather than cached, trading an extra round
/// trip for freshness.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct TvPackage {
    /// The gateway-assigned package identifier.
    pub id: u32,
    /// Display name, e.g. "Basic".
    pub name: String,
    /// Monthly price in Malawian Kwacha.
    pub price: Decimal,
    /// The TV service this package belongs to, e.g. "DSTV".
    pub service: String,
}

impl fmt::Display for TvPackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}. {} ({}) - MK{}/month",
            self.id, self.name, self.service, self.price
        )
    }
}

/// Renders the package listing the way the assistant presents it to users,
/// sorted by id, with the subscription prompt appended.
pub fn format_package_listing(packages: &[TvPackage]) -> String {
    if packages.is_empty() {
        return "No available packages at this time".to_string();
    }

    let mut sorted: Vec<&TvPackage> = packages.iter().collect();
    sorted.sort_by_key(|pkg| pkg.id);

    let lines: Vec<String> = sorted.iter().map(|pkg| pkg.to_string()).collect();

    format!(
        "Available TV Packages:\n\n{}\n\nTo subscribe, reply with:\n'I want package [number] for account [your-account-number]'",
        lines.join("\n")
    )
}
