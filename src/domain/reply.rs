use super::package::TvPackage;
use super::session::PaymentParams;
use serde::{Deserialize, Serialize};

/// Classifies a reply for the calling layer.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum ReplyKind {
    Info,
    Error,
    Success,
    Payment,
    Confirmation,
    Packages,
}

/// The uniform reply envelope returned for every inbound message.
///
/// `message` is always present; the structured payload fields are populated
/// per kind and omitted from serialization when absent.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Reply {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: ReplyKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<PaymentParams>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub packages: Option<Vec<TvPackage>>,
}

impl Reply {
    fn new(message: impl Into<String>, kind: ReplyKind) -> Self {
        Self {
            message: message.into(),
            kind,
            details: None,
            payment_url: None,
            packages: None,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, ReplyKind::Info)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, ReplyKind::Error)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, ReplyKind::Success)
    }

    pub fn packages(message: impl Into<String>, packages: Vec<TvPackage>) -> Self {
        Self {
            packages: Some(packages),
            ..Self::new(message, ReplyKind::Packages)
        }
    }

    pub fn confirmation(message: impl Into<String>, details: PaymentParams) -> Self {
        Self {
            details: Some(details),
            ..Self::new(message, ReplyKind::Confirmation)
        }
    }

    pub fn payment(
        message: impl Into<String>,
        payment_url: impl Into<String>,
        details: PaymentParams,
    ) -> Self {
        Self {
            details: Some(details),
            payment_url: Some(payment_url.into()),
            ..Self::new(message, ReplyKind::Payment)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_info_serializes_without_payload_fields() {
        let json = serde_json::to_value(Reply::info("hello")).unwrap();
        assert_eq!(json["message"], "hello");
        assert_eq!(json["type"], "info");
        assert!(json.get("details").is_none());
        assert!(json.get("payment_url").is_none());
        assert!(json.get("packages").is_none());
    }

    #[test]
    fn test_payment_reply_carries_url_and_details() {
        let details = PaymentParams {
            package_id: 1,
            package_name: "Basic".to_string(),
            package_price: dec!(50),
            service_name: "DSTV".to_string(),
            account_number: "TV-12345678".to_string(),
        };
        let reply = Reply::payment("pay here", "https://pay.example/x", details);
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["type"], "payment");
        assert_eq!(json["payment_url"], "https://pay.example/x");
        assert_eq!(json["details"]["account_number"], "TV-12345678");
    }
}
