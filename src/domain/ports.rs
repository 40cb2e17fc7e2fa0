use super::package::TvPackage;
use crate::error::{GatewayError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Transaction summary attached to a checkout link.
///
/// The gateway usually supplies this; when it does not, the HTTP adapter
/// synthesizes one locally as a compatibility shim.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionSummary {
    pub transaction_date: String,
    pub transaction_time: String,
    pub tv_package: String,
    pub account_number: String,
    pub amount: rust_decimal::Decimal,
    // The gateway uses snake_case for this one field only.
    #[serde(rename = "tx_ref")]
    pub tx_ref: String,
}

/// Outcome of a subscription request.
#[derive(Debug, PartialEq, Clone)]
pub enum SubscriptionOutcome {
    /// Synchronous-ready payment link.
    Checkout {
        url: String,
        summary: SubscriptionSummary,
    },
    /// Accepted asynchronously; poll by reference.
    Processing { reference: String },
    /// The gateway rejected the subscription.
    Declined { message: String },
}

/// Outcome of a status poll.
#[derive(Debug, PartialEq, Clone)]
pub enum StatusOutcome {
    Completed {
        account_number: String,
        package_name: String,
        expiry_date: Option<String>,
    },
    Failed {
        message: String,
    },
    Processing,
}

/// The external TV-subscription payment microservice.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn list_packages(&self) -> std::result::Result<Vec<TvPackage>, GatewayError>;
    async fn subscribe(
        &self,
        account_number: &str,
        package_id: u32,
    ) -> std::result::Result<SubscriptionOutcome, GatewayError>;
    async fn check_status(
        &self,
        reference: &str,
    ) -> std::result::Result<StatusOutcome, GatewayError>;
}

/// One-shot chat completion against the language model.
#[async_trait]
pub trait ChatService: Send + Sync {
    async fn send(&self, message: &str) -> Result<String>;
}

#[async_trait]
pub trait TranslationService: Send + Sync {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String>;
}

/// Transcribes 16 kHz mono LINEAR16 audio.
#[async_trait]
pub trait SpeechToText: Send + Sync {
    async fn transcribe(&self, audio: &[u8]) -> Result<String>;
}

/// Synthesizes speech as MP3 bytes.
#[async_trait]
pub trait TextToSpeech: Send + Sync {
    async fn synthesize(&self, text: &str, language_code: &str) -> Result<Vec<u8>>;
}
