//! End-to-end scenarios for the router and payment flow against scripted
//! collaborators.

use async_trait::async_trait;
use paysmart_agent::application::payment_flow::PaymentFlow;
use paysmart_agent::application::router::ChatRouter;
use paysmart_agent::domain::package::TvPackage;
use paysmart_agent::domain::ports::{
    ChatService, PaymentGateway, SpeechToText, StatusOutcome, SubscriptionOutcome, TextToSpeech,
    TranslationService,
};
use paysmart_agent::domain::reply::ReplyKind;
use paysmart_agent::domain::session::PaymentSession;
use paysmart_agent::error::{GatewayError, Result};
use rust_decimal_macros::dec;
use std::sync::Arc;

/// Gateway scripted for a full purchase journey: a one-package catalog, an
/// asynchronous subscription, and a configurable final status.
struct ScriptedGateway {
    final_status: StatusOutcome,
}

#[async_trait]
impl PaymentGateway for ScriptedGateway {
    async fn list_packages(&self) -> std::result::Result<Vec<TvPackage>, GatewayError> {
        Ok(vec![TvPackage {
            id: 1,
            name: "Basic".to_string(),
            price: dec!(50),
            service: "DSTV".to_string(),
        }])
    }

    async fn subscribe(
        &self,
        _account_number: &str,
        _package_id: u32,
    ) -> std::result::Result<SubscriptionOutcome, GatewayError> {
        Ok(SubscriptionOutcome::Processing {
            reference: "abc123".to_string(),
        })
    }

    async fn check_status(
        &self,
        _reference: &str,
    ) -> std::result::Result<StatusOutcome, GatewayError> {
        Ok(self.final_status.clone())
    }
}

struct EchoChat;

#[async_trait]
impl ChatService for EchoChat {
    async fn send(&self, message: &str) -> Result<String> {
        Ok(format!("echo: {message}"))
    }
}

struct IdentityTranslator;

#[async_trait]
impl TranslationService for IdentityTranslator {
    async fn translate(&self, text: &str, _target_language: &str) -> Result<String> {
        Ok(text.to_string())
    }
}

struct FixedTranscript(&'static str);

#[async_trait]
impl SpeechToText for FixedTranscript {
    async fn transcribe(&self, _audio: &[u8]) -> Result<String> {
        Ok(self.0.to_string())
    }
}

struct SilentVoice;

#[async_trait]
impl TextToSpeech for SilentVoice {
    async fn synthesize(&self, _text: &str, _language_code: &str) -> Result<Vec<u8>> {
        Ok(vec![0u8; 4])
    }
}

fn router(final_status: StatusOutcome) -> ChatRouter {
    ChatRouter::new(
        PaymentFlow::new(Arc::new(ScriptedGateway { final_status })),
        Arc::new(EchoChat),
        Arc::new(IdentityTranslator),
        Arc::new(FixedTranscript("what packages do you have")),
        Arc::new(SilentVoice),
    )
}

#[tokio::test]
async fn test_full_purchase_journey() {
    let router = router(StatusOutcome::Completed {
        account_number: "TV-12345678".to_string(),
        package_name: "Basic".to_string(),
        expiry_date: Some("2026-09-26".to_string()),
    });
    let mut session = PaymentSession::default();

    // Browse.
    let reply = router.handle_message(&mut session, "show packages").await;
    assert_eq!(reply.kind, ReplyKind::Packages);
    assert!(reply.message.contains("1. Basic (DSTV) - MK50/month"));
    assert!(reply.message.contains("I want package [number]"));
    assert_eq!(session, PaymentSession::Idle);

    // Select.
    let reply = router
        .handle_message(&mut session, "I want package 1 for account TV-12345678")
        .await;
    assert_eq!(reply.kind, ReplyKind::Confirmation);
    assert!(reply.message.contains("Account: TV-12345678"));
    assert!(session.is_in_flight());

    // Confirm.
    let reply = router.handle_message(&mut session, "yes").await;
    assert_eq!(reply.kind, ReplyKind::Info);
    assert!(reply.message.contains("Processing"));
    assert!(
        matches!(&session, PaymentSession::Processing { reference, .. } if reference == "abc123")
    );

    // Poll; the gateway reports completion and the session clears.
    let reply = router.handle_message(&mut session, "done yet?").await;
    assert_eq!(reply.kind, ReplyKind::Success);
    assert!(reply.message.contains("Package: Basic"));
    assert_eq!(session, PaymentSession::Idle);

    // Back to normal chat once the flow is over.
    let reply = router.handle_message(&mut session, "thanks, how are you?").await;
    assert_eq!(reply.message, "echo: thanks, how are you?");
}

#[tokio::test]
async fn test_cancellation_mid_flow_releases_router() {
    let router = router(StatusOutcome::Processing);
    let mut session = PaymentSession::default();

    router
        .handle_message(&mut session, "I want package 1 for account TV-12345678")
        .await;
    assert!(session.is_in_flight());

    // Sticky: an off-topic message still reaches the flow, which cancels.
    let reply = router.handle_message(&mut session, "never mind").await;
    assert!(reply.message.contains("cancelled"));
    assert_eq!(session, PaymentSession::Idle);

    // The next off-topic message goes to chat again.
    let reply = router.handle_message(&mut session, "never mind").await;
    assert_eq!(reply.message, "echo: never mind");
}

#[tokio::test]
async fn test_voice_turn_reaches_payment_flow() {
    let router = router(StatusOutcome::Processing);
    let mut session = PaymentSession::default();

    let voice = router
        .handle_voice(&mut session, b"riff-wav-bytes", "en-US")
        .await;
    // The fixed transcript asks about packages, so the flow answers.
    assert_eq!(voice.reply.kind, ReplyKind::Packages);
    assert!(voice.audio.is_some());
}

#[tokio::test]
async fn test_reply_envelope_shape_over_the_wire() {
    let router = router(StatusOutcome::Processing);
    let mut session = PaymentSession::default();

    let reply = router.handle_message(&mut session, "list packages").await;
    let json = serde_json::to_value(&reply).unwrap();

    assert_eq!(json["type"], "packages");
    assert_eq!(json["packages"][0]["id"], 1);
    assert_eq!(json["packages"][0]["service"], "DSTV");
    assert!(json.get("payment_url").is_none());
}
