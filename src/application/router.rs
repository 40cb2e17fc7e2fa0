use super::payment_flow::PaymentFlow;
use crate::domain::ports::{ChatService, SpeechToText, TextToSpeech, TranslationService};
use crate::domain::reply::Reply;
use crate::domain::session::PaymentSession;
use std::sync::Arc;

/// Keywords that pull a fresh message into the payment flow.
const PAYMENT_KEYWORDS: [&str; 6] = ["tv", "package", "plan", "subscribe", "channel", "show"];

const CHAT_ERROR_MESSAGE: &str = "An error occurred while processing your request.";

/// A voice turn: the textual reply plus its synthesized audio, when
/// synthesis succeeded.
#[derive(Debug, Clone)]
pub struct VoiceReply {
    pub reply: Reply,
    pub audio: Option<Vec<u8>>,
}

/// Routes each inbound message to either the TV-payment flow or a general
/// chat completion.
///
/// Routing is sticky: once the payment flow holds in-flight state, every
/// message goes to the flow until that state is cleared, so an off-topic
/// message cannot strand a half-finished payment. A fresh message enters the
/// flow only via the payment keyword set.
pub struct ChatRouter {
    flow: PaymentFlow,
    chat: Arc<dyn ChatService>,
    translator: Arc<dyn TranslationService>,
    speech_to_text: Arc<dyn SpeechToText>,
    text_to_speech: Arc<dyn TextToSpeech>,
}

impl ChatRouter {
    pub fn new(
        flow: PaymentFlow,
        chat: Arc<dyn ChatService>,
        translator: Arc<dyn TranslationService>,
        speech_to_text: Arc<dyn SpeechToText>,
        text_to_speech: Arc<dyn TextToSpeech>,
    ) -> Self {
        Self {
            flow,
            chat,
            translator,
            speech_to_text,
            text_to_speech,
        }
    }

    fn is_payment_related(session: &PaymentSession, message: &str) -> bool {
        if session.is_in_flight() {
            return true;
        }
        let lower = message.to_lowercase();
        PAYMENT_KEYWORDS.iter().any(|word| lower.contains(word))
    }

    /// Handles one text message, mutating the session as the flow dictates.
    pub async fn handle_message(&self, session: &mut PaymentSession, message: &str) -> Reply {
        if Self::is_payment_related(session, message) {
            return self.flow.handle(session, message).await;
        }

        match self.chat.send(message).await {
            // Scrub markdown emphasis the model tends to emit.
            Ok(response) => Reply::info(response.replace('*', "")),
            Err(err) => {
                tracing::error!(error = %err, "chat completion failed");
                Reply::error(CHAT_ERROR_MESSAGE)
            }
        }
    }

    /// Handles a message in the user's language: translates it to English,
    /// routes it, and translates the reply text back.
    pub async fn handle_translated(
        &self,
        session: &mut PaymentSession,
        message: &str,
        target_language: &str,
    ) -> Reply {
        let translated = match self.translator.translate(message, "en").await {
            Ok(text) => text,
            Err(err) => {
                tracing::error!(error = %err, "inbound translation failed");
                return Reply::error(CHAT_ERROR_MESSAGE);
            }
        };

        let mut reply = self.handle_message(session, &translated).await;

        match self.translator.translate(&reply.message, target_language).await {
            Ok(text) => reply.message = text,
            Err(err) => {
                // Reply stays in English rather than being dropped.
                tracing::warn!(error = %err, "outbound translation failed");
            }
        }
        reply
    }

    /// Handles a voice message: transcribes it, routes the transcript like a
    /// text message, and synthesizes the reply.
    pub async fn handle_voice(
        &self,
        session: &mut PaymentSession,
        audio: &[u8],
        language_code: &str,
    ) -> VoiceReply {
        let transcript = match self.speech_to_text.transcribe(audio).await {
            Ok(text) => text,
            Err(err) => {
                tracing::error!(error = %err, "transcription failed");
                return VoiceReply {
                    reply: Reply::error(CHAT_ERROR_MESSAGE),
                    audio: None,
                };
            }
        };
        tracing::debug!(%transcript, "transcribed voice message");

        let reply = self.handle_message(session, &transcript).await;

        let audio = match self
            .text_to_speech
            .synthesize(&reply.message, language_code)
            .await
        {
            Ok(bytes) => Some(bytes),
            Err(err) => {
                tracing::error!(error = %err, "speech synthesis failed");
                None
            }
        };

        VoiceReply { reply, audio }
    }
}
