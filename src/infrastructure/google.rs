//! Google Cloud REST adapters: Translate, Speech-to-Text, Text-to-Speech.
//!
//! All three use API-key query authentication and JSON bodies; audio crosses
//! the wire base64-encoded.

use crate::domain::ports::{SpeechToText, TextToSpeech, TranslationService};
use crate::error::{AgentError, Result};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use reqwest::Client;
use serde::{Deserialize, Serialize};

const TRANSLATE_URL: &str = "https://translation.googleapis.com/language/translate/v2";
const SPEECH_URL: &str = "https://speech.googleapis.com/v1/speech:recognize";
const TTS_URL: &str = "https://texttospeech.googleapis.com/v1/text:synthesize";
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

pub struct GoogleTranslate {
    client: Client,
    api_key: String,
}

impl GoogleTranslate {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
        }
    }
}

#[derive(Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    target: &'a str,
    format: &'static str,
}

#[derive(Deserialize)]
struct TranslateResponse {
    data: TranslateData,
}

#[derive(Deserialize)]
struct TranslateData {
    translations: Vec<Translation>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Translation {
    translated_text: String,
}

#[async_trait]
impl TranslationService for GoogleTranslate {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String> {
        let response = self
            .client
            .post(format!("{TRANSLATE_URL}?key={}", self.api_key))
            .json(&TranslateRequest {
                q: text,
                target: target_language,
                format: "text",
            })
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|err| AgentError::Translation(format!("request failed: {err}")))?
            .error_for_status()
            .map_err(|err| AgentError::Translation(err.to_string()))?;

        let parsed: TranslateResponse = response
            .json()
            .await
            .map_err(|err| AgentError::Translation(format!("malformed response: {err}")))?;

        parsed
            .data
            .translations
            .into_iter()
            .next()
            .map(|t| t.translated_text)
            .ok_or_else(|| AgentError::Translation("no translations returned".to_string()))
    }
}

pub struct GoogleSpeechToText {
    client: Client,
    api_key: String,
}

impl GoogleSpeechToText {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognizeRequest {
    config: RecognitionConfig,
    audio: RecognitionAudio,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognitionConfig {
    encoding: &'static str,
    sample_rate_hertz: u32,
    language_code: &'static str,
}

#[derive(Serialize)]
struct RecognitionAudio {
    content: String,
}

#[derive(Deserialize)]
struct RecognizeResponse {
    results: Option<Vec<RecognitionResult>>,
}

#[derive(Deserialize)]
struct RecognitionResult {
    alternatives: Vec<RecognitionAlternative>,
}

#[derive(Deserialize)]
struct RecognitionAlternative {
    transcript: String,
}

#[async_trait]
impl SpeechToText for GoogleSpeechToText {
    async fn transcribe(&self, audio: &[u8]) -> Result<String> {
        let request = RecognizeRequest {
            config: RecognitionConfig {
                encoding: "LINEAR16",
                sample_rate_hertz: 16_000,
                language_code: "en-US",
            },
            audio: RecognitionAudio {
                content: BASE64_STANDARD.encode(audio),
            },
        };

        let response = self
            .client
            .post(format!("{SPEECH_URL}?key={}", self.api_key))
            .json(&request)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|err| AgentError::Speech(format!("recognize request failed: {err}")))?
            .error_for_status()
            .map_err(|err| AgentError::Speech(err.to_string()))?;

        let parsed: RecognizeResponse = response
            .json()
            .await
            .map_err(|err| AgentError::Speech(format!("malformed response: {err}")))?;

        parsed
            .results
            .and_then(|results| results.into_iter().next())
            .and_then(|result| result.alternatives.into_iter().next())
            .map(|alt| alt.transcript)
            .ok_or_else(|| AgentError::Speech("no transcription results".to_string()))
    }
}

pub struct GoogleTextToSpeech {
    client: Client,
    api_key: String,
}

impl GoogleTextToSpeech {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeRequest<'a> {
    input: SynthesisInput<'a>,
    voice: VoiceSelection<'a>,
    audio_config: AudioConfig,
}

#[derive(Serialize)]
struct SynthesisInput<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceSelection<'a> {
    language_code: &'a str,
    ssml_gender: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig {
    audio_encoding: &'static str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    audio_content: String,
}

#[async_trait]
impl TextToSpeech for GoogleTextToSpeech {
    async fn synthesize(&self, text: &str, language_code: &str) -> Result<Vec<u8>> {
        let request = SynthesizeRequest {
            input: SynthesisInput { text },
            voice: VoiceSelection {
                language_code,
                ssml_gender: "NEUTRAL",
            },
            audio_config: AudioConfig {
                audio_encoding: "MP3",
            },
        };

        let response = self
            .client
            .post(format!("{TTS_URL}?key={}", self.api_key))
            .json(&request)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|err| AgentError::Speech(format!("synthesize request failed: {err}")))?
            .error_for_status()
            .map_err(|err| AgentError::Speech(err.to_string()))?;

        let parsed: SynthesizeResponse = response
            .json()
            .await
            .map_err(|err| AgentError::Speech(format!("malformed response: {err}")))?;

        BASE64_STANDARD
            .decode(parsed.audio_content)
            .map_err(|err| AgentError::Speech(format!("invalid audio payload: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognize_request_shape() {
        let request = RecognizeRequest {
            config: RecognitionConfig {
                encoding: "LINEAR16",
                sample_rate_hertz: 16_000,
                language_code: "en-US",
            },
            audio: RecognitionAudio {
                content: BASE64_STANDARD.encode(b"pcm"),
            },
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["config"]["sampleRateHertz"], 16_000);
        assert_eq!(json["config"]["encoding"], "LINEAR16");
        assert_eq!(json["audio"]["content"], "cGNt");
    }

    #[test]
    fn test_translate_response_parsing() {
        let json = r#"{"data":{"translations":[{"translatedText":"hello"}]}}"#;
        let parsed: TranslateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.data.translations[0].translated_text, "hello");
    }
}
