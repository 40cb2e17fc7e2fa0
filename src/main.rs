use clap::Parser;
use miette::{IntoDiagnostic, Result};
use paysmart_agent::application::payment_flow::PaymentFlow;
use paysmart_agent::application::router::ChatRouter;
use paysmart_agent::domain::session::PaymentSession;
use paysmart_agent::infrastructure::gemini::GeminiChat;
use paysmart_agent::infrastructure::google::{
    GoogleSpeechToText, GoogleTextToSpeech, GoogleTranslate,
};
use paysmart_agent::infrastructure::http_gateway::HttpPaymentGateway;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base URL of the TV-subscription payment gateway.
    #[arg(long, default_value = "http://localhost:3000")]
    gateway_url: String,

    /// Gemini API key for the general chat assistant.
    #[arg(long, env = "GEMINI_API_KEY", default_value = "")]
    gemini_api_key: String,

    /// Google Cloud API key for translation and speech.
    #[arg(long, env = "GOOGLE_API_KEY", default_value = "")]
    google_api_key: String,

    /// Converse in this language instead of English (e.g. "ny").
    #[arg(long)]
    language: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let flow = PaymentFlow::new(Arc::new(HttpPaymentGateway::new(&cli.gateway_url)));
    let router = ChatRouter::new(
        flow,
        Arc::new(GeminiChat::new(&cli.gemini_api_key)),
        Arc::new(GoogleTranslate::new(&cli.google_api_key)),
        Arc::new(GoogleSpeechToText::new(&cli.google_api_key)),
        Arc::new(GoogleTextToSpeech::new(&cli.google_api_key)),
    );

    // One session per process; the envelope for each turn goes to stdout as
    // a JSON line.
    let mut session = PaymentSession::default();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await.into_diagnostic()? {
        let message = line.trim();
        if message.is_empty() {
            continue;
        }

        let reply = match &cli.language {
            Some(language) => router.handle_translated(&mut session, message, language).await,
            None => router.handle_message(&mut session, message).await,
        };

        println!("{}", serde_json::to_string(&reply).into_diagnostic()?);
    }

    Ok(())
}
