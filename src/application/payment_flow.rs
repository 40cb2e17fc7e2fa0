use crate::domain::extract::{extract_details, validate_account_number};
use crate::domain::package::format_package_listing;
use crate::domain::ports::{PaymentGateway, StatusOutcome, SubscriptionOutcome};
use crate::domain::reply::Reply;
use crate::domain::session::{ActivePayment, PaymentParams, PaymentSession};
use chrono::{TimeDelta, Utc};
use std::sync::Arc;

/// Phrases that request the package listing, honored from any state.
const LISTING_PHRASES: [&str; 3] = ["show packages", "list packages", "what packages"];

/// Keywords that start a package selection attempt.
const SELECTION_KEYWORDS: [&str; 5] = ["package", "pkg", "plan", "select", "want"];

/// Ceiling on asynchronous payment polling before the session is abandoned.
const PROCESSING_TIMEOUT_SECS: i64 = 300;

const WELCOME_MESSAGE: &str = "Welcome to TV Subscription Service!\n\n\
     To see available packages, type 'show packages'\n\
     To subscribe, type 'I want package [number] for account [your-account]'";

/// The multi-turn TV-subscription purchase flow.
///
/// Each inbound message is dispatched against the current session state with
/// a fixed precedence: listing requests first, then an in-flight status poll,
/// then a pending confirmation, then a selection attempt, and finally the
/// welcome prompt. `handle` is infallible; every gateway failure is converted
/// into an error reply and logged with its cause.
pub struct PaymentFlow {
    gateway: Arc<dyn PaymentGateway>,
}

impl PaymentFlow {
    pub fn new(gateway: Arc<dyn PaymentGateway>) -> Self {
        Self { gateway }
    }

    /// Processes one message, mutating the session to the next state.
    pub async fn handle(&self, session: &mut PaymentSession, message: &str) -> Reply {
        let lower = message.to_lowercase();

        // Listing is stateless and may be requested from any state.
        if LISTING_PHRASES.iter().any(|phrase| lower.contains(phrase)) {
            return self.list_packages().await;
        }

        if let PaymentSession::Processing {
            reference,
            started_at,
        } = session.clone()
        {
            return self.poll_status(session, &reference, started_at).await;
        }

        if let PaymentSession::AwaitingConfirmation { params } = session.clone() {
            return self.handle_confirmation(session, &lower, params).await;
        }

        if SELECTION_KEYWORDS.iter().any(|word| lower.contains(word)) {
            return self.select_package(session, message).await;
        }

        Reply::info(WELCOME_MESSAGE)
    }

    async fn list_packages(&self) -> Reply {
        match self.gateway.list_packages().await {
            Ok(packages) => Reply::packages(format_package_listing(&packages), packages),
            Err(err) => {
                tracing::error!(error = %err, "failed to fetch package listing");
                Reply::error("Could not fetch packages. Please try again later.")
            }
        }
    }

    /// Listing rendered as plain text for embedding into error replies.
    async fn listing_text(&self) -> String {
        match self.gateway.list_packages().await {
            Ok(packages) => format_package_listing(&packages),
            Err(err) => {
                tracing::error!(error = %err, "failed to fetch package listing");
                "Could not fetch packages. Please try again later.".to_string()
            }
        }
    }

    async fn select_package(&self, session: &mut PaymentSession, message: &str) -> Reply {
        let (package_id, account) = extract_details(message);

        let Some(package_id) = package_id else {
            return Reply::error(format!(
                "Please specify which package you want.\n\
                 Example: 'I want package 3 for account TV-12345678'\n\n{}",
                self.listing_text().await
            ));
        };

        let Some(account) = account else {
            return Reply::error("Please provide your TV account number to continue.");
        };

        if !validate_account_number(&account) {
            return Reply::error(
                "Invalid account number format (8-20 alphanumeric characters with optional hyphens)",
            );
        }

        // Re-fetched on every selection so a stale id cannot be confirmed.
        let packages = match self.gateway.list_packages().await {
            Ok(packages) => packages,
            Err(err) => {
                tracing::error!(error = %err, "failed to fetch packages for selection");
                return Reply::error("Could not fetch packages. Please try again later.");
            }
        };

        let Some(selected) = packages.iter().find(|pkg| pkg.id == package_id) else {
            return Reply::error(format!(
                "Package {} not found.\n\n{}",
                package_id,
                format_package_listing(&packages)
            ));
        };

        let params = PaymentParams {
            package_id,
            package_name: selected.name.clone(),
            package_price: selected.price,
            service_name: selected.service.clone(),
            account_number: account,
        };

        let message = format!(
            "Confirm Subscription:\n\n\
             Service: {}\n\
             Package: {} (ID: {})\n\
             Price: MK{} per month\n\
             Account: {}\n\n\
             Type 'yes' to confirm and proceed to payment or 'no' to cancel",
            params.service_name,
            params.package_name,
            params.package_id,
            params.package_price,
            params.account_number
        );

        *session = PaymentSession::AwaitingConfirmation {
            params: params.clone(),
        };
        Reply::confirmation(message, params)
    }

    async fn handle_confirmation(
        &self,
        session: &mut PaymentSession,
        lower: &str,
        params: PaymentParams,
    ) -> Reply {
        // Anything that is not an explicit "yes" cancels.
        if !lower.contains("yes") {
            session.clear();
            return Reply::info("Payment cancelled.");
        }

        let outcome = self
            .gateway
            .subscribe(&params.account_number, params.package_id)
            .await;

        match outcome {
            Ok(SubscriptionOutcome::Checkout { url, summary }) => {
                *session = PaymentSession::CheckoutIssued {
                    payment: ActivePayment {
                        url: url.clone(),
                        reference: summary.tx_ref.clone(),
                        issued_at: Utc::now(),
                    },
                };
                let message = format!(
                    "Please proceed to payment:\n\n\
                     Service: {}\n\
                     Package: {}\n\
                     Account: {}\n\
                     Amount: MK{}\n\n\
                     Payment Link: {}\n\n\
                     Click the link above to complete your payment.",
                    params.service_name,
                    params.package_name,
                    params.account_number,
                    params.package_price,
                    url
                );
                Reply::payment(message, url, params)
            }
            Ok(SubscriptionOutcome::Processing { reference }) => {
                *session = PaymentSession::Processing {
                    reference,
                    started_at: Utc::now(),
                };
                Reply::info("Processing your payment...")
            }
            Ok(SubscriptionOutcome::Declined { message }) => {
                session.clear();
                Reply::error(format!("Payment failed: {message}"))
            }
            Err(err) => {
                tracing::error!(error = %err, "subscription request failed");
                session.clear();
                Reply::error("Payment system error. Please try again later.")
            }
        }
    }

    async fn poll_status(
        &self,
        session: &mut PaymentSession,
        reference: &str,
        started_at: chrono::DateTime<Utc>,
    ) -> Reply {
        // A processing session without a reference cannot be resolved.
        if reference.is_empty() {
            session.clear();
            return Reply::error("Missing payment reference. Please start over.");
        }

        match self.gateway.check_status(reference).await {
            Ok(StatusOutcome::Completed {
                account_number,
                package_name,
                expiry_date,
            }) => {
                session.clear();
                Reply::success(format!(
                    "Payment completed!\n\nAccount: {}\nPackage: {}\nExpires: {}",
                    account_number,
                    package_name,
                    expiry_date.as_deref().unwrap_or("N/A")
                ))
            }
            Ok(StatusOutcome::Failed { message }) => {
                session.clear();
                Reply::error(format!("Payment failed: {message}"))
            }
            Ok(StatusOutcome::Processing) => self.still_processing(session, started_at),
            Err(err) => {
                // Transport failure during polling is not terminal; keep
                // waiting until the timeout ceiling.
                tracing::warn!(error = %err, reference, "status check failed");
                self.still_processing(session, started_at)
            }
        }
    }

    fn still_processing(
        &self,
        session: &mut PaymentSession,
        started_at: chrono::DateTime<Utc>,
    ) -> Reply {
        let elapsed = Utc::now().signed_duration_since(started_at);
        if elapsed > TimeDelta::seconds(PROCESSING_TIMEOUT_SECS) {
            session.clear();
            return Reply::error("Payment timeout. Please contact support.");
        }
        Reply::info("Payment still processing. We'll notify you when complete.")
    }
}
