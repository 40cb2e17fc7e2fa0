use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Parameters captured when the user selects a package, held until the
/// subscription is confirmed or cancelled.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct PaymentParams {
    pub package_id: u32,
    pub package_name: String,
    pub package_price: Decimal,
    pub service_name: String,
    pub account_number: String,
}

/// Record of a checkout link that has been issued to the user.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct ActivePayment {
    pub url: String,
    pub reference: String,
    pub issued_at: DateTime<Utc>,
}

/// Per-conversation payment state, persisted opaquely by the calling layer
/// between turns.
///
/// Each variant carries exactly the data that is valid in that state, so the
/// invariants of the flow hold by construction: confirmation parameters exist
/// only while a confirmation is pending, the transaction reference only while
/// a payment is processing. Clearing the session is assignment of `Idle`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PaymentSession {
    /// No payment activity in flight.
    #[default]
    Idle,
    /// A package was selected; waiting for the user's yes/no.
    AwaitingConfirmation { params: PaymentParams },
    /// The gateway accepted the subscription asynchronously; polling by
    /// reference until it completes, fails, or times out.
    Processing {
        reference: String,
        started_at: DateTime<Utc>,
    },
    /// Terminal sub-state: a checkout link was issued. The record is kept so
    /// the calling layer can surface it again, but the flow is over.
    CheckoutIssued { payment: ActivePayment },
}

impl PaymentSession {
    /// True while the flow holds in-flight state that must not be lost to an
    /// off-topic message (the "sticky" router contract).
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            Self::AwaitingConfirmation { .. } | Self::Processing { .. }
        )
    }

    /// Clears all payment state.
    pub fn clear(&mut self) {
        *self = Self::Idle;
    }
}
