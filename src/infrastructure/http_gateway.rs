//! HTTP adapter for the TV-subscription payment microservice.

use crate::domain::package::TvPackage;
use crate::domain::ports::{
    PaymentGateway, StatusOutcome, SubscriptionOutcome, SubscriptionSummary,
};
use crate::error::GatewayError;
use async_trait::async_trait;
use chrono::Local;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const READ_TIMEOUT: Duration = Duration::from_secs(5);
const SUBSCRIBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Thin client for the gateway's three endpoints. No retries; transport and
/// parse failures map to distinct [`GatewayError`] variants so callers can
/// collapse them into one user message while the log keeps the cause.
pub struct HttpPaymentGateway {
    client: Client,
    base_url: String,
}

impl HttpPaymentGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

fn transport_error(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        tracing::error!("payment gateway request timed out");
        GatewayError::Timeout
    } else {
        tracing::error!(error = %err, "payment gateway request failed");
        GatewayError::Unreachable(err.to_string())
    }
}

fn decode_error(err: reqwest::Error) -> GatewayError {
    tracing::error!(error = %err, "payment gateway returned malformed body");
    GatewayError::InvalidResponse(err.to_string())
}

#[derive(Deserialize)]
struct PackageDto {
    id: u32,
    name: String,
    price: Decimal,
    service: ServiceDto,
}

#[derive(Deserialize)]
struct ServiceDto {
    name: String,
}

impl From<PackageDto> for TvPackage {
    fn from(dto: PackageDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            price: dto.price,
            service: dto.service.name,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SubscribeRequest<'a> {
    account_number: &'a str,
    package_id: u32,
}

/// The gateway mixes key styles: `checkout_url` is snake_case while
/// `transactionRef` is camelCase.
#[derive(Deserialize)]
struct SubscribeResponse {
    checkout_url: Option<String>,
    status: Option<String>,
    #[serde(rename = "transactionRef")]
    transaction_ref: Option<String>,
    message: Option<String>,
    summary: Option<SubscriptionSummary>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusResponse {
    status: Option<String>,
    account_number: Option<String>,
    package_name: Option<String>,
    expiry_date: Option<String>,
    message: Option<String>,
}

/// Synthesizes the summary block the gateway sometimes omits. Compatibility
/// shim, not business logic: the amount placeholder is zero and the package
/// label is derived from the id.
fn synthesize_summary(account_number: &str, package_id: u32, tx_ref: String) -> SubscriptionSummary {
    let now = Local::now();
    SubscriptionSummary {
        transaction_date: now.format("%m/%d/%Y").to_string(),
        transaction_time: now.format("%I:%M:%S %p").to_string(),
        tv_package: format!("Package {package_id}"),
        account_number: account_number.to_string(),
        amount: Decimal::ZERO,
        tx_ref,
    }
}

fn subscription_outcome(
    response: SubscribeResponse,
    account_number: &str,
    package_id: u32,
) -> Result<SubscriptionOutcome, GatewayError> {
    if let Some(url) = response.checkout_url {
        let summary = response.summary.unwrap_or_else(|| {
            synthesize_summary(
                account_number,
                package_id,
                response.transaction_ref.unwrap_or_default(),
            )
        });
        return Ok(SubscriptionOutcome::Checkout { url, summary });
    }

    match response.status.as_deref() {
        Some("processing") => {
            let reference = response
                .transaction_ref
                .ok_or(GatewayError::MissingField("transactionRef"))?;
            Ok(SubscriptionOutcome::Processing { reference })
        }
        Some(_) => Ok(SubscriptionOutcome::Declined {
            message: response
                .message
                .unwrap_or_else(|| "Unknown error".to_string()),
        }),
        None => Err(GatewayError::MissingField("status")),
    }
}

fn status_outcome(response: StatusResponse) -> Result<StatusOutcome, GatewayError> {
    match response.status.as_deref() {
        Some("completed") => Ok(StatusOutcome::Completed {
            account_number: response
                .account_number
                .ok_or(GatewayError::MissingField("accountNumber"))?,
            package_name: response
                .package_name
                .ok_or(GatewayError::MissingField("packageName"))?,
            expiry_date: response.expiry_date,
        }),
        Some("failed") => Ok(StatusOutcome::Failed {
            message: response
                .message
                .unwrap_or_else(|| "Unknown error".to_string()),
        }),
        // Anything else, including gateway-side error shapes, is
        // non-terminal; the flow keeps polling until its ceiling.
        _ => Ok(StatusOutcome::Processing),
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn list_packages(&self) -> Result<Vec<TvPackage>, GatewayError> {
        let url = format!("{}/tv-subscriptions", self.base_url);
        tracing::debug!(%url, "fetching packages");

        let response = self
            .client
            .get(&url)
            .timeout(READ_TIMEOUT)
            .send()
            .await
            .map_err(transport_error)?
            .error_for_status()
            .map_err(transport_error)?;

        let packages: Vec<PackageDto> = response.json().await.map_err(decode_error)?;
        Ok(packages.into_iter().map(TvPackage::from).collect())
    }

    async fn subscribe(
        &self,
        account_number: &str,
        package_id: u32,
    ) -> Result<SubscriptionOutcome, GatewayError> {
        let url = format!("{}/tv-subscriptions/subscribe", self.base_url);
        let payload = SubscribeRequest {
            account_number,
            package_id,
        };

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .timeout(SUBSCRIBE_TIMEOUT)
            .send()
            .await
            .map_err(transport_error)?
            .error_for_status()
            .map_err(transport_error)?;

        let body: SubscribeResponse = response.json().await.map_err(decode_error)?;
        subscription_outcome(body, account_number, package_id)
    }

    async fn check_status(&self, reference: &str) -> Result<StatusOutcome, GatewayError> {
        let url = format!("{}/tv-subscriptions/status/{}", self.base_url, reference);

        let response = self
            .client
            .get(&url)
            .timeout(READ_TIMEOUT)
            .send()
            .await
            .map_err(transport_error)?;

        let body: StatusResponse = response.json().await.map_err(decode_error)?;
        status_outcome(body)
    }
}
