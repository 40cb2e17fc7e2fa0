use thiserror::Error;

/// Failures of the remote payment gateway.
///
/// The variants are deliberately distinct so each cause can be logged
/// separately, even though the user-facing message collapses them into a
/// generic "service unavailable" reply.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("payment service timed out")]
    Timeout,
    #[error("payment service unreachable: {0}")]
    Unreachable(String),
    #[error("invalid response from payment service: {0}")]
    InvalidResponse(String),
    #[error("payment service response missing field: {0}")]
    MissingField(&'static str),
}

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),
    #[error("chat service error: {0}")]
    Chat(String),
    #[error("translation error: {0}")]
    Translation(String),
    #[error("speech error: {0}")]
    Speech(String),
    #[error("validation error: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, AgentError>;
