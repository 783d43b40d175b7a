use rust_decimal::Decimal;
use thiserror::Error;

/// Workflow-level errors. Field-level validation failures live in
/// [`crate::domain::field::FieldError`] and are recovered inline next to the
/// offending field; everything here is surfaced once through the
/// notification sink and leaves the workflow in a retryable state.
#[derive(Error, Debug)]
pub enum WithdrawError {
    #[error("no withdrawal in progress")]
    NotOpen,
    #[error("Please select a payment method")]
    ChannelNotSelected,
    #[error("unknown balance source: {0}")]
    UnknownBalanceSource(String),
    #[error("unknown payout channel: {0}")]
    UnknownChannel(String),
    #[error("payout channel {0} carries a fixed field set")]
    ChannelNotDynamic(String),
    #[error("Withdraw Amount must be at least ${0}")]
    AmountBelowMinimum(Decimal),
    #[error("amount exceeds the available balance")]
    InsufficientBalance,
    #[error("identity verification required before payout")]
    VerificationRequired,
    #[error("{0}")]
    SchemaFetchFailed(String),
    #[error("{0}")]
    SubmissionRejected(String),
    #[error("submission transport failed: {0}")]
    SubmissionTransportFailed(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed session script: {0}")]
    Script(#[from] serde_json::Error),
}

/// Errors returned by the submission gateway boundary.
///
/// `Rejected` is a business-level refusal whose message comes from the
/// gateway itself; `Transport` is a network-level failure.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("{0}")]
    Rejected(String),
    #[error("{0}")]
    Transport(#[from] std::io::Error),
}

impl From<GatewayError> for WithdrawError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Rejected(message) => WithdrawError::SubmissionRejected(message),
            GatewayError::Transport(cause) => {
                WithdrawError::SubmissionTransportFailed(cause.to_string())
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, WithdrawError>;
