use super::channel::ChannelDescriptor;
use super::field::FieldSchema;
use super::payload::SubmissionPayload;
use crate::error::{GatewayError, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One balance the user can withdraw from, as reported by the balance
/// catalog. `verification_required` blocks payout until identity checks
/// pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSource {
    pub provider: String,
    pub available: Decimal,
    #[serde(default)]
    pub verification_required: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

impl fmt::Display for NoticeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoticeKind::Success => write!(f, "success"),
            NoticeKind::Error => write!(f, "error"),
        }
    }
}

/// A transient message for the user. The workflow decides what and when;
/// the sink decides how it is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

/// What the gateway returns for an accepted request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub message: Option<String>,
}

/// Read-only view of the user's balance sources.
#[async_trait]
pub trait BalanceCatalog: Send + Sync {
    async fn sources(&self) -> Result<Vec<BalanceSource>>;
}

/// The catalog of payout channels on offer.
#[async_trait]
pub trait ChannelCatalog: Send + Sync {
    async fn channels(&self) -> Result<Vec<ChannelDescriptor>>;
}

/// Retrieves a dynamic channel's ordered field list.
#[async_trait]
pub trait FieldSchemaProvider: Send + Sync {
    async fn fetch_fields(&self, channel_token: &str) -> Result<Vec<FieldSchema>>;
}

/// Performs the payout request itself.
#[async_trait]
pub trait SubmissionGateway: Send + Sync {
    async fn submit(
        &self,
        payload: &SubmissionPayload,
    ) -> std::result::Result<SubmissionReceipt, GatewayError>;
}

/// Renders transient success/error messages.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, note: Notification);
}

pub type BalanceCatalogBox = Box<dyn BalanceCatalog>;
pub type ChannelCatalogBox = Box<dyn ChannelCatalog>;
pub type FieldSchemaProviderBox = Box<dyn FieldSchemaProvider>;
pub type SubmissionGatewayBox = Box<dyn SubmissionGateway>;
pub type NotificationSinkBox = Box<dyn NotificationSink>;
