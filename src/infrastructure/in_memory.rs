use crate::domain::channel::ChannelDescriptor;
use crate::domain::field::FieldSchema;
use crate::domain::payload::SubmissionPayload;
use crate::domain::ports::{
    BalanceCatalog, BalanceSource, ChannelCatalog, FieldSchemaProvider, Notification,
    NotificationSink, SubmissionGateway, SubmissionReceipt,
};
use crate::error::{GatewayError, Result, WithdrawError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::io;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Fixed list of balance sources. Consumed read-only, so no lock is needed.
#[derive(Default, Clone)]
pub struct InMemoryBalanceCatalog {
    sources: Vec<BalanceSource>,
}

impl InMemoryBalanceCatalog {
    pub fn new(sources: Vec<BalanceSource>) -> Self {
        Self { sources }
    }
}

#[async_trait]
impl BalanceCatalog for InMemoryBalanceCatalog {
    async fn sources(&self) -> Result<Vec<BalanceSource>> {
        Ok(self.sources.clone())
    }
}

/// Fixed channel catalog.
#[derive(Default, Clone)]
pub struct InMemoryChannelCatalog {
    channels: Vec<ChannelDescriptor>,
}

impl InMemoryChannelCatalog {
    pub fn new(channels: Vec<ChannelDescriptor>) -> Self {
        Self { channels }
    }
}

#[async_trait]
impl ChannelCatalog for InMemoryChannelCatalog {
    async fn channels(&self) -> Result<Vec<ChannelDescriptor>> {
        Ok(self.channels.clone())
    }
}

/// Field schemas keyed by channel token, with an optional scripted failure
/// for exercising the fetch-failed path.
#[derive(Default, Clone)]
pub struct InMemoryFieldSchemaProvider {
    schemas: HashMap<String, Vec<FieldSchema>>,
    failure: Option<String>,
}

impl InMemoryFieldSchemaProvider {
    pub fn new(schemas: HashMap<String, Vec<FieldSchema>>) -> Self {
        Self {
            schemas,
            failure: None,
        }
    }

    /// A provider whose every fetch fails with `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            schemas: HashMap::new(),
            failure: Some(message.to_string()),
        }
    }
}

#[async_trait]
impl FieldSchemaProvider for InMemoryFieldSchemaProvider {
    async fn fetch_fields(&self, channel_token: &str) -> Result<Vec<FieldSchema>> {
        if let Some(message) = &self.failure {
            return Err(WithdrawError::SchemaFetchFailed(message.clone()));
        }
        self.schemas
            .get(channel_token)
            .cloned()
            .ok_or_else(|| WithdrawError::UnknownChannel(channel_token.to_string()))
    }
}

#[derive(Clone)]
enum GatewayScript {
    Accept(Option<String>),
    Reject(String),
    TransportFailure,
}

/// Records every payload it receives and answers with a scripted response.
///
/// `Clone` shares the underlying record, so tests keep a handle while the
/// workflow owns the boxed port.
#[derive(Clone)]
pub struct RecordingGateway {
    payloads: Arc<RwLock<Vec<SubmissionPayload>>>,
    script: GatewayScript,
}

impl RecordingGateway {
    pub fn accepting() -> Self {
        Self {
            payloads: Arc::default(),
            script: GatewayScript::Accept(None),
        }
    }

    pub fn accepting_with_message(message: &str) -> Self {
        Self {
            payloads: Arc::default(),
            script: GatewayScript::Accept(Some(message.to_string())),
        }
    }

    pub fn rejecting(message: &str) -> Self {
        Self {
            payloads: Arc::default(),
            script: GatewayScript::Reject(message.to_string()),
        }
    }

    pub fn failing_transport() -> Self {
        Self {
            payloads: Arc::default(),
            script: GatewayScript::TransportFailure,
        }
    }

    pub async fn payloads(&self) -> Vec<SubmissionPayload> {
        self.payloads.read().await.clone()
    }
}

#[async_trait]
impl SubmissionGateway for RecordingGateway {
    async fn submit(
        &self,
        payload: &SubmissionPayload,
    ) -> std::result::Result<SubmissionReceipt, GatewayError> {
        self.payloads.write().await.push(payload.clone());
        match &self.script {
            GatewayScript::Accept(message) => Ok(SubmissionReceipt {
                message: message.clone(),
            }),
            GatewayScript::Reject(message) => Err(GatewayError::Rejected(message.clone())),
            GatewayScript::TransportFailure => Err(GatewayError::Transport(io::Error::new(
                io::ErrorKind::ConnectionReset,
                "connection reset by peer",
            ))),
        }
    }
}

/// Collects notifications for later inspection.
#[derive(Default, Clone)]
pub struct RecordingNotifications {
    notes: Arc<RwLock<Vec<Notification>>>,
}

impl RecordingNotifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn notes(&self) -> Vec<Notification> {
        self.notes.read().await.clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingNotifications {
    async fn notify(&self, note: Notification) {
        self.notes.write().await.push(note);
    }
}
