use crate::domain::payload::SubmissionPayload;
use crate::domain::ports::{Notification, NotificationSink, SubmissionGateway, SubmissionReceipt};
use crate::error::GatewayError;
use async_trait::async_trait;
use std::io;

/// Prints notifications to stdout. Used by the driver binary.
pub struct ConsoleNotificationSink;

#[async_trait]
impl NotificationSink for ConsoleNotificationSink {
    async fn notify(&self, note: Notification) {
        println!("[{}] {}", note.kind, note.message);
    }
}

/// Prints each payload it receives as pretty JSON and answers with a
/// scripted response. Stands in for the real gateway in replayed sessions.
pub struct EchoGateway {
    reject: Option<String>,
    message: Option<String>,
}

impl EchoGateway {
    pub fn accepting(message: Option<String>) -> Self {
        Self {
            reject: None,
            message,
        }
    }

    pub fn rejecting(message: &str) -> Self {
        Self {
            reject: Some(message.to_string()),
            message: None,
        }
    }
}

#[async_trait]
impl SubmissionGateway for EchoGateway {
    async fn submit(
        &self,
        payload: &SubmissionPayload,
    ) -> std::result::Result<SubmissionReceipt, GatewayError> {
        let body = serde_json::to_string_pretty(payload)
            .map_err(|e| GatewayError::Transport(io::Error::other(e)))?;
        println!("{body}");
        match &self.reject {
            Some(message) => Err(GatewayError::Rejected(message.clone())),
            None => Ok(SubmissionReceipt {
                message: self.message.clone(),
            }),
        }
    }
}
