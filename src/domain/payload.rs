use super::channel::ChannelKind;
use super::workflow::WorkflowState;
use crate::error::{Result, WithdrawError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One entered field as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValue {
    pub token: String,
    pub value: String,
}

/// The channel-specific half of a submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "route", rename_all = "lowercase")]
pub enum ChannelPayload {
    Static {
        channel_id: String,
        entries: Vec<FieldValue>,
    },
    Dynamic {
        destination_token: String,
        values: Vec<FieldValue>,
    },
}

/// The request body handed to the submission gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub amount: Decimal,
    pub source: String,
    #[serde(flatten)]
    pub channel: ChannelPayload,
}

/// Assembles the submission body from the current state.
///
/// Only the selected channel's fields can appear here: the state machine
/// clears `fields` on every channel switch, so whatever is in `state.fields`
/// belongs to `state.selected_channel`. Order is preserved and empty-valued
/// optional fields are included.
pub fn build_payload(state: &WorkflowState) -> Result<SubmissionPayload> {
    let channel = state
        .selected_channel
        .as_ref()
        .ok_or(WithdrawError::ChannelNotSelected)?;
    let source = state.source.clone().ok_or(WithdrawError::NotOpen)?;

    let entries: Vec<FieldValue> = state
        .fields
        .iter()
        .map(|f| FieldValue {
            token: f.token.clone(),
            value: f.value.clone(),
        })
        .collect();

    let channel = match &channel.kind {
        ChannelKind::Static { .. } => ChannelPayload::Static {
            channel_id: channel.id.clone(),
            entries,
        },
        ChannelKind::Dynamic => ChannelPayload::Dynamic {
            destination_token: channel.id.clone(),
            values: entries,
        },
    };

    Ok(SubmissionPayload {
        amount: state.amount,
        source,
        channel,
    })
}
