use super::channel::ChannelDescriptor;
use super::field::{FieldError, FieldSchema};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;

/// Smallest amount a payout request may carry. The precondition gate checks
/// this before the dialog opens; the workflow re-checks on entry.
pub const MINIMUM_PAYOUT: Decimal = dec!(2);

/// Where the workflow currently is.
///
/// The submit outcome states collapse immediately: an accepted submission
/// resets to `Idle`, a rejected one returns to `FieldEntry`. Both are
/// reported through the notification sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    ChannelSelection,
    FieldFetching,
    FieldEntry,
    Submitting,
}

/// The whole form session as a value.
///
/// `fields` always belongs to the currently selected channel; every channel
/// switch clears it together with `field_errors` before anything else
/// happens. `field_errors` holds keys only for fields that are currently
/// invalid.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowState {
    pub source: Option<String>,
    pub amount: Decimal,
    pub selected_channel: Option<ChannelDescriptor>,
    pub fields: Vec<FieldSchema>,
    pub field_errors: BTreeMap<String, FieldError>,
    pub phase: Phase,
}

impl WorkflowState {
    pub fn new() -> Self {
        Self {
            source: None,
            amount: Decimal::ZERO,
            selected_channel: None,
            fields: Vec::new(),
            field_errors: BTreeMap::new(),
            phase: Phase::Idle,
        }
    }

    /// Drops all entry state. Used on dialog close and after an accepted
    /// submission.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Discards the entered values and inline errors of the previously
    /// selected channel. Amount and selection survive; they are the caller's
    /// to overwrite.
    pub fn clear_entry(&mut self) {
        self.fields.clear();
        self.field_errors.clear();
    }

    pub fn field(&self, token: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.token == token)
    }
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::field::InputKind;

    #[test]
    fn test_new_state_is_idle_and_empty() {
        let state = WorkflowState::new();
        assert_eq!(state.phase, Phase::Idle);
        assert!(state.source.is_none());
        assert!(state.selected_channel.is_none());
        assert!(state.fields.is_empty());
        assert!(state.field_errors.is_empty());
    }

    #[test]
    fn test_clear_entry_preserves_selection() {
        let mut state = WorkflowState::new();
        state.amount = dec!(10);
        state.selected_channel = Some(ChannelDescriptor::dynamic("masspay", "MassPay"));
        state.fields.push(FieldSchema::new("a", InputKind::Text, "A"));
        state.field_errors.insert(
            "a".to_string(),
            FieldError::RequiredFieldMissing {
                label: "A".to_string(),
            },
        );

        state.clear_entry();
        assert!(state.fields.is_empty());
        assert!(state.field_errors.is_empty());
        assert_eq!(state.amount, dec!(10));
        assert!(state.selected_channel.is_some());
    }
}
