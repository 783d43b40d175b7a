use crate::domain::channel::{ChannelDescriptor, ChannelKind};
use crate::domain::field::{self, FieldSchema};
use crate::domain::payload;
use crate::domain::ports::{
    BalanceCatalogBox, ChannelCatalogBox, FieldSchemaProviderBox, Notification,
    NotificationSinkBox, SubmissionGatewayBox,
};
use crate::domain::workflow::{MINIMUM_PAYOUT, Phase, WorkflowState};
use crate::error::{Result, WithdrawError};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Proof that a field-schema response belongs to the most recently initiated
/// fetch. Starting a new fetch, switching channel, or closing the dialog
/// bumps the workflow's generation, so a stale ticket fails the check in
/// [`WithdrawalWorkflow::apply_field_schema`] and its response is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
}

/// What a submit attempt amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Gateway accepted; the workflow has reset to `Idle`.
    Accepted,
    /// Gateway refused (business or transport); fields preserved for retry.
    Rejected,
    /// Validation failed; `field_errors` holds every failing field.
    Invalid,
    /// Nothing was submitted (no channel chosen, fields not yet fetched, or
    /// a submission already in flight).
    NotReady,
}

/// The multi-channel payout workflow engine.
///
/// Single-threaded and event-driven: user input and the two boundary calls
/// (field-schema fetch, submission) are the only suspension points. There is
/// no true concurrent mutation, only cancellation-by-supersession via
/// [`FetchTicket`].
pub struct WithdrawalWorkflow {
    balances: BalanceCatalogBox,
    channels: ChannelCatalogBox,
    schemas: FieldSchemaProviderBox,
    gateway: SubmissionGatewayBox,
    notifications: NotificationSinkBox,
    state: WorkflowState,
    fetch_generation: u64,
}

impl WithdrawalWorkflow {
    pub fn new(
        balances: BalanceCatalogBox,
        channels: ChannelCatalogBox,
        schemas: FieldSchemaProviderBox,
        gateway: SubmissionGatewayBox,
        notifications: NotificationSinkBox,
    ) -> Self {
        Self {
            balances,
            channels,
            schemas,
            gateway,
            notifications,
            state: WorkflowState::new(),
            fetch_generation: 0,
        }
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn fields(&self) -> &[FieldSchema] {
        &self.state.fields
    }

    pub fn field_errors(&self) -> &BTreeMap<String, field::FieldError> {
        &self.state.field_errors
    }

    pub fn selected_channel(&self) -> Option<&ChannelDescriptor> {
        self.state.selected_channel.as_ref()
    }

    /// Opens the payout dialog for one balance source.
    ///
    /// Re-checks the precondition gate: the source must exist, the amount
    /// must meet [`MINIMUM_PAYOUT`] and fit the available balance, and the
    /// source must not be awaiting identity verification. On refusal the
    /// workflow stays `Idle`.
    pub async fn open(&mut self, provider: &str, amount: Decimal) -> Result<()> {
        let sources = self.balances.sources().await?;
        let source = sources
            .iter()
            .find(|s| s.provider == provider)
            .ok_or_else(|| WithdrawError::UnknownBalanceSource(provider.to_string()))?;

        if amount < MINIMUM_PAYOUT {
            let err = WithdrawError::AmountBelowMinimum(MINIMUM_PAYOUT);
            self.notifications
                .notify(Notification::error(err.to_string()))
                .await;
            return Err(err);
        }
        if amount > source.available {
            return Err(WithdrawError::InsufficientBalance);
        }
        if source.verification_required {
            return Err(WithdrawError::VerificationRequired);
        }

        self.state.reset();
        self.state.source = Some(provider.to_string());
        self.state.amount = amount;
        self.state.phase = Phase::ChannelSelection;
        tracing::debug!(%provider, %amount, "payout dialog opened");
        Ok(())
    }

    /// Selects a channel from the catalog.
    ///
    /// Switching discards the previous channel's entered values and inline
    /// errors and invalidates any fetch still in flight. A static channel's
    /// fixed field list is installed immediately; a dynamic channel stays at
    /// `ChannelSelection` until [`Self::continue_to_fields`].
    pub async fn select_channel(&mut self, channel_id: &str) -> Result<()> {
        match self.state.phase {
            Phase::Idle => return Err(WithdrawError::NotOpen),
            Phase::Submitting => return Ok(()),
            _ => {}
        }

        let catalog = self.channels.channels().await?;
        let Some(channel) = catalog.into_iter().find(|c| c.id == channel_id) else {
            return Err(WithdrawError::UnknownChannel(channel_id.to_string()));
        };

        self.fetch_generation += 1;
        self.state.clear_entry();
        match &channel.kind {
            ChannelKind::Static { fields } => {
                self.state.fields = fields.clone();
                self.state.phase = Phase::FieldEntry;
            }
            ChannelKind::Dynamic => {
                self.state.phase = Phase::ChannelSelection;
            }
        }
        if let Some(fee) = channel.fee {
            tracing::debug!(%channel_id, %fee, "channel fee resolved");
        }
        tracing::debug!(%channel_id, "channel selected");
        self.state.selected_channel = Some(channel);
        Ok(())
    }

    /// Proceeds from channel selection to field entry.
    ///
    /// With no channel selected this only raises a notification. Static
    /// channels already have their fields installed; dynamic channels go
    /// through a schema fetch.
    pub async fn continue_to_fields(&mut self) -> Result<()> {
        let Some(channel) = self.state.selected_channel.clone() else {
            self.notifications
                .notify(Notification::error(
                    WithdrawError::ChannelNotSelected.to_string(),
                ))
                .await;
            return Ok(());
        };

        if !channel.is_dynamic() {
            self.state.phase = Phase::FieldEntry;
            return Ok(());
        }

        let ticket = self.begin_field_fetch()?;
        let outcome = self.schemas.fetch_fields(&channel.id).await;
        self.apply_field_schema(ticket, outcome).await
    }

    /// Starts a schema fetch for the selected dynamic channel, superseding
    /// any fetch already in flight.
    pub fn begin_field_fetch(&mut self) -> Result<FetchTicket> {
        let channel = self
            .state
            .selected_channel
            .as_ref()
            .ok_or(WithdrawError::ChannelNotSelected)?;
        if !channel.is_dynamic() {
            return Err(WithdrawError::ChannelNotDynamic(channel.id.clone()));
        }

        self.fetch_generation += 1;
        self.state.phase = Phase::FieldFetching;
        Ok(FetchTicket {
            generation: self.fetch_generation,
        })
    }

    /// Applies the result of a schema fetch.
    ///
    /// A ticket issued before a newer fetch, a channel switch, or a close is
    /// stale; its result is discarded without touching `fields`. On success
    /// the field list is replaced wholesale, every value reset to empty. On
    /// failure one notification is raised and the phase returns to
    /// `ChannelSelection` so the user may retry or pick another channel.
    pub async fn apply_field_schema(
        &mut self,
        ticket: FetchTicket,
        outcome: Result<Vec<FieldSchema>>,
    ) -> Result<()> {
        if ticket.generation != self.fetch_generation {
            tracing::warn!(
                stale = ticket.generation,
                current = self.fetch_generation,
                "discarding stale field-schema response"
            );
            return Ok(());
        }

        match outcome {
            Ok(fields) => {
                self.state.fields = fields
                    .into_iter()
                    .map(|mut f| {
                        f.value = String::new();
                        f
                    })
                    .collect();
                self.state.field_errors.clear();
                self.state.phase = Phase::FieldEntry;
                tracing::debug!(count = self.state.fields.len(), "field schema installed");
                Ok(())
            }
            Err(err) => {
                self.state.phase = Phase::ChannelSelection;
                tracing::warn!(error = %err, "field-schema fetch failed");
                self.notifications
                    .notify(Notification::error(err.to_string()))
                    .await;
                Ok(())
            }
        }
    }

    /// Updates one field's value and re-runs validation for that field,
    /// updating or removing its `field_errors` entry. Unknown tokens are
    /// ignored.
    pub fn edit_field(&mut self, token: &str, value: impl Into<String>) {
        let Some(field) = self.state.fields.iter_mut().find(|f| f.token == token) else {
            return;
        };
        field.value = value.into();
        let error = field::validate(field);
        match error {
            Some(err) => {
                self.state.field_errors.insert(token.to_string(), err);
            }
            None => {
                self.state.field_errors.remove(token);
            }
        }
    }

    /// Empties a field for re-entry (the "change address" action on a
    /// pre-filled static field).
    pub fn clear_field(&mut self, token: &str) {
        self.edit_field(token, "");
    }

    /// Validates everything in scope and, if clean, hands the assembled
    /// payload to the gateway.
    ///
    /// Validation failures are aggregated into `field_errors` in one batch
    /// and the gateway is never called. An accepted submission resets the
    /// workflow to `Idle`; a refusal returns to `FieldEntry` with fields and
    /// amount preserved. While `Submitting`, further submits are no-ops, so
    /// the gateway is never invoked more than once concurrently.
    pub async fn submit(&mut self) -> Result<SubmitOutcome> {
        if self.state.phase == Phase::Idle {
            return Err(WithdrawError::NotOpen);
        }
        if self.state.selected_channel.is_none() {
            self.notifications
                .notify(Notification::error(
                    WithdrawError::ChannelNotSelected.to_string(),
                ))
                .await;
            return Ok(SubmitOutcome::NotReady);
        }
        if self.state.phase != Phase::FieldEntry {
            return Ok(SubmitOutcome::NotReady);
        }

        let mut errors = BTreeMap::new();
        for field in &self.state.fields {
            if let Some(err) = field::validate(field) {
                errors.insert(field.token.clone(), err);
            }
        }
        if !errors.is_empty() {
            self.state.field_errors = errors;
            self.notifications
                .notify(Notification::error(
                    "Please fill in all required fields correctly",
                ))
                .await;
            return Ok(SubmitOutcome::Invalid);
        }
        self.state.field_errors.clear();

        let payload = payload::build_payload(&self.state)?;
        self.state.phase = Phase::Submitting;
        match self.gateway.submit(&payload).await {
            Ok(receipt) => {
                let message = receipt
                    .message
                    .unwrap_or_else(|| "Withdraw request submitted successfully!".to_string());
                tracing::info!(source = %payload.source, "withdrawal accepted");
                self.notifications
                    .notify(Notification::success(message))
                    .await;
                self.fetch_generation += 1;
                self.state.reset();
                Ok(SubmitOutcome::Accepted)
            }
            Err(err) => {
                let err = WithdrawError::from(err);
                let message = match &err {
                    WithdrawError::SubmissionRejected(message) => message.clone(),
                    _ => "Something went wrong".to_string(),
                };
                tracing::error!(error = %err, "withdrawal submission failed");
                self.notifications.notify(Notification::error(message)).await;
                self.state.phase = Phase::FieldEntry;
                Ok(SubmitOutcome::Rejected)
            }
        }
    }

    /// Closes the dialog: all entry state is dropped and interest in any
    /// outstanding fetch or submission result is cancelled.
    pub fn close(&mut self) {
        self.fetch_generation += 1;
        self.state.reset();
    }
}
