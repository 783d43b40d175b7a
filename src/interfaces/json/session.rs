use crate::domain::channel::ChannelDescriptor;
use crate::domain::field::FieldSchema;
use crate::domain::ports::BalanceSource;
use crate::error::Result;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;

/// One user action in a replayed payout session.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEvent {
    SelectChannel { channel: String },
    Continue,
    SetField { token: String, value: String },
    ClearField { token: String },
    Submit,
    Close,
}

/// How the scripted gateway should answer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayResponse {
    Accept {
        #[serde(default)]
        message: Option<String>,
    },
    Reject {
        message: String,
    },
}

impl Default for GatewayResponse {
    fn default() -> Self {
        GatewayResponse::Accept { message: None }
    }
}

/// A complete scripted payout session: the fixture world (balances,
/// channels, field schemas, gateway response) plus the ordered user events
/// to replay through the workflow.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionScript {
    pub source: String,
    pub amount: Decimal,
    /// Defaults to a single source matching `source` with exactly `amount`
    /// available.
    #[serde(default)]
    pub balances: Vec<BalanceSource>,
    pub channels: Vec<ChannelDescriptor>,
    #[serde(default)]
    pub field_schemas: HashMap<String, Vec<FieldSchema>>,
    #[serde(default)]
    pub gateway: GatewayResponse,
    pub events: Vec<SessionEvent>,
}

impl SessionScript {
    /// Reads a script from any `Read` source (e.g. File, Stdin).
    pub fn from_reader<R: Read>(source: R) -> Result<Self> {
        let mut script: Self = serde_json::from_reader(source)?;
        if script.balances.is_empty() {
            script.balances = vec![BalanceSource {
                provider: script.source.clone(),
                available: script.amount,
                verification_required: false,
            }];
        }
        Ok(script)
    }
}
