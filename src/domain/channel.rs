use super::field::{FieldSchema, InputKind};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How a channel's field set is obtained.
///
/// `Static` channels carry their full field list in source; `Dynamic`
/// channels have zero fields until a schema fetch succeeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ChannelKind {
    Static { fields: Vec<FieldSchema> },
    Dynamic,
}

/// One payout destination the user can route a withdrawal through.
///
/// `id` doubles as the destination token sent to the gateway. `fee` is
/// informational only and never gates progression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelDescriptor {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub kind: ChannelKind,
    #[serde(default)]
    pub fee: Option<Decimal>,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

impl ChannelDescriptor {
    pub fn dynamic(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            kind: ChannelKind::Dynamic,
            fee: None,
            thumbnail: None,
        }
    }

    pub fn fixed(id: &str, name: &str, fields: Vec<FieldSchema>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            kind: ChannelKind::Static { fields },
            fee: None,
            thumbnail: None,
        }
    }

    pub fn with_fee(mut self, fee: Decimal) -> Self {
        self.fee = Some(fee);
        self
    }

    pub fn with_thumbnail(mut self, url: &str) -> Self {
        self.thumbnail = Some(url.to_string());
        self
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self.kind, ChannelKind::Dynamic)
    }

    /// The source-defined field list, for static channels only.
    pub fn fixed_fields(&self) -> Option<&[FieldSchema]> {
        match &self.kind {
            ChannelKind::Static { fields } => Some(fields),
            ChannelKind::Dynamic => None,
        }
    }

    /// The SSN + wallet transfer channel. The wallet address may be
    /// pre-filled from the user's profile; a "change address" action empties
    /// it again for re-entry.
    pub fn ssn_wallet(wallet_address: Option<&str>) -> Self {
        let mut wallet = FieldSchema::new("wallet_address", InputKind::Text, "Wallet Address")
            .with_expected_value("0x1a2b…");
        if let Some(address) = wallet_address {
            wallet = wallet.with_value(address);
        }
        Self::fixed(
            "ssn_wallet",
            "Wallet Transfer",
            vec![
                FieldSchema::new("ssn", InputKind::Text, "Social Security Number")
                    .with_validation(r"^\d{3}-\d{2}-\d{4}$")
                    .with_expected_value("123-45-6789"),
                wallet,
            ],
        )
    }

    /// The card/billing channel.
    pub fn card_billing() -> Self {
        Self::fixed(
            "card_billing",
            "Card Payout",
            vec![
                FieldSchema::new("card_number", InputKind::Text, "Card Number")
                    .with_validation(r"^\d{13,19}$"),
                FieldSchema::new("card_expiration", InputKind::Date, "Card Expiration")
                    .with_validation(r"^(0[1-9]|1[0-2])/\d{2}$")
                    .with_expected_value("MM/YY"),
                FieldSchema::new("card_cvv", InputKind::Text, "CVV")
                    .with_validation(r"^\d{3,4}$"),
                FieldSchema::new("billing_address", InputKind::Text, "Billing Address"),
            ],
        )
    }
}
