use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The input widget a field asks for. Closed set; there is no fallback kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Text,
    Options,
    Date,
}

/// One input required by a payout channel.
///
/// For dynamic channels the schema comes from the field-schema provider; for
/// static channels it is defined in [`crate::domain::channel`]. `token` is
/// the stable key within a channel's list, `label` is the user-facing
/// prompt, and `validation` holds either a regex source or, for `Options`
/// fields, the pipe-delimited set of allowed values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub token: String,
    pub input_kind: InputKind,
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub validation: Option<String>,
    #[serde(default)]
    pub expected_value: Option<String>,
    #[serde(default)]
    pub value: String,
}

impl FieldSchema {
    pub fn new(token: &str, input_kind: InputKind, label: &str) -> Self {
        Self {
            token: token.to_string(),
            input_kind,
            label: label.to_string(),
            required: true,
            validation: None,
            expected_value: None,
            value: String::new(),
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_validation(mut self, pattern: &str) -> Self {
        self.validation = Some(pattern.to_string());
        self
    }

    pub fn with_expected_value(mut self, hint: &str) -> Self {
        self.expected_value = Some(hint.to_string());
        self
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value = value.to_string();
        self
    }

    /// The allow-list encoded in `validation` for `Options` fields.
    pub fn options(&self) -> Vec<&str> {
        match (&self.input_kind, &self.validation) {
            (InputKind::Options, Some(allowed)) if !allowed.is_empty() => {
                allowed.split('|').collect()
            }
            _ => Vec::new(),
        }
    }
}

/// A validation failure for a single field. Messages are shown verbatim next
/// to the field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("{label} is required")]
    RequiredFieldMissing { label: String },
    #[error("Invalid {label}")]
    InvalidFieldValue { label: String },
}

/// Validates a field's current value against its schema.
///
/// Pure and synchronous; never mutates the field. A whitespace-only value
/// counts as empty. Optional fields left empty pass regardless of pattern.
/// `Options` fields are checked for exact membership in the allow-list;
/// other kinds compile `validation` as a Unicode regex, and a pattern that
/// fails to compile is treated the same as a non-match.
pub fn validate(field: &FieldSchema) -> Option<FieldError> {
    if field.value.trim().is_empty() {
        if field.required {
            return Some(FieldError::RequiredFieldMissing {
                label: field.label.clone(),
            });
        }
        return None;
    }

    match field.input_kind {
        InputKind::Options => {
            let allowed = field.options();
            if !allowed.is_empty() && !allowed.contains(&field.value.as_str()) {
                return Some(FieldError::InvalidFieldValue {
                    label: field.label.clone(),
                });
            }
            None
        }
        InputKind::Text | InputKind::Date => {
            let Some(pattern) = field.validation.as_deref().filter(|p| !p.is_empty()) else {
                return None;
            };
            match Regex::new(pattern) {
                Ok(re) if re.is_match(&field.value) => None,
                _ => Some(FieldError::InvalidFieldValue {
                    label: field.label.clone(),
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cvv() -> FieldSchema {
        FieldSchema::new("card_cvv", InputKind::Text, "CVV").with_validation(r"^\d{3,4}$")
    }

    #[test]
    fn test_required_field_empty() {
        let field = FieldSchema::new("ssn", InputKind::Text, "Social Security Number");
        assert_eq!(
            validate(&field),
            Some(FieldError::RequiredFieldMissing {
                label: "Social Security Number".to_string()
            })
        );
    }

    #[test]
    fn test_required_field_whitespace_only() {
        let field = FieldSchema::new("ssn", InputKind::Text, "Social Security Number")
            .with_value("   \t");
        assert_eq!(
            validate(&field),
            Some(FieldError::RequiredFieldMissing {
                label: "Social Security Number".to_string()
            })
        );
    }

    #[test]
    fn test_optional_field_empty_skips_pattern() {
        let field = FieldSchema::new("memo", InputKind::Text, "Memo")
            .optional()
            .with_validation(r"^\d+$");
        assert_eq!(validate(&field), None);
    }

    #[test]
    fn test_options_membership() {
        let field = FieldSchema::new("account_type", InputKind::Options, "Account Type")
            .with_validation("Checking|Savings|Business");

        for allowed in ["Checking", "Savings", "Business"] {
            let field = field.clone().with_value(allowed);
            assert_eq!(validate(&field), None);
        }

        let field = field.with_value("Brokerage");
        assert_eq!(
            validate(&field),
            Some(FieldError::InvalidFieldValue {
                label: "Account Type".to_string()
            })
        );
    }

    #[test]
    fn test_options_pipes_are_not_regex() {
        // "A|B" as a regex would match "A" inside "AB"; membership must not.
        let field = FieldSchema::new("choice", InputKind::Options, "Choice")
            .with_validation("A|B")
            .with_value("AB");
        assert!(validate(&field).is_some());
    }

    #[test]
    fn test_cvv_pattern() {
        for good in ["123", "1234"] {
            assert_eq!(validate(&cvv().with_value(good)), None);
        }
        for bad in ["12", "abcd", "12345"] {
            assert_eq!(
                validate(&cvv().with_value(bad)),
                Some(FieldError::InvalidFieldValue {
                    label: "CVV".to_string()
                })
            );
        }
    }

    #[test]
    fn test_malformed_pattern_is_invalid_not_panic() {
        let field = FieldSchema::new("ref", InputKind::Text, "Reference")
            .with_validation(r"[unclosed")
            .with_value("anything");
        assert_eq!(
            validate(&field),
            Some(FieldError::InvalidFieldValue {
                label: "Reference".to_string()
            })
        );
    }

    #[test]
    fn test_unicode_pattern() {
        let field = FieldSchema::new("name", InputKind::Text, "Name")
            .with_validation(r"^\p{L}+$")
            .with_value("Müller");
        assert_eq!(validate(&field), None);
    }

    #[test]
    fn test_date_kind_uses_pattern() {
        let field = FieldSchema::new("card_expiration", InputKind::Date, "Card Expiration")
            .with_validation(r"^(0[1-9]|1[0-2])/\d{2}$");
        assert_eq!(validate(&field.clone().with_value("09/27")), None);
        assert!(validate(&field.with_value("13/27")).is_some());
    }

    #[test]
    fn test_error_messages() {
        let missing = FieldError::RequiredFieldMissing {
            label: "Wallet Address".to_string(),
        };
        assert_eq!(missing.to_string(), "Wallet Address is required");

        let invalid = FieldError::InvalidFieldValue {
            label: "CVV".to_string(),
        };
        assert_eq!(invalid.to_string(), "Invalid CVV");
    }
}
