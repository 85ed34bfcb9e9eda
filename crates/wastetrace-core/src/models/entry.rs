//! Transaction entry models: recorded supply, transfer, and return movements.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::validation::{normalize_quantity, ValidationError};

/// Kind of recorded movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Supply,
    Transfer,
    Return,
}

impl TransactionType {
    /// Parse a user-supplied type name, e.g. from a CLI argument.
    pub fn from_input(s: &str) -> Result<Self, ValidationError> {
        match s.trim().to_lowercase().as_str() {
            "supply" => Ok(TransactionType::Supply),
            "transfer" => Ok(TransactionType::Transfer),
            "return" => Ok(TransactionType::Return),
            other => Err(ValidationError::UnknownTransactionType(other.to_string())),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Supply => write!(f, "supply"),
            TransactionType::Transfer => write!(f, "transfer"),
            TransactionType::Return => write!(f, "return"),
        }
    }
}

/// Package-level quantity breakdown for one entry.
///
/// Serialized flat into the entry payload, matching the wire format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quantities {
    #[serde(default)]
    pub unit: u32,
    #[serde(default)]
    pub dozen: u32,
    #[serde(default)]
    pub half_dozen: u32,
    #[serde(default)]
    pub case: u32,
    #[serde(default)]
    pub series: u32,
    #[serde(default)]
    pub level_16: u32,
    #[serde(default)]
    pub level_10: u32,
}

impl Quantities {
    pub fn total(&self) -> u64 {
        u64::from(self.unit)
            + u64::from(self.dozen)
            + u64::from(self.half_dozen)
            + u64::from(self.case)
            + u64::from(self.series)
            + u64::from(self.level_16)
            + u64::from(self.level_10)
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Raw quantity fields exactly as typed into a form.
///
/// Normalized with [`QuantityInput::normalize`] before submission.
#[derive(Debug, Clone, Default)]
pub struct QuantityInput {
    pub unit: String,
    pub dozen: String,
    pub half_dozen: String,
    pub case: String,
    pub series: String,
    pub level_16: String,
    pub level_10: String,
}

impl QuantityInput {
    /// Normalize every field: empty or unparseable input becomes 0,
    /// negative input is rejected.
    pub fn normalize(&self) -> Result<Quantities, ValidationError> {
        Ok(Quantities {
            unit: normalize_quantity(&self.unit, "unit")?,
            dozen: normalize_quantity(&self.dozen, "dozen")?,
            half_dozen: normalize_quantity(&self.half_dozen, "half_dozen")?,
            case: normalize_quantity(&self.case, "case")?,
            series: normalize_quantity(&self.series, "series")?,
            level_16: normalize_quantity(&self.level_16, "level_16")?,
            level_10: normalize_quantity(&self.level_10, "level_10")?,
        })
    }
}

/// A recorded transaction as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    pub transaction_type: TransactionType,
    #[serde(default)]
    pub source_account_id: Option<String>,
    #[serde(default)]
    pub target_account_id: Option<String>,
    #[serde(default)]
    pub pin: String,
    #[serde(default)]
    pub product_group: String,
    #[serde(default)]
    pub product_name: String,
    #[serde(flatten)]
    pub quantities: Quantities,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Payload for recording a new transaction.
#[derive(Debug, Clone, Serialize)]
pub struct NewEntry {
    pub transaction_type: TransactionType,
    pub source_account_id: Option<String>,
    pub target_account_id: Option<String>,
    pub pin: String,
    pub product_group: String,
    pub product_name: String,
    #[serde(flatten)]
    pub quantities: Quantities,
}

impl NewEntry {
    /// Required-field check matching the data-entry form rules.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.pin.trim().is_empty() {
            return Err(ValidationError::MissingField("pin"));
        }
        if self.product_group.trim().is_empty() {
            return Err(ValidationError::MissingField("product_group"));
        }
        if self.product_name.trim().is_empty() {
            return Err(ValidationError::MissingField("product_name"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_type_wire_names() {
        let t: TransactionType = serde_json::from_str("\"return\"").unwrap();
        assert_eq!(t, TransactionType::Return);
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"return\"");
    }

    #[test]
    fn test_quantities_serialize_flat() {
        let entry = NewEntry {
            transaction_type: TransactionType::Supply,
            source_account_id: Some("a-1".to_string()),
            target_account_id: None,
            pin: "1234".to_string(),
            product_group: "beverages".to_string(),
            product_name: "disposable beverage packages".to_string(),
            quantities: Quantities {
                unit: 5,
                dozen: 2,
                ..Quantities::default()
            },
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["unit"], 5);
        assert_eq!(value["dozen"], 2);
        assert_eq!(value["transaction_type"], "supply");
        assert!(value.get("quantities").is_none());
    }

    #[test]
    fn test_quantity_input_normalizes_blanks() {
        let input = QuantityInput {
            unit: "5".to_string(),
            dozen: String::new(),
            half_dozen: "x".to_string(),
            ..QuantityInput::default()
        };
        let q = input.normalize().unwrap();
        assert_eq!(q.unit, 5);
        assert_eq!(q.dozen, 0);
        assert_eq!(q.half_dozen, 0);
        assert_eq!(q.total(), 5);
    }

    #[test]
    fn test_quantity_input_rejects_negative() {
        let input = QuantityInput {
            case: "-1".to_string(),
            ..QuantityInput::default()
        };
        assert_eq!(
            input.normalize(),
            Err(ValidationError::NegativeQuantity("case"))
        );
    }

    #[test]
    fn test_new_entry_requires_product_fields() {
        let entry = NewEntry {
            transaction_type: TransactionType::Transfer,
            source_account_id: None,
            target_account_id: Some("a-2".to_string()),
            pin: "9876".to_string(),
            product_group: String::new(),
            product_name: "disposable plastic bags".to_string(),
            quantities: Quantities::default(),
        };
        assert_eq!(
            entry.validate(),
            Err(ValidationError::MissingField("product_group"))
        );
    }
}
