//! Account models for participants in the waste-tracking programme.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category of participant account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    Household,
    Manufacturer,
    Business,
    Consumer,
    /// Categories introduced server-side that this client does not know yet.
    #[serde(other)]
    Other,
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountType::Household => write!(f, "household"),
            AccountType::Manufacturer => write!(f, "manufacturer"),
            AccountType::Business => write!(f, "business"),
            AccountType::Consumer => write!(f, "consumer"),
            AccountType::Other => write!(f, "other"),
        }
    }
}

/// Know-Your-Customer verification status attached to an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KycStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl KycStatus {
    /// Parse a user-supplied status name, e.g. from a CLI argument.
    pub fn from_input(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(KycStatus::Pending),
            "approved" => Some(KycStatus::Approved),
            "rejected" => Some(KycStatus::Rejected),
            _ => None,
        }
    }
}

impl std::fmt::Display for KycStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KycStatus::Pending => write!(f, "pending"),
            KycStatus::Approved => write!(f, "approved"),
            KycStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// A participant account as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub account_type: AccountType,
    #[serde(default)]
    pub kyc_status: KycStatus,
    #[serde(default)]
    pub plot_number: Option<String>,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub is_international: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Payload for creating a new account.
#[derive(Debug, Clone, Serialize)]
pub struct NewAccount {
    pub name: String,
    pub account_type: AccountType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    pub is_international: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_type_wire_names() {
        let t: AccountType = serde_json::from_str("\"manufacturer\"").unwrap();
        assert_eq!(t, AccountType::Manufacturer);
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"manufacturer\"");
    }

    #[test]
    fn test_unknown_account_type_tolerated() {
        let t: AccountType = serde_json::from_str("\"recycler\"").unwrap();
        assert_eq!(t, AccountType::Other);
    }

    #[test]
    fn test_kyc_status_defaults_to_pending() {
        let json = r#"{"id":"a-1","name":"Mutare Depot","account_type":"business"}"#;
        let account: Account = serde_json::from_str(json).unwrap();
        assert_eq!(account.kyc_status, KycStatus::Pending);
        assert!(!account.is_international);
    }

    #[test]
    fn test_kyc_status_from_input() {
        assert_eq!(KycStatus::from_input(" Approved "), Some(KycStatus::Approved));
        assert_eq!(KycStatus::from_input("nope"), None);
    }
}
