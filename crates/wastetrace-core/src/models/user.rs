//! User profile and per-user statistics models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::account::{AccountType, KycStatus};

/// Backend user role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    FieldOfficer,
    /// Roles introduced server-side that this client does not know yet.
    #[default]
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::FieldOfficer => write!(f, "field officer"),
            Role::Unknown => write!(f, "unknown"),
        }
    }
}

/// The authenticated user's profile, persisted alongside the bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub plot_number: Option<String>,
    #[serde(default)]
    pub account_type: Option<AccountType>,
    #[serde(default)]
    pub kyc_status: Option<KycStatus>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Per-user quantity statistics from `/auth/stats`.
///
/// The numeric fields are required on decode so that an unrelated object is
/// rejected instead of silently reading as all zeroes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStats {
    pub supply_received: i64,
    pub distributed: i64,
    pub returned: i64,
    pub balance: i64,
    #[serde(default)]
    pub kyc_status: Option<KycStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_decodes_with_minimal_fields() {
        let json = r#"{"id":"u-1","name":"Jane","email":"jane@example.com"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.role, Role::Unknown);
        assert!(!user.is_admin());
    }

    #[test]
    fn test_admin_role_round_trip() {
        let json = r#"{"id":"u-2","name":"Ops","email":"ops@example.com","role":"admin"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert!(user.is_admin());
        let encoded = serde_json::to_string(&user).unwrap();
        assert!(encoded.contains("\"admin\""));
    }

    #[test]
    fn test_stats_require_numeric_fields() {
        assert!(serde_json::from_str::<UserStats>(r#"{"status":"error"}"#).is_err());

        let json = r#"{"supply_received":1000,"distributed":300,"returned":100,"balance":600,"kyc_status":"approved"}"#;
        let stats: UserStats = serde_json::from_str(json).unwrap();
        assert_eq!(stats.balance, 600);
        assert_eq!(stats.kyc_status, Some(KycStatus::Approved));
    }
}
