//! Aggregate reporting models.

use serde::{Deserialize, Serialize};

/// System-wide statistics from `/reports/stats` (admin dashboard).
///
/// Numeric fields are required on decode so an unrelated object is rejected
/// instead of reading as all zeroes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportStats {
    pub total_accounts: i64,
    pub global_recovery: i64,
    pub pending_kyc: i64,
    #[serde(default)]
    pub node_status: Option<String>,
}

/// Insight payload relayed from the analysis service.
///
/// The backend forwards whatever the service produced: sometimes prose,
/// sometimes a JSON document. Both are preserved, never silently dropped.
#[derive(Debug, Clone, PartialEq)]
pub enum Insights {
    Text(String),
    Structured(serde_json::Value),
}

impl Insights {
    /// Render for display; structured payloads are pretty-printed.
    pub fn render(&self) -> String {
        match self {
            Insights::Text(text) => text.clone(),
            Insights::Structured(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_stats_require_numeric_fields() {
        assert!(serde_json::from_str::<ReportStats>(r#"{"node_status":"100%"}"#).is_err());

        let json = r#"{"total_accounts":42,"global_recovery":1200,"pending_kyc":3}"#;
        let stats: ReportStats = serde_json::from_str(json).unwrap();
        assert_eq!(stats.total_accounts, 42);
        assert_eq!(stats.node_status, None);
    }

    #[test]
    fn test_insights_render() {
        assert_eq!(Insights::Text("all good".to_string()).render(), "all good");

        let structured = Insights::Structured(serde_json::json!({"trend": "up"}));
        assert!(structured.render().contains("\"trend\""));
    }
}
