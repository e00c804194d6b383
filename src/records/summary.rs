use serde::{Deserialize, Serialize};

use crate::decimal::{deserialize_lenient, Money};
use crate::errors::Result;

/// server-computed aggregate over a loan's full repayment history.
/// supersedes any client-side aggregation when present.
///
/// All three fields must be present. Values are coerced leniently, but a
/// missing field fails the parse: a defaulted summary would read as zero
/// outstanding and settle the loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanSummary {
    #[serde(deserialize_with = "deserialize_lenient")]
    pub principal_amount: Money,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub total_paid: Money,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub total_outstanding: Money,
}

impl LoanSummary {
    pub fn new(principal_amount: Money, total_paid: Money, total_outstanding: Money) -> Self {
        Self {
            principal_amount,
            total_paid,
            total_outstanding,
        }
    }

    /// parse from an api body
    pub fn from_response(body: &str) -> Result<Self> {
        crate::records::parse_envelope(body)
    }
}

/// summary as seen by the payment surface while it is being fetched
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SummaryState {
    /// no fetch issued
    #[default]
    Absent,
    Loading,
    Loaded(LoanSummary),
    /// fetch failed; the message is kept as a non-blocking warning
    Failed(String),
}

impl SummaryState {
    /// the summary, only once it has actually arrived
    pub fn loaded(&self) -> Option<&LoanSummary> {
        match self {
            SummaryState::Loaded(summary) => Some(summary),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SummaryState::Loading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::PaymentError;

    #[test]
    fn test_missing_field_is_malformed() {
        let body = r#"{"success": true, "data": {"principalAmount": 100, "totalPaid": 0}}"#;
        assert!(matches!(
            LoanSummary::from_response(body),
            Err(PaymentError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn test_null_values_coerce_to_zero() {
        let body = r#"{"success": true, "data": {"principalAmount": null, "totalPaid": "x", "totalOutstanding": 5}}"#;
        let summary = LoanSummary::from_response(body).unwrap();
        assert_eq!(summary.principal_amount, Money::ZERO);
        assert_eq!(summary.total_paid, Money::ZERO);
        assert_eq!(summary.total_outstanding, Money::from_major(5));
    }

    #[test]
    fn test_summary_state_only_exposes_loaded() {
        let summary = LoanSummary::new(Money::from_major(10), Money::ZERO, Money::from_major(10));
        assert!(SummaryState::Loading.loaded().is_none());
        assert!(SummaryState::Failed("boom".into()).loaded().is_none());
        assert_eq!(SummaryState::Loaded(summary.clone()).loaded(), Some(&summary));
        assert!(SummaryState::Loading.is_loading());
    }
}
