//! wire records consumed from the loan api
//!
//! Shapes are strict: a body that does not match the envelope or a record
//! fails with [`PaymentError::MalformedResponse`]. Amount values inside a
//! record are lenient and coerce to zero when malformed.

pub mod schedule;
pub mod summary;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::{PaymentError, Result};

pub use schedule::{DueDate, Loan, ScheduleItem};
pub use summary::{LoanSummary, SummaryState};

/// the one response envelope every api body is wrapped in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// unwrap the payload, turning `success: false` into an error
    pub fn into_data(self) -> Result<T> {
        if !self.success {
            return Err(PaymentError::ApiRejected {
                message: self
                    .message
                    .unwrap_or_else(|| "request failed without a message".to_string()),
            });
        }
        self.data.ok_or_else(|| PaymentError::MalformedResponse {
            message: "successful response carried no data".to_string(),
        })
    }
}

/// parse an api body into its payload
pub fn parse_envelope<T: DeserializeOwned>(body: &str) -> Result<T> {
    let envelope: ApiEnvelope<T> =
        serde_json::from_str(body).map_err(|e| PaymentError::MalformedResponse {
            message: e.to_string(),
        })?;
    envelope.into_data()
}

/// ids arrive as strings or integers depending on the endpoint
pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(u64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}
