use thiserror::Error;

use crate::payments::SessionState;

/// message shown for missing, non-numeric, or non-positive amounts
pub const INVALID_AMOUNT_MESSAGE: &str = "Please enter a valid payment amount";

/// fallback when a failed submission carries no usable server message
pub const GENERIC_SUBMISSION_MESSAGE: &str = "Failed to record payment. Please try again";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PaymentError {
    #[error("Please enter a valid payment amount")]
    InvalidAmount,

    /// `maximum` is already formatted for display
    #[error("Payment amount cannot exceed {maximum}")]
    AmountExceedsMaximum {
        maximum: String,
    },

    #[error("could not load loan summary: {message}")]
    SummaryFetchFailed {
        message: String,
    },

    #[error("{message}")]
    SubmissionFailed {
        message: String,
    },

    #[error("loan is fully settled, no further payments accepted")]
    LoanSettled,

    #[error("a payment submission is already in progress")]
    SubmissionInProgress,

    #[error("invalid state: current {current:?}, expected {expected}")]
    InvalidState {
        current: SessionState,
        expected: String,
    },

    #[error("malformed response: {message}")]
    MalformedResponse {
        message: String,
    },

    #[error("request rejected by server: {message}")]
    ApiRejected {
        message: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("invalid date: {message}")]
    InvalidDate {
        message: String,
    },
}

impl PaymentError {
    /// submission failure using the server's message when it has one
    pub fn submission_failed(server_message: Option<&str>) -> Self {
        let message = server_message
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(GENERIC_SUBMISSION_MESSAGE)
            .to_string();
        PaymentError::SubmissionFailed { message }
    }

    /// normalize a failed payment creation into `SubmissionFailed`, keeping
    /// a server-supplied message and replacing anything else with the
    /// generic one
    pub fn into_submission_failure(self) -> Self {
        match self {
            PaymentError::SubmissionFailed { message } | PaymentError::ApiRejected { message } => {
                PaymentError::submission_failed(Some(&message))
            }
            _ => PaymentError::submission_failed(None),
        }
    }

    /// errors produced by local validation, never sent over the wire
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            PaymentError::InvalidAmount | PaymentError::AmountExceedsMaximum { .. }
        )
    }

    /// message a user should see for this error
    pub fn user_message(&self) -> String {
        match self {
            PaymentError::ApiRejected { message } | PaymentError::SubmissionFailed { message } => {
                message.clone()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PaymentError>;
