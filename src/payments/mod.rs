pub mod gateway;
pub mod payload;
pub mod session;
pub mod validation;

use serde::{Deserialize, Serialize};

use crate::types::PaymentMethod;

pub use gateway::PaymentGateway;
pub use payload::{generate_reference, CreatePaymentPayload, PaymentReceipt};
pub use session::{
    PaymentSession, SessionState, SubmissionOutcome, SubmissionTicket, SummaryTicket,
};
pub use validation::{initialize_amount, validate_payment_amount};

/// repayment being typed in, before it becomes a payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentEntry {
    /// raw text of the amount field
    pub amount: String,
    pub method: PaymentMethod,
    pub notes: String,
}

impl PaymentEntry {
    pub fn new(method: PaymentMethod) -> Self {
        Self {
            amount: String::new(),
            method,
            notes: String::new(),
        }
    }
}

impl Default for PaymentEntry {
    fn default() -> Self {
        Self::new(PaymentMethod::Cash)
    }
}
