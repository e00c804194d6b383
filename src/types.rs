use serde::{Deserialize, Serialize};
use std::fmt;

/// server-assigned loan identifier
pub type LoanId = String;

/// server-assigned schedule item identifier
pub type ScheduleItemId = String;

/// schedule item status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScheduleStatus {
    /// nothing paid yet
    Pending,
    /// something paid, balance remains
    Partial,
    /// fully paid
    Paid,
    /// past due date with balance remaining
    Overdue,
}

/// loan status as reported by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoanStatus {
    Pending,
    Approved,
    Disbursed,
    Active,
    Completed,
    Defaulted,
    Rejected,
    Cancelled,
    /// any status this crate does not know about
    #[serde(other)]
    Unknown,
}

/// unit of a loan's term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TermUnit {
    Days,
    Weeks,
    Months,
    Years,
}

/// how a repayment was made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Transfer,
    /// card payment through a POS terminal
    #[serde(rename = "POS", alias = "CARD")]
    Pos,
    MobileMoney,
    Ussd,
    Cheque,
    Other,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 7] = [
        PaymentMethod::Cash,
        PaymentMethod::Transfer,
        PaymentMethod::Pos,
        PaymentMethod::MobileMoney,
        PaymentMethod::Ussd,
        PaymentMethod::Cheque,
        PaymentMethod::Other,
    ];

    /// wire value sent to the server
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "CASH",
            PaymentMethod::Transfer => "TRANSFER",
            PaymentMethod::Pos => "POS",
            PaymentMethod::MobileMoney => "MOBILE_MONEY",
            PaymentMethod::Ussd => "USSD",
            PaymentMethod::Cheque => "CHEQUE",
            PaymentMethod::Other => "OTHER",
        }
    }

    /// human label
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Transfer => "Bank Transfer",
            PaymentMethod::Pos => "Card / POS",
            PaymentMethod::MobileMoney => "Mobile Money",
            PaymentMethod::Ussd => "USSD",
            PaymentMethod::Cheque => "Cheque",
            PaymentMethod::Other => "Other",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// which cap applies to the amount being entered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMode {
    /// pay what is due on this schedule item, capped by its balance
    #[default]
    DueToday,
    /// pay an arbitrary amount, capped by the whole loan's outstanding balance
    Custom,
}
