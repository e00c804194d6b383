use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

use crate::config::CalendarConfig;
use crate::decimal::{deserialize_lenient, Money};
use crate::errors::PaymentError;
use crate::records::deserialize_id;
use crate::types::{LoanId, LoanStatus, ScheduleItemId, ScheduleStatus, TermUnit};

/// a date as the api sends it: either a bare calendar date or an instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueDate {
    Date(NaiveDate),
    Instant(DateTime<Utc>),
}

impl DueDate {
    /// calendar day this date falls on in the business timezone.
    /// bare dates are already calendar days and are taken as-is
    pub fn business_date(&self, calendar: &CalendarConfig) -> NaiveDate {
        match self {
            DueDate::Date(d) => *d,
            DueDate::Instant(at) => calendar.business_date(*at),
        }
    }
}

impl FromStr for DueDate {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(DueDate::Date(date));
        }
        DateTime::parse_from_rfc3339(s)
            .map(|dt| DueDate::Instant(dt.with_timezone(&Utc)))
            .map_err(|e| PaymentError::InvalidDate {
                message: format!("{:?}: {}", s, e),
            })
    }
}

impl Serialize for DueDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DueDate::Date(d) => serializer.serialize_str(&d.format("%Y-%m-%d").to_string()),
            DueDate::Instant(at) => serializer.serialize_str(&at.to_rfc3339()),
        }
    }
}

impl<'de> Deserialize<'de> for DueDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// parent loan, nested in every schedule item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: LoanId,
    #[serde(default)]
    pub loan_number: Option<String>,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub principal_amount: Money,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub term_count: Option<u32>,
    #[serde(default)]
    pub term_unit: Option<TermUnit>,
    #[serde(default)]
    pub start_date: Option<DueDate>,
    #[serde(default)]
    pub end_date: Option<DueDate>,
    #[serde(default = "unknown_status")]
    pub status: LoanStatus,
}

fn unknown_status() -> LoanStatus {
    LoanStatus::Unknown
}

/// one installment row of a loan's repayment schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleItem {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: ScheduleItemId,
    #[serde(deserialize_with = "deserialize_id")]
    pub loan_id: LoanId,
    #[serde(default)]
    pub sequence: u32,
    pub due_date: DueDate,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub principal_due: Money,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub interest_due: Money,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub fee_due: Money,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub total_due: Money,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub paid_amount: Money,
    pub status: ScheduleStatus,
    pub loan: Loan,
}

impl ScheduleItem {
    /// parse a single schedule item from an api body
    pub fn from_response(body: &str) -> crate::errors::Result<Self> {
        crate::records::parse_envelope(body)
    }

    /// parse a list of schedule items from an api body
    pub fn list_from_response(body: &str) -> crate::errors::Result<Vec<Self>> {
        crate::records::parse_envelope(body)
    }

    /// sum of the component dues; servers normally send `totalDue` already
    pub fn components_total(&self) -> Money {
        self.principal_due + self.interest_due + self.fee_due
    }
}
