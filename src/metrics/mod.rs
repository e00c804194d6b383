//! derived amounts for a repayment entry
//!
//! Everything here is pure: the same inputs always give the same outputs and
//! nothing touches the network. "Now" comes in as a calendar day, resolved
//! from a [`SafeTimeProvider`] by [`business_today`].

pub mod display;
pub mod loan;
pub mod schedule;

use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;

use crate::config::CalendarConfig;

pub use display::{select_display_metrics, DisplayMetrics};
pub use loan::{
    compute_loan_metrics, compute_loan_metrics_from_schedule, is_loan_fully_settled, LoanMetrics,
    LoanMetricsSource,
};
pub use schedule::{compute_schedule_metrics, ScheduleMetrics};

/// today's calendar day in the business timezone
pub fn business_today(time: &SafeTimeProvider, calendar: &CalendarConfig) -> NaiveDate {
    calendar.business_date(time.now())
}
