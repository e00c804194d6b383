use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::metrics::{LoanMetrics, ScheduleMetrics};
use crate::types::PaymentMode;

/// amounts shown for the active payment mode, and the cap on entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayMetrics {
    pub total_left_to_pay: Money,
    pub due_today: Money,
    pub max_amount: Money,
}

/// pick the figures for `mode`.
///
/// `DueToday` caps at this schedule item's own balance; `Custom` caps at the
/// whole loan's outstanding balance.
pub fn select_display_metrics(
    mode: PaymentMode,
    schedule: &ScheduleMetrics,
    loan: &LoanMetrics,
) -> DisplayMetrics {
    match mode {
        PaymentMode::DueToday => DisplayMetrics {
            total_left_to_pay: schedule.total_left_to_pay,
            due_today: schedule.due_today,
            max_amount: schedule.total_left_to_pay,
        },
        PaymentMode::Custom => DisplayMetrics {
            total_left_to_pay: loan.total_left_to_pay,
            due_today: loan.total_left_to_pay,
            max_amount: loan.total_left_to_pay,
        },
    }
}
