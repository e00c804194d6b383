use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::CalendarConfig;
use crate::decimal::Money;
use crate::records::ScheduleItem;

/// amounts owed on a single schedule item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleMetrics {
    /// remaining balance on the item, never negative
    pub total_left_to_pay: Money,
    /// the remaining balance once the item is due or overdue, zero before
    pub due_today: Money,
    /// whole days until the due date; negative when overdue
    pub days_remaining: i64,
    pub is_overdue: bool,
    pub is_due_today: bool,
}

/// derive what is owed on `item` as of `today`. never fails
pub fn compute_schedule_metrics(
    item: &ScheduleItem,
    today: NaiveDate,
    calendar: &CalendarConfig,
) -> ScheduleMetrics {
    let total_left_to_pay = item.total_due.saturating_sub(item.paid_amount);

    let due = item.due_date.business_date(calendar);
    let is_overdue = due < today;
    let is_due_today = due == today;

    let due_today = if is_due_today || is_overdue {
        total_left_to_pay
    } else {
        Money::ZERO
    };

    ScheduleMetrics {
        total_left_to_pay,
        due_today,
        days_remaining: (due - today).num_days(),
        is_overdue,
        is_due_today,
    }
}
