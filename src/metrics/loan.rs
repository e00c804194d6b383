use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::records::{Loan, LoanSummary, ScheduleItem};

/// where a set of loan metrics came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanMetricsSource {
    /// authoritative server summary
    Summary,
    /// summed over the loan's full schedule
    Schedule,
    /// approximated from a single schedule item
    SingleItem,
}

/// loan-wide totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanMetrics {
    pub total_left_to_pay: Money,
    pub principal: Money,
    pub total_paid: Money,
    pub source: LoanMetricsSource,
}

/// loan totals for the loan `item` belongs to.
///
/// A loaded `summary` wins outright. Without one the totals are approximated
/// from `item` alone, which is only right when the item carries every
/// payment made on the loan; prefer [`compute_loan_metrics_from_schedule`]
/// when the full schedule is at hand.
pub fn compute_loan_metrics(item: &ScheduleItem, summary: Option<&LoanSummary>) -> LoanMetrics {
    if let Some(summary) = summary {
        return LoanMetrics {
            total_left_to_pay: summary.total_outstanding.max(Money::ZERO),
            principal: summary.principal_amount,
            total_paid: summary.total_paid,
            source: LoanMetricsSource::Summary,
        };
    }

    let principal = item.loan.principal_amount;
    let total_paid = item.paid_amount;
    LoanMetrics {
        total_left_to_pay: principal.saturating_sub(total_paid),
        principal,
        total_paid,
        source: LoanMetricsSource::SingleItem,
    }
}

/// loan totals summed over every schedule item belonging to `loan`.
///
/// Outstanding is the sum of each item's remaining balance, so interest and
/// fees scheduled on the items count towards it. Items of other loans are
/// ignored. With no matching items this degrades to `principal` outstanding.
pub fn compute_loan_metrics_from_schedule(loan: &Loan, items: &[ScheduleItem]) -> LoanMetrics {
    let own: Vec<&ScheduleItem> = items.iter().filter(|i| i.loan_id == loan.id).collect();

    if own.is_empty() {
        return LoanMetrics {
            total_left_to_pay: loan.principal_amount.max(Money::ZERO),
            principal: loan.principal_amount,
            total_paid: Money::ZERO,
            source: LoanMetricsSource::Schedule,
        };
    }

    let total_paid: Money = own.iter().map(|i| i.paid_amount.max(Money::ZERO)).sum();
    let total_left_to_pay: Money = own
        .iter()
        .map(|i| i.total_due.saturating_sub(i.paid_amount))
        .sum();

    LoanMetrics {
        total_left_to_pay,
        principal: loan.principal_amount,
        total_paid,
        source: LoanMetricsSource::Schedule,
    }
}

/// true once nothing is left to pay on the loan; the payment workflow is then
/// read-only
pub fn is_loan_fully_settled(metrics: &LoanMetrics) -> bool {
    metrics.total_left_to_pay.is_zero()
}
