/// serialization support for the payment surface
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::metrics::LoanMetricsSource;
use crate::payments::{PaymentSession, SessionState};
use crate::types::{LoanId, PaymentMethod, PaymentMode, ScheduleStatus};

/// serializable snapshot of a payment session, amounts pre-formatted
#[derive(Debug, Serialize, Deserialize)]
pub struct PaymentSurfaceView {
    pub session_id: Uuid,
    pub state: SessionState,
    pub mode: PaymentMode,
    pub schedule: Option<ScheduleView>,
    pub loan: Option<LoanView>,
    pub display: Option<DisplayView>,
    pub entry: EntryView,
    pub inline_error: Option<String>,
    pub warning: Option<String>,
    pub submission_error: Option<String>,
    pub can_submit: bool,
    pub settled: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScheduleView {
    pub schedule_item_id: String,
    pub sequence: u32,
    pub status: ScheduleStatus,
    pub total_left_to_pay: String,
    pub due_today: String,
    pub days_remaining: i64,
    pub is_overdue: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoanView {
    pub loan_id: LoanId,
    pub loan_number: Option<String>,
    pub principal: String,
    pub total_paid: String,
    pub total_left_to_pay: String,
    pub source: LoanMetricsSource,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DisplayView {
    pub total_left_to_pay: String,
    pub due_today: String,
    pub max_amount: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EntryView {
    pub amount: String,
    pub method: PaymentMethod,
    pub method_label: String,
    pub notes: String,
}

impl PaymentSurfaceView {
    pub fn from_session(session: &PaymentSession) -> Self {
        let currency = &session.config().currency;
        let fmt = |m: Money| m.format(currency);
        let settled = session.is_settled();

        let schedule = session.item().zip(session.schedule_metrics()).map(|(item, m)| {
            ScheduleView {
                schedule_item_id: item.id.clone(),
                sequence: item.sequence,
                status: item.status,
                total_left_to_pay: fmt(m.total_left_to_pay),
                due_today: fmt(m.due_today),
                days_remaining: m.days_remaining,
                is_overdue: m.is_overdue,
            }
        });

        let loan = session.item().zip(session.loan_metrics()).map(|(item, m)| LoanView {
            loan_id: item.loan_id.clone(),
            loan_number: item.loan.loan_number.clone(),
            principal: fmt(m.principal),
            total_paid: fmt(m.total_paid),
            total_left_to_pay: fmt(m.total_left_to_pay),
            source: m.source,
        });

        // a settled loan shows no form
        let display = if settled {
            None
        } else {
            session.display_metrics().map(|d| DisplayView {
                total_left_to_pay: fmt(d.total_left_to_pay),
                due_today: fmt(d.due_today),
                max_amount: fmt(d.max_amount),
            })
        };

        let entry = session.entry();
        PaymentSurfaceView {
            session_id: session.id(),
            state: session.state(),
            mode: session.mode(),
            schedule,
            loan,
            display,
            entry: EntryView {
                amount: entry.amount.clone(),
                method: entry.method,
                method_label: entry.method.label().to_string(),
                notes: entry.notes.clone(),
            },
            inline_error: session.inline_error().map(|e| e.to_string()),
            warning: session.warning().map(|e| e.to_string()),
            submission_error: session.submission_error().map(str::to_string),
            can_submit: session.can_submit(),
            settled,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
