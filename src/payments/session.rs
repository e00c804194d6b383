use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::decimal::Money;
use crate::errors::{PaymentError, Result};
use crate::events::{Event, EventStore};
use crate::metrics::{
    business_today, compute_loan_metrics, compute_loan_metrics_from_schedule,
    compute_schedule_metrics, is_loan_fully_settled, select_display_metrics, DisplayMetrics,
    LoanMetrics, ScheduleMetrics,
};
use crate::records::summary::SummaryState;
use crate::records::{LoanSummary, ScheduleItem};
use crate::types::{LoanId, PaymentMethod, PaymentMode};

use super::payload::{generate_reference, CreatePaymentPayload, PaymentReceipt};
use super::validation::{initialize_amount, validate_payment_amount};
use super::PaymentEntry;

/// payment-entry lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// nothing shown
    Closed,
    /// open, loan summary in flight; loan figures use the fallback
    Loading,
    /// open and accepting submission
    Ready,
    /// a submission is in flight; no further submit is accepted
    Submitting,
    /// loan has nothing left to pay; display only
    Settled,
}

/// issued when the surface opens; hand it back with the summary response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryTicket {
    session_id: Uuid,
    generation: u64,
    pub loan_id: LoanId,
}

/// issued when a submission starts; hand it back with the server response
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionTicket {
    session_id: Uuid,
    generation: u64,
    pub payload: CreatePaymentPayload,
}

/// what happened to a submission response
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    /// payment recorded; the session closed and `loan_id` needs a refresh
    Recorded {
        loan_id: LoanId,
        receipt: PaymentReceipt,
    },
    /// back to ready with the message surfaced and the entry intact
    Rejected { message: String },
    /// response belonged to a closed or reopened surface
    Ignored,
}

/// one payment surface for one schedule item.
///
/// I/O stays with the caller: `open` hands out a [`SummaryTicket`] and
/// `begin_submit` a [`SubmissionTicket`]; their responses come back through
/// `resolve_summary` and `resolve_submission`. Every `open` and `close`
/// moves to a new generation, so a response for an older ticket is dropped
/// without touching state.
pub struct PaymentSession {
    id: Uuid,
    config: EngineConfig,
    state: SessionState,
    generation: u64,
    item: Option<ScheduleItem>,
    schedule: Vec<ScheduleItem>,
    summary: SummaryState,
    today: NaiveDate,
    mode: PaymentMode,
    entry: PaymentEntry,
    submission_error: Option<String>,
    pub events: EventStore,
}

impl PaymentSession {
    pub fn new(config: EngineConfig) -> Self {
        let entry = PaymentEntry::new(config.payment_defaults.method);
        Self {
            id: Uuid::new_v4(),
            config,
            state: SessionState::Closed,
            generation: 0,
            item: None,
            schedule: Vec::new(),
            summary: SummaryState::Absent,
            today: NaiveDate::MIN,
            mode: PaymentMode::DueToday,
            entry,
            submission_error: None,
            events: EventStore::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn mode(&self) -> PaymentMode {
        self.mode
    }

    pub fn entry(&self) -> &PaymentEntry {
        &self.entry
    }

    pub fn item(&self) -> Option<&ScheduleItem> {
        self.item.as_ref()
    }

    pub fn summary(&self) -> &SummaryState {
        &self.summary
    }

    /// message from the last failed submission, kept until the next attempt
    pub fn submission_error(&self) -> Option<&str> {
        self.submission_error.as_deref()
    }

    /// non-blocking warning when the summary could not be loaded
    pub fn warning(&self) -> Option<PaymentError> {
        match &self.summary {
            SummaryState::Failed(message) => Some(PaymentError::SummaryFetchFailed {
                message: message.clone(),
            }),
            _ => None,
        }
    }

    /// open the surface for `item` and return the summary ticket to fetch
    /// with. whether the loan is settled is decided once the summary resolves
    pub fn open(&mut self, item: ScheduleItem, time: &SafeTimeProvider) -> SummaryTicket {
        self.open_with_schedule(item, Vec::new(), time)
    }

    /// open with the loan's full schedule, so the fallback loan figures are
    /// summed over every installment rather than approximated from one
    pub fn open_with_schedule(
        &mut self,
        item: ScheduleItem,
        schedule: Vec<ScheduleItem>,
        time: &SafeTimeProvider,
    ) -> SummaryTicket {
        self.generation += 1;
        self.today = business_today(time, &self.config.calendar);
        self.mode = PaymentMode::DueToday;
        self.entry = PaymentEntry::new(self.config.payment_defaults.method);
        self.submission_error = None;
        self.summary = SummaryState::Loading;
        self.schedule = schedule;

        let loan_id = item.loan_id.clone();
        self.events.emit(Event::PaymentSurfaceOpened {
            session_id: self.id,
            loan_id: loan_id.clone(),
            schedule_item_id: item.id.clone(),
            timestamp: time.now(),
        });
        self.item = Some(item);

        self.state = SessionState::Loading;
        self.reset_amount();
        tracing::debug!(
            session_id = %self.id,
            loan_id = %loan_id,
            generation = self.generation,
            "payment surface opened"
        );

        SummaryTicket {
            session_id: self.id,
            generation: self.generation,
            loan_id,
        }
    }

    /// feed back the summary fetch. returns false when the response was stale
    pub fn resolve_summary(
        &mut self,
        ticket: SummaryTicket,
        response: Result<LoanSummary>,
    ) -> bool {
        if !self.is_current(ticket.session_id, ticket.generation)
            || self.state != SessionState::Loading
        {
            self.ignore_stale(ticket.generation, "loan_summary");
            return false;
        }

        match response {
            Ok(summary) => {
                tracing::debug!(
                    loan_id = %ticket.loan_id,
                    total_outstanding = %summary.total_outstanding,
                    "loan summary loaded"
                );
                self.events.emit(Event::LoanSummaryLoaded {
                    session_id: self.id,
                    loan_id: ticket.loan_id.clone(),
                    total_outstanding: summary.total_outstanding,
                });
                self.summary = SummaryState::Loaded(summary);
            }
            Err(err) => {
                let message = err.user_message();
                tracing::warn!(
                    loan_id = %ticket.loan_id,
                    error = %message,
                    "loan summary unavailable, using schedule figures"
                );
                self.events.emit(Event::LoanSummaryFailed {
                    session_id: self.id,
                    loan_id: ticket.loan_id.clone(),
                    message: message.clone(),
                });
                self.summary = SummaryState::Failed(message);
            }
        }

        match self.loan_metrics().filter(is_loan_fully_settled) {
            Some(loan) => {
                tracing::info!(
                    loan_id = %ticket.loan_id,
                    source = ?loan.source,
                    "loan settled, payment entry disabled"
                );
                self.enter_settled(loan);
            }
            None => self.state = SessionState::Ready,
        }
        true
    }

    /// switch between paying the item's due amount and a custom amount.
    /// the amount field is re-initialized for the new mode
    pub fn set_mode(&mut self, mode: PaymentMode) -> Result<()> {
        self.ensure_editable()?;
        if self.mode == mode {
            return Ok(());
        }
        self.mode = mode;
        self.reset_amount();
        self.events.emit(Event::PaymentModeChanged {
            session_id: self.id,
            mode,
        });
        Ok(())
    }

    pub fn set_amount(&mut self, raw: impl Into<String>) -> Result<()> {
        self.ensure_editable()?;
        self.entry.amount = raw.into();
        Ok(())
    }

    pub fn set_method(&mut self, method: PaymentMethod) -> Result<()> {
        self.ensure_editable()?;
        self.entry.method = method;
        Ok(())
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) -> Result<()> {
        self.ensure_editable()?;
        self.entry.notes = notes.into();
        Ok(())
    }

    /// figures for the open schedule item
    pub fn schedule_metrics(&self) -> Option<ScheduleMetrics> {
        self.item
            .as_ref()
            .map(|item| compute_schedule_metrics(item, self.today, &self.config.calendar))
    }

    /// loan-wide figures: the summary once loaded, otherwise the schedule
    /// sum when a schedule was supplied, otherwise the single-item estimate
    pub fn loan_metrics(&self) -> Option<LoanMetrics> {
        let item = self.item.as_ref()?;
        if let Some(summary) = self.summary.loaded() {
            return Some(compute_loan_metrics(item, Some(summary)));
        }
        if self.schedule.is_empty() {
            Some(compute_loan_metrics(item, None))
        } else {
            Some(compute_loan_metrics_from_schedule(&item.loan, &self.schedule))
        }
    }

    /// figures for the active mode
    pub fn display_metrics(&self) -> Option<DisplayMetrics> {
        let schedule = self.schedule_metrics()?;
        let loan = self.loan_metrics()?;
        Some(select_display_metrics(self.mode, &schedule, &loan))
    }

    pub fn is_settled(&self) -> bool {
        self.state == SessionState::Settled
    }

    /// full validation of the current entry, as run before submission
    pub fn validate(&self) -> Result<Money> {
        if self.is_settled() {
            return Err(PaymentError::LoanSettled);
        }
        let display = self.display_metrics().ok_or(PaymentError::InvalidState {
            current: self.state,
            expected: "an open payment surface".to_string(),
        })?;
        validate_payment_amount(&self.entry.amount, &display, &self.config.currency)
    }

    /// validation error to show next to the field while typing. an empty
    /// field shows nothing until the user types
    pub fn inline_error(&self) -> Option<PaymentError> {
        if self.entry.amount.trim().is_empty() || self.is_settled() {
            return None;
        }
        self.validate().err()
    }

    /// submit control is enabled only when a submission would be accepted
    pub fn can_submit(&self) -> bool {
        self.state == SessionState::Ready && self.validate().is_ok()
    }

    /// validate and move to submitting. the returned ticket carries the
    /// payload to send
    pub fn begin_submit(&mut self, time: &SafeTimeProvider) -> Result<SubmissionTicket> {
        match self.state {
            SessionState::Ready => {}
            SessionState::Submitting => return Err(PaymentError::SubmissionInProgress),
            SessionState::Settled => return Err(PaymentError::LoanSettled),
            current => {
                return Err(PaymentError::InvalidState {
                    current,
                    expected: "ready".to_string(),
                })
            }
        }

        let amount = self.validate()?;
        let loan_id = match &self.item {
            Some(item) => item.loan_id.clone(),
            None => {
                return Err(PaymentError::InvalidState {
                    current: self.state,
                    expected: "an open schedule item".to_string(),
                })
            }
        };

        let now = time.now();
        let payload = CreatePaymentPayload::new(
            loan_id.clone(),
            amount,
            self.entry.method,
            generate_reference(&self.config.reference, now),
            &self.entry.notes,
        );

        self.state = SessionState::Submitting;
        self.submission_error = None;
        self.events.emit(Event::PaymentSubmitted {
            session_id: self.id,
            loan_id: loan_id.clone(),
            amount,
            method: self.entry.method,
            reference: payload.reference.clone(),
            timestamp: now,
        });
        tracing::info!(
            loan_id = %loan_id,
            amount = %amount,
            method = %self.entry.method,
            reference = %payload.reference,
            "submitting payment"
        );

        Ok(SubmissionTicket {
            session_id: self.id,
            generation: self.generation,
            payload,
        })
    }

    /// feed back the submission response
    pub fn resolve_submission(
        &mut self,
        ticket: SubmissionTicket,
        response: Result<PaymentReceipt>,
    ) -> SubmissionOutcome {
        if !self.is_current(ticket.session_id, ticket.generation)
            || self.state != SessionState::Submitting
        {
            self.ignore_stale(ticket.generation, "payment_submission");
            return SubmissionOutcome::Ignored;
        }

        let loan_id = ticket.payload.loan_id;
        match response {
            Ok(receipt) => {
                tracing::info!(
                    loan_id = %loan_id,
                    reference = %ticket.payload.reference,
                    receipt_id = %receipt.id,
                    "payment recorded"
                );
                self.events.emit(Event::PaymentRecorded {
                    session_id: self.id,
                    loan_id: loan_id.clone(),
                    reference: ticket.payload.reference,
                    receipt_id: receipt.id.clone(),
                });
                // the summary no longer reflects the loan
                self.close();
                SubmissionOutcome::Recorded { loan_id, receipt }
            }
            Err(err) => {
                let message = err.into_submission_failure().user_message();
                tracing::warn!(
                    loan_id = %loan_id,
                    reference = %ticket.payload.reference,
                    error = %message,
                    "payment rejected"
                );
                self.events.emit(Event::PaymentRejected {
                    session_id: self.id,
                    loan_id,
                    reference: ticket.payload.reference,
                    message: message.clone(),
                });
                self.state = SessionState::Ready;
                self.submission_error = Some(message.clone());
                SubmissionOutcome::Rejected { message }
            }
        }
    }

    /// close the surface. outstanding tickets become stale
    pub fn close(&mut self) {
        if self.state == SessionState::Closed && self.item.is_none() {
            return;
        }
        self.generation += 1;
        self.state = SessionState::Closed;
        self.item = None;
        self.schedule.clear();
        self.summary = SummaryState::Absent;
        self.mode = PaymentMode::DueToday;
        self.entry = PaymentEntry::new(self.config.payment_defaults.method);
        self.submission_error = None;
        self.events.emit(Event::PaymentSurfaceClosed { session_id: self.id });
        tracing::debug!(session_id = %self.id, "payment surface closed");
    }

    fn enter_settled(&mut self, loan: LoanMetrics) {
        self.state = SessionState::Settled;
        self.entry.amount.clear();
        if let Some(item) = &self.item {
            self.events.emit(Event::LoanSettled {
                session_id: self.id,
                loan_id: item.loan_id.clone(),
                source: loan.source,
            });
        }
    }

    fn reset_amount(&mut self) {
        self.entry.amount = self
            .display_metrics()
            .map(|display| initialize_amount(self.mode, &display))
            .unwrap_or_default();
    }

    fn ensure_editable(&self) -> Result<()> {
        match self.state {
            SessionState::Loading | SessionState::Ready => Ok(()),
            SessionState::Settled => Err(PaymentError::LoanSettled),
            SessionState::Submitting => Err(PaymentError::SubmissionInProgress),
            SessionState::Closed => Err(PaymentError::InvalidState {
                current: self.state,
                expected: "loading or ready".to_string(),
            }),
        }
    }

    fn is_current(&self, session_id: Uuid, generation: u64) -> bool {
        session_id == self.id && generation == self.generation
    }

    fn ignore_stale(&mut self, generation: u64, response: &str) {
        tracing::debug!(
            session_id = %self.id,
            ticket_generation = generation,
            current_generation = self.generation,
            response,
            "ignoring stale response"
        );
        self.events.emit(Event::StaleResponseIgnored {
            session_id: self.id,
            generation,
            response: response.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::schedule::fixtures;
    use chrono::{Duration, TimeZone, Utc};
    use hourglass_rs::TimeSource;

    fn time() -> SafeTimeProvider {
        SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 5, 15, 9, 0, 0).unwrap(),
        ))
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 15).unwrap()
    }

    fn summary(outstanding: i64) -> LoanSummary {
        LoanSummary::new(
            Money::from_major(100_000),
            Money::from_major(100_000 - outstanding),
            Money::from_major(outstanding),
        )
    }

    fn receipt() -> PaymentReceipt {
        PaymentReceipt {
            id: "rcpt-1".to_string(),
            reference: None,
            amount: Money::from_major(3000),
        }
    }

    fn ready_session() -> (PaymentSession, SafeTimeProvider) {
        let time = time();
        let mut session = PaymentSession::new(EngineConfig::default());
        let ticket = session.open(fixtures::item(today(), 5000, 2000, 100_000), &time);
        assert!(session.resolve_summary(ticket, Ok(summary(70_000))));
        (session, time)
    }

    #[test]
    fn test_open_prefills_due_amount() {
        let time = time();
        let mut session = PaymentSession::new(EngineConfig::default());
        let ticket = session.open(fixtures::item(today(), 5000, 2000, 100_000), &time);

        assert_eq!(ticket.loan_id, "loan-1");
        assert_eq!(session.state(), SessionState::Loading);
        assert_eq!(session.entry().amount, "3000");
        assert_eq!(session.entry().method, PaymentMethod::Cash);

        // fallback while the summary is loading
        let loan = session.loan_metrics().unwrap();
        assert_eq!(loan.total_left_to_pay, Money::from_major(98_000));
    }

    #[test]
    fn test_summary_replaces_fallback() {
        let (mut session, _) = ready_session();
        assert_eq!(session.state(), SessionState::Ready);

        session.set_mode(PaymentMode::Custom).unwrap();
        assert_eq!(session.entry().amount, "");
        let display = session.display_metrics().unwrap();
        assert_eq!(display.max_amount, Money::from_major(70_000));

        session.set_amount("90000").unwrap();
        let err = session.validate().unwrap_err();
        assert!(matches!(err, PaymentError::AmountExceedsMaximum { .. }));
        assert!(err.to_string().contains("70,000.00"));
    }

    #[test]
    fn test_due_today_capped_by_item() {
        let (mut session, time) = ready_session();
        session.set_amount("3000.01").unwrap();
        assert!(matches!(
            session.inline_error(),
            Some(PaymentError::AmountExceedsMaximum { .. })
        ));
        assert!(!session.can_submit());
        assert!(matches!(
            session.begin_submit(&time),
            Err(PaymentError::AmountExceedsMaximum { .. })
        ));
        assert_eq!(session.state(), SessionState::Ready);
    }

    #[test]
    fn test_empty_custom_amount_has_no_inline_error() {
        let (mut session, time) = ready_session();
        session.set_mode(PaymentMode::Custom).unwrap();
        assert!(session.inline_error().is_none());
        assert_eq!(session.begin_submit(&time).unwrap_err(), PaymentError::InvalidAmount);
    }

    #[test]
    fn test_summary_failure_falls_back_with_warning() {
        let time = time();
        let mut session = PaymentSession::new(EngineConfig::default());
        let ticket = session.open(fixtures::item(today(), 20_000, 15_000, 100_000), &time);
        assert!(session.resolve_summary(
            ticket,
            Err(PaymentError::ApiRejected {
                message: "gateway timeout".to_string()
            })
        ));

        assert_eq!(session.state(), SessionState::Ready);
        assert_eq!(
            session.warning(),
            Some(PaymentError::SummaryFetchFailed {
                message: "gateway timeout".to_string()
            })
        );

        session.set_mode(PaymentMode::Custom).unwrap();
        session.set_amount("85000").unwrap();
        assert!(session.can_submit());
    }

    #[test]
    fn test_incomplete_summary_is_a_fetch_failure() {
        let time = time();
        let mut session = PaymentSession::new(EngineConfig::default());
        let ticket = session.open(fixtures::item(today(), 5000, 2000, 100_000), &time);

        let body = r#"{"success": true, "data": {"principalAmount": 100000, "totalPaid": 30000}}"#;
        assert!(session.resolve_summary(ticket, LoanSummary::from_response(body)));

        assert_eq!(session.state(), SessionState::Ready);
        assert!(matches!(
            session.warning(),
            Some(PaymentError::SummaryFetchFailed { .. })
        ));
        assert_eq!(
            session.loan_metrics().unwrap().total_left_to_pay,
            Money::from_major(98_000)
        );
    }

    #[test]
    fn test_settled_fallback_still_waits_for_summary() {
        let time = time();
        let mut session = PaymentSession::new(EngineConfig::default());
        let ticket = session.open(fixtures::item(today(), 5000, 5000, 5000), &time);

        // fallback reads zero, but the summary decides
        assert_eq!(session.state(), SessionState::Loading);
        assert!(session.resolve_summary(ticket, Ok(summary(70_000))));
        assert_eq!(session.state(), SessionState::Ready);
        assert_eq!(
            session.loan_metrics().unwrap().total_left_to_pay,
            Money::from_major(70_000)
        );
    }

    #[test]
    fn test_unparseable_principal_does_not_settle_at_open() {
        let body = r#"{
            "success": true,
            "data": {
                "id": "s", "loanId": "loan-1", "dueDate": "2024-05-15",
                "totalDue": "5000", "paidAmount": "0", "status": "PENDING",
                "loan": {"id": "loan-1", "principalAmount": "100,000.00"}
            }
        }"#;
        let item = ScheduleItem::from_response(body).unwrap();
        assert_eq!(item.loan.principal_amount, Money::ZERO);

        let time = time();
        let mut session = PaymentSession::new(EngineConfig::default());
        let ticket = session.open(item, &time);
        assert_eq!(session.state(), SessionState::Loading);
        assert_eq!(session.entry().amount, "5000");
        assert!(!session.is_settled());

        assert!(session.resolve_summary(ticket, Ok(summary(70_000))));
        assert_eq!(session.state(), SessionState::Ready);
        session.set_amount("5000").unwrap();
        assert!(session.can_submit());
    }

    #[test]
    fn test_settled_when_summary_fails_and_fallback_is_zero() {
        let time = time();
        let mut session = PaymentSession::new(EngineConfig::default());
        let ticket = session.open(fixtures::item(today(), 5000, 5000, 5000), &time);
        assert!(session.resolve_summary(
            ticket,
            Err(PaymentError::ApiRejected {
                message: "gateway timeout".to_string()
            })
        ));

        assert_eq!(session.state(), SessionState::Settled);
        assert_eq!(session.set_amount("0.01"), Err(PaymentError::LoanSettled));
        assert_eq!(session.set_mode(PaymentMode::Custom), Err(PaymentError::LoanSettled));
        assert_eq!(session.begin_submit(&time).unwrap_err(), PaymentError::LoanSettled);
        assert!(session.inline_error().is_none());
    }

    #[test]
    fn test_settled_by_summary() {
        let time = time();
        let mut session = PaymentSession::new(EngineConfig::default());
        let ticket = session.open(fixtures::item(today(), 5000, 0, 100_000), &time);
        session.resolve_summary(ticket, Ok(summary(0)));

        assert!(session.is_settled());
        assert!(session
            .events
            .events()
            .iter()
            .any(|e| matches!(e, Event::LoanSettled { .. })));
    }

    #[test]
    fn test_submission_success_closes_and_requests_refresh() {
        let (mut session, time) = ready_session();
        session.set_method(PaymentMethod::Transfer).unwrap();
        session.set_notes("first installment").unwrap();

        let ticket = session.begin_submit(&time).unwrap();
        assert_eq!(session.state(), SessionState::Submitting);
        assert_eq!(ticket.payload.amount(), Money::from_major(3000));
        assert_eq!(ticket.payload.method, PaymentMethod::Transfer);
        assert_eq!(ticket.payload.notes, "first installment");

        match session.resolve_submission(ticket, Ok(receipt())) {
            SubmissionOutcome::Recorded { loan_id, receipt } => {
                assert_eq!(loan_id, "loan-1");
                assert_eq!(receipt.id, "rcpt-1");
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(session.state(), SessionState::Closed);
        assert_eq!(session.summary(), &SummaryState::Absent);
    }

    #[test]
    fn test_double_submission_blocked() {
        let (mut session, time) = ready_session();
        let _ticket = session.begin_submit(&time).unwrap();

        assert_eq!(
            session.begin_submit(&time).unwrap_err(),
            PaymentError::SubmissionInProgress
        );
        assert_eq!(
            session.set_amount("1"),
            Err(PaymentError::SubmissionInProgress)
        );
        assert!(!session.can_submit());
    }

    #[test]
    fn test_submission_failure_keeps_entry() {
        let (mut session, time) = ready_session();
        session.set_amount("2500").unwrap();
        session.set_notes("cash at desk").unwrap();

        let ticket = session.begin_submit(&time).unwrap();
        let outcome = session.resolve_submission(
            ticket,
            Err(PaymentError::ApiRejected {
                message: "Loan is locked for reconciliation".to_string(),
            }),
        );

        assert_eq!(
            outcome,
            SubmissionOutcome::Rejected {
                message: "Loan is locked for reconciliation".to_string()
            }
        );
        assert_eq!(session.state(), SessionState::Ready);
        assert_eq!(session.entry().amount, "2500");
        assert_eq!(session.entry().notes, "cash at desk");
        assert_eq!(session.submission_error(), Some("Loan is locked for reconciliation"));

        // retry clears the previous error
        let retry = session.begin_submit(&time).unwrap();
        assert!(session.submission_error().is_none());
        assert_eq!(retry.payload.amount(), Money::from_major(2500));
    }

    #[test]
    fn test_network_failure_uses_generic_message() {
        let (mut session, time) = ready_session();
        let ticket = session.begin_submit(&time).unwrap();
        let outcome = session.resolve_submission(
            ticket,
            Err(PaymentError::MalformedResponse {
                message: "expected value at line 1".to_string(),
            }),
        );
        assert_eq!(
            outcome,
            SubmissionOutcome::Rejected {
                message: crate::errors::GENERIC_SUBMISSION_MESSAGE.to_string()
            }
        );
    }

    #[test]
    fn test_late_summary_after_close_is_ignored() {
        let time = time();
        let mut session = PaymentSession::new(EngineConfig::default());
        let ticket = session.open(fixtures::item(today(), 5000, 2000, 100_000), &time);
        session.close();

        assert!(!session.resolve_summary(ticket, Ok(summary(70_000))));
        assert_eq!(session.state(), SessionState::Closed);
        assert_eq!(session.summary(), &SummaryState::Absent);
    }

    #[test]
    fn test_late_summary_after_reopen_is_ignored() {
        let time = time();
        let mut session = PaymentSession::new(EngineConfig::default());
        let first = session.open(fixtures::item(today(), 5000, 2000, 100_000), &time);
        let second = session.open(fixtures::item(today(), 5000, 2000, 100_000), &time);

        assert!(!session.resolve_summary(first, Ok(summary(1))));
        assert_eq!(session.state(), SessionState::Loading);
        assert!(session.resolve_summary(second, Ok(summary(70_000))));
        assert_eq!(
            session.loan_metrics().unwrap().total_left_to_pay,
            Money::from_major(70_000)
        );
    }

    #[test]
    fn test_late_submission_after_close_is_ignored() {
        let (mut session, time) = ready_session();
        let ticket = session.begin_submit(&time).unwrap();
        session.close();

        assert_eq!(
            session.resolve_submission(ticket, Ok(receipt())),
            SubmissionOutcome::Ignored
        );
        assert!(session
            .events
            .events()
            .iter()
            .any(|e| matches!(e, Event::StaleResponseIgnored { .. })));
    }

    #[test]
    fn test_ticket_from_other_session_is_ignored() {
        let time = time();
        let mut a = PaymentSession::new(EngineConfig::default());
        let mut b = PaymentSession::new(EngineConfig::default());
        let _own = a.open(fixtures::item(today(), 5000, 2000, 100_000), &time);
        let foreign = b.open(fixtures::item(today(), 5000, 2000, 100_000), &time);

        // same generation number, different session
        assert!(!a.resolve_summary(foreign, Ok(summary(1))));
        assert_eq!(a.state(), SessionState::Loading);
    }

    #[test]
    fn test_schedule_wide_fallback_preferred() {
        let time = time();
        let mut session = PaymentSession::new(EngineConfig::default());
        let mut schedule = Vec::new();
        for seq in 1..=3u32 {
            let mut item = fixtures::item(today() + Duration::days(30 * (seq as i64 - 1)), 10_000, 0, 30_000);
            item.id = format!("item-{}", seq);
            item.sequence = seq;
            if seq == 1 {
                item.paid_amount = Money::from_major(10_000);
            }
            schedule.push(item);
        }
        let mut current = schedule[1].clone();
        current.paid_amount = Money::from_major(4_000);
        schedule[1] = current.clone();

        session.open_with_schedule(current, schedule, &time);
        let loan = session.loan_metrics().unwrap();
        assert_eq!(loan.total_paid, Money::from_major(14_000));
        assert_eq!(loan.total_left_to_pay, Money::from_major(16_000));
    }

    #[test]
    fn test_edits_rejected_when_closed() {
        let mut session = PaymentSession::new(EngineConfig::default());
        assert!(matches!(
            session.set_amount("10"),
            Err(PaymentError::InvalidState { .. })
        ));
        assert!(matches!(
            session.begin_submit(&time()),
            Err(PaymentError::InvalidState { .. })
        ));
    }

    #[test]
    fn test_submit_while_loading_rejected() {
        let time = time();
        let mut session = PaymentSession::new(EngineConfig::default());
        session.open(fixtures::item(today(), 5000, 2000, 100_000), &time);
        assert!(matches!(
            session.begin_submit(&time),
            Err(PaymentError::InvalidState {
                current: SessionState::Loading,
                ..
            })
        ));
    }
}
