/// payment session - open, fetch summary, submit, with a stub api
use std::cell::Cell;

use chrono::{TimeZone, Utc};
use loan_repayment_rs::{
    CreatePaymentPayload, EngineConfig, LoanId, LoanSummary, Money, PaymentGateway,
    PaymentMethod, PaymentMode, PaymentReceipt, PaymentSession, PaymentSurfaceView,
    SafeTimeProvider, ScheduleItem, SubmissionOutcome, TimeSource,
};

struct StubApi {
    attempts: Cell<u32>,
}

impl PaymentGateway for StubApi {
    fn fetch_loan_summary(&self, _loan_id: &LoanId) -> loan_repayment_rs::Result<LoanSummary> {
        LoanSummary::from_response(
            r#"{"success": true, "data": {"principalAmount": "100000", "totalPaid": "30000", "totalOutstanding": "70000"}}"#,
        )
    }

    fn create_payment(
        &self,
        payload: &CreatePaymentPayload,
    ) -> loan_repayment_rs::Result<PaymentReceipt> {
        self.attempts.set(self.attempts.get() + 1);
        println!("POST /payments {}", payload.to_json()?);
        if self.attempts.get() == 1 {
            // first attempt bounces so the retry path shows
            return Err(loan_repayment_rs::PaymentError::ApiRejected {
                message: "Teller session expired, please retry".to_string(),
            });
        }
        PaymentReceipt::from_response(&format!(
            r#"{{"success": true, "data": {{"id": 501, "reference": "{}", "amount": {}}}}}"#,
            payload.reference, payload.amount
        ))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 5, 15, 10, 0, 0).unwrap(),
    ));
    let item = ScheduleItem::from_response(
        r#"{"success": true, "data": {
            "id": "sch-3", "loanId": "ln-1", "sequence": 3, "dueDate": "2024-05-10",
            "totalDue": 5000, "paidAmount": 2000, "status": "OVERDUE",
            "loan": {"id": "ln-1", "loanNumber": "LN-0001", "principalAmount": 100000}
        }}"#,
    )?;

    let api = StubApi { attempts: Cell::new(0) };
    let mut session = PaymentSession::new(EngineConfig::default());
    session.open_with(&api, item, &time);

    println!("{}", PaymentSurfaceView::from_session(&session).to_json()?);

    session.set_mode(PaymentMode::Custom)?;
    session.set_amount("90000")?;
    if let Some(err) = session.inline_error() {
        println!("inline: {}", err);
    }

    session.set_amount("25000")?;
    session.set_method(PaymentMethod::Transfer)?;
    session.set_notes("lump sum from cooperative dividend")?;

    loop {
        match session.submit_with(&api, &time)? {
            SubmissionOutcome::Recorded { loan_id, receipt } => {
                println!("recorded {} for {}, refresh loan {}", receipt.id, receipt.amount, loan_id);
                break;
            }
            SubmissionOutcome::Rejected { message } => {
                println!("rejected: {} (entry kept: {})", message, session.entry().amount);
            }
            SubmissionOutcome::Ignored => break,
        }
    }

    for event in session.events.take_events() {
        println!("{:?}", event);
    }

    assert_eq!(Money::from_major(25_000).to_input_string(), "25000");
    Ok(())
}
