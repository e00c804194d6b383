use hourglass_rs::SafeTimeProvider;

use crate::errors::Result;
use crate::records::{LoanSummary, ScheduleItem};
use crate::types::LoanId;

use super::payload::{CreatePaymentPayload, PaymentReceipt};
use super::session::{PaymentSession, SubmissionOutcome};

/// the loan api as seen by the payment surface.
///
/// Each call is one attempt: implementations must not retry, and callers
/// surface any error to the user instead.
pub trait PaymentGateway {
    fn fetch_loan_summary(&self, loan_id: &LoanId) -> Result<LoanSummary>;

    fn create_payment(&self, payload: &CreatePaymentPayload) -> Result<PaymentReceipt>;
}

impl PaymentSession {
    /// open the surface and fetch the loan summary in one go
    pub fn open_with<G: PaymentGateway>(
        &mut self,
        gateway: &G,
        item: ScheduleItem,
        time: &SafeTimeProvider,
    ) {
        let ticket = self.open(item, time);
        let response = gateway.fetch_loan_summary(&ticket.loan_id);
        self.resolve_summary(ticket, response);
    }

    /// validate, submit once, and apply the response
    pub fn submit_with<G: PaymentGateway>(
        &mut self,
        gateway: &G,
        time: &SafeTimeProvider,
    ) -> Result<SubmissionOutcome> {
        let ticket = self.begin_submit(time)?;
        let response = gateway.create_payment(&ticket.payload);
        Ok(self.resolve_submission(ticket, response))
    }
}
