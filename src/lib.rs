pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod metrics;
pub mod payments;
pub mod records;
pub mod types;
pub mod view;

// re-export key types
pub use config::{CalendarConfig, CurrencyDisplay, EngineConfig, ReferenceConfig};
pub use decimal::Money;
pub use errors::{PaymentError, Result};
pub use events::{Event, EventStore};
pub use metrics::{
    business_today, compute_loan_metrics, compute_loan_metrics_from_schedule,
    compute_schedule_metrics, is_loan_fully_settled, select_display_metrics, DisplayMetrics,
    LoanMetrics, LoanMetricsSource, ScheduleMetrics,
};
pub use payments::{
    generate_reference, initialize_amount, validate_payment_amount, CreatePaymentPayload,
    PaymentEntry, PaymentGateway, PaymentReceipt, PaymentSession, SessionState,
    SubmissionOutcome, SubmissionTicket, SummaryTicket,
};
pub use records::{
    parse_envelope, ApiEnvelope, DueDate, Loan, LoanSummary, ScheduleItem, SummaryState,
};
pub use types::{
    LoanId, LoanStatus, PaymentMethod, PaymentMode, ScheduleItemId, ScheduleStatus, TermUnit,
};
pub use view::PaymentSurfaceView;

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
