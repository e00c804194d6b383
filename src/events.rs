use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::metrics::LoanMetricsSource;
use crate::types::{LoanId, PaymentMethod, PaymentMode, ScheduleItemId};

/// all events that can be emitted by a payment session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // lifecycle events
    PaymentSurfaceOpened {
        session_id: Uuid,
        loan_id: LoanId,
        schedule_item_id: ScheduleItemId,
        timestamp: DateTime<Utc>,
    },
    PaymentSurfaceClosed {
        session_id: Uuid,
    },
    LoanSettled {
        session_id: Uuid,
        loan_id: LoanId,
        source: LoanMetricsSource,
    },

    // summary events
    LoanSummaryLoaded {
        session_id: Uuid,
        loan_id: LoanId,
        total_outstanding: Money,
    },
    LoanSummaryFailed {
        session_id: Uuid,
        loan_id: LoanId,
        message: String,
    },

    // entry events
    PaymentModeChanged {
        session_id: Uuid,
        mode: PaymentMode,
    },

    // submission events
    PaymentSubmitted {
        session_id: Uuid,
        loan_id: LoanId,
        amount: Money,
        method: PaymentMethod,
        reference: String,
        timestamp: DateTime<Utc>,
    },
    PaymentRecorded {
        session_id: Uuid,
        loan_id: LoanId,
        reference: String,
        receipt_id: String,
    },
    PaymentRejected {
        session_id: Uuid,
        loan_id: LoanId,
        reference: String,
        message: String,
    },

    /// a response arrived for a ticket that no longer matches the session
    StaleResponseIgnored {
        session_id: Uuid,
        generation: u64,
        response: String,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_events_drains() {
        let mut store = EventStore::new();
        let session_id = Uuid::new_v4();
        store.emit(Event::PaymentSurfaceClosed { session_id });
        store.emit(Event::PaymentModeChanged {
            session_id,
            mode: PaymentMode::Custom,
        });

        assert_eq!(store.events().len(), 2);
        let taken = store.take_events();
        assert_eq!(taken.len(), 2);
        assert!(store.events().is_empty());
    }

    #[test]
    fn test_events_serialize() {
        let event = Event::LoanSummaryLoaded {
            session_id: Uuid::nil(),
            loan_id: "loan-1".to_string(),
            total_outstanding: Money::from_major(70_000),
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
