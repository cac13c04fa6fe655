use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{
    ClassId, DocumentId, DocumentStatus, InstructorId, PaymentId, PeriodId, StudentId, UserId,
    UserRole,
};

/// all events that can be emitted by the school
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // billing period events
    PeriodRegistered {
        period_id: PeriodId,
        name: String,
        base_amount: Money,
        surcharge_amount: Money,
        due_date: NaiveDate,
        timestamp: DateTime<Utc>,
    },
    PeriodUpdated {
        period_id: PeriodId,
        timestamp: DateTime<Utc>,
    },
    PeriodDeleted {
        period_id: PeriodId,
        timestamp: DateTime<Utc>,
    },

    // payment events
    PaymentRecorded {
        payment_id: PaymentId,
        student_id: StudentId,
        period_id: PeriodId,
        amount: Money,
        timestamp: DateTime<Utc>,
    },
    SurchargeApplied {
        payment_id: PaymentId,
        student_id: StudentId,
        period_id: PeriodId,
        surcharge: Money,
        days_overdue: u32,
        timestamp: DateTime<Utc>,
    },
    PartialPaymentDetected {
        payment_id: PaymentId,
        student_id: StudentId,
        period_id: PeriodId,
        outstanding: Money,
        timestamp: DateTime<Utc>,
    },
    OverpaymentReceived {
        payment_id: PaymentId,
        student_id: StudentId,
        period_id: PeriodId,
        excess: Money,
        timestamp: DateTime<Utc>,
    },

    // registry events
    StudentRegistered {
        student_id: StudentId,
        name: String,
        timestamp: DateTime<Utc>,
    },
    StudentStatusChanged {
        student_id: StudentId,
        active: bool,
        timestamp: DateTime<Utc>,
    },
    InstructorRegistered {
        instructor_id: InstructorId,
        name: String,
        timestamp: DateTime<Utc>,
    },
    ClassRegistered {
        class_id: ClassId,
        name: String,
        instructor_id: Option<InstructorId>,
        timestamp: DateTime<Utc>,
    },
    DocumentStatusChanged {
        document_id: DocumentId,
        student_id: StudentId,
        /// none when the document was just registered
        old_status: Option<DocumentStatus>,
        new_status: DocumentStatus,
        timestamp: DateTime<Utc>,
    },

    // account events
    UserRegistered {
        user_id: UserId,
        username: String,
        role: UserRole,
        timestamp: DateTime<Utc>,
    },
    UserStatusChanged {
        user_id: UserId,
        active: bool,
        timestamp: DateTime<Utc>,
    },
    LoginSucceeded {
        user_id: UserId,
        timestamp: DateTime<Utc>,
    },
    LoginFailed {
        username: String,
        timestamp: DateTime<Utc>,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self { events: Vec::new() }
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
