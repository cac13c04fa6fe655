use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::records::Entity;
use crate::types::{PaymentId, PeriodId, StudentId};

/// one payment event by a student against a period
///
/// Surcharge and partial-payment facts are not stored here; they are
/// derived from the period terms and the payment history on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub student_id: StudentId,
    pub period_id: PeriodId,
    pub payment_date: NaiveDate,
    pub amount: Money,
    /// free text, e.g. "cash" or "transfer"
    pub method: String,
}

impl Payment {
    /// unsaved payment (id 0)
    pub fn new(
        student_id: StudentId,
        period_id: PeriodId,
        payment_date: NaiveDate,
        amount: Money,
        method: impl Into<String>,
    ) -> Self {
        Self {
            id: PaymentId::default(),
            student_id,
            period_id,
            payment_date,
            amount,
            method: method.into(),
        }
    }

    pub fn is_for(&self, student_id: StudentId, period_id: PeriodId) -> bool {
        self.student_id == student_id && self.period_id == period_id
    }
}

impl Entity for Payment {
    type Id = PaymentId;
    const KIND: &'static str = "payment";

    fn id(&self) -> PaymentId {
        self.id
    }

    fn assign_id(&mut self, id: PaymentId) {
        self.id = id;
    }
}
