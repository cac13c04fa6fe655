use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::BillingPolicy;
use crate::decimal::Money;
use crate::errors::{Result, SchoolError};
use crate::fees::{FeeAssessment, FeeCalculator};
use crate::records::{Payment, Period};
use crate::store::PaymentStore;
use crate::types::{PaymentState, PeriodId, StudentId};

/// payment request as entered at the front desk
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRequest {
    pub student_id: StudentId,
    pub period_id: PeriodId,
    pub amount: Money,
    pub payment_date: NaiveDate,
    pub method: String,
}

impl PaymentRequest {
    pub fn new(
        student_id: StudentId,
        period_id: PeriodId,
        amount: Money,
        payment_date: NaiveDate,
        method: impl Into<String>,
    ) -> Self {
        Self {
            student_id,
            period_id,
            amount,
            payment_date,
            method: method.into(),
        }
    }

    pub fn validate(&self, today: NaiveDate, policy: &BillingPolicy) -> Result<()> {
        if !self.amount.is_positive() {
            return Err(SchoolError::InvalidAmount {
                amount: self.amount,
            });
        }

        if policy.reject_future_payment_dates && self.payment_date > today {
            return Err(SchoolError::FutureDate {
                field: "payment date",
                date: self.payment_date,
            });
        }

        if policy.require_payment_method && self.method.trim().is_empty() {
            return Err(SchoolError::validation("payment method", "is required"));
        }

        Ok(())
    }
}

/// a payment together with the facts derived from its period and history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentReceipt {
    pub payment: Payment,
    /// terms in force on the payment date
    pub assessment: FeeAssessment,
    /// days past the due date on the payment date
    pub days_overdue: u32,
    /// paid for the same student and period before this payment
    pub previously_paid: Money,
    pub state_after: PaymentState,
}

impl PaymentReceipt {
    pub fn surcharge_applied(&self) -> bool {
        self.assessment.surcharge_applied
    }

    pub fn surcharge_charged(&self) -> Money {
        self.assessment.surcharge
    }

    /// what was still owed when this payment arrived
    pub fn pending_before(&self) -> Money {
        self.assessment.total_due.saturating_sub(self.previously_paid)
    }

    pub fn paid_after(&self) -> Money {
        self.previously_paid + self.payment.amount
    }

    pub fn outstanding_after(&self) -> Money {
        self.assessment.total_due.saturating_sub(self.paid_after())
    }

    /// amount paid beyond what was due
    pub fn excess(&self) -> Money {
        self.paid_after().saturating_sub(self.assessment.total_due)
    }

    pub fn is_partial(&self) -> bool {
        self.state_after == PaymentState::Partial
    }
}

/// sums and classifies payments for a student and period
pub struct PaymentAccumulator;

impl PaymentAccumulator {
    /// total paid by `student_id` for `period_id`; zero when nothing matches
    pub fn amount_paid(payments: &[Payment], student_id: StudentId, period_id: PeriodId) -> Money {
        payments
            .iter()
            .filter(|p| p.is_for(student_id, period_id))
            .map(|p| p.amount)
            .sum()
    }

    /// classify how much of `amount_due` is covered by `amount_paid`
    ///
    /// A free period with nothing paid counts as complete.
    pub fn classify(amount_due: Money, amount_paid: Money) -> PaymentState {
        if amount_paid == amount_due {
            PaymentState::Complete
        } else if amount_paid > amount_due {
            PaymentState::Overpaid
        } else if amount_paid.is_zero() {
            PaymentState::None
        } else {
            PaymentState::Partial
        }
    }

    /// validate and append a new payment; existing payments are never touched
    pub fn record_payment<S>(
        store: &mut S,
        request: PaymentRequest,
        today: NaiveDate,
        policy: &BillingPolicy,
    ) -> Result<Payment>
    where
        S: PaymentStore + ?Sized,
    {
        request.validate(today, policy)?;

        let payment = Payment::new(
            request.student_id,
            request.period_id,
            request.payment_date,
            request.amount,
            request.method.trim(),
        );
        store.append(payment)
    }

    /// derive surcharge and completeness facts for a stored payment
    ///
    /// `history` may hold any payments; only earlier ones for the same
    /// student and period count as previously paid. Same-day payments are
    /// ordered by id.
    pub fn describe(payment: &Payment, period: &Period, history: &[Payment]) -> PaymentReceipt {
        let assessment = FeeCalculator::amount_due(period, payment.payment_date);
        let previously_paid: Money = history
            .iter()
            .filter(|p| p.is_for(payment.student_id, payment.period_id))
            .filter(|p| (p.payment_date, p.id) < (payment.payment_date, payment.id))
            .map(|p| p.amount)
            .sum();
        let state_after =
            Self::classify(assessment.total_due, previously_paid + payment.amount);

        PaymentReceipt {
            payment: payment.clone(),
            assessment,
            days_overdue: FeeCalculator::days_overdue(period, payment.payment_date),
            previously_paid,
            state_after,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use crate::types::PaymentId;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn payment(id: i64, student: i64, period: i64, day: u32, amount: i64) -> Payment {
        Payment {
            id: PaymentId(id),
            student_id: StudentId(student),
            period_id: PeriodId(period),
            payment_date: date(2024, 3, day),
            amount: Money::from_major(amount),
            method: "cash".to_string(),
        }
    }

    fn march() -> Period {
        Period {
            id: PeriodId(1),
            name: "March 2024".to_string(),
            start_date: date(2024, 3, 1),
            end_date: date(2024, 3, 31),
            due_date: date(2024, 3, 10),
            base_amount: Money::from_major(100),
            surcharge_amount: Money::from_major(20),
        }
    }

    #[test]
    fn test_amount_paid_filters_by_student_and_period() {
        let payments = vec![
            payment(1, 1, 1, 2, 40),
            payment(2, 1, 1, 5, 35),
            payment(3, 2, 1, 5, 100),
            payment(4, 1, 2, 5, 100),
        ];

        assert_eq!(
            PaymentAccumulator::amount_paid(&payments, StudentId(1), PeriodId(1)),
            Money::from_major(75)
        );
        assert_eq!(
            PaymentAccumulator::amount_paid(&payments, StudentId(3), PeriodId(1)),
            Money::ZERO
        );
    }

    #[test]
    fn test_classify() {
        let due = Money::from_major(100);
        assert_eq!(PaymentAccumulator::classify(due, Money::ZERO), PaymentState::None);
        assert_eq!(PaymentAccumulator::classify(due, Money::from_major(75)), PaymentState::Partial);
        assert_eq!(PaymentAccumulator::classify(due, Money::from_major(100)), PaymentState::Complete);
        assert_eq!(PaymentAccumulator::classify(due, Money::from_major(150)), PaymentState::Overpaid);
    }

    #[test]
    fn test_classify_free_period() {
        assert_eq!(
            PaymentAccumulator::classify(Money::ZERO, Money::ZERO),
            PaymentState::Complete
        );
        assert_eq!(
            PaymentAccumulator::classify(Money::ZERO, Money::from_major(5)),
            PaymentState::Overpaid
        );
    }

    #[test]
    fn test_request_validation() {
        let policy = BillingPolicy::default();
        let today = date(2024, 3, 15);

        let ok = PaymentRequest::new(StudentId(1), PeriodId(1), Money::from_major(50), today, "cash");
        assert!(ok.validate(today, &policy).is_ok());

        let zero = PaymentRequest { amount: Money::ZERO, ..ok.clone() };
        assert!(matches!(
            zero.validate(today, &policy),
            Err(SchoolError::InvalidAmount { .. })
        ));

        let negative = PaymentRequest { amount: Money::from_major(-10), ..ok.clone() };
        assert!(negative.validate(today, &policy).is_err());

        let future = PaymentRequest { payment_date: date(2024, 3, 16), ..ok.clone() };
        assert!(matches!(
            future.validate(today, &policy),
            Err(SchoolError::FutureDate { .. })
        ));

        let no_method = PaymentRequest { method: "  ".to_string(), ..ok.clone() };
        assert!(no_method.validate(today, &policy).is_err());
    }

    #[test]
    fn test_future_dates_allowed_when_policy_off() {
        let policy = BillingPolicy {
            reject_future_payment_dates: false,
            ..BillingPolicy::default()
        };
        let today = date(2024, 3, 15);
        let request = PaymentRequest::new(
            StudentId(1),
            PeriodId(1),
            Money::from_major(50),
            date(2024, 4, 1),
            "transfer",
        );
        assert!(request.validate(today, &policy).is_ok());
    }

    #[test]
    fn test_record_payment_appends() {
        let mut store = MemoryStore::new();
        let policy = BillingPolicy::default();
        let today = date(2024, 3, 15);

        let first = PaymentAccumulator::record_payment(
            &mut store,
            PaymentRequest::new(StudentId(1), PeriodId(1), Money::from_major(40), today, " cash "),
            today,
            &policy,
        )
        .unwrap();
        let second = PaymentAccumulator::record_payment(
            &mut store,
            PaymentRequest::new(StudentId(1), PeriodId(1), Money::from_major(35), today, "cash"),
            today,
            &policy,
        )
        .unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(first.method, "cash");
        assert_eq!(store.list_payments().len(), 2);
        assert_eq!(store.list_payments()[0], first);
    }

    #[test]
    fn test_record_payment_rejects_without_appending() {
        let mut store = MemoryStore::new();
        let today = date(2024, 3, 15);

        let result = PaymentAccumulator::record_payment(
            &mut store,
            PaymentRequest::new(StudentId(1), PeriodId(1), Money::ZERO, today, "cash"),
            today,
            &BillingPolicy::default(),
        );

        assert!(result.is_err());
        assert!(store.list_payments().is_empty());
    }

    #[test]
    fn test_describe_installments() {
        let history = vec![payment(1, 1, 1, 2, 40), payment(2, 1, 1, 5, 35), payment(3, 1, 1, 20, 45)];
        let period = march();

        let first = PaymentAccumulator::describe(&history[0], &period, &history);
        assert_eq!(first.previously_paid, Money::ZERO);
        assert_eq!(first.pending_before(), Money::from_major(100));
        assert!(first.is_partial());
        assert!(!first.surcharge_applied());

        let second = PaymentAccumulator::describe(&history[1], &period, &history);
        assert_eq!(second.previously_paid, Money::from_major(40));
        assert_eq!(second.outstanding_after(), Money::from_major(25));
        assert!(second.is_partial());

        // late installment: total due is now 120 and 75 + 45 covers it
        let third = PaymentAccumulator::describe(&history[2], &period, &history);
        assert!(third.surcharge_applied());
        assert_eq!(third.surcharge_charged(), Money::from_major(20));
        assert_eq!(third.days_overdue, 10);
        assert_eq!(third.state_after, PaymentState::Complete);
        assert_eq!(third.outstanding_after(), Money::ZERO);
    }

    #[test]
    fn test_describe_overpayment() {
        let history = vec![payment(1, 1, 1, 2, 150)];
        let receipt = PaymentAccumulator::describe(&history[0], &march(), &history);

        assert_eq!(receipt.state_after, PaymentState::Overpaid);
        assert_eq!(receipt.excess(), Money::from_major(50));
        assert!(!receipt.is_partial());
    }

    #[test]
    fn test_describe_same_day_ordered_by_id() {
        let history = vec![payment(7, 1, 1, 5, 30), payment(3, 1, 1, 5, 20)];
        let receipt = PaymentAccumulator::describe(&history[0], &march(), &history);

        assert_eq!(receipt.previously_paid, Money::from_major(20));
        assert_eq!(receipt.paid_after(), Money::from_major(50));
    }
}
