use hourglass_rs::{SafeTimeProvider, TimeSource};

use super::{today, School};
use crate::debtors::{ArrearsMap, Debtor, DebtorEnumerator};
use crate::decimal::Money;
use crate::errors::Result;
use crate::events::Event;
use crate::fees::FeeCalculator;
use crate::payments::{PaymentAccumulator, PaymentReceipt, PaymentRequest};
use crate::records::{Payment, Student};
use crate::reports::{MonthlyReport, PaymentReports, StudentMonthTotal};
use crate::store::{PaymentStore, PeriodDirectory, Storage, StudentDirectory};
use crate::types::{BillingMonth, PaymentId, PaymentState, PeriodId, StudentId};

impl<S: Storage> School<S> {
    /// record a payment dated today with system time
    pub fn record_payment_now(
        &mut self,
        student_id: StudentId,
        period_id: PeriodId,
        amount: Money,
        method: &str,
    ) -> Result<PaymentReceipt> {
        let time = SafeTimeProvider::new(TimeSource::System);
        self.record_payment(student_id, period_id, amount, method, &time)
    }

    /// record a payment dated today
    pub fn record_payment(
        &mut self,
        student_id: StudentId,
        period_id: PeriodId,
        amount: Money,
        method: &str,
        time_provider: &SafeTimeProvider,
    ) -> Result<PaymentReceipt> {
        let request = PaymentRequest::new(student_id, period_id, amount, today(time_provider), method);
        self.submit_payment(request, time_provider)
    }

    /// record a payment with an explicit date, e.g. one taken while offline
    pub fn submit_payment(
        &mut self,
        request: PaymentRequest,
        time_provider: &SafeTimeProvider,
    ) -> Result<PaymentReceipt> {
        let today = today(time_provider);
        request.validate(today, &self.config.billing)?;

        self.store.get_student(request.student_id)?;
        let period = self.store.get_period(request.period_id)?;

        let payment =
            PaymentAccumulator::record_payment(&mut self.store, request, today, &self.config.billing)?;
        let history = self.store.list_payments_for(payment.student_id, payment.period_id);
        let receipt = PaymentAccumulator::describe(&payment, &period, &history);

        tracing::info!(
            payment_id = %payment.id,
            student_id = %payment.student_id,
            period_id = %payment.period_id,
            amount = %payment.amount,
            state = ?receipt.state_after,
            "recorded payment"
        );

        self.emit_payment_events(&receipt, time_provider);

        Ok(receipt)
    }

    fn emit_payment_events(&mut self, receipt: &PaymentReceipt, time_provider: &SafeTimeProvider) {
        let payment = &receipt.payment;
        let timestamp = time_provider.now();

        self.events.emit(Event::PaymentRecorded {
            payment_id: payment.id,
            student_id: payment.student_id,
            period_id: payment.period_id,
            amount: payment.amount,
            timestamp,
        });

        if receipt.surcharge_applied() {
            self.events.emit(Event::SurchargeApplied {
                payment_id: payment.id,
                student_id: payment.student_id,
                period_id: payment.period_id,
                surcharge: receipt.surcharge_charged(),
                days_overdue: receipt.days_overdue,
                timestamp,
            });
        }

        match receipt.state_after {
            PaymentState::Partial => self.events.emit(Event::PartialPaymentDetected {
                payment_id: payment.id,
                student_id: payment.student_id,
                period_id: payment.period_id,
                outstanding: receipt.outstanding_after(),
                timestamp,
            }),
            PaymentState::Overpaid => self.events.emit(Event::OverpaymentReceived {
                payment_id: payment.id,
                student_id: payment.student_id,
                period_id: payment.period_id,
                excess: receipt.excess(),
                timestamp,
            }),
            PaymentState::None | PaymentState::Complete => {}
        }
    }

    pub fn payment(&self, id: PaymentId) -> Result<Payment> {
        self.repo::<Payment>().fetch(id)
    }

    /// a stored payment with its surcharge and completeness facts
    pub fn payment_detail(&self, id: PaymentId) -> Result<PaymentReceipt> {
        let payment = self.payment(id)?;
        let period = self.store.get_period(payment.period_id)?;
        let history = self.store.list_payments_for(payment.student_id, payment.period_id);
        Ok(PaymentAccumulator::describe(&payment, &period, &history))
    }

    pub fn payments_for_student(&self, student_id: StudentId) -> Vec<Payment> {
        self.store
            .list_payments()
            .into_iter()
            .filter(|p| p.student_id == student_id)
            .collect()
    }

    pub fn payments_for_period(&self, period_id: PeriodId) -> Vec<Payment> {
        self.store
            .list_payments()
            .into_iter()
            .filter(|p| p.period_id == period_id)
            .collect()
    }

    /// total paid by a student for a period
    pub fn amount_paid(&self, student_id: StudentId, period_id: PeriodId) -> Money {
        PaymentAccumulator::amount_paid(&self.store.list_payments(), student_id, period_id)
    }

    /// whether the student still owes anything for the period today
    pub fn is_debtor(
        &self,
        student_id: StudentId,
        period_id: PeriodId,
        time_provider: &SafeTimeProvider,
    ) -> Result<bool> {
        self.store.get_student(student_id)?;
        let period = self.store.get_period(period_id)?;

        let due = FeeCalculator::amount_due(&period, today(time_provider)).total_due;
        Ok(self.amount_paid(student_id, period_id) < due)
    }

    /// active students owing money for the period today
    pub fn debtors_for_period(
        &self,
        period_id: PeriodId,
        time_provider: &SafeTimeProvider,
    ) -> Result<Vec<Debtor>> {
        let period = self.store.get_period(period_id)?;
        Ok(DebtorEnumerator::debtors_for_period(
            &period,
            &self.active_students(),
            &self.store.list_payments(),
            today(time_provider),
        ))
    }

    /// debtors of the current period, or of the latest one when none is running
    pub fn debtors_for_current_period(&self, time_provider: &SafeTimeProvider) -> Vec<Debtor> {
        match self.current_or_latest_period(time_provider) {
            Some(period) => DebtorEnumerator::debtors_for_period(
                &period,
                &self.active_students(),
                &self.store.list_payments(),
                today(time_provider),
            ),
            None => Vec::new(),
        }
    }

    /// arrears of active students on periods ended before `month`
    pub fn debtors_before_month(
        &self,
        month: BillingMonth,
        time_provider: &SafeTimeProvider,
    ) -> ArrearsMap {
        DebtorEnumerator::debtors_before_month(
            month,
            &self.active_students(),
            &self.store.list_periods_ending_before(month.first_day()),
            &self.store.list_payments(),
            today(time_provider),
        )
    }

    /// payments of `month` summarised over every student on file
    pub fn monthly_report(&self, month: BillingMonth) -> MonthlyReport {
        MonthlyReport::build(
            month,
            &self.store.list_students(),
            &self.store.list_periods(),
            &self.store.list_payments(),
        )
    }

    pub fn payments_by_student_in_month(&self, month: BillingMonth) -> Vec<StudentMonthTotal> {
        PaymentReports::payments_by_student_in_month(
            month,
            &self.store.list_students(),
            &self.store.list_payments(),
        )
    }

    /// active students who paid nothing during `month`
    pub fn students_without_payment_in_month(&self, month: BillingMonth) -> Vec<Student> {
        PaymentReports::students_without_payment_in_month(
            month,
            &self.active_students(),
            &self.store.list_payments(),
        )
    }

    pub fn revenue_for_month(&self, month: BillingMonth) -> Money {
        PaymentReports::revenue_for_month(month, &self.store.list_payments())
    }

    /// payments made after their period's due date
    pub fn surcharged_payment_count(&self) -> usize {
        PaymentReports::surcharged_payment_count(
            &self.store.list_periods(),
            &self.store.list_payments(),
        )
    }
}
