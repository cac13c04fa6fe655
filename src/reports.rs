//! Monthly payment reports.
//!
//! All figures are computed from payment dates; the period a payment was made
//! for only matters for the surcharge count.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::decimal::Money;
use crate::fees::FeeCalculator;
use crate::records::{Payment, Period, Student};
use crate::types::{BillingMonth, PeriodId, StudentId};

/// what one student paid during a month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentMonthTotal {
    pub student: Student,
    pub total_paid: Money,
    pub payment_count: usize,
}

/// stateless monthly aggregations
pub struct PaymentReports;

impl PaymentReports {
    /// per-student totals for payments dated in `month`, ordered by student id
    ///
    /// Payments by students missing from `roster` are skipped.
    pub fn payments_by_student_in_month(
        month: BillingMonth,
        roster: &[Student],
        payments: &[Payment],
    ) -> Vec<StudentMonthTotal> {
        let students: BTreeMap<StudentId, &Student> = roster.iter().map(|s| (s.id, s)).collect();
        let mut totals: BTreeMap<StudentId, StudentMonthTotal> = BTreeMap::new();

        for payment in payments.iter().filter(|p| month.contains(p.payment_date)) {
            let Some(student) = students.get(&payment.student_id) else {
                tracing::debug!(
                    payment_id = %payment.id,
                    student_id = %payment.student_id,
                    "skipping payment for unknown student"
                );
                continue;
            };

            let entry = totals.entry(student.id).or_insert_with(|| StudentMonthTotal {
                student: (*student).clone(),
                total_paid: Money::ZERO,
                payment_count: 0,
            });
            entry.total_paid += payment.amount;
            entry.payment_count += 1;
        }

        totals.into_values().collect()
    }

    /// roster students with no payment dated in `month`, in roster order
    pub fn students_without_payment_in_month(
        month: BillingMonth,
        roster: &[Student],
        payments: &[Payment],
    ) -> Vec<Student> {
        let payers: BTreeSet<StudentId> = payments
            .iter()
            .filter(|p| month.contains(p.payment_date))
            .map(|p| p.student_id)
            .collect();

        roster
            .iter()
            .filter(|s| !payers.contains(&s.id))
            .cloned()
            .collect()
    }

    /// sum of every payment dated in `month`
    pub fn revenue_for_month(month: BillingMonth, payments: &[Payment]) -> Money {
        payments
            .iter()
            .filter(|p| month.contains(p.payment_date))
            .map(|p| p.amount)
            .sum()
    }

    /// payments made after their period's due date
    pub fn surcharged_payment_count(periods: &[Period], payments: &[Payment]) -> usize {
        let by_id: BTreeMap<PeriodId, &Period> = periods.iter().map(|p| (p.id, p)).collect();

        payments
            .iter()
            .filter(|payment| match by_id.get(&payment.period_id) {
                Some(period) => FeeCalculator::amount_due(period, payment.payment_date).surcharge_applied,
                None => {
                    tracing::debug!(
                        payment_id = %payment.id,
                        period_id = %payment.period_id,
                        "skipping payment for unknown period"
                    );
                    false
                }
            })
            .count()
    }
}

/// serializable summary of one month of payments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyReport {
    pub month: BillingMonth,
    pub revenue: Money,
    pub payment_count: usize,
    /// late payments among those dated in the month
    pub surcharged_payments: usize,
    pub by_student: Vec<StudentMonthTotal>,
    /// active students only
    pub without_payment: Vec<Student>,
}

impl MonthlyReport {
    pub fn build(
        month: BillingMonth,
        roster: &[Student],
        periods: &[Period],
        payments: &[Payment],
    ) -> Self {
        let in_month: Vec<Payment> = payments
            .iter()
            .filter(|p| month.contains(p.payment_date))
            .cloned()
            .collect();
        let active: Vec<Student> = roster.iter().filter(|s| s.active).cloned().collect();

        MonthlyReport {
            month,
            revenue: PaymentReports::revenue_for_month(month, &in_month),
            payment_count: in_month.len(),
            surcharged_payments: PaymentReports::surcharged_payment_count(periods, &in_month),
            by_student: PaymentReports::payments_by_student_in_month(month, roster, &in_month),
            without_payment: PaymentReports::students_without_payment_in_month(
                month, &active, &in_month,
            ),
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
