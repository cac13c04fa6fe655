use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::decimal::Money;
use crate::fees::FeeCalculator;
use crate::payments::PaymentAccumulator;
use crate::records::{Payment, Period, Student};
use crate::types::{BillingMonth, PeriodId, StudentId};

/// a student owing money for one period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debtor {
    pub student: Student,
    pub period_id: PeriodId,
    pub amount_due: Money,
    pub amount_paid: Money,
    /// always positive
    pub amount_owed: Money,
}

/// one unpaid period inside a student's arrears
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwedPeriod {
    pub period: Period,
    pub amount_owed: Money,
}

/// everything a student still owes for closed periods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentArrears {
    pub student: Student,
    pub periods: BTreeMap<PeriodId, OwedPeriod>,
}

impl StudentArrears {
    pub fn total_owed(&self) -> Money {
        self.periods.values().map(|p| p.amount_owed).sum()
    }
}

/// student -> period -> owed, only non-empty entries
pub type ArrearsMap = BTreeMap<StudentId, StudentArrears>;

/// finds students whose payments fall short of what a period costs
pub struct DebtorEnumerator;

impl DebtorEnumerator {
    /// debtors of `period` as of `today`, in roster order
    ///
    /// Complete and overpaid students are never debtors, and neither is
    /// anyone when the period costs nothing.
    pub fn debtors_for_period(
        period: &Period,
        roster: &[Student],
        payments: &[Payment],
        today: NaiveDate,
    ) -> Vec<Debtor> {
        Self::log_dangling(roster, payments);

        let assessment = FeeCalculator::amount_due(period, today);
        let debtors: Vec<Debtor> = roster
            .iter()
            .filter_map(|student| {
                let paid = PaymentAccumulator::amount_paid(payments, student.id, period.id);
                (paid < assessment.total_due).then(|| Debtor {
                    student: student.clone(),
                    period_id: period.id,
                    amount_due: assessment.total_due,
                    amount_paid: paid,
                    amount_owed: assessment.total_due - paid,
                })
            })
            .collect();

        tracing::debug!(
            period_id = %period.id,
            roster = roster.len(),
            debtors = debtors.len(),
            "enumerated period debtors"
        );

        debtors
    }

    /// arrears on periods that ended before `reference_month` started
    pub fn debtors_before_month(
        reference_month: BillingMonth,
        roster: &[Student],
        periods: &[Period],
        payments: &[Payment],
        today: NaiveDate,
    ) -> ArrearsMap {
        Self::log_dangling(roster, payments);

        let cutoff = reference_month.first_day();
        let closed: Vec<&Period> = periods.iter().filter(|p| p.end_date < cutoff).collect();

        let mut arrears = ArrearsMap::new();
        for student in roster {
            let owed: BTreeMap<PeriodId, OwedPeriod> = closed
                .iter()
                .filter_map(|period| {
                    let due = FeeCalculator::amount_due(period, today).total_due;
                    let paid = PaymentAccumulator::amount_paid(payments, student.id, period.id);
                    (paid < due).then(|| {
                        (
                            period.id,
                            OwedPeriod {
                                period: (*period).clone(),
                                amount_owed: due - paid,
                            },
                        )
                    })
                })
                .collect();

            if !owed.is_empty() {
                arrears.insert(
                    student.id,
                    StudentArrears {
                        student: student.clone(),
                        periods: owed,
                    },
                );
            }
        }

        tracing::debug!(
            month = %reference_month,
            closed_periods = closed.len(),
            students = arrears.len(),
            "enumerated arrears"
        );

        arrears
    }

    // payments for students outside the roster are skipped by the id filters
    fn log_dangling(roster: &[Student], payments: &[Payment]) {
        let known: BTreeSet<StudentId> = roster.iter().map(|s| s.id).collect();
        let dangling = payments
            .iter()
            .filter(|p| !known.contains(&p.student_id))
            .count();
        if dangling > 0 {
            tracing::debug!(dangling, "skipping payments for students outside the roster");
        }
    }
}
