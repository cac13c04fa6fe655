use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::records::Period;

/// what a student owes for one period on a given date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeAssessment {
    pub base: Money,
    /// surcharge actually added (zero when not applied)
    pub surcharge: Money,
    pub total_due: Money,
    pub surcharge_applied: bool,
}

/// late-fee rule for billing periods
pub struct FeeCalculator;

impl FeeCalculator {
    /// amount due for `period` as of `evaluation_date`
    ///
    /// The surcharge applies only strictly after the due date; paying on the
    /// due date itself costs the base amount.
    pub fn amount_due(period: &Period, evaluation_date: NaiveDate) -> FeeAssessment {
        if evaluation_date > period.due_date {
            FeeAssessment {
                base: period.base_amount,
                surcharge: period.surcharge_amount,
                total_due: period.base_amount + period.surcharge_amount,
                surcharge_applied: true,
            }
        } else {
            FeeAssessment {
                base: period.base_amount,
                surcharge: Money::ZERO,
                total_due: period.base_amount,
                surcharge_applied: false,
            }
        }
    }

    /// days past the due date, zero on or before it
    pub fn days_overdue(period: &Period, evaluation_date: NaiveDate) -> u32 {
        let days = (evaluation_date - period.due_date).num_days();
        days.max(0) as u32
    }
}
