use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{Result, SchoolError};
use crate::records::Entity;
use crate::types::PeriodId;

/// one billing cycle's terms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub id: PeriodId,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// last day to pay without surcharge
    pub due_date: NaiveDate,
    pub base_amount: Money,
    pub surcharge_amount: Money,
}

impl Period {
    pub fn builder() -> PeriodBuilder {
        PeriodBuilder::new()
    }

    /// check start <= due <= end, base > 0 and surcharge >= 0
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(SchoolError::validation("period name", "is required"));
        }
        if self.start_date > self.end_date {
            return Err(SchoolError::InvalidPeriod {
                message: format!(
                    "start date {} is after end date {}",
                    self.start_date, self.end_date
                ),
            });
        }
        if self.due_date < self.start_date || self.due_date > self.end_date {
            return Err(SchoolError::InvalidPeriod {
                message: format!(
                    "due date {} must fall between {} and {}",
                    self.due_date, self.start_date, self.end_date
                ),
            });
        }
        if !self.base_amount.is_positive() {
            return Err(SchoolError::InvalidPeriod {
                message: format!("base amount must be positive, got {}", self.base_amount),
            });
        }
        if self.surcharge_amount.is_negative() {
            return Err(SchoolError::InvalidPeriod {
                message: format!(
                    "surcharge amount cannot be negative, got {}",
                    self.surcharge_amount
                ),
            });
        }
        Ok(())
    }

    /// true when `date` falls inside the period
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

impl Entity for Period {
    type Id = PeriodId;
    const KIND: &'static str = "period";

    fn id(&self) -> PeriodId {
        self.id
    }

    fn assign_id(&mut self, id: PeriodId) {
        self.id = id;
    }
}

/// builder for new billing periods
#[derive(Debug, Default)]
pub struct PeriodBuilder {
    name: Option<String>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    due_date: Option<NaiveDate>,
    base_amount: Option<Money>,
    surcharge_amount: Option<Money>,
}

impl PeriodBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn end_date(mut self, date: NaiveDate) -> Self {
        self.end_date = Some(date);
        self
    }

    pub fn due_date(mut self, date: NaiveDate) -> Self {
        self.due_date = Some(date);
        self
    }

    pub fn base_amount(mut self, amount: Money) -> Self {
        self.base_amount = Some(amount);
        self
    }

    pub fn surcharge_amount(mut self, amount: Money) -> Self {
        self.surcharge_amount = Some(amount);
        self
    }

    /// build an unsaved period (id 0); surcharge defaults to zero
    pub fn build(self) -> Result<Period> {
        let missing = |field: &'static str| SchoolError::validation(field, "is required");

        let period = Period {
            id: PeriodId::default(),
            name: self.name.ok_or_else(|| missing("period name"))?,
            start_date: self.start_date.ok_or_else(|| missing("start date"))?,
            end_date: self.end_date.ok_or_else(|| missing("end date"))?,
            due_date: self.due_date.ok_or_else(|| missing("due date"))?,
            base_amount: self.base_amount.ok_or_else(|| missing("base amount"))?,
            surcharge_amount: self.surcharge_amount.unwrap_or(Money::ZERO),
        };
        period.validate()?;
        Ok(period)
    }
}
