use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::SchoolError;

/// raw storage key shared by every record id
pub trait RecordId: Copy + Ord + fmt::Debug + fmt::Display {
    fn from_raw(raw: i64) -> Self;
    fn raw(self) -> i64;
}

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl RecordId for $name {
            fn from_raw(raw: i64) -> Self {
                $name(raw)
            }

            fn raw(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

record_id!(
    /// student identifier
    StudentId
);
record_id!(
    /// billing period identifier
    PeriodId
);
record_id!(
    /// payment identifier
    PaymentId
);
record_id!(
    /// instructor identifier
    InstructorId
);
record_id!(
    /// training class identifier
    ClassId
);
record_id!(
    /// document record identifier
    DocumentId
);
record_id!(
    /// user account identifier
    UserId
);

/// how much of a period's due amount has been covered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentState {
    /// nothing paid against a non-zero amount due
    None,
    /// something paid, less than due
    Partial,
    /// paid exactly what is due
    Complete,
    /// paid more than due
    Overpaid,
}

impl PaymentState {
    /// complete or overpaid
    pub fn is_settled(&self) -> bool {
        matches!(self, PaymentState::Complete | PaymentState::Overpaid)
    }
}

/// delivery status of a student document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentStatus {
    Pending,
    Delivered,
    Expired,
}

/// user account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRole {
    Administrator,
    Receptionist,
}

/// calendar month used for monthly reports and arrears cut-offs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BillingMonth {
    year: i32,
    month: u32,
}

impl BillingMonth {
    /// returns None when month is outside 1..=12
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(&self) -> NaiveDate {
        self.next().first_day().pred_opt().unwrap_or(NaiveDate::MAX)
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for BillingMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for BillingMonth {
    type Err = SchoolError;

    /// parses `YYYY-MM`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SchoolError::validation("month", format!("expected YYYY-MM, got '{}'", s));
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        BillingMonth::new(year, month).ok_or_else(invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_bounds() {
        let feb = BillingMonth::new(2024, 2).unwrap();
        assert_eq!(feb.first_day(), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(feb.last_day(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        let dec = BillingMonth::new(2024, 12).unwrap();
        assert_eq!(dec.next(), BillingMonth::new(2025, 1).unwrap());
        assert_eq!(dec.last_day(), NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
    }

    #[test]
    fn test_month_parsing() {
        let month: BillingMonth = "2024-06".parse().unwrap();
        assert_eq!(month, BillingMonth::new(2024, 6).unwrap());
        assert_eq!(month.to_string(), "2024-06");

        assert!("2024-13".parse::<BillingMonth>().is_err());
        assert!("june".parse::<BillingMonth>().is_err());
        assert!(BillingMonth::new(2024, 0).is_none());
    }

    #[test]
    fn test_month_contains() {
        let march = BillingMonth::of(NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
        assert!(march.contains(NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()));
        assert!(!march.contains(NaiveDate::from_ymd_opt(2023, 3, 31).unwrap()));
    }

    #[test]
    fn test_payment_state_settled() {
        assert!(PaymentState::Complete.is_settled());
        assert!(PaymentState::Overpaid.is_settled());
        assert!(!PaymentState::Partial.is_settled());
        assert!(!PaymentState::None.is_settled());
    }
}
