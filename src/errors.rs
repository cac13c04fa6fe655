use chrono::NaiveDate;
use thiserror::Error;

use crate::decimal::Money;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchoolError {
    #[error("invalid payment amount: {amount}")]
    InvalidAmount {
        amount: Money,
    },

    #[error("{entity} not found: {id}")]
    NotFound {
        entity: &'static str,
        id: String,
    },

    #[error("inconsistent input: {message}")]
    InconsistentInput {
        message: String,
    },

    #[error("invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("{field} cannot be in the future: {date}")]
    FutureDate {
        field: &'static str,
        date: NaiveDate,
    },

    #[error("invalid period: {message}")]
    InvalidPeriod {
        message: String,
    },

    #[error("duplicate {entity}: {key}")]
    Duplicate {
        entity: &'static str,
        key: String,
    },

    #[error("{entity} {id} is still referenced: {message}")]
    RecordInUse {
        entity: &'static str,
        id: String,
        message: String,
    },

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("account is inactive: {username}")]
    InactiveAccount {
        username: String,
    },

    #[error("password hashing failed: {message}")]
    PasswordHash {
        message: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },
}

impl SchoolError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        SchoolError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        SchoolError::Validation {
            field,
            message: message.into(),
        }
    }
}

impl From<bcrypt::BcryptError> for SchoolError {
    fn from(err: bcrypt::BcryptError) -> Self {
        SchoolError::PasswordHash {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SchoolError>;
