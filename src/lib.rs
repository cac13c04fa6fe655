pub mod config;
pub mod debtors;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod fees;
pub mod password;
pub mod payments;
pub mod records;
pub mod reports;
pub mod school;
pub mod store;
pub mod types;
pub mod validation;

// re-export key types
pub use config::{BillingPolicy, DatabaseConfig, SchoolConfig, SecurityConfig};
pub use debtors::{ArrearsMap, Debtor, DebtorEnumerator, OwedPeriod, StudentArrears};
pub use decimal::Money;
pub use errors::{Result, SchoolError};
pub use events::{Event, EventStore};
pub use fees::{FeeAssessment, FeeCalculator};
pub use password::PasswordHasher;
pub use payments::{PaymentAccumulator, PaymentReceipt, PaymentRequest};
pub use records::person::PersonalDetails;
pub use records::{
    DocumentRecord, Entity, Instructor, Payment, Period, PeriodBuilder, Student, TrainingClass,
    UserAccount,
};
pub use reports::{MonthlyReport, PaymentReports, StudentMonthTotal};
pub use school::School;
pub use store::{
    MemoryRepository, MemoryStore, PaymentStore, PeriodDirectory, Repository, Storage,
    StudentDirectory, Table,
};
pub use types::{
    BillingMonth, ClassId, DocumentId, DocumentStatus, InstructorId, PaymentId, PaymentState,
    PeriodId, RecordId, StudentId, UserId, UserRole,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
