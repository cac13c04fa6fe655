pub mod class;
pub mod document;
pub mod payment;
pub mod period;
pub mod person;
pub mod user;

use crate::types::RecordId;

pub use class::TrainingClass;
pub use document::DocumentRecord;
pub use payment::Payment;
pub use period::{Period, PeriodBuilder};
pub use person::{Instructor, Student};
pub use user::UserAccount;

/// a stored record with a store-assigned id
pub trait Entity: Clone {
    type Id: RecordId;

    /// entity name used in errors and logs
    const KIND: &'static str;

    fn id(&self) -> Self::Id;

    fn assign_id(&mut self, id: Self::Id);
}
