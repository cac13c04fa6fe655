//! Storage seams.
//!
//! The billing core only ever sees the three directory traits below. Every
//! backend exposes its tables through [`Table`]; the directories are
//! implemented on top of that for any backend.

pub mod memory;

use chrono::NaiveDate;

use crate::errors::{Result, SchoolError};
use crate::records::{
    DocumentRecord, Entity, Instructor, Payment, Period, Student, TrainingClass, UserAccount,
};
use crate::types::{PeriodId, StudentId};

pub use memory::{MemoryRepository, MemoryStore};

/// generic record storage for one entity type
pub trait Repository<T: Entity> {
    /// store a new record, assigning its id
    fn insert(&mut self, record: T) -> Result<T>;

    fn get(&self, id: T::Id) -> Option<T>;

    /// all records in id order
    fn list(&self) -> Vec<T>;

    /// replace an existing record
    fn update(&mut self, record: T) -> Result<()>;

    fn remove(&mut self, id: T::Id) -> Result<T>;

    fn fetch(&self, id: T::Id) -> Result<T> {
        self.get(id).ok_or_else(|| SchoolError::not_found(T::KIND, id))
    }
}

/// access to a backend's table for `T`
pub trait Table<T: Entity> {
    fn table(&self) -> &dyn Repository<T>;

    fn table_mut(&mut self) -> &mut dyn Repository<T>;
}

/// a backend holding every table the school needs
pub trait Storage:
    Table<Student>
    + Table<Period>
    + Table<Payment>
    + Table<Instructor>
    + Table<TrainingClass>
    + Table<DocumentRecord>
    + Table<UserAccount>
{
}

impl<S> Storage for S where
    S: Table<Student>
        + Table<Period>
        + Table<Payment>
        + Table<Instructor>
        + Table<TrainingClass>
        + Table<DocumentRecord>
        + Table<UserAccount>
{
}

/// read-only student lookups
pub trait StudentDirectory {
    fn list_students(&self) -> Vec<Student>;

    fn get_student(&self, id: StudentId) -> Result<Student>;
}

/// read-only period lookups
pub trait PeriodDirectory {
    fn list_periods(&self) -> Vec<Period>;

    fn get_period(&self, id: PeriodId) -> Result<Period>;

    /// periods whose end date is strictly before `date`
    fn list_periods_ending_before(&self, date: NaiveDate) -> Vec<Period>;
}

/// append-only payment storage
pub trait PaymentStore {
    fn list_payments(&self) -> Vec<Payment>;

    fn list_payments_for(&self, student_id: StudentId, period_id: PeriodId) -> Vec<Payment>;

    /// store a payment and return it with its assigned id
    fn append(&mut self, payment: Payment) -> Result<Payment>;
}

impl<S> StudentDirectory for S
where
    S: Table<Student> + ?Sized,
{
    fn list_students(&self) -> Vec<Student> {
        self.table().list()
    }

    fn get_student(&self, id: StudentId) -> Result<Student> {
        self.table().fetch(id)
    }
}

impl<S> PeriodDirectory for S
where
    S: Table<Period> + ?Sized,
{
    fn list_periods(&self) -> Vec<Period> {
        self.table().list()
    }

    fn get_period(&self, id: PeriodId) -> Result<Period> {
        self.table().fetch(id)
    }

    fn list_periods_ending_before(&self, date: NaiveDate) -> Vec<Period> {
        self.table()
            .list()
            .into_iter()
            .filter(|p| p.end_date < date)
            .collect()
    }
}

impl<S> PaymentStore for S
where
    S: Table<Payment> + ?Sized,
{
    fn list_payments(&self) -> Vec<Payment> {
        self.table().list()
    }

    fn list_payments_for(&self, student_id: StudentId, period_id: PeriodId) -> Vec<Payment> {
        self.table()
            .list()
            .into_iter()
            .filter(|p| p.is_for(student_id, period_id))
            .collect()
    }

    fn append(&mut self, payment: Payment) -> Result<Payment> {
        self.table_mut().insert(payment)
    }
}
