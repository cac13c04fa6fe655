use std::collections::BTreeMap;

use crate::errors::{Result, SchoolError};
use crate::records::{
    DocumentRecord, Entity, Instructor, Payment, Period, Student, TrainingClass, UserAccount,
};
use crate::store::{Repository, Table};
use crate::types::RecordId;

/// in-memory table with auto-increment ids starting at 1
#[derive(Debug, Clone)]
pub struct MemoryRepository<T> {
    rows: BTreeMap<i64, T>,
    next_id: i64,
}

impl<T> MemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<T> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> Repository<T> for MemoryRepository<T> {
    fn insert(&mut self, mut record: T) -> Result<T> {
        let raw = self.next_id;
        self.next_id += 1;
        record.assign_id(T::Id::from_raw(raw));
        self.rows.insert(raw, record.clone());
        Ok(record)
    }

    fn get(&self, id: T::Id) -> Option<T> {
        self.rows.get(&id.raw()).cloned()
    }

    fn list(&self) -> Vec<T> {
        self.rows.values().cloned().collect()
    }

    fn update(&mut self, record: T) -> Result<()> {
        match self.rows.get_mut(&record.id().raw()) {
            Some(row) => {
                *row = record;
                Ok(())
            }
            None => Err(SchoolError::not_found(T::KIND, record.id())),
        }
    }

    fn remove(&mut self, id: T::Id) -> Result<T> {
        self.rows
            .remove(&id.raw())
            .ok_or_else(|| SchoolError::not_found(T::KIND, id))
    }
}

/// every school table held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    students: MemoryRepository<Student>,
    periods: MemoryRepository<Period>,
    payments: MemoryRepository<Payment>,
    instructors: MemoryRepository<Instructor>,
    classes: MemoryRepository<TrainingClass>,
    documents: MemoryRepository<DocumentRecord>,
    users: MemoryRepository<UserAccount>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Table<Student> for MemoryStore {
    fn table(&self) -> &dyn Repository<Student> {
        &self.students
    }

    fn table_mut(&mut self) -> &mut dyn Repository<Student> {
        &mut self.students
    }
}

impl Table<Period> for MemoryStore {
    fn table(&self) -> &dyn Repository<Period> {
        &self.periods
    }

    fn table_mut(&mut self) -> &mut dyn Repository<Period> {
        &mut self.periods
    }
}

impl Table<Payment> for MemoryStore {
    fn table(&self) -> &dyn Repository<Payment> {
        &self.payments
    }

    fn table_mut(&mut self) -> &mut dyn Repository<Payment> {
        &mut self.payments
    }
}

impl Table<Instructor> for MemoryStore {
    fn table(&self) -> &dyn Repository<Instructor> {
        &self.instructors
    }

    fn table_mut(&mut self) -> &mut dyn Repository<Instructor> {
        &mut self.instructors
    }
}

impl Table<TrainingClass> for MemoryStore {
    fn table(&self) -> &dyn Repository<TrainingClass> {
        &self.classes
    }

    fn table_mut(&mut self) -> &mut dyn Repository<TrainingClass> {
        &mut self.classes
    }
}

impl Table<DocumentRecord> for MemoryStore {
    fn table(&self) -> &dyn Repository<DocumentRecord> {
        &self.documents
    }

    fn table_mut(&mut self) -> &mut dyn Repository<DocumentRecord> {
        &mut self.documents
    }
}

impl Table<UserAccount> for MemoryStore {
    fn table(&self) -> &dyn Repository<UserAccount> {
        &self.users
    }

    fn table_mut(&mut self) -> &mut dyn Repository<UserAccount> {
        &mut self.users
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Money;
    use crate::store::{PaymentStore, PeriodDirectory, StudentDirectory};
    use crate::types::{PaymentId, PeriodId, StudentId};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn period(name: &str, month: u32) -> Period {
        Period::builder()
            .name(name)
            .start_date(date(2024, month, 1))
            .end_date(date(2024, month, 28))
            .due_date(date(2024, month, 10))
            .base_amount(Money::from_major(100))
            .build()
            .unwrap()
    }

    #[test]
    fn test_ids_are_assigned_in_order() {
        let mut repo = MemoryRepository::new();
        let jan = repo.insert(period("January", 1)).unwrap();
        let feb = repo.insert(period("February", 2)).unwrap();

        assert_eq!(jan.id, PeriodId(1));
        assert_eq!(feb.id, PeriodId(2));
        assert_eq!(repo.len(), 2);
        assert_eq!(repo.list()[1].name, "February");
    }

    #[test]
    fn test_ids_not_reused_after_remove() {
        let mut repo = MemoryRepository::new();
        let jan = repo.insert(period("January", 1)).unwrap();
        repo.remove(jan.id).unwrap();
        let feb = repo.insert(period("February", 2)).unwrap();

        assert_eq!(feb.id, PeriodId(2));
        assert!(repo.get(jan.id).is_none());
    }

    #[test]
    fn test_update_and_remove_missing() {
        let mut repo: MemoryRepository<Period> = MemoryRepository::new();
        let mut ghost = period("Ghost", 1);
        ghost.id = PeriodId(42);

        assert!(matches!(repo.update(ghost), Err(SchoolError::NotFound { entity: "period", .. })));
        assert!(repo.remove(PeriodId(42)).is_err());
        assert!(repo.fetch(PeriodId(42)).is_err());
    }

    #[test]
    fn test_directories_over_memory_store() {
        let mut store = MemoryStore::new();
        Table::<Period>::table_mut(&mut store).insert(period("January", 1)).unwrap();
        Table::<Period>::table_mut(&mut store).insert(period("March", 3)).unwrap();

        assert_eq!(store.list_periods().len(), 2);
        let before_feb = store.list_periods_ending_before(date(2024, 2, 1));
        assert_eq!(before_feb.len(), 1);
        assert_eq!(before_feb[0].name, "January");

        assert!(store.list_students().is_empty());
        assert!(matches!(
            store.get_student(StudentId(1)),
            Err(SchoolError::NotFound { entity: "student", .. })
        ));
    }

    #[test]
    fn test_payment_store_append_and_filter() {
        let mut store = MemoryStore::new();
        let paid = store
            .append(Payment::new(
                StudentId(1),
                PeriodId(1),
                date(2024, 1, 5),
                Money::from_major(60),
                "cash",
            ))
            .unwrap();
        store
            .append(Payment::new(
                StudentId(2),
                PeriodId(1),
                date(2024, 1, 6),
                Money::from_major(100),
                "transfer",
            ))
            .unwrap();

        assert_eq!(paid.id, PaymentId(1));
        assert_eq!(store.list_payments().len(), 2);
        assert_eq!(store.list_payments_for(StudentId(1), PeriodId(1)), vec![paid]);
    }
}
