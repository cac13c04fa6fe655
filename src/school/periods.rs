use hourglass_rs::SafeTimeProvider;

use super::{today, School};
use crate::errors::{Result, SchoolError};
use crate::events::Event;
use crate::records::{Period, PeriodBuilder};
use crate::store::{PaymentStore, PeriodDirectory, Storage};
use crate::types::PeriodId;

impl<S: Storage> School<S> {
    /// validate and store a new billing period
    pub fn register_period(
        &mut self,
        builder: PeriodBuilder,
        time_provider: &SafeTimeProvider,
    ) -> Result<Period> {
        let period = self.repo_mut::<Period>().insert(builder.build()?)?;

        tracing::info!(
            period_id = %period.id,
            name = %period.name,
            due_date = %period.due_date,
            "registered period"
        );

        self.events.emit(Event::PeriodRegistered {
            period_id: period.id,
            name: period.name.clone(),
            base_amount: period.base_amount,
            surcharge_amount: period.surcharge_amount,
            due_date: period.due_date,
            timestamp: time_provider.now(),
        });

        Ok(period)
    }

    pub fn update_period(&mut self, period: Period, time_provider: &SafeTimeProvider) -> Result<()> {
        period.validate()?;
        let period_id = period.id;
        self.repo_mut::<Period>().update(period)?;

        self.events.emit(Event::PeriodUpdated {
            period_id,
            timestamp: time_provider.now(),
        });

        Ok(())
    }

    /// delete a period nobody has paid for yet
    pub fn delete_period(&mut self, id: PeriodId, time_provider: &SafeTimeProvider) -> Result<Period> {
        self.store.get_period(id)?;

        let referenced = self
            .store
            .list_payments()
            .iter()
            .filter(|p| p.period_id == id)
            .count();
        if referenced > 0 {
            tracing::warn!(period_id = %id, payments = referenced, "refusing to delete period with payments");
            return Err(SchoolError::RecordInUse {
                entity: "period",
                id: id.to_string(),
                message: format!("{} payments recorded against it", referenced),
            });
        }

        let removed = self.repo_mut::<Period>().remove(id)?;

        self.events.emit(Event::PeriodDeleted {
            period_id: id,
            timestamp: time_provider.now(),
        });

        Ok(removed)
    }

    pub fn period(&self, id: PeriodId) -> Result<Period> {
        self.store.get_period(id)
    }

    pub fn periods(&self) -> Vec<Period> {
        self.store.list_periods()
    }

    /// the period containing today, else the one that ends last
    pub fn current_or_latest_period(&self, time_provider: &SafeTimeProvider) -> Option<Period> {
        let today = today(time_provider);
        let periods = self.periods();

        if let Some(current) = periods.iter().find(|p| p.contains(today)) {
            return Some(current.clone());
        }
        periods.into_iter().max_by_key(|p| p.end_date)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::decimal::Money;
    use crate::errors::SchoolError;
    use crate::events::Event;
    use crate::records::Period;
    use crate::types::{PeriodId, StudentId};

    fn builder(month: u32) -> crate::records::PeriodBuilder {
        Period::builder()
            .name(format!("2024-{:02}", month))
            .start_date(date(2024, month, 1))
            .end_date(date(2024, month, 28))
            .due_date(date(2024, month, 10))
            .base_amount(Money::from_major(100))
            .surcharge_amount(Money::from_major(20))
    }

    #[test]
    fn test_register_and_fetch() {
        let mut school = school();
        let time = clock(2024, 1, 2);

        let period = school.register_period(builder(1), &time).unwrap();
        assert_eq!(period.id, PeriodId(1));
        assert_eq!(school.period(period.id).unwrap(), period);

        let events = school.take_events();
        assert!(matches!(events[0], Event::PeriodRegistered { .. }));
    }

    #[test]
    fn test_register_rejects_bad_dates() {
        let mut school = school();
        let time = clock(2024, 1, 2);

        let result = school.register_period(builder(1).due_date(date(2024, 2, 15)), &time);
        assert!(result.is_err());
        assert!(school.periods().is_empty());
    }

    #[test]
    fn test_update_period() {
        let mut school = school();
        let time = clock(2024, 1, 2);
        let mut period = school.register_period(builder(1), &time).unwrap();

        period.surcharge_amount = Money::from_major(30);
        school.update_period(period.clone(), &time).unwrap();
        assert_eq!(school.period(period.id).unwrap().surcharge_amount, Money::from_major(30));

        period.base_amount = Money::ZERO;
        assert!(school.update_period(period, &time).is_err());
    }

    #[test]
    fn test_delete_refused_when_paid() {
        let mut school = school();
        let time = clock(2024, 1, 5);
        let student = school
            .register_student(
                crate::records::person::PersonalDetails::new("Ana Paz", "30123456"),
                date(2024, 1, 2),
                &time,
            )
            .unwrap();
        let paid = school.register_period(builder(1), &time).unwrap();
        let unpaid = school.register_period(builder(2), &time).unwrap();
        school
            .record_payment(student.id, paid.id, Money::from_major(100), "cash", &time)
            .unwrap();

        assert!(matches!(
            school.delete_period(paid.id, &time),
            Err(SchoolError::RecordInUse { entity: "period", .. })
        ));
        assert_eq!(school.delete_period(unpaid.id, &time).unwrap().id, unpaid.id);
        assert!(school.period(unpaid.id).is_err());
        assert!(matches!(
            school.delete_period(PeriodId(99), &time),
            Err(SchoolError::NotFound { .. })
        ));
        assert_eq!(school.payments_for_student(StudentId(1)).len(), 1);
    }

    #[test]
    fn test_current_or_latest() {
        let mut school = school();
        let setup = clock(2024, 1, 1);
        assert!(school.current_or_latest_period(&setup).is_none());

        school.register_period(builder(1), &setup).unwrap();
        school.register_period(builder(3), &setup).unwrap();
        school.register_period(builder(2), &setup).unwrap();

        let current = school.current_or_latest_period(&clock(2024, 2, 14)).unwrap();
        assert_eq!(current.name, "2024-02");

        // between periods and after all of them: latest by end date
        let latest = school.current_or_latest_period(&clock(2024, 6, 1)).unwrap();
        assert_eq!(latest.name, "2024-03");
    }
}
