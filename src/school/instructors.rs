use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;

use super::students::checked_details;
use super::{today, School};
use crate::errors::{Result, SchoolError};
use crate::events::Event;
use crate::records::person::PersonalDetails;
use crate::records::Instructor;
use crate::store::Storage;
use crate::types::InstructorId;
use crate::validation;

impl<S: Storage> School<S> {
    pub fn register_instructor(
        &mut self,
        details: PersonalDetails,
        hire_date: NaiveDate,
        time_provider: &SafeTimeProvider,
    ) -> Result<Instructor> {
        let today = today(time_provider);
        let details = checked_details(details, today)?;
        validation::ensure_not_future("hire date", hire_date, today)?;
        self.ensure_unique_instructor_dni(&details.dni, None)?;

        let instructor = self
            .repo_mut::<Instructor>()
            .insert(Instructor::new(details, hire_date))?;

        tracing::info!(instructor_id = %instructor.id, name = %instructor.name(), "registered instructor");

        self.events.emit(Event::InstructorRegistered {
            instructor_id: instructor.id,
            name: instructor.name().to_string(),
            timestamp: time_provider.now(),
        });

        Ok(instructor)
    }

    pub fn update_instructor(
        &mut self,
        instructor: Instructor,
        time_provider: &SafeTimeProvider,
    ) -> Result<()> {
        let today = today(time_provider);
        self.instructor(instructor.id)?;

        let details = checked_details(instructor.details, today)?;
        validation::ensure_not_future("hire date", instructor.hire_date, today)?;
        self.ensure_unique_instructor_dni(&details.dni, Some(instructor.id))?;

        self.repo_mut::<Instructor>().update(Instructor {
            details,
            ..instructor
        })
    }

    pub fn deactivate_instructor(&mut self, id: InstructorId) -> Result<()> {
        self.set_instructor_active(id, false)
    }

    pub fn activate_instructor(&mut self, id: InstructorId) -> Result<()> {
        self.set_instructor_active(id, true)
    }

    fn set_instructor_active(&mut self, id: InstructorId, active: bool) -> Result<()> {
        let mut instructor = self.instructor(id)?;
        if instructor.active != active {
            instructor.active = active;
            self.repo_mut::<Instructor>().update(instructor)?;
            tracing::info!(instructor_id = %id, active, "instructor status changed");
        }
        Ok(())
    }

    pub fn instructor(&self, id: InstructorId) -> Result<Instructor> {
        self.repo::<Instructor>().fetch(id)
    }

    pub fn instructors(&self) -> Vec<Instructor> {
        self.repo::<Instructor>().list()
    }

    pub fn active_instructors(&self) -> Vec<Instructor> {
        self.instructors().into_iter().filter(|i| i.active).collect()
    }

    /// case-insensitive match on any part of the name
    pub fn search_instructors(&self, name_fragment: &str) -> Vec<Instructor> {
        let needle = name_fragment.trim().to_lowercase();
        self.instructors()
            .into_iter()
            .filter(|i| i.name().to_lowercase().contains(&needle))
            .collect()
    }

    fn ensure_unique_instructor_dni(&self, dni: &str, except: Option<InstructorId>) -> Result<()> {
        let taken = self
            .instructors()
            .iter()
            .any(|i| i.details.dni == dni && Some(i.id) != except);
        if taken {
            return Err(SchoolError::Duplicate {
                entity: "instructor",
                key: dni.to_string(),
            });
        }
        Ok(())
    }
}
