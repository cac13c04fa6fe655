use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;

use super::{today, School};
use crate::errors::{Result, SchoolError};
use crate::events::Event;
use crate::records::person::PersonalDetails;
use crate::records::Student;
use crate::store::{Storage, StudentDirectory};
use crate::types::StudentId;
use crate::validation;

/// trimmed and normalized personal details, or the first problem found
pub(super) fn checked_details(details: PersonalDetails, today: NaiveDate) -> Result<PersonalDetails> {
    let full_name = validation::require_text("full name", &details.full_name)?;
    let dni = validation::validate_dni(&details.dni)?;

    let email = match details.email.as_deref().map(str::trim) {
        Some("") | None => None,
        Some(email) => {
            validation::validate_email(email)?;
            Some(email.to_string())
        }
    };

    if let Some(birth_date) = details.birth_date {
        validation::ensure_not_future("birth date", birth_date, today)?;
    }

    Ok(PersonalDetails {
        full_name,
        dni,
        birth_date: details.birth_date,
        address: details.address.trim().to_string(),
        phone: details.phone.trim().to_string(),
        email,
    })
}

impl<S: Storage> School<S> {
    pub fn register_student(
        &mut self,
        details: PersonalDetails,
        enrollment_date: NaiveDate,
        time_provider: &SafeTimeProvider,
    ) -> Result<Student> {
        let today = today(time_provider);
        let details = checked_details(details, today)?;
        validation::ensure_not_future("enrollment date", enrollment_date, today)?;
        self.ensure_unique_student_dni(&details.dni, None)?;

        let student = self
            .repo_mut::<Student>()
            .insert(Student::new(details, enrollment_date))?;

        tracing::info!(student_id = %student.id, name = %student.name(), "registered student");

        self.events.emit(Event::StudentRegistered {
            student_id: student.id,
            name: student.name().to_string(),
            timestamp: time_provider.now(),
        });

        Ok(student)
    }

    pub fn update_student(&mut self, student: Student, time_provider: &SafeTimeProvider) -> Result<()> {
        let today = today(time_provider);
        let existing = self.store.get_student(student.id)?;

        let details = checked_details(student.details, today)?;
        validation::ensure_not_future("enrollment date", student.enrollment_date, today)?;
        self.ensure_unique_student_dni(&details.dni, Some(student.id))?;

        let updated = Student {
            details,
            ..student
        };
        let status_changed = updated.active != existing.active;
        let active = updated.active;
        self.repo_mut::<Student>().update(updated)?;

        if status_changed {
            self.events.emit(Event::StudentStatusChanged {
                student_id: student.id,
                active,
                timestamp: time_provider.now(),
            });
        }

        Ok(())
    }

    pub fn deactivate_student(&mut self, id: StudentId, time_provider: &SafeTimeProvider) -> Result<()> {
        self.set_student_active(id, false, time_provider)
    }

    pub fn activate_student(&mut self, id: StudentId, time_provider: &SafeTimeProvider) -> Result<()> {
        self.set_student_active(id, true, time_provider)
    }

    fn set_student_active(
        &mut self,
        id: StudentId,
        active: bool,
        time_provider: &SafeTimeProvider,
    ) -> Result<()> {
        let mut student = self.store.get_student(id)?;
        if student.active == active {
            return Ok(());
        }

        student.active = active;
        self.repo_mut::<Student>().update(student)?;

        tracing::info!(student_id = %id, active, "student status changed");
        self.events.emit(Event::StudentStatusChanged {
            student_id: id,
            active,
            timestamp: time_provider.now(),
        });

        Ok(())
    }

    pub fn student(&self, id: StudentId) -> Result<Student> {
        self.store.get_student(id)
    }

    pub fn students(&self) -> Vec<Student> {
        self.store.list_students()
    }

    pub fn active_students(&self) -> Vec<Student> {
        self.repo::<Student>()
            .list()
            .into_iter()
            .filter(|s| s.active)
            .collect()
    }

    /// lookup ignoring thousands separators
    pub fn find_student_by_dni(&self, dni: &str) -> Option<Student> {
        let wanted = validation::normalize_dni(dni.trim());
        self.students().into_iter().find(|s| s.details.dni == wanted)
    }

    fn ensure_unique_student_dni(&self, dni: &str, except: Option<StudentId>) -> Result<()> {
        let taken = self
            .students()
            .iter()
            .any(|s| s.details.dni == dni && Some(s.id) != except);
        if taken {
            return Err(SchoolError::Duplicate {
                entity: "student",
                key: dni.to_string(),
            });
        }
        Ok(())
    }
}
