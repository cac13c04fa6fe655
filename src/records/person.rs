use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::records::Entity;
use crate::types::{InstructorId, StudentId};

/// identity and contact fields shared by students and instructors
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PersonalDetails {
    pub full_name: String,
    /// national identity document number, stored without separators
    pub dni: String,
    pub birth_date: Option<NaiveDate>,
    pub address: String,
    pub phone: String,
    pub email: Option<String>,
}

impl PersonalDetails {
    pub fn new(full_name: impl Into<String>, dni: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            dni: dni.into(),
            ..Self::default()
        }
    }

    pub fn with_birth_date(mut self, date: NaiveDate) -> Self {
        self.birth_date = Some(date);
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }
}

/// an enrolled student
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub details: PersonalDetails,
    pub enrollment_date: NaiveDate,
    pub active: bool,
}

impl Student {
    /// unsaved, active student (id 0)
    pub fn new(details: PersonalDetails, enrollment_date: NaiveDate) -> Self {
        Self {
            id: StudentId::default(),
            details,
            enrollment_date,
            active: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.details.full_name
    }
}

impl Entity for Student {
    type Id = StudentId;
    const KIND: &'static str = "student";

    fn id(&self) -> StudentId {
        self.id
    }

    fn assign_id(&mut self, id: StudentId) {
        self.id = id;
    }
}

/// a teaching member of staff
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instructor {
    pub id: InstructorId,
    pub details: PersonalDetails,
    pub hire_date: NaiveDate,
    pub active: bool,
}

impl Instructor {
    /// unsaved, active instructor (id 0)
    pub fn new(details: PersonalDetails, hire_date: NaiveDate) -> Self {
        Self {
            id: InstructorId::default(),
            details,
            hire_date,
            active: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.details.full_name
    }
}

impl Entity for Instructor {
    type Id = InstructorId;
    const KIND: &'static str = "instructor";

    fn id(&self) -> InstructorId {
        self.id
    }

    fn assign_id(&mut self, id: InstructorId) {
        self.id = id;
    }
}
