use serde::{Deserialize, Serialize};

use crate::records::Entity;
use crate::types::{ClassId, InstructorId};

/// a recurring training class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingClass {
    pub id: ClassId,
    pub name: String,
    pub description: String,
    /// free text, e.g. "Mon/Wed 18:00-19:30"
    pub schedule: String,
    pub instructor_id: Option<InstructorId>,
    pub max_capacity: u32,
    pub active: bool,
}

impl TrainingClass {
    /// unsaved, active class (id 0)
    pub fn new(name: impl Into<String>, schedule: impl Into<String>, max_capacity: u32) -> Self {
        Self {
            id: ClassId::default(),
            name: name.into(),
            description: String::new(),
            schedule: schedule.into(),
            instructor_id: None,
            max_capacity,
            active: true,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn taught_by(mut self, instructor_id: InstructorId) -> Self {
        self.instructor_id = Some(instructor_id);
        self
    }
}

impl Entity for TrainingClass {
    type Id = ClassId;
    const KIND: &'static str = "class";

    fn id(&self) -> ClassId {
        self.id
    }

    fn assign_id(&mut self, id: ClassId) {
        self.id = id;
    }
}
