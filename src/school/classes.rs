use hourglass_rs::SafeTimeProvider;

use super::School;
use crate::errors::{Result, SchoolError};
use crate::events::Event;
use crate::records::{Instructor, TrainingClass};
use crate::store::Storage;
use crate::types::{ClassId, InstructorId};
use crate::validation;

impl<S: Storage> School<S> {
    pub fn register_class(
        &mut self,
        class: TrainingClass,
        time_provider: &SafeTimeProvider,
    ) -> Result<TrainingClass> {
        let class = self.checked_class(class)?;
        let class = self.repo_mut::<TrainingClass>().insert(class)?;

        tracing::info!(class_id = %class.id, name = %class.name, "registered class");

        self.events.emit(Event::ClassRegistered {
            class_id: class.id,
            name: class.name.clone(),
            instructor_id: class.instructor_id,
            timestamp: time_provider.now(),
        });

        Ok(class)
    }

    pub fn update_class(&mut self, class: TrainingClass) -> Result<()> {
        self.class(class.id)?;
        let class = self.checked_class(class)?;
        self.repo_mut::<TrainingClass>().update(class)
    }

    pub fn deactivate_class(&mut self, id: ClassId) -> Result<()> {
        self.set_class_active(id, false)
    }

    pub fn activate_class(&mut self, id: ClassId) -> Result<()> {
        self.set_class_active(id, true)
    }

    fn set_class_active(&mut self, id: ClassId, active: bool) -> Result<()> {
        let mut class = self.class(id)?;
        if class.active != active {
            class.active = active;
            self.repo_mut::<TrainingClass>().update(class)?;
        }
        Ok(())
    }

    pub fn class(&self, id: ClassId) -> Result<TrainingClass> {
        self.repo::<TrainingClass>().fetch(id)
    }

    pub fn classes(&self) -> Vec<TrainingClass> {
        self.repo::<TrainingClass>().list()
    }

    pub fn classes_for_instructor(&self, instructor_id: InstructorId) -> Vec<TrainingClass> {
        self.classes()
            .into_iter()
            .filter(|c| c.instructor_id == Some(instructor_id))
            .collect()
    }

    fn checked_class(&self, class: TrainingClass) -> Result<TrainingClass> {
        let name = validation::require_text("class name", &class.name)?;
        let schedule = validation::require_text("schedule", &class.schedule)?;

        if class.max_capacity == 0 {
            return Err(SchoolError::validation("max capacity", "must be greater than zero"));
        }

        if let Some(instructor_id) = class.instructor_id {
            self.repo::<Instructor>().fetch(instructor_id)?;
        }

        Ok(TrainingClass {
            name,
            schedule,
            description: class.description.trim().to_string(),
            ..class
        })
    }
}
