use hourglass_rs::SafeTimeProvider;

use super::{today, School};
use crate::errors::Result;
use crate::events::Event;
use crate::records::DocumentRecord;
use crate::store::{Storage, StudentDirectory};
use crate::types::{DocumentId, DocumentStatus, StudentId};
use crate::validation;

impl<S: Storage> School<S> {
    pub fn register_document(
        &mut self,
        document: DocumentRecord,
        time_provider: &SafeTimeProvider,
    ) -> Result<DocumentRecord> {
        let document = self.checked_document(document, time_provider)?;
        let document = self.repo_mut::<DocumentRecord>().insert(document)?;

        tracing::info!(
            document_id = %document.id,
            student_id = %document.student_id,
            document_type = %document.document_type,
            "registered document"
        );

        self.events.emit(Event::DocumentStatusChanged {
            document_id: document.id,
            student_id: document.student_id,
            old_status: None,
            new_status: document.status,
            timestamp: time_provider.now(),
        });

        Ok(document)
    }

    pub fn update_document(
        &mut self,
        document: DocumentRecord,
        time_provider: &SafeTimeProvider,
    ) -> Result<()> {
        let previous = self.document(document.id)?;
        let document = self.checked_document(document, time_provider)?;
        let (document_id, student_id, new_status) = (document.id, document.student_id, document.status);
        self.repo_mut::<DocumentRecord>().update(document)?;

        if previous.status != new_status {
            self.events.emit(Event::DocumentStatusChanged {
                document_id,
                student_id,
                old_status: Some(previous.status),
                new_status,
                timestamp: time_provider.now(),
            });
        }

        Ok(())
    }

    pub fn remove_document(&mut self, id: DocumentId) -> Result<DocumentRecord> {
        self.repo_mut::<DocumentRecord>().remove(id)
    }

    pub fn document(&self, id: DocumentId) -> Result<DocumentRecord> {
        self.repo::<DocumentRecord>().fetch(id)
    }

    pub fn documents_for_student(&self, student_id: StudentId) -> Vec<DocumentRecord> {
        self.repo::<DocumentRecord>()
            .list()
            .into_iter()
            .filter(|d| d.student_id == student_id)
            .collect()
    }

    pub fn pending_documents_for_student(&self, student_id: StudentId) -> Vec<DocumentRecord> {
        self.documents_for_student(student_id)
            .into_iter()
            .filter(DocumentRecord::is_pending)
            .collect()
    }

    fn checked_document(
        &self,
        document: DocumentRecord,
        time_provider: &SafeTimeProvider,
    ) -> Result<DocumentRecord> {
        self.store.get_student(document.student_id)?;
        let document_type = validation::require_text("document type", &document.document_type)?;

        if let Some(delivered_on) = document.delivered_on {
            validation::ensure_not_future("delivery date", delivered_on, today(time_provider))?;
        }

        // delivered documents always carry a date
        let delivered_on = match (document.status, document.delivered_on) {
            (DocumentStatus::Delivered, None) => Some(today(time_provider)),
            (_, delivered_on) => delivered_on,
        };

        Ok(DocumentRecord {
            document_type,
            delivered_on,
            ..document
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::errors::SchoolError;
    use crate::records::person::PersonalDetails;

    #[test]
    fn test_document_lifecycle() {
        let mut school = school();
        let time = clock(2024, 3, 1);
        let ana = school
            .register_student(PersonalDetails::new("Ana", "30123456"), date(2024, 2, 1), &time)
            .unwrap();
        school.take_events();

        let medical = school
            .register_document(DocumentRecord::pending(ana.id, "medical form"), &time)
            .unwrap();
        school
            .register_document(DocumentRecord::pending(ana.id, "DNI copy").with_notes("front and back"), &time)
            .unwrap();
        assert_eq!(school.pending_documents_for_student(ana.id).len(), 2);

        let mut delivered = medical.clone();
        delivered.mark_delivered(date(2024, 2, 28));
        school.update_document(delivered, &time).unwrap();

        let pending = school.pending_documents_for_student(ana.id);
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].document_type, "DNI copy");
        assert_eq!(school.documents_for_student(ana.id).len(), 2);

        let events = school.take_events();
        assert_eq!(events.len(), 3);
        assert!(matches!(
            events[2],
            Event::DocumentStatusChanged {
                old_status: Some(DocumentStatus::Pending),
                new_status: DocumentStatus::Delivered,
                ..
            }
        ));

        school.remove_document(medical.id).unwrap();
        assert!(school.document(medical.id).is_err());
    }

    #[test]
    fn test_document_validation() {
        let mut school = school();
        let time = clock(2024, 3, 1);

        assert!(matches!(
            school.register_document(DocumentRecord::pending(StudentId(4), "medical form"), &time),
            Err(SchoolError::NotFound { entity: "student", .. })
        ));

        let ana = school
            .register_student(PersonalDetails::new("Ana", "30123456"), date(2024, 2, 1), &time)
            .unwrap();
        assert!(school
            .register_document(DocumentRecord::pending(ana.id, "  "), &time)
            .is_err());

        let mut early = DocumentRecord::pending(ana.id, "medical form");
        early.mark_delivered(date(2024, 3, 5));
        assert!(matches!(
            school.register_document(early, &time),
            Err(SchoolError::FutureDate { .. })
        ));
    }

    #[test]
    fn test_delivered_without_date_gets_today() {
        let mut school = school();
        let time = clock(2024, 3, 1);
        let ana = school
            .register_student(PersonalDetails::new("Ana", "30123456"), date(2024, 2, 1), &time)
            .unwrap();

        let mut doc = DocumentRecord::pending(ana.id, "medical form");
        doc.status = DocumentStatus::Delivered;
        let stored = school.register_document(doc, &time).unwrap();

        assert_eq!(stored.delivered_on, Some(date(2024, 3, 1)));
    }
}
