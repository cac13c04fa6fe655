use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::records::Entity;
use crate::types::{DocumentId, DocumentStatus, StudentId};

/// delivery status of one document a student must hand in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: DocumentId,
    pub student_id: StudentId,
    /// e.g. "medical form", "DNI copy"
    pub document_type: String,
    pub status: DocumentStatus,
    pub delivered_on: Option<NaiveDate>,
    pub notes: String,
}

impl DocumentRecord {
    /// unsaved pending document (id 0)
    pub fn pending(student_id: StudentId, document_type: impl Into<String>) -> Self {
        Self {
            id: DocumentId::default(),
            student_id,
            document_type: document_type.into(),
            status: DocumentStatus::Pending,
            delivered_on: None,
            notes: String::new(),
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn mark_delivered(&mut self, date: NaiveDate) {
        self.status = DocumentStatus::Delivered;
        self.delivered_on = Some(date);
    }

    pub fn is_pending(&self) -> bool {
        self.status == DocumentStatus::Pending
    }
}

impl Entity for DocumentRecord {
    type Id = DocumentId;
    const KIND: &'static str = "document";

    fn id(&self) -> DocumentId {
        self.id
    }

    fn assign_id(&mut self, id: DocumentId) {
        self.id = id;
    }
}
