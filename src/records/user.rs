use serde::{Deserialize, Serialize};
use std::fmt;

use crate::records::Entity;
use crate::types::{UserId, UserRole};

/// back-office login account
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: UserId,
    pub username: String,
    /// bcrypt hash, never the plaintext
    pub password_hash: String,
    pub role: UserRole,
    pub active: bool,
}

impl Entity for UserAccount {
    type Id = UserId;
    const KIND: &'static str = "user";

    fn id(&self) -> UserId {
        self.id
    }

    fn assign_id(&mut self, id: UserId) {
        self.id = id;
    }
}

// keep the hash out of logs
impl fmt::Debug for UserAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserAccount")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("role", &self.role)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}
