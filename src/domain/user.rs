use chrono::{DateTime, Utc};

use super::{Email, UserId, UserPasswordHash, UserRole};

/// A credential record. Rows are never physically removed; `deleted_at`
/// marks the record as gone and every store query filters it.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub hash: UserPasswordHash,
    pub role: UserRole,
    pub is_active: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(email: Email, hash: UserPasswordHash) -> Self {
        Self {
            id: UserId::default(),
            email,
            hash,
            role: UserRole::User,
            is_active: true,
            deleted_at: None,
        }
    }
}
