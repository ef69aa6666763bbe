use serde::{Deserialize, Serialize};

use crate::domain::{User, UserRole};
use secrecy::ExposeSecret;

pub mod auth;
pub mod catalog;
pub mod my_list;
pub mod profiles;
pub mod two_factor;
pub mod watch_history;

/// The public view of a credential record, embedded in auth responses.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub role: UserRole,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.as_ref().to_string(),
            email: user.email.as_ref().expose_secret().to_owned(),
            role: user.role,
        }
    }
}
