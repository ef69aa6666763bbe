use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    User,
    Admin,
}

impl UserRole {
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s {
            "User" => Ok(Self::User),
            "Admin" => Ok(Self::Admin),
            other => Err(ValidationError::new(format!(
                "Unknown role: {other}"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Admin => "Admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
