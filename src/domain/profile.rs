use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{UserId, ValidationError};

pub const MAX_PROFILES_PER_USER: usize = 5;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub struct ProfileId(Uuid);

impl ProfileId {
    pub fn new(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for ProfileId {
    fn default() -> Self {
        Self(Uuid::new_v4())
    }
}

impl AsRef<Uuid> for ProfileId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileName(String);

impl ProfileName {
    pub fn parse(name: String) -> Result<Self, ValidationError> {
        match name.chars().count() {
            x if x < 1 => Err(ValidationError::new(
                "Profile name cannot be empty".to_string(),
            )),
            x if x > 50 => Err(ValidationError::new(
                "Max profile name length is 50 characters".to_string(),
            )),
            _ => Ok(Self(name)),
        }
    }
}

impl AsRef<String> for ProfileName {
    fn as_ref(&self) -> &String {
        &self.0
    }
}

/// A viewing profile under a user account. Kids profiles are pinned to the
/// "Kids" maturity level regardless of what the caller asks for.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub id: ProfileId,
    pub user_id: UserId,
    pub name: ProfileName,
    pub avatar_url: String,
    pub is_kids: bool,
    pub maturity_level: String,
    pub deleted_at: Option<DateTime<Utc>>,
}

pub const DEFAULT_AVATAR_URL: &str = "/images/defaultavatar.jpg";

impl Profile {
    pub fn new(
        user_id: UserId,
        name: ProfileName,
        avatar_url: Option<String>,
        is_kids: bool,
        maturity_level: String,
    ) -> Self {
        let maturity_level = if is_kids {
            "Kids".to_string()
        } else {
            maturity_level
        };
        Self {
            id: ProfileId::default(),
            user_id,
            name,
            avatar_url: avatar_url
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| DEFAULT_AVATAR_URL.to_string()),
            is_kids,
            maturity_level,
            deleted_at: None,
        }
    }
}
