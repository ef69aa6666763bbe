use color_eyre::eyre::{Context, Result};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(Uuid);

impl UserId {
    pub fn parse(id: &str) -> Result<Self> {
        let parsed = uuid::Uuid::try_parse(id).wrap_err("Invalid user ID")?;
        Ok(Self(parsed))
    }

    pub fn new(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl AsRef<Uuid> for UserId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

#[test]
fn test_valid_ids() {
    let valid_id = "8f9e4c7e-41f2-4f11-9f63-0d5cf2a9e6da";
    let parsed = UserId::parse(valid_id).expect(valid_id);
    assert_eq!(
        parsed.as_ref().to_string(),
        valid_id,
        "ID does not match expected value"
    );
}

#[test]
fn test_invalid_ids() {
    let invalid_id = "8f9e4c7ea41f2-4f11-9f63-0d5cf2a9e6da";
    let result = UserId::parse(invalid_id);
    let error = result.expect_err(invalid_id);
    assert_eq!(error.to_string(), "Invalid user ID");
}
