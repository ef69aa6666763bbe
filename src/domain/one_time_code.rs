use chrono::{DateTime, Duration, Utc};
use color_eyre::eyre::{eyre, Result};
use rand::Rng;
use secrecy::{ExposeSecret, Secret};

/// How long an issued one-time code is accepted, for both the two-factor
/// and the password-reset flows.
pub const VERIFICATION_WINDOW_MINUTES: i64 = 10;

/// A 6-digit numeric one-time code.
#[derive(Clone, Debug)]
pub struct OneTimeCode(Secret<String>);

impl OneTimeCode {
    pub fn parse(code: Secret<String>) -> Result<Self> {
        let regex = regex::Regex::new(r"^\d{6}$")
            .expect("Regex for OneTimeCode parser is invalid");
        let trimmed = code.expose_secret().trim();
        if regex.is_match(trimmed) {
            Ok(Self(Secret::new(trimmed.to_owned())))
        } else {
            Err(eyre!("Code is invalid"))
        }
    }

    /// Draws from the OS entropy source. Codes gate authentication, so a
    /// predictable generator is not acceptable here.
    pub fn generate() -> Self {
        let value: u32 = rand::rngs::OsRng.gen_range(0..1_000_000);
        Self(Secret::new(format!("{:06}", value)))
    }

    /// Trimmed, case-insensitive comparison. Codes are numeric, so the
    /// case-insensitivity is a safeguard rather than a requirement.
    pub fn matches(&self, input: &str) -> bool {
        self.0
            .expose_secret()
            .trim()
            .eq_ignore_ascii_case(input.trim())
    }
}

impl PartialEq for OneTimeCode {
    fn eq(&self, other: &Self) -> bool {
        self.0.expose_secret() == other.0.expose_secret()
    }
}

impl Eq for OneTimeCode {}

impl AsRef<Secret<String>> for OneTimeCode {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}

/// True when `now` has passed `issued_at` plus the verification window.
pub fn is_expired(issued_at: DateTime<Utc>, window_minutes: i64) -> bool {
    Utc::now() > issued_at + Duration::minutes(window_minutes)
}
