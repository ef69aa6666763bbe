pub mod auth;
pub mod constants;
pub mod profile;
pub mod tracing;
pub mod two_factor;
