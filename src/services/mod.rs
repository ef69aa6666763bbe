pub mod data_stores;
pub mod postmark_email_client;
