use color_eyre::eyre::Result;

use super::Email;

/// Out-of-band delivery of one-time codes. The verification flows depend
/// only on whether the send succeeded; the transport lives behind this
/// trait.
#[async_trait::async_trait]
pub trait EmailClient {
    async fn send_email(
        &self,
        recipient: &Email,
        subject: &str,
        content: &str,
    ) -> Result<()>;
}
