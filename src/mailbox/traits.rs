use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// One alert email: its HTML body and when it was received
#[derive(Debug, Clone)]
pub struct AlertEmail {
    pub received: DateTime<Utc>,
    pub html: String,
}

/// Common trait for alert mail sources
#[async_trait]
pub trait MailSource: Send + Sync {
    /// Fetch all matching alert emails from the mailbox
    async fn fetch(&self) -> Result<Vec<AlertEmail>>;

    /// Name of the mail source
    fn source_name(&self) -> &'static str;
}
