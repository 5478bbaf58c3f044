//! Notifier that only logs.

use async_trait::async_trait;

use crate::ports::{NotificationError, Notifier, WelcomeMessage};

#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingNotifier;

#[async_trait]
impl Notifier for LoggingNotifier {
    async fn send_welcome(&self, message: &WelcomeMessage) -> Result<(), NotificationError> {
        tracing::info!(
            subject = %message.subject(),
            "Email delivery not configured; welcome email logged only"
        );
        Ok(())
    }
}
