//! Notifier that records messages for assertions.

use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::ports::{NotificationError, Notifier, WelcomeMessage};

#[derive(Default)]
struct Recorded {
    sent: Vec<WelcomeMessage>,
    fail_with: Option<NotificationError>,
}

/// Clones share the recorded messages.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    inner: Arc<Mutex<Recorded>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every send fails with `error`. Nothing is recorded.
    pub fn failing(error: NotificationError) -> Self {
        let notifier = Self::new();
        notifier.lock().fail_with = Some(error);
        notifier
    }

    fn lock(&self) -> MutexGuard<'_, Recorded> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn sent(&self) -> Vec<WelcomeMessage> {
        self.lock().sent.clone()
    }

    pub fn sent_count(&self) -> usize {
        self.lock().sent.len()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_welcome(&self, message: &WelcomeMessage) -> Result<(), NotificationError> {
        let mut recorded = self.lock();
        if let Some(error) = &recorded.fail_with {
            return Err(error.clone());
        }
        recorded.sent.push(message.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> WelcomeMessage {
        WelcomeMessage {
            to: "a@b.com".to_string(),
            first_name: "Ann".to_string(),
            organisation: "LCCI".to_string(),
            login_url: "https://example.com/login".to_string(),
        }
    }

    #[tokio::test]
    async fn records_sent_messages() {
        let notifier = RecordingNotifier::new();

        notifier.send_welcome(&message()).await.unwrap();

        assert_eq!(notifier.sent(), vec![message()]);
    }

    #[tokio::test]
    async fn failing_notifier_records_nothing() {
        let notifier =
            RecordingNotifier::failing(NotificationError::Transport("down".to_string()));

        assert!(notifier.send_welcome(&message()).await.is_err());
        assert_eq!(notifier.sent_count(), 0);
    }
}
