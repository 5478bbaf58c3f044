//! Notifier port - outbound email.

use async_trait::async_trait;
use thiserror::Error;

/// Welcome email sent after a successful registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WelcomeMessage {
    pub to: String,
    pub first_name: String,
    pub organisation: String,
    pub login_url: String,
}

impl WelcomeMessage {
    pub fn subject(&self) -> String {
        format!("Welcome to {}", self.organisation)
    }

    /// HTML body.
    pub fn body(&self) -> String {
        format!(
            "Welcome {}!<br><br>Your registration has been received. Our team will process your \
             membership shortly.<br><br>You can login here: {}",
            escape_html(&self.first_name),
            self.login_url
        )
    }
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotificationError {
    #[error("Email provider rejected the message: {0}")]
    Rejected(String),

    #[error("Email delivery failed: {0}")]
    Transport(String),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_welcome(&self, message: &WelcomeMessage) -> Result<(), NotificationError>;
}
