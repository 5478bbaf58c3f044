//! Resend email delivery.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::ports::{NotificationError, Notifier, WelcomeMessage};

pub const RESEND_API_URL: &str = "https://api.resend.com/emails";

#[derive(Debug, Serialize)]
struct ResendEmail<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: String,
    html: String,
}

pub struct ResendNotifier {
    api_key: SecretString,
    from_header: String,
    endpoint: String,
    http_client: reqwest::Client,
}

impl ResendNotifier {
    /// `from_header` is the full `Name <address>` value.
    pub fn new(api_key: SecretString, from_header: impl Into<String>) -> Self {
        Self {
            api_key,
            from_header: from_header.into(),
            endpoint: RESEND_API_URL.to_string(),
            http_client: reqwest::Client::new(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn email_for<'a>(&'a self, message: &'a WelcomeMessage) -> ResendEmail<'a> {
        ResendEmail {
            from: &self.from_header,
            to: [message.to.as_str()],
            subject: message.subject(),
            html: message.body(),
        }
    }
}

#[async_trait]
impl Notifier for ResendNotifier {
    async fn send_welcome(&self, message: &WelcomeMessage) -> Result<(), NotificationError> {
        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose_secret())
            .json(&self.email_for(message))
            .send()
            .await
            .map_err(|e| NotificationError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(NotificationError::Rejected(format!("HTTP {}: {}", status, body)));
        }

        tracing::debug!("Welcome email accepted by Resend");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_payload_uses_welcome_template() {
        let notifier = ResendNotifier::new(
            SecretString::new("re_test".to_string()),
            "LCCI <noreply@example.com>",
        );
        let message = WelcomeMessage {
            to: "a@b.com".to_string(),
            first_name: "Ann".to_string(),
            organisation: "LCCI".to_string(),
            login_url: "https://example.com/login".to_string(),
        };

        let json = serde_json::to_value(notifier.email_for(&message)).unwrap();

        assert_eq!(json["from"], "LCCI <noreply@example.com>");
        assert_eq!(json["to"][0], "a@b.com");
        assert_eq!(json["subject"], "Welcome to LCCI");
        assert!(json["html"].as_str().unwrap().starts_with("Welcome Ann!"));
    }
}
