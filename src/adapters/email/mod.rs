//! Email adapters for the `Notifier` port.
//!
//! - `ResendNotifier` - Resend HTTP API
//! - `LoggingNotifier` - logs instead of sending (no API key configured)
//! - `RecordingNotifier` - keeps sent messages for assertions

mod logging;
mod recording;
mod resend;

pub use logging::LoggingNotifier;
pub use recording::RecordingNotifier;
pub use resend::{ResendNotifier, RESEND_API_URL};
