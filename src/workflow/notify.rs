//! Transient user-visible notifications ("toasts").

use tracing::{info, warn};

use crate::error::{ServiceError, ServiceKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub message: String,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: Level::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
        }
    }

    /// The one notification shown for a failed service call.
    pub fn for_failure(err: &ServiceError) -> Self {
        let message = match (err.service(), err.is_unreachable()) {
            (ServiceKind::Clinical, true) => {
                "Unable to connect to the prediction service. Please ensure the server is running."
                    .to_string()
            }
            (ServiceKind::Clinical, false) => "Error getting prediction. Please try again.".to_string(),
            (ServiceKind::Ecg, true) => {
                "Unable to connect to the ECG prediction service. Please ensure the server is running."
                    .to_string()
            }
            (ServiceKind::Ecg, false) => format!("Error analyzing ECG: {}", err.reason()),
            (ServiceKind::Chat, true) => {
                "Unable to connect to the chatbot service. Please try again later.".to_string()
            }
            (ServiceKind::Chat, false) => "Error connecting to chatbot. Please try again.".to_string(),
        };
        Self::error(message)
    }
}

/// Sink for notifications produced by the workflows.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Prints notifications on stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            Level::Info => {
                info!(text = %notification.message, "Notification");
                eprintln!("{}", notification.message);
            }
            Level::Error => {
                warn!(text = %notification.message, "Notification");
                eprintln!("error: {}", notification.message);
            }
        }
    }
}
