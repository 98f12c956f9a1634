use std::fmt;
use std::io;
use thiserror::Error;

/// The three remote services this client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceKind {
    Clinical,
    Ecg,
    Chat,
}

impl ServiceKind {
    pub const ALL: [ServiceKind; 3] = [ServiceKind::Clinical, ServiceKind::Ecg, ServiceKind::Chat];

    /// Message used when a failed response carries no `error` field.
    pub fn fallback_message(self) -> &'static str {
        match self {
            ServiceKind::Clinical => "Failed to get prediction",
            ServiceKind::Ecg => "Failed to get ECG prediction",
            ServiceKind::Chat => "Failed to get response from chatbot",
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ServiceKind::Clinical => "clinical prediction",
            ServiceKind::Ecg => "ECG prediction",
            ServiceKind::Chat => "chatbot",
        };
        f.write_str(name)
    }
}

/// Failure of a single call to a remote service. Every variant is terminal
/// for that request; nothing is retried.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{service} service unreachable")]
    Unreachable {
        service: ServiceKind,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} request failed")]
    Request {
        service: ServiceKind,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} service responded {status}: {message}")]
    Application {
        service: ServiceKind,
        status: u16,
        message: String,
    },

    #[error("{service} service sent an unreadable response")]
    Decode {
        service: ServiceKind,
        #[source]
        source: reqwest::Error,
    },
}

impl ServiceError {
    pub fn service(&self) -> ServiceKind {
        match self {
            ServiceError::Unreachable { service, .. }
            | ServiceError::Request { service, .. }
            | ServiceError::Application { service, .. }
            | ServiceError::Decode { service, .. } => *service,
        }
    }

    pub fn is_unreachable(&self) -> bool {
        matches!(self, ServiceError::Unreachable { .. })
    }

    /// Human readable reason: the server's own message for application
    /// errors, otherwise the per-service generic text.
    pub fn reason(&self) -> &str {
        match self {
            ServiceError::Application { message, .. } => message,
            other => other.service().fallback_message(),
        }
    }
}

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Please select a valid image file (JPEG, PNG, or BMP)")]
    UnsupportedType { mime: String },

    #[error("File size must be less than 10MB")]
    TooLarge { size: u64 },

    #[error("Unable to read {name}")]
    Read {
        name: String,
        #[source]
        source: io::Error,
    },
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Unable to write report to {path}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Errors raised while building the process-wide application.
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Invalid {service} base url `{url}`")]
    InvalidBaseUrl {
        service: ServiceKind,
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error(transparent)]
    Config(#[from] config::ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn application_errors_expose_server_message() {
        let err = ServiceError::Application {
            service: ServiceKind::Ecg,
            status: 400,
            message: "Invalid image format".into(),
        };

        assert_eq!(err.reason(), "Invalid image format");
        assert_eq!(err.service(), ServiceKind::Ecg);
        assert!(!err.is_unreachable());
        assert_eq!(
            err.to_string(),
            "ECG prediction service responded 400: Invalid image format"
        );
    }

    #[test]
    fn upload_errors_use_inline_messages() {
        let err = UploadError::TooLarge { size: 11 * 1024 * 1024 };
        assert_eq!(err.to_string(), "File size must be less than 10MB");

        let err = UploadError::UnsupportedType {
            mime: "application/pdf".into(),
        };
        assert_eq!(
            err.to_string(),
            "Please select a valid image file (JPEG, PNG, or BMP)"
        );
    }
}
