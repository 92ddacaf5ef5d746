use serde::Serialize;
use std::fmt;

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The selected file does not declare an `image/*` media type.
    InvalidMediaType,
    EmptyFile,
    /// An operation was called in a state that does not allow it.
    NotReady,
    TransportError,
    ServerError,
    Timeout,
    MalformedResponse,
    Preview,
    Config,
    Io,
    /// Failures with no more specific kind, such as a plain message converted with `?`.
    Internal,
}

impl ErrorKind {
    /// Errors that end a submission attempt and move the session to `Failed`.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ErrorKind::TransportError
                | ErrorKind::ServerError
                | ErrorKind::Timeout
                | ErrorKind::MalformedResponse
        )
    }

    /// A malformed payload is reported by the server side of the boundary.
    pub fn is_server_error(&self) -> bool {
        matches!(self, ErrorKind::ServerError | ErrorKind::MalformedResponse)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InvalidMediaType => "invalid media type",
            ErrorKind::EmptyFile => "empty file",
            ErrorKind::NotReady => "not ready",
            ErrorKind::TransportError => "transport error",
            ErrorKind::ServerError => "server error",
            ErrorKind::Timeout => "timeout",
            ErrorKind::MalformedResponse => "malformed response",
            ErrorKind::Preview => "preview error",
            ErrorKind::Config => "configuration error",
            ErrorKind::Io => "io error",
            ErrorKind::Internal => "internal error",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        AppError {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::new(ErrorKind::Io, err.to_string())
    }
}

impl From<image::ImageError> for AppError {
    fn from(err: image::ImageError) -> Self {
        AppError::new(ErrorKind::Preview, err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::new(ErrorKind::Timeout, format!("Classification request timed out: {}", err))
        } else if err.is_decode() {
            AppError::new(
                ErrorKind::MalformedResponse,
                format!("Failed to decode classification response: {}", err),
            )
        } else if let Some(status) = err.status() {
            AppError::new(
                ErrorKind::ServerError,
                format!("Classification service returned HTTP {}", status),
            )
        } else {
            AppError::new(
                ErrorKind::TransportError,
                format!("Failed to reach classification service: {}", err),
            )
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::new(
            ErrorKind::MalformedResponse,
            format!("Failed to parse classification response: {}", err),
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::new(ErrorKind::Config, err.to_string())
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::new(ErrorKind::Internal, msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::new(ErrorKind::Internal, msg)
    }
}
