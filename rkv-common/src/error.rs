//! # Application Errors
//!
//! A numeric code plus a human message, optionally wrapping the failure that
//! caused it. Two errors compare equal when their codes match, whatever the
//! message or cause says.

use std::error::Error as StdError;
use std::fmt;

type BoxedCause = Box<dyn StdError + Send + Sync + 'static>;

/// Stable error codes shared by every caller of the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Success,
    /// Request parameters failed validation.
    ParamInvalid,
    SystemError,
    UserNotLogin,
    InvalidRequest,
    /// Fallback for errors that were never assigned a code.
    Default,
    /// Free-form error; the message is supplied by the caller.
    Custom,
}

impl ErrorCode {
    /// Numeric value of the code.
    pub fn as_i32(self) -> i32 {
        match self {
            ErrorCode::Success => 0,
            ErrorCode::ParamInvalid => 1,
            ErrorCode::SystemError => 2,
            ErrorCode::UserNotLogin => 3,
            ErrorCode::InvalidRequest => 6,
            ErrorCode::Default => 100,
            ErrorCode::Custom => 101,
        }
    }

    /// Maps a numeric value back to a known code.
    pub fn from_i32(code: i32) -> Option<Self> {
        match code {
            0 => Some(ErrorCode::Success),
            1 => Some(ErrorCode::ParamInvalid),
            2 => Some(ErrorCode::SystemError),
            3 => Some(ErrorCode::UserNotLogin),
            6 => Some(ErrorCode::InvalidRequest),
            100 => Some(ErrorCode::Default),
            101 => Some(ErrorCode::Custom),
            _ => None,
        }
    }

    /// Default message for the code.
    pub fn default_message(self) -> &'static str {
        match self {
            ErrorCode::Success => "success",
            ErrorCode::ParamInvalid => "invalid request parameters",
            ErrorCode::SystemError => "service error, please retry later",
            ErrorCode::UserNotLogin => "user session expired, please log in again",
            ErrorCode::InvalidRequest => "invalid request, please retry later",
            ErrorCode::Default => "service unavailable, please retry later",
            ErrorCode::Custom => "",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i32())
    }
}

/// Tagged application error: code, message and an optional cause.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct AppError {
    code: ErrorCode,
    message: String,
    #[source]
    source: Option<BoxedCause>,
}

impl AppError {
    /// Creates an error carrying the code's default message.
    pub fn new(code: ErrorCode) -> Self {
        AppError {
            code,
            message: code.default_message().to_string(),
            source: None,
        }
    }

    /// Creates an error with a caller-supplied message.
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Shorthand for a `Custom` error whose message is free-form.
    pub fn custom(message: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::Custom, message)
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Attaches `cause`, prefixing the message with `context`. The code is kept.
    pub fn wrap<E>(mut self, cause: E, context: impl fmt::Display) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.message = format!("{}: {}", context, self.message);
        self.source = Some(Box::new(cause));
        self
    }

    /// Replaces the message with the cause's text and keeps the cause.
    pub fn caused_by<E>(mut self, cause: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.message = cause.to_string();
        self.source = Some(Box::new(cause));
        self
    }
}

impl PartialEq for AppError {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for AppError {}

impl From<ErrorCode> for AppError {
    fn from(code: ErrorCode) -> Self {
        AppError::new(code)
    }
}
