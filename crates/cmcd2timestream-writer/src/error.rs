//! Error types for the Timestream writer crate

use std::fmt;
use thiserror::Error;

/// Error codes for programmatic handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// E001: Network, timeout or other failure before a response arrived
    E001Unreachable,
    /// E002: The store throttled the call
    E002Throttled,
    /// E003: Credentials rejected or missing permissions
    E003AccessDenied,
    /// E004: The store returned a service error for the whole call
    E004WriteFailure,
    /// E005: A record could not be turned into a store request
    E005Encoding,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::E001Unreachable => "E001",
            Self::E002Throttled => "E002",
            Self::E003AccessDenied => "E003",
            Self::E004WriteFailure => "E004",
            Self::E005Encoding => "E005",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a whole write call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    Network,
    Throttling,
    AccessDenied,
    NotFound,
    Validation,
    Service,
}

impl TransportKind {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Network => ErrorCode::E001Unreachable,
            Self::Throttling => ErrorCode::E002Throttled,
            Self::AccessDenied => ErrorCode::E003AccessDenied,
            Self::NotFound | Self::Validation | Self::Service => ErrorCode::E004WriteFailure,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Throttling => "throttling",
            Self::AccessDenied => "access_denied",
            Self::NotFound => "not_found",
            Self::Validation => "validation",
            Self::Service => "service",
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that fail a whole write call. Per-record rejections are not errors;
/// see [`crate::WriteOutcome`].
#[derive(Debug, Error)]
pub enum WriterError {
    /// The call failed as a whole; nothing in the batch was written.
    #[error("[{code}] Write to '{database}.{table}' failed ({kind}): {reason}")]
    Transport {
        code: ErrorCode,
        kind: TransportKind,
        database: String,
        table: String,
        reason: String,
    },

    /// A record in the batch could not be encoded; the call was not made.
    #[error("[{code}] Record {index} could not be encoded: {reason}")]
    Encoding {
        code: ErrorCode,
        index: usize,
        reason: String,
    },
}

impl WriterError {
    /// Create a transport error with the code for its kind
    pub fn transport(
        kind: TransportKind,
        database: impl Into<String>,
        table: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Transport {
            code: kind.code(),
            kind,
            database: database.into(),
            table: table.into(),
            reason: reason.into(),
        }
    }

    /// Create an encoding error with error code
    pub fn encoding(index: usize, reason: impl Into<String>) -> Self {
        Self::Encoding {
            code: ErrorCode::E005Encoding,
            index,
            reason: reason.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Transport { code, .. } | Self::Encoding { code, .. } => *code,
        }
    }
}

/// Result type alias for WriterError
pub type Result<T> = std::result::Result<T, WriterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_carries_code_for_kind() {
        let err = WriterError::transport(TransportKind::Throttling, "cmcd", "requests", "slow down");
        assert_eq!(err.code(), ErrorCode::E002Throttled);
        assert_eq!(
            err.to_string(),
            "[E002] Write to 'cmcd.requests' failed (throttling): slow down"
        );
    }

    #[test]
    fn test_service_kinds_share_write_failure_code() {
        for kind in [
            TransportKind::NotFound,
            TransportKind::Validation,
            TransportKind::Service,
        ] {
            assert_eq!(kind.code(), ErrorCode::E004WriteFailure);
        }
        assert_eq!(TransportKind::Network.code().as_str(), "E001");
    }

    #[test]
    fn test_encoding_error_code() {
        let err = WriterError::encoding(4, "dimension name is empty");
        assert_eq!(err.code(), ErrorCode::E005Encoding);
        assert_eq!(
            err.to_string(),
            "[E005] Record 4 could not be encoded: dimension name is empty"
        );
    }
}
