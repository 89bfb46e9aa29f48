//! Unified error codes for the review platform
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 2xxx: Permission errors
//! - 4xxx: Review errors
//! - 5xxx: Appeal errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,

    // ==================== 2xxx: Permission ====================
    /// Store does not own the target review
    StoreMismatch = 2001,

    // ==================== 4xxx: Review ====================
    /// Review not found
    ReviewNotFound = 4001,
    /// A review already exists for this order
    OrderAlreadyReviewed = 4002,
    /// The store has already replied to this review
    ReviewAlreadyReplied = 4003,
    /// Reply not found
    ReplyNotFound = 4004,

    // ==================== 5xxx: Appeal ====================
    /// Appeal not found
    AppealNotFound = 5001,
    /// Appeal has already been resolved
    AppealAlreadyResolved = 5002,
    /// Target audit status is not a resolution
    InvalidAuditStatus = 5003,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Search index, cache or store unreachable
    UpstreamUnavailable = 9003,
    /// Configuration error
    ConfigError = 9004,
    /// Stored or indexed payload could not be decoded
    DecodeError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",

            // Permission
            ErrorCode::StoreMismatch => "Review does not belong to this store",

            // Review
            ErrorCode::ReviewNotFound => "Review not found",
            ErrorCode::OrderAlreadyReviewed => "Order has already been reviewed",
            ErrorCode::ReviewAlreadyReplied => "Review has already been replied to",
            ErrorCode::ReplyNotFound => "Reply not found",

            // Appeal
            ErrorCode::AppealNotFound => "Appeal not found",
            ErrorCode::AppealAlreadyResolved => "Appeal has already been resolved",
            ErrorCode::InvalidAuditStatus => "Invalid audit status",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::UpstreamUnavailable => "Upstream service unavailable",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::DecodeError => "Payload could not be decoded",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),

            // Permission
            2001 => Ok(ErrorCode::StoreMismatch),

            // Review
            4001 => Ok(ErrorCode::ReviewNotFound),
            4002 => Ok(ErrorCode::OrderAlreadyReviewed),
            4003 => Ok(ErrorCode::ReviewAlreadyReplied),
            4004 => Ok(ErrorCode::ReplyNotFound),

            // Appeal
            5001 => Ok(ErrorCode::AppealNotFound),
            5002 => Ok(ErrorCode::AppealAlreadyResolved),
            5003 => Ok(ErrorCode::InvalidAuditStatus),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::UpstreamUnavailable),
            9004 => Ok(ErrorCode::ConfigError),
            9005 => Ok(ErrorCode::DecodeError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
