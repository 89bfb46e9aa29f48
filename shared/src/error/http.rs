//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::ReviewNotFound
            | Self::ReplyNotFound
            | Self::AppealNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists
            | Self::OrderAlreadyReviewed
            | Self::ReviewAlreadyReplied
            | Self::AppealAlreadyResolved => StatusCode::CONFLICT,

            // 403 Forbidden
            Self::StoreMismatch => StatusCode::FORBIDDEN,

            // 503 Service Unavailable (transient, client can retry)
            Self::UpstreamUnavailable => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::InternalError
            | Self::DatabaseError
            | Self::ConfigError
            | Self::DecodeError
            | Self::Unknown => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request
            Self::ValidationFailed | Self::InvalidRequest | Self::InvalidAuditStatus => {
                StatusCode::BAD_REQUEST
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_status() {
        assert_eq!(ErrorCode::ReviewNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::AppealNotFound.http_status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_conflict_status() {
        assert_eq!(
            ErrorCode::OrderAlreadyReviewed.http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ErrorCode::AppealAlreadyResolved.http_status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_forbidden_status() {
        assert_eq!(ErrorCode::StoreMismatch.http_status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_upstream_status() {
        assert_eq!(
            ErrorCode::UpstreamUnavailable.http_status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
