//! Common error types for appliance operations

use thiserror::Error;

/// Result type for appliance operations
pub type ApplianceResult<T> = Result<T, ApplianceError>;

/// Errors that can occur when talking to the appliance
#[derive(Debug, Error)]
pub enum ApplianceError {
    /// No active session, or the appliance refused to issue one
    #[error("not authenticated: {0}")]
    Unauthenticated(String),

    /// Lookup resolved to no entry
    #[error("not found: {0}")]
    NotFound(String),

    /// Request construction or network failure
    #[error("transport error: {0}")]
    Transport(String),

    /// Payload encode/decode failure
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Appliance returned a non-success status; body captured for diagnostics
    #[error("appliance returned status {status}: {body}")]
    Upstream { status: u16, body: String },

    /// Bounded request deadline elapsed
    #[error("request timed out")]
    Timeout,
}

impl ApplianceError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            ApplianceError::Unauthenticated(_) => 401,
            ApplianceError::NotFound(_) => 404,
            ApplianceError::Transport(_) => 503,
            ApplianceError::Serialization(_) => 502,
            ApplianceError::Upstream { .. } => 502,
            ApplianceError::Timeout => 504,
        }
    }

    /// Create an upstream error from status code and body
    pub fn upstream(status: u16, body: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            body: body.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApplianceError::Unauthenticated("no session".into()).status_code(),
            401
        );
        assert_eq!(ApplianceError::NotFound("x".into()).status_code(), 404);
        assert_eq!(ApplianceError::Transport("x".into()).status_code(), 503);
        assert_eq!(ApplianceError::Serialization("x".into()).status_code(), 502);
        assert_eq!(ApplianceError::upstream(500, "boom").status_code(), 502);
        assert_eq!(ApplianceError::Timeout.status_code(), 504);
    }

    #[test]
    fn test_upstream_message_captures_body() {
        let err = ApplianceError::upstream(403, "Invalid password");
        assert_eq!(
            err.to_string(),
            "appliance returned status 403: Invalid password"
        );
    }
}
