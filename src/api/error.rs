use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized - no valid session")]
    Unauthorized,

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected response: {0}")]
    UnexpectedStatus(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid carrying excessive data in messages.
    /// The cut point backs up to a char boundary so multi-byte bodies never
    /// split mid-character.
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut cut = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        format!(
            "{}... (truncated, {} total bytes)",
            &body[..cut],
            body.len()
        )
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            401 | 403 => ApiError::Unauthorized,
            500..=599 => ApiError::ServerError(truncated),
            _ => ApiError::UnexpectedStatus(format!("Status {}: {}", status, truncated)),
        }
    }

    /// True when the caller should treat this as "not logged in" rather than
    /// a transient failure.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status_maps_auth_failures() {
        assert!(ApiError::from_status(StatusCode::UNAUTHORIZED, "").is_unauthorized());
        assert!(ApiError::from_status(StatusCode::FORBIDDEN, "denied").is_unauthorized());
    }

    #[test]
    fn test_from_status_maps_server_errors() {
        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "boom");
        assert!(matches!(err, ApiError::ServerError(ref body) if body == "boom"));
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn test_from_status_truncates_long_bodies() {
        let body = "x".repeat(2000);
        let err = ApiError::from_status(StatusCode::BAD_GATEWAY, &body);
        let msg = err.to_string();
        assert!(msg.len() < body.len());
        assert!(msg.contains("truncated"));
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        // 600 bytes of 3-byte characters; byte 500 falls mid-character,
        // as in a proxy's non-ASCII HTML error page
        let body = "あ".repeat(200);
        let err = ApiError::from_status(StatusCode::BAD_GATEWAY, &body);
        let msg = err.to_string();
        assert!(msg.contains("truncated"));
        assert!(msg.contains("600 total bytes"));
    }
}
