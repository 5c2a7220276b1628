use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Request failed: {0}")]
    BadStatus(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl FetchError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        // Floor the cut to a char boundary; bodies are arbitrary HTML or
        // lossy-decoded binary, so byte 500 may fall inside a character.
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

    pub fn from_status(status: u16, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status {
            404 => FetchError::NotFound(truncated),
            500..=599 => FetchError::ServerError(truncated),
            _ => FetchError::BadStatus(format!("Status {}: {}", status, truncated)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_maps_common_codes() {
        assert!(matches!(FetchError::from_status(404, ""), FetchError::NotFound(_)));
        assert!(matches!(FetchError::from_status(503, ""), FetchError::ServerError(_)));
        assert!(matches!(FetchError::from_status(418, ""), FetchError::BadStatus(_)));
    }

    #[test]
    fn test_long_bodies_are_truncated() {
        let body = "x".repeat(2000);
        let err = FetchError::from_status(500, &body);
        let msg = err.to_string();
        assert!(msg.len() < 700);
        assert!(msg.contains("truncated"));
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        // Byte 500 lands inside the first two-byte character.
        let body = format!("{}éé", "a".repeat(499));
        assert_eq!(body.len(), 503);

        let err = FetchError::from_status(500, &body);
        let msg = err.to_string();
        assert!(msg.contains("truncated, 503 total bytes"));
        assert!(!msg.contains('é'));

        // A replacement character from a lossy binary decode, too.
        let body = format!("{}\u{FFFD}\u{FFFD}", "a".repeat(499));
        let msg = FetchError::from_status(500, &body).to_string();
        assert!(msg.contains("truncated"));
    }
}
