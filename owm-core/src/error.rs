use thiserror::Error;

/// Failure of a single executed request.
///
/// Every variant owns plain strings rather than the underlying source error,
/// so a recorded failure can be cloned out of [`crate::RequestState`] freely.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, send, timeout).
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// The server answered with a non-success status.
    #[error("request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response arrived but its body could not be read or parsed as JSON.
    #[error("failed to decode response body: {message}")]
    Decode { message: String },
}

impl ApiError {
    pub(crate) fn transport(url: &str, err: &reqwest::Error) -> Self {
        ApiError::Transport {
            url: url.to_string(),
            message: err.to_string(),
        }
    }

    pub(crate) fn status(status: reqwest::StatusCode, body: &str) -> Self {
        ApiError::Status {
            status: status.as_u16(),
            body: truncate_body(body),
        }
    }

    pub(crate) fn decode(err: &dyn std::fmt::Display) -> Self {
        ApiError::Decode {
            message: err.to_string(),
        }
    }

    /// Status code for [`ApiError::Status`] failures, `None` otherwise.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }

    // Back off to a char boundary so localized error messages cannot split a
    // multi-byte character.
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }

    format!("{}...", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_keeps_code_and_truncates_body() {
        let long = "x".repeat(500);
        let err = ApiError::status(reqwest::StatusCode::UNAUTHORIZED, &long);

        assert_eq!(err.status_code(), Some(401));
        let msg = err.to_string();
        assert!(msg.contains("status 401"));
        assert!(msg.len() < 300);
        assert!(msg.ends_with("..."));
    }

    #[test]
    fn status_error_truncates_multibyte_body_on_char_boundary() {
        // 101 euro signs is 303 bytes; byte 200 falls inside a character.
        let body = "€".repeat(101);
        let err = ApiError::status(reqwest::StatusCode::UNAUTHORIZED, &body);

        let msg = err.to_string();
        assert!(msg.ends_with("..."));
        assert!(msg.contains('€'));
    }

    #[test]
    fn transport_error_mentions_url() {
        let err = ApiError::Transport {
            url: "https://api.openweathermap.org/data/2.5/weather".into(),
            message: "connection refused".into(),
        };
        assert!(err.to_string().contains("api.openweathermap.org"));
        assert_eq!(err.status_code(), None);
    }
}
