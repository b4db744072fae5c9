//! Mapping from raw upstream failures to [`ClassifiedError`].

use crate::error::ClassifiedError;
use crate::http_client::{HttpError, HttpErrorKind};

/// Upper bound on upstream body text carried into an error message.
pub const MAX_BODY_EXCERPT: usize = 200;

/// Structured description of why a fetch did not produce a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// Upstream answered with a non-success status.
    Status { status: u16, body: String },
    /// No status was received.
    Transport(HttpError),
    /// A 2xx response whose body was not valid JSON.
    MalformedBody(String),
}

impl From<HttpError> for Failure {
    fn from(error: HttpError) -> Self {
        Self::Transport(error)
    }
}

/// Pure mapping from a failure to its stable kind and presentable message.
pub fn classify(failure: &Failure) -> ClassifiedError {
    match failure {
        Failure::Status { status: 429, .. } => ClassifiedError::rate_limited(),
        Failure::Status { status: 404, .. } => ClassifiedError::not_found(),
        Failure::Status { status, .. } if *status >= 500 => {
            ClassifiedError::upstream_server_error()
        }
        Failure::Status { status, body } => ClassifiedError::transport(format!(
            "HTTP error {status}: {}",
            excerpt(body, MAX_BODY_EXCERPT)
        )),
        Failure::Transport(error) => match error.kind() {
            HttpErrorKind::Timeout => {
                ClassifiedError::transport("Request to the OpenDota API timed out.")
            }
            HttpErrorKind::Connect => {
                ClassifiedError::transport("Could not connect to the OpenDota API.")
            }
            HttpErrorKind::Body => {
                ClassifiedError::transport("Failed to read the OpenDota API response.")
            }
            HttpErrorKind::Other => {
                ClassifiedError::unknown(format!("Unexpected error: {}", error.message()))
            }
        },
        Failure::MalformedBody(_) => {
            ClassifiedError::transport("The OpenDota API returned a malformed response.")
        }
    }
}

fn excerpt(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    match trimmed.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &trimmed[..cut]),
        None => trimmed.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn status(status: u16, body: &str) -> Failure {
        Failure::Status {
            status,
            body: body.to_owned(),
        }
    }

    #[test]
    fn maps_well_known_statuses() {
        assert_eq!(classify(&status(429, "")).kind(), ErrorKind::RateLimited);
        assert_eq!(classify(&status(404, "")).kind(), ErrorKind::NotFound);
        assert_eq!(
            classify(&status(500, "")).kind(),
            ErrorKind::UpstreamServerError
        );
        assert_eq!(
            classify(&status(503, "")).kind(),
            ErrorKind::UpstreamServerError
        );
    }

    #[test]
    fn rate_limited_message_suggests_an_api_key() {
        let error = classify(&status(429, "slow down"));

        assert!(error.message().contains("API key"));
        assert!(!error.message().contains("slow down"));
    }

    #[test]
    fn other_client_errors_carry_status_and_body() {
        let error = classify(&status(400, "bad account id"));

        assert_eq!(error.kind(), ErrorKind::TransportError);
        assert_eq!(error.message(), "HTTP error 400: bad account id");
    }

    #[test]
    fn long_bodies_are_truncated() {
        let body = "x".repeat(MAX_BODY_EXCERPT + 50);
        let error = classify(&status(418, &body));

        let expected = format!("HTTP error 418: {}...", "x".repeat(MAX_BODY_EXCERPT));
        assert_eq!(error.message(), expected);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let body = "é".repeat(MAX_BODY_EXCERPT + 1);

        assert_eq!(excerpt(&body, MAX_BODY_EXCERPT).chars().count(), MAX_BODY_EXCERPT + 3);
    }

    #[test]
    fn connection_failures_are_transport_errors() {
        let error = classify(&Failure::from(HttpError::connect("refused")));

        assert_eq!(error.kind(), ErrorKind::TransportError);
        assert!(!error.message().contains("refused"));
    }

    #[test]
    fn timeouts_are_transport_errors() {
        let error = classify(&Failure::from(HttpError::timeout("deadline")));

        assert_eq!(error.kind(), ErrorKind::TransportError);
    }

    #[test]
    fn malformed_bodies_are_transport_errors() {
        let error = classify(&Failure::MalformedBody(String::from("expected value")));

        assert_eq!(error.kind(), ErrorKind::TransportError);
    }

    #[test]
    fn unanticipated_transport_failures_are_unknown() {
        let error = classify(&Failure::from(HttpError::new(
            HttpErrorKind::Other,
            "redirect loop",
        )));

        assert_eq!(error.kind(), ErrorKind::Unknown);
        assert_eq!(error.message(), "Unexpected error: redirect loop");
    }
}
