//! Error taxonomy shared by the dispatcher and the typed endpoints.

use reqwest::StatusCode;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Caller input rejected before any request was sent.
    #[error("invalid argument: {0}")]
    Validation(String),

    /// Connection failure, timeout or a retryable status such as 429.
    #[error("transient transport failure: {message}")]
    Transient {
        status: Option<StatusCode>,
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// Non-retryable error status returned by the API.
    #[error("sumo API returned {status}: {message}")]
    Remote { status: StatusCode, message: String },

    /// Response body was not JSON or did not match the expected shape.
    #[error("failed to decode response: {message}")]
    Decode {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Client could not be configured (bad base URL, TLS setup, ...).
    #[error("invalid client configuration: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Only transient failures are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Transient { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    /// HTTP status attached to the error, if the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Transient { status, .. } => *status,
            Error::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Maps a reqwest failure raised while sending or reading a response.
    pub(crate) fn from_transport(error: reqwest::Error) -> Self {
        if error.is_builder() {
            return Error::Config {
                message: error.to_string(),
                source: Some(error),
            };
        }

        let message = if error.is_timeout() {
            format!("request timed out: {}", error)
        } else if error.is_connect() {
            format!("connection failed: {}", error)
        } else {
            error.to_string()
        };

        Error::Transient {
            status: error.status(),
            message,
            source: Some(error),
        }
    }

    pub(crate) fn from_json(error: serde_json::Error) -> Self {
        Error::Decode {
            message: error.to_string(),
            source: Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_transient_is_retryable() {
        let transient = Error::Transient {
            status: Some(StatusCode::TOO_MANY_REQUESTS),
            message: "slow down".to_string(),
            source: None,
        };
        assert!(transient.is_retryable());
        assert_eq!(transient.status(), Some(StatusCode::TOO_MANY_REQUESTS));

        let remote = Error::Remote {
            status: StatusCode::NOT_FOUND,
            message: "Not Found".to_string(),
        };
        assert!(!remote.is_retryable());
        assert_eq!(remote.status(), Some(StatusCode::NOT_FOUND));

        assert!(!Error::validation("bad").is_retryable());
        assert!(!Error::config("bad").is_retryable());
    }

    #[test]
    fn test_display_messages() {
        let err = Error::validation("Basho ID must be in YYYYMM format");
        assert_eq!(
            err.to_string(),
            "invalid argument: Basho ID must be in YYYYMM format"
        );

        let err = Error::Remote {
            status: StatusCode::BAD_REQUEST,
            message: "invalid division".to_string(),
        };
        assert!(err.to_string().contains("400"));
        assert!(err.to_string().contains("invalid division"));
    }

    #[test]
    fn test_decode_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err = Error::from_json(json_err);
        assert!(matches!(err, Error::Decode { source: Some(_), .. }));
        assert!(!err.is_retryable());
        assert_eq!(err.status(), None);
    }
}
