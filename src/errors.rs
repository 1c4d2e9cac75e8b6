use thiserror::Error;

use crate::data::ResponseFormat;

pub type Result<T> = std::result::Result<T, AlphaError>;

/// Boxed transport failure, already stripped of anything carrying the API key.
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// Everything a dispatch can fail with.
///
/// Caller mistakes (`MissingParameter`, `UnknownEndpoint`, `UnsupportedFormat`)
/// are raised before any request leaves the process.
#[derive(Error, Debug)]
pub enum AlphaError {
    #[error("{function}: missing required parameter `{parameter}`")]
    MissingParameter {
        function: String,
        parameter: String,
    },

    #[error("unknown endpoint: {0}")]
    UnknownEndpoint(String),

    #[error("{function} does not support {format} responses")]
    UnsupportedFormat {
        function: String,
        format: ResponseFormat,
    },

    #[error("upstream returned HTTP {status}: {body}")]
    UpstreamHttp { status: u16, body: String },

    /// A 2xx response whose body carries an API-level error or rate-limit note.
    #[error("upstream rejected the request: {message}")]
    UpstreamLogical { message: String },

    #[error("network error: {0}")]
    Network(#[source] TransportError),

    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("no API key: pass one explicitly, set client.api_key or ALPHA_API_KEY")]
    MissingApiKey,

    #[error("response body is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("failed to decode CSV: {0}")]
    Csv(#[from] csv::Error),
}

impl AlphaError {
    /// Whether a caller could reasonably try the same request again later.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::UpstreamHttp { status, .. } => *status == 429 || *status >= 500,
            Self::UpstreamLogical { message } => is_rate_limit_note(message),
            _ => false,
        }
    }
}

pub(crate) fn is_rate_limit_note(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    lower.contains("rate limit") || lower.contains("api call frequency")
}

/// Replaces every occurrence of `secret` in `text` with `***`.
pub(crate) fn redact(text: &str, secret: &str) -> String {
    if secret.is_empty() {
        return text.to_string();
    }
    text.replace(secret, "***")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caller_errors_are_not_retryable() {
        let error = AlphaError::MissingParameter {
            function: "TIME_SERIES_DAILY".to_string(),
            parameter: "symbol".to_string(),
        };
        assert!(!error.is_retryable());
        assert!(!AlphaError::UnknownEndpoint("NOPE".to_string()).is_retryable());
    }

    #[test]
    fn test_server_errors_and_throttling_are_retryable() {
        for status in [429, 500, 503] {
            let error = AlphaError::UpstreamHttp {
                status,
                body: String::new(),
            };
            assert!(error.is_retryable(), "status {status}");
        }
        let error = AlphaError::UpstreamHttp {
            status: 404,
            body: String::new(),
        };
        assert!(!error.is_retryable());
    }

    #[test]
    fn test_rate_limit_note_is_retryable() {
        let error = AlphaError::UpstreamLogical {
            message: "Thank you for using Alpha Vantage! Our standard API call frequency is 5 calls per minute".to_string(),
        };
        assert!(error.is_retryable());

        let error = AlphaError::UpstreamLogical {
            message: "Invalid API call".to_string(),
        };
        assert!(!error.is_retryable());
    }

    #[test]
    fn test_redact() {
        assert_eq!(redact("apikey=SECRET&x=SECRET", "SECRET"), "apikey=***&x=***");
        assert_eq!(redact("nothing here", ""), "nothing here");
    }

    #[test]
    fn test_error_display() {
        let error = AlphaError::MissingParameter {
            function: "RSI".to_string(),
            parameter: "symbol".to_string(),
        };
        assert_eq!(error.to_string(), "RSI: missing required parameter `symbol`");

        let error = AlphaError::UnsupportedFormat {
            function: "OVERVIEW".to_string(),
            format: ResponseFormat::Csv,
        };
        assert_eq!(error.to_string(), "OVERVIEW does not support csv responses");

        let error = AlphaError::UpstreamHttp {
            status: 500,
            body: "oops".to_string(),
        };
        assert_eq!(error.to_string(), "upstream returned HTTP 500: oops");
    }
}
