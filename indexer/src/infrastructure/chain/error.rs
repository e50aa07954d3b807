use std::error::Error;
use std::fmt;

/// Represents errors that can occur while querying the chain
#[derive(Debug)]
pub enum ChainClientError {
    /// Error from the reqwest HTTP client
    HttpError(reqwest::Error),
    /// Node answered with a non-success status
    StatusError { url: String, status: u16 },
    /// Response body could not be mapped
    ResponseError(String),
    /// Configuration error
    ConfigError(String),
}

impl ChainClientError {
    /// Network failures and overloaded nodes are worth retrying, malformed responses are not
    pub fn is_transient(&self) -> bool {
        match self {
            ChainClientError::HttpError(e) => {
                e.is_timeout() || e.is_connect() || e.is_request() || e.is_body()
            }
            ChainClientError::StatusError { status, .. } => {
                *status == 429 || (500..=599).contains(status)
            }
            ChainClientError::ResponseError(_) => false,
            ChainClientError::ConfigError(_) => false,
        }
    }
}

impl fmt::Display for ChainClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainClientError::HttpError(e) => write!(f, "HTTP error: {}", e),
            ChainClientError::StatusError { url, status } => {
                write!(f, "Node returned status {} for {}", status, url)
            }
            ChainClientError::ResponseError(msg) => write!(f, "Response error: {}", msg),
            ChainClientError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl Error for ChainClientError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ChainClientError::HttpError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ChainClientError {
    fn from(error: reqwest::Error) -> Self {
        ChainClientError::HttpError(error)
    }
}

impl From<serde_json::Error> for ChainClientError {
    fn from(error: serde_json::Error) -> Self {
        ChainClientError::ResponseError(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_are_transient() {
        let error = ChainClientError::StatusError {
            url: "http://node/status".to_string(),
            status: 503,
        };
        assert!(error.is_transient());

        let error = ChainClientError::StatusError {
            url: "http://node/status".to_string(),
            status: 404,
        };
        assert!(!error.is_transient());
    }

    #[test]
    fn malformed_responses_are_not_transient() {
        assert!(!ChainClientError::ResponseError("bad json".to_string()).is_transient());
    }
}
