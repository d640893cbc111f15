use thiserror::Error;

pub type Result<T> = std::result::Result<T, FetchError>;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("http client error: {0}")]
    Client(String),

    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("failed to read body from {url}: {message}")]
    Body { url: String, message: String },
}

impl FetchError {
    /// HTTP status code, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FetchError::Transport {
            url: "https://panini.com.br/x".to_string(),
            message: "connection reset by peer".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "request to https://panini.com.br/x failed: connection reset by peer"
        );
    }

    #[test]
    fn test_status_code() {
        let err = FetchError::Status {
            url: "https://panini.com.br/x".to_string(),
            status: 503,
        };
        assert_eq!(err.status(), Some(503));
        assert!(err.to_string().contains("503"));

        assert_eq!(FetchError::Client("bad header".to_string()).status(), None);
    }
}
