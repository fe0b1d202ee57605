//! Classification of failed API requests.

/// Why a JSON request did not yield the expected value.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchError {
    /// The request never produced a response (DNS, connection, CORS, ...).
    Request(String),
    /// The server answered with a non-success status.
    Status(u16),
    /// The body was not valid JSON.
    Decode(String),
    /// The body was JSON but not in the expected shape.
    Shape(String),
}

impl FetchError {
    /// True when the failure lies in the payload rather than in the transport.
    pub fn is_malformed(&self) -> bool {
        matches!(self, FetchError::Shape(_))
    }
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Request(msg) => write!(f, "Request failed: {}", msg),
            FetchError::Status(code) => write!(f, "Network response was not ok: HTTP {}", code),
            FetchError::Decode(msg) => write!(f, "Response is not valid JSON: {}", msg),
            FetchError::Shape(msg) => write!(f, "Malformed response: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}

/// Finds the [`FetchError`] behind an error chain, if any.
pub fn classify_error(error: &anyhow::Error) -> Option<&FetchError> {
    error.chain().find_map(|cause| cause.downcast_ref::<FetchError>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_fetch_error_display() {
        assert!(FetchError::Request("refused".into()).to_string().contains("refused"));
        assert!(FetchError::Status(404).to_string().contains("HTTP 404"));
        assert!(FetchError::Decode("eof".into()).to_string().contains("not valid JSON"));
        assert!(FetchError::Shape("missing field".into()).to_string().contains("Malformed"));
    }

    #[test]
    fn test_is_malformed() {
        assert!(FetchError::Shape(String::new()).is_malformed());
        assert!(!FetchError::Decode(String::new()).is_malformed());
        assert!(!FetchError::Status(500).is_malformed());
    }

    #[test]
    fn test_classify_error_through_context() {
        let err: anyhow::Result<()> = Err(FetchError::Status(503).into());
        let err = err.context("Failed to fetch latest release").unwrap_err();
        assert_eq!(classify_error(&err), Some(&FetchError::Status(503)));
    }

    #[test]
    fn test_classify_error_unrelated() {
        let err = anyhow::anyhow!("something else");
        assert_eq!(classify_error(&err), None);
    }
}
