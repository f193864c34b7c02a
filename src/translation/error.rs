/// Error types for the translation pipeline
///
/// None of these escape `TranslationResolver::resolve`: every tier failure is
/// turned into "try the next tier", and exhaustion is reported as `NotFound`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationError {
    /// Empty or blank source text
    MalformedInput(String),
    /// Network, DNS or timeout failure
    Transport(String),
    /// Non-success status code or unexpected payload shape
    Protocol(String),
    /// Transport failure caused by an origin restriction; opens the relay tier
    CrossOrigin(String),
    /// Language code that is not a valid ISO-639-1 code
    InvalidLanguage(String),
    /// Bad endpoint or client configuration
    Config(String),
    /// Every tier was tried without a usable result
    AllProvidersExhausted,
}

impl TranslationError {
    /// Whether this failure should route the request through a CORS relay
    pub fn is_cross_origin(&self) -> bool {
        matches!(self, TranslationError::CrossOrigin(_))
    }
}

impl std::fmt::Display for TranslationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranslationError::MalformedInput(msg) => write!(f, "Malformed input: {}", msg),
            TranslationError::Transport(msg) => write!(f, "Transport failure: {}", msg),
            TranslationError::Protocol(msg) => write!(f, "Protocol failure: {}", msg),
            TranslationError::CrossOrigin(msg) => write!(f, "Cross-origin restriction: {}", msg),
            TranslationError::InvalidLanguage(msg) => write!(f, "Invalid language: {}", msg),
            TranslationError::Config(msg) => write!(f, "Configuration error: {}", msg),
            TranslationError::AllProvidersExhausted => {
                write!(f, "All translation providers exhausted")
            }
        }
    }
}

impl std::error::Error for TranslationError {}

impl From<reqwest::Error> for TranslationError {
    fn from(err: reqwest::Error) -> Self {
        if crate::translation::google::is_cross_origin_failure(&err) {
            TranslationError::CrossOrigin(err.to_string())
        } else if err.is_decode() {
            TranslationError::Protocol(format!("Undecodable response: {}", err))
        } else {
            TranslationError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for TranslationError {
    fn from(err: serde_json::Error) -> Self {
        TranslationError::Protocol(format!("Invalid JSON payload: {}", err))
    }
}

/// Result type for translation operations
pub type TrResult<T> = Result<T, TranslationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            TranslationError::Protocol("code 500".to_string()).to_string(),
            "Protocol failure: code 500"
        );
        assert_eq!(
            TranslationError::AllProvidersExhausted.to_string(),
            "All translation providers exhausted"
        );
    }

    #[test]
    fn test_only_cross_origin_opens_relay() {
        assert!(TranslationError::CrossOrigin("CORS".to_string()).is_cross_origin());
        assert!(!TranslationError::Transport("dns".to_string()).is_cross_origin());
        assert!(!TranslationError::Protocol("403".to_string()).is_cross_origin());
    }

    #[test]
    fn test_json_error_is_protocol_failure() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        match TranslationError::from(err) {
            TranslationError::Protocol(msg) => assert!(msg.contains("Invalid JSON")),
            other => panic!("Expected Protocol, got {:?}", other),
        }
    }
}
