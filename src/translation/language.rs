//! Language codes and the request/result types of the pipeline
//!
//! Providers disagree on casing: the DeepLX endpoint wants `EN`/`NL`, the
//! Google endpoints want `en`/`nl`. `Language` stores the canonical lower-case
//! ISO-639-1 code and hands out whichever form a provider needs.
//!
//! # Example
//!
//! ```ignore
//! use dutch_conquerors::translation::{Language, TranslationRequest};
//!
//! let nl: Language = "nl-BE".parse()?;
//! assert_eq!(nl.as_upper(), "NL");
//! let request = TranslationRequest::new("ship", Language::english(), nl);
//! ```

use crate::translation::error::{TrResult, TranslationError};
use icu_locale::Locale;
use std::fmt;
use std::str::FromStr;

/// A validated ISO-639-1 language code
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Language(String);

impl Language {
    /// Parse and validate a language code
    ///
    /// Accepts any well-formed BCP 47 tag whose language subtag is a two-letter
    /// ISO-639-1 code. Region and script are dropped: `nl-BE` → `nl`.
    pub fn new(code: &str) -> TrResult<Self> {
        let code = code.trim();
        if code.is_empty() {
            return Err(TranslationError::InvalidLanguage(
                "Language code is empty".to_string(),
            ));
        }

        let locale: Locale = code.parse().map_err(|_| {
            TranslationError::InvalidLanguage(format!("Malformed language code: {}", code))
        })?;

        let language = locale.id.language.as_str();
        if language.len() != 2 {
            return Err(TranslationError::InvalidLanguage(format!(
                "Not an ISO-639-1 code: {}",
                code
            )));
        }

        Ok(Self(language.to_ascii_lowercase()))
    }

    pub fn english() -> Self {
        Self("en".to_string())
    }

    pub fn dutch() -> Self {
        Self("nl".to_string())
    }

    /// Lower-case form, as sent to Google (`nl`)
    pub fn as_lower(&self) -> &str {
        &self.0
    }

    /// Upper-case form, as sent to DeepLX (`NL`)
    pub fn as_upper(&self) -> String {
        self.0.to_ascii_uppercase()
    }

    pub fn is_dutch(&self) -> bool {
        self.0 == "nl"
    }
}

impl FromStr for Language {
    type Err = TranslationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_upper())
    }
}

/// One word (or phrase) to translate between two languages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub text: String,
    pub source: Language,
    pub target: Language,
}

impl TranslationRequest {
    pub fn new(text: impl Into<String>, source: Language, target: Language) -> Self {
        Self {
            text: text.into(),
            source,
            target,
        }
    }

    /// Whether the text is blank and must not be sent to any provider
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Key used by the local dictionary: trimmed and lower-cased
    pub fn lookup_key(&self) -> String {
        self.text.trim().to_lowercase()
    }
}

/// Outcome of resolving one request. Failure is a value, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationResult {
    Translated { text: String },
    NotFound,
}

impl TranslationResult {
    pub fn translated(text: impl Into<String>) -> Self {
        TranslationResult::Translated { text: text.into() }
    }

    pub fn is_translated(&self) -> bool {
        matches!(self, TranslationResult::Translated { .. })
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            TranslationResult::Translated { text } => Some(text),
            TranslationResult::NotFound => None,
        }
    }

    pub fn into_option(self) -> Option<String> {
        match self {
            TranslationResult::Translated { text } => Some(text),
            TranslationResult::NotFound => None,
        }
    }
}
