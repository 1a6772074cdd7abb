//! Request model shared by the client and the gateway.

/// Language tag accepted by the Space.
///
/// The Space expects the capitalized form, which [`Language::as_str`]
/// produces. Parsing is case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Kannada,
    English,
}

impl Language {
    /// Parses a user-supplied tag, ignoring case and surrounding whitespace.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "kannada" => Some(Language::Kannada),
            "english" => Some(Language::English),
            _ => None,
        }
    }

    /// The capitalized form forwarded to the Space.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Kannada => "Kannada",
            Language::English => "English",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One similarity comparison to run against the Space.
///
/// Texts are expected to be non-empty after cleanup; the gateway enforces
/// that before constructing a request.
#[derive(Debug, Clone)]
pub struct ComparisonRequest {
    pub language: Language,
    pub text_a: String,
    pub text_b: String,
}
