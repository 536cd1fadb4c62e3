use serde::{Deserialize, Serialize};

/// What to do with a key inside `source` that names no known variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownSourcePolicy {
    /// Fail the decode. A manifest written by a newer tool is never read as
    /// a current-format one.
    #[default]
    Reject,
    /// Ignore the key. Exactly one known key must still be present.
    Skip,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodeStyle {
    /// Two-space indentation and a trailing newline, as written to disk.
    #[default]
    Pretty,
    /// Single line, no trailing newline.
    Compact,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeOptions {
    #[serde(default)]
    pub unknown_sources: UnknownSourcePolicy,
}

impl DecodeOptions {
    #[must_use]
    pub fn tolerant() -> Self {
        Self {
            unknown_sources: UnknownSourcePolicy::Skip,
        }
    }

    #[must_use]
    pub fn with_unknown_sources(mut self, policy: UnknownSourcePolicy) -> Self {
        self.unknown_sources = policy;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodeOptions {
    #[serde(default)]
    pub style: EncodeStyle,
}

impl EncodeOptions {
    #[must_use]
    pub fn compact() -> Self {
        Self {
            style: EncodeStyle::Compact,
        }
    }

    #[must_use]
    pub fn with_style(mut self, style: EncodeStyle) -> Self {
        self.style = style;
        self
    }
}
