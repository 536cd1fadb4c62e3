//! Where a dependency's content comes from.
//!
//! On the wire a source is an object holding exactly one key, and that key
//! selects the variant: `{"git": {...}}` or `{"local": {...}}`. There is no
//! separate type field.

use crate::manifest::DecodeError;
use crate::options::UnknownSourcePolicy;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Git(GitSource),
    Local(LocalSource),
}

/// A subtree of a git repository.
///
/// Missing fields decode as empty strings; neither field is checked here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GitSource {
    #[serde(default)]
    pub remote: String,
    /// Path of the package root inside the repository. Empty means the
    /// repository root.
    #[serde(default)]
    pub subdir: String,
}

/// A directory on the local filesystem, relative to the manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocalSource {
    #[serde(default)]
    pub directory: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Git,
    Local,
}

impl SourceKind {
    pub const ALL: [SourceKind; 2] = [SourceKind::Git, SourceKind::Local];

    /// The key this variant occupies inside a `source` object.
    pub fn key(self) -> &'static str {
        match self {
            SourceKind::Git => "git",
            SourceKind::Local => "local",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl Source {
    pub fn git(remote: impl Into<String>, subdir: impl Into<String>) -> Self {
        Source::Git(GitSource {
            remote: remote.into(),
            subdir: subdir.into(),
        })
    }

    pub fn local(directory: impl Into<String>) -> Self {
        Source::Local(LocalSource {
            directory: directory.into(),
        })
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            Source::Git(_) => SourceKind::Git,
            Source::Local(_) => SourceKind::Local,
        }
    }

    pub fn as_git(&self) -> Option<&GitSource> {
        match self {
            Source::Git(git) => Some(git),
            Source::Local(_) => None,
        }
    }

    pub fn as_local(&self) -> Option<&LocalSource> {
        match self {
            Source::Local(local) => Some(local),
            Source::Git(_) => None,
        }
    }

    /// Select and decode the single variant present in a `source` object.
    ///
    /// `index` and `name` identify the owning entry in error messages.
    pub(crate) fn decode(
        object: Map<String, Value>,
        policy: UnknownSourcePolicy,
        index: usize,
        name: &str,
    ) -> Result<Self, DecodeError> {
        let mut found: Vec<(SourceKind, Value)> = Vec::with_capacity(1);
        for (key, value) in object {
            match SourceKind::from_key(&key) {
                Some(kind) => found.push((kind, value)),
                None if policy == UnknownSourcePolicy::Skip => {
                    warn!("dependency '{name}': skipping unknown source kind '{key}'");
                }
                None => {
                    return Err(DecodeError::UnknownSource {
                        index,
                        name: name.to_owned(),
                        key,
                    });
                }
            }
        }

        if found.len() > 1 {
            return Err(DecodeError::AmbiguousSource {
                index,
                name: name.to_owned(),
                keys: found
                    .iter()
                    .map(|(kind, _)| kind.key())
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        }
        let Some((kind, payload)) = found.pop() else {
            return Err(DecodeError::EmptySource {
                index,
                name: name.to_owned(),
            });
        };

        let invalid = |error| DecodeError::InvalidSource {
            index,
            name: name.to_owned(),
            kind,
            error,
        };
        Ok(match kind {
            SourceKind::Git => Source::Git(serde_json::from_value(payload).map_err(invalid)?),
            SourceKind::Local => Source::Local(serde_json::from_value(payload).map_err(invalid)?),
        })
    }
}
