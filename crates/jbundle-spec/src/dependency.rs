use crate::manifest::{DecodeError, EncodeError};
use crate::options::DecodeOptions;
use crate::source::Source;
use crate::types::{Sum, Version};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::trace;

/// One declared external package: where it lives, which revision is pinned,
/// and the digest its content must match.
///
/// Field order here is the key order written on encode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dependency {
    pub name: String,
    pub source: Source,
    pub version: Version,
    pub sum: Sum,
}

/// A dependency entry as it appears in the `dependencies` array, before the
/// source variant has been selected.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct DependencyWire {
    name: String,
    source: Map<String, Value>,
    version: Version,
    sum: Sum,
}

impl Dependency {
    pub fn new(name: impl Into<String>, source: Source) -> Self {
        Self {
            name: name.into(),
            source,
            version: Version::default(),
            sum: Sum::default(),
        }
    }

    pub fn git(
        name: impl Into<String>,
        remote: impl Into<String>,
        subdir: impl Into<String>,
    ) -> Self {
        Self::new(name, Source::git(remote, subdir))
    }

    pub fn local(name: impl Into<String>, directory: impl Into<String>) -> Self {
        Self::new(name, Source::local(directory))
    }

    #[must_use]
    pub fn with_version(mut self, version: impl Into<Version>) -> Self {
        self.version = version.into();
        self
    }

    #[must_use]
    pub fn with_sum(mut self, sum: impl Into<Sum>) -> Self {
        self.sum = sum.into();
        self
    }

    /// Check that this entry can be written as-is. Only the name is
    /// required; source fields may be empty.
    pub fn validate(&self) -> Result<(), EncodeError> {
        if self.name.is_empty() {
            return Err(EncodeError::EmptyName);
        }
        Ok(())
    }

    /// Turn the `index`-th array element into a dependency.
    pub(crate) fn decode(
        wire: DependencyWire,
        index: usize,
        options: &DecodeOptions,
    ) -> Result<Self, DecodeError> {
        if wire.name.is_empty() {
            return Err(DecodeError::EmptyName { index });
        }
        let source = Source::decode(wire.source, options.unknown_sources, index, &wire.name)?;
        trace!("decoded dependency '{}' from {}", wire.name, source.kind());
        Ok(Self {
            name: wire.name,
            source,
            version: wire.version,
            sum: wire.sum,
        })
    }
}
