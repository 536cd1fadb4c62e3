use crate::dependency::{Dependency, DependencyWire};
use crate::ordered::{Iter, OrderedMap};
use crate::options::{DecodeOptions, EncodeOptions, EncodeStyle};
use crate::source::SourceKind;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to parse manifest: {0}")]
    Json(#[from] serde_json::Error),
    #[error("dependencies[{index}]: name must not be empty")]
    EmptyName { index: usize },
    #[error("dependencies[{index}] '{name}': source has no recognized kind (expected one of: git, local)")]
    EmptySource { index: usize, name: String },
    #[error("dependencies[{index}] '{name}': source has several kinds ({keys}), expected exactly one")]
    AmbiguousSource {
        index: usize,
        name: String,
        keys: String,
    },
    #[error("dependencies[{index}] '{name}': unknown source kind '{key}'")]
    UnknownSource {
        index: usize,
        name: String,
        key: String,
    },
    #[error("dependencies[{index}] '{name}': invalid {kind} source: {error}")]
    InvalidSource {
        index: usize,
        name: String,
        kind: SourceKind,
        #[source]
        error: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("dependency name must not be empty")]
    EmptyName,
    #[error("dependency stored under '{key}' is named '{name}'")]
    NameMismatch { key: String, name: String },
    #[error("failed to serialize manifest: {0}")]
    Json(#[from] serde_json::Error),
    #[error("encoded manifest is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// The declared dependencies of a package, in declaration order.
///
/// Entries are looked up by name but always iterate (and encode) in the order
/// they were first inserted. Replacing an entry keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    dependencies: OrderedMap<Dependency>,
}

/// Unknown fields are rejected here and on every entry and source payload;
/// unknown `source` kinds follow [`UnknownSourcePolicy`](crate::UnknownSourcePolicy).
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestWire {
    #[serde(default)]
    dependencies: Vec<DependencyWire>,
}

#[derive(Serialize)]
struct ManifestRef<'a> {
    dependencies: Vec<&'a Dependency>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry for `name`.
    ///
    /// A new name is appended; an existing one is replaced in place. Returns
    /// the previous entry, if any. `dependency.name` should equal `name`;
    /// [`Manifest::encode`] refuses manifests where it does not.
    pub fn set(&mut self, name: impl Into<String>, dependency: Dependency) -> Option<Dependency> {
        self.dependencies.insert(name.into(), dependency)
    }

    /// Insert or replace under the dependency's own name.
    pub fn insert(&mut self, dependency: Dependency) -> Option<Dependency> {
        let name = dependency.name.clone();
        self.set(name, dependency)
    }

    pub fn get(&self, name: &str) -> Option<&Dependency> {
        self.dependencies.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Dependency> {
        self.dependencies.get_mut(name)
    }

    /// Remove the entry for `name`. Absent names are a no-op.
    pub fn remove(&mut self, name: &str) -> Option<Dependency> {
        self.dependencies.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.dependencies.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.dependencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, Dependency> {
        self.dependencies.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.dependencies.keys()
    }

    /// Check every entry, and that each is stored under its own name.
    pub fn validate(&self) -> Result<(), EncodeError> {
        for (key, dep) in self.iter() {
            dep.validate()?;
            if key != dep.name {
                return Err(EncodeError::NameMismatch {
                    key: key.to_owned(),
                    name: dep.name.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::decode_with(bytes, &DecodeOptions::default())
    }

    /// Parse a manifest. Either every entry decodes or nothing is returned.
    pub fn decode_with(bytes: &[u8], options: &DecodeOptions) -> Result<Self, DecodeError> {
        let wire: ManifestWire = serde_json::from_slice(bytes)?;
        let manifest = Self::from_wire(wire, options)?;
        debug!(
            "decoded manifest with {} dependencies ({} bytes)",
            manifest.len(),
            bytes.len()
        );
        Ok(manifest)
    }

    fn from_wire(wire: ManifestWire, options: &DecodeOptions) -> Result<Self, DecodeError> {
        let mut manifest = Manifest::new();
        for (index, entry) in wire.dependencies.into_iter().enumerate() {
            let dep = Dependency::decode(entry, index, options)?;
            if manifest.insert(dep).is_some() {
                warn!("dependencies[{index}]: duplicate name replaces earlier entry");
            }
        }
        Ok(manifest)
    }

    fn to_wire(&self) -> Result<ManifestRef<'_>, EncodeError> {
        self.validate()?;
        Ok(ManifestRef {
            dependencies: self.dependencies.values().collect(),
        })
    }

    pub fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        self.encode_with(&EncodeOptions::default())
    }

    pub fn encode_with(&self, options: &EncodeOptions) -> Result<Vec<u8>, EncodeError> {
        let wire = self.to_wire()?;
        let bytes = match options.style {
            EncodeStyle::Pretty => {
                let mut out = serde_json::to_vec_pretty(&wire)?;
                out.push(b'\n');
                out
            }
            EncodeStyle::Compact => serde_json::to_vec(&wire)?,
        };
        debug!(
            "encoded manifest with {} dependencies ({} bytes)",
            self.len(),
            bytes.len()
        );
        Ok(bytes)
    }

    /// Pretty-printed JSON, as written to disk.
    pub fn to_json_string(&self) -> Result<String, EncodeError> {
        let bytes = self.encode_with(&EncodeOptions::default())?;
        Ok(String::from_utf8(bytes)?)
    }
}

impl FromStr for Manifest {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s.as_bytes())
    }
}

impl<'a> IntoIterator for &'a Manifest {
    type Item = (&'a str, &'a Dependency);
    type IntoIter = Iter<'a, Dependency>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Dependency> for Manifest {
    fn from_iter<I: IntoIterator<Item = Dependency>>(iter: I) -> Self {
        let mut manifest = Manifest::new();
        manifest.extend(iter);
        manifest
    }
}

impl Extend<Dependency> for Manifest {
    fn extend<I: IntoIterator<Item = Dependency>>(&mut self, iter: I) {
        for dep in iter {
            self.insert(dep);
        }
    }
}

impl Serialize for Manifest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_wire()
            .map_err(<S::Error as serde::ser::Error>::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Manifest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = ManifestWire::deserialize(deserializer)?;
        Self::from_wire(wire, &DecodeOptions::default())
            .map_err(<D::Error as serde::de::Error>::custom)
    }
}
