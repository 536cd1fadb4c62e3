//! Data model and JSON codec for Jsonnet dependency manifests.
//!
//! A manifest (`jsonnetfile.json` or its lock file) lists named dependencies,
//! each pinned to a [`Source`], a [`Version`] and a content [`Sum`]. This crate
//! only covers the in-memory model and its wire format: [`Manifest::decode`]
//! and [`Manifest::encode`] round-trip a document without reordering its
//! entries, and source kinds are told apart by which key the `source` object
//! holds. Fetching, checksumming and file I/O belong to callers.

pub mod dependency;
pub mod manifest;
pub mod options;
pub mod ordered;
pub mod source;
pub mod types;

pub use dependency::Dependency;
pub use manifest::{DecodeError, EncodeError, Manifest};
pub use options::{DecodeOptions, EncodeOptions, EncodeStyle, UnknownSourcePolicy};
pub use ordered::{Iter, OrderedMap};
pub use source::{GitSource, LocalSource, Source, SourceKind};
pub use types::{Sum, Version};
