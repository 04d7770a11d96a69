//! Delve Save -- order-sensitive save streams with tag-dispatched object
//! reconstruction.
//!
//! A save is a flat, ordered sequence of serialized values. Writers append
//! values with [`GameSaver`](stream::GameSaver) and readers consume them in the
//! same order with [`GameLoader`](stream::GameLoader). Polymorphic objects are
//! written as a type tag followed by their own fields; on load, a
//! [`FactoryRegistry`](registry::FactoryRegistry) maps the tag back to the
//! function that rebuilds the concrete variant.
//!
//! # Quick Start
//!
//! ```
//! use delve_save::prelude::*;
//!
//! #[derive(Debug, PartialEq)]
//! enum Shape {
//!     Dot,
//!     Square(u32),
//! }
//!
//! let mut registry: FactoryRegistry<Shape> = FactoryRegistry::new();
//! registry.register("dot", |_loader, _registry| Ok(Shape::Dot));
//! registry.register("square", |loader, _registry| Ok(Shape::Square(loader.load()?)));
//!
//! let mut saver = GameSaver::new();
//! saver.save_tag("square").unwrap();
//! saver.save(&7u32).unwrap();
//!
//! let file = SaveFile::seal(saver);
//! let mut loader = file.loader().unwrap();
//! let shape = registry.load_tagged(&mut loader).unwrap();
//! assert_eq!(shape, Shape::Square(7));
//! ```

#![deny(unsafe_code)]

pub mod file;
pub mod registry;
pub mod stream;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced while writing or reading a save stream.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    /// A tagged object was read whose tag has no registered factory.
    #[error("unknown type tag '{tag}'. Registered tags: [{registered}]")]
    UnknownTypeTag { tag: String, registered: String },

    /// The stream ended before the reader got the value it expected.
    #[error("save stream ended at entry {position} while reading {expected}")]
    UnexpectedEnd {
        position: usize,
        expected: &'static str,
    },

    /// The value at `position` does not have the shape the reader expected.
    #[error("malformed save entry {position} (expected {expected}): {details}")]
    Malformed {
        position: usize,
        expected: &'static str,
        details: String,
    },

    /// A value could not be converted into a stream entry.
    #[error("value of type {type_name} cannot be saved: {details}")]
    Unserializable {
        type_name: &'static str,
        details: String,
    },

    /// The recorded content hash does not match the entries.
    #[error("save hash mismatch: recorded {recorded} but recomputed {computed}")]
    HashMismatch { recorded: String, computed: String },

    /// The save was written by an incompatible format version.
    #[error("unsupported save format version {found} (supported: {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// The save file envelope itself could not be (de)serialized.
    #[error("save file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::file::{content_hash, SaveFile, SAVE_FORMAT_VERSION};
    pub use crate::registry::{Factory, FactoryRegistry, Persist};
    pub use crate::stream::{GameLoader, GameSaver};
    pub use crate::SaveError;
}
