//! Sealed save files with BLAKE3 integrity hashing.
//!
//! A [`SaveFile`] wraps the entries of a finished [`GameSaver`] together with
//! the format version and a BLAKE3 hex digest of both. Loading always verifies
//! the digest first, so a truncated or edited save is rejected before any
//! object is rebuilt from it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::stream::{GameLoader, GameSaver};
use crate::SaveError;

/// Version written into every new save file.
pub const SAVE_FORMAT_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Hashing helpers
// ---------------------------------------------------------------------------

/// BLAKE3 hex digest of a sequence of stream entries.
///
/// Used both for save files and for comparing live state between runs.
pub fn content_hash(entries: &[Value]) -> String {
    hash_with_version(SAVE_FORMAT_VERSION, entries)
}

fn hash_with_version(format_version: u32, entries: &[Value]) -> String {
    #[derive(Serialize)]
    struct HashableSave<'a> {
        format_version: u32,
        entries: &'a [Value],
    }

    let json_bytes = serde_json::to_vec(&HashableSave {
        format_version,
        entries,
    })
    .expect("save entries are JSON values and always serialize");

    blake3::hash(&json_bytes).to_hex().to_string()
}

// ---------------------------------------------------------------------------
// SaveFile
// ---------------------------------------------------------------------------

/// A complete, self-verifying save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveFile {
    /// Format version the entries were written with.
    pub format_version: u32,
    /// The ordered stream entries.
    pub entries: Vec<Value>,
    /// BLAKE3 hex digest (64 lowercase hex chars) of version + entries.
    pub hash: String,
}

impl SaveFile {
    /// Seal the entries of a finished saver.
    pub fn seal(saver: GameSaver) -> Self {
        let entries = saver.into_entries();
        let hash = hash_with_version(SAVE_FORMAT_VERSION, &entries);
        Self {
            format_version: SAVE_FORMAT_VERSION,
            entries,
            hash,
        }
    }

    /// Check the version and recompute the digest.
    pub fn verify(&self) -> Result<(), SaveError> {
        if self.format_version != SAVE_FORMAT_VERSION {
            return Err(SaveError::UnsupportedVersion {
                found: self.format_version,
                supported: SAVE_FORMAT_VERSION,
            });
        }
        let computed = hash_with_version(self.format_version, &self.entries);
        if computed != self.hash {
            return Err(SaveError::HashMismatch {
                recorded: self.hash.clone(),
                computed,
            });
        }
        Ok(())
    }

    /// Verify the file and return a loader positioned at its first entry.
    pub fn loader(&self) -> Result<GameLoader<'_>, SaveError> {
        self.verify()?;
        Ok(GameLoader::new(&self.entries))
    }

    /// Serialize the whole file to a JSON string.
    pub fn to_json(&self) -> Result<String, SaveError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a file previously produced by [`to_json`](Self::to_json).
    ///
    /// The digest is not checked here; [`loader`](Self::loader) does that.
    pub fn from_json(json: &str) -> Result<Self, SaveError> {
        Ok(serde_json::from_str(json)?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
