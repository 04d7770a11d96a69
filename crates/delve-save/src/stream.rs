//! Ordered save streams.
//!
//! A [`GameSaver`] appends one `serde_json::Value` per saved field. A
//! [`GameLoader`] walks the same entries front to back. The format carries no
//! field names or lengths of its own: readers must consume values in exactly
//! the order writers produced them.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::SaveError;

// ---------------------------------------------------------------------------
// GameSaver
// ---------------------------------------------------------------------------

/// Append-only writer for a save stream.
#[derive(Debug, Default)]
pub struct GameSaver {
    entries: Vec<Value>,
    /// Names of the currently open debug categories, outermost first.
    categories: Vec<String>,
}

impl GameSaver {
    /// Create an empty saver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one value to the stream.
    pub fn save<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), SaveError> {
        let entry = serde_json::to_value(value).map_err(|e| SaveError::Unserializable {
            type_name: std::any::type_name::<T>(),
            details: e.to_string(),
        })?;
        self.entries.push(entry);
        Ok(())
    }

    /// Append a type tag ahead of a polymorphic object's body.
    pub fn save_tag(&mut self, tag: &str) -> Result<(), SaveError> {
        self.save(tag)
    }

    /// Run `body` inside a named debug category.
    ///
    /// Categories are not written to the stream. They only scope the trace
    /// output so a mismatched reader can be traced back to the writer that
    /// produced the entries.
    pub fn scoped<F>(&mut self, category: &str, body: F) -> Result<(), SaveError>
    where
        F: FnOnce(&mut Self) -> Result<(), SaveError>,
    {
        let start = self.entries.len();
        self.categories.push(category.to_owned());
        let result = body(self);
        self.categories.pop();
        tracing::trace!(
            category,
            depth = self.categories.len(),
            first_entry = start,
            entries = self.entries.len() - start,
            "saved category"
        );
        result
    }

    /// Number of entries written so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entries written so far.
    pub fn entries(&self) -> &[Value] {
        &self.entries
    }

    /// Consume the saver and return its entries.
    pub fn into_entries(self) -> Vec<Value> {
        self.entries
    }
}

// ---------------------------------------------------------------------------
// GameLoader
// ---------------------------------------------------------------------------

/// Sequential reader over the entries of a save stream.
#[derive(Debug, Clone)]
pub struct GameLoader<'a> {
    entries: &'a [Value],
    cursor: usize,
}

impl<'a> GameLoader<'a> {
    /// Create a loader positioned at the first entry.
    pub fn new(entries: &'a [Value]) -> Self {
        Self { entries, cursor: 0 }
    }

    /// Read the next value.
    ///
    /// # Errors
    ///
    /// [`SaveError::UnexpectedEnd`] when the stream is exhausted, or
    /// [`SaveError::Malformed`] when the entry does not deserialize into `T`.
    pub fn load<T: DeserializeOwned>(&mut self) -> Result<T, SaveError> {
        let expected = std::any::type_name::<T>();
        let entry = self
            .entries
            .get(self.cursor)
            .ok_or(SaveError::UnexpectedEnd {
                position: self.cursor,
                expected,
            })?;
        let value = T::deserialize(entry).map_err(|e| SaveError::Malformed {
            position: self.cursor,
            expected,
            details: e.to_string(),
        })?;
        self.cursor += 1;
        Ok(value)
    }

    /// Read a type tag written by [`GameSaver::save_tag`].
    pub fn load_tag(&mut self) -> Result<String, SaveError> {
        self.load()
    }

    /// Index of the next entry to be read.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Number of entries not yet read.
    pub fn remaining(&self) -> usize {
        self.entries.len() - self.cursor
    }

    /// Whether every entry has been read.
    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Stairs {
        x: i32,
        y: i32,
    }

    #[test]
    fn values_read_back_in_write_order() {
        let mut saver = GameSaver::new();
        saver.save(&3u32).unwrap();
        saver.save(&true).unwrap();
        saver.save(&Stairs { x: 25, y: 29 }).unwrap();

        let entries = saver.into_entries();
        let mut loader = GameLoader::new(&entries);
        assert_eq!(loader.load::<u32>().unwrap(), 3);
        assert!(loader.load::<bool>().unwrap());
        assert_eq!(loader.load::<Stairs>().unwrap(), Stairs { x: 25, y: 29 });
        assert!(loader.is_exhausted());
    }

    #[test]
    fn reading_past_the_end_fails() {
        let entries: Vec<Value> = Vec::new();
        let mut loader = GameLoader::new(&entries);
        let err = loader.load::<u32>().unwrap_err();
        assert!(matches!(err, SaveError::UnexpectedEnd { position: 0, .. }));
    }

    #[test]
    fn type_mismatch_is_malformed_and_does_not_advance() {
        let mut saver = GameSaver::new();
        saver.save("not a number").unwrap();
        let entries = saver.into_entries();

        let mut loader = GameLoader::new(&entries);
        let err = loader.load::<u32>().unwrap_err();
        assert!(matches!(err, SaveError::Malformed { position: 0, .. }));
        assert_eq!(loader.position(), 0);
        assert_eq!(loader.load_tag().unwrap(), "not a number");
    }

    #[test]
    fn scoped_categories_do_not_write_entries() {
        let mut saver = GameSaver::new();
        saver
            .scoped("Level", |s| {
                s.save(&1u8)?;
                s.scoped("Actor", |s| s.save(&2u8))
            })
            .unwrap();
        assert_eq!(saver.len(), 2);
        assert!(saver.categories.is_empty());
    }

    #[test]
    fn scoped_propagates_errors() {
        let mut saver = GameSaver::new();
        let result = saver.scoped("Broken", |_| {
            Err(SaveError::UnexpectedEnd {
                position: 0,
                expected: "u8",
            })
        });
        assert!(result.is_err());
        assert!(saver.is_empty());
    }
}
