//! Type-tag registry for polymorphic reconstruction.
//!
//! Every polymorphic type that can appear in a save registers a factory under
//! a stable tag. Writers emit the tag ahead of the object's body via
//! [`Persist::save_tagged`]; readers call
//! [`FactoryRegistry::load_tagged`] and get back the concrete variant without
//! a compile-time type switch.
//!
//! Registration must complete before the first load. A registry that has
//! never seen a tag rejects it with [`SaveError::UnknownTypeTag`]; nothing is
//! ever skipped silently.

use std::collections::BTreeMap;
use std::fmt;

use crate::stream::{GameLoader, GameSaver};
use crate::SaveError;

// ---------------------------------------------------------------------------
// Persist
// ---------------------------------------------------------------------------

/// A polymorphic object that writes itself to a save stream.
pub trait Persist {
    /// Stable tag identifying the concrete variant in saves.
    fn type_tag(&self) -> &'static str;

    /// Write the object's own fields (not its tag).
    fn save(&self, saver: &mut GameSaver) -> Result<(), SaveError>;

    /// Write the tag followed by the object's fields.
    fn save_tagged(&self, saver: &mut GameSaver) -> Result<(), SaveError> {
        saver.save_tag(self.type_tag())?;
        self.save(saver)
    }
}

// ---------------------------------------------------------------------------
// FactoryRegistry
// ---------------------------------------------------------------------------

/// Type-erased reconstruction function for one tag.
///
/// Factories receive the registry itself so that objects owning other
/// polymorphic objects (an actor owning its behaviour) can load them
/// recursively.
pub type Factory<O> =
    Box<dyn Fn(&mut GameLoader<'_>, &FactoryRegistry<O>) -> Result<O, SaveError> + Send + Sync>;

/// Maps type tags to the factories that rebuild them.
pub struct FactoryRegistry<O> {
    /// Ordered by tag so error messages list tags deterministically.
    factories: BTreeMap<String, Factory<O>>,
}

impl<O> FactoryRegistry<O> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Register the factory for `tag`.
    ///
    /// # Panics
    ///
    /// Panics if `tag` is already registered.
    pub fn register<F>(&mut self, tag: &str, factory: F)
    where
        F: Fn(&mut GameLoader<'_>, &FactoryRegistry<O>) -> Result<O, SaveError>
            + Send
            + Sync
            + 'static,
    {
        assert!(
            !self.factories.contains_key(tag),
            "type tag '{tag}' is already registered"
        );
        tracing::debug!(tag, "registered save factory");
        self.factories.insert(tag.to_owned(), Box::new(factory));
    }

    /// Whether a factory exists for `tag`.
    pub fn is_registered(&self, tag: &str) -> bool {
        self.factories.contains_key(tag)
    }

    /// All registered tags, sorted.
    pub fn registered_tags(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    /// Number of registered tags.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Whether no tag has been registered.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Rebuild the object for `tag` from the loader's current position.
    ///
    /// # Errors
    ///
    /// [`SaveError::UnknownTypeTag`] when `tag` has no factory, or whatever
    /// the factory itself reports.
    pub fn instantiate(&self, tag: &str, loader: &mut GameLoader<'_>) -> Result<O, SaveError> {
        let factory = self
            .factories
            .get(tag)
            .ok_or_else(|| SaveError::UnknownTypeTag {
                tag: tag.to_owned(),
                registered: self.registered_tags().join(", "),
            })?;
        factory(loader, self)
    }

    /// Read a tag, then rebuild the object it names.
    pub fn load_tagged(&self, loader: &mut GameLoader<'_>) -> Result<O, SaveError> {
        let tag = loader.load_tag()?;
        self.instantiate(&tag, loader)
    }
}

impl<O> Default for FactoryRegistry<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O> fmt::Debug for FactoryRegistry<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryRegistry")
            .field("tags", &self.registered_tags())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
