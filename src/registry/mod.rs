//! Registries of extensible entries.
//!
//! - [`Registry`]: an id-keyed catalog of items (matchers, transformers,
//!   reducers). Lookups are by string id, with optional aliases.
//! - [`ReactiveRegistry`]: folds externally contributed items into
//!   immutable snapshots and publishes them to subscribers.
//! - [`Catalog`]: one snapshot of every registry the pipeline needs, plus
//!   the [`CatalogRegistry`] that plugins contribute to.

pub mod catalog;
pub mod error;
pub mod reactive;

pub use catalog::{Catalog, CatalogFold, CatalogRegistry, Contribution};
pub use error::{RegistryError, RegistryResult};
pub use reactive::{ReactiveRegistry, RegistryFold, Subscription};

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Common metadata every registry entry exposes.
pub trait RegistryItem: Send + Sync {
    /// Unique identifier, used in saved configs.
    fn id(&self) -> &str;

    /// Human-readable name.
    fn name(&self) -> &str;

    /// Longer description for pickers.
    fn description(&self) -> &str {
        ""
    }

    /// Alternative ids that resolve to this entry (renamed ids).
    fn aliases(&self) -> &[&'static str] {
        &[]
    }

    /// Hide from UI pickers while keeping it resolvable.
    fn exclude_from_picker(&self) -> bool {
        false
    }
}

/// Entry shown in a UI picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub description: String,
}

/// An id-keyed collection of items, kept in registration order.
///
/// Items are stored behind `Arc`, so cloning a registry is cheap and clones
/// share the same entries.
pub struct Registry<T: ?Sized> {
    items: Vec<Arc<T>>,
    by_id: HashMap<String, usize>,
}

impl<T: RegistryItem + ?Sized> Registry<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            by_id: HashMap::new(),
        }
    }

    /// Build a registry from built-in items. A duplicate id is a programming
    /// error: it fails debug builds and is logged in release builds.
    pub fn from_builtins(items: impl IntoIterator<Item = Arc<T>>) -> Self {
        let mut registry = Self::new();
        for item in items {
            if let Err(e) = registry.register(item) {
                tracing::error!("Built-in registry entry dropped: {}", e);
                debug_assert!(false, "built-in registry entry dropped: {}", e);
            }
        }
        registry
    }

    /// Add an item. Fails if its id or any alias is already taken.
    pub fn register(&mut self, item: Arc<T>) -> RegistryResult<()> {
        let ids: Vec<&str> = std::iter::once(item.id())
            .chain(item.aliases().iter().copied())
            .collect();
        if let Some(taken) = ids.iter().find(|id| self.by_id.contains_key(**id)) {
            return Err(RegistryError::DuplicateId(taken.to_string()));
        }

        let index = self.items.len();
        for id in ids {
            self.by_id.insert(id.to_string(), index);
        }
        self.items.push(item);
        Ok(())
    }

    /// Look up an item by id or alias.
    pub fn get(&self, id: &str) -> RegistryResult<&Arc<T>> {
        self.get_if_exists(id)
            .ok_or_else(|| RegistryError::UnknownId(id.to_string()))
    }

    pub fn get_if_exists(&self, id: &str) -> Option<&Arc<T>> {
        self.by_id.get(id).map(|&index| &self.items[index])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// All items in registration order.
    pub fn list(&self) -> &[Arc<T>] {
        &self.items
    }

    /// Items for the given ids, in the given order, skipping unknown ids.
    pub fn list_ids(&self, ids: &[&str]) -> Vec<Arc<T>> {
        ids.iter()
            .filter_map(|id| self.get_if_exists(id).cloned())
            .collect()
    }

    /// Picker entries, excluding hidden items.
    pub fn select_options(&self) -> Vec<SelectOption> {
        self.items
            .iter()
            .filter(|item| !item.exclude_from_picker())
            .map(|item| SelectOption {
                value: item.id().to_string(),
                label: item.name().to_string(),
                description: item.description().to_string(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: RegistryItem + ?Sized> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> Clone for Registry<T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            by_id: self.by_id.clone(),
        }
    }
}

impl<T: RegistryItem + ?Sized> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.items.iter().map(|item| item.id()))
            .finish()
    }
}
