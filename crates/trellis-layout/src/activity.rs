#![forbid(unsafe_code)]

//! Retained instances with a visibility flag.
//!
//! Hidden tabs, closed drawers, and popped stack panels keep their internal
//! state by staying in an [`ActivityCache`]: deactivation only flips the
//! visibility flag. An instance is dropped only when its id leaves the valid
//! set passed to [`ActivityCache::retain_ids`].

use std::collections::BTreeMap;

use crate::stack::Visibility;

#[derive(Debug, Clone, PartialEq)]
struct Entry<T> {
    instance: T,
    visibility: Visibility,
}

/// Id-keyed cache of retained instances.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityCache<T> {
    entries: BTreeMap<String, Entry<T>>,
}

impl<T> Default for ActivityCache<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<T> ActivityCache<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// The instance for `id`, created hidden by `create` on first use.
    pub fn get_or_insert_with(&mut self, id: &str, create: impl FnOnce() -> T) -> &mut T {
        &mut self
            .entries
            .entry(id.to_string())
            .or_insert_with(|| hidden_entry(id, create))
            .instance
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&T> {
        self.entries.get(id).map(|entry| &entry.instance)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut T> {
        self.entries.get_mut(id).map(|entry| &mut entry.instance)
    }

    #[must_use]
    pub fn visibility(&self, id: &str) -> Option<Visibility> {
        self.entries.get(id).map(|entry| entry.visibility)
    }

    /// Set one entry's visibility. Returns `false` for unknown ids.
    pub fn set_visible(&mut self, id: &str, visible: bool) -> bool {
        let Some(entry) = self.entries.get_mut(id) else {
            return false;
        };
        entry.visibility = if visible {
            Visibility::Visible
        } else {
            Visibility::Hidden
        };
        true
    }

    /// Show `id` and hide every other entry, creating `id` when missing.
    pub fn activate(&mut self, id: &str, create: impl FnOnce() -> T) -> &mut T {
        for entry in self.entries.values_mut() {
            entry.visibility = Visibility::Hidden;
        }
        let entry = self
            .entries
            .entry(id.to_string())
            .or_insert_with(|| hidden_entry(id, create));
        entry.visibility = Visibility::Visible;
        &mut entry.instance
    }

    /// Drop every entry whose id is not in `valid`.
    pub fn retain_ids<'a>(&mut self, valid: impl IntoIterator<Item = &'a str>) {
        let valid: Vec<&str> = valid.into_iter().collect();
        self.entries.retain(|id, _| {
            let keep = valid.contains(&id.as_str());
            if !keep {
                tracing::debug!(message = "activity.drop", id = %id);
            }
            keep
        });
    }

    /// Ids in key order with their visibility.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T, Visibility)> + '_ {
        self.entries
            .iter()
            .map(|(id, entry)| (id.as_str(), &entry.instance, entry.visibility))
    }
}

fn hidden_entry<T>(id: &str, create: impl FnOnce() -> T) -> Entry<T> {
    tracing::debug!(message = "activity.create", id);
    Entry {
        instance: create(),
        visibility: Visibility::Hidden,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deactivation_keeps_instances() {
        let mut cache = ActivityCache::new();
        *cache.activate("a", || 0) += 1;
        cache.activate("b", || 10);
        assert_eq!(cache.visibility("a"), Some(Visibility::Hidden));
        assert_eq!(cache.visibility("b"), Some(Visibility::Visible));

        let a = cache.activate("a", || unreachable!("a is retained"));
        assert_eq!(*a, 1);
        assert_eq!(cache.visibility("b"), Some(Visibility::Hidden));
    }

    #[test]
    fn retain_ids_drops_only_removed() {
        let mut cache = ActivityCache::new();
        for id in ["a", "b", "c"] {
            cache.get_or_insert_with(id, || id.len());
        }
        cache.retain_ids(["a", "c"]);
        assert_eq!(cache.len(), 2);
        assert!(!cache.contains("b"));
        assert_eq!(cache.iter().map(|(id, _, _)| id).collect::<Vec<_>>(), ["a", "c"]);
    }

    #[test]
    fn new_entries_start_hidden() {
        let mut cache: ActivityCache<()> = ActivityCache::new();
        cache.get_or_insert_with("x", || ());
        assert_eq!(cache.visibility("x"), Some(Visibility::Hidden));
        assert!(cache.set_visible("x", true));
        assert!(!cache.set_visible("y", true));
    }
}
