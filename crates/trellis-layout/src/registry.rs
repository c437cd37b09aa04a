#![forbid(unsafe_code)]

//! Geometry registry: last-measured bounding boxes and element handles for
//! tabs, tab bars, groups, drop targets, layers, and track handles.
//!
//! The host measures entities after every commit and reports the boxes here;
//! interaction code reads them back for hit testing.
//!
//! # Invariants
//!
//! 1. A rect measured before the last [`GeometryRegistry::invalidate`] is
//!    never returned.
//! 2. Element handles survive invalidation; only `unregister` drops them.
//!
//! # Failure Modes
//!
//! - Measuring an unregistered key registers it without an element handle.
//! - Non-finite rects are ignored.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use trellis_core::geometry::{Point, Rect};

use crate::grid::TrackHandle;
use crate::layer::LayerId;
use crate::panel::{GroupId, TabId};

/// Opaque host element reference (DOM node, widget id, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementHandle(pub u64);

/// Registered entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityKey {
    Tab(TabId),
    TabBar(GroupId),
    Group(GroupId),
    DropTarget(GroupId),
    Layer(LayerId),
    TrackHandle(TrackHandle),
}

impl EntityKey {
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Tab(_) => EntityKind::Tab,
            Self::TabBar(_) => EntityKind::TabBar,
            Self::Group(_) => EntityKind::Group,
            Self::DropTarget(_) => EntityKind::DropTarget,
            Self::Layer(_) => EntityKind::Layer,
            Self::TrackHandle(_) => EntityKind::TrackHandle,
        }
    }
}

/// Discriminant of [`EntityKey`], used to filter hit tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    Tab,
    TabBar,
    Group,
    DropTarget,
    Layer,
    TrackHandle,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    element: Option<ElementHandle>,
    rect: Option<Rect>,
    epoch: u64,
    /// Bumped on every measurement of this entry.
    generation: u64,
    /// Global measurement order, for tie-breaking.
    sequence: u64,
}

/// Per-entity geometry cache.
#[derive(Debug, Clone, Default)]
pub struct GeometryRegistry {
    entries: FxHashMap<EntityKey, Entry>,
    epoch: u64,
    sequence: u64,
}

impl GeometryRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate a host element with `key`.
    pub fn register(&mut self, key: EntityKey, element: ElementHandle) {
        self.entries
            .entry(key)
            .and_modify(|entry| entry.element = Some(element))
            .or_insert(Entry {
                element: Some(element),
                rect: None,
                epoch: self.epoch,
                generation: 0,
                sequence: 0,
            });
    }

    /// Forget `key`. Returns whether it was known.
    pub fn unregister(&mut self, key: &EntityKey) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Record the bounding box of `key`.
    pub fn measure(&mut self, key: EntityKey, rect: Rect) {
        if ![rect.x, rect.y, rect.width, rect.height]
            .iter()
            .all(|v| v.is_finite())
        {
            tracing::debug!(message = "registry.measure_ignored", ?key, reason = "non-finite rect");
            return;
        }
        self.sequence += 1;
        let (epoch, sequence) = (self.epoch, self.sequence);
        let entry = self.entries.entry(key).or_insert(Entry {
            element: None,
            rect: None,
            epoch,
            generation: 0,
            sequence,
        });
        entry.rect = Some(rect);
        entry.epoch = epoch;
        entry.generation += 1;
        entry.sequence = sequence;
    }

    /// Fresh rect of `key`.
    #[must_use]
    pub fn rect(&self, key: &EntityKey) -> Option<Rect> {
        self.entries
            .get(key)
            .filter(|entry| entry.epoch == self.epoch)
            .and_then(|entry| entry.rect)
    }

    /// Element handle of `key`.
    #[must_use]
    pub fn element(&self, key: &EntityKey) -> Option<ElementHandle> {
        self.entries.get(key).and_then(|entry| entry.element)
    }

    /// How many times `key` has been measured.
    #[must_use]
    pub fn generation(&self, key: &EntityKey) -> u64 {
        self.entries.get(key).map_or(0, |entry| entry.generation)
    }

    /// Mark every measurement stale (e.g. after a container resize).
    pub fn invalidate(&mut self) {
        self.epoch += 1;
        tracing::trace!(message = "registry.invalidate", epoch = self.epoch, entries = self.entries.len());
    }

    /// Whether any registered entity lacks a fresh measurement.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.entries
            .values()
            .any(|entry| entry.epoch != self.epoch || entry.rect.is_none())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Smallest fresh entity of `kind` (any kind when `None`) containing
    /// `point`. Equal areas resolve to the most recently measured entity.
    #[must_use]
    pub fn hit_test(&self, point: Point, kind: Option<EntityKind>) -> Option<(&EntityKey, Rect)> {
        self.entries
            .iter()
            .filter(|(key, _)| kind.is_none_or(|k| key.kind() == k))
            .filter(|(_, entry)| entry.epoch == self.epoch)
            .filter_map(|(key, entry)| {
                let rect = entry.rect?;
                rect.contains(point).then_some((key, rect, entry.sequence))
            })
            .min_by(|a, b| {
                a.1.area()
                    .total_cmp(&b.1.area())
                    .then_with(|| b.2.cmp(&a.2))
            })
            .map(|(key, rect, _)| (key, rect))
    }
}
