#![forbid(unsafe_code)]

//! Panel system: tabbed groups arranged in a binary split tree.
//!
//! The tree is persistent. Every operation returns a new [`PanelTree`]
//! sharing untouched subtrees with the old one; a no-op returns a tree whose
//! root is pointer-equal to the input, which is how [`PanelController`]
//! decides whether to notify.
//!
//! # Invariants
//!
//! 1. Every tab id appears in exactly one group, before and after every
//!    operation.
//! 2. A non-empty group's active tab is one of its tabs.
//! 3. Only the root group may be empty; emptied groups elsewhere collapse
//!    their parent split.
//! 4. Split ratios stay within `[MIN_SPLIT_RATIO, MAX_SPLIT_RATIO]`.
//!
//! # Failure Modes
//!
//! Operations naming unknown tabs or groups return the input tree unchanged.
//! Only construction and deserialization report [`PanelModelError`].

mod drag;
mod drop;
mod model;
mod tree;

pub use drag::{DEFAULT_TAB_DRAG_THRESHOLD, TabDragConfig, TabDragController, TabDropAction, TabDropHover};
pub use drop::{DROP_ZONE_DEADZONE, DROP_ZONE_MARGIN, DropZone, pick_drop_zone, pick_drop_zone_with_previous};
pub use model::{
    GroupId, GroupModel, MAX_SPLIT_RATIO, MIN_SPLIT_RATIO, PanelModelError, PanelNode, SplitDirection, SplitId,
    SplitNode, SplitPlacement, TabDefinition, TabId,
};
pub use tree::{PanelAction, PanelLayout, PanelTree, SplitLayout};

use trellis_core::event::{KeyEvent, PointerEvent};

use crate::registry::GeometryRegistry;

/// Host hooks for panel changes.
pub trait PanelCallbacks {
    /// Called once per operation that produced a different tree.
    fn on_tree_change(&mut self, tree: &PanelTree);

    /// Called when the drag preview changes. `None` clears it.
    fn on_drop_preview(&mut self, _hover: Option<&TabDropHover>) {}
}

impl PanelCallbacks for () {
    fn on_tree_change(&mut self, _tree: &PanelTree) {}
}

/// Owns a [`PanelTree`] and routes actions and tab drags into it.
#[derive(Debug, Clone)]
pub struct PanelController {
    tree: PanelTree,
    drag: TabDragController,
}

impl PanelController {
    #[must_use]
    pub fn new(tree: PanelTree) -> Self {
        Self::with_config(tree, TabDragConfig::default())
    }

    #[must_use]
    pub fn with_config(tree: PanelTree, config: TabDragConfig) -> Self {
        Self {
            tree,
            drag: TabDragController::new(config),
        }
    }

    #[must_use]
    pub fn tree(&self) -> &PanelTree {
        &self.tree
    }

    #[must_use]
    pub fn drag(&self) -> &TabDragController {
        &self.drag
    }

    /// Apply `action`; notifies and returns `true` only when the tree changed.
    pub fn dispatch(&mut self, action: &PanelAction, callbacks: &mut dyn PanelCallbacks) -> bool {
        let next = self.tree.apply(action);
        if next.ptr_eq(&self.tree) {
            return false;
        }
        self.tree = next;
        callbacks.on_tree_change(&self.tree);
        true
    }

    /// Feed a pointer event to the tab drag controller.
    pub fn handle_pointer(
        &mut self,
        event: &PointerEvent,
        registry: &GeometryRegistry,
        callbacks: &mut dyn PanelCallbacks,
    ) -> bool {
        let before = self.drag.hover().cloned();
        let action = self.drag.handle_pointer(event, registry, &self.tree);
        if self.drag.hover() != before.as_ref() {
            callbacks.on_drop_preview(self.drag.hover());
        }
        match action {
            Some(action) => self.dispatch(&action.to_panel_action(), callbacks),
            None => false,
        }
    }

    /// `Escape` aborts a tab drag.
    pub fn handle_key(&mut self, key: &KeyEvent, callbacks: &mut dyn PanelCallbacks) -> bool {
        let had_preview = self.drag.hover().is_some();
        let consumed = self.drag.handle_key(key);
        if consumed && had_preview {
            callbacks.on_drop_preview(None);
        }
        consumed
    }
}
