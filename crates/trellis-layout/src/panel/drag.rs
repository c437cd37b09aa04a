#![forbid(unsafe_code)]

//! Tab drag controller.
//!
//! Turns pointer streams over registered tab, tab bar, and group geometry
//! into [`TabDropAction`]s. The controller never edits the tree itself; the
//! caller applies the returned action, so a tab stays in exactly one group
//! for the whole drag.
//!
//! ```text
//! Idle -> Pressed -> Dragging -> Idle
//!            \--------------------> Idle (release below threshold: click)
//! ```

use serde::{Deserialize, Serialize};
use trellis_core::event::{KeyEvent, PointerButton, PointerEvent, PointerEventKind};
use trellis_core::geometry::Point;

use super::drop::{DropZone, pick_drop_zone_with_previous};
use super::model::{GroupId, TabId};
use super::tree::{PanelAction, PanelTree};
use crate::registry::{EntityKey, EntityKind, GeometryRegistry};

/// Pointer travel (px) that turns a press into a drag.
pub const DEFAULT_TAB_DRAG_THRESHOLD: f64 = 4.0;

/// Tab drag tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabDragConfig {
    pub threshold: f64,
}

impl Default for TabDragConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_TAB_DRAG_THRESHOLD,
        }
    }
}

/// Where a dragged tab would land.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TabDropHover {
    /// Into a tab strip, before the tab currently at `index`.
    Insert { group: GroupId, index: usize },
    /// Onto a group body.
    Zone { group: GroupId, zone: DropZone },
}

/// Outcome of a finished press or drag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TabDropAction {
    Activate {
        tab: TabId,
    },
    Reorder {
        group: GroupId,
        tab: TabId,
        index: usize,
    },
    Move {
        tab: TabId,
        from: GroupId,
        to: GroupId,
        index: usize,
    },
    Split {
        tab: TabId,
        from: GroupId,
        target: GroupId,
        zone: DropZone,
    },
}

impl TabDropAction {
    /// Equivalent tree operation.
    #[must_use]
    pub fn to_panel_action(&self) -> PanelAction {
        match self.clone() {
            Self::Activate { tab } => PanelAction::ActivateTab { tab },
            Self::Reorder { group, tab, index } => PanelAction::ReorderTab { group, tab, index },
            Self::Move {
                tab,
                from,
                to,
                index,
            } => PanelAction::MoveTab {
                tab,
                from,
                to,
                index,
            },
            Self::Split {
                tab,
                from,
                target,
                zone,
            } => {
                let (direction, placement) = zone.split().unwrap_or_default();
                PanelAction::MoveTabToSplit {
                    tab,
                    from,
                    target,
                    direction,
                    placement,
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum DragPhase {
    Idle,
    Pressed {
        pointer_id: u32,
        tab: TabId,
        group: GroupId,
        origin: Point,
    },
    Dragging {
        pointer_id: u32,
        tab: TabId,
        group: GroupId,
        hover: Option<TabDropHover>,
    },
}

/// Press/drag state machine for tabs.
#[derive(Debug, Clone)]
pub struct TabDragController {
    config: TabDragConfig,
    phase: DragPhase,
}

impl Default for TabDragController {
    fn default() -> Self {
        Self::new(TabDragConfig::default())
    }
}

impl TabDragController {
    #[must_use]
    pub fn new(config: TabDragConfig) -> Self {
        Self {
            config,
            phase: DragPhase::Idle,
        }
    }

    /// Whether a tab is being dragged (past the threshold).
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging { .. })
    }

    /// The pressed or dragged tab.
    #[must_use]
    pub fn active_tab(&self) -> Option<&TabId> {
        match &self.phase {
            DragPhase::Idle => None,
            DragPhase::Pressed { tab, .. } | DragPhase::Dragging { tab, .. } => Some(tab),
        }
    }

    /// Current drop preview.
    #[must_use]
    pub fn hover(&self) -> Option<&TabDropHover> {
        match &self.phase {
            DragPhase::Dragging { hover, .. } => hover.as_ref(),
            _ => None,
        }
    }

    /// Feed one pointer event; returns an action when a press or drag ends.
    pub fn handle_pointer(
        &mut self,
        event: &PointerEvent,
        registry: &GeometryRegistry,
        tree: &PanelTree,
    ) -> Option<TabDropAction> {
        match event.kind {
            PointerEventKind::Down => {
                self.on_down(event, registry, tree);
                None
            }
            PointerEventKind::Move => {
                self.on_move(event, registry, tree);
                None
            }
            PointerEventKind::Up => {
                if !self.owns(event.pointer_id) {
                    return None;
                }
                self.on_move(event, registry, tree);
                let phase = std::mem::replace(&mut self.phase, DragPhase::Idle);
                resolve(phase, tree)
            }
            PointerEventKind::Cancel => {
                if self.owns(event.pointer_id) {
                    tracing::debug!(message = "tabs.drag_cancel", reason = "pointer canceled");
                    self.phase = DragPhase::Idle;
                }
                None
            }
        }
    }

    /// `Escape` aborts a press or drag. Returns whether it was consumed.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        if !key.is_escape() || self.phase == DragPhase::Idle {
            return false;
        }
        tracing::debug!(message = "tabs.drag_cancel", reason = "escape");
        self.phase = DragPhase::Idle;
        true
    }

    fn owns(&self, pointer: u32) -> bool {
        match &self.phase {
            DragPhase::Idle => false,
            DragPhase::Pressed { pointer_id, .. } | DragPhase::Dragging { pointer_id, .. } => {
                *pointer_id == pointer
            }
        }
    }

    fn on_down(&mut self, event: &PointerEvent, registry: &GeometryRegistry, tree: &PanelTree) {
        if self.phase != DragPhase::Idle
            || event.button != PointerButton::Primary
            || !event.target.accepts_drag()
        {
            return;
        }
        let Some((EntityKey::Tab(tab), _)) = registry.hit_test(event.position, Some(EntityKind::Tab)) else {
            return;
        };
        let Some(group) = tree.group_of(tab) else {
            return;
        };
        self.phase = DragPhase::Pressed {
            pointer_id: event.pointer_id,
            tab: tab.clone(),
            group: group.id.clone(),
            origin: event.position,
        };
    }

    fn on_move(&mut self, event: &PointerEvent, registry: &GeometryRegistry, tree: &PanelTree) {
        let threshold = self.config.threshold;
        match &mut self.phase {
            DragPhase::Idle => {}
            DragPhase::Pressed {
                pointer_id,
                tab,
                group,
                origin,
            } => {
                if *pointer_id != event.pointer_id
                    || event.position.delta_from(*origin).length() <= threshold
                {
                    return;
                }
                tracing::debug!(message = "tabs.drag_start", tab = %tab, group = %group);
                let hover = hover_at(event.position, registry, tree, None);
                self.phase = DragPhase::Dragging {
                    pointer_id: *pointer_id,
                    tab: tab.clone(),
                    group: group.clone(),
                    hover,
                };
            }
            DragPhase::Dragging {
                pointer_id, hover, ..
            } => {
                if *pointer_id != event.pointer_id {
                    return;
                }
                let next = hover_at(event.position, registry, tree, hover.as_ref());
                if next != *hover {
                    tracing::trace!(message = "tabs.drag_hover", hover = ?next);
                    *hover = next;
                }
            }
        }
    }
}

fn hover_at(
    point: Point,
    registry: &GeometryRegistry,
    tree: &PanelTree,
    previous: Option<&TabDropHover>,
) -> Option<TabDropHover> {
    if let Some((EntityKey::Tab(tab), rect)) = registry.hit_test(point, Some(EntityKind::Tab))
        && let Some(group) = tree.group_of(tab)
        && let Some(index) = group.tab_index(tab)
    {
        let after = usize::from(point.x >= rect.center().x);
        return Some(TabDropHover::Insert {
            group: group.id.clone(),
            index: index + after,
        });
    }
    if let Some((EntityKey::TabBar(group), _)) = registry.hit_test(point, Some(EntityKind::TabBar))
        && let Some(group) = tree.group(group)
    {
        return Some(TabDropHover::Insert {
            group: group.id.clone(),
            index: group.tabs.len(),
        });
    }
    if let Some((EntityKey::Group(group), rect)) = registry.hit_test(point, Some(EntityKind::Group))
        && tree.group(group).is_some()
    {
        let previous_zone = match previous {
            Some(TabDropHover::Zone { group: g, zone }) if g == group => Some(*zone),
            _ => None,
        };
        let zone = pick_drop_zone_with_previous(point, rect, previous_zone)?;
        return Some(TabDropHover::Zone {
            group: group.clone(),
            zone,
        });
    }
    None
}

fn resolve(phase: DragPhase, tree: &PanelTree) -> Option<TabDropAction> {
    match phase {
        DragPhase::Idle => None,
        DragPhase::Pressed { tab, .. } => Some(TabDropAction::Activate { tab }),
        DragPhase::Dragging {
            tab, group, hover, ..
        } => {
            let action = match hover? {
                TabDropHover::Insert { group: to, index } if to == group => {
                    let current = tree.group(&group)?.tab_index(&tab)?;
                    let index = if index > current { index - 1 } else { index };
                    (index != current).then_some(TabDropAction::Reorder { group, tab, index })?
                }
                TabDropHover::Insert { group: to, index } => TabDropAction::Move {
                    tab,
                    from: group,
                    to,
                    index,
                },
                TabDropHover::Zone {
                    group: to,
                    zone: DropZone::Center,
                } => {
                    if to == group {
                        return None;
                    }
                    let index = tree.group(&to)?.tabs.len();
                    TabDropAction::Move {
                        tab,
                        from: group,
                        to,
                        index,
                    }
                }
                TabDropHover::Zone { group: target, zone } => TabDropAction::Split {
                    tab,
                    from: group,
                    target,
                    zone,
                },
            };
            tracing::debug!(message = "tabs.drop", action = ?action);
            Some(action)
        }
    }
}

#[cfg(test)]
mod tests {
    use trellis_core::event::{KeyCode, TargetRole};
    use trellis_core::geometry::Rect;

    use super::*;
    use crate::panel::model::{GroupModel, SplitDirection, TabDefinition};

    /// Two groups side by side: `left` [a, b, c] and `right` [d].
    fn fixture() -> (PanelTree, GeometryRegistry) {
        let tree = PanelTree::with_group(GroupModel::new(
            "left",
            vec![
                TabDefinition::new("a", "A"),
                TabDefinition::new("b", "B"),
                TabDefinition::new("c", "C"),
            ],
        ))
        .expect("valid")
        .split_group(&"left".into(), SplitDirection::Horizontal, vec![TabDefinition::new("d", "D")]);

        let mut registry = GeometryRegistry::new();
        registry.measure(EntityKey::Group("left".into()), Rect::new(0.0, 0.0, 400.0, 400.0));
        registry.measure(EntityKey::Group("group-1".into()), Rect::new(400.0, 0.0, 400.0, 400.0));
        registry.measure(EntityKey::TabBar("left".into()), Rect::new(0.0, 0.0, 400.0, 30.0));
        registry.measure(EntityKey::TabBar("group-1".into()), Rect::new(400.0, 0.0, 400.0, 30.0));
        for (i, id) in ["a", "b", "c"].iter().enumerate() {
            registry.measure(
                EntityKey::Tab((*id).into()),
                Rect::new(i as f64 * 80.0, 0.0, 80.0, 30.0),
            );
        }
        registry.measure(EntityKey::Tab("d".into()), Rect::new(400.0, 0.0, 80.0, 30.0));
        (tree, registry)
    }

    fn drag(points: &[(f64, f64)]) -> Option<TabDropAction> {
        let (tree, registry) = fixture();
        let mut controller = TabDragController::default();
        let (x0, y0) = points[0];
        controller.handle_pointer(&PointerEvent::down(1, x0, y0), &registry, &tree);
        for &(x, y) in &points[1..points.len() - 1] {
            controller.handle_pointer(&PointerEvent::moved(1, x, y), &registry, &tree);
        }
        let (x, y) = points[points.len() - 1];
        controller.handle_pointer(&PointerEvent::up(1, x, y), &registry, &tree)
    }

    #[test]
    fn click_activates() {
        assert_eq!(
            drag(&[(100.0, 10.0), (101.0, 11.0)]),
            Some(TabDropAction::Activate { tab: "b".into() })
        );
    }

    #[test]
    fn drag_within_strip_reorders() {
        assert_eq!(
            drag(&[(10.0, 10.0), (150.0, 10.0), (230.0, 10.0)]),
            Some(TabDropAction::Reorder {
                group: "left".into(),
                tab: "a".into(),
                index: 2,
            })
        );
        // Dropping a tab onto its own slot is nothing.
        assert_eq!(drag(&[(10.0, 10.0), (20.0, 10.0), (30.0, 10.0)]), None);
    }

    #[test]
    fn drag_to_other_strip_moves() {
        assert_eq!(
            drag(&[(10.0, 10.0), (300.0, 10.0), (600.0, 10.0)]),
            Some(TabDropAction::Move {
                tab: "a".into(),
                from: "left".into(),
                to: "group-1".into(),
                index: 1,
            })
        );
    }

    #[test]
    fn drag_to_group_edge_splits() {
        let action = drag(&[(10.0, 10.0), (300.0, 200.0), (790.0, 200.0)]).expect("action");
        assert_eq!(
            action,
            TabDropAction::Split {
                tab: "a".into(),
                from: "left".into(),
                target: "group-1".into(),
                zone: DropZone::Right,
            }
        );
        let (tree, _) = fixture();
        let next = tree.apply(&action.to_panel_action());
        assert_eq!(next.groups().len(), 3);
        assert_eq!(next.tab_count(), 4);
    }

    #[test]
    fn center_drop_on_own_group_is_noop() {
        assert_eq!(drag(&[(10.0, 10.0), (200.0, 200.0), (200.0, 210.0)]), None);
    }

    #[test]
    fn controls_and_escape() {
        let (tree, registry) = fixture();
        let mut controller = TabDragController::default();
        let close_button = PointerEvent::down(1, 10.0, 10.0).with_target(TargetRole::Control);
        controller.handle_pointer(&close_button, &registry, &tree);
        assert_eq!(controller.active_tab(), None);

        controller.handle_pointer(&PointerEvent::down(1, 10.0, 10.0), &registry, &tree);
        controller.handle_pointer(&PointerEvent::moved(1, 300.0, 200.0), &registry, &tree);
        assert!(controller.is_dragging());
        assert!(controller.handle_key(&KeyEvent::new(KeyCode::Escape)));
        assert_eq!(
            controller.handle_pointer(&PointerEvent::up(1, 600.0, 10.0), &registry, &tree),
            None
        );
    }
}
