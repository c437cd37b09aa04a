#![forbid(unsafe_code)]

//! Persistent panel tree and its reducer-style operations.
//!
//! Every operation takes `&self` and returns a tree. Unchanged subtrees are
//! shared by `Arc`; a request that changes nothing returns a tree whose root
//! is pointer-equal to the input ([`PanelTree::ptr_eq`]), so the render layer
//! can skip work by identity.
//!
//! # Invariants
//!
//! 1. Every tab id appears in exactly one group.
//! 2. Split nodes always have two children; a group that loses its last tab
//!    is removed and its sibling takes the parent's place.
//! 3. Only the root group may be empty.
//! 4. A non-empty group's active tab is one of its tabs.
//!
//! # Failure Modes
//!
//! Requests naming unknown tabs, groups, or splits, or that would break an
//! invariant, are no-ops.

use std::collections::BTreeMap;
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use trellis_core::geometry::{Axis, Point, Rect};

use super::model::{
    GroupId, GroupModel, MAX_SPLIT_RATIO, MIN_SPLIT_RATIO, PanelModelError, PanelNode,
    SplitDirection, SplitId, SplitNode, SplitPlacement, TabDefinition, TabId,
};

enum Edit {
    Unchanged,
    Replaced(PanelNode),
    Removed,
}

/// Rebuild the path to the first node `target` claims.
fn rewrite(node: &PanelNode, target: &mut dyn FnMut(&PanelNode) -> Option<Edit>) -> Edit {
    if let Some(edit) = target(node) {
        return edit;
    }
    let PanelNode::Split(split) = node else {
        return Edit::Unchanged;
    };
    match rewrite(&split.first, target) {
        Edit::Replaced(first) => Edit::Replaced(PanelNode::Split(Arc::new(SplitNode {
            first,
            ..SplitNode::clone(split)
        }))),
        Edit::Removed => Edit::Replaced(split.second.clone()),
        Edit::Unchanged => match rewrite(&split.second, target) {
            Edit::Replaced(second) => Edit::Replaced(PanelNode::Split(Arc::new(SplitNode {
                second,
                ..SplitNode::clone(split)
            }))),
            Edit::Removed => Edit::Replaced(split.first.clone()),
            Edit::Unchanged => Edit::Unchanged,
        },
    }
}

/// The group/tab/split tree.
///
/// Serializes as its root node; deserializing re-runs validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PanelNode", into = "PanelNode")]
pub struct PanelTree {
    root: PanelNode,
    next_id: u64,
}

impl TryFrom<PanelNode> for PanelTree {
    type Error = PanelModelError;

    fn try_from(root: PanelNode) -> Result<Self, Self::Error> {
        Self::new(root)
    }
}

impl From<PanelTree> for PanelNode {
    fn from(tree: PanelTree) -> Self {
        tree.root
    }
}

impl PanelTree {
    /// Validate `root` and build a tree.
    pub fn new(root: PanelNode) -> Result<Self, PanelModelError> {
        validate(&root)?;
        let mut next_id = 1;
        root.for_each_split(&mut |split| next_id = next_id.max(split.id.0 + 1));
        root.for_each_group(&mut |group| {
            if let Some(n) = group
                .id
                .as_str()
                .strip_prefix("group-")
                .and_then(|n| n.parse::<u64>().ok())
            {
                next_id = next_id.max(n.saturating_add(1));
            }
        });
        Ok(Self { root, next_id })
    }

    /// A tree holding one group.
    pub fn with_group(group: GroupModel) -> Result<Self, PanelModelError> {
        Self::new(PanelNode::group(group))
    }

    #[must_use]
    pub fn root(&self) -> &PanelNode {
        &self.root
    }

    /// Whether both trees share the same root allocation.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.root.ptr_eq(&other.root)
    }

    /// Re-run structural validation.
    pub fn validate(&self) -> Result<(), PanelModelError> {
        validate(&self.root)
    }

    /// Groups in reading order.
    #[must_use]
    pub fn groups(&self) -> Vec<&GroupModel> {
        let mut groups = Vec::new();
        self.root.for_each_group(&mut |group| groups.push(group));
        groups
    }

    #[must_use]
    pub fn group(&self, id: &GroupId) -> Option<&GroupModel> {
        let mut found = None;
        self.root.for_each_group(&mut |group| {
            if found.is_none() && &group.id == id {
                found = Some(group);
            }
        });
        found
    }

    /// Group holding `tab`.
    #[must_use]
    pub fn group_of(&self, tab: &TabId) -> Option<&GroupModel> {
        let mut found = None;
        self.root.for_each_group(&mut |group| {
            if found.is_none() && group.contains(tab) {
                found = Some(group);
            }
        });
        found
    }

    #[must_use]
    pub fn split(&self, id: SplitId) -> Option<&SplitNode> {
        let mut found = None;
        self.root.for_each_split(&mut |split| {
            if found.is_none() && split.id == id {
                found = Some(split);
            }
        });
        found
    }

    /// All tab ids in reading order.
    #[must_use]
    pub fn tab_ids(&self) -> Vec<TabId> {
        let mut ids = Vec::new();
        self.root
            .for_each_group(&mut |group| ids.extend(group.tabs.iter().map(|t| t.id.clone())));
        ids
    }

    #[must_use]
    pub fn tab_count(&self) -> usize {
        let mut count = 0;
        self.root.for_each_group(&mut |group| count += group.tabs.len());
        count
    }

    /// Id the next split operation will give its new group.
    #[must_use]
    pub fn peek_next_group_id(&self) -> GroupId {
        let mut next = self.next_id;
        self.fresh_group_id(&mut next)
    }

    // ---- Operations ----

    /// Move `tab` from `from` to position `index` of `to` and activate it
    /// there. An emptied origin group is removed.
    #[must_use]
    pub fn move_tab(&self, tab: &TabId, from: &GroupId, to: &GroupId, index: usize) -> Self {
        if from == to {
            return self.reorder_tab(from, tab, index);
        }
        let (Some(origin), Some(_)) = (self.group(from), self.group(to)) else {
            return self.clone();
        };
        let Some(position) = origin.tab_index(tab) else {
            return self.clone();
        };
        let mut moved = Some(origin.tabs[position].clone());

        let detached = self.edit_group(from, |group| {
            let mut group = group.clone();
            group.remove_at(position);
            Some(group)
        });
        let next = detached.edit_group(to, |group| {
            let mut group = group.clone();
            group.insert_active(index, moved.take()?);
            Some(group)
        });
        tracing::debug!(message = "panel.move_tab", tab = %tab, from = %from, to = %to, index);
        next
    }

    /// Split `group`, placing a new group holding `tabs` after it.
    #[must_use]
    pub fn split_group(&self, group: &GroupId, direction: SplitDirection, tabs: Vec<TabDefinition>) -> Self {
        self.split_group_with(group, direction, SplitPlacement::After, tabs)
    }

    /// Split `group`, placing a new group holding `tabs` on `placement`'s
    /// side. No-op when `tabs` is empty or reuses an existing tab id.
    #[must_use]
    pub fn split_group_with(
        &self,
        group: &GroupId,
        direction: SplitDirection,
        placement: SplitPlacement,
        tabs: Vec<TabDefinition>,
    ) -> Self {
        if tabs.is_empty() || self.group(group).is_none() {
            return self.clone();
        }
        let mut seen = FxHashSet::default();
        if tabs
            .iter()
            .any(|tab| !seen.insert(&tab.id) || self.group_of(&tab.id).is_some())
        {
            tracing::debug!(message = "panel.split_rejected", group = %group, reason = "duplicate tab id");
            return self.clone();
        }

        let mut next_id = self.next_id;
        let new_group_id = self.fresh_group_id(&mut next_id);
        let split_id = self.fresh_split_id(&mut next_id);
        let fresh = PanelNode::group(GroupModel::new(new_group_id.clone(), tabs));

        let Edit::Replaced(root) = rewrite(&self.root, &mut |node| match node {
            PanelNode::Group(existing) if &existing.id == group => {
                let existing = node.clone();
                let (first, second) = match placement {
                    SplitPlacement::Before => (fresh.clone(), existing),
                    SplitPlacement::After => (existing, fresh.clone()),
                };
                Some(Edit::Replaced(PanelNode::split(split_id, direction, first, second)))
            }
            _ => None,
        }) else {
            return self.clone();
        };
        tracing::debug!(
            message = "panel.split_group",
            group = %group,
            new_group = %new_group_id,
            split = %split_id,
            ?direction,
            ?placement
        );
        Self { root, next_id }
    }

    /// Move `tab` into a new group split off `target`.
    #[must_use]
    pub fn move_tab_to_split(
        &self,
        tab: &TabId,
        from: &GroupId,
        target: &GroupId,
        direction: SplitDirection,
        placement: SplitPlacement,
    ) -> Self {
        let (Some(origin), Some(_)) = (self.group(from), self.group(target)) else {
            return self.clone();
        };
        let Some(position) = origin.tab_index(tab) else {
            return self.clone();
        };
        if from == target && origin.tabs.len() == 1 {
            return self.clone();
        }
        let moved = origin.tabs[position].clone();
        let detached = self.edit_group(from, |group| {
            let mut group = group.clone();
            group.remove_at(position);
            Some(group)
        });
        let next = detached.split_group_with(target, direction, placement, vec![moved]);
        tracing::debug!(message = "panel.move_tab_to_split", tab = %tab, from = %from, target = %target, ?direction);
        next
    }

    /// Close `tab`. Closing the active tab activates its neighbour.
    #[must_use]
    pub fn close_tab(&self, tab: &TabId) -> Self {
        let Some(group) = self.group_of(tab) else {
            return self.clone();
        };
        let Some(position) = group.tab_index(tab) else {
            return self.clone();
        };
        if !group.tabs[position].closable {
            tracing::debug!(message = "panel.close_rejected", tab = %tab, reason = "not closable");
            return self.clone();
        }
        let group_id = group.id.clone();
        let next = self.edit_group(&group_id, |group| {
            let mut group = group.clone();
            group.remove_at(position);
            Some(group)
        });
        tracing::debug!(message = "panel.close_tab", tab = %tab, group = %group_id);
        next
    }

    /// Make `tab` its group's active tab.
    #[must_use]
    pub fn activate_tab(&self, tab: &TabId) -> Self {
        let Some(group) = self.group_of(tab) else {
            return self.clone();
        };
        if group.active_tab_id.as_ref() == Some(tab) {
            return self.clone();
        }
        let group_id = group.id.clone();
        tracing::debug!(message = "panel.activate_tab", tab = %tab, group = %group_id);
        self.edit_group(&group_id, |group| {
            let mut group = group.clone();
            group.active_tab_id = Some(tab.clone());
            Some(group)
        })
    }

    /// Insert a new tab into `group` (at the end by default) and activate it.
    #[must_use]
    pub fn add_tab(&self, group: &GroupId, tab: TabDefinition, index: Option<usize>) -> Self {
        if self.group_of(&tab.id).is_some() {
            tracing::debug!(message = "panel.add_rejected", tab = %tab.id, reason = "duplicate tab id");
            return self.clone();
        }
        let tab_id = tab.id.clone();
        let mut tab = Some(tab);
        let next = self.edit_group(group, |existing| {
            let mut existing = existing.clone();
            let index = index.unwrap_or(existing.tabs.len());
            existing.insert_active(index, tab.take()?);
            Some(existing)
        });
        if !next.ptr_eq(self) {
            tracing::debug!(message = "panel.add_tab", tab = %tab_id, group = %group);
        }
        next
    }

    /// Move `tab` within `group` so it ends at `index` (clamped).
    #[must_use]
    pub fn reorder_tab(&self, group: &GroupId, tab: &TabId, index: usize) -> Self {
        let Some(existing) = self.group(group) else {
            return self.clone();
        };
        let Some(position) = existing.tab_index(tab) else {
            return self.clone();
        };
        let index = index.min(existing.tabs.len() - 1);
        if index == position {
            return self.clone();
        }
        tracing::debug!(message = "panel.reorder_tab", tab = %tab, group = %group, from = position, to = index);
        self.edit_group(group, |existing| {
            let mut existing = existing.clone();
            let moved = existing.tabs.remove(position);
            existing.tabs.insert(index, moved);
            Some(existing)
        })
    }

    /// Set a split's first-child share, clamped to the allowed range.
    #[must_use]
    pub fn set_split_ratio(&self, split: SplitId, ratio: f64) -> Self {
        if !ratio.is_finite() {
            return self.clone();
        }
        let ratio = ratio.clamp(MIN_SPLIT_RATIO, MAX_SPLIT_RATIO);
        let Edit::Replaced(root) = rewrite(&self.root, &mut |node| match node {
            PanelNode::Split(existing) if existing.id == split => {
                if existing.ratio == ratio {
                    return Some(Edit::Unchanged);
                }
                Some(Edit::Replaced(PanelNode::Split(Arc::new(SplitNode {
                    ratio,
                    ..SplitNode::clone(existing)
                }))))
            }
            _ => None,
        }) else {
            return self.clone();
        };
        tracing::trace!(message = "panel.split_ratio", split = %split, ratio);
        Self {
            root,
            next_id: self.next_id,
        }
    }

    /// Apply one [`PanelAction`].
    #[must_use]
    pub fn apply(&self, action: &PanelAction) -> Self {
        match action {
            PanelAction::MoveTab {
                tab,
                from,
                to,
                index,
            } => self.move_tab(tab, from, to, *index),
            PanelAction::SplitGroup {
                group,
                direction,
                placement,
                tabs,
            } => self.split_group_with(group, *direction, *placement, tabs.clone()),
            PanelAction::MoveTabToSplit {
                tab,
                from,
                target,
                direction,
                placement,
            } => self.move_tab_to_split(tab, from, target, *direction, *placement),
            PanelAction::CloseTab { tab } => self.close_tab(tab),
            PanelAction::ActivateTab { tab } => self.activate_tab(tab),
            PanelAction::AddTab { group, tab, index } => self.add_tab(group, tab.clone(), *index),
            PanelAction::ReorderTab { group, tab, index } => self.reorder_tab(group, tab, *index),
            PanelAction::SetSplitRatio { split, ratio } => self.set_split_ratio(*split, *ratio),
        }
    }

    /// Solve group and split rectangles inside `area`.
    #[must_use]
    pub fn solve_layout(&self, area: Rect) -> PanelLayout {
        let mut layout = PanelLayout {
            area,
            groups: BTreeMap::new(),
            splits: BTreeMap::new(),
        };
        solve_node(&self.root, area, &mut layout);
        layout
    }

    // ---- Internals ----

    fn edit_group(&self, target: &GroupId, mut f: impl FnMut(&GroupModel) -> Option<GroupModel>) -> Self {
        let root_is_target = matches!(&self.root, PanelNode::Group(group) if &group.id == target);
        let edit = rewrite(&self.root, &mut |node| match node {
            PanelNode::Group(group) if &group.id == target => Some(match f(group.as_ref()) {
                None => Edit::Unchanged,
                Some(next) if next.is_empty() && !root_is_target => Edit::Removed,
                Some(next) => Edit::Replaced(PanelNode::group(next)),
            }),
            _ => None,
        });
        match edit {
            Edit::Replaced(root) => Self {
                root,
                next_id: self.next_id,
            },
            Edit::Unchanged | Edit::Removed => self.clone(),
        }
    }

    fn fresh_group_id(&self, next: &mut u64) -> GroupId {
        loop {
            let id = GroupId::new(format!("group-{next}"));
            *next += 1;
            if self.group(&id).is_none() {
                return id;
            }
        }
    }

    fn fresh_split_id(&self, next: &mut u64) -> SplitId {
        loop {
            let id = SplitId(*next);
            *next += 1;
            if self.split(id).is_none() {
                return id;
            }
        }
    }
}

fn validate(root: &PanelNode) -> Result<(), PanelModelError> {
    let mut result = Ok(());
    let mut owners: FxHashMap<&TabId, &GroupId> = FxHashMap::default();
    let mut groups = FxHashSet::default();
    let root_is_group = matches!(root, PanelNode::Group(_));

    root.for_each_group(&mut |group| {
        if result.is_err() {
            return;
        }
        result = check_group(group, root_is_group, &mut groups, &mut owners);
    });
    result?;

    let mut splits = FxHashSet::default();
    let mut result = Ok(());
    root.for_each_split(&mut |split| {
        if result.is_err() {
            return;
        }
        if !splits.insert(split.id) {
            result = Err(PanelModelError::DuplicateSplitId { split: split.id });
        } else if !(MIN_SPLIT_RATIO..=MAX_SPLIT_RATIO).contains(&split.ratio) {
            result = Err(PanelModelError::InvalidSplitRatio {
                split: split.id,
                ratio: split.ratio,
            });
        }
    });
    result
}

fn check_group<'a>(
    group: &'a GroupModel,
    is_root: bool,
    groups: &mut FxHashSet<&'a GroupId>,
    owners: &mut FxHashMap<&'a TabId, &'a GroupId>,
) -> Result<(), PanelModelError> {
    if !groups.insert(&group.id) {
        return Err(PanelModelError::DuplicateGroupId {
            group: group.id.clone(),
        });
    }
    if group.is_empty() && !is_root {
        return Err(PanelModelError::EmptyGroup {
            group: group.id.clone(),
        });
    }
    for tab in &group.tabs {
        if let Some(first) = owners.insert(&tab.id, &group.id) {
            return Err(PanelModelError::DuplicateTabId {
                tab: tab.id.clone(),
                first_group: first.clone(),
                second_group: group.id.clone(),
            });
        }
    }
    let active_ok = match &group.active_tab_id {
        Some(active) => group.contains(active),
        None => group.is_empty(),
    };
    if !active_ok {
        return Err(PanelModelError::ActiveTabMissing {
            group: group.id.clone(),
            tab: group.active_tab_id.clone(),
        });
    }
    Ok(())
}

fn solve_node(node: &PanelNode, area: Rect, layout: &mut PanelLayout) {
    match node {
        PanelNode::Group(group) => {
            layout.groups.insert(group.id.clone(), area);
        }
        PanelNode::Split(split) => {
            let axis = split.direction.axis();
            let extent = match axis {
                Axis::Horizontal => area.width,
                Axis::Vertical => area.height,
            };
            let (first, second) = area.split_at(axis, extent * split.ratio);
            layout.splits.insert(
                split.id,
                SplitLayout {
                    rect: area,
                    direction: split.direction,
                    divider: match axis {
                        Axis::Horizontal => second.x,
                        Axis::Vertical => second.y,
                    },
                },
            );
            solve_node(&split.first, first, layout);
            solve_node(&split.second, second, layout);
        }
    }
}

/// Solved geometry of one split.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitLayout {
    pub rect: Rect,
    pub direction: SplitDirection,
    /// Coordinate of the boundary between the children along the split axis.
    pub divider: f64,
}

impl SplitLayout {
    /// Ratio that puts the divider under `pointer`.
    #[must_use]
    pub fn ratio_at(&self, pointer: Point) -> Option<f64> {
        let (start, extent, at) = match self.direction.axis() {
            Axis::Horizontal => (self.rect.x, self.rect.width, pointer.x),
            Axis::Vertical => (self.rect.y, self.rect.height, pointer.y),
        };
        (extent > 0.0).then(|| ((at - start) / extent).clamp(MIN_SPLIT_RATIO, MAX_SPLIT_RATIO))
    }
}

/// Solved panel geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelLayout {
    pub area: Rect,
    groups: BTreeMap<GroupId, Rect>,
    splits: BTreeMap<SplitId, SplitLayout>,
}

impl PanelLayout {
    #[must_use]
    pub fn group_rect(&self, id: &GroupId) -> Option<Rect> {
        self.groups.get(id).copied()
    }

    #[must_use]
    pub fn split(&self, id: SplitId) -> Option<SplitLayout> {
        self.splits.get(&id).copied()
    }

    /// Group rects in id order.
    pub fn groups(&self) -> impl Iterator<Item = (&GroupId, Rect)> + '_ {
        self.groups.iter().map(|(id, rect)| (id, *rect))
    }

    /// Split layouts in id order.
    pub fn splits(&self) -> impl Iterator<Item = (SplitId, SplitLayout)> + '_ {
        self.splits.iter().map(|(id, split)| (*id, *split))
    }
}

/// A serializable tree operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PanelAction {
    MoveTab {
        tab: TabId,
        from: GroupId,
        to: GroupId,
        index: usize,
    },
    SplitGroup {
        group: GroupId,
        direction: SplitDirection,
        #[serde(default)]
        placement: SplitPlacement,
        tabs: Vec<TabDefinition>,
    },
    MoveTabToSplit {
        tab: TabId,
        from: GroupId,
        target: GroupId,
        direction: SplitDirection,
        #[serde(default)]
        placement: SplitPlacement,
    },
    CloseTab {
        tab: TabId,
    },
    ActivateTab {
        tab: TabId,
    },
    AddTab {
        group: GroupId,
        tab: TabDefinition,
        #[serde(default)]
        index: Option<usize>,
    },
    ReorderTab {
        group: GroupId,
        tab: TabId,
        index: usize,
    },
    SetSplitRatio {
        split: SplitId,
        ratio: f64,
    },
}
