#![forbid(unsafe_code)]

//! Panel data model: tabs, groups, and binary splits.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use trellis_core::geometry::Axis;

/// Smallest share a split may give either child.
pub const MIN_SPLIT_RATIO: f64 = 0.05;

/// Largest share a split may give its first child.
pub const MAX_SPLIT_RATIO: f64 = 0.95;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(
    /// Stable tab id, preserved across every tree operation.
    TabId
);
string_id!(
    /// Group id; generated groups are named `group-{n}`.
    GroupId
);

/// Split node id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SplitId(pub u64);

impl fmt::Display for SplitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "split-{}", self.0)
    }
}

/// A tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabDefinition {
    pub id: TabId,
    pub title: String,
    /// Key of the host render function for this tab's content.
    #[serde(default)]
    pub content_key: String,
    #[serde(default = "default_closable")]
    pub closable: bool,
}

fn default_closable() -> bool {
    true
}

impl TabDefinition {
    /// A closable tab whose content key is its id.
    #[must_use]
    pub fn new(id: impl Into<TabId>, title: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            content_key: id.as_str().to_string(),
            id,
            title: title.into(),
            closable: true,
        }
    }

    #[must_use]
    pub fn content_key(mut self, key: impl Into<String>) -> Self {
        self.content_key = key.into();
        self
    }

    #[must_use]
    pub fn closable(mut self, closable: bool) -> Self {
        self.closable = closable;
        self
    }
}

/// A tab container with one active tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupModel {
    pub id: GroupId,
    pub tabs: Vec<TabDefinition>,
    pub active_tab_id: Option<TabId>,
}

impl GroupModel {
    /// A group whose first tab is active.
    #[must_use]
    pub fn new(id: impl Into<GroupId>, tabs: Vec<TabDefinition>) -> Self {
        let active_tab_id = tabs.first().map(|tab| tab.id.clone());
        Self {
            id: id.into(),
            tabs,
            active_tab_id,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    #[must_use]
    pub fn tab_index(&self, tab: &TabId) -> Option<usize> {
        self.tabs.iter().position(|t| &t.id == tab)
    }

    #[must_use]
    pub fn contains(&self, tab: &TabId) -> bool {
        self.tab_index(tab).is_some()
    }

    #[must_use]
    pub fn active_tab(&self) -> Option<&TabDefinition> {
        let active = self.active_tab_id.as_ref()?;
        self.tabs.iter().find(|t| &t.id == active)
    }

    /// Remove the tab at `index`, moving activation to its neighbour when the
    /// active tab is removed: the tab now at `index`, else the new last tab.
    pub(crate) fn remove_at(&mut self, index: usize) -> TabDefinition {
        let removed = self.tabs.remove(index);
        if self.active_tab_id.as_ref() == Some(&removed.id) {
            self.active_tab_id = self
                .tabs
                .get(index)
                .or_else(|| self.tabs.last())
                .map(|t| t.id.clone());
        }
        removed
    }

    /// Insert at `index` (clamped) and activate.
    pub(crate) fn insert_active(&mut self, index: usize, tab: TabDefinition) {
        let index = index.min(self.tabs.len());
        self.active_tab_id = Some(tab.id.clone());
        self.tabs.insert(index, tab);
    }
}

/// Orientation of a split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SplitDirection {
    /// Children side by side.
    #[default]
    Horizontal,
    /// Children stacked.
    Vertical,
}

impl SplitDirection {
    /// Axis along which the split divides its area.
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::Horizontal => Axis::Horizontal,
            Self::Vertical => Axis::Vertical,
        }
    }
}

/// Which side of a split the new group lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SplitPlacement {
    Before,
    #[default]
    After,
}

/// Binary split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitNode {
    pub id: SplitId,
    pub direction: SplitDirection,
    /// Share of the first child in `[MIN_SPLIT_RATIO, MAX_SPLIT_RATIO]`.
    pub ratio: f64,
    pub first: PanelNode,
    pub second: PanelNode,
}

/// A node of the panel tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "node", rename_all = "camelCase")]
pub enum PanelNode {
    Group(Arc<GroupModel>),
    Split(Arc<SplitNode>),
}

impl PanelNode {
    #[must_use]
    pub fn group(group: GroupModel) -> Self {
        Self::Group(Arc::new(group))
    }

    /// A half/half split.
    #[must_use]
    pub fn split(id: SplitId, direction: SplitDirection, first: PanelNode, second: PanelNode) -> Self {
        Self::Split(Arc::new(SplitNode {
            id,
            direction,
            ratio: 0.5,
            first,
            second,
        }))
    }

    /// Pointer identity.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Group(a), Self::Group(b)) => Arc::ptr_eq(a, b),
            (Self::Split(a), Self::Split(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Visit groups in reading order (first child before second).
    pub fn for_each_group<'a>(&'a self, visit: &mut impl FnMut(&'a GroupModel)) {
        match self {
            Self::Group(group) => visit(group),
            Self::Split(split) => {
                split.first.for_each_group(visit);
                split.second.for_each_group(visit);
            }
        }
    }

    pub(crate) fn for_each_split<'a>(&'a self, visit: &mut impl FnMut(&'a SplitNode)) {
        if let Self::Split(split) = self {
            visit(split);
            split.first.for_each_split(visit);
            split.second.for_each_split(visit);
        }
    }
}

/// Structural violation found while validating a panel tree.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelModelError {
    DuplicateTabId {
        tab: TabId,
        first_group: GroupId,
        second_group: GroupId,
    },
    DuplicateGroupId {
        group: GroupId,
    },
    DuplicateSplitId {
        split: SplitId,
    },
    /// Only the root group may be empty.
    EmptyGroup {
        group: GroupId,
    },
    ActiveTabMissing {
        group: GroupId,
        tab: Option<TabId>,
    },
    InvalidSplitRatio {
        split: SplitId,
        ratio: f64,
    },
}

impl fmt::Display for PanelModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateTabId {
                tab,
                first_group,
                second_group,
            } => write!(
                f,
                "tab {tab} appears in both {first_group} and {second_group}"
            ),
            Self::DuplicateGroupId { group } => write!(f, "group id {group} is used twice"),
            Self::DuplicateSplitId { split } => write!(f, "split id {split} is used twice"),
            Self::EmptyGroup { group } => write!(f, "non-root group {group} has no tabs"),
            Self::ActiveTabMissing { group, tab } => match tab {
                Some(tab) => write!(f, "group {group} activates {tab}, which it does not contain"),
                None => write!(f, "group {group} has tabs but no active tab"),
            },
            Self::InvalidSplitRatio { split, ratio } => write!(
                f,
                "split {split} has ratio {ratio}, outside [{MIN_SPLIT_RATIO}, {MAX_SPLIT_RATIO}]"
            ),
        }
    }
}

impl std::error::Error for PanelModelError {}
