#![forbid(unsafe_code)]

//! Stack navigation and its animated view.
//!
//! [`StackNavigation`] is the authoritative state: an ordered list of panel
//! ids and the depth of the visible one. [`StackView`] turns that state into
//! per-panel transforms, one retargetable tween per stack slot, so a panel
//! pushed and popped in quick succession always moves from wherever it
//! currently is.
//!
//! # Invariants
//!
//! 1. `depth` always indexes a valid stack entry and is the stack's tail.
//! 2. `push` appends and moves to the new tail; `go(-n)` truncates to
//!    `depth - n`.
//! 3. A slot's transform is continuous across navigation: re-syncing never
//!    changes a value, it only changes where the value is heading.
//! 4. A popped panel ends at `translateX(container_size)` with
//!    [`Visibility::Hidden`].
//!
//! # Failure Modes
//!
//! - Deserializing a [`StackNavigation`] that breaks invariant 1, reveals at
//!   the root, or carries a reveal progress outside `[0, 1]` fails with a
//!   [`StackError`].

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use trellis_core::animation::{Animation, DEFAULT_TRANSITION, Easing, Tween};

// ---------------------------------------------------------------------------
// Navigation state
// ---------------------------------------------------------------------------

/// Invalid serialized stack state.
#[derive(Debug, Clone, PartialEq)]
pub enum StackError {
    EmptyStack,
    /// `depth` must name the last entry.
    DepthNotTail { depth: usize, len: usize },
    RevealAtRoot,
    InvalidRevealProgress { progress: f64 },
}

impl fmt::Display for StackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyStack => write!(f, "stack needs at least one panel"),
            Self::DepthNotTail { depth, len } => {
                write!(f, "stack depth {depth} is not the tail of a {len}-entry stack")
            }
            Self::RevealAtRoot => write!(f, "the root panel has no parent to reveal"),
            Self::InvalidRevealProgress { progress } => {
                write!(f, "reveal progress {progress} is outside [0, 1] or set while not revealing")
            }
        }
    }
}

impl std::error::Error for StackError {}

/// Wire form of [`StackNavigation`], validated on the way in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StackSnapshot {
    stack: Vec<String>,
    depth: usize,
    #[serde(default)]
    is_revealing: bool,
    #[serde(default)]
    reveal_progress: f64,
}

/// Ordered panel stack with an interactive "reveal the parent" peek.
///
/// Deserializing re-checks the stack invariants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StackSnapshot", into = "StackSnapshot")]
pub struct StackNavigation {
    stack: Vec<String>,
    depth: usize,
    is_revealing: bool,
    reveal_progress: f64,
}

impl TryFrom<StackSnapshot> for StackNavigation {
    type Error = StackError;

    fn try_from(snapshot: StackSnapshot) -> Result<Self, Self::Error> {
        let len = snapshot.stack.len();
        if len == 0 {
            return Err(StackError::EmptyStack);
        }
        if snapshot.depth != len - 1 {
            return Err(StackError::DepthNotTail {
                depth: snapshot.depth,
                len,
            });
        }
        if snapshot.is_revealing && snapshot.depth == 0 {
            return Err(StackError::RevealAtRoot);
        }
        let progress = snapshot.reveal_progress;
        let in_range = (0.0..=1.0).contains(&progress);
        if !in_range || (!snapshot.is_revealing && progress != 0.0) {
            return Err(StackError::InvalidRevealProgress { progress });
        }
        Ok(Self {
            stack: snapshot.stack,
            depth: snapshot.depth,
            is_revealing: snapshot.is_revealing,
            reveal_progress: progress,
        })
    }
}

impl From<StackNavigation> for StackSnapshot {
    fn from(nav: StackNavigation) -> Self {
        Self {
            stack: nav.stack,
            depth: nav.depth,
            is_revealing: nav.is_revealing,
            reveal_progress: nav.reveal_progress,
        }
    }
}

impl StackNavigation {
    /// A stack holding only `root`.
    #[must_use]
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            stack: vec![root.into()],
            depth: 0,
            is_revealing: false,
            reveal_progress: 0.0,
        }
    }

    #[must_use]
    pub fn stack(&self) -> &[String] {
        &self.stack
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Id of the visible panel.
    #[must_use]
    pub fn current(&self) -> &str {
        &self.stack[self.depth]
    }

    #[must_use]
    pub fn is_revealing(&self) -> bool {
        self.is_revealing
    }

    /// Depth of the panel being revealed, while revealing.
    #[must_use]
    pub fn reveal_depth(&self) -> Option<usize> {
        self.is_revealing.then(|| self.depth - 1)
    }

    /// How far the top panel has been pulled aside, in `[0, 1]`.
    #[must_use]
    pub fn reveal_progress(&self) -> f64 {
        self.reveal_progress
    }

    /// Push `id` on top. Duplicates are allowed.
    pub fn push(&mut self, id: impl Into<String>) {
        let id = id.into();
        self.end_reveal_silently();
        self.stack.truncate(self.depth + 1);
        tracing::debug!(message = "stack.push", id = %id, depth = self.stack.len());
        self.stack.push(id);
        self.depth = self.stack.len() - 1;
    }

    /// Move `delta` entries. Only backward moves can succeed; the stack is
    /// truncated to the new depth.
    pub fn go(&mut self, delta: i32) -> bool {
        let target = self.depth as i64 + i64::from(delta);
        if delta == 0 || target < 0 || target >= self.stack.len() as i64 {
            return false;
        }
        self.pop_to(target as usize);
        true
    }

    /// Return to the most recent entry named `id`.
    pub fn move_to(&mut self, id: &str) -> bool {
        match self.stack[..self.depth].iter().rposition(|entry| entry == id) {
            Some(index) => {
                self.pop_to(index);
                true
            }
            None => false,
        }
    }

    /// Begin peeking at the parent. Fails at the root.
    pub fn start_reveal(&mut self) -> bool {
        if self.depth == 0 || self.is_revealing {
            return false;
        }
        self.is_revealing = true;
        self.reveal_progress = 0.0;
        tracing::debug!(message = "stack.reveal_start", depth = self.depth);
        true
    }

    /// Update the peek; `progress` is clamped to `[0, 1]`.
    pub fn update_reveal(&mut self, progress: f64) {
        if self.is_revealing && progress.is_finite() {
            self.reveal_progress = progress.clamp(0.0, 1.0);
        }
    }

    /// Finish the peek, popping the top panel when `commit` is set.
    pub fn end_reveal(&mut self, commit: bool) -> bool {
        if !self.is_revealing {
            return false;
        }
        tracing::debug!(message = "stack.reveal_end", commit, progress = self.reveal_progress);
        self.end_reveal_silently();
        if commit {
            self.go(-1)
        } else {
            false
        }
    }

    fn end_reveal_silently(&mut self) {
        self.is_revealing = false;
        self.reveal_progress = 0.0;
    }

    fn pop_to(&mut self, depth: usize) {
        self.end_reveal_silently();
        tracing::debug!(message = "stack.pop", from = self.depth, to = depth);
        self.stack.truncate(depth + 1);
        self.depth = depth;
    }
}

// ---------------------------------------------------------------------------
// View
// ---------------------------------------------------------------------------

/// Stack transition settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StackConfig {
    /// Width of the container; entering panels start this far to the right.
    pub container_size: f64,
    pub transition_ms: u64,
    pub easing: Easing,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            container_size: 0.0,
            transition_ms: DEFAULT_TRANSITION.as_millis() as u64,
            easing: Easing::default(),
        }
    }
}

impl StackConfig {
    #[must_use]
    pub fn new(container_size: f64) -> Self {
        Self {
            container_size,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn transition_ms(mut self, ms: u64) -> Self {
        self.transition_ms = ms;
        self
    }

    #[must_use]
    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }
}

/// CSS visibility of a stack panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Visibility {
    Visible,
    Hidden,
}

impl Visibility {
    #[must_use]
    pub const fn as_css(self) -> &'static str {
        match self {
            Self::Visible => "visible",
            Self::Hidden => "hidden",
        }
    }
}

/// Render descriptor of one stack panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackPanelStyle {
    pub id: String,
    pub depth: usize,
    pub translate_x: f64,
    pub visibility: Visibility,
    pub z_index: i32,
}

impl StackPanelStyle {
    /// CSS transform, e.g. `translateX(400px)`.
    #[must_use]
    pub fn transform(&self) -> String {
        // Normalize -0.0 so it prints as 0.
        let x = if self.translate_x == 0.0 { 0.0 } else { self.translate_x };
        format!("translateX({x}px)")
    }
}

#[derive(Debug, Clone)]
struct Slot {
    id: String,
    offset: Tween,
}

/// Animated rendering of a [`StackNavigation`].
#[derive(Debug, Clone)]
pub struct StackView {
    config: StackConfig,
    slots: Vec<Slot>,
    len: usize,
    depth: usize,
}

impl StackView {
    /// A view showing `navigation` at rest.
    #[must_use]
    pub fn new(config: StackConfig, navigation: &StackNavigation) -> Self {
        let slots = navigation
            .stack()
            .iter()
            .map(|id| Slot {
                id: id.clone(),
                offset: Tween::settled(0.0).easing(config.easing),
            })
            .collect();
        Self {
            config,
            slots,
            len: navigation.stack().len(),
            depth: navigation.depth(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &StackConfig {
        &self.config
    }

    /// Resize the container. Settled slots snap to the new geometry.
    pub fn set_container_size(&mut self, size: f64) {
        let previous = self.config.container_size;
        self.config.container_size = size;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if index >= self.len && slot.offset.is_complete() && slot.offset.target() == previous {
                slot.offset.jump_to(size);
            }
        }
    }

    /// Point every slot at its new resting place.
    pub fn sync(&mut self, navigation: &StackNavigation) {
        let size = self.config.container_size;
        let transition = self.config.transition();
        for (index, id) in navigation.stack().iter().enumerate() {
            match self.slots.get_mut(index) {
                Some(slot) => {
                    slot.id.clone_from(id);
                    if slot.offset.target() != 0.0 {
                        slot.offset.retarget_with(0.0, transition);
                    }
                }
                None => self.slots.push(Slot {
                    id: id.clone(),
                    offset: Tween::new(size, 0.0, transition).easing(self.config.easing),
                }),
            }
        }
        for slot in self.slots.iter_mut().skip(navigation.stack().len()) {
            if slot.offset.target() != size {
                slot.offset.retarget_with(size, transition);
            }
        }
        if navigation.is_revealing()
            && let Some(top) = self.slots.get_mut(navigation.depth())
        {
            top.offset.jump_to(navigation.reveal_progress() * size);
        }
        self.len = navigation.stack().len();
        self.depth = navigation.depth();
    }

    /// Advance all slot animations. Returns whether any is still running.
    pub fn tick(&mut self, dt: Duration) -> bool {
        let mut running = false;
        for slot in &mut self.slots {
            slot.offset.tick(dt);
            running |= !slot.offset.is_complete();
        }
        running
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.slots.iter().any(|slot| !slot.offset.is_complete())
    }

    /// Styles for every slot, bottom first.
    #[must_use]
    pub fn styles(&self) -> Vec<StackPanelStyle> {
        let top_moving = self
            .slots
            .get(self.depth)
            .is_some_and(|slot| !slot.offset.is_complete() || slot.offset.value() != 0.0);
        self.slots
            .iter()
            .enumerate()
            .map(|(index, slot)| {
                let visible = if index >= self.len {
                    !slot.offset.is_complete()
                } else if index == self.depth {
                    true
                } else {
                    index + 1 == self.depth && top_moving
                };
                StackPanelStyle {
                    id: slot.id.clone(),
                    depth: index,
                    translate_x: slot.offset.value(),
                    visibility: if visible {
                        Visibility::Visible
                    } else {
                        Visibility::Hidden
                    },
                    z_index: index as i32,
                }
            })
            .collect()
    }

    /// Style of the slot at `depth`.
    #[must_use]
    pub fn style_at(&self, depth: usize) -> Option<StackPanelStyle> {
        self.styles().into_iter().nth(depth)
    }
}
