#![forbid(unsafe_code)]

//! Pivot: one active selection among ordered items.
//!
//! A pivot backs swipeable tab bars and their content. Disabled items are
//! left out of the navigable sequence entirely, so indices, counts, and
//! relative positions only ever consider enabled items.
//!
//! # Invariants
//!
//! 1. The active item always exists and is enabled.
//! 2. In [`NavigationMode::Linear`], `can_go(d)` is false whenever the target
//!    index falls outside `[0, enabled_count)`.
//! 3. In [`NavigationMode::Loop`], `can_go(d)` is true for every non-zero `d`
//!    once at least two items are enabled.
//! 4. Listeners are notified once per change of the active item and never
//!    for rejected requests.
//!
//! # Failure Modes
//!
//! - Zero enabled items at construction or in `set_items` is a
//!   [`PivotError`]; it is a wiring error, not user input.
//! - Navigating to a missing or disabled item is a no-op returning `false`.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use trellis_core::animation::{Animation, DEFAULT_TRANSITION, Easing, Tween};
use trellis_core::event::PointerEvent;
use trellis_core::gesture::{
    GestureConfigError, InputState, SwipeConfig, SwipeOutcome, SwipeTracker, scale_input_state,
};
use web_time::Instant;

/// A pivot entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotItem {
    pub id: String,
    #[serde(default)]
    pub disabled: bool,
}

impl PivotItem {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            disabled: false,
        }
    }

    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

/// Behaviour at the ends of the item list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NavigationMode {
    /// Clamped at both ends.
    #[default]
    Linear,
    /// Wraps around.
    Loop,
}

/// Invalid pivot configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PivotError {
    NoEnabledItems,
    DuplicateItemId { id: String },
    /// The requested initial item is missing or disabled.
    InvalidActiveItem { id: String },
}

impl fmt::Display for PivotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoEnabledItems => write!(f, "pivot needs at least one enabled item"),
            Self::DuplicateItemId { id } => write!(f, "pivot item id {id} is used twice"),
            Self::InvalidActiveItem { id } => {
                write!(f, "pivot item {id} cannot be active: it is missing or disabled")
            }
        }
    }
}

impl std::error::Error for PivotError {}

/// Active-item change delivered to listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PivotChange {
    pub previous: String,
    pub current: String,
    /// Signed step in the navigable sequence (wrapped in loop mode).
    pub step: i32,
}

/// Handle returned by [`Pivot::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&PivotChange)>;

/// Active-item selection with linear or loop navigation.
pub struct Pivot {
    items: Vec<PivotItem>,
    /// Indices into `items` of the enabled entries.
    enabled: Vec<usize>,
    /// Position of the active item within `enabled`.
    active: usize,
    mode: NavigationMode,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
}

impl fmt::Debug for Pivot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pivot")
            .field("items", &self.items)
            .field("active", &self.active_id())
            .field("mode", &self.mode)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Pivot {
    /// A pivot whose first enabled item is active.
    pub fn new(items: Vec<PivotItem>, mode: NavigationMode) -> Result<Self, PivotError> {
        let enabled = enabled_indices(&items)?;
        Ok(Self {
            items,
            enabled,
            active: 0,
            mode,
            listeners: Vec::new(),
            next_listener: 0,
        })
    }

    /// A pivot starting at `active`.
    pub fn with_active(items: Vec<PivotItem>, mode: NavigationMode, active: &str) -> Result<Self, PivotError> {
        let mut pivot = Self::new(items, mode)?;
        pivot.active = pivot
            .enabled_position(active)
            .ok_or_else(|| PivotError::InvalidActiveItem { id: active.to_string() })?;
        Ok(pivot)
    }

    #[must_use]
    pub fn items(&self) -> &[PivotItem] {
        &self.items
    }

    #[must_use]
    pub fn mode(&self) -> NavigationMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: NavigationMode) {
        self.mode = mode;
    }

    /// Number of enabled items.
    #[must_use]
    pub fn enabled_count(&self) -> usize {
        self.enabled.len()
    }

    /// Index of the active item among enabled items.
    #[must_use]
    pub fn active_index(&self) -> usize {
        self.active
    }

    #[must_use]
    pub fn active_id(&self) -> &str {
        &self.items[self.enabled[self.active]].id
    }

    /// Whether `go(direction)` would succeed.
    #[must_use]
    pub fn can_go(&self, direction: i32) -> bool {
        if direction == 0 {
            return false;
        }
        let count = self.enabled.len() as i64;
        match self.mode {
            NavigationMode::Linear => {
                let target = self.active as i64 + i64::from(direction);
                (0..count).contains(&target)
            }
            NavigationMode::Loop => count >= 2,
        }
    }

    /// Move `direction` steps. Returns `false` when rejected.
    pub fn go(&mut self, direction: i32) -> bool {
        if !self.can_go(direction) {
            return false;
        }
        let count = self.enabled.len() as i64;
        let target = (self.active as i64 + i64::from(direction)).rem_euclid(count) as usize;
        self.activate(target, direction);
        true
    }

    /// Activate `id`. Missing, disabled, or already active ids are no-ops.
    pub fn set_active_id(&mut self, id: &str) -> bool {
        let Some(target) = self.enabled_position(id) else {
            return false;
        };
        if target == self.active {
            return false;
        }
        let step = target as i32 - self.active as i32;
        self.activate(target, step);
        true
    }

    /// Render slot of `id`: `-1`, `0`, or `1` for the active item and its
    /// neighbours (wrapping in loop mode), `None` for anything farther.
    #[must_use]
    pub fn virtual_position(&self, id: &str) -> Option<i32> {
        self.item_position(id).filter(|position| position.abs() <= 1)
    }

    /// Signed steps from the active item to `id`; the shortest path in loop
    /// mode, with exact ties resolved forward.
    #[must_use]
    pub fn item_position(&self, id: &str) -> Option<i32> {
        let target = self.enabled_position(id)? as i64;
        let active = self.active as i64;
        let position = match self.mode {
            NavigationMode::Linear => target - active,
            NavigationMode::Loop => {
                let count = self.enabled.len() as i64;
                let forward = (target - active).rem_euclid(count);
                if forward * 2 > count { forward - count } else { forward }
            }
        };
        i32::try_from(position).ok()
    }

    /// Replace the items. The active item is kept when it is still enabled;
    /// otherwise the enabled item at the same index (clamped) takes over.
    pub fn set_items(&mut self, items: Vec<PivotItem>) -> Result<(), PivotError> {
        let enabled = enabled_indices(&items)?;
        let previous = self.active_id().to_string();
        let previous_index = self.active;
        self.items = items;
        self.enabled = enabled;
        self.active = self
            .enabled_position(&previous)
            .unwrap_or_else(|| previous_index.min(self.enabled.len() - 1));
        if self.active_id() != previous {
            let change = PivotChange {
                previous,
                current: self.active_id().to_string(),
                step: self.active as i32 - previous_index as i32,
            };
            self.notify(&change);
        }
        Ok(())
    }

    /// Register a change listener.
    pub fn subscribe(&mut self, listener: impl FnMut(&PivotChange) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener, _)| *listener != id);
        self.listeners.len() != before
    }

    fn enabled_position(&self, id: &str) -> Option<usize> {
        self.enabled.iter().position(|&index| self.items[index].id == id)
    }

    fn activate(&mut self, target: usize, step: i32) {
        let previous = self.active_id().to_string();
        self.active = target;
        if self.active_id() == previous {
            return;
        }
        let change = PivotChange {
            previous,
            current: self.active_id().to_string(),
            step,
        };
        tracing::debug!(
            message = "pivot.change",
            previous = %change.previous,
            current = %change.current,
            step
        );
        self.notify(&change);
    }

    fn notify(&mut self, change: &PivotChange) {
        for (_, listener) in &mut self.listeners {
            listener(change);
        }
    }
}

fn enabled_indices(items: &[PivotItem]) -> Result<Vec<usize>, PivotError> {
    for (index, item) in items.iter().enumerate() {
        if items[..index].iter().any(|other| other.id == item.id) {
            return Err(PivotError::DuplicateItemId { id: item.id.clone() });
        }
    }
    let enabled: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| !item.disabled)
        .map(|(index, _)| index)
        .collect();
    if enabled.is_empty() {
        return Err(PivotError::NoEnabledItems);
    }
    Ok(enabled)
}

// ---------------------------------------------------------------------------
// SwipePivot
// ---------------------------------------------------------------------------

/// A [`Pivot`] driven by swipes over its content pane.
///
/// While the finger is down the content follows it; on release the offset
/// animates to rest, either onto the newly active item or back to the old
/// one. A swipe towards the left advances. Grabbing the pane while it
/// settles stops the settle where it is and drags on from there.
#[derive(Debug)]
pub struct SwipePivot {
    pivot: Pivot,
    tracker: SwipeTracker,
    container_width: f64,
    strip_width: f64,
    offset: Tween,
    /// Offset under the finger at pointer-down.
    grab_offset: Option<f64>,
}

impl SwipePivot {
    pub fn new(pivot: Pivot, config: SwipeConfig, container_width: f64) -> Result<Self, GestureConfigError> {
        Ok(Self {
            pivot,
            tracker: SwipeTracker::new(config)?,
            container_width,
            strip_width: 0.0,
            offset: Tween::settled(0.0).easing(Easing::CubicOut),
            grab_offset: None,
        })
    }

    /// Width of the tab strip that moves in lockstep with the content.
    #[must_use]
    pub fn strip_width(mut self, width: f64) -> Self {
        self.strip_width = width;
        self
    }

    pub fn set_container_width(&mut self, width: f64) {
        self.container_width = width;
    }

    #[must_use]
    pub fn pivot(&self) -> &Pivot {
        &self.pivot
    }

    pub fn pivot_mut(&mut self) -> &mut Pivot {
        &mut self.pivot
    }

    /// Current swipe state of the content pane.
    #[must_use]
    pub fn input_state(&self) -> &InputState {
        self.tracker.state()
    }

    /// The swipe state rescaled to the tab strip.
    #[must_use]
    pub fn strip_state(&self) -> InputState {
        scale_input_state(self.tracker.state(), self.container_width, self.strip_width).into_owned()
    }

    /// Horizontal offset of the active content slot.
    #[must_use]
    pub fn content_offset(&self) -> f64 {
        self.offset.value()
    }

    /// [`content_offset`](Self::content_offset) rescaled to the strip.
    #[must_use]
    pub fn strip_offset(&self) -> f64 {
        if self.container_width <= 0.0 || self.strip_width <= 0.0 {
            return 0.0;
        }
        self.offset.value() * self.strip_width / self.container_width
    }

    /// Offset of `id`'s render slot, for the three windowed slots.
    #[must_use]
    pub fn slot_offset(&self, id: &str) -> Option<f64> {
        let slot = self.pivot.virtual_position(id)?;
        Some(f64::from(slot) * self.container_width + self.offset.value())
    }

    /// Whether a settle animation is running.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        !self.offset.is_complete()
    }

    /// Advance the settle animation.
    pub fn tick(&mut self, dt: Duration) {
        self.offset.tick(dt);
    }

    /// Feed a pointer event. Returns the gesture outcome on release.
    pub fn handle_pointer(&mut self, event: &PointerEvent, now: Instant) -> Option<SwipeOutcome> {
        let outcome = self.tracker.handle_pointer(event, now);
        if self.grab_offset.is_none() && self.tracker.active_pointer().is_some() {
            let grabbed = self.offset.value();
            self.offset.jump_to(grabbed);
            self.grab_offset = Some(grabbed);
        }
        let axis = self.tracker.config().axis;
        if self.tracker.state().is_operating() {
            let base = self.grab_offset.unwrap_or_default();
            self.offset.jump_to(base + self.tracker.state().displacement.along(axis));
        }
        let outcome = outcome?;
        self.grab_offset = None;
        self.tracker.acknowledge();
        match outcome {
            SwipeOutcome::Commit { direction, .. } => {
                let step = -direction.sign();
                let dragged = self.offset.value();
                if self.pivot.go(step) {
                    self.offset.jump_to(dragged + f64::from(step) * self.container_width);
                }
                self.offset.retarget_with(0.0, DEFAULT_TRANSITION);
            }
            SwipeOutcome::Cancel => {
                self.offset.retarget_with(0.0, DEFAULT_TRANSITION);
            }
        }
        Some(outcome)
    }

    /// Navigate without a gesture, animating from the current offset.
    pub fn go(&mut self, step: i32) -> bool {
        let current = self.offset.value();
        if !self.pivot.go(step) {
            return false;
        }
        self.offset.jump_to(current + f64::from(step) * self.container_width);
        self.offset.retarget_with(0.0, DEFAULT_TRANSITION);
        true
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn items(ids: &[&str]) -> Vec<PivotItem> {
        ids.iter().map(|id| PivotItem::new(*id)).collect()
    }

    #[test]
    fn linear_rejects_past_ends() {
        let mut pivot = Pivot::new(items(&["a", "b", "c"]), NavigationMode::Linear).expect("valid");
        assert!(!pivot.can_go(-1));
        assert!(!pivot.can_go(0));
        assert!(pivot.go(2));
        assert_eq!(pivot.active_id(), "c");
        assert!(!pivot.go(1));
        assert_eq!(pivot.active_id(), "c");
    }

    #[test]
    fn loop_wraps() {
        let mut pivot = Pivot::new(items(&["a", "b", "c"]), NavigationMode::Loop).expect("valid");
        assert!(pivot.go(-1));
        assert_eq!(pivot.active_id(), "c");
        assert!(pivot.go(1));
        assert_eq!(pivot.active_id(), "a");
        assert_eq!(pivot.virtual_position("c"), Some(-1));
        assert_eq!(pivot.virtual_position("b"), Some(1));
    }

    #[test]
    fn loop_needs_two_items() {
        let pivot = Pivot::new(items(&["only"]), NavigationMode::Loop).expect("valid");
        assert!(!pivot.can_go(1));
    }

    #[test]
    fn disabled_items_are_skipped() {
        let mut pivot = Pivot::new(
            vec![PivotItem::new("a"), PivotItem::new("b").disabled(true), PivotItem::new("c")],
            NavigationMode::Linear,
        )
        .expect("valid");
        assert_eq!(pivot.enabled_count(), 2);
        assert!(pivot.go(1));
        assert_eq!(pivot.active_id(), "c");
        assert!(!pivot.set_active_id("b"));
        assert_eq!(pivot.item_position("b"), None);
        assert_eq!(pivot.item_position("a"), Some(-1));
    }

    #[test]
    fn shortest_path_ties_go_forward() {
        let pivot = Pivot::new(items(&["a", "b", "c", "d"]), NavigationMode::Loop).expect("valid");
        assert_eq!(pivot.item_position("c"), Some(2));
        assert_eq!(pivot.item_position("d"), Some(-1));
        assert_eq!(pivot.virtual_position("c"), None);

        let linear = Pivot::new(items(&["a", "b", "c", "d"]), NavigationMode::Linear).expect("valid");
        assert_eq!(linear.item_position("d"), Some(3));
        assert_eq!(linear.virtual_position("d"), None);
    }

    #[test]
    fn construction_errors() {
        assert_eq!(
            Pivot::new(vec![PivotItem::new("a").disabled(true)], NavigationMode::Linear).map(|_| ()),
            Err(PivotError::NoEnabledItems)
        );
        assert_eq!(
            Pivot::new(items(&["a", "a"]), NavigationMode::Linear).map(|_| ()),
            Err(PivotError::DuplicateItemId { id: "a".into() })
        );
        assert_eq!(
            Pivot::with_active(items(&["a"]), NavigationMode::Linear, "z").map(|_| ()),
            Err(PivotError::InvalidActiveItem { id: "z".into() })
        );
    }

    #[test]
    fn listeners_fire_once_per_change() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut pivot = Pivot::new(items(&["a", "b"]), NavigationMode::Linear).expect("valid");
        let sink = Rc::clone(&seen);
        let id = pivot.subscribe(move |change| sink.borrow_mut().push(change.clone()));

        assert!(pivot.set_active_id("b"));
        assert!(!pivot.set_active_id("b"));
        assert!(!pivot.set_active_id("missing"));
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(seen.borrow()[0].current, "b");
        assert_eq!(seen.borrow()[0].step, 1);

        assert!(pivot.unsubscribe(id));
        assert!(pivot.go(-1));
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn set_items_keeps_or_clamps_active() {
        let mut pivot = Pivot::with_active(items(&["a", "b", "c"]), NavigationMode::Linear, "c").expect("valid");
        pivot.set_items(items(&["c", "d"])).expect("valid");
        assert_eq!(pivot.active_id(), "c");
        pivot.set_items(items(&["x", "y"])).expect("valid");
        assert_eq!(pivot.active_id(), "x");
        assert!(pivot.set_items(Vec::new()).is_err());
        assert_eq!(pivot.active_id(), "x");
    }

    fn at(t0: Instant, ms: u64) -> Instant {
        t0 + Duration::from_millis(ms)
    }

    fn swipe_pivot() -> SwipePivot {
        let pivot = Pivot::new(items(&["a", "b", "c"]), NavigationMode::Linear).expect("valid");
        SwipePivot::new(pivot, SwipeConfig::horizontal(), 400.0)
            .expect("valid")
            .strip_width(100.0)
    }

    #[test]
    fn committed_swipe_advances_and_settles() {
        let mut swipe = swipe_pivot();
        let t0 = Instant::now();
        swipe.handle_pointer(&PointerEvent::down(1, 300.0, 50.0), t0);
        swipe.handle_pointer(&PointerEvent::moved(1, 200.0, 50.0), at(t0, 200));
        assert_eq!(swipe.content_offset(), -100.0);
        assert_eq!(swipe.strip_state().displacement.x, -25.0);
        swipe.handle_pointer(&PointerEvent::moved(1, 100.0, 50.0), at(t0, 400));
        let outcome = swipe.handle_pointer(&PointerEvent::up(1, 100.0, 50.0), at(t0, 500));
        assert!(matches!(outcome, Some(SwipeOutcome::Commit { .. })));
        assert_eq!(swipe.pivot().active_id(), "b");
        // The new active slot starts where it was under the finger.
        assert_eq!(swipe.content_offset(), 200.0);
        assert_eq!(swipe.strip_offset(), 50.0);
        swipe.tick(Duration::from_millis(300));
        assert_eq!(swipe.content_offset(), 0.0);
        assert!(!swipe.is_animating());
    }

    #[test]
    fn short_slow_swipe_springs_back() {
        let mut swipe = swipe_pivot();
        let t0 = Instant::now();
        swipe.handle_pointer(&PointerEvent::down(1, 300.0, 50.0), t0);
        swipe.handle_pointer(&PointerEvent::moved(1, 280.0, 50.0), at(t0, 200));
        swipe.handle_pointer(&PointerEvent::moved(1, 260.0, 50.0), at(t0, 400));
        let outcome = swipe.handle_pointer(&PointerEvent::up(1, 260.0, 50.0), at(t0, 600));
        assert_eq!(outcome, Some(SwipeOutcome::Cancel));
        assert_eq!(swipe.pivot().active_id(), "a");
        assert_eq!(swipe.content_offset(), -40.0);
        swipe.tick(Duration::from_millis(300));
        assert_eq!(swipe.content_offset(), 0.0);
    }

    #[test]
    fn grabbing_mid_settle_drags_from_the_settling_offset() {
        let mut swipe = swipe_pivot();
        assert!(swipe.go(1));
        swipe.tick(Duration::from_millis(60));
        let settling = swipe.content_offset();
        assert!((settling - 204.8).abs() < 1e-9, "{settling}");

        let t0 = Instant::now();
        swipe.handle_pointer(&PointerEvent::down(1, 300.0, 50.0), t0);
        assert!(!swipe.is_animating());
        swipe.tick(Duration::from_millis(16));
        assert_eq!(swipe.content_offset(), settling);

        swipe.handle_pointer(&PointerEvent::moved(1, 285.0, 50.0), at(t0, 16));
        assert!((swipe.content_offset() - (settling - 15.0)).abs() < 1e-9);

        let outcome = swipe.handle_pointer(&PointerEvent::up(1, 285.0, 50.0), at(t0, 400));
        assert_eq!(outcome, Some(SwipeOutcome::Cancel));
        assert_eq!(swipe.pivot().active_id(), "b");
        swipe.tick(Duration::from_millis(300));
        assert_eq!(swipe.content_offset(), 0.0);
    }
}
