#![forbid(unsafe_code)]

//! Trellis public facade crate.
//!
//! Re-exports the common surface of `trellis-core` and `trellis-layout` and
//! offers a prelude for day-to-day usage. Hosts that need the less common
//! pieces reach them through [`core`] and [`layout`].

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use trellis_core::animation::{Animation, AnimationTicket, DEFAULT_TRANSITION, Easing, Tween};
pub use trellis_core::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, Modifiers, PointerButton, PointerEvent, PointerEventKind,
    PointerType, TargetRole,
};
pub use trellis_core::geometry::{Axis, Point, Rect, Sides, Size, Vector};
pub use trellis_core::gesture::{
    GestureConfigError, InputState, OperationPhase, SwipeConfig, SwipeDecision, SwipeDirection, SwipeOutcome,
    SwipeTracker, scale_input_state,
};

// --- Layout re-exports -----------------------------------------------------

pub use trellis_layout::{
    ActivityCache, Drawer, DrawerBehavior, DrawerCallbacks, DrawerEdge, DrawerStyle, DropZone,
    EdgeSwipeConfig, GeometryRegistry, GridLayout, GridPlacement, GridTemplate, GridTrack, GroupId,
    GroupModel, InteractionController, LayerCallbacks, LayerConstraints, LayerDefinition, LayerId,
    LayerPlacement, LayoutConfigError, NavigationMode, PanelAction, PanelCallbacks, PanelController,
    PanelLayout, PanelLayoutConfig, PanelModelError, PanelTree, Pivot, PivotError, PivotItem,
    SplitDirection, SplitPlacement, StackConfig, StackError, StackNavigation, StackPanelStyle, StackView,
    SwipePivot, TabDefinition, TabDragController, TabId, TrackAxis, Visibility,
};

pub use trellis_core as core;
pub use trellis_layout as layout;

// --- Errors ---------------------------------------------------------------

/// Any configuration error a Trellis constructor can return.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    Layout(LayoutConfigError),
    Panel(PanelModelError),
    Pivot(PivotError),
    Stack(StackError),
    Gesture(GestureConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Layout(err) => write!(f, "layout: {err}"),
            Self::Panel(err) => write!(f, "panel: {err}"),
            Self::Pivot(err) => write!(f, "pivot: {err}"),
            Self::Stack(err) => write!(f, "stack: {err}"),
            Self::Gesture(err) => write!(f, "gesture: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Layout(err) => Some(err),
            Self::Panel(err) => Some(err),
            Self::Pivot(err) => Some(err),
            Self::Stack(err) => Some(err),
            Self::Gesture(err) => Some(err),
        }
    }
}

impl From<LayoutConfigError> for Error {
    fn from(err: LayoutConfigError) -> Self {
        Self::Layout(err)
    }
}

impl From<PanelModelError> for Error {
    fn from(err: PanelModelError) -> Self {
        Self::Panel(err)
    }
}

impl From<PivotError> for Error {
    fn from(err: PivotError) -> Self {
        Self::Pivot(err)
    }
}

impl From<StackError> for Error {
    fn from(err: StackError) -> Self {
        Self::Stack(err)
    }
}

impl From<GestureConfigError> for Error {
    fn from(err: GestureConfigError) -> Self {
        Self::Gesture(err)
    }
}

/// Standard result type for Trellis constructors.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude ---------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Animation, Drawer, DrawerBehavior, DrawerEdge, EdgeSwipeConfig, Error, GeometryRegistry, GridLayout,
        GridTrack, GroupModel, KeyEvent, LayerDefinition, NavigationMode, PanelAction, PanelController,
        PanelLayoutConfig, PanelTree, Pivot, PivotItem, Point, PointerEvent, Rect, Result, SplitDirection,
        StackConfig, StackNavigation, StackView, SwipeConfig, SwipePivot, TabDefinition,
    };

    pub use crate::{core, layout};
}
