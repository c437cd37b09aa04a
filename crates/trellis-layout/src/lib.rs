#![forbid(unsafe_code)]

//! Layout engines and interaction state machines.
//!
//! # Role in Trellis
//! `trellis-layout` computes authoritative layout state from host input:
//! grid placements and track sizes, floating layer rectangles, the panel/tab
//! split tree, pivot and stack navigation, and drawer progress. A host
//! render tree consumes the produced descriptors ([`GridTemplate`],
//! [`LayerPlacement`], [`PanelLayout`], [`StackPanelStyle`],
//! [`DrawerStyle`]) and feeds measurements back into the
//! [`GeometryRegistry`].
//!
//! # How it fits in the system
//! Input arrives as `trellis_core` pointer and key events. Nothing here
//! renders or schedules frames: animations advance when the host calls
//! `tick` from its frame callback.

pub mod activity;
pub mod drawer;
pub mod grid;
pub mod interaction;
pub mod layer;
pub mod panel;
pub mod pivot;
pub mod registry;
pub mod stack;

pub use activity::ActivityCache;
pub use drawer::{
    DEFAULT_EDGE_ZONE, DEFAULT_OPEN_RATIO, Drawer, DrawerBehavior, DrawerCallbacks, DrawerEdge, DrawerStyle,
    EdgeSwipeConfig,
};
pub use grid::{
    DEFAULT_TRACK_BASELINE, GridArea, GridLayout, GridPlacement, GridTemplate, GridTrack, HandleAlign,
    LayoutConfigError, PanelLayoutConfig, TrackAxis, TrackHandle, TrackSize, compute_areas,
};
pub use interaction::{
    CaptureError, DocumentListeners, InteractionController, InteractionOutcome, InteractionState,
    LayerCallbacks, NoCapture, PointerCapture, ResizeEdge, classify_resize_edge, resize_rect,
};
pub use layer::{
    FloatingBehavior, LayerConstraints, LayerDefinition, LayerId, LayerPlacement, LayerState, PositionMode,
    validate_layers,
};
pub use panel::{
    DropZone, GroupId, GroupModel, PanelAction, PanelCallbacks, PanelController, PanelLayout, PanelModelError,
    PanelNode, PanelTree, SplitDirection, SplitId, SplitPlacement, TabDefinition, TabDragConfig,
    TabDragController, TabDropAction, TabId, pick_drop_zone,
};
pub use pivot::{NavigationMode, Pivot, PivotChange, PivotError, PivotItem, SwipePivot};
pub use registry::{ElementHandle, EntityKey, EntityKind, GeometryRegistry};
pub use stack::{StackConfig, StackError, StackNavigation, StackPanelStyle, StackView, Visibility};
