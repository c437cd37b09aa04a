#![forbid(unsafe_code)]

//! Layer definitions and placement resolution.
//!
//! A layer is a positionable unit of the grid layout: a panel, an overlay, a
//! floating window, a drawer. Definitions are supplied by the host per
//! render and never mutated; the interaction core keeps the transient
//! position/size overrides in [`LayerState`].
//!
//! # Invariants
//!
//! 1. A layer's placement comes from exactly one source, in priority order:
//!    floating bounds, grid coordinates (explicit or area-derived), absolute
//!    offsets. Sources are never blended.
//! 2. Floating layers must not also declare grid coordinates.

use std::fmt;

use serde::{Deserialize, Serialize};
use trellis_core::geometry::{Point, Rect, Size};

use crate::drawer::DrawerBehavior;
use crate::grid::{GridLayout, GridPlacement, LayoutConfigError};

/// Unique layer id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(String);

impl LayerId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LayerId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for LayerId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// CSS-like positioning scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PositionMode {
    #[default]
    Grid,
    Absolute,
    Relative,
    Fixed,
}

/// Size bounds applied while resizing.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerConstraints {
    pub min_width: Option<f64>,
    pub max_width: Option<f64>,
    pub min_height: Option<f64>,
    pub max_height: Option<f64>,
}

impl LayerConstraints {
    #[must_use]
    pub fn clamp_width(&self, width: f64) -> f64 {
        clamp_bound(width, self.min_width, self.max_width)
    }

    #[must_use]
    pub fn clamp_height(&self, height: f64) -> f64 {
        clamp_bound(height, self.min_height, self.max_height)
    }

    fn is_valid(&self) -> bool {
        let ordered = |min: Option<f64>, max: Option<f64>| match (min, max) {
            (Some(min), Some(max)) => min <= max,
            _ => true,
        };
        ordered(self.min_width, self.max_width) && ordered(self.min_height, self.max_height)
    }
}

fn clamp_bound(value: f64, min: Option<f64>, max: Option<f64>) -> f64 {
    let min = min.unwrap_or(0.0).max(0.0);
    let max = max.unwrap_or(f64::INFINITY).max(min);
    value.clamp(min, max)
}

/// Floating window behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloatingBehavior {
    /// Initial bounds in container coordinates.
    pub bounds: Rect,
    /// Drag handle region relative to the layer origin. Without one the
    /// whole layer is draggable.
    #[serde(default)]
    pub drag_handle: Option<Rect>,
}

impl FloatingBehavior {
    #[must_use]
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            drag_handle: None,
        }
    }

    #[must_use]
    pub fn drag_handle(mut self, handle: Rect) -> Self {
        self.drag_handle = Some(handle);
        self
    }
}

/// A positionable layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerDefinition {
    pub id: LayerId,
    #[serde(default)]
    pub position_mode: PositionMode,
    #[serde(default)]
    pub grid_area: Option<String>,
    #[serde(default)]
    pub grid_row: Option<String>,
    #[serde(default)]
    pub grid_column: Option<String>,
    /// Offsets for non-grid modes.
    #[serde(default)]
    pub position: Option<Point>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub z_index: Option<i32>,
    #[serde(default)]
    pub draggable: bool,
    #[serde(default)]
    pub resizable: bool,
    #[serde(flatten)]
    pub constraints: LayerConstraints,
    #[serde(default)]
    pub drawer: Option<DrawerBehavior>,
    #[serde(default)]
    pub floating: Option<FloatingBehavior>,
}

impl LayerDefinition {
    /// A grid layer placed by its id as area name.
    #[must_use]
    pub fn new(id: impl Into<LayerId>) -> Self {
        Self {
            id: id.into(),
            position_mode: PositionMode::Grid,
            grid_area: None,
            grid_row: None,
            grid_column: None,
            position: None,
            width: None,
            height: None,
            z_index: None,
            draggable: false,
            resizable: false,
            constraints: LayerConstraints::default(),
            drawer: None,
            floating: None,
        }
    }

    /// A floating layer with initial `bounds`.
    #[must_use]
    pub fn floating(id: impl Into<LayerId>, bounds: Rect) -> Self {
        Self {
            position_mode: PositionMode::Absolute,
            floating: Some(FloatingBehavior::new(bounds)),
            draggable: true,
            ..Self::new(id)
        }
    }

    #[must_use]
    pub fn grid_area(mut self, area: impl Into<String>) -> Self {
        self.grid_area = Some(area.into());
        self
    }

    #[must_use]
    pub fn grid_row(mut self, row: impl Into<String>) -> Self {
        self.grid_row = Some(row.into());
        self
    }

    #[must_use]
    pub fn grid_column(mut self, column: impl Into<String>) -> Self {
        self.grid_column = Some(column.into());
        self
    }

    #[must_use]
    pub fn position_mode(mut self, mode: PositionMode) -> Self {
        self.position_mode = mode;
        self
    }

    #[must_use]
    pub fn position(mut self, at: Point) -> Self {
        self.position = Some(at);
        self
    }

    #[must_use]
    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    #[must_use]
    pub fn z_index(mut self, z: i32) -> Self {
        self.z_index = Some(z);
        self
    }

    #[must_use]
    pub fn draggable(mut self, draggable: bool) -> Self {
        self.draggable = draggable;
        self
    }

    #[must_use]
    pub fn resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    #[must_use]
    pub fn constraints(mut self, constraints: LayerConstraints) -> Self {
        self.constraints = constraints;
        self
    }

    #[must_use]
    pub fn drag_handle(mut self, handle: Rect) -> Self {
        if let Some(floating) = self.floating.as_mut() {
            floating.drag_handle = Some(handle);
        }
        self
    }

    #[must_use]
    pub fn drawer(mut self, drawer: DrawerBehavior) -> Self {
        self.drawer = Some(drawer);
        self
    }

    /// Whether the layer declares any grid coordinate.
    #[must_use]
    pub fn has_grid_coordinates(&self) -> bool {
        self.grid_area.is_some() || self.grid_row.is_some() || self.grid_column.is_some()
    }

    /// Declared rect before any transient override.
    #[must_use]
    pub fn declared_rect(&self) -> Rect {
        if let Some(floating) = &self.floating {
            return floating.bounds;
        }
        let origin = self.position.unwrap_or(Point::ZERO);
        Rect::new(
            origin.x,
            origin.y,
            self.width.unwrap_or(0.0),
            self.height.unwrap_or(0.0),
        )
    }

    /// Check definition-local rules.
    pub fn validate(&self) -> Result<(), LayoutConfigError> {
        if self.floating.is_some() && self.has_grid_coordinates() {
            return Err(LayoutConfigError::ConflictingPlacement {
                id: self.id.clone(),
            });
        }
        if !self.constraints.is_valid() {
            return Err(LayoutConfigError::InvalidConstraints {
                id: self.id.clone(),
            });
        }
        Ok(())
    }
}

/// Validate a layer list: per-layer rules plus id uniqueness.
pub fn validate_layers(layers: &[LayerDefinition]) -> Result<(), LayoutConfigError> {
    let mut seen = rustc_hash::FxHashSet::default();
    for layer in layers {
        layer.validate()?;
        if !seen.insert(&layer.id) {
            return Err(LayoutConfigError::DuplicateLayerId {
                id: layer.id.clone(),
            });
        }
    }
    Ok(())
}

/// Transient position/size derived from interactions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LayerState {
    pub position: Option<Point>,
    pub size: Option<Size>,
}

impl LayerState {
    /// `declared` with the overrides applied.
    #[must_use]
    pub fn apply(&self, declared: Rect) -> Rect {
        let origin = self.position.unwrap_or(declared.origin());
        let size = self.size.unwrap_or(declared.size());
        Rect::new(origin.x, origin.y, size.width, size.height)
    }
}

/// Where a layer renders this frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LayerPlacement {
    Floating { rect: Rect, z_index: Option<i32> },
    Grid(GridPlacement),
    Positioned {
        mode: PositionMode,
        rect: Rect,
        z_index: Option<i32>,
    },
    /// The layer's area does not exist; it renders unplaced.
    Unplaced,
}

impl LayerPlacement {
    /// Resolve one layer from exactly one positioning source.
    #[must_use]
    pub fn resolve(layer: &LayerDefinition, grid: &GridLayout, state: Option<&LayerState>) -> Self {
        let state = state.copied().unwrap_or_default();
        if layer.floating.is_some() {
            return Self::Floating {
                rect: state.apply(layer.declared_rect()),
                z_index: layer.z_index,
            };
        }
        match layer.position_mode {
            PositionMode::Grid => {
                let placement = grid.placement_for(layer);
                if placement.is_placed() {
                    Self::Grid(placement)
                } else {
                    Self::Unplaced
                }
            }
            mode => Self::Positioned {
                mode,
                rect: state.apply(layer.declared_rect()),
                z_index: layer.z_index,
            },
        }
    }
}
