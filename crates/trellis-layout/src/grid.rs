#![forbid(unsafe_code)]

//! Grid layout engine.
//!
//! A [`PanelLayoutConfig`] names grid cells with an area matrix and sizes the
//! rows and columns with [`GridTrack`]s. [`GridLayout`] validates it once,
//! derives the bounding box of every named area, resolves layer placements,
//! and owns the live pixel sizes of resizable tracks.
//!
//! # Invariants
//!
//! 1. `rows.len()` equals the matrix height and `columns.len()` its width;
//!    construction fails otherwise.
//! 2. Explicit `grid_row` / `grid_column` on a layer always win over the
//!    span inherited from its area, independently per axis.
//! 3. A boundary between two tracks carries at most one resize handle.
//! 4. Stored track sizes always lie in `[min_size, max_size]`.
//!
//! # Failure Modes
//!
//! - A layer naming an area absent from the matrix stays unplaced.
//! - Non-contiguous duplicate area names produce one box enclosing all of
//!   their cells.
//! - Resize handles sit only on interior track boundaries, never on the
//!   container's outer edges. A resizable track with no boundary of its own
//!   (the only track on its axis, or a last track whose one boundary belongs
//!   to a resizable predecessor) gets no handle.

use std::collections::BTreeMap;
use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::layer::{LayerDefinition, LayerId, PositionMode};

/// Pixel size assumed for resizable tracks whose size is not in `px` and has
/// not been measured yet.
pub const DEFAULT_TRACK_BASELINE: f64 = 300.0;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// One row or column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridTrack {
    /// CSS length: `240px`, `1fr`, `auto`, `25%`, ...
    pub size: String,
    #[serde(default)]
    pub resizable: bool,
    #[serde(default)]
    pub min_size: Option<f64>,
    #[serde(default)]
    pub max_size: Option<f64>,
}

impl GridTrack {
    /// A fixed, non-resizable track.
    #[must_use]
    pub fn new(size: impl Into<String>) -> Self {
        Self {
            size: size.into(),
            resizable: false,
            min_size: None,
            max_size: None,
        }
    }

    /// A resizable track.
    #[must_use]
    pub fn resizable(size: impl Into<String>) -> Self {
        Self {
            resizable: true,
            ..Self::new(size)
        }
    }

    #[must_use]
    pub fn min_size(mut self, px: f64) -> Self {
        self.min_size = Some(px);
        self
    }

    #[must_use]
    pub fn max_size(mut self, px: f64) -> Self {
        self.max_size = Some(px);
        self
    }

    /// Parsed form of [`size`](Self::size).
    #[must_use]
    pub fn parsed_size(&self) -> TrackSize {
        TrackSize::parse(&self.size)
    }

    /// Clamp a pixel size to this track's bounds.
    #[must_use]
    pub fn clamp(&self, px: f64) -> f64 {
        let min = self.min_size.unwrap_or(0.0).max(0.0);
        let max = self.max_size.unwrap_or(f64::INFINITY).max(min);
        px.clamp(min, max)
    }
}

/// Parsed CSS track length.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackSize {
    Px(f64),
    Fr(f64),
    Percent(f64),
    Auto,
    /// Anything else (`minmax(...)`, `fit-content(...)`), passed through.
    Other(String),
}

impl TrackSize {
    /// Parse a CSS track length.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let s = raw.trim();
        if s.eq_ignore_ascii_case("auto") {
            return Self::Auto;
        }
        let number = |suffix: &str| {
            s.strip_suffix(suffix)
                .and_then(|n| n.trim().parse::<f64>().ok())
                .filter(|n| n.is_finite())
        };
        if let Some(px) = number("px") {
            Self::Px(px)
        } else if let Some(fr) = number("fr") {
            Self::Fr(fr)
        } else if let Some(pct) = number("%") {
            Self::Percent(pct)
        } else {
            Self::Other(s.to_string())
        }
    }
}

/// Grid layout configuration supplied by the host.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelLayoutConfig {
    /// Area names per cell, row-major. `.` and empty strings are unnamed.
    pub areas: Vec<Vec<String>>,
    pub rows: Vec<GridTrack>,
    pub columns: Vec<GridTrack>,
    #[serde(default)]
    pub gap: Option<String>,
    /// Opaque container style forwarded to the renderer.
    #[serde(default)]
    pub style: BTreeMap<String, String>,
}

impl PanelLayoutConfig {
    /// Build a config from string-slice rows.
    #[must_use]
    pub fn new<R, C>(areas: &[R], rows: Vec<GridTrack>, columns: Vec<GridTrack>) -> Self
    where
        R: AsRef<[C]>,
        C: AsRef<str>,
    {
        Self {
            areas: areas
                .iter()
                .map(|row| row.as_ref().iter().map(|c| c.as_ref().to_string()).collect())
                .collect(),
            rows,
            columns,
            gap: None,
            style: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn gap(mut self, gap: impl Into<String>) -> Self {
        self.gap = Some(gap.into());
        self
    }
}

/// Which track list a track belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TrackAxis {
    Row,
    Column,
}

impl fmt::Display for TrackAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Row => f.write_str("row"),
            Self::Column => f.write_str("column"),
        }
    }
}

/// Malformed grid configuration or layer list.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutConfigError {
    EmptyAreas,
    RaggedAreas {
        row: usize,
        expected: usize,
        found: usize,
    },
    TrackCountMismatch {
        axis: TrackAxis,
        matrix: usize,
        tracks: usize,
    },
    InvalidTrackBounds {
        axis: TrackAxis,
        index: usize,
        min: f64,
        max: f64,
    },
    DuplicateLayerId {
        id: LayerId,
    },
    /// A floating layer also declares grid coordinates.
    ConflictingPlacement {
        id: LayerId,
    },
    /// A layer's min size exceeds its max size.
    InvalidConstraints {
        id: LayerId,
    },
}

impl fmt::Display for LayoutConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyAreas => f.write_str("area matrix must have at least one row and column"),
            Self::RaggedAreas {
                row,
                expected,
                found,
            } => write!(
                f,
                "area matrix row {row} has {found} cells, expected {expected}"
            ),
            Self::TrackCountMismatch {
                axis,
                matrix,
                tracks,
            } => write!(
                f,
                "area matrix has {matrix} {axis}s but {tracks} {axis} tracks were supplied"
            ),
            Self::InvalidTrackBounds {
                axis,
                index,
                min,
                max,
            } => write!(f, "{axis} track {index} has min_size {min} > max_size {max}"),
            Self::DuplicateLayerId { id } => write!(f, "layer id {id} is defined more than once"),
            Self::ConflictingPlacement { id } => write!(
                f,
                "layer {id} declares both floating bounds and grid coordinates"
            ),
            Self::InvalidConstraints { id } => {
                write!(f, "layer {id} has a min size larger than its max size")
            }
        }
    }
}

impl std::error::Error for LayoutConfigError {}

// ---------------------------------------------------------------------------
// Areas and placements
// ---------------------------------------------------------------------------

/// Bounding box of a named area as 1-based grid lines (end exclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridArea {
    pub row_start: usize,
    pub row_end: usize,
    pub column_start: usize,
    pub column_end: usize,
}

impl GridArea {
    /// CSS `grid-row` value, e.g. `2 / 4`.
    #[must_use]
    pub fn row_span(&self) -> String {
        format!("{} / {}", self.row_start, self.row_end)
    }

    /// CSS `grid-column` value.
    #[must_use]
    pub fn column_span(&self) -> String {
        format!("{} / {}", self.column_start, self.column_end)
    }
}

/// Compute the bounding box of every named area in one scan.
#[must_use]
pub fn compute_areas<R, C>(matrix: &[R]) -> BTreeMap<String, GridArea>
where
    R: AsRef<[C]>,
    C: AsRef<str>,
{
    let mut areas: BTreeMap<String, GridArea> = BTreeMap::new();
    for (row, cells) in matrix.iter().enumerate() {
        for (column, cell) in cells.as_ref().iter().enumerate() {
            let name = cell.as_ref().trim();
            if name.is_empty() || name == "." {
                continue;
            }
            areas
                .entry(name.to_string())
                .and_modify(|area| {
                    area.row_start = area.row_start.min(row + 1);
                    area.row_end = area.row_end.max(row + 2);
                    area.column_start = area.column_start.min(column + 1);
                    area.column_end = area.column_end.max(column + 2);
                })
                .or_insert(GridArea {
                    row_start: row + 1,
                    row_end: row + 2,
                    column_start: column + 1,
                    column_end: column + 2,
                });
        }
    }
    areas
}

/// Resolved grid placement of one layer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridPlacement {
    pub grid_row: Option<String>,
    pub grid_column: Option<String>,
}

impl GridPlacement {
    /// Whether the layer has any grid coordinates.
    #[must_use]
    pub fn is_placed(&self) -> bool {
        self.grid_row.is_some() || self.grid_column.is_some()
    }
}

/// Where a resize handle sits relative to the track that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HandleAlign {
    /// Leading edge: moving the pointer forward shrinks the track.
    Start,
    /// Trailing edge: moving the pointer forward grows the track.
    End,
}

impl HandleAlign {
    /// Sign applied to pointer deltas.
    #[must_use]
    pub const fn sign(self) -> f64 {
        match self {
            Self::Start => -1.0,
            Self::End => 1.0,
        }
    }
}

/// A track resize handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackHandle {
    pub axis: TrackAxis,
    /// Index of the owning track.
    pub track: usize,
    pub align: HandleAlign,
}

/// Rendered grid container template.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridTemplate {
    pub rows: Vec<String>,
    pub columns: Vec<String>,
    /// Quoted area rows, `"header header" "sidebar content"`.
    pub areas: String,
    pub gap: Option<String>,
}

impl GridTemplate {
    /// CSS `grid-template-rows`.
    #[must_use]
    pub fn template_rows(&self) -> String {
        self.rows.join(" ")
    }

    /// CSS `grid-template-columns`.
    #[must_use]
    pub fn template_columns(&self) -> String {
        self.columns.join(" ")
    }
}

// ---------------------------------------------------------------------------
// GridLayout
// ---------------------------------------------------------------------------

/// A validated grid with live track sizes.
#[derive(Debug, Clone)]
pub struct GridLayout {
    config: PanelLayoutConfig,
    areas: BTreeMap<String, GridArea>,
    track_sizes: FxHashMap<(TrackAxis, usize), f64>,
    measured: FxHashMap<(TrackAxis, usize), f64>,
}

impl GridLayout {
    /// Validate `config` and compute its areas.
    pub fn new(config: PanelLayoutConfig) -> Result<Self, LayoutConfigError> {
        let height = config.areas.len();
        let width = config.areas.first().map_or(0, Vec::len);
        if height == 0 || width == 0 {
            return Err(LayoutConfigError::EmptyAreas);
        }
        for (row, cells) in config.areas.iter().enumerate() {
            if cells.len() != width {
                return Err(LayoutConfigError::RaggedAreas {
                    row,
                    expected: width,
                    found: cells.len(),
                });
            }
        }
        for (axis, tracks, matrix) in [
            (TrackAxis::Row, &config.rows, height),
            (TrackAxis::Column, &config.columns, width),
        ] {
            if tracks.len() != matrix {
                return Err(LayoutConfigError::TrackCountMismatch {
                    axis,
                    matrix,
                    tracks: tracks.len(),
                });
            }
            for (index, track) in tracks.iter().enumerate() {
                if let (Some(min), Some(max)) = (track.min_size, track.max_size)
                    && min > max
                {
                    return Err(LayoutConfigError::InvalidTrackBounds {
                        axis,
                        index,
                        min,
                        max,
                    });
                }
            }
        }

        let areas = compute_areas(&config.areas);
        tracing::debug!(
            message = "grid.build",
            rows = height,
            columns = width,
            areas = areas.len()
        );
        Ok(Self {
            config,
            areas,
            track_sizes: FxHashMap::default(),
            measured: FxHashMap::default(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &PanelLayoutConfig {
        &self.config
    }

    /// All named areas.
    #[must_use]
    pub fn areas(&self) -> &BTreeMap<String, GridArea> {
        &self.areas
    }

    #[must_use]
    pub fn area(&self, name: &str) -> Option<GridArea> {
        self.areas.get(name).copied()
    }

    /// Tracks along an axis.
    #[must_use]
    pub fn tracks(&self, axis: TrackAxis) -> &[GridTrack] {
        match axis {
            TrackAxis::Row => &self.config.rows,
            TrackAxis::Column => &self.config.columns,
        }
    }

    /// Resolve grid placements for every grid-positioned layer.
    ///
    /// Layers are keyed by id, so each layer is placed exactly once; a
    /// repeated id is a configuration error.
    pub fn resolve_placements(
        &self,
        layers: &[LayerDefinition],
    ) -> Result<BTreeMap<LayerId, GridPlacement>, LayoutConfigError> {
        let mut placements = BTreeMap::new();
        let mut seen = rustc_hash::FxHashSet::default();
        for layer in layers {
            if !seen.insert(&layer.id) {
                return Err(LayoutConfigError::DuplicateLayerId {
                    id: layer.id.clone(),
                });
            }
            if layer.position_mode != PositionMode::Grid || layer.floating.is_some() {
                continue;
            }
            placements.insert(layer.id.clone(), self.placement_for(layer));
        }
        Ok(placements)
    }

    /// Placement of a single layer.
    #[must_use]
    pub fn placement_for(&self, layer: &LayerDefinition) -> GridPlacement {
        let area_name = layer.grid_area.as_deref().unwrap_or(layer.id.as_str());
        let inherited = self.areas.get(area_name);
        GridPlacement {
            grid_row: layer
                .grid_row
                .clone()
                .or_else(|| inherited.map(GridArea::row_span)),
            grid_column: layer
                .grid_column
                .clone()
                .or_else(|| inherited.map(GridArea::column_span)),
        }
    }

    /// Container template with live sizes for resized tracks.
    #[must_use]
    pub fn template(&self) -> GridTemplate {
        let render = |axis: TrackAxis| -> Vec<String> {
            self.tracks(axis)
                .iter()
                .enumerate()
                .map(|(index, track)| match self.track_sizes.get(&(axis, index)) {
                    Some(px) if track.resizable => format!("{px}px"),
                    _ => track.size.clone(),
                })
                .collect()
        };
        let areas = self
            .config
            .areas
            .iter()
            .map(|row| format!("\"{}\"", row.join(" ")))
            .collect::<Vec<_>>()
            .join(" ");
        GridTemplate {
            rows: render(TrackAxis::Row),
            columns: render(TrackAxis::Column),
            areas,
            gap: self.config.gap.clone(),
        }
    }

    /// Resize handles along an axis, at most one per interior boundary.
    #[must_use]
    pub fn resize_handles(&self, axis: TrackAxis) -> Vec<TrackHandle> {
        let tracks = self.tracks(axis);
        let mut handles = Vec::new();
        for boundary in 1..tracks.len() {
            let (before, after) = (boundary - 1, boundary);
            if tracks[before].resizable {
                handles.push(TrackHandle {
                    axis,
                    track: before,
                    align: HandleAlign::End,
                });
            } else if tracks[after].resizable {
                handles.push(TrackHandle {
                    axis,
                    track: after,
                    align: HandleAlign::Start,
                });
            }
        }
        handles
    }

    /// Current pixel size of a track, if it exists.
    ///
    /// Order: live size, declared `px` size, measured size, baseline.
    #[must_use]
    pub fn track_pixel_size(&self, axis: TrackAxis, index: usize) -> Option<f64> {
        let track = self.tracks(axis).get(index)?;
        if let Some(px) = self.track_sizes.get(&(axis, index)) {
            return Some(*px);
        }
        if let TrackSize::Px(px) = track.parsed_size() {
            return Some(px);
        }
        Some(
            self.measured
                .get(&(axis, index))
                .copied()
                .unwrap_or(DEFAULT_TRACK_BASELINE),
        )
    }

    /// Record the rendered size of a track reported by the host.
    pub fn measure_track(&mut self, axis: TrackAxis, index: usize, px: f64) {
        if index < self.tracks(axis).len() && px.is_finite() && px >= 0.0 {
            self.measured.insert((axis, index), px);
        }
    }

    /// Set a resizable track's live size, clamped. Returns the new size only
    /// if it changed.
    pub fn set_track_size(&mut self, axis: TrackAxis, index: usize, px: f64) -> Option<f64> {
        let track = self.tracks(axis).get(index)?;
        if !track.resizable || !px.is_finite() {
            return None;
        }
        let clamped = track.clamp(px);
        let previous = self.track_pixel_size(axis, index);
        self.track_sizes.insert((axis, index), clamped);
        if previous == Some(clamped) {
            return None;
        }
        tracing::trace!(message = "grid.track_resize", %axis, index, size = clamped);
        Some(clamped)
    }

    /// Apply a pointer delta to a track that was `start_size` px when the
    /// drag began.
    pub fn resize_track(
        &mut self,
        axis: TrackAxis,
        index: usize,
        start_size: f64,
        delta: f64,
        align: HandleAlign,
    ) -> Option<f64> {
        self.set_track_size(axis, index, start_size + align.sign() * delta)
    }

    /// Forget all live sizes (back to declared sizes).
    pub fn reset_track_sizes(&mut self) {
        self.track_sizes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holy_grail() -> PanelLayoutConfig {
        PanelLayoutConfig::new(
            &[
                ["header", "header", "header"],
                ["sidebar", "content", "content"],
                ["sidebar", "content", "content"],
            ],
            vec![GridTrack::new("60px"), GridTrack::new("1fr"), GridTrack::new("1fr")],
            vec![
                GridTrack::resizable("240px").min_size(120.0).max_size(480.0),
                GridTrack::new("1fr"),
                GridTrack::new("1fr"),
            ],
        )
    }

    #[test]
    fn areas_cover_multi_cell_spans() {
        let grid = GridLayout::new(holy_grail()).expect("valid config");
        let header = grid.area("header").expect("header");
        assert_eq!((header.row_span(), header.column_span()), ("1 / 2".into(), "1 / 4".into()));
        let sidebar = grid.area("sidebar").expect("sidebar");
        assert_eq!((sidebar.row_span(), sidebar.column_span()), ("2 / 4".into(), "1 / 2".into()));
        let content = grid.area("content").expect("content");
        assert_eq!((content.row_span(), content.column_span()), ("2 / 4".into(), "2 / 4".into()));
    }

    #[test]
    fn dots_and_blanks_are_unnamed() {
        let areas = compute_areas(&[[".", "a"], [" ", "a"]]);
        assert_eq!(areas.len(), 1);
        assert_eq!(areas["a"].row_span(), "1 / 3");
    }

    #[test]
    fn non_contiguous_names_enclose_all_cells() {
        let areas = compute_areas(&[["x", ".", "x"]]);
        assert_eq!(areas["x"].column_span(), "1 / 4");
    }

    #[test]
    fn mismatched_track_counts_fail_fast() {
        let mut config = holy_grail();
        config.rows.pop();
        assert_eq!(
            GridLayout::new(config).unwrap_err(),
            LayoutConfigError::TrackCountMismatch {
                axis: TrackAxis::Row,
                matrix: 3,
                tracks: 2
            }
        );

        let mut config = holy_grail();
        config.columns.push(GridTrack::new("auto"));
        assert!(matches!(
            GridLayout::new(config),
            Err(LayoutConfigError::TrackCountMismatch {
                axis: TrackAxis::Column,
                ..
            })
        ));
    }

    #[test]
    fn ragged_and_empty_matrices_fail() {
        let mut config = holy_grail();
        config.areas[1].pop();
        assert!(matches!(
            GridLayout::new(config),
            Err(LayoutConfigError::RaggedAreas { row: 1, .. })
        ));
        assert_eq!(
            GridLayout::new(PanelLayoutConfig::default()).unwrap_err(),
            LayoutConfigError::EmptyAreas
        );
    }

    #[test]
    fn inverted_track_bounds_fail() {
        let mut config = holy_grail();
        config.columns[0] = GridTrack::resizable("200px").min_size(300.0).max_size(100.0);
        assert!(matches!(
            GridLayout::new(config),
            Err(LayoutConfigError::InvalidTrackBounds { index: 0, .. })
        ));
    }

    #[test]
    fn track_size_parsing() {
        assert_eq!(TrackSize::parse("240px"), TrackSize::Px(240.0));
        assert_eq!(TrackSize::parse(" 1.5fr "), TrackSize::Fr(1.5));
        assert_eq!(TrackSize::parse("25%"), TrackSize::Percent(25.0));
        assert_eq!(TrackSize::parse("AUTO"), TrackSize::Auto);
        assert_eq!(
            TrackSize::parse("minmax(100px, 1fr)"),
            TrackSize::Other("minmax(100px, 1fr)".into())
        );
    }

    #[test]
    fn non_pixel_tracks_use_baseline_until_measured() {
        let config = PanelLayoutConfig::new(
            &[["a", "b"]],
            vec![GridTrack::new("1fr")],
            vec![GridTrack::resizable("1fr"), GridTrack::new("auto")],
        );
        let mut grid = GridLayout::new(config).expect("valid");
        assert_eq!(
            grid.track_pixel_size(TrackAxis::Column, 0),
            Some(DEFAULT_TRACK_BASELINE)
        );
        grid.measure_track(TrackAxis::Column, 0, 412.0);
        assert_eq!(grid.track_pixel_size(TrackAxis::Column, 0), Some(412.0));
        assert_eq!(grid.track_pixel_size(TrackAxis::Column, 9), None);
    }

    #[test]
    fn resize_clamps_and_reports_changes_once() {
        let mut grid = GridLayout::new(holy_grail()).expect("valid");
        assert_eq!(
            grid.resize_track(TrackAxis::Column, 0, 240.0, 60.0, HandleAlign::End),
            Some(300.0)
        );
        assert_eq!(
            grid.resize_track(TrackAxis::Column, 0, 240.0, 60.0, HandleAlign::End),
            None
        );
        assert_eq!(
            grid.resize_track(TrackAxis::Column, 0, 240.0, 1000.0, HandleAlign::End),
            Some(480.0)
        );
        assert_eq!(
            grid.resize_track(TrackAxis::Column, 0, 240.0, -1000.0, HandleAlign::End),
            Some(120.0)
        );
        // Non-resizable tracks never change.
        assert_eq!(
            grid.resize_track(TrackAxis::Column, 1, 100.0, 10.0, HandleAlign::End),
            None
        );
        assert_eq!(grid.template().columns, vec!["120px", "1fr", "1fr"]);
    }

    #[test]
    fn outer_edges_carry_no_handles() {
        let single = PanelLayoutConfig::new(
            &[["a"]],
            vec![GridTrack::new("1fr")],
            vec![GridTrack::resizable("100px")],
        );
        let grid = GridLayout::new(single).expect("valid");
        assert!(grid.resize_handles(TrackAxis::Column).is_empty());

        let trailing = PanelLayoutConfig::new(
            &[["a", "b", "c"]],
            vec![GridTrack::new("1fr")],
            vec![
                GridTrack::new("1fr"),
                GridTrack::resizable("100px"),
                GridTrack::resizable("100px"),
            ],
        );
        let grid = GridLayout::new(trailing).expect("valid");
        let handles = grid.resize_handles(TrackAxis::Column);
        assert_eq!(handles.len(), 2);
        assert!(handles.iter().all(|handle| handle.track == 1));
    }

    #[test]
    fn handles_never_double_up() {
        let config = PanelLayoutConfig::new(
            &[["a", "b", "c", "d"]],
            vec![GridTrack::new("1fr")],
            vec![
                GridTrack::resizable("100px"),
                GridTrack::resizable("100px"),
                GridTrack::new("1fr"),
                GridTrack::resizable("100px"),
            ],
        );
        let grid = GridLayout::new(config).expect("valid");
        let handles = grid.resize_handles(TrackAxis::Column);
        assert_eq!(
            handles,
            vec![
                TrackHandle {
                    axis: TrackAxis::Column,
                    track: 0,
                    align: HandleAlign::End
                },
                TrackHandle {
                    axis: TrackAxis::Column,
                    track: 1,
                    align: HandleAlign::End
                },
                TrackHandle {
                    axis: TrackAxis::Column,
                    track: 3,
                    align: HandleAlign::Start
                },
            ]
        );
        assert!(grid.resize_handles(TrackAxis::Row).is_empty());
    }

    #[test]
    fn start_aligned_handle_shrinks_on_forward_motion() {
        let config = PanelLayoutConfig::new(
            &[["main", "inspector"]],
            vec![GridTrack::new("1fr")],
            vec![GridTrack::new("1fr"), GridTrack::resizable("300px").min_size(200.0)],
        );
        let mut grid = GridLayout::new(config).expect("valid");
        assert_eq!(
            grid.resize_track(TrackAxis::Column, 1, 300.0, 40.0, HandleAlign::Start),
            Some(260.0)
        );
    }

    #[test]
    fn template_quotes_area_rows() {
        let grid = GridLayout::new(holy_grail().gap("8px")).expect("valid");
        let template = grid.template();
        assert_eq!(
            template.areas,
            "\"header header header\" \"sidebar content content\" \"sidebar content content\""
        );
        assert_eq!(template.template_rows(), "60px 1fr 1fr");
        assert_eq!(template.gap.as_deref(), Some("8px"));
    }
}
