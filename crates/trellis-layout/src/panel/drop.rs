#![forbid(unsafe_code)]

//! Drop-zone resolution over a group rectangle.
//!
//! A group rect is partitioned into five zones: a margin band along each
//! edge and the remaining center. Center drops the tab into the group; an
//! edge zone splits the group toward that edge.
//!
//! # Invariants
//!
//! 1. Margin comparisons are strict: a point exactly on the margin line is
//!    in the center.
//! 2. In a corner the nearer edge wins; exact diagonal ties go to the
//!    horizontal edge.
//! 3. With a previous zone, the pointer must leave that zone by more than
//!    the deadzone before the result changes.

use serde::{Deserialize, Serialize};
use trellis_core::geometry::{Point, Rect};

use super::model::{SplitDirection, SplitPlacement};

/// Fraction of each dimension that forms an edge zone.
pub const DROP_ZONE_MARGIN: f64 = 0.25;

/// Hysteresis band (fraction) around zone boundaries.
pub const DROP_ZONE_DEADZONE: f64 = 0.02;

/// Drop zone of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DropZone {
    Center,
    Left,
    Right,
    Top,
    Bottom,
}

impl DropZone {
    /// Split direction and placement for an edge zone; `None` for center.
    #[must_use]
    pub const fn split(self) -> Option<(SplitDirection, SplitPlacement)> {
        match self {
            Self::Center => None,
            Self::Left => Some((SplitDirection::Horizontal, SplitPlacement::Before)),
            Self::Right => Some((SplitDirection::Horizontal, SplitPlacement::After)),
            Self::Top => Some((SplitDirection::Vertical, SplitPlacement::Before)),
            Self::Bottom => Some((SplitDirection::Vertical, SplitPlacement::After)),
        }
    }

    /// Preview rectangle of a drop into this zone.
    #[must_use]
    pub fn ghost_rect(self, rect: Rect) -> Rect {
        let (half_w, half_h) = (rect.width / 2.0, rect.height / 2.0);
        match self {
            Self::Center => rect,
            Self::Left => Rect::new(rect.x, rect.y, half_w, rect.height),
            Self::Right => Rect::new(rect.x + half_w, rect.y, half_w, rect.height),
            Self::Top => Rect::new(rect.x, rect.y, rect.width, half_h),
            Self::Bottom => Rect::new(rect.x, rect.y + half_h, rect.width, half_h),
        }
    }
}

/// Zone of `point` within `rect`; `None` outside or for empty rects.
#[must_use]
pub fn pick_drop_zone(point: Point, rect: Rect) -> Option<DropZone> {
    let (fx, fy) = fractions(point, rect)?;
    Some(classify(fx, fy))
}

/// Like [`pick_drop_zone`], but keeps `previous` while the pointer is within
/// the deadzone of its boundary.
#[must_use]
pub fn pick_drop_zone_with_previous(point: Point, rect: Rect, previous: Option<DropZone>) -> Option<DropZone> {
    let (fx, fy) = fractions(point, rect)?;
    let raw = classify(fx, fy);
    match previous {
        Some(previous) if previous != raw && still_holds(previous, fx, fy) => Some(previous),
        _ => Some(raw),
    }
}

fn fractions(point: Point, rect: Rect) -> Option<(f64, f64)> {
    if !rect.contains(point) {
        return None;
    }
    rect.fraction_of(point)
}

fn classify(fx: f64, fy: f64) -> DropZone {
    let horizontal = if fx < DROP_ZONE_MARGIN {
        Some((DropZone::Left, fx))
    } else if fx > 1.0 - DROP_ZONE_MARGIN {
        Some((DropZone::Right, 1.0 - fx))
    } else {
        None
    };
    let vertical = if fy < DROP_ZONE_MARGIN {
        Some((DropZone::Top, fy))
    } else if fy > 1.0 - DROP_ZONE_MARGIN {
        Some((DropZone::Bottom, 1.0 - fy))
    } else {
        None
    };
    match (horizontal, vertical) {
        (None, None) => DropZone::Center,
        (Some((zone, _)), None) | (None, Some((zone, _))) => zone,
        (Some((h, dh)), Some((v, dv))) => {
            if dv < dh {
                v
            } else {
                h
            }
        }
    }
}

fn still_holds(zone: DropZone, fx: f64, fy: f64) -> bool {
    let band = DROP_ZONE_MARGIN + DROP_ZONE_DEADZONE;
    let dh = fx.min(1.0 - fx);
    let dv = fy.min(1.0 - fy);
    match zone {
        DropZone::Center => {
            dh >= DROP_ZONE_MARGIN - DROP_ZONE_DEADZONE && dv >= DROP_ZONE_MARGIN - DROP_ZONE_DEADZONE
        }
        DropZone::Left => fx < band && fx <= dv + DROP_ZONE_DEADZONE,
        DropZone::Right => 1.0 - fx < band && 1.0 - fx <= dv + DROP_ZONE_DEADZONE,
        DropZone::Top => fy < band && fy <= dh + DROP_ZONE_DEADZONE,
        DropZone::Bottom => 1.0 - fy < band && 1.0 - fy <= dh + DROP_ZONE_DEADZONE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECT: Rect = Rect::new(0.0, 0.0, 100.0, 100.0);

    fn at(x: f64, y: f64) -> Option<DropZone> {
        pick_drop_zone(Point::new(x, y), RECT)
    }

    #[test]
    fn five_zones() {
        assert_eq!(at(50.0, 50.0), Some(DropZone::Center));
        assert_eq!(at(10.0, 50.0), Some(DropZone::Left));
        assert_eq!(at(90.0, 50.0), Some(DropZone::Right));
        assert_eq!(at(50.0, 10.0), Some(DropZone::Top));
        assert_eq!(at(50.0, 90.0), Some(DropZone::Bottom));
        assert_eq!(at(150.0, 50.0), None);
    }

    #[test]
    fn margin_line_is_center() {
        assert_eq!(at(25.0, 50.0), Some(DropZone::Center));
        assert_eq!(at(75.0, 50.0), Some(DropZone::Center));
    }

    #[test]
    fn corners_pick_nearest_edge() {
        assert_eq!(at(5.0, 20.0), Some(DropZone::Left));
        assert_eq!(at(20.0, 5.0), Some(DropZone::Top));
        assert_eq!(at(95.0, 90.0), Some(DropZone::Right));
        assert_eq!(at(10.0, 10.0), Some(DropZone::Left));
    }

    #[test]
    fn hysteresis_keeps_previous_near_boundary() {
        let rect = RECT;
        // Just past the margin line: raw result is center, previous left holds.
        let point = Point::new(26.0, 50.0);
        assert_eq!(pick_drop_zone(point, rect), Some(DropZone::Center));
        assert_eq!(
            pick_drop_zone_with_previous(point, rect, Some(DropZone::Left)),
            Some(DropZone::Left)
        );
        // Well past it, the zone changes.
        assert_eq!(
            pick_drop_zone_with_previous(Point::new(40.0, 50.0), rect, Some(DropZone::Left)),
            Some(DropZone::Center)
        );
        // Diagonal: near-tie keeps the previous edge.
        assert_eq!(
            pick_drop_zone_with_previous(Point::new(10.0, 9.0), rect, Some(DropZone::Left)),
            Some(DropZone::Left)
        );
        assert_eq!(pick_drop_zone(Point::new(10.0, 9.0), rect), Some(DropZone::Top));
    }

    #[test]
    fn edge_zones_map_to_splits() {
        assert_eq!(DropZone::Center.split(), None);
        assert_eq!(
            DropZone::Top.split(),
            Some((SplitDirection::Vertical, SplitPlacement::Before))
        );
        assert_eq!(DropZone::Right.ghost_rect(RECT), Rect::new(50.0, 0.0, 50.0, 100.0));
    }
}
