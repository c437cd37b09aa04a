//! Grid placement and resize clamping properties.

use proptest::prelude::*;
use trellis_core::geometry::{Rect, Vector};
use trellis_layout::{
    GridLayout, GridTrack, HandleAlign, LayerConstraints, LayerDefinition, LayerId, PanelLayoutConfig, ResizeEdge,
    TrackAxis, compute_areas, resize_rect,
};

fn holy_grail() -> GridLayout {
    GridLayout::new(PanelLayoutConfig::new(
        &[
            ["header", "header", "header"],
            ["sidebar", "content", "content"],
            ["sidebar", "content", "content"],
        ],
        vec![GridTrack::new("60px"), GridTrack::new("1fr"), GridTrack::new("1fr")],
        vec![
            GridTrack::resizable("240px").min_size(160.0).max_size(400.0),
            GridTrack::new("1fr"),
            GridTrack::new("1fr"),
        ],
    ))
    .expect("valid config")
}

#[test]
fn three_by_three_scenario() {
    let grid = holy_grail();
    let layers = [
        LayerDefinition::new("header"),
        LayerDefinition::new("sidebar"),
        LayerDefinition::new("main").grid_area("content"),
    ];
    let placements = grid.resolve_placements(&layers).expect("unique ids");
    let span = |id: &str| {
        let placement = &placements[&LayerId::from(id)];
        (placement.grid_row.clone().expect("row"), placement.grid_column.clone().expect("column"))
    };
    assert_eq!(span("header"), ("1 / 2".to_string(), "1 / 4".to_string()));
    assert_eq!(span("sidebar"), ("2 / 4".to_string(), "1 / 2".to_string()));
    assert_eq!(span("main"), ("2 / 4".to_string(), "2 / 4".to_string()));
}

#[test]
fn placements_are_idempotent() {
    let grid = holy_grail();
    let layers = [
        LayerDefinition::new("header"),
        LayerDefinition::new("sidebar").grid_row("1 / 4"),
        LayerDefinition::new("ghost"),
    ];
    let first = grid.resolve_placements(&layers).expect("unique ids");
    let second = grid.resolve_placements(&layers).expect("unique ids");
    assert_eq!(first, second);
    // Explicit row wins; column still comes from the area.
    let sidebar = &first[&LayerId::from("sidebar")];
    assert_eq!(sidebar.grid_row.as_deref(), Some("1 / 4"));
    assert_eq!(sidebar.grid_column.as_deref(), Some("1 / 2"));
    // Unknown area: present but unplaced, not an error.
    assert!(!first[&LayerId::from("ghost")].is_placed());
}

#[test]
fn track_resize_follows_handle_alignment() {
    let mut grid = holy_grail();
    let handles = grid.resize_handles(TrackAxis::Column);
    assert_eq!(handles.len(), 1);
    assert_eq!(handles[0].align, HandleAlign::End);

    let start = grid.track_pixel_size(TrackAxis::Column, 0).expect("track");
    assert_eq!(grid.resize_track(TrackAxis::Column, 0, start, 40.0, HandleAlign::End), Some(280.0));
    assert_eq!(grid.resize_track(TrackAxis::Column, 0, start, 40.0, HandleAlign::End), None);
    assert_eq!(grid.resize_track(TrackAxis::Column, 0, start, 900.0, HandleAlign::End), Some(400.0));
    assert_eq!(grid.template().columns, ["400px", "1fr", "1fr"]);
    // Neighbouring tracks never change.
    assert_eq!(grid.template().rows, ["60px", "1fr", "1fr"]);
}

fn name_matrix() -> impl Strategy<Value = Vec<Vec<String>>> {
    (1usize..5, 1usize..5).prop_flat_map(|(rows, columns)| {
        proptest::collection::vec(
            proptest::collection::vec(prop_oneof![Just("."), Just("a"), Just("b"), Just("c")], columns),
            rows,
        )
        .prop_map(|matrix| {
            matrix
                .into_iter()
                .map(|row| row.into_iter().map(str::to_string).collect())
                .collect()
        })
    })
}

const EDGES: [ResizeEdge; 8] = [
    ResizeEdge::Left,
    ResizeEdge::Right,
    ResizeEdge::Top,
    ResizeEdge::Bottom,
    ResizeEdge::TopLeft,
    ResizeEdge::TopRight,
    ResizeEdge::BottomLeft,
    ResizeEdge::BottomRight,
];

proptest! {
    #[test]
    fn areas_enclose_every_named_cell(matrix in name_matrix()) {
        let areas = compute_areas(&matrix);
        prop_assert_eq!(&areas, &compute_areas(&matrix));
        for (r, row) in matrix.iter().enumerate() {
            for (c, name) in row.iter().enumerate() {
                if name == "." {
                    continue;
                }
                let area = areas[name.as_str()];
                prop_assert!(area.row_start <= r + 1 && r + 1 < area.row_end);
                prop_assert!(area.column_start <= c + 1 && c + 1 < area.column_end);
            }
        }
    }

    #[test]
    fn resize_stays_in_bounds_and_anchors_opposite_edge(
        edge in 0usize..8,
        dx in -600.0f64..600.0,
        dy in -600.0f64..600.0,
        min_w in 10.0f64..150.0,
        extra_w in 0.0f64..300.0,
        min_h in 10.0f64..150.0,
        extra_h in 0.0f64..300.0,
    ) {
        let constraints = LayerConstraints {
            min_width: Some(min_w),
            max_width: Some(min_w + extra_w),
            min_height: Some(min_h),
            max_height: Some(min_h + extra_h),
        };
        let start = Rect::new(100.0, 80.0, 200.0, 150.0);
        let edge = EDGES[edge];
        let rect = resize_rect(start, edge, Vector::new(dx, dy), &constraints);

        let eps = 1e-9;
        prop_assert!(rect.width >= min_w - eps && rect.width <= min_w + extra_w + eps);
        prop_assert!(rect.height >= min_h - eps && rect.height <= min_h + extra_h + eps);
        match edge.horizontal_edge() {
            Some(HandleAlign::Start) => prop_assert!((rect.right() - start.right()).abs() < 1e-6),
            Some(HandleAlign::End) => prop_assert_eq!(rect.x, start.x),
            None => prop_assert_eq!((rect.x, rect.width), (start.x, start.width)),
        }
        match edge.vertical_edge() {
            Some(HandleAlign::Start) => prop_assert!((rect.bottom() - start.bottom()).abs() < 1e-6),
            Some(HandleAlign::End) => prop_assert_eq!(rect.y, start.y),
            None => prop_assert_eq!((rect.y, rect.height), (start.y, start.height)),
        }
    }
}
