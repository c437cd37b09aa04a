//! End-to-end navigation scenarios: pivot ordering, edge-swipe drawers and
//! the animated stack.

use std::time::Duration;

use proptest::prelude::*;
use trellis_core::event::PointerEvent;
use trellis_core::geometry::Rect;
use trellis_layout::{
    Drawer, DrawerBehavior, DrawerCallbacks, DrawerEdge, EdgeSwipeConfig, NavigationMode, Pivot, PivotItem,
    StackConfig, StackNavigation, StackView, Visibility,
};
use web_time::Instant;

const FRAME: Duration = Duration::from_millis(16);

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn at(t0: Instant, value: u64) -> Instant {
    t0 + ms(value)
}

// ---------------------------------------------------------------------------
// Pivot
// ---------------------------------------------------------------------------

fn pivot_items() -> impl Strategy<Value = Vec<PivotItem>> {
    proptest::collection::vec(any::<bool>(), 1..10).prop_filter_map("needs an enabled item", |flags| {
        if !flags.iter().any(|&disabled| !disabled) {
            return None;
        }
        Some(
            flags
                .into_iter()
                .enumerate()
                .map(|(i, disabled)| PivotItem::new(format!("item-{i}")).disabled(disabled))
                .collect(),
        )
    })
}

fn enabled_ids(pivot: &Pivot) -> Vec<String> {
    pivot
        .items()
        .iter()
        .filter(|item| !item.disabled)
        .map(|item| item.id.clone())
        .collect()
}

proptest! {
    #[test]
    fn linear_positions_follow_item_order(
        items in pivot_items(),
        steps in proptest::collection::vec(-3i32..=3, 0..24),
    ) {
        let mut pivot = Pivot::new(items, NavigationMode::Linear).expect("has enabled items");
        for step in steps {
            let before = pivot.active_index();
            let moved = pivot.go(step);
            let expected = before as i64 + i64::from(step);
            prop_assert_eq!(moved, step != 0 && (0..pivot.enabled_count() as i64).contains(&expected));
            if !moved {
                prop_assert_eq!(pivot.active_index(), before);
            }

            let positions: Vec<i32> = enabled_ids(&pivot)
                .iter()
                .map(|id| pivot.item_position(id).expect("enabled"))
                .collect();
            prop_assert!(positions.windows(2).all(|pair| pair[1] == pair[0] + 1));
            prop_assert_eq!(pivot.item_position(pivot.active_id()), Some(0));
        }
    }

    #[test]
    fn loop_positions_take_the_short_way(
        items in pivot_items(),
        steps in proptest::collection::vec(-3i32..=3, 0..24),
    ) {
        let mut pivot = Pivot::new(items, NavigationMode::Loop).expect("has enabled items");
        for step in steps {
            pivot.go(step);
            let count = pivot.enabled_count() as i32;
            for id in enabled_ids(&pivot) {
                let position = pivot.item_position(&id).expect("enabled");
                prop_assert!(2 * position <= count && -2 * position < count);
                prop_assert_eq!(pivot.virtual_position(&id).is_some(), position.abs() <= 1);
            }
        }
    }
}

#[test]
fn disabled_items_are_skipped() {
    let mut pivot = Pivot::new(
        vec![
            PivotItem::new("a"),
            PivotItem::new("b").disabled(true),
            PivotItem::new("c"),
        ],
        NavigationMode::Linear,
    )
    .expect("valid");
    assert!(pivot.go(1));
    assert_eq!(pivot.active_id(), "c");
    assert_eq!(pivot.item_position("b"), None);
    assert!(!pivot.set_active_id("b"));
}

// ---------------------------------------------------------------------------
// Drawer
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Recorder {
    swipe_opens: usize,
    changes: Vec<bool>,
}

impl DrawerCallbacks for Recorder {
    fn on_swipe_open(&mut self) {
        self.swipe_opens += 1;
    }

    fn on_open_change(&mut self, open: bool) {
        self.changes.push(open);
    }
}

fn edge_drawer() -> Drawer {
    Drawer::new(
        DrawerBehavior::new(DrawerEdge::Left),
        EdgeSwipeConfig::default().edge_zone(20.0),
        Rect::new(0.0, 0.0, 300.0, 600.0),
    )
}

#[test]
fn edge_swipe_opens_on_release_only() {
    let mut drawer = edge_drawer();
    let mut recorder = Recorder::default();
    assert_eq!(drawer.size(), 300.0);

    let t0 = Instant::now();
    assert!(drawer.handle_pointer(&PointerEvent::down(1, 10.0, 200.0), t0, &mut recorder));
    assert!(drawer.handle_pointer(&PointerEvent::moved(1, 120.0, 210.0), at(t0, 400), &mut recorder));
    assert_eq!(recorder.swipe_opens, 0, "nothing fires before release");
    assert!(drawer.progress() > 0.3);
    assert!(!drawer.is_open());

    assert!(drawer.handle_pointer(&PointerEvent::up(1, 120.0, 210.0), at(t0, 600), &mut recorder));
    assert_eq!(recorder.swipe_opens, 1);
    assert_eq!(recorder.changes, [true]);
    assert!(drawer.is_open());

    while drawer.is_animating() {
        drawer.tick(FRAME);
    }
    assert_eq!(drawer.progress(), 1.0);
    assert_eq!(drawer.style().transform(), "translateX(0px)");
    assert_eq!(recorder.swipe_opens, 1);
}

#[test]
fn reverse_swipe_never_opens() {
    let mut drawer = edge_drawer();
    let mut recorder = Recorder::default();
    let t0 = Instant::now();
    drawer.handle_pointer(&PointerEvent::down(1, 10.0, 200.0), t0, &mut recorder);
    drawer.handle_pointer(&PointerEvent::moved(1, 5.0, 200.0), at(t0, 5), &mut recorder);
    assert_eq!(drawer.progress(), 0.0);
    drawer.handle_pointer(&PointerEvent::up(1, 5.0, 200.0), at(t0, 10), &mut recorder);
    assert_eq!(recorder.swipe_opens, 0);
    assert!(recorder.changes.is_empty());
    assert!(!drawer.is_open());
    assert_eq!(drawer.style().visibility, Visibility::Hidden);
}

#[test]
fn short_swipe_snaps_back() {
    let mut drawer = edge_drawer();
    let mut recorder = Recorder::default();
    let t0 = Instant::now();
    drawer.handle_pointer(&PointerEvent::down(1, 10.0, 200.0), t0, &mut recorder);
    drawer.handle_pointer(&PointerEvent::moved(1, 60.0, 200.0), at(t0, 300), &mut recorder);
    drawer.handle_pointer(&PointerEvent::up(1, 60.0, 200.0), at(t0, 500), &mut recorder);
    assert_eq!(recorder.swipe_opens, 0);
    assert!(drawer.is_animating());
    while drawer.is_animating() {
        drawer.tick(FRAME);
    }
    assert_eq!(drawer.progress(), 0.0);
}

// ---------------------------------------------------------------------------
// Stack
// ---------------------------------------------------------------------------

fn settle(view: &mut StackView) {
    while view.tick(FRAME) {}
}

#[test]
fn push_slides_in_and_back_slides_out() {
    let mut nav = StackNavigation::new("home");
    let mut view = StackView::new(StackConfig::new(400.0), &nav);

    nav.push("detail");
    view.sync(&nav);
    let entering = view.style_at(1).expect("pushed slot");
    assert_eq!(entering.transform(), "translateX(400px)");
    assert_eq!(entering.visibility, Visibility::Visible);
    assert_eq!(view.style_at(0).expect("root").visibility, Visibility::Visible);

    settle(&mut view);
    assert_eq!(view.style_at(1).expect("pushed slot").transform(), "translateX(0px)");
    assert_eq!(view.style_at(0).expect("root").visibility, Visibility::Hidden);

    // Back halfway through a second push.
    nav.push("settings");
    view.sync(&nav);
    view.tick(ms(100));
    assert!(nav.go(-1));
    view.sync(&nav);
    settle(&mut view);
    let exited = view.style_at(2).expect("retained slot");
    assert_eq!(exited.transform(), "translateX(400px)");
    assert_eq!(exited.visibility, Visibility::Hidden);
    assert_eq!(view.style_at(1).expect("detail").visibility, Visibility::Visible);
}

#[test]
fn rapid_navigation_never_teleports() {
    let mut nav = StackNavigation::new("home");
    let mut view = StackView::new(StackConfig::new(400.0), &nav);
    nav.push("detail");
    view.sync(&nav);
    view.tick(ms(48));

    let offset = |view: &StackView| view.style_at(1).expect("slot").translate_x;
    for push in [false, true, false, true] {
        let before = offset(&view);
        if push {
            nav.push("detail");
        } else {
            assert!(nav.go(-1));
        }
        view.sync(&nav);
        assert!((offset(&view) - before).abs() < 1e-9, "sync must continue from the current value");

        for _ in 0..5 {
            let previous = offset(&view);
            view.tick(FRAME);
            assert!((offset(&view) - previous).abs() <= 70.0, "frame step too large");
        }
    }
    settle(&mut view);
    assert_eq!(offset(&view), 0.0);
}
