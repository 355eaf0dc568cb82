// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Randomized checks of the classification invariants over stacked layouts.

use proptest::prelude::*;
use understory_visibility::{
    ScanStrategy, StackLayout, ViewportBounds, VisibilityStatus, VisibilityTracker, classify,
};

fn layout_and_scrolls() -> impl Strategy<Value = (Vec<f64>, f64, Vec<f64>)> {
    (
        prop::collection::vec(0.0_f64..60.0, 0..40),
        0.0_f64..250.0,
        prop::collection::vec(-100.0_f64..2500.0, 1..12),
    )
}

fn count(statuses: &[VisibilityStatus], flag: VisibilityStatus) -> usize {
    statuses.iter().filter(|s| s.contains(flag)).count()
}

fn check_cycle(layout: &StackLayout, statuses: &[VisibilityStatus]) -> Result<(), TestCaseError> {
    let view = ViewportBounds::from_rect(layout.viewport());
    for (index, status) in statuses.iter().enumerate() {
        let rect = layout.rect(index).unwrap();
        let (top, bottom) = (rect.y0, rect.y1);
        if top >= view.top && bottom <= view.bottom {
            prop_assert!(status.is_visible(), "element {index} is inside the viewport");
        }
        if bottom < view.top || top > view.bottom {
            prop_assert!(status.is_blank(), "element {index} is outside the viewport");
        }
        if status.is_visible() {
            prop_assert!(status.is_partially_visible());
        }
    }

    for flag in [
        VisibilityStatus::FIRST_VISIBLE,
        VisibilityStatus::LAST_VISIBLE,
        VisibilityStatus::FIRST_PARTIALLY_VISIBLE,
        VisibilityStatus::LAST_PARTIALLY_VISIBLE,
    ] {
        prop_assert!(count(statuses, flag) <= 1, "{flag:?} marked more than once");
    }

    let any_visible = statuses.iter().any(|s| s.is_visible());
    for status in statuses {
        let expected = !any_visible && status.is_partially_visible();
        prop_assert_eq!(
            status.is_partially_visible_with_no_visible_siblings(),
            expected
        );
    }
    Ok(())
}

proptest! {
    #[test]
    fn invariants_hold_across_scroll_sequences((heights, viewport, scrolls) in layout_and_scrolls()) {
        let mut layout = StackLayout::stacked(heights, 100.0, viewport);
        let mut tracker = VisibilityTracker::new(layout.handles().collect());
        let mut sink = |_: &usize, _: VisibilityStatus| {};
        tracker.refresh(&layout, &mut sink);
        check_cycle(&layout, tracker.statuses())?;

        for offset in scrolls {
            layout.set_scroll_offset(offset);
            tracker.refresh(&layout, &mut sink);
            check_cycle(&layout, tracker.statuses())?;
        }
    }

    #[test]
    fn incremental_scan_matches_exhaustive_on_stacked_layouts((heights, viewport, scrolls) in layout_and_scrolls()) {
        let mut layout = StackLayout::stacked(heights, 100.0, viewport);
        let handles: Vec<usize> = layout.handles().collect();
        let mut hint = 0;
        for offset in scrolls {
            layout.set_scroll_offset(offset);
            let view = ViewportBounds::from_rect(layout.viewport());
            let incremental = classify(&handles, &layout, view, hint, ScanStrategy::Incremental);
            let exhaustive = classify(&handles, &layout, view, 0, ScanStrategy::Exhaustive);
            prop_assert_eq!(&incremental.statuses, &exhaustive.statuses);
            prop_assert_eq!(incremental.visible_found, exhaustive.visible_found);
            hint = incremental.start_hint();
        }
    }

    #[test]
    fn unchanged_geometry_is_idempotent((heights, viewport, scrolls) in layout_and_scrolls()) {
        let mut layout = StackLayout::stacked(heights, 100.0, viewport);
        layout.set_scroll_offset(scrolls[0]);
        let mut tracker = VisibilityTracker::new(layout.handles().collect());
        let mut sink = |_: &usize, _: VisibilityStatus| {};
        tracker.refresh(&layout, &mut sink);
        let first = tracker.statuses().to_vec();

        let mut notified = 0;
        let mut counter = |_: &usize, _: VisibilityStatus| notified += 1;
        prop_assert_eq!(tracker.refresh(&layout, &mut counter), 0);
        prop_assert_eq!(notified, 0);
        prop_assert_eq!(tracker.statuses(), first.as_slice());
    }
}
