// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The visibility classifier.
//!
//! [`classify`] turns element geometry and the current [`ViewportBounds`] into
//! one [`VisibilityStatus`] per element. With [`ScanStrategy::Incremental`] it
//! avoids touching the whole list: the scan starts from a hint (the previous
//! cycle's topmost partially visible element), walks backward to pick up
//! elements that scrolled in above it, then walks forward until the run of
//! visible elements ends.
//!
//! The early stop assumes that elements are stacked monotonically along the
//! vertical axis, so that the visible elements form one contiguous run in
//! list order. Lists that overlap or are out of order should use
//! [`ScanStrategy::Exhaustive`].

use alloc::vec;
use alloc::vec::Vec;
use core::ops::Range;

use crate::{GeometryProvider, ViewportBounds, VisibilityStatus};

/// How much of the element list a cycle inspects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScanStrategy {
    /// Start near the previous cycle's visible run and stop as soon as the
    /// current run ends.
    #[default]
    Incremental,
    /// Classify every element every cycle.
    Exhaustive,
}

/// Result of one classification pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Classification {
    /// One status per element, in list order.
    pub statuses: Vec<VisibilityStatus>,
    /// Elements whose geometry was inspected. Statuses outside it are blank.
    pub scanned: Range<usize>,
    /// Whether any element in the scanned range was fully visible.
    pub visible_found: bool,
}

impl Classification {
    fn empty() -> Self {
        Self {
            statuses: Vec::new(),
            scanned: 0..0,
            visible_found: false,
        }
    }

    /// Index to start the next cycle from: the topmost partially visible
    /// element, or `0` if nothing overlapped the viewport.
    #[must_use]
    pub fn start_hint(&self) -> usize {
        self.statuses[self.scanned.clone()]
            .iter()
            .position(|s| s.is_first_partially_visible())
            .map_or(0, |offset| self.scanned.start + offset)
    }
}

/// Classifies a single element extent against the viewport.
///
/// Only [`VisibilityStatus::VISIBLE`] and [`VisibilityStatus::PARTIALLY_VISIBLE`]
/// can be set here; the positional flags depend on the rest of the list.
#[must_use]
pub fn classify_extent(viewport: ViewportBounds, top: f64, bottom: f64) -> VisibilityStatus {
    let mut status = VisibilityStatus::BLANK;
    if viewport.contains(top, bottom) {
        status = status.with(VisibilityStatus::VISIBLE);
    }
    if viewport.overlaps(top, bottom) {
        status = status.with(VisibilityStatus::PARTIALLY_VISIBLE);
    }
    status
}

/// Returns `None` for elements without a finite extent; those stay blank and
/// do not end a visible run.
fn classify_element<K, G>(
    geometry: &G,
    element: &K,
    viewport: ViewportBounds,
) -> Option<VisibilityStatus>
where
    G: GeometryProvider<K> + ?Sized,
{
    let (top, bottom) = geometry.vertical_extent(element);
    if !(top.is_finite() && bottom.is_finite()) {
        vwarn!(top, bottom, "non-finite element extent, treating as not visible");
        return None;
    }
    Some(classify_extent(viewport, top, bottom))
}

/// Walks backward from `hint` while the candidate has not yet scrolled out
/// above the viewport.
fn resolve_start<K, G>(elements: &[K], geometry: &G, viewport: ViewportBounds, hint: usize) -> usize
where
    G: GeometryProvider<K> + ?Sized,
{
    let mut start = hint.min(elements.len().saturating_sub(1));
    while start > 0 {
        let (_, bottom) = geometry.vertical_extent(&elements[start]);
        if viewport.is_above(bottom) {
            break;
        }
        start -= 1;
    }
    start
}

/// Classifies `elements` against `viewport`.
///
/// `start_hint` is only consulted by [`ScanStrategy::Incremental`]; pass `0`
/// (or [`Classification::start_hint`] of the previous pass) when unsure.
///
/// ```
/// use understory_visibility::{ScanStrategy, StackLayout, ViewportBounds, classify};
///
/// // Three 100px tall elements stacked from the top of the document.
/// let layout = StackLayout::stacked([100.0, 100.0, 100.0], 320.0, 150.0);
/// let elements: Vec<usize> = layout.handles().collect();
///
/// let pass = classify(
///     &elements,
///     &layout,
///     ViewportBounds::new(50.0, 250.0),
///     0,
///     ScanStrategy::Incremental,
/// );
/// assert!(pass.statuses[0].is_first_partially_visible());
/// assert!(pass.statuses[1].is_first_visible() && pass.statuses[1].is_last_visible());
/// assert!(pass.statuses[2].is_last_partially_visible());
/// ```
#[must_use]
pub fn classify<K, G>(
    elements: &[K],
    geometry: &G,
    viewport: ViewportBounds,
    start_hint: usize,
    strategy: ScanStrategy,
) -> Classification
where
    G: GeometryProvider<K> + ?Sized,
{
    let len = elements.len();
    if len == 0 {
        return Classification::empty();
    }

    let start = match strategy {
        ScanStrategy::Incremental => resolve_start(elements, geometry, viewport, start_hint),
        ScanStrategy::Exhaustive => 0,
    };

    let mut statuses = vec![VisibilityStatus::BLANK; len];
    let mut visible_found = false;
    let mut found_any = false;
    let mut end = len;
    for (index, element) in elements.iter().enumerate().skip(start) {
        let Some(status) = classify_element(geometry, element, viewport) else {
            continue;
        };
        if status.intersects(VisibilityStatus::VISIBLE | VisibilityStatus::PARTIALLY_VISIBLE) {
            found_any = true;
            visible_found |= status.is_visible();
        } else if found_any && strategy == ScanStrategy::Incremental {
            end = index;
            break;
        }
        statuses[index] = status;
    }
    let scanned = start..end;

    mark_first(&mut statuses[scanned.clone()]);
    mark_last(&mut statuses);

    if !visible_found {
        for status in &mut statuses[scanned.clone()] {
            if status.is_partially_visible() {
                *status = status.with(VisibilityStatus::PARTIALLY_VISIBLE_WITH_NO_VISIBLE_SIBLINGS);
            }
        }
    }

    vtrace!(
        start = scanned.start,
        end = scanned.end,
        visible_found,
        "classified elements"
    );

    Classification {
        statuses,
        scanned,
        visible_found,
    }
}

fn mark_first(statuses: &mut [VisibilityStatus]) {
    let mut visible_marked = false;
    let mut partial_marked = false;
    for status in statuses {
        if !visible_marked && status.is_visible() {
            *status = status.with(VisibilityStatus::FIRST_VISIBLE);
            visible_marked = true;
        }
        if !partial_marked && status.is_partially_visible() {
            *status = status.with(VisibilityStatus::FIRST_PARTIALLY_VISIBLE);
            partial_marked = true;
        }
        if visible_marked && partial_marked {
            break;
        }
    }
}

// Runs over the whole list rather than the scanned range; the bottommost
// visible element is wherever the last non-blank status is.
fn mark_last(statuses: &mut [VisibilityStatus]) {
    let mut visible_marked = false;
    let mut partial_marked = false;
    for status in statuses.iter_mut().rev() {
        if !visible_marked && status.is_visible() {
            *status = status.with(VisibilityStatus::LAST_VISIBLE);
            visible_marked = true;
        }
        if !partial_marked && status.is_partially_visible() {
            *status = status.with(VisibilityStatus::LAST_PARTIALLY_VISIBLE);
            partial_marked = true;
        }
        if visible_marked && partial_marked {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use kurbo::Rect;

    use super::{ScanStrategy, classify, classify_extent};
    use crate::{StackLayout, ViewportBounds, VisibilityStatus};

    fn stacked(heights: &[f64]) -> (StackLayout, Vec<usize>) {
        let layout = StackLayout::stacked(heights.iter().copied(), 100.0, 100.0);
        let handles = layout.handles().collect();
        (layout, handles)
    }

    fn flags(statuses: &[VisibilityStatus], f: impl Fn(VisibilityStatus) -> bool) -> Vec<usize> {
        statuses
            .iter()
            .enumerate()
            .filter(|(_, s)| f(**s))
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn extent_predicates() {
        let view = ViewportBounds::new(50.0, 180.0);
        assert_eq!(classify_extent(view, 200.0, 300.0), VisibilityStatus::BLANK);
        assert_eq!(
            classify_extent(view, 0.0, 100.0),
            VisibilityStatus::PARTIALLY_VISIBLE
        );
        assert_eq!(
            classify_extent(view, 60.0, 170.0),
            VisibilityStatus::VISIBLE | VisibilityStatus::PARTIALLY_VISIBLE
        );
    }

    #[test]
    fn empty_list_yields_empty_classification() {
        let (layout, handles) = stacked(&[]);
        let pass = classify(
            &handles,
            &layout,
            ViewportBounds::new(0.0, 100.0),
            3,
            ScanStrategy::Incremental,
        );
        assert!(pass.statuses.is_empty());
        assert_eq!(pass.scanned, 0..0);
        assert!(!pass.visible_found);
        assert_eq!(pass.start_hint(), 0);
    }

    #[test]
    fn three_stacked_elements_without_a_fully_visible_one() {
        // Tops 0, 100, 200; none fits entirely inside [50, 180].
        let (layout, handles) = stacked(&[100.0, 100.0, 100.0]);
        let pass = classify(
            &handles,
            &layout,
            ViewportBounds::new(50.0, 180.0),
            0,
            ScanStrategy::Incremental,
        );
        let s = &pass.statuses;
        assert!(s[0].is_partially_visible() && !s[0].is_visible());
        assert!(s[1].is_partially_visible() && !s[1].is_visible());
        assert!(!s[2].is_partially_visible());
        assert!(!pass.visible_found);
        assert!(s[0].is_first_partially_visible());
        assert!(s[1].is_last_partially_visible());
        assert!(s[0].is_partially_visible_with_no_visible_siblings());
        assert!(s[1].is_partially_visible_with_no_visible_siblings());
        assert_eq!(s[2], VisibilityStatus::BLANK);
        assert_eq!(pass.start_hint(), 0);
    }

    #[test]
    fn middle_element_fully_visible() {
        let (layout, handles) = stacked(&[100.0, 100.0, 100.0]);
        let pass = classify(
            &handles,
            &layout,
            ViewportBounds::new(50.0, 200.0),
            0,
            ScanStrategy::Incremental,
        );
        let s = &pass.statuses;
        assert!(pass.visible_found);
        assert_eq!(
            s[0],
            VisibilityStatus::PARTIALLY_VISIBLE | VisibilityStatus::FIRST_PARTIALLY_VISIBLE
        );
        assert_eq!(
            s[1],
            VisibilityStatus::VISIBLE
                | VisibilityStatus::PARTIALLY_VISIBLE
                | VisibilityStatus::FIRST_VISIBLE
                | VisibilityStatus::LAST_VISIBLE
        );
        // The bottom edge is inclusive, so element 2 touches the viewport.
        assert_eq!(
            s[2],
            VisibilityStatus::PARTIALLY_VISIBLE | VisibilityStatus::LAST_PARTIALLY_VISIBLE
        );
        assert!(!s[0].is_partially_visible_with_no_visible_siblings());
    }

    #[test]
    fn everything_below_the_viewport_is_blank() {
        let layout = StackLayout::from_boxes(
            [Rect::new(0.0, 100.0, 10.0, 150.0), Rect::new(0.0, 150.0, 10.0, 200.0)],
            Rect::new(0.0, 0.0, 10.0, 50.0),
        );
        let handles: Vec<usize> = layout.handles().collect();
        let pass = classify(
            &handles,
            &layout,
            ViewportBounds::new(0.0, 50.0),
            0,
            ScanStrategy::Incremental,
        );
        assert!(pass.statuses.iter().all(|s| s.is_blank()));
        assert!(!pass.visible_found);
    }

    #[test]
    fn forward_scan_stops_after_the_visible_run() {
        // 100 elements of 10 each; viewport covers 200..=250.
        let (layout, handles) = stacked(&[10.0; 100]);
        let pass = classify(
            &handles,
            &layout,
            ViewportBounds::new(200.0, 250.0),
            20,
            ScanStrategy::Incremental,
        );
        // Element 19 ends at 200 and touches the viewport, so the walk-back
        // continues to 18, the first element entirely above.
        assert_eq!(pass.scanned, 18..26);
        assert_eq!(flags(&pass.statuses, |s| s.is_visible()), [20, 21, 22, 23, 24]);
        assert_eq!(
            flags(&pass.statuses, |s| s.is_partially_visible()),
            [19, 20, 21, 22, 23, 24, 25]
        );
        assert_eq!(flags(&pass.statuses, |s| s.is_first_visible()), [20]);
        assert_eq!(flags(&pass.statuses, |s| s.is_last_visible()), [24]);
        assert_eq!(flags(&pass.statuses, |s| s.is_first_partially_visible()), [19]);
        assert_eq!(flags(&pass.statuses, |s| s.is_last_partially_visible()), [25]);
        assert_eq!(pass.start_hint(), 19);
    }

    #[test]
    fn walk_back_recovers_elements_above_a_stale_hint() {
        let (layout, handles) = stacked(&[10.0; 100]);
        // The hint points far below the viewport after a large upward jump.
        let pass = classify(
            &handles,
            &layout,
            ViewportBounds::new(5.0, 35.0),
            80,
            ScanStrategy::Incremental,
        );
        assert_eq!(pass.scanned.start, 0);
        assert_eq!(flags(&pass.statuses, |s| s.is_visible()), [1, 2]);
        assert_eq!(pass.start_hint(), 0);
    }

    #[test]
    fn stale_hint_above_the_viewport_scans_forward() {
        let (layout, handles) = stacked(&[10.0; 100]);
        let pass = classify(
            &handles,
            &layout,
            ViewportBounds::new(605.0, 625.0),
            3,
            ScanStrategy::Incremental,
        );
        assert_eq!(pass.scanned, 3..63);
        assert_eq!(flags(&pass.statuses, |s| s.is_visible()), [61]);
        assert_eq!(
            flags(&pass.statuses, |s| s.is_partially_visible()),
            [60, 61, 62]
        );
    }

    #[test]
    fn hint_past_the_end_is_clamped() {
        let (layout, handles) = stacked(&[10.0; 5]);
        let pass = classify(
            &handles,
            &layout,
            ViewportBounds::new(0.0, 100.0),
            usize::MAX,
            ScanStrategy::Incremental,
        );
        assert_eq!(pass.scanned, 0..5);
        assert_eq!(flags(&pass.statuses, |s| s.is_visible()), [0, 1, 2, 3, 4]);
    }

    #[test]
    fn incremental_scan_misses_elements_after_a_gap_in_list_order() {
        // Element 2 is placed back inside the viewport, out of document order.
        let layout = StackLayout::from_boxes(
            [
                Rect::new(0.0, 0.0, 10.0, 10.0),
                Rect::new(0.0, 500.0, 10.0, 510.0),
                Rect::new(0.0, 20.0, 10.0, 30.0),
            ],
            Rect::new(0.0, 0.0, 10.0, 100.0),
        );
        let handles: Vec<usize> = layout.handles().collect();
        let view = ViewportBounds::new(0.0, 100.0);

        let incremental = classify(&handles, &layout, view, 0, ScanStrategy::Incremental);
        assert_eq!(flags(&incremental.statuses, |s| s.is_visible()), [0]);
        assert_eq!(incremental.scanned, 0..1);

        let exhaustive = classify(&handles, &layout, view, 0, ScanStrategy::Exhaustive);
        assert_eq!(flags(&exhaustive.statuses, |s| s.is_visible()), [0, 2]);
        assert_eq!(exhaustive.scanned, 0..3);
        assert_eq!(flags(&exhaustive.statuses, |s| s.is_last_visible()), [2]);
    }

    #[test]
    fn oversized_element_is_only_partially_visible() {
        let (layout, handles) = stacked(&[50.0, 1000.0, 50.0]);
        let pass = classify(
            &handles,
            &layout,
            ViewportBounds::new(100.0, 300.0),
            0,
            ScanStrategy::Incremental,
        );
        let s = &pass.statuses;
        assert_eq!(
            s[1],
            VisibilityStatus::PARTIALLY_VISIBLE
                | VisibilityStatus::FIRST_PARTIALLY_VISIBLE
                | VisibilityStatus::LAST_PARTIALLY_VISIBLE
                | VisibilityStatus::PARTIALLY_VISIBLE_WITH_NO_VISIBLE_SIBLINGS
        );
        assert!(s[0].is_blank() && s[2].is_blank());
    }

    #[test]
    fn unknown_handles_are_never_visible() {
        let (layout, _) = stacked(&[10.0, 10.0]);
        let handles = [0_usize, 7, 1];
        let pass = classify(
            &handles,
            &layout,
            ViewportBounds::new(0.0, 100.0),
            0,
            ScanStrategy::Exhaustive,
        );
        assert!(pass.statuses[0].is_visible());
        assert!(pass.statuses[1].is_blank());
        assert!(pass.statuses[2].is_last_visible());
    }

    #[test]
    fn unknown_handle_inside_the_run_does_not_end_it() {
        let (layout, _) = stacked(&[10.0, 10.0, 10.0]);
        let handles = [0_usize, 7, 1, 2];
        let view = ViewportBounds::new(0.0, 100.0);
        let incremental = classify(&handles, &layout, view, 0, ScanStrategy::Incremental);
        let exhaustive = classify(&handles, &layout, view, 0, ScanStrategy::Exhaustive);
        assert_eq!(incremental.statuses, exhaustive.statuses);
        assert_eq!(incremental.scanned, 0..4);
        assert!(incremental.statuses[1].is_blank());
        assert!(incremental.statuses[2].is_visible());
        assert!(incremental.statuses[3].is_last_visible());
        assert!(incremental.statuses[3].is_last_partially_visible());
        assert!(!incremental.statuses[0].is_last_visible());
    }
}
