// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The tracker: element list, per-cycle statuses, and the scan hint.

use alloc::vec;
use alloc::vec::Vec;

use crate::{
    GeometryProvider, ScanStrategy, StatusChangeSink, TrackerError, ViewportBounds,
    VisibilityStatus, classify, notify_changes,
};

/// Tracks the visibility of a fixed, ordered list of elements across scroll cycles.
///
/// The element list is fixed at construction and is expected to be in
/// document order (top to bottom). Each call to [`refresh`](Self::refresh)
/// is one scan cycle: it samples the viewport, classifies the elements,
/// replaces the current status array, and notifies the sink of every element
/// whose status changed since the previous cycle.
///
/// The first cycle after construction has no previous statuses, so it
/// notifies every element.
///
/// ```
/// use understory_visibility::{StackLayout, VisibilityStatus, VisibilityTracker};
///
/// // Ten 40px rows in a 100px tall viewport.
/// let mut layout = StackLayout::stacked([40.0; 10], 320.0, 100.0);
/// let mut tracker = VisibilityTracker::new(layout.handles().collect());
///
/// let mut changes = Vec::new();
/// let mut record = |row: &usize, status: VisibilityStatus| changes.push((*row, status));
///
/// assert_eq!(tracker.refresh(&layout, &mut record), 10);
/// assert_eq!(tracker.first_visible(), Some(0));
/// assert_eq!(tracker.last_visible(), Some(1));
/// assert_eq!(tracker.last_partially_visible(), Some(2));
///
/// // Nothing moved: nothing to report.
/// assert_eq!(tracker.refresh(&layout, &mut record), 0);
///
/// layout.set_scroll_offset(200.0);
/// assert!(tracker.refresh(&layout, &mut record) > 0);
/// assert_eq!(tracker.first_visible(), Some(5));
/// ```
#[derive(Clone, Debug)]
pub struct VisibilityTracker<K> {
    elements: Vec<K>,
    statuses: Vec<VisibilityStatus>,
    previous: Option<Vec<VisibilityStatus>>,
    start_hint: usize,
    strategy: ScanStrategy,
    cycles: u64,
}

impl<K> VisibilityTracker<K> {
    /// Creates a tracker over `elements` with one blank status per element.
    #[must_use]
    pub fn new(elements: Vec<K>) -> Self {
        let len = elements.len();
        Self {
            elements,
            statuses: vec![VisibilityStatus::BLANK; len],
            previous: None,
            start_hint: 0,
            strategy: ScanStrategy::default(),
            cycles: 0,
        }
    }

    /// Creates a tracker from a list that may have absent entries.
    ///
    /// Fails with [`TrackerError::MissingElement`] naming the first absent entry.
    pub fn from_slots(slots: impl IntoIterator<Item = Option<K>>) -> Result<Self, TrackerError> {
        let elements = slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| slot.ok_or(TrackerError::MissingElement { index }))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(elements))
    }

    /// Sets the scan strategy used by subsequent cycles.
    #[must_use]
    pub fn with_strategy(mut self, strategy: ScanStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Returns the scan strategy.
    #[must_use]
    pub const fn strategy(&self) -> ScanStrategy {
        self.strategy
    }

    /// Tracked elements, in document order.
    #[must_use]
    pub fn elements(&self) -> &[K] {
        &self.elements
    }

    /// Number of tracked elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if no elements are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Statuses from the most recent cycle, parallel to [`elements`](Self::elements).
    #[must_use]
    pub fn statuses(&self) -> &[VisibilityStatus] {
        &self.statuses
    }

    /// Status of the element at `index` from the most recent cycle.
    #[must_use]
    pub fn status(&self, index: usize) -> Option<VisibilityStatus> {
        self.statuses.get(index).copied()
    }

    /// Statuses from the cycle before the most recent one, if there was one.
    #[must_use]
    pub fn previous_statuses(&self) -> Option<&[VisibilityStatus]> {
        self.previous.as_deref()
    }

    /// Number of scan cycles run so far.
    #[must_use]
    pub const fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Index the next incremental scan starts from.
    #[must_use]
    pub const fn start_hint(&self) -> usize {
        self.start_hint
    }

    /// Index of the topmost fully visible element.
    #[must_use]
    pub fn first_visible(&self) -> Option<usize> {
        self.position(VisibilityStatus::FIRST_VISIBLE)
    }

    /// Index of the bottommost fully visible element.
    #[must_use]
    pub fn last_visible(&self) -> Option<usize> {
        self.position(VisibilityStatus::LAST_VISIBLE)
    }

    /// Index of the topmost partially visible element.
    #[must_use]
    pub fn first_partially_visible(&self) -> Option<usize> {
        self.position(VisibilityStatus::FIRST_PARTIALLY_VISIBLE)
    }

    /// Index of the bottommost partially visible element.
    #[must_use]
    pub fn last_partially_visible(&self) -> Option<usize> {
        self.position(VisibilityStatus::LAST_PARTIALLY_VISIBLE)
    }

    fn position(&self, flag: VisibilityStatus) -> Option<usize> {
        self.statuses.iter().position(|s| s.contains(flag))
    }

    /// Runs one scan cycle against the host's current geometry.
    ///
    /// Returns the number of change notifications dispatched to `sink`.
    pub fn refresh<G, S>(&mut self, geometry: &G, sink: &mut S) -> usize
    where
        G: GeometryProvider<K> + ?Sized,
        S: StatusChangeSink<K> + ?Sized,
    {
        let viewport = ViewportBounds::sample(geometry);
        self.refresh_with_viewport(geometry, viewport, sink)
    }

    /// Runs one scan cycle against explicit viewport bounds.
    ///
    /// Useful when the host already knows the bounds, or tracks a scroll
    /// container other than the one `geometry` reports.
    pub fn refresh_with_viewport<G, S>(
        &mut self,
        geometry: &G,
        viewport: ViewportBounds,
        sink: &mut S,
    ) -> usize
    where
        G: GeometryProvider<K> + ?Sized,
        S: StatusChangeSink<K> + ?Sized,
    {
        let pass = classify(
            &self.elements,
            geometry,
            viewport,
            self.start_hint,
            self.strategy,
        );
        self.start_hint = pass.start_hint();

        let replaced = core::mem::replace(&mut self.statuses, pass.statuses);
        // Construction-time blanks are not a previous cycle.
        self.previous = (self.cycles > 0).then_some(replaced);
        self.cycles += 1;

        let sent = notify_changes(
            &self.statuses,
            self.previous.as_deref(),
            &self.elements,
            sink,
        );
        vtrace!(
            cycle = self.cycles,
            top = viewport.top,
            bottom = viewport.bottom,
            start_hint = self.start_hint,
            sent,
            "scan cycle complete"
        );
        sent
    }
}
