// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Change detection between consecutive scan cycles.
//!
//! Each cycle produces a fresh status array. [`notify_changes`] compares it with
//! the previous cycle's array and dispatches one notification per element whose
//! status differs, in list order. Nothing is batched or coalesced.

use crate::VisibilityStatus;

/// Name under which hosts with named events (for example DOM custom events)
/// should deliver a status change to the element.
pub const VISIBILITY_STATUS_CHANGE: &str = "visibility-status-change";

/// Receives per-element status changes.
///
/// Any `FnMut(&K, VisibilityStatus)` closure is a sink.
pub trait StatusChangeSink<K> {
    /// Called once for each element whose status changed this cycle.
    fn status_changed(&mut self, element: &K, status: VisibilityStatus);
}

impl<K, F> StatusChangeSink<K> for F
where
    F: FnMut(&K, VisibilityStatus),
{
    fn status_changed(&mut self, element: &K, status: VisibilityStatus) {
        self(element, status);
    }
}

/// Yields the indices whose status differs between `previous` and `current`.
///
/// Without a previous cycle every index counts as changed. An index missing
/// from `previous` also counts as changed.
pub fn changed_indices<'a>(
    current: &'a [VisibilityStatus],
    previous: Option<&'a [VisibilityStatus]>,
) -> impl Iterator<Item = usize> + 'a {
    current
        .iter()
        .enumerate()
        .filter(move |(index, status)| match previous {
            Some(previous) => previous.get(*index) != Some(*status),
            None => true,
        })
        .map(|(index, _)| index)
}

/// Dispatches a notification to `sink` for each changed element.
///
/// `elements` and `current` are parallel arrays. Returns the number of
/// notifications dispatched.
///
/// ```
/// use understory_visibility::{VisibilityStatus, notify_changes};
///
/// let elements = ["intro", "body", "footer"];
/// let previous = [VisibilityStatus::BLANK; 3];
/// let current = [
///     VisibilityStatus::BLANK,
///     VisibilityStatus::PARTIALLY_VISIBLE,
///     VisibilityStatus::BLANK,
/// ];
///
/// let mut seen = Vec::new();
/// let mut record = |el: &&'static str, s: VisibilityStatus| seen.push((*el, s));
/// let sent = notify_changes(&current, Some(&previous[..]), &elements, &mut record);
/// assert_eq!(sent, 1);
/// assert_eq!(seen, [("body", VisibilityStatus::PARTIALLY_VISIBLE)]);
/// ```
pub fn notify_changes<K, S>(
    current: &[VisibilityStatus],
    previous: Option<&[VisibilityStatus]>,
    elements: &[K],
    sink: &mut S,
) -> usize
where
    S: StatusChangeSink<K> + ?Sized,
{
    debug_assert_eq!(
        current.len(),
        elements.len(),
        "one status per element is required"
    );
    let mut sent = 0;
    for index in changed_indices(current, previous) {
        if let Some(element) = elements.get(index) {
            sink.status_changed(element, current[index]);
            sent += 1;
        }
    }
    sent
}
