// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Visibility: scroll-driven visibility tracking for ordered elements.
//!
//! Given a fixed list of elements in document order, this crate classifies
//! each one against the vertical viewport on every scroll signal and reports
//! the elements whose classification changed since the previous signal.
//!
//! The core concepts are:
//!
//! - [`VisibilityStatus`]: a small bit-flag value saying which predicates hold
//!   for one element: fully visible, partially visible, topmost/bottommost of
//!   either kind, and "partially visible while nothing is fully visible".
//! - [`ViewportBounds`]: the vertical extent of the viewport, sampled fresh from
//!   the host every cycle via [`ViewportBounds::sample`].
//! - [`classify`]: the classifier. Its incremental mode starts from the previous
//!   cycle's topmost visible element and stops as soon as the visible run ends,
//!   so a cycle costs roughly the number of visible elements, not the length of
//!   the list.
//! - [`notify_changes`]: diffs two status arrays and dispatches one notification
//!   per changed element to a [`StatusChangeSink`].
//! - [`VisibilityTracker`]: owns the element list, the current and previous
//!   status arrays, and the scan hint, and runs one cycle per
//!   [`refresh`](VisibilityTracker::refresh).
//! - [`attach`]: binds a tracker to a host's [`ScrollEvents`] so that cycles run
//!   on every scroll signal, returning an [`Attached`] that owns the subscription.
//!
//! This crate does **not** measure or lay out anything. Hosts provide geometry
//! through [`GeometryProvider`] (document offsets with `y` growing downward)
//! and deliver scroll signals through [`ScrollEvents`]. For hosts that already
//! have world-space boxes, [`StackLayout`] is a ready-made provider over
//! [`kurbo::Rect`]s.
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_visibility::{StackLayout, VisibilityStatus, VisibilityTracker};
//!
//! // Three 100px tall sections and a 130px tall viewport scrolled to 50px.
//! let mut layout = StackLayout::stacked([100.0, 100.0, 100.0], 800.0, 130.0);
//! layout.set_scroll_offset(50.0);
//!
//! let mut tracker = VisibilityTracker::new(layout.handles().collect());
//! let mut changed = Vec::new();
//! tracker.refresh(&layout, &mut |section: &usize, status: VisibilityStatus| {
//!     changed.push((*section, status));
//! });
//!
//! // Nothing fits entirely, so the two overlapping sections are flagged as
//! // partially visible without visible siblings.
//! let first = tracker.statuses()[0];
//! assert!(first.is_partially_visible() && !first.is_visible());
//! assert!(first.is_partially_visible_with_no_visible_siblings());
//! assert!(tracker.statuses()[1].is_last_partially_visible());
//! assert!(tracker.statuses()[2].is_blank());
//! assert_eq!(changed.len(), 3);
//! ```
//!
//! ## Limitations
//!
//! The incremental scan assumes that elements are stacked monotonically: once
//! a run of visible elements ends, no later element in the list is visible.
//! Lists with overlapping or out-of-order elements should use
//! [`ScanStrategy::Exhaustive`]. Only the vertical axis is considered.
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for `kurbo`.
//! - `libm`: enables `no_std` builds of `kurbo` that rely on `libm`.
//! - `tracing`: emits scan-cycle diagnostics through [`tracing`](https://docs.rs/tracing)
//!   under the `understory_visibility` target.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

#[macro_use]
mod macros;

mod binding;
mod classify;
mod error;
mod host;
mod layout;
mod notify;
mod status;
mod tracker;
mod viewport;

pub use binding::{Attached, attach, attach_tracker};
pub use classify::{Classification, ScanStrategy, classify, classify_extent};
pub use error::TrackerError;
pub use host::{GeometryProvider, ScrollCallback, ScrollEvents, ViewportSource};
pub use layout::StackLayout;
pub use notify::{StatusChangeSink, VISIBILITY_STATUS_CHANGE, changed_indices, notify_changes};
pub use status::VisibilityStatus;
pub use tracker::VisibilityTracker;
pub use viewport::ViewportBounds;
