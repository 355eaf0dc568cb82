// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Traits the host environment implements to feed the tracker.
//!
//! The tracker never measures anything itself. A host (a browser binding, a
//! retained-mode toolkit, a test harness) answers geometry queries through
//! [`GeometryProvider`] and delivers scroll signals through [`ScrollEvents`].
//! All offsets are in one document coordinate space with `y` growing downward.

use alloc::boxed::Box;

/// Read access to the scroll position and visible extent of the viewport.
pub trait ViewportSource {
    /// Document offset of the top of the visible area.
    fn scroll_offset(&self) -> f64;

    /// Height of the visible area.
    fn visible_height(&self) -> f64;
}

/// Geometry of tracked elements, keyed by the host's element handle `K`.
///
/// Implementations are expected to be cheap and infallible; the tracker may
/// query the same element more than once per cycle.
pub trait GeometryProvider<K>: ViewportSource {
    /// Document offset of the element's top edge.
    fn offset_top(&self, element: &K) -> f64;

    /// Rendered height of the element.
    fn rendered_height(&self, element: &K) -> f64;

    /// Top and bottom edges of the element.
    fn vertical_extent(&self, element: &K) -> (f64, f64) {
        let top = self.offset_top(element);
        (top, top + self.rendered_height(element))
    }
}

/// Zero-argument callback invoked by the host each time the document scrolls.
pub type ScrollCallback = Box<dyn FnMut()>;

/// A source of "scroll occurred" signals.
///
/// The host delivers signals one at a time; a callback is never re-entered by
/// the host while it is still running.
pub trait ScrollEvents {
    /// Handle that keeps a subscription alive or lets the host cancel it.
    type Subscription;

    /// Registers `callback` to run on every scroll signal.
    ///
    /// Returns `None` if the host has no scroll source, in which case the
    /// callback must not be retained.
    fn subscribe(&mut self, callback: ScrollCallback) -> Option<Self::Subscription>;
}
