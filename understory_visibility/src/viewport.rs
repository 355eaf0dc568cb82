// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Viewport sampling and the vertical containment predicates.

use kurbo::Rect;

use crate::host::ViewportSource;

/// Vertical bounds of the visible part of the document, in document coordinates.
///
/// Bounds are inclusive at both ends: an element whose bottom edge touches
/// `top` still overlaps the viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewportBounds {
    /// Document offset of the viewport's top edge.
    pub top: f64,
    /// Document offset of the viewport's bottom edge.
    pub bottom: f64,
}

impl ViewportBounds {
    /// Creates bounds from explicit edges.
    #[must_use]
    pub const fn new(top: f64, bottom: f64) -> Self {
        Self { top, bottom }
    }

    /// Creates bounds from a scroll offset and the height of the visible area.
    #[must_use]
    pub fn from_scroll(scroll_offset: f64, visible_height: f64) -> Self {
        Self {
            top: scroll_offset,
            bottom: scroll_offset + visible_height,
        }
    }

    /// Uses the vertical span of a document-space rectangle as the viewport.
    #[must_use]
    pub fn from_rect(rect: Rect) -> Self {
        let rect = rect.abs();
        Self {
            top: rect.y0,
            bottom: rect.y1,
        }
    }

    /// Reads the current bounds from the host.
    ///
    /// This is a pure query; calling it twice without scrolling yields the same bounds.
    #[must_use]
    pub fn sample<V: ViewportSource + ?Sized>(source: &V) -> Self {
        Self::from_scroll(source.scroll_offset(), source.visible_height())
    }

    /// Height of the visible area.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Returns `true` if `[top, bottom]` overlaps the viewport at all.
    #[must_use]
    pub fn overlaps(&self, top: f64, bottom: f64) -> bool {
        bottom >= self.top && top <= self.bottom
    }

    /// Returns `true` if `[top, bottom]` lies entirely within the viewport.
    ///
    /// Containment implies [`overlaps`](Self::overlaps).
    #[must_use]
    pub fn contains(&self, top: f64, bottom: f64) -> bool {
        self.overlaps(top, bottom) && bottom <= self.bottom && top >= self.top
    }

    /// Returns `true` if an extent ending at `bottom` has scrolled out above the viewport.
    #[must_use]
    pub fn is_above(&self, bottom: f64) -> bool {
        bottom < self.top
    }
}
