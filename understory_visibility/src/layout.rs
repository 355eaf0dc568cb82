// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An in-memory geometry provider over precomputed boxes.

use alloc::vec::Vec;
use core::ops::Range;

use kurbo::{Rect, Size};

use crate::host::{GeometryProvider, ViewportSource};

/// Document-space boxes plus a scrollable viewport rectangle.
///
/// This is the geometry provider for hosts that already run their own layout
/// (for example a retained box tree) and can hand over world-space rectangles.
/// Element handles are indices into the box list, so
/// [`handles`](Self::handles) is the element list to track.
///
/// Handles without a box report `NaN` geometry and are never visible.
#[derive(Clone, Debug)]
pub struct StackLayout {
    boxes: Vec<Rect>,
    viewport: Rect,
}

impl StackLayout {
    /// Creates an empty layout with a viewport of `viewport_size` at the document origin.
    #[must_use]
    pub fn new(viewport_size: Size) -> Self {
        Self {
            boxes: Vec::new(),
            viewport: Rect::from_origin_size((0.0, 0.0), viewport_size),
        }
    }

    /// Creates a layout from explicit boxes and viewport.
    #[must_use]
    pub fn from_boxes(boxes: impl IntoIterator<Item = Rect>, viewport: Rect) -> Self {
        Self {
            boxes: boxes.into_iter().map(|b| b.abs()).collect(),
            viewport: viewport.abs(),
        }
    }

    /// Stacks boxes of the given heights top to bottom, starting at the document origin.
    ///
    /// The viewport is `width` wide and `viewport_height` tall, scrolled to the top.
    #[must_use]
    pub fn stacked(heights: impl IntoIterator<Item = f64>, width: f64, viewport_height: f64) -> Self {
        let mut layout = Self::new(Size::new(width, viewport_height));
        let mut y = 0.0;
        for height in heights {
            let height = height.max(0.0);
            layout.push(Rect::new(0.0, y, width, y + height));
            y += height;
        }
        layout
    }

    /// Appends a box and returns its handle.
    pub fn push(&mut self, rect: Rect) -> usize {
        self.boxes.push(rect.abs());
        self.boxes.len() - 1
    }

    /// Replaces the box of an existing handle. Unknown handles are ignored.
    pub fn set_rect(&mut self, handle: usize, rect: Rect) {
        if let Some(slot) = self.boxes.get_mut(handle) {
            *slot = rect.abs();
        }
    }

    /// Returns the box of `handle`, if any.
    #[must_use]
    pub fn rect(&self, handle: usize) -> Option<Rect> {
        self.boxes.get(handle).copied()
    }

    /// Number of boxes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    /// Returns `true` if there are no boxes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// All handles, in insertion order.
    #[must_use]
    pub fn handles(&self) -> Range<usize> {
        0..self.boxes.len()
    }

    /// Total height covered by the boxes, measured from the document origin.
    #[must_use]
    pub fn content_height(&self) -> f64 {
        self.boxes.iter().fold(0.0, |acc, b| acc.max(b.y1))
    }

    /// The viewport rectangle in document space.
    #[must_use]
    pub const fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Moves the viewport so that its top edge sits at `offset`.
    pub fn set_scroll_offset(&mut self, offset: f64) {
        self.viewport = self.viewport.with_origin((self.viewport.x0, offset));
    }

    /// Moves the viewport by `delta`.
    pub fn scroll_by(&mut self, delta: f64) {
        self.set_scroll_offset(self.viewport.y0 + delta);
    }

    /// Resizes the viewport height, keeping its top edge in place.
    pub fn set_viewport_height(&mut self, height: f64) {
        let size = Size::new(self.viewport.width(), height.max(0.0));
        self.viewport = self.viewport.with_size(size);
    }
}

impl ViewportSource for StackLayout {
    fn scroll_offset(&self) -> f64 {
        self.viewport.y0
    }

    fn visible_height(&self) -> f64 {
        self.viewport.height()
    }
}

impl GeometryProvider<usize> for StackLayout {
    fn offset_top(&self, element: &usize) -> f64 {
        self.rect(*element).map_or(f64::NAN, |r| r.y0)
    }

    fn rendered_height(&self, element: &usize) -> f64 {
        self.rect(*element).map_or(f64::NAN, |r| r.height())
    }

    fn vertical_extent(&self, element: &usize) -> (f64, f64) {
        self.rect(*element)
            .map_or((f64::NAN, f64::NAN), |r| (r.y0, r.y1))
    }
}
