// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll through a feed of cards and print every visibility transition.
//!
//! This example shows how to:
//! - implement `GeometryProvider` for a host that keeps its own card layout,
//! - implement `ScrollEvents` for a window that fans scroll signals out to listeners,
//! - bind a tracker with `attach` and observe the change notifications.
//!
//! Run:
//! - `cargo run -p understory_visibility_demos --example scroll_feed`
//! - `RUST_LOG=understory_visibility=trace cargo run -p understory_visibility_demos --example scroll_feed`
//!   to also see the per-cycle scan traces.

use std::cell::{Cell, RefCell};
use std::error::Error;
use std::rc::Rc;

use kurbo::{Rect, Size};
use tracing_subscriber::EnvFilter;
use understory_visibility::{
    GeometryProvider, ScrollCallback, ScrollEvents, VISIBILITY_STATUS_CHANGE, ViewportSource,
    VisibilityStatus, attach,
};

/// Handle the host uses for its cards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct CardId(u32);

/// Card layout plus the window's scroll position, shared with [`Window`].
struct Feed {
    cards: Vec<Rect>,
    scroll: Rc<Cell<f64>>,
    viewport: Size,
}

impl Feed {
    fn new(heights: &[f64], gap: f64, viewport: Size, scroll: Rc<Cell<f64>>) -> Self {
        let mut y = gap;
        let cards = heights
            .iter()
            .map(|h| {
                let card = Rect::new(16.0, y, viewport.width - 16.0, y + h);
                y += h + gap;
                card
            })
            .collect();
        Self {
            cards,
            scroll,
            viewport,
        }
    }

    fn ids(&self) -> impl Iterator<Item = CardId> + use<> {
        (0..self.cards.len() as u32).map(CardId)
    }

    fn card(&self, id: &CardId) -> Rect {
        self.cards.get(id.0 as usize).copied().unwrap_or(Rect::ZERO)
    }
}

impl ViewportSource for Feed {
    fn scroll_offset(&self) -> f64 {
        self.scroll.get()
    }

    fn visible_height(&self) -> f64 {
        self.viewport.height
    }
}

impl GeometryProvider<CardId> for Feed {
    fn offset_top(&self, element: &CardId) -> f64 {
        self.card(element).y0
    }

    fn rendered_height(&self, element: &CardId) -> f64 {
        self.card(element).height()
    }
}

/// A window whose scroll signal fans out to every listener.
#[derive(Clone, Default)]
struct Window {
    scroll: Rc<Cell<f64>>,
    listeners: Rc<RefCell<Vec<ScrollCallback>>>,
}

impl Window {
    fn scroll_to(&self, offset: f64) {
        self.scroll.set(offset);
        for listener in self.listeners.borrow_mut().iter_mut() {
            listener();
        }
    }
}

impl ScrollEvents for Window {
    type Subscription = usize;

    fn subscribe(&mut self, callback: ScrollCallback) -> Option<usize> {
        let mut listeners = self.listeners.borrow_mut();
        listeners.push(callback);
        Some(listeners.len() - 1)
    }
}

fn describe(status: VisibilityStatus) -> String {
    if status.is_blank() {
        return "BLANK".to_owned();
    }
    status
        .iter_names()
        .map(|(name, _)| name)
        .collect::<Vec<_>>()
        .join(" | ")
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut window = Window::default();
    let feed = Feed::new(
        &[120.0, 80.0, 300.0, 60.0, 60.0, 200.0, 90.0, 400.0, 75.0, 150.0],
        16.0,
        Size::new(360.0, 480.0),
        Rc::clone(&window.scroll),
    );
    let slots = feed.ids().map(Some);

    let sink = |card: &CardId, status: VisibilityStatus| {
        println!(
            "  {VISIBILITY_STATUS_CHANGE} -> card {}: {}",
            card.0,
            describe(status)
        );
    };

    println!("initial classification");
    let attached = attach(slots, feed, sink, &mut window)?;

    for offset in [40.0, 200.0, 650.0, 900.0, 1400.0, 120.0] {
        println!("scroll to {offset}");
        window.scroll_to(offset);
    }

    let tracker = attached.tracker();
    println!(
        "after {} cycles: first visible {:?}, last visible {:?}",
        tracker.cycles(),
        tracker.first_visible(),
        tracker.last_visible()
    );
    Ok(())
}
