// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Binding a tracker to a host's scroll signal.
//!
//! [`attach`] validates the element list, subscribes a callback to the host's
//! [`ScrollEvents`] exactly once, and runs the first scan cycle. The returned
//! [`Attached`] owns the tracker, the geometry provider, the sink, and the
//! subscription handle. The callback only holds a weak reference to that
//! state: once the [`Attached`] is dropped, later scroll signals are ignored.
//! Cancelling the subscription itself is up to the host, through the handle
//! returned by [`Attached::into_subscription`].
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use understory_visibility::{
//!     ScrollCallback, ScrollEvents, StackLayout, VisibilityStatus, attach,
//! };
//!
//! // A host whose scroll signal fans out to every subscriber.
//! #[derive(Clone, Default)]
//! struct Window(Rc<RefCell<Vec<ScrollCallback>>>);
//!
//! impl Window {
//!     fn scroll(&self) {
//!         for callback in self.0.borrow_mut().iter_mut() {
//!             callback();
//!         }
//!     }
//! }
//!
//! impl ScrollEvents for Window {
//!     type Subscription = usize;
//!     fn subscribe(&mut self, callback: ScrollCallback) -> Option<usize> {
//!         let mut callbacks = self.0.borrow_mut();
//!         callbacks.push(callback);
//!         Some(callbacks.len() - 1)
//!     }
//! }
//!
//! let mut window = Window::default();
//! let layout = StackLayout::stacked([50.0; 20], 300.0, 120.0);
//! let slots = layout.handles().map(Some);
//! let log = Rc::new(RefCell::new(Vec::new()));
//! let sink = {
//!     let log = Rc::clone(&log);
//!     move |el: &usize, status: VisibilityStatus| log.borrow_mut().push((*el, status))
//! };
//!
//! let attached = attach(slots, layout, sink, &mut window).unwrap();
//! // The first cycle reports every element.
//! assert_eq!(log.borrow().len(), 20);
//!
//! log.borrow_mut().clear();
//! attached.geometry_mut().set_scroll_offset(500.0);
//! window.scroll();
//! assert!(log.borrow().iter().any(|(el, s)| *el == 10 && s.is_first_visible()));
//! ```

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use core::cell::{Ref, RefCell, RefMut};
use core::fmt;

use crate::{
    GeometryProvider, ScrollCallback, ScrollEvents, StatusChangeSink, TrackerError,
    VisibilityStatus, VisibilityTracker,
};

struct Session<K, G, S> {
    tracker: VisibilityTracker<K>,
    geometry: G,
    sink: S,
}

impl<K, G, S> Session<K, G, S>
where
    G: GeometryProvider<K>,
    S: StatusChangeSink<K>,
{
    fn cycle(&mut self) -> usize {
        let Self {
            tracker,
            geometry,
            sink,
        } = self;
        tracker.refresh(geometry, sink)
    }
}

/// A tracker bound to a host's scroll signal.
///
/// Created by [`attach`] or [`attach_tracker`].
pub struct Attached<K, G, S, H> {
    session: Rc<RefCell<Session<K, G, S>>>,
    subscription: H,
}

impl<K, G, S, H> Attached<K, G, S, H>
where
    G: GeometryProvider<K>,
    S: StatusChangeSink<K>,
{
    /// Runs a scan cycle outside of a scroll signal, for example after the
    /// host changed layout without scrolling.
    ///
    /// Returns the number of notifications dispatched, or `None` if a cycle is
    /// already running on this tracker.
    pub fn refresh(&self) -> Option<usize> {
        let mut session = self.session.try_borrow_mut().ok()?;
        Some(session.cycle())
    }

    /// Borrows the tracker.
    ///
    /// # Panics
    ///
    /// Panics if called from inside the sink during a cycle.
    #[must_use]
    pub fn tracker(&self) -> Ref<'_, VisibilityTracker<K>> {
        Ref::map(self.session.borrow(), |s| &s.tracker)
    }

    /// Borrows the statuses of the most recent cycle.
    ///
    /// # Panics
    ///
    /// Panics if called from inside the sink during a cycle.
    #[must_use]
    pub fn statuses(&self) -> Ref<'_, [VisibilityStatus]> {
        Ref::map(self.session.borrow(), |s| s.tracker.statuses())
    }

    /// Mutably borrows the geometry provider, for hosts that update it in place.
    ///
    /// # Panics
    ///
    /// Panics if called from inside the sink during a cycle.
    #[must_use]
    pub fn geometry_mut(&self) -> RefMut<'_, G> {
        RefMut::map(self.session.borrow_mut(), |s| &mut s.geometry)
    }

    /// Borrows the sink.
    ///
    /// # Panics
    ///
    /// Panics if called from inside the sink during a cycle.
    #[must_use]
    pub fn sink(&self) -> Ref<'_, S> {
        Ref::map(self.session.borrow(), |s| &s.sink)
    }

    /// The host's subscription handle.
    #[must_use]
    pub const fn subscription(&self) -> &H {
        &self.subscription
    }

    /// Drops the tracker state and hands the subscription back to the host.
    ///
    /// Scroll signals delivered to the old callback afterwards do nothing.
    pub fn into_subscription(self) -> H {
        self.subscription
    }
}

impl<K, G, S, H> fmt::Debug for Attached<K, G, S, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("Attached");
        match self.session.try_borrow() {
            Ok(session) => out
                .field("elements", &session.tracker.len())
                .field("cycles", &session.tracker.cycles()),
            Err(_) => out.field("elements", &"<in cycle>"),
        };
        out.finish_non_exhaustive()
    }
}

/// Validates `slots`, subscribes to `events`, and runs the first scan cycle.
///
/// Fails with [`TrackerError::MissingElement`] if a slot is empty, or with
/// [`TrackerError::NoScrollSource`] if the host refuses the subscription. In
/// both cases no callback stays registered and the sink is never called.
pub fn attach<K, G, S, E>(
    slots: impl IntoIterator<Item = Option<K>>,
    geometry: G,
    sink: S,
    events: &mut E,
) -> Result<Attached<K, G, S, E::Subscription>, TrackerError>
where
    K: 'static,
    G: GeometryProvider<K> + 'static,
    S: StatusChangeSink<K> + 'static,
    E: ScrollEvents + ?Sized,
{
    let tracker = VisibilityTracker::from_slots(slots)?;
    attach_tracker(tracker, geometry, sink, events)
}

/// Like [`attach`], for an already constructed (and possibly configured) tracker.
pub fn attach_tracker<K, G, S, E>(
    tracker: VisibilityTracker<K>,
    geometry: G,
    sink: S,
    events: &mut E,
) -> Result<Attached<K, G, S, E::Subscription>, TrackerError>
where
    K: 'static,
    G: GeometryProvider<K> + 'static,
    S: StatusChangeSink<K> + 'static,
    E: ScrollEvents + ?Sized,
{
    let session = Rc::new(RefCell::new(Session {
        tracker,
        geometry,
        sink,
    }));
    let weak = Rc::downgrade(&session);
    let callback: ScrollCallback = Box::new(move || on_scroll(&weak));
    let subscription = events
        .subscribe(callback)
        .ok_or(TrackerError::NoScrollSource)?;

    session.borrow_mut().cycle();
    Ok(Attached {
        session,
        subscription,
    })
}

fn on_scroll<K, G, S>(session: &Weak<RefCell<Session<K, G, S>>>)
where
    G: GeometryProvider<K>,
    S: StatusChangeSink<K>,
{
    let Some(session) = session.upgrade() else {
        vtrace!("tracker dropped, ignoring scroll signal");
        return;
    };
    let Ok(mut state) = session.try_borrow_mut() else {
        vdebug!("scroll signal arrived during a running cycle, skipped");
        return;
    };
    state.cycle();
}
