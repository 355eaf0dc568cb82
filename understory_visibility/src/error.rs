// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Construction errors.

/// Reasons a tracker could not be created.
///
/// Once constructed, scan cycles cannot fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TrackerError {
    /// The element list has an absent entry.
    #[error("absent element in the list at index {index}")]
    MissingElement {
        /// Position of the first absent entry.
        index: usize,
    },
    /// The host offers no scroll signal to subscribe to.
    #[error("host provides no scroll event source")]
    NoScrollSource,
}
