// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-element visibility status flags.

bitflags::bitflags! {
    /// Which visibility predicates hold for one element in one scan cycle.
    ///
    /// A status is a plain value: the tracker builds a fresh one per element each
    /// cycle and replaces the previous array wholesale. Two statuses are equal
    /// exactly when they carry the same set of flags.
    ///
    /// ```
    /// use understory_visibility::VisibilityStatus;
    ///
    /// let status = VisibilityStatus::BLANK
    ///     .with(VisibilityStatus::PARTIALLY_VISIBLE)
    ///     .with(VisibilityStatus::FIRST_PARTIALLY_VISIBLE);
    /// assert!(status.is_partially_visible());
    /// assert!(status.is_first_partially_visible());
    /// assert!(!status.is_visible());
    /// ```
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct VisibilityStatus: u8 {
        /// The element's full extent lies within the viewport.
        const VISIBLE                                   = 0b0000_0001;
        /// Topmost fully visible element of the cycle.
        const FIRST_VISIBLE                             = 0b0000_0010;
        /// Bottommost fully visible element of the cycle.
        const LAST_VISIBLE                              = 0b0000_0100;
        /// The element's extent overlaps the viewport at all (including full containment).
        const PARTIALLY_VISIBLE                         = 0b0000_1000;
        /// Topmost partially visible element of the cycle.
        const FIRST_PARTIALLY_VISIBLE                   = 0b0001_0000;
        /// Bottommost partially visible element of the cycle.
        const LAST_PARTIALLY_VISIBLE                    = 0b0010_0000;
        /// Partially visible while no element in the scanned range is fully visible.
        const PARTIALLY_VISIBLE_WITH_NO_VISIBLE_SIBLINGS = 0b0100_0000;
    }
}

impl Default for VisibilityStatus {
    fn default() -> Self {
        Self::BLANK
    }
}

impl VisibilityStatus {
    /// The status of an element that is nowhere near the viewport.
    pub const BLANK: Self = Self::empty();

    /// Returns a copy of this status with `flag` added.
    #[must_use]
    pub const fn with(self, flag: Self) -> Self {
        self.union(flag)
    }

    /// Returns `true` if the element is fully visible.
    #[must_use]
    pub const fn is_visible(self) -> bool {
        self.contains(Self::VISIBLE)
    }

    /// Returns `true` if the element is the topmost fully visible one.
    #[must_use]
    pub const fn is_first_visible(self) -> bool {
        self.contains(Self::FIRST_VISIBLE)
    }

    /// Returns `true` if the element is the bottommost fully visible one.
    #[must_use]
    pub const fn is_last_visible(self) -> bool {
        self.contains(Self::LAST_VISIBLE)
    }

    /// Returns `true` if the element overlaps the viewport.
    #[must_use]
    pub const fn is_partially_visible(self) -> bool {
        self.contains(Self::PARTIALLY_VISIBLE)
    }

    /// Returns `true` if the element is the topmost partially visible one.
    #[must_use]
    pub const fn is_first_partially_visible(self) -> bool {
        self.contains(Self::FIRST_PARTIALLY_VISIBLE)
    }

    /// Returns `true` if the element is the bottommost partially visible one.
    #[must_use]
    pub const fn is_last_partially_visible(self) -> bool {
        self.contains(Self::LAST_PARTIALLY_VISIBLE)
    }

    /// Returns `true` if the element is partially visible and nothing in the
    /// scanned range was fully visible.
    #[must_use]
    pub const fn is_partially_visible_with_no_visible_siblings(self) -> bool {
        self.contains(Self::PARTIALLY_VISIBLE_WITH_NO_VISIBLE_SIBLINGS)
    }

    /// Returns `true` if no flag is set.
    #[must_use]
    pub const fn is_blank(self) -> bool {
        self.is_empty()
    }
}
