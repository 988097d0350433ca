// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Continuity tracking for hand rotations.
//!
//! A hand's target angle is absolute and wraps from 359° back to 0°. Applying it as-is makes a
//! hand spin backward almost a full turn at the wrap. The tracker instead keeps an unwrapped,
//! ever-increasing rotation per hand and advances it by the forward distance to the target.

use std::fmt;

use crate::angles::ArrowDegrees;

const FULL_TURN: f64 = 360.0;

// Targets closer than this to the current rotation count as reached. Accumulated rotations
// carry rounding error, and without the tolerance a hand can spin a full turn to land on
// its own position.
const SNAP_EPSILON: f64 = 1e-6;

/// One of the three rotating hands of a dial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hand {
    /// The hour hand.
    Hour,
    /// The minute hand.
    Minute,
    /// The second hand.
    Second,
}

impl Hand {
    /// All hands, in publishing order.
    pub const ALL: [Self; 3] = [Self::Hour, Self::Minute, Self::Second];

    /// The position of this hand in [`Hand::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Hour => 0,
            Self::Minute => 1,
            Self::Second => 2,
        }
    }

    /// Selects this hand's angle from a set of angles.
    #[must_use]
    pub const fn select(self, degrees: &ArrowDegrees) -> f64 {
        match self {
            Self::Hour => degrees.hour,
            Self::Minute => degrees.minute,
            Self::Second => degrees.second,
        }
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Hour => "hour",
            Self::Minute => "minute",
            Self::Second => "second",
        })
    }
}

/// Computes the rotation to apply after `current` so that the hand points at `target`.
///
/// The result is the smallest rotation at or after `current` that points at `target` on the
/// dial, so the hand moves forward by less than a full turn and never decreases. A target
/// within a millionth of a degree of the current position counts as reached.
///
/// # Examples
///
/// ```
/// use meridian::rotation::next_rotation;
///
/// assert_eq!(next_rotation(359.0, 2.0), 362.0);
/// assert_eq!(next_rotation(720.0, 90.0), 810.0);
/// ```
#[must_use]
pub fn next_rotation(current: f64, target: f64) -> f64 {
    let turns = current - current.rem_euclid(FULL_TURN);
    let mut candidate = turns + target.rem_euclid(FULL_TURN);

    if candidate < current - SNAP_EPSILON {
        candidate += FULL_TURN;
    } else if candidate - FULL_TURN >= current - SNAP_EPSILON {
        candidate -= FULL_TURN;
    }

    candidate.max(current)
}

/// The applied rotation of each hand of one displayed dial.
///
/// A tracker starts at zero for every hand and belongs to exactly one running dial; a new
/// tracker is created whenever the dial is started again.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RotationTracker {
    applied: [f64; 3],
}

impl RotationTracker {
    /// Creates a tracker with every hand at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The rotation last committed for `hand`.
    #[must_use]
    pub fn applied(&self, hand: Hand) -> f64 {
        self.applied[hand.index()]
    }

    /// The rotation `hand` would move to for `target`, without committing it.
    #[must_use]
    pub fn next(&self, hand: Hand, target: f64) -> f64 {
        next_rotation(self.applied(hand), target)
    }

    /// Records `rotation` as applied to `hand`.
    pub fn commit(&mut self, hand: Hand, rotation: f64) {
        self.applied[hand.index()] = rotation;
    }

    /// Moves `hand` toward `target` and returns the committed rotation.
    pub fn advance(&mut self, hand: Hand, target: f64) -> f64 {
        let rotation = self.next(hand, target);
        self.commit(hand, rotation);
        rotation
    }

    /// Moves all hands toward `targets` and returns the committed rotations.
    pub fn advance_all(&mut self, targets: &ArrowDegrees) -> ArrowDegrees {
        ArrowDegrees {
            hour: self.advance(Hand::Hour, targets.hour),
            minute: self.advance(Hand::Minute, targets.minute),
            second: self.advance(Hand::Second, targets.second),
        }
    }

    /// Puts every hand back to zero.
    pub fn reset(&mut self) {
        self.applied = [0.0; 3];
    }
}
