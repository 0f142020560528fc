//! Time sources for temporal claim checks
//!
//! Expiration and not-before checks read the current time from a
//! [`Clock`] rather than the wall clock directly, so tests can place a
//! token anywhere in its validity window with a [`TestClock`].

use std::time::SystemTime;

/// A moment in unix time: whole seconds since 1970-01-01T00:00:00Z
///
/// Temporal claims (`exp`, `nbf`, `iat`) carry values of this
/// resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct UnixTime(pub u64);

/// A source of the current time
pub trait Clock {
    /// The current time according to this source
    fn now(&self) -> UnixTime;
}

/// Reads the operating system clock
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct System;

impl Clock for System {
    fn now(&self) -> UnixTime {
        let elapsed = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .expect("the system clock reads before the Unix epoch");
        UnixTime(elapsed.as_secs())
    }
}

/// A clock under test control
///
/// Reports a fixed time until told otherwise; nothing advances on its
/// own.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[must_use]
pub struct TestClock(UnixTime);

impl TestClock {
    /// A clock reading the given time
    pub const fn new(time: UnixTime) -> Self {
        Self(time)
    }

    /// Moves the clock to the given time
    pub fn set(&mut self, time: UnixTime) {
        self.0 = time;
    }

    /// Moves the clock forward by `seconds`
    pub fn advance(&mut self, seconds: u64) {
        let UnixTime(t) = self.0;
        self.0 = UnixTime(t + seconds);
    }
}

impl Clock for TestClock {
    fn now(&self) -> UnixTime {
        self.0
    }
}
