// pathfinder/turtle/src/clock.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Time sources for driving playback.

use std::thread;
use std::time::{Duration, Instant};

pub trait Clock {
    fn now(&self) -> Instant;
    fn sleep_until(&mut self, deadline: Instant);
}

/// Wall-clock time; sleeps the current thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep_until(&mut self, deadline: Instant) {
        let now = Instant::now();
        if deadline > now {
            thread::sleep(deadline - now);
        }
    }
}

/// Virtual time that jumps straight to each deadline.
#[derive(Clone, Copy, Debug)]
pub struct ManualClock {
    start: Instant,
    now: Instant,
}

impl ManualClock {
    pub fn new() -> ManualClock {
        let start = Instant::now();
        ManualClock { start, now: start }
    }

    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }

    /// Virtual time passed since creation.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.now - self.start
    }
}

impl Default for ManualClock {
    fn default() -> ManualClock {
        ManualClock::new()
    }
}

impl Clock for ManualClock {
    #[inline]
    fn now(&self) -> Instant {
        self.now
    }

    fn sleep_until(&mut self, deadline: Instant) {
        if deadline > self.now {
            self.now = deadline;
        }
    }
}
