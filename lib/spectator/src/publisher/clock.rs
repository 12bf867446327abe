/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::time::{Duration, Instant};

pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Time left in the interval once a cycle took `elapsed`, if any.
pub fn sleep_duration(interval: Duration, elapsed: Duration) -> Option<Duration> {
    interval.checked_sub(elapsed).filter(|d| !d.is_zero())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shrink_by_elapsed() {
        let interval = Duration::from_secs(5);
        assert_eq!(
            sleep_duration(interval, Duration::from_millis(1200)),
            Some(Duration::from_millis(3800))
        );
        assert_eq!(sleep_duration(interval, Duration::ZERO), Some(interval));
    }

    #[test]
    fn no_sleep_when_late() {
        let interval = Duration::from_secs(5);
        assert_eq!(sleep_duration(interval, interval), None);
        assert_eq!(sleep_duration(interval, Duration::from_secs(7)), None);
    }

    #[test]
    fn system_clock_advances() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
