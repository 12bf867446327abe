/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::sync::atomic::Ordering;

use portable_atomic::AtomicF64;

/// Marks a max accumulator that has not been updated in the current interval.
pub(super) const NO_MAX: f64 = f64::MIN;

/// Replace the stored value with `value` if it is larger.
///
/// A NaN value never wins.
pub(super) fn update_max(target: &AtomicF64, value: f64) {
    let mut current = target.load(Ordering::Relaxed);
    while value > current {
        match target.compare_exchange_weak(current, value, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => break,
            Err(actual) => current = actual,
        }
    }
}

/// Swap a max accumulator back to [`NO_MAX`], returning the value if it was updated.
pub(super) fn take_max(target: &AtomicF64) -> Option<f64> {
    let v = target.swap(NO_MAX, Ordering::Relaxed);
    if v == NO_MAX { None } else { Some(v) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_wins() {
        let v = AtomicF64::new(NO_MAX);
        update_max(&v, 3.0);
        update_max(&v, 7.0);
        update_max(&v, 5.0);
        update_max(&v, f64::NAN);
        assert_eq!(v.load(Ordering::Relaxed), 7.0);
        assert_eq!(take_max(&v), Some(7.0));
        assert_eq!(take_max(&v), None);
    }

    #[test]
    fn concurrent_max() {
        let v = AtomicF64::new(NO_MAX);
        std::thread::scope(|s| {
            for t in 0..8 {
                let v = &v;
                s.spawn(move || {
                    for i in 0..1000 {
                        update_max(v, (t * 1000 + i) as f64);
                    }
                });
            }
        });
        assert_eq!(take_max(&v), Some(7999.0));
    }

    #[test]
    fn no_max_lost_across_polls() {
        let v = AtomicF64::new(NO_MAX);
        let mut seen = NO_MAX;
        std::thread::scope(|s| {
            for t in 0..4 {
                let v = &v;
                s.spawn(move || {
                    for i in 0..10_000 {
                        update_max(v, (t * 10_000 + i) as f64);
                    }
                });
            }
            for _ in 0..100 {
                if let Some(max) = take_max(&v) {
                    seen = seen.max(max);
                }
                std::thread::yield_now();
            }
        });
        if let Some(max) = take_max(&v) {
            seen = seen.max(max);
        }
        assert_eq!(seen, 39_999.0);
        assert_eq!(take_max(&v), None);
    }
}
