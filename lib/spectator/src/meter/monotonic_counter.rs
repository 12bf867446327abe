/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::sync::atomic::{AtomicU64, Ordering};

use portable_atomic::AtomicF64;

use super::stat_id;
use crate::{IdPtr, Measurement, statistic};

/// Tracks an externally maintained cumulative total and reports the delta
/// between consecutive polls.
pub struct MonotonicCounter {
    id: IdPtr,
    count_id: IdPtr,
    value: AtomicF64,
    // bits of the total seen by the last poll
    prev: AtomicU64,
}

impl MonotonicCounter {
    pub fn new(id: IdPtr) -> Self {
        MonotonicCounter {
            count_id: stat_id(&id, statistic::COUNT),
            id,
            value: AtomicF64::new(f64::NAN),
            prev: AtomicU64::new(f64::NAN.to_bits()),
        }
    }

    #[inline]
    pub fn id(&self) -> &IdPtr {
        &self.id
    }

    pub fn set(&self, total: f64) {
        self.value.store(total, Ordering::Release);
    }

    /// Latest total, NaN if never set.
    pub fn get(&self) -> f64 {
        self.value.load(Ordering::Relaxed)
    }

    /// Concurrent polls split the delta between them, each total is only
    /// reported once.
    pub fn measure(&self) -> Vec<Measurement> {
        let mut prev_bits = self.prev.load(Ordering::Acquire);
        let (prev, v) = loop {
            // loaded after prev, so never older than the total prev came from
            let v = self.value.load(Ordering::Acquire);
            match self.prev.compare_exchange_weak(
                prev_bits,
                v.to_bits(),
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => break (f64::from_bits(prev_bits), v),
                Err(actual) => prev_bits = actual,
            }
        };
        let delta = v - prev;
        // NaN before a baseline exists, negative after the source was reset
        if delta.is_nan() || delta < 0.0 {
            return Vec::new();
        }
        vec![Measurement::new(self.count_id.clone(), delta)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Id;
    use std::sync::Arc;

    fn counter() -> MonotonicCounter {
        MonotonicCounter::new(Arc::new(Id::of("bytes.in")))
    }

    #[test]
    fn reports_delta() {
        let c = counter();
        assert!(c.measure().is_empty());

        c.set(100.0);
        // first poll only establishes the baseline
        assert!(c.measure().is_empty());

        c.set(150.0);
        let ms = c.measure();
        assert_eq!(ms.len(), 1);
        assert_eq!(ms[0].value, 50.0);
        assert_eq!(ms[0].id.statistic(), Some("count"));

        let ms = c.measure();
        assert_eq!(ms.len(), 1);
        assert_eq!(ms[0].value, 0.0);
    }

    #[test]
    fn source_reset() {
        let c = counter();
        c.set(10.0);
        c.measure();
        c.set(2.0);
        assert!(c.measure().is_empty());
        c.set(5.0);
        assert_eq!(c.measure()[0].value, 3.0);
    }

    #[test]
    fn concurrent_polls_report_each_increase_once() {
        let c = counter();
        c.set(0.0);
        assert!(c.measure().is_empty());

        let c = &c;
        let reported = std::thread::scope(|s| {
            let pollers: Vec<_> = (0..4)
                .map(|_| {
                    s.spawn(move || {
                        let mut sum = 0.0;
                        for _ in 0..1000 {
                            for m in c.measure() {
                                sum += m.value;
                            }
                        }
                        sum
                    })
                })
                .collect();
            for total in 1..=20_000 {
                c.set(total as f64);
            }
            pollers
                .into_iter()
                .map(|h| h.join().unwrap())
                .sum::<f64>()
        });

        let last: f64 = c.measure().iter().map(|m| m.value).sum();
        assert_eq!(reported + last, 20_000.0);
    }
}
