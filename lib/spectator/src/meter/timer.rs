/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use portable_atomic::AtomicF64;

use super::atomic::{NO_MAX, take_max, update_max};
use super::stat_id;
use crate::{IdPtr, Measurement, statistic};

/// Latency of short operations. Reported values are in seconds.
pub struct Timer {
    id: IdPtr,
    count_id: IdPtr,
    total_id: IdPtr,
    total_sq_id: IdPtr,
    max_id: IdPtr,

    count: AtomicU64,
    total: AtomicF64,
    total_sq: AtomicF64,
    max: AtomicF64,
}

impl Timer {
    pub fn new(id: IdPtr) -> Self {
        Timer {
            count_id: stat_id(&id, statistic::COUNT),
            total_id: stat_id(&id, statistic::TOTAL_TIME),
            total_sq_id: stat_id(&id, statistic::TOTAL_OF_SQUARES),
            max_id: stat_id(&id, statistic::MAX),
            id,
            count: AtomicU64::new(0),
            total: AtomicF64::new(0.0),
            total_sq: AtomicF64::new(0.0),
            max: AtomicF64::new(NO_MAX),
        }
    }

    #[inline]
    pub fn id(&self) -> &IdPtr {
        &self.id
    }

    pub fn record(&self, duration: Duration) {
        let secs = duration.as_secs_f64();
        self.count.fetch_add(1, Ordering::Relaxed);
        self.total.fetch_add(secs, Ordering::Relaxed);
        self.total_sq.fetch_add(secs * secs, Ordering::Relaxed);
        update_max(&self.max, secs);
    }

    /// Negative, NaN or overflowing values are dropped.
    pub fn record_seconds(&self, secs: f64) {
        if let Ok(d) = Duration::try_from_secs_f64(secs) {
            self.record(d);
        }
    }

    pub fn record_since(&self, start: Instant) {
        self.record(start.elapsed());
    }

    pub fn time<R, F: FnOnce() -> R>(&self, f: F) -> R {
        let start = Instant::now();
        let r = f();
        self.record_since(start);
        r
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    /// Saturates at `Duration::MAX`.
    pub fn total_time(&self) -> Duration {
        Duration::try_from_secs_f64(self.total.load(Ordering::Relaxed)).unwrap_or(Duration::MAX)
    }

    pub fn measure(&self) -> Vec<Measurement> {
        let count = self.count.swap(0, Ordering::Relaxed);
        let total = self.total.swap(0.0, Ordering::Relaxed);
        let total_sq = self.total_sq.swap(0.0, Ordering::Relaxed);

        let mut ms = Vec::with_capacity(4);
        ms.push(Measurement::new(self.count_id.clone(), count as f64));
        ms.push(Measurement::new(self.total_id.clone(), total));
        ms.push(Measurement::new(self.total_sq_id.clone(), total_sq));
        if let Some(max) = take_max(&self.max) {
            ms.push(Measurement::new(self.max_id.clone(), max));
        }
        ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Id;
    use std::sync::Arc;

    fn value_of(ms: &[Measurement], stat: &str) -> Option<f64> {
        ms.iter()
            .find(|m| m.id.statistic() == Some(stat))
            .map(|m| m.value)
    }

    #[test]
    fn record_durations() {
        let t = Timer::new(Arc::new(Id::of("rpc.latency")));
        t.record(Duration::from_millis(100));
        t.record(Duration::from_millis(300));
        assert_eq!(t.count(), 2);
        assert!((t.total_time().as_secs_f64() - 0.4).abs() < 1e-9);

        let ms = t.measure();
        assert_eq!(ms.len(), 4);
        assert_eq!(value_of(&ms, "count"), Some(2.0));
        let total = value_of(&ms, "totalTime").unwrap();
        assert!((total - 0.4).abs() < 1e-9);
        let sq = value_of(&ms, "totalOfSquares").unwrap();
        assert!((sq - 0.1).abs() < 1e-9);
        assert_eq!(value_of(&ms, "max"), Some(0.3));

        let ms = t.measure();
        assert_eq!(ms.len(), 3);
        assert_eq!(value_of(&ms, "count"), Some(0.0));
    }

    #[test]
    fn record_seconds_rejects_invalid() {
        let t = Timer::new(Arc::new(Id::of("rpc.latency")));
        t.record_seconds(-1.0);
        t.record_seconds(f64::NAN);
        assert_eq!(t.count(), 0);
        t.record_seconds(0.5);
        assert_eq!(t.total_time(), Duration::from_millis(500));
    }

    #[test]
    fn huge_durations_keep_total_above_max() {
        let t = Timer::new(Arc::new(Id::of("batch.duration")));
        t.record(Duration::from_secs(20_000_000_000));
        t.record(Duration::from_secs(1));
        assert!(t.total_time() >= Duration::from_secs(20_000_000_001));

        let ms = t.measure();
        let total = value_of(&ms, "totalTime").unwrap();
        let max = value_of(&ms, "max").unwrap();
        assert_eq!(max, 20_000_000_000.0);
        assert_eq!(total, 20_000_000_001.0);
        assert!(total >= max);
    }

    #[test]
    fn time_closure() {
        let t = Timer::new(Arc::new(Id::of("work")));
        let v = t.time(|| 7);
        assert_eq!(v, 7);
        assert_eq!(t.count(), 1);
    }
}
