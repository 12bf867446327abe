/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::sync::atomic::Ordering;

use portable_atomic::AtomicF64;

use super::stat_id;
use crate::{IdPtr, Measurement, statistic};

/// Rate of events per interval.
///
/// Every poll reports, so an idle interval shows up as 0.
pub struct Counter {
    id: IdPtr,
    count_id: IdPtr,
    count: AtomicF64,
}

impl Counter {
    pub fn new(id: IdPtr) -> Self {
        Counter {
            count_id: stat_id(&id, statistic::COUNT),
            id,
            count: AtomicF64::new(0.0),
        }
    }

    #[inline]
    pub fn id(&self) -> &IdPtr {
        &self.id
    }

    /// Negative and NaN deltas are dropped.
    pub fn add(&self, delta: f64) {
        if delta > 0.0 {
            self.count.fetch_add(delta, Ordering::Relaxed);
        }
    }

    #[inline]
    pub fn increment(&self) {
        self.add(1.0);
    }

    /// Value accumulated since the last poll.
    pub fn count(&self) -> f64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn measure(&self) -> Vec<Measurement> {
        let v = self.count.swap(0.0, Ordering::Relaxed);
        vec![Measurement::new(self.count_id.clone(), v)]
    }
}
