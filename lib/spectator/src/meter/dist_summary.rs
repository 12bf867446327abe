/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::sync::atomic::{AtomicU64, Ordering};

use portable_atomic::AtomicF64;

use super::atomic::{NO_MAX, take_max, update_max};
use super::stat_id;
use crate::{IdPtr, Measurement, statistic};

/// Distribution of recorded amounts, such as response sizes.
pub struct DistributionSummary {
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

impl DistributionSummary {
    pub fn new(id: IdPtr) -> Self {
        DistributionSummary {
            count_id: stat_id(&id, statistic::COUNT),
            total_id: stat_id(&id, statistic::TOTAL_AMOUNT),
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

    /// Negative and NaN amounts are dropped.
    pub fn record(&self, amount: f64) {
        if amount.is_nan() || amount < 0.0 {
            return;
        }
        self.count.fetch_add(1, Ordering::Relaxed);
        self.total.fetch_add(amount, Ordering::Relaxed);
        self.total_sq.fetch_add(amount * amount, Ordering::Relaxed);
        update_max(&self.max, amount);
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn total_amount(&self) -> f64 {
        self.total.load(Ordering::Relaxed)
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
