/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::sync::atomic::Ordering;

use portable_atomic::AtomicF64;

use super::stat_id;
use crate::{IdPtr, Measurement, statistic};

/// Last value set during the interval. NaN means unset.
pub struct Gauge {
    id: IdPtr,
    gauge_id: IdPtr,
    value: AtomicF64,
}

impl Gauge {
    pub fn new(id: IdPtr) -> Self {
        Gauge {
            gauge_id: stat_id(&id, statistic::GAUGE),
            id,
            value: AtomicF64::new(f64::NAN),
        }
    }

    #[inline]
    pub fn id(&self) -> &IdPtr {
        &self.id
    }

    pub fn set(&self, value: f64) {
        self.value.store(value, Ordering::Relaxed);
    }

    pub fn get(&self) -> f64 {
        self.value.load(Ordering::Relaxed)
    }

    pub fn measure(&self) -> Vec<Measurement> {
        let v = self.value.swap(f64::NAN, Ordering::Relaxed);
        if v.is_nan() {
            Vec::new()
        } else {
            vec![Measurement::new(self.gauge_id.clone(), v)]
        }
    }
}
