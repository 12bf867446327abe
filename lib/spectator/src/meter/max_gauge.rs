/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::sync::atomic::Ordering;

use portable_atomic::AtomicF64;

use super::atomic::{NO_MAX, take_max, update_max};
use super::stat_id;
use crate::{IdPtr, Measurement, statistic};

/// Largest value seen during the interval.
pub struct MaxGauge {
    id: IdPtr,
    max_id: IdPtr,
    value: AtomicF64,
}

impl MaxGauge {
    pub fn new(id: IdPtr) -> Self {
        MaxGauge {
            max_id: stat_id(&id, statistic::MAX),
            id,
            value: AtomicF64::new(NO_MAX),
        }
    }

    #[inline]
    pub fn id(&self) -> &IdPtr {
        &self.id
    }

    pub fn update(&self, value: f64) {
        update_max(&self.value, value);
    }

    /// Current max, `f64::MIN` if nothing was recorded since the last poll.
    pub fn get(&self) -> f64 {
        self.value.load(Ordering::Relaxed)
    }

    pub fn measure(&self) -> Vec<Measurement> {
        match take_max(&self.value) {
            Some(v) => vec![Measurement::new(self.max_id.clone(), v)],
            None => Vec::new(),
        }
    }
}
