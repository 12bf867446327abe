/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use crate::IdPtr;

/// A single sample produced by polling a meter.
#[derive(Clone, Debug, PartialEq)]
pub struct Measurement {
    pub id: IdPtr,
    pub value: f64,
}

impl Measurement {
    pub fn new(id: IdPtr, value: f64) -> Self {
        Measurement { id, value }
    }
}
