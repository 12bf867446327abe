/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde_json::Value;

use crate::{Measurement, statistic};

const NAME_KEY: &str = "name";

/// Aggregation applied by the collector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    Add,
    Max,
}

impl Op {
    pub fn from_statistic(stat: &str) -> Option<Op> {
        match stat {
            statistic::COUNT
            | statistic::TOTAL_AMOUNT
            | statistic::TOTAL_TIME
            | statistic::TOTAL_OF_SQUARES
            | statistic::PERCENTILE => Some(Op::Add),
            statistic::MAX | statistic::GAUGE | statistic::ACTIVE_TASKS | statistic::DURATION => {
                Some(Op::Max)
            }
            _ => None,
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            Op::Add => 0,
            Op::Max => 10,
        }
    }
}

pub struct EncodedBatch {
    pub payload: Value,
    /// Number of measurements the batch was built from.
    pub measurements: usize,
}

pub fn encode_batches(
    common_tags: &BTreeMap<String, String>,
    measurements: &[Measurement],
    batch_size: usize,
) -> Vec<EncodedBatch> {
    measurements
        .chunks(batch_size.max(1))
        .map(|chunk| EncodedBatch {
            payload: encode_batch(common_tags, chunk),
            measurements: chunk.len(),
        })
        .collect()
}

/// Sorted, deduplicated strings of one batch.
struct StringTable<'a> {
    index: HashMap<&'a str, usize>,
}

impl<'a> StringTable<'a> {
    fn build(
        common_tags: &'a BTreeMap<String, String>,
        measurements: &'a [Measurement],
        payload: &mut Vec<Value>,
    ) -> Self {
        let mut strings: BTreeSet<&'a str> = BTreeSet::new();
        for (k, v) in common_tags {
            strings.insert(k);
            strings.insert(v);
        }
        strings.insert(NAME_KEY);
        for m in measurements {
            strings.insert(m.id.name());
            for (k, v) in m.id.tags() {
                strings.insert(k);
                strings.insert(v);
            }
        }

        payload.reserve(strings.len() + 1 + measurements.len() * 8);
        payload.push(Value::from(strings.len()));
        let mut index = HashMap::with_capacity(strings.len());
        for (i, s) in strings.into_iter().enumerate() {
            payload.push(Value::from(s));
            index.insert(s, i);
        }
        StringTable { index }
    }

    fn get(&self, s: &str) -> Value {
        // every string of the batch was interned in build()
        Value::from(self.index.get(s).copied().unwrap_or_default())
    }
}

pub fn encode_batch(common_tags: &BTreeMap<String, String>, measurements: &[Measurement]) -> Value {
    let mut payload = Vec::new();
    let strings = StringTable::build(common_tags, measurements, &mut payload);

    for m in measurements {
        let Some(op) = m.id.statistic().and_then(Op::from_statistic) else {
            continue;
        };
        if !m.value.is_finite() {
            continue;
        }

        let tags = m.id.tags();
        payload.push(Value::from(common_tags.len() + tags.len() + 1));
        for (k, v) in common_tags.iter().chain(tags) {
            payload.push(strings.get(k));
            payload.push(strings.get(v));
        }
        payload.push(strings.get(NAME_KEY));
        payload.push(strings.get(m.id.name()));
        payload.push(Value::from(op.code()));
        payload.push(Value::from(m.value));
    }

    Value::Array(payload)
}
