/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::collections::BTreeMap;

use anyhow::{Context, anyhow};
use yaml_rust::Yaml;

/// Parse a flat `key: value` map, rejecting duplicate keys.
pub fn as_string_map(v: &Yaml) -> anyhow::Result<BTreeMap<String, String>> {
    let Yaml::Hash(map) = v else {
        return Err(anyhow!("the yaml value type for 'string map' should be 'map'"));
    };
    let mut table = BTreeMap::new();
    crate::foreach_kv(map, |k, v| {
        let value = super::as_string(v).context(format!("invalid string value for key {k}"))?;
        if table.insert(k.to_string(), value).is_some() {
            Err(anyhow!("found duplicate value for key {k}"))
        } else {
            Ok(())
        }
    })?;
    Ok(table)
}
