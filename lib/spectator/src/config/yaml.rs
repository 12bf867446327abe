/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use anyhow::{Context, anyhow};
use yaml_rust::Yaml;

use super::SpectatorConfig;

impl SpectatorConfig {
    pub fn parse_yaml(v: &Yaml) -> anyhow::Result<Self> {
        if let Yaml::Hash(map) = v {
            let mut config = SpectatorConfig::default();
            spectator_yaml::foreach_kv(map, |k, v| config.set_by_yaml_kv(k, v))?;
            Ok(config)
        } else {
            Err(anyhow!(
                "yaml value type for 'spectator config' should be 'map'"
            ))
        }
    }

    fn set_by_yaml_kv(&mut self, k: &str, v: &Yaml) -> anyhow::Result<()> {
        match spectator_yaml::key::normalize(k).as_str() {
            "uri" | "endpoint" => {
                self.uri = spectator_yaml::value::as_string(v)
                    .context(format!("invalid string value for key {k}"))?;
            }
            "common_tags" => {
                self.common_tags = spectator_yaml::value::as_string_map(v)
                    .context(format!("invalid tag map value for key {k}"))?;
            }
            "connect_timeout" => {
                self.connect_timeout = spectator_yaml::humanize::as_duration(v)
                    .context(format!("invalid humanize duration value for key {k}"))?;
            }
            "read_timeout" => {
                self.read_timeout = spectator_yaml::humanize::as_duration(v)
                    .context(format!("invalid humanize duration value for key {k}"))?;
            }
            "batch_size" => {
                self.batch_size = spectator_yaml::value::as_nonzero_usize(v)
                    .context(format!("invalid nonzero usize value for key {k}"))?;
            }
            "frequency" | "interval" => {
                let frequency = spectator_yaml::humanize::as_duration(v)
                    .context(format!("invalid humanize duration value for key {k}"))?;
                if frequency.is_zero() {
                    return Err(anyhow!("zero publish frequency is not allowed"));
                }
                self.frequency = frequency;
            }
            "compress" => {
                self.compress = spectator_yaml::value::as_bool(v)
                    .context(format!("invalid bool value for key {k}"))?;
            }
            _ => return Err(anyhow!("invalid key {k}")),
        }
        Ok(())
    }
}
