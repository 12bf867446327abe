/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::str::FromStr;
use std::time::Duration;

use anyhow::anyhow;
use humanize_rs::ParseError;
use yaml_rust::Yaml;

/// Accepts "500ms" / "2s" / "1m30s" style strings, or a plain number of seconds.
pub fn as_duration(v: &Yaml) -> anyhow::Result<Duration> {
    match v {
        Yaml::String(value) => match humanize_rs::duration::parse(value) {
            Ok(v) => Ok(v),
            Err(ParseError::MissingUnit) => {
                let secs =
                    u64::from_str(value).map_err(|_| anyhow!("invalid duration string"))?;
                Ok(Duration::from_secs(secs))
            }
            Err(e) => Err(anyhow!("invalid humanize duration string: {e}")),
        },
        Yaml::Integer(value) => u64::try_from(*value)
            .map(Duration::from_secs)
            .map_err(|_| anyhow!("negative duration value {value}")),
        Yaml::Real(s) => {
            let f = f64::from_str(s).map_err(|e| anyhow!("invalid f64 value: {e}"))?;
            Duration::try_from_secs_f64(f).map_err(anyhow::Error::new)
        }
        _ => Err(anyhow!(
            "yaml value type for humanize duration should be 'string' or 'integer' or 'real'"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn humanized_strings() {
        let v = yaml_str!("500ms");
        assert_eq!(as_duration(&v).unwrap(), Duration::from_millis(500));

        let v = yaml_str!("1m30s");
        assert_eq!(as_duration(&v).unwrap(), Duration::from_secs(90));

        let v = yaml_str!("5");
        assert_eq!(as_duration(&v).unwrap(), Duration::from_secs(5));

        let v = yaml_str!("-5s");
        assert!(as_duration(&v).is_err());

        let v = yaml_str!("5x");
        assert!(as_duration(&v).is_err());
    }

    #[test]
    fn numbers() {
        assert_eq!(
            as_duration(&Yaml::Integer(2)).unwrap(),
            Duration::from_secs(2)
        );
        assert!(as_duration(&Yaml::Integer(-2)).is_err());
        assert_eq!(
            as_duration(&Yaml::Real("0.25".to_string())).unwrap(),
            Duration::from_millis(250)
        );
        assert!(as_duration(&Yaml::Boolean(true)).is_err());
    }
}
