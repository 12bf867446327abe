/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::num::NonZeroUsize;
use std::str::FromStr;

use anyhow::anyhow;
use yaml_rust::Yaml;

pub fn as_bool(v: &Yaml) -> anyhow::Result<bool> {
    match v {
        Yaml::String(s) => match s.to_lowercase().as_str() {
            "on" | "true" | "yes" | "1" => Ok(true),
            "off" | "false" | "no" | "0" => Ok(false),
            _ => Err(anyhow!("invalid yaml string value for 'bool': {s}")),
        },
        Yaml::Boolean(value) => Ok(*value),
        Yaml::Integer(i) => Ok(*i != 0),
        _ => Err(anyhow!(
            "yaml value type for 'bool' should be 'boolean' / 'string' / 'integer'"
        )),
    }
}

pub fn as_nonzero_usize(v: &Yaml) -> anyhow::Result<NonZeroUsize> {
    match v {
        Yaml::String(s) => Ok(NonZeroUsize::from_str(s)?),
        Yaml::Integer(i) => {
            let u = usize::try_from(*i)?;
            Ok(NonZeroUsize::try_from(u)?)
        }
        _ => Err(anyhow!(
            "yaml value type for 'nonzero usize' should be 'string' or 'integer'"
        )),
    }
}

/// Scalars are accepted as strings, so tag values like `8080` need no quoting.
pub fn as_string(v: &Yaml) -> anyhow::Result<String> {
    match v {
        Yaml::String(s) => Ok(s.to_string()),
        Yaml::Integer(i) => Ok(i.to_string()),
        Yaml::Real(s) => Ok(s.to_string()),
        Yaml::Boolean(b) => Ok(b.to_string()),
        _ => Err(anyhow!(
            "yaml value type for string should be 'string' / 'integer' / 'real' / 'boolean'"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_values() {
        assert!(as_bool(&yaml_str!("on")).unwrap());
        assert!(!as_bool(&yaml_str!("No")).unwrap());
        assert!(as_bool(&Yaml::Boolean(true)).unwrap());
        assert!(!as_bool(&Yaml::Integer(0)).unwrap());
        assert!(as_bool(&yaml_str!("maybe")).is_err());
        assert!(as_bool(&Yaml::Null).is_err());
    }

    #[test]
    fn nonzero_usize_values() {
        assert_eq!(as_nonzero_usize(&Yaml::Integer(10)).unwrap().get(), 10);
        assert_eq!(as_nonzero_usize(&yaml_str!("42")).unwrap().get(), 42);
        assert!(as_nonzero_usize(&Yaml::Integer(0)).is_err());
        assert!(as_nonzero_usize(&Yaml::Integer(-3)).is_err());
    }

    #[test]
    fn string_values() {
        assert_eq!(as_string(&yaml_str!("abc")).unwrap(), "abc");
        assert_eq!(as_string(&Yaml::Integer(8080)).unwrap(), "8080");
        assert_eq!(as_string(&Yaml::Boolean(false)).unwrap(), "false");
        assert!(as_string(&Yaml::Array(Vec::new())).is_err());
    }
}
