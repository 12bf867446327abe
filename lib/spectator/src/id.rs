/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;
use std::sync::Arc;

/// Reserved tag key and values selecting how a measurement is aggregated.
pub mod statistic {
    pub const KEY: &str = "statistic";

    pub const COUNT: &str = "count";
    pub const TOTAL_AMOUNT: &str = "totalAmount";
    pub const TOTAL_TIME: &str = "totalTime";
    pub const TOTAL_OF_SQUARES: &str = "totalOfSquares";
    pub const PERCENTILE: &str = "percentile";

    pub const MAX: &str = "max";
    pub const GAUGE: &str = "gauge";
    pub const ACTIVE_TASKS: &str = "activeTasks";
    pub const DURATION: &str = "duration";
}

/// Tag set of a meter id.
///
/// Keys are unique and iteration follows key order, so hashing and
/// encoding are deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tags(BTreeMap<String, String>);

impl Tags {
    pub fn new() -> Self {
        Tags::default()
    }

    /// Add a tag, replacing any previous value for the same key.
    pub fn add<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.0.insert(key.into(), value.into());
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(|s| s.as_str())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.0.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for Tags
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Tags(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Tags
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(value: [(K, V); N]) -> Self {
        Tags::from_iter(value)
    }
}

impl From<BTreeMap<String, String>> for Tags {
    fn from(value: BTreeMap<String, String>) -> Self {
        Tags(value)
    }
}

impl<'a> IntoIterator for &'a Tags {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Immutable meter identifier: a name plus a tag set.
///
/// Deriving a new id never touches the original, as a live id may be shared
/// as a registry key and as the label of pending measurements.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id {
    name: String,
    tags: Tags,
}

pub type IdPtr = Arc<Id>;

impl Id {
    pub fn new<N: Into<String>>(name: N, tags: Tags) -> Self {
        Id {
            name: name.into(),
            tags,
        }
    }

    pub fn of<N: Into<String>>(name: N) -> Self {
        Id::new(name, Tags::default())
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    pub fn with_tag<K, V>(&self, key: K, value: V) -> Id
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut tags = self.tags.clone();
        tags.add(key, value);
        Id::new(self.name.clone(), tags)
    }

    pub fn with_tags<I, K, V>(&self, extra: I) -> Id
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut tags = self.tags.clone();
        for (k, v) in extra {
            tags.add(k, v);
        }
        Id::new(self.name.clone(), tags)
    }

    pub fn with_stat(&self, stat: &str) -> Id {
        self.with_tag(statistic::KEY, stat)
    }

    #[inline]
    pub fn statistic(&self) -> Option<&str> {
        self.tags.get(statistic::KEY)
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Id::of(name)
    }
}

impl From<String> for Id {
    fn from(name: String) -> Self {
        Id::of(name)
    }
}

impl From<&Id> for Id {
    fn from(id: &Id) -> Self {
        id.clone()
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.tags.is_empty() {
            f.write_str("{")?;
            for (i, (k, v)) in self.tags.iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{k}={v}")?;
            }
            f.write_str("}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn structural_equality() {
        let a = Id::new("requests", Tags::from([("status", "200"), ("method", "GET")]));
        let b = Id::new("requests", Tags::from([("method", "GET"), ("status", "200")]));
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a.clone());
        assert!(set.contains(&b));

        let c = Id::new("requests", Tags::from([("status", "500"), ("method", "GET")]));
        assert_ne!(a, c);
        assert_ne!(a, Id::of("requests"));
    }

    #[test]
    fn derived_id_is_new_value() {
        let base = Id::new("latency", Tags::from([("app", "www")]));
        let with_max = base.with_stat(statistic::MAX);

        assert_eq!(base.tags().len(), 1);
        assert_eq!(base.statistic(), None);
        assert_eq!(with_max.tags().len(), 2);
        assert_eq!(with_max.statistic(), Some("max"));
        assert_eq!(with_max.name(), "latency");
        assert_eq!(with_max.tags().get("app"), Some("www"));
    }

    #[test]
    fn with_tag_replaces_value() {
        let base = Id::new("queue", Tags::from([("pool", "a")]));
        let other = base.with_tag("pool", "b");
        assert_eq!(base.tags().get("pool"), Some("a"));
        assert_eq!(other.tags().get("pool"), Some("b"));

        let more = base.with_tags([("zone", "1"), ("rack", "7")]);
        assert_eq!(more.tags().len(), 3);
    }

    #[test]
    fn display() {
        assert_eq!(Id::of("uptime").to_string(), "uptime");
        let id = Id::new("req", Tags::from([("b", "2"), ("a", "1")]));
        assert_eq!(id.to_string(), "req{a=1,b=2}");
    }

    #[test]
    fn tags_iterate_in_key_order() {
        let tags = Tags::from([("zeta", "1"), ("alpha", "2"), ("mid", "3")]);
        let keys: Vec<&str> = tags.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["alpha", "mid", "zeta"]);
    }
}
