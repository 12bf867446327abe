/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use std::time::Duration;

#[cfg(feature = "yaml")]
mod yaml;

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(1);
const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(2);
const DEFAULT_BATCH_SIZE: NonZeroUsize = NonZeroUsize::new(10_000).unwrap();
const DEFAULT_FREQUENCY: Duration = Duration::from_millis(5000);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpectatorConfig {
    pub(crate) uri: String,
    pub(crate) common_tags: BTreeMap<String, String>,
    pub(crate) connect_timeout: Duration,
    pub(crate) read_timeout: Duration,
    pub(crate) batch_size: NonZeroUsize,
    pub(crate) frequency: Duration,
    pub(crate) compress: bool,
}

impl Default for SpectatorConfig {
    fn default() -> Self {
        SpectatorConfig {
            uri: String::new(),
            common_tags: BTreeMap::new(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            batch_size: DEFAULT_BATCH_SIZE,
            frequency: DEFAULT_FREQUENCY,
            compress: true,
        }
    }
}

impl SpectatorConfig {
    pub fn with_uri<T: Into<String>>(uri: T) -> Self {
        SpectatorConfig {
            uri: uri.into(),
            ..Default::default()
        }
    }

    pub fn set_uri<T: Into<String>>(&mut self, uri: T) {
        self.uri = uri.into();
    }

    pub fn set_common_tag<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.common_tags.insert(key.into(), value.into());
    }

    pub fn with_common_tag<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.set_common_tag(key, value);
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn with_batch_size(mut self, size: NonZeroUsize) -> Self {
        self.batch_size = size;
        self
    }

    pub fn with_frequency(mut self, frequency: Duration) -> Self {
        self.frequency = frequency;
        self
    }

    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Collector endpoint, empty if publishing is disabled.
    #[inline]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    #[inline]
    pub fn common_tags(&self) -> &BTreeMap<String, String> {
        &self.common_tags
    }

    #[inline]
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    #[inline]
    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    #[inline]
    pub fn batch_size(&self) -> usize {
        self.batch_size.get()
    }

    #[inline]
    pub fn frequency(&self) -> Duration {
        self.frequency
    }

    #[inline]
    pub fn compress(&self) -> bool {
        self.compress
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SpectatorConfig::default();
        assert!(config.uri().is_empty());
        assert!(config.common_tags().is_empty());
        assert_eq!(config.connect_timeout(), Duration::from_secs(1));
        assert_eq!(config.read_timeout(), Duration::from_secs(2));
        assert_eq!(config.batch_size(), 10_000);
        assert_eq!(config.frequency(), Duration::from_secs(5));
        assert!(config.compress());
    }

    #[test]
    fn builder() {
        let config = SpectatorConfig::with_uri("http://localhost:7101/api/v4/publish")
            .with_common_tag("nf.app", "www")
            .with_common_tag("nf.region", "us-east-1")
            .with_batch_size(NonZeroUsize::new(500).unwrap())
            .with_frequency(Duration::from_secs(10))
            .with_compress(false);
        assert_eq!(config.uri(), "http://localhost:7101/api/v4/publish");
        assert_eq!(config.common_tags().len(), 2);
        assert_eq!(config.batch_size(), 500);
        assert_eq!(config.frequency(), Duration::from_secs(10));
        assert!(!config.compress());
    }
}
