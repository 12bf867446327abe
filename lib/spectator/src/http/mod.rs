/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use url::Url;

mod error;
pub use error::HttpError;

mod client;
pub use client::HttpClient;

/// Status reported for a batch that never got an HTTP response.
pub const TRANSPORT_FAILURE: i32 = -1;

/// Delivery of encoded batches to the collector.
pub trait Transport: Send + Sync {
    /// Post every batch to `uri`, returning one status per batch in the
    /// same order. Batches that failed below HTTP get [`TRANSPORT_FAILURE`].
    fn post_batches(&self, uri: &Url, batches: &[Vec<u8>]) -> Vec<i32>;

    /// Release transport level resources. Called once the publisher stops.
    fn shutdown(&self) {}
}
