/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

mod id;
pub use id::{Id, IdPtr, Tags, statistic};

mod measurement;
pub use measurement::Measurement;

mod meter;
pub use meter::{
    Counter, DistributionSummary, Gauge, MaxGauge, Meter, MeterType, MonotonicCounter, Timer,
};

mod config;
pub use config::SpectatorConfig;

mod registry;
pub use registry::Registry;

pub mod http;
pub mod publisher;
pub use publisher::PublisherState;
