/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, Mutex};

use foldhash::fast::FixedState;
use log::error;

use crate::http::{HttpClient, Transport};
use crate::meter::MeterKind;
use crate::publisher::{Clock, Publisher, PublisherState, SystemClock};
use crate::{
    Counter, DistributionSummary, Gauge, Id, IdPtr, MaxGauge, Measurement, Meter, MeterType,
    MonotonicCounter, SpectatorConfig, Tags, Timer,
};

/// Holds every meter of the process, keyed by id, and the publisher that
/// ships their values.
///
/// Meters are never removed. Updating a meter never touches the registry
/// lock; the lock only guards inserts and enumeration.
pub struct Registry {
    config: SpectatorConfig,
    meters: Mutex<HashMap<IdPtr, Meter, FixedState>>,
    publisher: Publisher,
}

impl Registry {
    /// Create a registry publishing over HTTP.
    pub fn new(config: SpectatorConfig) -> Arc<Self> {
        let transport = Arc::new(HttpClient::new(&config));
        Registry::with_transport(config, transport)
    }

    pub fn with_transport(config: SpectatorConfig, transport: Arc<dyn Transport>) -> Arc<Self> {
        Registry::with_parts(config, transport, Arc::new(SystemClock))
    }

    pub fn with_parts(
        config: SpectatorConfig,
        transport: Arc<dyn Transport>,
        clock: Arc<dyn Clock>,
    ) -> Arc<Self> {
        Arc::new_cyclic(|registry| Registry {
            config,
            meters: Mutex::new(HashMap::with_hasher(FixedState::with_seed(0))),
            publisher: Publisher::new(registry.clone(), transport, clock),
        })
    }

    #[inline]
    pub fn config(&self) -> &SpectatorConfig {
        &self.config
    }

    pub fn create_id<N: Into<String>>(&self, name: N, tags: Tags) -> Id {
        Id::new(name, tags)
    }

    /// Start the background publisher. Ignored if already started or if no
    /// uri is configured.
    pub fn start(&self) {
        self.publisher.start(&self.config);
    }

    /// Stop the background publisher for good.
    pub fn stop(&self) {
        self.publisher.stop();
    }

    pub fn publisher_state(&self) -> PublisherState {
        self.publisher.state()
    }

    /// Register `meter` unless a meter with the same id exists, and return
    /// the registered one.
    ///
    /// The candidate is built before the lock is taken and dropped if an
    /// entry exists. A registered meter of a different kind is returned
    /// unchanged, after logging.
    pub fn get_or_create(&self, meter: Meter) -> Meter {
        let attempted = meter.meter_type();
        let registered = {
            let mut map = self.meters.lock().unwrap();
            match map.entry(Arc::clone(meter.id())) {
                Entry::Occupied(entry) => entry.get().clone(),
                Entry::Vacant(entry) => entry.insert(meter).clone(),
            }
        };

        let previous = registered.meter_type();
        if previous != attempted {
            log_type_error(registered.id(), previous, attempted);
        }
        registered
    }

    /// On a kind conflict the caller gets a detached meter of the requested
    /// kind, which is never published.
    fn get_typed<T: MeterKind>(&self, id: Id) -> Arc<T> {
        let candidate = Arc::new(T::create(Arc::new(id)));
        let registered = self.get_or_create(T::into_meter(Arc::clone(&candidate)));
        T::from_meter(&registered).unwrap_or(candidate)
    }

    pub fn counter<I: Into<Id>>(&self, id: I) -> Arc<Counter> {
        self.get_typed(id.into())
    }

    pub fn monotonic_counter<I: Into<Id>>(&self, id: I) -> Arc<MonotonicCounter> {
        self.get_typed(id.into())
    }

    pub fn gauge<I: Into<Id>>(&self, id: I) -> Arc<Gauge> {
        self.get_typed(id.into())
    }

    pub fn max_gauge<I: Into<Id>>(&self, id: I) -> Arc<MaxGauge> {
        self.get_typed(id.into())
    }

    pub fn distribution_summary<I: Into<Id>>(&self, id: I) -> Arc<DistributionSummary> {
        self.get_typed(id.into())
    }

    pub fn timer<I: Into<Id>>(&self, id: I) -> Arc<Timer> {
        self.get_typed(id.into())
    }

    /// Handles of all registered meters.
    pub fn meters(&self) -> Vec<Meter> {
        let map = self.meters.lock().unwrap();
        map.values().cloned().collect()
    }

    pub fn size(&self) -> usize {
        self.meters.lock().unwrap().len()
    }

    /// Poll every registered meter, resetting them for the next interval.
    ///
    /// The lock is only held to copy out the handles.
    pub fn measurements(&self) -> Vec<Measurement> {
        let meters = self.meters();
        let mut res = Vec::with_capacity(meters.len());
        for meter in meters {
            res.extend(meter.measure());
        }
        res
    }
}

impl Drop for Registry {
    fn drop(&mut self) {
        self.publisher.stop();
    }
}

fn log_type_error(id: &Id, previous: MeterType, attempted: MeterType) {
    error!("attempted to register meter {id} as type {attempted} but previously registered as {previous}");
}
