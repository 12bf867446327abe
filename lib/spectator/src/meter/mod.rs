/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::fmt;
use std::sync::Arc;

use crate::{Id, IdPtr, Measurement};

mod atomic;

mod counter;
pub use counter::Counter;

mod monotonic_counter;
pub use monotonic_counter::MonotonicCounter;

mod gauge;
pub use gauge::Gauge;

mod max_gauge;
pub use max_gauge::MaxGauge;

mod dist_summary;
pub use dist_summary::DistributionSummary;

mod timer;
pub use timer::Timer;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MeterType {
    Counter,
    MonotonicCounter,
    Gauge,
    MaxGauge,
    DistributionSummary,
    Timer,
}

impl MeterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeterType::Counter => "Counter",
            MeterType::MonotonicCounter => "MonotonicCounter",
            MeterType::Gauge => "Gauge",
            MeterType::MaxGauge => "MaxGauge",
            MeterType::DistributionSummary => "DistributionSummary",
            MeterType::Timer => "Timer",
        }
    }
}

impl fmt::Display for MeterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shared handle onto one registered meter, whatever its kind.
#[derive(Clone)]
pub enum Meter {
    Counter(Arc<Counter>),
    MonotonicCounter(Arc<MonotonicCounter>),
    Gauge(Arc<Gauge>),
    MaxGauge(Arc<MaxGauge>),
    DistributionSummary(Arc<DistributionSummary>),
    Timer(Arc<Timer>),
}

impl Meter {
    pub fn new(meter_type: MeterType, id: IdPtr) -> Self {
        match meter_type {
            MeterType::Counter => Meter::Counter(Arc::new(Counter::new(id))),
            MeterType::MonotonicCounter => {
                Meter::MonotonicCounter(Arc::new(MonotonicCounter::new(id)))
            }
            MeterType::Gauge => Meter::Gauge(Arc::new(Gauge::new(id))),
            MeterType::MaxGauge => Meter::MaxGauge(Arc::new(MaxGauge::new(id))),
            MeterType::DistributionSummary => {
                Meter::DistributionSummary(Arc::new(DistributionSummary::new(id)))
            }
            MeterType::Timer => Meter::Timer(Arc::new(Timer::new(id))),
        }
    }

    pub fn meter_type(&self) -> MeterType {
        match self {
            Meter::Counter(_) => MeterType::Counter,
            Meter::MonotonicCounter(_) => MeterType::MonotonicCounter,
            Meter::Gauge(_) => MeterType::Gauge,
            Meter::MaxGauge(_) => MeterType::MaxGauge,
            Meter::DistributionSummary(_) => MeterType::DistributionSummary,
            Meter::Timer(_) => MeterType::Timer,
        }
    }

    pub fn id(&self) -> &IdPtr {
        match self {
            Meter::Counter(m) => m.id(),
            Meter::MonotonicCounter(m) => m.id(),
            Meter::Gauge(m) => m.id(),
            Meter::MaxGauge(m) => m.id(),
            Meter::DistributionSummary(m) => m.id(),
            Meter::Timer(m) => m.id(),
        }
    }

    /// Feed one value through the kind's own update operation.
    ///
    /// Timers take the value in seconds.
    pub fn update(&self, value: f64) {
        match self {
            Meter::Counter(m) => m.add(value),
            Meter::MonotonicCounter(m) => m.set(value),
            Meter::Gauge(m) => m.set(value),
            Meter::MaxGauge(m) => m.update(value),
            Meter::DistributionSummary(m) => m.record(value),
            Meter::Timer(m) => m.record_seconds(value),
        }
    }

    pub fn measure(&self) -> Vec<Measurement> {
        match self {
            Meter::Counter(m) => m.measure(),
            Meter::MonotonicCounter(m) => m.measure(),
            Meter::Gauge(m) => m.measure(),
            Meter::MaxGauge(m) => m.measure(),
            Meter::DistributionSummary(m) => m.measure(),
            Meter::Timer(m) => m.measure(),
        }
    }
}

impl fmt::Debug for Meter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.meter_type(), self.id())
    }
}

/// Glue between a concrete meter type and the [`Meter`] enum.
pub(crate) trait MeterKind: Sized {
    const TYPE: MeterType;

    fn create(id: IdPtr) -> Self;

    fn into_meter(this: Arc<Self>) -> Meter;

    fn from_meter(meter: &Meter) -> Option<Arc<Self>>;
}

macro_rules! impl_meter_kind {
    ($t:ident) => {
        impl MeterKind for $t {
            const TYPE: MeterType = MeterType::$t;

            fn create(id: IdPtr) -> Self {
                $t::new(id)
            }

            fn into_meter(this: Arc<Self>) -> Meter {
                Meter::$t(this)
            }

            fn from_meter(meter: &Meter) -> Option<Arc<Self>> {
                match meter {
                    Meter::$t(m) => Some(Arc::clone(m)),
                    _ => None,
                }
            }
        }
    };
}

impl_meter_kind!(Counter);
impl_meter_kind!(MonotonicCounter);
impl_meter_kind!(Gauge);
impl_meter_kind!(MaxGauge);
impl_meter_kind!(DistributionSummary);
impl_meter_kind!(Timer);

fn stat_id(id: &Id, stat: &str) -> IdPtr {
    Arc::new(id.with_stat(stat))
}
