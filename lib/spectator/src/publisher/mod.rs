/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, Weak};
use std::thread::JoinHandle;
use std::time::Duration;

use anyhow::Context;
use log::{debug, error, info, warn};
use url::Url;

use crate::http::Transport;
use crate::{Id, Registry, SpectatorConfig, Tags};

mod clock;
pub use clock::{Clock, SystemClock, sleep_duration};

mod encode;
pub use encode::{EncodedBatch, Op, encode_batch, encode_batches};

const MEASUREMENTS_SENT: &str = "spectator.measurementsSent";
const MEASUREMENTS_ERR: &str = "spectator.measurementsErr";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PublisherState {
    NotStarted,
    Running,
    Stopped,
}

#[derive(Default)]
struct StopSignal {
    stopped: Mutex<bool>,
    cond: Condvar,
}

impl StopSignal {
    fn notify(&self) {
        let mut stopped = self.stopped.lock().unwrap();
        *stopped = true;
        self.cond.notify_all();
    }

    fn is_set(&self) -> bool {
        *self.stopped.lock().unwrap()
    }

    /// Returns true if woken by a stop request.
    fn wait(&self, timeout: Duration) -> bool {
        let stopped = self.stopped.lock().unwrap();
        let (stopped, _) = self
            .cond
            .wait_timeout_while(stopped, timeout, |stopped| !*stopped)
            .unwrap();
        *stopped
    }
}

/// Periodically ships the measurements of its registry.
///
/// A publisher runs at most once: after `stop()` it can not be restarted.
pub struct Publisher {
    registry: Weak<Registry>,
    transport: Arc<dyn Transport>,
    clock: Arc<dyn Clock>,

    started: AtomicBool,
    signal: Arc<StopSignal>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl Publisher {
    pub(crate) fn new(
        registry: Weak<Registry>,
        transport: Arc<dyn Transport>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Publisher {
            registry,
            transport,
            clock,
            started: AtomicBool::new(false),
            signal: Arc::new(StopSignal::default()),
            handle: Mutex::new(None),
        }
    }

    pub fn state(&self) -> PublisherState {
        if !self.started.load(Ordering::Acquire) {
            PublisherState::NotStarted
        } else if self.signal.is_set() {
            PublisherState::Stopped
        } else {
            PublisherState::Running
        }
    }

    pub(crate) fn start(&self, config: &SpectatorConfig) {
        if config.uri().is_empty() {
            warn!("no uri configured for metrics publishing, ignoring start request");
            return;
        }
        let uri = match Url::parse(config.uri()) {
            Ok(uri) => uri,
            Err(e) => {
                error!("invalid metrics publishing uri {}: {e}", config.uri());
                return;
            }
        };

        let mut handle = self.handle.lock().unwrap();
        if self.started.swap(true, Ordering::AcqRel) {
            warn!("metrics publisher already started, ignoring start request");
            return;
        }

        let frequency = config.frequency();
        let task = PublishTask {
            registry: self.registry.clone(),
            transport: Arc::clone(&self.transport),
            clock: Arc::clone(&self.clock),
            signal: Arc::clone(&self.signal),
            uri,
            frequency,
        };
        info!(
            "start publishing metrics to {} every {}ms",
            task.uri,
            frequency.as_millis()
        );
        match std::thread::Builder::new()
            .name("spectator-publish".to_string())
            .spawn(move || task.run())
        {
            Ok(h) => *handle = Some(h),
            Err(e) => {
                error!("failed to spawn metrics publisher thread: {e:?}");
                self.signal.notify();
            }
        }
    }

    pub(crate) fn stop(&self) {
        if !self.started.load(Ordering::Acquire) {
            return;
        }
        self.signal.notify();

        let Some(handle) = self.handle.lock().unwrap().take() else {
            return;
        };
        // the last registry reference may be released on the publisher thread
        if handle.thread().id() != std::thread::current().id() && handle.join().is_err() {
            error!("metrics publisher thread panicked");
        }
        self.transport.shutdown();
        info!("stopped publishing metrics");
    }
}

struct PublishTask {
    registry: Weak<Registry>,
    transport: Arc<dyn Transport>,
    clock: Arc<dyn Clock>,
    signal: Arc<StopSignal>,
    uri: Url,
    frequency: Duration,
}

impl PublishTask {
    fn run(self) {
        while !self.signal.is_set() {
            let Some(registry) = self.registry.upgrade() else {
                break;
            };

            let start = self.clock.now();
            match catch_unwind(AssertUnwindSafe(|| self.send_metrics(&registry))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => error!("failed to send metrics: {e:?}"),
                Err(_) => error!("panic while sending metrics"),
            }
            drop(registry);

            let elapsed = self.clock.now().saturating_duration_since(start);
            debug!("metrics send cycle took {}ms", elapsed.as_millis());
            if let Some(dur) = sleep_duration(self.frequency, elapsed) {
                if self.signal.wait(dur) {
                    break;
                }
            }
        }
        debug!("metrics publisher thread quit");
    }

    fn send_metrics(&self, registry: &Registry) -> anyhow::Result<()> {
        let config = registry.config();
        let measurements = registry.measurements();
        let batches = encode_batches(config.common_tags(), &measurements, config.batch_size());

        let mut payloads = Vec::with_capacity(batches.len());
        for batch in &batches {
            let data = serde_json::to_vec(&batch.payload)
                .context("failed to serialize measurements")?;
            payloads.push(data);
        }
        debug!(
            "sending {} measurements in {} batches",
            measurements.len(),
            batches.len()
        );

        let codes = self.transport.post_batches(&self.uri, &payloads);
        if codes.len() != batches.len() {
            error!(
                "got {} status codes for {} batches",
                codes.len(),
                batches.len()
            );
        }
        for (batch, code) in batches.iter().zip(codes) {
            record_status(registry, batch.measurements, code);
        }
        Ok(())
    }
}

fn record_status(registry: &Registry, count: usize, code: i32) {
    if code == 200 {
        registry.counter(MEASUREMENTS_SENT).add(count as f64);
        return;
    }

    error!("failed to send {count} measurements, status code {code}");
    let mut buf = itoa::Buffer::new();
    let tags = Tags::from([("error", "httpError"), ("statusCode", buf.format(code))]);
    registry
        .counter(Id::new(MEASUREMENTS_ERR, tags))
        .add(count as f64);
}
