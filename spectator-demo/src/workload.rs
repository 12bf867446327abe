/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::debug;

use spectator::{Counter, DistributionSummary, Id, MaxGauge, Registry, Tags, Timer};

struct WorkerMeters {
    requests: Arc<Counter>,
    latency: Arc<Timer>,
    in_flight: Arc<MaxGauge>,
    payload: Arc<DistributionSummary>,
}

impl WorkerMeters {
    fn new(registry: &Registry, worker: usize) -> Self {
        let worker = worker.to_string();
        WorkerMeters {
            requests: registry.counter(Id::new(
                "demo.requests",
                Tags::from([("worker", worker.as_str())]),
            )),
            latency: registry.timer("demo.latency"),
            in_flight: registry.max_gauge("demo.inFlight"),
            payload: registry.distribution_summary("demo.payloadSize"),
        }
    }
}

/// Simulated request handling until `deadline`. Returns requests served.
fn run_worker(registry: &Registry, worker: usize, deadline: Instant) -> u64 {
    let meters = WorkerMeters::new(registry, worker);
    let mut served = 0u64;
    while Instant::now() < deadline {
        let step = served % 16;
        meters.in_flight.update((step + 1) as f64);
        meters.latency.time(|| {
            std::thread::sleep(Duration::from_millis(1 + step));
        });
        meters.payload.record((512 * (step + 1)) as f64);
        meters.requests.increment();
        served += 1;
    }
    debug!("worker {worker} served {served} requests");
    served
}

pub fn run(registry: &Registry, threads: usize, duration: Duration) -> u64 {
    let deadline = Instant::now() + duration;
    std::thread::scope(|s| {
        let handles: Vec<_> = (0..threads)
            .map(|i| s.spawn(move || run_worker(registry, i, deadline)))
            .collect();
        handles.into_iter().filter_map(|h| h.join().ok()).sum()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use spectator::SpectatorConfig;

    #[test]
    fn short_run() {
        let registry = Registry::new(SpectatorConfig::default());
        let served = run(&registry, 2, Duration::from_millis(50));
        assert!(served > 0);
        // two per-worker counters plus the shared meters
        assert_eq!(registry.size(), 2 + 3);

        let ms = registry.measurements();
        let counted: f64 = ms
            .iter()
            .filter(|m| m.id.name() == "demo.requests")
            .map(|m| m.value)
            .sum();
        assert_eq!(counted, served as f64);
    }
}
