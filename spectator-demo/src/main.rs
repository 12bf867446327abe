/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use anyhow::Context;
use log::{info, warn};

use spectator::{Registry, SpectatorConfig};

mod logger;
mod opts;
mod workload;

fn load_config(args: &opts::ProcArgs) -> anyhow::Result<SpectatorConfig> {
    let mut config = match &args.config_file {
        Some(path) => {
            let doc = spectator_yaml::load_file(path)?;
            SpectatorConfig::parse_yaml(&doc)
                .context(format!("invalid config file {}", path.display()))?
        }
        None => SpectatorConfig::default(),
    };
    if let Some(uri) = &args.uri {
        config.set_uri(uri.as_str());
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let proc_args = opts::parse_clap();

    let log_handle = logger::setup(proc_args.verbose_level).context("failed to setup logger")?;

    let config = load_config(&proc_args)?;
    if config.uri().is_empty() {
        warn!("no collector uri set, metrics will not be published");
    }

    let registry = Registry::new(config);
    registry.start();

    info!(
        "running {} workers for {}s",
        proc_args.threads,
        proc_args.duration.as_secs()
    );
    let served = workload::run(&registry, proc_args.threads.get(), proc_args.duration);

    registry.stop();
    info!(
        "served {served} requests, {} meters registered",
        registry.size()
    );
    log_handle.report_drops();
    Ok(())
}
