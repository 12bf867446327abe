/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::sync::Arc;

use slog::{Drain, slog_o};
use slog_scope::GlobalLoggerGuard;

use spectator_stdlog::{AsyncLogConfig, LogDrops};

const PROCESS_LOG_THREAD_NAME: &str = "log-process";

pub struct LoggerHandle {
    _scope_guard: GlobalLoggerGuard,
    drops: Arc<LogDrops>,
}

impl LoggerHandle {
    /// Warn about records lost so far, if any.
    pub fn report_drops(&self) {
        let snap = self.drops.snapshot();
        if snap.dropped() > 0 {
            log::warn!(
                "dropped {} of {} log records: {} overflow, {} closed, {} format, {} write",
                snap.dropped(),
                snap.records,
                snap.channel_overflow,
                snap.channel_closed,
                snap.format_failed,
                snap.write_failed
            );
        }
    }
}

pub fn setup(verbose_level: u8) -> Result<LoggerHandle, log::SetLoggerError> {
    let async_conf = AsyncLogConfig::with_name(PROCESS_LOG_THREAD_NAME);
    let drain = spectator_stdlog::new_async_logger(&async_conf, verbose_level > 1, false);
    let drops = drain.drops();
    let logger = slog::Logger::root(drain.fuse(), slog_o!());

    let scope_guard = slog_scope::set_global_logger(logger);

    let log_level = match verbose_level {
        0 => log::Level::Warn,
        1 => log::Level::Info,
        2 => log::Level::Debug,
        _ => log::Level::Trace,
    };

    slog_stdlog::init_with_level(log_level)?;
    Ok(LoggerHandle {
        _scope_guard: scope_guard,
        drops,
    })
}
