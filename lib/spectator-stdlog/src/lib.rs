/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::sync::Arc;

use flume::{Sender, TrySendError};
use slog::{Drain, Level, OwnedKVList, Record};

mod format;
use format::StdLogFormatter;

mod io;
use io::AsyncIoThread;

mod stats;
use stats::DropReason;
pub use stats::{LogDropSnapshot, LogDrops};

#[derive(Clone, Debug)]
pub struct AsyncLogConfig {
    pub channel_capacity: usize,
    pub thread_name: String,
}

impl AsyncLogConfig {
    pub fn with_name(thread_name: &str) -> Self {
        AsyncLogConfig {
            channel_capacity: 1024,
            thread_name: thread_name.to_string(),
        }
    }
}

impl Default for AsyncLogConfig {
    fn default() -> Self {
        AsyncLogConfig::with_name("log-stdio")
    }
}

pub struct StdLogValue {
    level: Level,
    message: String,
    kv_pairs: Vec<(String, String)>,
    location: Option<String>,
}

impl StdLogValue {
    fn message_str(&self) -> &str {
        if self.message.is_empty() {
            "()"
        } else {
            &self.message
        }
    }
}

/// slog drain handing formatted records over to the io thread.
///
/// Records are dropped, and counted, if the channel is full.
pub struct AsyncLogger {
    sender: Sender<StdLogValue>,
    formatter: StdLogFormatter,
    drops: Arc<LogDrops>,
}

impl AsyncLogger {
    /// Drop counters, shared with the io thread.
    pub fn drops(&self) -> Arc<LogDrops> {
        Arc::clone(&self.drops)
    }
}

impl Drain for AsyncLogger {
    type Ok = ();
    type Err = slog::Error;

    fn log(&self, record: &Record, logger_values: &OwnedKVList) -> Result<(), slog::Error> {
        self.drops.add_record();

        let v = self.formatter.format_slog(record, logger_values).inspect_err(|_| {
            self.drops.add(DropReason::FormatFailed);
        })?;
        match self.sender.try_send(v) {
            Ok(_) => {}
            Err(TrySendError::Full(_)) => self.drops.add(DropReason::ChannelOverflow),
            Err(TrySendError::Disconnected(_)) => self.drops.add(DropReason::ChannelClosed),
        }
        Ok(())
    }
}

pub fn new_async_logger(
    async_conf: &AsyncLogConfig,
    append_code_position: bool,
    use_stdout: bool,
) -> AsyncLogger {
    let (sender, receiver) = flume::bounded::<StdLogValue>(async_conf.channel_capacity);

    let drops = Arc::new(LogDrops::default());

    let io_thread = AsyncIoThread::new(receiver, Arc::clone(&drops));

    let _detached_thread = std::thread::Builder::new()
        .name(async_conf.thread_name.clone())
        .spawn(move || {
            if use_stdout {
                io_thread.run_with_stdout();
            } else {
                io_thread.run_with_stderr();
            }
        });

    AsyncLogger {
        sender,
        formatter: StdLogFormatter::new(append_code_position),
        drops,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flume::Receiver;
    use slog::{Logger, o};

    fn logger(capacity: usize) -> (Logger, Arc<LogDrops>, Receiver<StdLogValue>) {
        let (sender, receiver) = flume::bounded(capacity);
        let drain = AsyncLogger {
            sender,
            formatter: StdLogFormatter::new(false),
            drops: Arc::new(LogDrops::default()),
        };
        let drops = drain.drops();
        (Logger::root(drain.fuse(), o!("app" => "demo")), drops, receiver)
    }

    #[test]
    fn send_to_channel() {
        let (logger, drops, receiver) = logger(4);
        slog::info!(logger, "sent {} measurements", 12; "batch" => 3);

        let v = receiver.try_recv().unwrap();
        assert_eq!(v.level, Level::Info);
        assert_eq!(v.message, "sent 12 measurements");
        assert!(v.kv_pairs.contains(&("app".to_string(), "demo".to_string())));
        assert!(v.kv_pairs.contains(&("batch".to_string(), "3".to_string())));
        assert!(v.location.is_none());

        let snap = drops.snapshot();
        assert_eq!(snap.records, 1);
        assert_eq!(snap.dropped(), 0);
    }

    #[test]
    fn overflow_is_counted() {
        let (logger, drops, receiver) = logger(1);
        slog::warn!(logger, "first");
        slog::warn!(logger, "second");
        let snap = drops.snapshot();
        assert_eq!(snap.records, 2);
        assert_eq!(snap.channel_overflow, 1);
        assert_eq!(receiver.try_recv().unwrap().message, "first");
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn closed_is_counted() {
        let (logger, drops, receiver) = logger(1);
        drop(receiver);
        slog::error!(logger, "lost");
        assert_eq!(drops.snapshot().channel_closed, 1);
    }
}
