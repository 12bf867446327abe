/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Clone, Copy, Debug)]
pub(crate) enum DropReason {
    FormatFailed,
    ChannelOverflow,
    ChannelClosed,
    WriteFailed,
}

/// Log records that never made it to the output.
#[derive(Default)]
pub struct LogDrops {
    records: AtomicU64,
    format_failed: AtomicU64,
    channel_overflow: AtomicU64,
    channel_closed: AtomicU64,
    write_failed: AtomicU64,
}

impl LogDrops {
    pub(crate) fn add_record(&self) {
        self.records.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn add(&self, reason: DropReason) {
        let counter = match reason {
            DropReason::FormatFailed => &self.format_failed,
            DropReason::ChannelOverflow => &self.channel_overflow,
            DropReason::ChannelClosed => &self.channel_closed,
            DropReason::WriteFailed => &self.write_failed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> LogDropSnapshot {
        LogDropSnapshot {
            records: self.records.load(Ordering::Relaxed),
            format_failed: self.format_failed.load(Ordering::Relaxed),
            channel_overflow: self.channel_overflow.load(Ordering::Relaxed),
            channel_closed: self.channel_closed.load(Ordering::Relaxed),
            write_failed: self.write_failed.load(Ordering::Relaxed),
        }
    }
}

#[derive(Clone, Copy, Default, Debug, Eq, PartialEq)]
pub struct LogDropSnapshot {
    /// Records handed to the drain.
    pub records: u64,
    pub format_failed: u64,
    pub channel_overflow: u64,
    pub channel_closed: u64,
    pub write_failed: u64,
}

impl LogDropSnapshot {
    pub fn dropped(&self) -> u64 {
        self.format_failed + self.channel_overflow + self.channel_closed + self.write_failed
    }
}
