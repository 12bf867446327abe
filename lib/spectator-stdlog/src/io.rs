/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::io::{self, IsTerminal, Write};
use std::sync::Arc;

use anstyle::{AnsiColor, Style};
use chrono::Local;
use flume::Receiver;
use slog::Level;

use super::{DropReason, LogDrops, StdLogValue};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Styles of the parts of one line. All empty for non terminal output.
#[derive(Clone, Copy, Default)]
struct LineStyle {
    level: Style,
    key: Style,
    message: Style,
    location: Style,
}

impl LineStyle {
    fn console(level: Level) -> Self {
        let color = match level {
            Level::Critical => AnsiColor::Magenta,
            Level::Error => AnsiColor::Red,
            Level::Warning => AnsiColor::Yellow,
            Level::Info => AnsiColor::Green,
            Level::Debug => AnsiColor::Cyan,
            Level::Trace => AnsiColor::Blue,
        };
        LineStyle {
            level: Style::new().fg_color(Some(color.into())),
            key: Style::new().bold(),
            message: Style::new().bold(),
            location: Style::new().italic(),
        }
    }
}

pub(crate) struct AsyncIoThread {
    receiver: Receiver<StdLogValue>,
    drops: Arc<LogDrops>,
}

impl AsyncIoThread {
    pub(crate) fn new(receiver: Receiver<StdLogValue>, drops: Arc<LogDrops>) -> Self {
        AsyncIoThread { receiver, drops }
    }

    pub(crate) fn run_with_stderr(self) {
        self.run(io::stderr())
    }

    pub(crate) fn run_with_stdout(self) {
        self.run(io::stdout())
    }

    fn run<IO: Write + IsTerminal>(&self, mut io: IO) {
        let console = io.is_terminal();
        let mut buf: Vec<u8> = Vec::with_capacity(1024);
        while let Ok(v) = self.receiver.recv() {
            self.write_record(&mut io, &mut buf, v, console);
            // drain what queued up meanwhile before flushing
            while let Ok(v) = self.receiver.try_recv() {
                self.write_record(&mut io, &mut buf, v, console);
            }
            let _ = io.flush();
        }
    }

    fn write_record<IO: Write>(
        &self,
        io: &mut IO,
        buf: &mut Vec<u8>,
        v: StdLogValue,
        console: bool,
    ) {
        buf.clear();
        let _ = write_value(buf, v, console);
        if io.write_all(buf).is_err() {
            self.drops.add(DropReason::WriteFailed);
        }
    }
}

fn write_value(io: &mut Vec<u8>, v: StdLogValue, console: bool) -> io::Result<()> {
    let style = if console {
        LineStyle::console(v.level)
    } else {
        LineStyle::default()
    };

    write!(io, "{}", Local::now().format(TIME_FORMAT))?;
    write!(
        io,
        " {}{}{}",
        style.level.render(),
        v.level,
        style.level.render_reset()
    )?;
    for (k, v) in &v.kv_pairs {
        write!(
            io,
            " {}{k}{}: {v},",
            style.key.render(),
            style.key.render_reset()
        )?;
    }
    write!(
        io,
        " {}{}{}",
        style.message.render(),
        v.message_str(),
        style.message.render_reset()
    )?;
    if let Some(location) = &v.location {
        write!(
            io,
            " <{}{location}{}>",
            style.location.render(),
            style.location.render_reset()
        )?;
    }
    writeln!(io)
}
