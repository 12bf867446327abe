/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::fmt::{Arguments, Write};

use slog::{KV, Key, OwnedKVList, Record, Serializer};

use super::StdLogValue;

macro_rules! impl_integer_by_itoa {
    ($t:ty => $f:ident) => {
        fn $f(&mut self, key: Key, value: $t) -> slog::Result {
            self.emit_integer(key, value)
        }
    };
}

macro_rules! impl_float_by_ryu {
    ($t:ty => $f:ident) => {
        fn $f(&mut self, key: Key, value: $t) -> slog::Result {
            self.emit_float(key, value)
        }
    };
}

pub(crate) struct StdLogFormatter {
    append_code_position: bool,
}

impl StdLogFormatter {
    pub(crate) fn new(append_code_position: bool) -> Self {
        StdLogFormatter {
            append_code_position,
        }
    }

    pub(crate) fn format_slog(
        &self,
        record: &Record,
        logger_values: &OwnedKVList,
    ) -> Result<StdLogValue, slog::Error> {
        let mut kv_pairs = Vec::new();
        let mut kv_formatter = FormatterKv(&mut kv_pairs);

        logger_values.serialize(record, &mut kv_formatter)?;
        record.kv().serialize(record, &mut kv_formatter)?;

        let location = if self.append_code_position {
            let location = match record.file().rsplit_once('/') {
                Some((_, filename)) => {
                    format!("{}({filename}:{})", record.module(), record.line())
                }
                None => format!("{}({}:{})", record.module(), record.file(), record.line()),
            };
            Some(location)
        } else {
            None
        };

        Ok(StdLogValue {
            level: record.level(),
            message: record.msg().to_string(),
            kv_pairs,
            location,
        })
    }
}

struct FormatterKv<'a>(&'a mut Vec<(String, String)>);

impl FormatterKv<'_> {
    fn emit_integer<T: itoa::Integer>(&mut self, key: Key, value: T) -> slog::Result {
        let mut buffer = itoa::Buffer::new();
        self.emit_str(key, buffer.format(value))
    }

    fn emit_float<T: ryu::Float>(&mut self, key: Key, value: T) -> slog::Result {
        let mut buffer = ryu::Buffer::new();
        self.emit_str(key, buffer.format(value))
    }
}

impl Serializer for FormatterKv<'_> {
    impl_integer_by_itoa!(usize => emit_usize);
    impl_integer_by_itoa!(isize => emit_isize);
    impl_integer_by_itoa!(u8 => emit_u8);
    impl_integer_by_itoa!(i8 => emit_i8);
    impl_integer_by_itoa!(u16 => emit_u16);
    impl_integer_by_itoa!(i16 => emit_i16);
    impl_integer_by_itoa!(u32 => emit_u32);
    impl_integer_by_itoa!(i32 => emit_i32);
    impl_integer_by_itoa!(u64 => emit_u64);
    impl_integer_by_itoa!(i64 => emit_i64);
    impl_float_by_ryu!(f32 => emit_f32);
    impl_float_by_ryu!(f64 => emit_f64);

    fn emit_bool(&mut self, key: Key, value: bool) -> slog::Result {
        self.emit_str(key, if value { "true" } else { "false" })
    }

    fn emit_char(&mut self, key: Key, value: char) -> slog::Result {
        self.emit_str(key, value.encode_utf8(&mut [0u8; 4]))
    }

    fn emit_none(&mut self, _key: Key) -> slog::Result {
        Ok(())
    }

    fn emit_str(&mut self, key: Key, value: &str) -> slog::Result {
        self.0.push((key.to_string(), value.to_string()));
        Ok(())
    }

    fn emit_arguments(&mut self, key: Key, value: &Arguments) -> slog::Result {
        if let Some(s) = value.as_str() {
            return self.emit_str(key, s);
        }
        let mut s = String::new();
        s.write_fmt(*value)?;
        self.emit_str(key, &s)
    }
}
