/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("unsupported uri scheme {0}")]
    UnsupportedScheme(String),
    #[error("no host in uri")]
    NoHost,
    #[error("failed to resolve {0}: {1:?}")]
    ResolveFailed(String, io::Error),
    #[error("no address found for {0}")]
    NoAddress(String),
    #[error("failed to connect to {0}: {1:?}")]
    ConnectFailed(String, io::Error),
    #[error("failed to compress body: {0:?}")]
    CompressFailed(io::Error),
    #[error("failed to send request: {0:?}")]
    WriteFailed(io::Error),
    #[error("failed to read response: {0:?}")]
    ReadFailed(io::Error),
    #[error("invalid response: {0}")]
    InvalidResponse(&'static str),
}
