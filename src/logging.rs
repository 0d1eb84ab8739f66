// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Gruffles-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Gruffles and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Log output.
//!
//! The terminal belongs to the TUI, so log lines go to a file or nowhere.

use std::{
    error::Error,
    fmt,
    fs::OpenOptions,
    path::{Path, PathBuf},
    sync::Mutex,
};

use tracing_subscriber::EnvFilter;

/// Filter directives, e.g. `gruffles=debug`. Falls back to `RUST_LOG`.
pub const LOG_FILTER_ENV: &str = "GRUFFLES_LOG";

const DEFAULT_FILTER: &str = "info";

/// Installs the global subscriber writing to `log_file`. Without a file nothing is installed
/// and every `tracing` event is discarded.
pub fn init(log_file: Option<&Path>) -> Result<(), LoggingError> {
    let Some(path) = log_file else {
        return Ok(());
    };

    let file = OpenOptions::new().create(true).append(true).open(path).map_err(|err| {
        LoggingError::Open { path: path.to_path_buf(), reason: err.to_string() }
    })?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|err| LoggingError::Install(err.to_string()))
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_FILTER_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoggingError {
    Open { path: PathBuf, reason: String },
    Install(String),
}

impl fmt::Display for LoggingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open { path, reason } => {
                write!(f, "cannot open log file {}: {reason}", path.display())
            }
            Self::Install(reason) => write!(f, "cannot install logger: {reason}"),
        }
    }
}

impl Error for LoggingError {}
