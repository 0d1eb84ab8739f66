// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Gruffles-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Gruffles and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Client configuration: command-line values first, then environment, then defaults.

use std::{
    env,
    error::Error,
    fmt, fs,
    path::{Path, PathBuf},
};

use crate::pane::{default_layout, parse_layout, LayoutError, LayoutNode};

pub const DEFAULT_SERVER: &str = "localhost:4000";

pub const SERVER_ENV: &str = "GRUFFLES_SERVER";
pub const LAYOUT_ENV: &str = "GRUFFLES_LAYOUT";
pub const LOG_FILE_ENV: &str = "GRUFFLES_LOG_FILE";

/// Values given on the command line; each one beats its environment variable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub server: Option<String>,
    pub layout: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutSource {
    Builtin,
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// `host:port` of the game server.
    pub server: String,
    pub layout: LayoutSource,
    /// Logging stays off without a log file.
    pub log_file: Option<PathBuf>,
}

impl ClientConfig {
    pub fn from_env(overrides: Overrides) -> Result<Self, ConfigError> {
        Self::resolve(overrides, read_env)
    }

    /// Resolves against an arbitrary variable lookup. Blank values count as unset.
    pub fn resolve(
        overrides: Overrides,
        lookup: impl Fn(&str) -> Result<Option<String>, ConfigError>,
    ) -> Result<Self, ConfigError> {
        let var = |name: &str| -> Result<Option<String>, ConfigError> {
            Ok(lookup(name)?.map(|value| value.trim().to_owned()).filter(|value| !value.is_empty()))
        };

        let server = match overrides.server {
            Some(server) => server,
            None => var(SERVER_ENV)?.unwrap_or_else(|| DEFAULT_SERVER.to_owned()),
        };
        validate_server(&server)?;

        let layout = match overrides.layout {
            Some(path) => LayoutSource::File(path),
            None => var(LAYOUT_ENV)?.map_or(LayoutSource::Builtin, |path| {
                LayoutSource::File(PathBuf::from(path))
            }),
        };

        let log_file = match overrides.log_file {
            Some(path) => Some(path),
            None => var(LOG_FILE_ENV)?.map(PathBuf::from),
        };

        Ok(Self { server, layout, log_file })
    }

    /// First line shown in the input pane.
    pub fn greeting(&self) -> String {
        format!("Welcome to {}", self.server)
    }

    pub fn load_layout(&self) -> Result<LayoutNode, ConfigError> {
        match &self.layout {
            LayoutSource::Builtin => Ok(default_layout()),
            LayoutSource::File(path) => load_layout_file(path),
        }
    }
}

pub fn load_layout_file(path: &Path) -> Result<LayoutNode, ConfigError> {
    let json = fs::read_to_string(path).map_err(|err| ConfigError::ReadLayout {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;
    parse_layout(&json).map_err(|source| ConfigError::Layout { path: path.to_path_buf(), source })
}

fn read_env(name: &str) -> Result<Option<String>, ConfigError> {
    match env::var(name) {
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(ConfigError::InvalidEnv {
            name: name.to_owned(),
            value: "<non-unicode>".to_owned(),
        }),
    }
}

fn validate_server(server: &str) -> Result<(), ConfigError> {
    let valid = match server.rsplit_once(':') {
        Some((host, port)) => !host.is_empty() && port.parse::<u16>().is_ok(),
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidServer(server.to_owned()))
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidEnv { name: String, value: String },
    InvalidServer(String),
    ReadLayout { path: PathBuf, reason: String },
    Layout { path: PathBuf, source: LayoutError },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEnv { name, value } => write!(f, "invalid env {name}={value}"),
            Self::InvalidServer(server) => {
                write!(f, "invalid server address {server:?} (expected host:port)")
            }
            Self::ReadLayout { path, reason } => {
                write!(f, "cannot read layout {}: {reason}", path.display())
            }
            Self::Layout { path, source } => write!(f, "{}: {source}", path.display()),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Layout { source, .. } => Some(source),
            _ => None,
        }
    }
}
