// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::Result;
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use std::fs;
use std::path::{Path, PathBuf};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Budgetsync", "budgetsync"));

/// Overrides the platform data directory when set.
pub const HOME_ENV: &str = "BUDGETSYNC_HOME";

#[derive(Debug, Clone)]
pub struct Config {
    home: PathBuf,
}

impl Config {
    /// Resolve the data directory from `BUDGETSYNC_HOME`, falling back to the
    /// platform-specific data dir. The directory is created if missing.
    pub fn load() -> Result<Self> {
        let home = match std::env::var_os(HOME_ENV) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => {
                let proj = ProjectDirs::from(APP.0, APP.1, APP.2).ok_or_else(|| {
                    std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        "Could not determine platform-specific data dir",
                    )
                })?;
                proj.data_dir().to_path_buf()
            }
        };
        Self::with_home(home)
    }

    pub fn with_home<P: AsRef<Path>>(home: P) -> Result<Self> {
        let home = home.as_ref().to_path_buf();
        fs::create_dir_all(&home)?;
        Ok(Self { home })
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn db_path(&self) -> PathBuf {
        self.home.join("budgetsync.sqlite")
    }

    pub fn session_path(&self) -> PathBuf {
        self.home.join("session.json")
    }
}
