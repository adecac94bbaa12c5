// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Drawbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Drawbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Startup configuration: the WebSocket port and the URL patterns a relay
//! target must match.
//!
//! A missing or unreadable config file never blocks startup; the loader
//! logs what it ignored and falls back to defaults.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const DEFAULT_PORT: u16 = 3333;
const MIN_PORT: u16 = 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub websocket_port: u16,
    pub url_patterns: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            websocket_port: DEFAULT_PORT,
            url_patterns: vec![
                "https://app.diagrams.net/*".to_owned(),
                "https://draw.io/*".to_owned(),
                "https://*.draw.io/*".to_owned(),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    PortOutOfRange(u16),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PortOutOfRange(port) => {
                write!(f, "websocket port {port} out of range ({MIN_PORT}..=65535)")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Reads the config file, degrading to defaults on any failure. A
    /// parsed config with an invalid port keeps its patterns but resets the
    /// port.
    pub fn load(path: &Path) -> Self {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => {
                debug!(path = %path.display(), error = %err, "config not read; using defaults");
                return Self::default();
            }
        };
        let mut config: Self = match serde_json::from_str(&text) {
            Ok(config) => config,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "config not parsed; using defaults");
                return Self::default();
            }
        };
        if let Err(err) = config.validate() {
            warn!(path = %path.display(), %err, "ignoring configured port");
            config.websocket_port = DEFAULT_PORT;
        }
        config
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.websocket_port < MIN_PORT {
            return Err(ConfigError::PortOutOfRange(self.websocket_port));
        }
        Ok(())
    }

    pub fn ws_url(&self) -> String {
        format!("ws://localhost:{}", self.websocket_port)
    }

    pub fn matches_url(&self, url: &str) -> bool {
        if self.url_patterns.is_empty() {
            return true;
        }
        self.url_patterns
            .iter()
            .any(|pattern| wildcard_match(pattern, url))
    }
}

/// Glob-lite matching: `*` matches any run of characters, everything else
/// is literal. Iterative with backtracking to the last star.
pub fn wildcard_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();

    let mut p = 0;
    let mut t = 0;
    let mut star: Option<usize> = None;
    let mut mark = 0;

    while t < text.len() {
        if p < pattern.len() && pattern[p] == '*' {
            star = Some(p);
            mark = t;
            p += 1;
        } else if p < pattern.len() && pattern[p] == text[t] {
            p += 1;
            t += 1;
        } else if let Some(star_at) = star {
            p = star_at + 1;
            mark += 1;
            t = mark;
        } else {
            return false;
        }
    }
    while p < pattern.len() && pattern[p] == '*' {
        p += 1;
    }
    p == pattern.len()
}
