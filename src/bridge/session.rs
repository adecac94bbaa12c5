// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Drawbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Drawbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeSet;
use std::time::Duration;

use crate::config::wildcard_match;
use crate::protocol::{ConnectionState, StatusReport};

use super::TargetId;

#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub url: String,
    pub base_delay: Duration,
    pub max_reconnect_attempts: u32,
    pub ping_interval: Duration,
    /// URL patterns a relay target must match to be registered; empty
    /// matches everything.
    pub url_patterns: Vec<String>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            url: "ws://localhost:3333".to_owned(),
            base_delay: Duration::from_secs(3),
            max_reconnect_attempts: 5,
            ping_interval: Duration::from_secs(30),
            url_patterns: Vec::new(),
        }
    }
}

/// The bridge's entire mutable state, separate from socket I/O: connection
/// state, the reconnect attempt counter, and the discovered target set.
/// Lifecycle is init on startup, mutate on socket and relay events,
/// teardown on shutdown.
#[derive(Debug)]
pub struct BridgeSession {
    config: BridgeConfig,
    state: ConnectionState,
    attempts: u32,
    last_ready_state: Option<u8>,
    targets: BTreeSet<TargetId>,
}

impl BridgeSession {
    pub fn new(config: BridgeConfig) -> Self {
        Self {
            config,
            state: ConnectionState::Disconnected,
            attempts: 0,
            last_ready_state: None,
            targets: BTreeSet::new(),
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    pub fn on_connecting(&mut self) {
        self.state = ConnectionState::Connecting;
        self.last_ready_state = Some(self.state.ready_state());
    }

    /// A successful open resets the backoff counter.
    pub fn on_open(&mut self) {
        self.state = ConnectionState::Connected;
        self.attempts = 0;
        self.last_ready_state = Some(self.state.ready_state());
    }

    pub fn on_close(&mut self) {
        self.state = ConnectionState::Disconnected;
        self.last_ready_state = Some(self.state.ready_state());
    }

    /// The next backoff delay, `base * 1.5^attempt`, or None once the
    /// attempt cap is reached.
    pub fn next_reconnect_delay(&mut self) -> Option<Duration> {
        if self.attempts >= self.config.max_reconnect_attempts {
            return None;
        }
        self.attempts += 1;
        Some(self.config.base_delay.mul_f64(1.5f64.powi(self.attempts as i32)))
    }

    pub fn reset_reconnect(&mut self) {
        self.attempts = 0;
    }

    pub fn add_target(&mut self, id: TargetId) {
        self.targets.insert(id);
    }

    pub fn remove_target(&mut self, id: TargetId) {
        self.targets.remove(&id);
    }

    pub fn target_count(&self) -> usize {
        self.targets.len()
    }

    pub fn accepts_url(&self, url: &str) -> bool {
        if self.config.url_patterns.is_empty() {
            return true;
        }
        self.config
            .url_patterns
            .iter()
            .any(|pattern| wildcard_match(pattern, url))
    }

    pub fn status_report(&self) -> StatusReport {
        StatusReport {
            status: self.state,
            ws_ready_state: self.last_ready_state,
        }
    }
}
