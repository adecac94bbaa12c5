// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Drawbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Drawbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Wire and relay message shapes.
//!
//! Requests arrive as flat JSON objects carrying `__event` (the tool name)
//! and `__request_id` alongside the tool's own parameters. Replies go out
//! under the derived event name `"<tool>.<request_id>"` so a caller awaiting
//! one request never sees another's answer.

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

/// Channel name for server-to-page tool requests.
pub const BUS_REQUEST_STREAM: &str = "BUS_REQUEST";
/// Channel name for page-to-server tool replies.
pub const BUS_REPLY_STREAM: &str = "BUS_REPLY";

pub const READY_STATE_CONNECTING: u8 = 0;
pub const READY_STATE_OPEN: u8 = 1;
pub const READY_STATE_CLOSED: u8 = 3;

/// The reply event name derived from a request.
pub fn reply_name(event: &str, request_id: &str) -> String {
    format!("{event}.{request_id}")
}

pub fn request_event(payload: &Json) -> Option<&str> {
    payload.get("__event").and_then(Json::as_str)
}

pub fn request_id(payload: &Json) -> Option<&str> {
    payload.get("__request_id").and_then(Json::as_str)
}

/// Frames the bridge itself writes to the socket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ControlFrame {
    Hello { client: String, timestamp: u64 },
    Ping,
}

/// Messages exchanged between the socket owner and its page relays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuntimeMessage {
    SendWsMessage { data: Json },
    WsMessage { data: Json },
    WsStatus { connected: bool },
    GetConnectionStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Connecting,
    Connected,
    Disconnected,
}

impl ConnectionState {
    pub fn ready_state(self) -> u8 {
        match self {
            Self::Connecting => READY_STATE_CONNECTING,
            Self::Connected => READY_STATE_OPEN,
            Self::Disconnected => READY_STATE_CLOSED,
        }
    }
}

/// Answer to a connection-status query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    pub status: ConnectionState,
    /// None until the first connection attempt has produced a socket.
    #[serde(rename = "wsReadyState", skip_serializing_if = "Option::is_none")]
    pub ws_ready_state: Option<u8>,
}

/// A tool reply, addressed by its derived event name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    #[serde(rename = "__event")]
    pub event: String,
    #[serde(rename = "__request_id")]
    pub request_id: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Json>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Json>,
}

impl Reply {
    pub fn success(event: &str, request_id: &str, result: Json) -> Self {
        Self {
            event: reply_name(event, request_id),
            request_id: request_id.to_owned(),
            success: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(event: &str, request_id: &str, error: Json) -> Self {
        Self {
            event: reply_name(event, request_id),
            request_id: request_id.to_owned(),
            success: false,
            result: None,
            error: Some(error),
        }
    }

    pub fn to_value(&self) -> Json {
        serde_json::to_value(self).unwrap_or(Json::Null)
    }
}
