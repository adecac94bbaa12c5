// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Drawbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Drawbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The transport bridge: one socket owner relaying frames between a
//! WebSocket endpoint and a set of page relays.
//!
//! The socket owner holds the single outbound connection and its reconnect
//! state; relays register with it over a control channel and receive
//! inbound frames plus connectivity changes over their own channel. Frames
//! cross the relay-to-page boundary in string-serialized form.

mod relay;
mod session;
mod socket;

pub use relay::PageRelay;
pub use session::{BridgeConfig, BridgeSession};
pub use socket::SocketOwner;

use tokio::sync::{mpsc, oneshot};

use crate::protocol::{RuntimeMessage, StatusReport};

pub type TargetId = u64;

/// Control events from relays (and the embedding process) to the socket
/// owner.
#[derive(Debug)]
pub enum RelayEvent {
    Register {
        id: TargetId,
        url: String,
        sender: mpsc::UnboundedSender<RuntimeMessage>,
    },
    Deregister {
        id: TargetId,
    },
    FromRelay {
        id: TargetId,
        message: RuntimeMessage,
    },
    QueryStatus {
        reply: oneshot::Sender<StatusReport>,
    },
    /// Explicit reconnect trigger; the only way back once the backoff cap
    /// has been reached.
    Reconnect,
}
