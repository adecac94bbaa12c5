// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Drawbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Drawbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde_json::Value as Json;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, trace, warn};

use super::{RelayEvent, TargetId};
use crate::bus::{Bus, Subscription};
use crate::protocol::{RuntimeMessage, StatusReport};

/// The per-page relay stage: forwards inbound frames onto the page bus and
/// forwards bus replies back to the socket owner.
///
/// Payloads pass the page boundary in string form; a frame that does not
/// survive the serialize/reparse round trip is dropped here rather than
/// handed to tool listeners half-readable.
pub struct PageRelay {
    id: TargetId,
    bus: Bus,
    control_tx: mpsc::UnboundedSender<RelayEvent>,
    inbound_rx: mpsc::UnboundedReceiver<RuntimeMessage>,
    reply_subscription: Subscription,
}

impl PageRelay {
    /// Registers with the socket owner and starts forwarding bus replies.
    pub fn connect(
        id: TargetId,
        url: &str,
        bus: Bus,
        control_tx: mpsc::UnboundedSender<RelayEvent>,
    ) -> Self {
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        let _ = control_tx.send(RelayEvent::Register {
            id,
            url: url.to_owned(),
            sender: inbound_tx,
        });

        let reply_tx = control_tx.clone();
        let reply_subscription = bus.on_reply(move |reply| {
            let _ = reply_tx.send(RelayEvent::FromRelay {
                id,
                message: RuntimeMessage::SendWsMessage {
                    data: reply.clone(),
                },
            });
        });

        Self {
            id,
            bus,
            control_tx,
            inbound_rx,
            reply_subscription,
        }
    }

    /// Asks the socket owner for its current connection state. None when
    /// the owner is gone.
    pub async fn connection_status(&self) -> Option<StatusReport> {
        let (tx, rx) = oneshot::channel();
        self.control_tx
            .send(RelayEvent::QueryStatus { reply: tx })
            .ok()?;
        rx.await.ok()
    }

    pub async fn run(mut self) {
        while let Some(message) = self.inbound_rx.recv().await {
            match message {
                RuntimeMessage::WsMessage { data } => self.deliver(&data),
                RuntimeMessage::WsStatus { connected } => {
                    debug!(relay = self.id, connected, "socket status changed");
                }
                other => trace!(relay = self.id, ?other, "ignoring runtime message"),
            }
        }

        self.reply_subscription.dispose();
        let _ = self.control_tx.send(RelayEvent::Deregister { id: self.id });
    }

    fn deliver(&self, data: &Json) {
        let text = match serde_json::to_string(data) {
            Ok(text) => text,
            Err(err) => {
                warn!(relay = self.id, error = %err, "inbound payload not serializable");
                return;
            }
        };
        match serde_json::from_str::<Json>(&text) {
            Ok(payload) => self.bus.emit_request(&payload),
            Err(err) => {
                warn!(relay = self.id, error = %err, "inbound payload dropped at page boundary");
            }
        }
    }
}
