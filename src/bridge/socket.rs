// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Drawbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Drawbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use serde_json::Value as Json;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, trace, warn};

use super::session::{BridgeConfig, BridgeSession};
use super::{RelayEvent, TargetId};
use crate::protocol::{ControlFrame, RuntimeMessage};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;
type SocketSink = SplitSink<Socket, Message>;
type Targets = HashMap<TargetId, mpsc::UnboundedSender<RuntimeMessage>>;

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    ReconnectNow,
    Shutdown,
}

/// Owns the WebSocket connection and the relay-target set. Drives the
/// connect / connected / backoff cycle until the control channel closes.
pub struct SocketOwner {
    session: BridgeSession,
    targets: Targets,
    control_rx: mpsc::UnboundedReceiver<RelayEvent>,
}

impl SocketOwner {
    pub fn new(config: BridgeConfig) -> (Self, mpsc::UnboundedSender<RelayEvent>) {
        let (control_tx, control_rx) = mpsc::unbounded_channel();
        let owner = Self {
            session: BridgeSession::new(config),
            targets: HashMap::new(),
            control_rx,
        };
        (owner, control_tx)
    }

    pub async fn run(self) {
        let Self {
            mut session,
            mut targets,
            mut control_rx,
        } = self;

        loop {
            session.on_connecting();
            let url = session.config().url.clone();
            match connect_async(url.as_str()).await {
                Ok((socket, _)) => {
                    debug!(%url, "socket connected");
                    session.on_open();
                    broadcast(
                        &mut session,
                        &mut targets,
                        RuntimeMessage::WsStatus { connected: true },
                    );
                    let flow =
                        run_connected(&mut session, &mut targets, &mut control_rx, socket).await;
                    session.on_close();
                    broadcast(
                        &mut session,
                        &mut targets,
                        RuntimeMessage::WsStatus { connected: false },
                    );
                    if flow == Flow::Shutdown {
                        return;
                    }
                }
                Err(err) => {
                    warn!(%url, error = %err, "socket connect failed");
                    session.on_close();
                }
            }

            match session.next_reconnect_delay() {
                Some(delay) => {
                    debug!(?delay, "reconnect scheduled");
                    if wait_out(&mut session, &mut targets, &mut control_rx, delay).await
                        == Flow::Shutdown
                    {
                        return;
                    }
                }
                None => {
                    warn!("reconnect attempts exhausted; waiting for explicit trigger");
                    if wait_for_reconnect(&mut session, &mut targets, &mut control_rx).await
                        == Flow::Shutdown
                    {
                        return;
                    }
                    session.reset_reconnect();
                }
            }
        }
    }
}

async fn run_connected(
    session: &mut BridgeSession,
    targets: &mut Targets,
    control_rx: &mut mpsc::UnboundedReceiver<RelayEvent>,
    socket: Socket,
) -> Flow {
    let (mut write, mut read) = socket.split();

    let hello = ControlFrame::Hello {
        client: "drawbridge".to_owned(),
        timestamp: now_millis(),
    };
    if !send_json(&mut write, &hello).await {
        return Flow::Continue;
    }

    let period = session.config().ping_interval;
    let mut ping = interval_at(Instant::now() + period, period);

    loop {
        tokio::select! {
            _ = ping.tick() => {
                if !send_json(&mut write, &ControlFrame::Ping).await {
                    warn!("keepalive send failed; dropping connection");
                    return Flow::Continue;
                }
                trace!("keepalive sent");
            }
            event = control_rx.recv() => {
                let Some(event) = event else {
                    return Flow::Shutdown;
                };
                match event {
                    RelayEvent::FromRelay {
                        id,
                        message: RuntimeMessage::SendWsMessage { data },
                    } => {
                        if !send_json(&mut write, &data).await {
                            warn!(target = id, "outbound send failed; dropping connection");
                            return Flow::Continue;
                        }
                        trace!(target = id, "outbound message relayed");
                    }
                    other => handle_control(session, targets, other),
                }
            }
            frame = read.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => handle_frame(session, targets, text.as_str()),
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("socket closed by peer");
                        return Flow::Continue;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        warn!(error = %err, "socket read failed");
                        return Flow::Continue;
                    }
                }
            }
        }
    }
}

/// False means the socket rejected the send; a serialization failure only
/// drops the one frame.
async fn send_json(write: &mut SocketSink, value: &impl Serialize) -> bool {
    match serde_json::to_string(value) {
        Ok(text) => write.send(Message::Text(text.into())).await.is_ok(),
        Err(err) => {
            warn!(error = %err, "unserializable frame dropped");
            true
        }
    }
}

/// Inbound text frame: parse or drop, then fan out to every live target.
fn handle_frame(session: &mut BridgeSession, targets: &mut Targets, text: &str) {
    match serde_json::from_str::<Json>(text) {
        Ok(data) => broadcast(session, targets, RuntimeMessage::WsMessage { data }),
        Err(err) => warn!(error = %err, "malformed frame dropped"),
    }
}

fn broadcast(session: &mut BridgeSession, targets: &mut Targets, message: RuntimeMessage) {
    let mut dead = Vec::new();
    for (id, sender) in targets.iter() {
        if sender.send(message.clone()).is_err() {
            dead.push(*id);
        }
    }
    for id in dead {
        debug!(target = id, "pruned dead relay target");
        targets.remove(&id);
        session.remove_target(id);
    }
}

fn handle_control(session: &mut BridgeSession, targets: &mut Targets, event: RelayEvent) {
    match event {
        RelayEvent::Register { id, url, sender } => {
            register_target(session, targets, id, &url, sender);
        }
        RelayEvent::Deregister { id } => {
            targets.remove(&id);
            session.remove_target(id);
        }
        RelayEvent::QueryStatus { reply } => {
            let _ = reply.send(session.status_report());
        }
        RelayEvent::Reconnect => session.reset_reconnect(),
        RelayEvent::FromRelay { id, message } => {
            trace!(target = id, ?message, "ignoring relay message");
        }
    }
}

fn register_target(
    session: &mut BridgeSession,
    targets: &mut Targets,
    id: TargetId,
    url: &str,
    sender: mpsc::UnboundedSender<RuntimeMessage>,
) {
    if !session.accepts_url(url) {
        debug!(target = id, %url, "relay target rejected by url patterns");
        return;
    }
    let _ = sender.send(RuntimeMessage::WsStatus {
        connected: session.is_connected(),
    });
    session.add_target(id);
    targets.insert(id, sender);
}

/// Sleeps through a backoff delay while still servicing control traffic.
/// Outbound messages arriving now are dropped, not queued.
async fn wait_out(
    session: &mut BridgeSession,
    targets: &mut Targets,
    control_rx: &mut mpsc::UnboundedReceiver<RelayEvent>,
    delay: Duration,
) -> Flow {
    let deadline = tokio::time::sleep(delay);
    tokio::pin!(deadline);
    loop {
        tokio::select! {
            _ = &mut deadline => return Flow::Continue,
            event = control_rx.recv() => {
                let Some(event) = event else {
                    return Flow::Shutdown;
                };
                if handle_disconnected(session, targets, event) == Flow::ReconnectNow {
                    return Flow::ReconnectNow;
                }
            }
        }
    }
}

async fn wait_for_reconnect(
    session: &mut BridgeSession,
    targets: &mut Targets,
    control_rx: &mut mpsc::UnboundedReceiver<RelayEvent>,
) -> Flow {
    loop {
        let Some(event) = control_rx.recv().await else {
            return Flow::Shutdown;
        };
        if handle_disconnected(session, targets, event) == Flow::ReconnectNow {
            return Flow::ReconnectNow;
        }
    }
}

fn handle_disconnected(
    session: &mut BridgeSession,
    targets: &mut Targets,
    event: RelayEvent,
) -> Flow {
    match event {
        RelayEvent::FromRelay {
            id,
            message: RuntimeMessage::SendWsMessage { .. },
        } => {
            debug!(target = id, "outbound message dropped while disconnected");
            Flow::Continue
        }
        RelayEvent::Reconnect => {
            session.reset_reconnect();
            Flow::ReconnectNow
        }
        other => {
            handle_control(session, targets, other);
            Flow::Continue
        }
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::{
        broadcast, handle_control, handle_disconnected, register_target, Flow, Targets,
    };
    use crate::bridge::session::{BridgeConfig, BridgeSession};
    use crate::bridge::RelayEvent;
    use crate::protocol::{ConnectionState, RuntimeMessage};
    use serde_json::json;
    use tokio::sync::{mpsc, oneshot};

    fn session() -> BridgeSession {
        BridgeSession::new(BridgeConfig::default())
    }

    #[test]
    fn registering_target_receives_current_status() {
        let mut session = session();
        let mut targets = Targets::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        register_target(&mut session, &mut targets, 1, "https://app.diagrams.net/", tx);

        assert_eq!(session.target_count(), 1);
        assert_eq!(
            rx.try_recv().ok(),
            Some(RuntimeMessage::WsStatus { connected: false })
        );
    }

    #[test]
    fn pattern_mismatch_rejects_target() {
        let mut session = BridgeSession::new(BridgeConfig {
            url_patterns: vec!["https://app.diagrams.net/*".to_owned()],
            ..BridgeConfig::default()
        });
        let mut targets = Targets::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        register_target(&mut session, &mut targets, 1, "https://example.com/", tx);

        assert_eq!(session.target_count(), 0);
        assert!(targets.is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn broadcast_prunes_closed_targets() {
        let mut session = session();
        let mut targets = Targets::new();
        let (alive_tx, mut alive_rx) = mpsc::unbounded_channel();
        let (dead_tx, dead_rx) = mpsc::unbounded_channel();
        register_target(&mut session, &mut targets, 1, "https://a.example/", alive_tx);
        register_target(&mut session, &mut targets, 2, "https://b.example/", dead_tx);
        let _ = alive_rx.try_recv();
        drop(dead_rx);

        broadcast(
            &mut session,
            &mut targets,
            RuntimeMessage::WsMessage { data: json!({ "x": 1 }) },
        );

        assert_eq!(session.target_count(), 1);
        assert_eq!(targets.len(), 1);
        assert!(matches!(
            alive_rx.try_recv().ok(),
            Some(RuntimeMessage::WsMessage { .. })
        ));
    }

    #[test]
    fn outbound_messages_are_dropped_while_disconnected() {
        let mut session = session();
        let mut targets = Targets::new();

        let flow = handle_disconnected(
            &mut session,
            &mut targets,
            RelayEvent::FromRelay {
                id: 1,
                message: RuntimeMessage::SendWsMessage { data: json!({}) },
            },
        );
        assert_eq!(flow, Flow::Continue);
    }

    #[test]
    fn reconnect_event_breaks_the_idle_state() {
        let mut session = BridgeSession::new(BridgeConfig {
            max_reconnect_attempts: 1,
            ..BridgeConfig::default()
        });
        let mut targets = Targets::new();
        session.next_reconnect_delay();
        assert_eq!(session.next_reconnect_delay(), None);

        let flow = handle_disconnected(&mut session, &mut targets, RelayEvent::Reconnect);
        assert_eq!(flow, Flow::ReconnectNow);
        assert!(session.next_reconnect_delay().is_some());
    }

    #[test]
    fn status_queries_answer_with_the_session_report() {
        let mut session = session();
        session.on_connecting();
        let mut targets = Targets::new();
        let (tx, rx) = oneshot::channel();

        handle_control(&mut session, &mut targets, RelayEvent::QueryStatus { reply: tx });

        let report = rx.blocking_recv().ok();
        assert!(report.is_some_and(|report| {
            report.status == ConnectionState::Connecting && report.ws_ready_state == Some(0)
        }));
    }
}
