// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Drawbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Drawbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The in-page event bus between transport and tool handlers.
//!
//! Two directed channels: requests fan out to listeners keyed by tool event
//! name, replies fan out to every reply listener. Dispatch is synchronous
//! and re-entrant-safe (the listener list is snapshotted first), and every
//! registration hands back a [`Subscription`] whose disposal is idempotent.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use serde_json::Value as Json;
use tracing::trace;

use crate::protocol::{request_event, BUS_REPLY_STREAM, BUS_REQUEST_STREAM};

type Listener = Rc<dyn Fn(&Json)>;

#[derive(Clone, Default)]
pub struct Bus {
    inner: Rc<BusInner>,
}

#[derive(Default)]
struct BusInner {
    request_listeners: RefCell<Vec<RequestRegistration>>,
    reply_listeners: RefCell<Vec<ReplyRegistration>>,
    next_id: Cell<u64>,
}

struct RequestRegistration {
    id: u64,
    event_name: String,
    listener: Listener,
}

struct ReplyRegistration {
    id: u64,
    listener: Listener,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Channel {
    Request,
    Reply,
}

/// A disposer handle. Dropping it does nothing; only an explicit
/// [`Subscription::dispose`] detaches the listener, and doing so twice is
/// harmless.
pub struct Subscription {
    id: u64,
    channel: Channel,
    inner: Weak<BusInner>,
}

impl Subscription {
    pub fn dispose(&self) {
        let Some(inner) = self.inner.upgrade() else {
            return;
        };
        match self.channel {
            Channel::Request => inner
                .request_listeners
                .borrow_mut()
                .retain(|registration| registration.id != self.id),
            Channel::Reply => inner
                .reply_listeners
                .borrow_mut()
                .retain(|registration| registration.id != self.id),
        }
    }
}

impl Bus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler for one tool event name.
    pub fn on_request_from_server(
        &self,
        event_name: impl Into<String>,
        listener: impl Fn(&Json) + 'static,
    ) -> Subscription {
        let id = self.inner.mint_id();
        self.inner
            .request_listeners
            .borrow_mut()
            .push(RequestRegistration {
                id,
                event_name: event_name.into(),
                listener: Rc::new(listener),
            });
        Subscription {
            id,
            channel: Channel::Request,
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Registers a handler for every outbound reply.
    pub fn on_reply(&self, listener: impl Fn(&Json) + 'static) -> Subscription {
        let id = self.inner.mint_id();
        self.inner
            .reply_listeners
            .borrow_mut()
            .push(ReplyRegistration {
                id,
                listener: Rc::new(listener),
            });
        Subscription {
            id,
            channel: Channel::Reply,
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Delivers a request to the listeners registered for its `__event`.
    /// Payloads without a readable event name are dropped.
    pub fn emit_request(&self, payload: &Json) {
        let Some(event) = request_event(payload) else {
            trace!(channel = BUS_REQUEST_STREAM, "request without __event dropped");
            return;
        };
        let matching: Vec<Listener> = self
            .inner
            .request_listeners
            .borrow()
            .iter()
            .filter(|registration| registration.event_name == event)
            .map(|registration| Rc::clone(&registration.listener))
            .collect();
        if matching.is_empty() {
            trace!(channel = BUS_REQUEST_STREAM, event, "request had no listener");
        }
        for listener in matching {
            listener(payload);
        }
    }

    /// Fans a reply out to every reply listener.
    pub fn send_reply_to_server(&self, payload: Json) {
        trace!(channel = BUS_REPLY_STREAM, "reply dispatched");
        let listeners: Vec<Listener> = self
            .inner
            .reply_listeners
            .borrow()
            .iter()
            .map(|registration| Rc::clone(&registration.listener))
            .collect();
        for listener in &listeners {
            listener(&payload);
        }
    }
}

impl BusInner {
    fn mint_id(&self) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }
}
