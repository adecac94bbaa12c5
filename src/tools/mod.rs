// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Drawbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Drawbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Tool registry and dispatch.
//!
//! Tools are registered once at startup and are immutable afterwards. A
//! dispatched request has its keys filtered down to the tool's declared
//! allow-list before the handler runs, and every dispatched request yields
//! exactly one reply; handler failures become `success:false` replies and
//! never propagate.

pub mod catalog;

use std::fmt;
use std::rc::Rc;

use serde_json::{json, Map as JsonMap, Value as Json};
use tracing::warn;

use crate::bus::{Bus, Subscription};
use crate::model::{Editor, HostValue};
use crate::protocol::{reply_name, request_event, request_id, Reply};
use crate::sanitize::sanitize;

/// How a handler failed.
///
/// `Failed` is the bare reference-failure sentinel: the reply says
/// `success:false` and nothing else. `Message` carries detail that ends up
/// under the reply's `error` key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    Failed,
    Message(String),
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed => f.write_str("tool failed"),
            Self::Message(message) => f.write_str(message),
        }
    }
}

impl std::error::Error for ToolError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateTool {
    name: String,
}

impl DuplicateTool {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for DuplicateTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tool already registered: {}", self.name)
    }
}

impl std::error::Error for DuplicateTool {}

pub type ToolHandler =
    Box<dyn Fn(&Editor, &JsonMap<String, Json>) -> Result<HostValue, ToolError>>;

pub struct ToolDef {
    name: &'static str,
    accepted_keys: &'static [&'static str],
    handler: ToolHandler,
}

impl ToolDef {
    pub fn new(
        name: &'static str,
        accepted_keys: &'static [&'static str],
        handler: impl Fn(&Editor, &JsonMap<String, Json>) -> Result<HostValue, ToolError> + 'static,
    ) -> Self {
        Self {
            name,
            accepted_keys,
            handler: Box::new(handler),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<ToolDef>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tool: ToolDef) -> Result<(), DuplicateTool> {
        if self.tools.iter().any(|existing| existing.name == tool.name) {
            return Err(DuplicateTool {
                name: tool.name.to_owned(),
            });
        }
        self.tools.push(tool);
        Ok(())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|tool| tool.name).collect()
    }

    fn get(&self, name: &str) -> Option<&ToolDef> {
        self.tools.iter().find(|tool| tool.name == name)
    }

    /// Runs one request to completion. Returns None when no reply can be
    /// produced: the payload has no `__event`, no tool matches, or the
    /// request carries no `__request_id` to correlate a reply with.
    pub fn dispatch(&self, editor: &Editor, payload: &Json) -> Option<Reply> {
        let event = request_event(payload)?;
        let tool = self.get(event)?;
        let Some(id) = request_id(payload) else {
            warn!(tool = event, "request without __request_id dropped");
            return None;
        };

        let filtered = filter_keys(payload, tool.accepted_keys);
        match (tool.handler)(editor, &filtered) {
            Ok(value) => {
                let result = sanitize(&value);
                value.release();
                Some(Reply::success(event, id, result))
            }
            Err(ToolError::Failed) => {
                warn!(tool = event, request_id = id, "tool reported failure");
                Some(Reply {
                    event: reply_name(event, id),
                    request_id: id.to_owned(),
                    success: false,
                    result: None,
                    error: None,
                })
            }
            Err(ToolError::Message(message)) => {
                warn!(tool = event, request_id = id, %message, "tool errored");
                Some(Reply::failure(event, id, json!({ "message": message })))
            }
        }
    }
}

fn filter_keys(payload: &Json, accepted: &[&str]) -> JsonMap<String, Json> {
    let mut filtered = JsonMap::new();
    if let Some(object) = payload.as_object() {
        for (key, value) in object {
            if accepted.contains(&key.as_str()) {
                filtered.insert(key.clone(), value.clone());
            }
        }
    }
    filtered
}

/// Wires every registered tool onto the bus: one request listener per tool
/// name, each replying through the shared outbound channel.
pub fn attach_to_bus(
    bus: &Bus,
    registry: Rc<ToolRegistry>,
    editor: Rc<Editor>,
) -> Vec<Subscription> {
    registry
        .names()
        .into_iter()
        .map(|name| {
            let bus_out = bus.clone();
            let registry = Rc::clone(&registry);
            let editor = Rc::clone(&editor);
            bus.on_request_from_server(name, move |payload| {
                if let Some(reply) = registry.dispatch(&editor, payload) {
                    bus_out.send_reply_to_server(reply.to_value());
                }
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{attach_to_bus, ToolDef, ToolError, ToolRegistry};
    use crate::bus::Bus;
    use crate::model::{Editor, HostValue};
    use serde_json::{json, Value as Json};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn echo_tool() -> ToolDef {
        ToolDef::new("echo", &["text"], |_, options| {
            Ok(options
                .get("text")
                .and_then(Json::as_str)
                .map(HostValue::text)
                .unwrap_or(HostValue::Null))
        })
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = ToolRegistry::new();
        registry.register(echo_tool()).expect("first registration");
        let err = registry.register(echo_tool()).expect_err("duplicate");
        assert_eq!(err.name(), "echo");
    }

    #[test]
    fn dispatch_correlates_reply_with_request() {
        let mut registry = ToolRegistry::new();
        registry.register(echo_tool()).expect("register");
        let editor = Editor::new();

        let reply = registry
            .dispatch(
                &editor,
                &json!({ "__event": "echo", "__request_id": "r7", "text": "hi" }),
            )
            .expect("reply");

        assert_eq!(reply.event, "echo.r7");
        assert_eq!(reply.request_id, "r7");
        assert!(reply.success);
        assert_eq!(reply.result, Some(json!("hi")));
    }

    #[test]
    fn dispatch_filters_keys_to_the_allow_list() {
        let mut registry = ToolRegistry::new();
        registry
            .register(ToolDef::new("keys", &["kept"], |_, options| {
                let keys: Vec<&str> = options.keys().map(String::as_str).collect();
                Ok(HostValue::Opaque(json!(keys)))
            }))
            .expect("register");
        let editor = Editor::new();

        let reply = registry
            .dispatch(
                &editor,
                &json!({
                    "__event": "keys",
                    "__request_id": "r1",
                    "kept": 1,
                    "dropped": 2
                }),
            )
            .expect("reply");
        assert_eq!(reply.result, Some(json!(["kept"])));
    }

    #[test]
    fn unreplyable_requests_yield_no_reply() {
        let mut registry = ToolRegistry::new();
        registry.register(echo_tool()).expect("register");
        let editor = Editor::new();

        assert!(registry.dispatch(&editor, &json!({})).is_none());
        assert!(registry
            .dispatch(&editor, &json!({ "__event": "unknown", "__request_id": "r1" }))
            .is_none());
        assert!(registry
            .dispatch(&editor, &json!({ "__event": "echo" }))
            .is_none());
    }

    #[test]
    fn failure_variants_shape_the_reply() {
        let mut registry = ToolRegistry::new();
        registry
            .register(ToolDef::new("sentinel", &[], |_, _| Err(ToolError::Failed)))
            .expect("register");
        registry
            .register(ToolDef::new("detailed", &[], |_, _| {
                Err(ToolError::Message("bad input".to_owned()))
            }))
            .expect("register");
        let editor = Editor::new();

        let bare = registry
            .dispatch(&editor, &json!({ "__event": "sentinel", "__request_id": "r1" }))
            .expect("reply");
        assert!(!bare.success);
        assert!(bare.error.is_none());

        let detailed = registry
            .dispatch(&editor, &json!({ "__event": "detailed", "__request_id": "r2" }))
            .expect("reply");
        assert!(!detailed.success);
        assert_eq!(detailed.error, Some(json!({ "message": "bad input" })));
    }

    #[test]
    fn concurrent_requests_each_get_exactly_one_reply() {
        let mut registry = ToolRegistry::new();
        registry.register(echo_tool()).expect("register");

        let bus = Bus::new();
        let subscriptions = attach_to_bus(&bus, Rc::new(registry), Rc::new(Editor::new()));

        let replies: Rc<RefCell<Vec<Json>>> = Rc::default();
        let sink = Rc::clone(&replies);
        bus.on_reply(move |reply| sink.borrow_mut().push(reply.clone()));

        for n in 0..5 {
            bus.emit_request(&json!({
                "__event": "echo",
                "__request_id": format!("r{n}"),
                "text": format!("t{n}")
            }));
        }

        let replies = replies.borrow();
        assert_eq!(replies.len(), 5);
        for n in 0..5 {
            let matched = replies
                .iter()
                .filter(|reply| reply["__event"] == json!(format!("echo.r{n}")))
                .count();
            assert_eq!(matched, 1);
        }

        for subscription in &subscriptions {
            subscription.dispose();
        }
    }
}
