// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Drawbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Drawbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashMap;
use std::rc::Rc;

use serde_json::Value as Json;

use crate::model::{CellRef, CellValue};

/// Coarse classification used by type filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Edge,
    Vertex,
    Object,
    Group,
    Layer,
}

pub fn classify(cell: &CellRef, root: &CellRef) -> CellKind {
    let node = cell.borrow();
    if node.is_edge() {
        return CellKind::Edge;
    }
    if let CellValue::Element(element) = node.value() {
        if element.node_name() == "object" {
            return CellKind::Object;
        }
    }
    if node.style() == Some("group") {
        return CellKind::Group;
    }
    if let Some(parent) = node.parent() {
        if Rc::ptr_eq(&parent, root) {
            return CellKind::Layer;
        }
    }
    CellKind::Vertex
}

/// Unknown type names match everything; a misspelled filter widens rather
/// than silently emptying the result.
pub fn kind_matches(kind: CellKind, name: &str) -> bool {
    match name {
        "edge" => kind == CellKind::Edge,
        "vertex" => kind == CellKind::Vertex,
        "object" => kind == CellKind::Object,
        "group" => kind == CellKind::Group,
        "layer" => kind == CellKind::Layer,
        _ => true,
    }
}

/// Flattens everything attribute filters can address into one string map:
/// style entries (`key=value` pairs; bare tokens become `"1"`), element
/// attributes, plus the synthetic `id`, `edge` and `text` keys.
pub fn flattened_attributes(cell: &CellRef) -> HashMap<String, String> {
    let node = cell.borrow();
    let mut attributes = HashMap::new();

    if let Some(style) = node.style() {
        for token in style.split(';').filter(|token| !token.is_empty()) {
            match token.split_once('=') {
                Some((key, value)) => {
                    attributes.insert(key.to_owned(), value.to_owned());
                }
                None => {
                    attributes.insert(token.to_owned(), "1".to_owned());
                }
            }
        }
    }

    if let CellValue::Element(element) = node.value() {
        for (name, value) in element.attributes() {
            attributes.insert(name.clone(), value.clone());
        }
    }

    attributes.insert("id".to_owned(), node.id().to_string());
    attributes.insert(
        "edge".to_owned(),
        if node.is_edge() { "true" } else { "false" }.to_owned(),
    );
    attributes.insert("text".to_owned(), node.value().label().to_owned());

    attributes
}

/// Evaluates an attribute filter expression such as
/// `["and", ["equal", "color", "red"], ["equal", "rounded", "1"]]`.
///
/// Malformed expressions match permissively: a non-array node, an unknown
/// operator, or a missing operand all evaluate to true.
pub fn matches_filter(attributes: &HashMap<String, String>, expression: &Json) -> bool {
    let Some(parts) = expression.as_array() else {
        return true;
    };
    let Some(op) = parts.first().and_then(Json::as_str) else {
        return true;
    };
    match op {
        "equal" => {
            let Some(key) = parts.get(1).and_then(Json::as_str) else {
                return true;
            };
            let Some(expected) = parts.get(2) else {
                return true;
            };
            let actual = attributes.get(key).map(String::as_str);
            match expected {
                Json::String(expected) => actual == Some(expected.as_str()),
                other => actual == Some(other.to_string().as_str()),
            }
        }
        "and" => parts[1..]
            .iter()
            .all(|sub| matches_filter(attributes, sub)),
        "or" => {
            if parts.len() == 1 {
                return false;
            }
            parts[1..]
                .iter()
                .any(|sub| matches_filter(attributes, sub))
        }
        _ => true,
    }
}
