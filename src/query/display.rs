// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Drawbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Drawbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde_json::{json, Map as JsonMap, Value as Json};

/// Projects a sanitized cell onto the compact listing shape: known keys
/// only, element values normalized from an attribute list to a plain map.
/// Returns None when the input is not an object.
pub fn transform_cell_for_display(cell: &Json) -> Option<Json> {
    let source = cell.as_object()?;
    let mut out = JsonMap::new();

    for key in ["id", "mxObjectId"] {
        if let Some(value) = source.get(key) {
            out.insert(key.to_owned(), value.clone());
        }
    }

    if let Some(value) = source.get("value") {
        out.insert("value".to_owned(), normalize_value(value));
    }

    for key in ["geometry", "style", "edge"] {
        if let Some(value) = source.get(key) {
            out.insert(key.to_owned(), value.clone());
        }
    }

    if let Some(edges) = source.get("edges").and_then(Json::as_array) {
        let stubs: Vec<Json> = edges
            .iter()
            .filter_map(|edge| edge.get("id"))
            .map(|id| json!({ "id": id }))
            .collect();
        out.insert("edges".to_owned(), Json::Array(stubs));
    }

    for key in ["parent", "source", "target"] {
        if let Some(value) = source.get(key) {
            out.insert(key.to_owned(), value.clone());
        }
    }

    Some(Json::Object(out))
}

/// Element values arrive as `{attributes: [{name, value}, ..], nodeName, ..}`;
/// flatten the attribute list into a name-keyed object for readability.
fn normalize_value(value: &Json) -> Json {
    let Some(object) = value.as_object() else {
        return value.clone();
    };
    let Some(attributes) = object.get("attributes").and_then(Json::as_array) else {
        return value.clone();
    };

    let mut flat = JsonMap::new();
    for attribute in attributes {
        let (Some(name), Some(item)) = (
            attribute.get("name").and_then(Json::as_str),
            attribute.get("value"),
        ) else {
            continue;
        };
        flat.insert(name.to_owned(), item.clone());
    }

    let mut out = JsonMap::new();
    out.insert("attributes".to_owned(), Json::Object(flat));
    for key in ["nodeName", "localName", "tagName"] {
        if let Some(item) = object.get(key) {
            out.insert(key.to_owned(), item.clone());
        }
    }
    Json::Object(out)
}
