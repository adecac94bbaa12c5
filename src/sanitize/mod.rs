// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Drawbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Drawbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Serialization guard for host-shaped results.
//!
//! Reflected cell graphs are cyclic and carry callable slots, neither of
//! which survives JSON. `sanitize` walks a [`HostValue`] and produces a plain
//! tree: shared containers already seen become a `"[Circular <path>]"`
//! marker, functions vanish, and the heavyweight relational slots are either
//! dropped (`children`, `edges`) or collapsed to an id stub (`parent`,
//! `source`, `target`).

use std::collections::HashSet;

use serde_json::{json, Map as JsonMap, Value as Json};

use crate::model::HostValue;

pub fn sanitize(value: &HostValue) -> Json {
    let mut visited = HashSet::new();
    let mut path = Vec::new();
    walk(value, &mut visited, &mut path)
}

fn walk(value: &HostValue, visited: &mut HashSet<usize>, path: &mut Vec<String>) -> Json {
    match value {
        HostValue::Null => Json::Null,
        HostValue::Bool(flag) => Json::Bool(*flag),
        HostValue::Number(number) => serde_json::Number::from_f64(*number)
            .map(Json::Number)
            .unwrap_or(Json::Null),
        HostValue::Text(text) => Json::String(text.clone()),
        HostValue::Function(_) => Json::Null,
        HostValue::Opaque(json) => json.clone(),
        HostValue::List(items) => {
            let key = value.identity().unwrap_or_default();
            // Once seen, always seen: a second reference to the same
            // container anywhere in the walk becomes a marker, cycle or not.
            if !visited.insert(key) {
                return circular(path);
            }
            let items = items.borrow();
            let mut out = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                path.push(format!("[{index}]"));
                out.push(walk(item, visited, path));
                path.pop();
            }
            Json::Array(out)
        }
        HostValue::Map(map) => {
            let key = value.identity().unwrap_or_default();
            if !visited.insert(key) {
                return circular(path);
            }
            let map = map.borrow();
            let mut out = JsonMap::new();
            for (name, item) in map.entries() {
                if matches!(item, HostValue::Function(_)) {
                    continue;
                }
                match name.as_str() {
                    "children" | "edges" => continue,
                    "parent" | "source" | "target" => {
                        out.insert(name.clone(), collapse_relation(item));
                    }
                    _ => {
                        path.push(name.clone());
                        out.insert(name.clone(), walk(item, visited, path));
                        path.pop();
                    }
                }
            }
            Json::Object(out)
        }
    }
}

/// Relational slots keep only the referenced cell's id.
fn collapse_relation(value: &HostValue) -> Json {
    match value {
        HostValue::Map(map) => match map.borrow().get("id") {
            Some(HostValue::Text(id)) => json!({ "id": id }),
            _ => Json::Null,
        },
        _ => Json::Null,
    }
}

fn circular(path: &[String]) -> Json {
    Json::String(format!("[Circular {}]", path.join(".")))
}

#[cfg(test)]
mod tests {
    use super::sanitize;
    use crate::model::{
        reflect_cell, CellValue, Editor, Geometry, HostMap, HostValue,
    };
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn terminates_on_self_referential_map() {
        let inner = Rc::new(RefCell::new(HostMap::new()));
        inner
            .borrow_mut()
            .insert("loop", HostValue::Map(Rc::clone(&inner)));
        let value = HostValue::Map(Rc::clone(&inner));

        let sanitized = sanitize(&value);
        assert_eq!(sanitized, json!({ "loop": "[Circular loop]" }));

        value.release();
    }

    #[test]
    fn reflected_cell_sanitizes_to_plain_tree() {
        let editor = Editor::new();
        let a = editor.insert_vertex(
            None,
            CellValue::Text("A".to_owned()),
            Geometry::new(1.0, 2.0, 3.0, 4.0),
            Some("rounded=1;".to_owned()),
        );
        let b = editor.insert_vertex(None, CellValue::empty(), Geometry::default(), None);
        editor.insert_edge(CellValue::empty(), &a, &b, None);

        let reflected = reflect_cell(&a);
        let sanitized = sanitize(&reflected);
        reflected.release();

        assert_eq!(sanitized["id"], json!("2"));
        assert_eq!(sanitized["vertex"], json!(true));
        assert_eq!(sanitized["parent"], json!({ "id": "1" }));
        assert_eq!(sanitized["geometry"]["width"], json!(3.0));
        assert!(sanitized.get("children").is_none());
        assert!(sanitized.get("edges").is_none());
        assert!(sanitized.get("getAttribute").is_none());

        // Serializable end to end.
        assert!(serde_json::to_string(&sanitized).is_ok());
    }

    #[test]
    fn sanitizing_a_sanitized_tree_is_identity() {
        let editor = Editor::new();
        let cell = editor.insert_vertex(
            None,
            CellValue::Text("A".to_owned()),
            Geometry::default(),
            None,
        );

        let reflected = reflect_cell(&cell);
        let first = sanitize(&reflected);
        reflected.release();

        let second = sanitize(&HostValue::from_json(&first));
        assert_eq!(first, second);
    }

    #[test]
    fn functions_disappear_from_maps_and_null_in_lists() {
        let mut map = HostMap::new();
        map.insert("run", HostValue::Function("run"));
        map.insert("kept", HostValue::Bool(true));
        map.insert(
            "items",
            HostValue::list(vec![HostValue::Function("item"), HostValue::Number(1.0)]),
        );

        let sanitized = sanitize(&HostValue::map(map));
        assert_eq!(sanitized, json!({ "kept": true, "items": [null, 1.0] }));
    }

    #[test]
    fn non_finite_numbers_become_null() {
        let sanitized = sanitize(&HostValue::list(vec![
            HostValue::Number(f64::NAN),
            HostValue::Number(f64::INFINITY),
            HostValue::Number(2.5),
        ]));
        assert_eq!(sanitized, json!([null, null, 2.5]));
    }

    #[test]
    fn array_segments_appear_in_circular_paths() {
        let shared = Rc::new(RefCell::new(Vec::new()));
        let list = HostValue::List(Rc::clone(&shared));
        shared.borrow_mut().push(list.clone());
        let mut map = HostMap::new();
        map.insert("a", list.clone());
        let value = HostValue::map(map);

        let sanitized = sanitize(&value);
        assert_eq!(sanitized, json!({ "a": ["[Circular a.[0]]"] }));

        value.release();
    }
}
