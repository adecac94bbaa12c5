// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Drawbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Drawbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Reflection of model cells into host-shaped value graphs.
//!
//! The reflected graph mirrors what the editor hands a page script: every
//! link the model keeps (parent, children, edge endpoints, incident edges)
//! becomes a shared reference, so the result aliases and cycles exactly like
//! the live object would. Callers that serialize a reflection must
//! [`HostValue::release`] it afterwards, since the aliases are strong.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::cell::{CellRef, CellValue, Geometry};
use super::value::{HostMap, HostValue};

type Memo = HashMap<usize, Rc<RefCell<HostMap>>>;

pub fn reflect_cell(cell: &CellRef) -> HostValue {
    let mut memo = Memo::new();
    HostValue::Map(reflect_into(cell, &mut memo))
}

fn reflect_into(cell: &CellRef, memo: &mut Memo) -> Rc<RefCell<HostMap>> {
    let key = Rc::as_ptr(cell) as usize;
    if let Some(existing) = memo.get(&key) {
        return Rc::clone(existing);
    }

    let map = Rc::new(RefCell::new(HostMap::new()));
    memo.insert(key, Rc::clone(&map));

    let node = cell.borrow();
    {
        let mut slots = map.borrow_mut();
        slots.insert("id", HostValue::text(node.id().as_str()));
        slots.insert("mxObjectId", HostValue::text(node.mx_object_id()));
        slots.insert("value", reflect_value(node.value()));
        slots.insert("geometry", reflect_geometry(node.geometry()));
        slots.insert(
            "style",
            node.style().map(HostValue::text).unwrap_or(HostValue::Null),
        );
        slots.insert("vertex", HostValue::Bool(node.is_vertex()));
        slots.insert("edge", HostValue::Bool(node.is_edge()));
        slots.insert("getAttribute", HostValue::Function("getAttribute"));
        slots.insert("setAttribute", HostValue::Function("setAttribute"));
    }

    // Relational slots recurse after the map is memoized, so aliasing back
    // into this cell resolves through the memo instead of recursing forever.
    let parent = match node.parent() {
        Some(parent) => HostValue::Map(reflect_into(&parent, memo)),
        None => HostValue::Null,
    };
    let source = match node.source() {
        Some(source) => HostValue::Map(reflect_into(&source, memo)),
        None => HostValue::Null,
    };
    let target = match node.target() {
        Some(target) => HostValue::Map(reflect_into(&target, memo)),
        None => HostValue::Null,
    };
    let children: Vec<HostValue> = node
        .children()
        .iter()
        .map(|child| HostValue::Map(reflect_into(child, memo)))
        .collect();
    let edges: Vec<HostValue> = node
        .edges()
        .iter()
        .map(|edge| HostValue::Map(reflect_into(edge, memo)))
        .collect();

    let mut slots = map.borrow_mut();
    slots.insert("parent", parent);
    slots.insert("source", source);
    slots.insert("target", target);
    slots.insert("children", HostValue::list(children));
    slots.insert("edges", HostValue::list(edges));
    drop(slots);

    map
}

fn reflect_value(value: &CellValue) -> HostValue {
    match value {
        CellValue::Text(text) => HostValue::text(text.clone()),
        CellValue::Element(element) => {
            let attributes: Vec<HostValue> = element
                .attributes()
                .iter()
                .map(|(name, value)| {
                    let mut attribute = HostMap::new();
                    attribute.insert("name", HostValue::text(name.clone()));
                    attribute.insert("value", HostValue::text(value.clone()));
                    HostValue::map(attribute)
                })
                .collect();

            let mut map = HostMap::new();
            map.insert("attributes", HostValue::list(attributes));
            map.insert("nodeName", HostValue::text(element.node_name()));
            map.insert("localName", HostValue::text(element.node_name().to_lowercase()));
            map.insert("tagName", HostValue::text(element.node_name()));
            HostValue::map(map)
        }
    }
}

fn reflect_geometry(geometry: Option<Geometry>) -> HostValue {
    match geometry {
        Some(geometry) => {
            let mut map = HostMap::new();
            map.insert("x", HostValue::Number(geometry.x));
            map.insert("y", HostValue::Number(geometry.y));
            map.insert("width", HostValue::Number(geometry.width));
            map.insert("height", HostValue::Number(geometry.height));
            HostValue::map(map)
        }
        None => HostValue::Null,
    }
}
