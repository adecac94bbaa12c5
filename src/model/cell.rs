// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Drawbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Drawbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::ids::CellId;

pub type CellRef = Rc<RefCell<CellNode>>;
pub type CellWeakRef = Weak<RefCell<CellNode>>;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Geometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Geometry {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }
}

/// A cell label: either a plain string or a DOM-element-like value carrying
/// named attributes (the host's "object" cells).
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Element(ElementValue),
}

impl CellValue {
    pub fn empty() -> Self {
        Self::Text(String::new())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Element(_) => None,
        }
    }

    /// The human-visible label: the string itself, or the element's `label`
    /// attribute.
    pub fn label(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Element(element) => element.get_attribute("label").unwrap_or(""),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementValue {
    node_name: String,
    attributes: Vec<(String, String)>,
}

impl ElementValue {
    pub fn new(node_name: impl Into<String>) -> Self {
        Self {
            node_name: node_name.into(),
            attributes: Vec::new(),
        }
    }

    pub fn node_name(&self) -> &str {
        &self.node_name
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(slot) = self.attributes.iter_mut().find(|(existing, _)| *existing == name) {
            slot.1 = value;
            return;
        }
        self.attributes.push((name, value));
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }
}

/// One node of the editor's model graph.
///
/// Links are bidirectional the way the host keeps them: a child holds a weak
/// parent link while the parent owns its children; an edge holds weak
/// endpoint links while each endpoint lists its incident edges weakly.
#[derive(Debug)]
pub struct CellNode {
    pub(crate) id: CellId,
    pub(crate) mx_object_id: String,
    pub(crate) value: CellValue,
    pub(crate) geometry: Option<Geometry>,
    pub(crate) style: Option<String>,
    pub(crate) vertex: bool,
    pub(crate) edge: bool,
    pub(crate) parent: Option<CellWeakRef>,
    pub(crate) children: Vec<CellRef>,
    pub(crate) source: Option<CellWeakRef>,
    pub(crate) target: Option<CellWeakRef>,
    pub(crate) edges: Vec<CellWeakRef>,
}

impl CellNode {
    pub fn id(&self) -> &CellId {
        &self.id
    }

    pub fn mx_object_id(&self) -> &str {
        &self.mx_object_id
    }

    pub fn value(&self) -> &CellValue {
        &self.value
    }

    pub fn set_value(&mut self, value: CellValue) {
        self.value = value;
    }

    pub fn geometry(&self) -> Option<Geometry> {
        self.geometry
    }

    pub fn set_geometry(&mut self, geometry: Geometry) {
        self.geometry = Some(geometry);
    }

    pub fn style(&self) -> Option<&str> {
        self.style.as_deref()
    }

    pub fn set_style(&mut self, style: Option<String>) {
        self.style = style;
    }

    pub fn is_vertex(&self) -> bool {
        self.vertex
    }

    pub fn is_edge(&self) -> bool {
        self.edge
    }

    pub fn parent(&self) -> Option<CellRef> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }

    pub fn children(&self) -> &[CellRef] {
        &self.children
    }

    pub fn source(&self) -> Option<CellRef> {
        self.source.as_ref().and_then(Weak::upgrade)
    }

    pub fn target(&self) -> Option<CellRef> {
        self.target.as_ref().and_then(Weak::upgrade)
    }

    /// Incident edges that are still alive.
    pub fn edges(&self) -> Vec<CellRef> {
        self.edges.iter().filter_map(Weak::upgrade).collect()
    }
}
