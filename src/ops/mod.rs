// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Drawbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Drawbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mutating operations on the editor model.
//!
//! Each operation validates its inputs against the current model first and
//! only then opens a transaction; a failed lookup returns its sentinel
//! (`false` or `None`) without touching the model or bumping its revision.


use serde::Deserialize;
use serde_json::Value as Json;

use crate::model::{CellRef, CellValue, Editor, ElementValue, Geometry};
use crate::shapes::get_shape_by_name;

const DEFAULT_X: f64 = 100.0;
const DEFAULT_Y: f64 = 100.0;
const DEFAULT_WIDTH: f64 = 120.0;
const DEFAULT_RECT_HEIGHT: f64 = 60.0;
const DEFAULT_SHAPE_HEIGHT: f64 = 80.0;

const DEFAULT_RECT_STYLE: &str =
    "whiteSpace=wrap;html=1;fillColor=#ffffff;strokeColor=#000000;";
const DEFAULT_EDGE_STYLE: &str = "endArrow=classic;html=1;rounded=0;";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RectangleOptions {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub text: Option<String>,
    pub style: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DeleteOptions {
    pub cell_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EdgeOptions {
    pub source_id: Option<String>,
    pub target_id: Option<String>,
    pub style: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ShapeCellOptions {
    pub shape_name: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub text: Option<String>,
    pub style: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SetShapeOptions {
    pub cell_id: Option<String>,
    pub shape_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SetDataOptions {
    pub cell_id: Option<String>,
    pub key: Option<String>,
    pub value: Option<Json>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EditCellOptions {
    pub cell_id: Option<String>,
    pub text: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub style: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EditEdgeOptions {
    pub cell_id: Option<String>,
    pub source_id: Option<String>,
    pub target_id: Option<String>,
    pub style: Option<String>,
    pub text: Option<String>,
}

pub fn add_rectangle(editor: &Editor, options: &RectangleOptions) -> CellRef {
    let geometry = Geometry::new(
        options.x.unwrap_or(DEFAULT_X),
        options.y.unwrap_or(DEFAULT_Y),
        options.width.unwrap_or(DEFAULT_WIDTH),
        options.height.unwrap_or(DEFAULT_RECT_HEIGHT),
    );
    let text = options.text.clone().unwrap_or_default();
    let style = options
        .style
        .clone()
        .unwrap_or_else(|| DEFAULT_RECT_STYLE.to_owned());

    editor.update(|| {
        editor.insert_vertex(None, CellValue::Text(text), geometry, Some(style))
    })
}

pub fn delete_cell_by_id(editor: &Editor, options: &DeleteOptions) -> bool {
    let Some(cell) = options
        .cell_id
        .as_deref()
        .and_then(|id| editor.get_cell(id))
    else {
        return false;
    };
    editor.update(|| editor.remove_cells(&[cell]) > 0)
}

pub fn add_edge(editor: &Editor, options: &EdgeOptions) -> Option<CellRef> {
    let source = editor.get_cell(options.source_id.as_deref()?)?;
    let target = editor.get_cell(options.target_id.as_deref()?)?;
    let text = options.text.clone().unwrap_or_default();
    let style = options
        .style
        .clone()
        .unwrap_or_else(|| DEFAULT_EDGE_STYLE.to_owned());

    Some(editor.update(|| {
        editor.insert_edge(CellValue::Text(text), &source, &target, Some(style))
    }))
}

pub fn add_cell_of_shape(editor: &Editor, options: &ShapeCellOptions) -> Option<CellRef> {
    let shape_name = options.shape_name.as_deref().unwrap_or("rectangle");
    let shape = get_shape_by_name(shape_name)?;
    let geometry = Geometry::new(
        options.x.unwrap_or(DEFAULT_X),
        options.y.unwrap_or(DEFAULT_Y),
        options.width.unwrap_or(DEFAULT_WIDTH),
        options.height.unwrap_or(DEFAULT_SHAPE_HEIGHT),
    );
    let style = match options.style.as_deref() {
        Some(extra) => format!("{}{}", shape.style, extra),
        None => shape.style.to_owned(),
    };
    let text = options.text.clone().unwrap_or_default();

    Some(editor.update(|| {
        editor.insert_vertex(None, CellValue::Text(text), geometry, Some(style))
    }))
}

pub fn set_cell_shape(editor: &Editor, options: &SetShapeOptions) -> Option<CellRef> {
    let cell = editor.get_cell(options.cell_id.as_deref()?)?;
    let shape = get_shape_by_name(options.shape_name.as_deref()?)?;

    editor.update(|| {
        cell.borrow_mut().set_style(Some(shape.style.to_owned()));
    });
    Some(cell)
}

/// Sets one named attribute on a cell, promoting a plain-text value to an
/// element value first (the old text becomes the `label` attribute).
pub fn set_cell_data(editor: &Editor, options: &SetDataOptions) -> Option<CellRef> {
    let cell = editor.get_cell(options.cell_id.as_deref()?)?;
    let key = options.key.as_deref()?;
    let value = match options.value.as_ref() {
        Some(Json::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    };

    editor.update(|| {
        let mut node = cell.borrow_mut();
        let mut element = match node.value() {
            CellValue::Element(element) => element.clone(),
            CellValue::Text(text) => {
                ElementValue::new("object").with_attribute("label", text.clone())
            }
        };
        element.set_attribute(key, value);
        node.set_value(CellValue::Element(element));
    });
    Some(cell)
}

/// Partial update of a vertex: only the fields present in the options
/// change; absent geometry fields keep their current values.
pub fn edit_cell(editor: &Editor, options: &EditCellOptions) -> Option<CellRef> {
    let cell = editor.get_cell(options.cell_id.as_deref()?)?;

    editor.update(|| {
        let mut node = cell.borrow_mut();
        if let Some(text) = &options.text {
            node.set_value(CellValue::Text(text.clone()));
        }
        if options.x.is_some()
            || options.y.is_some()
            || options.width.is_some()
            || options.height.is_some()
        {
            let current = node.geometry().unwrap_or_default();
            node.set_geometry(Geometry::new(
                options.x.unwrap_or(current.x),
                options.y.unwrap_or(current.y),
                options.width.unwrap_or(current.width),
                options.height.unwrap_or(current.height),
            ));
        }
        if let Some(style) = &options.style {
            node.set_style(Some(style.clone()));
        }
    });
    Some(cell)
}

/// Partial update of an edge, including retargeting. An endpoint id that is
/// given but unknown fails the whole operation before any mutation.
pub fn edit_edge(editor: &Editor, options: &EditEdgeOptions) -> Option<CellRef> {
    let edge = editor.get_cell(options.cell_id.as_deref()?)?;
    if !edge.borrow().is_edge() {
        return None;
    }

    let new_source = match options.source_id.as_deref() {
        Some(id) => Some(editor.get_cell(id)?),
        None => None,
    };
    let new_target = match options.target_id.as_deref() {
        Some(id) => Some(editor.get_cell(id)?),
        None => None,
    };

    editor.update(|| {
        if let Some(source) = &new_source {
            editor.set_edge_terminal(&edge, source, true);
        }
        if let Some(target) = &new_target {
            editor.set_edge_terminal(&edge, target, false);
        }
        let mut node = edge.borrow_mut();
        if let Some(text) = &options.text {
            node.set_value(CellValue::Text(text.clone()));
        }
        if let Some(style) = &options.style {
            node.set_style(Some(style.clone()));
        }
    });
    Some(edge)
}
