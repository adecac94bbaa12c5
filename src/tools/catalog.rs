// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Drawbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Drawbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The built-in tool catalog.
//!
//! Failure signaling is deliberately uneven between operations, because
//! external consumers grew up against it: `delete-cell-by-id` reports a
//! missing cell as a bare `success:false`, while the edge-style operations
//! (`add-edge`, `edit-edge`, and the other cell mutators) report it as
//! `success:true` with a null result.

use serde::de::DeserializeOwned;
use serde_json::{json, Map as JsonMap, Value as Json};

use super::{DuplicateTool, ToolDef, ToolError, ToolRegistry};
use crate::model::{reflect_cell, CellRef, HostValue};
use crate::ops::{
    add_cell_of_shape, add_edge, add_rectangle, delete_cell_by_id, edit_cell, edit_edge,
    set_cell_data, set_cell_shape, DeleteOptions, EdgeOptions, EditCellOptions, EditEdgeOptions,
    RectangleOptions, SetDataOptions, SetShapeOptions, ShapeCellOptions,
};
use crate::query::{list_paged_model, PageOptions};
use crate::shapes::{get_shape_by_name, get_shape_categories, get_shapes_in_category};

fn parse_options<T: DeserializeOwned>(options: &JsonMap<String, Json>) -> Result<T, ToolError> {
    serde_json::from_value(Json::Object(options.clone()))
        .map_err(|err| ToolError::Message(err.to_string()))
}

fn reflect_or_null(cell: Option<CellRef>) -> HostValue {
    match cell {
        Some(cell) => reflect_cell(&cell),
        None => HostValue::Null,
    }
}

pub fn built_in_tools() -> Result<ToolRegistry, DuplicateTool> {
    let mut registry = ToolRegistry::new();

    registry.register(ToolDef::new("get-selected-cell", &[], |editor, _| {
        Ok(match editor.get_selection_cell() {
            Some(cell) => reflect_cell(&cell),
            None => HostValue::text("no cell selected"),
        })
    }))?;

    registry.register(ToolDef::new(
        "add-rectangle",
        &["x", "y", "width", "height", "text", "style"],
        |editor, options| {
            let options: RectangleOptions = parse_options(options)?;
            Ok(reflect_cell(&add_rectangle(editor, &options)))
        },
    ))?;

    registry.register(ToolDef::new(
        "delete-cell-by-id",
        &["cell_id"],
        |editor, options| {
            let options: DeleteOptions = parse_options(options)?;
            if delete_cell_by_id(editor, &options) {
                Ok(HostValue::Bool(true))
            } else {
                Err(ToolError::Failed)
            }
        },
    ))?;

    registry.register(ToolDef::new(
        "add-edge",
        &["source_id", "target_id", "style", "text"],
        |editor, options| {
            let options: EdgeOptions = parse_options(options)?;
            Ok(reflect_or_null(add_edge(editor, &options)))
        },
    ))?;

    registry.register(ToolDef::new("get-shape-categories", &[], |_, _| {
        Ok(HostValue::Opaque(json!(get_shape_categories())))
    }))?;

    registry.register(ToolDef::new(
        "get-shapes-in-category",
        &["category_id"],
        |_, options| {
            let category = options
                .get("category_id")
                .and_then(Json::as_str)
                .unwrap_or("");
            Ok(HostValue::Opaque(json!(get_shapes_in_category(category))))
        },
    ))?;

    registry.register(ToolDef::new(
        "get-shape-by-name",
        &["shape_name"],
        |_, options| {
            let name = options
                .get("shape_name")
                .and_then(Json::as_str)
                .unwrap_or("");
            Ok(match get_shape_by_name(name) {
                Some(shape) => HostValue::Opaque(json!(shape)),
                None => HostValue::Null,
            })
        },
    ))?;

    registry.register(ToolDef::new(
        "add-cell-of-shape",
        &["x", "y", "width", "height", "text", "style", "shape_name"],
        |editor, options| {
            let options: ShapeCellOptions = parse_options(options)?;
            Ok(reflect_or_null(add_cell_of_shape(editor, &options)))
        },
    ))?;

    registry.register(ToolDef::new(
        "set-cell-shape",
        &["cell_id", "shape_name"],
        |editor, options| {
            let options: SetShapeOptions = parse_options(options)?;
            Ok(reflect_or_null(set_cell_shape(editor, &options)))
        },
    ))?;

    registry.register(ToolDef::new(
        "set-cell-data",
        &["cell_id", "key", "value"],
        |editor, options| {
            let options: SetDataOptions = parse_options(options)?;
            Ok(reflect_or_null(set_cell_data(editor, &options)))
        },
    ))?;

    registry.register(ToolDef::new(
        "list-paged-model",
        &["page", "page_size", "filter"],
        |editor, options| {
            let options: PageOptions = parse_options(options)?;
            Ok(HostValue::Opaque(json!(list_paged_model(editor, &options))))
        },
    ))?;

    registry.register(ToolDef::new(
        "edit-cell",
        &["cell_id", "text", "x", "y", "width", "height", "style"],
        |editor, options| {
            let options: EditCellOptions = parse_options(options)?;
            Ok(reflect_or_null(edit_cell(editor, &options)))
        },
    ))?;

    registry.register(ToolDef::new(
        "edit-edge",
        &["cell_id", "text", "source_id", "target_id", "style"],
        |editor, options| {
            let options: EditEdgeOptions = parse_options(options)?;
            Ok(reflect_or_null(edit_edge(editor, &options)))
        },
    ))?;

    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::built_in_tools;
    use crate::model::Editor;
    use serde_json::json;

    #[test]
    fn catalog_registers_all_thirteen_tools() {
        let registry = built_in_tools().expect("catalog");
        assert_eq!(registry.names().len(), 13);
    }

    #[test]
    fn add_rectangle_round_trips_through_dispatch() {
        let registry = built_in_tools().expect("catalog");
        let editor = Editor::new();

        let reply = registry
            .dispatch(
                &editor,
                &json!({
                    "__event": "add-rectangle",
                    "__request_id": "r1",
                    "x": 10, "y": 20, "width": 30, "height": 40,
                    "text": "hi"
                }),
            )
            .expect("reply");

        assert_eq!(reply.event, "add-rectangle.r1");
        assert_eq!(reply.request_id, "r1");
        assert!(reply.success);
        let result = reply.result.expect("result");
        assert!(result["id"].as_str().is_some_and(|id| !id.is_empty()));
        assert_eq!(result["geometry"], json!({ "x": 10.0, "y": 20.0, "width": 30.0, "height": 40.0 }));
        assert_eq!(result["value"], json!("hi"));
    }

    #[test]
    fn delete_and_add_edge_fail_differently() {
        let registry = built_in_tools().expect("catalog");
        let editor = Editor::new();

        let deleted = registry
            .dispatch(
                &editor,
                &json!({
                    "__event": "delete-cell-by-id",
                    "__request_id": "r1",
                    "cell_id": "999"
                }),
            )
            .expect("reply");
        assert!(!deleted.success);
        assert!(deleted.error.is_none());

        let edged = registry
            .dispatch(
                &editor,
                &json!({
                    "__event": "add-edge",
                    "__request_id": "r2",
                    "source_id": "999",
                    "target_id": "998"
                }),
            )
            .expect("reply");
        assert!(edged.success);
        assert_eq!(edged.result, Some(json!(null)));
    }

    #[test]
    fn selection_tool_reports_placeholder_when_nothing_selected() {
        let registry = built_in_tools().expect("catalog");
        let editor = Editor::new();

        let reply = registry
            .dispatch(
                &editor,
                &json!({ "__event": "get-selected-cell", "__request_id": "r1" }),
            )
            .expect("reply");
        assert!(reply.success);
        assert_eq!(reply.result, Some(json!("no cell selected")));
    }

    #[test]
    fn shape_queries_read_the_static_catalog() {
        let registry = built_in_tools().expect("catalog");
        let editor = Editor::new();

        let categories = registry
            .dispatch(
                &editor,
                &json!({ "__event": "get-shape-categories", "__request_id": "r1" }),
            )
            .expect("reply");
        assert_eq!(categories.result, Some(json!(["general", "flowchart", "uml"])));

        let shape = registry
            .dispatch(
                &editor,
                &json!({
                    "__event": "get-shape-by-name",
                    "__request_id": "r2",
                    "shape_name": "cloud"
                }),
            )
            .expect("reply");
        let result = shape.result.expect("result");
        assert_eq!(result["name"], json!("cloud"));
        assert_eq!(result["category"], json!("general"));
    }

    #[test]
    fn malformed_parameter_types_become_detailed_errors() {
        let registry = built_in_tools().expect("catalog");
        let editor = Editor::new();

        let reply = registry
            .dispatch(
                &editor,
                &json!({
                    "__event": "add-rectangle",
                    "__request_id": "r1",
                    "x": "not a number"
                }),
            )
            .expect("reply");
        assert!(!reply.success);
        assert!(reply.error.expect("error")["message"].as_str().is_some());
    }

    #[test]
    fn list_paged_model_dispatches_with_filter() {
        let registry = built_in_tools().expect("catalog");
        let editor = crate::model::fixtures::demo_editor();

        let reply = registry
            .dispatch(
                &editor,
                &json!({
                    "__event": "list-paged-model",
                    "__request_id": "r1",
                    "filter": ["equal", "color", "red"]
                }),
            )
            .expect("reply");
        let result = reply.result.expect("result");
        let cells = result.as_array().expect("array");
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0]["value"]["attributes"]["color"], json!("red"));
    }
}
