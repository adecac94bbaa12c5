// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Drawbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Drawbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Read-side queries over the model: filtered, paginated cell listings.

mod display;
mod filter;

pub use display::transform_cell_for_display;
pub use filter::{classify, flattened_attributes, kind_matches, matches_filter, CellKind};

use serde::Deserialize;
use serde_json::{json, Value as Json};

use crate::model::{reflect_cell, CellRef, CellValue, Editor};
use crate::sanitize::sanitize;

const DEFAULT_PAGE_SIZE: i64 = 50;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PageOptions {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub filter: Option<Json>,
}

/// The parsed form of the loosely-typed `filter` parameter: a bare string is
/// a type filter, a bare array is an attribute expression, an object may
/// carry both.
#[derive(Debug, Default)]
struct ParsedFilter {
    kind: Option<String>,
    attributes: Option<Json>,
}

impl ParsedFilter {
    fn from_json(filter: Option<&Json>) -> Self {
        match filter {
            None | Some(Json::Null) => Self::default(),
            Some(Json::String(kind)) => Self {
                kind: Some(kind.clone()),
                attributes: None,
            },
            Some(expression @ Json::Array(_)) => Self {
                kind: None,
                attributes: Some(expression.clone()),
            },
            Some(Json::Object(fields)) => Self {
                kind: fields
                    .get("type")
                    .and_then(Json::as_str)
                    .map(str::to_owned),
                attributes: fields.get("attributes").cloned(),
            },
            Some(_) => Self::default(),
        }
    }

    fn matches(&self, cell: &CellRef, root: &CellRef) -> bool {
        if let Some(kind) = &self.kind {
            if !kind_matches(classify(cell, root), kind) {
                return false;
            }
        }
        if let Some(expression) = &self.attributes {
            if !matches_filter(&flattened_attributes(cell), expression) {
                return false;
            }
        }
        true
    }
}

/// Lists one page of the model's cells, filtered, in model iteration order.
///
/// Each entry is the sanitized, display-projected cell, annotated with the
/// layer it sits on and its whitespace-separated tags (omitted when empty).
pub fn list_paged_model(editor: &Editor, options: &PageOptions) -> Vec<Json> {
    let page = options.page.unwrap_or(0).max(0) as usize;
    let page_size = options.page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1) as usize;
    let filter = ParsedFilter::from_json(options.filter.as_ref());
    let root = editor.root();

    let matching: Vec<CellRef> = editor
        .cell_ids()
        .iter()
        .filter_map(|id| editor.get_cell(id.as_str()))
        .filter(|cell| filter.matches(cell, &root))
        .collect();

    let start = page.saturating_mul(page_size).min(matching.len());
    let end = start.saturating_add(page_size).min(matching.len());

    matching[start..end]
        .iter()
        .filter_map(|cell| {
            let reflected = reflect_cell(cell);
            let sanitized = sanitize(&reflected);
            reflected.release();
            let mut entry = transform_cell_for_display(&sanitized)?;

            if let Some(layer) = cell_layer(editor, cell) {
                entry["layer"] = layer;
            }
            let tags = cell_tags(cell);
            if !tags.is_empty() {
                entry["tags"] = json!(tags);
            }
            Some(entry)
        })
        .collect()
}

/// The layer a cell sits on: its ancestor parented directly under the model
/// root. A layer is its own layer; the root has none. Unnamed layers report
/// as "Background", matching how the editor titles them.
pub fn cell_layer(editor: &Editor, cell: &CellRef) -> Option<Json> {
    let root = editor.root();
    let mut current = std::rc::Rc::clone(cell);
    loop {
        let parent = current.borrow().parent()?;
        if std::rc::Rc::ptr_eq(&parent, &root) {
            let node = current.borrow();
            let label = node.value().label();
            let name = if label.is_empty() { "Background" } else { label };
            return Some(json!({ "id": node.id().as_str(), "name": name }));
        }
        current = parent;
    }
}

/// Whitespace-separated tokens of the element's `tags` attribute.
pub fn cell_tags(cell: &CellRef) -> Vec<String> {
    let node = cell.borrow();
    match node.value() {
        CellValue::Element(element) => element
            .get_attribute("tags")
            .map(|tags| tags.split_whitespace().map(str::to_owned).collect())
            .unwrap_or_default(),
        CellValue::Text(_) => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::{cell_layer, cell_tags, list_paged_model, PageOptions};
    use crate::model::{fixtures::demo_editor, CellValue, Editor, Geometry};
    use serde_json::json;

    fn options(page: i64, page_size: i64) -> PageOptions {
        PageOptions {
            page: Some(page),
            page_size: Some(page_size),
            filter: None,
        }
    }

    #[test]
    fn pagination_walks_cleanly_off_the_end() {
        let editor = Editor::new();
        for _ in 0..3 {
            editor.insert_vertex(None, CellValue::empty(), Geometry::default(), None);
        }
        // 5 cells total: root, default layer, three vertices.
        assert_eq!(editor.cell_count(), 5);

        assert_eq!(list_paged_model(&editor, &options(0, 2)).len(), 2);
        assert_eq!(list_paged_model(&editor, &options(1, 2)).len(), 2);
        assert_eq!(list_paged_model(&editor, &options(2, 2)).len(), 1);
        assert_eq!(list_paged_model(&editor, &options(3, 2)).len(), 0);
    }

    #[test]
    fn out_of_range_paging_values_are_clamped() {
        let editor = demo_editor();
        let all = list_paged_model(
            &editor,
            &PageOptions {
                page: Some(-3),
                page_size: Some(-1),
                filter: None,
            },
        );
        // page clamps to 0, page size to 1.
        assert_eq!(all.len(), 1);
    }

    #[test]
    fn string_filter_selects_by_type() {
        let editor = demo_editor();
        let edges = list_paged_model(
            &editor,
            &PageOptions {
                filter: Some(json!("edge")),
                ..PageOptions::default()
            },
        );
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0]["edge"], json!(true));
    }

    #[test]
    fn array_filter_selects_by_attributes() {
        let editor = demo_editor();
        let red = list_paged_model(
            &editor,
            &PageOptions {
                filter: Some(json!(["equal", "color", "red"])),
                ..PageOptions::default()
            },
        );
        assert_eq!(red.len(), 1);
        assert_eq!(red[0]["value"]["attributes"]["color"], json!("red"));
    }

    #[test]
    fn or_and_compose_over_colored_cells() {
        let editor = Editor::new();
        for color in ["red", "blue"] {
            let element = crate::model::ElementValue::new("object")
                .with_attribute("label", color)
                .with_attribute("color", color);
            editor.insert_vertex(
                None,
                CellValue::Element(element),
                Geometry::default(),
                None,
            );
        }

        let by_filter = |filter: serde_json::Value| {
            list_paged_model(
                &editor,
                &PageOptions {
                    filter: Some(filter),
                    ..PageOptions::default()
                },
            )
            .len()
        };

        assert_eq!(by_filter(json!(["equal", "color", "red"])), 1);
        assert_eq!(
            by_filter(json!([
                "or",
                ["equal", "color", "red"],
                ["equal", "color", "blue"]
            ])),
            2
        );
        assert_eq!(
            by_filter(json!([
                "and",
                ["equal", "color", "red"],
                ["equal", "color", "blue"]
            ])),
            0
        );
    }

    #[test]
    fn object_filter_combines_type_and_attributes() {
        let editor = demo_editor();
        let hits = list_paged_model(
            &editor,
            &PageOptions {
                filter: Some(json!({
                    "type": "object",
                    "attributes": ["equal", "color", "red"]
                })),
                ..PageOptions::default()
            },
        );
        assert_eq!(hits.len(), 1);

        let misses = list_paged_model(
            &editor,
            &PageOptions {
                filter: Some(json!({
                    "type": "edge",
                    "attributes": ["equal", "color", "red"]
                })),
                ..PageOptions::default()
            },
        );
        assert!(misses.is_empty());
    }

    #[test]
    fn entries_carry_layer_and_tags() {
        let editor = demo_editor();
        let tagged = list_paged_model(
            &editor,
            &PageOptions {
                filter: Some(json!(["equal", "color", "red"])),
                ..PageOptions::default()
            },
        );
        assert_eq!(tagged[0]["tags"], json!(["alpha", "beta"]));
        assert_eq!(tagged[0]["layer"]["name"], json!("Background"));
    }

    #[test]
    fn nested_cells_resolve_to_their_layer() {
        let editor = Editor::new();
        let layer = editor.add_layer("Detail");
        let outer = editor.insert_vertex(
            Some(&layer),
            CellValue::empty(),
            Geometry::default(),
            None,
        );
        let inner = editor.insert_vertex(
            Some(&outer),
            CellValue::empty(),
            Geometry::default(),
            None,
        );

        let resolved = cell_layer(&editor, &inner).expect("layer");
        assert_eq!(resolved["name"], json!("Detail"));
        assert!(cell_layer(&editor, &editor.root()).is_none());
    }

    #[test]
    fn tags_require_an_element_value() {
        let editor = Editor::new();
        let plain = editor.insert_vertex(
            None,
            CellValue::Text("alpha beta".to_owned()),
            Geometry::default(),
            None,
        );
        assert!(cell_tags(&plain).is_empty());
    }
}
