// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Drawbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Drawbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Canned editor states for tests and the `--demo` flag.

use super::cell::{CellValue, ElementValue, Geometry};
use super::graph::Editor;

/// A small but representative diagram: two connected process boxes, a data
/// cell with attributes, a grouped pair, and a second layer.
pub fn demo_editor() -> Editor {
    let editor = Editor::new();

    editor.update(|| {
        let start = editor.insert_vertex(
            None,
            CellValue::Text("Start".to_owned()),
            Geometry::new(80.0, 80.0, 120.0, 60.0),
            Some("rounded=1;whiteSpace=wrap;html=1;".to_owned()),
        );
        let process = editor.insert_vertex(
            None,
            CellValue::Text("Process".to_owned()),
            Geometry::new(280.0, 80.0, 120.0, 60.0),
            Some("whiteSpace=wrap;html=1;".to_owned()),
        );
        editor.insert_edge(
            CellValue::Text("next".to_owned()),
            &start,
            &process,
            Some("endArrow=classic;html=1;".to_owned()),
        );

        let record = ElementValue::new("object")
            .with_attribute("label", "Record")
            .with_attribute("color", "red")
            .with_attribute("tags", "alpha beta");
        editor.insert_vertex(
            None,
            CellValue::Element(record),
            Geometry::new(80.0, 220.0, 140.0, 60.0),
            Some("shape=note;whiteSpace=wrap;html=1;".to_owned()),
        );

        let group = editor.insert_vertex(
            None,
            CellValue::empty(),
            Geometry::new(280.0, 220.0, 200.0, 120.0),
            Some("group".to_owned()),
        );
        editor.insert_vertex(
            Some(&group),
            CellValue::Text("Inner".to_owned()),
            Geometry::new(10.0, 10.0, 80.0, 40.0),
            Some("whiteSpace=wrap;html=1;".to_owned()),
        );

        editor.add_layer("Annotations");
    });

    editor
}
