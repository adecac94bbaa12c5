// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Drawbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Drawbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The built-in shape catalog: named styles, grouped by palette category.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShapeEntry {
    pub name: &'static str,
    pub title: &'static str,
    pub category: &'static str,
    pub style: &'static str,
}

const SHAPES: &[ShapeEntry] = &[
    ShapeEntry {
        name: "rectangle",
        title: "Rectangle",
        category: "general",
        style: "whiteSpace=wrap;html=1;",
    },
    ShapeEntry {
        name: "rounded-rectangle",
        title: "Rounded Rectangle",
        category: "general",
        style: "rounded=1;whiteSpace=wrap;html=1;",
    },
    ShapeEntry {
        name: "ellipse",
        title: "Ellipse",
        category: "general",
        style: "ellipse;whiteSpace=wrap;html=1;",
    },
    ShapeEntry {
        name: "square",
        title: "Square",
        category: "general",
        style: "whiteSpace=wrap;html=1;aspect=fixed;",
    },
    ShapeEntry {
        name: "circle",
        title: "Circle",
        category: "general",
        style: "ellipse;whiteSpace=wrap;html=1;aspect=fixed;",
    },
    ShapeEntry {
        name: "text",
        title: "Text",
        category: "general",
        style: "text;html=1;strokeColor=none;fillColor=none;align=center;verticalAlign=middle;",
    },
    ShapeEntry {
        name: "triangle",
        title: "Triangle",
        category: "general",
        style: "triangle;whiteSpace=wrap;html=1;",
    },
    ShapeEntry {
        name: "rhombus",
        title: "Diamond",
        category: "general",
        style: "rhombus;whiteSpace=wrap;html=1;",
    },
    ShapeEntry {
        name: "hexagon",
        title: "Hexagon",
        category: "general",
        style: "shape=hexagon;perimeter=hexagonPerimeter2;whiteSpace=wrap;html=1;",
    },
    ShapeEntry {
        name: "cylinder",
        title: "Cylinder",
        category: "general",
        style: "shape=cylinder3;whiteSpace=wrap;html=1;boundedLbl=1;backgroundOutline=1;size=15;",
    },
    ShapeEntry {
        name: "cloud",
        title: "Cloud",
        category: "general",
        style: "cloud;whiteSpace=wrap;html=1;",
    },
    ShapeEntry {
        name: "note",
        title: "Note",
        category: "general",
        style: "shape=note;whiteSpace=wrap;html=1;backgroundOutline=1;darkOpacity=0.05;",
    },
    ShapeEntry {
        name: "process",
        title: "Process",
        category: "flowchart",
        style: "shape=process;whiteSpace=wrap;html=1;backgroundOutline=1;",
    },
    ShapeEntry {
        name: "decision",
        title: "Decision",
        category: "flowchart",
        style: "rhombus;whiteSpace=wrap;html=1;",
    },
    ShapeEntry {
        name: "terminator",
        title: "Terminator",
        category: "flowchart",
        style: "rounded=1;whiteSpace=wrap;html=1;arcSize=40;",
    },
    ShapeEntry {
        name: "data",
        title: "Data",
        category: "flowchart",
        style: "shape=parallelogram;perimeter=parallelogramPerimeter;whiteSpace=wrap;html=1;",
    },
    ShapeEntry {
        name: "document",
        title: "Document",
        category: "flowchart",
        style: "shape=document;whiteSpace=wrap;html=1;boundedLbl=1;",
    },
    ShapeEntry {
        name: "actor",
        title: "Actor",
        category: "uml",
        style: "shape=umlActor;verticalLabelPosition=bottom;verticalAlign=top;html=1;",
    },
    ShapeEntry {
        name: "component",
        title: "Component",
        category: "uml",
        style: "shape=component;align=left;spacingLeft=36;html=1;",
    },
    ShapeEntry {
        name: "package",
        title: "Package",
        category: "uml",
        style: "shape=folder;fontStyle=1;tabWidth=80;tabHeight=20;tabPosition=left;html=1;",
    },
];

pub fn get_shape_by_name(name: &str) -> Option<&'static ShapeEntry> {
    SHAPES.iter().find(|shape| shape.name == name)
}

pub fn get_shapes_in_category(category: &str) -> Vec<&'static ShapeEntry> {
    SHAPES
        .iter()
        .filter(|shape| shape.category == category)
        .collect()
}

/// Category names in catalog order, deduplicated.
pub fn get_shape_categories() -> Vec<&'static str> {
    let mut categories = Vec::new();
    for shape in SHAPES {
        if !categories.contains(&shape.category) {
            categories.push(shape.category);
        }
    }
    categories
}

#[cfg(test)]
mod tests {
    use super::{get_shape_by_name, get_shape_categories, get_shapes_in_category};

    #[test]
    fn lookup_is_exact() {
        assert!(get_shape_by_name("ellipse").is_some());
        assert!(get_shape_by_name("Ellipse").is_none());
        assert!(get_shape_by_name("").is_none());
    }

    #[test]
    fn categories_come_out_in_catalog_order() {
        assert_eq!(get_shape_categories(), vec!["general", "flowchart", "uml"]);
    }

    #[test]
    fn category_listing_matches_membership() {
        let uml = get_shapes_in_category("uml");
        assert_eq!(uml.len(), 3);
        assert!(uml.iter().all(|shape| shape.category == "uml"));
        assert!(get_shapes_in_category("nope").is_empty());
    }
}
