// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Drawbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Drawbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use super::cell::{CellNode, CellRef, CellValue, Geometry};
use super::ids::CellId;

/// Handle to the live editor model.
///
/// All mutation goes through the host-style transaction bracket
/// (`begin_update`/`end_update`, or the scoped [`Editor::update`]); the
/// outermost bracket bumps the model revision, which is what keeps the
/// host's undo history consistent.
#[derive(Debug)]
pub struct Editor {
    model: RefCell<GraphModel>,
}

#[derive(Debug)]
struct GraphModel {
    root: CellRef,
    default_parent: CellRef,
    cells: Vec<(CellId, CellRef)>,
    next_id: u64,
    next_object_seq: u64,
    selection: Option<CellId>,
    update_depth: u32,
    rev: u64,
}

fn new_node(id: CellId, object_seq: u64, value: CellValue) -> CellRef {
    Rc::new(RefCell::new(CellNode {
        id,
        mx_object_id: format!("mxCell#{object_seq}"),
        value,
        geometry: None,
        style: None,
        vertex: false,
        edge: false,
        parent: None,
        children: Vec::new(),
        source: None,
        target: None,
        edges: Vec::new(),
    }))
}

fn cell_id(value: u64) -> CellId {
    CellId::new(value.to_string()).expect("minted id is non-empty")
}

impl Editor {
    pub fn new() -> Self {
        let root = new_node(cell_id(0), 0, CellValue::empty());
        let default_parent = new_node(cell_id(1), 1, CellValue::empty());
        default_parent.borrow_mut().parent = Some(Rc::downgrade(&root));
        root.borrow_mut().children.push(Rc::clone(&default_parent));

        let cells = vec![
            (cell_id(0), Rc::clone(&root)),
            (cell_id(1), Rc::clone(&default_parent)),
        ];

        Self {
            model: RefCell::new(GraphModel {
                root,
                default_parent,
                cells,
                next_id: 2,
                next_object_seq: 2,
                selection: None,
                update_depth: 0,
                rev: 0,
            }),
        }
    }

    pub fn root(&self) -> CellRef {
        Rc::clone(&self.model.borrow().root)
    }

    pub fn default_parent(&self) -> CellRef {
        Rc::clone(&self.model.borrow().default_parent)
    }

    pub fn get_cell(&self, id: &str) -> Option<CellRef> {
        self.model
            .borrow()
            .cells
            .iter()
            .find(|(cell_id, _)| cell_id.as_str() == id)
            .map(|(_, cell)| Rc::clone(cell))
    }

    /// Ids of every cell in the model, in the host's iteration order
    /// (insertion order here; callers must not rely on any ordering).
    pub fn cell_ids(&self) -> Vec<CellId> {
        self.model.borrow().cells.iter().map(|(id, _)| id.clone()).collect()
    }

    pub fn cell_count(&self) -> usize {
        self.model.borrow().cells.len()
    }

    pub fn get_selection_cell(&self) -> Option<CellRef> {
        let model = self.model.borrow();
        let selected = model.selection.as_ref()?;
        model
            .cells
            .iter()
            .find(|(id, _)| id == selected)
            .map(|(_, cell)| Rc::clone(cell))
    }

    /// Selects the cell with the given id; returns false if it is unknown.
    pub fn set_selection_cell(&self, id: &str) -> bool {
        let mut model = self.model.borrow_mut();
        let found = model.cells.iter().find(|(cell_id, _)| cell_id.as_str() == id);
        match found {
            Some((cell_id, _)) => {
                let cell_id = cell_id.clone();
                model.selection = Some(cell_id);
                true
            }
            None => false,
        }
    }

    pub fn clear_selection(&self) {
        self.model.borrow_mut().selection = None;
    }

    pub fn begin_update(&self) {
        let mut model = self.model.borrow_mut();
        model.update_depth = model.update_depth.saturating_add(1);
    }

    pub fn end_update(&self) {
        let mut model = self.model.borrow_mut();
        model.update_depth = model.update_depth.saturating_sub(1);
        if model.update_depth == 0 {
            model.rev = model.rev.saturating_add(1);
        }
    }

    /// Runs `f` inside a transaction bracket, host-style.
    pub fn update<R>(&self, f: impl FnOnce() -> R) -> R {
        self.begin_update();
        let result = f();
        self.end_update();
        result
    }

    /// Revision counter; bumped once per outermost transaction.
    pub fn rev(&self) -> u64 {
        self.model.borrow().rev
    }

    pub fn insert_vertex(
        &self,
        parent: Option<&CellRef>,
        value: CellValue,
        geometry: Geometry,
        style: Option<String>,
    ) -> CellRef {
        let parent = parent.map(Rc::clone).unwrap_or_else(|| self.default_parent());
        let (id, object_seq) = self.mint();
        let cell = new_node(id.clone(), object_seq, value);
        {
            let mut node = cell.borrow_mut();
            node.geometry = Some(geometry);
            node.style = style;
            node.vertex = true;
            node.parent = Some(Rc::downgrade(&parent));
        }
        parent.borrow_mut().children.push(Rc::clone(&cell));
        self.model.borrow_mut().cells.push((id, Rc::clone(&cell)));
        cell
    }

    pub fn insert_edge(
        &self,
        value: CellValue,
        source: &CellRef,
        target: &CellRef,
        style: Option<String>,
    ) -> CellRef {
        let parent = self.default_parent();
        let (id, object_seq) = self.mint();
        let cell = new_node(id.clone(), object_seq, value);
        {
            let mut node = cell.borrow_mut();
            node.style = style;
            node.edge = true;
            node.parent = Some(Rc::downgrade(&parent));
            node.source = Some(Rc::downgrade(source));
            node.target = Some(Rc::downgrade(target));
        }
        parent.borrow_mut().children.push(Rc::clone(&cell));
        source.borrow_mut().edges.push(Rc::downgrade(&cell));
        if !Rc::ptr_eq(source, target) {
            target.borrow_mut().edges.push(Rc::downgrade(&cell));
        }
        self.model.borrow_mut().cells.push((id, Rc::clone(&cell)));
        cell
    }

    /// Adds a layer: a cell parented directly under the model root.
    pub fn add_layer(&self, name: &str) -> CellRef {
        let root = self.root();
        let (id, object_seq) = self.mint();
        let cell = new_node(id.clone(), object_seq, CellValue::Text(name.to_owned()));
        cell.borrow_mut().parent = Some(Rc::downgrade(&root));
        root.borrow_mut().children.push(Rc::clone(&cell));
        self.model.borrow_mut().cells.push((id, Rc::clone(&cell)));
        cell
    }

    /// Removes the given cells together with their descendants and, for
    /// vertices, their incident edges.
    pub fn remove_cells(&self, cells: &[CellRef]) -> usize {
        let mut doomed: BTreeSet<CellId> = BTreeSet::new();
        let mut stack: Vec<CellRef> = cells.to_vec();

        while let Some(cell) = stack.pop() {
            let node = cell.borrow();
            if !doomed.insert(node.id.clone()) {
                continue;
            }
            for child in &node.children {
                stack.push(Rc::clone(child));
            }
            if node.vertex {
                for edge in node.edges() {
                    stack.push(edge);
                }
            }
        }

        let mut removed = 0;
        for id in &doomed {
            let Some(cell) = self.get_cell(id.as_str()) else {
                continue;
            };
            self.unlink(&cell);
            removed += 1;
        }

        let mut model = self.model.borrow_mut();
        model.cells.retain(|(id, _)| !doomed.contains(id));
        if let Some(selected) = model.selection.clone() {
            if doomed.contains(&selected) {
                model.selection = None;
            }
        }
        removed
    }

    /// Reconnects one terminal of an edge, maintaining the incident-edge
    /// lists on both the old and the new endpoint.
    pub fn set_edge_terminal(&self, edge: &CellRef, terminal: &CellRef, is_source: bool) {
        let old = {
            let node = edge.borrow();
            if is_source {
                node.source()
            } else {
                node.target()
            }
        };
        if let Some(old) = old {
            if !Rc::ptr_eq(&old, terminal) {
                old.borrow_mut()
                    .edges
                    .retain(|weak| weak.upgrade().map(|e| !Rc::ptr_eq(&e, edge)).unwrap_or(false));
            }
        }

        {
            let mut node = edge.borrow_mut();
            if is_source {
                node.source = Some(Rc::downgrade(terminal));
            } else {
                node.target = Some(Rc::downgrade(terminal));
            }
        }

        let already_incident = terminal
            .borrow()
            .edges
            .iter()
            .filter_map(|weak| weak.upgrade())
            .any(|e| Rc::ptr_eq(&e, edge));
        if !already_incident {
            terminal.borrow_mut().edges.push(Rc::downgrade(edge));
        }
    }

    fn mint(&self) -> (CellId, u64) {
        let mut model = self.model.borrow_mut();
        let id = cell_id(model.next_id);
        let object_seq = model.next_object_seq;
        model.next_id += 1;
        model.next_object_seq += 1;
        (id, object_seq)
    }

    fn unlink(&self, cell: &CellRef) {
        let (parent, is_edge, source, target) = {
            let node = cell.borrow();
            (node.parent(), node.edge, node.source(), node.target())
        };

        if let Some(parent) = parent {
            parent
                .borrow_mut()
                .children
                .retain(|child| !Rc::ptr_eq(child, cell));
        }

        if is_edge {
            for terminal in [source, target].into_iter().flatten() {
                terminal
                    .borrow_mut()
                    .edges
                    .retain(|weak| weak.upgrade().map(|e| !Rc::ptr_eq(&e, cell)).unwrap_or(false));
            }
        }
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::Editor;
    use crate::model::{CellValue, Geometry};

    #[test]
    fn new_editor_has_root_and_default_layer() {
        let editor = Editor::new();
        assert_eq!(editor.cell_count(), 2);

        let layer = editor.default_parent();
        let layer = layer.borrow();
        let parent = layer.parent().expect("layer parent");
        assert!(std::rc::Rc::ptr_eq(&parent, &editor.root()));
    }

    #[test]
    fn insert_vertex_links_parent_and_child() {
        let editor = Editor::new();
        let cell = editor.insert_vertex(
            None,
            CellValue::Text("A".to_owned()),
            Geometry::new(0.0, 0.0, 10.0, 10.0),
            None,
        );

        let node = cell.borrow();
        assert_eq!(node.id().as_str(), "2");
        assert!(node.is_vertex());
        let parent = node.parent().expect("parent");
        assert!(parent.borrow().children().iter().any(|c| std::rc::Rc::ptr_eq(c, &cell)));
    }

    #[test]
    fn insert_edge_links_both_terminals() {
        let editor = Editor::new();
        let a = editor.insert_vertex(None, CellValue::empty(), Geometry::default(), None);
        let b = editor.insert_vertex(None, CellValue::empty(), Geometry::default(), None);
        let edge = editor.insert_edge(CellValue::empty(), &a, &b, None);

        assert!(edge.borrow().is_edge());
        assert_eq!(a.borrow().edges().len(), 1);
        assert_eq!(b.borrow().edges().len(), 1);
        assert!(std::rc::Rc::ptr_eq(&edge.borrow().source().expect("source"), &a));
        assert!(std::rc::Rc::ptr_eq(&edge.borrow().target().expect("target"), &b));
    }

    #[test]
    fn remove_vertex_removes_incident_edges() {
        let editor = Editor::new();
        let a = editor.insert_vertex(None, CellValue::empty(), Geometry::default(), None);
        let b = editor.insert_vertex(None, CellValue::empty(), Geometry::default(), None);
        let edge = editor.insert_edge(CellValue::empty(), &a, &b, None);
        let edge_id = edge.borrow().id().clone();

        let removed = editor.remove_cells(&[a]);

        assert_eq!(removed, 2);
        assert!(editor.get_cell(edge_id.as_str()).is_none());
        assert!(b.borrow().edges().is_empty());
    }

    #[test]
    fn selection_clears_when_selected_cell_is_removed() {
        let editor = Editor::new();
        let a = editor.insert_vertex(None, CellValue::empty(), Geometry::default(), None);
        let id = a.borrow().id().clone();
        assert!(editor.set_selection_cell(id.as_str()));
        assert!(editor.get_selection_cell().is_some());

        editor.remove_cells(&[a]);
        assert!(editor.get_selection_cell().is_none());
    }

    #[test]
    fn outermost_transaction_bumps_rev_once() {
        let editor = Editor::new();
        assert_eq!(editor.rev(), 0);
        editor.update(|| {
            editor.update(|| {
                editor.insert_vertex(None, CellValue::empty(), Geometry::default(), None);
            });
        });
        assert_eq!(editor.rev(), 1);
    }

    #[test]
    fn set_edge_terminal_moves_incidence() {
        let editor = Editor::new();
        let a = editor.insert_vertex(None, CellValue::empty(), Geometry::default(), None);
        let b = editor.insert_vertex(None, CellValue::empty(), Geometry::default(), None);
        let c = editor.insert_vertex(None, CellValue::empty(), Geometry::default(), None);
        let edge = editor.insert_edge(CellValue::empty(), &a, &b, None);

        editor.set_edge_terminal(&edge, &c, false);

        assert!(std::rc::Rc::ptr_eq(&edge.borrow().target().expect("target"), &c));
        assert!(b.borrow().edges().is_empty());
        assert_eq!(c.borrow().edges().len(), 1);
    }
}
