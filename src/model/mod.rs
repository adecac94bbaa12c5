// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Drawbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Drawbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The live editor graph: cells, bidirectional links, transactions.
//!
//! This models the capability surface the host diagram editor exposes
//! (id-based lookup, vertex/edge insertion, cell removal, selection, scoped
//! begin/end update transactions). Cells are reference-counted nodes with
//! real parent/child and edge/endpoint links, so the graph is genuinely
//! cyclic — the same shape the sanitizer has to survive in production.

mod cell;
mod graph;
mod ids;
mod reflect;
mod value;

pub mod fixtures;

pub use cell::{CellNode, CellRef, CellValue, CellWeakRef, ElementValue, Geometry};
pub use graph::Editor;
pub use ids::{CellId, Id, IdError};
pub use reflect::reflect_cell;
pub use value::{HostMap, HostValue};
