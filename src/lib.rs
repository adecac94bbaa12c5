// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Drawbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Drawbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Drawbridge — WebSocket bridge into a live diagram-editor cell graph.
//!
//! An external control process sends named tool requests over a local
//! WebSocket. The bridge relays each request across isolated stages (socket
//! owner → relay → in-page bus), executes it against the editor's live,
//! cyclic cell graph, and relays a JSON-safe reply back, correlated by
//! `__request_id`.

pub mod bridge;
pub mod bus;
pub mod config;
pub mod model;
pub mod ops;
pub mod protocol;
pub mod query;
pub mod sanitize;
pub mod shapes;
pub mod tools;
