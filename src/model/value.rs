// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Drawbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Drawbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Host-shaped values: the loosely-typed object graphs the editor hands out.
//!
//! Lists and maps are shared (`Rc`) so two references to the same container
//! compare identical by pointer — the property the sanitizer's cycle
//! detection relies on. `Opaque` carries non-plain values (timestamps and the
//! like) that pass through sanitization untouched.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use serde_json::Value as Json;

/// An insertion-ordered string-keyed map, as the host's objects behave.
#[derive(Debug, Clone, Default)]
pub struct HostMap {
    entries: Vec<(String, HostValue)>,
}

impl HostMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces in place, preserving the original key position.
    pub fn insert(&mut self, key: impl Into<String>, value: HostValue) {
        let key = key.into();
        if let Some(slot) = self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            slot.1 = value;
            return;
        }
        self.entries.push((key, value));
    }

    pub fn get(&self, key: &str) -> Option<&HostValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    pub fn entries(&self) -> &[(String, HostValue)] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[derive(Debug, Clone)]
pub enum HostValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Rc<RefCell<Vec<HostValue>>>),
    Map(Rc<RefCell<HostMap>>),
    /// A callable slot on a host object; never serialized.
    Function(&'static str),
    Opaque(Json),
}

impl HostValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn list(items: Vec<HostValue>) -> Self {
        Self::List(Rc::new(RefCell::new(items)))
    }

    pub fn map(map: HostMap) -> Self {
        Self::Map(Rc::new(RefCell::new(map)))
    }

    /// Pointer identity of the shared container, if this value has one.
    pub fn identity(&self) -> Option<usize> {
        match self {
            Self::List(items) => Some(Rc::as_ptr(items) as usize),
            Self::Map(map) => Some(Rc::as_ptr(map) as usize),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<Rc<RefCell<HostMap>>> {
        match self {
            Self::Map(map) => Some(Rc::clone(map)),
            _ => None,
        }
    }

    /// Builds a host value from plain JSON; containers come out fresh
    /// (unshared), so the result is cycle-free by construction.
    pub fn from_json(value: &Json) -> Self {
        match value {
            Json::Null => Self::Null,
            Json::Bool(flag) => Self::Bool(*flag),
            Json::Number(number) => number.as_f64().map(Self::Number).unwrap_or(Self::Null),
            Json::String(text) => Self::Text(text.clone()),
            Json::Array(items) => Self::list(items.iter().map(Self::from_json).collect()),
            Json::Object(entries) => {
                let mut map = HostMap::new();
                for (key, item) in entries {
                    map.insert(key.clone(), Self::from_json(item));
                }
                Self::map(map)
            }
        }
    }

    /// Empties every reachable shared container.
    ///
    /// Reflected cell graphs alias each other through strong `Rc` links
    /// (child → parent → children), so they must be dissolved once the
    /// serialized form has been taken, or each reflection leaks.
    pub fn release(&self) {
        let mut seen = HashSet::new();
        release_walk(self, &mut seen);
    }
}

fn release_walk(value: &HostValue, seen: &mut HashSet<usize>) {
    match value {
        HostValue::List(items) => {
            if !seen.insert(Rc::as_ptr(items) as usize) {
                return;
            }
            let drained = std::mem::take(&mut *items.borrow_mut());
            for item in &drained {
                release_walk(item, seen);
            }
        }
        HostValue::Map(map) => {
            if !seen.insert(Rc::as_ptr(map) as usize) {
                return;
            }
            let drained = std::mem::take(&mut *map.borrow_mut());
            for (_, item) in drained.entries() {
                release_walk(item, seen);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::{HostMap, HostValue};
    use serde_json::json;
    use std::rc::Rc;

    #[test]
    fn map_insert_replaces_in_place() {
        let mut map = HostMap::new();
        map.insert("a", HostValue::Number(1.0));
        map.insert("b", HostValue::Number(2.0));
        map.insert("a", HostValue::Number(3.0));

        let keys: Vec<&str> = map.entries().iter().map(|(key, _)| key.as_str()).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert!(matches!(map.get("a"), Some(HostValue::Number(n)) if *n == 3.0));
    }

    #[test]
    fn identity_tracks_shared_containers() {
        let list = HostValue::list(vec![HostValue::Null]);
        let alias = list.clone();
        assert_eq!(list.identity(), alias.identity());

        let other = HostValue::list(vec![HostValue::Null]);
        assert_ne!(list.identity(), other.identity());

        assert_eq!(HostValue::Number(1.0).identity(), None);
    }

    #[test]
    fn from_json_round_trips_scalars() {
        let value = HostValue::from_json(&json!({"a": [1, true, "x", null]}));
        let map = value.as_map().expect("map");
        let map = map.borrow();
        assert!(matches!(map.get("a"), Some(HostValue::List(_))));
    }

    #[test]
    fn release_breaks_reference_cycles() {
        let inner = Rc::new(std::cell::RefCell::new(HostMap::new()));
        inner.borrow_mut().insert("self", HostValue::Map(Rc::clone(&inner)));
        let value = HostValue::Map(Rc::clone(&inner));

        value.release();

        assert!(inner.borrow().entries().is_empty());
        drop(value);
        assert_eq!(Rc::strong_count(&inner), 1);
    }
}
