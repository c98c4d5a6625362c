// CodeViz - Heuristic Execution Tracer
// Copyright (C) 2024 Zhuo Zhang and Wuqi Zhang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Simulated heap allocations.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::types::{ObjectId, Value};

/// A simulated heap allocation.
///
/// A heap object is created exactly once, at the step whose assignment
/// right-hand side is classified as an allocation, and is never deleted:
/// once allocated it stays visible in every later snapshot of the same trace
/// so the playback layer can show historical allocations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeapObject {
    /// Trace-scoped identity of this object
    pub id: ObjectId,
    /// Type label: a constructed type name, or a structural label such as
    /// "Array", "list", or "dict"
    pub type_name: String,
    /// Properties in insertion order; sequence elements use synthetic index
    /// keys like `[0]`
    pub properties: IndexMap<String, Value>,
}

impl HeapObject {
    /// Create a new heap object with no properties.
    pub fn new(id: ObjectId, type_name: impl Into<String>) -> Self {
        Self { id, type_name: type_name.into(), properties: IndexMap::new() }
    }

    /// Add a property, preserving insertion order.
    pub fn add_property(&mut self, name: impl Into<String>, value: Value) {
        self.properties.insert(name.into(), value);
    }

    /// Look up a property by name.
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_properties_preserve_insertion_order() {
        let mut obj = HeapObject::new(ObjectId(1), "Array");
        obj.add_property("[0]", Value::Primitive("1".to_string()));
        obj.add_property("[1]", Value::Primitive("2".to_string()));
        obj.add_property("[2]", Value::Primitive("3".to_string()));

        let keys: Vec<_> = obj.properties.keys().cloned().collect();
        assert_eq!(keys, vec!["[0]", "[1]", "[2]"]);
        assert_eq!(obj.property("[1]"), Some(&Value::Primitive("2".to_string())));
    }
}
