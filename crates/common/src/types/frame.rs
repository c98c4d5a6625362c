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

//! Simulated call frames.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::types::Value;

/// A simulated call activation.
///
/// Carries the owning function or method name (or the grammar's top-level
/// sentinel, e.g. `main` or `global`), the source line currently associated
/// with the activation, and the variables known in it, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    /// Function or method identifier, or the top-level sentinel name
    pub name: String,
    /// The line currently executing inside this frame
    pub line_number: usize,
    /// Variable bindings in insertion order
    pub variables: IndexMap<String, Value>,
}

impl Frame {
    /// Create a new frame with no variables.
    pub fn new(name: impl Into<String>, line_number: usize) -> Self {
        Self { name: name.into(), line_number, variables: IndexMap::new() }
    }

    /// Bind a variable, preserving insertion order. Rebinding an existing
    /// name updates it in place without changing its position.
    pub fn add_variable(&mut self, name: impl Into<String>, value: Value) {
        self.variables.insert(name.into(), value);
    }

    /// Look up a variable by name.
    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }
}
