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

//! Pass 1: callable discovery.
//!
//! A single linear scan over the source locates definition heads and records
//! each callable's starting line (and, for the indentation grammar, the
//! indentation width of its defining line). Zero matches is not an error: an
//! empty table simply means every call downstream is treated as unknown.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::grammar::{indent_width, Grammar};

/// Where a callable's definition starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionEntry {
    /// 1-based line of the definition head
    pub start_line: usize,
    /// Indentation width of the defining line (indentation grammar only)
    pub indent: Option<usize>,
}

/// Mapping from callable name to its definition entry.
///
/// Built once per trace by [`FunctionTable::build`] and read-only
/// thereafter. If the same name is defined twice, the later definition wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FunctionTable {
    entries: IndexMap<String, FunctionEntry>,
}

impl FunctionTable {
    /// Scan the source once and collect every definition head the grammar
    /// recognizes. Comment and blank lines are skipped.
    pub fn build(source: &str, grammar: &Grammar) -> Self {
        let mut entries = IndexMap::new();

        for (index, raw) in source.split('\n').enumerate() {
            let trimmed = raw.trim();
            if trimmed.is_empty() || grammar.is_comment(trimmed) {
                continue;
            }

            if let Some(name) = grammar.definition_name(trimmed) {
                let indent =
                    if grammar.has_block_delimiters() { None } else { Some(indent_width(raw)) };
                let entry = FunctionEntry { start_line: index + 1, indent };
                debug!(name, line = entry.start_line, "discovered callable definition");
                entries.insert(name, entry);
            }
        }

        Self { entries }
    }

    /// Look up a callable by name.
    pub fn get(&self, name: &str) -> Option<&FunctionEntry> {
        self.entries.get(name)
    }

    /// Whether no callables were discovered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of discovered callables.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterate over discovered callables in source order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FunctionEntry)> {
        self.entries.iter()
    }
}
