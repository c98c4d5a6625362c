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

//! Pass 2: the stepwise state generator.
//!
//! A single forward scan over source lines with one backward jump rule
//! (bounded loop replay) and a per-grammar exit-of-scope rule. Each visited
//! line is classified heuristically (declaration, assignment, call, loop
//! head, object construction) and yields one snapshot. Nothing is evaluated;
//! anything unrecognized falls through to the most conservative
//! classification instead of failing.

use indexmap::IndexMap;
use tracing::{debug, trace};

use codeviz_common::{
    ExecutionState, Frame, HeapObject, ObjectId, Value, INPUT_REQUIRED_MARKER,
};

use crate::{
    functions::FunctionTable,
    grammar::{indent_width, Grammar, GrammarId},
};

/// Configuration for the tracer engine.
#[derive(Debug, Clone)]
pub struct TracerConfig {
    /// Ceiling on replayed loop iterations. Keeps the emitted trace finite
    /// in the presence of condition-blind loop detection; not a correctness
    /// mechanism.
    pub max_loop_iterations: usize,
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self { max_loop_iterations: 5 }
    }
}

/// Loop-tracking state carried across the scan. Only the outermost loop is
/// tracked at a time.
#[derive(Debug, Clone, Copy)]
struct LoopTracking {
    /// Line of the loop head; the rewind target
    start_line: usize,
    /// Indentation width of the loop head (indentation grammar boundary)
    indent: usize,
    /// Completed replay passes so far
    iterations: usize,
}

/// The per-invocation tracing engine.
///
/// Owns everything that must be scoped to one trace, most importantly the
/// heap object id counter: ids start at 1 and strictly increase within the
/// trace, and two traces never share a counter.
#[derive(Debug)]
pub struct Tracer {
    grammar: &'static Grammar,
    config: TracerConfig,
    next_object_id: u64,
}

impl Tracer {
    /// Create a tracer for the given grammar with the default configuration.
    pub fn new(grammar: GrammarId) -> Self {
        Self::with_config(grammar, TracerConfig::default())
    }

    /// Create a tracer with an explicit configuration.
    pub fn with_config(grammar: GrammarId, config: TracerConfig) -> Self {
        Self { grammar: Grammar::for_id(grammar), config, next_object_id: 1 }
    }

    fn allocate_id(&mut self) -> ObjectId {
        let id = ObjectId(self.next_object_id);
        self.next_object_id += 1;
        id
    }

    /// Walk the source and emit one snapshot per visited line.
    ///
    /// The scan terminates when the cursor passes the last line. If no line
    /// produced a snapshot (e.g. the whole input was comments), a single
    /// placeholder snapshot at line 1 is emitted so callers never receive an
    /// empty trace.
    pub fn run(&mut self, source: &str) -> Vec<ExecutionState> {
        let lines: Vec<&str> = source.split('\n').collect();
        let table = FunctionTable::build(source, self.grammar);
        debug!(
            grammar = %self.grammar.id(),
            lines = lines.len(),
            callables = table.len(),
            "starting stepwise scan"
        );

        let mut states: Vec<ExecutionState> = Vec::new();
        let mut variables: IndexMap<String, Value> = IndexMap::new();
        let mut heap: Vec<HeapObject> = Vec::new();
        let mut current_function = self.grammar.top_level_name().to_string();
        let mut current_indent = 0usize;
        let mut loop_state: Option<LoopTracking> = None;

        // 1-based cursor, incremented before each visit so a rewind to the
        // loop start line resumes at the first body line.
        let mut cursor = 0usize;

        while cursor < lines.len() {
            cursor += 1;

            let raw = lines[cursor - 1];
            let trimmed = raw.trim();

            // Blank and comment lines produce no snapshot.
            if trimmed.is_empty() || self.grammar.is_comment(trimmed) {
                continue;
            }

            // Delimiter-only lines produce no snapshot either, but a closing
            // delimiter still ends a tracked loop.
            if self.grammar.is_delimiter_only(trimmed) {
                if self.grammar.is_block_close(trimmed) {
                    if let Some(tracking) = loop_state {
                        let iterations = tracking.iterations + 1;
                        if iterations < self.config.max_loop_iterations {
                            trace!(
                                line = cursor,
                                target = tracking.start_line,
                                pass = iterations,
                                "replaying loop body"
                            );
                            cursor = tracking.start_line;
                            loop_state = Some(LoopTracking { iterations, ..tracking });
                        } else {
                            loop_state = None;
                        }
                    }
                }
                continue;
            }

            let indent = indent_width(raw);

            // Function exit by dedent: back to top level, locals discarded.
            if !self.grammar.has_block_delimiters()
                && indent < current_indent
                && current_function != self.grammar.top_level_name()
            {
                trace!(line = cursor, function = %current_function, "function exit by dedent");
                current_function = self.grammar.top_level_name().to_string();
                current_indent = 0;
                variables.clear();
            }

            let mut state = ExecutionState::new(cursor);
            state.code = source.to_string();
            let mut frame = Frame::new(current_function.clone(), cursor);

            if self.grammar.is_substantive(trimmed) {
                state.append_output(&format!("Line {cursor}: {trimmed}\n"));
            }

            if self.grammar.wants_input(trimmed) {
                state.append_output(&format!("{INPUT_REQUIRED_MARKER} {trimmed}\n"));
            }

            // Entering a definition head promotes the current callable and
            // gives it a fresh variable table (indentation grammar models
            // "locals are fresh per function"; the brace grammar keeps one
            // flat table for the whole trace).
            if !self.grammar.has_block_delimiters() {
                if let Some(name) = self.grammar.definition_name(trimmed) {
                    trace!(line = cursor, function = %name, "entering definition");
                    current_function = name;
                    current_indent = indent;
                    variables.clear();
                }
            }

            // Call detection: an additive frame for this snapshot only.
            let call_frame = if self.grammar.is_call_candidate(trimmed) {
                self.grammar.call_name(trimmed).and_then(|name| {
                    table.get(&name).map(|entry| Frame::new(name, entry.start_line))
                })
            } else {
                None
            };

            if is_assignment_line(trimmed) {
                if let Some((name, value)) =
                    self.process_assignment(trimmed, &variables, &mut heap)
                {
                    frame.add_variable(name.clone(), value.clone());
                    variables.insert(name, value);
                }
            }

            if self.grammar.is_loop_head(trimmed) && loop_state.is_none() {
                loop_state =
                    Some(LoopTracking { start_line: cursor, indent, iterations: 0 });
            }

            // Loop end by dedent: replay the body until the ceiling.
            let mut rewind_target = None;
            if !self.grammar.has_block_delimiters() {
                if let Some(tracking) = loop_state {
                    if indent <= tracking.indent && cursor > tracking.start_line {
                        let iterations = tracking.iterations + 1;
                        if iterations < self.config.max_loop_iterations {
                            rewind_target = Some(tracking.start_line);
                            loop_state = Some(LoopTracking { iterations, ..tracking });
                        } else {
                            loop_state = None;
                        }
                    }
                }
            }

            // Every binding known so far joins the frame, so each snapshot
            // is a complete picture, not just the line's own effects.
            for (name, value) in &variables {
                if frame.variable(name).is_none() {
                    frame.add_variable(name.clone(), value.clone());
                }
            }

            state.add_frame(frame);
            if let Some(call_frame) = call_frame {
                state.add_frame(call_frame);
            }
            state.heap_objects = heap.clone();
            states.push(state);

            if let Some(target) = rewind_target {
                trace!(line = cursor, target, "replaying loop body");
                cursor = target;
            }
        }

        if states.is_empty() {
            debug!("no lines produced a snapshot, emitting placeholder state");
            let mut state = ExecutionState::new(1);
            state.code = source.to_string();
            state.add_frame(Frame::new(self.grammar.top_level_name(), 1));
            states.push(state);
        }

        debug!(states = states.len(), objects = heap.len(), "scan finished");
        states
    }

    /// Split an assignment line and classify its right-hand side.
    ///
    /// Returns the bound variable name and value, or `None` when the line
    /// does not parse as an assignment after all; that outcome is silently
    /// treated as "the line does not assign".
    fn process_assignment(
        &mut self,
        trimmed: &str,
        variables: &IndexMap<String, Value>,
        heap: &mut Vec<HeapObject>,
    ) -> Option<(String, Value)> {
        let (lhs, rhs) = trimmed.split_once('=')?;
        let name = self.grammar.variable_name(lhs.trim())?;
        let rhs = self.grammar.strip_terminator(rhs.trim());

        let value = self.classify_rhs(rhs, variables, heap);
        Some((name, value))
    }

    /// Classify a right-hand side, first match wins: null literal,
    /// numeric/boolean literal, allocation idiom, bracket-literal sequence,
    /// alias of an existing variable, verbatim fallback.
    fn classify_rhs(
        &mut self,
        rhs: &str,
        variables: &IndexMap<String, Value>,
        heap: &mut Vec<HeapObject>,
    ) -> Value {
        if rhs == self.grammar.null_literal() {
            return Value::Primitive(rhs.to_string());
        }

        if self.grammar.is_numeric_literal(rhs) || self.grammar.is_boolean_literal(rhs) {
            return Value::Primitive(rhs.to_string());
        }

        if let Some(keyword) = self.grammar.allocation_keyword() {
            if rhs.contains(keyword) {
                return self.allocate_constructed(rhs, heap);
            }
        }

        if let Some(rule) = self.grammar.sequence_literal() {
            if let Some(elements) = rule.contents(rhs) {
                return self.allocate_sequence(elements, rule.type_name, variables, heap);
            }
        }

        if let Some(rule) = self.grammar.map_literal() {
            if rule.contents(rhs).is_some() {
                let id = self.allocate_id();
                debug!(id = %id, type_name = rule.type_name, "allocated heap object");
                heap.push(HeapObject::new(id, rule.type_name));
                return Value::Reference(id);
            }
        }

        // Alias semantics: both names now denote the same value; a copied
        // Reference still points at the same object id.
        if let Some(existing) = variables.get(rhs) {
            return existing.clone();
        }

        Value::Unparsed(rhs.to_string())
    }

    /// Allocate from the grammar's "construct new instance" idiom.
    fn allocate_constructed(&mut self, rhs: &str, heap: &mut Vec<HeapObject>) -> Value {
        let id = self.allocate_id();

        let object = if rhs.contains('[') && rhs.contains(']') {
            // Array shape retypes the object as a sequence container.
            let mut object = HeapObject::new(id, "Array");
            if let Some(elements) = self.grammar.element_list(rhs) {
                for (index, element) in non_empty_elements(elements).enumerate() {
                    let value = if self.is_literal(element) {
                        Value::Primitive(element.to_string())
                    } else {
                        Value::Unparsed(element.to_string())
                    };
                    object.add_property(format!("[{index}]"), value);
                }
            }
            object
        } else {
            let type_name =
                self.grammar.allocation_type(rhs).unwrap_or_else(|| "Object".to_string());
            HeapObject::new(id, type_name)
        };

        debug!(id = %object.id, type_name = %object.type_name, "allocated heap object");
        heap.push(object);
        Value::Reference(id)
    }

    /// Allocate from a bare bracket-delimited sequence literal, resolving
    /// elements against the running variable table.
    fn allocate_sequence(
        &mut self,
        elements: &str,
        type_name: &str,
        variables: &IndexMap<String, Value>,
        heap: &mut Vec<HeapObject>,
    ) -> Value {
        let id = self.allocate_id();
        let mut object = HeapObject::new(id, type_name);

        for (index, element) in non_empty_elements(elements).enumerate() {
            let value = if self.is_literal(element) {
                Value::Primitive(element.to_string())
            } else if let Some(existing) = variables.get(element) {
                existing.clone()
            } else {
                Value::Unparsed(element.to_string())
            };
            object.add_property(format!("[{index}]"), value);
        }

        debug!(id = %object.id, type_name = %object.type_name, "allocated heap object");
        heap.push(object);
        Value::Reference(id)
    }

    /// Whether the text is a literal under the grammar: numeric, boolean,
    /// or the null literal.
    fn is_literal(&self, text: &str) -> bool {
        text == self.grammar.null_literal()
            || self.grammar.is_numeric_literal(text)
            || self.grammar.is_boolean_literal(text)
    }
}

/// An assignment line carries an `=` that is no part of a comparison
/// operator anywhere on the line.
fn is_assignment_line(trimmed: &str) -> bool {
    trimmed.contains('=')
        && !trimmed.contains("==")
        && !trimmed.contains(">=")
        && !trimmed.contains("<=")
        && !trimmed.contains("!=")
}

/// Comma-split an element list, skipping empty entries.
fn non_empty_elements(elements: &str) -> impl Iterator<Item = &str> {
    elements.split(',').map(str::trim).filter(|element| !element.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignment_line_detection() {
        assert!(is_assignment_line("int x = 5;"));
        assert!(is_assignment_line("x = y"));
        assert!(!is_assignment_line("if (x == 5) {"));
        assert!(!is_assignment_line("while (x >= 0) {"));
        assert!(!is_assignment_line("x != y"));
        assert!(!is_assignment_line("print(x)"));
    }

    #[test]
    fn test_non_empty_elements() {
        let elements: Vec<_> = non_empty_elements("1, 2 ,3").collect();
        assert_eq!(elements, vec!["1", "2", "3"]);
        assert_eq!(non_empty_elements("").count(), 0);
        assert_eq!(non_empty_elements("  ").count(), 0);
    }
}
