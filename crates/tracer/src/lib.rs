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

//! CodeViz Tracer - Heuristic step-by-step execution approximation.
//!
//! This crate approximates, without actually executing it, the runtime
//! behavior of short source programs: given raw source text and a surface
//! grammar, it produces an ordered sequence of execution snapshots (line
//! pointer, active call frames, heap objects, variable bindings, textual
//! output) suitable for step-by-step playback.
//!
//! It is a heuristic tracer, not an interpreter: it never evaluates
//! expressions, performs no type checking, and has no semantic model of the
//! target grammar beyond line-level pattern matching. Unparsable constructs
//! are ignored rather than rejected.
//!
//! # Workflow Overview
//!
//! 1. **Pass 1**: [`FunctionTable::build`] scans the source once to locate
//!    callable definitions and their starting lines
//! 2. **Pass 2**: [`Tracer::run`] walks the source line-by-line, classifies
//!    each line, mutates a running variable/heap model, and emits one
//!    [`ExecutionState`](codeviz_common::ExecutionState) per visited line
//!
//! Loop bodies are replayed a bounded number of times (5 by default) instead
//! of evaluating the loop's real exit condition, keeping the emitted trace
//! finite.
//!
//! # Example
//!
//! ```rust,ignore
//! use codeviz_tracer::{trace, GrammarId};
//!
//! let states = trace("int x = 5;\nint y = x;", GrammarId::Brace);
//! assert_eq!(states.len(), 2);
//! ```

pub mod error;
pub use error::*;

pub mod functions;
pub use functions::*;

pub mod generator;
pub use generator::*;

pub mod grammar;
pub use grammar::*;

use codeviz_common::ExecutionState;

/// Trace the given source text under the given grammar.
///
/// Convenience wrapper around [`Tracer`] with the default configuration.
/// Infallible: the grammar is already validated by type, and all malformed
/// input degrades gracefully to conservative classifications.
pub fn trace(source: &str, grammar: GrammarId) -> Vec<ExecutionState> {
    Tracer::new(grammar).run(source)
}

/// Trace the given source text under a grammar selected by name.
///
/// Accepts the surface names understood by [`GrammarId`] ("brace"/"java",
/// "indent"/"python", case-insensitive). Fails with
/// [`TraceError::UnsupportedGrammar`] for anything else, producing no
/// partial trace.
pub fn trace_named(source: &str, grammar: &str) -> Result<Vec<ExecutionState>, TraceError> {
    let id: GrammarId = grammar.parse()?;
    Ok(trace(source, id))
}
