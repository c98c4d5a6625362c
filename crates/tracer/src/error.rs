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

//! Tracer error types.
//!
//! The tracer is deliberately best-effort: unparsable constructs inside the
//! source never fail, they fall through to the most conservative
//! classification. The only rejected input is an unknown grammar selector.

use thiserror::Error;

/// Errors that can occur when starting a trace.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TraceError {
    /// The requested surface grammar is not supported
    #[error("unsupported grammar: {0}")]
    UnsupportedGrammar(String),
}
