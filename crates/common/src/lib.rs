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

//! CodeViz Common - Shared functionality for CodeViz components
//!
//! This crate provides the data model shared by the tracer engine and the
//! rendering/playback layer: simulated values, heap objects, call frames,
//! and per-line execution snapshots.

/// Common types used throughout the CodeViz ecosystem including values, frames, heap objects, and execution snapshots
pub mod types;

/// Logging setup and utilities for consistent logging across CodeViz components
pub mod logging;

pub use types::*;
