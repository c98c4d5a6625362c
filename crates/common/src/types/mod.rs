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

//! Core data model for simulated execution.
//!
//! These types form the read-only contract between the tracer engine and the
//! rendering/playback layer: the engine produces them, the renderer only ever
//! reads them.

mod frame;
mod heap;
mod state;
mod value;

pub use frame::Frame;
pub use heap::HeapObject;
pub use state::{ExecutionState, INPUT_REQUIRED_MARKER};
pub use value::{ObjectId, Value};
