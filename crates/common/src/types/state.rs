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

//! Per-line execution snapshots.

use serde::{Deserialize, Serialize};

use crate::types::{Frame, HeapObject};

/// Marker prefix the tracer writes into a snapshot's output when the visited
/// line references the grammar's interactive-input idiom. Advisory only: the
/// prompting collaborator decides whether and how to solicit input.
pub const INPUT_REQUIRED_MARKER: &str = "[Input required]";

/// One snapshot of the simulated program.
///
/// A snapshot is emitted per visited source line (a line revisited under
/// bounded loop replay produces a distinct snapshot per visit) and is never
/// mutated after being appended to the trace. The full source text is
/// repeated on every snapshot so playback can re-render without re-fetching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionState {
    /// 1-based source line this snapshot was taken at
    pub line_number: usize,
    /// The entire source text
    pub code: String,
    /// Active frames, outermost first
    pub frames: Vec<Frame>,
    /// Every heap object allocated at or before this step
    pub heap_objects: Vec<HeapObject>,
    /// Text produced or annotated at this step
    pub output: String,
}

impl ExecutionState {
    /// Create an empty snapshot at the given line.
    pub fn new(line_number: usize) -> Self {
        Self {
            line_number,
            code: String::new(),
            frames: Vec::new(),
            heap_objects: Vec::new(),
            output: String::new(),
        }
    }

    /// Append a frame. Frames are ordered outermost first.
    pub fn add_frame(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    /// Append text to this step's output.
    pub fn append_output(&mut self, text: &str) {
        self.output.push_str(text);
    }

    /// Whether this step's output carries the interactive-input marker.
    pub fn requires_input(&self) -> bool {
        self.output.lines().any(|line| line.starts_with(INPUT_REQUIRED_MARKER))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_input_marker() {
        let mut state = ExecutionState::new(4);
        assert!(!state.requires_input());

        state.append_output("Line 4: x = input()\n");
        assert!(!state.requires_input());

        state.append_output(&format!("{INPUT_REQUIRED_MARKER} x = input()\n"));
        assert!(state.requires_input());
    }

    #[test]
    fn test_serde_round_trip() {
        let mut state = ExecutionState::new(1);
        state.code = "int x = 5;".to_string();
        state.add_frame(Frame::new("main", 1));

        let json = serde_json::to_string(&state).unwrap();
        let back: ExecutionState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, back);
    }
}
