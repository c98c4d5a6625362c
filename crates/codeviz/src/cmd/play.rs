//! Trace a source file and print a step-by-step textual playback.

use std::{fs, path::Path};

use eyre::Result;

use codeviz_common::ExecutionState;
use codeviz_tracer::{Tracer, TracerConfig};

use super::resolve_grammar;

/// Run a trace over `file` and print every snapshot in order: frames with
/// their variable bindings, heap objects with their properties, and the
/// step's output text.
pub fn play_trace(file: &Path, grammar: Option<&str>, config: TracerConfig) -> Result<()> {
    let grammar = resolve_grammar(file, grammar)?;
    let source = fs::read_to_string(file)?;

    let states = Tracer::with_config(grammar, config).run(&source);
    let total = states.len();

    for (index, state) in states.iter().enumerate() {
        print_state(index + 1, total, state);
    }

    Ok(())
}

fn print_state(step: usize, total: usize, state: &ExecutionState) {
    println!("=== Step {step}/{total} (line {}) ===", state.line_number);

    for frame in &state.frames {
        println!("  frame {} @ line {}", frame.name, frame.line_number);
        for (name, value) in &frame.variables {
            println!("    {name} = {value}");
        }
    }

    for object in &state.heap_objects {
        println!("  object #{} : {}", object.id, object.type_name);
        for (key, value) in &object.properties {
            println!("    {key} = {value}");
        }
    }

    if !state.output.is_empty() {
        for line in state.output.lines() {
            println!("  | {line}");
        }
    }

    if state.requires_input() {
        println!("  (this step would prompt for input)");
    }

    println!();
}
