//! Trace a source file and emit the snapshot list as JSON.

use std::{fs, path::Path};

use eyre::Result;
use tracing::debug;

use codeviz_tracer::{Tracer, TracerConfig};

use super::resolve_grammar;

/// Run a trace over `file` and print the resulting snapshots to stdout as
/// pretty JSON. The rendering/playback collaborator consumes this.
pub fn trace_to_json(file: &Path, grammar: Option<&str>, config: TracerConfig) -> Result<()> {
    let grammar = resolve_grammar(file, grammar)?;
    let source = fs::read_to_string(file)?;

    let states = Tracer::with_config(grammar, config).run(&source);
    debug!(states = states.len(), "trace complete");

    println!("{}", serde_json::to_string_pretty(&states)?);
    Ok(())
}
