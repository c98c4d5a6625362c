//! Command modules for the CodeViz CLI

use std::path::Path;

use eyre::{bail, Result};

use codeviz_tracer::GrammarId;

pub mod play;
pub mod trace;

pub use play::play_trace;
pub use trace::trace_to_json;

/// Resolve the surface grammar: an explicit `--grammar` value wins, otherwise
/// the file extension decides (`.java` is brace-delimited, `.py` is
/// indentation-delimited).
pub fn resolve_grammar(file: &Path, grammar: Option<&str>) -> Result<GrammarId> {
    if let Some(name) = grammar {
        return Ok(name.parse::<GrammarId>()?);
    }

    match file.extension().and_then(|ext| ext.to_str()) {
        Some("java") => Ok(GrammarId::Brace),
        Some("py") => Ok(GrammarId::Indent),
        _ => bail!(
            "cannot infer a grammar from '{}'; pass --grammar brace or --grammar indent",
            file.display()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_resolve_grammar_from_extension() {
        assert_eq!(resolve_grammar(&PathBuf::from("Demo.java"), None).unwrap(), GrammarId::Brace);
        assert_eq!(resolve_grammar(&PathBuf::from("demo.py"), None).unwrap(), GrammarId::Indent);
        assert!(resolve_grammar(&PathBuf::from("demo.txt"), None).is_err());
    }

    #[test]
    fn test_explicit_grammar_wins() {
        let resolved = resolve_grammar(&PathBuf::from("demo.py"), Some("java")).unwrap();
        assert_eq!(resolved, GrammarId::Brace);
    }

    #[test]
    fn test_unknown_explicit_grammar_fails() {
        assert!(resolve_grammar(&PathBuf::from("demo.py"), Some("COBOL")).is_err());
    }
}
