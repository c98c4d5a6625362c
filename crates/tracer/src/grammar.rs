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

//! Surface grammar variants and their lexical capability tables.
//!
//! Both supported grammars expose the same capability set to the two passes:
//! how definitions are recognized, how calls look, how comments and blocks
//! are delimited, which literal spellings exist, and what the interactive
//! input idiom is. The generator algorithm itself is grammar-agnostic;
//! adding a third surface grammar means supplying another table here.

use std::{fmt, str::FromStr, sync::OnceLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::TraceError;

/// Selector for one of the supported surface grammars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GrammarId {
    /// Brace-delimited blocks, `;`-terminated statements (Java-like)
    Brace,
    /// Indentation-delimited blocks, no statement terminator (Python-like)
    Indent,
}

impl fmt::Display for GrammarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Brace => write!(f, "brace"),
            Self::Indent => write!(f, "indent"),
        }
    }
}

impl FromStr for GrammarId {
    type Err = TraceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "brace" | "java" => Ok(Self::Brace),
            "indent" | "python" | "py" => Ok(Self::Indent),
            _ => Err(TraceError::UnsupportedGrammar(s.to_string())),
        }
    }
}

/// Compiled pattern set for one grammar.
struct GrammarPatterns {
    /// Definition head: captures the callable name
    definition: Regex,
    /// Parenthesized invocation: captures the invoked name
    call: Regex,
    /// Bare integer or bare decimal
    number: Regex,
    /// Allocation idiom: captures the constructed type name (brace only)
    allocation_type: Option<Regex>,
    /// Brace-delimited element list inside an allocation (brace only)
    element_list: Option<Regex>,
}

impl fmt::Debug for GrammarPatterns {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GrammarPatterns")
            .field("definition", &"<regex>")
            .field("call", &"<regex>")
            .field("number", &"<regex>")
            .field("allocation_type", &self.allocation_type.as_ref().map(|_| "<regex>"))
            .field("element_list", &self.element_list.as_ref().map(|_| "<regex>"))
            .finish()
    }
}

/// Lexical capability table for one surface grammar.
///
/// Obtained via [`Grammar::for_id`]; the two instances are built once and
/// shared for the process lifetime.
#[derive(Debug)]
pub struct Grammar {
    id: GrammarId,
    /// Sentinel frame name for code outside any recognized callable
    top_level_name: &'static str,
    /// Prefixes that mark a whole line as a comment
    comment_prefixes: &'static [&'static str],
    /// Statement terminator, if the grammar has one
    statement_terminator: Option<char>,
    /// Whether blocks are `{}`-delimited (false means indentation-delimited)
    has_block_delimiters: bool,
    /// Keyword prefixes that make a line "substantive" for output echoing
    echo_keywords: &'static [&'static str],
    /// Line prefixes excluded from call detection (control-flow heads)
    call_excluded_prefixes: &'static [&'static str],
    /// Line prefixes that start a loop construct
    loop_prefixes: &'static [&'static str],
    /// Substrings that mark a line as referencing the console-read idiom
    input_markers: &'static [&'static str],
    /// The grammar's null literal spelling
    null_literal: &'static str,
    /// The grammar's boolean literal spellings
    boolean_literals: [&'static str; 2],
    /// The "construct new instance" keyword, if the grammar has one
    allocation_keyword: Option<&'static str>,
    /// Bracket-delimited ordered-sequence literal shape, if the grammar has one
    sequence_literal: Option<LiteralRule>,
    /// Bracket-delimited associative-collection literal shape, if the grammar has one
    map_literal: Option<LiteralRule>,
    patterns: &'static GrammarPatterns,
}

/// Shape of a bracket-delimited collection literal: its delimiters and the
/// structural type label of the heap object it allocates.
#[derive(Debug, Clone, Copy)]
pub struct LiteralRule {
    /// Opening delimiter
    pub open: char,
    /// Closing delimiter
    pub close: char,
    /// Structural type label for the allocated object
    pub type_name: &'static str,
}

impl LiteralRule {
    /// Whether the right-hand side text has this literal's shape, and if so,
    /// the text between the delimiters.
    pub fn contents<'a>(&self, rhs: &'a str) -> Option<&'a str> {
        if rhs.len() >= 2 && rhs.starts_with(self.open) && rhs.ends_with(self.close) {
            Some(&rhs[self.open.len_utf8()..rhs.len() - self.close.len_utf8()])
        } else {
            None
        }
    }
}

impl Grammar {
    /// Returns the capability table for the given grammar.
    pub fn for_id(id: GrammarId) -> &'static Self {
        match id {
            GrammarId::Brace => brace_grammar(),
            GrammarId::Indent => indent_grammar(),
        }
    }

    /// The grammar selector this table belongs to.
    pub fn id(&self) -> GrammarId {
        self.id
    }

    /// Sentinel frame name for top-level code (`main` or `global`).
    pub fn top_level_name(&self) -> &'static str {
        self.top_level_name
    }

    /// Whether blocks are `{}`-delimited. Indentation-delimited grammars
    /// replace delimiter predicates with indentation-width comparisons.
    pub fn has_block_delimiters(&self) -> bool {
        self.has_block_delimiters
    }

    /// The grammar's statement terminator, if any.
    pub fn statement_terminator(&self) -> Option<char> {
        self.statement_terminator
    }

    /// Whether the trimmed line is a comment.
    pub fn is_comment(&self, trimmed: &str) -> bool {
        self.comment_prefixes.iter().any(|prefix| trimmed.starts_with(prefix))
    }

    /// Whether the trimmed line consists solely of a block delimiter.
    pub fn is_delimiter_only(&self, trimmed: &str) -> bool {
        self.has_block_delimiters && (trimmed == "{" || trimmed == "}")
    }

    /// Whether the trimmed line closes a block on its own.
    pub fn is_block_close(&self, trimmed: &str) -> bool {
        self.has_block_delimiters && trimmed == "}"
    }

    /// Extracts the callable name if the trimmed line is a definition head.
    ///
    /// For the brace grammar a definition head carries a visibility keyword
    /// and a parameter list on a line that is not itself a statement (no
    /// trailing terminator). For the indentation grammar it is a line
    /// beginning with the definition keyword.
    pub fn definition_name(&self, trimmed: &str) -> Option<String> {
        match self.id {
            GrammarId::Brace => {
                if trimmed.contains(';') || !trimmed.contains('(') || !trimmed.contains(')') {
                    return None;
                }
            }
            GrammarId::Indent => {
                if !trimmed.starts_with("def ") {
                    return None;
                }
            }
        }
        self.patterns.definition.captures(trimmed).map(|caps| caps[1].to_string())
    }

    /// Whether the trimmed line is a definition head.
    pub fn is_definition_head(&self, trimmed: &str) -> bool {
        self.definition_name(trimmed).is_some()
    }

    /// Whether the trimmed line may contain a function call worth resolving:
    /// a parenthesized invocation that is not a definition head, not an
    /// allocation, and not a control-flow head.
    pub fn is_call_candidate(&self, trimmed: &str) -> bool {
        if !trimmed.contains('(') {
            return false;
        }
        if self.has_block_delimiters && !trimmed.contains(')') {
            return false;
        }
        if let Some(keyword) = self.allocation_keyword {
            if trimmed.contains(keyword) {
                return false;
            }
        }
        if self.call_excluded_prefixes.iter().any(|prefix| trimmed.starts_with(prefix)) {
            return false;
        }
        !self.is_definition_head(trimmed)
    }

    /// Extracts the first invoked name from the trimmed line.
    pub fn call_name(&self, trimmed: &str) -> Option<String> {
        self.patterns.call.captures(trimmed).map(|caps| caps[1].to_string())
    }

    /// Whether the trimmed line starts a loop construct.
    pub fn is_loop_head(&self, trimmed: &str) -> bool {
        self.loop_prefixes.iter().any(|prefix| trimmed.starts_with(prefix))
    }

    /// Whether the trimmed line is substantive enough to echo into the
    /// snapshot output: it contains a block delimiter or statement
    /// terminator, or starts with a recognized control/definition/return
    /// keyword. Filters pure continuation or explanatory lines out of the
    /// visible trace.
    pub fn is_substantive(&self, trimmed: &str) -> bool {
        if self.has_block_delimiters
            && (trimmed.contains('{') || trimmed.contains('}') || trimmed.contains(';'))
        {
            return true;
        }
        self.echo_keywords.iter().any(|prefix| trimmed.starts_with(prefix))
    }

    /// Whether the trimmed line references the grammar's interactive-input
    /// idiom (a console-read call). Advisory only.
    pub fn wants_input(&self, trimmed: &str) -> bool {
        self.input_markers.iter().any(|marker| trimmed.contains(marker))
    }

    /// Whether the text is a bare integer or bare decimal literal.
    pub fn is_numeric_literal(&self, text: &str) -> bool {
        self.patterns.number.is_match(text)
    }

    /// Whether the text is one of the grammar's boolean literal spellings.
    pub fn is_boolean_literal(&self, text: &str) -> bool {
        self.boolean_literals.contains(&text)
    }

    /// The grammar's null literal spelling.
    pub fn null_literal(&self) -> &'static str {
        self.null_literal
    }

    /// The grammar's allocation keyword, if any.
    pub fn allocation_keyword(&self) -> Option<&'static str> {
        self.allocation_keyword
    }

    /// The grammar's ordered-sequence literal shape, if any.
    pub fn sequence_literal(&self) -> Option<LiteralRule> {
        self.sequence_literal
    }

    /// The grammar's associative-collection literal shape, if any.
    pub fn map_literal(&self) -> Option<LiteralRule> {
        self.map_literal
    }

    /// Extracts the constructed type name from an allocation right-hand side.
    pub fn allocation_type(&self, rhs: &str) -> Option<String> {
        let pattern = self.patterns.allocation_type.as_ref()?;
        pattern.captures(rhs).map(|caps| caps[1].to_string())
    }

    /// Extracts the `{...}` element list from an allocation right-hand side.
    pub fn element_list<'a>(&self, rhs: &'a str) -> Option<&'a str> {
        let pattern = self.patterns.element_list.as_ref()?;
        pattern.captures(rhs).and_then(|caps| caps.get(1)).map(|group| group.as_str())
    }

    /// Derives the assigned variable name from the left-hand side of an
    /// assignment, stripping any type/declaration prefix.
    pub fn variable_name(&self, lhs: &str) -> Option<String> {
        let name = match self.id {
            // the token after the last space: `int x` -> `x`
            GrammarId::Brace => lhs.rsplit(' ').next().unwrap_or(lhs),
            GrammarId::Indent => lhs,
        };
        if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        }
    }

    /// Strips a trailing statement terminator from a right-hand side.
    pub fn strip_terminator<'a>(&self, rhs: &'a str) -> &'a str {
        match self.statement_terminator {
            Some(term) => rhs.strip_suffix(term).map(str::trim).unwrap_or(rhs),
            None => rhs,
        }
    }
}

/// Leading-whitespace width of a raw (untrimmed) line.
pub fn indent_width(raw: &str) -> usize {
    raw.chars().take_while(|c| c.is_whitespace()).count()
}

fn brace_grammar() -> &'static Grammar {
    static GRAMMAR: OnceLock<Grammar> = OnceLock::new();
    static PATTERNS: OnceLock<GrammarPatterns> = OnceLock::new();
    GRAMMAR.get_or_init(|| Grammar {
        id: GrammarId::Brace,
        top_level_name: "main",
        comment_prefixes: &["//", "/*", "*"],
        statement_terminator: Some(';'),
        has_block_delimiters: true,
        echo_keywords: &[
            "if", "for", "while", "class", "public", "private", "protected", "return",
        ],
        call_excluded_prefixes: &["if", "for", "while"],
        loop_prefixes: &["for", "while"],
        input_markers: &["Scanner", ".nextLine", ".next", ".nextInt", ".nextDouble", "System.in"],
        null_literal: "null",
        boolean_literals: ["true", "false"],
        allocation_keyword: Some("new "),
        sequence_literal: Some(LiteralRule { open: '{', close: '}', type_name: "Array" }),
        map_literal: None,
        patterns: PATTERNS.get_or_init(|| GrammarPatterns {
            definition: Regex::new(r"(?:public|private|protected)(?:\s+\w+)*\s+(\w+)\s*\(")
                .unwrap(),
            call: Regex::new(r"(\w+)\s*\(").unwrap(),
            number: Regex::new(r"^(\d+|\d+\.\d+)$").unwrap(),
            allocation_type: Some(Regex::new(r"new\s+(\w+)").unwrap()),
            element_list: Some(Regex::new(r"\{([^}]*)\}").unwrap()),
        }),
    })
}

fn indent_grammar() -> &'static Grammar {
    static GRAMMAR: OnceLock<Grammar> = OnceLock::new();
    static PATTERNS: OnceLock<GrammarPatterns> = OnceLock::new();
    GRAMMAR.get_or_init(|| Grammar {
        id: GrammarId::Indent,
        top_level_name: "global",
        comment_prefixes: &["#"],
        statement_terminator: None,
        has_block_delimiters: false,
        echo_keywords: &["def ", "if ", "elif ", "else", "for ", "while ", "return", "class "],
        call_excluded_prefixes: &["def ", "if ", "for ", "while "],
        loop_prefixes: &["for ", "while "],
        input_markers: &["input(", "raw_input("],
        null_literal: "None",
        boolean_literals: ["True", "False"],
        allocation_keyword: None,
        sequence_literal: Some(LiteralRule { open: '[', close: ']', type_name: "list" }),
        map_literal: Some(LiteralRule { open: '{', close: '}', type_name: "dict" }),
        patterns: PATTERNS.get_or_init(|| GrammarPatterns {
            definition: Regex::new(r"def\s+(\w+)\s*\(").unwrap(),
            call: Regex::new(r"(\w+)\s*\(").unwrap(),
            number: Regex::new(r"^(\d+|\d+\.\d+)$").unwrap(),
            allocation_type: None,
            element_list: None,
        }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grammar_id_from_str() {
        assert_eq!("brace".parse::<GrammarId>().unwrap(), GrammarId::Brace);
        assert_eq!("Java".parse::<GrammarId>().unwrap(), GrammarId::Brace);
        assert_eq!("indent".parse::<GrammarId>().unwrap(), GrammarId::Indent);
        assert_eq!("PYTHON".parse::<GrammarId>().unwrap(), GrammarId::Indent);
        assert_eq!(
            "COBOL".parse::<GrammarId>(),
            Err(TraceError::UnsupportedGrammar("COBOL".to_string()))
        );
    }

    #[test]
    fn test_brace_definition_head() {
        let grammar = Grammar::for_id(GrammarId::Brace);
        assert_eq!(grammar.definition_name("public int add(int a, int b) {"), Some("add".into()));
        assert_eq!(
            grammar.definition_name("public static void main(String[] args) {"),
            Some("main".into())
        );
        // statement, not a definition head
        assert_eq!(grammar.definition_name("private int x = compute();"), None);
        // declaration-only line without a body still has no terminator check
        assert_eq!(grammar.definition_name("int add(int a, int b)"), None);
    }

    #[test]
    fn test_indent_definition_head() {
        let grammar = Grammar::for_id(GrammarId::Indent);
        assert_eq!(grammar.definition_name("def greet(name):"), Some("greet".into()));
        assert_eq!(grammar.definition_name("defer()"), None);
        assert_eq!(grammar.definition_name("x = f()"), None);
    }

    #[test]
    fn test_call_candidate_exclusions() {
        let grammar = Grammar::for_id(GrammarId::Brace);
        assert!(grammar.is_call_candidate("greet(\"bob\");"));
        assert!(!grammar.is_call_candidate("if (x > 0) {"));
        assert!(!grammar.is_call_candidate("Foo f = new Foo();"));
        assert!(!grammar.is_call_candidate("public void greet(String name) {"));
    }

    #[test]
    fn test_literals_and_terminator() {
        let grammar = Grammar::for_id(GrammarId::Brace);
        assert!(grammar.is_numeric_literal("42"));
        assert!(grammar.is_numeric_literal("3.14"));
        assert!(!grammar.is_numeric_literal("x1"));
        assert!(grammar.is_boolean_literal("true"));
        assert_eq!(grammar.statement_terminator(), Some(';'));
        assert_eq!(grammar.strip_terminator("5;"), "5");
        assert_eq!(grammar.strip_terminator("5"), "5");

        let indent = Grammar::for_id(GrammarId::Indent);
        assert!(indent.is_boolean_literal("True"));
        assert!(!indent.is_boolean_literal("true"));
        assert_eq!(indent.statement_terminator(), None);
        assert_eq!(indent.strip_terminator("5"), "5");
    }

    #[test]
    fn test_variable_name_extraction() {
        let brace = Grammar::for_id(GrammarId::Brace);
        assert_eq!(brace.variable_name("int x"), Some("x".into()));
        assert_eq!(brace.variable_name("x"), Some("x".into()));
        assert_eq!(brace.variable_name(""), None);

        let indent = Grammar::for_id(GrammarId::Indent);
        assert_eq!(indent.variable_name("total"), Some("total".into()));
    }

    #[test]
    fn test_indent_width() {
        assert_eq!(indent_width("x = 1"), 0);
        assert_eq!(indent_width("    x = 1"), 4);
        assert_eq!(indent_width("\tx = 1"), 1);
    }
}
