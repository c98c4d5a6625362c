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

//! Simulated runtime values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a [`HeapObject`](crate::types::HeapObject) within one trace.
///
/// Ids are allocated by the tracer, start at 1, strictly increase in creation
/// order, and are never reused within a trace. They are only meaningful inside
/// the trace that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A simulated value bound to a variable or an object property.
///
/// The tracer never evaluates expressions, so a value is either the literal
/// text of a recognized scalar, the verbatim text of an expression it did not
/// attempt to classify, or a reference to a heap object by id.
///
/// Values are immutable once constructed; aliasing is modeled by cloning
/// (a cloned `Reference` still points at the same object id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "value")]
pub enum Value {
    /// A recognized scalar literal kept as text: a number, a boolean, or the
    /// grammar's null literal.
    Primitive(String),
    /// An opaque right-hand side kept verbatim: arithmetic, method-call
    /// results, and anything else the tracer does not classify.
    Unparsed(String),
    /// A reference to a heap object allocated earlier in the same trace.
    Reference(ObjectId),
}

impl Value {
    /// Returns whether this value points at a heap object.
    pub fn is_reference(&self) -> bool {
        matches!(self, Self::Reference(_))
    }

    /// Returns the referenced object id, if any.
    pub fn reference(&self) -> Option<ObjectId> {
        match self {
            Self::Reference(id) => Some(*id),
            _ => None,
        }
    }

    /// Returns the carried text for primitive and unparsed values.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Primitive(text) | Self::Unparsed(text) => Some(text),
            Self::Reference(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(text) | Self::Unparsed(text) => write!(f, "{text}"),
            Self::Reference(id) => write!(f, "ref {id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_accessors() {
        let value = Value::Reference(ObjectId(7));
        assert!(value.is_reference());
        assert_eq!(value.reference(), Some(ObjectId(7)));
        assert_eq!(value.text(), None);
        assert_eq!(value.to_string(), "ref 7");
    }

    #[test]
    fn test_primitive_accessors() {
        let value = Value::Primitive("42".to_string());
        assert!(!value.is_reference());
        assert_eq!(value.reference(), None);
        assert_eq!(value.text(), Some("42"));
        assert_eq!(value.to_string(), "42");
    }

    #[test]
    fn test_alias_by_clone_shares_object_id() {
        let original = Value::Reference(ObjectId(3));
        let alias = original.clone();
        assert_eq!(original, alias);
        assert_eq!(alias.reference(), Some(ObjectId(3)));
    }
}
