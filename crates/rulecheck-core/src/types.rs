//! Core data types for rulecheck.
//!
//! Everything here is produced by the host front end (units, type and size
//! information, packages) or by a rule engine (findings). Rulecheck never
//! parses source code itself.

use crate::checker::CheckerContext;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};

/// Identifier of a syntax node, unique within its source unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Byte range of a node within its unit's source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }
}

/// A syntax node as exposed by the host front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Node identifier.
    pub id: NodeId,
    /// Syntactic kind (e.g. "call", "assign", "ident").
    pub kind: String,
    /// Location in the unit's source.
    #[serde(default)]
    pub span: Span,
    /// Source text covered by the node.
    #[serde(default)]
    pub text: String,
}

/// One parsed compilation unit (usually a file).
///
/// Nodes are kept in the order the front end produced them; rule engines
/// visit them in that order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceUnit {
    /// Path of the file this unit was parsed from.
    pub path: PathBuf,
    /// Name of the package the unit belongs to.
    #[serde(default)]
    pub package: String,
    /// Full source text (used to build the position index).
    #[serde(default)]
    pub source: String,
    /// Syntax nodes in front-end traversal order.
    #[serde(default)]
    pub nodes: Vec<Node>,
}

impl SourceUnit {
    /// Creates an empty unit.
    pub fn new(path: impl Into<PathBuf>, package: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            package: package.into(),
            ..Default::default()
        }
    }

    /// Sets the unit's source text.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Appends a node and returns its id (ids are assigned sequentially).
    pub fn push_node(&mut self, kind: impl Into<String>, span: Span, text: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            id,
            kind: kind.into(),
            span,
            text: text.into(),
        });
        id
    }

    /// Looks a node up by id.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

/// One (node, message) pair reported by a rule engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub node: NodeId,
    pub span: Span,
    pub message: String,
}

impl Finding {
    /// Creates a finding attached to `node`.
    pub fn new(node: &Node, message: impl Into<String>) -> Self {
        Self {
            node: node.id,
            span: node.span,
            message: message.into(),
        }
    }
}

/// Symbol table of the package a unit belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInfo {
    /// Import path of the package.
    #[serde(default)]
    pub path: String,
    /// Package name.
    #[serde(default)]
    pub name: String,
    /// Names declared at package scope.
    #[serde(default)]
    pub symbols: BTreeSet<String>,
    /// Packages imported by the package.
    #[serde(default)]
    pub imports: BTreeSet<String>,
}

/// Per-node type information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeInfo {
    types: BTreeMap<NodeId, String>,
}

impl TypeInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the type of a node.
    pub fn insert(&mut self, node: NodeId, ty: impl Into<String>) {
        self.types.insert(node, ty.into());
    }

    /// Returns the type of a node, if the front end knows it.
    pub fn type_of(&self, node: NodeId) -> Option<&str> {
        self.types.get(&node).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Platform size information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sizes {
    /// Size of a machine word in bytes.
    pub word_size: u64,
    /// Maximum alignment in bytes.
    pub max_align: u64,
}

impl Default for Sizes {
    fn default() -> Self {
        Self {
            word_size: 8,
            max_align: 8,
        }
    }
}

/// A 1-based line/column position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Maps byte offsets of one file to line/column positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileIndex {
    path: PathBuf,
    line_starts: Vec<u32>,
}

impl FileIndex {
    /// Builds the index for `source`.
    pub fn from_source(path: impl Into<PathBuf>, source: &str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(
                source
                    .bytes()
                    .enumerate()
                    .filter(|(_, b)| *b == b'\n')
                    .map(|(i, _)| i as u32 + 1),
            )
            .collect();

        Self {
            path: path.into(),
            line_starts,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Converts a byte offset into a position. Columns count bytes.
    pub fn position(&self, offset: u32) -> Position {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx.saturating_sub(1),
        };
        let start = self.line_starts.get(line).copied().unwrap_or(0);

        Position {
            line: line as u32 + 1,
            column: offset.saturating_sub(start) + 1,
        }
    }
}

/// A source unit together with the front-end data a checker needs.
///
/// This is the JSON shape front ends dump for the command line host.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnitFile {
    pub unit: SourceUnit,
    #[serde(default)]
    pub package: PackageInfo,
    #[serde(default)]
    pub types: TypeInfo,
    #[serde(default)]
    pub sizes: Sizes,
}

impl UnitFile {
    /// Parses a unit dump. `file` is only used for error messages.
    pub fn from_json(file: impl AsRef<Path>, contents: &str) -> Result<Self> {
        serde_json::from_str(contents).map_err(|source| Error::JsonError {
            file: file.as_ref().to_path_buf(),
            source,
        })
    }

    /// Splits the dump into the unit and the checker context built for it.
    pub fn into_parts(self) -> (SourceUnit, CheckerContext) {
        let files = FileIndex::from_source(&self.unit.path, &self.unit.source);
        let ctx = CheckerContext {
            package: self.package,
            types: self.types,
            sizes: self.sizes,
            files,
        };
        (self.unit, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_index_positions() {
        let index = FileIndex::from_source("main.go", "package main\n\nfunc f() {\n}\n");

        assert_eq!(index.position(0), Position { line: 1, column: 1 });
        assert_eq!(index.position(8), Position { line: 1, column: 9 });
        assert_eq!(index.position(13), Position { line: 2, column: 1 });
        assert_eq!(index.position(14), Position { line: 3, column: 1 });
        assert_eq!(index.position(19), Position { line: 3, column: 6 });
        assert_eq!(index.position(25), Position { line: 4, column: 1 });
    }

    #[test]
    fn test_file_index_empty_source() {
        let index = FileIndex::from_source("empty.go", "");
        assert_eq!(index.position(0), Position { line: 1, column: 1 });
        assert_eq!(index.position(7).line, 1);
    }

    #[test]
    fn test_push_node_assigns_sequential_ids() {
        let mut unit = SourceUnit::new("main.go", "main");
        let a = unit.push_node("call", Span::new(0, 4), "f(x)");
        let b = unit.push_node("ident", Span::new(2, 3), "x");

        assert_eq!(a, NodeId(0));
        assert_eq!(b, NodeId(1));
        assert_eq!(unit.node(b).map(|n| n.text.as_str()), Some("x"));
        assert!(unit.node(NodeId(7)).is_none());
    }

    #[test]
    fn test_unit_file_from_json() {
        let json = r#"{
            "unit": {
                "path": "main.go",
                "package": "main",
                "source": "x := 1\n",
                "nodes": [{"id": 0, "kind": "assign", "span": {"start": 0, "end": 6}, "text": "x := 1"}]
            },
            "package": {"path": "example.com/app", "name": "main"},
            "types": {"0": "int"}
        }"#;

        let file = UnitFile::from_json("main.json", json).unwrap();
        assert_eq!(file.types.type_of(NodeId(0)), Some("int"));
        assert_eq!(file.sizes, Sizes::default());

        let (unit, ctx) = file.into_parts();
        assert_eq!(unit.nodes.len(), 1);
        assert_eq!(ctx.package.name, "main");
        assert_eq!(ctx.files.path(), Path::new("main.go"));
    }

    #[test]
    fn test_unit_file_invalid_json() {
        let err = UnitFile::from_json("broken.json", "{").unwrap_err();
        assert!(matches!(err, Error::JsonError { .. }));
        assert!(err.to_string().contains("broken.json"));
    }
}
