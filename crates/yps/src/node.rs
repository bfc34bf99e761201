//! In-memory node tree for one parsed YAML document.

use crate::Position;
use std::fmt;

/// Label under which an anchored node can be referenced by an alias.
///
/// yaml-rust2 numbers anchors as it meets them; a redefined anchor name gets a
/// fresh id, so aliases always refer to the latest definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnchorId(pub usize);

impl fmt::Display for AnchorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "&{}", self.0)
    }
}

/// Presentation style of a scalar in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScalarStyle {
    #[default]
    Plain,
    SingleQuoted,
    DoubleQuoted,
    Literal,
    Folded,
}

impl ScalarStyle {
    /// Only plain scalars go through implicit type resolution.
    pub fn is_plain(self) -> bool {
        self == ScalarStyle::Plain
    }
}

impl From<yaml_rust2::scanner::TScalarStyle> for ScalarStyle {
    fn from(style: yaml_rust2::scanner::TScalarStyle) -> Self {
        use yaml_rust2::scanner::TScalarStyle;
        #[allow(unreachable_patterns)]
        match style {
            TScalarStyle::SingleQuoted => ScalarStyle::SingleQuoted,
            TScalarStyle::DoubleQuoted => ScalarStyle::DoubleQuoted,
            TScalarStyle::Literal => ScalarStyle::Literal,
            TScalarStyle::Folded => ScalarStyle::Folded,
            _ => ScalarStyle::Plain,
        }
    }
}

/// Handle under which yaml-rust2 reports `!!` tags once resolved.
pub const CORE_TAG_PREFIX: &str = "tag:yaml.org,2002:";

/// A YAML tag as reported by the parser, split into handle and suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag {
    pub handle: String,
    pub suffix: String,
}

impl Tag {
    pub fn new(handle: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
            suffix: suffix.into(),
        }
    }

    /// Name within the YAML core schema (`int` for `!!int`), if this is a core tag.
    pub fn core_name(&self) -> Option<&str> {
        if self.handle == "!!" || self.handle == CORE_TAG_PREFIX {
            return Some(&self.suffix);
        }
        if self.handle.is_empty() {
            return self.suffix.strip_prefix(CORE_TAG_PREFIX);
        }
        None
    }
}

impl From<yaml_rust2::parser::Tag> for Tag {
    fn from(tag: yaml_rust2::parser::Tag) -> Self {
        Self {
            handle: tag.handle,
            suffix: tag.suffix,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.core_name() {
            Some(name) => write!(f, "!!{name}"),
            None => write!(f, "{}{}", self.handle, self.suffix),
        }
    }
}

/// Scalar content exactly as the parser resolved it for its style.
#[derive(Debug, Clone, PartialEq)]
pub struct Scalar {
    pub value: String,
    pub style: ScalarStyle,
}

/// The shape of a node.
#[derive(Debug, Clone)]
pub enum NodeKind {
    Scalar(Scalar),
    Sequence(Vec<Node>),
    /// Alternating key/value children, starting with a key.
    Mapping(Vec<Node>),
    Alias(AnchorId),
    /// A document root; `None` for a document without content.
    Document(Option<Box<Node>>),
}

/// One node of a parsed document.
///
/// Children are owned by their parent. An alias refers to an earlier node by
/// anchor id only, so the tree itself never contains cycles.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    /// Start of the node in the source.
    pub position: Position,
    pub anchor: Option<AnchorId>,
    pub tag: Option<Tag>,
    /// True for a scalar sitting in a key slot of a mapping.
    pub is_mapping_key: bool,
}

impl Node {
    fn with_kind(kind: NodeKind, position: Position) -> Self {
        Self {
            kind,
            position,
            anchor: None,
            tag: None,
            is_mapping_key: false,
        }
    }

    pub fn scalar(value: impl Into<String>, style: ScalarStyle, position: Position) -> Self {
        Self::with_kind(
            NodeKind::Scalar(Scalar {
                value: value.into(),
                style,
            }),
            position,
        )
    }

    pub fn sequence(children: Vec<Node>, position: Position) -> Self {
        Self::with_kind(NodeKind::Sequence(children), position)
    }

    pub fn mapping(children: Vec<Node>, position: Position) -> Self {
        Self::with_kind(NodeKind::Mapping(children), position)
    }

    pub fn alias(anchor: AnchorId, position: Position) -> Self {
        Self::with_kind(NodeKind::Alias(anchor), position)
    }

    pub fn document(root: Option<Node>, position: Position) -> Self {
        Self::with_kind(NodeKind::Document(root.map(Box::new)), position)
    }

    pub fn with_anchor(mut self, anchor: Option<AnchorId>) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn with_tag(mut self, tag: Option<Tag>) -> Self {
        self.tag = tag;
        self
    }

    pub fn is_document(&self) -> bool {
        matches!(self.kind, NodeKind::Document(_))
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self.kind, NodeKind::Scalar(_))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self.kind, NodeKind::Sequence(_))
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self.kind, NodeKind::Mapping(_))
    }

    pub fn is_alias(&self) -> bool {
        matches!(self.kind, NodeKind::Alias(_))
    }

    /// Scalar content, if this is a scalar.
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match &self.kind {
            NodeKind::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    /// Direct children of a sequence or mapping; empty otherwise.
    pub fn children(&self) -> &[Node] {
        match &self.kind {
            NodeKind::Sequence(children) | NodeKind::Mapping(children) => children,
            _ => &[],
        }
    }

    /// Root of a document node.
    pub fn root(&self) -> Option<&Node> {
        match &self.kind {
            NodeKind::Document(root) => root.as_deref(),
            _ => None,
        }
    }

    /// Number of children (sequence items or mapping keys and values).
    pub fn len(&self) -> usize {
        self.children().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up the value node for a plain string key in a mapping.
    pub fn get(&self, key: &str) -> Option<&Node> {
        match &self.kind {
            NodeKind::Mapping(children) => children.chunks(2).find_map(|pair| match pair {
                [k, v] if k.as_scalar().is_some_and(|s| s.value == key) => Some(v),
                _ => None,
            }),
            _ => None,
        }
    }

    /// Sequence item by index.
    pub fn item(&self, index: usize) -> Option<&Node> {
        match &self.kind {
            NodeKind::Sequence(children) => children.get(index),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(line: usize, column: usize) -> Position {
        Position::new(None, line, column)
    }

    #[test]
    fn test_scalar_creation() {
        let node = Node::scalar("test", ScalarStyle::Plain, pos(1, 1));
        assert!(node.is_scalar());
        assert!(!node.is_sequence());
        assert!(!node.is_mapping());
        assert!(!node.is_mapping_key);
        assert_eq!(node.len(), 0);
        assert_eq!(node.as_scalar().unwrap().value, "test");
    }

    #[test]
    fn test_sequence_item() {
        let node = Node::sequence(
            vec![
                Node::scalar("a", ScalarStyle::Plain, pos(1, 3)),
                Node::scalar("b", ScalarStyle::Plain, pos(2, 3)),
            ],
            pos(1, 1),
        );
        assert!(node.is_sequence());
        assert_eq!(node.len(), 2);
        assert_eq!(node.item(1).unwrap().as_scalar().unwrap().value, "b");
        assert!(node.item(2).is_none());
    }

    #[test]
    fn test_mapping_get() {
        let node = Node::mapping(
            vec![
                Node::scalar("name", ScalarStyle::Plain, pos(1, 1)),
                Node::scalar("Kanta", ScalarStyle::Plain, pos(1, 7)),
            ],
            pos(1, 1),
        );
        assert_eq!(node.get("name").unwrap().position, pos(1, 7));
        assert!(node.get("age").is_none());
    }

    #[test]
    fn test_document_root() {
        let empty = Node::document(None, pos(1, 1));
        assert!(empty.is_document());
        assert!(empty.root().is_none());

        let doc = Node::document(Some(Node::scalar("x", ScalarStyle::Plain, pos(1, 1))), pos(1, 1));
        assert!(doc.root().unwrap().is_scalar());
    }

    #[test]
    fn test_core_tag_names() {
        assert_eq!(Tag::new(CORE_TAG_PREFIX, "int").core_name(), Some("int"));
        assert_eq!(Tag::new("!!", "str").core_name(), Some("str"));
        assert_eq!(Tag::new("", "tag:yaml.org,2002:map").core_name(), Some("map"));
        assert_eq!(Tag::new("!", "point").core_name(), None);
    }

    #[test]
    fn test_tag_display() {
        assert_eq!(Tag::new(CORE_TAG_PREFIX, "int").to_string(), "!!int");
        assert_eq!(Tag::new("!", "point").to_string(), "!point");
        assert_eq!(Tag::new("!ruby/", "symbol").to_string(), "!ruby/symbol");
    }
}
