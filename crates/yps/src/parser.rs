//! YAML parser that builds node trees, one document at a time.

use crate::node::{AnchorId, Node, ScalarStyle, Tag};
use crate::{Error, Position, Result};
use std::ops::ControlFlow;
use std::sync::Arc;
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser};
use yaml_rust2::scanner::Marker;

/// Parse every document in `content`, handing each root to `on_document`.
///
/// Documents are built lazily: when the callback returns
/// `ControlFlow::Break`, later documents are never parsed. Errors from the
/// grammar layer and from the callback stop parsing and are returned as is.
///
/// # Example
///
/// ```rust
/// use std::ops::ControlFlow;
///
/// let mut roots = Vec::new();
/// yps::parse_documents("a: 1\n---\nb: 2\n", None, |doc| {
///     roots.push(doc);
///     Ok(ControlFlow::Continue(()))
/// })
/// .unwrap();
/// assert_eq!(roots.len(), 2);
/// ```
///
/// # Errors
///
/// Returns [`Error::Syntax`] if the YAML is malformed.
pub fn parse_documents<F>(content: &str, filename: Option<&str>, mut on_document: F) -> Result<()>
where
    F: FnMut(Node) -> Result<ControlFlow<()>>,
{
    let filename: Option<Arc<str>> = filename.map(Arc::from);
    let mut parser = Parser::new_from_str(content);
    let mut builder = TreeBuilder::new(filename.clone());

    while !builder.stream_ended {
        parser
            .load(&mut builder, false) // one document per call
            .map_err(|err| Error::syntax(&err, filename.as_ref()))?;

        match builder.take_document() {
            Some(document) => {
                if on_document(document)?.is_break() {
                    break;
                }
            }
            // A call that yields no document has consumed the rest of the stream.
            None => break,
        }
    }
    Ok(())
}

/// Parse the first document only. `None` if the input has no documents.
pub fn parse_document(content: &str, filename: Option<&str>) -> Result<Option<Node>> {
    let mut first = None;
    parse_documents(content, filename, |doc| {
        first = Some(doc);
        Ok(ControlFlow::Break(()))
    })?;
    Ok(first)
}

/// Builder that implements MarkedEventReceiver to construct node trees.
struct TreeBuilder {
    filename: Option<Arc<str>>,

    /// Collections being constructed
    stack: Vec<BuildNode>,

    /// Start of the current document
    document_start: Option<Position>,

    /// The completed root of the current document
    root: Option<Node>,

    /// The last completed document, waiting to be taken
    document: Option<Node>,

    stream_ended: bool,
}

/// A collection being constructed during parsing.
struct BuildNode {
    kind: CollectionKind,
    position: Position,
    anchor: Option<AnchorId>,
    tag: Option<Tag>,
    children: Vec<Node>,
}

#[derive(Clone, Copy, PartialEq)]
enum CollectionKind {
    Sequence,
    Mapping,
}

impl TreeBuilder {
    fn new(filename: Option<Arc<str>>) -> Self {
        Self {
            filename,
            stack: Vec::new(),
            document_start: None,
            root: None,
            document: None,
            stream_ended: false,
        }
    }

    fn take_document(&mut self) -> Option<Node> {
        self.document.take()
    }

    fn position(&self, marker: &Marker) -> Position {
        Position::from_marker(marker, self.filename.as_ref())
    }

    fn push_complete(&mut self, mut node: Node) {
        let Some(parent) = self.stack.last_mut() else {
            self.root = Some(node);
            return;
        };

        // An even number of children so far means this node fills a key slot.
        if parent.kind == CollectionKind::Mapping
            && parent.children.len() % 2 == 0
            && node.is_scalar()
        {
            node.is_mapping_key = true;
        }
        parent.children.push(node);
    }

    fn start_collection(
        &mut self,
        kind: CollectionKind,
        marker: &Marker,
        anchor_id: usize,
        tag: Option<yaml_rust2::parser::Tag>,
    ) {
        let position = self.position(marker);
        self.stack.push(BuildNode {
            kind,
            position,
            anchor: anchor(anchor_id),
            tag: tag.map(Tag::from),
            children: Vec::new(),
        });
    }

    fn end_collection(&mut self, expected: CollectionKind) {
        // yaml-rust2 guarantees balanced start/end events within a document.
        let Some(build) = self.stack.pop() else {
            return;
        };
        debug_assert!(build.kind == expected, "mismatched collection end event");

        let node = match build.kind {
            CollectionKind::Sequence => Node::sequence(build.children, build.position),
            CollectionKind::Mapping => {
                // Block mappings are announced at the `:` after their first key.
                let position = match build.children.first() {
                    Some(first) if precedes(&first.position, &build.position) => {
                        first.position.clone()
                    }
                    _ => build.position,
                };
                Node::mapping(build.children, position)
            }
        };
        self.push_complete(node.with_anchor(build.anchor).with_tag(build.tag));
    }
}

fn precedes(a: &Position, b: &Position) -> bool {
    (a.line(), a.column()) < (b.line(), b.column())
}

/// yaml-rust2 uses anchor id 0 for "no anchor".
fn anchor(anchor_id: usize) -> Option<AnchorId> {
    (anchor_id > 0).then_some(AnchorId(anchor_id))
}

impl MarkedEventReceiver for TreeBuilder {
    fn on_event(&mut self, ev: Event, marker: Marker) {
        match ev {
            Event::Nothing => {}

            Event::StreamStart => {}
            Event::StreamEnd => {
                self.stream_ended = true;
            }

            Event::DocumentStart => {
                self.stack.clear();
                self.root = None;
                self.document_start = Some(self.position(&marker));
            }
            Event::DocumentEnd => {
                let start = self
                    .document_start
                    .take()
                    .unwrap_or_else(|| self.position(&marker));
                self.document = Some(Node::document(self.root.take(), start));
            }

            Event::Scalar(value, style, anchor_id, tag) => {
                let node = Node::scalar(value, ScalarStyle::from(style), self.position(&marker))
                    .with_anchor(anchor(anchor_id))
                    .with_tag(tag.map(Tag::from));
                self.push_complete(node);
            }

            Event::SequenceStart(anchor_id, tag) => {
                self.start_collection(CollectionKind::Sequence, &marker, anchor_id, tag);
            }
            Event::SequenceEnd => self.end_collection(CollectionKind::Sequence),

            Event::MappingStart(anchor_id, tag) => {
                self.start_collection(CollectionKind::Mapping, &marker, anchor_id, tag);
            }
            Event::MappingEnd => self.end_collection(CollectionKind::Mapping),

            Event::Alias(anchor_id) => {
                let node = Node::alias(AnchorId(anchor_id), self.position(&marker));
                self.push_complete(node);
            }
        }
    }
}
