//! Converts node trees into position-wrapped native values.
//!
//! The visitor walks a document depth-first. Every value it produces, except
//! mapping keys, is wrapped with the position of the node it came from.
//! Security checks happen here, node by node.

use crate::node::{AnchorId, Node, NodeKind, Scalar, Tag};
use crate::options::{AliasPosition, LoadOptions};
use crate::policy::{NativeType, SecurityPolicy};
use crate::scalar::{Resolved, ScalarScanner};
use crate::value::{ContainerConstructor, Mapping, Sequence, Tagged, Value};
use crate::{Error, Result};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// Key that merges another mapping into the enclosing one.
const MERGE_KEY: &str = "<<";

/// Recursive node-to-value converter.
///
/// A visitor holds the anchor table of the document it is converting;
/// [`Visitor::accept`] starts a fresh table for every document.
pub struct Visitor {
    policy: SecurityPolicy,
    scanner: ScalarScanner,
    unwrapped_types: HashSet<NativeType>,
    container: ContainerConstructor,
    symbolize_keys: bool,
    freeze: bool,
    alias_position: AliasPosition,
    allow_aliases: bool,
    /// `None` while aliases are disabled.
    anchors: Option<HashMap<AnchorId, Value>>,
}

impl Visitor {
    pub fn new(options: &LoadOptions) -> Self {
        Self {
            policy: options.security_policy(),
            scanner: ScalarScanner::new(options.strict_integer),
            unwrapped_types: options.unwrapped_types.clone(),
            container: options.value_container,
            symbolize_keys: options.symbolize_keys,
            freeze: options.freeze,
            alias_position: options.alias_position,
            allow_aliases: options.allow_aliases,
            anchors: None,
        }
    }

    /// Convert one document (or any subtree) with a fresh anchor table.
    ///
    /// # Errors
    ///
    /// Fails on the first node that violates the security policy, on aliases
    /// while they are disabled, and on aliases to unknown anchors.
    pub fn accept(&mut self, node: &Node) -> Result<Value> {
        self.anchors = self.allow_aliases.then(HashMap::new);
        let result = self.visit(node);
        self.anchors = None;
        result
    }

    fn visit(&mut self, node: &Node) -> Result<Value> {
        match &node.kind {
            NodeKind::Document(None) => Ok(Value::Null),
            NodeKind::Document(Some(root)) => self.visit(root),
            NodeKind::Alias(anchor) => self.visit_alias(*anchor, node),
            NodeKind::Scalar(scalar) => self.visit_scalar(scalar, node),
            NodeKind::Sequence(children) => self.visit_sequence(children, node),
            NodeKind::Mapping(children) => self.visit_mapping(children, node),
        }
    }

    fn visit_alias(&mut self, anchor: AnchorId, node: &Node) -> Result<Value> {
        let Some(anchors) = &self.anchors else {
            return Err(Error::AliasesDisabled {
                position: node.position.clone(),
            });
        };
        let target = anchors
            .get(&anchor)
            .cloned()
            .ok_or_else(|| Error::UnresolvedAlias {
                anchor,
                position: node.position.clone(),
            })?;

        match self.alias_position {
            AliasPosition::Anchor => Ok(target),
            AliasPosition::AliasSite => {
                let value = self.wrap(target.unwrapped(), node);
                // The shared collection may still be filling; only the new wrapper is sealed here.
                if let (true, Value::Wrapped(container)) = (self.freeze, &value) {
                    container.freeze();
                }
                Ok(value)
            }
        }
    }

    fn visit_scalar(&mut self, scalar: &Scalar, node: &Node) -> Result<Value> {
        let value = match &node.tag {
            Some(tag) => self.tagged_scalar(scalar, tag, node)?,
            None => {
                let resolved = self.scanner.tokenize(scalar);
                self.materialize(resolved, node)?
            }
        };
        let value = self.wrap(value, node);
        self.seal(&value);
        self.register(node, &value);
        Ok(value)
    }

    fn tagged_scalar(&mut self, scalar: &Scalar, tag: &Tag, node: &Node) -> Result<Value> {
        let ty = self.policy.resolve_type(tag, &node.position)?;
        match ty {
            NativeType::Custom(_) => {
                let inner = self.scanner.tokenize(scalar);
                let inner = self.materialize(inner, node)?;
                Ok(Value::Tagged(Rc::new(Tagged::new(tag.clone(), inner))))
            }
            NativeType::Sequence | NativeType::Mapping => Err(Error::TagMismatch {
                tag: tag.to_string(),
                kind: "scalar",
                position: node.position.clone(),
            }),
            ty => {
                let resolved = self.scanner.resolve_as(&ty, &scalar.value).ok_or_else(|| {
                    Error::InvalidScalar {
                        tag: tag.to_string(),
                        value: scalar.value.clone(),
                        position: node.position.clone(),
                    }
                })?;
                self.materialize(resolved, node)
            }
        }
    }

    /// Turn a resolved scalar into a value, applying type and symbol checks.
    fn materialize(&self, resolved: Resolved, node: &Node) -> Result<Value> {
        self.policy.check_type(&resolved.native_type(), &node.position)?;
        Ok(match resolved {
            Resolved::Null => Value::Null,
            Resolved::Bool(b) => Value::Bool(b),
            Resolved::Int(i) => Value::Int(i),
            Resolved::Float(f) => Value::Float(f),
            Resolved::String(s) => Value::String(s),
            Resolved::Date(d) => Value::Date(d),
            Resolved::Binary(bytes) => Value::Binary(bytes),
            Resolved::Symbol(name) => {
                Value::Symbol(self.policy.resolve_symbol(&name, &node.position)?)
            }
        })
    }

    /// Check a collection's tag; `Some` holds an application tag to apply.
    fn collection_tag(
        &self,
        node: &Node,
        expected: NativeType,
        kind: &'static str,
    ) -> Result<Option<Tag>> {
        let Some(tag) = &node.tag else {
            return Ok(None);
        };
        match self.policy.resolve_type(tag, &node.position)? {
            NativeType::Custom(_) => Ok(Some(tag.clone())),
            ty if ty == expected => Ok(None),
            _ => Err(Error::TagMismatch {
                tag: tag.to_string(),
                kind,
                position: node.position.clone(),
            }),
        }
    }

    fn visit_sequence(&mut self, children: &[Node], node: &Node) -> Result<Value> {
        let tag = self.collection_tag(node, NativeType::Sequence, "sequence")?;
        let sequence = Sequence::new();
        let value = self.wrap(apply_tag(tag, Value::Sequence(sequence.clone())), node);

        // Registered before the items so that an alias inside refers back to this sequence.
        self.register(node, &value);
        for child in children {
            let item = self.visit(child)?;
            sequence.push(item)?;
        }
        self.seal(&value);
        Ok(value)
    }

    fn visit_mapping(&mut self, children: &[Node], node: &Node) -> Result<Value> {
        let tag = self.collection_tag(node, NativeType::Mapping, "mapping")?;
        let mapping = Mapping::new();
        let value = self.wrap(apply_tag(tag, Value::Mapping(mapping.clone())), node);

        self.register(node, &value);
        for pair in children.chunks(2) {
            let [key_node, value_node] = pair else {
                return Err(Error::InvalidStructure {
                    message: "mapping key without a value".into(),
                    position: Some(pair[0].position.clone()),
                });
            };

            if is_merge_key(key_node) {
                let merged = self.visit(value_node)?;
                if merge_into(&mapping, &merged)? {
                    continue;
                }
                mapping.insert(Value::from(MERGE_KEY), merged)?;
                continue;
            }

            let key = self.visit_key(key_node)?;
            let item = self.visit(value_node)?;
            mapping.insert(key, item)?;
        }
        self.seal(&value);
        Ok(value)
    }

    /// Mapping keys are returned bare, and symbolized on request.
    ///
    /// Symbolized keys must pass the same symbol check as `:symbol` scalars.
    fn visit_key(&mut self, node: &Node) -> Result<Value> {
        let key = match self.visit(node)? {
            Value::Wrapped(container) => container.value(),
            key => key,
        };
        Ok(match key {
            Value::String(name) if self.symbolize_keys => {
                Value::Symbol(self.policy.resolve_symbol(&name, &node.position)?)
            }
            key => key,
        })
    }

    /// Wrap `value` with the node's position unless it is exempt.
    fn wrap(&self, value: Value, node: &Node) -> Value {
        if node.is_document()
            || node.is_mapping_key
            || self.unwrapped_types.contains(&value.native_type())
        {
            return value;
        }
        Value::Wrapped((self.container)(value, node.position.clone()))
    }

    /// Freeze a completed value when requested. Children are sealed first,
    /// as each of them completes.
    fn seal(&self, value: &Value) {
        if self.freeze {
            value.freeze();
        }
    }

    fn register(&mut self, node: &Node, value: &Value) {
        if let (Some(anchor), Some(anchors)) = (node.anchor, self.anchors.as_mut()) {
            anchors.insert(anchor, value.clone());
        }
    }
}

fn apply_tag(tag: Option<Tag>, value: Value) -> Value {
    match tag {
        Some(tag) => Value::Tagged(Rc::new(Tagged::new(tag, value))),
        None => value,
    }
}

/// Any `<<` scalar merges, quoted or not, unless it is tagged `!!str`.
fn is_merge_key(node: &Node) -> bool {
    let explicit_string = node
        .tag
        .as_ref()
        .is_some_and(|tag| NativeType::from_tag(tag) == NativeType::String);
    !explicit_string && node.as_scalar().is_some_and(|s| s.value == MERGE_KEY)
}

/// Merge a `<<` value into `mapping`. Returns false if the value is not mergeable.
///
/// A mapping is merged as is; a sequence of mappings is merged so that earlier
/// mappings win over later ones. Keys already present in `mapping` are overwritten.
fn merge_into(mapping: &Mapping, merged: &Value) -> Result<bool> {
    if let Some(source) = merged.as_mapping() {
        for (key, value) in source.to_vec() {
            mapping.insert(key, value)?;
        }
        return Ok(true);
    }
    let Some(sources) = merged.as_sequence() else {
        return Ok(false);
    };
    let sources: Option<Vec<Mapping>> = sources.items().iter().map(Value::as_mapping).collect();
    let Some(sources) = sources else {
        return Ok(false);
    };
    let combined = Mapping::new();
    for source in sources.iter().rev() {
        for (key, value) in source.to_vec() {
            combined.insert(key, value)?;
        }
    }
    for (key, value) in combined.to_vec() {
        mapping.insert(key, value)?;
    }
    Ok(true)
}
