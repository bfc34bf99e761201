//! Shared, freezable sequence and mapping handles.
//!
//! Cloning a handle clones the reference, not the contents. The loader relies
//! on this to hand an alias the very container its anchor produced, including
//! one that is still being filled.
//!
//! Such a collection can end up inside itself, or be used as a key of itself
//! while its own map is borrowed for the insert. Comparison and hashing enter
//! the same re-entry guard as printing and never wait on a held borrow: a
//! collection met again during its own comparison is equal only to itself,
//! and one met again during its own hashing adds nothing more to the hash.

use super::Value;
use crate::{Error, Result};
use indexmap::IndexMap;
use std::cell::{Cell, Ref, RefCell};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// Re-entry guard so that walking a self-referential container terminates.
struct Guard<'a>(&'a Cell<bool>);

impl<'a> Guard<'a> {
    fn enter(flag: &'a Cell<bool>) -> Option<Self> {
        if flag.replace(true) {
            None
        } else {
            Some(Guard(flag))
        }
    }
}

impl Drop for Guard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

struct SequenceInner {
    items: RefCell<Vec<Value>>,
    frozen: Cell<bool>,
    visiting: Cell<bool>,
}

/// An ordered list of values.
#[derive(Clone)]
pub struct Sequence(Rc<SequenceInner>);

impl Sequence {
    pub fn new() -> Self {
        Self::from(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.items.borrow().get(index).cloned()
    }

    /// Borrow the items in document order.
    pub fn items(&self) -> Ref<'_, [Value]> {
        Ref::map(self.0.items.borrow(), Vec::as_slice)
    }

    /// Snapshot of the items.
    pub fn to_vec(&self) -> Vec<Value> {
        self.0.items.borrow().clone()
    }

    pub fn push(&self, value: Value) -> Result<()> {
        self.ensure_mutable()?;
        self.0.items.borrow_mut().push(value);
        Ok(())
    }

    pub fn pop(&self) -> Result<Option<Value>> {
        self.ensure_mutable()?;
        Ok(self.0.items.borrow_mut().pop())
    }

    pub fn freeze(&self) {
        self.0.frozen.set(true);
    }

    pub fn is_frozen(&self) -> bool {
        self.0.frozen.get()
    }

    /// True if both handles refer to the same sequence.
    pub fn ptr_eq(&self, other: &Sequence) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Address identifying this sequence, for cycle detection by callers.
    pub fn as_ptr(&self) -> *const () {
        Rc::as_ptr(&self.0).cast()
    }

    fn ensure_mutable(&self) -> Result<()> {
        if self.is_frozen() {
            Err(Error::Frozen("sequence"))
        } else {
            Ok(())
        }
    }
}

impl Default for Sequence {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<Value>> for Sequence {
    fn from(items: Vec<Value>) -> Self {
        Sequence(Rc::new(SequenceInner {
            items: RefCell::new(items),
            frozen: Cell::new(false),
            visiting: Cell::new(false),
        }))
    }
}

impl FromIterator<Value> for Sequence {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl PartialEq for Sequence {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        let Some(_guard) = Guard::enter(&self.0.visiting) else {
            return false;
        };
        match (self.0.items.try_borrow(), other.0.items.try_borrow()) {
            (Ok(a), Ok(b)) => *a == *b,
            _ => false,
        }
    }
}

impl PartialOrd for Sequence {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.ptr_eq(other) {
            return Some(Ordering::Equal);
        }
        let _guard = Guard::enter(&self.0.visiting)?;
        let a = self.0.items.try_borrow().ok()?;
        let b = other.0.items.try_borrow().ok()?;
        a.iter().partial_cmp(b.iter())
    }
}

impl Hash for Sequence {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let Some(_guard) = Guard::enter(&self.0.visiting) else {
            return;
        };
        if let Ok(items) = self.0.items.try_borrow() {
            items.hash(state);
        }
    }
}

impl fmt::Debug for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match Guard::enter(&self.0.visiting) {
            Some(_guard) => f.debug_list().entries(self.0.items.borrow().iter()).finish(),
            None => f.write_str("[...]"),
        }
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(_guard) = Guard::enter(&self.0.visiting) else {
            return f.write_str("[...]");
        };
        f.write_str("[")?;
        for (i, item) in self.0.items.borrow().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{item}")?;
        }
        f.write_str("]")
    }
}

struct MappingInner {
    entries: RefCell<IndexMap<Value, Value>>,
    frozen: Cell<bool>,
    visiting: Cell<bool>,
}

/// An insertion-ordered map of values.
#[derive(Clone)]
pub struct Mapping(Rc<MappingInner>);

impl Mapping {
    pub fn new() -> Self {
        Self::from(IndexMap::new())
    }

    pub fn len(&self) -> usize {
        self.0.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, key: &Value) -> Option<Value> {
        self.0.entries.borrow().get(key).cloned()
    }

    /// Look up a string key.
    pub fn get_str(&self, key: &str) -> Option<Value> {
        self.get(&Value::from(key))
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.0.entries.borrow().contains_key(key)
    }

    /// Borrow the underlying map.
    pub fn entries(&self) -> Ref<'_, IndexMap<Value, Value>> {
        self.0.entries.borrow()
    }

    pub fn keys(&self) -> Vec<Value> {
        self.0.entries.borrow().keys().cloned().collect()
    }

    pub fn values(&self) -> Vec<Value> {
        self.0.entries.borrow().values().cloned().collect()
    }

    /// Snapshot of the entries in insertion order.
    pub fn to_vec(&self) -> Vec<(Value, Value)> {
        self.0
            .entries
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Insert an entry. An existing equal key keeps its slot and gets the new value.
    pub fn insert(&self, key: Value, value: Value) -> Result<Option<Value>> {
        self.ensure_mutable()?;
        Ok(self.0.entries.borrow_mut().insert(key, value))
    }

    pub fn remove(&self, key: &Value) -> Result<Option<Value>> {
        self.ensure_mutable()?;
        Ok(self.0.entries.borrow_mut().shift_remove(key))
    }

    pub fn freeze(&self) {
        self.0.frozen.set(true);
    }

    pub fn is_frozen(&self) -> bool {
        self.0.frozen.get()
    }

    pub fn ptr_eq(&self, other: &Mapping) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn as_ptr(&self) -> *const () {
        Rc::as_ptr(&self.0).cast()
    }

    fn ensure_mutable(&self) -> Result<()> {
        if self.is_frozen() {
            Err(Error::Frozen("mapping"))
        } else {
            Ok(())
        }
    }
}

impl Default for Mapping {
    fn default() -> Self {
        Self::new()
    }
}

impl From<IndexMap<Value, Value>> for Mapping {
    fn from(entries: IndexMap<Value, Value>) -> Self {
        Mapping(Rc::new(MappingInner {
            entries: RefCell::new(entries),
            frozen: Cell::new(false),
            visiting: Cell::new(false),
        }))
    }
}

impl FromIterator<(Value, Value)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (Value, Value)>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<IndexMap<_, _>>())
    }
}

impl PartialEq for Mapping {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        let Some(_guard) = Guard::enter(&self.0.visiting) else {
            return false;
        };
        match (self.0.entries.try_borrow(), other.0.entries.try_borrow()) {
            (Ok(a), Ok(b)) => *a == *b,
            _ => false,
        }
    }
}

/// Mappings hash by kind alone. A mapping may be a key of itself, and its
/// entries are mutably borrowed while that key is inserted.
impl Hash for Mapping {
    fn hash<H: Hasher>(&self, _state: &mut H) {}
}

impl fmt::Debug for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match Guard::enter(&self.0.visiting) {
            Some(_guard) => f.debug_map().entries(self.0.entries.borrow().iter()).finish(),
            None => f.write_str("{...}"),
        }
    }
}

impl fmt::Display for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(_guard) = Guard::enter(&self.0.visiting) else {
            return f.write_str("{...}");
        };
        f.write_str("{")?;
        for (i, (key, value)) in self.0.entries.borrow().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}: {value}")?;
        }
        f.write_str("}")
    }
}
