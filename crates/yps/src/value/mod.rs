//! Native values produced by loading YAML.
//!
//! A [`Value`] is either a plain value or a [`Value::Wrapped`] container that
//! additionally knows where the value came from. Equality, ordering and
//! hashing see through wrappers, so a wrapped `"Kanta"` equals a bare
//! `"Kanta"` and lookups keyed by bare values keep working.

mod collections;
mod container;

pub use collections::{Mapping, Sequence};
pub use container::{ContainerConstructor, Located, ValueContainer};

use crate::node::Tag;
use crate::policy::NativeType;
use crate::Position;
use base64::Engine as _;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// A symbolic atom, such as the `:foo` scalar or a symbolized mapping key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(Rc<str>);

impl Symbol {
    pub fn new(name: &str) -> Self {
        Symbol(Rc::from(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.0)
    }
}

/// A calendar date (`2025-09-28`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Date {
    year: i32,
    month: u8,
    day: u8,
}

impl Date {
    /// Build a date, returning `None` for days that do not exist.
    pub fn new(year: i32, month: u8, day: u8) -> Option<Self> {
        let leap = (year % 4 == 0 && year % 100 != 0) || year % 400 == 0;
        let days_in_month = match month {
            1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
            4 | 6 | 9 | 11 => 30,
            2 if leap => 29,
            2 => 28,
            _ => return None,
        };
        (1..=days_in_month)
            .contains(&day)
            .then_some(Date { year, month, day })
    }

    /// Parse `YYYY-MM-DD`.
    pub fn parse(text: &str) -> Option<Self> {
        let bytes = text.as_bytes();
        if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
            return None;
        }
        let digits = |range: std::ops::Range<usize>| -> Option<u32> {
            let part = &text[range];
            part.bytes()
                .all(|b| b.is_ascii_digit())
                .then(|| part.parse().ok())
                .flatten()
        };
        let year = i32::try_from(digits(0..4)?).ok()?;
        let month = u8::try_from(digits(5..7)?).ok()?;
        let day = u8::try_from(digits(8..10)?).ok()?;
        Date::new(year, month, day)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn day(&self) -> u8 {
        self.day
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// A value loaded under an application tag (`!point {x: 1}`).
#[derive(Debug, PartialEq)]
pub struct Tagged {
    pub tag: Tag,
    pub value: Value,
}

impl Tagged {
    pub fn new(tag: Tag, value: Value) -> Self {
        Self { tag, value }
    }
}

/// A loaded YAML value.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Symbol(Symbol),
    Date(Date),
    Binary(Vec<u8>),
    Sequence(Sequence),
    Mapping(Mapping),
    Tagged(Rc<Tagged>),
    /// A value carrying the position it was parsed from.
    Wrapped(Rc<dyn ValueContainer>),
}

impl Value {
    /// Wrap `self` with the default [`Located`] container.
    pub fn located(self, position: Position) -> Value {
        Value::Wrapped(Located::construct(self, position))
    }

    /// The position container, if this value is wrapped.
    pub fn container(&self) -> Option<&Rc<dyn ValueContainer>> {
        match self {
            Value::Wrapped(container) => Some(container),
            _ => None,
        }
    }

    pub fn is_wrapped(&self) -> bool {
        matches!(self, Value::Wrapped(_))
    }

    /// Where this value was parsed from; `None` for bare values such as mapping keys.
    pub fn position(&self) -> Option<Position> {
        self.container().map(|c| c.position().clone())
    }

    /// The value with any position wrapper removed.
    pub fn unwrapped(&self) -> Value {
        match self {
            Value::Wrapped(container) => container.value().unwrapped(),
            other => other.clone(),
        }
    }

    /// The native type of the (unwrapped) value.
    pub fn native_type(&self) -> NativeType {
        match self {
            Value::Null => NativeType::Null,
            Value::Bool(_) => NativeType::Bool,
            Value::Int(_) => NativeType::Int,
            Value::Float(_) => NativeType::Float,
            Value::String(_) => NativeType::String,
            Value::Symbol(_) => NativeType::Symbol,
            Value::Date(_) => NativeType::Date,
            Value::Binary(_) => NativeType::Binary,
            Value::Sequence(_) => NativeType::Sequence,
            Value::Mapping(_) => NativeType::Mapping,
            Value::Tagged(tagged) => NativeType::Custom(tagged.tag.to_string()),
            Value::Wrapped(container) => container.value().native_type(),
        }
    }

    pub fn is_null(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Wrapped(container) => container.value().is_null(),
            _ => false,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.unwrapped() {
            Value::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self.unwrapped() {
            Value::Int(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self.unwrapped() {
            Value::Float(f) => Some(f),
            _ => None,
        }
    }

    /// Borrow a bare string. Wrapped strings need [`Value::to_string_value`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The string content, seeing through a wrapper.
    pub fn to_string_value(&self) -> Option<String> {
        match self.unwrapped() {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<Symbol> {
        match self.unwrapped() {
            Value::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<Date> {
        match self.unwrapped() {
            Value::Date(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<Sequence> {
        match self.unwrapped() {
            Value::Sequence(seq) => Some(seq),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<Mapping> {
        match self.unwrapped() {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_tagged(&self) -> Option<Rc<Tagged>> {
        match self.unwrapped() {
            Value::Tagged(tagged) => Some(tagged),
            _ => None,
        }
    }

    /// Look up a string key in a mapping.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.as_mapping()?.get_str(key)
    }

    /// Look up a symbol key in a mapping (as produced by `symbolize_keys`).
    pub fn get_symbol(&self, name: &str) -> Option<Value> {
        self.as_mapping()?.get(&Value::Symbol(Symbol::new(name)))
    }

    /// Look up an arbitrary key in a mapping.
    pub fn get_key(&self, key: &Value) -> Option<Value> {
        self.as_mapping()?.get(key)
    }

    /// Sequence item by index.
    pub fn get_index(&self, index: usize) -> Option<Value> {
        self.as_sequence()?.get(index)
    }

    /// Whether the value rejects mutation.
    ///
    /// Scalars are immutable and always report frozen; wrappers and
    /// collections report their own flag.
    pub fn is_frozen(&self) -> bool {
        match self {
            Value::Sequence(seq) => seq.is_frozen(),
            Value::Mapping(map) => map.is_frozen(),
            Value::Tagged(tagged) => tagged.value.is_frozen(),
            Value::Wrapped(container) => container.is_frozen(),
            _ => true,
        }
    }

    /// Freeze the wrapper and the collection directly beneath it.
    pub fn freeze(&self) {
        match self {
            Value::Sequence(seq) => seq.freeze(),
            Value::Mapping(map) => map.freeze(),
            Value::Tagged(tagged) => tagged.value.freeze(),
            Value::Wrapped(container) => {
                container.value().freeze();
                container.freeze();
            }
            _ => {}
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Wrapped(a), Value::Wrapped(b)) => Rc::ptr_eq(a, b) || a.value() == b.value(),
            (Value::Wrapped(a), b) => a.value() == *b,
            (a, Value::Wrapped(b)) => *a == b.value(),
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Binary(a), Value::Binary(b)) => a == b,
            (Value::Sequence(a), Value::Sequence(b)) => a == b,
            (Value::Mapping(a), Value::Mapping(b)) => a == b,
            (Value::Tagged(a), Value::Tagged(b)) => Rc::ptr_eq(a, b) || a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        if let Value::Wrapped(container) = self {
            container.value().hash(state);
            return;
        }
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null | Value::Wrapped(_) => {}
            Value::Bool(b) => b.hash(state),
            Value::Int(i) => i.hash(state),
            Value::Float(f) => {
                // 0.0 == -0.0 and NaN == NaN here, so both must hash alike.
                let normalized = if *f == 0.0 {
                    0.0
                } else if f.is_nan() {
                    f64::NAN
                } else {
                    *f
                };
                normalized.to_bits().hash(state);
            }
            Value::String(s) => s.hash(state),
            Value::Symbol(s) => s.hash(state),
            Value::Date(d) => d.hash(state),
            Value::Binary(b) => b.hash(state),
            Value::Sequence(seq) => seq.hash(state),
            Value::Mapping(map) => map.hash(state),
            Value::Tagged(tagged) => {
                tagged.tag.hash(state);
                tagged.value.hash(state);
            }
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Value::Wrapped(a), _) => a.value().partial_cmp(other),
            (_, Value::Wrapped(b)) => self.partial_cmp(&b.value()),
            (Value::Null, Value::Null) => Some(Ordering::Equal),
            (Value::Bool(a), Value::Bool(b)) => a.partial_cmp(b),
            (Value::Int(a), Value::Int(b)) => a.partial_cmp(b),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::String(a), Value::String(b)) => a.partial_cmp(b),
            (Value::Symbol(a), Value::Symbol(b)) => a.partial_cmp(b),
            (Value::Date(a), Value::Date(b)) => a.partial_cmp(b),
            (Value::Binary(a), Value::Binary(b)) => a.partial_cmp(b),
            (Value::Sequence(a), Value::Sequence(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) if x.is_nan() => f.write_str(".nan"),
            Value::Float(x) if x.is_infinite() => {
                f.write_str(if *x > 0.0 { ".inf" } else { "-.inf" })
            }
            Value::Float(x) => write!(f, "{x:?}"),
            Value::String(s) => f.write_str(s),
            Value::Symbol(s) => write!(f, "{s}"),
            Value::Date(d) => write!(f, "{d}"),
            Value::Binary(bytes) => write!(
                f,
                "!!binary {}",
                base64::engine::general_purpose::STANDARD.encode(bytes)
            ),
            Value::Sequence(seq) => write!(f, "{seq}"),
            Value::Mapping(map) => write!(f, "{map}"),
            Value::Tagged(tagged) => write!(f, "{} {}", tagged.tag, tagged.value),
            Value::Wrapped(container) => write!(f, "{}", container.value()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Symbol> for Value {
    fn from(s: Symbol) -> Self {
        Value::Symbol(s)
    }
}

impl From<Date> for Value {
    fn from(d: Date) -> Self {
        Value::Date(d)
    }
}

impl From<Sequence> for Value {
    fn from(seq: Sequence) -> Self {
        Value::Sequence(seq)
    }
}

impl From<Mapping> for Value {
    fn from(map: Mapping) -> Self {
        Value::Mapping(map)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(Sequence::from(items))
    }
}
