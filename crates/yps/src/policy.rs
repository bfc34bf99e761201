//! Which native types and symbols may be materialized from untrusted YAML.
//!
//! Checks run while values are constructed, one node at a time, never while
//! the node tree is built.

use crate::node::Tag;
use crate::value::Symbol;
use crate::{Error, Position, Result};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Identifies the kind of native value a node turns into.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NativeType {
    Null,
    Bool,
    Int,
    Float,
    String,
    Sequence,
    Mapping,
    Symbol,
    /// A calendar date. `!!timestamp` maps here too, so only `YYYY-MM-DD`
    /// content is accepted; a time of day fails with `InvalidScalar`.
    Date,
    Binary,
    /// An application tag such as `!point`, keyed by its display form.
    Custom(String),
}

impl NativeType {
    /// Types that are always safe to load.
    pub const BASELINE: [NativeType; 7] = [
        NativeType::Null,
        NativeType::Bool,
        NativeType::Int,
        NativeType::Float,
        NativeType::String,
        NativeType::Sequence,
        NativeType::Mapping,
    ];

    /// Application type for a tag, e.g. `NativeType::custom("!point")`.
    pub fn custom(tag: impl Into<String>) -> Self {
        NativeType::Custom(tag.into())
    }

    pub fn is_baseline(&self) -> bool {
        Self::BASELINE.contains(self)
    }

    /// Map a tag to the type it asks for.
    pub fn from_tag(tag: &Tag) -> Self {
        match tag.core_name() {
            Some("null") => NativeType::Null,
            Some("bool") => NativeType::Bool,
            Some("int") => NativeType::Int,
            Some("float") => NativeType::Float,
            Some("str") => NativeType::String,
            Some("seq") => NativeType::Sequence,
            Some("map") => NativeType::Mapping,
            Some("timestamp") | Some("date") => NativeType::Date,
            Some("binary") => NativeType::Binary,
            Some("symbol") => NativeType::Symbol,
            _ if tag.handle == "!" && matches!(tag.suffix.as_str(), "ruby/symbol" | "ruby/sym") => {
                NativeType::Symbol
            }
            _ => NativeType::Custom(tag.to_string()),
        }
    }
}

impl fmt::Display for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NativeType::Null => "Null",
            NativeType::Bool => "Bool",
            NativeType::Int => "Int",
            NativeType::Float => "Float",
            NativeType::String => "String",
            NativeType::Sequence => "Sequence",
            NativeType::Mapping => "Mapping",
            NativeType::Symbol => "Symbol",
            NativeType::Date => "Date",
            NativeType::Binary => "Binary",
            NativeType::Custom(tag) => tag,
        };
        f.write_str(name)
    }
}

impl FromStr for NativeType {
    type Err = String;

    /// Parse a type name as written on a command line; tags start with `!`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.starts_with('!') {
            return Ok(NativeType::Custom(s.to_string()));
        }
        match s.to_ascii_lowercase().as_str() {
            "null" => Ok(NativeType::Null),
            "bool" | "boolean" => Ok(NativeType::Bool),
            "int" | "integer" => Ok(NativeType::Int),
            "float" => Ok(NativeType::Float),
            "string" | "str" => Ok(NativeType::String),
            "sequence" | "seq" => Ok(NativeType::Sequence),
            "mapping" | "map" => Ok(NativeType::Mapping),
            "symbol" => Ok(NativeType::Symbol),
            "date" => Ok(NativeType::Date),
            "binary" => Ok(NativeType::Binary),
            _ => Err(format!("unknown type name: {s}")),
        }
    }
}

/// Which symbol names may be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SymbolPolicy {
    #[default]
    Any,
    Only(HashSet<String>),
}

/// Restricts the types and symbols a load may produce.
#[derive(Debug, Clone, Default)]
pub struct SecurityPolicy {
    permitted_types: HashSet<NativeType>,
    symbols: SymbolPolicy,
}

impl SecurityPolicy {
    /// Build a policy. An empty symbol list leaves symbol names unrestricted.
    pub fn new<T, S>(permitted_types: T, permitted_symbols: S) -> Self
    where
        T: IntoIterator<Item = NativeType>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        let symbols: HashSet<String> = permitted_symbols.into_iter().map(Into::into).collect();
        Self {
            permitted_types: permitted_types.into_iter().collect(),
            symbols: if symbols.is_empty() {
                SymbolPolicy::Any
            } else {
                SymbolPolicy::Only(symbols)
            },
        }
    }

    pub fn permits(&self, ty: &NativeType) -> bool {
        ty.is_baseline() || self.permitted_types.contains(ty)
    }

    /// Fail with `DisallowedType` unless `ty` may be loaded.
    pub fn check_type(&self, ty: &NativeType, position: &Position) -> Result<()> {
        if self.permits(ty) {
            Ok(())
        } else {
            Err(Error::DisallowedType {
                type_name: ty.clone(),
                position: position.clone(),
            })
        }
    }

    /// Resolve the type a tag names, failing if it is not permitted.
    pub fn resolve_type(&self, tag: &Tag, position: &Position) -> Result<NativeType> {
        let ty = NativeType::from_tag(tag);
        self.check_type(&ty, position)?;
        Ok(ty)
    }

    /// Turn `name` into a symbol, failing if the name is outside the permitted set.
    pub fn resolve_symbol(&self, name: &str, position: &Position) -> Result<Symbol> {
        match &self.symbols {
            SymbolPolicy::Only(names) if !names.contains(name) => Err(Error::DisallowedSymbol {
                symbol: name.to_string(),
                position: position.clone(),
            }),
            _ => Ok(Symbol::new(name)),
        }
    }
}
