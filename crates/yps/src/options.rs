//! Caller-facing load options.

use crate::policy::{NativeType, SecurityPolicy};
use crate::value::{ContainerConstructor, Located, Value};
use std::collections::HashSet;

/// Which position an alias value reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AliasPosition {
    /// The alias resolves to the very value produced at the anchor, position included.
    #[default]
    Anchor,
    /// The anchored value is wrapped again with the alias's own position.
    /// Collections are still shared with the anchor.
    AliasSite,
}

/// Options controlling a load.
///
/// The defaults are safe for untrusted input: only baseline types, no
/// aliases, every value wrapped with [`Located`].
///
/// ```rust
/// use yps::{LoadOptions, NativeType};
///
/// let options = LoadOptions::new()
///     .with_filename("config.yaml")
///     .permit_type(NativeType::Date)
///     .with_aliases(true);
/// assert!(options.allow_aliases);
/// ```
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Types allowed in addition to the baseline.
    pub permitted_types: HashSet<NativeType>,
    /// Symbol names allowed; empty means any.
    pub permitted_symbols: HashSet<String>,
    /// Types whose values are returned without a position wrapper.
    pub unwrapped_types: HashSet<NativeType>,
    pub allow_aliases: bool,
    /// Filename recorded in every position.
    pub filename: Option<String>,
    /// Returned instead of the default when the input has no documents.
    pub fallback: Option<Value>,
    /// Convert string mapping keys to symbols.
    pub symbolize_keys: bool,
    /// Freeze every wrapper and collection.
    pub freeze: bool,
    /// Treat `1,000` as a string instead of an integer.
    pub strict_integer: bool,
    pub alias_position: AliasPosition,
    pub value_container: ContainerConstructor,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            permitted_types: HashSet::new(),
            permitted_symbols: HashSet::new(),
            unwrapped_types: HashSet::new(),
            allow_aliases: false,
            filename: None,
            fallback: None,
            symbolize_keys: false,
            freeze: false,
            strict_integer: false,
            alias_position: AliasPosition::default(),
            value_container: Located::construct,
        }
    }
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults plus symbols, for trusted input.
    pub fn permissive() -> Self {
        Self::default().permit_type(NativeType::Symbol)
    }

    pub fn permit_type(mut self, ty: NativeType) -> Self {
        self.permitted_types.insert(ty);
        self
    }

    pub fn permit_types(mut self, types: impl IntoIterator<Item = NativeType>) -> Self {
        self.permitted_types.extend(types);
        self
    }

    pub fn permit_symbol(mut self, name: impl Into<String>) -> Self {
        self.permitted_symbols.insert(name.into());
        self
    }

    pub fn unwrap_type(mut self, ty: NativeType) -> Self {
        self.unwrapped_types.insert(ty);
        self
    }

    pub fn with_aliases(mut self, allow: bool) -> Self {
        self.allow_aliases = allow;
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_fallback(mut self, fallback: Value) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn with_symbolize_keys(mut self, symbolize: bool) -> Self {
        self.symbolize_keys = symbolize;
        self
    }

    pub fn with_freeze(mut self, freeze: bool) -> Self {
        self.freeze = freeze;
        self
    }

    pub fn with_strict_integer(mut self, strict: bool) -> Self {
        self.strict_integer = strict;
        self
    }

    pub fn with_alias_position(mut self, alias_position: AliasPosition) -> Self {
        self.alias_position = alias_position;
        self
    }

    pub fn with_value_container(mut self, constructor: ContainerConstructor) -> Self {
        self.value_container = constructor;
        self
    }

    /// The security policy these options describe.
    pub fn security_policy(&self) -> SecurityPolicy {
        SecurityPolicy::new(
            self.permitted_types.iter().cloned(),
            self.permitted_symbols.iter().cloned(),
        )
    }
}
