//! Error types for position-aware YAML loading.

use crate::node::AnchorId;
use crate::policy::NativeType;
use crate::Position;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for yps operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading YAML.
///
/// Every error is fatal for the load call that raised it; no partially
/// built value is ever returned alongside one.
#[derive(Debug, Error)]
pub enum Error {
    /// The YAML grammar layer rejected the input.
    #[error("syntax error: {message}{}", at(.position.as_ref()))]
    Syntax {
        message: String,
        position: Option<Position>,
    },

    /// A tag or scalar resolved to a type that is not permitted.
    #[error("tried to load unspecified type: {type_name}{}", at(Some(.position)))]
    DisallowedType {
        type_name: NativeType,
        position: Position,
    },

    /// A symbol outside the permitted set.
    #[error("tried to load unspecified symbol: :{symbol}{}", at(Some(.position)))]
    DisallowedSymbol { symbol: String, position: Position },

    /// An alias was found while aliases are disabled.
    #[error("alias found but aliases are not enabled{}", at(Some(.position)))]
    AliasesDisabled { position: Position },

    /// An alias refers to an anchor that was never defined in this document.
    #[error("unknown alias: {anchor}{}", at(Some(.position)))]
    UnresolvedAlias { anchor: AnchorId, position: Position },

    /// A scalar carries a core tag its content cannot satisfy (`!!int abc`).
    #[error("invalid value for {tag}: {value:?}{}", at(Some(.position)))]
    InvalidScalar {
        tag: String,
        value: String,
        position: Position,
    },

    /// A collection carries a scalar tag (`!!str [a, b]`).
    #[error("tag {tag} cannot be applied to a {kind}{}", at(Some(.position)))]
    TagMismatch {
        tag: String,
        kind: &'static str,
        position: Position,
    },

    /// The node tree is malformed (a mapping key without a value).
    #[error("invalid YAML structure: {message}{}", at(.position.as_ref()))]
    InvalidStructure {
        message: String,
        position: Option<Position>,
    },

    /// Attempt to mutate a frozen container.
    #[error("can't modify frozen {0}")]
    Frozen(&'static str),

    /// Reading the input failed.
    #[error("cannot read {}: {source}", .path.as_ref().map_or("input".into(), |p| p.display().to_string()))]
    Io {
        path: Option<PathBuf>,
        #[source]
        source: std::io::Error,
    },
}

fn at(position: Option<&Position>) -> String {
    position.map_or_else(String::new, |pos| format!(" ({pos})"))
}

impl Error {
    /// Convert a grammar-layer failure, attaching the filename being parsed.
    pub(crate) fn syntax(err: &yaml_rust2::ScanError, filename: Option<&std::sync::Arc<str>>) -> Self {
        Error::Syntax {
            message: err.info().to_string(),
            position: Some(Position::from_marker(err.marker(), filename)),
        }
    }

    /// Position of the offending node, when the error has one.
    pub fn position(&self) -> Option<&Position> {
        match self {
            Error::Syntax { position, .. } | Error::InvalidStructure { position, .. } => {
                position.as_ref()
            }
            Error::DisallowedType { position, .. }
            | Error::DisallowedSymbol { position, .. }
            | Error::AliasesDisabled { position }
            | Error::UnresolvedAlias { position, .. }
            | Error::InvalidScalar { position, .. }
            | Error::TagMismatch { position, .. } => Some(position),
            Error::Frozen(_) | Error::Io { .. } => None,
        }
    }
}

impl From<yaml_rust2::ScanError> for Error {
    fn from(err: yaml_rust2::ScanError) -> Self {
        Error::syntax(&err, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_position() {
        let err = Error::AliasesDisabled {
            position: Position::new(Some("a.yaml".into()), 4, 3),
        };
        assert_eq!(
            err.to_string(),
            "alias found but aliases are not enabled (filename: a.yaml line 4 column 3)"
        );
    }

    #[test]
    fn test_display_without_position() {
        let err = Error::Syntax {
            message: "did not find expected key".into(),
            position: None,
        };
        assert_eq!(err.to_string(), "syntax error: did not find expected key");
        assert!(err.position().is_none());
    }

    #[test]
    fn test_disallowed_type_display() {
        let err = Error::DisallowedType {
            type_name: NativeType::Date,
            position: Position::new(None, 1, 3),
        };
        assert_eq!(
            err.to_string(),
            "tried to load unspecified type: Date (filename: unknown line 1 column 3)"
        );
    }
}
