//! # yps
//!
//! YAML loading with positions attached to every value.
//!
//! Loading turns a YAML stream into native [`Value`]s. Each value is wrapped
//! in a [`ValueContainer`] (by default [`Located`]) that records the
//! filename, line and column it was read from, so configuration errors can
//! point at the offending line.
//!
//! ## Design
//!
//! Loading runs in two passes: [`parse_documents`] builds a [`Node`] tree per
//! document from yaml-rust2's marked events, and a [`Visitor`] turns each
//! tree into values, applying the [`SecurityPolicy`] on the way. Anchored
//! collections are shared through reference counting, so aliases (and even
//! self-referencing structures) resolve to the same instance.
//!
//! Defaults are safe for untrusted input: only baseline types (null, bool,
//! integer, float, string, sequence, mapping) and no aliases.
//!
//! ## Example
//!
//! ```rust
//! use yps::{load, LoadOptions};
//!
//! let content = "children:\n  - name: Kanta\n    age: 8\n";
//! let value = load(content, &LoadOptions::new().with_filename("family.yaml")).unwrap();
//!
//! let name = value.get("children").unwrap().get_index(0).unwrap().get("name").unwrap();
//! assert_eq!(name.as_str(), None); // wrapped
//! assert_eq!(name.to_string_value().as_deref(), Some("Kanta"));
//! assert_eq!(
//!     name.position().unwrap().to_string(),
//!     "filename: family.yaml line 2 column 11"
//! );
//! ```

mod error;
mod load;
mod node;
mod options;
mod parser;
mod policy;
mod position;
mod scalar;
mod value;
mod visitor;

pub use error::{Error, Result};
pub use load::{load, load_all, load_all_file, load_all_reader, load_documents, load_file, load_reader};
pub use node::{AnchorId, CORE_TAG_PREFIX, Node, NodeKind, Scalar, ScalarStyle, Tag};
pub use options::{AliasPosition, LoadOptions};
pub use parser::{parse_document, parse_documents};
pub use policy::{NativeType, SecurityPolicy, SymbolPolicy};
pub use position::Position;
pub use scalar::{Resolved, ScalarScanner};
pub use value::{
    ContainerConstructor, Date, Located, Mapping, Sequence, Symbol, Tagged, Value, ValueContainer,
};
pub use visitor::Visitor;
