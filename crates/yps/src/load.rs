//! Entry points: load YAML text, readers and files into wrapped values.

use crate::parser::parse_documents;
use crate::{Error, LoadOptions, Result, Sequence, Value, Visitor};
use std::io::Read;
use std::ops::ControlFlow;
use std::path::Path;
use tracing::{debug, trace};

const BOM: char = '\u{feff}';

/// Load the first document in `content`.
///
/// Returns the fallback from `options` (default: [`Value::Null`]) when the
/// input holds no document.
///
/// # Example
///
/// ```rust
/// use yps::{load, LoadOptions, Value};
///
/// let value = load("name: Kanta\nage: 8\n", &LoadOptions::new()).unwrap();
/// let age = value.get("age").unwrap();
/// assert_eq!(age, Value::Int(8));
/// assert_eq!(age.position().unwrap().line(), 2);
/// ```
///
/// # Errors
///
/// Returns an error if the YAML is malformed or violates the options'
/// security policy.
pub fn load(content: &str, options: &LoadOptions) -> Result<Value> {
    load_first(content, options, options.filename.as_deref())
}

/// Load every document in `content`, as a (bare) sequence.
///
/// An input without documents yields an empty sequence, or the fallback from
/// `options` when one is set.
pub fn load_all(content: &str, options: &LoadOptions) -> Result<Value> {
    collect_all(content, options, options.filename.as_deref())
}

/// Load every document in `content` into a vector. Ignores the fallback.
pub fn load_documents(content: &str, options: &LoadOptions) -> Result<Vec<Value>> {
    load_each(content, options, options.filename.as_deref())
}

/// Like [`load`], reading UTF-8 from `reader`.
pub fn load_reader(reader: impl Read, options: &LoadOptions) -> Result<Value> {
    let content = read_to_string(reader, None)?;
    load(&content, options)
}

/// Like [`load_all`], reading UTF-8 from `reader`.
pub fn load_all_reader(reader: impl Read, options: &LoadOptions) -> Result<Value> {
    let content = read_to_string(reader, None)?;
    load_all(&content, options)
}

/// Like [`load`], reading the file at `path`. Positions carry `path` as filename.
pub fn load_file(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Value> {
    let path = path.as_ref();
    let content = read_file(path)?;
    load_first(&content, options, Some(&path.display().to_string()))
}

/// Like [`load_all`], reading the file at `path`.
pub fn load_all_file(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Value> {
    let path = path.as_ref();
    let content = read_file(path)?;
    collect_all(&content, options, Some(&path.display().to_string()))
}

fn load_first(content: &str, options: &LoadOptions, filename: Option<&str>) -> Result<Value> {
    debug!(filename, "loading first YAML document");
    let mut visitor = Visitor::new(options);
    let mut result = None;
    parse_documents(content, filename, |document| {
        result = Some(visitor.accept(&document)?);
        Ok(ControlFlow::Break(()))
    })?;

    Ok(match result {
        Some(value) => value,
        None => {
            debug!(filename, "no YAML document found, using fallback");
            options.fallback.clone().unwrap_or(Value::Null)
        }
    })
}

fn load_each(content: &str, options: &LoadOptions, filename: Option<&str>) -> Result<Vec<Value>> {
    debug!(filename, "loading YAML stream");
    let mut visitor = Visitor::new(options);
    let mut documents = Vec::new();
    parse_documents(content, filename, |document| {
        documents.push(visitor.accept(&document)?);
        trace!(index = documents.len() - 1, "loaded document");
        Ok(ControlFlow::Continue(()))
    })?;
    debug!(filename, count = documents.len(), "loaded YAML stream");
    Ok(documents)
}

fn collect_all(content: &str, options: &LoadOptions, filename: Option<&str>) -> Result<Value> {
    let documents = load_each(content, options, filename)?;
    if documents.is_empty() {
        if let Some(fallback) = &options.fallback {
            return Ok(fallback.clone());
        }
    }
    Ok(Value::Sequence(Sequence::from(documents)))
}

fn read_file(path: &Path) -> Result<String> {
    trace!(path = %path.display(), "opening YAML file");
    let file = std::fs::File::open(path).map_err(|source| Error::Io {
        path: Some(path.to_path_buf()),
        source,
    })?;
    read_to_string(file, Some(path))
}

/// Read UTF-8 text, dropping a leading byte-order mark.
fn read_to_string(mut reader: impl Read, path: Option<&Path>) -> Result<String> {
    let io_error = |source| Error::Io {
        path: path.map(Path::to_path_buf),
        source,
    };
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes).map_err(io_error)?;
    let mut content = String::from_utf8(bytes).map_err(|err| {
        io_error(std::io::Error::new(std::io::ErrorKind::InvalidData, err))
    })?;
    if content.starts_with(BOM) {
        content.drain(..BOM.len_utf8());
    }
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bom_is_stripped() {
        let content = read_to_string("\u{feff}a: 1".as_bytes(), None).unwrap();
        assert_eq!(content, "a: 1");
    }

    #[test]
    fn test_invalid_utf8_is_io_error() {
        let err = read_to_string(&[0xff, 0xfe, 0x00][..], None).unwrap_err();
        match err {
            Error::Io { source, .. } => assert_eq!(source.kind(), std::io::ErrorKind::InvalidData),
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_file() {
        let err = load_file("/nonexistent/definitely/missing.yaml", &LoadOptions::new()).unwrap_err();
        assert!(matches!(err, Error::Io { path: Some(_), .. }));
    }
}
