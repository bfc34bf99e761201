/*
 * test_sources.rs
 * Loading from strings, readers and files gives the same values.
 */

use pretty_assertions::assert_eq;
use std::io::Write;
use yps::{
    Error, LoadOptions, Value, load, load_all_file, load_all_reader, load_file, load_reader,
};

const CONFIG: &str = "title: Report\nauthors:\n  - name: Kanta\n  - name: Mio\n";

fn temp_yaml(content: &[u8]) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".yaml")
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(content).expect("Failed to write temp file");
    file
}

#[test]
fn test_string_reader_and_file_agree() {
    let options = LoadOptions::new();
    let from_str = load(CONFIG, &options).unwrap();
    let from_reader = load_reader(CONFIG.as_bytes(), &options).unwrap();

    let file = temp_yaml(CONFIG.as_bytes());
    let from_file = load_file(file.path(), &options).unwrap();

    assert_eq!(from_str, from_reader);
    assert_eq!(from_str, from_file);

    let mio = |value: &Value| {
        value.get("authors").unwrap().get_index(1).unwrap().get("name").unwrap()
    };
    let (in_str, in_file) = (mio(&from_str).position().unwrap(), mio(&from_file).position().unwrap());
    assert_eq!((in_str.line(), in_str.column()), (in_file.line(), in_file.column()));
    assert_eq!((in_str.line(), in_str.column()), (4, 11));
}

#[test]
fn test_file_positions_carry_path() {
    let file = temp_yaml(CONFIG.as_bytes());
    let value = load_file(file.path(), &LoadOptions::new()).unwrap();
    let title = value.get("title").unwrap();
    let expected = file.path().display().to_string();
    assert_eq!(title.position().unwrap().filename(), Some(expected.as_str()));
}

#[test]
fn test_file_path_overrides_filename_option() {
    let file = temp_yaml(b"a: 1\n");
    let options = LoadOptions::new().with_filename("ignored.yaml");
    let value = load_file(file.path(), &options).unwrap();
    let position = value.get("a").unwrap().position().unwrap();
    assert_ne!(position.filename(), Some("ignored.yaml"));
}

#[test]
fn test_reader_uses_filename_option() {
    let options = LoadOptions::new().with_filename("stdin.yaml");
    let value = load_reader("a: 1\n".as_bytes(), &options).unwrap();
    assert_eq!(value.position().unwrap().filename(), Some("stdin.yaml"));
}

#[test]
fn test_byte_order_mark_is_skipped() {
    let file = temp_yaml("\u{feff}a: 1\n".as_bytes());
    let value = load_file(file.path(), &LoadOptions::new()).unwrap();
    assert_eq!(value.get("a").unwrap(), Value::Int(1));
    assert_eq!(value.get("a").unwrap().position().unwrap().column(), 4);

    let value = load_reader("\u{feff}b: 2\n".as_bytes(), &LoadOptions::new()).unwrap();
    assert_eq!(value.get("b").unwrap(), Value::Int(2));
}

#[test]
fn test_load_all_from_file_and_reader() {
    let yaml = "a: 1\n---\nb: 2\n";
    let file = temp_yaml(yaml.as_bytes());
    let from_file = load_all_file(file.path(), &LoadOptions::new()).unwrap();
    let from_reader = load_all_reader(yaml.as_bytes(), &LoadOptions::new()).unwrap();
    assert_eq!(from_file, from_reader);
    assert_eq!(from_file.as_sequence().unwrap().len(), 2);
}

#[test]
fn test_invalid_utf8_file() {
    let file = temp_yaml(&[b'a', b':', b' ', 0xff, b'\n']);
    let err = load_file(file.path(), &LoadOptions::new()).unwrap_err();
    match err {
        Error::Io { path, source } => {
            assert_eq!(path.as_deref(), Some(file.path()));
            assert_eq!(source.kind(), std::io::ErrorKind::InvalidData);
        }
        other => panic!("expected Io error, got {other:?}"),
    }
}

#[test]
fn test_syntax_error_reports_file() {
    let file = temp_yaml(b"key: [unclosed\n");
    let err = load_file(file.path(), &LoadOptions::new()).unwrap_err();
    assert!(matches!(err, Error::Syntax { .. }));
    let expected = file.path().display().to_string();
    assert_eq!(err.position().unwrap().filename(), Some(expected.as_str()));
}
