/*
 * test_positions.rs
 * Positions recorded for loaded values, with and without a filename.
 */

use pretty_assertions::assert_eq;
use yps::{LoadOptions, Position, Value, load, load_all};

const FAMILY: &str = "children:\n  - name: Kanta\n    age: 8\n";

fn line_col(value: &Value) -> (usize, usize) {
    let position = value.position().expect("value should be wrapped");
    (position.line(), position.column())
}

#[test]
fn test_nested_positions() {
    let root = load(FAMILY, &LoadOptions::new()).unwrap();
    assert_eq!(line_col(&root), (1, 1));

    let children = root.get("children").unwrap();
    assert_eq!(line_col(&children), (2, 3));

    let kanta = children.get_index(0).unwrap();
    assert_eq!(line_col(&kanta), (2, 5));

    let name = kanta.get("name").unwrap();
    assert_eq!(name, Value::from("Kanta"));
    assert_eq!(line_col(&name), (2, 11));

    let age = kanta.get("age").unwrap();
    assert_eq!(age, Value::Int(8));
    assert_eq!(line_col(&age), (3, 10));
}

#[test]
fn test_position_without_filename() {
    let root = load(FAMILY, &LoadOptions::new()).unwrap();
    let age = root.get("children").unwrap().get_index(0).unwrap().get("age").unwrap();
    let position = age.position().unwrap();
    assert_eq!(position.filename(), None);
    assert_eq!(position.to_string(), "filename: unknown line 3 column 10");
}

#[test]
fn test_position_with_filename() {
    let options = LoadOptions::new().with_filename("family.yaml");
    let root = load(FAMILY, &options).unwrap();
    let name = root.get("children").unwrap().get_index(0).unwrap().get("name").unwrap();
    assert_eq!(
        name.position().unwrap(),
        Position::new(Some("family.yaml".into()), 2, 11)
    );
    assert_eq!(
        name.position().unwrap().to_string(),
        "filename: family.yaml line 2 column 11"
    );
}

#[test]
fn test_mapping_keys_are_bare() {
    let root = load(FAMILY, &LoadOptions::new()).unwrap();
    let mapping = root.as_mapping().unwrap();
    let keys = mapping.keys();
    assert_eq!(keys, vec![Value::from("children")]);
    assert!(!keys[0].is_wrapped());
}

#[test]
fn test_wrapped_values_compare_like_bare_values() {
    let root = load("[1, two, 3.5, true, ~]", &LoadOptions::new()).unwrap();
    let items = root.as_sequence().unwrap().to_vec();
    assert!(items.iter().all(Value::is_wrapped));
    assert_eq!(
        items,
        vec![
            Value::Int(1),
            Value::from("two"),
            Value::Float(3.5),
            Value::Bool(true),
            Value::Null,
        ]
    );
}

#[test]
fn test_multi_document_positions() {
    let all = load_all("a: 1\n---\nb: 2\n", &LoadOptions::new()).unwrap();
    let documents = all.as_sequence().unwrap().to_vec();
    assert_eq!(documents.len(), 2);
    assert!(!all.is_wrapped());

    let b = documents[1].get("b").unwrap();
    assert_eq!(line_col(&b), (3, 4));
}

#[test]
fn test_duplicate_keys_last_wins() {
    let root = load("a: 1\na: 2\n", &LoadOptions::new()).unwrap();
    let a = root.get("a").unwrap();
    assert_eq!(a, Value::Int(2));
    assert_eq!(line_col(&a), (2, 4));
    assert_eq!(root.as_mapping().unwrap().len(), 1);
}

#[test]
fn test_quoted_scalars_stay_strings() {
    let root = load("a: '42'\nb: \"true\"\nc: 42\n", &LoadOptions::new()).unwrap();
    assert_eq!(root.get("a").unwrap(), Value::from("42"));
    assert_eq!(root.get("b").unwrap(), Value::from("true"));
    assert_eq!(root.get("c").unwrap(), Value::Int(42));
}
