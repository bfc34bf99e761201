/*
 * test_security.rs
 * Permitted types, permitted symbols and aliases.
 */

use yps::{AliasPosition, Error, LoadOptions, NativeType, Value, load};

const DATE_AND_SYMBOL: &str = "- 2025-09-28\n- :foo\n";

#[test]
fn test_dates_rejected_by_default() {
    let err = load(DATE_AND_SYMBOL, &LoadOptions::new()).unwrap_err();
    match &err {
        Error::DisallowedType {
            type_name,
            position,
        } => {
            assert_eq!(*type_name, NativeType::Date);
            assert_eq!((position.line(), position.column()), (1, 3));
        }
        other => panic!("expected DisallowedType, got {other:?}"),
    }
    assert_eq!(
        err.to_string(),
        "tried to load unspecified type: Date (filename: unknown line 1 column 3)"
    );
}

#[test]
fn test_symbols_need_their_own_permission() {
    let options = LoadOptions::new().permit_type(NativeType::Date);
    let err = load(DATE_AND_SYMBOL, &options).unwrap_err();
    assert!(matches!(
        err,
        Error::DisallowedType { type_name: NativeType::Symbol, ref position } if position.line() == 2
    ));
}

#[test]
fn test_permitted_types_load() {
    let options = LoadOptions::new().permit_types([NativeType::Date, NativeType::Symbol]);
    let value = load(DATE_AND_SYMBOL, &options).unwrap();
    let date = value.get_index(0).unwrap().as_date().unwrap();
    assert_eq!((date.year(), date.month(), date.day()), (2025, 9, 28));
    assert_eq!(value.get_index(1).unwrap().as_symbol().unwrap().as_str(), "foo");
}

#[test]
fn test_permitted_symbols() {
    let options = LoadOptions::permissive().permit_symbol("foo");
    assert!(load("- :foo\n", &options).is_ok());

    let err = load("- :foo\n- :bar\n", &options).unwrap_err();
    assert!(matches!(err, Error::DisallowedSymbol { ref symbol, .. } if symbol == "bar"));
    assert_eq!(
        err.to_string(),
        "tried to load unspecified symbol: :bar (filename: unknown line 2 column 3)"
    );
}

#[test]
fn test_binary_requires_permission() {
    let yaml = "!!binary aGVsbG8=";
    assert!(matches!(
        load(yaml, &LoadOptions::new()),
        Err(Error::DisallowedType { type_name: NativeType::Binary, .. })
    ));

    let value = load(yaml, &LoadOptions::new().permit_type(NativeType::Binary)).unwrap();
    assert_eq!(value, Value::Binary(b"hello".to_vec()));
}

#[test]
fn test_custom_tag_requires_permission() {
    let yaml = "origin: !point {x: 1, y: 2}\n";
    let err = load(yaml, &LoadOptions::new()).unwrap_err();
    assert!(matches!(err, Error::DisallowedType { type_name: NativeType::Custom(ref tag), .. } if tag == "!point"));

    let options = LoadOptions::new().permit_type(NativeType::custom("!point"));
    let value = load(yaml, &options).unwrap();
    let point = value.get("origin").unwrap().as_tagged().unwrap();
    assert_eq!(point.tag.to_string(), "!point");
    assert_eq!(point.value.get("x"), Some(Value::Int(1)));
}

#[test]
fn test_core_tags_force_types() {
    let value = load("a: !!str 42\nb: !!float 3\n", &LoadOptions::new()).unwrap();
    assert_eq!(value.get("a").unwrap(), Value::from("42"));
    assert_eq!(value.get("b").unwrap(), Value::Float(3.0));
}

#[test]
fn test_timestamp_tag_is_date_only() {
    let options = LoadOptions::new().permit_type(NativeType::Date);
    let value = load("!!timestamp 2025-09-28", &options).unwrap();
    assert_eq!(value.as_date().unwrap().to_string(), "2025-09-28");

    let err = load("!!timestamp 2025-09-28T10:00:00Z", &options).unwrap_err();
    assert!(matches!(err, Error::InvalidScalar { ref tag, .. } if tag == "!!timestamp"));
}

const ALIASED: &str = "- &a [foo, bar]\n- *a\n";

#[test]
fn test_aliases_disabled_by_default() {
    let err = load(ALIASED, &LoadOptions::new()).unwrap_err();
    match err {
        Error::AliasesDisabled { position } => assert_eq!(position.line(), 2),
        other => panic!("expected AliasesDisabled, got {other:?}"),
    }
}

#[test]
fn test_alias_shares_anchor_value() {
    let value = load(ALIASED, &LoadOptions::new().with_aliases(true)).unwrap();
    let anchored = value.get_index(0).unwrap();
    let alias = value.get_index(1).unwrap();

    assert_eq!(anchored, alias);
    assert_eq!(alias, Value::from(vec![Value::from("foo"), Value::from("bar")]));
    assert!(anchored.as_sequence().unwrap().ptr_eq(&alias.as_sequence().unwrap()));
    // The alias is the anchored value itself, position included.
    assert_eq!(alias.position().unwrap().line(), 1);
}

#[test]
fn test_alias_site_positions() {
    let options = LoadOptions::new()
        .with_aliases(true)
        .with_alias_position(AliasPosition::AliasSite);
    let value = load(ALIASED, &options).unwrap();
    let anchored = value.get_index(0).unwrap();
    let alias = value.get_index(1).unwrap();

    assert_eq!(anchored.position().unwrap().line(), 1);
    assert_eq!(alias.position().unwrap().line(), 2);
    assert!(anchored.as_sequence().unwrap().ptr_eq(&alias.as_sequence().unwrap()));
}

#[test]
fn test_self_referencing_sequence() {
    let value = load("&a [1, *a]", &LoadOptions::new().with_aliases(true)).unwrap();
    let outer = value.as_sequence().unwrap();
    let inner = outer.get(1).unwrap().as_sequence().unwrap();
    assert!(outer.ptr_eq(&inner));
}

#[test]
fn test_anchors_do_not_cross_documents() {
    let err = yps::load_all("- &a 1\n---\n- *a\n", &LoadOptions::new().with_aliases(true));
    assert!(err.is_err());
}

#[test]
fn test_mapping_used_as_its_own_key() {
    let value = load("&m\n*m : 1\n", &LoadOptions::new().with_aliases(true)).unwrap();
    let map = value.as_mapping().unwrap();
    assert_eq!(map.len(), 1);

    let (key, item) = map.to_vec().remove(0);
    assert!(key.as_mapping().unwrap().ptr_eq(&map));
    assert_eq!(item, Value::Int(1));
}

#[test]
fn test_self_referencing_sequence_as_key() {
    let value = load("? &s [*s]\n: 1\n", &LoadOptions::new().with_aliases(true)).unwrap();
    let map = value.as_mapping().unwrap();
    assert_eq!(map.len(), 1);

    let (key, item) = map.to_vec().remove(0);
    let seq = key.as_sequence().unwrap();
    assert!(seq.get(0).unwrap().as_sequence().unwrap().ptr_eq(&seq));
    assert_eq!(item, Value::Int(1));
    assert_eq!(map.get(&key), Some(item));
}
