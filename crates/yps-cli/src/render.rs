//! Text and JSON renderings of loaded values.
//!
//! Both renderings walk the value tree and stop at collections already on the
//! current path, so self-referencing structures print `<cycle>` instead of
//! recursing forever.

use anyhow::Result;
use serde_json::{Value as Json, json};
use std::io::{self, Write};
use yps::Value;

const CYCLE: &str = "<cycle>";

/// Collections on the path from the root to the value being rendered.
type Visiting = Vec<*const ()>;

/// Write one line per value: `line:column path: value`.
///
/// Values loaded without a position (see `LoadOptions::unwrap_type`) show
/// `-` as their location.
pub fn write_text(out: &mut impl Write, value: &Value) -> io::Result<()> {
    write_entry(out, "$", value, &mut Vec::new())
}

fn write_entry(
    out: &mut impl Write,
    path: &str,
    value: &Value,
    visiting: &mut Visiting,
) -> io::Result<()> {
    let location = value
        .position()
        .map_or_else(|| "-".to_string(), |p| format!("{}:{}", p.line(), p.column()));

    let (tag, content) = match value.unwrapped() {
        Value::Tagged(tagged) => (format!("{} ", tagged.tag), tagged.value.unwrapped()),
        other => (String::new(), other),
    };

    let (kind, pointer, children) = match &content {
        Value::Sequence(seq) => {
            let children: Vec<(String, Value)> = seq
                .to_vec()
                .into_iter()
                .enumerate()
                .map(|(index, item)| (format!("{path}[{index}]"), item))
                .collect();
            ("sequence", seq.as_ptr(), children)
        }
        Value::Mapping(map) => {
            let children = map
                .to_vec()
                .into_iter()
                .map(|(key, item)| (format!("{path}.{}", key_label(&key)), item))
                .collect();
            ("mapping", map.as_ptr(), children)
        }
        Value::String(s) => return writeln!(out, "{location:<7} {path}: {tag}{s:?}"),
        scalar => return writeln!(out, "{location:<7} {path}: {tag}{scalar}"),
    };

    if visiting.contains(&pointer) {
        return writeln!(out, "{location:<7} {path}: {tag}{CYCLE}");
    }
    writeln!(out, "{location:<7} {path}: {tag}{kind}")?;

    visiting.push(pointer);
    for (child_path, child) in &children {
        write_entry(out, child_path, child, visiting)?;
    }
    visiting.pop();
    Ok(())
}

/// Convert a value to JSON. Wrapped values become
/// `{"value": ..., "position": {"filename", "line", "column"}}`.
pub fn to_json(value: &Value) -> Result<Json> {
    json_value(value, &mut Vec::new())
}

fn json_value(value: &Value, visiting: &mut Visiting) -> Result<Json> {
    let Some(container) = value.container() else {
        return json_content(value, visiting);
    };
    let content = json_value(&container.value(), visiting)?;
    Ok(json!({
        "value": content,
        "position": serde_json::to_value(container.position())?,
    }))
}

fn json_content(value: &Value, visiting: &mut Visiting) -> Result<Json> {
    Ok(match value {
        Value::Null => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::Int(i) => Json::from(*i),
        Value::Float(x) => serde_json::Number::from_f64(*x)
            .map_or_else(|| Json::String(value.to_string()), Json::Number),
        Value::String(s) => Json::String(s.clone()),
        Value::Symbol(_) | Value::Date(_) | Value::Binary(_) => Json::String(value.to_string()),
        Value::Tagged(tagged) => json!({
            "tag": tagged.tag.to_string(),
            "value": json_value(&tagged.value, visiting)?,
        }),
        Value::Sequence(seq) => guarded(seq.as_ptr(), visiting, |visiting| {
            let items = seq
                .to_vec()
                .iter()
                .map(|item| json_value(item, visiting))
                .collect::<Result<Vec<_>>>()?;
            Ok(Json::Array(items))
        })?,
        Value::Mapping(map) => guarded(map.as_ptr(), visiting, |visiting| {
            let mut object = serde_json::Map::new();
            for (key, item) in map.to_vec() {
                object.insert(key_label(&key), json_value(&item, visiting)?);
            }
            Ok(Json::Object(object))
        })?,
        Value::Wrapped(_) => json_value(value, visiting)?,
    })
}

fn guarded(
    pointer: *const (),
    visiting: &mut Visiting,
    render: impl FnOnce(&mut Visiting) -> Result<Json>,
) -> Result<Json> {
    if visiting.contains(&pointer) {
        return Ok(Json::String(CYCLE.to_string()));
    }
    visiting.push(pointer);
    let result = render(visiting);
    visiting.pop();
    result
}

/// Mapping keys as text; symbols keep their leading colon.
fn key_label(key: &Value) -> String {
    match key.unwrapped() {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use yps::{LoadOptions, NativeType, load};

    fn text(yaml: &str, options: &LoadOptions) -> String {
        let value = load(yaml, options).unwrap();
        let mut out = Vec::new();
        write_text(&mut out, &value).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_text_lists_every_value() {
        let output = text("a: 1\nb: [x, 'y']\n", &LoadOptions::new());
        assert_eq!(
            output,
            "1:1     $: mapping\n\
             1:4     $.a: 1\n\
             2:4     $.b: sequence\n\
             2:5     $.b[0]: \"x\"\n\
             2:8     $.b[1]: \"y\"\n"
        );
    }

    #[test]
    fn test_text_marks_bare_values() {
        let options = LoadOptions::new().unwrap_type(NativeType::Int);
        let output = text("n: 3\n", &options);
        assert_eq!(output, "1:1     $: mapping\n-       $.n: 3\n");
    }

    #[test]
    fn test_text_stops_at_cycles() {
        let output = text("&a [1, *a]", &LoadOptions::new().with_aliases(true));
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[2].ends_with("$[1]: <cycle>"));
    }

    #[test]
    fn test_json_rendering() {
        let options = LoadOptions::new().with_filename("f.yaml");
        let value = load("name: Kanta\nage: 8\n", &options).unwrap();
        assert_eq!(
            to_json(&value).unwrap(),
            json!({
                "value": {
                    "age": {
                        "value": 8,
                        "position": {"filename": "f.yaml", "line": 2, "column": 6},
                    },
                    "name": {
                        "value": "Kanta",
                        "position": {"filename": "f.yaml", "line": 1, "column": 7},
                    },
                },
                "position": {"filename": "f.yaml", "line": 1, "column": 1},
            })
        );
    }

    #[test]
    fn test_json_special_scalars() {
        let options = LoadOptions::permissive().permit_type(NativeType::Date);
        let value = load("- .inf\n- :sym\n- 2025-09-28\n", &options).unwrap().unwrapped();
        let rendered = to_json(&value).unwrap();
        let values: Vec<Json> = rendered
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["value"].clone())
            .collect();
        assert_eq!(values, vec![json!(".inf"), json!(":sym"), json!("2025-09-28")]);
    }

    #[test]
    fn test_json_cycle() {
        let value = load("&a [1, *a]", &LoadOptions::new().with_aliases(true)).unwrap();
        let rendered = to_json(&value).unwrap();
        assert_eq!(rendered["value"][1]["value"], json!(CYCLE));
    }
}
