//! Scalar type resolution.
//!
//! Plain scalars are typed by their content (YAML 1.1 style, as most
//! configuration files expect); quoted and block scalars are always strings.
//! Core tags (`!!int`, `!!str`, ...) force a type instead.

use crate::node::{Scalar, ScalarStyle};
use crate::policy::NativeType;
use crate::value::Date;
use base64::Engine as _;

/// The value a scalar resolves to, before any security check.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Date(Date),
    /// Symbol name without the leading colon.
    Symbol(String),
    Binary(Vec<u8>),
}

impl Resolved {
    pub fn native_type(&self) -> NativeType {
        match self {
            Resolved::Null => NativeType::Null,
            Resolved::Bool(_) => NativeType::Bool,
            Resolved::Int(_) => NativeType::Int,
            Resolved::Float(_) => NativeType::Float,
            Resolved::String(_) => NativeType::String,
            Resolved::Date(_) => NativeType::Date,
            Resolved::Symbol(_) => NativeType::Symbol,
            Resolved::Binary(_) => NativeType::Binary,
        }
    }
}

/// Resolves scalar text to typed values.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScalarScanner {
    /// Reject `,` thousands separators in integers.
    pub strict_integer: bool,
}

impl ScalarScanner {
    pub fn new(strict_integer: bool) -> Self {
        Self { strict_integer }
    }

    /// Resolve an untagged scalar.
    pub fn tokenize(&self, scalar: &Scalar) -> Resolved {
        if scalar.style != ScalarStyle::Plain {
            return Resolved::String(scalar.value.clone());
        }
        let text = scalar.value.as_str();

        if let Some(resolved) = parse_null(text)
            .or_else(|| parse_bool(text).map(Resolved::Bool))
            .or_else(|| self.parse_int(text).map(Resolved::Int))
            .or_else(|| parse_float(text).map(Resolved::Float))
            .or_else(|| Date::parse(text).map(Resolved::Date))
            .or_else(|| parse_symbol(text).map(Resolved::Symbol))
        {
            return resolved;
        }
        Resolved::String(text.to_string())
    }

    /// Resolve a scalar under a core tag. `None` if the content does not fit.
    pub fn resolve_as(&self, ty: &NativeType, text: &str) -> Option<Resolved> {
        match ty {
            NativeType::String => Some(Resolved::String(text.to_string())),
            NativeType::Null => parse_null(text),
            NativeType::Bool => parse_bool(text).map(Resolved::Bool),
            NativeType::Int => self.parse_int(text).map(Resolved::Int),
            NativeType::Float => parse_float(text)
                .or_else(|| self.parse_int(text).map(|i| i as f64))
                .map(Resolved::Float),
            NativeType::Date => Date::parse(text.trim()).map(Resolved::Date),
            NativeType::Symbol => {
                let name = parse_symbol(text).unwrap_or_else(|| text.to_string());
                (!name.is_empty()).then_some(Resolved::Symbol(name))
            }
            NativeType::Binary => {
                let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
                base64::engine::general_purpose::STANDARD
                    .decode(compact)
                    .ok()
                    .map(Resolved::Binary)
            }
            NativeType::Sequence | NativeType::Mapping | NativeType::Custom(_) => None,
        }
    }

    fn parse_int(&self, text: &str) -> Option<i64> {
        let (negative, body) = match text.as_bytes().first()? {
            b'-' => (true, &text[1..]),
            b'+' => (false, &text[1..]),
            _ => (false, text),
        };
        let (radix, digits) = if let Some(rest) = body.strip_prefix("0x") {
            (16, rest)
        } else if let Some(rest) = body.strip_prefix("0o") {
            (8, rest)
        } else if let Some(rest) = body.strip_prefix("0b") {
            (2, rest)
        } else {
            (10, body)
        };

        if digits.is_empty() || digits.starts_with(['_', ',']) {
            return None;
        }
        let separators_ok = digits.chars().all(|c| {
            c.is_digit(radix) || c == '_' || (c == ',' && radix == 10 && !self.strict_integer)
        });
        if !separators_ok {
            return None;
        }
        let cleaned: String = digits.chars().filter(|c| *c != '_' && *c != ',').collect();
        let magnitude = i64::from_str_radix(&cleaned, radix).ok()?;
        Some(if negative { -magnitude } else { magnitude })
    }
}

fn parse_null(text: &str) -> Option<Resolved> {
    matches!(text, "" | "~" | "null" | "Null" | "NULL").then_some(Resolved::Null)
}

fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "true" | "True" | "TRUE" | "yes" | "Yes" | "YES" | "on" | "On" | "ON" => Some(true),
        "false" | "False" | "FALSE" | "no" | "No" | "NO" | "off" | "Off" | "OFF" => Some(false),
        _ => None,
    }
}

fn parse_float(text: &str) -> Option<f64> {
    match text {
        ".inf" | ".Inf" | ".INF" | "+.inf" | "+.Inf" | "+.INF" => return Some(f64::INFINITY),
        "-.inf" | "-.Inf" | "-.INF" => return Some(f64::NEG_INFINITY),
        ".nan" | ".NaN" | ".NAN" => return Some(f64::NAN),
        _ => {}
    }
    // Require a fraction or exponent so plain integers and words stay out.
    let body = text.trim_start_matches(['-', '+']);
    let has_marker = body.contains('.') || body.contains(['e', 'E']);
    if !has_marker || !body.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return None;
    }
    if !body
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '-' | '+' | '_'))
    {
        return None;
    }
    let cleaned: String = text.chars().filter(|c| *c != '_').collect();
    cleaned.parse::<f64>().ok()
}

/// `:foo` → `foo`; `:"foo bar"` → `foo bar`.
fn parse_symbol(text: &str) -> Option<String> {
    let name = text.strip_prefix(':')?;
    if name.is_empty() {
        return None;
    }
    for quote in ['"', '\''] {
        if name.len() >= 2 && name.starts_with(quote) && name.ends_with(quote) {
            return Some(name[1..name.len() - 1].to_string());
        }
    }
    Some(name.to_string())
}
