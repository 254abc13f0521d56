//! Format type models and validated values as JSON text.

use crate::ast::{TypeModel, Types};
use crate::value::Value;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

/// JSON layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DumpStyle {
    /// Four-space indented, one member per line.
    #[default]
    Pretty,
    /// No whitespace.
    Compact,
}

fn to_json_string<T: Serialize + ?Sized>(value: &T, style: DumpStyle) -> serde_json::Result<String> {
    match style {
        DumpStyle::Compact => serde_json::to_string(value),
        DumpStyle::Pretty => {
            let mut out = Vec::new();
            let mut serializer = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
            value.serialize(&mut serializer)?;
            // serde_json only writes valid UTF-8
            Ok(String::from_utf8_lossy(&out).into_owned())
        }
    }
}

/// `{"title": ..., "types": {...}}`
pub fn dump_type_model(model: &TypeModel, style: DumpStyle) -> serde_json::Result<String> {
    to_json_string(model, style)
}

/// Bare map of type name to user type.
pub fn dump_types(types: &Types, style: DumpStyle) -> serde_json::Result<String> {
    to_json_string(types, style)
}

/// JSON form of a validated value (see [`Value::to_json`]).
pub fn dump_value(value: &Value, style: DumpStyle) -> serde_json::Result<String> {
    to_json_string(&value.to_json(), style)
}
