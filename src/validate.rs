//! Validate and coerce values against a type model.
//!
//! Validation fails fast: the first violation found in a depth-first walk is
//! returned as a [`ValidationError`] carrying the dotted member path of the
//! offending node. Successful validation returns a new value with lenient inputs
//! coerced (numeric and boolean strings, ISO dates, UUID strings).

use crate::ast::*;
use crate::lint::{is_circular_typedef, lint};
use crate::type_model::type_model;
use crate::value::{Key, Map, Value};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use thiserror::Error;
use uuid::Uuid;

const MAX_VALUE_TEXT: usize = 1000;
const MAX_MEMBER_TEXT: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
    /// Dotted path of the offending member (`a.1.b`), when the error is about a value.
    pub member: Option<String>,
}

impl ValidationError {
    fn new(message: impl Into<String>, member: Option<String>) -> Self {
        Self {
            message: message.into(),
            member,
        }
    }
}

/// Validate `value` against the user type `type_name`, returning the coerced value.
pub fn validate_type(types: &Types, type_name: &str, value: &Value) -> Result<Value, ValidationError> {
    if !types.contains_key(type_name) {
        return Err(ValidationError::new(format!("Unknown type '{type_name}'"), None));
    }
    tracing::trace!(type_name, "validating value");
    Validator { types }.validate(&TypeRef::User(type_name.to_string()), value, None)
}

/// Validate a `{title, types}` type model value: its shape against the bootstrap
/// model, then the static type model checks.
pub fn validate_type_model(value: &Value) -> Result<TypeModel, ValidationError> {
    let validated = validate_type(&type_model().types, "TypeModel", value)?;
    let model: TypeModel = decode(&validated)?;
    check_types(&model.types)?;
    Ok(model)
}

/// Like [`validate_type_model`] for a bare map of type name to user type.
pub fn validate_type_model_types(value: &Value) -> Result<Types, ValidationError> {
    let validated = validate_type(&type_model().types, "Types", value)?;
    let types: Types = decode(&validated)?;
    check_types(&types)?;
    Ok(types)
}

fn decode<T: serde::de::DeserializeOwned>(value: &Value) -> Result<T, ValidationError> {
    serde_json::from_value(value.to_json()).map_err(|err| ValidationError::new(err.to_string(), None))
}

fn check_types(types: &Types) -> Result<(), ValidationError> {
    let mut messages = lint(types);
    if messages.is_empty() {
        return Ok(());
    }
    messages.sort_by(|a, b| (&a.type_name, &a.member, &a.message).cmp(&(&b.type_name, &b.member, &b.message)));
    let text = messages
        .iter()
        .map(|m| m.message.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    Err(ValidationError::new(text, None))
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

fn join_path(path: Option<&str>, segment: &str) -> String {
    match path {
        Some(path) => format!("{path}.{segment}"),
        None => segment.to_string(),
    }
}

/// `Invalid value <value> (type '<observed>')[ for member '<path>'], expected type '<type>'[ [<attr>]]`
fn member_error(ty: &TypeRef, value: &Value, path: Option<&str>, attr: Option<String>) -> ValidationError {
    let text = value.to_string();
    let member_part = path.map(|p| format!(" for member '{p}'")).unwrap_or_default();
    let attr_part = attr.map(|a| format!(" [{a}]")).unwrap_or_default();
    ValidationError::new(
        format!(
            "Invalid value {} (type '{}'){}, expected type '{}'{}",
            truncate(&text, MAX_VALUE_TEXT),
            value.type_name(),
            member_part,
            ty.type_name(),
            attr_part
        ),
        path.map(str::to_string),
    )
}

fn is_nullable(attr: Option<&Attributes>) -> bool {
    attr.is_some_and(|a| a.nullable)
}

/// Apply attribute checks to an already type-validated value.
fn check_attr(ty: &TypeRef, attr: Option<&Attributes>, value: &Value, path: Option<&str>) -> Result<(), ValidationError> {
    if value.is_null() {
        if !is_nullable(attr) {
            return Err(member_error(ty, value, path, None));
        }
        return Ok(());
    }
    let Some(attr) = attr else {
        return Ok(());
    };
    for (key, bound) in attr.constraints() {
        let lhs = if key.is_length() {
            value.len().map(|len| len as f64)
        } else {
            value.as_f64()
        };
        if !lhs.is_some_and(|lhs| key.holds(lhs, bound)) {
            return Err(member_error(ty, value, path, Some(key.describe(bound))));
        }
    }
    Ok(())
}

struct Validator<'t> {
    types: &'t Types,
}

impl<'t> Validator<'t> {
    fn validate(&self, ty: &TypeRef, value: &Value, path: Option<&str>) -> Result<Value, ValidationError> {
        match ty {
            TypeRef::Builtin(builtin) => validate_builtin(*builtin, ty, value, path),
            TypeRef::Array(array) => self.validate_array(ty, array, value, path),
            TypeRef::Dict(dict) => self.validate_dict(ty, dict, value, path),
            TypeRef::User(name) => match self.types.get(name) {
                Some(UserType::Typedef(typedef)) => self.validate_typedef(ty, typedef, value, path),
                Some(UserType::Enum(e)) => self.validate_enum(ty, e, value, path),
                Some(UserType::Struct(s)) => self.validate_struct(ty, s, value, path),
                Some(UserType::Action(_)) | None => Err(member_error(ty, value, path, None)),
            },
        }
    }

    /// Validate a nullable-aware element: null (or `"null"` when nullable) stays null.
    fn validate_element(
        &self,
        ty: &TypeRef,
        attr: Option<&Attributes>,
        value: &Value,
        path: Option<&str>,
    ) -> Result<Value, ValidationError> {
        let element = if value.is_null() || (is_nullable(attr) && value.is_null_literal()) {
            Value::Null
        } else {
            self.validate(ty, value, path)?
        };
        check_attr(ty, attr, &element, path)?;
        Ok(element)
    }

    fn validate_array(
        &self,
        ty: &TypeRef,
        array: &ArrayType,
        value: &Value,
        path: Option<&str>,
    ) -> Result<Value, ValidationError> {
        let items: &[Value] = match value {
            Value::String(s) if s.is_empty() => &[],
            Value::Array(items) => items,
            _ => return Err(member_error(ty, value, path, None)),
        };
        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let item_path = join_path(path, &index.to_string());
                self.validate_element(&array.ty, array.attr.as_ref(), item, Some(&item_path))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array)
    }

    fn validate_dict(
        &self,
        ty: &TypeRef,
        dict: &DictType,
        value: &Value,
        path: Option<&str>,
    ) -> Result<Value, ValidationError> {
        let empty = Map::new();
        let map = match value {
            Value::String(s) if s.is_empty() => &empty,
            Value::Object(map) => map,
            _ => return Err(member_error(ty, value, path, None)),
        };
        let string_key = TypeRef::Builtin(BuiltinType::String);
        let key_type = dict.key_type.as_ref().unwrap_or(&string_key);
        let mut out = Map::with_capacity(map.len());
        for (key, item) in map {
            let key_value = match key {
                Key::Null => Value::Null,
                Key::String(s) => Value::String(s.clone()),
            };
            let key = match self.validate_element(key_type, dict.key_attr.as_ref(), &key_value, path)? {
                Value::Null => Key::Null,
                Value::String(s) => Key::String(s),
                other => Key::String(key_value_text(&other)),
            };
            let item_path = join_path(path, &key_value_text(&key_value));
            let item = self.validate_element(&dict.ty, dict.attr.as_ref(), item, Some(&item_path))?;
            out.insert(key, item);
        }
        Ok(Value::Object(out))
    }

    fn validate_typedef(
        &self,
        ty: &TypeRef,
        typedef: &Typedef,
        value: &Value,
        path: Option<&str>,
    ) -> Result<Value, ValidationError> {
        // An alias cycle has no target type to validate against
        if is_circular_typedef(self.types, typedef) {
            return Err(member_error(ty, value, path, None));
        }
        let attr = typedef.attr.as_ref();
        // A non-nullable typedef reports null against its target type
        let validated = if is_nullable(attr) && (value.is_null() || value.is_null_literal()) {
            Value::Null
        } else {
            self.validate(&typedef.ty, value, path)?
        };
        check_attr(ty, attr, &validated, path)?;
        Ok(validated)
    }

    fn validate_enum(&self, ty: &TypeRef, e: &Enum, value: &Value, path: Option<&str>) -> Result<Value, ValidationError> {
        let known = value
            .as_str()
            .is_some_and(|s| get_enum_values(self.types, e).iter().any(|v| v.name == s));
        if known {
            Ok(value.clone())
        } else {
            Err(member_error(ty, value, path, None))
        }
    }

    fn validate_struct(
        &self,
        ty: &TypeRef,
        s: &Struct,
        value: &Value,
        path: Option<&str>,
    ) -> Result<Value, ValidationError> {
        let empty = Map::new();
        let map = match value {
            Value::String(text) if text.is_empty() => &empty,
            Value::Object(map) => map,
            _ => return Err(member_error(ty, value, path, None)),
        };
        if s.union && map.len() != 1 {
            return Err(member_error(ty, value, path, None));
        }

        let members = get_struct_members(self.types, s);
        let mut out = Map::with_capacity(map.len());
        for member in &members {
            let member_path = join_path(path, &member.name);
            let key = Key::String(member.name.clone());
            let Some(member_value) = map.get(&key) else {
                if !member.optional && !s.union {
                    return Err(ValidationError::new(
                        format!("Required member '{member_path}' missing"),
                        None,
                    ));
                }
                continue;
            };
            let validated =
                self.validate_element(&member.ty, member.attr.as_ref(), member_value, Some(&member_path))?;
            out.insert(key, validated);
        }

        if out.len() != map.len() {
            let unknown = map
                .keys()
                .find(|key| !members.iter().any(|m| key.as_str() == Some(m.name.as_str())));
            if let Some(unknown) = unknown {
                let quoted = format!("'{}'", join_path(path, &unknown.to_string()));
                return Err(ValidationError::new(
                    format!("Unknown member {}", truncate(&quoted, MAX_MEMBER_TEXT)),
                    None,
                ));
            }
        }
        Ok(Value::Object(out))
    }
}

/// Text of a dict key, for paths and for keys coerced to non-string values.
fn key_value_text(key: &Value) -> String {
    match key.to_json() {
        serde_json::Value::String(s) => s,
        json => json.to_string(),
    }
}

fn validate_builtin(builtin: BuiltinType, ty: &TypeRef, value: &Value, path: Option<&str>) -> Result<Value, ValidationError> {
    let invalid = || member_error(ty, value, path, None);
    match builtin {
        BuiltinType::String => match value {
            Value::String(_) => Ok(value.clone()),
            _ => Err(invalid()),
        },
        BuiltinType::Int => match value {
            Value::Int(_) => Ok(value.clone()),
            Value::String(s) => s.trim().parse::<i64>().map(Value::Int).map_err(|_| invalid()),
            Value::Float(x) if x.is_finite() && x.fract() == 0.0 && x.abs() < i64::MAX as f64 => {
                Ok(Value::Int(*x as i64))
            }
            _ => Err(invalid()),
        },
        BuiltinType::Float => match value {
            Value::Float(_) => Ok(value.clone()),
            Value::Int(x) => Ok(Value::Float(*x as f64)),
            Value::String(s) => match s.trim().parse::<f64>() {
                Ok(x) if x.is_finite() => Ok(Value::Float(x)),
                _ => Err(invalid()),
            },
            _ => Err(invalid()),
        },
        BuiltinType::Bool => match value {
            Value::Bool(_) => Ok(value.clone()),
            Value::String(s) if s == "true" => Ok(Value::Bool(true)),
            Value::String(s) if s == "false" => Ok(Value::Bool(false)),
            _ => Err(invalid()),
        },
        BuiltinType::Date => match value {
            Value::Date(_) => Ok(value.clone()),
            Value::String(s) => parse_date(s).map(Value::Date).ok_or_else(invalid),
            _ => Err(invalid()),
        },
        BuiltinType::Datetime => match value {
            Value::Datetime(_) => Ok(value.clone()),
            Value::String(s) => parse_datetime(s).map(Value::Datetime).ok_or_else(invalid),
            _ => Err(invalid()),
        },
        BuiltinType::Uuid => match value {
            Value::Uuid(_) => Ok(value.clone()),
            Value::String(s) => Uuid::parse_str(s).map(Value::Uuid).map_err(|_| invalid()),
            _ => Err(invalid()),
        },
        BuiltinType::Object | BuiltinType::Any => Ok(value.clone()),
    }
}

const OFFSET_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
];

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// ISO 8601 date, or the date part of an ISO 8601 datetime.
fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_datetime(text).map(|dt| dt.date_naive()))
}

/// ISO 8601 datetime (or bare date at midnight). Without an offset the time is UTC.
fn parse_datetime(text: &str) -> Option<DateTime<FixedOffset>> {
    let text = match text.strip_suffix('Z').or_else(|| text.strip_suffix('z')) {
        Some(stripped) => format!("{stripped}+00:00"),
        None => text.to_string(),
    };
    if let Ok(dt) = DateTime::parse_from_rfc3339(&text) {
        return Some(dt);
    }
    if let Some(dt) = OFFSET_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(&text, format).ok())
    {
        return Some(dt);
    }
    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&text, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(&text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })?;
    let utc = FixedOffset::east_opt(0)?;
    Some(naive.and_local_timezone(utc).single()?)
}
