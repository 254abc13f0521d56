//! Flatten values to URL query strings and back.
//!
//! Nested members are addressed with dotted keys (`b.c=1`), array items with their
//! index (`b.d.0=2`). Keys and values are percent-encoded. Decoded leaves are always
//! strings; pass the result through [`validate_type`](crate::validate_type) to
//! coerce them to a schema type.

use crate::value::{Key, Map, Value};
use thiserror::Error;

/// Longest key or pair text quoted in an error message.
const MAX_ERROR_TEXT: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryStringError {
    #[error("Invalid key/value pair '{0}'")]
    InvalidPair(String),
    #[error("Invalid array index '{index}' in key '{key}'")]
    InvalidIndex { index: String, key: String },
    #[error("Duplicate key '{0}'")]
    DuplicateKey(String),
}

/// Encode a value as a query string. Object members are sorted by key; empty
/// objects and arrays encode as `key=`. A scalar at the top level encodes as its
/// bare text (`null`, `true`, `5.1`).
pub fn encode_query_string(value: &Value) -> String {
    let mut pairs = Vec::new();
    encode_pairs(value, None, &mut pairs);
    pairs.join("&")
}

fn encode_pairs(value: &Value, parent: Option<&str>, pairs: &mut Vec<String>) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            let mut members: Vec<(String, &Value)> = map.iter().map(|(k, v)| (k.to_string(), v)).collect();
            members.sort_by(|a, b| a.0.cmp(&b.0));
            for (name, member) in members {
                let key = join_key(parent, &urlencoding::encode(&name));
                encode_pairs(member, Some(&key), pairs);
            }
        }
        Value::Array(items) if !items.is_empty() => {
            for (index, item) in items.iter().enumerate() {
                let key = join_key(parent, &index.to_string());
                encode_pairs(item, Some(&key), pairs);
            }
        }
        Value::Object(_) | Value::Array(_) => {
            if let Some(parent) = parent {
                pairs.push(format!("{parent}="));
            }
        }
        scalar => {
            let text = match scalar.to_json() {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            let text = urlencoding::encode(&text);
            pairs.push(match parent {
                Some(parent) => format!("{parent}={text}"),
                None => text.into_owned(),
            });
        }
    }
}

fn join_key(parent: Option<&str>, key: &str) -> String {
    match parent {
        Some(parent) => format!("{parent}.{key}"),
        None => key.to_string(),
    }
}

/// Decode a query string into nested objects and arrays of strings.
///
/// A key segment of `0` under a new container starts an array, and later indices
/// must extend it by one. Empty pairs are skipped, as is a trailing pair without
/// `=` (an anchor). The empty query string decodes to an empty object.
pub fn decode_query_string(query: &str) -> Result<Value, QueryStringError> {
    let mut root = Value::Null;
    let pairs: Vec<&str> = query.split('&').collect();
    for (position, pair) in pairs.iter().enumerate() {
        if pair.is_empty() {
            continue;
        }
        let parts: Vec<&str> = pair.split('=').collect();
        let [key_text, value_text] = parts.as_slice() else {
            if position == pairs.len() - 1 {
                continue;
            }
            return Err(QueryStringError::InvalidPair(truncate(pair)));
        };

        let mut slot = &mut root;
        for segment in key_text.split('.') {
            slot = descend(slot, &unquote(segment), key_text)?;
        }
        if !slot.is_null() {
            return Err(QueryStringError::DuplicateKey(truncate(key_text)));
        }
        *slot = Value::String(unquote(value_text));
    }
    tracing::trace!(pairs = pairs.len(), "decoded query string");
    Ok(match root {
        Value::Null => Value::Object(Map::new()),
        value => value,
    })
}

/// Step from a container slot to the slot for `key`, creating the container on
/// first use.
fn descend<'v>(slot: &'v mut Value, key: &str, key_text: &str) -> Result<&'v mut Value, QueryStringError> {
    if slot.is_null() {
        *slot = if key == "0" {
            Value::Array(Vec::new())
        } else {
            Value::Object(Map::new())
        };
    }
    match slot {
        Value::Array(items) => {
            let index = key
                .parse::<i64>()
                .ok()
                .and_then(|index| usize::try_from(index).ok())
                .filter(|&index| index <= items.len())
                .ok_or_else(|| QueryStringError::InvalidIndex {
                    index: truncate(key),
                    key: truncate(key_text),
                })?;
            if index == items.len() {
                items.push(Value::Null);
            }
            Ok(&mut items[index])
        }
        Value::Object(map) => Ok(map.entry(Key::from(key)).or_insert(Value::Null)),
        // A leaf was already set at this prefix
        _ => Err(QueryStringError::DuplicateKey(truncate(key_text))),
    }
}

/// Percent-decode; invalid UTF-8 sequences become U+FFFD.
fn unquote(text: &str) -> String {
    String::from_utf8_lossy(&urlencoding::decode_binary(text.as_bytes())).into_owned()
}

fn truncate(text: &str) -> String {
    text.chars().take(MAX_ERROR_TEXT).collect()
}
