//! Tool handlers, one module per FortiGate entity.
//!
//! Each handler validates its input, makes at most one [`CmdbApi`] call and
//! shapes the answer. Handlers return [`fortigate_core::Result`]; the server
//! turns failures into the uniform error response.

pub mod address_objects;
pub mod interfaces;
pub mod policies;
pub mod service_groups;
pub mod service_objects;
pub mod static_routes;
pub mod traffic_logs;

use fortigate_cmdb::{CmdbApi, CmdbTable, Fields};
use fortigate_core::{Error, Result};
use serde_json::{Map, Value};
use std::str::FromStr;

/// Take a tool argument that must be a JSON object.
pub(crate) fn object_param(value: Value, param: &str) -> Result<Fields> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Err(Error::InvalidInput(format!("'{param}' is required"))),
        other => Err(Error::InvalidInput(format!(
            "'{param}' must be an object, got {other}"
        ))),
    }
}

/// Take a required numeric key such as a policy ID.
///
/// Both `7` and `"7"` are accepted; anything else is invalid input.
pub(crate) fn key_param<T>(value: &Value, param: &str) -> Result<T>
where
    T: FromStr<Err = Error>,
{
    match value {
        Value::Null => Err(Error::InvalidInput(format!("'{param}' is required"))),
        Value::Number(number) => number.to_string().parse(),
        Value::String(text) => text.parse(),
        other => Err(Error::InvalidInput(format!(
            "'{param}' must be an integer, got {other}"
        ))),
    }
}

/// Like [`key_param`], but a missing or blank value means "all entries".
pub(crate) fn optional_key_param<T>(value: &Value, param: &str) -> Result<Option<T>>
where
    T: FromStr<Err = Error>,
{
    match value {
        Value::Null => Ok(None),
        Value::String(text) if text.trim().is_empty() => Ok(None),
        other => key_param(other, param).map(Some),
    }
}

/// Take an optional entry name.
pub(crate) fn name_param(value: &Value, param: &str) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(name) => Ok(Some(name.clone())),
        other => Err(Error::InvalidInput(format!(
            "'{param}' must be a string, got {other}"
        ))),
    }
}

/// Take a required text argument.
pub(crate) fn text_param(value: &Value, param: &str) -> Result<String> {
    match value {
        Value::String(text) => Ok(text.clone()),
        Value::Null => Err(Error::InvalidInput(format!("'{param}' is required"))),
        other => Err(Error::InvalidInput(format!(
            "'{param}' must be a string, got {other}"
        ))),
    }
}

/// Fetch one entry when a key is given, the whole table otherwise.
///
/// The answer is wrapped as `{singular: entry}` or `{plural: [entries]}`.
pub(crate) async fn get_or_list(
    api: &dyn CmdbApi,
    table: CmdbTable,
    key: Option<&str>,
    singular: &str,
    plural: &str,
) -> Result<Value> {
    let mut body = Map::new();
    match key.map(str::trim).filter(|k| !k.is_empty()) {
        Some(key) => {
            body.insert(singular.to_string(), api.get(table, key).await?);
        }
        None => {
            body.insert(plural.to_string(), Value::Array(api.list(table).await?));
        }
    }
    Ok(Value::Object(body))
}

/// Point out a probable duplicate when creation fails.
pub(crate) fn creation_error(err: Error, table: CmdbTable, name: &str) -> Error {
    if !err.is_already_exists() {
        return err;
    }
    match err {
        Error::RemoteApi {
            status,
            message,
            details,
        } => Error::RemoteApi {
            status,
            message: format!(
                "failed to create {} '{name}', it may already exist: {message}",
                table.display_name()
            ),
            details,
        },
        other => other,
    }
}

/// Success mapping for a created entry.
pub(crate) fn created(table: CmdbTable, name: &str, key_field: &str, key: Value, details: Value) -> Value {
    let mut body = Map::new();
    body.insert("status".into(), Value::String("success".into()));
    body.insert(
        "message".into(),
        Value::String(format!("{} '{name}' created successfully.", capitalize(table.display_name()))),
    );
    body.insert(key_field.to_string(), key);
    body.insert("details".into(), details);
    Value::Object(body)
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Primary key the device assigned, taken from the write envelope.
pub(crate) fn mkey_of(envelope: &Value) -> Value {
    envelope.get("mkey").cloned().unwrap_or(Value::Null)
}

/// Key of a name-keyed entry; falls back to the requested name.
pub(crate) fn name_key(envelope: &Value, name: &str) -> Value {
    match mkey_of(envelope) {
        Value::Null => Value::String(name.to_string()),
        mkey => mkey,
    }
}
