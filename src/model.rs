//! Record model: the user record and the partial-update payload.
//!
//! Field names here are the JSON contract. The HTTP and CLI layers bind
//! these types directly.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::{Result, UserDbError};

/// A persisted user.
///
/// `id` is assigned by the store on insert and is ignored by `create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
}

impl User {
    /// A record that has not been persisted yet.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

/// Partial update: only the fields present in `data` are written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPatch {
    pub id: String,
    #[serde(default)]
    pub data: BTreeMap<String, PatchValue>,
}

impl UserPatch {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            data: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn set(mut self, key: impl Into<String>, value: impl Into<PatchValue>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Build a patch from an untyped JSON object, rejecting values that are
    /// not text, number or boolean.
    pub fn from_json(id: impl Into<String>, data: JsonValue) -> Result<Self> {
        let JsonValue::Object(map) = data else {
            return Err(UserDbError::InvalidArgument(format!(
                "patch data must be a JSON object, got {}",
                json_kind(&data)
            )));
        };

        let mut patch = Self::new(id);
        for (key, value) in map {
            let value = PatchValue::try_from(value).map_err(|err| match err {
                UserDbError::InvalidArgument(reason) => {
                    UserDbError::InvalidArgument(format!("{key}: {reason}"))
                }
                other => other,
            })?;
            patch.data.insert(key, value);
        }
        Ok(patch)
    }
}

/// A single value in a partial update.
///
/// Closed over the shapes a JSON payload can carry for a scalar column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatchValue {
    Integer(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl TryFrom<JsonValue> for PatchValue {
    type Error = UserDbError;

    fn try_from(value: JsonValue) -> Result<Self> {
        match value {
            JsonValue::Bool(b) => Ok(Self::Bool(b)),
            JsonValue::String(s) => Ok(Self::Text(s)),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Self::Integer(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(Self::Float(f))
                } else {
                    Err(UserDbError::InvalidArgument(format!(
                        "number {n} is out of range"
                    )))
                }
            }
            other => Err(UserDbError::InvalidArgument(format!(
                "unsupported value type {}",
                json_kind(&other)
            ))),
        }
    }
}

impl From<i64> for PatchValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for PatchValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for PatchValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<String> for PatchValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for PatchValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Mutable columns of the `users` table. `id` is deliberately absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UserField {
    FirstName,
    LastName,
}

impl UserField {
    pub const ALL: [Self; 2] = [Self::FirstName, Self::LastName];

    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
        }
    }
}

impl FromStr for UserField {
    type Err = UserDbError;

    fn from_str(key: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.column() == key)
            .ok_or_else(|| {
                UserDbError::InvalidArgument(format!(
                    "unknown field {key:?} (expected one of: {})",
                    Self::ALL.map(Self::column).join(", ")
                ))
            })
    }
}

impl fmt::Display for UserField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

const fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
