//! Raw prediction requests as submitted by a form or a JSON body

use serde_json::{Map, Number, Value};
use std::borrow::Cow;
use std::collections::HashMap;

/// One submitted field value
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Text(String),
    Number(Number),
    Null,
}

impl RawValue {
    /// Missing for vectorization purposes: JSON null or blank text
    pub fn is_blank(&self) -> bool {
        match self {
            RawValue::Null => true,
            RawValue::Text(text) => text.trim().is_empty(),
            RawValue::Number(_) => false,
        }
    }

    /// String form used for category lookup and error messages
    pub fn render(&self) -> Cow<'_, str> {
        match self {
            RawValue::Text(text) => Cow::Borrowed(text.as_str()),
            RawValue::Number(number) => Cow::Owned(number.to_string()),
            RawValue::Null => Cow::Borrowed("null"),
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        Number::from_f64(value).map_or(RawValue::Null, RawValue::Number)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Number(value.into())
    }
}

impl From<&Value> for RawValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => RawValue::Null,
            Value::String(text) => RawValue::Text(text.clone()),
            Value::Number(number) => RawValue::Number(number.clone()),
            other => RawValue::Text(other.to_string()),
        }
    }
}

/// Field name to raw value for a single prediction call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRequest {
    fields: HashMap<String, RawValue>,
}

impl RawRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from url-encoded form pairs; the first value of a repeated key wins
    pub fn from_form<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut request = Self::new();
        for (k, v) in pairs {
            request
                .fields
                .entry(k.into())
                .or_insert_with(|| RawValue::Text(v.into()));
        }
        request
    }

    pub fn from_json(object: &Map<String, Value>) -> Self {
        object
            .iter()
            .map(|(k, v)| (k.clone(), RawValue::from(v)))
            .collect()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<RawValue>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<RawValue> {
        self.fields.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&RawValue> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, RawValue)> for RawRequest {
    fn from_iter<I: IntoIterator<Item = (String, RawValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}
