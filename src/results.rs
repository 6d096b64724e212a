//! Self-describing results tree returned by processors.
//!
//! A `Results` value is an ordered list of labelled entries. Values are
//! numeric or text scalars, lists, or nested groups, so a single renderer can
//! display any processor's output. Entries flagged `debug` carry diagnostic
//! annotations and are only shown at high verbosity.
//!
//! Non-finite floats serialize as the strings `"NaN"`, `"inf"` and `"-inf"`,
//! since JSON has no encoding for them.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Int(i64),
    Float(#[serde(with = "float_repr")] f64),
    Text(String),
    Bool(bool),
    List(Vec<Value>),
    Group(Results),
}

mod float_repr {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else if value.is_nan() {
            serializer.serialize_str("NaN")
        } else if value.is_sign_positive() {
            serializer.serialize_str("inf")
        } else {
            serializer.serialize_str("-inf")
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(v) => Ok(v),
            Repr::Text(text) => match text.as_str() {
                "NaN" => Ok(f64::NAN),
                "inf" => Ok(f64::INFINITY),
                "-inf" => Ok(f64::NEG_INFINITY),
                other => Err(D::Error::custom(format!("invalid float '{other}'"))),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub label: String,
    pub value: Value,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub debug: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Results {
    entries: Vec<Entry>,
}

impl Results {
    pub fn new() -> Self {
        Results::default()
    }

    /// Append a labelled value.
    pub fn with(mut self, label: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(label, value);
        self
    }

    /// Append a diagnostic value, shown only at debug verbosity.
    pub fn with_debug(mut self, label: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push_debug(label, value);
        self
    }

    pub fn push(&mut self, label: impl Into<String>, value: impl Into<Value>) {
        self.entries.push(Entry {
            label: label.into(),
            value: value.into(),
            debug: false,
        });
    }

    pub fn push_debug(&mut self, label: impl Into<String>, value: impl Into<Value>) {
        self.entries.push(Entry {
            label: label.into(),
            value: value.into(),
            debug: true,
        });
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// First entry with the given label.
    pub fn get(&self, label: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| &e.value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::Int(v as i64)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Results> for Value {
    fn from(v: Results) -> Self {
        Value::Group(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}
