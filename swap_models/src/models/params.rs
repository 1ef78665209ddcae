//! Loosely typed request parameters.
//!
//! Query strings and JSON bodies both arrive as a bag of optional fields whose
//! values may be strings, numbers or booleans. A field is absent when it is
//! missing, `null`, or an empty string; builders forward only present fields.

use std::collections::BTreeMap;

use error_stack::report;
use serde::{Serialize, Serializer};
use serde_json::{Number, Value};

use crate::error::{Error, ModelResult};

#[derive(Debug, Clone, PartialEq)]
pub enum LooseValue {
    Text(String),
    /// Kept as the exact JSON literal, however large.
    Number(Number),
    Bool(bool),
}

impl LooseValue {
    pub fn from_text(raw: &str) -> Option<Self> {
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self::Text(raw.to_string()))
        }
    }

    pub fn from_json(name: &str, raw: &Value) -> ModelResult<Option<Self>> {
        match raw {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Self::from_text(s)),
            Value::Number(n) => Ok(Some(Self::Number(n.clone()))),
            Value::Bool(b) => Ok(Some(Self::Bool(*b))),
            // Lists such as `excludedProtocols` travel comma separated.
            Value::Array(items) => {
                let mut parts = Vec::with_capacity(items.len());
                for item in items {
                    match Self::from_json(name, item)? {
                        Some(value) => parts.push(value.as_text()),
                        None => continue,
                    }
                }
                if parts.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(Self::Text(parts.join(","))))
                }
            }
            Value::Object(_) => Err(report!(Error::InvalidParameter(format!(
                "{name} must be a string, number or boolean"
            )))),
        }
    }

    pub fn as_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => n.to_string(),
            Self::Bool(b) => b.to_string(),
        }
    }
}

impl Serialize for LooseValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Text(s) => serializer.serialize_str(s),
            Self::Number(n) => n.serialize(serializer),
            Self::Bool(b) => serializer.serialize_bool(*b),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamBag {
    values: BTreeMap<String, LooseValue>,
}

impl ParamBag {
    pub fn from_query<I>(query: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        query
            .into_iter()
            .filter_map(|(name, raw)| LooseValue::from_text(&raw).map(|value| (name, value)))
            .collect()
    }

    /// Accepts a JSON object body; `null` is treated as an empty body.
    pub fn from_json(body: &Value) -> ModelResult<Self> {
        let map = match body {
            Value::Object(map) => map,
            Value::Null => return Ok(Self::default()),
            _ => {
                return Err(report!(Error::InvalidParameter(
                    "request body must be a JSON object".to_string()
                )));
            }
        };

        let mut values = BTreeMap::new();
        for (name, raw) in map {
            if let Some(value) = LooseValue::from_json(name, raw)? {
                values.insert(name.clone(), value);
            }
        }

        Ok(Self { values })
    }

    pub fn get(&self, name: &str) -> Option<&LooseValue> {
        self.values.get(name)
    }

    pub fn text(&self, name: &str) -> Option<String> {
        self.get(name).map(LooseValue::as_text)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Names from `required` that are absent, in the order given.
    pub fn missing<'a>(&self, required: &[&'a str]) -> Vec<&'a str> {
        required
            .iter()
            .copied()
            .filter(|name| !self.contains(name))
            .collect()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: LooseValue) {
        self.values.insert(name.into(), value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, LooseValue)> for ParamBag {
    fn from_iter<T: IntoIterator<Item = (String, LooseValue)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
