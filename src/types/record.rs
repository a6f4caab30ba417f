use std::collections::HashMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single decoded field value
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum FieldValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    /// Parse a raw text token: integer first, then float, otherwise text
    pub fn parse(token: &str) -> Self {
        let token = token.trim();
        if let Ok(value) = token.parse::<i64>() {
            FieldValue::Int(value)
        } else if let Ok(value) = token.parse::<f64>() {
            FieldValue::Float(value)
        } else {
            FieldValue::Text(token.to_string())
        }
    }

    /// Numeric view of the value; `None` for text
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Int(v) => Some(*v as f64),
            FieldValue::Float(v) => Some(*v),
            FieldValue::Text(_) => None,
        }
    }

    /// Integer view, accepting floats with no fractional part
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Int(v) => Some(*v),
            FieldValue::Float(v) if v.fract() == 0.0 => Some(*v as i64),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(v) => write!(f, "{}", v),
            FieldValue::Float(v) => write!(f, "{}", v),
            FieldValue::Text(v) => write!(f, "{}", v),
        }
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Int(value as i64)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

/// Decoded telemetry record
///
/// `field_order` keeps the column order of the message definition so that
/// full-record rows and ASCII dumps come out in log order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Record {
    pub type_tag: String,
    pub timestamp_us: u64,
    pub field_order: Vec<String>,
    pub fields: HashMap<String, FieldValue>,
}

impl Record {
    pub fn new(type_tag: impl Into<String>, timestamp_us: u64) -> Self {
        Self {
            type_tag: type_tag.into(),
            timestamp_us,
            field_order: Vec::new(),
            fields: HashMap::new(),
        }
    }

    /// Builder-style field insertion, keeping first-insert order
    pub fn with_field(mut self, name: &str, value: impl Into<FieldValue>) -> Self {
        self.set(name, value.into());
        self
    }

    pub fn set(&mut self, name: &str, value: FieldValue) {
        if self.fields.insert(name.to_string(), value).is_none() {
            self.field_order.push(name.to_string());
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Numeric lookup, `None` when absent or non-numeric
    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.fields.get(name).and_then(FieldValue::as_f64)
    }

    pub fn is_type(&self, type_tag: &str) -> bool {
        self.type_tag == type_tag
    }

    /// Fields in definition order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.field_order
            .iter()
            .filter_map(|name| self.fields.get(name).map(|v| (name.as_str(), v)))
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{", self.type_tag)?;
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} : {}", name, value)?;
        }
        write!(f, "}}")
    }
}
