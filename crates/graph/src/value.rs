//! Values returned by read queries.
//!
//! A [`Row`] maps declared output names to [`Value`]s. Properties on nodes and
//! relationships inside a path witness use the narrower [`Property`] type.

use crate::error::{GraphError, Result};
use crate::witness::PathWitness;
use std::fmt;

/// A scalar property stored on a node or relationship
#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    Int(i64),
    Float(f64),
    Str(String),
}

impl Property {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Property::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Integers are widened, so a rating stored as `4` reads as `4.0`
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Property::Float(v) => Some(*v),
            Property::Int(v) => Some(*v as f64),
            Property::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Property::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Property::Int(v) => write!(f, "{}", v),
            Property::Float(v) => write!(f, "{}", v),
            Property::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Property {
    fn from(v: i64) -> Self {
        Property::Int(v)
    }
}

impl From<u32> for Property {
    fn from(v: u32) -> Self {
        Property::Int(i64::from(v))
    }
}

impl From<f64> for Property {
    fn from(v: f64) -> Self {
        Property::Float(v)
    }
}

impl From<f32> for Property {
    fn from(v: f32) -> Self {
        Property::Float(widen_rating(v))
    }
}

/// Widens an `f32` rating through its shortest decimal form, so 4.3 stays 4.3
pub fn widen_rating(v: f32) -> f64 {
    v.to_string().parse().unwrap_or_else(|_| f64::from(v))
}

impl From<&str> for Property {
    fn from(v: &str) -> Self {
        Property::Str(v.to_string())
    }
}

impl From<String> for Property {
    fn from(v: String) -> Self {
        Property::Str(v)
    }
}

/// A column value in a result row
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    StrList(Vec<String>),
    Paths(Vec<PathWitness>),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::StrList(_) => "list of string",
            Value::Paths(_) => "list of path",
        }
    }
}

/// One result row. Columns keep the order in which they were declared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<(String, Value)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column (builder pattern). A repeated name replaces the old value.
    pub fn with(mut self, name: &str, value: Value) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: Value) {
        match self.columns.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = value,
            None => self.columns.push((name.to_string(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    fn require(&self, name: &str) -> Result<&Value> {
        self.get(name)
            .ok_or_else(|| GraphError::MissingColumn(name.to_string()))
    }

    fn mismatch(name: &str, expected: &'static str, found: &Value) -> GraphError {
        GraphError::TypeMismatch {
            column: name.to_string(),
            expected,
            found: found.type_name(),
        }
    }

    pub fn int(&self, name: &str) -> Result<i64> {
        match self.require(name)? {
            Value::Int(v) => Ok(*v),
            other => Err(Self::mismatch(name, "integer", other)),
        }
    }

    /// Reads a float column; integer columns are widened
    pub fn float(&self, name: &str) -> Result<f64> {
        match self.require(name)? {
            Value::Float(v) => Ok(*v),
            Value::Int(v) => Ok(*v as f64),
            other => Err(Self::mismatch(name, "float", other)),
        }
    }

    pub fn str(&self, name: &str) -> Result<&str> {
        match self.require(name)? {
            Value::Str(s) => Ok(s),
            other => Err(Self::mismatch(name, "string", other)),
        }
    }

    pub fn str_list(&self, name: &str) -> Result<&[String]> {
        match self.require(name)? {
            Value::StrList(list) => Ok(list),
            other => Err(Self::mismatch(name, "list of string", other)),
        }
    }

    pub fn paths(&self, name: &str) -> Result<&[PathWitness]> {
        match self.require(name)? {
            Value::Paths(paths) => Ok(paths),
            other => Err(Self::mismatch(name, "list of path", other)),
        }
    }
}
