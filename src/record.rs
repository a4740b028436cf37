//! Tabular record model
//!
//! A [`Record`] is one parsed spreadsheet row: a mapping from column name to a
//! scalar [`CellValue`]. Records are read-only inputs; the matching engine only
//! ever builds new records from them.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::fmt;

/// A single scalar cell
///
/// Deserializes from plain JSON scalars: `null`, booleans, numbers and strings.
/// Numbers keep their JSON form, so integers serialize back as integers and
/// 64-bit IDs stay exact.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Canonical string form of a present value, `None` for null
    ///
    /// Integral numbers render without a fractional part (`1`, not `1.0`).
    pub fn canonical(&self) -> Option<String> {
        match self {
            CellValue::Null => None,
            CellValue::Bool(b) => Some(b.to_string()),
            CellValue::Number(n) => Some(canonical_number(n)),
            CellValue::Text(s) => Some(s.clone()),
        }
    }
}

/// Integers print as-is; floats print in shortest form, dropping a zero fraction
fn canonical_number(n: &Number) -> String {
    if n.is_f64() {
        n.as_f64().map_or_else(|| n.to_string(), |f| f.to_string())
    } else {
        n.to_string()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Number(n) => f.write_str(&canonical_number(n)),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

/// Non-finite floats have no JSON form and become null
impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        Number::from_f64(n).map_or(CellValue::Null, CellValue::Number)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n.into())
    }
}

impl From<u64> for CellValue {
    fn from(n: u64) -> Self {
        CellValue::Number(n.into())
    }
}

impl From<usize> for CellValue {
    fn from(n: usize) -> Self {
        CellValue::Number(n.into())
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(CellValue::Null, Into::into)
    }
}

/// One row of tabular input
///
/// Column order is irrelevant; a missing column reads the same as a null cell.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    pub fields: AHashMap<String, CellValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field setter
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.fields.insert(column.into(), value.into());
        self
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.fields.get(column)
    }

    /// Cell at `column`, treating a missing column as null
    pub fn value(&self, column: &str) -> &CellValue {
        static NULL: CellValue = CellValue::Null;
        self.fields.get(column).unwrap_or(&NULL)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.fields.contains_key(column)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Copy of this record with extra derived fields; `self` is left untouched.
    #[must_use]
    pub fn extended<I, K>(&self, extra: I) -> Record
    where
        I: IntoIterator<Item = (K, CellValue)>,
        K: Into<String>,
    {
        let mut fields = self.fields.clone();
        fields.extend(extra.into_iter().map(|(k, v)| (k.into(), v)));
        Record { fields }
    }

    /// Pick a subset of columns; absent columns come back as null.
    pub fn project(&self, columns: &[String]) -> AHashMap<String, CellValue> {
        columns
            .iter()
            .map(|c| (c.clone(), self.value(c).clone()))
            .collect()
    }
}

impl<K: Into<String>, V: Into<CellValue>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Record {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}
