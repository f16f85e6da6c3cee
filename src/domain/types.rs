//! Shared domain types.
//!
//! These types are intentionally transient: a parse call builds them and hands
//! ownership to the caller. They serialize with `serde` so callers can:
//!
//! - turn records into CSV/JSON rows
//! - feed them into whatever table/frame type they use downstream

use std::fmt;

use chrono::NaiveDate;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Columns every observation record carries, in output order.
pub const FIXED_COLUMNS: [&str; 5] = ["date", "key", "value", "title", "description"];

/// Ordered name → value map used for series keys and series attributes.
///
/// Order is document order. Re-inserting an existing name replaces its value
/// but keeps the original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap {
    entries: Vec<(String, String)>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        let idx = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(idx).1)
    }

    /// Rename a field in place. If `to` already exists it is overwritten by
    /// the renamed value and the renamed field keeps its own position.
    pub fn rename(&mut self, from: &str, to: &str) {
        if from == to || !self.contains(from) {
            return;
        }
        self.entries.retain(|(n, _)| n != to);
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| n == from) {
            entry.0 = to.to_string();
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut map = FieldMap::new();
        for (name, value) in iter {
            map.insert(name, value);
        }
        map
    }
}

/// An observation period after frequency-dependent coercion.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum Period {
    /// Daily, business-daily and monthly periods (monthly uses the 1st).
    Date(NaiveDate),
    /// Annual periods.
    Year(i32),
    /// Semi-annual, quarterly, weekly and unknown frequencies, untouched.
    Raw(String),
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Period::Year(y) => write!(f, "{y}"),
            Period::Raw(s) => f.write_str(s),
        }
    }
}

/// A single dated value within a series.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub period: Period,
    /// `None` when the service sent an `ObsValue` without a usable number.
    pub value: Option<f64>,
}

/// One output row: a series' shared fields plus one observation.
///
/// Every record returned by a single parse call has the same `fields` names
/// in the same order, so the records form a rectangular table.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatRecord {
    pub date: Period,
    /// Series key values joined with `.`, e.g. `D.USD.EUR.SP00.A`.
    pub key: String,
    pub value: Option<f64>,
    pub title: String,
    pub description: Option<String>,
    /// Key dimensions and attributes common to every series in the response.
    pub fields: FieldMap,
}

impl FlatRecord {
    /// Column names in output order.
    pub fn column_names(&self) -> Vec<&str> {
        FIXED_COLUMNS
            .iter()
            .copied()
            .chain(self.fields.names())
            .collect()
    }

    /// Look up any column as text.
    pub fn text(&self, column: &str) -> Option<String> {
        match column {
            "date" => Some(self.date.to_string()),
            "key" => Some(self.key.clone()),
            "value" => self.value.map(|v| v.to_string()),
            "title" => Some(self.title.clone()),
            "description" => self.description.clone(),
            other => self.fields.get(other).map(str::to_string),
        }
    }
}

impl Serialize for FlatRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FIXED_COLUMNS.len() + self.fields.len()))?;
        map.serialize_entry("date", &self.date)?;
        map.serialize_entry("key", &self.key)?;
        map.serialize_entry("value", &self.value)?;
        map.serialize_entry("title", &self.title)?;
        map.serialize_entry("description", &self.description)?;
        for (name, value) in self.fields.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// One localized name of a structural artefact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MetadataEntry {
    pub agency: String,
    pub id: String,
    pub name: String,
}
