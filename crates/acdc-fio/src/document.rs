//! In-memory result of reading one input deck.

use std::collections::HashMap;

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

/// One typed table cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Float(f64),
    Int(i64),
    Text(String),
}

impl Cell {
    pub fn kind_label(&self) -> &'static str {
        match self {
            Cell::Float(_) => "float",
            Cell::Int(_) => "integer",
            Cell::Text(_) => "string",
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Float(v) => Some(*v),
            Cell::Int(v) => Some(*v as f64),
            Cell::Text(_) => None,
        }
    }
}

pub type Row = Vec<Cell>;

/// Value stored under one field name.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Float(f64),
    /// The literal `default` read into a float-or-default field.
    Default,
    Int(i64),
    Paths(Vec<String>),
    Table(Vec<Row>),
}

impl Value {
    pub fn kind_label(&self) -> &'static str {
        match self {
            Value::Text(_) => "text",
            Value::Float(_) => "float",
            Value::Default => "default sentinel",
            Value::Int(_) => "integer",
            Value::Paths(_) => "path list",
            Value::Table(_) => "table",
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, Value::Default)
    }

    pub fn as_paths(&self) -> Option<&[String]> {
        match self {
            Value::Paths(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&[Row]> {
        match self {
            Value::Table(v) => Some(v),
            _ => None,
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Text(v) => serializer.serialize_str(v),
            Value::Float(v) => serializer.serialize_f64(*v),
            Value::Default => serializer.serialize_str("default"),
            Value::Int(v) => serializer.serialize_i64(*v),
            Value::Paths(v) => v.serialize(serializer),
            Value::Table(v) => v.serialize(serializer),
        }
    }
}

/// Ordered field name → value mapping.
///
/// Insertion order is kept so a document lists fields in file order.
#[derive(Debug, Clone, Default)]
pub struct Document {
    entries: Vec<(String, Value)>,
    index: HashMap<String, usize>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value; replacing keeps the original position.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        if let Some(&pos) = self.index.get(&name) {
            self.entries[pos].1 = value;
            return;
        }
        self.index.insert(name.clone(), self.entries.len());
        self.entries.push((name, value));
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.index.get(name).map(|&pos| &self.entries[pos].1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl PartialEq for Document {
    /// Field-by-field equality; insertion order is not significant.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(name, value)| other.get(name) == Some(value))
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Document {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut doc = Document::new();
        for (name, value) in iter {
            doc.insert(name, value);
        }
        doc
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_keeps_first_position_on_replace() {
        let mut doc = Document::new();
        doc.insert("A", Value::Int(1));
        doc.insert("B", Value::Float(2.5));
        doc.insert("A", Value::Int(3));

        let names: Vec<&str> = doc.names().collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(doc.get("A"), Some(&Value::Int(3)));
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn equality_ignores_insertion_order() {
        let a: Document = [("X", Value::Default), ("Y", Value::Int(4))]
            .into_iter()
            .collect();
        let b: Document = [("Y", Value::Int(4)), ("X", Value::Default)]
            .into_iter()
            .collect();
        assert_eq!(a, b);

        let c: Document = [("Y", Value::Int(4))].into_iter().collect();
        assert_ne!(a, c);
    }

    #[test]
    fn serializes_to_ordered_json_object() {
        let doc: Document = [
            ("DTAero", Value::Default),
            ("NumFoil", Value::Int(1)),
            ("FoilNm", Value::Paths(vec!["foil.dat".to_string()])),
            (
                "Rows",
                Value::Table(vec![vec![
                    Cell::Float(1.5),
                    Cell::Int(2),
                    Cell::Text("NOPRINT".into()),
                ]]),
            ),
        ]
        .into_iter()
        .collect();

        let json = serde_json::to_string(&doc).expect("document serializes");
        assert_eq!(
            json,
            r#"{"DTAero":"default","NumFoil":1,"FoilNm":["foil.dat"],"Rows":[[1.5,2,"NOPRINT"]]}"#
        );
    }
}
