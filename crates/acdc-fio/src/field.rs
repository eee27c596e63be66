//! Field descriptors: the schema side of an input deck.
//!
//! A [`FileSpec`] is an ordered list of [`FieldSpec`]s, one per logical line
//! group of the target file. Reader and writer interpret the list in order.

use std::collections::HashSet;

use crate::error::{LengthRefProblem, SchemaError};

/// Primitive type of a single table cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Float,
    Int,
    String,
}

impl ColumnKind {
    pub fn label(self) -> &'static str {
        match self {
            ColumnKind::Float => "float",
            ColumnKind::Int => "integer",
            ColumnKind::String => "string",
        }
    }
}

/// One positional column of a [`FieldKind::Table`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub unit: String,
}

impl Column {
    pub fn new(name: &str, kind: ColumnKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            unit: String::new(),
        }
    }

    pub fn float(name: &str) -> Self {
        Self::new(name, ColumnKind::Float)
    }

    pub fn int(name: &str) -> Self {
        Self::new(name, ColumnKind::Int)
    }

    pub fn string(name: &str) -> Self {
        Self::new(name, ColumnKind::String)
    }

    pub fn with_unit(mut self, unit: &str) -> Self {
        self.unit = unit.to_string();
        self
    }
}

/// How a field consumes lines and what it stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Separator/comment line. Consumes one line, stores nothing.
    Heading,
    /// Free text line stored verbatim.
    Title,
    /// First token of the line.
    String,
    Float,
    /// Float that also accepts the literal `default`.
    FloatDefault,
    Int,
    /// `count` lines, one path token each.
    Paths { count: String, role: String },
    /// `header_lines` skipped lines, then `count` rows typed by `columns`.
    Table {
        count: String,
        header_lines: usize,
        columns: Vec<Column>,
    },
}

impl FieldKind {
    pub fn label(&self) -> &'static str {
        match self {
            FieldKind::Heading => "heading",
            FieldKind::Title => "title",
            FieldKind::String => "string",
            FieldKind::Float => "float",
            FieldKind::FloatDefault => "float or \"default\"",
            FieldKind::Int => "integer",
            FieldKind::Paths { .. } => "path list",
            FieldKind::Table { .. } => "table",
        }
    }

    /// Whether the field stores a value in the document.
    pub fn is_stored(&self) -> bool {
        !matches!(self, FieldKind::Heading)
    }
}

/// One schema entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Unique within a [`FileSpec`]; empty for headings.
    pub name: String,
    pub kind: FieldKind,
    /// Informational only, never validated.
    pub unit: String,
    /// Reproduced after the value on write; ignored on read.
    pub desc: String,
}

impl FieldSpec {
    pub fn new(name: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            unit: String::new(),
            desc: String::new(),
        }
    }

    pub fn heading(desc: &str) -> Self {
        Self::new("", FieldKind::Heading).with_desc(desc)
    }

    pub fn title(name: &str) -> Self {
        Self::new(name, FieldKind::Title)
    }

    pub fn string(name: &str) -> Self {
        Self::new(name, FieldKind::String)
    }

    pub fn float(name: &str) -> Self {
        Self::new(name, FieldKind::Float)
    }

    pub fn float_default(name: &str) -> Self {
        Self::new(name, FieldKind::FloatDefault)
    }

    pub fn int(name: &str) -> Self {
        Self::new(name, FieldKind::Int)
    }

    pub fn paths(name: &str, count: &str, role: &str) -> Self {
        Self::new(
            name,
            FieldKind::Paths {
                count: count.to_string(),
                role: role.to_string(),
            },
        )
    }

    pub fn table(name: &str, count: &str, header_lines: usize, columns: Vec<Column>) -> Self {
        Self::new(
            name,
            FieldKind::Table {
                count: count.to_string(),
                header_lines,
                columns,
            },
        )
    }

    pub fn with_desc(mut self, desc: &str) -> Self {
        self.desc = desc.to_string();
        self
    }

    pub fn with_unit(mut self, unit: &str) -> Self {
        self.unit = unit.to_string();
        self
    }

    /// Name of the integer field that sizes this one, if any.
    pub fn length_ref(&self) -> Option<&str> {
        match &self.kind {
            FieldKind::Paths { count, .. } | FieldKind::Table { count, .. } => Some(count),
            _ => None,
        }
    }

    /// Human-readable identifier for diagnostics; headings have no name.
    pub fn label(&self) -> String {
        if self.name.is_empty() {
            format!("<{}: {}>", self.kind.label(), self.desc)
        } else {
            self.name.clone()
        }
    }
}

/// Ordered schema for one input file type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSpec {
    pub name: String,
    pub fields: Vec<FieldSpec>,
}

impl FileSpec {
    pub fn new(name: &str, fields: Vec<FieldSpec>) -> Self {
        Self {
            name: name.to_string(),
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.kind.is_stored() && f.name == name)
    }

    /// Static consistency check: unique names, and every length reference
    /// points at an earlier `Int` field.
    ///
    /// The reader does not require this to pass; it reports the same length
    /// reference problems lazily when it reaches the offending field.
    pub fn validate(&self) -> Result<(), SchemaError> {
        let mut seen = HashSet::<&str>::new();
        for field in &self.fields {
            if let Some(reference) = field.length_ref() {
                let problem = match self.position_of(reference) {
                    None => Some(LengthRefProblem::Undeclared),
                    Some(_) if !seen.contains(reference) => Some(LengthRefProblem::DeclaredLater),
                    Some(pos) if self.fields[pos].kind != FieldKind::Int => {
                        Some(LengthRefProblem::NotAnInteger)
                    }
                    Some(_) => None,
                };
                if let Some(problem) = problem {
                    return Err(SchemaError::LengthReference {
                        field: field.label(),
                        reference: reference.to_string(),
                        problem,
                    });
                }
            }

            if !field.kind.is_stored() {
                continue;
            }
            if field.name.is_empty() {
                return Err(SchemaError::UnnamedField {
                    kind: field.kind.label(),
                });
            }
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    field: field.name.clone(),
                });
            }
        }
        Ok(())
    }

    fn position_of(&self, name: &str) -> Option<usize> {
        self.fields
            .iter()
            .position(|f| f.kind.is_stored() && f.name == name)
    }
}
