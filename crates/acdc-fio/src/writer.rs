//! Schema-driven deck writer.
//!
//! Output is laid out for people (aligned values, field names and
//! descriptions after each value) but the only contract is that
//! [`crate::read_str`] returns an equal document.

use std::fmt::Write as _;

use tracing::debug;

use crate::document::{Cell, Document, Row, Value};
use crate::error::SerializeError;
use crate::field::{Column, ColumnKind, FieldKind, FieldSpec, FileSpec};
use crate::options::WriteOptions;
use crate::token::quote;

pub fn write(doc: &Document, spec: &FileSpec) -> Result<String, SerializeError> {
    write_with(doc, spec, &WriteOptions::default())
}

/// Serialize `doc` in schema order. Nothing is returned unless every field
/// serializes.
pub fn write_with(
    doc: &Document,
    spec: &FileSpec,
    options: &WriteOptions,
) -> Result<String, SerializeError> {
    let mut out = String::new();

    for field in &spec.fields {
        match &field.kind {
            FieldKind::Heading => {
                push_line(&mut out, &heading_line(&field.desc, options.heading_width));
            }
            FieldKind::Title => {
                let text = text_value(doc, field)?;
                if text.contains(['\n', '\r']) {
                    return Err(SerializeError::Unquotable {
                        field: field.name.clone(),
                        text: text.to_string(),
                    });
                }
                // Verbatim, trailing whitespace included.
                out.push_str(text);
                out.push('\n');
            }
            FieldKind::String => {
                let text = text_value(doc, field)?;
                let token = quote(text, false).ok_or_else(|| SerializeError::Unquotable {
                    field: field.name.clone(),
                    text: text.to_string(),
                })?;
                push_line(&mut out, &scalar_line(&token, field, options));
            }
            FieldKind::Float | FieldKind::FloatDefault | FieldKind::Int => {
                let token = number_token(field, lookup(doc, &field.name)?)?;
                push_line(&mut out, &scalar_line(&token, field, options));
            }
            FieldKind::Paths { count, .. } => {
                let paths = match lookup(doc, &field.name)? {
                    Value::Paths(paths) => paths,
                    other => return Err(wrong_kind(field, other)),
                };
                check_count(doc, field, count, paths.len())?;
                for (i, path) in paths.iter().enumerate() {
                    let token = quote(path, true).ok_or_else(|| SerializeError::Unquotable {
                        field: field.name.clone(),
                        text: path.clone(),
                    })?;
                    if i == 0 {
                        push_line(&mut out, &scalar_line(&token, field, options));
                    } else {
                        push_line(&mut out, &token);
                    }
                }
            }
            FieldKind::Table {
                count,
                header_lines,
                columns,
            } => {
                let rows = match lookup(doc, &field.name)? {
                    Value::Table(rows) => rows,
                    other => return Err(wrong_kind(field, other)),
                };
                check_count(doc, field, count, rows.len())?;
                for i in 0..*header_lines {
                    push_line(&mut out, &table_header(columns, i, options.cell_width));
                }
                for (i, row) in rows.iter().enumerate() {
                    push_line(&mut out, &table_row(field, columns, i, row, options.cell_width)?);
                }
            }
        }
    }

    debug!(schema = %spec.name, bytes = out.len(), "wrote input deck");
    Ok(out)
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line.trim_end());
    out.push('\n');
}

fn lookup<'d>(doc: &'d Document, name: &str) -> Result<&'d Value, SerializeError> {
    doc.get(name).ok_or_else(|| SerializeError::MissingField {
        field: name.to_string(),
    })
}

fn wrong_kind(field: &FieldSpec, found: &Value) -> SerializeError {
    SerializeError::WrongValueKind {
        field: field.name.clone(),
        expected: field.kind.label(),
        found: found.kind_label(),
    }
}

fn text_value<'d>(doc: &'d Document, field: &FieldSpec) -> Result<&'d str, SerializeError> {
    match lookup(doc, &field.name)? {
        Value::Text(text) => Ok(text),
        other => Err(wrong_kind(field, other)),
    }
}

fn number_token(field: &FieldSpec, value: &Value) -> Result<String, SerializeError> {
    match (&field.kind, value) {
        (FieldKind::Float | FieldKind::FloatDefault, Value::Float(v)) => Ok(format_real(*v)),
        (FieldKind::FloatDefault, Value::Default) => Ok("default".to_string()),
        (FieldKind::Int, Value::Int(v)) => Ok(v.to_string()),
        (_, other) => Err(wrong_kind(field, other)),
    }
}

/// Shortest representation that parses back to the same bits; keeps a
/// decimal point or exponent so reals never look like integers.
fn format_real(v: f64) -> String {
    format!("{v:?}")
}

fn check_count(
    doc: &Document,
    field: &FieldSpec,
    reference: &str,
    actual: usize,
) -> Result<(), SerializeError> {
    let expected = match lookup(doc, reference)? {
        Value::Int(n) => *n,
        other => {
            return Err(SerializeError::WrongValueKind {
                field: reference.to_string(),
                expected: "integer",
                found: other.kind_label(),
            });
        }
    };
    if usize::try_from(expected).ok() != Some(actual) {
        return Err(SerializeError::RowCountMismatch {
            field: field.name.clone(),
            reference: reference.to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}

fn scalar_line(token: &str, field: &FieldSpec, options: &WriteOptions) -> String {
    if !options.descriptions {
        return token.to_string();
    }
    let mut line = format!("{token:<width$} {}", field.name, width = options.value_width);
    if !field.desc.is_empty() {
        let _ = write!(line, " - {}", field.desc);
    }
    if !field.unit.is_empty() {
        let _ = write!(line, " ({})", field.unit);
    }
    line
}

fn heading_line(desc: &str, width: usize) -> String {
    if desc.is_empty() {
        return "-".repeat(width.max(3));
    }
    format!("{:-<width$}", format!("------ {desc} "), width = width)
}

fn table_header(columns: &[Column], index: usize, width: usize) -> String {
    let cells: Vec<String> = columns
        .iter()
        .map(|c| match index {
            0 => format!("{:<width$}", c.name),
            1 => {
                let unit = if c.unit.is_empty() { "-" } else { c.unit.as_str() };
                format!("{:<width$}", format!("({unit})"))
            }
            _ => format!("{:<width$}", "---"),
        })
        .collect();
    cells.join(" ")
}

fn table_row(
    field: &FieldSpec,
    columns: &[Column],
    index: usize,
    row: &Row,
    width: usize,
) -> Result<String, SerializeError> {
    if row.len() != columns.len() {
        return Err(SerializeError::ColumnCountMismatch {
            field: field.name.clone(),
            row: index + 1,
            expected: columns.len(),
            found: row.len(),
        });
    }

    let mut cells = Vec::with_capacity(row.len());
    for (column, cell) in columns.iter().zip(row) {
        let token = match (column.kind, cell) {
            (ColumnKind::Float, Cell::Float(v)) => format_real(*v),
            (ColumnKind::Int, Cell::Int(v)) => v.to_string(),
            (ColumnKind::String, Cell::Text(text)) => {
                quote(text, false).ok_or_else(|| SerializeError::Unquotable {
                    field: format!("{}[{}]", field.name, column.name),
                    text: text.clone(),
                })?
            }
            (_, other) => {
                return Err(SerializeError::WrongValueKind {
                    field: format!("{}[{}]", field.name, column.name),
                    expected: column.kind.label(),
                    found: other.kind_label(),
                });
            }
        };
        cells.push(format!("{token:<width$}"));
    }
    Ok(cells.join(" "))
}
