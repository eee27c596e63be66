//! Schema-driven deck reader.
//!
//! Fields are consumed strictly in schema order from a forward-only line
//! cursor. Path lists and tables take their line count from an integer field
//! that must already be in the document being built; a missing or later
//! field is an error, never an implicit zero.
//!
//! Row and path blocks are fixed-length: blank or comment lines between rows
//! are not skipped and will be read as data.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::document::{Cell, Document, Row, Value};
use crate::error::{LengthRefProblem, ParseError};
use crate::field::{Column, ColumnKind, FieldKind, FieldSpec, FileSpec};
use crate::token::{first_token, leading_tokens};

pub fn read_file(path: impl AsRef<Path>, spec: &FileSpec) -> Result<Document, ParseError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|e| ParseError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    read_str(&raw, spec)
}

pub fn read_str(raw: &str, spec: &FileSpec) -> Result<Document, ParseError> {
    let lines: Vec<&str> = raw.lines().collect();
    read(&lines, spec)
}

/// Read `lines` against `spec`, returning the whole document or the first
/// error. Lines left over after the last field are ignored.
pub fn read<S: AsRef<str>>(lines: &[S], spec: &FileSpec) -> Result<Document, ParseError> {
    let mut cursor = Cursor { lines, pos: 0 };
    let mut doc = Document::new();

    for field in &spec.fields {
        match &field.kind {
            FieldKind::Heading => {
                let (line_no, line) = cursor.take(field)?;
                if line.trim().is_empty() {
                    warn!(
                        schema = %spec.name,
                        line = line_no,
                        "expected heading, found empty line"
                    );
                }
            }
            FieldKind::Title => {
                let (_, line) = cursor.take(field)?;
                doc.insert(&field.name, Value::Text(line.trim_end_matches('\r').to_string()));
            }
            FieldKind::String => {
                let (line_no, line) = cursor.take(field)?;
                let token = scalar_token(field, line_no, line)?;
                doc.insert(&field.name, Value::Text(token.to_string()));
            }
            FieldKind::Float | FieldKind::FloatDefault | FieldKind::Int => {
                let (line_no, line) = cursor.take(field)?;
                let token = scalar_token(field, line_no, line)?;
                let value = parse_number(&field.kind, token).ok_or_else(|| {
                    ParseError::TypeMismatch {
                        field: field.label(),
                        expected: field.kind.label(),
                        line: line_no,
                        raw: line.to_string(),
                    }
                })?;
                doc.insert(&field.name, value);
            }
            FieldKind::Paths { count, role } => {
                let n = resolve_count(&doc, spec, field, count)?;
                let mut paths = Vec::new();
                for _ in 0..n {
                    let (line_no, line) = cursor.take(field)?;
                    let token = match first_token(line) {
                        Ok(Some(token)) => token,
                        _ => {
                            return Err(ParseError::TypeMismatch {
                                field: field.label(),
                                expected: "path",
                                line: line_no,
                                raw: line.to_string(),
                            });
                        }
                    };
                    paths.push(token.to_string());
                }
                debug!(field = %field.name, role = %role, count = n, "read path list");
                doc.insert(&field.name, Value::Paths(paths));
            }
            FieldKind::Table {
                count,
                header_lines,
                columns,
            } => {
                let n = resolve_count(&doc, spec, field, count)?;
                for _ in 0..*header_lines {
                    cursor.take(field)?;
                }
                let mut rows = Vec::new();
                for _ in 0..n {
                    let (line_no, line) = cursor.take(field)?;
                    rows.push(parse_row(field, columns, line_no, line)?);
                }
                doc.insert(&field.name, Value::Table(rows));
            }
        }
    }

    debug!(
        schema = %spec.name,
        fields = doc.len(),
        lines = cursor.pos,
        "read input deck"
    );
    Ok(doc)
}

struct Cursor<'a, S> {
    lines: &'a [S],
    pos: usize,
}

impl<'a, S: AsRef<str>> Cursor<'a, S> {
    /// Next line with its 1-based number.
    fn take(&mut self, field: &FieldSpec) -> Result<(usize, &'a str), ParseError> {
        let line = self
            .lines
            .get(self.pos)
            .ok_or_else(|| ParseError::UnexpectedEndOfInput {
                field: field.label(),
                kind: field.kind.label(),
                line: self.pos + 1,
            })?;
        self.pos += 1;
        Ok((self.pos, line.as_ref()))
    }
}

fn scalar_token<'l>(
    field: &FieldSpec,
    line_no: usize,
    line: &'l str,
) -> Result<&'l str, ParseError> {
    match first_token(line) {
        Ok(Some(token)) => Ok(token),
        _ => Err(ParseError::TypeMismatch {
            field: field.label(),
            expected: field.kind.label(),
            line: line_no,
            raw: line.to_string(),
        }),
    }
}

fn parse_number(kind: &FieldKind, token: &str) -> Option<Value> {
    match kind {
        FieldKind::FloatDefault if token.eq_ignore_ascii_case("default") => Some(Value::Default),
        FieldKind::Float | FieldKind::FloatDefault => parse_real(token).map(Value::Float),
        FieldKind::Int => token.parse::<i64>().ok().map(Value::Int),
        _ => None,
    }
}

/// Parse a real, also accepting Fortran `D` exponents (`1.5D-3`).
pub(crate) fn parse_real(token: &str) -> Option<f64> {
    if let Ok(v) = token.parse::<f64>() {
        return Some(v);
    }
    if token.contains(['d', 'D']) {
        let swapped: String = token
            .chars()
            .map(|c| if c == 'd' || c == 'D' { 'e' } else { c })
            .collect();
        return swapped.parse::<f64>().ok();
    }
    None
}

fn parse_row(
    field: &FieldSpec,
    columns: &[Column],
    line_no: usize,
    line: &str,
) -> Result<Row, ParseError> {
    let mismatch = |column: &Column| ParseError::TypeMismatch {
        field: format!("{}[{}]", field.name, column.name),
        expected: column.kind.label(),
        line: line_no,
        raw: line.to_string(),
    };

    let tokens = match leading_tokens(line, columns.len()) {
        Ok(tokens) => tokens,
        Err(_) => {
            return Err(ParseError::TypeMismatch {
                field: field.label(),
                expected: "quoted string",
                line: line_no,
                raw: line.to_string(),
            });
        }
    };

    let mut row = Vec::with_capacity(columns.len());
    for (i, column) in columns.iter().enumerate() {
        let token = tokens.get(i).ok_or_else(|| mismatch(column))?;
        let cell = match column.kind {
            ColumnKind::Float => parse_real(token).map(Cell::Float),
            ColumnKind::Int => token.parse::<i64>().ok().map(Cell::Int),
            ColumnKind::String => Some(Cell::Text(token.to_string())),
        };
        row.push(cell.ok_or_else(|| mismatch(column))?);
    }
    Ok(row)
}

fn resolve_count(
    doc: &Document,
    spec: &FileSpec,
    field: &FieldSpec,
    reference: &str,
) -> Result<usize, ParseError> {
    let fail = |problem| ParseError::LengthReference {
        field: field.label(),
        reference: reference.to_string(),
        problem,
    };

    match doc.get(reference) {
        Some(Value::Int(n)) => {
            usize::try_from(*n).map_err(|_| fail(LengthRefProblem::Negative(*n)))
        }
        Some(_) => Err(fail(LengthRefProblem::NotAnInteger)),
        None if spec.field(reference).is_some() => Err(fail(LengthRefProblem::DeclaredLater)),
        None => Err(fail(LengthRefProblem::Undeclared)),
    }
}
