//! Error types for acdc-fio

use std::fmt::{Display, Formatter};

use thiserror::Error;

/// Why a length reference could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthRefProblem {
    /// No field of that name exists in the schema.
    Undeclared,
    /// The field exists but comes after the one that needs it.
    DeclaredLater,
    /// The referenced value is not an integer.
    NotAnInteger,
    /// The referenced integer is below zero.
    Negative(i64),
}

impl Display for LengthRefProblem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LengthRefProblem::Undeclared => write!(f, "is not declared in the schema"),
            LengthRefProblem::DeclaredLater => write!(f, "has not been read yet at this point"),
            LengthRefProblem::NotAnInteger => write!(f, "is not an integer field"),
            LengthRefProblem::Negative(value) => write!(f, "holds a negative count ({value})"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("unexpected end of input at line {line}: {field} ({kind}) not satisfied")]
    UnexpectedEndOfInput {
        field: String,
        kind: &'static str,
        line: usize,
    },

    #[error("type mismatch at line {line}: {field} expects {expected}, found {raw:?}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        line: usize,
        raw: String,
    },

    #[error("length reference error in {field}: `{reference}` {problem}")]
    LengthReference {
        field: String,
        reference: String,
        problem: LengthRefProblem,
    },

    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },
}

impl ParseError {
    /// 1-based line the error points at, when it has one.
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::UnexpectedEndOfInput { line, .. }
            | ParseError::TypeMismatch { line, .. } => Some(*line),
            ParseError::LengthReference { .. } | ParseError::Io { .. } => None,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SerializeError {
    #[error("missing field: {field}")]
    MissingField { field: String },

    #[error("{field} holds {actual} entries but {reference} = {expected}")]
    RowCountMismatch {
        field: String,
        reference: String,
        expected: i64,
        actual: usize,
    },

    #[error("{field} expects a {expected} value, document holds {found}")]
    WrongValueKind {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("{field} row {row}: expected {expected} cells, found {found}")]
    ColumnCountMismatch {
        field: String,
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("{field}: text {text:?} cannot be written as a single token")]
    Unquotable { field: String, text: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("duplicate field name: {field}")]
    DuplicateField { field: String },

    #[error("{kind} field has no name")]
    UnnamedField { kind: &'static str },

    #[error("length reference error in {field}: `{reference}` {problem}")]
    LengthReference {
        field: String,
        reference: String,
        problem: LengthRefProblem,
    },

    #[error("unknown schema: {0}")]
    UnknownSchema(String),
}
