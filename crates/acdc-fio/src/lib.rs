//! Schema-driven I/O for fixed-layout simulation input decks.
//!
//! This crate provides:
//! - **Field descriptors** ([`FieldSpec`], [`FileSpec`]) describing one input
//!   file line by line
//! - **Reader** turning deck text into a [`Document`], resolving table and
//!   path-list lengths from earlier integer fields
//! - **Writer** emitting a [`Document`] back as text that re-reads to the
//!   same document
//! - **Catalog** of built-in schemas (AeroDyn v14, ElastoDyn tower)
//!
//! ```rust
//! use acdc_fio::{Column, FieldSpec, FileSpec, read_str, write};
//!
//! let spec = FileSpec::new(
//!     "pairs",
//!     vec![
//!         FieldSpec::int("N"),
//!         FieldSpec::table("Table", "N", 0, vec![Column::float("A"), Column::float("B")]),
//!     ],
//! );
//! let doc = read_str("2\n1.0 2.0\n3.0 4.0\n", &spec)?;
//! let text = write(&doc, &spec)?;
//! assert_eq!(read_str(&text, &spec)?, doc);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod catalog;
mod document;
mod error;
mod field;
mod options;
mod reader;
mod token;
mod writer;

pub use document::{Cell, Document, Row, Value};
pub use error::{LengthRefProblem, ParseError, SchemaError, SerializeError};
pub use field::{Column, ColumnKind, FieldKind, FieldSpec, FileSpec};
pub use options::WriteOptions;
pub use reader::{read, read_file, read_str};
pub use writer::{write, write_with};
