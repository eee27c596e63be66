use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Layout knobs for the writer. None of them affect what the reader gets
/// back; they only change how legible the file is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WriteOptions {
    /// Minimum width of the value column on scalar lines.
    pub value_width: usize,
    /// Minimum width of each table cell.
    pub cell_width: usize,
    /// Append `name - description (unit)` after scalar values.
    pub descriptions: bool,
    /// Total width of generated heading lines.
    pub heading_width: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            value_width: 22,
            cell_width: 14,
            descriptions: true,
            heading_width: 80,
        }
    }
}

impl WriteOptions {
    pub fn load(path: impl AsRef<Path>) -> io::Result<Self> {
        let bytes = fs::read(path)?;
        serde_json::from_slice(&bytes)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let bytes = serde_json::to_vec_pretty(self)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        fs::write(path, bytes)
    }
}
