//! Tabular output: rectangular grids parsed from recognition markdown.
//!
//! ## Data Flow
//!
//! ```text
//! raw text ──▶ strip_code_fences ──▶ parse_grid ──▶ Grid<String>
//!                                                      │
//!                              Grid::concat (pages) ◀──┘
//!                                      │
//!                               normalize_grid ──▶ Grid<CellValue>
//! ```
//!
//! 1. [`parse`]: markdown-ish text to a padded grid of strings
//! 2. [`normalize`]: per-cell coercion to integer, float or text
//!
//! Every [`Grid`] is rectangular: all rows have the same number of cells.
//! Constructors enforce this by right-padding short rows with the cell
//! type's default value.

pub mod normalize;
pub mod parse;

pub use normalize::{normalize_cell, normalize_grid};
pub use parse::{parse_extraction, parse_grid, strip_code_fences};

use serde::Serialize;
use std::fmt;

/// A rectangular table: ordered rows of equally many cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Grid<T = String> {
    rows: Vec<Vec<T>>,
}

/// A grid whose cells have been coerced to numbers where possible.
pub type NormalizedGrid = Grid<CellValue>;

impl<T> Default for Grid<T> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<T: Clone + Default> Grid<T> {
    /// Build a grid, right-padding every row to the widest one.
    pub fn from_rows(mut rows: Vec<Vec<T>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(width, T::default());
        }
        Self { rows }
    }

    /// Stack grids vertically in order, re-padding to the widest.
    pub fn concat(grids: impl IntoIterator<Item = Self>) -> Self {
        Self::from_rows(grids.into_iter().flat_map(|g| g.rows).collect())
    }
}

impl<T> Grid<T> {
    pub fn rows(&self) -> &[Vec<T>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Vec<T>> {
        self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Apply `f` to every cell, keeping the shape.
    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> Grid<U> {
        Grid {
            rows: self
                .rows
                .iter()
                .map(|row| row.iter().map(&mut f).collect())
                .collect(),
        }
    }
}

impl<T: fmt::Display> Grid<T> {
    /// Render as pipe-delimited rows without a header ruler.
    ///
    /// Parsing the rendering again gives back the same grid as long as no
    /// cell contains `|` and no row is entirely blank.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        for row in &self.rows {
            out.push('|');
            for cell in row {
                out.push(' ');
                out.push_str(&cell.to_string());
                out.push_str(" |");
            }
            out.push('\n');
        }
        out
    }
}

// ── CellValue ────────────────────────────────────────────────────────────

/// A normalised cell: integers and decimals become numbers, everything else
/// stays text. Serialises untagged, i.e. as a plain JSON number or string.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Text(String::new())
    }
}

impl CellValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric value of either number variant.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Int(i) => Some(*i as f64),
            CellValue::Float(f) => Some(*f),
            CellValue::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_number(&self) -> bool {
        !matches!(self, CellValue::Text(_))
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Int(i) => write!(f, "{i}"),
            CellValue::Float(x) => write!(f, "{x}"),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<f64> for CellValue {
    fn from(x: f64) -> Self {
        CellValue::Float(x)
    }
}
