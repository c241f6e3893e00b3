//! Cell normalisation: turn extracted text into numbers where it reads as one.
//!
//! Financial tables arrive as `$1,234.50`, `€ 90`, `1,000`. Stripping the
//! currency symbols and thousands separators first lets spreadsheet sinks
//! store real numbers. Anything that still does not parse is kept as cleaned
//! text, so `N/A` or `—` survive untouched.

use super::{CellValue, Grid, NormalizedGrid};

/// Characters removed before parsing.
const STRIPPED: &[char] = &['$', '€', '£', ','];

/// Normalise a single cell.
///
/// `None` (a missing cell) becomes empty text. Otherwise the value is
/// trimmed and stripped of currency symbols and commas, then parsed as an
/// integer, or as a float when it contains a `.`.
///
/// ```rust
/// use pdf2table::table::{normalize_cell, CellValue};
///
/// assert_eq!(normalize_cell(Some("$1,234.50")), CellValue::Float(1234.5));
/// assert_eq!(normalize_cell(Some("42")), CellValue::Int(42));
/// assert_eq!(normalize_cell(Some("N/A")), CellValue::Text("N/A".into()));
/// assert_eq!(normalize_cell(None), CellValue::Text(String::new()));
/// ```
pub fn normalize_cell(value: Option<&str>) -> CellValue {
    let Some(value) = value else {
        return CellValue::default();
    };

    let cleaned = value.trim().replace(STRIPPED, "");
    // "€ 90" leaves inner whitespace behind once the symbol is gone.
    let number = cleaned.trim();

    if let Ok(i) = number.parse::<i64>() {
        return CellValue::Int(i);
    }
    if number.contains('.') {
        if let Ok(x) = number.parse::<f64>() {
            return CellValue::Float(x);
        }
    }
    CellValue::Text(cleaned)
}

/// Normalise every cell of a grid; the shape is unchanged.
pub fn normalize_grid(grid: &Grid) -> NormalizedGrid {
    grid.map(|cell| normalize_cell(Some(cell)))
}
