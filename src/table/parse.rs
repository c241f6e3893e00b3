//! Markdown table parsing.
//!
//! Recognition output is "markdown-like": GFM pipe tables most of the time,
//! but models also emit stray captions, header rulers, and code fences
//! around the whole answer despite being told not to. [`parse_grid`] keeps
//! every line that carries content, drops the rulers, and pads the result
//! into a rectangle; it has no failure mode.

use super::Grid;
use tracing::debug;

/// Column separator of pipe tables.
const SEPARATOR: char = '|';

/// Parse extraction text into a rectangular grid.
///
/// * A line containing `|` is split on it. One empty edge cell on each side
///   (from a leading/trailing pipe) is dropped and cells are trimmed.
///   Ruler lines, whose cells hold only `-`, `:` and spaces, are skipped.
/// * Any other non-blank line becomes a single-cell row.
/// * Short rows are right-padded with empty cells.
///
/// ```rust
/// use pdf2table::table::parse_grid;
///
/// let grid = parse_grid("| a | b |\n|---|---|\n| 1 | 2 |");
/// assert_eq!(grid.rows(), &[vec!["a", "b"], vec!["1", "2"]]);
/// ```
pub fn parse_grid(text: &str) -> Grid {
    let rows: Vec<Vec<String>> = text.trim().lines().filter_map(parse_line).collect();
    debug!("Parsed {} table rows", rows.len());
    Grid::from_rows(rows)
}

/// Remove code-fence markers anywhere in the text, then trim.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```markdown", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// [`strip_code_fences`] followed by [`parse_grid`].
pub fn parse_extraction(text: &str) -> Grid {
    parse_grid(&strip_code_fences(text))
}

fn parse_line(line: &str) -> Option<Vec<String>> {
    if !line.contains(SEPARATOR) {
        let content = line.trim();
        return (!content.is_empty()).then(|| vec![content.to_string()]);
    }

    let mut cells: Vec<&str> = line.split(SEPARATOR).map(str::trim).collect();
    if cells.first().is_some_and(|c| c.is_empty()) {
        cells.remove(0);
    }
    if cells.last().is_some_and(|c| c.is_empty()) {
        cells.pop();
    }

    if cells.iter().all(|c| is_ruler_cell(c)) {
        return None;
    }

    Some(cells.into_iter().map(str::to_string).collect())
}

/// Header-rule cells hold only `-`, `:` and spaces (or nothing).
fn is_ruler_cell(cell: &str) -> bool {
    cell.chars().all(|c| matches!(c, '-' | ':' | ' '))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_ruler_is_dropped() {
        let grid = parse_grid("| a | b |\n|---|---|\n| 1 | 2 |");
        assert_eq!(grid.row_count(), 2);
        assert_eq!(grid.column_count(), 2);
        assert_eq!(grid.rows()[1], vec!["1", "2"]);
    }

    #[test]
    fn alignment_rulers_are_dropped() {
        let grid = parse_grid("| a | b |\n| :--- | ---: |\n|:-:|--|\n| 1 | 2 |");
        assert_eq!(grid.row_count(), 2);
    }

    #[test]
    fn plain_lines_become_single_cells() {
        let grid = parse_grid("Quarterly results\n\n| Q1 | Q2 | Q3 |\n| 10 | 20 | 30 |");
        assert_eq!(grid.row_count(), 3);
        assert_eq!(grid.rows()[0], vec!["Quarterly results", "", ""]);
    }

    #[test]
    fn rows_without_edge_pipes() {
        let grid = parse_grid("a | b\n1 | 2");
        assert_eq!(grid.rows()[0], vec!["a", "b"]);
    }

    #[test]
    fn only_one_edge_cell_is_dropped() {
        // "||x||" → ["", "", "x", "", ""] → inner empties survive.
        let grid = parse_grid("||x||");
        assert_eq!(grid.rows()[0], vec!["", "x", ""]);
    }

    #[test]
    fn blank_rows_and_bare_pipes_are_dropped() {
        let grid = parse_grid("|\n|  |  |\n   \n| v |");
        assert_eq!(grid.rows(), &[vec!["v".to_string()]]);
    }

    #[test]
    fn empty_and_whitespace_input_give_empty_grid() {
        assert!(parse_grid("").is_empty());
        assert!(parse_grid("  \n\n \t ").is_empty());
        assert!(parse_grid("|---|---|").is_empty());
    }

    #[test]
    fn crlf_lines() {
        let grid = parse_grid("| a | b |\r\n| 1 | 2 |\r\n");
        assert_eq!(grid.rows()[1], vec!["1", "2"]);
    }

    #[test]
    fn strip_fences_everywhere() {
        let raw = "```markdown\n| a |\n```\n\n```\n| b |\n```";
        assert_eq!(strip_code_fences(raw), "| a |\n\n\n\n| b |");
        let grid = parse_extraction(raw);
        assert_eq!(grid.rows(), &[vec!["a".to_string()], vec!["b".to_string()]]);
    }

    #[test]
    fn reparse_of_rendering_is_stable() {
        let grid = parse_grid("Title\n| a | b | c |\n|---|---|---|\n| 1 |  | 3 |");
        let again = parse_grid(&grid.to_markdown());
        assert_eq!(again, grid);
    }
}
