//! Prompts sent to the recognition service with every page image.
//!
//! Centralising every prompt here serves two purposes:
//!
//! 1. **Single source of truth**: changing what the service is asked to
//!    produce requires editing exactly one place.
//!
//! 2. **Testability**: unit tests inspect prompts directly, and the table
//!    parser in [`crate::table::parse`] is written against the output format
//!    promised here.
//!
//! Callers can override the default via [`crate::config::ExtractionConfig::prompt`].

/// Default prompt asking for every table on a page image as a pipe table.
pub const DEFAULT_TABLE_PROMPT: &str = r#"You are an expert at extracting tabular data from document page images.

Follow these rules precisely:

1. WHAT TO EXTRACT
   - Extract ALL tables visible on the page, in reading order
   - Keep every row and every column, including totals and subtotals
   - Copy cell values exactly as printed, including currency symbols and separators

2. FORMAT
   - Render each table as a Markdown pipe table with one header row
   - Leave a cell empty when the page leaves it empty
   - Separate consecutive tables with a blank line

3. OUTPUT
   - Output ONLY the tables
   - Do NOT add commentary or explanations
   - If the page contains no table, answer with an empty string"#;

/// Heading that introduces the user's instruction inside a page prompt.
const INSTRUCTION_HEADING: &str = "USER INSTRUCTION";

/// Build the prompt for one page.
///
/// The batch instruction is appended so the service sees the same request
/// the user typed ("only the totals table"). A blank instruction leaves the
/// base prompt unchanged.
pub fn page_prompt(base: &str, instruction: &str) -> String {
    let instruction = instruction.trim();
    if instruction.is_empty() {
        return base.to_string();
    }
    format!("{base}\n\n{INSTRUCTION_HEADING}\n{instruction}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_prompt_forbids_commentary() {
        assert!(DEFAULT_TABLE_PROMPT.contains("pipe table"));
        assert!(DEFAULT_TABLE_PROMPT.contains("Do NOT add commentary"));
        assert!(DEFAULT_TABLE_PROMPT.contains("empty string"));
    }

    #[test]
    fn instruction_is_appended() {
        let p = page_prompt("BASE", "  tablas de la página 2 ");
        assert_eq!(p, "BASE\n\nUSER INSTRUCTION\ntablas de la página 2");
    }

    #[test]
    fn blank_instruction_keeps_base() {
        assert_eq!(page_prompt("BASE", " \n"), "BASE");
    }
}
