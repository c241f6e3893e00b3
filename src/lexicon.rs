//! Localized keyword tables used by the page resolver.
//!
//! Everything language-specific the resolver knows lives here, keyed by
//! language code: the words for "page", the connectors that form ranges
//! ("1 to 3", "1 a 3"), the connectors that separate clauses ("and", "y"),
//! and the ordinal words ("first", "última"). The matching algorithm in
//! [`crate::pages`] only ever sees the union of these tables, so adding a
//! language is a data change:
//!
//! ```rust
//! use pdf2table::lexicon::{LanguageKeywords, Lexicon, Ordinal};
//!
//! let mut lexicon = Lexicon::default();
//! lexicon.merge(
//!     "pt",
//!     LanguageKeywords {
//!         page_words: vec!["página".into(), "páginas".into()],
//!         range_connectors: vec!["até".into()],
//!         clause_connectors: vec!["e".into()],
//!         ordinals: [("primeira".to_string(), Ordinal::Nth(1))].into_iter().collect(),
//!     },
//! );
//! assert!(lexicon.languages.contains_key("pt"));
//! ```
//!
//! Lexicons serialise to JSON, so a deployment can ship its own table and
//! load it with [`Lexicon::from_path`].

use crate::error::Pdf2TableError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Position denoted by an ordinal word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ordinal {
    /// The k-th page, 1-indexed.
    Nth(usize),
    /// The final page of the document.
    Last,
}

impl Ordinal {
    /// Resolve to a 1-indexed page number for a document of `total_pages`.
    pub fn page_number(self, total_pages: usize) -> usize {
        match self {
            Ordinal::Nth(k) => k,
            Ordinal::Last => total_pages,
        }
    }

    /// "first" and "last" count as explicit page instructions when deciding
    /// whether a clause scoped to one document says anything about pages.
    pub fn is_boundary(self) -> bool {
        matches!(self, Ordinal::Nth(1) | Ordinal::Last)
    }
}

/// Keywords for one language.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LanguageKeywords {
    /// Words for "page", singular and plural.
    #[serde(default)]
    pub page_words: Vec<String>,
    /// Words joining the two ends of a range.
    #[serde(default)]
    pub range_connectors: Vec<String>,
    /// Whole-word connectors that separate clauses.
    #[serde(default)]
    pub clause_connectors: Vec<String>,
    /// Ordinal words and the position they denote.
    #[serde(default)]
    pub ordinals: BTreeMap<String, Ordinal>,
}

/// Keyword tables for every supported language plus language-neutral symbols.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lexicon {
    pub languages: BTreeMap<String, LanguageKeywords>,
    /// Short forms of the page word ("p1", "p 3-5").
    #[serde(default = "default_page_abbreviations")]
    pub page_abbreviations: Vec<String>,
    /// Punctuation that separates clauses.
    #[serde(default = "default_clause_punctuation")]
    pub clause_punctuation: Vec<char>,
    /// Symbols joining the two ends of a range in any language.
    #[serde(default = "default_range_symbols")]
    pub range_symbols: Vec<String>,
}

fn default_page_abbreviations() -> Vec<String> {
    vec!["p".into()]
}

fn default_clause_punctuation() -> Vec<char> {
    vec![',', ';', '.']
}

fn default_range_symbols() -> Vec<String> {
    vec!["-".into()]
}

impl Default for Lexicon {
    fn default() -> Self {
        let mut languages = BTreeMap::new();
        languages.insert("en".to_string(), english());
        languages.insert("es".to_string(), spanish());
        Self {
            languages,
            page_abbreviations: default_page_abbreviations(),
            clause_punctuation: default_clause_punctuation(),
            range_symbols: default_range_symbols(),
        }
    }
}

impl Lexicon {
    /// Parse a lexicon from its JSON representation.
    pub fn from_json_str(json: &str) -> Result<Self, Pdf2TableError> {
        serde_json::from_str(json).map_err(|e| Pdf2TableError::InvalidLexicon {
            reason: e.to_string(),
        })
    }

    /// Read and parse a JSON lexicon file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Pdf2TableError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| Pdf2TableError::LexiconRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Add or replace the keywords of one language.
    pub fn merge(&mut self, code: impl Into<String>, keywords: LanguageKeywords) {
        self.languages.insert(code.into(), keywords);
    }

    /// Page words of every language.
    pub fn page_words(&self) -> impl Iterator<Item = &str> {
        self.languages
            .values()
            .flat_map(|l| l.page_words.iter().map(String::as_str))
    }

    /// Range connectors of every language plus the neutral range symbols.
    pub fn range_connectors(&self) -> impl Iterator<Item = &str> {
        self.languages
            .values()
            .flat_map(|l| l.range_connectors.iter().map(String::as_str))
            .chain(self.range_symbols.iter().map(String::as_str))
    }

    /// Clause connectors of every language.
    pub fn clause_connectors(&self) -> impl Iterator<Item = &str> {
        self.languages
            .values()
            .flat_map(|l| l.clause_connectors.iter().map(String::as_str))
    }

    /// Every ordinal word with its position, across languages.
    pub fn ordinals(&self) -> impl Iterator<Item = (&str, Ordinal)> {
        self.languages
            .values()
            .flat_map(|l| l.ordinals.iter().map(|(w, o)| (w.as_str(), *o)))
    }
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

fn ordinal_table(entries: &[(&str, Ordinal)]) -> BTreeMap<String, Ordinal> {
    entries.iter().map(|(w, o)| (w.to_string(), *o)).collect()
}

fn english() -> LanguageKeywords {
    use Ordinal::{Last, Nth};
    LanguageKeywords {
        page_words: words(&["page", "pages"]),
        range_connectors: words(&["to", "through"]),
        clause_connectors: words(&["and"]),
        ordinals: ordinal_table(&[
            ("first", Nth(1)),
            ("second", Nth(2)),
            ("third", Nth(3)),
            ("fourth", Nth(4)),
            ("fifth", Nth(5)),
            ("sixth", Nth(6)),
            ("seventh", Nth(7)),
            ("eighth", Nth(8)),
            ("ninth", Nth(9)),
            ("tenth", Nth(10)),
            ("last", Last),
        ]),
    }
}

fn spanish() -> LanguageKeywords {
    use Ordinal::{Last, Nth};
    LanguageKeywords {
        page_words: words(&["página", "páginas"]),
        range_connectors: words(&["a", "hasta"]),
        clause_connectors: words(&["y", "e"]),
        ordinals: ordinal_table(&[
            ("primera", Nth(1)),
            ("primero", Nth(1)),
            ("segunda", Nth(2)),
            ("segundo", Nth(2)),
            ("tercera", Nth(3)),
            ("tercero", Nth(3)),
            ("cuarta", Nth(4)),
            ("cuarto", Nth(4)),
            ("quinta", Nth(5)),
            ("quinto", Nth(5)),
            ("sexta", Nth(6)),
            ("sexto", Nth(6)),
            ("séptima", Nth(7)),
            ("séptimo", Nth(7)),
            ("octava", Nth(8)),
            ("octavo", Nth(8)),
            ("novena", Nth(9)),
            ("noveno", Nth(9)),
            ("décima", Nth(10)),
            ("décimo", Nth(10)),
            ("última", Last),
            ("último", Last),
        ]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_english_and_spanish() {
        let lex = Lexicon::default();
        assert!(lex.languages.contains_key("en"));
        assert!(lex.languages.contains_key("es"));
        assert!(lex.page_words().any(|w| w == "página"));
        assert!(lex.range_connectors().any(|w| w == "-"));
    }

    #[test]
    fn ordinal_page_numbers() {
        assert_eq!(Ordinal::Nth(3).page_number(10), 3);
        assert_eq!(Ordinal::Last.page_number(10), 10);
        assert!(Ordinal::Nth(1).is_boundary());
        assert!(Ordinal::Last.is_boundary());
        assert!(!Ordinal::Nth(2).is_boundary());
    }

    #[test]
    fn json_roundtrip_keeps_table() {
        let lex = Lexicon::default();
        let json = serde_json::to_string(&lex).unwrap();
        assert_eq!(Lexicon::from_json_str(&json).unwrap(), lex);
    }

    #[test]
    fn json_defaults_fill_symbols() {
        let lex = Lexicon::from_json_str(
            r#"{"languages": {"fr": {"page_words": ["page"], "ordinals": {"dernière": "last", "premier": {"nth": 1}}}}}"#,
        )
        .unwrap();
        assert_eq!(lex.page_abbreviations, vec!["p".to_string()]);
        assert_eq!(lex.clause_punctuation, vec![',', ';', '.']);
        let fr = &lex.languages["fr"];
        assert_eq!(fr.ordinals["dernière"], Ordinal::Last);
        assert_eq!(fr.ordinals["premier"], Ordinal::Nth(1));
        assert!(fr.range_connectors.is_empty());
    }

    #[test]
    fn malformed_json_is_invalid_lexicon() {
        let err = Lexicon::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, Pdf2TableError::InvalidLexicon { .. }));
    }
}
