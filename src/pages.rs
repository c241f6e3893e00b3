//! Natural-language page selection.
//!
//! Users describe what they want in free text, mixing languages and
//! sometimes naming several documents in one sentence:
//!
//! ```text
//! "página 1 de docA y la última de docB"
//! "pages 2-4"
//! "extract the first page"
//! ```
//!
//! [`PageResolver::resolve`] turns such an instruction into the zero-indexed
//! pages of one document that should be sent for recognition. It is a
//! heuristic, not a grammar: whatever it cannot make sense of degrades to
//! "process every page", and it never fails.
//!
//! ## Resolution Steps
//!
//! 1. **Mentions**: which roster documents does the instruction name
//!    (whole word, with or without extension)?
//! 2. **Scope**: if other documents are named but not this one, select
//!    nothing. If this one is named, keep only the clauses that mention it,
//!    unless those clauses carry no page reference at all.
//! 3. **Ranges**: `page 2 to 4`, `páginas 1 a 3`, `p3-5`.
//! 4. **Numbers**: every standalone number after a page word (`pages 1, 3`).
//! 5. **Ordinals**: `first`, `tercera`, `last`, `última`.
//! 6. **Fallback**: nothing found means every page.
//!
//! All keywords come from a [`Lexicon`]; the default one covers English and
//! Spanish.

use crate::error::Pdf2TableError;
use crate::lexicon::{Lexicon, Ordinal};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::borrow::Cow;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

static DEFAULT_RESOLVER: Lazy<PageResolver> = Lazy::new(|| {
    PageResolver::new(&Lexicon::default()).expect("built-in lexicon must compile")
});

static RE_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[0-9]+\b").unwrap());

/// Resolve pages with the built-in English/Spanish lexicon.
///
/// ```rust
/// use pdf2table::pages::resolve;
///
/// let roster = ["docA.pdf", "docB.pdf", "docC.pdf"];
/// let instruction = "página 1 de docA y página 2 de docB";
/// assert_eq!(resolve(instruction, 3, Some("docA.pdf"), &roster).into_vec(), vec![0]);
/// assert_eq!(resolve(instruction, 3, Some("docB.pdf"), &roster).into_vec(), vec![1]);
/// assert!(resolve(instruction, 3, Some("docC.pdf"), &roster).is_empty());
/// ```
pub fn resolve<S: AsRef<str>>(
    instruction: &str,
    total_pages: usize,
    current_document: Option<&str>,
    roster: &[S],
) -> PageSelection {
    DEFAULT_RESOLVER.resolve(instruction, total_pages, current_document, roster)
}

/// Resolve pages for a single document with no roster (global mode).
pub fn resolve_global(instruction: &str, total_pages: usize) -> PageSelection {
    DEFAULT_RESOLVER.resolve_global(instruction, total_pages)
}

// ── PageSelection ────────────────────────────────────────────────────────

/// Zero-indexed pages chosen for one document. Sorted, deduplicated and
/// within `0..total_pages`. Empty means "skip this document".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PageSelection(Vec<usize>);

impl PageSelection {
    /// Every page of a `total_pages` document.
    pub fn all(total_pages: usize) -> Self {
        Self((0..total_pages).collect())
    }

    /// No pages.
    pub fn none() -> Self {
        Self(Vec::new())
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// The selection as 1-indexed page numbers, for display.
    pub fn page_numbers(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().map(|i| i + 1)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, usize> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when every page of a `total_pages` document is selected.
    pub fn covers_all(&self, total_pages: usize) -> bool {
        self.0.len() == total_pages
    }

    pub fn into_vec(self) -> Vec<usize> {
        self.0
    }
}

impl From<BTreeSet<usize>> for PageSelection {
    fn from(set: BTreeSet<usize>) -> Self {
        Self(set.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a PageSelection {
    type Item = &'a usize;
    type IntoIter = std::slice::Iter<'a, usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ── PageResolver ─────────────────────────────────────────────────────────

/// Page-reference resolver compiled from a [`Lexicon`].
///
/// Compiling builds every pattern once; resolving is then a handful of regex
/// scans over the lowercased instruction. The resolver holds no mutable
/// state and can be shared freely across threads.
#[derive(Debug, Clone)]
pub struct PageResolver {
    /// Page words and abbreviations, used to split off number lists.
    page_split: Option<Regex>,
    /// `(page-word) N (connector) M`.
    range: Option<Regex>,
    /// Does a clause say anything about pages at all?
    page_mention: Regex,
    /// Whole-word ordinal alternation.
    ordinal: Option<Regex>,
    ordinals: HashMap<String, Ordinal>,
    /// Clause delimiters: punctuation and whole-word connectors.
    clause_split: Option<Regex>,
}

impl Default for PageResolver {
    fn default() -> Self {
        DEFAULT_RESOLVER.clone()
    }
}

impl PageResolver {
    /// Compile a resolver from a keyword lexicon.
    ///
    /// Keywords are lowercased and regex-escaped, so the only way this fails
    /// is a lexicon so large the patterns exceed the regex size limit.
    pub fn new(lexicon: &Lexicon) -> Result<Self, Pdf2TableError> {
        let page_alt = alternation(
            lexicon
                .page_words()
                .chain(lexicon.page_abbreviations.iter().map(String::as_str)),
        );

        let page_split = page_alt
            .as_deref()
            .map(|alt| compile(&format!("(?:{alt})")))
            .transpose()?;

        let range = match (page_alt.as_deref(), alternation(lexicon.range_connectors())) {
            (Some(page), Some(connector)) => Some(compile(&format!(
                r"(?:{page})\s*([0-9]+)\s*(?:{connector})\s*([0-9]+)"
            ))?),
            _ => None,
        };

        // Any digit counts, so "p1" does. A bare "p" abbreviation does not:
        // it occurs in almost every sentence.
        let mut mention_parts = vec!["[0-9]".to_string()];
        if let Some(words) = alternation(lexicon.page_words()) {
            mention_parts.push(words);
        }
        if let Some(boundary) = alternation(
            lexicon
                .ordinals()
                .filter(|(_, o)| o.is_boundary())
                .map(|(w, _)| w),
        ) {
            mention_parts.push(boundary);
        }
        let page_mention = compile(&mention_parts.join("|"))?;

        let ordinals: HashMap<String, Ordinal> = lexicon
            .ordinals()
            .map(|(w, o)| (w.trim().to_lowercase(), o))
            .filter(|(w, _)| !w.is_empty())
            .collect();
        let ordinal = alternation(ordinals.keys().map(String::as_str))
            .map(|alt| compile(&format!(r"\b(?:{alt})\b")))
            .transpose()?;

        let punctuation: String = lexicon
            .clause_punctuation
            .iter()
            .map(|c| regex::escape(&c.to_string()))
            .collect();
        let mut split_parts = Vec::new();
        if !punctuation.is_empty() {
            split_parts.push(format!("[{punctuation}]"));
        }
        if let Some(connectors) = alternation(lexicon.clause_connectors()) {
            split_parts.push(format!(r"\b(?:{connectors})\b"));
        }
        let clause_split = if split_parts.is_empty() {
            None
        } else {
            Some(compile(&split_parts.join("|"))?)
        };

        Ok(Self {
            page_split,
            range,
            page_mention,
            ordinal,
            ordinals,
            clause_split,
        })
    }

    /// Decide which pages of `current_document` the instruction asks for.
    ///
    /// # Arguments
    /// * `instruction`: free-form user text
    /// * `total_pages`: page count of the current document
    /// * `current_document`: name of the document being resolved; `None`
    ///   means single-document mode and ignores the roster
    /// * `roster`: every document name in the batch
    pub fn resolve<S: AsRef<str>>(
        &self,
        instruction: &str,
        total_pages: usize,
        current_document: Option<&str>,
        roster: &[S],
    ) -> PageSelection {
        if total_pages == 0 {
            return PageSelection::none();
        }

        let text = instruction.to_lowercase();

        let scope: Cow<'_, str> = match current_document {
            Some(current) => {
                let mentioned: Vec<&str> = roster
                    .iter()
                    .map(AsRef::as_ref)
                    .filter(|name| mentions(&text, name))
                    .collect();

                if mentioned.is_empty() {
                    Cow::Borrowed(text.as_str())
                } else if !mentioned.iter().any(|m| same_document(m, current)) {
                    debug!(
                        "{}: instruction names {:?}, skipping",
                        current, mentioned
                    );
                    return PageSelection::none();
                } else {
                    self.scope_for(&text, current)
                }
            }
            None => Cow::Borrowed(text.as_str()),
        };

        let mut pages = BTreeSet::new();
        self.collect_ranges(&scope, total_pages, &mut pages);
        self.collect_numbers(&scope, total_pages, &mut pages);
        self.collect_ordinals(&scope, total_pages, &mut pages);

        if pages.is_empty() {
            debug!("No page reference found, selecting all {} pages", total_pages);
            PageSelection::all(total_pages)
        } else {
            PageSelection::from(pages)
        }
    }

    /// [`resolve`](Self::resolve) without a current document or roster.
    pub fn resolve_global(&self, instruction: &str, total_pages: usize) -> PageSelection {
        self.resolve::<&str>(instruction, total_pages, None, &[])
    }

    /// The clauses of `text` that concern `current`, joined by spaces.
    ///
    /// Falls back to the whole text when no clause names the document or
    /// when the naming clauses hold no page reference ("p1 of A and B").
    fn scope_for<'a>(&self, text: &'a str, current: &str) -> Cow<'a, str> {
        let Some(pattern) = document_pattern(current) else {
            return Cow::Borrowed(text);
        };

        let clauses: Vec<&str> = match &self.clause_split {
            Some(re) => re.split(text).collect(),
            None => vec![text],
        };

        let relevant: Vec<&str> = clauses
            .into_iter()
            .map(str::trim)
            .filter(|c| !c.is_empty() && pattern.is_match(c))
            .collect();

        if relevant.is_empty() || !relevant.iter().any(|c| self.page_mention.is_match(c)) {
            return Cow::Borrowed(text);
        }

        Cow::Owned(relevant.join(" "))
    }

    fn collect_ranges(&self, scope: &str, total_pages: usize, pages: &mut BTreeSet<usize>) {
        let Some(re) = &self.range else { return };
        for caps in re.captures_iter(scope) {
            let (Ok(start), Ok(end)) = (caps[1].parse::<usize>(), caps[2].parse::<usize>()) else {
                continue;
            };
            for page in start.max(1)..=end.min(total_pages) {
                pages.insert(page - 1);
            }
        }
    }

    fn collect_numbers(&self, scope: &str, total_pages: usize, pages: &mut BTreeSet<usize>) {
        let Some(re) = &self.page_split else { return };
        for segment in re.split(scope).skip(1) {
            for m in RE_NUMBER.find_iter(segment) {
                if let Ok(page) = m.as_str().parse::<usize>() {
                    insert_page(pages, page, total_pages);
                }
            }
        }
    }

    fn collect_ordinals(&self, scope: &str, total_pages: usize, pages: &mut BTreeSet<usize>) {
        let Some(re) = &self.ordinal else { return };
        for m in re.find_iter(scope) {
            if let Some(ordinal) = self.ordinals.get(m.as_str()) {
                insert_page(pages, ordinal.page_number(total_pages), total_pages);
            }
        }
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────

/// Store a 1-indexed page as 0-indexed, dropping anything out of range.
fn insert_page(pages: &mut BTreeSet<usize>, page: usize, total_pages: usize) {
    if (1..=total_pages).contains(&page) {
        pages.insert(page - 1);
    }
}

/// Escaped, longest-first alternation of the given keywords.
fn alternation<'a>(words: impl IntoIterator<Item = &'a str>) -> Option<String> {
    let mut words: Vec<String> = words
        .into_iter()
        .map(|w| w.trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect();
    if words.is_empty() {
        return None;
    }
    words.sort_by(|a, b| {
        b.chars()
            .count()
            .cmp(&a.chars().count())
            .then_with(|| a.cmp(b))
    });
    words.dedup();
    Some(
        words
            .iter()
            .map(|w| regex::escape(w))
            .collect::<Vec<_>>()
            .join("|"),
    )
}

fn compile(pattern: &str) -> Result<Regex, Pdf2TableError> {
    Regex::new(pattern).map_err(|e| Pdf2TableError::InvalidLexicon {
        reason: e.to_string(),
    })
}

/// Whole-word pattern matching a document by full name or extension-less stem.
fn document_pattern(name: &str) -> Option<Regex> {
    let full = name.trim().to_lowercase();
    if full.is_empty() {
        return None;
    }
    let stem = strip_extension(&full);
    let pattern = if stem == full {
        format!(r"\b{}\b", regex::escape(&full))
    } else {
        format!(
            r"\b(?:{}|{})\b",
            regex::escape(&full),
            regex::escape(stem)
        )
    };
    Regex::new(&pattern).ok()
}

fn mentions(text: &str, name: &str) -> bool {
    document_pattern(name).is_some_and(|re| re.is_match(text))
}

/// Case-insensitive equality, where either side may omit its extension.
fn same_document(a: &str, b: &str) -> bool {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    a == b || strip_extension(&a) == b || a == strip_extension(&b)
}

/// `report.final.pdf` → `report.final`; dotfiles and extension-less names
/// are returned unchanged.
fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(dot)
            if dot > 0
                && !name[..dot].ends_with(['/', '\\'])
                && !name[dot + 1..].contains(['/', '\\']) =>
        {
            &name[..dot]
        }
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_extension_cases() {
        assert_eq!(strip_extension("doca.pdf"), "doca");
        assert_eq!(strip_extension("report.final.pdf"), "report.final");
        assert_eq!(strip_extension("noext"), "noext");
        assert_eq!(strip_extension(".hidden"), ".hidden");
        assert_eq!(strip_extension("dir/.hidden"), "dir/.hidden");
        assert_eq!(strip_extension("v1.2/file"), "v1.2/file");
    }

    #[test]
    fn alternation_is_longest_first_and_escaped() {
        let alt = alternation(["p", "página", "páginas", "p.", ""]).unwrap();
        assert_eq!(alt, r"páginas|página|p\.|p");
        assert!(alternation(Vec::<&str>::new()).is_none());
        assert!(alternation(["  "]).is_none());
    }

    #[test]
    fn document_mention_is_whole_word() {
        assert!(mentions("página 1 de doca", "docA.pdf"));
        assert!(mentions("use doca.pdf please", "docA.pdf"));
        assert!(!mentions("use docab please", "docA.pdf"));
        assert!(!mentions("anything", "   "));
    }

    #[test]
    fn zero_pages_is_always_empty() {
        assert!(resolve_global("página 1", 0).is_empty());
        assert!(resolve_global("", 0).is_empty());
    }

    #[test]
    fn spanish_single_page() {
        assert_eq!(resolve_global("página 2", 5).into_vec(), vec![1]);
    }

    #[test]
    fn spanish_range() {
        assert_eq!(resolve_global("páginas 1 a 3", 5).into_vec(), vec![0, 1, 2]);
    }

    #[test]
    fn english_dash_range_and_abbreviation() {
        assert_eq!(resolve_global("pages 2-4", 5).into_vec(), vec![1, 2, 3]);
        assert_eq!(resolve_global("p3-5", 5).into_vec(), vec![2, 3, 4]);
    }

    #[test]
    fn range_is_clamped_to_document() {
        assert_eq!(resolve_global("pages 4 to 400", 5).into_vec(), vec![3, 4]);
    }

    #[test]
    fn last_page_word() {
        assert_eq!(resolve_global("la última página", 5).into_vec(), vec![4]);
        assert_eq!(resolve_global("the last page", 7).into_vec(), vec![6]);
    }

    #[test]
    fn out_of_range_numbers_are_dropped() {
        // Nothing valid remains, so the fallback selects every page.
        assert_eq!(resolve_global("page 99", 5).into_vec(), vec![0, 1, 2, 3, 4]);
        assert_eq!(resolve_global("pages 2 and 99", 5).into_vec(), vec![1]);
    }

    #[test]
    fn huge_numbers_do_not_panic() {
        let sel = resolve_global("page 99999999999999999999999 to 3", 5);
        assert_eq!(sel.into_vec(), vec![2]);
    }

    #[test]
    fn number_inside_word_is_ignored() {
        // "10" must not be read as "1"; "report2023" is not a standalone number.
        assert_eq!(resolve_global("page 10", 12).into_vec(), vec![9]);
        assert_eq!(
            resolve_global("page report2023", 3).into_vec(),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn same_document_ignores_case_and_extension() {
        assert!(same_document("docA.pdf", "DOCA.PDF"));
        assert!(same_document("docA.pdf", "docA"));
        assert!(same_document("docA", "docA.pdf"));
        assert!(!same_document("docA.pdf", "docB.pdf"));
        assert!(!same_document("docA.pdf", "docA.xlsx"));
    }

    #[test]
    fn selection_helpers() {
        let sel = PageSelection::from(BTreeSet::from([2, 0]));
        assert_eq!(sel.indices(), &[0, 2]);
        assert_eq!(sel.page_numbers().collect::<Vec<_>>(), vec![1, 3]);
        assert!(!sel.covers_all(3));
        assert!(PageSelection::all(3).covers_all(3));
        assert_eq!(serde_json::to_string(&sel).unwrap(), "[0,2]");
    }

    #[test]
    fn custom_lexicon_without_connectors() {
        let mut lexicon = Lexicon::default();
        lexicon.languages.clear();
        lexicon.clause_punctuation.clear();
        let resolver = PageResolver::new(&lexicon).unwrap();
        // Only the "p" abbreviation and "-" remain.
        assert_eq!(resolver.resolve_global("p2-3", 4).into_vec(), vec![1, 2]);
        assert_eq!(
            resolver.resolve_global("first page", 4).into_vec(),
            vec![0, 1, 2, 3]
        );
    }
}
