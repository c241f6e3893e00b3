//! CLI binary for pdf2table.
//!
//! A thin shim over the library crate for trying out page instructions and
//! table normalisation without a recognition backend:
//!
//! * `pages` resolves an instruction against one document.
//! * `plan` resolves an instruction against a whole batch.
//! * `table` parses (and normalises) markdown tables from a file or stdin.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use pdf2table::extract::document_name;
use pdf2table::table::{normalize_grid, parse_extraction};
use pdf2table::{CellValue, Lexicon, PageResolver, PageSelection};
use serde::Serialize;
use std::io::{self, Read};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Which pages of a 12-page report does an instruction select?
  pdf2table pages "tablas de las páginas 2 a 4" --total-pages 12

  # Same, when the instruction names several documents
  pdf2table pages "página 1 de docA y la última de docB" \
      --total-pages 3 --document docB.pdf --roster docA.pdf,docB.pdf

  # Dry run over a batch: NAME=PAGES per document
  pdf2table plan "página 1 de docA y página 2 de docB" \
      --doc docA.pdf=3 --doc docB.pdf=3 --doc docC.pdf=3

  # Normalise a recognised table
  pdf2table table page1.md --json

  # Keep the cells as text
  cat page1.md | pdf2table table --raw

LEXICON FILES:
  --lexicon replaces the built-in English/Spanish keyword tables:

  {
    "languages": {
      "fr": {
        "page_words": ["page", "pages"],
        "range_connectors": ["à"],
        "clause_connectors": ["et"],
        "ordinals": { "premier": { "nth": 1 }, "dernière": "last" }
      }
    }
  }

ENVIRONMENT VARIABLES:
  PDF2TABLE_LEXICON   Path to a JSON lexicon
  PDF2TABLE_JSON      Emit JSON instead of text
  RUST_LOG            Overrides -v / -q log filtering
"#;

/// Resolve natural-language page instructions and normalise markdown tables.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2table",
    version,
    about = "Resolve page instructions and normalise extracted tables",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    global: GlobalArgs,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// JSON lexicon replacing the built-in keyword tables.
    #[arg(long, global = true, env = "PDF2TABLE_LEXICON")]
    lexicon: Option<PathBuf>,

    /// Emit JSON instead of text.
    #[arg(long, global = true, env = "PDF2TABLE_JSON")]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "PDF2TABLE_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "PDF2TABLE_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve an instruction against a single document.
    Pages {
        /// Free-form instruction, e.g. "páginas 1 a 3".
        instruction: String,

        /// Page count of the document.
        #[arg(short, long)]
        total_pages: usize,

        /// Name of the document being resolved. Without it the roster is ignored.
        #[arg(short, long)]
        document: Option<String>,

        /// Every document name of the batch, comma separated.
        #[arg(short, long, value_delimiter = ',')]
        roster: Vec<String>,
    },

    /// Resolve an instruction against every document of a batch.
    Plan {
        /// Free-form instruction, e.g. "página 1 de docA y la última de docB".
        instruction: String,

        /// A document and its page count as NAME=PAGES. Repeatable.
        #[arg(long = "doc", value_name = "NAME=PAGES", required = true, value_parser = parse_doc)]
        docs: Vec<(String, usize)>,
    },

    /// Parse markdown tables from a file or stdin.
    Table {
        /// Markdown file; `-` or nothing reads stdin.
        input: Option<PathBuf>,

        /// Keep cells as text instead of coercing numbers.
        #[arg(long)]
        raw: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let g = &cli.global;

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if g.verbose {
        "debug"
    } else if g.quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match &cli.command {
        Command::Pages {
            instruction,
            total_pages,
            document,
            roster,
        } => {
            let resolver = build_resolver(g)?;
            let selection =
                resolver.resolve(instruction, *total_pages, document.as_deref(), roster.as_slice());
            let name = document.as_deref().unwrap_or("document");
            if g.json {
                print_json(&SelectionReport::new(name, *total_pages, &selection))?;
            } else {
                println!("{}", describe(name, *total_pages, &selection));
            }
        }

        Command::Plan { instruction, docs } => {
            let resolver = build_resolver(g)?;
            let roster: Vec<String> = docs
                .iter()
                .map(|(name, _)| document_name(name).to_string())
                .collect();
            let reports: Vec<SelectionReport> = docs
                .iter()
                .map(|(name, total)| {
                    let selection =
                        resolver.resolve(instruction, *total, Some(document_name(name)), roster.as_slice());
                    SelectionReport::new(name, *total, &selection)
                })
                .collect();

            if g.json {
                print_json(&reports)?;
            } else {
                for r in &reports {
                    println!("{}", describe(&r.document, r.total_pages, &r.selection()));
                }
                if !g.quiet {
                    let selected = reports.iter().filter(|r| !r.pages.is_empty()).count();
                    eprintln!(
                        "{} {}/{} documents selected",
                        green("✔"),
                        bold(&selected.to_string()),
                        reports.len()
                    );
                }
            }
        }

        Command::Table { input, raw } => {
            let text = read_input(input.as_ref())?;
            let grid = parse_extraction(&text);
            let table = if *raw {
                grid.map(|cell| CellValue::Text(cell.clone()))
            } else {
                normalize_grid(&grid)
            };

            if g.json {
                print_json(&table)?;
            } else {
                print!("{}", table.to_markdown());
            }
            if !g.quiet {
                eprintln!(
                    "{}",
                    dim(&format!(
                        "{} rows × {} columns",
                        table.row_count(),
                        table.column_count()
                    ))
                );
            }
        }
    }

    Ok(())
}

/// Per-document selection as printed by `pages` and `plan`.
#[derive(Debug, Serialize)]
struct SelectionReport {
    document: String,
    total_pages: usize,
    /// 1-indexed page numbers.
    pages: Vec<usize>,
}

impl SelectionReport {
    fn new(document: &str, total_pages: usize, selection: &PageSelection) -> Self {
        Self {
            document: document.to_string(),
            total_pages,
            pages: selection.page_numbers().collect(),
        }
    }

    fn selection(&self) -> PageSelection {
        self.pages
            .iter()
            .map(|p| p - 1)
            .collect::<std::collections::BTreeSet<_>>()
            .into()
    }
}

fn build_resolver(g: &GlobalArgs) -> Result<PageResolver> {
    let lexicon = match &g.lexicon {
        Some(path) => Lexicon::from_path(path)
            .with_context(|| format!("Failed to load lexicon from {:?}", path))?,
        None => Lexicon::default(),
    };
    PageResolver::new(&lexicon).context("Lexicon does not compile")
}

/// Parse `--doc NAME=PAGES`.
fn parse_doc(s: &str) -> std::result::Result<(String, usize), String> {
    let (name, pages) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=PAGES, got '{s}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing document name in '{s}'"));
    }
    let pages = pages
        .trim()
        .parse::<usize>()
        .map_err(|e| format!("invalid page count in '{s}': {e}"))?;
    Ok((name.to_string(), pages))
}

fn read_input(input: Option<&PathBuf>) -> Result<String> {
    match input {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {:?}", path)),
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialise output")?;
    println!("{json}");
    Ok(())
}

/// One line per document: `docA.pdf  3 pages  → 1-2, 5`.
fn describe(document: &str, total_pages: usize, selection: &PageSelection) -> String {
    let pages = if selection.is_empty() {
        dim("skipped")
    } else if selection.covers_all(total_pages) {
        format!("all ({})", compress_pages(selection))
    } else {
        compress_pages(selection)
    };
    format!("{}  {}  → {}", bold(document), dim(&format!("{total_pages} pages")), pages)
}

/// Render 1-indexed pages with consecutive runs collapsed: `1-3, 5, 7-8`.
fn compress_pages(selection: &PageSelection) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut run: Option<(usize, usize)> = None;
    for page in selection.page_numbers() {
        run = match run {
            Some((start, end)) if page == end + 1 => Some((start, page)),
            Some(done) => {
                parts.push(format_run(done));
                Some((page, page))
            }
            None => Some((page, page)),
        };
    }
    if let Some(done) = run {
        parts.push(format_run(done));
    }
    parts.join(", ")
}

fn format_run((start, end): (usize, usize)) -> String {
    if start == end {
        start.to_string()
    } else {
        format!("{start}-{end}")
    }
}
