//! PDF report export.
//!
//! Export runs in three stages, each a plain function of the previous one:
//!
//! 1. [`ReportDocument::build`] turns a sheet snapshot into headings and
//!    table cells (all text formatting happens here).
//! 2. [`layout::paginate`] places that text on A4 pages, repeating the table
//!    header whenever a table continues on a new page.
//! 3. `pdf::render` draws the pages with `printpdf` and serializes the whole
//!    document in memory.
//!
//! Nothing reaches the caller until the last stage succeeds, so a failed
//! export never leaves a partial file behind.

pub mod layout;
pub mod metrics;
mod pdf;

use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::{Actor, Criticality, Row, MAX_CRITICALITY};
use crate::sheet::Sheet;

/// Name of the downloaded report.
pub const DEFAULT_FILE_NAME: &str = "Feature_Management.pdf";

/// Title printed at the top of the first page.
pub const DEFAULT_TITLE: &str = "Feature Management";

pub const COLUMNS: usize = 6;

pub const TABLE_HEADER: [&str; COLUMNS] = [
    "Feature",
    "Description",
    "Criticality",
    "Status",
    "Actors",
    "Total Cost",
];

/// Separator between actors in the Actors cell.
pub const ACTOR_SEPARATOR: &str = ", ";

/// Report export errors.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unsupported character {ch:?} in {location}")]
    UnsupportedCharacter { ch: char, location: String },

    #[error("PDF generation failed: {0}")]
    Pdf(String),

    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

/// How a report is produced and named.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    pub file_name: String,
    /// Printed above the first category. `None` starts directly with headings.
    pub title: Option<String>,
    /// Image drawn at the top of the first page. Missing files are skipped.
    pub logo: Option<PathBuf>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_FILE_NAME.to_string(),
            title: Some(DEFAULT_TITLE.to_string()),
            logo: None,
        }
    }
}

/// The text content of a report, before layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDocument {
    pub title: Option<String>,
    pub sections: Vec<ReportSection>,
}

/// One category: a heading followed by a table.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSection {
    pub heading: String,
    pub rows: Vec<[String; COLUMNS]>,
}

impl ReportDocument {
    pub fn build(sheet: &Sheet, title: Option<&str>) -> Self {
        let sections = sheet
            .categories()
            .map(|category| ReportSection {
                heading: normalize(&category.title),
                rows: category.rows.iter().map(row_cells).collect(),
            })
            .collect();

        Self {
            title: title.map(normalize),
            sections,
        }
    }

    /// Reject text the builtin PDF fonts cannot show.
    pub fn check_encoding(&self) -> Result<(), RenderError> {
        if let Some(title) = &self.title {
            check_text(title, || "report title".to_string())?;
        }
        for (s, section) in self.sections.iter().enumerate() {
            check_text(&section.heading, || format!("category {} title", s + 1))?;
            for (r, cells) in section.rows.iter().enumerate() {
                for (c, cell) in cells.iter().enumerate() {
                    check_text(cell, || {
                        format!(
                            "category {} row {} {}",
                            s + 1,
                            r + 1,
                            TABLE_HEADER[c].to_lowercase()
                        )
                    })?;
                }
            }
        }
        Ok(())
    }
}

fn check_text(text: &str, location: impl FnOnce() -> String) -> Result<(), RenderError> {
    match text.chars().find(|&c| c != '\n' && !metrics::is_encodable(c)) {
        Some(ch) => Err(RenderError::UnsupportedCharacter {
            ch,
            location: location(),
        }),
        None => Ok(()),
    }
}

/// Fold line endings and tabs into what the layout understands.
fn normalize(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n").replace('\t', " ")
}

/// The table cells for one row, in [`TABLE_HEADER`] order.
pub fn row_cells(row: &Row) -> [String; COLUMNS] {
    [
        normalize(&row.feature),
        normalize(&row.description),
        format_criticality(row.criticality),
        row.status.as_str().to_string(),
        normalize(&format_actors(row.actors())),
        format_amount(row.total_cost()),
    ]
}

/// `"<n> / 5"`.
pub fn format_criticality(criticality: Criticality) -> String {
    format!("{} / {}", criticality, MAX_CRITICALITY)
}

/// `"<role>: (<cost> €)"` per actor, joined with [`ACTOR_SEPARATOR`].
pub fn format_actors(actors: &[Actor]) -> String {
    actors
        .iter()
        .map(|a| format!("{}: ({} €)", a.role, a.cost))
        .collect::<Vec<_>>()
        .join(ACTOR_SEPARATOR)
}

/// `"<amount> €"`.
pub fn format_amount(amount: f64) -> String {
    format!("{} €", amount)
}

/// Render a sheet to PDF bytes.
pub fn export_document(sheet: &Sheet, options: &ExportOptions) -> Result<Vec<u8>, RenderError> {
    let document = ReportDocument::build(sheet, options.title.as_deref());
    document.check_encoding()?;

    let logo = options.logo.as_deref().and_then(pdf::load_logo);
    let pages = layout::paginate(&document, logo.is_some());
    let doc_title = document.title.as_deref().unwrap_or(DEFAULT_TITLE);
    let bytes = pdf::render(&pages, doc_title, logo.as_ref())?;

    tracing::info!(
        sections = document.sections.len(),
        pages = pages.len(),
        bytes = bytes.len(),
        "rendered report"
    );
    Ok(bytes)
}

/// Render a sheet and write it to `<dir>/<file_name>`.
///
/// The bytes go to a temporary file in `dir` that is renamed over the target
/// only once fully written.
pub fn write_document(
    sheet: &Sheet,
    options: &ExportOptions,
    dir: &Path,
) -> Result<PathBuf, RenderError> {
    let bytes = export_document(sheet, options)?;
    let target = dir.join(&options.file_name);

    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(&bytes)?;
    file.flush()?;
    file.persist(&target).map_err(|e| RenderError::Io(e.error))?;

    tracing::info!(path = %target.display(), "wrote report");
    Ok(target)
}
