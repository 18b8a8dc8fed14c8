//! Page layout for the report.
//!
//! Coordinates are millimetres measured from the top-left corner of an A4
//! portrait page; the PDF stage flips them to the bottom-left origin.
//!
//! Tables paginate row by row. When a row does not fit in what is left of a
//! page, the table continues on the next page below a repeated header row. A
//! row taller than a whole page is split line-wise. A category heading is
//! never left alone at the bottom of a page: it moves to the next page
//! together with the header row and the first line of the table.

use super::metrics::{self, Face, PT_TO_MM};
use super::{ReportDocument, COLUMNS, TABLE_HEADER};

pub const PAGE_WIDTH: f32 = 210.0;
pub const PAGE_HEIGHT: f32 = 297.0;
pub const MARGIN_X: f32 = 14.0;
pub const MARGIN_TOP: f32 = 10.0;
pub const MARGIN_BOTTOM: f32 = 10.0;
pub const CONTENT_BOTTOM: f32 = PAGE_HEIGHT - MARGIN_BOTTOM;
pub const TABLE_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN_X;

pub const TITLE_SIZE: f32 = 18.0;
pub const HEADING_SIZE: f32 = 14.0;
pub const TABLE_SIZE: f32 = 10.0;

pub const LOGO_WIDTH: f32 = 40.0;
pub const LOGO_HEIGHT: f32 = 20.0;
const LOGO_GAP: f32 = 5.0;

const LINE_SPACING: f32 = 1.15;
const CELL_PADDING: f32 = 1.5;
const TITLE_GAP: f32 = 6.0;
const HEADING_GAP: f32 = 2.5;
const TABLE_GAP: f32 = 10.0;

/// Share of the table width given to each column.
const COLUMN_WEIGHTS: [f32; COLUMNS] = [0.18, 0.28, 0.11, 0.12, 0.19, 0.12];

pub const HEADER_FILL: Rgb = Rgb(76, 175, 80);
pub const GRID: Rgb = Rgb(80, 80, 80);
pub const BLACK: Rgb = Rgb(0, 0, 0);
pub const WHITE: Rgb = Rgb(255, 255, 255);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// One drawing instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// A single line of text; `baseline` is measured from the page top.
    Text {
        x: f32,
        baseline: f32,
        size: f32,
        face: Face,
        color: Rgb,
        text: String,
    },
    /// An outlined, optionally filled rectangle; `y` is its top edge.
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Option<Rgb>,
        stroke: Rgb,
    },
    /// The box reserved for the logo image.
    Logo {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
}

/// Everything drawn on one page, in painting order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub ops: Vec<DrawOp>,
}

impl PageLayout {
    /// The text lines of the page, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Whether the page starts a table fragment with the header row.
    pub fn has_table_header(&self) -> bool {
        let texts: Vec<&str> = self.texts().collect();
        texts
            .windows(COLUMNS)
            .any(|window| window == TABLE_HEADER.as_slice())
    }
}

#[derive(Debug, Clone, Copy)]
enum RowKind {
    Header,
    Body,
}

fn line_height(size: f32) -> f32 {
    size * PT_TO_MM * LINE_SPACING
}

/// Distance from the top of a line box to its baseline.
fn baseline_offset(size: f32) -> f32 {
    let em = size * PT_TO_MM;
    (line_height(size) - em) / 2.0 + em * 0.8
}

fn row_height(lines: usize) -> f32 {
    lines.max(1) as f32 * line_height(TABLE_SIZE) + 2.0 * CELL_PADDING
}

/// Left edge and width of every column.
fn column_layout() -> [(f32, f32); COLUMNS] {
    let mut columns = [(0.0, 0.0); COLUMNS];
    let mut x = MARGIN_X;
    for (slot, weight) in columns.iter_mut().zip(COLUMN_WEIGHTS) {
        let width = TABLE_WIDTH * weight;
        *slot = (x, width);
        x += width;
    }
    columns
}

/// Wrap each cell to its column width.
fn measure<S: AsRef<str>>(cells: &[S], face: Face) -> Vec<Vec<String>> {
    column_layout()
        .iter()
        .zip(cells)
        .map(|((_, width), cell)| {
            metrics::wrap(
                cell.as_ref(),
                width - 2.0 * CELL_PADDING,
                TABLE_SIZE,
                face,
            )
        })
        .collect()
}

fn max_lines(cells: &[Vec<String>]) -> usize {
    cells.iter().map(Vec::len).max().unwrap_or(0)
}

/// Keep the first `keep` lines of every cell and return the remainder.
fn split_lines(cells: &mut [Vec<String>], keep: usize) -> Vec<Vec<String>> {
    cells
        .iter_mut()
        .map(|cell| cell.split_off(keep.min(cell.len())))
        .collect()
}

struct Pager {
    done: Vec<PageLayout>,
    page: PageLayout,
    y: f32,
}

impl Pager {
    fn new() -> Self {
        Self {
            done: Vec::new(),
            page: PageLayout::default(),
            y: MARGIN_TOP,
        }
    }

    fn remaining(&self) -> f32 {
        CONTENT_BOTTOM - self.y
    }

    fn is_fresh(&self) -> bool {
        self.page.ops.is_empty()
    }

    fn new_page(&mut self) {
        self.done.push(std::mem::take(&mut self.page));
        self.y = MARGIN_TOP;
    }

    /// Draw free-standing lines, breaking to a new page where one does not fit.
    fn text_lines(&mut self, lines: &[String], size: f32, face: Face) {
        for line in lines {
            if line_height(size) > self.remaining() && !self.is_fresh() {
                self.new_page();
            }
            self.page.ops.push(DrawOp::Text {
                x: MARGIN_X,
                baseline: self.y + baseline_offset(size),
                size,
                face,
                color: BLACK,
                text: line.clone(),
            });
            self.y += line_height(size);
        }
    }

    fn draw_row(&mut self, cells: &[Vec<String>], kind: RowKind) {
        let height = row_height(max_lines(cells));
        let (face, fill, color) = match kind {
            RowKind::Header => (Face::Bold, Some(HEADER_FILL), WHITE),
            RowKind::Body => (Face::Regular, None, BLACK),
        };

        for ((x, width), lines) in column_layout().into_iter().zip(cells) {
            self.page.ops.push(DrawOp::Rect {
                x,
                y: self.y,
                width,
                height,
                fill,
                stroke: GRID,
            });
            for (i, line) in lines.iter().enumerate() {
                if line.is_empty() {
                    continue;
                }
                self.page.ops.push(DrawOp::Text {
                    x: x + CELL_PADDING,
                    baseline: self.y
                        + CELL_PADDING
                        + i as f32 * line_height(TABLE_SIZE)
                        + baseline_offset(TABLE_SIZE),
                    size: TABLE_SIZE,
                    face,
                    color,
                    text: line.clone(),
                });
            }
        }
        self.y += height;
    }

    fn finish(mut self) -> Vec<PageLayout> {
        self.done.push(self.page);
        self.done
    }
}

/// Lay out a report document on pages. Always yields at least one page.
pub fn paginate(document: &ReportDocument, with_logo: bool) -> Vec<PageLayout> {
    let mut pager = Pager::new();

    if with_logo {
        pager.page.ops.push(DrawOp::Logo {
            x: MARGIN_X,
            y: MARGIN_TOP,
            width: LOGO_WIDTH,
            height: LOGO_HEIGHT,
        });
        pager.y += LOGO_HEIGHT + LOGO_GAP;
    }

    if let Some(title) = &document.title {
        let lines = metrics::wrap(title, TABLE_WIDTH, TITLE_SIZE, Face::Bold);
        pager.text_lines(&lines, TITLE_SIZE, Face::Bold);
        pager.y += TITLE_GAP;
    }

    let header = measure(&TABLE_HEADER, Face::Bold);
    let header_height = row_height(max_lines(&header));
    let page_capacity = CONTENT_BOTTOM - MARGIN_TOP - header_height;

    for section in &document.sections {
        let heading = metrics::wrap(&section.heading, TABLE_WIDTH, HEADING_SIZE, Face::Bold);
        let heading_height = heading.len() as f32 * line_height(HEADING_SIZE) + HEADING_GAP;
        let lead = if section.rows.is_empty() {
            0.0
        } else {
            row_height(1)
        };
        if heading_height + header_height + lead > pager.remaining() && !pager.is_fresh() {
            pager.new_page();
        }

        pager.text_lines(&heading, HEADING_SIZE, Face::Bold);
        pager.y += HEADING_GAP;
        if header_height + lead > pager.remaining() {
            pager.new_page();
        }
        pager.draw_row(&header, RowKind::Header);

        for cells in &section.rows {
            let mut lines = measure(cells, Face::Regular);
            loop {
                let needed = row_height(max_lines(&lines));
                if needed <= pager.remaining() {
                    pager.draw_row(&lines, RowKind::Body);
                    break;
                }
                if needed > page_capacity {
                    let fit = ((pager.remaining() - 2.0 * CELL_PADDING)
                        / line_height(TABLE_SIZE))
                    .floor();
                    if fit >= 1.0 {
                        let rest = split_lines(&mut lines, fit as usize);
                        pager.draw_row(&lines, RowKind::Body);
                        lines = rest;
                    }
                }
                pager.new_page();
                pager.draw_row(&header, RowKind::Header);
            }
        }

        pager.y += TABLE_GAP;
    }

    pager.finish()
}
