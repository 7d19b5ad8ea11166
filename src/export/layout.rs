//! Report layout
//!
//! Places the title, header row and record rows on A4 pages. All
//! coordinates are millimetres from the top-left corner of the page.

use crate::record::{Record, COLUMNS};

use super::metrics::text_width;

// =============================================================================
// Layout Constants
// =============================================================================

pub const TITLE: &str = "Liste des Réserves";

pub const PAGE_WIDTH: f64 = 210.0;
pub const PAGE_HEIGHT: f64 = 297.0;
pub const MARGIN: f64 = 10.0;
/// Rows may not extend past this distance from the bottom edge
pub const BOTTOM_MARGIN: f64 = 15.0;

pub const CELL_WIDTH: f64 = 38.0;
pub const ROW_HEIGHT: f64 = 8.0;
pub const CELL_PADDING: f64 = 1.0;
pub const MAX_CELL_CHARS: usize = 35;

pub const TITLE_HEIGHT: f64 = 10.0;
pub const TITLE_GAP: f64 = 5.0;
pub const TITLE_FONT_SIZE: f64 = 12.0;
pub const BODY_FONT_SIZE: f64 = 10.0;

pub const HEADER_FILL: (u8, u8, u8) = (200, 220, 255);

/// Standard font used for a piece of text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

/// One drawing instruction
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// Bordered rectangle, optionally filled
    Cell {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: Option<(u8, u8, u8)>,
    },
    /// Text with its baseline at `y`
    Text {
        x: f64,
        y: f64,
        font: Font,
        size: f64,
        text: String,
    },
}

/// Drawing instructions of one page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub elements: Vec<Element>,
}

/// A laid-out report
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pages: Vec<Page>,
    rendered_rows: usize,
}

impl Report {
    /// Lay out the title, the header row and one row per record
    ///
    /// A new page starts when the next row would cross the bottom margin. The
    /// header row is not repeated on following pages.
    pub fn build(records: &[Record]) -> Self {
        let mut builder = LayoutBuilder::new();

        builder.title(TITLE);
        builder.row(&COLUMNS[..], Font::Bold, Some(HEADER_FILL));
        for record in records {
            let cells: Vec<String> = record.cells().iter().map(|v| truncate(v)).collect();
            builder.row(&cells, Font::Regular, None);
        }

        builder.finish()
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Table rows drawn, header included
    pub fn rendered_rows(&self) -> usize {
        self.rendered_rows
    }

    /// Every text run, in drawing order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.pages
            .iter()
            .flat_map(|p| p.elements.iter())
            .filter_map(|e| match e {
                Element::Text { text, .. } => Some(text.as_str()),
                Element::Cell { .. } => None,
            })
    }
}

/// First `MAX_CELL_CHARS` characters of a value
pub fn truncate(value: &str) -> String {
    value.chars().take(MAX_CELL_CHARS).collect()
}

/// Cursor-based page builder
struct LayoutBuilder {
    pages: Vec<Page>,
    current: Page,
    y: f64,
    rendered_rows: usize,
}

impl LayoutBuilder {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: Page::default(),
            y: MARGIN,
            rendered_rows: 0,
        }
    }

    fn title(&mut self, text: &str) {
        let width = PAGE_WIDTH - 2.0 * MARGIN;
        let x = MARGIN + (width - text_width(text, Font::Bold, TITLE_FONT_SIZE)) / 2.0;
        self.current.elements.push(Element::Text {
            x,
            y: baseline(self.y, TITLE_HEIGHT, TITLE_FONT_SIZE),
            font: Font::Bold,
            size: TITLE_FONT_SIZE,
            text: text.to_string(),
        });
        self.y += TITLE_HEIGHT + TITLE_GAP;
    }

    /// Header cells are centered, record cells left-aligned
    fn row<S: AsRef<str>>(&mut self, cells: &[S], font: Font, fill: Option<(u8, u8, u8)>) {
        if self.y + ROW_HEIGHT > PAGE_HEIGHT - BOTTOM_MARGIN {
            self.break_page();
        }

        let mut x = MARGIN;
        for value in cells {
            let value = value.as_ref();
            self.current.elements.push(Element::Cell {
                x,
                y: self.y,
                width: CELL_WIDTH,
                height: ROW_HEIGHT,
                fill,
            });

            if !value.is_empty() {
                let text_x = match fill {
                    Some(_) => x + (CELL_WIDTH - text_width(value, font, BODY_FONT_SIZE)) / 2.0,
                    None => x + CELL_PADDING,
                };
                self.current.elements.push(Element::Text {
                    x: text_x,
                    y: baseline(self.y, ROW_HEIGHT, BODY_FONT_SIZE),
                    font,
                    size: BODY_FONT_SIZE,
                    text: value.to_string(),
                });
            }
            x += CELL_WIDTH;
        }

        self.y += ROW_HEIGHT;
        self.rendered_rows += 1;
    }

    fn break_page(&mut self) {
        let page = std::mem::take(&mut self.current);
        self.pages.push(page);
        self.y = MARGIN;
    }

    fn finish(mut self) -> Report {
        self.pages.push(self.current);
        Report {
            pages: self.pages,
            rendered_rows: self.rendered_rows,
        }
    }
}

/// Baseline that vertically centers text of `size` points in a box
fn baseline(top: f64, height: f64, size: f64) -> f64 {
    top + height / 2.0 + 0.3 * size * 25.4 / 72.0
}
