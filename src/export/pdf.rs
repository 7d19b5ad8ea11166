//! PDF serialization
//!
//! Writes a laid-out `Report` as an uncompressed PDF 1.4 document using the
//! standard Helvetica fonts. No dates or ids are embedded, so identical input
//! gives identical bytes.
//!
//! ## Object Layout
//! ```text
//! 1        Catalog
//! 2        Pages
//! 3        Font /F1 Helvetica
//! 4        Font /F2 Helvetica-Bold
//! 5 + 2i   Page i
//! 6 + 2i   Content stream of page i
//! ```

use std::io::Write;

use crate::error::Result;

use super::layout::{Element, Font, Page, Report, PAGE_HEIGHT, PAGE_WIDTH};
use super::metrics::pdf_string;

/// Points per millimetre
const K: f64 = 72.0 / 25.4;

/// Line width of cell borders, in millimetres
const LINE_WIDTH: f64 = 0.2;

const FIRST_PAGE_OBJECT: usize = 5;

impl Report {
    /// Serialize the report as PDF bytes
    pub fn to_pdf(&self) -> Result<Vec<u8>> {
        let mut writer = PdfWriter::new();

        writer.object(1, "<< /Type /Catalog /Pages 2 0 R >>")?;

        let kids: Vec<String> = (0..self.page_count())
            .map(|i| format!("{} 0 R", page_object(i)))
            .collect();
        writer.object(
            2,
            &format!(
                "<< /Type /Pages /Kids [{}] /Count {} >>",
                kids.join(" "),
                self.page_count()
            ),
        )?;

        writer.object(
            3,
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>",
        )?;
        writer.object(
            4,
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>",
        )?;

        for (i, page) in self.pages().iter().enumerate() {
            let number = page_object(i);
            writer.object(
                number,
                &format!(
                    "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
                     /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {} 0 R >>",
                    PAGE_WIDTH * K,
                    PAGE_HEIGHT * K,
                    number + 1
                ),
            )?;
            writer.stream(number + 1, &content_stream(page))?;
        }

        writer.finish()
    }
}

fn page_object(index: usize) -> usize {
    FIRST_PAGE_OBJECT + 2 * index
}

/// Drawing operators for one page
fn content_stream(page: &Page) -> String {
    let mut ops = vec![format!("{:.2} w", LINE_WIDTH * K)];

    for element in &page.elements {
        match element {
            Element::Cell {
                x,
                y,
                width,
                height,
                fill,
            } => {
                let rect = format!(
                    "{:.2} {:.2} {:.2} {:.2} re",
                    x * K,
                    (PAGE_HEIGHT - y - height) * K,
                    width * K,
                    height * K
                );
                match fill {
                    Some((r, g, b)) => ops.push(format!(
                        "q {:.3} {:.3} {:.3} rg {} B Q",
                        f64::from(*r) / 255.0,
                        f64::from(*g) / 255.0,
                        f64::from(*b) / 255.0,
                        rect
                    )),
                    None => ops.push(format!("{} S", rect)),
                }
            }
            Element::Text {
                x,
                y,
                font,
                size,
                text,
            } => {
                let font = match font {
                    Font::Regular => "F1",
                    Font::Bold => "F2",
                };
                ops.push(format!(
                    "BT /{} {:.2} Tf {:.2} {:.2} Td ({}) Tj ET",
                    font,
                    size,
                    x * K,
                    (PAGE_HEIGHT - y) * K,
                    pdf_string(text)
                ));
            }
        }
    }

    ops.join("\n")
}

/// Tracks object offsets while the document is written
struct PdfWriter {
    out: Vec<u8>,
    offsets: Vec<(usize, usize)>,
}

impl PdfWriter {
    fn new() -> Self {
        let mut out = Vec::new();
        out.extend_from_slice(b"%PDF-1.4\n");
        Self {
            out,
            offsets: Vec::new(),
        }
    }

    fn object(&mut self, number: usize, body: &str) -> Result<()> {
        self.offsets.push((number, self.out.len()));
        write!(self.out, "{} 0 obj\n{}\nendobj\n", number, body)?;
        Ok(())
    }

    fn stream(&mut self, number: usize, content: &str) -> Result<()> {
        self.offsets.push((number, self.out.len()));
        write!(
            self.out,
            "{} 0 obj\n<< /Length {} >>\nstream\n{}\nendstream\nendobj\n",
            number,
            content.len(),
            content
        )?;
        Ok(())
    }

    /// Write the cross-reference table and trailer
    fn finish(mut self) -> Result<Vec<u8>> {
        self.offsets.sort_unstable();
        let size = self.offsets.len() + 1;
        let xref_offset = self.out.len();

        write!(self.out, "xref\n0 {}\n0000000000 65535 f \n", size)?;
        for (_, offset) in &self.offsets {
            write!(self.out, "{:010} 00000 n \n", offset)?;
        }
        write!(
            self.out,
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            size, xref_offset
        )?;

        Ok(self.out)
    }
}
