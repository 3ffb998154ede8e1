//! Output stream for report documents.
//!
//! Section builders describe content as [`Block`]s; a [`ReportWriter`] lays
//! them out against a [`Cursor`] and forwards the result to a format
//! specific [`DocumentSink`]. The writer is consumed by [`ReportWriter::finish`],
//! so a document can only be finalized once.

pub mod cursor;
pub mod docx;
pub mod metrics;
pub mod pdf;

use crate::domain::error::Result;
use crate::domain::report::ReportFormat;

pub use cursor::{Cursor, PageGeometry, Placement};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub bold: bool,
    pub align: Align,
    /// Left indent in points; ignored for centered text.
    pub indent: f32,
}

impl TextStyle {
    pub fn body(size: f32) -> Self {
        Self {
            size,
            bold: false,
            align: Align::Left,
            indent: 0.0,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn centered(mut self) -> Self {
        self.align = Align::Center;
        self
    }

    pub fn indented(mut self, indent: f32) -> Self {
        self.indent = indent;
        self
    }

    pub fn line_height(&self) -> f32 {
        self.size * 1.4
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Text { text: String, style: TextStyle },
    /// Vertical gap in points.
    Space(f32),
    /// Full-width horizontal rule.
    Rule,
    /// Forced page break; a no-op when the current page is still empty.
    PageBreak,
    /// Text pinned to the bottom margin of the current page.
    Footer { text: String, style: TextStyle },
}

impl Block {
    pub fn text(text: impl Into<String>, style: TextStyle) -> Self {
        Block::Text {
            text: text.into(),
            style,
        }
    }

    /// Plain text carried by the block, if any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Block::Text { text, .. } | Block::Footer { text, .. } => Some(text),
            _ => None,
        }
    }
}

/// One wrapped line of a paragraph with its final position.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub x: f32,
    pub baseline: f32,
    pub page: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakKind {
    /// Requested by a section.
    Forced,
    /// Content ran past the bottom of the page.
    Overflow,
}

/// Metadata written into the document where the format supports it.
#[derive(Debug, Clone, Default)]
pub struct DocumentInfo {
    pub title: String,
    /// PDF date string (`D:YYYYMMDDHHmmSS+HH'mm'`).
    pub creation_date: String,
}

/// Format backend fed by [`ReportWriter`].
pub trait DocumentSink: Send {
    /// A paragraph of `text`; `lines` holds the writer's wrapped layout.
    fn paragraph(&mut self, text: &str, lines: &[PlacedLine], style: &TextStyle);

    fn rule(&mut self, page: usize, y: f32, x_start: f32, x_end: f32);

    /// Page-addressed sinks may get a `Forced` break after an `Overflow`
    /// one for the same page boundary and should not add a page for it.
    fn page_break(&mut self, kind: BreakKind);

    fn footer(&mut self, text: &str, lines: &[PlacedLine], style: &TextStyle);

    /// Encodes the whole document. `page_count` is the writer's page count.
    fn finish(self: Box<Self>, page_count: usize, info: &DocumentInfo) -> Result<Vec<u8>>;
}

/// A finalized document held in memory.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub format: ReportFormat,
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

pub struct ReportWriter {
    format: ReportFormat,
    geometry: PageGeometry,
    cursor: Cursor,
    sink: Box<dyn DocumentSink>,
    /// Content was written since the sink last saw a forced break.
    unbroken_content: bool,
}

impl ReportWriter {
    pub fn new(format: ReportFormat, geometry: PageGeometry) -> Self {
        let sink: Box<dyn DocumentSink> = match format {
            ReportFormat::Pdf => Box::new(pdf::PdfSink::new(geometry)),
            ReportFormat::Docx => Box::new(docx::DocxSink::new()),
        };
        Self::with_sink(format, geometry, sink)
    }

    pub fn with_sink(
        format: ReportFormat,
        geometry: PageGeometry,
        sink: Box<dyn DocumentSink>,
    ) -> Self {
        Self {
            format,
            geometry,
            cursor: Cursor::start(),
            sink,
            unbroken_content: false,
        }
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn page_count(&self) -> usize {
        self.cursor.page() + 1
    }

    pub fn write_all(&mut self, blocks: &[Block]) {
        for block in blocks {
            self.write(block);
        }
    }

    pub fn write(&mut self, block: &Block) {
        match block {
            Block::Text { text, style } => self.text(text, style),
            Block::Space(points) => {
                let next = self.cursor.skip(*points, &self.geometry);
                self.move_to(next, BreakKind::Overflow);
            }
            Block::Rule => self.rule(),
            Block::PageBreak => self.page_break(),
            Block::Footer { text, style } => self.footer(text, style),
        }
    }

    /// Starts a new page unless the cursor already sits at the top of one.
    ///
    /// When overflow has already moved the cursor to a fresh page, the sink
    /// still receives a forced break so flowing formats (DOCX) keep it.
    pub fn page_break(&mut self) {
        if self.cursor.at_page_start() {
            if self.unbroken_content {
                self.sink.page_break(BreakKind::Forced);
                self.unbroken_content = false;
            }
            return;
        }
        let next = self.cursor.page_break();
        self.move_to(next, BreakKind::Forced);
        self.unbroken_content = false;
    }

    pub fn text(&mut self, text: &str, style: &TextStyle) {
        let available = self.available_width(style);
        let wrapped = metrics::wrap_text(text, style.size, style.bold, available);

        let mut placed = Vec::with_capacity(wrapped.len());
        for line in wrapped {
            let (placement, next) = self.cursor.advance(style.line_height(), &self.geometry);
            self.move_to_placement(placement);
            placed.push(PlacedLine {
                x: self.line_x(&line, style),
                baseline: placement.baseline(&self.geometry, style.size),
                page: placement.page,
                text: line,
            });
            self.cursor = next;
        }

        self.sink.paragraph(text, &placed, style);
        self.unbroken_content = true;
    }

    pub fn rule(&mut self) {
        let (placement, next) = self.cursor.advance(8.0, &self.geometry);
        self.move_to_placement(placement);
        let y = self.geometry.content_top() - placement.offset - 4.0;
        let x_start = self.geometry.margin_left;
        let x_end = self.geometry.width - self.geometry.margin_right;
        self.sink.rule(placement.page, y, x_start, x_end);
        self.cursor = next;
        self.unbroken_content = true;
    }

    /// Pins `text` to the bottom margin of the current page. Long footers
    /// wrap and stack upwards so the last line sits on the margin.
    pub fn footer(&mut self, text: &str, style: &TextStyle) {
        let available = self.available_width(style);
        let wrapped = metrics::wrap_text(text, style.size, style.bold, available);
        let page = self.cursor.page();
        let line_count = wrapped.len();

        let placed: Vec<PlacedLine> = wrapped
            .into_iter()
            .enumerate()
            .map(|(idx, line)| {
                let lines_below = (line_count - 1 - idx) as f32;
                PlacedLine {
                    x: self.line_x(&line, style),
                    baseline: self.geometry.margin_bottom + lines_below * style.line_height(),
                    page,
                    text: line,
                }
            })
            .collect();

        self.sink.footer(text, &placed, style);
    }

    /// Finalizes the document into memory, consuming the writer.
    pub fn finish(self, info: &DocumentInfo) -> Result<RenderedDocument> {
        let page_count = self.page_count();
        let bytes = self.sink.finish(page_count, info)?;
        Ok(RenderedDocument {
            format: self.format,
            bytes,
            page_count,
        })
    }

    fn available_width(&self, style: &TextStyle) -> f32 {
        match style.align {
            Align::Left => (self.geometry.content_width() - style.indent).max(1.0),
            Align::Center => self.geometry.content_width().max(1.0),
        }
    }

    fn line_x(&self, line: &str, style: &TextStyle) -> f32 {
        match style.align {
            Align::Left => self.geometry.margin_left + style.indent,
            Align::Center => {
                let width = metrics::text_width(line, style.size, style.bold);
                self.geometry.margin_left + ((self.geometry.content_width() - width) / 2.0).max(0.0)
            }
        }
    }

    fn move_to_placement(&mut self, placement: Placement) {
        if placement.page > self.cursor.page() {
            self.sink.page_break(BreakKind::Overflow);
        }
    }

    fn move_to(&mut self, next: Cursor, kind: BreakKind) {
        if next.page() > self.cursor.page() {
            self.sink.page_break(kind);
        }
        self.cursor = next;
    }
}
