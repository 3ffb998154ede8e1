use docx_rs::{AlignmentType, BreakType, Docx, Paragraph, Run};

use super::{Align, BreakKind, DocumentInfo, DocumentSink, PlacedLine, TextStyle};
use crate::domain::error::{AppError, Result};

/// 1pt = 20 twips.
const TWIPS_PER_POINT: f32 = 20.0;
const RULE_WIDTH: usize = 72;

/// Builds a `.docx` from whole paragraphs; Word does its own wrapping and
/// pagination, so only forced breaks are carried over.
pub struct DocxSink {
    paragraphs: Vec<Paragraph>,
}

impl DocxSink {
    pub fn new() -> Self {
        Self {
            paragraphs: Vec::new(),
        }
    }

    fn styled_paragraph(text: &str, style: &TextStyle) -> Paragraph {
        // Run sizes are in half-points.
        let mut run = Run::new()
            .add_text(text)
            .size((style.size * 2.0).round() as usize);
        if style.bold {
            run = run.bold();
        }

        let paragraph = Paragraph::new().add_run(run);
        match style.align {
            Align::Center => paragraph.align(AlignmentType::Center),
            Align::Left if style.indent > 0.0 => paragraph.indent(
                Some((style.indent * TWIPS_PER_POINT).round() as i32),
                None,
                None,
                None,
            ),
            Align::Left => paragraph,
        }
    }
}

impl Default for DocxSink {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentSink for DocxSink {
    fn paragraph(&mut self, text: &str, _lines: &[PlacedLine], style: &TextStyle) {
        self.paragraphs.push(Self::styled_paragraph(text, style));
    }

    fn rule(&mut self, _page: usize, _y: f32, _x_start: f32, _x_end: f32) {
        self.paragraphs.push(
            Paragraph::new()
                .add_run(Run::new().add_text("_".repeat(RULE_WIDTH)))
                .align(AlignmentType::Center),
        );
    }

    fn page_break(&mut self, kind: BreakKind) {
        if kind == BreakKind::Forced {
            self.paragraphs
                .push(Paragraph::new().add_run(Run::new().add_break(BreakType::Page)));
        }
    }

    fn footer(&mut self, text: &str, _lines: &[PlacedLine], style: &TextStyle) {
        self.paragraphs.push(Self::styled_paragraph(text, style));
    }

    fn finish(self: Box<Self>, _page_count: usize, _info: &DocumentInfo) -> Result<Vec<u8>> {
        let docx = self
            .paragraphs
            .into_iter()
            .fold(Docx::new(), |docx, paragraph| docx.add_paragraph(paragraph));

        let mut buffer = std::io::Cursor::new(Vec::new());
        docx.build()
            .pack(&mut buffer)
            .map_err(|e| AppError::Internal(format!("Failed to package DOCX: {}", e)))?;
        Ok(buffer.into_inner())
    }
}

/// Paragraph texts of a packaged document, in order. Used by tests to read
/// back generated reports.
#[cfg(test)]
pub(crate) fn paragraph_texts(bytes: &[u8]) -> Vec<String> {
    let docx = docx_rs::read_docx(bytes).expect("generated DOCX must parse");
    docx.document
        .children
        .iter()
        .filter_map(|child| match child {
            docx_rs::DocumentChild::Paragraph(paragraph) => Some(run_text(paragraph)),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
fn run_text(paragraph: &docx_rs::Paragraph) -> String {
    let mut buffer = String::new();
    for child in &paragraph.children {
        if let docx_rs::ParagraphChild::Run(run) = child {
            for run_child in &run.children {
                if let docx_rs::RunChild::Text(text) = run_child {
                    buffer.push_str(&text.text);
                }
            }
        }
    }
    buffer
}
