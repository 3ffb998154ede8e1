use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use super::metrics::{encode_win_ansi, text_width};
use super::{BreakKind, DocumentInfo, DocumentSink, PageGeometry, PlacedLine, TextStyle};
use crate::domain::error::{AppError, Result};

const FONT_REGULAR: &str = "F1";
const FONT_BOLD: &str = "F2";
const PAGE_NUMBER_SIZE: f32 = 8.0;

/// Writes Helvetica text onto A4-style pages with `lopdf`.
pub struct PdfSink {
    geometry: PageGeometry,
    pages: Vec<Vec<Operation>>,
}

impl PdfSink {
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            pages: vec![Vec::new()],
        }
    }

    fn page_mut(&mut self, page: usize) -> &mut Vec<Operation> {
        if self.pages.len() <= page {
            self.pages.resize_with(page + 1, Vec::new);
        }
        &mut self.pages[page]
    }

    fn push_line(&mut self, line: &PlacedLine, size: f32, bold: bool) {
        let font = if bold { FONT_BOLD } else { FONT_REGULAR };
        let ops = self.page_mut(line.page);
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new("Tf", vec![font.into(), size.into()]));
        ops.push(Operation::new("Td", vec![line.x.into(), line.baseline.into()]));
        ops.push(Operation::new(
            "Tj",
            vec![Object::string_literal(encode_win_ansi(&line.text))],
        ));
        ops.push(Operation::new("ET", vec![]));
    }

    fn push_page_numbers(&mut self, page_count: usize) {
        let y = self.geometry.margin_bottom / 2.0;
        for index in 0..page_count {
            let label = format!("Halaman {} dari {}", index + 1, page_count);
            let width = text_width(&label, PAGE_NUMBER_SIZE, false);
            let line = PlacedLine {
                x: (self.geometry.width - width) / 2.0,
                baseline: y,
                page: index,
                text: label,
            };
            self.push_line(&line, PAGE_NUMBER_SIZE, false);
        }
    }
}

impl DocumentSink for PdfSink {
    fn paragraph(&mut self, _text: &str, lines: &[PlacedLine], style: &TextStyle) {
        for line in lines {
            self.push_line(line, style.size, style.bold);
        }
    }

    fn rule(&mut self, page: usize, y: f32, x_start: f32, x_end: f32) {
        let ops = self.page_mut(page);
        ops.push(Operation::new("w", vec![0.75_f32.into()]));
        ops.push(Operation::new("m", vec![x_start.into(), y.into()]));
        ops.push(Operation::new("l", vec![x_end.into(), y.into()]));
        ops.push(Operation::new("S", vec![]));
    }

    fn page_break(&mut self, _kind: BreakKind) {
        // Pages are addressed by index and padded out in `finish`.
    }

    fn footer(&mut self, _text: &str, lines: &[PlacedLine], style: &TextStyle) {
        for line in lines {
            self.push_line(line, style.size, style.bold);
        }
    }

    fn finish(mut self: Box<Self>, page_count: usize, info: &DocumentInfo) -> Result<Vec<u8>> {
        let page_count = page_count.max(self.pages.len());
        self.page_mut(page_count - 1);
        self.push_page_numbers(page_count);

        let geometry = self.geometry;
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let regular_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let bold_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                FONT_REGULAR => regular_id,
                FONT_BOLD => bold_id,
            },
        });

        let mut kids: Vec<Object> = Vec::with_capacity(self.pages.len());
        for operations in std::mem::take(&mut self.pages) {
            let content = Content { operations };
            let encoded = content
                .encode()
                .map_err(|e| AppError::Internal(format!("Failed to encode PDF page: {}", e)))?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
            });
            kids.push(page_id.into());
        }

        let page_total = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_total,
                "MediaBox" => vec![
                    0.into(),
                    0.into(),
                    geometry.width.into(),
                    geometry.height.into(),
                ],
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(encode_win_ansi(&info.title)),
            "Producer" => Object::string_literal(concat!("slf-report ", env!("CARGO_PKG_VERSION"))),
            "CreationDate" => Object::string_literal(info.creation_date.clone()),
        });
        doc.trailer.set("Info", info_id);

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .map_err(|e| AppError::Internal(format!("Failed to serialize PDF: {}", e)))?;
        Ok(buffer)
    }
}

/// Text of every page, in page order. Used by tests to read back reports.
#[cfg(test)]
pub(crate) fn extract_all_text(bytes: &[u8]) -> String {
    let doc = Document::load_mem(bytes).expect("generated PDF must parse");
    let pages: Vec<u32> = doc.get_pages().keys().copied().collect();
    doc.extract_text(&pages).expect("generated PDF text must extract")
}
