use std::io::BufWriter;

use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
};

use super::blocks::{Block, Span};
use super::document::{JustificationDocument, CLAIM_INFORMATION_HEADING};
use super::RenderError;

const PAGE_WIDTH: Mm = Mm(210.0);
const PAGE_HEIGHT: Mm = Mm(297.0);
const LEFT: f32 = 20.0;
const TOP: f32 = 280.0;
const BOTTOM: f32 = 20.0;

const TITLE_SIZE: f32 = 16.0;
const HEADING_SIZE: f32 = 12.0;
const BODY_SIZE: f32 = 10.0;
const LINE_HEIGHT: f32 = 5.0;
const WRAP_CHARS: usize = 95;

/// Builtin fonts only cover WinAnsi; map the typographic characters the
/// letter and summaries use and replace anything else.
fn pdf_safe(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2022}' | '\u{2013}' | '\u{2014}' => '-',
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201C}' | '\u{201D}' => '"',
            c if c.is_ascii() => c,
            _ => '?',
        })
        .collect()
}

/// Split spans into words, then greedily fill lines of at most `max_chars`.
fn wrap_spans(spans: &[Span], max_chars: usize) -> Vec<Vec<(String, bool)>> {
    let mut lines = Vec::new();
    let mut current: Vec<(String, bool)> = Vec::new();
    let mut width = 0usize;

    for span in spans {
        for word in span.text.split_whitespace() {
            let needed = if current.is_empty() { word.len() } else { word.len() + 1 };
            if width + needed > max_chars && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                width = 0;
            }
            width += if current.is_empty() { word.len() } else { word.len() + 1 };
            current.push((pdf_safe(word), span.bold));
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Writes top to bottom, opening a new page when the cursor hits the margin.
struct PageWriter<'d> {
    doc: &'d PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
    pages: usize,
}

impl<'d> PageWriter<'d> {
    fn ensure_room(&mut self, height: f32) {
        if self.y - height < BOTTOM {
            let (page, layer) = self.doc.add_page(PAGE_WIDTH, PAGE_HEIGHT, "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = TOP;
            self.pages += 1;
        }
    }

    fn heading(&mut self, text: &str, size: f32) {
        self.ensure_room(LINE_HEIGHT * 2.0);
        self.y -= LINE_HEIGHT * 0.5;
        self.layer
            .use_text(pdf_safe(text), size, Mm(LEFT), Mm(self.y), &self.bold);
        self.y -= LINE_HEIGHT * 1.5;
    }

    fn spans(&mut self, spans: &[Span], prefix: Option<&str>) {
        let indent = if prefix.is_some() { 5.0 } else { 0.0 };
        for (i, line) in wrap_spans(spans, WRAP_CHARS).into_iter().enumerate() {
            self.ensure_room(LINE_HEIGHT);
            self.y -= LINE_HEIGHT;

            self.layer.begin_text_section();
            self.layer.set_font(&self.regular, BODY_SIZE);
            if let (0, Some(marker)) = (i, prefix) {
                self.layer
                    .set_text_cursor(Mm(LEFT), Mm(self.y));
                self.layer.write_text(marker, &self.regular);
                self.layer.end_text_section();
                self.layer.begin_text_section();
            }
            self.layer.set_text_cursor(Mm(LEFT + indent), Mm(self.y));
            for (j, (word, bold)) in line.iter().enumerate() {
                let font = if *bold { &self.bold } else { &self.regular };
                self.layer.set_font(font, BODY_SIZE);
                if j > 0 {
                    self.layer.write_text(" ", font);
                }
                self.layer.write_text(word.as_str(), font);
            }
            self.layer.end_text_section();
        }
    }

    fn plain_line(&mut self, text: &str) {
        self.spans(&[Span::plain(text)], None);
    }

    fn gap(&mut self) {
        self.y -= LINE_HEIGHT;
    }
}

/// Render the document as a paginated A4 PDF.
pub fn write_pdf(doc: &JustificationDocument) -> Result<Vec<u8>, RenderError> {
    let (pdf, page1, layer1) = PdfDocument::new(doc.title(), PAGE_WIDTH, PAGE_HEIGHT, "Layer 1");
    let layer = pdf.get_page(page1).get_layer(layer1);
    let regular = pdf
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| RenderError::PdfFont(e.to_string()))?;
    let bold = pdf
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| RenderError::PdfFont(e.to_string()))?;

    let pages = {
        let mut writer = PageWriter {
            doc: &pdf,
            layer,
            regular,
            bold,
            y: TOP,
            pages: 1,
        };

        writer.heading(doc.title(), TITLE_SIZE);
        writer.heading(CLAIM_INFORMATION_HEADING, HEADING_SIZE);
        for line in doc.claim_lines() {
            writer.plain_line(&line);
        }
        writer.gap();

        for block in doc.letter().blocks() {
            match block {
                Block::Heading { text } => writer.heading(text, HEADING_SIZE),
                Block::BulletItem { spans } => writer.spans(spans, Some("-")),
                Block::Paragraph { spans } => writer.spans(spans, None),
                Block::BlankLine => writer.gap(),
            }
        }
        writer.pages
    };

    let mut buf = BufWriter::new(Vec::new());
    pdf.save(&mut buf)
        .map_err(|e| RenderError::PdfSave(e.to_string()))?;
    let bytes = buf
        .into_inner()
        .map_err(|e| RenderError::PdfSave(e.to_string()))?;

    tracing::debug!(pages, size = bytes.len(), "PDF written");
    Ok(bytes)
}
