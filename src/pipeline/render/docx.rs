use std::io::Cursor;

use docx_rs::{Docx, PageMargin, Paragraph, Run, RunFonts, Style, StyleType};

use super::blocks::{Block, Span};
use super::document::{JustificationDocument, CLAIM_INFORMATION_HEADING};
use super::RenderError;

const BODY_FONT: &str = "Times New Roman";
/// Half-points: 24 = 12pt.
const BODY_SIZE: usize = 24;
/// Twips: 1440 = 1 inch.
const MARGIN: i32 = 1440;

const TITLE_STYLE: &str = "Heading1";
const SECTION_STYLE: &str = "Heading2";

fn body_fonts() -> RunFonts {
    RunFonts::new()
        .ascii(BODY_FONT)
        .hi_ansi(BODY_FONT)
        .cs(BODY_FONT)
}

fn heading_style(id: &str, name: &str, size: usize) -> Style {
    Style::new(id, StyleType::Paragraph)
        .name(name)
        .size(size)
        .bold()
        .fonts(body_fonts())
}

fn heading_paragraph(text: &str, style: &str) -> Paragraph {
    Paragraph::new()
        .add_run(Run::new().add_text(text).bold())
        .style(style)
}

fn add_spans(mut paragraph: Paragraph, spans: &[Span]) -> Paragraph {
    for span in spans {
        let run = Run::new().add_text(&span.text);
        paragraph = paragraph.add_run(if span.bold { run.bold() } else { run });
    }
    paragraph
}

fn block_paragraph(block: &Block) -> Paragraph {
    match block {
        Block::Heading { text } => heading_paragraph(text, SECTION_STYLE),
        Block::BulletItem { spans } => {
            add_spans(Paragraph::new().add_run(Run::new().add_text("\u{2022} ")), spans)
        }
        Block::Paragraph { spans } => add_spans(Paragraph::new(), spans),
        Block::BlankLine => Paragraph::new(),
    }
}

/// Lay out the document: title, claim information, then the letter blocks.
pub fn build_docx(doc: &JustificationDocument) -> Docx {
    let mut docx = Docx::new()
        .page_margin(
            PageMargin::new()
                .top(MARGIN)
                .bottom(MARGIN)
                .left(MARGIN)
                .right(MARGIN),
        )
        .default_fonts(body_fonts())
        .default_size(BODY_SIZE)
        .add_style(heading_style(TITLE_STYLE, "Heading 1", 32))
        .add_style(heading_style(SECTION_STYLE, "Heading 2", 28))
        .add_paragraph(heading_paragraph(doc.title(), TITLE_STYLE))
        .add_paragraph(heading_paragraph(CLAIM_INFORMATION_HEADING, SECTION_STYLE));

    for line in doc.claim_lines() {
        docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(line)));
    }

    for block in doc.letter().blocks() {
        docx = docx.add_paragraph(block_paragraph(block));
    }

    docx
}

/// Pack the `.docx` archive into memory.
pub fn write_docx(doc: &JustificationDocument) -> Result<Vec<u8>, RenderError> {
    let mut buf = Cursor::new(Vec::new());
    build_docx(doc)
        .build()
        .pack(&mut buf)
        .map_err(|e| RenderError::Docx(e.to_string()))?;

    let bytes = buf.into_inner();
    tracing::debug!(
        blocks = doc.letter().blocks().len(),
        size = bytes.len(),
        "Word document written"
    );
    Ok(bytes)
}
