use std::sync::LazyLock;

use regex::Regex;

/// A run of text inside a paragraph or bullet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub bold: bool,
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
        }
    }
}

/// One line of the letter, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { text: String },
    BulletItem { spans: Vec<Span> },
    Paragraph { spans: Vec<Span> },
    BlankLine,
}

/// The letter as an ordered list of blocks, one per source line, with
/// runs of blank lines collapsed to one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LetterDocument {
    blocks: Vec<Block>,
}

static HEADING_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#{1,3}\s+(.+)$").unwrap());

/// Known limitation: an ordinary line such as "Arrival Time:" also
/// qualifies, so short capitalized labels in the narrative become headings.
static TITLE_WITH_COLON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z][\w'&()/.\-]*(?:[ \t]+[A-Z][\w'&()/.\-]*)*:$").unwrap()
});

static BOLD_SPAN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());

const BULLET_MARKERS: [&str; 3] = ["\u{2022}", "* ", "- "];

impl LetterDocument {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Normalized text: `## heading`, `• bullet`, `**bold**` spans, empty
    /// lines for blanks. Every line is newline-terminated.
    pub fn to_display_text(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            out.push_str(&display_line(block));
            out.push('\n');
        }
        out
    }
}

/// Split letter text into blocks.
pub fn parse_letter(text: &str) -> LetterDocument {
    let mut blocks: Vec<Block> = Vec::new();

    for line in text.lines() {
        let block = parse_line(line);
        if block == Block::BlankLine && blocks.last() == Some(&Block::BlankLine) {
            continue;
        }
        blocks.push(block);
    }

    tracing::debug!(blocks = blocks.len(), "Letter parsed");
    LetterDocument { blocks }
}

fn parse_line(raw: &str) -> Block {
    let line = raw.trim();
    if line.is_empty() {
        return Block::BlankLine;
    }

    if let Some(caps) = HEADING_MARKER.captures(line) {
        let text = clean_heading(&caps[1]);
        if !text.is_empty() {
            return Block::Heading { text };
        }
    }

    if TITLE_WITH_COLON.is_match(line) {
        return Block::Heading {
            text: clean_heading(line),
        };
    }

    if let Some(rest) = BULLET_MARKERS.iter().find_map(|m| line.strip_prefix(m)) {
        return Block::BulletItem {
            spans: parse_spans(rest),
        };
    }

    let spans = parse_spans(line);
    if spans.is_empty() {
        return Block::BlankLine;
    }
    let block = Block::Paragraph { spans };

    // Stripping stray markers can expose a different line shape
    // ("*- item", "*Arrival Time:*"); classify what will be displayed.
    let shown = display_line(&block);
    if shown != line {
        return parse_line(&shown);
    }
    block
}

/// Drop markup, trailing colons and surrounding whitespace.
fn clean_heading(raw: &str) -> String {
    let mut text = raw.replace('*', "");
    loop {
        let next = text.trim().trim_end_matches(':').trim();
        if next == text {
            return text;
        }
        text = next.to_string();
    }
}

/// Split on `**bold**`; stray `*` in plain text is removed and empty
/// segments are dropped.
fn parse_spans(line: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut last = 0;

    for caps in BOLD_SPAN.captures_iter(line) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        push_plain(&mut spans, &line[last..whole.start()]);
        spans.push(Span::bold(inner.as_str()));
        last = whole.end();
    }
    push_plain(&mut spans, &line[last..]);

    if let Some(first) = spans.first_mut().filter(|s| !s.bold) {
        first.text = first.text.trim_start().to_string();
    }
    if let Some(last) = spans.last_mut().filter(|s| !s.bold) {
        last.text = last.text.trim_end().to_string();
    }
    spans.retain(|s| !s.text.is_empty());
    spans
}

fn push_plain(spans: &mut Vec<Span>, segment: &str) {
    let text = segment.replace('*', "");
    if !text.is_empty() {
        spans.push(Span::plain(text));
    }
}

fn display_spans(spans: &[Span]) -> String {
    spans
        .iter()
        .map(|s| {
            if s.bold {
                format!("**{}**", s.text)
            } else {
                s.text.clone()
            }
        })
        .collect()
}

fn display_line(block: &Block) -> String {
    match block {
        Block::Heading { text } => format!("## {text}"),
        Block::BulletItem { spans } => format!("\u{2022} {}", display_spans(spans)),
        Block::Paragraph { spans } => display_spans(spans),
        Block::BlankLine => String::new(),
    }
}

/// Plain text of a span list, markup removed.
pub fn spans_text(spans: &[Span]) -> String {
    spans.iter().map(|s| s.text.as_str()).collect()
}
