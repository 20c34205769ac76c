/// Sanitize extracted text before passing downstream.
/// Strips control characters and stray glyphs, trims each line and drops
/// empty lines. Keeps the punctuation that claim labels and amounts use and
/// the symbols clinical notes carry (units, dashes, quotes).
pub fn sanitize_extracted_text(raw: &str) -> String {
    raw.chars()
        .filter(|c| {
            c.is_alphanumeric()
                || *c == '\n'
                || *c == ' '
                || *c == '\t'
                || matches!(
                    c,
                    '.' | ','
                        | ';'
                        | ':'
                        | '-'
                        | '/'
                        | '('
                        | ')'
                        | '['
                        | ']'
                        | '+'
                        | '='
                        | '%'
                        | '#'
                        | '@'
                        | '&'
                        | '$'
                        | '\''
                        | '"'
                        | '!'
                        | '?'
                        | '<'
                        | '>'
                        | '*'
                        | '_'
                        | '°'
                        | '²'
                        | '³'
                        | 'µ'
                        | '«'
                        | '»'
                        | '€'
                        | '\u{2013}' // en-dash, common in "Service Dates – 05/01/2024"
                        | '\u{2014}'
                        | '\u{2018}'
                        | '\u{2019}'
                        | '\u{201C}'
                        | '\u{201D}'
                )
        })
        .collect::<String>()
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
