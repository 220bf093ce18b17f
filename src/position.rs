use serde::{Deserialize, Serialize};

/// Cursor position in a program listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (0-indexed, in characters)
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Byte span in a text file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Starting byte offset
    pub byte_start: usize,
    /// Ending byte offset (exclusive)
    pub byte_end: usize,
}

/// Compute the byte span of every line in `content`
///
/// Lines are separated by `\n`; a `\r` before the separator belongs to the
/// line ending, not to the span. Text ending in a newline has a final empty
/// line, so the result always holds at least one span.
///
/// # Arguments
/// * `content` - The file content as a string
///
/// # Returns
/// * One `Span` per line, in order
pub fn line_spans(content: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut line_start = 0;

    for (offset, byte) in content.bytes().enumerate() {
        if byte == b'\n' {
            let mut line_end = offset;
            if line_end > line_start && content.as_bytes()[line_end - 1] == b'\r' {
                line_end -= 1;
            }
            spans.push(Span { byte_start: line_start, byte_end: line_end });
            line_start = offset + 1;
        }
    }

    spans.push(Span { byte_start: line_start, byte_end: content.len() });
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_spans_lf() {
        let content = "Hello\nWorld";
        let spans = line_spans(content);

        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0], Span { byte_start: 0, byte_end: 5 });
        assert_eq!(spans[1], Span { byte_start: 6, byte_end: 11 });
    }

    #[test]
    fn test_line_spans_crlf_excludes_carriage_return() {
        let content = "/MN\r\n   1:  ;\r\n";
        let spans = line_spans(content);

        assert_eq!(spans.len(), 3);
        assert_eq!(&content[spans[0].byte_start..spans[0].byte_end], "/MN");
        assert_eq!(&content[spans[1].byte_start..spans[1].byte_end], "   1:  ;");
        assert_eq!(spans[2], Span { byte_start: 15, byte_end: 15 });
    }

    #[test]
    fn test_line_spans_empty_content() {
        let spans = line_spans("");
        assert_eq!(spans, vec![Span { byte_start: 0, byte_end: 0 }]);
    }
}
