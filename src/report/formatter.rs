//! Line-based rendering of the lightweight markup the backend emits in
//! free-text report fields. Only `###` subheadings and `**` bold spans are
//! recognised; everything else passes through as plain text.

const HEADING_MARKER: &str = "###";
const BOLD_MARKER: &str = "**";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Subheading(String),
    /// Empty for blank source lines, which still take up a row.
    Paragraph(Vec<Span>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub emphasis: bool,
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            emphasis: false,
        }
    }

    pub fn strong(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            emphasis: true,
        }
    }
}

/// Lazy block sequence over `text`. Cloning restarts it from the same point.
#[derive(Debug, Clone)]
pub struct Blocks<'a> {
    lines: std::str::Split<'a, char>,
}

impl<'a> Iterator for Blocks<'a> {
    type Item = Block;

    fn next(&mut self) -> Option<Block> {
        self.lines.next().map(format_line)
    }
}

pub fn format(text: &str) -> Blocks<'_> {
    Blocks {
        lines: text.split('\n'),
    }
}

fn format_line(line: &str) -> Block {
    let line = line.strip_suffix('\r').unwrap_or(line);

    if let Some(rest) = line.strip_prefix(HEADING_MARKER) {
        return Block::Subheading(rest.trim_start().to_string());
    }

    if line.contains(BOLD_MARKER) {
        // Odd fragments are bold, even are plain; an unmatched marker just
        // leaves the tail bold.
        let spans = line
            .split(BOLD_MARKER)
            .enumerate()
            .filter(|(_, fragment)| !fragment.is_empty())
            .map(|(index, fragment)| {
                if index % 2 == 1 {
                    Span::strong(fragment)
                } else {
                    Span::plain(fragment)
                }
            })
            .collect();
        return Block::Paragraph(spans);
    }

    if line.is_empty() {
        Block::Paragraph(Vec::new())
    } else {
        Block::Paragraph(vec![Span::plain(line)])
    }
}
