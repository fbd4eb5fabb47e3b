//! Paragraph extraction from `word/document.xml`
//!
//! Streams the body with `quick-xml` and yields one string per top-level
//! `<w:p>` (direct child of `<w:body>`). Paragraphs inside tables, text boxes
//! or other containers are not body paragraphs and are skipped.
//!
//! Paragraph text is the concatenation of its `<w:t>` runs, with `<w:tab/>`
//! mapped to `\t` and `<w:br/>` / `<w:cr/>` mapped to `\n`. Text is yielded
//! untrimmed; trimming belongs to the line classifier.

use crate::error::ConversionError;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::Cursor;

/// Elements the walker reacts to; everything else only affects depth
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Body,
    Paragraph,
    Text,
    Tab,
    Break,
    Other,
}

impl Tag {
    fn from_name(name: &[u8]) -> Self {
        match name {
            b"w:body" => Tag::Body,
            b"w:p" => Tag::Paragraph,
            b"w:t" => Tag::Text,
            b"w:tab" => Tag::Tab,
            b"w:br" | b"w:cr" => Tag::Break,
            _ => Tag::Other,
        }
    }
}

/// Owned view of one XML event, so the read buffer can be reused
enum Step {
    Open(Tag),
    Empty(Tag),
    Close(Tag),
    Text(String),
    Eof,
    Skip,
}

/// Lazy iterator over body paragraphs.
///
/// Owns the decompressed XML; never holds more than one paragraph's text.
/// After the first error the stream is exhausted.
pub struct ParagraphStream {
    reader: Reader<Cursor<Vec<u8>>>,
    buf: Vec<u8>,
    depth: usize,
    body_depth: Option<usize>,
    /// Depth of the open body paragraph and its text so far
    paragraph: Option<(usize, String)>,
    /// Paragraphs open inside the current one (text boxes); their text is dropped
    nested: usize,
    in_text: bool,
    finished: bool,
}

impl ParagraphStream {
    pub fn new(xml: Vec<u8>) -> Self {
        Self {
            reader: Reader::from_reader(Cursor::new(xml)),
            buf: Vec::new(),
            depth: 0,
            body_depth: None,
            paragraph: None,
            nested: 0,
            in_text: false,
            finished: false,
        }
    }

    fn next_step(&mut self) -> Result<Step, ConversionError> {
        self.buf.clear();
        let capture_text = self.in_text;
        let event = self
            .reader
            .read_event_into(&mut self.buf)
            .map_err(|e| ConversionError::ParseFailure {
                reason: format!(
                    "malformed XML at byte {}: {e}",
                    self.reader.buffer_position()
                ),
            })?;

        let step = match event {
            Event::Start(e) => Step::Open(Tag::from_name(e.name().as_ref())),
            Event::Empty(e) => Step::Empty(Tag::from_name(e.name().as_ref())),
            Event::End(e) => Step::Close(Tag::from_name(e.name().as_ref())),
            Event::Text(e) if capture_text => {
                let text = e.unescape().map_err(|e| ConversionError::ParseFailure {
                    reason: format!("bad text run: {e}"),
                })?;
                Step::Text(text.into_owned())
            }
            Event::CData(e) if capture_text => {
                Step::Text(String::from_utf8_lossy(&e.into_inner()).into_owned())
            }
            Event::Eof => Step::Eof,
            _ => Step::Skip,
        };
        Ok(step)
    }

    fn is_body_child(&self, depth: usize) -> bool {
        self.body_depth.map(|body| body + 1) == Some(depth)
    }

    fn push_text(&mut self, text: &str) {
        if self.nested > 0 {
            return;
        }
        if let Some((_, paragraph)) = self.paragraph.as_mut() {
            paragraph.push_str(text);
        }
    }

    /// Feed one step through the walker; returns a finished paragraph if any
    fn apply(&mut self, step: Step) -> Option<String> {
        match step {
            Step::Open(tag) => {
                self.depth += 1;
                match tag {
                    Tag::Body => self.body_depth = Some(self.depth),
                    Tag::Paragraph if self.paragraph.is_none() && self.is_body_child(self.depth) => {
                        self.paragraph = Some((self.depth, String::new()));
                    }
                    Tag::Paragraph if self.paragraph.is_some() => self.nested += 1,
                    Tag::Text if self.paragraph.is_some() && self.nested == 0 => {
                        self.in_text = true
                    }
                    _ => {}
                }
                None
            }
            Step::Empty(tag) => match tag {
                // <w:p/> directly in the body is an empty paragraph
                Tag::Paragraph if self.paragraph.is_none() && self.is_body_child(self.depth + 1) => {
                    Some(String::new())
                }
                Tag::Tab => {
                    self.push_text("\t");
                    None
                }
                Tag::Break => {
                    self.push_text("\n");
                    None
                }
                _ => None,
            },
            Step::Close(tag) => {
                let closing_depth = self.depth;
                self.depth = self.depth.saturating_sub(1);
                match tag {
                    Tag::Text => {
                        self.in_text = false;
                        None
                    }
                    Tag::Paragraph => match self.paragraph.take() {
                        Some((depth, text)) if depth == closing_depth => Some(text),
                        other => {
                            if other.is_some() {
                                self.nested = self.nested.saturating_sub(1);
                            }
                            self.paragraph = other;
                            None
                        }
                    },
                    Tag::Body => {
                        self.body_depth = None;
                        None
                    }
                    _ => None,
                }
            }
            Step::Text(text) => {
                self.push_text(&text);
                None
            }
            Step::Eof => {
                self.finished = true;
                None
            }
            Step::Skip => None,
        }
    }
}

impl Iterator for ParagraphStream {
    type Item = Result<String, ConversionError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.finished {
            match self.next_step() {
                Ok(step) => {
                    if let Some(paragraph) = self.apply(step) {
                        return Some(Ok(paragraph));
                    }
                }
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
            }
        }
        None
    }
}
