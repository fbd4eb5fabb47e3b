/// Separator between a key and its value
pub const KEY_VALUE_SEPARATOR: char = ':';

/// Classification of a single paragraph line. Borrows from the input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome<'a> {
    /// Empty after trimming; skipped by the parser
    Blank,
    KeyValue { key: &'a str, value: &'a str },
    FreeText(&'a str),
}

/// Purely lexical line classifier: no key validation, no value typing.
pub struct LineClassifier {
    separator: char,
}

impl Default for LineClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl LineClassifier {
    pub fn new() -> Self {
        Self {
            separator: KEY_VALUE_SEPARATOR,
        }
    }

    pub fn classify<'a>(&self, raw_line: &'a str) -> LineOutcome<'a> {
        let line = raw_line.trim();
        if line.is_empty() {
            return LineOutcome::Blank;
        }

        // Only the first separator splits; the value keeps any later ones
        match line.split_once(self.separator) {
            Some((key, value)) => LineOutcome::KeyValue {
                key: key.trim(),
                value: value.trim(),
            },
            None => LineOutcome::FreeText(line),
        }
    }
}
