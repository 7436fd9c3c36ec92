//! Text node accumulator.

use std::borrow::Cow;

/// How the parser classified a run of character data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKind {
    /// Ordinary text, including `<title>`/`<textarea>` content. May contain
    /// character references.
    Markup,
    /// Text taken verbatim (`<plaintext>`, CDATA sections).
    Literal,
    /// Bodies of `<script>` and `<style>`. Taken verbatim.
    Raw,
}

/// Accumulates text chunks in the order the parser reports them.
///
/// The parser may split a single text node into several chunks. Chunks
/// are buffered until the last one of the node arrives, so character
/// references are decoded on whole nodes.
#[derive(Debug)]
pub struct TextCollector {
    text: String,
    pending: String,
    pending_kind: TextKind,
    decode_entities: bool,
    include_raw_text: bool,
}

impl TextCollector {
    /// Create a collector.
    pub fn new(decode_entities: bool, include_raw_text: bool) -> Self {
        Self::with_scratch(String::new(), decode_entities, include_raw_text)
    }

    /// Create a collector reusing `scratch` as its per-node buffer.
    pub fn with_scratch(mut scratch: String, decode_entities: bool, include_raw_text: bool) -> Self {
        scratch.clear();
        Self {
            text: String::new(),
            pending: scratch,
            pending_kind: TextKind::Markup,
            decode_entities,
            include_raw_text,
        }
    }

    /// Receive one chunk of character data.
    pub fn on_text(&mut self, chunk: &str, kind: TextKind, last_in_node: bool) {
        if kind == TextKind::Raw && !self.include_raw_text {
            return;
        }

        if self.pending.is_empty() {
            self.pending_kind = kind;
        }
        self.pending.push_str(chunk);

        if last_in_node {
            self.flush();
        }
    }

    fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }

        let decoded = match self.pending_kind {
            TextKind::Markup if self.decode_entities => {
                html_escape::decode_html_entities(&self.pending)
            }
            _ => Cow::Borrowed(self.pending.as_str()),
        };
        self.text.push_str(&decoded);
        self.pending.clear();
    }

    /// Length in bytes of the text collected so far (excluding an unfinished node).
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether no text has been collected yet.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.pending.is_empty()
    }

    /// Flush any unfinished node and return `(text, scratch)`.
    pub fn finish(mut self) -> (String, String) {
        self.flush();
        (self.text, self.pending)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
