//! Lenient HTML text extraction.
//!
//! [`TextExtractor`] strips markup from HTML and returns the concatenated
//! text nodes in document order. Parsing is done by `lol_html`, a streaming
//! parser that never rejects malformed markup (unclosed tags, stray end
//! tags, unquoted attributes): it produces a best-effort interpretation
//! instead.
//!
//! # Ownership
//!
//! An extractor is a mutable, per-owner parser context. It is `Send` but is
//! meant to be owned by one thread or worker and never shared, so it needs
//! no locking. [`WorkerPool`](crate::WorkerPool) gives each worker its own.
//!
//! # Example
//!
//! ```rust
//! use poolkit::TextExtractor;
//!
//! let mut extractor = TextExtractor::with_defaults();
//! assert_eq!(extractor.extract_text("<p>Hello <b>world</b></p>")?, "Hello world");
//! assert_eq!(extractor.extract_text("<p>Hello <b>world</p>")?, "Hello world");
//! # Ok::<(), poolkit::PoolkitError>(())
//! ```

mod collector;

pub use collector::{TextCollector, TextKind};

use std::io::{self, Read};

use lol_html::errors::RewritingError;
use lol_html::html_content::TextType;
use lol_html::{HtmlRewriter, MemorySettings, Settings, doc_text};

use crate::config::ExtractorConfig;
use crate::error::{PoolkitError, Result};

/// Optional parser behaviours that can be toggled on an extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserFeature {
    /// Fill in default attribute values for elements. The parser never
    /// synthesizes attributes, so only disabling is supported.
    DefaultAttributes,
    /// Decode character references in text nodes.
    DecodeEntities,
    /// Report `<script>`/`<style>` bodies as text.
    RawText,
}

enum Input<'a> {
    Str(&'a str),
    Reader(&'a mut dyn Read),
}

/// Per-owner HTML text extractor.
///
/// Construction disables [`ParserFeature::DefaultAttributes`]; if that
/// toggle were ever rejected, the extractor silently keeps the parser's
/// default behaviour.
#[derive(Debug)]
pub struct TextExtractor {
    config: ExtractorConfig,
    scratch: String,
    read_buf: Vec<u8>,
    extractions: u64,
}

impl TextExtractor {
    /// Create an extractor with the given settings.
    pub fn new(config: ExtractorConfig) -> Self {
        let mut extractor = Self {
            config,
            scratch: String::new(),
            read_buf: Vec::new(),
            extractions: 0,
        };

        if let Err(e) = extractor.set_feature(ParserFeature::DefaultAttributes, false) {
            log::debug!("Ignoring rejected parser feature: {}", e);
        }

        extractor
    }

    /// Create an extractor with [`ExtractorConfig::default()`].
    pub fn with_defaults() -> Self {
        Self::new(ExtractorConfig::default())
    }

    /// Current settings.
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Number of successful extractions performed by this extractor.
    pub fn extractions(&self) -> u64 {
        self.extractions
    }

    /// Toggle a parser feature.
    ///
    /// # Errors
    ///
    /// Returns [`PoolkitError::UnsupportedFeature`] when enabling
    /// [`ParserFeature::DefaultAttributes`].
    pub fn set_feature(&mut self, feature: ParserFeature, enabled: bool) -> Result<()> {
        match feature {
            ParserFeature::DefaultAttributes if enabled => Err(PoolkitError::UnsupportedFeature(
                "default attribute values are never synthesized".to_string(),
            )),
            ParserFeature::DefaultAttributes => Ok(()),
            ParserFeature::DecodeEntities => {
                self.config.decode_entities = enabled;
                Ok(())
            }
            ParserFeature::RawText => {
                self.config.include_raw_text = enabled;
                Ok(())
            }
        }
    }

    /// Whether a parser feature is enabled.
    pub fn feature(&self, feature: ParserFeature) -> bool {
        match feature {
            ParserFeature::DefaultAttributes => false,
            ParserFeature::DecodeEntities => self.config.decode_entities,
            ParserFeature::RawText => self.config.include_raw_text,
        }
    }

    /// Extract the text of an in-memory HTML document.
    ///
    /// Returns every text node concatenated in document order, without
    /// whitespace normalization. Empty input yields an empty string.
    ///
    /// # Errors
    ///
    /// Returns [`PoolkitError::Markup`] if the parser gives up. The whole
    /// document is handed to the parser at once, so
    /// [`ExtractorConfig::max_memory_bytes`] does not apply here.
    pub fn extract_text(&mut self, html: &str) -> Result<String> {
        self.parse(Input::Str(html))
    }

    /// Extract the text of an HTML document read from `reader`.
    ///
    /// The document is streamed into the parser in
    /// [`ExtractorConfig::read_chunk_size`] pieces.
    ///
    /// # Errors
    ///
    /// - Returns [`PoolkitError::Io`] if reading fails.
    /// - Returns [`PoolkitError::Markup`] if the parser gives up, e.g. when
    ///   buffering a tag split across chunks exceeds
    ///   [`ExtractorConfig::max_memory_bytes`].
    pub fn extract_from_reader<R: Read>(&mut self, mut reader: R) -> Result<String> {
        self.parse(Input::Reader(&mut reader))
    }

    fn parse(&mut self, input: Input<'_>) -> Result<String> {
        let mut collector = TextCollector::with_scratch(
            std::mem::take(&mut self.scratch),
            self.config.decode_entities,
            self.config.include_raw_text,
        );

        let mut memory = MemorySettings::default();
        memory.max_allowed_memory_usage = self.config.max_memory_bytes;
        memory.preallocated_parsing_buffer_size = memory
            .preallocated_parsing_buffer_size
            .min(self.config.max_memory_bytes);

        let chunk_size = self.config.read_chunk_size.max(1);
        let read_buf = &mut self.read_buf;

        let outcome = {
            let mut rewriter = HtmlRewriter::new(
                Settings {
                    document_content_handlers: vec![doc_text!(|chunk| {
                        collector.on_text(
                            chunk.as_str(),
                            text_kind(chunk.text_type()),
                            chunk.last_in_text_node(),
                        );
                        Ok(())
                    })],
                    memory_settings: memory,
                    strict: false,
                    ..Settings::new()
                },
                |_: &[u8]| {},
            );

            let fed = match input {
                Input::Str(html) => rewriter.write(html.as_bytes()).map_err(markup_error),
                Input::Reader(reader) => {
                    read_buf.resize(chunk_size, 0);
                    loop {
                        let read = match reader.read(&mut read_buf[..]) {
                            Ok(0) => break Ok(()),
                            Ok(n) => n,
                            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                            Err(e) => break Err(PoolkitError::Io(e)),
                        };
                        if let Err(e) = rewriter.write(&read_buf[..read]) {
                            break Err(markup_error(e));
                        }
                    }
                }
            };

            fed.and_then(|()| rewriter.end().map_err(markup_error))
        };

        let (text, scratch) = collector.finish();
        self.scratch = scratch;

        outcome?;
        self.extractions += 1;
        log::trace!("Extracted {} bytes of text", text.len());
        Ok(text)
    }
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn text_kind(text_type: TextType) -> TextKind {
    match text_type {
        TextType::RawText | TextType::ScriptData => TextKind::Raw,
        TextType::PlainText | TextType::CDataSection => TextKind::Literal,
        _ => TextKind::Markup,
    }
}

fn markup_error(e: RewritingError) -> PoolkitError {
    PoolkitError::Markup(e.to_string())
}

/// Extract the text of `html` with a fresh default extractor.
///
/// Callers extracting many documents should keep a [`TextExtractor`]
/// instead, so buffers are reused.
///
/// # Example
///
/// ```rust
/// assert_eq!(poolkit::extract_text("<h1>Title</h1><p>Body</p>")?, "TitleBody");
/// # Ok::<(), poolkit::PoolkitError>(())
/// ```
pub fn extract_text(html: &str) -> Result<String> {
    TextExtractor::with_defaults().extract_text(html)
}

// ============================================================================
// Unit Tests
// ============================================================================
