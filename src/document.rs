//! Document sink: renders a finished token stream into a styled document.
//!
//! The transcription core knows nothing about document formats; it hands a
//! token stream and a path to a [`DocumentSink`]. The bundled [`RtfSink`]
//! writes a minimal RTF file holding the stream as a single text run in
//! the notation font, rendered through a mustache template.

use serde::Serialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors from rendering or persisting the output document.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("template rendering failed: {0}")]
    Template(String),

    #[error("failed to write output document: {0}")]
    Io(#[from] std::io::Error),
}

/// Styling applied to the single text run holding the token stream. The
/// default font is the Jianpu notation font the tokens are designed for.
#[derive(Debug, Clone)]
pub struct TextRunStyle {
    pub font_name: String,
    pub point_size: u32,
}

impl Default for TextRunStyle {
    fn default() -> Self {
        Self {
            font_name: "jpfont-nds".to_string(),
            point_size: 12,
        }
    }
}

/// Accepts a finished token stream and persists it as a document.
pub trait DocumentSink {
    fn render(&self, tokens: &str, path: &Path) -> Result<(), SinkError>;
}

// RTF ignores raw newlines, which keeps every closing brace on its own
// line and out of the way of mustache's `}}` delimiter.
const RTF_TEMPLATE: &str = "{\\rtf1\\ansi\\deff0\n{\\fonttbl\n{\\f0 {{{font_name}}};\n}\n}\n\\f0\\fs{{half_points}} {{{tokens}}}\n\\par\n}\n";

#[derive(Serialize)]
struct TemplateContext<'a> {
    font_name: &'a str,
    /// RTF expresses font size in half-points.
    half_points: u32,
    tokens: String,
}

/// RTF implementation: one paragraph, one run, fixed font and size.
pub struct RtfSink {
    style: TextRunStyle,
}

impl RtfSink {
    pub fn new(style: TextRunStyle) -> Self {
        Self { style }
    }

    /// Render the document source without touching the filesystem.
    pub fn document_source(&self, tokens: &str) -> Result<String, SinkError> {
        let template = mustache::compile_str(RTF_TEMPLATE)
            .map_err(|e| SinkError::Template(e.to_string()))?;
        let context = TemplateContext {
            font_name: &self.style.font_name,
            half_points: self.style.point_size * 2,
            tokens: escape_rtf(tokens),
        };
        template
            .render_to_string(&context)
            .map_err(|e| SinkError::Template(e.to_string()))
    }
}

impl Default for RtfSink {
    fn default() -> Self {
        Self::new(TextRunStyle::default())
    }
}

impl DocumentSink for RtfSink {
    fn render(&self, tokens: &str, path: &Path) -> Result<(), SinkError> {
        let source = self.document_source(tokens)?;
        fs::write(path, source)?;
        Ok(())
    }
}

/// Escape RTF control characters. The 64th-note mark is a literal
/// backslash, so this is not optional.
fn escape_rtf(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '{' => escaped.push_str("\\{"),
            '}' => escaped.push_str("\\}"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_source_carries_style() {
        let sink = RtfSink::default();
        let source = sink.document_source("1 2 3 +").unwrap();
        assert!(source.contains("jpfont-nds"));
        assert!(source.contains("\\fs24"));
        assert!(source.contains("1 2 3 +"));
    }

    #[test]
    fn test_custom_style() {
        let sink = RtfSink::new(TextRunStyle {
            font_name: "SimSun".to_string(),
            point_size: 14,
        });
        let source = sink.document_source("1").unwrap();
        assert!(source.contains("SimSun"));
        assert!(source.contains("\\fs28"));
    }

    #[test]
    fn test_backslash_mark_is_escaped() {
        let sink = RtfSink::default();
        // A 64th-note token ends in a literal backslash.
        let source = sink.document_source("1\\ 0 +").unwrap();
        assert!(source.contains("1\\\\ 0 +"));
    }

    #[test]
    fn test_render_writes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("score.rtf");
        let sink = RtfSink::default();
        sink.render("1 2 | 3 +", &path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("{\\rtf1"));
        assert!(written.contains("1 2 | 3 +"));
    }
}
