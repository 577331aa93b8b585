//! MusicXML to Jianpu (numbered notation) transcription.
//!
//! The pipeline is a one-pass, fully synchronous transformation: parse the
//! MusicXML tree, scan measures into a linear stream of note/rest events
//! and barline markers, transcribe each event into a Jianpu token, and
//! join the tokens into one string ready for a document sink.
//!
//! # Basic usage
//!
//! ```
//! let musicxml = r#"<?xml version="1.0" encoding="UTF-8"?>
//! <score-partwise version="3.1">
//!   <part id="P1">
//!     <measure number="1">
//!       <attributes>
//!         <divisions>1</divisions>
//!         <key><fifths>0</fifths></key>
//!       </attributes>
//!       <note>
//!         <pitch><step>C</step><octave>4</octave></pitch>
//!         <duration>1</duration>
//!         <type>quarter</type>
//!       </note>
//!       <barline location="right"><bar-style>light-heavy</bar-style></barline>
//!     </measure>
//!   </part>
//! </score-partwise>"#;
//!
//! let result = jianpu_transcriber::convert_musicxml_to_jianpu(musicxml).unwrap();
//! assert_eq!(result.jianpu_source, "1 +");
//! ```

pub mod document;
pub mod errors;
pub mod jianpu;
pub mod parser;
pub mod reader;
pub mod types;

pub use errors::{ConversionError, ParseError};
pub use jianpu::{assemble, transcribe};
pub use types::{
    BarStyle, BeamState, ConversionResult, DurationType, MeasureContext, NoteEvent, ScoreEvent,
    Step, Warning,
};

/// Convert a MusicXML document to a Jianpu token stream.
///
/// Wires the full pipeline: DOCTYPE stripping and XML parsing, the measure
/// scan, per-event transcription and sequence assembly. Fatal malformed
/// input aborts with an error; recoverable oddities are logged and
/// returned in [`ConversionResult::warnings`].
pub fn convert_musicxml_to_jianpu(xml: &str) -> Result<ConversionResult, ConversionError> {
    let cleaned = parser::strip_doctype(xml);
    let doc = roxmltree::Document::parse(&cleaned)
        .map_err(|e| ParseError::InvalidXml(e.to_string()))?;

    let outcome = reader::read_score(&doc)?;
    let jianpu_source = jianpu::assemble(&outcome.events)?;

    Ok(ConversionResult {
        jianpu_source,
        warnings: outcome.warnings,
    })
}
