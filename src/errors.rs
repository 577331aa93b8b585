//! Error types for MusicXML to Jianpu conversion.
//!
//! Fatal malformed-input failures are `ParseError`; `ConversionError` wraps
//! them and adds transcription-stage failures. Recoverable conditions
//! (duration disagreement, unknown bar-style) are logged warnings, never
//! errors, and no partial output is written once an error propagates.

use thiserror::Error;

/// Top-level conversion error type
#[derive(Debug, Clone, Error)]
pub enum ConversionError {
    /// Fatal document parsing error
    #[error("parsing failed: {0}")]
    Parse(#[from] ParseError),

    /// The key-signature correction pushed the note outside the printable
    /// registers.
    #[error("effective octave {0} has no Jianpu register (expected 1..=7)")]
    RegisterOutOfRange(i8),

    /// The tick duration matches no notation value and the note declared no
    /// explicit type to fall back on.
    #[error("duration of {ticks} ticks at {divisions} divisions per quarter has no notation equivalent")]
    UnrepresentableDuration { ticks: u32, divisions: u32 },
}

/// Fatal malformed-input errors
#[derive(Debug, Clone, Error)]
pub enum ParseError {
    /// XML is not well-formed
    #[error("invalid XML: {0}")]
    InvalidXml(String),

    /// Document root is not the supported score layout
    #[error("unsupported MusicXML format: {0}")]
    UnsupportedFormat(String),

    /// Required structural element is missing
    #[error("missing required element: {0}")]
    MissingRequiredElement(String),

    /// A field is present but unparseable or out of its documented domain
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// Key signature outside the chromatic circle
    #[error("key signature fifths {0} is outside -7..=7")]
    FifthsOutOfRange(i8),

    /// Written octave outside the supported registers
    #[error("octave {0} is outside 1..=7")]
    OctaveOutOfRange(i8),
}
