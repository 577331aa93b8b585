//! Core data model for the transcription pipeline.
//!
//! The Score Reader produces a linear stream of [`ScoreEvent`]s; the
//! transcriber consumes one [`NoteEvent`] at a time together with the
//! [`MeasureContext`] snapshot that was in force when the note was read.

use num_rational::Ratio;
use serde::{Deserialize, Serialize};

/// Diatonic step letter of a pitched note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Step {
    /// Parse a MusicXML `<step>` value.
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "C" => Some(Step::C),
            "D" => Some(Step::D),
            "E" => Some(Step::E),
            "F" => Some(Step::F),
            "G" => Some(Step::G),
            "A" => Some(Step::A),
            "B" => Some(Step::B),
            _ => None,
        }
    }

    /// Unshifted Jianpu degree: C=1 through B=7.
    pub fn base_degree(self) -> i32 {
        match self {
            Step::C => 1,
            Step::D => 2,
            Step::E => 3,
            Step::F => 4,
            Step::G => 5,
            Step::A => 6,
            Step::B => 7,
        }
    }
}

/// Graphical note value as declared by a MusicXML `<type>` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DurationType {
    Whole,
    Half,
    Quarter,
    Eighth,
    Sixteenth,
    ThirtySecond,
    SixtyFourth,
}

impl DurationType {
    /// Parse a MusicXML `<type>` value. Values outside the supported range
    /// (breve, 128th, ...) return `None` and duration falls back to ticks.
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "whole" => Some(DurationType::Whole),
            "half" => Some(DurationType::Half),
            "quarter" => Some(DurationType::Quarter),
            "eighth" => Some(DurationType::Eighth),
            "16th" => Some(DurationType::Sixteenth),
            "32nd" => Some(DurationType::ThirtySecond),
            "64th" => Some(DurationType::SixtyFourth),
            _ => None,
        }
    }

    /// Jianpu duration mark appended after the degree.
    ///
    /// Quarter notes are the unmarked baseline; longer values gain sustain
    /// dashes, shorter values gain subdivision marks.
    pub fn mark(self) -> &'static str {
        match self {
            DurationType::Whole => " - - -",
            DurationType::Half => " -",
            DurationType::Quarter => "",
            DurationType::Eighth => "_",
            DurationType::Sixteenth => "=",
            DurationType::ThirtySecond => "/",
            DurationType::SixtyFourth => "\\",
        }
    }

    /// Bucket for an undotted duration expressed in quarter notes.
    pub fn from_quarters(quarters: Ratio<u32>) -> Option<Self> {
        const BUCKETS: [(u32, u32, DurationType); 7] = [
            (4, 1, DurationType::Whole),
            (2, 1, DurationType::Half),
            (1, 1, DurationType::Quarter),
            (1, 2, DurationType::Eighth),
            (1, 4, DurationType::Sixteenth),
            (1, 8, DurationType::ThirtySecond),
            (1, 16, DurationType::SixtyFourth),
        ];

        BUCKETS
            .iter()
            .find(|(numer, denom, _)| quarters == Ratio::new(*numer, *denom))
            .map(|(_, _, duration)| *duration)
    }
}

/// Beam grouping state attached to a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BeamState {
    Begin,
    Continue,
    End,
}

impl BeamState {
    /// Parse a MusicXML `<beam>` value. Values other than the three group
    /// states (forward/backward hooks) read as `Continue`, which leaves the
    /// note spaced from its successor.
    pub fn parse(text: &str) -> Self {
        match text {
            "begin" => BeamState::Begin,
            "end" => BeamState::End,
            _ => BeamState::Continue,
        }
    }
}

/// Barline flavor emitted at the end of every measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BarStyle {
    Regular,
    LightLight,
    LightHeavy,
}

impl BarStyle {
    /// Token rendered into the output stream.
    pub fn token(self) -> &'static str {
        match self {
            BarStyle::Regular => "|",
            BarStyle::LightLight => "| |",
            BarStyle::LightHeavy => "+",
        }
    }
}

/// One note or rest inside a measure.
///
/// Exactly one of `is_rest` / (`step`, written octave) is meaningful: rests
/// carry `step: None` and the fixed placeholder octave 4, which renders as
/// the bare `0` digit with no octave mark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    pub is_rest: bool,
    pub step: Option<Step>,
    /// Written octave, 4 = the octave of middle C.
    pub octave: i8,
    /// Raw tick duration from the source document.
    pub duration_ticks: u32,
    /// Declared note value; when absent the value is inferred from
    /// `duration_ticks / divisions`.
    pub duration_type: Option<DurationType>,
    /// Number of augmentation dots (0-2).
    pub dot_count: u8,
    pub beam: Option<BeamState>,
}

/// Measure attribute state threaded across the reader's scan.
///
/// `divisions` and `fifths` persist until a later `<attributes>` block
/// overrides them; they are never reset at a measure boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasureContext {
    /// Ticks per quarter note.
    pub divisions: u32,
    /// Key signature sharps (positive) or flats (negative).
    pub fifths: i8,
}

impl Default for MeasureContext {
    fn default() -> Self {
        Self {
            divisions: 1,
            fifths: 0,
        }
    }
}

/// One element of the reader's linear output stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScoreEvent {
    /// A note or rest, the context snapshot in force when it was read, and
    /// whether its token joins the following token without a space
    /// (dense beamed-group rendering).
    Note {
        event: NoteEvent,
        context: MeasureContext,
        dense: bool,
    },
    /// End-of-measure barline.
    Barline(BarStyle),
}

/// Recoverable oddity noticed while reading the score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warning {
    pub measure: u32,
    pub message: String,
}

/// Outcome of a successful conversion: the assembled token stream plus any
/// recoverable warnings collected along the way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionResult {
    pub jianpu_source: String,
    pub warnings: Vec<Warning>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_type_parse_round_trip() {
        for (text, expected) in [
            ("whole", DurationType::Whole),
            ("half", DurationType::Half),
            ("quarter", DurationType::Quarter),
            ("eighth", DurationType::Eighth),
            ("16th", DurationType::Sixteenth),
            ("32nd", DurationType::ThirtySecond),
            ("64th", DurationType::SixtyFourth),
        ] {
            assert_eq!(DurationType::parse(text), Some(expected));
        }
        assert_eq!(DurationType::parse("breve"), None);
        assert_eq!(DurationType::parse("128th"), None);
    }

    #[test]
    fn test_duration_from_quarters_buckets() {
        assert_eq!(
            DurationType::from_quarters(Ratio::new(4, 1)),
            Some(DurationType::Whole)
        );
        assert_eq!(
            DurationType::from_quarters(Ratio::new(2, 1)),
            Some(DurationType::Half)
        );
        assert_eq!(
            DurationType::from_quarters(Ratio::new(1, 1)),
            Some(DurationType::Quarter)
        );
        assert_eq!(
            DurationType::from_quarters(Ratio::new(1, 2)),
            Some(DurationType::Eighth)
        );
        assert_eq!(
            DurationType::from_quarters(Ratio::new(1, 4)),
            Some(DurationType::Sixteenth)
        );
        assert_eq!(
            DurationType::from_quarters(Ratio::new(1, 8)),
            Some(DurationType::ThirtySecond)
        );
        assert_eq!(
            DurationType::from_quarters(Ratio::new(1, 16)),
            Some(DurationType::SixtyFourth)
        );
        // Unreduced ratios hit the same buckets.
        assert_eq!(
            DurationType::from_quarters(Ratio::new(8, 2)),
            Some(DurationType::Whole)
        );
        // Dotted values have no undotted bucket.
        assert_eq!(DurationType::from_quarters(Ratio::new(3, 1)), None);
    }

    #[test]
    fn test_beam_state_unknown_reads_as_continue() {
        assert_eq!(BeamState::parse("begin"), BeamState::Begin);
        assert_eq!(BeamState::parse("continue"), BeamState::Continue);
        assert_eq!(BeamState::parse("end"), BeamState::End);
        assert_eq!(BeamState::parse("forward hook"), BeamState::Continue);
        assert_eq!(BeamState::parse("backward hook"), BeamState::Continue);
    }

    #[test]
    fn test_measure_context_default() {
        let context = MeasureContext::default();
        assert_eq!(context.divisions, 1);
        assert_eq!(context.fifths, 0);
    }
}
