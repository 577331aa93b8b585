//! Jianpu token generation.
//!
//! [`transcribe`] maps one note/rest event to its token: a scale-degree
//! digit (or low-register glyph) decorated with octave marks, duration
//! marks and dot augmentation. [`assemble`] joins a reader event stream
//! into the final token string with beam-aware spacing and barlines.
//!
//! The degree table is movable-do: the digit is the degree relative to the
//! tonic implied by the key signature, so the same written pitch maps to
//! different digits under different `fifths` values.

use crate::errors::{ConversionError, ParseError};
use crate::types::{DurationType, NoteEvent, ScoreEvent};
use num_rational::Ratio;

/// Scale-degree correction applied for the key signature before reducing
/// the degree modulo 7. Defined for `fifths` in -7..=7 only.
fn degree_correction(fifths: i8) -> Option<i32> {
    match fifths {
        -7 => Some(0),
        -6 => Some(-4),
        -5 => Some(-1),
        -4 => Some(-5),
        -3 => Some(-2),
        -2 => Some(-6),
        -1 => Some(-3),
        0 => Some(0),
        1 => Some(-4),
        2 => Some(-1),
        3 => Some(-5),
        4 => Some(-2),
        5 => Some(-6),
        6 => Some(-3),
        7 => Some(0),
        _ => None,
    }
}

/// Alternate glyph per scale degree for the three low registers. High
/// registers reuse the digit with a trailing mark; low registers replace
/// the digit outright, one keyboard row per register.
const LOW_REGISTER_GLYPHS: [[char; 7]; 3] = [
    ['q', 'w', 'e', 'r', 't', 'y', 'u'], // octave 3
    ['a', 's', 'd', 'f', 'g', 'h', 'j'], // octave 2
    ['z', 'x', 'c', 'v', 'b', 'n', 'm'], // octave 1
];

fn low_register_glyph(octave: i8, degree: u8) -> Option<char> {
    let row = match octave {
        3 => 0,
        2 => 1,
        1 => 2,
        _ => return None,
    };
    LOW_REGISTER_GLYPHS[row].get(degree as usize - 1).copied()
}

/// Trailing dot augmentation.
fn dot_suffix(dot_count: u8) -> &'static str {
    match dot_count {
        1 => ".",
        2 => ".,",
        _ => "",
    }
}

/// Infer the notation bucket from the raw tick duration, dividing out the
/// dot augmentation factor first so a dotted half (3 quarters, one dot)
/// lands in the half bucket.
fn infer_from_ticks(ticks: u32, divisions: u32, dot_count: u8) -> Option<DurationType> {
    if ticks == 0 || divisions == 0 {
        return None;
    }
    let mut quarters = Ratio::new(ticks, divisions);
    if dot_count > 0 {
        // dotted value = base * (2^(d+1) - 1) / 2^d
        quarters = quarters * Ratio::new(1u32 << dot_count, (1u32 << (dot_count + 1)) - 1);
    }
    DurationType::from_quarters(quarters)
}

/// Resolve the notation bucket for an event. The declared type wins; the
/// tick ratio is the fallback, and a disagreement between the two is a
/// logged warning, not an error.
fn resolve_duration(event: &NoteEvent, divisions: u32) -> Result<DurationType, ConversionError> {
    let inferred = infer_from_ticks(event.duration_ticks, divisions, event.dot_count);

    match (event.duration_type, inferred) {
        (Some(declared), Some(from_ticks)) => {
            if declared != from_ticks {
                log::warn!(
                    "declared note type {:?} disagrees with tick duration {}/{} ({:?}); using the declared type",
                    declared,
                    event.duration_ticks,
                    divisions,
                    from_ticks
                );
            }
            Ok(declared)
        }
        (Some(declared), None) => {
            log::warn!(
                "tick duration {}/{} matches no notation value; using the declared type {:?}",
                event.duration_ticks,
                divisions,
                declared
            );
            Ok(declared)
        }
        (None, Some(from_ticks)) => Ok(from_ticks),
        (None, None) => Err(ConversionError::UnrepresentableDuration {
            ticks: event.duration_ticks,
            divisions,
        }),
    }
}

/// Convert one note or rest event to its Jianpu token.
///
/// Pure and deterministic: the same `(event, fifths, divisions)` always
/// yields the same token. Rests render as `0` with no octave mark but
/// carry the same duration mark and dot suffix as pitched notes.
pub fn transcribe(
    event: &NoteEvent,
    fifths: i8,
    divisions: u32,
) -> Result<String, ConversionError> {
    let duration = resolve_duration(event, divisions)?;

    if event.is_rest {
        return Ok(format!("0{}{}", duration.mark(), dot_suffix(event.dot_count)));
    }

    let step = event.step.ok_or_else(|| {
        ParseError::MissingRequiredElement("pitched note missing step".to_string())
    })?;
    let correction =
        degree_correction(fifths).ok_or(ParseError::FifthsOutOfRange(fifths))?;

    let corrected_raw = step.base_degree() + correction;
    let degree = match corrected_raw.rem_euclid(7) {
        0 => 7u8,
        reduced => reduced as u8,
    };

    // A correction at or below the octave boundary wraps the note into the
    // octave below its written one.
    let octave = if corrected_raw <= 0 {
        event.octave - 1
    } else {
        event.octave
    };

    let mut token = String::new();
    match octave {
        4..=7 => {
            token.push(char::from(b'0' + degree));
            match octave {
                5 => token.push('\''),
                6 => token.push('"'),
                7 => token.push('`'),
                _ => {}
            }
        }
        1..=3 => {
            let glyph = low_register_glyph(octave, degree)
                .ok_or(ConversionError::RegisterOutOfRange(octave))?;
            token.push(glyph);
        }
        _ => return Err(ConversionError::RegisterOutOfRange(octave)),
    }

    token.push_str(duration.mark());
    token.push_str(dot_suffix(event.dot_count));
    Ok(token)
}

/// Join a reader event stream into the final token string.
///
/// Notes are followed by a single space unless they open or extend a dense
/// beamed group; barline tokens are always separated from their neighbors
/// by a single space. The assembled stream carries no trailing whitespace.
pub fn assemble(events: &[ScoreEvent]) -> Result<String, ConversionError> {
    let mut out = String::new();

    for element in events {
        match element {
            ScoreEvent::Note {
                event,
                context,
                dense,
            } => {
                out.push_str(&transcribe(event, context.fifths, context.divisions)?);
                if !dense {
                    out.push(' ');
                }
            }
            ScoreEvent::Barline(style) => {
                if !out.is_empty() && !out.ends_with(' ') {
                    out.push(' ');
                }
                out.push_str(style.token());
                out.push(' ');
            }
        }
    }

    Ok(out.trim_end().to_string())
}
