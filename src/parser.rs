//! XML parsing layer for MusicXML documents.
//!
//! Thin wrappers around roxmltree plus element-level parsers that turn
//! `<pitch>`, `<note>`, `<attributes>` and `<barline>` nodes into model
//! values. Structural traversal lives in [`crate::reader`].

use crate::errors::ParseError;
use crate::types::{BarStyle, BeamState, DurationType, MeasureContext, NoteEvent, Step};
use roxmltree::Node;
use std::borrow::Cow;

// ============================================================================
// DOCUMENT HELPERS
// ============================================================================

/// Strip DOCTYPE declarations (roxmltree rejects DTDs for security, and
/// exported MusicXML files routinely carry one).
pub fn strip_doctype(xml: &str) -> Cow<'_, str> {
    if xml.contains("<!DOCTYPE") {
        Cow::Owned(
            xml.lines()
                .filter(|line| !line.trim_start().starts_with("<!DOCTYPE"))
                .collect::<Vec<_>>()
                .join("\n"),
        )
    } else {
        Cow::Borrowed(xml)
    }
}

/// Get first child element with given tag name
pub fn get_child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == tag)
}

/// Get text content of first child with given tag
pub fn get_child_text<'a>(node: Node<'a, '_>, tag: &str) -> Option<&'a str> {
    get_child(node, tag).and_then(|n| n.text())
}

// ============================================================================
// ELEMENT PARSERS
// ============================================================================

/// Parse a MusicXML `<pitch>` element into step and written octave.
pub fn parse_pitch(pitch_node: Node) -> Result<(Step, i8), ParseError> {
    let step_text = get_child_text(pitch_node, "step").ok_or_else(|| {
        ParseError::MissingRequiredElement("pitch missing step element".to_string())
    })?;
    let step = Step::parse(step_text.trim())
        .ok_or_else(|| ParseError::InvalidValue(format!("invalid step: {step_text}")))?;

    let octave_text = get_child_text(pitch_node, "octave").ok_or_else(|| {
        ParseError::MissingRequiredElement("pitch missing octave element".to_string())
    })?;
    let octave: i8 = octave_text
        .trim()
        .parse()
        .map_err(|_| ParseError::InvalidValue(format!("invalid octave: {octave_text}")))?;
    if !(1..=7).contains(&octave) {
        return Err(ParseError::OctaveOutOfRange(octave));
    }

    Ok((step, octave))
}

/// Parse one `<note>` element into a `NoteEvent`.
///
/// Returns `Ok(None)` for note kinds the pipeline has no token for
/// (neither a `<rest>` nor a `<pitch>` child, e.g. unpitched percussion).
/// A missing `<duration>` is fatal: duration drives the notation mark and
/// a silent zero default would corrupt the output.
pub fn parse_note(note_node: Node) -> Result<Option<NoteEvent>, ParseError> {
    let rest = get_child(note_node, "rest");
    let pitch = get_child(note_node, "pitch");

    if rest.is_none() && pitch.is_none() {
        return Ok(None);
    }

    let duration_text = get_child_text(note_node, "duration").ok_or_else(|| {
        ParseError::MissingRequiredElement("note missing duration element".to_string())
    })?;
    let duration_ticks: u32 = duration_text
        .trim()
        .parse()
        .map_err(|_| ParseError::InvalidValue(format!("invalid duration value: {duration_text}")))?;

    let duration_type = match get_child_text(note_node, "type") {
        Some(text) => {
            let parsed = DurationType::parse(text.trim());
            if parsed.is_none() {
                log::debug!("ignoring unsupported note type '{}'", text.trim());
            }
            parsed
        }
        None => None,
    };

    let dot_count = note_node
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "dot")
        .count();
    if dot_count > 2 {
        return Err(ParseError::InvalidValue(format!(
            "{dot_count} augmentation dots on one note"
        )));
    }
    let dot_count = dot_count as u8;

    if let Some(pitch_node) = pitch {
        let (step, octave) = parse_pitch(pitch_node)?;
        // Only the first beam element matters; further levels describe
        // secondary beams of the same group.
        let beam = get_child_text(note_node, "beam").map(|text| BeamState::parse(text.trim()));
        Ok(Some(NoteEvent {
            is_rest: false,
            step: Some(step),
            octave,
            duration_ticks,
            duration_type,
            dot_count,
            beam,
        }))
    } else {
        // Rests render at a fixed placeholder octave and never join a beam
        // group.
        Ok(Some(NoteEvent {
            is_rest: true,
            step: None,
            octave: 4,
            duration_ticks,
            duration_type,
            dot_count,
            beam: None,
        }))
    }
}

/// Parse an `<attributes>` block, updating the running context in place.
/// Absent fields leave the previous values untouched.
pub fn parse_attributes(
    attributes_node: Node,
    context: &mut MeasureContext,
) -> Result<(), ParseError> {
    if let Some(text) = get_child_text(attributes_node, "divisions") {
        let divisions: u32 = text
            .trim()
            .parse()
            .map_err(|_| ParseError::InvalidValue(format!("invalid divisions value: {text}")))?;
        if divisions == 0 {
            return Err(ParseError::InvalidValue(
                "divisions must be at least 1".to_string(),
            ));
        }
        context.divisions = divisions;
    }

    if let Some(key_node) = get_child(attributes_node, "key") {
        if let Some(text) = get_child_text(key_node, "fifths") {
            let fifths: i8 = text
                .trim()
                .parse()
                .map_err(|_| ParseError::InvalidValue(format!("invalid fifths value: {text}")))?;
            if !(-7..=7).contains(&fifths) {
                return Err(ParseError::FifthsOutOfRange(fifths));
            }
            context.fifths = fifths;
        }
    }

    Ok(())
}

/// Known `bar-style` values. `None` means the style is unrecognized and the
/// caller falls back to a plain barline.
pub fn parse_bar_style(text: &str) -> Option<BarStyle> {
    match text {
        "light-light" => Some(BarStyle::LightLight),
        "light-heavy" => Some(BarStyle::LightHeavy),
        "regular" => Some(BarStyle::Regular),
        _ => None,
    }
}
