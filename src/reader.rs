//! Score Reader: walks the measure/note tree in document order and yields a
//! linear stream of note/rest events and barline markers.
//!
//! The reader owns the only mutable state in the pipeline: the running
//! [`MeasureContext`] (divisions and key signature, persisting across
//! measures until overridden) and the beam flag that drives dense rendering
//! of beamed groups. Each emitted event carries an immutable context
//! snapshot; nothing downstream mutates it.

use crate::errors::ParseError;
use crate::parser;
use crate::types::{BarStyle, BeamState, MeasureContext, ScoreEvent, Warning};
use roxmltree::{Document, Node};

/// Reader output: the event stream plus recoverable warnings.
#[derive(Debug, Clone)]
pub struct ReadOutcome {
    pub events: Vec<ScoreEvent>,
    pub warnings: Vec<Warning>,
}

struct ReaderState {
    context: MeasureContext,
    /// True inside a beamed group: the previous pitched note carried
    /// `beam=begin` and no later beam state has closed the group.
    beamed: bool,
    current_measure: u32,
    warnings: Vec<Warning>,
}

impl ReaderState {
    fn new() -> Self {
        Self {
            context: MeasureContext::default(),
            beamed: false,
            current_measure: 0,
            warnings: Vec::new(),
        }
    }

    fn warn(&mut self, message: String) {
        log::warn!("measure {}: {}", self.current_measure, message);
        self.warnings.push(Warning {
            measure: self.current_measure,
            message,
        });
    }
}

/// Scan a parsed MusicXML document into a score event stream.
///
/// Parts are walked in document order and their measures concatenated into
/// one linear sequence, so a single-part score reads front to back. The
/// root element must be `score-partwise`.
pub fn read_score(doc: &Document) -> Result<ReadOutcome, ParseError> {
    let root = doc.root_element();
    if root.tag_name().name() != "score-partwise" {
        return Err(ParseError::UnsupportedFormat(format!(
            "expected score-partwise, found {}",
            root.tag_name().name()
        )));
    }

    let mut state = ReaderState::new();
    let mut events = Vec::new();

    for part in root
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "part")
    {
        for measure in part
            .children()
            .filter(|n| n.is_element() && n.tag_name().name() == "measure")
        {
            read_measure(measure, &mut state, &mut events)?;
        }
    }

    Ok(ReadOutcome {
        events,
        warnings: state.warnings,
    })
}

fn read_measure(
    measure: Node,
    state: &mut ReaderState,
    events: &mut Vec<ScoreEvent>,
) -> Result<(), ParseError> {
    state.current_measure = measure
        .attribute("number")
        .and_then(|n| n.parse().ok())
        .unwrap_or(state.current_measure + 1);

    for child in measure.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "attributes" => parser::parse_attributes(child, &mut state.context)?,
            "note" => match parser::parse_note(child)? {
                Some(event) => {
                    // Rests always stay spaced; pitched notes update the
                    // beam flag when they carry a beam state, otherwise
                    // they inherit it.
                    let dense = if event.is_rest {
                        false
                    } else {
                        if let Some(beam) = event.beam {
                            state.beamed = beam == BeamState::Begin;
                        }
                        state.beamed
                    };
                    events.push(ScoreEvent::Note {
                        event,
                        context: state.context,
                        dense,
                    });
                }
                None => {
                    state.warn("skipping note that is neither a rest nor a pitched note".to_string())
                }
            },
            // backup, forward, direction, harmony: no Jianpu counterpart.
            _ => {}
        }
    }

    let style = match parser::get_child(measure, "barline")
        .and_then(|barline| parser::get_child_text(barline, "bar-style"))
    {
        Some(text) => parser::parse_bar_style(text.trim()).unwrap_or_else(|| {
            state.warn(format!("unknown bar-style '{}', using a plain barline", text.trim()));
            BarStyle::Regular
        }),
        None => BarStyle::Regular,
    };
    events.push(ScoreEvent::Barline(style));

    Ok(())
}
