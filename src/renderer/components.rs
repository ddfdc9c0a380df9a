use std::fmt::Display;

use tracing::warn;

use crate::parser::{EventLookup, EventRecord};
use crate::renderer::normalize::*;
use crate::renderer::traits::*;

/// Helper for consistent indentation
pub struct IndentationHelper;

impl IndentationHelper {
    pub fn indent_for_depth(depth: usize) -> String {
        "\t".repeat(depth)
    }
}

/// Opens and closes `kind[options]{ ... }` blocks.
///
/// Keeps no stack: whoever opens a block at some depth closes it at the
/// same depth before returning.
pub struct NodeEmitter;

impl NodeEmitter {
    pub fn open_block(&self, depth: usize, kind: impl Display, options: Option<&str>) -> String {
        let indent = IndentationHelper::indent_for_depth(depth);
        match options {
            Some(options) => format!("{}{}[{}]{{\n", indent, kind, options),
            None => format!("{}{}{{\n", indent, kind),
        }
    }

    pub fn close_block(&self, depth: usize) -> String {
        format!("{}}}\n", IndentationHelper::indent_for_depth(depth))
    }

    /// A field line. At depth zero the bare text is returned so it can be
    /// embedded in block options.
    pub fn field(&self, depth: usize, text: &str) -> String {
        if depth == 0 {
            text.to_string()
        } else {
            format!("{}{},\n", IndentationHelper::indent_for_depth(depth), text)
        }
    }
}

/// Suffix appended to an event key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventModifier {
    /// No place and no note: `-`.
    Uncertain,
    /// Place known: no suffix.
    Plain,
    /// A note follows the date and place groups: `+`.
    Annotated,
}

impl EventModifier {
    pub fn select(has_place: bool, has_note: bool) -> Self {
        if has_note {
            EventModifier::Annotated
        } else if has_place {
            EventModifier::Plain
        } else {
            EventModifier::Uncertain
        }
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            EventModifier::Uncertain => "-",
            EventModifier::Plain => "",
            EventModifier::Annotated => "+",
        }
    }
}

/// Renders one event as `key={date}{place}{note}`.
pub struct EventFormatter;

impl EventFormatter {
    /// Returns an empty string when there is nothing to print.
    pub fn format_event(
        &self,
        key: &str,
        record: Option<&EventRecord>,
        depth: usize,
        note: Option<BirthNote>,
    ) -> String {
        let Some(record) = record else {
            return String::new();
        };

        let event = match record.lookup() {
            EventLookup::Record(event) => event,
            EventLookup::Sentinel => return String::new(),
            EventLookup::Malformed(value) => {
                warn!("skipping malformed {} record `{}`", record.tag, value);
                return String::new();
            }
        };

        let Some(date) = event.date.as_deref().filter(|d| !d.trim().is_empty()) else {
            return String::new();
        };
        let place = event
            .place
            .as_deref()
            .map(normalize_place)
            .filter(|p| !p.is_empty());

        let modifier = EventModifier::select(place.is_some(), note.is_some());
        let mut text = format!("{}{}={{{}}}", key, modifier.suffix(), normalize_date(date));

        match (&place, note) {
            (Some(place), _) => text.push_str(&format!("{{{}}}", place)),
            (None, Some(_)) => text.push_str("{}"),
            (None, None) => {}
        }
        if let Some(note) = note {
            text.push_str(&format!("{{{}}}", note));
        }

        NodeEmitter.field(depth, &text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{Event, EventTag};

    fn birth(date: &str, place: Option<&str>) -> EventRecord {
        let mut event = Event::dated(date);
        event.place = place.map(str::to_string);
        EventRecord::new(EventTag::Birth, event)
    }

    #[test]
    fn test_open_and_close_block() {
        let emitter = NodeEmitter;
        assert_eq!(emitter.open_block(0, NodeKind::Parent, Some("id=F1")), "parent[id=F1]{\n");
        assert_eq!(emitter.open_block(2, PersonKind::Child, None), "\t\tc{\n");
        assert_eq!(emitter.close_block(2), "\t\t}\n");
    }

    #[test]
    fn test_field_separator_depends_on_depth() {
        assert_eq!(NodeEmitter.field(0, "male"), "male");
        assert_eq!(NodeEmitter.field(1, "male"), "\tmale,\n");
    }

    #[test]
    fn test_event_with_place() {
        let record = birth("15 MAR 1900", Some("Springfield, Illinois, USA"));
        assert_eq!(
            EventFormatter.format_event("birth", Some(&record), 1, None),
            "\tbirth={1900-03-15}{Springfield},\n"
        );
    }

    #[test]
    fn test_event_without_place_is_uncertain() {
        let record = birth("ABT 1850", None);
        assert_eq!(
            EventFormatter.format_event("birth", Some(&record), 2, None),
            "\t\tbirth-={(ca)1850},\n"
        );
    }

    #[test]
    fn test_event_with_note() {
        let without_place = birth("1900", None);
        assert_eq!(
            EventFormatter.format_event(
                "birth",
                Some(&without_place),
                1,
                Some(BirthNote::Stillborn)
            ),
            "\tbirth+={1900}{}{stillborn},\n"
        );

        let with_place = birth("1900", Some("Leeds"));
        assert_eq!(
            EventFormatter.format_event(
                "birth",
                Some(&with_place),
                1,
                Some(BirthNote::OutOfWedlock)
            ),
            "\tbirth+={1900}{Leeds}{out of wedlock},\n"
        );
    }

    #[test]
    fn test_event_at_depth_zero_has_no_separator() {
        let record = EventRecord::new(EventTag::Marriage, Event::dated("1880").with_place("York"));
        assert_eq!(
            EventFormatter.format_event("marriage", Some(&record), 0, None),
            "marriage={1880}{York}"
        );
    }

    #[test]
    fn test_omitted_events() {
        assert_eq!(EventFormatter.format_event("birth", None, 1, None), "");

        let undated = EventRecord::new(EventTag::Birth, Event::default().with_place("Leeds"));
        assert_eq!(EventFormatter.format_event("birth", Some(&undated), 1, None), "");

        let sentinel = EventRecord::flag(EventTag::Death, "Y");
        assert_eq!(EventFormatter.format_event("death", Some(&sentinel), 1, None), "");

        let malformed = EventRecord::flag(EventTag::Death, "last winter");
        assert_eq!(EventFormatter.format_event("death", Some(&malformed), 1, None), "");
    }
}
