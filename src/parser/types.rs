use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Strip the `@` delimiters GEDCOM puts around cross-reference ids.
pub fn normalize_xref(xref: &str) -> String {
    xref.trim().trim_matches('@').to_string()
}

/// Read-only view over a loaded record graph.
///
/// Everything the tree renderer knows about people and families comes
/// through these two lookups.
pub trait RecordGraph {
    fn individual(&self, xref: &str) -> Option<&Individual>;
    fn family(&self, xref: &str) -> Option<&Family>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
    #[default]
    Unknown,
}

impl Sex {
    pub fn from_gedcom(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "M" => Sex::Male,
            "F" => Sex::Female,
            _ => Sex::Unknown,
        }
    }

    /// Field keyword written into an individual block, if the sex is known.
    pub fn keyword(&self) -> Option<&'static str> {
        match self {
            Sex::Male => Some("male"),
            Sex::Female => Some("female"),
            Sex::Unknown => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventTag {
    Birth,
    Baptism,
    Christening,
    Death,
    Burial,
    Cremation,
    Marriage,
    /// Administrative "record changed" stamp, not a life event.
    Change,
    Other(String),
}

impl EventTag {
    pub fn as_gedcom(&self) -> &str {
        match self {
            EventTag::Birth => "BIRT",
            EventTag::Baptism => "BAPM",
            EventTag::Christening => "CHR",
            EventTag::Death => "DEAT",
            EventTag::Burial => "BURI",
            EventTag::Cremation => "CREM",
            EventTag::Marriage => "MARR",
            EventTag::Change => "CHAN",
            EventTag::Other(tag) => tag,
        }
    }
}

impl From<&str> for EventTag {
    fn from(tag: &str) -> Self {
        match tag.trim().to_ascii_uppercase().as_str() {
            "BIRT" => EventTag::Birth,
            "BAPM" => EventTag::Baptism,
            "CHR" => EventTag::Christening,
            "DEAT" => EventTag::Death,
            "BURI" => EventTag::Burial,
            "CREM" => EventTag::Cremation,
            "MARR" => EventTag::Marriage,
            "CHAN" => EventTag::Change,
            other => EventTag::Other(other.to_string()),
        }
    }
}

impl From<String> for EventTag {
    fn from(tag: String) -> Self {
        EventTag::from(tag.as_str())
    }
}

impl From<EventTag> for String {
    fn from(tag: EventTag) -> Self {
        tag.as_gedcom().to_string()
    }
}

impl fmt::Display for EventTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_gedcom())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place: Option<String>,
    /// Age at the event; only consulted for the stillbirth marker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
}

impl Event {
    pub fn dated(date: &str) -> Self {
        Self {
            date: Some(date.to_string()),
            ..Self::default()
        }
    }

    pub fn with_place(mut self, place: &str) -> Self {
        self.place = Some(place.to_string());
        self
    }
}

/// What the source file actually held for an event line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventBody {
    Detail(Event),
    /// A bare value with no sub-records, e.g. `1 DEAT Y`.
    Flag(String),
}

/// Result of classifying an [`EventBody`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventLookup<'a> {
    Record(&'a Event),
    /// `Y`, `0` or an empty flag: the event is asserted or denied but carries no data.
    Sentinel,
    Malformed(&'a str),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub tag: EventTag,
    pub body: EventBody,
}

impl EventRecord {
    pub fn new(tag: EventTag, event: Event) -> Self {
        Self {
            tag,
            body: EventBody::Detail(event),
        }
    }

    pub fn flag(tag: EventTag, value: &str) -> Self {
        Self {
            tag,
            body: EventBody::Flag(value.to_string()),
        }
    }

    pub fn lookup(&self) -> EventLookup<'_> {
        match &self.body {
            EventBody::Detail(event) => EventLookup::Record(event),
            EventBody::Flag(value) => match value.trim() {
                "" | "Y" | "y" | "0" => EventLookup::Sentinel,
                other => EventLookup::Malformed(other),
            },
        }
    }

    /// The detailed event, if this record is a real one.
    pub fn event(&self) -> Option<&Event> {
        match self.lookup() {
            EventLookup::Record(event) => Some(event),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Individual {
    pub xref: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub sex: Sex,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub famc: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fams: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<EventRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
}

impl Individual {
    pub fn new(xref: &str) -> Self {
        Self {
            xref: normalize_xref(xref),
            ..Self::default()
        }
    }

    /// First event record carrying `tag`.
    pub fn event(&self, tag: &EventTag) -> Option<&EventRecord> {
        self.events.iter().find(|record| &record.tag == tag)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Family {
    pub xref: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub husband: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wife: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marriage: Option<EventRecord>,
    /// Set when the couple is flagged as not married.
    #[serde(default)]
    pub unmarried: bool,
}

impl Family {
    pub fn new(xref: &str) -> Self {
        Self {
            xref: normalize_xref(xref),
            ..Self::default()
        }
    }

    pub fn marriage_event(&self) -> Option<&Event> {
        self.marriage.as_ref().and_then(EventRecord::event)
    }
}

/// On-disk JSON shape of a record graph.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RecordSet {
    #[serde(default)]
    pub individuals: Vec<Individual>,
    #[serde(default)]
    pub families: Vec<Family>,
}

/// In-memory record graph keyed by xref.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "RecordSet")]
pub struct Genealogy {
    individuals: HashMap<String, Individual>,
    families: HashMap<String, Family>,
}

impl Genealogy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_individual(&mut self, mut individual: Individual) {
        individual.xref = normalize_xref(&individual.xref);
        self.individuals.insert(individual.xref.clone(), individual);
    }

    pub fn insert_family(&mut self, mut family: Family) {
        family.xref = normalize_xref(&family.xref);
        self.families.insert(family.xref.clone(), family);
    }

    pub fn individual_count(&self) -> usize {
        self.individuals.len()
    }

    pub fn family_count(&self) -> usize {
        self.families.len()
    }

    /// Snapshot of the graph in its JSON shape, sorted by xref.
    pub fn to_record_set(&self) -> RecordSet {
        let mut individuals: Vec<Individual> = self.individuals.values().cloned().collect();
        individuals.sort_by(|a, b| a.xref.cmp(&b.xref));
        let mut families: Vec<Family> = self.families.values().cloned().collect();
        families.sort_by(|a, b| a.xref.cmp(&b.xref));
        RecordSet {
            individuals,
            families,
        }
    }
}

impl From<RecordSet> for Genealogy {
    fn from(set: RecordSet) -> Self {
        let mut genealogy = Genealogy::new();
        for individual in set.individuals {
            genealogy.insert_individual(individual);
        }
        for family in set.families {
            genealogy.insert_family(family);
        }
        genealogy
    }
}

impl RecordGraph for Genealogy {
    fn individual(&self, xref: &str) -> Option<&Individual> {
        self.individuals.get(xref.trim_matches('@'))
    }

    fn family(&self, xref: &str) -> Option<&Family> {
        self.families.get(xref.trim_matches('@'))
    }
}
