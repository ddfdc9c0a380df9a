use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{GedtreeError, Result};
use crate::parser::types::*;

/// Level-1 tags read as individual events even when they carry no `DATE`.
const EVENT_TAGS: &[&str] = &[
    "BIRT", "CHR", "BAPM", "DEAT", "BURI", "CREM", "ADOP", "BARM", "BASM", "BLES", "CHRA",
    "CONF", "FCOM", "ORDN", "NATU", "EMIG", "IMMI", "CENS", "PROB", "WILL", "GRAD", "RETI",
    "EVEN", "RESI", "EDUC", "CHAN",
];

const UNMARRIED_FLAGS: &[&str] = &["_NMR", "_UMR", "_UNMARRIED"];

/// One line of a GEDCOM file, nested under its superior line.
#[derive(Debug, Clone, Default)]
pub struct GedNode {
    pub line: usize,
    pub tag: String,
    pub xref: Option<String>,
    pub value: String,
    pub children: Vec<GedNode>,
}

impl GedNode {
    fn child(&self, tag: &str) -> Option<&GedNode> {
        self.children.iter().find(|c| c.tag == tag)
    }

    fn child_value(&self, tag: &str) -> Option<String> {
        self.child(tag)
            .map(|c| c.value.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

struct GedLine<'a> {
    level: usize,
    xref: Option<&'a str>,
    tag: &'a str,
    value: &'a str,
}

/// Reader turning GEDCOM text into a [`Genealogy`].
pub struct GedcomParser;

impl GedcomParser {
    pub fn parse_str(&self, text: &str) -> Result<Genealogy> {
        let records = self.parse_records(text)?;
        let mut genealogy = Genealogy::new();

        for record in &records {
            match (record.tag.as_str(), &record.xref) {
                ("INDI", Some(_)) => genealogy.insert_individual(self.parse_individual(record)),
                ("FAM", Some(_)) => genealogy.insert_family(self.parse_family(record)),
                ("INDI" | "FAM", None) => {
                    warn!("line {}: {} record without xref skipped", record.line, record.tag);
                }
                _ => {} // Header, sources, notes and the like
            }
        }

        debug!(
            "loaded {} individuals and {} families",
            genealogy.individual_count(),
            genealogy.family_count()
        );
        Ok(genealogy)
    }

    /// Build the record tree from level numbers, folding `CONC`/`CONT`.
    pub fn parse_records(&self, text: &str) -> Result<Vec<GedNode>> {
        let mut roots = Vec::new();
        let mut stack: Vec<GedNode> = Vec::new();

        for (index, raw) in text.lines().enumerate() {
            let number = index + 1;
            let Some(line) = parse_line(number, raw)? else {
                continue;
            };

            if line.level > stack.len() {
                let message = match stack.len() {
                    0 => format!("record starts at level {} instead of 0", line.level),
                    depth => format!("level {} follows level {}", line.level, depth - 1),
                };
                return Err(GedtreeError::parse(number, message));
            }
            collapse(&mut stack, &mut roots, line.level);

            if matches!(line.tag, "CONC" | "CONT") {
                match stack.last_mut() {
                    Some(parent) => {
                        if line.tag == "CONT" {
                            parent.value.push('\n');
                        }
                        parent.value.push_str(line.value);
                    }
                    None => warn!("line {}: {} without a superior line", number, line.tag),
                }
                continue;
            }

            stack.push(GedNode {
                line: number,
                tag: line.tag.to_ascii_uppercase(),
                xref: line.xref.map(normalize_xref),
                value: line.value.to_string(),
                children: Vec::new(),
            });
        }

        collapse(&mut stack, &mut roots, 0);
        Ok(roots)
    }

    fn parse_individual(&self, record: &GedNode) -> Individual {
        let mut individual = Individual::new(record.xref.as_deref().unwrap_or_default());

        for node in &record.children {
            let value = node.value.trim();
            match node.tag.as_str() {
                "NAME" => {
                    if individual.name.is_none() && !value.is_empty() {
                        individual.name = Some(value.to_string());
                    }
                }
                "SEX" => individual.sex = Sex::from_gedcom(value),
                "FAMC" => {
                    if individual.famc.is_none() && !value.is_empty() {
                        individual.famc = Some(normalize_xref(value));
                    }
                }
                "FAMS" => {
                    if !value.is_empty() {
                        individual.fams.push(normalize_xref(value));
                    }
                }
                "OCCU" => {
                    if individual.occupation.is_none() && !value.is_empty() {
                        individual.occupation = Some(value.to_string());
                    }
                }
                tag if EVENT_TAGS.contains(&tag) || node.child("DATE").is_some() => {
                    individual.events.push(self.parse_event(node));
                }
                _ => {}
            }
        }

        individual
    }

    fn parse_family(&self, record: &GedNode) -> Family {
        let mut family = Family::new(record.xref.as_deref().unwrap_or_default());

        for node in &record.children {
            let value = node.value.trim();
            match node.tag.as_str() {
                "HUSB" => family.husband = Some(normalize_xref(value)),
                "WIFE" => family.wife = Some(normalize_xref(value)),
                "CHIL" => family.children.push(normalize_xref(value)),
                "MARR" => {
                    if family.marriage.is_none() {
                        family.marriage = Some(self.parse_event(node));
                    }
                }
                tag if UNMARRIED_FLAGS.contains(&tag) => {
                    family.unmarried |= matches!(
                        value.to_ascii_uppercase().as_str(),
                        "" | "Y" | "YES" | "TRUE" | "1"
                    );
                }
                "_STAT" => {
                    family.unmarried |= matches!(
                        value.to_ascii_uppercase().as_str(),
                        "NOT MARRIED" | "UNMARRIED"
                    );
                }
                _ => {}
            }
        }

        family
    }

    fn parse_event(&self, node: &GedNode) -> EventRecord {
        let tag = EventTag::from(node.tag.as_str());
        if node.children.is_empty() {
            return EventRecord::flag(tag, node.value.trim());
        }
        EventRecord::new(
            tag,
            Event {
                date: node.child_value("DATE"),
                place: node.child_value("PLAC"),
                age: node.child_value("AGE"),
            },
        )
    }
}

fn parse_line(number: usize, raw: &str) -> Result<Option<GedLine<'_>>> {
    // Trailing spaces belong to the value and matter when CONC joins it
    let line = raw
        .trim_start_matches('\u{feff}')
        .trim_start()
        .trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Ok(None);
    }

    let (level_text, rest) = split_token(line);
    let level = level_text
        .parse::<usize>()
        .map_err(|_| GedtreeError::parse(number, format!("invalid level `{}`", level_text)))?;

    let (mut tag, mut value) = split_token(rest);
    let mut xref = None;
    if tag.len() > 1 && tag.starts_with('@') && tag.ends_with('@') {
        xref = Some(tag);
        (tag, value) = split_token(value);
    }
    if tag.is_empty() {
        return Err(GedtreeError::parse(number, "missing tag"));
    }

    Ok(Some(GedLine {
        level,
        xref,
        tag,
        value,
    }))
}

/// Split at the first space; the tail keeps its inner spacing.
fn split_token(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    match text.find(' ') {
        Some(index) => (&text[..index], &text[index + 1..]),
        None => (text, ""),
    }
}

fn collapse(stack: &mut Vec<GedNode>, roots: &mut Vec<GedNode>, level: usize) {
    while stack.len() > level {
        let Some(node) = stack.pop() else {
            break;
        };
        match stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => roots.push(node),
        }
    }
}

/// Load a record graph from disk: `.json` record sets or GEDCOM text.
pub fn load_genealogy(path: &Path) -> Result<Genealogy> {
    let bytes = fs::read(path)?;
    let text = String::from_utf8_lossy(&bytes);

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        debug!("reading JSON record set from {}", path.display());
        Ok(serde_json::from_str(&text)?)
    } else {
        debug!("reading GEDCOM from {}", path.display());
        GedcomParser.parse_str(&text)
    }
}
