use std::cmp::Ordering;
use std::fmt;

const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// A calendar point with optional month and day precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatePoint {
    pub year: u32,
    pub month: Option<u8>,
    pub day: Option<u8>,
}

impl DatePoint {
    pub fn year(year: u32) -> Self {
        Self {
            year,
            month: None,
            day: None,
        }
    }

    /// Parse `[day] [MON] year` words, or a single ISO `YYYY[-MM[-DD]]` word.
    fn from_words(words: &[&str]) -> Option<Self> {
        match words {
            [iso] if iso.contains('-') => Self::from_iso(iso),
            [year] => Some(Self::year(parse_year(year)?)),
            [month, year] => Some(Self {
                year: parse_year(year)?,
                month: Some(parse_month(month)?),
                day: None,
            }),
            [day, month, year] => Some(Self {
                year: parse_year(year)?,
                month: Some(parse_month(month)?),
                day: Some(parse_day(day)?),
            }),
            _ => None,
        }
    }

    fn from_iso(text: &str) -> Option<Self> {
        let mut parts = text.split('-');
        let year = parts.next().filter(|y| y.len() == 4).and_then(parse_year)?;
        let month = match parts.next() {
            Some(m) => Some(parse_number(m, 2).filter(|m| (1..=12).contains(m))? as u8),
            None => None,
        };
        let day = match parts.next() {
            Some(d) => Some(parse_day(d)?),
            None => None,
        };
        if parts.next().is_some() {
            return None;
        }
        Some(Self { year, month, day })
    }

    /// Strict ordering restricted to the precision both points share.
    ///
    /// `1850` vs `MAR 1850` is not "before" in either direction.
    pub fn precedes(&self, other: &DatePoint) -> bool {
        match self.year.cmp(&other.year) {
            Ordering::Less => return true,
            Ordering::Greater => return false,
            Ordering::Equal => {}
        }
        match (self.month, other.month) {
            (Some(a), Some(b)) if a != b => a < b,
            (Some(_), Some(_)) => matches!((self.day, other.day), (Some(a), Some(b)) if a < b),
            _ => false,
        }
    }
}

impl fmt::Display for DatePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.year)?;
        if let Some(month) = self.month {
            write!(f, "-{:02}", month)?;
            if let Some(day) = self.day {
                write!(f, "-{:02}", day)?;
            }
        }
        Ok(())
    }
}

/// A date expression from the GEDCOM date mini-grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GedDate {
    Exact(DatePoint),
    /// `ABT`, `EST` and `CAL` all collapse to circa.
    About(DatePoint),
    Before(DatePoint),
    After(DatePoint),
    Range(DatePoint, DatePoint),
}

impl GedDate {
    pub fn parse(raw: &str) -> Option<Self> {
        let text = strip_annotation(raw).to_ascii_uppercase();
        let words: Vec<&str> = text.split_whitespace().collect();

        match words.as_slice() {
            [] => None,
            ["ABT" | "EST" | "CAL", rest @ ..] => DatePoint::from_words(rest).map(GedDate::About),
            ["BEF", rest @ ..] | ["TO", rest @ ..] => {
                DatePoint::from_words(rest).map(GedDate::Before)
            }
            ["AFT", rest @ ..] => DatePoint::from_words(rest).map(GedDate::After),
            ["INT", rest @ ..] => DatePoint::from_words(rest).map(GedDate::Exact),
            ["BET", rest @ ..] => Self::range(rest, "AND"),
            ["FROM", rest @ ..] => {
                if rest.contains(&"TO") {
                    Self::range(rest, "TO")
                } else {
                    DatePoint::from_words(rest).map(GedDate::After)
                }
            }
            rest => DatePoint::from_words(rest).map(GedDate::Exact),
        }
    }

    fn range(words: &[&str], separator: &str) -> Option<Self> {
        let split = words.iter().position(|w| *w == separator)?;
        let start = DatePoint::from_words(&words[..split])?;
        let end = DatePoint::from_words(&words[split + 1..])?;
        Some(GedDate::Range(start, end))
    }

    /// The point used when ordering two dates: the start of a range, the
    /// bound of an open interval, the date itself otherwise.
    pub fn anchor(&self) -> DatePoint {
        match self {
            GedDate::Exact(p) | GedDate::About(p) | GedDate::Before(p) | GedDate::After(p) => *p,
            GedDate::Range(start, _) => *start,
        }
    }
}

impl fmt::Display for GedDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GedDate::Exact(p) => write!(f, "{}", p),
            GedDate::About(p) => write!(f, "(ca){}", p),
            GedDate::Before(p) => write!(f, "/{}", p),
            GedDate::After(p) => write!(f, "{}/", p),
            GedDate::Range(start, end) => write!(f, "{}/{}", start, end),
        }
    }
}

/// Whether `a` strictly precedes `b`. Dates that do not parse never do.
pub fn is_before(a: &str, b: &str) -> bool {
    match (GedDate::parse(a), GedDate::parse(b)) {
        (Some(a), Some(b)) => a.anchor().precedes(&b.anchor()),
        _ => false,
    }
}

/// Drop a trailing `( ... )` annotation, e.g. `INT 1850 (census)`.
pub fn strip_annotation(raw: &str) -> &str {
    let trimmed = raw.trim();
    if trimmed.ends_with(')') {
        if let Some(open) = trimmed.rfind('(') {
            return trimmed[..open].trim_end();
        }
    }
    trimmed
}

/// First standalone run of exactly four digits, e.g. the year in `ABT 1850`.
pub fn first_year(raw: &str) -> Option<u32> {
    let bytes = raw.as_bytes();
    let mut start = 0;
    while start < bytes.len() {
        if !bytes[start].is_ascii_digit() {
            start += 1;
            continue;
        }
        let end = bytes[start..]
            .iter()
            .position(|b| !b.is_ascii_digit())
            .map_or(bytes.len(), |len| start + len);
        if end - start == 4 {
            return raw[start..end].parse().ok();
        }
        start = end;
    }
    None
}

fn parse_number(text: &str, max_len: usize) -> Option<u32> {
    if text.is_empty() || text.len() > max_len || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

fn parse_year(text: &str) -> Option<u32> {
    parse_number(text, 4)
}

fn parse_day(text: &str) -> Option<u8> {
    parse_number(text, 2)
        .filter(|d| (1..=31).contains(d))
        .map(|d| d as u8)
}

fn parse_month(text: &str) -> Option<u8> {
    let upper = text.to_ascii_uppercase();
    MONTHS
        .iter()
        .position(|m| *m == upper)
        .map(|index| index as u8 + 1)
}
