use crate::{Dialect, MarkerTable};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;

/// One raw line of a trace with its zero-based position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TraceLine<'a> {
    pub index: usize,
    pub text: &'a str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageTag {
    Start,
    AlarmHeader,
    AlarmActivated,
    Score,
    Fever,
    FinalScores,
}

impl StageTag {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::AlarmHeader => "alarm_header",
            Self::AlarmActivated => "alarm_activated",
            Self::Score => "score",
            Self::Fever => "fever",
            Self::FinalScores => "final_scores",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClassifiedLine<'a> {
    pub line: TraceLine<'a>,
    pub tags: BTreeSet<StageTag>,
}

impl ClassifiedLine<'_> {
    pub fn has(&self, tag: StageTag) -> bool {
        self.tags.contains(&tag)
    }

    pub fn is_untagged(&self) -> bool {
        self.tags.is_empty()
    }
}

/// A trace split into lines and tagged. The dialect is chosen once for the
/// whole trace and decides labels and record languages.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClassifiedTrace<'a> {
    pub dialect: Dialect,
    /// False when no line carried a dialect-specific marker and the default
    /// dialect was assumed.
    pub dialect_detected: bool,
    pub lines: Vec<ClassifiedLine<'a>>,
}

impl<'a> ClassifiedTrace<'a> {
    pub fn tagged(&self, tag: StageTag) -> impl Iterator<Item = &ClassifiedLine<'a>> + '_ {
        self.lines.iter().filter(move |line| line.has(tag))
    }

    pub fn first_tagged(&self, tag: StageTag) -> Option<&ClassifiedLine<'a>> {
        self.tagged(tag).next()
    }

    pub fn is_unrecognized(&self) -> bool {
        self.lines.iter().all(ClassifiedLine::is_untagged)
    }
}

pub fn classify_trace(trace: &str) -> ClassifiedTrace<'_> {
    let detected = Dialect::detect(trace.lines());
    let dialect = detected.unwrap_or_default();

    let lines = trace
        .lines()
        .enumerate()
        .map(|(index, text)| ClassifiedLine {
            line: TraceLine { index, text },
            tags: tag_line(text, dialect),
        })
        .collect();

    ClassifiedTrace {
        dialect,
        dialect_detected: detected.is_some(),
        lines,
    }
}

/// Structural markers are recognized in both dialects; the trace dialect
/// only decides which table is tried first.
fn tag_line(text: &str, dialect: Dialect) -> BTreeSet<StageTag> {
    let mut tags = BTreeSet::new();
    if matches_any(dialect, text, |markers| &markers.start) {
        tags.insert(StageTag::Start);
    }
    if matches_any(dialect, text, |markers| &markers.alarm_header) {
        tags.insert(StageTag::AlarmHeader);
    }
    if matches_any(dialect, text, |markers| &markers.alarm_activated) {
        tags.insert(StageTag::AlarmActivated);
    }
    if matches_any(dialect, text, |markers| &markers.score) {
        tags.insert(StageTag::Score);
    } else if matches_any(dialect, text, |markers| &markers.fever) {
        tags.insert(StageTag::Fever);
    }
    if matches_any(dialect, text, |markers| &markers.final_marker) {
        tags.insert(StageTag::FinalScores);
    }
    tags
}

fn matches_any(dialect: Dialect, text: &str, pick: fn(&MarkerTable) -> &Regex) -> bool {
    dialect
        .with_fallback()
        .into_iter()
        .any(|candidate| pick(candidate.markers()).is_match(text))
}
