use crate::{
    AlarmRecord, ClassifiedLine, ClassifiedTrace, FinalRecord, MarkerTable, ScoreRecord,
    StageRecords, StageTag, StartRecord,
};
use regex::{Captures, Regex};

pub fn extract_start(trace: &ClassifiedTrace<'_>) -> Option<StartRecord> {
    let line = trace.first_tagged(StageTag::Start)?;
    let vocabulary = trace.dialect.vocabulary();
    let captures = capture(trace, line, |markers| &markers.start)?;

    let rest = captures
        .name("rest")
        .map(|m| m.as_str())
        .unwrap_or_default()
        .trim()
        .trim_end_matches('-')
        .trim();
    let sublabel = if rest.is_empty() {
        vocabulary.start_default_subtitle.to_string()
    } else {
        rest.to_string()
    };

    Some(StartRecord {
        label: vocabulary.start_title.to_string(),
        sublabel,
        language: trace.dialect,
    })
}

/// Every activation line counts toward `activated`; only lines whose rule
/// name captures contribute a name.
pub fn extract_alarm(trace: &ClassifiedTrace<'_>) -> Option<AlarmRecord> {
    trace.first_tagged(StageTag::AlarmHeader)?;

    let mut activated = false;
    let mut triggered_rule_names = Vec::new();
    for line in trace.tagged(StageTag::AlarmActivated) {
        activated = true;
        match rule_name(trace, line) {
            Some(rule) => triggered_rule_names.push(rule),
            None => skip_line(line, "activation without a rule name"),
        }
    }

    Some(AlarmRecord {
        activated,
        triggered_rule_names,
    })
}

/// Symptom score records in source line order, then the first fever line
/// that parses.
pub fn extract_scores(trace: &ClassifiedTrace<'_>) -> Vec<ScoreRecord> {
    let mut scores = Vec::new();
    let mut fever = None;

    for line in &trace.lines {
        if line.has(StageTag::Score) {
            match capture(trace, line, |markers| &markers.score).and_then(|c| symptom_score(&c)) {
                Some(record) => scores.push(record),
                None => skip_line(line, "score delta out of range"),
            }
        } else if line.has(StageTag::Fever) && fever.is_none() {
            fever = capture(trace, line, |markers| &markers.fever).and_then(|c| fever_score(&c));
            if fever.is_none() {
                skip_line(line, "fever delta out of range");
            }
        }
    }

    scores.extend(fever);
    scores
}

pub fn extract_final(trace: &ClassifiedTrace<'_>) -> Option<FinalRecord> {
    trace.tagged(StageTag::FinalScores).find_map(|line| {
        let Some(captures) = capture(trace, line, |markers| &markers.final_scores) else {
            skip_line(line, "final line without totals");
            return None;
        };
        match (signed(&captures, "dengue"), signed(&captures, "covid")) {
            (Some(dengue_total), Some(covid_total)) => Some(FinalRecord {
                dengue_total,
                covid_total,
                language: trace.dialect,
            }),
            _ => {
                skip_line(line, "final totals out of range");
                None
            }
        }
    })
}

/// Runs all four extractors over one classified trace.
pub fn extract_records(trace: &ClassifiedTrace<'_>) -> StageRecords {
    StageRecords {
        dialect: trace.dialect,
        start: extract_start(trace),
        alarm: extract_alarm(trace),
        scores: extract_scores(trace),
        final_tally: extract_final(trace),
    }
}

/// Captures from the trace dialect's table, falling back to the other one.
fn capture<'t>(
    trace: &ClassifiedTrace<'t>,
    line: &ClassifiedLine<'t>,
    pick: fn(&MarkerTable) -> &Regex,
) -> Option<Captures<'t>> {
    trace
        .dialect
        .with_fallback()
        .into_iter()
        .find_map(|dialect| pick(dialect.markers()).captures(line.line.text))
}

fn rule_name(trace: &ClassifiedTrace<'_>, line: &ClassifiedLine<'_>) -> Option<String> {
    let captures = capture(trace, line, |markers| &markers.alarm_rule)?;
    let rule = captures.name("rule")?.as_str().trim();
    (!rule.is_empty()).then(|| rule.to_string())
}

fn symptom_score(captures: &Captures<'_>) -> Option<ScoreRecord> {
    let symptom = captures.name("symptom")?.as_str().trim();
    if symptom.is_empty() {
        return None;
    }
    Some(ScoreRecord {
        symptom_label: symptom.to_string(),
        covid_delta: signed(captures, "covid")?,
        dengue_delta: signed(captures, "dengue")?,
    })
}

fn fever_score(captures: &Captures<'_>) -> Option<ScoreRecord> {
    let label = captures.name("label")?.as_str();
    let temperature = captures.name("temp")?.as_str();
    Some(ScoreRecord {
        symptom_label: format!("{label} ({temperature}°C)"),
        covid_delta: 0,
        dengue_delta: signed(captures, "dengue")?,
    })
}

fn signed(captures: &Captures<'_>, group: &str) -> Option<i64> {
    captures.name(group)?.as_str().parse::<i64>().ok()
}

fn skip_line(line: &ClassifiedLine<'_>, reason: &str) {
    tracing::trace!(line = line.line.index, reason, "skipping trace line");
}
