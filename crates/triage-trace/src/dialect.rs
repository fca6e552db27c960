use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Marker language of a reasoning trace.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Dialect {
    #[default]
    #[serde(rename = "es")]
    Spanish,
    #[serde(rename = "en")]
    English,
}

impl Dialect {
    pub const ALL: [Dialect; 2] = [Dialect::Spanish, Dialect::English];

    pub fn code(self) -> &'static str {
        match self {
            Self::Spanish => "es",
            Self::English => "en",
        }
    }

    pub fn markers(self) -> &'static MarkerTable {
        static SPANISH: OnceLock<MarkerTable> = OnceLock::new();
        static ENGLISH: OnceLock<MarkerTable> = OnceLock::new();
        match self {
            Self::Spanish => SPANISH.get_or_init(|| MarkerTable::build(&SPANISH_SOURCE)),
            Self::English => ENGLISH.get_or_init(|| MarkerTable::build(&ENGLISH_SOURCE)),
        }
    }

    pub fn vocabulary(self) -> &'static Vocabulary {
        match self {
            Self::Spanish => &SPANISH_VOCABULARY,
            Self::English => &ENGLISH_VOCABULARY,
        }
    }

    /// Tables to try for a structural marker: this dialect first, then the
    /// other one.
    pub fn with_fallback(self) -> [Dialect; 2] {
        match self {
            Self::Spanish => [Self::Spanish, Self::English],
            Self::English => [Self::English, Self::Spanish],
        }
    }

    /// Picks the dialect of the first line that carries a dialect-specific
    /// marker. Score lines are shared by both dialects and never decide.
    pub fn detect<'a>(lines: impl IntoIterator<Item = &'a str>) -> Option<Dialect> {
        lines.into_iter().find_map(|line| {
            Self::ALL
                .into_iter()
                .find(|dialect| dialect.markers().is_dialect_specific(line))
        })
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Localized display strings for node payloads.
#[derive(Debug)]
pub struct Vocabulary {
    pub start_title: &'static str,
    pub start_default_subtitle: &'static str,
    pub alarm_title: &'static str,
    pub no_alarm_title: &'static str,
    pub no_alarm_subtitle: &'static str,
    pub final_title: &'static str,
}

const SPANISH_VOCABULARY: Vocabulary = Vocabulary {
    start_title: "🩺 Inicio",
    start_default_subtitle: "Diagnóstico Híbrido V2",
    alarm_title: "⚠️ Signos de Alarma",
    no_alarm_title: "✅ Sin Alarmas",
    no_alarm_subtitle: "Evaluación normal",
    final_title: "📊 Scores Finales",
};

const ENGLISH_VOCABULARY: Vocabulary = Vocabulary {
    start_title: "🩺 Start",
    start_default_subtitle: "Hybrid Diagnosis V2",
    alarm_title: "⚠️ Alarm Signs",
    no_alarm_title: "✅ No Alarms",
    no_alarm_subtitle: "Normal evaluation",
    final_title: "📊 Final Scores",
};

struct PatternSource {
    start: &'static str,
    alarm_header: &'static str,
    alarm_activated: &'static str,
    alarm_rule: &'static str,
    fever: &'static str,
    final_marker: &'static str,
    final_scores: &'static str,
}

// A rule name runs from the activation colon to the first `->` after it.
const SPANISH_SOURCE: PatternSource = PatternSource {
    start: r"---\s*INICIO\b(?P<rest>.*)$",
    alarm_header: r"\[1\].*\bEvaluando\b",
    alarm_activated: r"ALARMA ACTIVADA",
    alarm_rule: r"ALARMA ACTIVADA\s*:\s*(?P<rule>.+?)\s*->",
    fever: r"(?P<label>Fiebre Alta|Hiperpirexia|Febrícula) \((?P<temp>\d+(?:[.,]\d+)?)°C\): Dengue\((?P<dengue>[+-]?\d+)\)",
    final_marker: r"\[SCORES FINALES\]",
    final_scores: r"\[SCORES FINALES\].*?Dengue:\s*(?P<dengue>[+-]?\d+)\s*\|\s*COVID:\s*(?P<covid>[+-]?\d+)",
};

const ENGLISH_SOURCE: PatternSource = PatternSource {
    start: r"---\s*START\b(?P<rest>.*)$",
    alarm_header: r"\[1\].*\bEvaluating\b",
    alarm_activated: r"ALARM ACTIVATED",
    alarm_rule: r"ALARM ACTIVATED\s*:\s*(?P<rule>.+?)\s*->",
    fever: r"(?P<label>High Fever|Hyperpyrexia|Low-Grade Fever) \((?P<temp>\d+(?:[.,]\d+)?)°C\): Dengue\((?P<dengue>[+-]?\d+)\)",
    final_marker: r"\[FINAL SCORES\]",
    final_scores: r"\[FINAL SCORES\].*?Dengue:\s*(?P<dengue>[+-]?\d+)\s*\|\s*COVID:\s*(?P<covid>[+-]?\d+)",
};

const SCORE_PATTERN: &str =
    r"-> (?P<symptom>.+?): COVID\((?P<covid>[+-]?\d+)\) \| Dengue\((?P<dengue>[+-]?\d+)\)";

/// Compiled marker patterns for one dialect. `alarm_activated` and
/// `final_marker` recognize a line; `alarm_rule` and `final_scores` capture
/// its data.
#[derive(Debug)]
pub struct MarkerTable {
    pub start: Regex,
    pub alarm_header: Regex,
    pub alarm_activated: Regex,
    pub alarm_rule: Regex,
    pub score: Regex,
    pub fever: Regex,
    pub final_marker: Regex,
    pub final_scores: Regex,
}

impl MarkerTable {
    fn build(source: &PatternSource) -> Self {
        Self {
            start: compile(source.start),
            alarm_header: compile(source.alarm_header),
            alarm_activated: compile(source.alarm_activated),
            alarm_rule: compile(source.alarm_rule),
            score: compile(SCORE_PATTERN),
            fever: compile(source.fever),
            final_marker: compile(source.final_marker),
            final_scores: compile(source.final_scores),
        }
    }

    /// True when `line` carries a marker that only this dialect produces.
    /// Partial markers count: a final line with a broken tally still names
    /// its language.
    pub fn is_dialect_specific(&self, line: &str) -> bool {
        self.start.is_match(line)
            || self.alarm_header.is_match(line)
            || self.alarm_activated.is_match(line)
            || self.fever.is_match(line)
            || self.final_marker.is_match(line)
    }
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in marker pattern must compile")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_tables_build_expected_all_patterns_compile() {
        for dialect in Dialect::ALL {
            let table = dialect.markers();
            assert!(table.score.is_match("-> Tos: COVID(+2) | Dengue(0)"));
        }
    }

    #[test]
    fn detect_start_marker_expected_dialect() {
        assert_eq!(
            Dialect::detect(["noise", "--- START Hybrid Diagnosis V2 ---"]),
            Some(Dialect::English)
        );
        assert_eq!(
            Dialect::detect(["--- INICIO Diagnóstico Híbrido V2"]),
            Some(Dialect::Spanish)
        );
    }

    #[test]
    fn detect_score_lines_only_expected_none() {
        assert_eq!(Dialect::detect(["-> Tos: COVID(+2) | Dengue(0)"]), None);
    }

    #[test]
    fn detect_broken_final_line_expected_dialect_still_named() {
        assert_eq!(
            Dialect::detect(["[FINAL SCORES] totals unavailable"]),
            Some(Dialect::English)
        );
    }

    #[test]
    fn alarm_rule_colon_in_name_expected_text_up_to_arrow() {
        let captures = Dialect::Spanish
            .markers()
            .alarm_rule
            .captures("⚠️ ALARMA ACTIVADA: regla:sangrado -> urgencia")
            .expect("rule should capture");
        assert_eq!(&captures["rule"], "regla:sangrado");
    }

    #[test]
    fn with_fallback_expected_own_table_first() {
        assert_eq!(
            Dialect::English.with_fallback(),
            [Dialect::English, Dialect::Spanish]
        );
    }

    #[test]
    fn dialect_serde_codes_expected_short_language_tags() {
        let json = serde_json::to_string(&Dialect::English).expect("dialect should serialize");
        assert_eq!(json, "\"en\"");
        assert_eq!(Dialect::Spanish.to_string(), "es");
    }
}
