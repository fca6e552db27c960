use crate::Dialect;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartRecord {
    pub label: String,
    pub sublabel: String,
    pub language: Dialect,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmRecord {
    pub activated: bool,
    pub triggered_rule_names: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub symptom_label: String,
    pub covid_delta: i64,
    pub dengue_delta: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalRecord {
    pub dengue_total: i64,
    pub covid_total: i64,
    pub language: Dialect,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum StageRecord {
    Start(StartRecord),
    Alarm(AlarmRecord),
    Score(ScoreRecord),
    Final(FinalRecord),
}

/// Vertical stage of the compiled graph, in stacking order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Start,
    Alarm,
    Scores,
    Final,
}

impl Stage {
    pub const ORDER: [Stage; 4] = [Stage::Start, Stage::Alarm, Stage::Scores, Stage::Final];
}

/// Everything the extractors found in one trace.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageRecords {
    pub dialect: Dialect,
    pub start: Option<StartRecord>,
    pub alarm: Option<AlarmRecord>,
    pub scores: Vec<ScoreRecord>,
    pub final_tally: Option<FinalRecord>,
}

impl StageRecords {
    pub fn is_empty(&self) -> bool {
        self.start.is_none()
            && self.alarm.is_none()
            && self.scores.is_empty()
            && self.final_tally.is_none()
    }

    pub fn has_stage(&self, stage: Stage) -> bool {
        match stage {
            Stage::Start => self.start.is_some(),
            Stage::Alarm => self.alarm.is_some(),
            Stage::Scores => !self.scores.is_empty(),
            Stage::Final => self.final_tally.is_some(),
        }
    }

    /// Band a stage occupies: the number of present stages stacked above it.
    /// `None` when the stage is absent.
    pub fn band_of(&self, stage: Stage) -> Option<u32> {
        if !self.has_stage(stage) {
            return None;
        }
        let above = Stage::ORDER
            .into_iter()
            .take_while(|candidate| *candidate != stage)
            .filter(|candidate| self.has_stage(*candidate))
            .count();
        u32::try_from(above).ok()
    }

    /// Flat view in stage order.
    pub fn records(&self) -> Vec<StageRecord> {
        let mut records = Vec::with_capacity(self.scores.len() + 3);
        records.extend(self.start.clone().map(StageRecord::Start));
        records.extend(self.alarm.clone().map(StageRecord::Alarm));
        records.extend(self.scores.iter().cloned().map(StageRecord::Score));
        records.extend(self.final_tally.clone().map(StageRecord::Final));
        records
    }
}
