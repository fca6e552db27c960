use crate::{Position, TraceGraphError};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CENTER_X: i64 = 400;
pub const DEFAULT_BAND_HEIGHT: i64 = 120;
pub const DEFAULT_SCORE_NODE_WIDTH: i64 = 260;
pub const DEFAULT_SCORE_GAP: i64 = 20;

/// Fixed spacing rule for the stage bands. Positions depend only on band
/// indices and ordinals, never on text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub center_x: i64,
    pub band_height: i64,
    pub score_node_width: i64,
    pub score_gap: i64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            center_x: DEFAULT_CENTER_X,
            band_height: DEFAULT_BAND_HEIGHT,
            score_node_width: DEFAULT_SCORE_NODE_WIDTH,
            score_gap: DEFAULT_SCORE_GAP,
        }
    }
}

impl LayoutConfig {
    pub fn from_json(source: &str) -> Result<Self, TraceGraphError> {
        let config: Self = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, TraceGraphError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_json(&source)
    }

    pub fn validate(&self) -> Result<(), TraceGraphError> {
        if self.band_height <= 0 {
            return Err(TraceGraphError::LayoutConfig(format!(
                "band_height must be positive; got {}",
                self.band_height
            )));
        }
        if self.score_node_width <= 0 {
            return Err(TraceGraphError::LayoutConfig(format!(
                "score_node_width must be positive; got {}",
                self.score_node_width
            )));
        }
        if self.score_gap < 0 {
            return Err(TraceGraphError::LayoutConfig(format!(
                "score_gap must not be negative; got {}",
                self.score_gap
            )));
        }
        Ok(())
    }

    pub fn band_y(&self, band: u32) -> i64 {
        i64::from(band).saturating_mul(self.band_height)
    }

    pub fn centered(&self, band: u32) -> Position {
        Position::new(self.center_x, self.band_y(band))
    }

    /// Left edges of a row of `count` score nodes centered on `center_x`.
    pub fn score_row(&self, count: usize, band: u32) -> Vec<Position> {
        if count == 0 {
            return Vec::new();
        }
        let step = self.score_node_width.saturating_add(self.score_gap);
        let n = i64::try_from(count).unwrap_or(i64::MAX);
        let width = n.saturating_mul(step).saturating_sub(self.score_gap);
        let left = self.center_x.saturating_sub(width / 2);
        let y = self.band_y(band);

        (0..n)
            .map(|i| Position::new(left.saturating_add(i.saturating_mul(step)), y))
            .collect()
    }
}
