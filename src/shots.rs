use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

pub const GOAL_OUTCOME: &str = "Goal";
pub const PENALTY_SHOT_TYPE: &str = "Penalty";

/// Statsbomb pitch length; x runs from the defending end (0) to the attacking goal line.
pub const PITCH_LENGTH: f64 = 120.0;
pub const PITCH_WIDTH: f64 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PitchPoint {
    pub x: f64,
    pub y: f64,
}

impl PitchPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One shot attempt after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotEvent {
    pub team: String,
    pub player: String,
    pub location: PitchPoint,
    pub shot_type: String,
    pub shot_outcome: String,
    pub expected_goals: f64,
}

impl ShotEvent {
    pub fn is_goal(&self) -> bool {
        self.shot_outcome == GOAL_OUTCOME
    }

    pub fn is_penalty(&self) -> bool {
        self.shot_type == PENALTY_SHOT_TYPE
    }
}

/// A shot row as it appears in the source file, location still encoded as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawShotRecord {
    pub team: String,
    pub player: String,
    pub location: String,
    #[serde(default)]
    pub shot_type: String,
    pub shot_outcome: String,
    #[serde(rename = "shot_statsbomb_xg", alias = "expected_goals", alias = "xg")]
    pub expected_goals: f64,
}

/// Validated shot table. Rows are only reachable through shared references, so
/// every downstream stage works on views of the same immutable data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShotTable {
    shots: Vec<ShotEvent>,
}

impl ShotTable {
    pub(crate) fn from_validated(shots: Vec<ShotEvent>) -> Self {
        Self { shots }
    }

    pub fn shots(&self) -> &[ShotEvent] {
        &self.shots
    }

    pub fn len(&self) -> usize {
        self.shots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shots.is_empty()
    }

    /// Distinct team names, sorted.
    pub fn teams(&self) -> Vec<String> {
        self.shots
            .iter()
            .map(|s| s.team.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Distinct players who took a shot for `team`, sorted.
    pub fn players_for_team(&self, team: &str) -> Vec<String> {
        self.shots
            .iter()
            .filter(|s| s.team == team)
            .map(|s| s.player.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}
