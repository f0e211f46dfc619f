use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::render::{RenderConfig, ShotRenderDescriptor, describe_shots};
use crate::shots::{PITCH_LENGTH, ShotEvent, ShotTable};

pub const ALL_TEAMS_HEADING: &str = "All Teams";

/// Optional (team, player) narrowing. Either side may be set alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterSelector {
    pub team: Option<String>,
    pub player: Option<String>,
}

impl FilterSelector {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn team(team: impl Into<String>) -> Self {
        Self {
            team: Some(team.into()),
            player: None,
        }
    }

    pub fn team_player(team: impl Into<String>, player: impl Into<String>) -> Self {
        Self {
            team: Some(team.into()),
            player: Some(player.into()),
        }
    }

    pub fn matches(&self, shot: &ShotEvent) -> bool {
        if let Some(team) = &self.team
            && shot.team != *team
        {
            return false;
        }
        if let Some(player) = &self.player
            && shot.player != *player
        {
            return false;
        }
        true
    }

    /// Display title: the player, else the team, else "All Teams".
    pub fn heading(&self) -> String {
        self.player
            .as_deref()
            .or(self.team.as_deref())
            .unwrap_or(ALL_TEAMS_HEADING)
            .to_string()
    }
}

/// Aggregates over one filtered view. Ratio and mean fields are `None` when
/// the view is empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total_shots: usize,
    pub total_goals: usize,
    pub total_expected_goals: f64,
    pub expected_goals_per_shot: Option<f64>,
    pub average_shot_distance: Option<f64>,
}

impl SummaryStats {
    pub fn has_data(&self) -> bool {
        self.total_shots > 0
    }
}

/// Everything the rendering side consumes for one selector.
#[derive(Debug, Clone)]
pub struct ShotView<'a> {
    pub rows: Vec<&'a ShotEvent>,
    pub stats: SummaryStats,
    pub descriptors: Vec<ShotRenderDescriptor>,
    pub heading: String,
}

pub fn filter_shots<'a>(table: &'a ShotTable, selector: &FilterSelector) -> Vec<&'a ShotEvent> {
    table
        .shots()
        .iter()
        .filter(|shot| selector.matches(shot))
        .collect()
}

pub fn summarize(rows: &[&ShotEvent]) -> SummaryStats {
    let total_shots = rows.len();
    let total_goals = rows.iter().filter(|s| s.is_goal()).count();
    let total_expected_goals: f64 = rows.iter().map(|s| s.expected_goals).sum();

    let (expected_goals_per_shot, average_shot_distance) = if total_shots == 0 {
        (None, None)
    } else {
        let n = total_shots as f64;
        let mean_x = rows.iter().map(|s| s.location.x).sum::<f64>() / n;
        (Some(total_expected_goals / n), Some(PITCH_LENGTH - mean_x))
    };

    SummaryStats {
        total_shots,
        total_goals,
        total_expected_goals,
        expected_goals_per_shot,
        average_shot_distance,
    }
}

/// Filter, aggregate and describe in one pass. Total over every selector.
pub fn apply<'a>(
    table: &'a ShotTable,
    selector: &FilterSelector,
    render: &RenderConfig,
) -> ShotView<'a> {
    let rows = filter_shots(table, selector);
    let stats = summarize(&rows);
    let descriptors = describe_shots(&rows, render);
    debug!(
        team = selector.team.as_deref().unwrap_or("-"),
        player = selector.player.as_deref().unwrap_or("-"),
        shots = stats.total_shots,
        goals = stats.total_goals,
        "applied shot selector"
    );
    ShotView {
        rows,
        stats,
        descriptors,
        heading: selector.heading(),
    }
}
