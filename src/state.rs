use std::collections::VecDeque;

use crate::config::AppConfig;
use crate::engine::{self, FilterSelector, ShotView, SummaryStats};
use crate::loader;
use crate::render::{MapVariant, RenderConfig};
use crate::shots::ShotTable;

const MAX_LOGS: usize = 200;

pub struct AppState {
    source: ShotTable,
    table: ShotTable,
    pub config: AppConfig,
    pub variant: MapVariant,
    pub selector: FilterSelector,
    pub source_label: String,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl AppState {
    /// `source` should hold every valid row, penalties included; the active
    /// variant decides what is shown.
    pub fn new(source: ShotTable, config: AppConfig, source_label: impl Into<String>) -> Self {
        let variant = config.variant;
        let mut state = Self {
            table: ShotTable::default(),
            source,
            config,
            variant,
            selector: FilterSelector::all(),
            source_label: source_label.into(),
            logs: VecDeque::new(),
            help_overlay: false,
        };
        state.rebuild_table();
        state
    }

    pub fn table(&self) -> &ShotTable {
        &self.table
    }

    pub fn render_config(&self) -> RenderConfig {
        self.config.render_config(self.variant)
    }

    /// Fresh view for the current selector. Not cached: every call recomputes.
    pub fn view(&self) -> ShotView<'_> {
        engine::apply(&self.table, &self.selector, &self.render_config())
    }

    pub fn teams(&self) -> Vec<String> {
        self.table.teams()
    }

    /// Players offered for selection; empty until a team is chosen.
    pub fn players(&self) -> Vec<String> {
        match &self.selector.team {
            Some(team) => self.table.players_for_team(team),
            None => Vec::new(),
        }
    }

    pub fn next_team(&mut self) {
        self.step_team(true);
    }

    pub fn prev_team(&mut self) {
        self.step_team(false);
    }

    pub fn next_player(&mut self) {
        self.step_player(true);
    }

    pub fn prev_player(&mut self) {
        self.step_player(false);
    }

    pub fn clear_selection(&mut self) {
        self.selector = FilterSelector::all();
        self.push_log("[INFO] Selection cleared");
    }

    pub fn toggle_variant(&mut self) {
        self.set_variant(self.variant.toggle());
    }

    pub fn set_variant(&mut self, variant: MapVariant) {
        if self.variant == variant {
            return;
        }
        self.variant = variant;
        self.rebuild_table();
        let current = self.selector.clone();
        self.restore_selection(current);
        self.push_log(format!(
            "[INFO] Variant {} ({} shots)",
            variant.label(),
            self.table.len()
        ));
    }

    /// Adopt `selector` as far as the current table supports it. A team that no
    /// longer exists clears everything; a player outside the team is dropped.
    pub fn restore_selection(&mut self, selector: FilterSelector) {
        let teams = self.table.teams();
        let team = selector.team.filter(|t| teams.contains(t));
        let player = match &team {
            Some(t) => selector
                .player
                .filter(|p| self.table.players_for_team(t).contains(p)),
            None => None,
        };
        self.selector = FilterSelector { team, player };
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    fn rebuild_table(&mut self) {
        self.table = if self.config.excludes_penalties(self.variant) {
            loader::exclude_penalties(&self.source)
        } else {
            self.source.clone()
        };
    }

    fn step_team(&mut self, forward: bool) {
        let teams = self.teams();
        self.selector.team = cycle(&teams, self.selector.team.as_deref(), forward);
        self.selector.player = None;
    }

    fn step_player(&mut self, forward: bool) {
        if self.selector.team.is_none() {
            self.push_log("[INFO] Pick a team before a player");
            return;
        }
        let players = self.players();
        self.selector.player = cycle(&players, self.selector.player.as_deref(), forward);
    }
}

/// Step through `options` with an extra "none" slot between the last and the
/// first entry. A current value not in `options` counts as none.
pub fn cycle(options: &[String], current: Option<&str>, forward: bool) -> Option<String> {
    if options.is_empty() {
        return None;
    }
    let pos = current.and_then(|c| options.iter().position(|o| o == c));
    let next = match (pos, forward) {
        (None, true) => Some(0),
        (None, false) => Some(options.len() - 1),
        (Some(i), true) if i + 1 < options.len() => Some(i + 1),
        (Some(i), false) if i > 0 => Some(i - 1),
        _ => None,
    };
    next.map(|i| options[i].clone())
}

/// Label/value pairs for the stat block. No-data values render as "n/a".
pub fn stat_rows(stats: &SummaryStats, variant: MapVariant) -> Vec<(&'static str, String)> {
    let mut rows = vec![
        ("Shots", stats.total_shots.to_string()),
        ("Goals", stats.total_goals.to_string()),
        ("xG", format!("{:.2}", stats.total_expected_goals)),
    ];
    if variant.shows_extended_stats() {
        rows.push(("xG/Shot", fmt_opt(stats.expected_goals_per_shot, 2)));
        rows.push(("Avg Distance", fmt_opt(stats.average_shot_distance, 1)));
    }
    rows
}

pub fn fmt_opt(value: Option<f64>, decimals: usize) -> String {
    value
        .map(|v| format!("{v:.decimals$}"))
        .unwrap_or_else(|| "n/a".to_string())
}
