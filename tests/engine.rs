use std::collections::HashSet;
use std::path::PathBuf;

use shotmap_terminal::engine::{self, FilterSelector, filter_shots, summarize};
use shotmap_terminal::loader::{self, NormalizeOptions};
use shotmap_terminal::render::{
    ColorClass, FULL_EMPHASIS, MapVariant, REDUCED_EMPHASIS, RenderConfig, describe_shot,
};
use shotmap_terminal::shots::{PitchPoint, RawShotRecord, ShotEvent, ShotTable};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn raw(team: &str, player: &str, outcome: &str, xg: f64, loc: (f64, f64)) -> RawShotRecord {
    RawShotRecord {
        team: team.to_string(),
        player: player.to_string(),
        location: format!("[{}, {}]", loc.0, loc.1),
        shot_type: "Open Play".to_string(),
        shot_outcome: outcome.to_string(),
        expected_goals: xg,
    }
}

fn three_row_table() -> ShotTable {
    let rows = vec![
        raw("teamA", "playerX", "Goal", 0.3, (100.0, 40.0)),
        raw("teamA", "playerY", "NoGoal", 0.1, (90.0, 30.0)),
        raw("teamB", "playerZ", "Goal", 0.6, (110.0, 35.0)),
    ];
    loader::normalize(rows, NormalizeOptions::default())
        .expect("rows are valid")
        .table
}

fn fixture_table() -> ShotTable {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push("euro_shots_sample.csv");
    loader::load_csv(&path, NormalizeOptions::default())
        .expect("fixture should load")
        .table
}

fn as_set(rows: &[&ShotEvent]) -> HashSet<*const ShotEvent> {
    rows.iter().map(|s| *s as *const ShotEvent).collect()
}

#[test]
fn team_filter_end_to_end() {
    let table = three_row_table();
    let view = engine::apply(&table, &FilterSelector::team("teamA"), &RenderConfig::default());

    assert_eq!(view.rows.len(), 2);
    assert_eq!(view.stats.total_shots, 2);
    assert_eq!(view.stats.total_goals, 1);
    assert!(approx(view.stats.total_expected_goals, 0.4));
    assert!(approx(view.stats.expected_goals_per_shot.unwrap(), 0.2));
    assert!(approx(view.stats.average_shot_distance.unwrap(), 25.0));
    assert_eq!(view.heading, "teamA");
    assert_eq!(view.descriptors.len(), 2);
}

#[test]
fn goal_descriptor_matches_plain_encoding() {
    let shot = ShotEvent {
        team: "teamA".to_string(),
        player: "playerX".to_string(),
        location: PitchPoint::new(100.0, 40.0),
        shot_type: "Open Play".to_string(),
        shot_outcome: "Goal".to_string(),
        expected_goals: 0.5,
    };
    let cfg = RenderConfig {
        scale_factor: 1000.0,
        reduced_emphasis: REDUCED_EMPHASIS,
    };
    let d = describe_shot(&shot, &cfg);
    assert_eq!(d.x, 100.0);
    assert_eq!(d.y, 40.0);
    assert_eq!(d.marker_size, 500.0);
    assert_eq!(d.color_class, ColorClass::Goal);
    assert_eq!(d.draw_order, 2);
    assert_eq!(d.emphasis, FULL_EMPHASIS);
}

#[test]
fn non_goal_descriptor_is_dimmed_and_underneath() {
    let table = three_row_table();
    let cfg = RenderConfig::for_variant(MapVariant::Annotated);
    let view = engine::apply(
        &table,
        &FilterSelector::team_player("teamA", "playerY"),
        &cfg,
    );
    assert_eq!(view.descriptors.len(), 1);
    let d = view.descriptors[0];
    assert_eq!(d.color_class, ColorClass::NoGoal);
    assert_eq!(d.draw_order, 1);
    assert_eq!(d.emphasis, REDUCED_EMPHASIS);
    assert!(approx(d.marker_size, 30.0));
    assert_eq!((d.x, d.y), (90.0, 30.0));
}

#[test]
fn only_exact_goal_outcome_counts() {
    let rows = vec![
        raw("A", "p", "goal", 0.2, (100.0, 40.0)),
        raw("A", "p", "Goal ", 0.2, (100.0, 40.0)),
        raw("A", "p", "Own Goal", 0.2, (100.0, 40.0)),
        raw("A", "p", "Goal", 0.2, (100.0, 40.0)),
    ];
    let table = loader::normalize(rows, NormalizeOptions::default())
        .unwrap()
        .table;
    let view = engine::apply(&table, &FilterSelector::all(), &RenderConfig::default());
    assert_eq!(view.stats.total_goals, 1);
    let goals = view
        .descriptors
        .iter()
        .filter(|d| d.color_class == ColorClass::Goal)
        .count();
    assert_eq!(goals, 1);
}

#[test]
fn unknown_selectors_yield_no_data_not_errors() {
    let table = three_row_table();
    let cfg = RenderConfig::default();
    for selector in [
        FilterSelector::team("teamC"),
        FilterSelector::team_player("teamA", "playerZ"),
        FilterSelector::team_player("teamB", "nobody"),
    ] {
        let view = engine::apply(&table, &selector, &cfg);
        assert!(view.rows.is_empty());
        assert!(view.descriptors.is_empty());
        assert_eq!(view.stats.total_shots, 0);
        assert_eq!(view.stats.total_goals, 0);
        assert_eq!(view.stats.total_expected_goals, 0.0);
        assert_eq!(view.stats.expected_goals_per_shot, None);
        assert_eq!(view.stats.average_shot_distance, None);
        assert!(!view.stats.has_data());
    }
}

#[test]
fn empty_table_is_handled() {
    let table = ShotTable::default();
    let view = engine::apply(&table, &FilterSelector::all(), &RenderConfig::default());
    assert_eq!(view.stats, summarize(&[]));
    assert_eq!(view.heading, "All Teams");
}

#[test]
fn player_without_team_filters_on_player_alone() {
    let table = fixture_table();
    let selector = FilterSelector {
        team: None,
        player: Some("Harry Kane".to_string()),
    };
    let rows = filter_shots(&table, &selector);
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|s| s.team == "England"));
    assert_eq!(selector.heading(), "Harry Kane");
}

#[test]
fn team_match_is_case_sensitive() {
    let table = fixture_table();
    assert!(filter_shots(&table, &FilterSelector::team("spain")).is_empty());
    assert_eq!(filter_shots(&table, &FilterSelector::team("Spain")).len(), 4);
}

#[test]
fn filtering_is_idempotent() {
    let table = fixture_table();
    let cfg = RenderConfig::default();
    let selector = FilterSelector::team("England");
    let first = engine::apply(&table, &selector, &cfg);
    let second = engine::apply(&table, &selector, &cfg);
    assert_eq!(first.rows, second.rows);
    assert_eq!(first.stats, second.stats);
    assert_eq!(first.descriptors, second.descriptors);
}

#[test]
fn narrower_selectors_are_subsets() {
    let table = fixture_table();
    let all = as_set(&filter_shots(&table, &FilterSelector::all()));
    assert_eq!(all.len(), table.len());

    for team in table.teams() {
        let by_team = as_set(&filter_shots(&table, &FilterSelector::team(team.as_str())));
        assert!(by_team.is_subset(&all));
        for player in table.players_for_team(&team) {
            let by_player = as_set(&filter_shots(
                &table,
                &FilterSelector::team_player(team.as_str(), player.as_str()),
            ));
            assert!(!by_player.is_empty());
            assert!(by_player.is_subset(&by_team));
        }
    }
}

#[test]
fn stats_stay_consistent_for_every_selection() {
    let table = fixture_table();
    let mut selectors = vec![FilterSelector::all()];
    for team in table.teams() {
        selectors.push(FilterSelector::team(team.as_str()));
        for player in table.players_for_team(&team) {
            selectors.push(FilterSelector::team_player(team.as_str(), player));
        }
    }

    for selector in selectors {
        let rows = filter_shots(&table, &selector);
        let stats = summarize(&rows);
        assert!(stats.total_shots > 0);
        assert!(stats.total_goals <= stats.total_shots);
        assert!(stats.total_expected_goals >= 0.0);
        assert!(stats.total_expected_goals <= stats.total_shots as f64);
        assert_eq!(
            stats.expected_goals_per_shot,
            Some(stats.total_expected_goals / stats.total_shots as f64)
        );
        let mean_x = rows.iter().map(|s| s.location.x).sum::<f64>() / rows.len() as f64;
        assert!(approx(stats.average_shot_distance.unwrap(), 120.0 - mean_x));
    }
}

#[test]
fn heading_falls_back_player_team_all() {
    assert_eq!(FilterSelector::all().heading(), "All Teams");
    assert_eq!(FilterSelector::team("Spain").heading(), "Spain");
    assert_eq!(
        FilterSelector::team_player("Spain", "Dani Olmo").heading(),
        "Dani Olmo"
    );
}

#[test]
fn descriptors_follow_row_order() {
    let table = fixture_table();
    let view = engine::apply(&table, &FilterSelector::team("England"), &RenderConfig::default());
    let xs: Vec<f64> = view.descriptors.iter().map(|d| d.x).collect();
    assert_eq!(xs, vec![108.0, 112.0, 104.0, 90.0]);
}

#[test]
fn source_table_is_unchanged_by_queries() {
    let table = fixture_table();
    let before = table.clone();
    let cfg = RenderConfig::for_variant(MapVariant::Annotated);
    let _ = engine::apply(&table, &FilterSelector::team("Spain"), &cfg);
    let _ = engine::apply(&table, &FilterSelector::all(), &cfg);
    assert_eq!(table, before);
}
