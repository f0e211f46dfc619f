use std::cmp::Ordering;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use rayon::prelude::*;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use shotmap_terminal::config::AppConfig;
use shotmap_terminal::engine::{self, FilterSelector, SummaryStats};
use shotmap_terminal::render::{MapVariant, ShotRenderDescriptor};
use shotmap_terminal::shots::{ShotEvent, ShotTable};
use shotmap_terminal::state::{fmt_opt, stat_rows};
use shotmap_terminal::{demo_data, loader};

#[derive(Debug, Default)]
struct Args {
    csv: Option<PathBuf>,
    team: Option<String>,
    player: Option<String>,
    variant: Option<MapVariant>,
    json: bool,
    leaderboard: bool,
    demo: bool,
}

#[derive(Serialize)]
struct ViewJson<'a> {
    heading: &'a str,
    variant: MapVariant,
    stats: &'a SummaryStats,
    shots: Vec<ShotJson<'a>>,
}

#[derive(Serialize)]
struct ShotJson<'a> {
    shot: &'a ShotEvent,
    render: &'a ShotRenderDescriptor,
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    // Row rejections are logged as `warn!` by the loader; RUST_LOG=debug adds
    // load and apply summaries.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let args = parse_args(std::env::args().skip(1).collect())?;
    let mut config = AppConfig::from_env();
    if let Some(csv) = args.csv.clone() {
        config.csv_path = csv;
    }
    if args.demo {
        config.demo = true;
    }
    let variant = args.variant.unwrap_or(config.variant);

    let options = config.load_options();
    let report = if config.demo {
        let raw = demo_data::generate_raw_shots(config.demo_seed, 40);
        loader::normalize(raw, options)?
    } else {
        loader::load_csv(&config.csv_path, options)
            .with_context(|| format!("load shots from {}", config.csv_path.display()))?
    };
    if !report.rejected.is_empty() {
        eprintln!("skipped {} invalid rows", report.rejected.len());
    }

    let table = if config.excludes_penalties(variant) {
        loader::exclude_penalties(&report.table)
    } else {
        report.table
    };
    let render = config.render_config(variant);

    if args.leaderboard {
        print_leaderboard(&table, &config, variant);
        return Ok(());
    }

    let selector = FilterSelector {
        team: args.team,
        player: args.player,
    };
    let view = engine::apply(&table, &selector, &render);

    if args.json {
        let out = ViewJson {
            heading: &view.heading,
            variant,
            stats: &view.stats,
            shots: view
                .rows
                .iter()
                .zip(&view.descriptors)
                .map(|(shot, desc)| ShotJson { shot: *shot, render: desc })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("{} ({})", view.heading, variant.label());
    for (label, value) in stat_rows(&view.stats, variant) {
        println!("{label:<13}{value:>8}");
    }
    if !view.stats.has_data() {
        println!("No shots for this selection");
    }
    Ok(())
}

fn print_leaderboard(table: &ShotTable, config: &AppConfig, variant: MapVariant) {
    let render = config.render_config(variant);
    let teams = table.teams();
    let mut rows: Vec<(String, SummaryStats)> = teams
        .par_iter()
        .map(|team| {
            let view = engine::apply(table, &FilterSelector::team(team.as_str()), &render);
            (team.clone(), view.stats)
        })
        .collect();
    sort_leaderboard(&mut rows);

    println!(
        "{:<20}{:>7}{:>7}{:>8}{:>9}{:>10}",
        "Team", "Shots", "Goals", "xG", "xG/Shot", "Avg Dist"
    );
    for (team, stats) in rows {
        println!(
            "{:<20}{:>7}{:>7}{:>8.2}{:>9}{:>10}",
            team,
            stats.total_shots,
            stats.total_goals,
            stats.total_expected_goals,
            fmt_opt(stats.expected_goals_per_shot, 3),
            fmt_opt(stats.average_shot_distance, 1)
        );
    }
}

/// Highest total xG first; ties broken by team name.
fn sort_leaderboard(rows: &mut [(String, SummaryStats)]) {
    rows.sort_by(|a, b| {
        b.1.total_expected_goals
            .partial_cmp(&a.1.total_expected_goals)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
}

fn parse_args(raw: Vec<String>) -> Result<Args> {
    let mut args = Args::default();
    let mut iter = raw.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--team" => args.team = Some(iter.next().context("--team needs a value")?),
            "--player" => args.player = Some(iter.next().context("--player needs a value")?),
            "--variant" => {
                let raw = iter.next().context("--variant needs a value")?;
                args.variant = Some(
                    MapVariant::parse(&raw).ok_or_else(|| anyhow!("unknown variant {raw:?}"))?,
                );
            }
            "--json" => args.json = true,
            "--leaderboard" => args.leaderboard = true,
            "--demo" => args.demo = true,
            other if other.starts_with("--") => return Err(anyhow!("unknown flag {other}")),
            other => args.csv = Some(PathBuf::from(other)),
        }
    }
    Ok(args)
}
