use std::f64::consts::PI;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::widgets::canvas::{
    Canvas, Circle, Context as CanvasContext, Line as CanvasLine, Points,
};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use shotmap_terminal::config::AppConfig;
use shotmap_terminal::demo_data;
use shotmap_terminal::export;
use shotmap_terminal::loader;
use shotmap_terminal::persist;
use shotmap_terminal::render::{ColorClass, ShotRenderDescriptor, paint_order};
use shotmap_terminal::shots::{PITCH_LENGTH, PITCH_WIDTH, ShotTable};
use shotmap_terminal::state::{AppState, stat_rows};

const DEMO_SHOTS_PER_TEAM: usize = 40;

struct App {
    state: AppState,
    should_quit: bool,
}

impl App {
    fn new(state: AppState) -> Self {
        Self {
            state,
            should_quit: false,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('t') => self.state.next_team(),
            KeyCode::Char('T') => self.state.prev_team(),
            KeyCode::Char('p') => self.state.next_player(),
            KeyCode::Char('P') => self.state.prev_player(),
            KeyCode::Char('c') | KeyCode::Char('C') => self.state.clear_selection(),
            KeyCode::Char('v') | KeyCode::Char('V') => self.state.toggle_variant(),
            KeyCode::Char('e') | KeyCode::Char('E') => self.export(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Esc => self.state.help_overlay = false,
            _ => {}
        }
    }

    fn export(&mut self) {
        let view = self.state.view();
        let path = export::default_export_path(&self.state.config.export_dir, &view.heading);
        let msg = match export::export_view(&path, &view, self.state.variant) {
            Ok(report) => format!(
                "[INFO] Exported {} shots to {}",
                report.shots,
                report.path.display()
            ),
            Err(err) => format!("[WARN] Export failed: {err}"),
        };
        self.state.push_log(msg);
    }
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let mut config = AppConfig::from_env();
    if let Some(arg) = std::env::args().nth(1) {
        if arg == "--demo" {
            config.demo = true;
        } else {
            config.csv_path = PathBuf::from(arg);
        }
    }

    let (table, label, notes) = load_table(&config)?;
    let mut state = AppState::new(table, config, label);
    for note in notes {
        state.push_log(note);
    }
    persist::load_into_state(&mut state);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new(state);
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    persist::save_from_state(&app.state);

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn load_table(config: &AppConfig) -> Result<(ShotTable, String, Vec<String>)> {
    let options = config.load_options();
    let (report, label) = if config.demo {
        let raw = demo_data::generate_raw_shots(config.demo_seed, DEMO_SHOTS_PER_TEAM);
        let report = loader::normalize(raw, options).context("normalize demo shots")?;
        (report, format!("demo:{}", config.demo_seed))
    } else {
        let path = &config.csv_path;
        let report = loader::load_csv(path, options).with_context(|| {
            format!(
                "load shots from {} (set SHOTMAP_DEMO=1 or pass --demo to use generated data)",
                path.display()
            )
        })?;
        (report, path.display().to_string())
    };

    let mut notes = vec![format!(
        "[INFO] Loaded {} shots from {}",
        report.table.len(),
        label
    )];
    for rejected in report.rejected.iter().take(20) {
        notes.push(format!("[WARN] Skipped {}", rejected.error));
    }
    if report.rejected.len() > 20 {
        notes.push(format!(
            "[WARN] ... {} more rows skipped",
            report.rejected.len() - 20
        ));
    }
    Ok((report.table, label, notes))
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui(f, &app.state))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let view = state.view();

    let header = Paragraph::new(header_text(state, &view.heading))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(26),
            Constraint::Min(30),
            Constraint::Length(26),
        ])
        .split(chunks[1]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(columns[0]);

    let teams = state.teams();
    let team_list = Paragraph::new(selection_lines(
        &teams,
        state.selector.team.as_deref(),
        "All teams",
    ))
    .block(Block::default().title("Team [t/T]").borders(Borders::ALL));
    frame.render_widget(team_list, left[0]);

    let players = state.players();
    let player_hint = if state.selector.team.is_some() {
        "All players"
    } else {
        "Select a team first"
    };
    let player_list = Paragraph::new(selection_lines(
        &players,
        state.selector.player.as_deref(),
        player_hint,
    ))
    .block(Block::default().title("Player [p/P]").borders(Borders::ALL));
    frame.render_widget(player_list, left[1]);

    render_pitch(frame, columns[1], &view.heading, &view.descriptors);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(1)])
        .split(columns[2]);

    let stats = Paragraph::new(stats_text(state, &view.stats))
        .block(Block::default().title("Stats").borders(Borders::ALL));
    frame.render_widget(stats, right[0]);

    let legend = Paragraph::new(legend_lines())
        .block(Block::default().title("Legend").borders(Borders::ALL));
    frame.render_widget(legend, right[1]);

    let console = Paragraph::new(console_text(state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(
        "t/T Team | p/P Player | c Clear | v Variant | e Export | ? Help | q Quit",
    );
    frame.render_widget(footer, chunks[3]);

    if state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState, heading: &str) -> String {
    let line1 = format!("  (o)  SHOT MAP | {} | {}", heading, state.variant.label());
    let line2 = format!("       {}", state.source_label);
    format!("{line1}\n{line2}")
}

fn selection_lines<'a>(
    options: &'a [String],
    selected: Option<&str>,
    none_label: &'a str,
) -> Vec<Line<'a>> {
    let highlight = Style::default()
        .fg(Color::Black)
        .bg(Color::Green)
        .add_modifier(Modifier::BOLD);
    let mut lines = Vec::with_capacity(options.len() + 1);
    let none_style = if selected.is_none() {
        highlight
    } else {
        Style::default().fg(Color::DarkGray)
    };
    lines.push(Line::from(Span::styled(none_label, none_style)));
    for option in options {
        let style = if selected == Some(option.as_str()) {
            highlight
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(option.as_str(), style)));
    }
    lines
}

fn stats_text(state: &AppState, stats: &shotmap_terminal::SummaryStats) -> String {
    let mut lines: Vec<String> = stat_rows(stats, state.variant)
        .into_iter()
        .map(|(label, value)| format!("{label:<13}{value:>8}"))
        .collect();
    if !stats.has_data() {
        lines.push(String::new());
        lines.push("No shots for this selection".to_string());
    }
    lines.join("\n")
}

fn legend_lines() -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled("● Goal", Style::default().fg(Color::Green))),
        Line::from(Span::styled("● No goal", Style::default().fg(Color::Gray))),
        Line::from("Size = xG"),
    ]
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

// Vertical half pitch: canvas x is pitch y, canvas y is pitch x, attacking goal at the top.
fn render_pitch(
    frame: &mut Frame,
    area: Rect,
    heading: &str,
    descriptors: &[ShotRenderDescriptor],
) {
    let order = paint_order(descriptors);
    let canvas = Canvas::default()
        .block(Block::default().title(format!("Pitch | {heading}")).borders(Borders::ALL))
        .marker(Marker::Braille)
        .x_bounds([0.0, PITCH_WIDTH])
        .y_bounds([PITCH_LENGTH / 2.0, PITCH_LENGTH])
        .paint(move |ctx| {
            draw_half_pitch(ctx);
            ctx.layer();
            let mut layer = None;
            for &i in &order {
                let d = &descriptors[i];
                if layer.is_some_and(|l| l != d.draw_order) {
                    ctx.layer();
                }
                layer = Some(d.draw_order);
                ctx.draw(&Circle {
                    x: d.y,
                    y: d.x,
                    radius: marker_radius(d.marker_size),
                    color: marker_color(d),
                });
            }
        });
    frame.render_widget(canvas, area);
}

fn draw_half_pitch(ctx: &mut CanvasContext) {
    let c = Color::DarkGray;
    let line = |x1: f64, y1: f64, x2: f64, y2: f64| CanvasLine {
        x1,
        y1,
        x2,
        y2,
        color: c,
    };
    let half = PITCH_LENGTH / 2.0;
    let mid = PITCH_WIDTH / 2.0;

    // Touchlines, goal line, halfway line.
    ctx.draw(&line(0.0, half, 0.0, PITCH_LENGTH));
    ctx.draw(&line(PITCH_WIDTH, half, PITCH_WIDTH, PITCH_LENGTH));
    ctx.draw(&line(0.0, PITCH_LENGTH, PITCH_WIDTH, PITCH_LENGTH));
    ctx.draw(&line(0.0, half, PITCH_WIDTH, half));

    // Penalty area.
    ctx.draw(&line(18.0, 102.0, 62.0, 102.0));
    ctx.draw(&line(18.0, 102.0, 18.0, PITCH_LENGTH));
    ctx.draw(&line(62.0, 102.0, 62.0, PITCH_LENGTH));

    // Six-yard box.
    ctx.draw(&line(30.0, 114.0, 50.0, 114.0));
    ctx.draw(&line(30.0, 114.0, 30.0, PITCH_LENGTH));
    ctx.draw(&line(50.0, 114.0, 50.0, PITCH_LENGTH));

    // Goal mouth, drawn just beyond the line.
    ctx.draw(&line(36.0, PITCH_LENGTH - 0.5, 44.0, PITCH_LENGTH - 0.5));

    ctx.draw(&Points {
        coords: &[(mid, 108.0)],
        color: c,
    });
    ctx.draw(&Circle {
        x: mid,
        y: half,
        radius: 10.0,
        color: c,
    });

    // Penalty arc outside the box.
    let arc: Vec<(f64, f64)> = (0..=180)
        .map(|step| {
            let t = PI * f64::from(step) / 180.0;
            (mid + 10.0 * t.cos(), 108.0 - 10.0 * t.sin())
        })
        .filter(|&(_, y)| y < 102.0)
        .collect();
    ctx.draw(&Points {
        coords: &arc,
        color: c,
    });
}

fn marker_radius(marker_size: f64) -> f64 {
    (marker_size.max(0.0).sqrt() / 12.0).clamp(0.4, 4.0)
}

fn marker_color(d: &ShotRenderDescriptor) -> Color {
    match d.color_class {
        ColorClass::Goal => Color::Green,
        ColorClass::NoGoal if d.emphasis >= 1.0 => Color::White,
        ColorClass::NoGoal => Color::Gray,
    }
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Shot Map - Help",
        "",
        "Selection:",
        "  t / T        Next / previous team",
        "  p / P        Next / previous player (selected team)",
        "  c            Clear team and player",
        "",
        "View:",
        "  v            Toggle plain / annotated map",
        "  e            Export current view to xlsx",
        "  ?            Toggle help",
        "  q            Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}
