use std::io;
use std::time::Duration;

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols;
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Clear, Dataset, GraphType, Paragraph,
};

use xg_terminal::config::AppConfig;
use xg_terminal::match_stats::load_match_stats;
use xg_terminal::report::{self, not_available};
use xg_terminal::state::{AppState, Screen};

const TEAM_COLORS: [Color; 6] = [
    Color::Cyan,
    Color::LightRed,
    Color::LightGreen,
    Color::Yellow,
    Color::Magenta,
    Color::LightBlue,
];

struct App {
    state: AppState,
    should_quit: bool,
    redraw_interval: Duration,
}

impl App {
    fn new(state: AppState, redraw_interval: Duration) -> Self {
        Self {
            state,
            should_quit: false,
            redraw_interval,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') => self.state.screen = Screen::Summary,
            KeyCode::Char('2') => self.state.screen = Screen::Progression,
            KeyCode::Char('3') => self.state.screen = Screen::Players,
            KeyCode::Tab => self.state.cycle_screen(),
            KeyCode::Char('j') | KeyCode::Down => {
                if self.state.screen == Screen::Players {
                    self.state.scroll_players_down();
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if self.state.screen == Screen::Players {
                    self.state.scroll_players_up();
                }
            }
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Esc => self.state.help_overlay = false,
            _ => {}
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let config = AppConfig::from_env().with_args(&args);
    let stats = load_match_stats(&config.events_path)?;
    let source = config.events_path.display().to_string();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new(AppState::new(source, stats), config.redraw_interval);
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res.map_err(Into::into)
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        // Redraw at least this often so terminal resizes show up.
        if event::poll(app.redraw_interval)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.state.screen {
        Screen::Summary => render_summary(frame, chunks[1], &app.state),
        Screen::Progression => render_progression(frame, chunks[1], &app.state),
        Screen::Players => render_players(frame, chunks[1], &app.state),
    }

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(
        "1 Summary | 2 xG Progression | 3 Players | Tab Next | j/k/↑/↓ Scroll | ? Help | q Quit",
    );
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    format!(
        "XG TERMINAL | {} | {} | {} events",
        state.screen.label(),
        state.source,
        state.stats.events
    )
}

fn team_color(idx: usize) -> Color {
    TEAM_COLORS[idx % TEAM_COLORS.len()]
}

fn render_summary(frame: &mut Frame, area: Rect, state: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);
    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    let totals = &state.stats.totals;
    let teams = state.stats.teams();

    let goals = teams
        .iter()
        .map(|t| totals.goals_for(t).map(|g| (g as u64, g.to_string())))
        .collect::<Vec<_>>();
    render_team_bars(
        frame,
        top[0],
        "Goals by Team",
        "Goals",
        &teams,
        (!totals.goals.is_empty()).then_some(goals),
        None,
    );

    let shots = teams
        .iter()
        .map(|t| totals.shots_for(t).map(|s| (s as u64, s.to_string())))
        .collect::<Vec<_>>();
    render_team_bars(
        frame,
        top[1],
        "Total Shots by Team",
        "Shots",
        &teams,
        (!totals.shots.is_empty()).then_some(shots),
        None,
    );

    let xg = teams
        .iter()
        .map(|t| {
            totals
                .xg_for(t)
                .map(|v| (scaled(v), report::format_xg(Some(v))))
        })
        .collect::<Vec<_>>();
    render_team_bars(
        frame,
        bottom[0],
        "Total Expected Goals (xG) by Team",
        "xG",
        &teams,
        (!totals.xg.is_empty()).then_some(xg),
        None,
    );

    let possession = state.stats.possession.as_ref().map(|p| {
        teams
            .iter()
            .map(|t| {
                p.share_for(t)
                    .map(|pct| (scaled(pct), report::format_pct(Some(pct))))
            })
            .collect::<Vec<_>>()
    });
    render_team_bars(
        frame,
        bottom[1],
        "Possession Share by Team",
        "Possession",
        &teams,
        possession,
        Some(scaled(100.0)),
    );
}

fn scaled(value: f64) -> u64 {
    (value.max(0.0) * 100.0).round() as u64
}

/// Vertical bars per team. `values` is `None` when the metric has no data at
/// all; a `None` entry marks a team missing from this metric only.
fn render_team_bars(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    metric: &str,
    teams: &[String],
    values: Option<Vec<Option<(u64, String)>>>,
    max: Option<u64>,
) {
    let block = Block::default().title(title.to_string()).borders(Borders::ALL);
    let Some(values) = values else {
        let empty = Paragraph::new(not_available(metric))
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    };

    let bars = teams
        .iter()
        .zip(values)
        .enumerate()
        .map(|(idx, (team, value))| {
            let color = team_color(idx);
            let (value, text) = value.unwrap_or_else(|| (0, report::NOT_AVAILABLE.to_string()));
            Bar::default()
                .value(value)
                .text_value(text)
                .label(Line::from(team.clone()))
                .style(Style::default().fg(color))
                .value_style(Style::default().fg(Color::Black).bg(color))
        })
        .collect::<Vec<_>>();

    let inner_width = area.width.saturating_sub(2);
    let slots = (teams.len() as u16).max(1);
    let bar_width = (inner_width / slots).saturating_sub(2).clamp(3, 12);

    let mut chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(2);
    if let Some(max) = max {
        chart = chart.max(max);
    }
    frame.render_widget(chart, area);
}

fn render_progression(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .title("Cumulative xG Progression")
        .borders(Borders::ALL);
    let timeline = &state.stats.timeline;
    let (Some(first), Some(last)) = (timeline.minutes.first(), timeline.minutes.last()) else {
        let empty = Paragraph::new(not_available("Cumulative xG"))
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    };

    let series = timeline
        .teams
        .keys()
        .map(|team| (team.clone(), timeline.chart_points(team)))
        .collect::<Vec<_>>();
    let all_teams = state.stats.teams();
    let datasets = series
        .iter()
        .map(|(team, points)| {
            let idx = all_teams.iter().position(|t| t == team).unwrap_or(0);
            Dataset::default()
                .name(team.clone())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(team_color(idx)))
                .data(points)
        })
        .collect::<Vec<_>>();

    let x_min = *first as f64;
    let x_max = (*last as f64).max(x_min + 1.0);
    let y_max = (timeline.max_value() * 1.1).max(0.1);

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .title("Time (min)")
                .style(Style::default().fg(Color::Gray))
                .bounds([x_min, x_max])
                .labels(vec![
                    Span::raw(format!("{x_min:.0}")),
                    Span::raw(format!("{:.0}", (x_min + x_max) / 2.0)),
                    Span::raw(format!("{x_max:.0}")),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("Cumulative xG")
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, y_max])
                .labels(vec![
                    Span::raw("0.00"),
                    Span::raw(format!("{:.2}", y_max / 2.0)),
                    Span::raw(format!("{y_max:.2}")),
                ]),
        );
    frame.render_widget(chart, area);
}

fn render_players(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .title("Player Contribution to xG (* = shots without xG)")
        .borders(Borders::ALL);
    let players = &state.stats.players;
    if players.is_empty() {
        let empty = Paragraph::new(not_available("Player xG"))
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let visible = area.height.saturating_sub(2).max(1) as usize;
    let start = state.player_scroll.min(players.len().saturating_sub(1));
    let end = (start + visible).min(players.len());

    let bars = players[start..end]
        .iter()
        .map(|row| {
            let mut text = report::format_xg(Some(row.total_xg));
            if row.has_missing_xg() {
                text.push('*');
            }
            Bar::default()
                .value(scaled(row.total_xg))
                .text_value(text)
                .label(Line::from(report::player_label(row)))
                .style(Style::default().fg(Color::LightBlue))
                .value_style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
        })
        .collect::<Vec<_>>();

    let max = players
        .first()
        .map(|row| scaled(row.total_xg))
        .unwrap_or(1)
        .max(1);
    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .max(max);
    frame.render_widget(chart, area);
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No alerts yet".to_string();
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

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "XG Terminal - Help",
        "",
        "Screens:",
        "  1            Team summary",
        "  2            Cumulative xG progression",
        "  3            Player xG contribution",
        "  Tab          Next screen",
        "",
        "Players:",
        "  j/k or ↑/↓   Scroll",
        "",
        "  ? / Esc      Close help",
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
