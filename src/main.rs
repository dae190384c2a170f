use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs};

use mlb_gamecast::boxscore::{BATTING_COLUMNS, PITCHING_COLUMNS};
use mlb_gamecast::config::Config;
use mlb_gamecast::feed::spawn_provider;
use mlb_gamecast::game::{team_logo_url, BoxscoreSide, GameFeed, Scorebug, Theme};
use mlb_gamecast::logging::init_tracing;
use mlb_gamecast::play::{BaseOccupancy, DisplayPlay};
use mlb_gamecast::state::{apply_delta, AppState, Delta, ProviderCommand, Tab};

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: mpsc::Sender<ProviderCommand>,
}

impl App {
    fn new(theme: Theme, cmd_tx: mpsc::Sender<ProviderCommand>) -> Self {
        Self {
            state: AppState::new(theme),
            should_quit: false,
            cmd_tx,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') => self.state.set_tab(Tab::AllPlays),
            KeyCode::Char('2') => self.state.set_tab(Tab::ScoringPlays),
            KeyCode::Char('3') => self.state.set_tab(Tab::Boxscore),
            KeyCode::Char('4') => self.state.set_tab(Tab::Highlights),
            KeyCode::Tab => self.state.cycle_tab(),
            KeyCode::Char('a') => self.state.set_boxscore_side(BoxscoreSide::Away),
            KeyCode::Char('h') => self.state.set_boxscore_side(BoxscoreSide::Home),
            KeyCode::Char('t') => self.state.toggle_theme(),
            KeyCode::Char('j') | KeyCode::Down => self.state.scroll_down(),
            KeyCode::Char('k') | KeyCode::Up => self.state.scroll_up(),
            KeyCode::Char('r') => self.request_refresh(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }

    fn request_refresh(&mut self) {
        if self.cmd_tx.send(ProviderCommand::Refresh).is_err() {
            self.state.push_log("[WARN] Refresh request failed");
        } else {
            self.state.push_log("[INFO] Refresh requested");
        }
    }
}

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let arg = std::env::args().nth(1);
    let config = Config::from_env().with_arg(arg.as_deref());
    if let Err(err) = init_tracing(config.log_file.as_deref()) {
        eprintln!("warning: logging disabled: {err:#}");
    }

    let Some(game_pk) = config.game_pk else {
        eprintln!("usage: mlb_gamecast <GAME_PK>  (or set GAME_PK)");
        std::process::exit(2);
    };
    tracing::info!(game_pk, poll_secs = config.poll_interval.as_secs(), "starting gamecast");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    spawn_provider(game_pk, config.poll_interval, tx, cmd_rx);

    let mut app = App::new(config.theme, cmd_tx);
    app.state.push_log(format!("[INFO] Loading game {game_pk}"));
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %err, "ui loop failed");
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

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

#[derive(Clone, Copy)]
struct Palette {
    fg: Color,
    bg: Color,
    accent: Color,
    muted: Color,
}

fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Light => Palette {
            fg: Color::Black,
            bg: Color::White,
            accent: Color::Rgb(191, 13, 61),
            muted: Color::DarkGray,
        },
        Theme::Dark => Palette {
            fg: Color::White,
            bg: Color::Black,
            accent: Color::LightRed,
            muted: Color::Gray,
        },
    }
}

fn ui(frame: &mut Frame, state: &AppState) {
    let pal = palette(state.theme);
    let base = Style::default().fg(pal.fg).bg(pal.bg);
    frame.render_widget(Block::default().style(base), frame.size());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(6),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(4),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(state))
        .style(base)
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match state.game.as_ref() {
        Some(game) => {
            render_scoreboard(frame, chunks[1], game, pal);
            render_tabs(frame, chunks[2], state, pal);
            match state.tab {
                Tab::AllPlays => render_plays(frame, chunks[3], &game.display_plays(), false, state, pal),
                Tab::ScoringPlays => {
                    render_plays(frame, chunks[3], &game.scoring_display_plays(), true, state, pal)
                }
                Tab::Boxscore => render_boxscore(frame, chunks[3], game, state, pal),
                Tab::Highlights => render_highlights(frame, chunks[3], state, pal),
            }
        }
        None => {
            let waiting = Paragraph::new("Waiting for live feed...").style(Style::default().fg(pal.muted));
            frame.render_widget(waiting, chunks[3]);
        }
    }

    render_logs(frame, chunks[4], state, pal);

    let footer = Paragraph::new(footer_text(state)).style(Style::default().fg(pal.muted));
    frame.render_widget(footer, chunks[5]);

    if state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let Some(game) = state.game.as_ref() else {
        return "  MLB GAMECAST\n  loading...".to_string();
    };
    let runs = |r: Option<u16>| r.map(|n| n.to_string()).unwrap_or_default();
    let (away_runs, home_runs) = game
        .linescore
        .as_ref()
        .map(|l| (runs(l.away.runs), runs(l.home.runs)))
        .unwrap_or_default();
    let record = |r: &Option<String>| r.as_deref().map(|s| format!(" ({s})")).unwrap_or_default();
    let updated = state
        .last_updated
        .as_deref()
        .map(|t| format!(" | updated {t}"))
        .unwrap_or_default();

    let line1 = format!(
        "  MLB GAMECAST | {} | {}{}",
        game.phase().label(),
        game.status,
        updated
    );
    let line2 = format!(
        "  {}{} {}  @  {} {}{}",
        game.away.name,
        record(&game.away.record),
        away_runs,
        home_runs,
        game.home.name,
        record(&game.home.record)
    );
    format!("{line1}\n{line2}")
}

fn footer_text(state: &AppState) -> String {
    format!(
        "1-4/Tab Tabs | a/h Away/Home | j/k Scroll | r Refresh | t {} | ? Help | q Quit",
        state.theme.toggle_label()
    )
}

fn render_scoreboard(frame: &mut Frame, area: Rect, game: &GameFeed, pal: Palette) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(30), Constraint::Length(16)])
        .split(area);

    let rows = game.linescore_rows();
    if rows.is_empty() {
        let empty = Paragraph::new("No linescore yet").style(Style::default().fg(pal.muted));
        frame.render_widget(empty, cols[0]);
    } else {
        let innings = rows[0].innings.len();
        let mut header: Vec<Cell> = vec![Cell::from("")];
        header.extend((1..=innings).map(|i| Cell::from(i.to_string())));
        header.extend(["R", "H", "E"].map(Cell::from));

        let body = rows.iter().map(|row| {
            let mut cells = vec![Cell::from(row.abbreviation.clone())];
            cells.extend(row.innings.iter().map(|c| Cell::from(c.clone())));
            cells.push(Cell::from(row.runs.clone()).style(Style::default().add_modifier(Modifier::BOLD)));
            cells.push(Cell::from(row.hits.clone()));
            cells.push(Cell::from(row.errors.clone()));
            Row::new(cells)
        });

        let mut widths = vec![Constraint::Length(5)];
        widths.extend(std::iter::repeat_n(Constraint::Length(3), innings + 3));
        let table = Table::new(body, widths)
            .header(Row::new(header).style(Style::default().fg(pal.accent)))
            .block(Block::default().title("Linescore").borders(Borders::ALL));
        frame.render_widget(table, cols[0]);
    }

    if let Some(bug) = game.scorebug() {
        let scorebug = Paragraph::new(scorebug_text(&bug))
            .style(Style::default().fg(pal.accent))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(scorebug, cols[1]);
    }
}

fn base_mark(occupied: bool) -> char {
    if occupied { '◆' } else { '◇' }
}

fn outs_marks(outs: u8) -> String {
    (1..=3).map(|i| if outs >= i { '●' } else { '○' }).collect()
}

fn diamond(bases: &BaseOccupancy) -> [String; 2] {
    [
        format!("   {}", base_mark(bases.second)),
        format!(" {}   {}", base_mark(bases.third), base_mark(bases.first)),
    ]
}

fn scorebug_text(bug: &Scorebug) -> String {
    let [top, bottom] = diamond(&bug.bases);
    format!(
        "{top}\n{bottom}\n {} - {}\n {}",
        bug.count.balls,
        bug.count.strikes,
        outs_marks(bug.count.outs)
    )
}

fn render_tabs(frame: &mut Frame, area: Rect, state: &AppState, pal: Palette) {
    let tabs = state.visible_tabs();
    let selected = tabs.iter().position(|t| *t == state.tab).unwrap_or(0);
    let widget = Tabs::new(tabs.iter().map(|t| t.label()).collect::<Vec<_>>())
        .select(selected)
        .style(Style::default().fg(pal.muted))
        .highlight_style(Style::default().fg(pal.accent).add_modifier(Modifier::BOLD));
    frame.render_widget(widget, area);
}

fn render_plays(
    frame: &mut Frame,
    area: Rect,
    plays: &[DisplayPlay],
    scoring: bool,
    state: &AppState,
    pal: Palette,
) {
    if plays.is_empty() {
        let empty = Paragraph::new(if scoring { "No scoring plays" } else { "No plays yet" })
            .style(Style::default().fg(pal.muted));
        frame.render_widget(empty, area);
        return;
    }

    let mut lines: Vec<Line> = Vec::with_capacity(plays.len() * 4);
    // Newest first, as on the page.
    for play in plays.iter().rev() {
        let [top, bottom] = diamond(&play.bases);
        lines.push(Line::from(vec![
            Span::styled(
                format!("[{:>4}] ", play.event_icon),
                Style::default().fg(pal.accent).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("{:<10}", play.inning_label), Style::default().fg(pal.muted)),
            Span::styled(play.event.clone(), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!("  {}", play.batter_name)),
        ]));
        lines.push(Line::from(format!("       {}", play.description)));
        let mut situation = format!(
            "      {bottom}   count {}  outs {}  |  EV {}  LA {}  Dist {}",
            play.count_label,
            outs_marks(play.outs),
            play.metrics.exit_velocity,
            play.metrics.launch_angle,
            play.metrics.distance
        );
        if scoring {
            if let Some(score) = play.score_label.as_deref() {
                situation.push_str(&format!("  |  Score {score}  RBI {}", play.rbi));
            }
        }
        lines.push(Line::from(format!("      {top}")));
        lines.push(Line::from(situation));
    }

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL))
        .scroll((state.scroll(), 0));
    frame.render_widget(paragraph, area);
}

fn render_boxscore(frame: &mut Frame, area: Rect, game: &GameFeed, state: &AppState, pal: Palette) {
    let (team, boxscore) = game.team_boxscore(state.boxscore_side);
    let title = format!(
        "{} ({}) | {}",
        team.name,
        state.boxscore_side.label(),
        team_logo_url(team.id, state.theme)
    );
    let Some(boxscore) = boxscore else {
        let empty = Paragraph::new("No team data available")
            .style(Style::default().fg(pal.muted))
            .block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(empty, area);
        return;
    };

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let widths = [
        Constraint::Min(24),
        Constraint::Length(5),
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Length(6),
    ];
    let header_style = Style::default().fg(pal.accent).add_modifier(Modifier::BOLD);
    let skip = state.scroll() as usize;

    let batting = Table::new(
        boxscore
            .batting_lines()
            .iter()
            .skip(skip)
            .map(|l| Row::new(l.cells()))
            .collect::<Vec<_>>(),
        widths,
    )
    .header(Row::new(BATTING_COLUMNS).style(header_style))
    .block(Block::default().title(format!("Batting | {title}")).borders(Borders::ALL));
    frame.render_widget(batting, sections[0]);

    let pitching = Table::new(
        boxscore
            .pitching_lines()
            .iter()
            .map(|l| Row::new(l.cells()))
            .collect::<Vec<_>>(),
        widths,
    )
    .header(Row::new(PITCHING_COLUMNS).style(header_style))
    .block(Block::default().title("Pitching").borders(Borders::ALL));
    frame.render_widget(pitching, sections[1]);
}

fn render_highlights(frame: &mut Frame, area: Rect, state: &AppState, pal: Palette) {
    if state.highlights.is_empty() {
        let empty = Paragraph::new("No highlights yet").style(Style::default().fg(pal.muted));
        frame.render_widget(empty, area);
        return;
    }
    let mut lines: Vec<Line> = Vec::new();
    for row in &state.highlights {
        lines.push(Line::styled(
            row.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        if let Some(blurb) = row.blurb.as_deref() {
            lines.push(Line::from(format!("  {blurb}")));
        }
        match row.playback.as_ref() {
            Some(p) => lines.push(Line::styled(format!("  {}", p.url), Style::default().fg(pal.accent))),
            None => lines.push(Line::styled("  video not available", Style::default().fg(pal.muted))),
        }
    }
    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL))
        .scroll((state.scroll(), 0));
    frame.render_widget(paragraph, area);
}

fn render_logs(frame: &mut Frame, area: Rect, state: &AppState, pal: Palette) {
    let visible = area.height.saturating_sub(1) as usize;
    let start = state.logs.len().saturating_sub(visible);
    let text = state
        .logs
        .iter()
        .skip(start)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n");
    let logs = Paragraph::new(text)
        .style(Style::default().fg(pal.muted))
        .block(Block::default().borders(Borders::TOP).title("Log"));
    frame.render_widget(logs, area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "MLB Gamecast - Help",
        "",
        "  1            All plays",
        "  2            Scoring plays",
        "  3            Boxscore",
        "  4            Highlights (final games)",
        "  Tab          Next tab",
        "  a / h        Boxscore away / home",
        "  j/k or ↑/↓   Scroll",
        "  r            Refresh now",
        "  t            Toggle theme",
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
