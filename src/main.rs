use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::{
    fs::File,
    io::{stdout, Stdout},
    path::Path,
    time::{Duration, Instant},
};

use falling_blocks::board::{CellState, COLUMNS, ROWS};
use falling_blocks::config::{Args, Config};
use falling_blocks::game::{Game, GameState};
use falling_blocks::game_loop::{Action, GameLoop};
use falling_blocks::shapes::{PieceColor, RandomPieceProvider};

// ============================================================================
// Visual Constants
// ============================================================================

const CELL_WIDTH: u16 = 2;
const BLOCK_CHAR: &str = "██";
const EMPTY_CHAR: &str = "· ";
const IDLE_POLL: Duration = Duration::from_millis(250);

// ============================================================================
// Color Mapping
// ============================================================================

fn piece_color(color: PieceColor) -> Color {
    match color {
        PieceColor::Cyan => Color::Cyan,
        PieceColor::Yellow => Color::Yellow,
        PieceColor::Purple => Color::Magenta,
        PieceColor::Red => Color::Red,
        PieceColor::Green => Color::Green,
        PieceColor::Orange => Color::Rgb(255, 165, 0),
        PieceColor::Blue => Color::Blue,
    }
}

// ============================================================================
// Rendering
// ============================================================================

fn render(frame: &mut Frame, game_loop: &GameLoop) {
    let area = frame.size();

    render_game(frame, game_loop, area);
    if game_loop.game().state == GameState::GameOver {
        render_game_over(frame, game_loop.game(), area);
    }
}

fn render_game(frame: &mut Frame, game_loop: &GameLoop, area: Rect) {
    let grid_display_width = (COLUMNS as u16 * CELL_WIDTH) + 2;
    let grid_display_height = ROWS as u16 + 2;
    let info_width = 16;
    let total_width = grid_display_width + info_width + 2;
    let total_height = grid_display_height + 3;

    let main_area = centered_rect(total_width, total_height, area);

    let vertical = Layout::vertical([
        Constraint::Length(grid_display_height),
        Constraint::Fill(1),
    ])
    .split(main_area);

    let game_row = vertical[0];

    // Layout: [Grid][Info]
    let horizontal = Layout::horizontal([
        Constraint::Length(grid_display_width),
        Constraint::Length(info_width),
    ])
    .split(game_row);

    render_grid(frame, game_loop.game(), horizontal[0]);
    render_info(frame, game_loop, horizontal[1]);

    let controls_area = Rect {
        x: area.x,
        y: game_row.y + game_row.height,
        width: area.width,
        height: 2,
    };

    if controls_area.y + 1 < area.height {
        let controls = Paragraph::new(vec![Line::from(
            "←→/AD: Move | ↓/S: Down | ↑/W: Rotate | R: Restart | Q/ESC: Quit",
        )])
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(controls, controls_area);
    }
}

fn render_grid(frame: &mut Frame, game: &Game, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Blocks ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = game
        .render_grid()
        .iter()
        .map(|row| {
            let spans: Vec<Span> = row
                .iter()
                .map(|cell| match cell {
                    CellState::Empty => {
                        Span::styled(EMPTY_CHAR, Style::default().fg(Color::DarkGray))
                    }
                    CellState::Filled(color) => {
                        Span::styled(BLOCK_CHAR, Style::default().fg(piece_color(*color)))
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_info(frame: &mut Frame, game_loop: &GameLoop, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Info ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let game = game_loop.game();
    let (status, status_color) = match game.state {
        GameState::Running => ("Running", Color::Green),
        GameState::GameOver => ("Game Over", Color::Red),
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled("Score", Style::default().fg(Color::Yellow))),
        Line::from(format!("{}", game.score)),
        Line::from(""),
        Line::from(Span::styled("Status", Style::default().fg(Color::Cyan))),
        Line::from(Span::styled(status, Style::default().fg(status_color))),
    ];

    // With auto restart the finished game is already gone; keep its score.
    if let (GameState::Running, Some(score)) = (game.state, game_loop.final_score()) {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Last game",
            Style::default().fg(Color::DarkGray),
        )));
        lines.push(Line::from(format!("{}", score)));
    }

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}

fn render_game_over(frame: &mut Frame, game: &Game, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("GAME OVER", Style::default().fg(Color::Red))),
        Line::from(""),
        Line::from(format!("Final score: {}", game.score)),
        Line::from(""),
        Line::from(Span::styled(
            "R to play again",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            "ESC to quit",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Game Over ")
            .title_alignment(Alignment::Center)
            .style(Style::default().bg(Color::Black)),
    );

    let popup_area = centered_rect(24, 10, area);
    frame.render_widget(paragraph, popup_area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let horizontal = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width.min(area.width)),
        Constraint::Fill(1),
    ])
    .split(area);

    let vertical = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height.min(area.height)),
        Constraint::Fill(1),
    ])
    .split(horizontal[1]);

    vertical[1]
}

// ============================================================================
// Input
// ============================================================================

fn action_for(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Action::MoveLeft),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Action::MoveRight),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Action::MoveDown),
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Action::Rotate),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Action::Restart),
        _ => None,
    }
}

// ============================================================================
// Main Loop
// ============================================================================

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>, config: &Config) -> Result<()> {
    let provider = match config.seed {
        Some(seed) => RandomPieceProvider::seeded(seed),
        None => RandomPieceProvider::new(),
    };
    let mut game_loop = GameLoop::new(
        Game::with_provider(Box::new(provider)),
        config,
        Instant::now(),
    );

    loop {
        terminal
            .draw(|frame| render(frame, &game_loop))
            .context("failed to draw frame")?;

        let timeout = game_loop
            .time_until_tick(Instant::now())
            .unwrap_or(IDLE_POLL);

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => break,
                        code => {
                            if let Some(action) = action_for(code) {
                                game_loop.handle(action, Instant::now());
                            }
                        }
                    }
                }
            }
        }

        game_loop.update(Instant::now());
    }

    log::info!("quit with score {}", game_loop.game().score);
    Ok(())
}

fn main() -> Result<()> {
    let config = Config::from(Args::parse());
    if let Some(path) = &config.log_file {
        init_logging(path)?;
    }

    enable_raw_mode().context("failed to enable raw mode")?;
    stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &config);

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}
