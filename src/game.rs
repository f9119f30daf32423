use log::{debug, info};

use crate::board::{
    check_collision, clear_lines, empty_grid, place_shape, CellState, Grid, Position, COLUMNS,
    ROWS,
};
use crate::shapes::{PieceProvider, RandomPieceProvider, Shape};

// ============================================================================
// Configuration
// ============================================================================

pub const SPAWN_POSITION: Position = Position { x: 3, y: 0 };

// ============================================================================
// Types
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameState {
    Running,
    GameOver,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum GameEvent {
    PieceMoved,
    PieceRotated,
    PieceLocked,
    LinesCleared(u32),
    GameOver { final_score: u32 },
    GameRestarted,
}

// ============================================================================
// Game
// ============================================================================

pub struct Game {
    pub grid: Grid,
    pub current_piece: Shape,
    pub position: Position,
    pub score: u32,
    pub state: GameState,
    piece_provider: Box<dyn PieceProvider>,
    events: Vec<GameEvent>,
}

impl Game {
    pub fn new() -> Self {
        Self::with_provider(Box::new(RandomPieceProvider::new()))
    }

    pub fn with_provider(mut provider: Box<dyn PieceProvider>) -> Self {
        let current_piece = provider.next_shape();
        Self {
            grid: empty_grid(),
            current_piece,
            position: SPAWN_POSITION,
            score: 0,
            state: GameState::Running,
            piece_provider: provider,
            events: Vec::new(),
        }
    }

    /// Starts from an arbitrary board with `piece` already falling at
    /// `position`. Later pieces come from a random provider.
    pub fn with_grid(grid: Grid, piece: Shape, position: Position) -> Self {
        Self {
            grid,
            current_piece: piece,
            position,
            score: 0,
            state: GameState::Running,
            piece_provider: Box::new(RandomPieceProvider::new()),
            events: Vec::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.state == GameState::Running
    }

    pub fn is_game_over(&self) -> bool {
        self.state == GameState::GameOver
    }

    fn collides_at(&self, position: Position, shape: &Shape) -> bool {
        check_collision(&self.grid, position, shape)
    }

    // ------------------------------------------------------------------------
    // Piece control
    // ------------------------------------------------------------------------

    pub fn move_left(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        let target = Position {
            x: self.position.x - 1,
            ..self.position
        };
        if self.collides_at(target, &self.current_piece) {
            return false;
        }
        self.position.x = target.x.max(0);
        self.events.push(GameEvent::PieceMoved);
        true
    }

    pub fn move_right(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        let target = Position {
            x: self.position.x + 1,
            ..self.position
        };
        if self.collides_at(target, &self.current_piece) {
            return false;
        }
        let max_x = COLUMNS as i16 - self.current_piece.width() as i16;
        self.position.x = target.x.min(max_x);
        self.events.push(GameEvent::PieceMoved);
        true
    }

    /// Moves the piece one row down. A blocked move locks the piece instead
    /// and returns false.
    pub fn move_down(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        let target = Position {
            y: self.position.y + 1,
            ..self.position
        };
        if self.collides_at(target, &self.current_piece) {
            self.lock_and_spawn();
            return false;
        }
        self.position = target;
        self.events.push(GameEvent::PieceMoved);
        true
    }

    /// Rotates in place without kicks; a colliding rotation is discarded.
    pub fn rotate(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        let rotated = self.current_piece.rotated();
        if self.collides_at(self.position, &rotated) {
            return false;
        }
        self.current_piece = rotated;
        self.events.push(GameEvent::PieceRotated);
        true
    }

    /// Gravity step driven by the timer.
    pub fn tick(&mut self) {
        if !self.is_running() {
            return;
        }
        self.move_down();
    }

    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    fn lock_and_spawn(&mut self) {
        let placed = place_shape(&self.grid, &self.current_piece, self.position);
        self.events.push(GameEvent::PieceLocked);
        debug!(
            "locked {:?} at ({}, {})",
            self.current_piece.kind, self.position.x, self.position.y
        );

        let cleared = clear_lines(placed);
        if cleared.cleared > 0 {
            self.score += cleared.score();
            self.events.push(GameEvent::LinesCleared(cleared.cleared));
            debug!("cleared {} line(s), score {}", cleared.cleared, self.score);
        }
        self.grid = cleared.grid;

        self.spawn_next_piece();
    }

    /// Draws the next piece at the spawn position and ends the game if it
    /// already overlaps the board.
    pub fn spawn_next_piece(&mut self) {
        self.position = SPAWN_POSITION;
        self.current_piece = self.piece_provider.next_shape();

        if self.collides_at(self.position, &self.current_piece) {
            self.state = GameState::GameOver;
            self.events.push(GameEvent::GameOver {
                final_score: self.score,
            });
            info!("game over, final score {}", self.score);
        }
    }

    pub fn reset(&mut self) {
        self.grid = empty_grid();
        self.position = SPAWN_POSITION;
        self.current_piece = self.piece_provider.next_shape();
        self.score = 0;
        self.state = GameState::Running;
        self.events.clear();
        self.events.push(GameEvent::GameRestarted);
        info!("new game started");
    }

    // ------------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------------

    /// Returns the visual grid state with the current piece overlaid
    pub fn render_grid(&self) -> Grid {
        let mut visual_grid = self.grid.clone();

        for (dx, dy) in self.current_piece.filled_cells() {
            let x = self.position.x + dx;
            let y = self.position.y + dy;
            if (0..ROWS as i16).contains(&y) && (0..COLUMNS as i16).contains(&x) {
                visual_grid[y as usize][x as usize] = CellState::Filled(self.current_piece.color);
            }
        }

        visual_grid
    }

    /// Takes and clears all pending events
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
