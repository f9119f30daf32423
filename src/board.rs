use crate::shapes::{PieceColor, Shape};

// ============================================================================
// Configuration
// ============================================================================

pub const COLUMNS: usize = 10;
pub const ROWS: usize = 20;
pub const SCORE_PER_LINE: u32 = 100;

// ============================================================================
// Types
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Position {
    pub x: i16,
    pub y: i16,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CellState {
    Empty,
    Filled(PieceColor),
}

/// `ROWS` rows of `COLUMNS` cells; row 0 is the top.
pub type Grid = Vec<Vec<CellState>>;

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct LineClear {
    pub grid: Grid,
    pub cleared: u32,
}

impl LineClear {
    pub fn score(&self) -> u32 {
        self.cleared * SCORE_PER_LINE
    }
}

pub fn empty_grid() -> Grid {
    vec![empty_row(); ROWS]
}

fn empty_row() -> Vec<CellState> {
    vec![CellState::Empty; COLUMNS]
}

// ============================================================================
// Collision
// ============================================================================

/// True when any filled cell of `shape` at `position` lies below the floor,
/// past either wall, or on an occupied cell. Cells above row 0 only collide
/// with the walls.
pub fn check_collision(grid: &Grid, position: Position, shape: &Shape) -> bool {
    shape.filled_cells().any(|(dx, dy)| {
        let x = position.x + dx;
        let y = position.y + dy;
        if y >= ROWS as i16 || x < 0 || x >= COLUMNS as i16 {
            return true;
        }
        y >= 0 && grid[y as usize][x as usize] != CellState::Empty
    })
}

// ============================================================================
// Locking and Line Clears
// ============================================================================

/// Returns a copy of `grid` with `shape` written in at `position`.
///
/// # Panics
///
/// Panics if a filled cell falls outside the grid. Callers must have checked
/// the position with [`check_collision`] first.
pub fn place_shape(grid: &Grid, shape: &Shape, position: Position) -> Grid {
    let mut placed = grid.clone();
    for (dx, dy) in shape.filled_cells() {
        let x = position.x + dx;
        let y = position.y + dy;
        assert!(
            (0..COLUMNS as i16).contains(&x) && (0..ROWS as i16).contains(&y),
            "placed cell ({}, {}) is outside the grid",
            x,
            y
        );
        placed[y as usize][x as usize] = CellState::Filled(shape.color);
    }
    placed
}

/// Drops every fully occupied row, keeping the rest in order and refilling
/// the top with empty rows.
pub fn clear_lines(grid: Grid) -> LineClear {
    let mut kept: Grid = grid
        .into_iter()
        .filter(|row| row.iter().any(|cell| *cell == CellState::Empty))
        .collect();
    let cleared = ROWS - kept.len();

    if cleared > 0 {
        let mut refilled = vec![empty_row(); cleared];
        refilled.append(&mut kept);
        kept = refilled;
    }

    LineClear {
        grid: kept,
        cleared: cleared as u32,
    }
}

pub fn is_row_complete(grid: &Grid, y: usize) -> bool {
    grid[y].iter().all(|cell| *cell != CellState::Empty)
}

pub fn filled_count_in_row(grid: &Grid, y: usize) -> usize {
    grid[y].iter().filter(|cell| **cell != CellState::Empty).count()
}

pub fn total_filled_cells(grid: &Grid) -> usize {
    grid.iter()
        .flatten()
        .filter(|cell| **cell != CellState::Empty)
        .count()
}

// ============================================================================
// Test Helpers
// ============================================================================

pub mod test_helpers {
    use super::*;

    pub const MARKER: CellState = CellState::Filled(PieceColor::Purple);

    pub fn fill_row(grid: &mut Grid, y: usize) {
        for x in 0..COLUMNS {
            grid[y][x] = MARKER;
        }
    }

    pub fn fill_row_with_gap(grid: &mut Grid, y: usize, gap_x: usize) {
        for x in 0..COLUMNS {
            if x != gap_x {
                grid[y][x] = MARKER;
            }
        }
    }
}
