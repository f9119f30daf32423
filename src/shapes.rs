use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ============================================================================
// Types
// ============================================================================

/// Display color of a piece. Placed cells keep the color of the piece that
/// filled them.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PieceColor {
    Cyan,
    Yellow,
    Purple,
    Red,
    Green,
    Orange,
    Blue,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ShapeKind {
    I,
    O,
    T,
    Z,
    S,
    L,
    J,
}

pub const ALL_KINDS: [ShapeKind; 7] = [
    ShapeKind::I,
    ShapeKind::O,
    ShapeKind::T,
    ShapeKind::Z,
    ShapeKind::S,
    ShapeKind::L,
    ShapeKind::J,
];

impl ShapeKind {
    fn occupancy(&self) -> &'static [&'static [u8]] {
        match self {
            ShapeKind::I => &[&[1, 1, 1, 1]],
            ShapeKind::O => &[&[1, 1], &[1, 1]],
            ShapeKind::T => &[&[0, 1, 0], &[1, 1, 1]],
            ShapeKind::Z => &[&[1, 1, 0], &[0, 1, 1]],
            ShapeKind::S => &[&[0, 1, 1], &[1, 1, 0]],
            ShapeKind::L => &[&[1, 0, 0], &[1, 1, 1]],
            ShapeKind::J => &[&[0, 0, 1], &[1, 1, 1]],
        }
    }

    pub fn color(&self) -> PieceColor {
        match self {
            ShapeKind::I => PieceColor::Cyan,
            ShapeKind::O => PieceColor::Yellow,
            ShapeKind::T => PieceColor::Purple,
            ShapeKind::Z => PieceColor::Red,
            ShapeKind::S => PieceColor::Green,
            ShapeKind::L => PieceColor::Orange,
            ShapeKind::J => PieceColor::Blue,
        }
    }

    /// Canonical (unrotated) shape for this kind.
    pub fn shape(&self) -> Shape {
        let cells = self
            .occupancy()
            .iter()
            .map(|row| row.iter().map(|&flag| flag == 1).collect())
            .collect();
        Shape {
            kind: *self,
            cells,
            color: self.color(),
        }
    }
}

/// A rectangular occupancy matrix anchored at its top-left corner, with one
/// color for every filled cell.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Shape {
    pub kind: ShapeKind,
    pub cells: Vec<Vec<bool>>,
    pub color: PieceColor,
}

impl Shape {
    pub fn width(&self) -> usize {
        self.cells.first().map_or(0, |row| row.len())
    }

    pub fn height(&self) -> usize {
        self.cells.len()
    }

    /// Offsets `(col, row)` of every filled cell relative to the top-left.
    pub fn filled_cells(&self) -> impl Iterator<Item = (i16, i16)> + '_ {
        self.cells.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, filled)| **filled)
                .map(move |(c, _)| (c as i16, r as i16))
        })
    }

    /// Quarter turn: transpose, then reverse the row order. The result stays
    /// anchored at the same top-left corner, so non-square pieces shift.
    pub fn rotated(&self) -> Self {
        let mut cells: Vec<Vec<bool>> = (0..self.width())
            .map(|c| self.cells.iter().map(|row| row[c]).collect())
            .collect();
        cells.reverse();
        Self {
            kind: self.kind,
            cells,
            color: self.color,
        }
    }
}

/// Uniform pick from the seven shapes.
pub fn random_shape<R: Rng + ?Sized>(rng: &mut R) -> Shape {
    ALL_KINDS[rng.gen_range(0..ALL_KINDS.len())].shape()
}

// ============================================================================
// Piece Provider Trait
// ============================================================================

pub trait PieceProvider {
    fn next_shape(&mut self) -> Shape;
}

pub struct RandomPieceProvider {
    rng: StdRng,
}

impl RandomPieceProvider {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPieceProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceProvider for RandomPieceProvider {
    fn next_shape(&mut self) -> Shape {
        random_shape(&mut self.rng)
    }
}

/// Cycles through a fixed list of kinds. Used for replays and tests.
pub struct SequencePieceProvider {
    kinds: Vec<ShapeKind>,
    index: usize,
}

impl SequencePieceProvider {
    pub fn new(kinds: Vec<ShapeKind>) -> Self {
        assert!(!kinds.is_empty(), "piece sequence must not be empty");
        Self { kinds, index: 0 }
    }
}

impl PieceProvider for SequencePieceProvider {
    fn next_shape(&mut self) -> Shape {
        let kind = self.kinds[self.index % self.kinds.len()];
        self.index += 1;
        kind.shape()
    }
}
