use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A direction to move/merge tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// Every direction, in declaration order.
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// Order the lookahead tries directions in. On equal value the earlier one wins.
    pub const SEARCH_ORDER: [Move; 4] = [Move::Up, Move::Left, Move::Right, Move::Down];
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Move::Up => "up",
            Move::Down => "down",
            Move::Left => "left",
            Move::Right => "right",
        };
        f.write_str(name)
    }
}

pub type Tile = u32;
pub type Score = u64;

/// Side length used when a `Board` is named without an explicit size.
pub const DEFAULT_GRID_SIZE: usize = 4;

/// A 1-indexed `(row, col)` cell coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    #[inline]
    pub const fn new(row: usize, col: usize) -> Self { Position { row, col } }
}

impl From<(usize, usize)> for Position {
    fn from((row, col): (usize, usize)) -> Self { Position::new(row, col) }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("tile at {0} must be positive")]
    EmptyTile(Position),
    #[error("position {pos} is outside a {size}x{size} grid")]
    OutOfBounds { pos: Position, size: usize },
}

/// Sparse `N`x`N` 2048 board: occupied cells only, keyed by [`Position`].
///
/// The grid size is part of the type, so two boards of the same type are equal
/// exactly when they hold the same tiles at the same positions. Every operation
/// returns a new board; nothing mutates a board in place.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Board<const N: usize = DEFAULT_GRID_SIZE> {
    cells: BTreeMap<Position, Tile>,
}

/// Score gained and board produced by one [`execute`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome<const N: usize = DEFAULT_GRID_SIZE> {
    pub score: Score,
    pub board: Board<N>,
}

impl<const N: usize> MoveOutcome<N> {
    /// True when the move left `input` exactly as it was.
    #[inline]
    pub fn is_noop(&self, input: &Board<N>) -> bool { self.board == *input }
}

impl<const N: usize> Board<N> {
    /// A board with no tiles.
    pub const EMPTY: Board<N> = Board { cells: BTreeMap::new() };

    /// Build a board from an external sparse cell listing.
    ///
    /// Later entries for the same position overwrite earlier ones.
    ///
    /// ```
    /// use lookahead_2048::engine::{Board, BoardError, Position};
    /// let cells = [(Position::new(1, 1), 2), (Position::new(1, 2), 2)];
    /// let b = Board::<4>::from_cells(cells).unwrap();
    /// assert_eq!(b.get(Position::new(1, 2)), Some(2));
    /// assert!(matches!(
    ///     Board::<4>::from_cells([(Position::new(5, 1), 2)]),
    ///     Err(BoardError::OutOfBounds { .. })
    /// ));
    /// ```
    pub fn from_cells<I>(cells: I) -> Result<Self, BoardError>
    where
        I: IntoIterator<Item = (Position, Tile)>,
    {
        let mut map = BTreeMap::new();
        for (pos, tile) in cells {
            if !Self::in_bounds(pos) {
                return Err(BoardError::OutOfBounds { pos, size: N });
            }
            if tile == 0 {
                return Err(BoardError::EmptyTile(pos));
            }
            map.insert(pos, tile);
        }
        Ok(Board { cells: map })
    }

    /// Build a board from dense rows, top row first; `0` marks an empty cell.
    pub fn from_rows(rows: [[Tile; N]; N]) -> Self {
        let cells = rows
            .iter()
            .enumerate()
            .flat_map(|(r, row)| {
                row.iter()
                    .enumerate()
                    .filter(|&(_, &tile)| tile != 0)
                    .map(move |(c, &tile)| (Position::new(r + 1, c + 1), tile))
            })
            .collect();
        Board { cells }
    }

    /// Dense copy of the board, top row first; `0` marks an empty cell.
    pub fn to_rows(&self) -> [[Tile; N]; N] {
        let mut rows = [[0; N]; N];
        for (pos, &tile) in &self.cells {
            rows[pos.row - 1][pos.col - 1] = tile;
        }
        rows
    }

    #[inline]
    pub fn get(&self, pos: Position) -> Option<Tile> { self.cells.get(&pos).copied() }

    /// Occupied cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (Position, Tile)> + '_ {
        self.cells.iter().map(|(&pos, &tile)| (pos, tile))
    }

    /// Number of occupied cells.
    #[inline]
    pub fn len(&self) -> usize { self.cells.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.cells.is_empty() }

    /// Count the number of empty cells on the board.
    #[inline]
    pub fn count_empty(&self) -> usize { N * N - self.cells.len() }

    /// Return the highest tile value present on the board (0 when empty).
    pub fn highest_tile(&self) -> Tile { self.cells.values().copied().max().unwrap_or(0) }

    /// Return the board resulting from sliding/merging tiles in `dir` (no random insert).
    ///
    /// ```
    /// use lookahead_2048::engine::{Board, Move};
    /// let b = Board::from_rows([[2, 2], [0, 0]]);
    /// assert_eq!(b.shift(Move::Left), Board::from_rows([[4, 0], [0, 0]]));
    /// ```
    #[inline]
    pub fn shift(&self, dir: Move) -> Self { execute(self, dir).board }

    /// Return true if no direction changes the board.
    pub fn is_stuck(&self) -> bool { Move::ALL.iter().all(|&dir| execute(self, dir).is_noop(self)) }

    /// Insert a random 2 (90%) or 4 (10%) tile into a random empty cell, using the provided RNG.
    ///
    /// A full board is returned unchanged.
    pub fn with_random_tile<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        let empty: Vec<Position> = (1..=N)
            .flat_map(|row| (1..=N).map(move |col| Position::new(row, col)))
            .filter(|pos| !self.cells.contains_key(pos))
            .collect();
        if empty.is_empty() {
            return self.clone();
        }
        let pos = empty[rng.gen_range(0..empty.len())];
        let mut cells = self.cells.clone();
        cells.insert(pos, generate_random_tile(rng));
        Board { cells }
    }

    #[inline]
    fn in_bounds(pos: Position) -> bool { (1..=N).contains(&pos.row) && (1..=N).contains(&pos.col) }
}

impl<const N: usize> fmt::Display for Board<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let separator = "-".repeat(N * 8);
        writeln!(f)?;
        for (r, row) in self.to_rows().iter().enumerate() {
            if r > 0 {
                writeln!(f, "{separator}")?;
            }
            let cells: Vec<String> = row.iter().map(format_val).collect();
            writeln!(f, "{}", cells.join("|"))?;
        }
        Ok(())
    }
}

/// Slide/merge every line of `board` toward the leading edge of `direction`.
///
/// Pure and deterministic. A move that changes nothing is reported faithfully
/// (see [`MoveOutcome::is_noop`]); it is not rejected here.
///
/// ```
/// use lookahead_2048::engine::{execute, Board, Move, Position};
/// let b = Board::<4>::from_cells([(Position::new(1, 1), 2), (Position::new(1, 2), 2)]).unwrap();
/// let out = execute(&b, Move::Left);
/// assert_eq!(out.score, 4);
/// assert_eq!(out.board, Board::<4>::from_cells([(Position::new(1, 1), 4)]).unwrap());
/// ```
pub fn execute<const N: usize>(board: &Board<N>, direction: Move) -> MoveOutcome<N> {
    let mut cells = BTreeMap::new();
    let mut score = 0;
    for line_idx in 1..=N {
        let tiles: Vec<Tile> = line::<N>(direction, line_idx).filter_map(|pos| board.get(pos)).collect();
        let (merged, gained) = merge_line(&tiles);
        score += gained;
        cells.extend(line::<N>(direction, line_idx).zip(merged));
    }
    MoveOutcome { score, board: Board { cells } }
}

/// Compact and merge one line whose first element sits on the leading edge.
///
/// Equal neighbours merge into one tile of double the value, which scores that
/// value and does not merge again in the same pass. Zeros are treated as gaps.
///
/// ```
/// use lookahead_2048::engine::merge_line;
/// assert_eq!(merge_line(&[2, 2, 2, 2]), (vec![4, 4], 8));
/// assert_eq!(merge_line(&[2, 2, 4]), (vec![4, 4], 4));
/// ```
pub fn merge_line(tiles: &[Tile]) -> (Vec<Tile>, Score) {
    let mut merged = Vec::with_capacity(tiles.len());
    let mut score = 0;
    let mut pending: Option<Tile> = None;
    for &tile in tiles.iter().filter(|&&t| t != 0) {
        match pending {
            Some(prev) if prev == tile => {
                let doubled = prev.saturating_mul(2);
                merged.push(doubled);
                score += Score::from(doubled);
                pending = None;
            }
            Some(prev) => {
                merged.push(prev);
                pending = Some(tile);
            }
            None => pending = Some(tile),
        }
    }
    merged.extend(pending);
    (merged, score)
}

/// Positions of line `idx` (a row for Left/Right, a column for Up/Down),
/// starting at the leading edge of `direction`.
fn line<const N: usize>(direction: Move, idx: usize) -> impl Iterator<Item = Position> {
    (1..=N).map(move |step| {
        let from_edge = match direction {
            Move::Left | Move::Up => step,
            Move::Right | Move::Down => N + 1 - step,
        };
        match direction {
            Move::Left | Move::Right => Position::new(idx, from_edge),
            Move::Up | Move::Down => Position::new(from_edge, idx),
        }
    })
}

fn generate_random_tile<R: Rng + ?Sized>(rng: &mut R) -> Tile { if rng.gen_range(0..10) < 9 { 2 } else { 4 } }

fn format_val(val: &Tile) -> String {
    match val {
        0 => String::from("       "),
        &x => format!("{:^7}", x),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn it_merge_line() {
        assert_eq!(merge_line(&[]), (vec![], 0));
        assert_eq!(merge_line(&[2, 4, 2, 4]), (vec![2, 4, 2, 4], 0));
        assert_eq!(merge_line(&[2, 2, 4, 4]), (vec![4, 8], 12));
        assert_eq!(merge_line(&[2, 0, 0, 2]), (vec![4], 4));
        assert_eq!(merge_line(&[0, 2, 2, 2]), (vec![4, 2], 4));
    }

    #[test]
    fn merges_each_tile_at_most_once() {
        let b = Board::from_rows([[2, 2, 2, 2], [0; 4], [0; 4], [0; 4]]);
        let out = execute(&b, Move::Left);
        assert_eq!(out.score, 8);
        assert_eq!(out.board, Board::from_rows([[4, 4, 0, 0], [0; 4], [0; 4], [0; 4]]));
    }

    #[test]
    fn merged_tile_does_not_merge_again() {
        let b = Board::from_rows([[2, 2, 4, 0], [0; 4], [0; 4], [0; 4]]);
        let out = execute(&b, Move::Left);
        assert_eq!(out.score, 4);
        assert_eq!(out.board, Board::from_rows([[4, 4, 0, 0], [0; 4], [0; 4], [0; 4]]));

        let b = Board::from_rows([[0, 4, 2, 2], [0; 4], [0; 4], [0; 4]]);
        let out = execute(&b, Move::Right);
        assert_eq!(out.score, 4);
        assert_eq!(out.board, Board::from_rows([[0, 0, 4, 4], [0; 4], [0; 4], [0; 4]]));
    }

    fn sparse<const N: usize>(cells: &[(usize, usize, Tile)]) -> Board<N> {
        Board::from_cells(cells.iter().map(|&(r, c, t)| (Position::new(r, c), t))).unwrap()
    }

    #[test]
    fn two_wide_scenarios() {
        let b = sparse::<2>(&[(1, 1, 2), (1, 2, 2)]);
        let out = execute(&b, Move::Left);
        assert_eq!(out.score, 4);
        assert_eq!(out.board, sparse::<2>(&[(1, 1, 4)]));

        let b = sparse::<2>(&[(1, 1, 2), (1, 2, 4)]);
        let out = execute(&b, Move::Left);
        assert_eq!(out.score, 0);
        assert!(out.is_noop(&b));
    }

    #[test]
    fn compacted_line_is_noop() {
        let b = Board::from_rows([[2, 4, 8, 0], [16, 0, 0, 0], [0; 4], [0; 4]]);
        let out = execute(&b, Move::Left);
        assert_eq!(out.score, 0);
        assert!(out.is_noop(&b));
        assert!(!execute(&b, Move::Right).is_noop(&b));
    }

    #[test]
    fn empty_board_is_stuck() {
        let b = Board::<4>::EMPTY;
        for dir in Move::ALL {
            let out = execute(&b, dir);
            assert_eq!(out.score, 0);
            assert!(out.is_noop(&b));
        }
        assert!(b.is_stuck());
    }

    #[test]
    fn execute_is_deterministic() {
        let b = Board::from_rows([[2, 2, 4, 4], [8, 0, 8, 2], [2, 2, 0, 0], [0, 4, 4, 4]]);
        for dir in Move::ALL {
            assert_eq!(execute(&b, dir), execute(&b, dir));
        }
    }

    #[test]
    fn test_move_left() {
        let b = Board::from_rows([[2, 4, 8, 16], [2, 8, 8, 4], [4, 0, 0, 4], [2, 0, 0, 4]]);
        let out = execute(&b, Move::Left);
        assert_eq!(out.board, Board::from_rows([[2, 4, 8, 16], [2, 16, 4, 0], [8, 0, 0, 0], [2, 4, 0, 0]]));
        assert_eq!(out.score, 24);
    }

    #[test]
    fn test_move_right() {
        let b = Board::from_rows([[2, 4, 8, 16], [2, 8, 8, 4], [4, 0, 0, 4], [2, 0, 0, 4]]);
        let out = execute(&b, Move::Right);
        assert_eq!(out.board, Board::from_rows([[2, 4, 8, 16], [0, 2, 16, 4], [0, 0, 0, 8], [0, 0, 2, 4]]));
        assert_eq!(out.score, 24);
    }

    #[test]
    fn test_move_up() {
        let b = Board::from_rows([[2, 2, 4, 2], [4, 8, 0, 0], [8, 8, 0, 0], [16, 4, 4, 4]]);
        let out = execute(&b, Move::Up);
        assert_eq!(out.board, Board::from_rows([[2, 2, 8, 2], [4, 16, 0, 4], [8, 4, 0, 0], [16, 0, 0, 0]]));
        assert_eq!(out.score, 24);
    }

    #[test]
    fn test_move_down() {
        let b = Board::from_rows([[2, 2, 4, 2], [4, 8, 0, 0], [8, 8, 0, 0], [16, 4, 4, 4]]);
        let out = execute(&b, Move::Down);
        assert_eq!(out.board, Board::from_rows([[2, 0, 0, 0], [4, 2, 0, 0], [8, 16, 0, 2], [16, 4, 8, 4]]));
        assert_eq!(out.score, 24);
    }

    #[test]
    fn from_cells_rejects_bad_input() {
        assert_eq!(
            Board::<4>::from_cells([(Position::new(1, 1), 0)]),
            Err(BoardError::EmptyTile(Position::new(1, 1)))
        );
        assert_eq!(
            Board::<4>::from_cells([(Position::new(0, 1), 2)]),
            Err(BoardError::OutOfBounds { pos: Position::new(0, 1), size: 4 })
        );
        assert_eq!(
            Board::<2>::from_cells([(Position::new(1, 3), 2)]),
            Err(BoardError::OutOfBounds { pos: Position::new(1, 3), size: 2 })
        );
    }

    #[test]
    fn rows_round_trip() {
        let rows = [[0, 2, 0], [4, 0, 0], [0, 0, 8]];
        let b = Board::from_rows(rows);
        assert_eq!(b.len(), 3);
        assert_eq!(b.count_empty(), 6);
        assert_eq!(b.highest_tile(), 8);
        assert_eq!(b.to_rows(), rows);
    }

    #[test]
    fn it_test_insert_random_tile() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut b = Board::<4>::EMPTY;
        for _ in 0..16 {
            b = b.with_random_tile(&mut rng);
        }
        assert_eq!(b.count_empty(), 0);
        assert!(b.cells().all(|(_, t)| t == 2 || t == 4));
        assert_eq!(b.with_random_tile(&mut rng), b);
    }

    #[test]
    fn display_lists_every_row() {
        let b = Board::from_rows([[2, 0], [0, 2048]]);
        let text = b.to_string();
        assert!(text.contains("   2   |       "));
        assert!(text.contains(" 2048  "));
        assert_eq!(text.lines().filter(|l| l.starts_with('-')).count(), 1);
    }
}
