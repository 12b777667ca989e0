//! Go rules engine
//!
//! A minimal rules collaborator for the RL environment. Core object is a
//! single `Position` (plain data); pure functions operate on it and return
//! new positions. Covers stone placement, capture, the suicide prohibition,
//! simple ko, two-pass / move-cap termination, and area scoring with komi.
//! Superko, handicap stones, and seki adjudication are out of scope.

use thiserror::Error;

// =============================================================================
// Basic types and constants
// =============================================================================

/// Board cell: 0 empty, 1 black, -1 white.
pub type Cell = i8;

pub const EMPTY: Cell = 0;
pub const BLACK: Cell = 1;
pub const WHITE: Cell = -1;

/// A half-move: either a stone placement at a flat index `row * size + col`,
/// or a pass.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Move {
    Play(usize),
    Pass,
}

/// Errors from `play_move`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoveError {
    #[error("intersection {0} is outside the board")]
    OutOfBounds(usize),
    #[error("intersection {0} is already occupied")]
    Occupied(usize),
    #[error("placing at {0} would be suicide")]
    Suicide(usize),
    #[error("intersection {0} is the ko point and may not be retaken")]
    Ko(usize),
    #[error("the game is already over")]
    GameOver,
}

/// A Go position: board occupancy plus the bookkeeping needed to apply the
/// next move (side to move, ko point, consecutive passes, ply count).
///
/// `Clone` preserves everything, so a cloned position behaves identically to
/// the source under every operation below.
#[derive(Clone, Debug, PartialEq)]
pub struct Position {
    size: usize,
    board: Vec<Cell>,
    to_play: Cell,
    komi: f32,
    ko: Option<usize>,
    passes: u8,
    move_count: u32,
}

impl Position {
    /// Empty board, black to move.
    pub fn empty(size: usize, komi: f32) -> Self {
        assert!(size >= 2, "board size must be at least 2");
        Self {
            size,
            board: vec![EMPTY; size * size],
            to_play: BLACK,
            komi,
            ko: None,
            passes: 0,
            move_count: 0,
        }
    }

    /// Position from an existing board array (row-major, `size * size` cells).
    pub fn from_board(board: Vec<Cell>, komi: f32, to_play: Cell) -> Self {
        let size = (board.len() as f64).sqrt() as usize;
        assert_eq!(size * size, board.len(), "board must be square");
        assert!(to_play == BLACK || to_play == WHITE);
        Self {
            size,
            board,
            to_play,
            komi,
            ko: None,
            passes: 0,
            move_count: 0,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn board(&self) -> &[Cell] {
        &self.board
    }

    pub fn stone_at(&self, idx: usize) -> Cell {
        self.board[idx]
    }

    /// Side to move: `BLACK` or `WHITE`.
    pub fn to_play(&self) -> Cell {
        self.to_play
    }

    pub fn komi(&self) -> f32 {
        self.komi
    }

    /// The simple-ko point left by the previous move, if any.
    pub fn ko(&self) -> Option<usize> {
        self.ko
    }

    /// Consecutive passes ending the move sequence so far.
    pub fn passes(&self) -> u8 {
        self.passes
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    /// Ply cap after which the game is adjudicated by score.
    pub fn max_moves(&self) -> u32 {
        (2 * self.size * self.size) as u32
    }
}

// =============================================================================
// Group utilities
// =============================================================================

fn neighbors(size: usize, idx: usize) -> impl Iterator<Item = usize> {
    let (r, c) = (idx / size, idx % size);
    [
        (r > 0).then(|| idx - size),
        (r + 1 < size).then(|| idx + size),
        (c > 0).then(|| idx - 1),
        (c + 1 < size).then(|| idx + 1),
    ]
    .into_iter()
    .flatten()
}

/// Flood-fill the group containing `start` into `group`, marking `visited`.
fn collect_group(
    board: &[Cell],
    size: usize,
    start: usize,
    group: &mut Vec<usize>,
    visited: &mut [bool],
) {
    let color = board[start];
    debug_assert_ne!(color, EMPTY);
    group.clear();
    let mut stack = vec![start];
    visited[start] = true;
    while let Some(idx) = stack.pop() {
        group.push(idx);
        for n in neighbors(size, idx) {
            if !visited[n] && board[n] == color {
                visited[n] = true;
                stack.push(n);
            }
        }
    }
}

/// True if `group` has at least one liberty that is not `excluded`.
fn has_liberty_other_than(board: &[Cell], size: usize, group: &[usize], excluded: usize) -> bool {
    group
        .iter()
        .flat_map(|&idx| neighbors(size, idx))
        .any(|n| board[n] == EMPTY && n != excluded)
}

fn group_has_liberty(board: &[Cell], size: usize, group: &[usize]) -> bool {
    group
        .iter()
        .flat_map(|&idx| neighbors(size, idx))
        .any(|n| board[n] == EMPTY)
}

/// Remove opponent groups adjacent to `idx` that have no liberties left.
/// Returns the indices of the removed stones.
fn remove_captured_adjacent(board: &mut [Cell], size: usize, idx: usize, player: Cell) -> Vec<usize> {
    let opponent = -player;
    let mut captured = Vec::new();
    let mut visited = vec![false; board.len()];
    let mut group = Vec::new();

    for n in neighbors(size, idx) {
        if board[n] == opponent && !visited[n] {
            collect_group(board, size, n, &mut group, &mut visited);
            if !group_has_liberty(board, size, &group) {
                for &g in &group {
                    board[g] = EMPTY;
                }
                captured.extend_from_slice(&group);
            }
        }
    }
    captured
}

/// Legality of a placement without mutating the position: not occupied, not
/// the ko point, and either gains a liberty directly, captures, or connects
/// to a friendly group that keeps one.
fn is_legal_placement(pos: &Position, idx: usize) -> bool {
    if pos.board[idx] != EMPTY || pos.ko == Some(idx) {
        return false;
    }
    if neighbors(pos.size, idx).any(|n| pos.board[n] == EMPTY) {
        return true;
    }

    let player = pos.to_play;
    let opponent = -player;
    let mut visited = vec![false; pos.board.len()];
    let mut group = Vec::new();

    // Captures something: an adjacent opponent group whose last liberty is idx.
    for n in neighbors(pos.size, idx) {
        if pos.board[n] == opponent && !visited[n] {
            collect_group(&pos.board, pos.size, n, &mut group, &mut visited);
            if !has_liberty_other_than(&pos.board, pos.size, &group, idx) {
                return true;
            }
        }
    }

    // Connects to a friendly group that retains a liberty besides idx.
    visited.fill(false);
    for n in neighbors(pos.size, idx) {
        if pos.board[n] == player && !visited[n] {
            collect_group(&pos.board, pos.size, n, &mut group, &mut visited);
            if has_liberty_other_than(&pos.board, pos.size, &group, idx) {
                return true;
            }
        }
    }

    false
}

// =============================================================================
// Rule interface
// =============================================================================

/// All legal stone placements for the side to move, as flat indices.
/// Passing is always possible via `Move::Pass` and never appears here.
pub fn legal_moves(pos: &Position) -> Vec<usize> {
    (0..pos.board.len())
        .filter(|&idx| is_legal_placement(pos, idx))
        .collect()
}

/// Apply a move and return the resulting position. Pure: `pos` is unchanged.
pub fn play_move(pos: &Position, mv: Move) -> Result<Position, MoveError> {
    if is_game_over(pos) {
        return Err(MoveError::GameOver);
    }

    let mut next = pos.clone();
    next.ko = None;

    match mv {
        Move::Pass => {
            next.passes += 1;
        }
        Move::Play(idx) => {
            if idx >= pos.board.len() {
                return Err(MoveError::OutOfBounds(idx));
            }
            if pos.board[idx] != EMPTY {
                return Err(MoveError::Occupied(idx));
            }
            if pos.ko == Some(idx) {
                return Err(MoveError::Ko(idx));
            }

            let player = pos.to_play;
            next.board[idx] = player;
            let captured = remove_captured_adjacent(&mut next.board, next.size, idx, player);

            // Suicide: after captures the placed stone's group must breathe.
            let mut visited = vec![false; next.board.len()];
            let mut group = Vec::new();
            collect_group(&next.board, next.size, idx, &mut group, &mut visited);
            if !group_has_liberty(&next.board, next.size, &group) {
                return Err(MoveError::Suicide(idx));
            }

            // Simple ko: a single-stone capture where the capturing stone is
            // itself a lone stone whose only liberty is the captured point.
            if captured.len() == 1 && group.len() == 1 {
                let liberties: Vec<usize> = neighbors(next.size, idx)
                    .filter(|&n| next.board[n] == EMPTY)
                    .collect();
                if liberties == captured {
                    next.ko = Some(captured[0]);
                }
            }

            next.passes = 0;
        }
    }

    next.to_play = -next.to_play;
    next.move_count += 1;
    Ok(next)
}

/// Terminal test: two consecutive passes, the ply cap, or no legal placement
/// remaining for the side to move.
pub fn is_game_over(pos: &Position) -> bool {
    pos.passes >= 2 || pos.move_count >= pos.max_moves() || legal_moves(pos).is_empty()
}

/// Area score from black's perspective: stones plus single-color territory,
/// minus white's total and komi. Positive means black leads.
pub fn score(pos: &Position) -> f32 {
    let mut black = 0.0f32;
    let mut white = pos.komi;
    let mut visited = vec![false; pos.board.len()];

    for idx in 0..pos.board.len() {
        if visited[idx] {
            continue;
        }
        match pos.board[idx] {
            BLACK => {
                black += 1.0;
                visited[idx] = true;
            }
            WHITE => {
                white += 1.0;
                visited[idx] = true;
            }
            _ => {
                let (count, borders_black, borders_white) = flood_territory(pos, idx, &mut visited);
                if borders_black && !borders_white {
                    black += count as f32;
                } else if borders_white && !borders_black {
                    white += count as f32;
                }
                // Neutral points score for neither side.
            }
        }
    }

    black - white
}

/// Signed result: +1 black wins, -1 white wins, 0 draw.
pub fn game_result(pos: &Position) -> i8 {
    let margin = score(pos);
    if margin > 0.0 {
        1
    } else if margin < 0.0 {
        -1
    } else {
        0
    }
}

fn flood_territory(pos: &Position, start: usize, visited: &mut [bool]) -> (usize, bool, bool) {
    let mut count = 0;
    let mut borders_black = false;
    let mut borders_white = false;
    let mut stack = vec![start];

    while let Some(idx) = stack.pop() {
        match pos.board[idx] {
            BLACK => borders_black = true,
            WHITE => borders_white = true,
            _ => {
                if !visited[idx] {
                    visited[idx] = true;
                    count += 1;
                    stack.extend(neighbors(pos.size, idx));
                }
            }
        }
    }

    (count, borders_black, borders_white)
}

// =============================================================================
// Tests
// =============================================================================
