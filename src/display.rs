//! Shared display utilities for rendering Go positions in the terminal
//!
//! Provides human-readable output for boards, moves, and game results.

use go_engine::{Cell, Position, BLACK, WHITE};

// ANSI codes for emphasis
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";
pub const RESET: &str = "\x1b[0m";

pub fn stone_char(cell: Cell) -> char {
    match cell {
        BLACK => 'X',
        WHITE => 'O',
        _ => '.',
    }
}

pub fn stone_name(cell: Cell) -> &'static str {
    match cell {
        BLACK => "Black (X)",
        WHITE => "White (O)",
        _ => "Empty",
    }
}

/// Print the board grid with 1-based row and column coordinates.
pub fn display_board(board: &[Cell], size: usize) {
    print!("\n    ");
    for col in 1..=size {
        print!("{col:>2} ");
    }
    println!();
    for row in 0..size {
        print!("  {:>2}", row + 1);
        for col in 0..size {
            let cell = board[row * size + col];
            if cell == 0 {
                print!(" {DIM}.{RESET} ");
            } else {
                print!(" {} ", stone_char(cell));
            }
        }
        println!();
    }
    println!();
}

/// Board plus a one-line status: side to move, move count, pass count.
pub fn display_position(position: &Position) {
    display_board(position.board(), position.size());
    println!(
        "{BOLD}To move:{RESET} {}   |   Moves played: {}   |   Consecutive passes: {}",
        stone_name(position.to_play()),
        position.move_count(),
        position.passes()
    );
}

/// Format a raw game result for display: +1 black wins, -1 white wins, 0 draw.
pub fn format_result(raw_result: i8) -> &'static str {
    match raw_result {
        1 => "Black (X) wins",
        -1 => "White (O) wins",
        _ => "Draw",
    }
}
