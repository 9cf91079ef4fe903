use std::ops::Range;

use crate::{Player, Slot};

/// How many equal tokens in a line are needed to win.
pub const RUN_LENGTH: usize = 4;

/// The four directions along which a line of tokens can be formed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Axis {
    /// Along a column.
    Vertical,
    /// Along a row.
    Horizontal,
    /// Rising to the right, like `/`.
    PositiveDiagonal,
    /// Falling to the right, like `\`.
    NegativeDiagonal,
}

impl Axis {
    pub const ALL: [Axis; 4] = [
        Axis::Vertical,
        Axis::Horizontal,
        Axis::PositiveDiagonal,
        Axis::NegativeDiagonal,
    ];

    /// How many empty slots are put below `column` when staggering the board,
    /// so that lines along this axis turn into rows.
    fn stagger_offset(self, column: usize, width: usize) -> usize {
        match self {
            Axis::PositiveDiagonal => width - 1 - column,
            Axis::NegativeDiagonal => column,
            Axis::Vertical | Axis::Horizontal => 0,
        }
    }
}

/// A maximal line of at least [`RUN_LENGTH`] tokens of one player.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WinningRun {
    pub axis: Axis,
    pub player: Player,
    /// `(column, row)` coordinates, from left to right (bottom to top for vertical runs).
    pub slots: Vec<(usize, usize)>,
}

// Runs in grid coordinates, before being tagged with an axis.
type Runs = Vec<(Player, Vec<(usize, usize)>)>;

/// Every maximal run of at least [`RUN_LENGTH`] equal tokens in a single line.
pub(crate) fn runs_in_line(line: &[Slot]) -> Vec<(Player, Range<usize>)> {
    let mut runs = Vec::new();
    let mut start = 0;
    while start < line.len() {
        let slot = line[start];
        let end = start + line[start..].iter().take_while(|&&s| s == slot).count();
        if let Slot::Token(player) = slot {
            if end - start >= RUN_LENGTH {
                runs.push((player, start..end));
            }
        }
        start = end;
    }
    runs
}

/// Finds all winning runs on a board given as a list of columns.
///
/// Only columns are ever scanned. Rows are found by scanning the columns of the
/// transposed grid, and diagonals by staggering the columns first (shifting each
/// one up by a per-column offset, which turns a diagonal into a row), then
/// scanning rows and shifting the coordinates back down.
pub(crate) fn winning_runs(columns: &[Vec<Slot>]) -> Vec<WinningRun> {
    let width = columns.len();
    let mut runs = Vec::new();
    for axis in Axis::ALL {
        let found = match axis {
            Axis::Vertical => column_runs(columns),
            Axis::Horizontal => row_runs(columns),
            Axis::PositiveDiagonal | Axis::NegativeDiagonal => {
                let mut found = row_runs(&stagger(columns, axis));
                for (_, slots) in found.iter_mut() {
                    for (c, r) in slots.iter_mut() {
                        *r -= axis.stagger_offset(*c, width);
                    }
                }
                found
            }
        };
        runs.extend(
            found
                .into_iter()
                .map(|(player, slots)| WinningRun { axis, player, slots }),
        );
    }
    runs
}

fn column_runs(grid: &[Vec<Slot>]) -> Runs {
    grid.iter()
        .enumerate()
        .flat_map(|(c, column)| {
            runs_in_line(column)
                .into_iter()
                .map(move |(player, rows)| (player, rows.map(|r| (c, r)).collect()))
        })
        .collect()
}

fn row_runs(grid: &[Vec<Slot>]) -> Runs {
    column_runs(&transpose(grid))
        .into_iter()
        .map(|(player, slots)| (player, slots.into_iter().map(|(r, c)| (c, r)).collect()))
        .collect()
}

fn transpose(grid: &[Vec<Slot>]) -> Vec<Vec<Slot>> {
    let height = grid.first().map_or(0, Vec::len);
    (0..height)
        .map(|row| grid.iter().map(|column| column[row]).collect())
        .collect()
}

// Every column grows by width - 1 slots, so the result is still rectangular.
fn stagger(grid: &[Vec<Slot>], axis: Axis) -> Vec<Vec<Slot>> {
    let width = grid.len();
    grid.iter()
        .enumerate()
        .map(|(c, column)| {
            let below = axis.stagger_offset(c, width);
            let mut staggered = vec![Slot::Empty; below];
            staggered.extend_from_slice(column);
            staggered.resize(column.len() + width - 1, Slot::Empty);
            staggered
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const E: Slot = Slot::Empty;
    const X: Slot = Slot::Token(Player::One);
    const O: Slot = Slot::Token(Player::Two);

    #[test]
    fn runs_in_line_finds_every_maximal_run() {
        assert!(runs_in_line(&[X, X, X, E, X, X]).is_empty());
        assert!(runs_in_line(&[E, E, E, E, E]).is_empty());
        assert_eq!(runs_in_line(&[O, X, X, X, X, X]), vec![(Player::One, 1..6)]);
        assert_eq!(
            runs_in_line(&[X, X, X, X, O, O, O, O, O]),
            vec![(Player::One, 0..4), (Player::Two, 4..9)]
        );
    }

    #[test]
    fn stagger_keeps_grid_rectangular() {
        let grid = vec![vec![X, O], vec![O, X], vec![X, X]];
        let staggered = stagger(&grid, Axis::NegativeDiagonal);
        assert_eq!(staggered[0], vec![X, O, E, E]);
        assert_eq!(staggered[1], vec![E, O, X, E]);
        assert_eq!(staggered[2], vec![E, E, X, X]);
        let staggered = stagger(&grid, Axis::PositiveDiagonal);
        assert_eq!(staggered[0], vec![E, E, X, O]);
        assert_eq!(staggered[2], vec![X, X, E, E]);
    }

    #[test]
    fn negative_diagonal_is_unstaggered() {
        // Player one on (0, 3), (1, 2), (2, 1), (3, 0)
        let mut grid = vec![vec![E; 4]; 4];
        for c in 0..4 {
            grid[c][3 - c] = X;
        }
        let runs = winning_runs(&grid);
        assert_eq!(
            runs,
            vec![WinningRun {
                axis: Axis::NegativeDiagonal,
                player: Player::One,
                slots: vec![(0, 3), (1, 2), (2, 1), (3, 0)],
            }]
        );
    }
}
