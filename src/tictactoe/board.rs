//! Board state representation and basic operations

use std::fmt;

use serde::{Deserialize, Serialize};

use super::lines::LineAnalyzer;
use crate::types::PlayerId;

/// A cell on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    X,
    O,
}

impl Cell {
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::X => 'X',
            Cell::O => 'O',
        }
    }

    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '.' | '_' => Some(Cell::Empty),
            'X' | 'x' => Some(Cell::X),
            'O' | 'o' | '0' => Some(Cell::O),
            _ => None,
        }
    }

    /// Mark placed by `player`; X always belongs to the opening seat.
    pub fn of(player: PlayerId) -> Cell {
        if player == PlayerId::FIRST {
            Cell::X
        } else {
            Cell::O
        }
    }

    /// Owner of the piece in this cell.
    pub fn owner(self) -> Option<PlayerId> {
        match self {
            Cell::Empty => None,
            Cell::X => Some(PlayerId::FIRST),
            Cell::O => Some(PlayerId::SECOND),
        }
    }
}

/// Complete board state including cells and whose turn it is
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardState {
    size: usize,
    pub cells: Vec<Cell>,
    pub to_move: PlayerId,
}

/// Count of each piece type on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PieceCount {
    x: usize,
    o: usize,
}

impl BoardState {
    /// Create a new empty `size x size` board with X to move
    pub fn new(size: usize) -> Self {
        BoardState {
            size,
            cells: vec![Cell::Empty; size * size],
            to_move: PlayerId::FIRST,
        }
    }

    /// Side length of the board.
    pub fn size(&self) -> usize {
        self.size
    }

    fn count_pieces(cells: &[Cell]) -> PieceCount {
        cells.iter().fold(PieceCount { x: 0, o: 0 }, |mut count, cell| {
            match cell {
                Cell::X => count.x += 1,
                Cell::O => count.o += 1,
                Cell::Empty => {}
            }
            count
        })
    }

    /// Create a board from a string representation.
    ///
    /// Whitespace is ignored, so rows may be separated by newlines or
    /// spaces. The remaining characters must form a square board. The player
    /// to move is inferred from the piece counts: X when counts are equal, O
    /// when X is one ahead.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The number of cells is not a non-zero perfect square
    /// - Any character is not a valid cell representation
    /// - The piece counts are invalid (X not equal to or one ahead of O)
    ///
    /// # Examples
    ///
    /// ```
    /// use duelist::tictactoe::BoardState;
    /// use duelist::types::PlayerId;
    ///
    /// let board = BoardState::from_string("XX. OO. ...")?;
    /// assert_eq!(board.size(), 3);
    /// assert_eq!(board.to_move, PlayerId::FIRST);
    /// # Ok::<(), duelist::Error>(())
    /// ```
    pub fn from_string(s: &str) -> Result<Self, crate::Error> {
        let chars: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
        let size = chars.len().isqrt();
        if size == 0 || size * size != chars.len() {
            return Err(crate::Error::InvalidBoardLength {
                got: chars.len(),
                context: s.to_string(),
            });
        }

        let cells = chars
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                Cell::from_char(c).ok_or_else(|| crate::Error::InvalidCellCharacter {
                    character: c,
                    position: i,
                    context: s.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let count = Self::count_pieces(&cells);
        let to_move = if count.x == count.o {
            PlayerId::FIRST
        } else if count.x == count.o + 1 {
            PlayerId::SECOND
        } else {
            return Err(crate::Error::InvalidPieceCounts {
                x_count: count.x,
                o_count: count.o,
            });
        };

        Ok(BoardState {
            size,
            cells,
            to_move,
        })
    }

    /// Get cell at a row-major position
    pub fn get(&self, pos: usize) -> Cell {
        self.cells[pos]
    }

    /// Check if a position is on the board and empty
    pub fn is_empty(&self, pos: usize) -> bool {
        self.cells.get(pos) == Some(&Cell::Empty)
    }

    /// Get all empty positions
    pub fn empty_positions(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &cell)| cell == Cell::Empty)
            .map(|(i, _)| i)
            .collect()
    }

    /// Make a move for the player to move and return a new board state
    #[must_use = "make_move returns a new board state; the original is unchanged"]
    pub fn make_move(&self, pos: usize) -> Result<BoardState, crate::Error> {
        self.place(pos, self.to_move)
    }

    /// Place `player`'s mark at `pos` and hand the turn to the other seat.
    #[must_use = "place returns a new board state; the original is unchanged"]
    pub fn place(&self, pos: usize, player: PlayerId) -> Result<BoardState, crate::Error> {
        if !self.is_empty(pos) {
            return Err(crate::Error::InvalidMove { position: pos });
        }

        let mut new_state = self.clone();
        new_state.cells[pos] = Cell::of(player);
        new_state.to_move = player.opponent();
        Ok(new_state)
    }

    /// Get legal moves in this position (empty cells when game not terminal)
    pub fn legal_moves(&self) -> Vec<usize> {
        if self.is_terminal() {
            return Vec::new();
        }
        self.empty_positions()
    }

    /// Check if a player has a full line
    pub fn has_won(&self, player: PlayerId) -> bool {
        LineAnalyzer::has_won(&self.cells, self.size, player)
    }

    /// Get the winner if there is one
    pub fn winner(&self) -> Option<PlayerId> {
        [PlayerId::FIRST, PlayerId::SECOND]
            .into_iter()
            .find(|&player| self.has_won(player))
    }

    /// Check if every cell is occupied
    pub fn is_full(&self) -> bool {
        !self.cells.contains(&Cell::Empty)
    }

    /// Check if the game is over (win or draw)
    pub fn is_terminal(&self) -> bool {
        self.winner().is_some() || self.is_full()
    }

    /// Base-3 key of the board as seen by `player`: `0` empty, `1` the
    /// player's own mark, `2` the opponent's.
    pub fn perspective_key(&self, player: PlayerId) -> String {
        self.cells
            .iter()
            .map(|cell| match cell.owner() {
                None => '0',
                Some(owner) if owner == player => '1',
                Some(_) => '2',
            })
            .collect()
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new(3)
    }
}

impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, &cell) in self.cells.iter().enumerate() {
            write!(f, "{}", cell.to_char())?;
            if (i + 1).is_multiple_of(self.size) && i + 1 < self.cells.len() {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
