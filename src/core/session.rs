//! Session lifecycle: `Lobby -> InGame -> Lobby`.
//!
//! `Session` is pure state. The async side (talking to the service) lives in
//! `BingoClient`, which only moves the session forward once a remote call
//! has succeeded.

use alloc::vec::Vec;

use super::card::{Card, GameCode};
use super::common::SessionError;
use super::marks::{CellId, MarkedCells};

/// State owned by a joined game. Dropped on exit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    code: GameCode,
    cards: Vec<Card>,
    marks: MarkedCells,
}

impl Board {
    pub fn new(code: GameCode) -> Self {
        Self {
            code,
            cards: Vec::new(),
            marks: MarkedCells::new(),
        }
    }

    pub fn code(&self) -> &GameCode {
        &self.code
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    pub fn marks(&self) -> &MarkedCells {
        &self.marks
    }

    /// Append a card and return its index. A token already held is rejected
    /// and the card list is left unchanged.
    pub fn add_card(&mut self, card: Card) -> Result<usize, SessionError> {
        if self.cards.iter().any(|held| held.token() == card.token()) {
            return Err(SessionError::DuplicateToken);
        }
        self.cards.push(card);
        Ok(self.cards.len() - 1)
    }

    /// Flip a cell on a held card and return whether it is now marked.
    pub fn toggle_mark(&mut self, cell: CellId) -> Result<bool, SessionError> {
        self.ensure_card(cell.card)?;
        self.marks.toggle(cell)
    }

    pub fn mark(&mut self, cell: CellId) -> Result<(), SessionError> {
        self.ensure_card(cell.card)?;
        self.marks.mark(cell)
    }

    pub fn unmark(&mut self, cell: CellId) -> Result<(), SessionError> {
        self.ensure_card(cell.card)?;
        self.marks.unmark(cell)
    }

    pub fn is_marked(&self, cell: CellId) -> bool {
        self.marks.is_marked(cell)
    }

    fn ensure_card(&self, index: usize) -> Result<(), SessionError> {
        if index < self.cards.len() {
            Ok(())
        } else {
            Err(SessionError::CardNotFound)
        }
    }
}

/// Where the player currently is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Lobby,
    InGame(Board),
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    phase: Phase,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn in_game(&self) -> bool {
        matches!(self.phase, Phase::InGame(_))
    }

    /// Enter a game with an empty board.
    pub fn join(&mut self, code: GameCode) -> Result<&mut Board, SessionError> {
        if self.in_game() {
            return Err(SessionError::AlreadyInGame);
        }
        self.phase = Phase::InGame(Board::new(code));
        self.board_mut()
    }

    /// Leave the current game and return to the lobby, discarding every card
    /// and mark. Returns the board that was torn down, if any.
    pub fn exit(&mut self) -> Option<Board> {
        match core::mem::take(&mut self.phase) {
            Phase::InGame(board) => Some(board),
            Phase::Lobby => None,
        }
    }

    pub fn board(&self) -> Result<&Board, SessionError> {
        match &self.phase {
            Phase::InGame(board) => Ok(board),
            Phase::Lobby => Err(SessionError::NotInGame),
        }
    }

    pub fn board_mut(&mut self) -> Result<&mut Board, SessionError> {
        match &mut self.phase {
            Phase::InGame(board) => Ok(board),
            Phase::Lobby => Err(SessionError::NotInGame),
        }
    }
}
