//! Errors raised by the session core.

/// Errors returned by session, board and card operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// The game code was empty after trimming.
    EmptyCode,
    /// The card token was empty.
    EmptyToken,
    /// A card column held fewer than five numbers.
    MalformedCard,
    /// A card with this token is already held.
    DuplicateToken,
    /// No card is held at the given index.
    CardNotFound,
    /// Row or column outside the 5x5 grid.
    CellOutOfRange,
    /// The free cell cannot be marked or unmarked.
    FreeCell,
    /// Operation requires a joined game.
    NotInGame,
    /// A game is already joined.
    AlreadyInGame,
}

impl core::fmt::Display for SessionError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SessionError::EmptyCode => write!(f, "Game code is empty"),
            SessionError::EmptyToken => write!(f, "Card token is empty"),
            SessionError::MalformedCard => write!(f, "Card does not hold a full 5x5 grid"),
            SessionError::DuplicateToken => write!(f, "Card is already held"),
            SessionError::CardNotFound => write!(f, "No card at that index"),
            SessionError::CellOutOfRange => write!(f, "Cell is outside the card"),
            SessionError::FreeCell => write!(f, "The free cell is always marked"),
            SessionError::NotInGame => write!(f, "Not in a game"),
            SessionError::AlreadyInGame => write!(f, "Already in a game"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SessionError {}
