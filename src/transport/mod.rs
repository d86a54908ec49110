use std::fmt;

use crate::core::{Card, CardToken, GameCode};

/// A freshly created game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGame {
    pub code: GameCode,
    /// Host dashboard where the game's numbers are called.
    pub dashboard_url: String,
}

/// Failure talking to a Bingo service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The service could not be reached (connect error, timeout, I/O).
    Unreachable(String),
    /// The service answered with a non-success HTTP status.
    Status(u16),
    /// The service answered, but the body could not be understood.
    Malformed(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Unreachable(e) => write!(f, "service unreachable: {}", e),
            ServiceError::Status(code) => write!(f, "service answered with status {}", code),
            ServiceError::Malformed(e) => write!(f, "malformed service reply: {}", e),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            ServiceError::Status(status.as_u16())
        } else if err.is_decode() {
            ServiceError::Malformed(err.to_string())
        } else {
            ServiceError::Unreachable(err.to_string())
        }
    }
}

/// Operations the client needs from a Bingo service.
///
/// Every call is single-shot: implementations never retry.
#[async_trait::async_trait]
pub trait BingoApi: Send + Sync {
    /// Create a new game.
    async fn new_game(&self) -> Result<NewGame, ServiceError>;

    /// Deal a card for `code`. `Ok(None)` means the service answered but had
    /// no card for that code.
    async fn get_card(&self, code: &GameCode) -> Result<Option<Card>, ServiceError>;

    /// Ask whether the card identified by `token` has won.
    async fn check_win(&self, token: &CardToken) -> Result<bool, ServiceError>;
}

pub mod http;
pub mod in_memory;
pub mod proxy;
