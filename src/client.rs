use std::fmt;
use std::sync::Arc;

use futures::future::join_all;
use log::{info, warn};

use crate::core::{
    Board, CardCheck, CellId, CheckOutcome, GameCode, Phase, Session, SessionError, WinReport,
};
use crate::transport::{BingoApi, NewGame, ServiceError};

/// Lobby and board failures. All of them are recoverable: the session stays
/// where it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// No game code was entered.
    MissingCode,
    /// The service has no live game for this code.
    InvalidCode(GameCode),
    /// The service could not be reached while validating a code.
    Connection(ServiceError),
    /// Creating a new game failed.
    CreateFailed(ServiceError),
    /// The service dealt no card, or could not be reached.
    NoCard(Option<ServiceError>),
    Session(SessionError),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::MissingCode => write!(f, "Please enter a game code"),
            ClientError::InvalidCode(code) => {
                write!(f, "Invalid game code or game not found: {}", code)
            }
            ClientError::Connection(e) => write!(f, "Failed to connect to game server ({})", e),
            ClientError::CreateFailed(e) => write!(f, "Failed to create new game ({})", e),
            ClientError::NoCard(None) => write!(f, "Invalid game code or no cards available"),
            ClientError::NoCard(Some(e)) => write!(f, "Failed to fetch card from server ({})", e),
            ClientError::Session(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<SessionError> for ClientError {
    fn from(err: SessionError) -> Self {
        ClientError::Session(err)
    }
}

/// Result of entering a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Joined {
    pub code: GameCode,
    /// Host dashboard, known only for games created by this client.
    pub dashboard_url: Option<String>,
    /// Index of the first card, or why it could not be acquired. The game is
    /// joined either way.
    pub first_card: Result<usize, ClientError>,
}

/// Drives a `Session` through a Bingo service.
///
/// State only changes once the remote call behind it has succeeded. Methods
/// that change state take `&mut self`, so a second join or create cannot
/// start while one is outstanding.
pub struct BingoClient {
    api: Arc<dyn BingoApi>,
    session: Session,
}

impl BingoClient {
    pub fn new(api: Arc<dyn BingoApi>) -> Self {
        Self {
            api,
            session: Session::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn phase(&self) -> &Phase {
        self.session.phase()
    }

    pub fn board(&self) -> Result<&Board, ClientError> {
        Ok(self.session.board()?)
    }

    /// Validate a typed code by probing for a card, then join the game and
    /// acquire the first card.
    ///
    /// The probe card is discarded. A failed first card leaves the game
    /// joined with an empty board.
    pub async fn join(&mut self, input: &str) -> Result<Joined, ClientError> {
        if self.session.in_game() {
            return Err(SessionError::AlreadyInGame.into());
        }
        let code = GameCode::new(input).map_err(|_| ClientError::MissingCode)?;
        match self.api.get_card(&code).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                warn!("[BingoClient] invalid game code {}", code);
                return Err(ClientError::InvalidCode(code));
            }
            Err(e) => {
                warn!("[BingoClient] validating {} failed: {}", code, e);
                return Err(ClientError::Connection(e));
            }
        }
        self.enter(code, None).await
    }

    /// Create a new game and join it.
    pub async fn create(&mut self) -> Result<Joined, ClientError> {
        if self.session.in_game() {
            return Err(SessionError::AlreadyInGame.into());
        }
        let game = self.api.new_game().await.map_err(|e| {
            warn!("[BingoClient] creating a game failed: {}", e);
            ClientError::CreateFailed(e)
        })?;
        let NewGame {
            code,
            dashboard_url,
        } = game;
        self.enter(code, Some(dashboard_url)).await
    }

    async fn enter(
        &mut self,
        code: GameCode,
        dashboard_url: Option<String>,
    ) -> Result<Joined, ClientError> {
        self.session.join(code.clone())?;
        info!("[BingoClient] joined game {}", code);
        let first_card = self.add_card().await;
        if let Err(e) = &first_card {
            warn!("[BingoClient] first card for {} failed: {}", code, e);
        }
        Ok(Joined {
            code,
            dashboard_url,
            first_card,
        })
    }

    /// Leave the game, dropping every card and mark.
    pub fn exit(&mut self) -> Option<Board> {
        let board = self.session.exit();
        if let Some(board) = &board {
            info!("[BingoClient] left game {}", board.code());
        }
        board
    }

    /// Request one more card for the joined game and return its index.
    /// On failure the held cards are untouched.
    pub async fn add_card(&mut self) -> Result<usize, ClientError> {
        let code = self.session.board()?.code().clone();
        let card = match self.api.get_card(&code).await {
            Ok(Some(card)) => card,
            Ok(None) => return Err(ClientError::NoCard(None)),
            Err(e) => return Err(ClientError::NoCard(Some(e))),
        };
        let token = card.token().clone();
        let index = self.session.board_mut()?.add_card(card)?;
        info!("[BingoClient] holding card {} ({})", index + 1, token);
        Ok(index)
    }

    /// Flip a cell and return whether it is now marked.
    pub fn toggle_mark(&mut self, cell: CellId) -> Result<bool, ClientError> {
        Ok(self.session.board_mut()?.toggle_mark(cell)?)
    }

    /// Check every held card concurrently.
    ///
    /// The report is built only after every check has resolved. A check that
    /// fails is recorded as `Failed` and does not affect the others.
    pub async fn check_win(&self) -> Result<WinReport, ClientError> {
        let board = self.session.board()?;
        let api = &self.api;
        let checks = board.cards().iter().enumerate().map(|(index, card)| {
            let token = card.token().clone();
            async move {
                let outcome = match api.check_win(&token).await {
                    Ok(true) => CheckOutcome::Winner,
                    Ok(false) => CheckOutcome::NotWinner,
                    Err(e) => {
                        warn!("[BingoClient] win check for card {} failed: {}", index + 1, e);
                        CheckOutcome::Failed
                    }
                };
                CardCheck {
                    index,
                    token,
                    outcome,
                }
            }
        });
        let report = WinReport::new(join_all(checks).await);
        info!(
            "[BingoClient] checked {} cards, winners: {:?}",
            report.len(),
            report.winning_indices()
        );
        Ok(report)
    }
}
