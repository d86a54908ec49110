use serde::{Deserialize, Serialize};

use crate::core::{config::GRID_SIZE, Card, CardToken, Grid, SessionError};

/// Decoded query string, in order. Keys may repeat.
pub type QueryPairs = Vec<(String, String)>;

/// First value given for `key`. Later repeats are ignored.
pub fn first_param(pairs: &[(String, String)], key: &str) -> Option<String> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
}

/// Query carrying a game code (`?bcode=`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CodeQuery {
    pub bcode: Option<String>,
}

impl CodeQuery {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            bcode: first_param(pairs, "bcode"),
        }
    }
}

/// Query carrying a card token (`?playcard_token=`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenQuery {
    pub playcard_token: Option<String>,
}

impl TokenQuery {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            playcard_token: first_param(pairs, "playcard_token"),
        }
    }
}

/// `/checkwin` reply. `result` is `"1"` for a winner and `"0"` otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckWinBody {
    pub result: String,
}

impl CheckWinBody {
    pub fn from_win(won: bool) -> Self {
        Self {
            result: if won { "1" } else { "0" }.to_string(),
        }
    }

    pub fn is_win(&self) -> bool {
        crate::protocol::parse_win_signal(&self.result)
    }
}

/// `/dashboard` success reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardBody {
    pub valid: bool,
    pub bcode: String,
}

/// `/newgame` success reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGameBody {
    pub bcode: String,
    pub url: String,
}

/// Error reply shared by every proxy endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// `/getcard` success reply: the card already transposed to rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardBody {
    pub playcard_token: String,
    pub card: [[u32; GRID_SIZE]; GRID_SIZE],
}

impl From<&Card> for CardBody {
    fn from(card: &Card) -> Self {
        CardBody {
            playcard_token: card.token().to_string(),
            card: *card.grid().rows(),
        }
    }
}

impl TryFrom<CardBody> for Card {
    type Error = SessionError;

    fn try_from(body: CardBody) -> Result<Self, Self::Error> {
        Ok(Card::new(
            CardToken::new(&body.playcard_token)?,
            Grid::from_rows(body.card),
        ))
    }
}
