//! Wire formats of the remote Bingo service and of the local proxy surface.

use serde_json::Value;

use crate::core::{
    config::{is_free_cell, COLUMN_LETTERS, GRID_SIZE},
    Card, CardToken, GameCode, Grid, SessionError,
};

pub mod domain;

pub use domain::*;

/// Remote endpoint that creates a game and answers with an HTML page.
pub const NEW_GAME_PATH: &str = "newbingogame.php";
/// Remote endpoint that deals a card for a game code.
pub const GET_CARD_PATH: &str = "getcard.php";
/// Remote endpoint that answers `0` or `1` for a card token.
pub const CHECK_WIN_PATH: &str = "checkwin.php";
/// Remote host dashboard page for a game code.
pub const DASHBOARD_PATH: &str = "bingodashboard.php";

/// Pull the game code out of the HTML returned by the new-game endpoint.
///
/// Looks for `<h1>`, optional whitespace, `Game Code:`, optional whitespace,
/// an alphanumeric run, optional whitespace and `</h1>`. Whitespace includes
/// Unicode spaces such as NBSP. Tags and the label match case-insensitively;
/// the code keeps its case.
pub fn extract_game_code(html: &str) -> Option<GameCode> {
    let lower = html.to_ascii_lowercase();
    let mut from = 0;
    while let Some(found) = lower[from..].find("<h1>") {
        let start = from + found + "<h1>".len();
        if let Some(code) = code_after_heading(html, &lower, start) {
            return Some(code);
        }
        from = start;
    }
    None
}

fn code_after_heading(html: &str, lower: &str, start: usize) -> Option<GameCode> {
    let label = "game code:";
    let rest = skip_whitespace(lower, start);
    if !lower[rest..].starts_with(label) {
        return None;
    }
    let code_start = skip_whitespace(lower, rest + label.len());
    let code_len = html[code_start..]
        .bytes()
        .take_while(|b| b.is_ascii_alphanumeric())
        .count();
    if code_len == 0 {
        return None;
    }
    let code_end = code_start + code_len;
    let close = skip_whitespace(lower, code_end);
    if !lower[close..].starts_with("</h1>") {
        return None;
    }
    GameCode::new(&html[code_start..code_end]).ok()
}

fn skip_whitespace(text: &str, from: usize) -> usize {
    text[from..]
        .char_indices()
        .find(|(_, ch)| !ch.is_whitespace())
        .map_or(text.len(), |(offset, _)| from + offset)
}

/// A win signal is truthy only when the body is exactly `1` (surrounding
/// whitespace ignored).
pub fn parse_win_signal(body: &str) -> bool {
    body.trim() == "1"
}

/// Decode the remote `getcard` reply.
///
/// `Ok(None)` covers the sentinel `0` and any reply without a token or card;
/// the remote service does not tell these apart. A card that is present but
/// does not hold a 5x5 grid is an error.
pub fn decode_remote_card(reply: &Value) -> Result<Option<Card>, SessionError> {
    let Some(object) = reply.as_object() else {
        return Ok(None);
    };
    let token = match object.get("playcard_token") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => return Ok(None),
    };
    let Some(columns) = object.get("card").filter(|c| !c.is_null()) else {
        return Ok(None);
    };

    let mut parsed: [[u32; GRID_SIZE]; GRID_SIZE] = [[0; GRID_SIZE]; GRID_SIZE];
    for (c, letter) in COLUMN_LETTERS.iter().enumerate() {
        let key = letter.to_string();
        let column = columns
            .get(&key)
            .or_else(|| columns.get(key.to_ascii_lowercase()))
            .and_then(Value::as_array)
            .ok_or(SessionError::MalformedCard)?;
        if column.len() < GRID_SIZE {
            return Err(SessionError::MalformedCard);
        }
        for (r, value) in column.iter().take(GRID_SIZE).enumerate() {
            parsed[c][r] = match cell_number(value) {
                Some(n) => n,
                None if is_free_cell(r, c) => 0,
                None => return Err(SessionError::MalformedCard),
            };
        }
    }

    let grid = Grid::from_columns([
        &parsed[0][..],
        &parsed[1][..],
        &parsed[2][..],
        &parsed[3][..],
        &parsed[4][..],
    ])?;
    Ok(Some(Card::new(CardToken::new(&token)?, grid)))
}

fn cell_number(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Host dashboard URL for a game, under the given remote base URL.
pub fn dashboard_url(base_url: &str, code: &GameCode) -> String {
    format!(
        "{}/{}?bcode={}",
        base_url.trim_end_matches('/'),
        DASHBOARD_PATH,
        code
    )
}
