//! Interactive terminal front end.
//!
//! Plays the part of the presentation layer: reads commands, drives a
//! `BingoClient`, prints cards and results.

pub mod interface;

pub use interface::*;

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::client::{BingoClient, Joined};
use crate::core::{
    config::{column_for_number, column_index, COLUMN_LETTERS, GRID_SIZE},
    CellId, SessionError,
};
use crate::transport::in_memory::InMemoryService;

/// A parsed user command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Join(String),
    New,
    Add,
    /// Toggle a mark. Fields are zero-based.
    Mark { card: usize, row: usize, col: usize },
    Cards,
    Check,
    /// Call the next number (offline games only).
    Draw,
    Exit,
    Help,
    Quit,
}

pub const HELP: &str = "\
Lobby:
  join <code>        join an existing game
  new                create a new game and join it
  quit               leave the program
In game:
  add                request another card
  mark <card> <cell> mark or unmark a cell, e.g. `mark 1 B3`
  cards              show your cards
  check              check every card for a win
  draw               call the next number (offline games only)
  exit               return to the lobby";

/// Parse a cell such as `B3` (column letter, 1-based row) into `(row, col)`.
pub fn parse_cell(input: &str) -> Result<(usize, usize), String> {
    let mut chars = input.trim().chars();
    let letter = chars.next().ok_or("Empty cell - use a column letter and row, e.g. B3")?;
    let col = column_index(letter).ok_or_else(|| {
        format!(
            "Invalid column '{}' - must be one of {}",
            letter,
            COLUMN_LETTERS.iter().collect::<String>()
        )
    })?;
    let row_str: String = chars.collect();
    let row: usize = row_str
        .parse()
        .map_err(|_| format!("Invalid row '{}' - must be a number 1-{}", row_str, GRID_SIZE))?;
    if row == 0 || row > GRID_SIZE {
        return Err(format!("Row {} out of bounds - must be 1-{}", row, GRID_SIZE));
    }
    Ok((row - 1, col))
}

/// Parse one input line.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Err("Empty command - type `help`".to_string());
    };
    let args: Vec<&str> = words.collect();
    match (verb.to_ascii_lowercase().as_str(), args.as_slice()) {
        ("join", [code]) => Ok(Command::Join(code.to_string())),
        ("join", _) => Err("Usage: join <code>".to_string()),
        ("new", []) => Ok(Command::New),
        ("add", []) => Ok(Command::Add),
        ("mark", [card, cell]) => {
            let card: usize = card
                .parse()
                .ok()
                .filter(|&n: &usize| n > 0)
                .ok_or_else(|| format!("Invalid card number '{}'", card))?;
            let (row, col) = parse_cell(cell)?;
            Ok(Command::Mark {
                card: card - 1,
                row,
                col,
            })
        }
        ("mark", _) => Err("Usage: mark <card> <cell>, e.g. mark 1 B3".to_string()),
        ("cards", []) => Ok(Command::Cards),
        ("check", []) => Ok(Command::Check),
        ("draw", []) => Ok(Command::Draw),
        ("exit", []) => Ok(Command::Exit),
        ("help", _) => Ok(Command::Help),
        ("quit", []) => Ok(Command::Quit),
        (other, _) => Err(format!("Unknown command '{}' - type `help`", other)),
    }
}

fn print_joined(client: &BingoClient, joined: &Joined) {
    println!("Joined game {}", joined.code);
    if let Some(url) = &joined.dashboard_url {
        println!("Host dashboard: {}", url);
    }
    if let Err(e) = &joined.first_card {
        println!("{}", e);
    }
    if let Ok(board) = client.board() {
        println!("{}", render_board(board));
    }
}

/// Run one command. Returns `false` when the loop should stop.
pub async fn execute(
    client: &mut BingoClient,
    local: Option<&InMemoryService>,
    command: Command,
) -> bool {
    match command {
        Command::Join(code) => match client.join(&code).await {
            Ok(joined) => print_joined(client, &joined),
            Err(e) => println!("{}", e),
        },
        Command::New => {
            println!("Creating new game...");
            match client.create().await {
                Ok(joined) => {
                    println!("Game Created! Your game code is: {}", joined.code);
                    print_joined(client, &joined);
                }
                Err(e) => println!("{}", e),
            }
        }
        Command::Add => match client.add_card().await {
            Ok(index) => {
                println!("Card Added! You now have {}", card_count(index + 1));
                if let Some(card) = client.board().ok().and_then(|b| render_card(b, index)) {
                    println!("{}", card);
                }
            }
            Err(e) => println!("{}", e),
        },
        Command::Mark { card, row, col } => {
            match client.toggle_mark(CellId::new(card, row, col)) {
                Ok(_) => {
                    if let Some(text) = client.board().ok().and_then(|b| render_card(b, card)) {
                        println!("{}", text);
                    }
                }
                Err(e) => println!("{}", e),
            }
        }
        Command::Cards => match client.board() {
            Ok(board) => println!("{}", render_board(board)),
            Err(e) => println!("{}", e),
        },
        Command::Check => {
            println!("Checking all cards...");
            match client.check_win().await {
                Ok(report) if report.is_empty() => println!("No cards to check."),
                Ok(report) => println!("{}", render_report(&report)),
                Err(e) => println!("{}", e),
            }
        }
        Command::Draw => match (local, client.board()) {
            (Some(service), Ok(board)) => match service.draw(board.code()) {
                Some(n) => {
                    let letter = column_for_number(n).map_or('?', |c| COLUMN_LETTERS[c]);
                    println!("Called: {}-{}", letter, n);
                }
                None => println!("Every number has been called."),
            },
            (None, _) => println!("Numbers are called from the host dashboard."),
            (_, Err(e)) => println!("{}", e),
        },
        Command::Exit => match client.exit() {
            Some(_) => println!("Back in the lobby."),
            None => println!("{}", SessionError::NotInGame),
        },
        Command::Help => println!("{}", HELP),
        Command::Quit => return false,
    }
    true
}

/// Read commands from `input` until `quit` or end of input. The client is
/// left in whatever state the last command put it in.
pub async fn run_cli<R>(
    client: &mut BingoClient,
    local: Option<Arc<InMemoryService>>,
    input: R,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    println!("BINGO - join a game and play to win. Type `help` for commands.");
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let keep_going = match parse_command(&line) {
            Ok(command) => execute(client, local.as_deref(), command).await,
            Err(e) => {
                println!("{}", e);
                true
            }
        };
        if !keep_going {
            break;
        }
    }
    Ok(())
}
