//! Bingo session core (no_std compatible)
//!
//! Cards, marks, the lobby/game state machine and win-report aggregation.
//! Nothing in here performs I/O; it builds on `alloc` only.

pub mod card;
pub mod common;
pub mod config;
pub mod marks;
pub mod session;
pub mod win;

pub use card::{Card, CardToken, GameCode, Grid};
pub use common::SessionError;
pub use config::*;
pub use marks::{CellId, MarkedCells};
pub use session::{Board, Phase, Session};
pub use win::{CardCheck, CheckOutcome, WinReport};
