//! Offline stand-in for the hosted Bingo service.
//!
//! Deals cards with the usual column ranges, calls numbers without
//! repetition and decides wins from its own draw history, the same
//! authority split as the real service.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{debug, info};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::core::{
    config::{is_free_cell, COLUMN_RANGES, GRID_SIZE, MAX_NUMBER},
    Card, CardToken, GameCode, Grid,
};
use crate::transport::{BingoApi, NewGame, ServiceError};

const CODE_LEN: usize = 8;
const TOKEN_LEN: usize = 16;
const ALPHANUMERIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Dashboard URL reported for games created offline.
pub const LOCAL_DASHBOARD: &str = "local://dashboard";

#[derive(Debug, Default)]
struct Room {
    /// Every number not yet called, in the order it will be called.
    pending: Vec<u32>,
    called: Vec<u32>,
    cards: HashMap<CardToken, Grid>,
}

impl Room {
    fn new(rng: &mut SmallRng) -> Self {
        let mut pending: Vec<u32> = (1..=MAX_NUMBER).collect();
        pending.shuffle(rng);
        Self {
            pending,
            ..Self::default()
        }
    }

    fn is_called(&self, n: u32) -> bool {
        self.called.contains(&n)
    }

    fn covered(&self, grid: &Grid, row: usize, col: usize) -> bool {
        is_free_cell(row, col) || grid.number(row, col).is_some_and(|n| self.is_called(n))
    }

    fn has_bingo(&self, grid: &Grid) -> bool {
        let rows = (0..GRID_SIZE).any(|r| (0..GRID_SIZE).all(|c| self.covered(grid, r, c)));
        let cols = (0..GRID_SIZE).any(|c| (0..GRID_SIZE).all(|r| self.covered(grid, r, c)));
        let diag = (0..GRID_SIZE).all(|i| self.covered(grid, i, i));
        let anti = (0..GRID_SIZE).all(|i| self.covered(grid, i, GRID_SIZE - 1 - i));
        rows || cols || diag || anti
    }
}

#[derive(Debug)]
struct State {
    rng: SmallRng,
    rooms: HashMap<GameCode, Room>,
    /// Game each dealt token belongs to.
    tokens: HashMap<CardToken, GameCode>,
}

/// In-process Bingo service.
#[derive(Debug)]
pub struct InMemoryService {
    state: Mutex<State>,
}

impl InMemoryService {
    pub fn new() -> Self {
        let mut seed_rng = rand::rng();
        Self::with_rng(SmallRng::from_rng(&mut seed_rng))
    }

    /// Service whose codes, tokens, cards and draw order are reproducible.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(SmallRng::seed_from_u64(seed))
    }

    fn with_rng(rng: SmallRng) -> Self {
        Self {
            state: Mutex::new(State {
                rng,
                rooms: HashMap::new(),
                tokens: HashMap::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create a game without going through the async API.
    pub fn create_game(&self) -> GameCode {
        let mut state = self.lock();
        loop {
            let code = random_string(&mut state.rng, CODE_LEN);
            let Ok(code) = GameCode::new(&code) else {
                continue;
            };
            if state.rooms.contains_key(&code) {
                continue;
            }
            let room = Room::new(&mut state.rng);
            state.rooms.insert(code.clone(), room);
            info!("[InMemoryService] created game {}", code);
            return code;
        }
    }

    /// Call the next number for a game. `None` when the code is unknown or
    /// every number has been called.
    pub fn draw(&self, code: &GameCode) -> Option<u32> {
        let mut state = self.lock();
        let room = state.rooms.get_mut(code)?;
        let n = room.pending.pop()?;
        room.called.push(n);
        debug!("[InMemoryService] {} called {}", code, n);
        Some(n)
    }

    /// Numbers called so far for a game, in call order.
    pub fn called(&self, code: &GameCode) -> Vec<u32> {
        self.lock()
            .rooms
            .get(code)
            .map(|room| room.called.clone())
            .unwrap_or_default()
    }

    /// Deal a card without going through the async API.
    pub fn deal(&self, code: &GameCode) -> Option<Card> {
        let mut guard = self.lock();
        let state = &mut *guard;
        let room = state.rooms.get_mut(code)?;
        let grid = random_grid(&mut state.rng);
        let token = loop {
            let candidate = random_string(&mut state.rng, TOKEN_LEN);
            if let Ok(token) = CardToken::new(&candidate) {
                if !state.tokens.contains_key(&token) {
                    break token;
                }
            }
        };
        room.cards.insert(token.clone(), grid);
        state.tokens.insert(token.clone(), code.clone());
        Some(Card::new(token, grid))
    }

    /// Whether a dealt card currently holds a full line. Unknown tokens never
    /// win.
    pub fn is_winner(&self, token: &CardToken) -> bool {
        let state = self.lock();
        let Some(room) = state.tokens.get(token).and_then(|code| state.rooms.get(code)) else {
            return false;
        };
        room.cards
            .get(token)
            .is_some_and(|grid| room.has_bingo(grid))
    }
}

impl Default for InMemoryService {
    fn default() -> Self {
        Self::new()
    }
}

fn random_string(rng: &mut SmallRng, len: usize) -> String {
    (0..len)
        .map(|_| ALPHANUMERIC[rng.random_range(0..ALPHANUMERIC.len())] as char)
        .collect()
}

fn random_grid(rng: &mut SmallRng) -> Grid {
    let mut columns = [[0u32; GRID_SIZE]; GRID_SIZE];
    for (column, &(low, high)) in columns.iter_mut().zip(COLUMN_RANGES.iter()) {
        let mut pool: Vec<u32> = (low..=high).collect();
        pool.shuffle(rng);
        column.copy_from_slice(&pool[..GRID_SIZE]);
    }
    let mut rows = [[0u32; GRID_SIZE]; GRID_SIZE];
    for (r, row) in rows.iter_mut().enumerate() {
        for (c, cell) in row.iter_mut().enumerate() {
            *cell = if is_free_cell(r, c) { 0 } else { columns[c][r] };
        }
    }
    Grid::from_rows(rows)
}

#[async_trait::async_trait]
impl BingoApi for InMemoryService {
    async fn new_game(&self) -> Result<NewGame, ServiceError> {
        let code = self.create_game();
        Ok(NewGame {
            dashboard_url: format!("{}?bcode={}", LOCAL_DASHBOARD, code),
            code,
        })
    }

    async fn get_card(&self, code: &GameCode) -> Result<Option<Card>, ServiceError> {
        Ok(self.deal(code))
    }

    async fn check_win(&self, token: &CardToken) -> Result<bool, ServiceError> {
        Ok(self.is_winner(token))
    }
}
