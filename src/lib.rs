#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod core;

#[cfg(feature = "std")]
pub mod cli;
#[cfg(feature = "std")]
pub mod client;
#[cfg(feature = "std")]
pub mod config;
#[cfg(feature = "std")]
mod logging;
#[cfg(feature = "std")]
pub mod protocol;
#[cfg(feature = "std")]
pub mod server;
#[cfg(feature = "std")]
pub mod transport;

pub use crate::core::*;

#[cfg(feature = "std")]
pub use client::{BingoClient, ClientError, Joined};
#[cfg(feature = "std")]
pub use config::ServiceConfig;
#[cfg(feature = "std")]
pub use logging::init_logging;
#[cfg(feature = "std")]
pub use server::{router, AppState};
#[cfg(feature = "std")]
pub use transport::{
    http::HttpTransport, in_memory::InMemoryService, proxy::ProxyClient, BingoApi, NewGame,
    ServiceError,
};
