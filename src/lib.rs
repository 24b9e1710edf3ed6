//! Pure Rust async implementation of the [Source RCON protocol](https://developer.valvesoftware.com/wiki/Source_RCON_Protocol).
pub mod client;
pub mod command;
pub mod config;
pub mod error;
pub mod minecraft;
pub mod packet;

pub use client::{Client, RconResponse};
pub use command::Command;
pub use error::RconError;
