//! Typed [`Command`](crate::command::Command)s for Minecraft: Java Edition
//! servers.
//!
//! Factory functions check their arguments up front and return
//! [`RconError::Validation`](crate::error::RconError::Validation) for names
//! that could never match a player.
//!
//! ```no_run
//! use rconlink::{client::Client, minecraft::player};
//!
//! # async fn run(client: &Client) -> Result<(), rconlink::error::RconError> {
//! let online = client.execute_typed(&player::list_players(false)).await?;
//! println!("{} of {} online", online.online_count, online.max_players);
//!
//! let kicked = client.execute_typed(&player::kick_player("Steve", "afk")?).await?;
//! println!("{:?}", kicked.status);
//! # Ok(())
//! # }
//! ```

pub mod ban;
pub mod difficulty;
pub mod op;
pub mod player;
pub mod server;
pub mod whitelist;
