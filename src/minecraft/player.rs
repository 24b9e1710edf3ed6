use crate::command::{contains_ignore_case, require_name, Command};
use crate::error::RconError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub name: String,
    /// Only present when the list was requested with UUIDs.
    pub uuid: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerList {
    pub players: Vec<Player>,
    pub online_count: u32,
    pub max_players: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerActionStatus {
    Success,
    NotFound,
    NoEntity,
    Unknown,
}

/// Result of a kick, kill or teleport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerActionResult {
    pub status: PlayerActionStatus,
    pub player_name: String,
    /// The server's reply, verbatim.
    pub message: String,
}

pub fn list_players(include_uuids: bool) -> ListPlayers {
    ListPlayers { include_uuids }
}

pub fn kick_player(name: &str, reason: &str) -> Result<PlayerAction, RconError> {
    require_name(name, "player name")?;
    let command = if reason.is_empty() {
        format!("kick {name}")
    } else {
        format!("kick {name} {reason}")
    };

    Ok(PlayerAction::new(name, command, "Kicked"))
}

pub fn kill_player(name: &str) -> Result<PlayerAction, RconError> {
    require_name(name, "player name")?;
    Ok(PlayerAction::new(name, format!("kill {name}"), "Killed"))
}

pub fn teleport_player(name: &str, x: f64, y: f64, z: f64) -> Result<PlayerAction, RconError> {
    require_name(name, "player name")?;
    Ok(PlayerAction::new(
        name,
        format!("teleport {name} {x} {y} {z}"),
        "Teleported",
    ))
}

#[derive(Debug, Clone)]
pub struct ListPlayers {
    include_uuids: bool,
}

impl Command for ListPlayers {
    type Output = PlayerList;
    type Error = RconError;

    fn build(&self) -> String {
        if self.include_uuids {
            "list uuids".into()
        } else {
            "list".into()
        }
    }

    // There are 2 of a max of 20 players online: Steve, Alex (069a79f4-44e9-4726-a5be-fca90e38aaf5)
    fn parse(&self, response: &str) -> Result<PlayerList, RconError> {
        let (online_count, max_players) = parse_counts(response).unwrap_or((0, 0));
        let mut list = PlayerList {
            players: Vec::new(),
            online_count,
            max_players,
        };

        let names = match response.split_once(':') {
            Some((_, names)) if online_count > 0 => names,
            _ => return Ok(list),
        };

        for entry in names.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let player = match entry.rfind('(') {
                Some(open) if self.include_uuids && entry.ends_with(')') => Player {
                    name: entry[..open].trim().to_string(),
                    uuid: Some(entry[open + 1..entry.len() - 1].trim().to_string()),
                },
                _ => Player {
                    name: entry.to_string(),
                    uuid: None,
                },
            };
            list.players.push(player);
        }

        Ok(list)
    }
}

fn parse_counts(response: &str) -> Option<(u32, u32)> {
    let rest = &response[response.find("There are ")? + "There are ".len()..];
    let (online, rest) = rest.split_once(" of a max of ")?;
    let max: String = rest.chars().take_while(char::is_ascii_digit).collect();

    Some((online.trim().parse().ok()?, max.parse().ok()?))
}

#[derive(Debug, Clone)]
pub struct PlayerAction {
    player_name: String,
    command: String,
    success_marker: &'static str,
}

impl PlayerAction {
    fn new(player_name: &str, command: String, success_marker: &'static str) -> Self {
        PlayerAction {
            player_name: player_name.to_string(),
            command,
            success_marker,
        }
    }
}

impl Command for PlayerAction {
    type Output = PlayerActionResult;
    type Error = RconError;

    fn build(&self) -> String {
        self.command.clone()
    }

    fn parse(&self, response: &str) -> Result<PlayerActionResult, RconError> {
        let status = if contains_ignore_case(response, self.success_marker) {
            PlayerActionStatus::Success
        } else if contains_ignore_case(response, "No player") {
            PlayerActionStatus::NotFound
        } else if contains_ignore_case(response, "No entity") {
            PlayerActionStatus::NoEntity
        } else {
            PlayerActionStatus::Unknown
        };

        Ok(PlayerActionResult {
            status,
            player_name: self.player_name.clone(),
            message: response.to_string(),
        })
    }
}
