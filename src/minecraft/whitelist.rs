use crate::command::{contains_ignore_case, require_name, Command};
use crate::error::RconError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModificationStatus {
    Success,
    AlreadyWhitelisted,
    NotWhitelisted,
    /// The server could not resolve the name to an account.
    PlayerDoesNotExist,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModificationResult {
    pub status: ModificationStatus,
    pub player_name: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WhitelistList {
    pub players: Vec<String>,
}

impl WhitelistList {
    pub fn count(&self) -> usize {
        self.players.len()
    }
}

/// Result of `whitelist on` or `whitelist off`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleResult {
    /// The state the whitelist is in afterwards.
    pub enabled: bool,
    /// `false` if the whitelist was already in that state.
    pub changed: bool,
    pub message: String,
}

pub fn add(name: &str) -> Result<Modify, RconError> {
    require_name(name, "player name")?;
    Ok(Modify {
        player_name: name.to_string(),
        add: true,
    })
}

pub fn remove(name: &str) -> Result<Modify, RconError> {
    require_name(name, "player name")?;
    Ok(Modify {
        player_name: name.to_string(),
        add: false,
    })
}

pub fn list() -> List {
    List
}

pub fn on() -> Toggle {
    Toggle { enable: true }
}

pub fn off() -> Toggle {
    Toggle { enable: false }
}

pub fn reload() -> Reload {
    Reload
}

/// `whitelist add` or `whitelist remove`.
#[derive(Debug, Clone)]
pub struct Modify {
    player_name: String,
    add: bool,
}

impl Command for Modify {
    type Output = ModificationResult;
    type Error = RconError;

    fn build(&self) -> String {
        if self.add {
            format!("whitelist add {}", self.player_name)
        } else {
            format!("whitelist remove {}", self.player_name)
        }
    }

    fn parse(&self, response: &str) -> Result<ModificationResult, RconError> {
        let has = |needle: &str| contains_ignore_case(response, needle);

        let status = if self.add {
            if has("Added") {
                ModificationStatus::Success
            } else if has("already whitelisted") {
                ModificationStatus::AlreadyWhitelisted
            } else if has("does not exist") {
                ModificationStatus::PlayerDoesNotExist
            } else {
                ModificationStatus::Unknown
            }
        } else if has("Removed") {
            ModificationStatus::Success
        } else if has("not whitelisted") {
            ModificationStatus::NotWhitelisted
        } else {
            ModificationStatus::Unknown
        };

        Ok(ModificationResult {
            status,
            player_name: self.player_name.clone(),
            message: response.to_string(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct List;

impl Command for List {
    type Output = WhitelistList;
    type Error = RconError;

    fn build(&self) -> String {
        "whitelist list".into()
    }

    // There are 2 whitelisted player(s): Steve, Alex
    fn parse(&self, response: &str) -> Result<WhitelistList, RconError> {
        if !response.contains("whitelisted player") {
            return Ok(WhitelistList::default());
        }

        let players = match response.split_once(':') {
            Some((_, names)) => names
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect(),
            None => Vec::new(),
        };

        Ok(WhitelistList { players })
    }
}

#[derive(Debug, Clone)]
pub struct Toggle {
    enable: bool,
}

impl Command for Toggle {
    type Output = ToggleResult;
    type Error = RconError;

    fn build(&self) -> String {
        if self.enable {
            "whitelist on".into()
        } else {
            "whitelist off".into()
        }
    }

    fn parse(&self, response: &str) -> Result<ToggleResult, RconError> {
        let marker = if self.enable {
            "now turned on"
        } else {
            "now turned off"
        };

        Ok(ToggleResult {
            enabled: self.enable,
            changed: response.contains(marker),
            message: response.to_string(),
        })
    }
}

/// `whitelist reload`. The reply is returned as is.
#[derive(Debug, Clone)]
pub struct Reload;

impl Command for Reload {
    type Output = String;
    type Error = RconError;

    fn build(&self) -> String {
        "whitelist reload".into()
    }

    fn parse(&self, response: &str) -> Result<String, RconError> {
        Ok(response.to_string())
    }
}
