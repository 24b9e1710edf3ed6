use crate::command::{contains_ignore_case, require_name, Command};
use crate::error::RconError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpStatus {
    Success,
    /// The player already had (or already lacked) operator status.
    NoChange,
    NotFound,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpResult {
    pub status: OpStatus,
    pub player_name: String,
    pub message: String,
}

pub fn give_op(name: &str) -> Result<OpChange, RconError> {
    require_name(name, "player name")?;
    Ok(OpChange {
        player_name: name.to_string(),
        grant: true,
    })
}

pub fn remove_op(name: &str) -> Result<OpChange, RconError> {
    require_name(name, "player name")?;
    Ok(OpChange {
        player_name: name.to_string(),
        grant: false,
    })
}

/// `op` or `deop` for a single player.
#[derive(Debug, Clone)]
pub struct OpChange {
    player_name: String,
    grant: bool,
}

impl Command for OpChange {
    type Output = OpResult;
    type Error = RconError;

    fn build(&self) -> String {
        if self.grant {
            format!("op {}", self.player_name)
        } else {
            format!("deop {}", self.player_name)
        }
    }

    fn parse(&self, response: &str) -> Result<OpResult, RconError> {
        let (changed, unchanged) = if self.grant {
            ("server operator", "already")
        } else {
            ("no longer", "not an operator")
        };

        let status = if contains_ignore_case(response, "Made")
            && contains_ignore_case(response, changed)
        {
            OpStatus::Success
        } else if contains_ignore_case(response, "Nothing changed")
            && contains_ignore_case(response, unchanged)
        {
            OpStatus::NoChange
        } else if contains_ignore_case(response, "No player") {
            OpStatus::NotFound
        } else {
            OpStatus::Unknown
        };

        Ok(OpResult {
            status,
            player_name: self.player_name.clone(),
            message: response.to_string(),
        })
    }
}
