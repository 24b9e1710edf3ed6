use crate::command::{contains_ignore_case, require_name, Command};
use crate::error::RconError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BanStatus {
    Success,
    AlreadyBanned,
    /// No such player, or (for pardons) the target was not banned.
    NotFound,
    Unknown,
}

/// Result of a ban or pardon, by name or by address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BanResult {
    pub status: BanStatus,
    /// The player name or IP address the command was issued for.
    pub target: String,
    /// Empty when no reason was given, and always for pardons.
    pub reason: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BanList {
    pub entries: Vec<String>,
}

impl BanList {
    pub fn count(&self) -> usize {
        self.entries.len()
    }
}

pub fn ban_player(name: &str, reason: &str) -> Result<BanChange, RconError> {
    require_name(name, "player name")?;
    Ok(BanChange::new(BanKind::Player, name, reason))
}

pub fn ban_ip(ip: &str, reason: &str) -> Result<BanChange, RconError> {
    require_name(ip, "IP address")?;
    Ok(BanChange::new(BanKind::Ip, ip, reason))
}

pub fn pardon(name: &str) -> Result<BanChange, RconError> {
    require_name(name, "player name")?;
    Ok(BanChange::new(BanKind::Pardon, name, ""))
}

pub fn pardon_ip(ip: &str) -> Result<BanChange, RconError> {
    require_name(ip, "IP address")?;
    Ok(BanChange::new(BanKind::PardonIp, ip, ""))
}

pub fn ban_list_players() -> ListBans {
    ListBans { ips: false }
}

pub fn ban_list_ips() -> ListBans {
    ListBans { ips: true }
}

#[derive(Debug, Clone, Copy)]
enum BanKind {
    Player,
    Ip,
    Pardon,
    PardonIp,
}

/// `ban`, `ban-ip`, `pardon` or `pardon-ip` for a single target.
#[derive(Debug, Clone)]
pub struct BanChange {
    kind: BanKind,
    target: String,
    reason: String,
}

impl BanChange {
    fn new(kind: BanKind, target: &str, reason: &str) -> Self {
        BanChange {
            kind,
            target: target.to_string(),
            reason: reason.to_string(),
        }
    }

    fn status(&self, response: &str) -> BanStatus {
        let has = |needle: &str| contains_ignore_case(response, needle);

        match self.kind {
            BanKind::Player if has("Banned player") => BanStatus::Success,
            BanKind::Ip if has("Banned IP") => BanStatus::Success,
            BanKind::Player | BanKind::Ip if has("already banned") => BanStatus::AlreadyBanned,
            BanKind::Player if has("not found") || has("no player") => BanStatus::NotFound,
            BanKind::Pardon if has("Unbanned") => BanStatus::Success,
            BanKind::PardonIp if has("Unbanned IP") => BanStatus::Success,
            BanKind::Pardon | BanKind::PardonIp if has("not banned") => BanStatus::NotFound,
            _ => BanStatus::Unknown,
        }
    }
}

impl Command for BanChange {
    type Output = BanResult;
    type Error = RconError;

    fn build(&self) -> String {
        let verb = match self.kind {
            BanKind::Player => "ban",
            BanKind::Ip => "ban-ip",
            BanKind::Pardon => "pardon",
            BanKind::PardonIp => "pardon-ip",
        };

        if self.reason.is_empty() {
            format!("{verb} {}", self.target)
        } else {
            format!("{verb} {} {}", self.target, self.reason)
        }
    }

    fn parse(&self, response: &str) -> Result<BanResult, RconError> {
        Ok(BanResult {
            status: self.status(response),
            target: self.target.clone(),
            reason: self.reason.clone(),
            message: response.to_string(),
        })
    }
}

/// `banlist players` or `banlist ips`.
#[derive(Debug, Clone)]
pub struct ListBans {
    ips: bool,
}

impl Command for ListBans {
    type Output = BanList;
    type Error = RconError;

    fn build(&self) -> String {
        if self.ips {
            "banlist ips".into()
        } else {
            "banlist players".into()
        }
    }

    // There are 2 ban(s):Steve was banned by Rcon: griefing, Alex was banned by Server: Banned by an operator.
    fn parse(&self, response: &str) -> Result<BanList, RconError> {
        if contains_ignore_case(response, "There are no bans") {
            return Ok(BanList::default());
        }

        let entries = match response.split_once(':') {
            Some((_, entries)) => entries,
            None => return Ok(BanList::default()),
        };

        let entries = entries
            .split(',')
            .map(|entry| {
                let entry = entry.trim();
                match entry.to_ascii_lowercase().find(" was banned by") {
                    Some(end) if end > 0 => &entry[..end],
                    _ => entry,
                }
            })
            .filter(|entry| !entry.is_empty())
            .map(str::to_string)
            .collect();

        Ok(BanList { entries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_ban_with_and_without_reason() {
        assert_eq!(ban_player("TestPlayer", "").unwrap().build(), "ban TestPlayer");
        assert_eq!(
            ban_player("TestPlayer", "Griefing").unwrap().build(),
            "ban TestPlayer Griefing"
        );
        assert_eq!(
            ban_ip("192.168.1.100", "Hacking").unwrap().build(),
            "ban-ip 192.168.1.100 Hacking"
        );
        assert_eq!(ban_ip("192.168.1.100", "").unwrap().build(), "ban-ip 192.168.1.100");
    }

    #[test]
    fn builds_pardons() {
        assert_eq!(pardon("TestPlayer").unwrap().build(), "pardon TestPlayer");
        assert_eq!(pardon_ip("10.10.10.10").unwrap().build(), "pardon-ip 10.10.10.10");
    }

    #[test]
    fn rejects_blank_targets() {
        assert!(matches!(ban_player("", ""), Err(RconError::Validation(_))));
        assert!(matches!(pardon("  "), Err(RconError::Validation(_))));

        let err = ban_ip(" ", "spam").unwrap_err();
        assert_eq!(err.to_string(), "invalid argument: IP address cannot be empty");
        assert!(matches!(pardon_ip(""), Err(RconError::Validation(_))));
    }

    #[test]
    fn parses_ban_replies() {
        let ban = ban_player("TestPlayer", "Griefing").unwrap();

        let result = ban.parse("Banned player TestPlayer").unwrap();
        assert_eq!(result.status, BanStatus::Success);
        assert_eq!(result.target, "TestPlayer");
        assert_eq!(result.reason, "Griefing");

        assert_eq!(
            ban.parse("Player is already banned").unwrap().status,
            BanStatus::AlreadyBanned
        );
        assert_eq!(
            ban.parse("No player was found").unwrap().status,
            BanStatus::NotFound
        );
        assert_eq!(ban.parse("???").unwrap().status, BanStatus::Unknown);
    }

    #[test]
    fn parses_ip_ban_reply() {
        let result = ban_ip("10.10.10.10", "test")
            .unwrap()
            .parse("Banned IP 10.10.10.10: test")
            .unwrap();

        assert_eq!(result.status, BanStatus::Success);
        assert_eq!(result.target, "10.10.10.10");
    }

    #[test]
    fn parses_pardon_replies() {
        let pardon = pardon("TestPlayer").unwrap();

        let result = pardon.parse("Unbanned TestPlayer").unwrap();
        assert_eq!(result.status, BanStatus::Success);
        assert_eq!(result.target, "TestPlayer");
        assert_eq!(result.reason, "");

        assert_eq!(
            pardon.parse("Player is not banned").unwrap().status,
            BanStatus::NotFound
        );

        let result = pardon_ip("10.10.10.10")
            .unwrap()
            .parse("Unbanned IP 10.10.10.10")
            .unwrap();
        assert_eq!(result.status, BanStatus::Success);
        assert_eq!(result.target, "10.10.10.10");
    }

    #[test]
    fn builds_ban_lists() {
        assert_eq!(ban_list_players().build(), "banlist players");
        assert_eq!(ban_list_ips().build(), "banlist ips");
    }

    #[test]
    fn parses_ban_lists() {
        let players = ban_list_players()
            .parse("There are 1 ban(s):TestPlayer was banned by Rcon: ips")
            .unwrap();
        assert_eq!(players.count(), 1);
        assert_eq!(players.entries, vec!["TestPlayer".to_string()]);

        let ips = ban_list_ips()
            .parse("There are 1 ban(s):10.10.10.10 was banned by Rcon: test")
            .unwrap();
        assert_eq!(ips.entries, vec!["10.10.10.10".to_string()]);

        assert_eq!(ban_list_players().parse("There are no bans").unwrap().count(), 0);
        assert_eq!(ban_list_players().parse("").unwrap().count(), 0);
    }
}
