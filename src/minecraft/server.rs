use std::collections::HashMap;

use crate::command::Command;
use crate::error::RconError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VersionResult {
    pub id: String,
    pub name: String,
    /// World data version.
    pub data: i32,
    pub series: String,
    /// Protocol number as printed, e.g. `773 (0x305)`.
    pub protocol: String,
    /// Build timestamp as printed by the server.
    pub build_time: String,
    pub pack_resource: f64,
    pub pack_data: f64,
    pub stable: bool,
}

pub fn version() -> Version {
    Version
}

#[derive(Debug, Clone)]
pub struct Version;

impl Command for Version {
    type Output = VersionResult;
    type Error = RconError;

    fn build(&self) -> String {
        "version".into()
    }

    // Server version info:id = 1.21.10 name = 1.21.10 data = 4556 series = main protocol = 773 (0x305) build_time = Tue Oct 07 09:14:11 UTC 2025 pack_resource = 69.0 pack_data = 88.0 stable = yes
    fn parse(&self, response: &str) -> Result<VersionResult, RconError> {
        if response.is_empty() {
            return Err(RconError::Validation("response cannot be empty".into()));
        }

        let mut fields = key_values(response);
        let mut take = |key: &str| fields.remove(key).unwrap_or_default();

        let data: i32 = take("data").parse().unwrap_or(0);
        let pack_resource: f64 = take("pack_resource").parse().unwrap_or(0.0);
        let pack_data: f64 = take("pack_data").parse().unwrap_or(0.0);
        let stable = take("stable").to_lowercase();

        Ok(VersionResult {
            id: take("id"),
            name: take("name"),
            data,
            series: take("series"),
            protocol: take("protocol"),
            build_time: take("build_time"),
            pack_resource,
            pack_data,
            stable: stable.starts_with('y') || stable == "true",
        })
    }
}

/// Splits `key = value key = value ...` into lowercased keys and trimmed
/// values. A value runs until the next word followed by `=`, so it may hold
/// spaces. Later duplicates win.
fn key_values(response: &str) -> HashMap<String, String> {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';

    // (key, byte offset of the key, byte offset of its value)
    let mut keys = Vec::new();
    for (eq, _) in response.match_indices('=') {
        let before = response[..eq].trim_end();
        let start = before
            .char_indices()
            .rev()
            .take_while(|&(_, c)| is_word(c))
            .last()
            .map(|(i, _)| i);

        if let Some(start) = start {
            keys.push((&before[start..], start, eq + 1));
        }
    }

    let mut fields = HashMap::new();
    for (i, &(key, _, value_start)) in keys.iter().enumerate() {
        let value_end = keys.get(i + 1).map_or(response.len(), |&(_, next, _)| next);
        fields.insert(
            key.to_lowercase(),
            response[value_start..value_end].trim().to_string(),
        );
    }
    fields
}
