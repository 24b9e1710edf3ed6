use crate::command::{contains_ignore_case, Command};
use crate::error::RconError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DifficultyLevel {
    Peaceful,
    Easy,
    Normal,
    Hard,
}

impl DifficultyLevel {
    const ALL: [DifficultyLevel; 4] = [
        DifficultyLevel::Peaceful,
        DifficultyLevel::Easy,
        DifficultyLevel::Normal,
        DifficultyLevel::Hard,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DifficultyLevel::Peaceful => "peaceful",
            DifficultyLevel::Easy => "easy",
            DifficultyLevel::Normal => "normal",
            DifficultyLevel::Hard => "hard",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DifficultyResult {
    pub difficulty: DifficultyLevel,
    /// `false` when the server was already at the requested level.
    pub changed: bool,
    pub message: String,
}

pub fn set_difficulty(level: DifficultyLevel) -> SetDifficulty {
    SetDifficulty { level }
}

#[derive(Debug, Clone)]
pub struct SetDifficulty {
    level: DifficultyLevel,
}

impl Command for SetDifficulty {
    type Output = DifficultyResult;
    type Error = RconError;

    fn build(&self) -> String {
        format!("difficulty {}", self.level.as_str())
    }

    fn parse(&self, response: &str) -> Result<DifficultyResult, RconError> {
        let difficulty = DifficultyLevel::ALL
            .into_iter()
            .find(|level| contains_ignore_case(response, level.as_str()))
            .unwrap_or(self.level);

        Ok(DifficultyResult {
            difficulty,
            changed: !contains_ignore_case(response, "did not change"),
            message: response.to_string(),
        })
    }
}
