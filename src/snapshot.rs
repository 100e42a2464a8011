use serde::{Deserialize, Serialize};

/// One complete state payload published by the agent for a single poll cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub iteration: u64,
    pub money: u64,
    pub pokedex_seen: u64,
    pub pokedex_caught: u64,
    pub total_cost: f64,
    pub play_time_seconds: u64,
    pub badges: Vec<String>,
    pub party: Vec<Creature>,
    pub goals: Vec<String>,
    pub log: Vec<LogEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creature {
    pub name: String,
    pub species: String,
    pub type1: String,
    pub type2: Option<String>,
    pub level: u32,
    pub hp: u32,
    pub max_hp: u32,
    pub status: Option<String>,
    pub moves: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub iteration: u64,
    pub thought: String,
}

pub const MAX_PARTY: usize = 6;
pub const MAX_MOVES: usize = 4;

impl GameStateSnapshot {
    pub fn has_badge(&self, id: &str) -> bool {
        self.badges.iter().any(|b| b == id)
    }
}

impl Creature {
    pub fn is_fainted(&self) -> bool {
        self.hp == 0
    }

    /// HP fill fraction in `[0, 1]`.
    pub fn hp_fraction(&self) -> f64 {
        if self.max_hp == 0 {
            return 0.0;
        }
        (self.hp as f64 / self.max_hp as f64).clamp(0.0, 1.0)
    }
}
