use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::feed::{FeedError, SnapshotSource};
use crate::snapshot::{Creature, GameStateSnapshot, LogEntry};

const MAX_DEMO_LOG: usize = 24;

const DEMO_THOUGHTS: [&str; 6] = [
    "Heading north through the tunnel. Keeping to the left wall.",
    "Wild encounter again. Running is the better option here.",
    "HP is getting low on the lead. Should swap before the next fight.",
    "Checking the map. The exit should be two ladders down.",
    "Picked up an item. Will look at it once out of the cave.",
    "Trainer ahead. Saving the electric moves for the water types.",
];

/// Serves a canned snapshot so the overlay can run without a backend.
/// The first fetch answers `{}` like a freshly started agent would.
pub struct DemoSource {
    snapshot: GameStateSnapshot,
    fetches: u64,
    rng: StdRng,
}

impl DemoSource {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            snapshot: demo_snapshot(),
            fetches: 0,
            rng,
        }
    }

    fn advance(&mut self) {
        let snapshot = &mut self.snapshot;
        snapshot.iteration += 1;
        snapshot.play_time_seconds += self.rng.gen_range(3..12);
        snapshot.total_cost += self.rng.gen_range(0.0..0.02);

        let alive: Vec<usize> = snapshot
            .party
            .iter()
            .enumerate()
            .filter(|(_, c)| c.hp > 0)
            .map(|(i, _)| i)
            .collect();
        if !alive.is_empty() {
            let idx = alive[self.rng.gen_range(0..alive.len())];
            jitter_hp(&mut snapshot.party[idx], &mut self.rng);
        }

        if self.rng.gen_bool(0.3) {
            let thought = DEMO_THOUGHTS[self.rng.gen_range(0..DEMO_THOUGHTS.len())];
            snapshot.log.push(LogEntry {
                iteration: snapshot.iteration,
                thought: thought.to_string(),
            });
            let overflow = snapshot.log.len().saturating_sub(MAX_DEMO_LOG);
            snapshot.log.drain(..overflow);
        }
    }
}

impl Default for DemoSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotSource for DemoSource {
    fn fetch(&mut self) -> Result<String, FeedError> {
        self.fetches += 1;
        if self.fetches == 1 {
            return Ok("{}".to_string());
        }
        self.advance();
        encode_snapshot(&self.snapshot)
    }

    fn describe(&self) -> String {
        "demo feed".to_string()
    }
}

fn encode_snapshot(snapshot: &GameStateSnapshot) -> Result<String, FeedError> {
    serde_json::to_string(snapshot).map_err(|err| FeedError::Encode(err.to_string()))
}

fn jitter_hp(creature: &mut Creature, rng: &mut impl Rng) {
    let delta: i64 = rng.gen_range(-3..=3);
    let next = (creature.hp as i64 + delta).clamp(1, creature.max_hp as i64);
    creature.hp = next as u32;
}

pub fn demo_snapshot() -> GameStateSnapshot {
    GameStateSnapshot {
        iteration: 15247,
        money: 18143,
        pokedex_seen: 45,
        pokedex_caught: 21,
        total_cost: 23.51,
        play_time_seconds: 596_153,
        badges: vec![
            "BOULDERBADGE".to_string(),
            "CASCADEBADGE".to_string(),
            "THUNDERBADGE".to_string(),
        ],
        party: vec![
            demo_creature("ECHO", "Golbat", "POISON", Some("FLYING"), 22, 0, 70, None,
                &["Wing Attack", "Confuse Ray", "Bite", "Haze"]),
            demo_creature("CRAG", "Geodude", "ROCK", Some("GROUND"), 18, 45, 45, None,
                &["Tackle", "Defense Curl", "Rock Throw", "Self-Destruct"]),
            demo_creature("PULSAR", "Magnemite", "ELECTRIC", None, 18, 0, 36, None,
                &["Tackle", "Sonic Boom", "Thunder Shock", "Supersonic"]),
            demo_creature("SPARKY", "Pikachu", "ELECTRIC", None, 24, 68, 68, Some("POISONED"),
                &["Thunder Shock", "Growl", "Thunder Wave", "Quick Attack"]),
            demo_creature("SUBTERRA", "Diglett", "GROUND", None, 18, 18, 52, None,
                &["Scratch", "Growl"]),
        ],
        goals: vec![
            "Travel through Rock Tunnel to reach Lavender Town.".to_string(),
            "Obtain HM05 (Flash).".to_string(),
            "Acquire a drink for the Saffron City guard.".to_string(),
        ],
        log: vec![
            LogEntry {
                iteration: 15246,
                thought: "A random battle interrupted the path. Facing a wild Diglett. \
                          ECHO out-levels it, so running should work."
                    .to_string(),
            },
            LogEntry {
                iteration: 15247,
                thought: "Another Diglett. Getting out of here, no time for battles."
                    .to_string(),
            },
        ],
    }
}

#[allow(clippy::too_many_arguments)]
fn demo_creature(
    name: &str,
    species: &str,
    type1: &str,
    type2: Option<&str>,
    level: u32,
    hp: u32,
    max_hp: u32,
    status: Option<&str>,
    moves: &[&str],
) -> Creature {
    Creature {
        name: name.to_string(),
        species: species.to_string(),
        type1: type1.to_string(),
        type2: type2.map(str::to_string),
        level,
        hp,
        max_hp,
        status: status.map(str::to_string),
        moves: moves.iter().map(|m| m.to_string()).collect(),
    }
}
