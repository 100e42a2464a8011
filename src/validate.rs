//! Structural validation of the raw state payload.
//!
//! The walk is total: every field is visited and every violation is
//! collected, so a contract drift on the publishing side shows up as one
//! complete report instead of a trickle of first-error messages.

use std::fmt;

use serde_json::{Map, Value};

use crate::catalog;
use crate::snapshot::{Creature, GameStateSnapshot, LogEntry, MAX_MOVES, MAX_PARTY};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    Missing,
    WrongType {
        expected: &'static str,
        found: &'static str,
    },
    OutOfRange {
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: String,
    pub kind: ViolationKind,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ViolationKind::Missing => write!(f, "{}: missing required field", self.path),
            ViolationKind::WrongType { expected, found } => {
                write!(f, "{}: expected {expected}, found {found}", self.path)
            }
            ViolationKind::OutOfRange { reason } => {
                write!(f, "{}: out of range ({reason})", self.path)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("snapshot failed validation with {} violation(s)", .violations.len())]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

impl ValidationError {
    pub fn mentions(&self, path: &str) -> bool {
        self.violations.iter().any(|v| v.path == path)
    }

    pub fn report(&self) -> String {
        let mut lines = vec![self.to_string()];
        lines.extend(self.violations.iter().map(|v| format!("  - {v}")));
        lines.join("\n")
    }
}

/// `{}` is what the endpoint serves before the agent publishes its first state.
pub fn is_pending_snapshot(value: &Value) -> bool {
    matches!(value, Value::Object(map) if map.is_empty())
}

/// Earlier server builds answered with an empty body instead of `{}`.
pub fn is_pending_body(body: &str) -> bool {
    body.trim().is_empty()
}

pub fn validate_snapshot(value: &Value) -> Result<GameStateSnapshot, ValidationError> {
    let mut v = Validator::default();
    let Some(obj) = value.as_object() else {
        v.wrong_type("$", "object", value);
        return Err(v.into_error());
    };

    let iteration = v.uint(obj, "", "iteration", 1);
    let money = v.uint(obj, "", "money", 0);
    let pokedex_seen = v.uint(obj, "", "pokedex_seen", 0);
    let pokedex_caught = v.uint(obj, "", "pokedex_caught", 0);
    let total_cost = v.real(obj, "", "total_cost");
    let play_time_seconds = v.uint(obj, "", "play_time_seconds", 0);
    let badges = v.badges(obj);
    let party = v.party(obj);
    let goals = v.string_list(obj, "", "goals");
    let log = v.log(obj);

    match (
        iteration,
        money,
        pokedex_seen,
        pokedex_caught,
        total_cost,
        play_time_seconds,
        badges,
        party,
        goals,
        log,
    ) {
        (
            Some(iteration),
            Some(money),
            Some(pokedex_seen),
            Some(pokedex_caught),
            Some(total_cost),
            Some(play_time_seconds),
            Some(badges),
            Some(party),
            Some(goals),
            Some(log),
        ) if v.violations.is_empty() => Ok(GameStateSnapshot {
            iteration,
            money,
            pokedex_seen,
            pokedex_caught,
            total_cost,
            play_time_seconds,
            badges,
            party,
            goals,
            log,
        }),
        _ => Err(v.into_error()),
    }
}

#[derive(Default)]
struct Validator {
    violations: Vec<Violation>,
}

impl Validator {
    fn into_error(self) -> ValidationError {
        ValidationError {
            violations: self.violations,
        }
    }

    fn push(&mut self, path: &str, kind: ViolationKind) {
        self.violations.push(Violation {
            path: path.to_string(),
            kind,
        });
    }

    fn wrong_type(&mut self, path: &str, expected: &'static str, found: &Value) {
        self.push(
            path,
            ViolationKind::WrongType {
                expected,
                found: json_kind(found),
            },
        );
    }

    fn out_of_range(&mut self, path: &str, reason: String) {
        self.push(path, ViolationKind::OutOfRange { reason });
    }

    fn field<'a>(&mut self, obj: &'a Map<String, Value>, path: &str, key: &str) -> Option<&'a Value> {
        let value = obj.get(key);
        if value.is_none() {
            self.push(path, ViolationKind::Missing);
        }
        value
    }

    fn uint(&mut self, obj: &Map<String, Value>, parent: &str, key: &str, min: u64) -> Option<u64> {
        let path = join(parent, key);
        let value = self.field(obj, &path, key)?;
        self.uint_value(&path, value, min)
    }

    fn uint_value(&mut self, path: &str, value: &Value, min: u64) -> Option<u64> {
        let Value::Number(n) = value else {
            self.wrong_type(path, "integer", value);
            return None;
        };
        if let Some(u) = n.as_u64() {
            if u < min {
                self.out_of_range(path, format!("must be >= {min}, got {u}"));
                return None;
            }
            return Some(u);
        }
        if let Some(i) = n.as_i64() {
            self.out_of_range(path, format!("must be >= {min}, got {i}"));
            return None;
        }
        self.wrong_type(path, "integer", value);
        None
    }

    fn small_uint(&mut self, obj: &Map<String, Value>, parent: &str, key: &str, min: u64) -> Option<u32> {
        let path = join(parent, key);
        let value = self.uint(obj, parent, key, min)?;
        match u32::try_from(value) {
            Ok(v) => Some(v),
            Err(_) => {
                self.out_of_range(&path, format!("must be <= {}, got {value}", u32::MAX));
                None
            }
        }
    }

    fn real(&mut self, obj: &Map<String, Value>, parent: &str, key: &str) -> Option<f64> {
        let path = join(parent, key);
        let value = self.field(obj, &path, key)?;
        let Some(n) = value.as_f64() else {
            self.wrong_type(&path, "number", value);
            return None;
        };
        if !n.is_finite() || n < 0.0 {
            self.out_of_range(&path, format!("must be a non-negative number, got {n}"));
            return None;
        }
        Some(n)
    }

    fn string(&mut self, obj: &Map<String, Value>, parent: &str, key: &str) -> Option<String> {
        let path = join(parent, key);
        let value = self.field(obj, &path, key)?;
        self.string_value(&path, value)
    }

    fn string_value(&mut self, path: &str, value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            other => {
                self.wrong_type(path, "string", other);
                None
            }
        }
    }

    /// Absent and `null` both mean "not set". Returns `Err(())` on a type violation.
    fn optional_string(
        &mut self,
        obj: &Map<String, Value>,
        parent: &str,
        key: &str,
    ) -> Result<Option<String>, ()> {
        match obj.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => {
                self.wrong_type(&join(parent, key), "string or null", other);
                Err(())
            }
        }
    }

    fn array<'a>(&mut self, obj: &'a Map<String, Value>, path: &str, key: &str) -> Option<&'a Vec<Value>> {
        let value = self.field(obj, path, key)?;
        match value {
            Value::Array(items) => Some(items),
            other => {
                self.wrong_type(path, "array", other);
                None
            }
        }
    }

    fn string_list(&mut self, obj: &Map<String, Value>, parent: &str, key: &str) -> Option<Vec<String>> {
        let path = join(parent, key);
        let items = self.array(obj, &path, key)?;
        let before = self.violations.len();
        let out: Vec<String> = items
            .iter()
            .enumerate()
            .filter_map(|(i, item)| self.string_value(&format!("{path}[{i}]"), item))
            .collect();
        (self.violations.len() == before).then_some(out)
    }

    fn badges(&mut self, obj: &Map<String, Value>) -> Option<Vec<String>> {
        let items = self.array(obj, "badges", "badges")?;
        let before = self.violations.len();
        let mut out: Vec<String> = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let path = format!("badges[{i}]");
            let Some(badge) = self.string_value(&path, item) else {
                continue;
            };
            if !catalog::is_known_badge(&badge) {
                self.out_of_range(&path, format!("unknown badge \"{badge}\""));
                continue;
            }
            if !out.contains(&badge) {
                out.push(badge);
            }
        }
        (self.violations.len() == before).then_some(out)
    }

    fn party(&mut self, obj: &Map<String, Value>) -> Option<Vec<Creature>> {
        let items = self.array(obj, "party", "party")?;
        let before = self.violations.len();
        if items.len() > MAX_PARTY {
            self.out_of_range(
                "party",
                format!("at most {MAX_PARTY} entries, got {}", items.len()),
            );
        }
        let out: Vec<Creature> = items
            .iter()
            .enumerate()
            .filter_map(|(i, item)| self.creature(&format!("party[{i}]"), item))
            .collect();
        (self.violations.len() == before).then_some(out)
    }

    fn creature(&mut self, path: &str, value: &Value) -> Option<Creature> {
        let Some(obj) = value.as_object() else {
            self.wrong_type(path, "object", value);
            return None;
        };
        let name = self.string(obj, path, "name");
        let species = self.string(obj, path, "species");
        let type1 = self.string(obj, path, "type1");
        let type2 = self.optional_string(obj, path, "type2");
        let level = self.small_uint(obj, path, "level", 1);
        let hp = self.small_uint(obj, path, "hp", 0);
        let max_hp = self.small_uint(obj, path, "max_hp", 1);
        let status = self.optional_string(obj, path, "status");
        let moves = self.moves(obj, path);

        Some(Creature {
            name: name?,
            species: species?,
            type1: type1?,
            type2: type2.ok()?,
            level: level?,
            hp: hp?,
            max_hp: max_hp?,
            status: status.ok()?,
            moves: moves?,
        })
    }

    fn moves(&mut self, obj: &Map<String, Value>, parent: &str) -> Option<Vec<String>> {
        let path = join(parent, "moves");
        let items = self.array(obj, &path, "moves")?;
        let before = self.violations.len();
        if items.len() > MAX_MOVES {
            self.out_of_range(
                &path,
                format!("at most {MAX_MOVES} entries, got {}", items.len()),
            );
        }
        let out: Vec<String> = items
            .iter()
            .enumerate()
            .filter_map(|(i, item)| self.string_value(&format!("{path}[{i}]"), item))
            .collect();
        (self.violations.len() == before).then_some(out)
    }

    fn log(&mut self, obj: &Map<String, Value>) -> Option<Vec<LogEntry>> {
        let items = self.array(obj, "log", "log")?;
        let before = self.violations.len();
        let out: Vec<LogEntry> = items
            .iter()
            .enumerate()
            .filter_map(|(i, item)| self.log_entry(&format!("log[{i}]"), item))
            .collect();
        (self.violations.len() == before).then_some(out)
    }

    fn log_entry(&mut self, path: &str, value: &Value) -> Option<LogEntry> {
        let Some(obj) = value.as_object() else {
            self.wrong_type(path, "object", value);
            return None;
        };
        let iteration = self.uint(obj, path, "iteration", 1);
        let thought = self.string(obj, path, "thought");
        Some(LogEntry {
            iteration: iteration?,
            thought: thought?,
        })
    }
}

fn join(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
