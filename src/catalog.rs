use ratatui::style::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeInfo {
    pub id: &'static str,
    pub short: &'static str,
}

/// Every badge the game awards, in the order the strip shows them.
pub const BADGE_CATALOG: [BadgeInfo; 8] = [
    BadgeInfo { id: "BOULDERBADGE", short: "BLD" },
    BadgeInfo { id: "CASCADEBADGE", short: "CSC" },
    BadgeInfo { id: "THUNDERBADGE", short: "THN" },
    BadgeInfo { id: "RAINBOWBADGE", short: "RNB" },
    BadgeInfo { id: "SOULBADGE", short: "SOL" },
    BadgeInfo { id: "MARSHBADGE", short: "MRS" },
    BadgeInfo { id: "VOLCANOBADGE", short: "VOL" },
    BadgeInfo { id: "EARTHBADGE", short: "ERT" },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusBadge {
    pub abbr: &'static str,
    pub class: &'static str,
    pub color: Color,
}

pub const STATUS_TABLE: [(&str, StatusBadge); 5] = [
    (
        "ASLEEP",
        StatusBadge { abbr: "SLP", class: "status-slp", color: Color::Gray },
    ),
    (
        "POISONED",
        StatusBadge { abbr: "PSN", class: "status-psn", color: Color::Magenta },
    ),
    (
        "BURNED",
        StatusBadge { abbr: "BRN", class: "status-brn", color: Color::LightRed },
    ),
    (
        "FROZEN",
        StatusBadge { abbr: "FRZ", class: "status-frz", color: Color::LightCyan },
    ),
    (
        "PARALYZED",
        StatusBadge { abbr: "PAR", class: "status-par", color: Color::Yellow },
    ),
];

pub const TYPE_TABLE: [(&str, Color); 15] = [
    ("NORMAL", Color::Rgb(168, 168, 120)),
    ("FIGHTING", Color::Rgb(192, 48, 40)),
    ("FLYING", Color::Rgb(168, 144, 240)),
    ("POISON", Color::Rgb(160, 64, 160)),
    ("GROUND", Color::Rgb(224, 192, 104)),
    ("ROCK", Color::Rgb(184, 160, 56)),
    ("BUG", Color::Rgb(168, 184, 32)),
    ("GHOST", Color::Rgb(112, 88, 152)),
    ("FIRE", Color::Rgb(240, 128, 48)),
    ("WATER", Color::Rgb(104, 144, 240)),
    ("GRASS", Color::Rgb(120, 200, 80)),
    ("ELECTRIC", Color::Rgb(248, 208, 48)),
    ("PSYCHIC", Color::Rgb(248, 88, 136)),
    ("ICE", Color::Rgb(152, 216, 216)),
    ("DRAGON", Color::Rgb(112, 56, 248)),
];

pub fn is_known_badge(id: &str) -> bool {
    BADGE_CATALOG.iter().any(|b| b.id == id)
}

/// Status lookup is case-sensitive; the agent publishes upper-case names.
pub fn status_badge(status: &str) -> Option<StatusBadge> {
    STATUS_TABLE
        .iter()
        .find(|(name, _)| *name == status)
        .map(|(_, badge)| *badge)
}

pub fn type_color(kind: &str) -> Color {
    let upper = kind.to_ascii_uppercase();
    TYPE_TABLE
        .iter()
        .find(|(name, _)| *name == upper)
        .map(|(_, color)| *color)
        .unwrap_or(Color::DarkGray)
}

pub fn type_class(kind: &str) -> String {
    format!("type-{}", kind.to_lowercase())
}

/// Sprite file stem for a species name.
pub fn normalize_species(species: &str) -> String {
    species
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            ' ' | '\'' | '’' => None,
            '♀' => Some('f'),
            '♂' => Some('m'),
            other => Some(other),
        })
        .collect()
}

pub fn badge_icon_path(asset_root: &str, id: &str) -> String {
    format!("{}/badges/{}.png", trim_root(asset_root), id.to_lowercase())
}

pub fn sprite_path(asset_root: &str, species: &str) -> String {
    format!(
        "{}/pokemon/{}.png",
        trim_root(asset_root),
        normalize_species(species)
    )
}

fn trim_root(root: &str) -> &str {
    let trimmed = root.trim_end_matches('/');
    if trimmed.is_empty() { "." } else { trimmed }
}
