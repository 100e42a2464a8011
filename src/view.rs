use ratatui::style::Color;

use crate::catalog::{self, StatusBadge, BADGE_CATALOG};
use crate::snapshot::{Creature, GameStateSnapshot, MAX_MOVES, MAX_PARTY};

pub const NO_OBJECTIVES: &str = "Awaiting objectives...";
pub const EMPTY_MOVE: &str = "-";

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub info: InfoBarView,
    pub badges: Vec<BadgeView>,
    pub goals: Vec<GoalItem>,
    pub log: LogView,
    pub party: Vec<CardView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoBarView {
    pub money: String,
    pub iteration: String,
    pub caught_seen: String,
    pub total_cost: String,
    pub play_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeView {
    pub id: &'static str,
    pub short: &'static str,
    pub icon: String,
    pub earned: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoalItem {
    Goal(String),
    Placeholder,
}

impl GoalItem {
    pub fn text(&self) -> &str {
        match self {
            GoalItem::Goal(text) => text,
            GoalItem::Placeholder => NO_OBJECTIVES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogView {
    pub lines: Vec<String>,
    /// Index of the line pinned to the bottom of the log pane.
    pub scroll: usize,
}

impl LogView {
    pub fn last_index(&self) -> usize {
        self.lines.len().saturating_sub(1)
    }

    pub fn is_at_end(&self) -> bool {
        self.scroll == self.last_index()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CardView {
    Empty,
    Creature(Box<CreatureCard>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreatureCard {
    pub name: String,
    pub title: String,
    pub sprite: String,
    pub hp_fraction: f64,
    pub hp_color: HpColor,
    pub hp_text: String,
    pub status: Option<StatusBadge>,
    pub types: Vec<TypeBadge>,
    pub moves: [String; MAX_MOVES],
    pub fainted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeBadge {
    pub label: String,
    pub class: String,
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HpColor {
    Green,
    Yellow,
    Red,
}

impl HpColor {
    pub fn from_fraction(fraction: f64) -> Self {
        if fraction > 0.5 {
            HpColor::Green
        } else if fraction > 0.2 {
            HpColor::Yellow
        } else {
            HpColor::Red
        }
    }

    pub fn color(self) -> Color {
        match self {
            HpColor::Green => Color::Rgb(51, 255, 51),
            HpColor::Yellow => Color::Rgb(253, 230, 75),
            HpColor::Red => Color::Rgb(255, 51, 51),
        }
    }
}

/// Owns the dashboard regions. Every `render` throws the previous regions
/// away and rebuilds them from the snapshot alone.
#[derive(Debug, Clone)]
pub struct Renderer {
    asset_root: String,
    view: Option<DashboardView>,
    renders: u64,
}

impl Renderer {
    pub fn new(asset_root: impl Into<String>) -> Self {
        Self {
            asset_root: asset_root.into(),
            view: None,
            renders: 0,
        }
    }

    pub fn render(&mut self, snapshot: &GameStateSnapshot) -> &DashboardView {
        self.renders += 1;
        self.view.insert(build_view(snapshot, &self.asset_root))
    }

    pub fn view(&self) -> Option<&DashboardView> {
        self.view.as_ref()
    }

    pub fn render_count(&self) -> u64 {
        self.renders
    }

    /// Moves the log's pinned line; negative scrolls towards older entries.
    pub fn scroll_log(&mut self, delta: isize) {
        let Some(view) = self.view.as_mut() else {
            return;
        };
        let last = view.log.last_index();
        view.log.scroll = view.log.scroll.saturating_add_signed(delta).min(last);
    }

    pub fn scroll_log_to_end(&mut self) {
        if let Some(view) = self.view.as_mut() {
            view.log.scroll = view.log.last_index();
        }
    }
}

pub fn build_view(snapshot: &GameStateSnapshot, asset_root: &str) -> DashboardView {
    DashboardView {
        info: info_bar(snapshot),
        badges: badge_strip(snapshot, asset_root),
        goals: goal_list(&snapshot.goals),
        log: log_view(snapshot),
        party: party_cards(&snapshot.party, asset_root),
    }
}

fn info_bar(snapshot: &GameStateSnapshot) -> InfoBarView {
    InfoBarView {
        money: format_money(snapshot.money),
        iteration: snapshot.iteration.to_string(),
        caught_seen: format!("{}/{}", snapshot.pokedex_caught, snapshot.pokedex_seen),
        total_cost: format_cost(snapshot.total_cost),
        play_time: format_play_time(snapshot.play_time_seconds),
    }
}

fn badge_strip(snapshot: &GameStateSnapshot, asset_root: &str) -> Vec<BadgeView> {
    BADGE_CATALOG
        .iter()
        .map(|badge| BadgeView {
            id: badge.id,
            short: badge.short,
            icon: catalog::badge_icon_path(asset_root, badge.id),
            earned: snapshot.has_badge(badge.id),
        })
        .collect()
}

fn goal_list(goals: &[String]) -> Vec<GoalItem> {
    if goals.is_empty() {
        return vec![GoalItem::Placeholder];
    }
    goals.iter().cloned().map(GoalItem::Goal).collect()
}

fn log_view(snapshot: &GameStateSnapshot) -> LogView {
    let lines: Vec<String> = snapshot
        .log
        .iter()
        .map(|entry| format!("[{}] {}", entry.iteration, entry.thought))
        .collect();
    let scroll = lines.len().saturating_sub(1);
    LogView { lines, scroll }
}

fn party_cards(party: &[Creature], asset_root: &str) -> Vec<CardView> {
    (0..MAX_PARTY)
        .map(|slot| match party.get(slot) {
            Some(creature) => CardView::Creature(Box::new(creature_card(creature, asset_root))),
            None => CardView::Empty,
        })
        .collect()
}

fn creature_card(creature: &Creature, asset_root: &str) -> CreatureCard {
    let hp_fraction = creature.hp_fraction();
    let fainted = creature.is_fainted();
    let status = if fainted {
        None
    } else {
        creature.status.as_deref().and_then(catalog::status_badge)
    };

    let types = std::iter::once(&creature.type1)
        .chain(creature.type2.as_ref())
        .map(|kind| TypeBadge {
            label: kind.clone(),
            class: catalog::type_class(kind),
            color: catalog::type_color(kind),
        })
        .collect();

    let moves = std::array::from_fn(|i| {
        creature
            .moves
            .get(i)
            .cloned()
            .unwrap_or_else(|| EMPTY_MOVE.to_string())
    });

    CreatureCard {
        name: creature.name.clone(),
        title: format!("{} - Lv.{}", creature.species, creature.level),
        sprite: catalog::sprite_path(asset_root, &creature.species),
        hp_fraction,
        hp_color: HpColor::from_fraction(hp_fraction),
        hp_text: format!("{} / {}", creature.hp, creature.max_hp),
        status,
        types,
        moves,
        fainted,
    }
}

pub fn format_money(amount: u64) -> String {
    format!("¥{}", group_thousands(amount))
}

pub fn format_cost(cost: f64) -> String {
    format!("${cost:.2}")
}

pub fn format_play_time(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    format!("{hours}h {minutes}m")
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(format_money(0), "¥0");
        assert_eq!(format_money(999), "¥999");
        assert_eq!(format_money(18143), "¥18,143");
        assert_eq!(format_money(1_234_567), "¥1,234,567");
    }

    #[test]
    fn play_time_is_hours_and_minutes() {
        assert_eq!(format_play_time(596_153), "165h 35m");
        assert_eq!(format_play_time(59), "0h 0m");
        assert_eq!(format_play_time(3600), "1h 0m");
    }

    #[test]
    fn cost_has_two_decimals() {
        assert_eq!(format_cost(23.51), "$23.51");
        assert_eq!(format_cost(0.0), "$0.00");
        assert_eq!(format_cost(7.0), "$7.00");
    }

    #[test]
    fn hp_thresholds_are_strict() {
        assert_eq!(HpColor::from_fraction(1.0), HpColor::Green);
        assert_eq!(HpColor::from_fraction(0.51), HpColor::Green);
        assert_eq!(HpColor::from_fraction(0.5), HpColor::Yellow);
        assert_eq!(HpColor::from_fraction(0.21), HpColor::Yellow);
        assert_eq!(HpColor::from_fraction(0.2), HpColor::Red);
        assert_eq!(HpColor::from_fraction(0.0), HpColor::Red);
    }
}
