use std::fs;
use std::path::PathBuf;

use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;

use agent_overlay::catalog::BADGE_CATALOG;
use agent_overlay::snapshot::{Creature, GameStateSnapshot, LogEntry};
use agent_overlay::ui::{draw_view, plain_text};
use agent_overlay::validate::validate_snapshot;
use agent_overlay::view::{CardView, CreatureCard, EMPTY_MOVE, GoalItem, HpColor, Renderer};

fn fixture_snapshot() -> GameStateSnapshot {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push("state.json");
    let raw = fs::read_to_string(path).expect("fixture file should be readable");
    let value = serde_json::from_str(&raw).expect("fixture should be valid json");
    validate_snapshot(&value).expect("fixture should validate")
}

fn creature(hp: u32, max_hp: u32, status: Option<&str>) -> Creature {
    Creature {
        name: "TEST".to_string(),
        species: "Pikachu".to_string(),
        type1: "ELECTRIC".to_string(),
        type2: None,
        level: 10,
        hp,
        max_hp,
        status: status.map(str::to_string),
        moves: vec!["GROWL".to_string()],
    }
}

fn with_party(party: Vec<Creature>) -> GameStateSnapshot {
    let mut snapshot = fixture_snapshot();
    snapshot.party = party;
    snapshot
}

fn card(view_party: &[CardView], slot: usize) -> &CreatureCard {
    match &view_party[slot] {
        CardView::Creature(card) => &**card,
        CardView::Empty => panic!("slot {slot} should hold a creature"),
    }
}

fn screen_text(buffer: &Buffer) -> String {
    buffer.content().iter().map(|cell| cell.symbol()).collect()
}

fn paint(renderer: &Renderer) -> Buffer {
    let backend = TestBackend::new(140, 40);
    let mut terminal = Terminal::new(backend).expect("test terminal");
    let view = renderer.view().expect("renderer should have a view");
    terminal
        .draw(|f| draw_view(f, f.size(), view))
        .expect("draw should succeed");
    terminal.backend().buffer().clone()
}

#[test]
fn info_bar_formats_every_field() {
    let mut renderer = Renderer::new("assets");
    let info = renderer.render(&fixture_snapshot()).info.clone();
    assert_eq!(info.money, "¥18,143");
    assert_eq!(info.iteration, "15247");
    assert_eq!(info.caught_seen, "21/45");
    assert_eq!(info.total_cost, "$23.51");
    assert_eq!(info.play_time, "165h 35m");
}

#[test]
fn badge_strip_always_shows_full_catalog_in_order() {
    let mut snapshot = fixture_snapshot();
    snapshot.badges = Vec::new();
    let mut renderer = Renderer::new("assets");
    let view = renderer.render(&snapshot);

    let ids: Vec<&str> = view.badges.iter().map(|b| b.id).collect();
    let catalog: Vec<&str> = BADGE_CATALOG.iter().map(|b| b.id).collect();
    assert_eq!(ids, catalog);
    assert!(view.badges.iter().all(|b| !b.earned));
    assert_eq!(view.badges[0].icon, "assets/badges/boulderbadge.png");
}

#[test]
fn earned_badges_are_marked_in_place() {
    let mut snapshot = fixture_snapshot();
    snapshot.badges = vec!["EARTHBADGE".to_string(), "BOULDERBADGE".to_string()];
    let mut renderer = Renderer::new("assets");
    let view = renderer.render(&snapshot);

    let earned: Vec<&str> = view.badges.iter().filter(|b| b.earned).map(|b| b.id).collect();
    assert_eq!(earned, vec!["BOULDERBADGE", "EARTHBADGE"]);
}

#[test]
fn empty_goals_render_a_placeholder() {
    let mut snapshot = fixture_snapshot();
    snapshot.goals.clear();
    let mut renderer = Renderer::new("assets");
    assert_eq!(renderer.render(&snapshot).goals, vec![GoalItem::Placeholder]);

    let view = renderer.render(&fixture_snapshot());
    assert_eq!(view.goals.len(), 3);
    assert_eq!(view.goals[1].text(), "Obtain HM05 (Flash).");
}

#[test]
fn log_lines_are_formatted_and_scrolled_to_the_end() {
    let mut renderer = Renderer::new("assets");
    let view = renderer.render(&fixture_snapshot());
    assert_eq!(view.log.lines.len(), 2);
    assert!(view.log.lines[1].starts_with("[15247] Another Diglett."));
    assert!(view.log.is_at_end());

    renderer.scroll_log(-1);
    assert_eq!(renderer.view().unwrap().log.scroll, 0);
    renderer.scroll_log(-5);
    assert_eq!(renderer.view().unwrap().log.scroll, 0);

    // A new snapshot always snaps back to the latest entry.
    renderer.render(&fixture_snapshot());
    assert!(renderer.view().unwrap().log.is_at_end());
}

#[test]
fn party_always_has_six_slots() {
    let mut renderer = Renderer::new("assets");
    for size in 0..=6 {
        let party = (0..size).map(|_| creature(10, 20, None)).collect();
        let view = renderer.render(&with_party(party));
        assert_eq!(view.party.len(), 6);
        let empty = view.party.iter().filter(|c| matches!(c, CardView::Empty)).count();
        assert_eq!(empty, 6 - size);
        // Placeholders only ever trail the occupied slots.
        assert!(view.party[..size].iter().all(|c| matches!(c, CardView::Creature(_))));
    }
}

#[test]
fn fainted_marker_ignores_status() {
    let mut renderer = Renderer::new("assets");
    let view = renderer.render(&with_party(vec![
        creature(0, 30, Some("POISONED")),
        creature(0, 30, None),
        creature(1, 30, Some("POISONED")),
    ]));
    assert!(card(&view.party, 0).fainted);
    assert!(card(&view.party, 0).status.is_none());
    assert!(card(&view.party, 1).fainted);
    assert!(!card(&view.party, 2).fainted);
}

#[test]
fn known_statuses_map_to_abbreviations() {
    let cases = [
        ("ASLEEP", "SLP", "status-slp"),
        ("POISONED", "PSN", "status-psn"),
        ("BURNED", "BRN", "status-brn"),
        ("FROZEN", "FRZ", "status-frz"),
        ("PARALYZED", "PAR", "status-par"),
    ];
    let mut renderer = Renderer::new("assets");
    for (status, abbr, class) in cases {
        let view = renderer.render(&with_party(vec![creature(5, 10, Some(status))]));
        let badge = card(&view.party, 0).status.expect("status badge should render");
        assert_eq!(badge.abbr, abbr);
        assert_eq!(badge.class, class);
    }

    let view = renderer.render(&with_party(vec![creature(5, 10, Some("CONFUSED"))]));
    assert!(card(&view.party, 0).status.is_none());
}

#[test]
fn hp_bar_color_follows_fraction() {
    let mut renderer = Renderer::new("assets");
    let view = renderer.render(&with_party(vec![
        creature(51, 100, None),
        creature(50, 100, None),
        creature(21, 100, None),
        creature(20, 100, None),
        creature(0, 100, None),
    ]));
    assert_eq!(card(&view.party, 0).hp_color, HpColor::Green);
    assert_eq!(card(&view.party, 1).hp_color, HpColor::Yellow);
    assert_eq!(card(&view.party, 2).hp_color, HpColor::Yellow);
    assert_eq!(card(&view.party, 3).hp_color, HpColor::Red);
    assert_eq!(card(&view.party, 4).hp_color, HpColor::Red);
    assert_eq!(card(&view.party, 1).hp_fraction, 0.5);
    assert_eq!(card(&view.party, 1).hp_text, "50 / 100");
}

#[test]
fn creature_card_details() {
    let mut renderer = Renderer::new("assets");
    let view = renderer.render(&fixture_snapshot());

    let echo = card(&view.party, 0);
    assert_eq!(echo.name, "ECHO");
    assert_eq!(echo.title, "GOLBAT - Lv.22");
    assert_eq!(echo.sprite, "assets/pokemon/golbat.png");
    let types: Vec<&str> = echo.types.iter().map(|t| t.label.as_str()).collect();
    assert_eq!(types, vec!["POISON", "FLYING"]);
    assert_eq!(echo.types[1].class, "type-flying");

    let subterra = card(&view.party, 4);
    assert_eq!(subterra.types.len(), 1);
    assert_eq!(
        subterra.moves,
        [
            "SCRATCH".to_string(),
            "GROWL".to_string(),
            EMPTY_MOVE.to_string(),
            EMPTY_MOVE.to_string()
        ]
    );
}

#[test]
fn rendering_twice_is_idempotent() {
    let snapshot = fixture_snapshot();
    let mut renderer = Renderer::new("assets");
    let first = renderer.render(&snapshot).clone();
    let first_buffer = paint(&renderer);

    let second = renderer.render(&snapshot).clone();
    let second_buffer = paint(&renderer);

    assert_eq!(first, second);
    assert_eq!(first_buffer, second_buffer);
    assert_eq!(renderer.render_count(), 2);
}

#[test]
fn new_snapshot_replaces_previous_regions_entirely() {
    let mut renderer = Renderer::new("assets");
    renderer.render(&fixture_snapshot());

    let mut smaller = fixture_snapshot();
    smaller.party.truncate(1);
    smaller.goals.clear();
    smaller.log.clear();
    let replaced = renderer.render(&smaller).clone();

    let mut fresh = Renderer::new("assets");
    assert_eq!(&replaced, fresh.render(&smaller));
}

#[test]
fn independent_renderers_paint_identically() {
    let snapshot = fixture_snapshot();
    let mut a = Renderer::new("assets");
    let mut b = Renderer::new("assets");
    a.render(&snapshot);
    b.render(&snapshot);
    assert_eq!(paint(&a), paint(&b));

    let mut other_root = Renderer::new("/srv/overlay/assets");
    let view = other_root.render(&snapshot);
    assert_eq!(card(&view.party, 1).sprite, "/srv/overlay/assets/pokemon/geodude.png");
    // The first renderer is untouched by the second one's asset root.
    assert_eq!(
        card(&a.view().unwrap().party, 1).sprite,
        "assets/pokemon/geodude.png"
    );
}

#[test]
fn painted_dashboard_shows_key_text() {
    let mut renderer = Renderer::new("assets");
    renderer.render(&fixture_snapshot());
    let buffer = paint(&renderer);
    let screen = screen_text(&buffer);

    assert!(screen.contains("¥18,143"));
    assert!(screen.contains("165h 35m"));
    assert!(screen.contains("FAINTED"));
    assert!(screen.contains("-- empty --"));
    assert!(screen.contains("PSN"));
}

#[test]
fn plain_text_lists_every_slot() {
    let mut renderer = Renderer::new("assets");
    let text = plain_text(renderer.render(&fixture_snapshot()));
    assert!(text.contains("*BOULDERBADGE"));
    assert!(text.contains(".EARTHBADGE"));
    assert!(text.contains("6. (empty)"));
    assert!(text.contains("1. ECHO (GOLBAT - Lv.22) POISON/FLYING HP 0 / 70 FAINTED"));
    assert!(text.contains("4. SPARKY (PIKACHU - Lv.24) ELECTRIC HP 68 / 68 PSN"));
}

#[test]
fn wide_log_text_wraps_by_display_width() {
    let mut snapshot = fixture_snapshot();
    snapshot.log = vec![LogEntry {
        iteration: 1,
        thought: format!("{} END", "ピカチュウ".repeat(8)),
    }];
    let mut renderer = Renderer::new("assets");
    renderer.render(&snapshot);

    let screen = screen_text(&paint(&renderer));
    assert!(screen.contains("END"), "tail of the log entry should be on screen");
}

#[test]
fn latest_log_entry_stays_visible_under_a_long_history() {
    let mut snapshot = fixture_snapshot();
    snapshot.log = (1..=200)
        .map(|i| LogEntry {
            iteration: i,
            thought: format!("step {i} of a long walk through the tunnel"),
        })
        .collect();
    snapshot.log.last_mut().unwrap().thought = "LATEST".to_string();
    let mut renderer = Renderer::new("assets");
    renderer.render(&snapshot);

    let screen = screen_text(&paint(&renderer));
    assert!(screen.contains("[200] LATEST"));
    assert!(!screen.contains("[1] step 1 "));
}

#[test]
fn huge_goal_list_still_leaves_room_for_the_log() {
    let mut snapshot = fixture_snapshot();
    snapshot.goals = (0..65_536).map(|i| format!("goal {i}")).collect();
    let mut renderer = Renderer::new("assets");
    renderer.render(&snapshot);

    let screen = screen_text(&paint(&renderer));
    assert!(screen.contains("goal 0"));
    assert!(screen.contains("Activity"));
    assert!(screen.contains("Another Diglett."));
}
