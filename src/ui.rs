use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::state::{AppState, FeedStatus};
use crate::view::{CardView, CreatureCard, DashboardView, GoalItem, LogView};

const CARD_COLUMNS: usize = 3;
const CARD_HEIGHT: u16 = 10;
const CONSOLE_HEIGHT: u16 = 7;

pub fn ui(frame: &mut Frame, state: &AppState) {
    let mut constraints = vec![Constraint::Min(1), Constraint::Length(1)];
    if state.show_console {
        constraints.insert(1, Constraint::Length(CONSOLE_HEIGHT));
    }
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(frame.size());

    match state.renderer.view() {
        Some(view) => draw_view(frame, chunks[0], view),
        None => draw_waiting(frame, chunks[0], state),
    }

    if state.show_console {
        draw_console(frame, chunks[1], state);
    }

    let footer = Paragraph::new(footer_text(state)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[chunks.len() - 1]);

    if state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

/// Paints every dashboard region into `area`.
pub fn draw_view(frame: &mut Frame, area: Rect, view: &DashboardView) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
        ])
        .split(area);

    draw_info_bar(frame, rows[0], view);
    draw_badges(frame, rows[1], view);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rows[2]);

    draw_party(frame, body[0], &view.party);

    let goal_height = view.goals.len().min(6) as u16 + 2;
    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(goal_height), Constraint::Min(3)])
        .split(body[1]);
    draw_goals(frame, side[0], &view.goals);
    draw_log(frame, side[1], &view.log);
}

fn draw_info_bar(frame: &mut Frame, area: Rect, view: &DashboardView) {
    let info = &view.info;
    let label = Style::default().fg(Color::DarkGray);
    let value = Style::default().add_modifier(Modifier::BOLD);
    let line = Line::from(vec![
        Span::styled("Money ", label),
        Span::styled(info.money.clone(), value),
        Span::raw("   "),
        Span::styled("Iteration ", label),
        Span::styled(info.iteration.clone(), value),
        Span::raw("   "),
        Span::styled("Caught/Seen ", label),
        Span::styled(info.caught_seen.clone(), value),
        Span::raw("   "),
        Span::styled("Cost ", label),
        Span::styled(info.total_cost.clone(), value),
        Span::raw("   "),
        Span::styled("Time ", label),
        Span::styled(info.play_time.clone(), value),
    ]);
    let bar = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    frame.render_widget(bar, area);
}

fn draw_badges(frame: &mut Frame, area: Rect, view: &DashboardView) {
    let mut spans = Vec::with_capacity(view.badges.len() * 2);
    for badge in &view.badges {
        let style = if badge.earned {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!(" {} ", badge.short), style));
        spans.push(Span::raw(" "));
    }
    let strip = Paragraph::new(Line::from(spans))
        .block(Block::default().title("Badges").borders(Borders::ALL));
    frame.render_widget(strip, area);
}

fn draw_goals(frame: &mut Frame, area: Rect, goals: &[GoalItem]) {
    let lines: Vec<Line> = goals
        .iter()
        .map(|goal| match goal {
            GoalItem::Goal(text) => Line::from(format!("• {text}")),
            GoalItem::Placeholder => Line::styled(
                goal.text().to_string(),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ),
        })
        .collect();
    let list = Paragraph::new(lines).block(Block::default().title("Goals").borders(Borders::ALL));
    frame.render_widget(list, area);
}

fn draw_log(frame: &mut Frame, area: Rect, log: &LogView) {
    let block = Block::default().title("Activity").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.width == 0 || inner.height == 0 || log.lines.is_empty() {
        return;
    }

    let upto = (log.scroll + 1).min(log.lines.len());
    let lines: Vec<Line> = log.lines[..upto]
        .iter()
        .map(|line| Line::from(line.as_str()))
        .collect();
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
    // Pin the last wrapped row of the selected entry to the bottom edge.
    let rows = paragraph.line_count(inner.width);
    let offset = rows.saturating_sub(inner.height as usize).min(u16::MAX as usize) as u16;
    frame.render_widget(paragraph.scroll((offset, 0)), inner);
}

fn draw_party(frame: &mut Frame, area: Rect, party: &[CardView]) {
    let rows = party.len().div_ceil(CARD_COLUMNS).max(1);
    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(CARD_HEIGHT); rows])
        .split(area);

    for (row_idx, row_area) in row_areas.iter().enumerate() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, CARD_COLUMNS as u32); CARD_COLUMNS])
            .split(*row_area);
        for (col_idx, col_area) in cols.iter().enumerate() {
            let Some(card) = party.get(row_idx * CARD_COLUMNS + col_idx) else {
                continue;
            };
            draw_card(frame, *col_area, card);
        }
    }
}

fn draw_card(frame: &mut Frame, area: Rect, card: &CardView) {
    match card {
        CardView::Empty => {
            let empty = Paragraph::new("-- empty --")
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::DarkGray)),
                );
            frame.render_widget(empty, area);
        }
        CardView::Creature(creature) => draw_creature_card(frame, area, creature),
    }
}

fn draw_creature_card(frame: &mut Frame, area: Rect, card: &CreatureCard) {
    let mut name_style = Style::default().add_modifier(Modifier::BOLD);
    let mut border_style = Style::default();
    if card.fainted {
        name_style = name_style.fg(Color::Red).add_modifier(Modifier::CROSSED_OUT);
        border_style = border_style.fg(Color::Red);
    }
    let block = Block::default()
        .title(Span::styled(card.name.clone(), name_style))
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let mut lines = vec![Line::from(card.title.clone())];

    let mut type_spans = Vec::new();
    for badge in &card.types {
        type_spans.push(Span::styled(
            format!(" {} ", badge.label),
            Style::default().fg(Color::Black).bg(badge.color),
        ));
        type_spans.push(Span::raw(" "));
    }
    lines.push(Line::from(type_spans));

    lines.push(hp_bar_line(card, inner.width as usize));

    let mut hp_spans = vec![Span::raw(card.hp_text.clone())];
    if card.fainted {
        hp_spans.push(Span::raw(" "));
        hp_spans.push(Span::styled(
            "FAINTED",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    } else if let Some(status) = card.status {
        hp_spans.push(Span::raw(" "));
        hp_spans.push(Span::styled(
            format!(" {} ", status.abbr),
            Style::default().fg(Color::Black).bg(status.color),
        ));
    }
    lines.push(Line::from(hp_spans));

    for mv in &card.moves {
        lines.push(Line::from(format!("  {mv}")));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn hp_bar_line(card: &CreatureCard, width: usize) -> Line<'static> {
    let filled = ((card.hp_fraction * width as f64).round() as usize).min(width);
    Line::from(vec![
        Span::styled("█".repeat(filled), Style::default().fg(card.hp_color.color())),
        Span::styled(
            "░".repeat(width - filled),
            Style::default().fg(Color::DarkGray),
        ),
    ])
}

fn draw_waiting(frame: &mut Frame, area: Rect, state: &AppState) {
    let message = match state.feed_status {
        FeedStatus::Pending => format!("Agent has not published a state yet ({})", state.source_label),
        _ => format!("Waiting for state from {}", state.source_label),
    };
    let waiting = Paragraph::new(message)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(waiting, area);
}

fn draw_console(frame: &mut Frame, area: Rect, state: &AppState) {
    let visible = area.height.saturating_sub(2) as usize;
    let text = if state.logs.is_empty() {
        "No diagnostics yet".to_string()
    } else {
        let start = state.logs.len().saturating_sub(visible);
        state
            .logs
            .iter()
            .skip(start)
            .cloned()
            .collect::<Vec<_>>()
            .join("\n")
    };
    let title = format!(
        "Console | snapshots {} | failed cycles {}",
        state.snapshots_applied, state.failures
    );
    let console = Paragraph::new(text).block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(console, area);
}

fn footer_text(state: &AppState) -> String {
    let follow = match state.renderer.view() {
        Some(view) if !view.log.is_at_end() => " | G Follow log",
        _ => "",
    };
    format!("j/k/↑/↓ Scroll log{follow} | c Console | ? Help | q Quit")
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(50, 50, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Agent Overlay - Help",
        "",
        "  j / ↓        Scroll log towards newer entries",
        "  k / ↑        Scroll log towards older entries",
        "  G / End      Jump to the latest log entry",
        "  c            Toggle diagnostics console",
        "  ?            Toggle help",
        "  q / Esc      Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text).block(Block::default().title("Help").borders(Borders::ALL));
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}

/// Region-by-region text dump, used by the probe binary.
pub fn plain_text(view: &DashboardView) -> String {
    let info = &view.info;
    let mut out = vec![format!(
        "money {} | iteration {} | caught/seen {} | cost {} | time {}",
        info.money, info.iteration, info.caught_seen, info.total_cost, info.play_time
    )];

    let badges = view
        .badges
        .iter()
        .map(|b| format!("{}{}", if b.earned { "*" } else { "." }, b.id))
        .collect::<Vec<_>>()
        .join(" ");
    out.push(format!("badges {badges}"));

    out.push("goals:".to_string());
    out.extend(view.goals.iter().map(|g| format!("  - {}", g.text())));

    out.push("party:".to_string());
    for (slot, card) in view.party.iter().enumerate() {
        match card {
            CardView::Empty => out.push(format!("  {}. (empty)", slot + 1)),
            CardView::Creature(c) => {
                let types = c
                    .types
                    .iter()
                    .map(|t| t.label.as_str())
                    .collect::<Vec<_>>()
                    .join("/");
                let marker = if c.fainted {
                    " FAINTED".to_string()
                } else {
                    c.status.map(|s| format!(" {}", s.abbr)).unwrap_or_default()
                };
                out.push(format!(
                    "  {}. {} ({}) {} HP {}{} [{}] {}",
                    slot + 1,
                    c.name,
                    c.title,
                    types,
                    c.hp_text,
                    marker,
                    c.moves.join(", "),
                    c.sprite
                ));
            }
        }
    }

    out.push("log:".to_string());
    out.extend(view.log.lines.iter().map(|line| format!("  {line}")));
    out.join("\n")
}
