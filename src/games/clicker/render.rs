//! Tier Clicker rendering: object, progress panel, upgrade store, achievements.

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Paragraph};
use ratzilla::ratatui::Frame;

use crate::input::{is_narrow_layout, ClickState};
use crate::widgets::ClickableList;

use super::actions::*;
use super::logic::format_number;
use super::state::{ClickerState, Feedback};

/// The object, resting and pressed.
const OBJECT_ART: &[&str] = &["  ╭─────╮  ", " ╭┤ ◆ ◆ ├╮ ", " ╰┤ ◆ ◆ ├╯ ", "  ╰─────╯  "];
const OBJECT_PRESSED_ART: &[&str] = &["           ", "  ╭┤◆◆◆├╮  ", "  ╰┤◆◆◆├╯  ", "           "];

const SPINNER: &[char] = &['◐', '◓', '◑', '◒'];

/// Rows each store entry takes (title, description).
const STORE_ENTRY_ROWS: u16 = 2;

pub fn render(state: &ClickerState, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    if is_narrow_layout(area.width) {
        render_narrow(state, f, area, click_state);
    } else {
        render_wide(state, f, area, click_state);
    }
}

fn render_wide(state: &ClickerState, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8),  // object
            Constraint::Length(9),  // progress
            Constraint::Min(3),     // log
            Constraint::Length(3),  // controls
        ])
        .split(columns[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(STORE_ENTRY_ROWS * 4 + 2),
            Constraint::Min(3),
        ])
        .split(columns[1]);

    render_object(state, f, left[0], click_state);
    render_progress(state, f, left[1]);
    render_log(state, f, left[2]);
    render_controls(f, left[3], click_state);
    render_store(state, f, right[0], click_state);
    render_achievements(state, f, right[1]);
}

fn render_narrow(state: &ClickerState, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8),
            Constraint::Length(9),
            Constraint::Length(STORE_ENTRY_ROWS * 4 + 2),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(area);

    render_object(state, f, chunks[0], click_state);
    render_progress(state, f, chunks[1]);
    render_store(state, f, chunks[2], click_state);
    render_achievements(state, f, chunks[3]);
    render_controls(f, chunks[4], click_state);
}

fn render_object(state: &ClickerState, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let (r, g, b) = state.object_color;
    let pressed = state.click_flash > 0;
    let art = if pressed { OBJECT_PRESSED_ART } else { OBJECT_ART };
    let art_style = if pressed {
        Style::default()
            .fg(Color::Rgb(r, g, b))
            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else {
        Style::default().fg(Color::Rgb(r, g, b))
    };

    let mut lines: Vec<Line> = art
        .iter()
        .map(|row| Line::from(Span::styled(*row, art_style)))
        .collect();

    let hint = if state.can_click {
        Span::styled(
            format!("[C] CLICK  +{}", format_number(state.points_per_click())),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )
    } else {
        let spin = SPINNER[(state.anim_frame / 3) as usize % SPINNER.len()];
        Span::styled(
            format!("{} WAIT {}s", spin, state.cooldown_secs_left()),
            Style::default().fg(Color::DarkGray),
        )
    };
    lines.push(Line::from(""));
    lines.push(Line::from(hint));

    let widget = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Tier Clicker "),
    );
    f.render_widget(widget, area);

    // The whole panel is the button
    click_state.borrow_mut().add_click_target(area, CLICK_OBJECT);
}

fn render_progress(state: &ClickerState, f: &mut Frame, area: Rect) {
    let label = Style::default().fg(Color::Gray);
    let value = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
    let row = |name: &'static str, v: u64| {
        Line::from(vec![
            Span::styled(name, label),
            Span::styled(format_number(v), value),
        ])
    };

    let lines = vec![
        Line::from(vec![
            Span::styled("TOTAL POINTS: ", label),
            Span::styled(
                format_number(state.progress.points()),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        row("POINTS/CLICK: ", state.points_per_click()),
        row("AVG. CLICKS/MIN: ", state.stats.clicks_per_minute),
        row("AVG. POINTS/MIN: ", state.stats.points_per_minute),
        Line::from(""),
        row("IDLE POINTS/MIN: ", state.idle_points_per_minute()),
    ];

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Progress "),
    );
    f.render_widget(widget, area);
}

fn render_store(state: &ClickerState, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let mut cl = ClickableList::new();

    for upgrade in state.progress.store_offers() {
        let kind = upgrade.kind;
        let action = BUY_UPGRADE_BASE + kind.index() as u16;

        if upgrade.is_maxed() {
            let dim = Style::default().fg(Color::DarkGray);
            cl.push(Line::from(Span::styled("    FASTER CLICKS  PRICE: 0", dim)));
            cl.push(Line::from(Span::styled("    YOU HAVE MAXED OUT THIS UPGRADE", dim)));
            continue;
        }

        let affordable = upgrade.price() <= state.progress.points();
        let base = match state.feedback_for(kind) {
            Some(Feedback::Denied) => Style::default().fg(Color::Black).bg(Color::Rgb(0xFF, 0x83, 0x7E)),
            Some(Feedback::Purchased) => Style::default().fg(Color::Black).bg(Color::Rgb(0xA7, 0xFF, 0xA5)),
            None if affordable => Style::default().fg(Color::White),
            None => Style::default().fg(Color::DarkGray),
        };
        let key_style = base.fg(if state.feedback_for(kind).is_some() {
            Color::Black
        } else {
            Color::Yellow
        });

        cl.push_clickable(
            Line::from(vec![
                Span::styled(format!(" [{}] ", kind.key()), key_style.add_modifier(Modifier::BOLD)),
                Span::styled(upgrade.name(), base.add_modifier(Modifier::BOLD)),
                Span::styled(format!("  PRICE: {}", format_number(upgrade.price())), base),
            ]),
            action,
        );
        cl.push_clickable(
            Line::from(Span::styled(format!("     {}", upgrade.description()), base)),
            action,
        );
    }

    cl.register_targets(area, &mut click_state.borrow_mut(), 1, 1);

    let widget = Paragraph::new(cl.into_lines()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta))
            .title(" Upgrade Store "),
    );
    f.render_widget(widget, area);
}

fn render_achievements(state: &ClickerState, f: &mut Frame, area: Rect) {
    let visible = area.height.saturating_sub(2) as usize;
    let list = state.progress.achievements();
    // Newest at the bottom, oldest scrolled off
    let start = list.len().saturating_sub(visible);

    let lines: Vec<Line> = if list.is_empty() {
        vec![Line::from(Span::styled(
            " No achievements yet.",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        list[start..]
            .iter()
            .map(|a| {
                Line::from(vec![
                    Span::styled(" ★ ", Style::default().fg(Color::Yellow)),
                    Span::styled(
                        a.name().to_string(),
                        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!("  +{} POINTS", format_number(a.reward())),
                        Style::default().fg(Color::Green),
                    ),
                ])
            })
            .collect()
    };

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(format!(" Achievements ({}) ", list.len())),
    );
    f.render_widget(widget, area);
}

fn render_log(state: &ClickerState, f: &mut Frame, area: Rect) {
    let visible = area.height.saturating_sub(2) as usize;
    let lines: Vec<Line> = state
        .log
        .iter()
        .rev()
        .take(visible)
        .map(|entry| {
            let style = if entry.is_important {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            Line::from(Span::styled(entry.text.as_str(), style))
        })
        .collect();

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue))
            .title(" Log "),
    );
    f.render_widget(widget, area);
}

fn render_controls(f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let key = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let text = Style::default().fg(Color::Gray);
    let buttons: [(&str, &str, u16); 2] = [("[W]", " Save  ", SAVE_PROGRESS), ("[Q]", " Menu ", BACK_TO_MENU)];

    // Each button is tappable across the full bar height
    let mut spans = Vec::new();
    let mut x = area.x + 1;
    let mut cs = click_state.borrow_mut();
    for (label, name, action) in buttons {
        let width = (label.len() + name.len()) as u16;
        spans.push(Span::styled(label, key));
        spans.push(Span::styled(name, text));
        cs.add_click_target(Rect::new(x, area.y, width, area.height), action);
        x += width;
    }

    let widget = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(widget, area);
}
