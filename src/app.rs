//! Scenes: the start menu and the game it opens.
//!
//! Progress is loaded once when the game is created and saved whenever the
//! player leaves it, from the game or from the menu.

use std::cell::RefCell;
use std::rc::Rc;

use log::info;
use ratzilla::ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Paragraph};
use ratzilla::ratatui::Frame;

use crate::games::clicker::actions::BACK_TO_MENU;
use crate::games::Game;
use crate::input::{ClickState, InputEvent};
use crate::widgets::ClickableList;

pub const START_GAME: u16 = 900;
pub const EXIT_GAME: u16 = 901;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scene {
    Menu,
    Playing,
    /// Progress saved; nothing left to do but close the tab.
    Exited,
}

pub struct App {
    pub scene: Scene,
    game: Box<dyn Game>,
}

impl App {
    pub fn new(game: Box<dyn Game>) -> Self {
        Self {
            scene: Scene::Menu,
            game,
        }
    }

    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        match self.scene {
            Scene::Menu => match event {
                InputEvent::Key('\n') | InputEvent::Key('s') | InputEvent::Click(START_GAME) => {
                    info!("starting game");
                    self.scene = Scene::Playing;
                    true
                }
                InputEvent::Key('q') | InputEvent::Click(EXIT_GAME) => {
                    self.game.suspend();
                    self.scene = Scene::Exited;
                    true
                }
                _ => false,
            },
            Scene::Playing => match event {
                InputEvent::Key('q') | InputEvent::Click(BACK_TO_MENU) => {
                    self.game.suspend();
                    self.scene = Scene::Menu;
                    true
                }
                _ => self.game.handle_input(event),
            },
            Scene::Exited => false,
        }
    }

    /// Game time only runs while playing.
    pub fn tick(&mut self, delta_ticks: u32) {
        if self.scene == Scene::Playing && delta_ticks > 0 {
            self.game.tick(delta_ticks);
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
        match self.scene {
            Scene::Menu => render_menu(f, area, click_state),
            Scene::Playing => self.game.render(f, area, click_state),
            Scene::Exited => render_exited(f, area),
        }
    }
}

fn centered(area: Rect, height: u16) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);
    chunks[1]
}

fn render_menu(f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let panel = centered(area, 9);
    let title = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let button = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);

    let mut cl = ClickableList::new();
    cl.push(Line::from(Span::styled("T I E R   C L I C K E R", title)));
    cl.push(Line::from(""));
    cl.push(Line::from(Span::styled(
        "Click. Upgrade. Repeat.",
        Style::default().fg(Color::Gray),
    )));
    cl.push(Line::from(""));
    cl.push_clickable(Line::from(Span::styled("[S] START", button)), START_GAME);
    cl.push(Line::from(""));
    cl.push_clickable(Line::from(Span::styled("[Q] EXIT", button)), EXIT_GAME);

    cl.register_targets(panel, &mut click_state.borrow_mut(), 1, 1);

    let widget = Paragraph::new(cl.into_lines())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        );
    f.render_widget(widget, panel);
}

fn render_exited(f: &mut Frame, area: Rect) {
    let panel = centered(area, 3);
    let widget = Paragraph::new(Line::from(Span::styled(
        "Progress saved. You can close this tab.",
        Style::default().fg(Color::Green),
    )))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(widget, panel);
}
