/// Tier Clicker: click for points, buy tiered upgrades, unlock milestones.

pub mod achievement;
pub mod actions;
pub mod logic;
pub mod progress;
pub mod render;
pub mod state;
pub mod storage;
pub mod upgrade;

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;

use crate::config::ClickerConfig;
use crate::games::Game;
use crate::input::{ClickState, InputEvent};

use actions::{upgrade_for_action, CLICK_OBJECT, SAVE_PROGRESS};
use state::ClickerState;
use storage::KeyValueStore;
use upgrade::UpgradeType;

pub struct ClickerGame {
    pub state: ClickerState,
}

impl ClickerGame {
    /// Open a session on `storage`, continuing any saved progress.
    pub fn new(config: ClickerConfig, storage: Box<dyn KeyValueStore>) -> Self {
        let mut state = ClickerState::new(config, storage);
        logic::load(&mut state);
        logic::begin_session(&mut state);
        Self { state }
    }

    /// Seed for the style colour RNG.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.state.rng_state = seed;
        self
    }
}

impl Game for ClickerGame {
    fn handle_input(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::Key('c') | InputEvent::Key(' ') => {
                logic::click(&mut self.state);
                true
            }
            InputEvent::Key(c @ '1'..='4') => {
                let slot = (*c as u8 - b'1') as usize;
                if let Some(kind) = UpgradeType::from_index(slot) {
                    logic::buy(&mut self.state, kind);
                }
                true
            }
            InputEvent::Key('w') => {
                logic::save(&mut self.state);
                true
            }
            InputEvent::Click(CLICK_OBJECT) => {
                logic::click(&mut self.state);
                true
            }
            InputEvent::Click(SAVE_PROGRESS) => {
                logic::save(&mut self.state);
                true
            }
            InputEvent::Click(id) => match upgrade_for_action(*id) {
                Some(kind) => {
                    logic::buy(&mut self.state, kind);
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    fn tick(&mut self, delta_ticks: u32) {
        logic::tick(&mut self.state, delta_ticks);
    }

    fn render(&self, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
        render::render(&self.state, f, area, click_state);
    }

    fn suspend(&mut self) -> bool {
        logic::save(&mut self.state)
    }
}
