mod app;
mod config;
mod games;
mod input;
mod logger;
mod time;
mod widgets;

use std::{cell::RefCell, io, rc::Rc};

use log::{warn, LevelFilter};
use ratzilla::event::{KeyCode, MouseButton, MouseEventKind};
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};

use app::App;
use config::ClickerConfig;
use games::clicker::storage::{KeyValueStore, MemoryStore};
use games::clicker::ClickerGame;
use input::{ClickState, InputEvent};
use time::GameTime;

/// Resolve a mouse position against the grid container the DomBackend
/// creates inside `<body>`.
fn dom_click_to_action(mouse_x: u32, mouse_y: u32, cs: &ClickState) -> Option<u16> {
    let document = web_sys::window()?.document()?;
    let grid = document.query_selector("body > div").ok()??;
    let rect = grid.get_bounding_client_rect();
    cs.resolve_pixel(
        mouse_x as f64 - rect.left(),
        mouse_y as f64 - rect.top(),
        rect.width(),
        rect.height(),
    )
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

#[cfg(target_arch = "wasm32")]
fn open_storage() -> Box<dyn KeyValueStore> {
    match games::clicker::storage::LocalStorage::open() {
        Ok(storage) => Box::new(storage),
        Err(e) => {
            warn!("{e}; progress will not survive a reload");
            Box::new(MemoryStore::new())
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn open_storage() -> Box<dyn KeyValueStore> {
    warn!("no persistent storage on this target");
    Box::new(MemoryStore::new())
}

#[cfg(target_arch = "wasm32")]
fn load_config() -> ClickerConfig {
    config::load_config()
}

#[cfg(not(target_arch = "wasm32"))]
fn load_config() -> ClickerConfig {
    ClickerConfig::default()
}

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();
    logger::init(LevelFilter::Info);

    let config = load_config();
    let game_time = RefCell::new(GameTime::new(config.ticks_per_second));
    let seed = (js_sys::Math::random() * u32::MAX as f64) as u64 | 1;
    let game = ClickerGame::new(config, open_storage()).with_seed(seed);

    let app = Rc::new(RefCell::new(App::new(Box::new(game))));
    let click_state = Rc::new(RefCell::new(ClickState::new()));
    let backend = DomBackend::new()?;
    let terminal = Terminal::new(backend)?;

    terminal.on_mouse_event({
        let app = app.clone();
        let click_state = click_state.clone();
        move |mouse_event| {
            if mouse_event.event != MouseEventKind::Pressed
                || mouse_event.button != MouseButton::Left
            {
                return;
            }
            let action = {
                let cs = click_state.borrow();
                if cs.terminal_rows == 0 || cs.terminal_cols == 0 {
                    return;
                }
                dom_click_to_action(mouse_event.x, mouse_event.y, &cs)
            };
            if let Some(id) = action {
                app.borrow_mut().handle_input(&InputEvent::Click(id));
            }
        }
    });

    terminal.on_key_event({
        let app = app.clone();
        move |key_event| {
            let key = match key_event.code {
                KeyCode::Char(c) => c.to_ascii_lowercase(),
                KeyCode::Enter => '\n',
                KeyCode::Esc => 'q',
                _ => return,
            };
            app.borrow_mut().handle_input(&InputEvent::Key(key));
        }
    });

    terminal.draw_web({
        let click_state = click_state.clone();
        move |f| {
            let ticks = game_time.borrow_mut().update(now_ms());
            app.borrow_mut().tick(ticks);

            let size = f.area();
            {
                let mut cs = click_state.borrow_mut();
                cs.terminal_cols = size.width;
                cs.terminal_rows = size.height;
                cs.clear_targets();
            }
            app.borrow().render(f, size, &click_state);
        }
    });

    Ok(())
}
