/// Tier Clicker game logic: pure functions over `ClickerState`.

use log::{debug, info};

use super::achievement;
use super::progress::{LoadOptions, ProgressError};
use super::state::{ClickerState, Feedback, TimedEffect};
use super::upgrade::UpgradeType;

/// Ticks the click highlight stays on.
const CLICK_FLASH_TICKS: u32 = 3;

/// Start (or restart) the timeline: per-minute income and an initial
/// achievement pass over whatever progress was loaded.
pub fn begin_session(state: &mut ClickerState) {
    if let Some(token) = state.per_minute.take() {
        state.scheduler.cancel(token);
    }
    schedule_per_minute(state);
    unlock_achievements(state);
}

fn schedule_per_minute(state: &mut ClickerState) {
    let delay = state
        .config
        .ticks_for_secs(state.config.idle_period_seconds as u64);
    state.per_minute = Some(state.scheduler.schedule(delay, TimedEffect::PerMinute));
}

/// Run the achievement evaluator and report what it unlocked.
fn unlock_achievements(state: &mut ClickerState) {
    for a in achievement::evaluate(&mut state.progress) {
        state.add_log(
            &format!("★ {} unlocked! +{} points", a.name(), format_number(a.reward())),
            true,
        );
    }
}

/// Click the object. Ignored while the cooldown runs.
pub fn click(state: &mut ClickerState) -> bool {
    if !state.can_click {
        return false;
    }

    let earned = state.points_per_click();
    if state.progress.increment_points(earned).is_ok() {
        state.stats.total_points = state.stats.total_points.saturating_add(earned);
    }
    state.stats.total_clicks += 1;
    state.click_flash = CLICK_FLASH_TICKS;

    unlock_achievements(state);

    if !state.progress.speed_is_maxed() {
        state.can_click = false;
        let delay = state
            .config
            .ticks_for_secs(state.progress.click_interval_secs());
        state.cooldown = Some(state.scheduler.schedule(delay, TimedEffect::ClickReady));
    }
    true
}

/// Try to buy the store entry for `kind`. Returns true on purchase.
pub fn buy(state: &mut ClickerState, kind: UpgradeType) -> bool {
    match state.progress.purchase_upgrade(kind) {
        Ok(purchase) => {
            state.add_log(
                &format!(
                    "Bought {} for {} points",
                    purchase.upgrade.name(),
                    format_number(purchase.upgrade.price())
                ),
                false,
            );
            if kind == UpgradeType::StyleColor {
                state.object_color = random_color(state);
            }
            set_feedback(state, kind.index(), Feedback::Purchased);
            unlock_achievements(state);
            true
        }
        Err(ProgressError::InsufficientFunds { price, available }) => {
            state.add_log(
                &format!(
                    "Not enough points ({} / {})",
                    format_number(available),
                    format_number(price)
                ),
                false,
            );
            set_feedback(state, kind.index(), Feedback::Denied);
            false
        }
        Err(e) => {
            debug!("purchase refused: {e}");
            state.add_log(&format!("{e}"), false);
            false
        }
    }
}

/// Show `feedback` on a store slot and schedule its reset. An earlier reset
/// for the same slot becomes stale.
fn set_feedback(state: &mut ClickerState, slot: usize, feedback: Feedback) {
    let generation = state.feedback_generation[slot].wrapping_add(1);
    state.feedback_generation[slot] = generation;
    state.feedback[slot] = Some(feedback);
    let delay = state
        .config
        .ticks_for_secs(state.config.color_reset_seconds as u64);
    state
        .scheduler
        .schedule(delay, TimedEffect::ResetFeedback { slot, generation });
}

/// Advance the session by `delta_ticks` and apply every effect that came due.
pub fn tick(state: &mut ClickerState, delta_ticks: u32) {
    state.anim_frame = state.anim_frame.wrapping_add(delta_ticks);
    state.click_flash = state.click_flash.saturating_sub(delta_ticks);

    for effect in state.scheduler.advance(delta_ticks as u64) {
        apply_effect(state, effect);
    }
}

fn apply_effect(state: &mut ClickerState, effect: TimedEffect) {
    match effect {
        TimedEffect::PerMinute => per_minute(state),
        TimedEffect::ClickReady => {
            state.can_click = true;
            state.cooldown = None;
        }
        TimedEffect::ResetFeedback { slot, generation } => {
            if state.feedback_generation.get(slot) == Some(&generation) {
                state.feedback[slot] = None;
            }
        }
    }
}

fn per_minute(state: &mut ClickerState) {
    let idle = state.idle_points_per_minute();
    if idle > 0 && state.progress.increment_points(idle).is_ok() {
        state.stats.total_points = state.stats.total_points.saturating_add(idle);
        state.add_log(&format!("+{} idle points", format_number(idle)), false);
    }

    let stats = &mut state.stats;
    stats.clicks_per_minute = stats.total_clicks / stats.total_minutes;
    stats.points_per_minute = stats.total_points / stats.total_minutes;
    stats.total_minutes += 1;

    unlock_achievements(state);
    schedule_per_minute(state);
}

/// Persist progress to the session's storage.
pub fn save(state: &mut ClickerState) -> bool {
    let ok = state.progress.save(state.storage.as_mut());
    if ok {
        state.add_log("Progress saved.", false);
    } else {
        state.add_log("Could not save progress.", true);
    }
    ok
}

/// Restore progress from the session's storage.
pub fn load(state: &mut ClickerState) -> bool {
    let options = LoadOptions {
        clear_storage_first: state.config.debug_clear_on_load,
    };
    let ok = state.progress.load(state.storage.as_mut(), options);
    if ok {
        info!("continuing with {} points", state.progress.points());
        state.add_log(
            &format!(
                "Welcome back! {} points.",
                format_number(state.progress.points())
            ),
            false,
        );
    }
    ok
}

/// Random bright colour for the style upgrade.
fn random_color(state: &mut ClickerState) -> (u8, u8, u8) {
    let hue = (state.next_random() % 360) as f64;
    let sat = 0.5 + (state.next_random() % 50) as f64 / 100.0;
    let val = 0.7 + (state.next_random() % 30) as f64 / 100.0;
    hsv_to_rgb(hue, sat, val)
}

fn hsv_to_rgb(h: f64, s: f64, v: f64) -> (u8, u8, u8) {
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;
    let (r, g, b) = match (h / 60.0) as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let to_byte = |f: f64| ((f + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    (to_byte(r), to_byte(g), to_byte(b))
}

/// Format with thousands separators.
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}
