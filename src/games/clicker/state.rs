/// Tier Clicker session state.

use crate::config::ClickerConfig;
use crate::time::{Scheduler, TimerToken};

use super::progress::ProgressStore;
use super::storage::KeyValueStore;
use super::upgrade::UpgradeType;

/// Colour flash on a store entry after a purchase attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Feedback {
    /// Not enough points (red).
    Denied,
    /// Bought (green).
    Purchased,
}

/// Delayed effects on the session timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimedEffect {
    /// Idle income and per-minute averages.
    PerMinute,
    /// Click cooldown over.
    ClickReady,
    /// Clear a store entry's feedback, unless it was replaced since.
    ResetFeedback { slot: usize, generation: u32 },
}

/// Per-session statistics. Not persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionStats {
    pub total_clicks: u64,
    /// Points earned by clicking and idling (rewards excluded).
    pub total_points: u64,
    /// Minutes the averages divide by. Starts at 1.
    pub total_minutes: u64,
    pub clicks_per_minute: u64,
    pub points_per_minute: u64,
}

impl Default for SessionStats {
    fn default() -> Self {
        Self {
            total_clicks: 0,
            total_points: 0,
            total_minutes: 1,
            clicks_per_minute: 0,
            points_per_minute: 0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ClickerLogEntry {
    pub text: String,
    pub is_important: bool,
}

pub struct ClickerState {
    pub progress: ProgressStore,
    pub config: ClickerConfig,
    pub storage: Box<dyn KeyValueStore>,
    pub stats: SessionStats,
    /// False while the click cooldown runs.
    pub can_click: bool,
    pub cooldown: Option<TimerToken>,
    pub per_minute: Option<TimerToken>,
    /// Store entry feedback, indexed by store slot.
    pub feedback: [Option<Feedback>; 4],
    /// Bumped whenever a slot's feedback is replaced.
    pub feedback_generation: [u32; 4],
    /// Object colour, changed by the style upgrade.
    pub object_color: (u8, u8, u8),
    pub scheduler: Scheduler<TimedEffect>,
    pub log: Vec<ClickerLogEntry>,
    /// Animation frame counter (incremented every tick).
    pub anim_frame: u32,
    /// Ticks of click highlight remaining.
    pub click_flash: u32,
    pub rng_state: u64,
}

impl ClickerState {
    pub fn new(config: ClickerConfig, storage: Box<dyn KeyValueStore>) -> Self {
        Self {
            progress: ProgressStore::new(),
            config,
            storage,
            stats: SessionStats::default(),
            can_click: true,
            cooldown: None,
            per_minute: None,
            feedback: [None; 4],
            feedback_generation: [0; 4],
            object_color: (255, 255, 255),
            scheduler: Scheduler::new(),
            log: vec![ClickerLogEntry {
                text: "Click the object to earn points.".into(),
                is_important: false,
            }],
            anim_frame: 0,
            click_flash: 0,
            rng_state: 42,
        }
    }

    pub fn add_log(&mut self, text: &str, is_important: bool) {
        self.log.push(ClickerLogEntry {
            text: text.to_string(),
            is_important,
        });
        if self.log.len() > 50 {
            self.log.remove(0);
        }
    }

    pub fn next_random(&mut self) -> u64 {
        self.rng_state = self
            .rng_state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.rng_state >> 33
    }

    pub fn points_per_click(&self) -> u64 {
        self.progress.points_per_click(self.config.default_click_amount)
    }

    pub fn idle_points_per_minute(&self) -> u64 {
        self.progress
            .idle_points_per_minute(self.config.default_idle_amount)
    }

    pub fn feedback_for(&self, kind: UpgradeType) -> Option<Feedback> {
        self.feedback[kind.index()]
    }

    /// Seconds left on the click cooldown, rounded up.
    pub fn cooldown_secs_left(&self) -> u64 {
        let tps = (self.config.ticks_per_second as u64).max(1);
        self.cooldown
            .and_then(|t| self.scheduler.remaining(t))
            .map(|ticks| ticks.div_ceil(tps))
            .unwrap_or(0)
    }
}
