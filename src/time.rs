//! Fixed-timestep clock and a tick-based timeline of delayed effects.
//!
//! `draw_web()` calls at ~60fps with variable delta. `GameTime` turns that
//! into whole ticks; `Scheduler` holds effects due at a future tick. Both are
//! plain data so game logic stays deterministic and testable.

pub struct GameTime {
    /// Milliseconds per tick (e.g. 100ms = 10 ticks/sec)
    ms_per_tick: f64,
    /// Milliseconds not yet consumed as ticks
    accumulator: f64,
    last_timestamp: Option<f64>,
}

impl GameTime {
    pub fn new(ticks_per_sec: u32) -> Self {
        Self {
            ms_per_tick: 1000.0 / ticks_per_sec.max(1) as f64,
            accumulator: 0.0,
            last_timestamp: None,
        }
    }

    /// Feed a wall-clock timestamp (`performance.now()`), get the number of
    /// ticks to run this frame.
    pub fn update(&mut self, now_ms: f64) -> u32 {
        let delta = match self.last_timestamp {
            // Clamp so a backgrounded tab does not replay minutes of ticks at once
            Some(prev) => (now_ms - prev).clamp(0.0, 500.0),
            None => 0.0,
        };
        self.last_timestamp = Some(now_ms);

        self.accumulator += delta;
        let ticks = (self.accumulator / self.ms_per_tick) as u32;
        self.accumulator -= ticks as f64 * self.ms_per_tick;
        ticks
    }
}

/// Handle to a scheduled effect. Stale once the effect fired or was cancelled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

#[derive(Debug)]
struct Pending<E> {
    due: u64,
    token: TimerToken,
    effect: E,
}

/// One logical timeline of delayed effects, advanced in ticks.
///
/// Nothing runs on its own: `advance` hands back the effects that came due and
/// the owner applies them. Effects that reference something that may be gone
/// by then should carry their own validity check.
#[derive(Debug)]
pub struct Scheduler<E> {
    now: u64,
    next_id: u64,
    pending: Vec<Pending<E>>,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self {
            now: 0,
            next_id: 0,
            pending: Vec::new(),
        }
    }
}

impl<E> Scheduler<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current tick.
    #[cfg(test)]
    pub fn now(&self) -> u64 {
        self.now
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Schedule `effect` to come due `delay_ticks` from now.
    pub fn schedule(&mut self, delay_ticks: u64, effect: E) -> TimerToken {
        let token = TimerToken(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending {
            due: self.now.saturating_add(delay_ticks),
            token,
            effect,
        });
        token
    }

    /// Drop a pending effect. Returns false for a stale token.
    pub fn cancel(&mut self, token: TimerToken) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.token != token);
        self.pending.len() != before
    }

    #[cfg(test)]
    pub fn is_pending(&self, token: TimerToken) -> bool {
        self.pending.iter().any(|p| p.token == token)
    }

    /// Ticks until `token` comes due, if it is still pending.
    pub fn remaining(&self, token: TimerToken) -> Option<u64> {
        self.pending
            .iter()
            .find(|p| p.token == token)
            .map(|p| p.due.saturating_sub(self.now))
    }

    /// Move time forward and return every effect now due, earliest first
    /// (ties in scheduling order).
    pub fn advance(&mut self, ticks: u64) -> Vec<E> {
        self.now = self.now.saturating_add(ticks);
        let now = self.now;
        let (mut due, rest): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.pending)
                .into_iter()
                .partition(|p| p.due <= now);
        self.pending = rest;
        due.sort_by_key(|p| (p.due, p.token.0));
        due.into_iter().map(|p| p.effect).collect()
    }
}
