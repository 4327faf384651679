//! Player progress: points, upgrade tiers and unlocked achievements.
//!
//! `ProgressStore` is an owned value. The session that needs it holds it and
//! hands out references; there is no process-wide instance.

use log::{debug, info, warn};
use thiserror::Error;

use super::achievement::Achievement;
use super::storage::{KeyValueStore, StorageError};
use super::upgrade::{Upgrade, UpgradeType, MAXIMUM_CLICK_SPEED};

pub const KEY_POINTS: &str = "currentPoints";
pub const KEY_CLICK_TIER: &str = "clickUpgradeTier";
pub const KEY_IDLE_TIER: &str = "idleUpgradeTier";
pub const KEY_SPEED_TIER: &str = "speedUpgradeTier";

/// Every key a save writes and a load requires.
pub const PERSISTED_KEYS: [&str; 4] = [KEY_POINTS, KEY_CLICK_TIER, KEY_IDLE_TIER, KEY_SPEED_TIER];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgressError {
    #[error("{what} must be greater than zero")]
    InvalidArgument { what: &'static str },
    #[error("not enough points: {price} needed, {available} available")]
    InsufficientFunds { price: u64, available: u64 },
    #[error("{0} is already maxed out")]
    UpgradeMaxed(String),
}

/// Options for [`ProgressStore::load`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Wipe the whole store before looking for a save. Debug only: a load
    /// with this set always finds nothing.
    pub clear_storage_first: bool,
}

/// Result of a successful [`ProgressStore::purchase_upgrade`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Purchase {
    pub upgrade: Upgrade,
    pub points_left: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgressStore {
    points: u64,
    click_tier: u64,
    idle_tier: u64,
    speed_tier: u64,
    achievements: Vec<Achievement>,
}

impl Default for ProgressStore {
    fn default() -> Self {
        Self {
            points: 0,
            click_tier: 1,
            idle_tier: 0,
            speed_tier: 1,
            achievements: Vec::new(),
        }
    }
}

fn require_positive(value: u64, what: &'static str) -> Result<u64, ProgressError> {
    if value == 0 {
        Err(ProgressError::InvalidArgument { what })
    } else {
        Ok(value)
    }
}

impl ProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Mutations ───────────────────────────────────────────────

    /// Add `amount` points and return the new total.
    pub fn increment_points(&mut self, amount: u64) -> Result<u64, ProgressError> {
        let amount = require_positive(amount, "points")?;
        self.points = self.points.saturating_add(amount);
        Ok(self.points)
    }

    /// Deduct the price of `upgrade`. Tiers are left alone; see
    /// [`purchase_upgrade`](Self::purchase_upgrade) for the one-step version.
    pub fn buy_upgrade(&mut self, upgrade: &Upgrade) -> Result<u64, ProgressError> {
        let price = upgrade.price();
        if price > self.points {
            return Err(ProgressError::InsufficientFunds {
                price,
                available: self.points,
            });
        }
        self.points -= price;
        Ok(self.points)
    }

    pub fn set_click_tier(&mut self, tier: u64) -> Result<u64, ProgressError> {
        self.click_tier = require_positive(tier, "click tier")?;
        Ok(self.click_tier)
    }

    /// Idle starts at 0 but can never be set back to it.
    pub fn set_idle_tier(&mut self, tier: u64) -> Result<u64, ProgressError> {
        self.idle_tier = require_positive(tier, "idle tier")?;
        Ok(self.idle_tier)
    }

    pub fn set_speed_tier(&mut self, tier: u64) -> Result<u64, ProgressError> {
        self.speed_tier = require_positive(tier, "speed tier")?;
        Ok(self.speed_tier)
    }

    /// Append without checking for duplicates.
    pub fn unlock_achievement(&mut self, achievement: Achievement) -> &[Achievement] {
        self.achievements.push(achievement);
        &self.achievements
    }

    /// Buy the next tier of `kind` in one step: check it is not maxed, check
    /// funds, deduct the price and advance the matching tier.
    pub fn purchase_upgrade(&mut self, kind: UpgradeType) -> Result<Purchase, ProgressError> {
        let upgrade = self.next_upgrade(kind);
        if upgrade.is_maxed() {
            return Err(ProgressError::UpgradeMaxed(name_of_track(kind)));
        }
        let points_left = self.buy_upgrade(&upgrade)?;
        match kind {
            UpgradeType::ClickIncrease => self.set_click_tier(upgrade.tier)?,
            UpgradeType::ClickSpeed => self.set_speed_tier(upgrade.tier)?,
            UpgradeType::IdleIncrease => self.set_idle_tier(upgrade.tier)?,
            UpgradeType::StyleColor => 0,
        };
        debug!("bought {} for {}", upgrade.name(), upgrade.price());
        Ok(Purchase {
            upgrade,
            points_left,
        })
    }

    // ── Queries ─────────────────────────────────────────────────

    pub fn points(&self) -> u64 {
        self.points
    }

    pub fn click_tier(&self) -> u64 {
        self.click_tier
    }

    pub fn idle_tier(&self) -> u64 {
        self.idle_tier
    }

    pub fn speed_tier(&self) -> u64 {
        self.speed_tier
    }

    pub fn achievements(&self) -> &[Achievement] {
        &self.achievements
    }

    pub fn has_unlocked(&self, achievement: &Achievement) -> bool {
        self.achievements.contains(achievement)
    }

    /// Upgrades bought beyond the starting tiers (click 1, idle 0, speed 1).
    pub fn total_upgrade_tier(&self) -> u64 {
        self.click_tier
            .saturating_add(self.idle_tier)
            .saturating_add(self.speed_tier)
            .saturating_sub(2)
    }

    /// The upgrade the store offers next for `kind`.
    pub fn next_upgrade(&self, kind: UpgradeType) -> Upgrade {
        let tier = match kind {
            UpgradeType::ClickIncrease => self.click_tier.saturating_add(1),
            UpgradeType::ClickSpeed => self.speed_tier.saturating_add(1),
            UpgradeType::IdleIncrease => self.idle_tier.saturating_add(1),
            UpgradeType::StyleColor => 0,
        };
        Upgrade::new(kind, tier)
    }

    /// All four store entries, in store order.
    pub fn store_offers(&self) -> [Upgrade; 4] {
        [
            self.next_upgrade(UpgradeType::ClickIncrease),
            self.next_upgrade(UpgradeType::ClickSpeed),
            self.next_upgrade(UpgradeType::IdleIncrease),
            self.next_upgrade(UpgradeType::StyleColor),
        ]
    }

    pub fn points_per_click(&self, default_click_amount: u64) -> u64 {
        let m = Upgrade::new(UpgradeType::ClickIncrease, self.click_tier).multiplier();
        default_click_amount.saturating_mul(m.max(0) as u64)
    }

    pub fn idle_points_per_minute(&self, default_idle_amount: u64) -> u64 {
        let m = Upgrade::new(UpgradeType::IdleIncrease, self.idle_tier).multiplier();
        default_idle_amount.saturating_mul(m.max(0) as u64)
    }

    /// Seconds a click locks out further clicks. Zero once speed is maxed.
    pub fn click_interval_secs(&self) -> u64 {
        Upgrade::new(UpgradeType::ClickSpeed, self.speed_tier)
            .multiplier()
            .max(0) as u64
    }

    pub fn speed_is_maxed(&self) -> bool {
        self.speed_tier >= MAXIMUM_CLICK_SPEED
    }

    // ── Persistence ─────────────────────────────────────────────

    fn write_to(&self, store: &mut dyn KeyValueStore) -> Result<(), StorageError> {
        store.set_int(KEY_POINTS, self.points)?;
        store.set_int(KEY_CLICK_TIER, self.click_tier)?;
        store.set_int(KEY_IDLE_TIER, self.idle_tier)?;
        store.set_int(KEY_SPEED_TIER, self.speed_tier)?;
        store.flush()
    }

    /// Write points and tiers. Achievements are not persisted.
    ///
    /// Returns whether all four keys are present afterwards.
    pub fn save(&self, store: &mut dyn KeyValueStore) -> bool {
        if let Err(e) = self.write_to(store) {
            warn!("save failed: {e}");
            return false;
        }
        let complete = PERSISTED_KEYS.iter().all(|key| store.has_key(key));
        if complete {
            info!(
                "saved progress: {} points, tiers {}/{}/{}",
                self.points, self.click_tier, self.idle_tier, self.speed_tier
            );
        } else {
            warn!("save finished but some keys are missing");
        }
        complete
    }

    /// Restore points and tiers. Returns false, leaving the state untouched,
    /// when there is no complete save. Achievements always start empty.
    pub fn load(&mut self, store: &mut dyn KeyValueStore, options: LoadOptions) -> bool {
        if options.clear_storage_first {
            warn!("clearing persisted storage before load (debug option)");
            if let Err(e) = store.delete_all() {
                warn!("could not clear storage: {e}");
            }
        }

        if !PERSISTED_KEYS.iter().all(|key| store.has_key(key)) {
            info!("no saved progress found");
            return false;
        }

        let restored = match read_from(store) {
            Ok(values) => values,
            Err(e) => {
                warn!("saved progress is unreadable: {e}");
                return false;
            }
        };
        let [points, click_tier, idle_tier, speed_tier] = restored;
        if click_tier == 0 || speed_tier == 0 {
            warn!("saved progress has a zero click or speed tier; ignoring it");
            return false;
        }

        self.points = points;
        self.click_tier = click_tier;
        self.idle_tier = idle_tier;
        self.speed_tier = speed_tier;
        self.achievements.clear();
        info!(
            "loaded progress: {} points, tiers {}/{}/{}",
            points, click_tier, idle_tier, speed_tier
        );
        true
    }
}

fn read_from(store: &dyn KeyValueStore) -> Result<[u64; 4], StorageError> {
    let mut values = [0u64; 4];
    for (slot, key) in values.iter_mut().zip(PERSISTED_KEYS) {
        *slot = store
            .get_int(key)?
            .ok_or_else(|| StorageError::Missing(key.to_string()))?;
    }
    Ok(values)
}

fn name_of_track(kind: UpgradeType) -> String {
    match kind {
        UpgradeType::ClickIncrease => "BETTER CLICKS",
        UpgradeType::ClickSpeed => "FASTER CLICKS",
        UpgradeType::IdleIncrease => "IDLE POINTS",
        UpgradeType::StyleColor => "CUSTOM STYLE",
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::clicker::storage::MemoryStore;

    fn progress_with_points(points: u64) -> ProgressStore {
        let mut p = ProgressStore::new();
        if points > 0 {
            p.increment_points(points).unwrap();
        }
        p
    }

    #[test]
    fn defaults() {
        let p = ProgressStore::new();
        assert_eq!(p.points(), 0);
        assert_eq!(p.click_tier(), 1);
        assert_eq!(p.idle_tier(), 0);
        assert_eq!(p.speed_tier(), 1);
        assert!(p.achievements().is_empty());
        assert_eq!(p.total_upgrade_tier(), 0);
    }

    #[test]
    fn increment_points_adds_amount() {
        let mut p = ProgressStore::new();
        assert_eq!(p.increment_points(3), Ok(3));
        assert_eq!(p.increment_points(4), Ok(7));
    }

    #[test]
    fn increment_points_rejects_zero() {
        let mut p = progress_with_points(5);
        assert!(matches!(
            p.increment_points(0),
            Err(ProgressError::InvalidArgument { .. })
        ));
        assert_eq!(p.points(), 5);
    }

    #[test]
    fn buy_upgrade_insufficient_funds_leaves_points() {
        let mut p = progress_with_points(10);
        let up = Upgrade::new(UpgradeType::ClickIncrease, 2); // 30
        assert_eq!(
            p.buy_upgrade(&up),
            Err(ProgressError::InsufficientFunds {
                price: 30,
                available: 10
            })
        );
        assert_eq!(p.points(), 10);
    }

    #[test]
    fn buy_upgrade_deducts_price_only() {
        let mut p = progress_with_points(40);
        let up = Upgrade::new(UpgradeType::ClickIncrease, 2);
        assert_eq!(p.buy_upgrade(&up), Ok(10));
        assert_eq!(p.click_tier(), 1);
    }

    #[test]
    fn buy_upgrade_exact_price() {
        let mut p = progress_with_points(24);
        assert_eq!(p.buy_upgrade(&Upgrade::new(UpgradeType::ClickSpeed, 3)), Ok(0));
    }

    #[test]
    fn tier_setters_reject_zero() {
        let mut p = ProgressStore::new();
        assert!(p.set_click_tier(0).is_err());
        assert!(p.set_idle_tier(0).is_err());
        assert!(p.set_speed_tier(0).is_err());
        assert_eq!(p.click_tier(), 1);
        assert_eq!(p.idle_tier(), 0);
        assert_eq!(p.speed_tier(), 1);
    }

    #[test]
    fn tier_setters_allow_lowering() {
        let mut p = ProgressStore::new();
        p.set_click_tier(5).unwrap();
        assert_eq!(p.set_click_tier(2), Ok(2));
        assert_eq!(p.click_tier(), 2);
    }

    #[test]
    fn unlock_achievement_does_not_deduplicate() {
        let mut p = ProgressStore::new();
        let a = Achievement::new("FIRST POINT", 5);
        p.unlock_achievement(a.clone());
        let list = p.unlock_achievement(a.clone());
        assert_eq!(list.len(), 2);
        assert!(p.has_unlocked(&a));
    }

    #[test]
    fn purchase_upgrade_advances_tier() {
        let mut p = progress_with_points(100);
        let purchase = p.purchase_upgrade(UpgradeType::ClickIncrease).unwrap();
        assert_eq!(purchase.upgrade, Upgrade::new(UpgradeType::ClickIncrease, 2));
        assert_eq!(purchase.points_left, 70);
        assert_eq!(p.click_tier(), 2);
        assert_eq!(p.next_upgrade(UpgradeType::ClickIncrease).tier, 3);
    }

    #[test]
    fn purchase_idle_from_zero() {
        let mut p = progress_with_points(25);
        p.purchase_upgrade(UpgradeType::IdleIncrease).unwrap();
        assert_eq!(p.idle_tier(), 1);
        assert_eq!(p.points(), 0);
    }

    #[test]
    fn purchase_upgrade_insufficient_keeps_tier() {
        let mut p = progress_with_points(10);
        assert!(matches!(
            p.purchase_upgrade(UpgradeType::IdleIncrease),
            Err(ProgressError::InsufficientFunds { .. })
        ));
        assert_eq!(p.idle_tier(), 0);
        assert_eq!(p.points(), 10);
    }

    #[test]
    fn purchase_style_keeps_tiers() {
        let mut p = progress_with_points(1500);
        let purchase = p.purchase_upgrade(UpgradeType::StyleColor).unwrap();
        assert_eq!(purchase.points_left, 500);
        assert_eq!(p.total_upgrade_tier(), 0);
    }

    #[test]
    fn speed_purchase_stops_at_maximum() {
        let mut p = progress_with_points(1000);
        for expected in 2..=MAXIMUM_CLICK_SPEED {
            p.purchase_upgrade(UpgradeType::ClickSpeed).unwrap();
            assert_eq!(p.speed_tier(), expected);
        }
        assert!(p.speed_is_maxed());
        assert_eq!(p.click_interval_secs(), 0);
        let before = p.points();
        assert!(matches!(
            p.purchase_upgrade(UpgradeType::ClickSpeed),
            Err(ProgressError::UpgradeMaxed(_))
        ));
        assert_eq!(p.points(), before);
        assert_eq!(p.speed_tier(), MAXIMUM_CLICK_SPEED);
    }

    #[test]
    fn store_offers_follow_tiers() {
        let mut p = ProgressStore::new();
        p.set_click_tier(3).unwrap();
        let offers = p.store_offers();
        assert_eq!(offers[0], Upgrade::new(UpgradeType::ClickIncrease, 4));
        assert_eq!(offers[1], Upgrade::new(UpgradeType::ClickSpeed, 2));
        assert_eq!(offers[2], Upgrade::new(UpgradeType::IdleIncrease, 1));
        assert_eq!(offers[3], Upgrade::new(UpgradeType::StyleColor, 0));
    }

    #[test]
    fn derived_rates() {
        let mut p = ProgressStore::new();
        assert_eq!(p.points_per_click(1), 2);
        assert_eq!(p.idle_points_per_minute(1), 0);
        assert_eq!(p.click_interval_secs(), 3);
        p.set_click_tier(3).unwrap();
        p.set_idle_tier(2).unwrap();
        assert_eq!(p.points_per_click(2), 12);
        assert_eq!(p.idle_points_per_minute(1), 8);
    }

    #[test]
    fn save_then_load_roundtrip() {
        let mut store = MemoryStore::new();
        let mut original = progress_with_points(321);
        original.set_click_tier(4).unwrap();
        original.set_idle_tier(2).unwrap();
        original.set_speed_tier(3).unwrap();
        original.unlock_achievement(Achievement::new("FIRST POINT", 5));
        assert!(original.save(&mut store));

        let mut restored = ProgressStore::new();
        restored.unlock_achievement(Achievement::new("MAX SPEED", 500));
        assert!(restored.load(&mut store, LoadOptions::default()));
        assert_eq!(restored.points(), 321);
        assert_eq!(restored.click_tier(), 4);
        assert_eq!(restored.idle_tier(), 2);
        assert_eq!(restored.speed_tier(), 3);
        assert!(restored.achievements().is_empty());
    }

    #[test]
    fn save_writes_exactly_the_four_keys() {
        let mut store = MemoryStore::new();
        assert!(ProgressStore::new().save(&mut store));
        assert_eq!(store.len(), 4);
        for key in PERSISTED_KEYS {
            assert!(store.has_key(key), "missing {key}");
        }
        assert_eq!(store.get_int(KEY_IDLE_TIER).unwrap(), Some(0));
    }

    #[test]
    fn load_from_empty_storage_is_noop() {
        let mut store = MemoryStore::new();
        let mut p = progress_with_points(9);
        p.set_click_tier(2).unwrap();
        let before = p.clone();
        assert!(!p.load(&mut store, LoadOptions::default()));
        assert_eq!(p, before);
    }

    #[test]
    fn load_with_missing_key_fails() {
        let mut store = MemoryStore::new();
        store.set_int(KEY_POINTS, 50).unwrap();
        store.set_int(KEY_CLICK_TIER, 2).unwrap();
        store.set_int(KEY_SPEED_TIER, 2).unwrap();
        let mut p = ProgressStore::new();
        assert!(!p.load(&mut store, LoadOptions::default()));
        assert_eq!(p.points(), 0);
    }

    #[test]
    fn load_with_corrupt_value_fails() {
        let mut store = MemoryStore::new();
        ProgressStore::new().save(&mut store);
        store.insert_raw(KEY_POINTS, "not a number");
        let mut p = ProgressStore::new();
        assert!(!p.load(&mut store, LoadOptions::default()));
    }

    #[test]
    fn load_rejects_zero_click_tier() {
        let mut store = MemoryStore::new();
        ProgressStore::new().save(&mut store);
        store.set_int(KEY_CLICK_TIER, 0).unwrap();
        let mut p = ProgressStore::new();
        assert!(!p.load(&mut store, LoadOptions::default()));
        assert_eq!(p.click_tier(), 1);
    }

    #[test]
    fn debug_clear_on_load_wipes_save() {
        let mut store = MemoryStore::new();
        progress_with_points(77).save(&mut store);
        let mut p = ProgressStore::new();
        let options = LoadOptions {
            clear_storage_first: true,
        };
        assert!(!p.load(&mut store, options));
        assert!(store.is_empty());
        assert_eq!(p.points(), 0);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_kind() -> impl Strategy<Value = UpgradeType> {
        prop_oneof![
            Just(UpgradeType::ClickIncrease),
            Just(UpgradeType::ClickSpeed),
            Just(UpgradeType::IdleIncrease),
            Just(UpgradeType::StyleColor),
        ]
    }

    proptest! {
        #[test]
        fn prop_increment_adds_exactly(start in 0u64..1_000_000, amount in 1u64..1_000_000) {
            let mut p = ProgressStore::new();
            if start > 0 {
                p.increment_points(start).unwrap();
            }
            prop_assert_eq!(p.increment_points(amount), Ok(start + amount));
        }

        #[test]
        fn prop_buy_never_underflows(points in 0u64..2_000, kind in arb_kind(), tier in 0u64..100) {
            let mut p = ProgressStore::new();
            if points > 0 {
                p.increment_points(points).unwrap();
            }
            let up = Upgrade::new(kind, tier);
            match p.buy_upgrade(&up) {
                Ok(left) => {
                    prop_assert!(up.price() <= points);
                    prop_assert_eq!(left, points - up.price());
                }
                Err(_) => {
                    prop_assert!(up.price() > points);
                    prop_assert_eq!(p.points(), points);
                }
            }
        }

        #[test]
        fn prop_save_load_roundtrip(
            points in 0u64..u64::MAX,
            click in 1u64..1_000,
            idle in 1u64..1_000,
            speed in 1u64..=MAXIMUM_CLICK_SPEED,
        ) {
            let mut store = crate::games::clicker::storage::MemoryStore::new();
            let mut p = ProgressStore::new();
            if points > 0 {
                p.increment_points(points).unwrap();
            }
            p.set_click_tier(click).unwrap();
            p.set_idle_tier(idle).unwrap();
            p.set_speed_tier(speed).unwrap();
            prop_assert!(p.save(&mut store));

            let mut restored = ProgressStore::new();
            prop_assert!(restored.load(&mut store, LoadOptions::default()));
            prop_assert_eq!(restored, p);
        }
    }
}
