//! Semantic action IDs for Tier Clicker click targets.

use super::upgrade::UpgradeType;

pub const CLICK_OBJECT: u16 = 0;
pub const SAVE_PROGRESS: u16 = 1;
pub const BACK_TO_MENU: u16 = 2;

// ── Store purchase (base + store slot 0..3) ─────────────────────
pub const BUY_UPGRADE_BASE: u16 = 100;

/// Store entry targeted by a buy action, if `action_id` is one.
pub fn upgrade_for_action(action_id: u16) -> Option<UpgradeType> {
    action_id
        .checked_sub(BUY_UPGRADE_BASE)
        .and_then(|slot| UpgradeType::from_index(slot as usize))
}
