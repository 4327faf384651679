//! Milestone achievements and the evaluator that unlocks them.

use log::info;

use super::progress::ProgressStore;
use super::upgrade::MAXIMUM_CLICK_SPEED;

pub const FIRST_POINT: &str = "FIRST POINT";
pub const MASS_POINTS: &str = "MASS POINTS";
pub const FIRST_UPGRADE: &str = "FIRST UPGRADE";
pub const MASS_UPGRADE: &str = "MASS UPGRADE";
pub const MAX_SPEED: &str = "MAX SPEED";

/// An unlocked milestone. Two achievements are the same when both name and
/// reward match, so repeatable milestones stay distinct per reward.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Achievement {
    name: String,
    reward: u64,
}

impl Achievement {
    pub fn new(name: impl Into<String>, reward: u64) -> Self {
        Self {
            name: name.into(),
            reward,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn reward(&self) -> u64 {
        self.reward
    }
}

/// Exact power of ten (1, 10, 100, ...).
fn is_power_of_ten(mut n: u64) -> bool {
    if n == 0 {
        return false;
    }
    while n % 10 == 0 {
        n /= 10;
    }
    n == 1
}

/// Milestones satisfied by the current state, in presentation order.
/// Rewards are not applied here.
pub fn satisfied(progress: &ProgressStore) -> Vec<Achievement> {
    let points = progress.points();
    let total_tier = progress.total_upgrade_tier();
    let mut found = Vec::new();

    if points >= 1 {
        found.push(Achievement::new(FIRST_POINT, 5));
    }
    if points >= 10 && is_power_of_ten(points) {
        found.push(Achievement::new(MASS_POINTS, points.saturating_mul(2)));
    }
    if total_tier >= 1 {
        found.push(Achievement::new(FIRST_UPGRADE, 25));
    }
    if total_tier >= 10 && is_power_of_ten(total_tier) {
        found.push(Achievement::new(MASS_UPGRADE, total_tier.saturating_mul(2)));
    }
    if progress.speed_tier() == MAXIMUM_CLICK_SPEED {
        found.push(Achievement::new(MAX_SPEED, 500));
    }
    found
}

/// First milestone in presentation order that the current state satisfies
/// and that is not yet held.
fn next_unlock(progress: &ProgressStore) -> Option<Achievement> {
    satisfied(progress)
        .into_iter()
        .find(|a| !progress.has_unlocked(a))
}

/// Unlock every satisfied milestone not already held and credit its reward.
///
/// Each check sees the rewards credited before it, and the call keeps going
/// until nothing new is satisfied. Returns the achievements unlocked by this
/// call.
pub fn evaluate(progress: &mut ProgressStore) -> Vec<Achievement> {
    let mut unlocked = Vec::new();
    while let Some(achievement) = next_unlock(progress) {
        info!(
            "achievement unlocked: {} (+{})",
            achievement.name(),
            achievement.reward()
        );
        progress.unlock_achievement(achievement.clone());
        // Rewards are never zero, but a failed credit must not lose the unlock.
        let _ = progress.increment_points(achievement.reward());
        unlocked.push(achievement);
    }
    unlocked
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_evaluate_twice_unlocks_nothing_new(
            points in 0u64..100_000,
            click in 1u64..20,
            idle in 1u64..20,
            speed in 1u64..=MAXIMUM_CLICK_SPEED,
        ) {
            let mut p = ProgressStore::new();
            if points > 0 {
                p.increment_points(points).unwrap();
            }
            p.set_click_tier(click).unwrap();
            p.set_idle_tier(idle).unwrap();
            p.set_speed_tier(speed).unwrap();
            evaluate(&mut p);
            let after_first = p.clone();
            prop_assert!(evaluate(&mut p).is_empty());
            prop_assert_eq!(p, after_first);
        }

        #[test]
        fn prop_unlocked_list_has_no_duplicates(points in 0u64..100_000, rounds in 1usize..5) {
            let mut p = ProgressStore::new();
            if points > 0 {
                p.increment_points(points).unwrap();
            }
            for _ in 0..rounds {
                evaluate(&mut p);
            }
            let list = p.achievements();
            for (i, a) in list.iter().enumerate() {
                prop_assert!(!list[i + 1..].contains(a));
            }
        }

        #[test]
        fn prop_rewards_match_point_gain(points in 0u64..100_000) {
            let mut p = ProgressStore::new();
            if points > 0 {
                p.increment_points(points).unwrap();
            }
            let unlocked = evaluate(&mut p);
            let rewards: u64 = unlocked.iter().map(|a| a.reward()).sum();
            prop_assert_eq!(p.points(), points + rewards);
        }
    }
}
