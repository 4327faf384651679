//! Upgrade catalog: pricing, multipliers and shop text for each upgrade track.
//!
//! Every function here is pure. An [`Upgrade`] is just a `(kind, tier)` pair
//! built on demand from the current tiers.

/// Highest speed tier. Past it the speed upgrade can no longer be bought.
pub const MAXIMUM_CLICK_SPEED: u64 = 4;

/// Flat price of the cosmetic style upgrade.
const STYLE_PRICE: u64 = 1000;

/// Upgrade tracks offered in the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UpgradeType {
    ClickIncrease,
    ClickSpeed,
    IdleIncrease,
    StyleColor,
}

impl UpgradeType {
    /// All upgrade types in store order.
    pub fn all() -> &'static [UpgradeType] {
        &[
            UpgradeType::ClickIncrease,
            UpgradeType::ClickSpeed,
            UpgradeType::IdleIncrease,
            UpgradeType::StyleColor,
        ]
    }

    /// Position in the store (0-3).
    pub fn index(&self) -> usize {
        match self {
            UpgradeType::ClickIncrease => 0,
            UpgradeType::ClickSpeed => 1,
            UpgradeType::IdleIncrease => 2,
            UpgradeType::StyleColor => 3,
        }
    }

    pub fn from_index(idx: usize) -> Option<UpgradeType> {
        Self::all().get(idx).copied()
    }

    /// Key to buy (1-4 mapped to store index).
    pub fn key(&self) -> char {
        match self {
            UpgradeType::ClickIncrease => '1',
            UpgradeType::ClickSpeed => '2',
            UpgradeType::IdleIncrease => '3',
            UpgradeType::StyleColor => '4',
        }
    }
}

fn signed(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Points needed to buy `kind` at `tier`. Style ignores the tier.
pub fn price(kind: UpgradeType, tier: u64) -> u64 {
    match kind {
        UpgradeType::ClickIncrease => tier.saturating_mul(15),
        UpgradeType::ClickSpeed => tier.saturating_mul(8),
        UpgradeType::IdleIncrease => tier.saturating_mul(25),
        UpgradeType::StyleColor => STYLE_PRICE,
    }
}

/// Yield (or click interval in seconds, for speed) granted at `tier`.
///
/// The speed multiplier drops to zero at [`MAXIMUM_CLICK_SPEED`] and goes
/// negative past it; callers treat that as "maxed", see [`Upgrade::is_maxed`].
pub fn multiplier(kind: UpgradeType, tier: u64) -> i64 {
    match kind {
        UpgradeType::ClickIncrease => signed(tier.saturating_mul(2)),
        UpgradeType::ClickSpeed => signed(MAXIMUM_CLICK_SPEED).saturating_sub(signed(tier)),
        UpgradeType::IdleIncrease => signed(tier.saturating_mul(4)),
        UpgradeType::StyleColor => 0,
    }
}

/// Store title.
pub fn name(kind: UpgradeType, tier: u64) -> String {
    match kind {
        UpgradeType::ClickIncrease => format!("BETTER CLICKS {}", tier),
        UpgradeType::ClickSpeed => format!("FASTER CLICKS {}", tier),
        UpgradeType::IdleIncrease => format!("IDLE POINTS {}", tier),
        UpgradeType::StyleColor => "CUSTOM STYLE".to_string(),
    }
}

/// Store description.
pub fn description(kind: UpgradeType, tier: u64) -> String {
    let m = multiplier(kind, tier);
    match kind {
        UpgradeType::ClickIncrease => format!("INCREASES CLICK INCOME TO {}", m),
        UpgradeType::ClickSpeed => format!("DECREASES CLICK INTERVAL TO {}", m),
        UpgradeType::IdleIncrease => format!("INCREASES IDLE INCOME RATE TO {}", m),
        UpgradeType::StyleColor => "CHANGES OBJECT APPEARANCE TO RANDOM COLOR".to_string(),
    }
}

/// One tier of one upgrade track.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Upgrade {
    pub kind: UpgradeType,
    pub tier: u64,
}

impl Upgrade {
    pub fn new(kind: UpgradeType, tier: u64) -> Self {
        Self { kind, tier }
    }

    pub fn price(&self) -> u64 {
        price(self.kind, self.tier)
    }

    pub fn multiplier(&self) -> i64 {
        multiplier(self.kind, self.tier)
    }

    pub fn name(&self) -> String {
        name(self.kind, self.tier)
    }

    pub fn description(&self) -> String {
        description(self.kind, self.tier)
    }

    /// True once the speed track has run past its last tier.
    pub fn is_maxed(&self) -> bool {
        self.kind == UpgradeType::ClickSpeed
            && !(0..=signed(MAXIMUM_CLICK_SPEED)).contains(&self.multiplier())
    }
}
