use serde::{Deserialize, Serialize};

/// Game options and tunable parameters.
///
/// Every field has a default so partial TOML files deserialize cleanly.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Shuffle the seating order when the game starts.
    pub randomize_order: bool,
    /// Balance credited to every player on join.
    pub starting_balance: i64,
    /// Number of turns a jailed player sits out.
    pub turns_in_jail: u32,
    /// Accept purchase offers as soon as they are made.
    ///
    /// Used by unattended simulations; interactive adapters leave this off and
    /// call `Game::buy` when the player confirms.
    pub auto_purchase: bool,
    /// Maximum nesting of re-entrant event dispatch before it is reported as an error.
    pub max_event_depth: usize,
    /// Seed for the game RNG (dice, loot draws, `random`, order shuffle).
    pub seed: u64,
    /// Number of dice rolled per turn.
    pub dice: u32,
    /// Sides per die.
    pub dice_sides: u32,
}

impl GameConfig {
    pub const DEFAULT_STARTING_BALANCE: i64 = 2000;
    pub const DEFAULT_TURNS_IN_JAIL: u32 = 3;
    pub const DEFAULT_MAX_EVENT_DEPTH: usize = 64;

    pub fn new() -> Self {
        Self {
            randomize_order: true,
            starting_balance: Self::DEFAULT_STARTING_BALANCE,
            turns_in_jail: Self::DEFAULT_TURNS_IN_JAIL,
            auto_purchase: false,
            max_event_depth: Self::DEFAULT_MAX_EVENT_DEPTH,
            seed: 0,
            dice: 2,
            dice_sides: 6,
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::new()
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
