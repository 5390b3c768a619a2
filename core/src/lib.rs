use serde::{Deserialize, Serialize};

pub use cache::*;
pub use cell_index::*;
pub use coin::*;
pub use directory::*;
pub use engine::*;
pub use error::*;
pub use memento::*;
pub use position::*;
pub use session::*;
pub use storage::*;
pub use types::*;

pub mod oracle;

mod cache;
mod cell_index;
mod coin;
mod directory;
mod engine;
mod error;
mod memento;
mod position;
mod session;
mod storage;
mod types;

/// Gameplay parameters. Every field falls back to its default when omitted.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Size of one cell, in position units.
    pub tile_width: f64,
    /// Neighborhood radius, in cells.
    pub visibility_radius: u32,
    pub spawn_probability: f64,
    pub min_coins: u32,
    /// Exclusive upper bound of the initial coin count.
    pub max_coins: u32,
    pub origin: Position,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tile_width: 1e-4,
            visibility_radius: 8,
            spawn_probability: 0.1,
            min_coins: 1,
            max_coins: 10,
            origin: Position::new(36.98949379578401, -122.06277128548504),
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.tile_width.is_finite() && self.tile_width > 0.0) {
            return Err(GameError::InvalidConfig("tile width must be positive"));
        }
        if !(0.0..=1.0).contains(&self.spawn_probability) {
            return Err(GameError::InvalidConfig(
                "spawn probability must be within [0, 1]",
            ));
        }
        if self.min_coins >= self.max_coins {
            return Err(GameError::InvalidConfig(
                "min coins must be below max coins",
            ));
        }
        if !self.origin.is_finite() {
            return Err(GameError::InvalidConfig("origin must be finite"));
        }
        if !CellIndex::new(self.tile_width).covers(self.origin) {
            return Err(GameError::InvalidConfig(
                "origin is too many tiles away from zero",
            ));
        }
        Ok(())
    }

    /// Whether `cell` holds a cache at all.
    pub fn has_cache(&self, cell: Cell) -> bool {
        use oracle::KeyPart;
        oracle::sample([KeyPart::from(cell.row), KeyPart::from(cell.col)]) < self.spawn_probability
    }

    /// Number of coins minted by `cell` when its cache is first generated, in
    /// `[min_coins, max_coins)`.
    pub fn initial_coin_count(&self, cell: Cell) -> u32 {
        use oracle::KeyPart;
        let luck = oracle::sample([
            KeyPart::from(cell.row),
            KeyPart::from(cell.col),
            KeyPart::from(oracle::INITIAL_VALUE_KEY),
        ]);
        let span = f64::from(self.max_coins.saturating_sub(self.min_coins));
        (luck * span + f64::from(self.min_coins)).floor() as u32
    }
}

/// Result of one [`Command`] as far as a renderer is concerned.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Outcome {
    NoChange,
    Moved,
    Collected(Coin),
    Deposited(Coin),
    AutoPositioningChanged(bool),
    Reset,
}

impl Outcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_inverted_coin_range() {
        let config = GameConfig {
            min_coins: 10,
            max_coins: 10,
            ..Default::default()
        };

        assert!(matches!(config.validate(), Err(GameError::InvalidConfig(_))));
    }

    #[test]
    fn validate_rejects_zero_tile_width() {
        let config = GameConfig {
            tile_width: 0.0,
            ..Default::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_origin_beyond_coordinate_range() {
        let config = GameConfig {
            tile_width: 1e-15,
            ..Default::default()
        };

        assert_eq!(
            config.validate(),
            Err(GameError::InvalidConfig("origin is too many tiles away from zero"))
        );
        assert_eq!(
            GameConfig {
                tile_width: 1e-9,
                ..Default::default()
            }
            .validate(),
            Ok(())
        );
    }

    #[test]
    fn initial_coin_count_stays_in_range() {
        let config = GameConfig::default();

        for row in -50..50 {
            for col in -50..50 {
                let count = config.initial_coin_count(Cell::new(row, col));
                assert!((config.min_coins..config.max_coins).contains(&count));
            }
        }
    }

    #[test]
    fn spawn_decision_is_stable() {
        let config = GameConfig::default();
        let cell = Cell::new(369894, -1220627);

        assert!(config.has_cache(cell));
        assert!(!config.has_cache(Cell::new(369894, -1220628)));
        assert_eq!(config.initial_coin_count(cell), 5);
    }

    #[test]
    fn partial_config_deserializes_with_defaults() {
        let config: GameConfig = serde_json::from_str(r#"{"visibility_radius":3}"#).unwrap();

        assert_eq!(config.visibility_radius, 3);
        assert_eq!(config.tile_width, 1e-4);
    }

    #[test]
    fn outcome_update_flag() {
        assert!(!Outcome::NoChange.has_update());
        assert!(Outcome::Reset.has_update());
    }
}
