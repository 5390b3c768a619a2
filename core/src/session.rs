use serde::{Deserialize, Serialize};

use crate::*;

/// Cache mementos and the player's inventory, stored together so that a coin is
/// never written to one side without being removed from the other.
pub const HOLDINGS_KEY: &str = "geocoin.holdings";
pub const PLAYER_LAT_KEY: &str = "geocoin.player.lat";
pub const PLAYER_LNG_KEY: &str = "geocoin.player.lng";
pub const AUTO_POSITIONING_KEY: &str = "geocoin.autoPositioning";

#[derive(Serialize)]
struct HoldingsRef<'a> {
    caches: Vec<(String, Memento)>,
    inventory: &'a [Coin],
}

#[derive(Deserialize)]
struct HoldingsOwned {
    caches: Vec<(String, Memento)>,
    inventory: Vec<Coin>,
}

/// Everything about a game that has to survive a restart.
#[derive(Clone, Debug, PartialEq)]
pub struct GameSession {
    pub directory: CacheDirectory,
    pub position: Position,
    pub inventory: Vec<Coin>,
    pub auto_positioning: bool,
}

impl GameSession {
    /// Fresh game standing on `origin`.
    pub fn new(origin: Position) -> Self {
        Self {
            directory: CacheDirectory::new(),
            position: origin,
            inventory: Vec::new(),
            auto_positioning: false,
        }
    }
}

/// Reads and writes a [`GameSession`] under fixed storage keys.
#[derive(Debug)]
pub struct SessionStore<S> {
    storage: S,
}

impl<S: Storage> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_inner(self) -> S {
        self.storage
    }

    /// Writes the session key by key. Holdings go first and in one piece, so a
    /// failure partway leaves at worst a stale position or flag behind.
    pub fn save(&mut self, session: &GameSession) -> Result<()> {
        let holdings = serde_json::to_string(&HoldingsRef {
            caches: session.directory.flatten(),
            inventory: &session.inventory,
        })
        .map_err(|err| GameError::Storage(err.to_string()))?;

        self.storage.set_item(HOLDINGS_KEY, &holdings)?;
        self.storage
            .set_item(PLAYER_LAT_KEY, &session.position.lat.to_string())?;
        self.storage
            .set_item(PLAYER_LNG_KEY, &session.position.lng.to_string())?;
        self.storage.set_item(
            AUTO_POSITIONING_KEY,
            if session.auto_positioning { "true" } else { "false" },
        )?;
        log::trace!(
            "saved session: {} caches, {} coins in inventory",
            session.directory.len(),
            session.inventory.len()
        );
        Ok(())
    }

    /// Loads the stored session. Missing or unreadable keys fall back to the
    /// values of a new game standing on `origin`.
    pub fn load(&self, origin: Position) -> GameSession {
        let mut session = GameSession::new(origin);

        if let Some(holdings) = self.read_holdings() {
            session.directory = holdings.caches.into_iter().collect();
            session.inventory = holdings.inventory;
        }

        let lat = self.read_number(PLAYER_LAT_KEY);
        let lng = self.read_number(PLAYER_LNG_KEY);
        match (lat, lng) {
            (Some(lat), Some(lng)) => session.position = Position::new(lat, lng),
            (None, None) => {}
            _ => log::warn!("Only half of the stored player position is usable, starting at origin"),
        }

        match self.storage.get_item(AUTO_POSITIONING_KEY).as_deref() {
            Some("true") => session.auto_positioning = true,
            Some("false") | None => {}
            Some(other) => log::warn!("Ignoring stored auto positioning flag {:?}", other),
        }

        session
    }

    /// Wipes every stored key.
    pub fn reset(&mut self) -> Result<()> {
        self.storage.clear()
    }

    fn read_holdings(&self) -> Option<HoldingsOwned> {
        let raw = self.storage.get_item(HOLDINGS_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(holdings) => Some(holdings),
            Err(err) => {
                log::warn!("Could not read {} from storage: {}", HOLDINGS_KEY, err);
                None
            }
        }
    }

    fn read_number(&self, key: &str) -> Option<f64> {
        let raw = self.storage.get_item(key)?;
        match raw.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => Some(value),
            _ => {
                log::warn!("Could not read {} from storage: {:?}", key, raw);
                None
            }
        }
    }
}
