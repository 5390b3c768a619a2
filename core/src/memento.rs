use serde::{Deserialize, Serialize};

use crate::*;

/// Current memento schema version.
pub const MEMENTO_VERSION: u32 = 1;

/// Opaque serialized snapshot of a cache's coin sequence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Memento(String);

#[derive(Serialize)]
struct MementoRef<'a> {
    version: u32,
    coins: &'a [Coin],
}

#[derive(Deserialize)]
struct MementoOwned {
    version: u32,
    coins: Vec<Coin>,
}

impl Memento {
    /// Wraps text read back from storage. Nothing is validated until [`Memento::decode`].
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn encode(coins: &[Coin]) -> Self {
        let body = MementoRef {
            version: MEMENTO_VERSION,
            coins,
        };
        // a struct of integers always serializes
        Self(serde_json::to_string(&body).unwrap())
    }

    pub fn decode(&self) -> Result<Vec<Coin>> {
        let body: MementoOwned = serde_json::from_str(&self.0)
            .map_err(|err| GameError::MalformedMemento(err.to_string()))?;
        if body.version != MEMENTO_VERSION {
            return Err(GameError::UnsupportedMementoVersion(body.version));
        }
        Ok(body.coins)
    }
}
