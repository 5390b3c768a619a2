use smallvec::SmallVec;

use crate::*;

/// Where a cache is in its life: never seen, live and untouched, live and
/// modified, or stored only as a memento.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CacheLifecycle {
    Unvisited,
    Fresh,
    Dirty,
    Evicted,
}

/// Coin sequence held by one cell's cache.
#[derive(Clone, Debug, PartialEq)]
pub struct CacheState {
    cell: Cell,
    coins: SmallVec<[Coin; 16]>,
    lifecycle: CacheLifecycle,
}

impl CacheState {
    /// Empty, not yet populated cache for `cell`.
    pub fn new(cell: Cell) -> Self {
        Self {
            cell,
            coins: SmallVec::new(),
            lifecycle: CacheLifecycle::Unvisited,
        }
    }

    /// Cache as generated on the first ever visit: serials `0..count`.
    pub fn fresh(cell: Cell, config: &GameConfig) -> Self {
        let count = config.initial_coin_count(cell);
        Self {
            cell,
            coins: (0..count).map(|serial| Coin::minted_in(cell, serial)).collect(),
            lifecycle: CacheLifecycle::Fresh,
        }
    }

    /// Cache rebuilt verbatim from a stored memento.
    pub fn restore(cell: Cell, memento: &Memento) -> Result<Self> {
        let mut state = Self::new(cell);
        state.import(memento)?;
        Ok(state)
    }

    pub fn cell(&self) -> Cell {
        self.cell
    }

    pub fn coins(&self) -> &[Coin] {
        &self.coins
    }

    pub fn len(&self) -> usize {
        self.coins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }

    pub fn lifecycle(&self) -> CacheLifecycle {
        self.lifecycle
    }

    /// Removes the first coin, if any.
    pub fn collect(&mut self) -> Option<Coin> {
        if self.coins.is_empty() {
            return None;
        }
        let coin = self.coins.remove(0);
        self.lifecycle = CacheLifecycle::Dirty;
        Some(coin)
    }

    pub fn deposit(&mut self, coin: Coin) {
        self.coins.push(coin);
        self.lifecycle = CacheLifecycle::Dirty;
    }

    pub fn export(&self) -> Memento {
        Memento::encode(&self.coins)
    }

    /// Replaces the coin sequence with the memento's. Leaves the state untouched on error.
    pub fn import(&mut self, memento: &Memento) -> Result<()> {
        let coins = memento.decode()?;
        self.coins = coins.into_iter().collect();
        self.lifecycle = CacheLifecycle::Dirty;
        Ok(())
    }
}
