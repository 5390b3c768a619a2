use hashbrown::{HashMap, HashSet};

use crate::*;

/// Every mutation the game accepts. Renderers and position sources translate
/// their input into these and hand them to [`Engine::apply`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Command {
    Move(Direction),
    MoveTo(Position),
    Collect(CellId),
    Deposit(CellId),
    SetAutoPositioning(bool),
    PositionFix { watch: WatchId, position: Position },
    PositionUnavailable { watch: WatchId },
    Reset,
}

/// Owns the game session and keeps the live caches in step with the player's
/// neighborhood.
#[derive(Debug)]
pub struct Engine<S> {
    config: GameConfig,
    cells: CellIndex,
    session: GameSession,
    live: HashMap<CellId, CacheState>,
    watch: PositionWatch,
    store: SessionStore<S>,
}

impl<S: Storage> Engine<S> {
    /// Resumes whatever session `storage` holds, or starts a new one at the origin.
    pub fn new(config: GameConfig, storage: S) -> Result<Self> {
        config.validate()?;
        let store = SessionStore::new(storage);
        let cells = CellIndex::new(config.tile_width);
        let mut session = store.load(config.origin);
        if !cells.covers(session.position) {
            log::warn!("Stored position {} is off the grid, starting at origin", session.position);
            session.position = config.origin;
        }
        log::debug!(
            "loaded session at {} with {} known caches",
            session.position,
            session.directory.len()
        );

        let mut engine = Self {
            config,
            cells,
            session,
            live: HashMap::new(),
            watch: PositionWatch::new(),
            store,
        };
        if engine.session.auto_positioning {
            engine.watch.start();
        }
        engine.refresh_visible();
        Ok(engine)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn position(&self) -> Position {
        self.session.position
    }

    pub fn inventory(&self) -> &[Coin] {
        &self.session.inventory
    }

    pub fn directory(&self) -> &CacheDirectory {
        &self.session.directory
    }

    pub fn auto_positioning(&self) -> bool {
        self.session.auto_positioning
    }

    /// Id to tag position fixes with while auto positioning is on.
    pub fn watch(&self) -> Option<WatchId> {
        self.watch.current()
    }

    pub fn storage(&self) -> &S {
        self.store.storage()
    }

    pub fn into_storage(self) -> S {
        self.store.into_inner()
    }

    pub fn cell_id(&mut self, row: Coord, col: Coord) -> CellId {
        self.cells.canonicalize(row, col)
    }

    pub fn cell(&self, id: CellId) -> Cell {
        self.cells.cell(id)
    }

    pub fn bounds_of(&self, id: CellId) -> Bounds {
        self.cells.bounds_of(id)
    }

    pub fn player_cell(&mut self) -> CellId {
        self.cells.cell_for_position(self.session.position)
    }

    pub fn cache(&self, id: CellId) -> Option<&CacheState> {
        self.live.get(&id)
    }

    /// Live caches ordered by cell.
    pub fn visible_caches(&self) -> Vec<(CellId, &CacheState)> {
        let mut caches: Vec<_> = self.live.iter().map(|(&id, cache)| (id, cache)).collect();
        caches.sort_by_key(|(_, cache)| cache.cell());
        caches
    }

    /// Lifecycle of the cache at `id`, or `None` when the cell has no cache.
    pub fn lifecycle(&self, id: CellId) -> Option<CacheLifecycle> {
        let cell = self.cells.cell(id);
        if !self.config.has_cache(cell) {
            return None;
        }
        Some(match self.live.get(&id) {
            Some(cache) => cache.lifecycle(),
            None if self.session.directory.contains(&cell.key()) => CacheLifecycle::Evicted,
            None => CacheLifecycle::Unvisited,
        })
    }

    pub fn apply(&mut self, command: Command) -> Outcome {
        use Command::*;

        log::trace!("apply {:?}", command);
        match command {
            Move(direction) => {
                let next = self
                    .session
                    .position
                    .step(direction, self.config.tile_width);
                self.relocate(next)
            }
            MoveTo(position) => self.relocate(position),
            Collect(id) => self.collect(id),
            Deposit(id) => self.deposit(id),
            SetAutoPositioning(enabled) => self.set_auto_positioning(enabled),
            PositionFix { watch, position } => {
                if self.watch.accepts(watch) {
                    self.relocate(position)
                } else {
                    log::debug!("dropping position fix from retired watch {:?}", watch);
                    Outcome::NoChange
                }
            }
            PositionUnavailable { watch } => {
                if self.watch.accepts(watch) {
                    log::warn!("Position source unavailable, disabling auto positioning");
                    self.set_auto_positioning(false)
                } else {
                    Outcome::NoChange
                }
            }
            Reset => self.reset(),
        }
    }

    fn relocate(&mut self, position: Position) -> Outcome {
        if !position.is_finite() || !self.cells.covers(position) {
            log::warn!("Ignoring position {} outside the grid", position);
            return Outcome::NoChange;
        }
        if position == self.session.position {
            return Outcome::NoChange;
        }

        self.session.position = position;
        self.refresh_visible();
        self.persist();
        Outcome::Moved
    }

    fn collect(&mut self, id: CellId) -> Outcome {
        let Some(cache) = self.live.get_mut(&id) else {
            return Outcome::NoChange;
        };
        let Some(coin) = cache.collect() else {
            return Outcome::NoChange;
        };

        self.session.directory.set(cache.cell().key(), cache.export());
        self.session.inventory.push(coin);
        log::debug!("collected {} from cache {}", coin, cache.cell());
        self.persist();
        Outcome::Collected(coin)
    }

    fn deposit(&mut self, id: CellId) -> Outcome {
        let Some(cache) = self.live.get_mut(&id) else {
            return Outcome::NoChange;
        };
        let Some(coin) = self.session.inventory.pop() else {
            return Outcome::NoChange;
        };

        cache.deposit(coin);
        self.session.directory.set(cache.cell().key(), cache.export());
        log::debug!("deposited {} into cache {}", coin, cache.cell());
        self.persist();
        Outcome::Deposited(coin)
    }

    fn set_auto_positioning(&mut self, enabled: bool) -> Outcome {
        if enabled == self.session.auto_positioning && enabled == self.watch.is_running() {
            return Outcome::NoChange;
        }

        if enabled {
            self.watch.start();
        } else {
            self.watch.stop();
        }
        self.session.auto_positioning = enabled;
        self.persist();
        Outcome::AutoPositioningChanged(enabled)
    }

    fn reset(&mut self) -> Outcome {
        self.watch.stop();
        self.live.clear();
        self.session = GameSession::new(self.config.origin);
        if let Err(err) = self.store.reset() {
            log::error!("Could not clear storage: {:?}", err);
        }
        self.refresh_visible();
        log::debug!("game reset");
        Outcome::Reset
    }

    /// Materializes caches entering the neighborhood and evicts the ones leaving it.
    fn refresh_visible(&mut self) {
        let nearby = self
            .cells
            .cells_within(self.session.position, self.config.visibility_radius);

        let mut visible = HashSet::with_capacity(nearby.len());
        for id in nearby {
            let cell = self.cells.cell(id);
            if !self.config.has_cache(cell) {
                continue;
            }
            visible.insert(id);
            if !self.live.contains_key(&id) {
                let cache = self.materialize(cell);
                self.live.insert(id, cache);
            }
        }

        let leaving: Vec<CellId> = self
            .live
            .keys()
            .filter(|id| !visible.contains(*id))
            .copied()
            .collect();
        for id in leaving {
            if let Some(cache) = self.live.remove(&id) {
                log::debug!("evicting cache {} with {} coins", cache.cell(), cache.len());
                self.session.directory.set(cache.cell().key(), cache.export());
            }
        }
    }

    fn materialize(&self, cell: Cell) -> CacheState {
        if let Some(memento) = self.session.directory.get(&cell.key()) {
            match CacheState::restore(cell, memento) {
                Ok(cache) => {
                    log::debug!("restored cache {} with {} coins", cell, cache.len());
                    return cache;
                }
                Err(err) => log::warn!("Discarding memento of cache {}: {}", cell, err),
            }
        }

        let cache = CacheState::fresh(cell, &self.config);
        log::debug!("generated cache {} with {} coins", cell, cache.len());
        cache
    }

    fn persist(&mut self) {
        if let Err(err) = self.store.save(&self.session) {
            log::error!("Could not save game to storage: {:?}", err);
        }
    }
}
