/// Identifies one run of the position subscription. Fixes carry the id of the
/// run that produced them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct WatchId(u64);

/// Start/stop bookkeeping for an asynchronous position source.
///
/// Stopping retires the current id, so a fix that was already in flight when
/// the watch stopped is rejected by [`PositionWatch::accepts`].
#[derive(Clone, Debug, Default)]
pub struct PositionWatch {
    issued: u64,
    current: Option<WatchId>,
}

impl PositionWatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts watching, or returns the running watch's id.
    pub fn start(&mut self) -> WatchId {
        if let Some(id) = self.current {
            return id;
        }
        self.issued += 1;
        let id = WatchId(self.issued);
        self.current = Some(id);
        log::debug!("position watch {} started", id.0);
        id
    }

    /// Stops watching. Returns whether a watch was running.
    pub fn stop(&mut self) -> bool {
        match self.current.take() {
            Some(id) => {
                log::debug!("position watch {} stopped", id.0);
                true
            }
            None => false,
        }
    }

    pub fn current(&self) -> Option<WatchId> {
        self.current
    }

    pub fn is_running(&self) -> bool {
        self.current.is_some()
    }

    pub fn accepts(&self, id: WatchId) -> bool {
        self.current == Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_is_idempotent() {
        let mut watch = PositionWatch::new();

        let first = watch.start();
        let second = watch.start();

        assert_eq!(first, second);
        assert!(watch.accepts(first));
    }

    #[test]
    fn stop_rejects_in_flight_fixes() {
        let mut watch = PositionWatch::new();
        let stale = watch.start();

        assert!(watch.stop());
        assert!(!watch.stop());
        assert!(!watch.accepts(stale));

        let restarted = watch.start();
        assert_ne!(stale, restarted);
        assert!(!watch.accepts(stale));
        assert!(watch.accepts(restarted));
    }
}
