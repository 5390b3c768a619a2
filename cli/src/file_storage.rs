use geocoin_core::{GameError, Storage};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// [`Storage`] backed by a JSON object on disk, rewritten on every change.
#[derive(Debug)]
pub(crate) struct FileStorage {
    path: PathBuf,
    items: BTreeMap<String, String>,
}

impl FileStorage {
    /// Opens `path`. A missing file is an empty storage; an unreadable one is
    /// reported and replaced on the next write.
    pub(crate) fn open(path: &Path) -> anyhow::Result<Self> {
        let items = match std::fs::read_to_string(path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|err| {
                log::warn!("Ignoring unreadable save file {}: {}", path.display(), err);
                BTreeMap::new()
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(err.into()),
        };
        log::debug!("opened {} with {} keys", path.display(), items.len());
        Ok(Self {
            path: path.to_path_buf(),
            items,
        })
    }

    fn flush(&self) -> geocoin_core::Result<()> {
        let storage_error = |err: &dyn std::fmt::Display| GameError::Storage(err.to_string());

        let text = serde_json::to_string_pretty(&self.items).map_err(|err| storage_error(&err))?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, text).map_err(|err| storage_error(&err))?;
        std::fs::rename(&tmp, &self.path).map_err(|err| storage_error(&err))
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> geocoin_core::Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn clear(&mut self) -> geocoin_core::Result<()> {
        self.items.clear();
        self.flush()
    }
}
