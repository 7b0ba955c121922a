use std::{collections::BTreeMap, path::PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{Level, debug, instrument, warn};

use crate::storage::StateStore;

// a single json object on disk, mapping keys to their stored strings
//
// the whole document is read on every access and rewritten on every save; the lock only
// serializes writers within this process.  saves go through a sibling temporary file and
// a rename so that an interrupted write cannot truncate the existing state
#[derive(Debug)]
pub struct JsonFileStore {
    filename: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(filename: PathBuf) -> Self {
        JsonFileStore {
            filename,
            lock: Mutex::new(()),
        }
    }

    async fn read_document(&self) -> Result<BTreeMap<String, String>> {
        if !tokio::fs::try_exists(&self.filename).await? {
            return Ok(BTreeMap::new());
        }

        let doc = tokio::fs::read_to_string(&self.filename)
            .await
            .with_context(|| format!("failed to read state file {:?}", self.filename))?;

        if doc.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        Ok(serde_json::from_str(&doc).unwrap_or_else(|err| {
            warn!("state file {:?} is unreadable, starting over: {err}", self.filename);
            BTreeMap::new()
        }))
    }
}

#[async_trait]
impl StateStore for JsonFileStore {
    #[instrument(level=Level::DEBUG, skip(self))]
    async fn load(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().await;

        Ok(self.read_document().await?.remove(key))
    }

    #[instrument(level=Level::DEBUG, skip(self, value))]
    async fn save(&self, key: &str, value: String) -> Result<()> {
        let _guard = self.lock.lock().await;

        let mut document = self.read_document().await?;
        document.insert(key.to_string(), value);

        if let Some(parent) = self.filename.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let mut scratch = self.filename.clone().into_os_string();
        scratch.push(".tmp");
        let scratch = PathBuf::from(scratch);

        tokio::fs::write(&scratch, serde_json::to_string_pretty(&document)?)
            .await
            .with_context(|| format!("failed to write state file {scratch:?}"))?;
        tokio::fs::rename(&scratch, &self.filename).await?;

        debug!("saved state");
        Ok(())
    }
}
