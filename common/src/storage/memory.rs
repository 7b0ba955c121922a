use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashMap;

use crate::storage::StateStore;

// process-local store, used by tests and by runs that should leave nothing behind
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            items: DashMap::new(),
        }
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.get(key).map(|v| v.value().clone()))
    }

    async fn save(&self, key: &str, value: String) -> Result<()> {
        self.items.insert(key.to_string(), value);
        Ok(())
    }
}
