use anyhow::Result;
use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

pub mod json;
pub mod memory;

pub use json::JsonFileStore;
pub use memory::MemoryStore;

// persistence port
//
// each tool keeps its last inputs and outputs in a key-value store so that the next run
// can pick up where the previous one left off.  backends only deal in strings; the
// helpers below handle the key namespace and (de)serialization
#[async_trait]
pub trait StateStore: Send + Sync + 'static {
    async fn load(&self, key: &str) -> Result<Option<String>>;

    async fn save(&self, key: &str, value: String) -> Result<()>;
}

pub fn namespaced(key: &str) -> String {
    format!("varkit_{key}")
}

// corrupt entries are logged and replaced by the default value rather than treated as
// fatal, since the worst outcome is losing a scratch input
pub async fn get_state<S, T>(store: &S, key: &str) -> Result<T>
where
    S: StateStore + ?Sized,
    T: DeserializeOwned + Default,
{
    let key = namespaced(key);

    let Some(doc) = store.load(&key).await? else {
        debug!("no stored state for {key}");
        return Ok(T::default());
    };

    Ok(serde_json::from_str(&doc).unwrap_or_else(|err| {
        warn!("discarding unreadable state for {key}: {err}");
        T::default()
    }))
}

pub async fn set_state<S, T>(store: &S, key: &str, value: &T) -> Result<()>
where
    S: StateStore + ?Sized,
    T: Serialize + ?Sized,
{
    store
        .save(&namespaced(key), serde_json::to_string(value)?)
        .await
}

// single-input tools store their text as-is rather than as a json string
pub async fn get_text<S>(store: &S, key: &str) -> Result<String>
where
    S: StateStore + ?Sized,
{
    Ok(store.load(&namespaced(key)).await?.unwrap_or_default())
}

pub async fn set_text<S>(store: &S, key: &str, value: &str) -> Result<()>
where
    S: StateStore + ?Sized,
{
    store.save(&namespaced(key), value.to_string()).await
}
