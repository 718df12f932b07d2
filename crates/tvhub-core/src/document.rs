//! Binding between the configuration document and a store

use tracing::debug;

use crate::error::CoreError;
use crate::store::{CONFIG_KEY, KvStore};
use crate::types::AppConfig;

/// Read the raw stored document text, if any
pub async fn load_raw(store: &dyn KvStore) -> Result<Option<String>, CoreError> {
    Ok(store.get(CONFIG_KEY).await?)
}

/// Read and parse the document, falling back to the default when absent
pub async fn load(store: &dyn KvStore) -> Result<AppConfig, CoreError> {
    match load_raw(store).await? {
        Some(text) => serde_json::from_str(&text).map_err(CoreError::CorruptDocument),
        None => {
            debug!("no stored configuration, using default");
            Ok(AppConfig::default())
        }
    }
}

/// Overwrite the stored document
pub async fn save(store: &dyn KvStore, config: &AppConfig) -> Result<(), CoreError> {
    let text = serde_json::to_string(config).map_err(CoreError::Serialize)?;
    store.put(CONFIG_KEY, text).await?;
    Ok(())
}
