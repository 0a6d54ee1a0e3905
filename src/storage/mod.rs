// src/storage/mod.rs
pub mod filesystem;
pub mod object_store;
pub mod scratch;
pub mod supabase;

use std::sync::Arc;

pub use filesystem::FilesystemStore;
pub use object_store::{ObjectStore, StoreError};
pub use scratch::ScratchSpace;
pub use supabase::SupabaseStore;

use crate::utils::{
    config::{StorageBackend, StorageConfig},
    error::{Result, ServiceError},
};

/// Builds the configured reference-image store.
pub fn build_object_store(config: &StorageConfig) -> Result<Arc<dyn ObjectStore>> {
    match config.backend {
        StorageBackend::Supabase => {
            let (url, key) = match (&config.url, &config.key) {
                (Some(url), Some(key)) => (url, key),
                _ => {
                    return Err(ServiceError::Config(
                        "Supabase storage requires url and key".into(),
                    ))
                }
            };
            let store = SupabaseStore::new(
                url.as_str(),
                key.as_str(),
                config.bucket.as_str(),
                config.get_timeout(),
            )
            .map_err(|e| ServiceError::Init(e.to_string()))?;
            Ok(Arc::new(store))
        }
        StorageBackend::Filesystem => {
            let root = config.root.clone().ok_or_else(|| {
                ServiceError::Config("filesystem storage requires a root directory".into())
            })?;
            Ok(Arc::new(FilesystemStore::new(root)))
        }
    }
}
