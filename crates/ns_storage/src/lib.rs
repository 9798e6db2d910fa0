use async_trait::async_trait;
use ns_core::{Error, Result, ScanStorage};
use std::sync::Arc;
use tracing::info;

pub mod backends;

pub use backends::*;

#[async_trait]
pub trait StorageBackend: Send + Sync {
    fn get_error_message() -> &'static str;
    async fn new() -> Result<Self> where Self: Sized;
}

/// Names accepted by [`create_storage`].
pub const AVAILABLE_BACKENDS: &[&str] = &["memory", "sqlite"];

/// Opens the named backend. `location` is the database path for SQLite and ignored otherwise.
pub async fn create_storage(kind: &str, location: Option<&str>) -> Result<Arc<dyn ScanStorage>> {
    let storage: Arc<dyn ScanStorage> = match kind.to_lowercase().as_str() {
        "memory" => Arc::new(open::<InMemoryStorage>().await?),
        #[cfg(feature = "sqlite")]
        "sqlite" => match location {
            Some(path) => Arc::new(SQLiteStorage::new_with_path(path).await.map_err(|e| {
                Error::Storage(format!("{} ({})", e, SQLiteStorage::get_error_message()))
            })?),
            None => Arc::new(open::<SQLiteStorage>().await?),
        },
        other => {
            return Err(Error::Storage(format!(
                "Unknown storage backend: {}. Available backends: {}",
                other,
                AVAILABLE_BACKENDS.join(", ")
            )))
        }
    };
    info!("💾 Storage backend ready: {}", kind);
    Ok(storage)
}

async fn open<T: StorageBackend>() -> Result<T> {
    T::new()
        .await
        .map_err(|e| Error::Storage(format!("{} ({})", e, T::get_error_message())))
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::{create_storage, StorageBackend};
}
