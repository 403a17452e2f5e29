//! [`DataStorage`] backed by a single indented JSON file.
//!
//! Saves are serialized and each one writes its own sibling temp file
//! before renaming it over the data file, so a reader only ever sees a
//! complete document.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lighthub_app::ports::DataStorage;
use lighthub_domain::error::HubError;
use lighthub_domain::runtime_data::RunTimeData;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::StorageError;

pub struct JsonFileStorage {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the data file.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the file cannot be read or parsed.
    pub fn read(&self) -> Result<RunTimeData, StorageError> {
        let content = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// A fresh `<file>.<uuid>.tmp` next to the data file.
    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(format!(".{}.tmp", uuid::Uuid::new_v4()));
        self.path.with_file_name(name)
    }
}

async fn write_atomically(path: PathBuf, temp: PathBuf, data: RunTimeData) -> Result<(), StorageError> {
    let json = serde_json::to_vec_pretty(&data)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&temp, json).await?;
    if let Err(err) = tokio::fs::rename(&temp, &path).await {
        if let Err(cleanup) = tokio::fs::remove_file(&temp).await {
            debug!(path = %temp.display(), error = %cleanup, "could not remove temp file");
        }
        return Err(err.into());
    }
    Ok(())
}

impl DataStorage for JsonFileStorage {
    fn load(&self) -> RunTimeData {
        match self.read() {
            Ok(data) => {
                debug!(path = %self.path.display(), "runtime data read");
                data
            }
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "could not load runtime data, starting empty");
                RunTimeData::default()
            }
        }
    }

    fn save(&self, data: RunTimeData) -> impl Future<Output = Result<(), HubError>> + Send {
        let path = self.path.clone();
        let temp = self.temp_path();
        let write_lock = self.write_lock.clone();
        async move {
            let _guard = write_lock.lock().await;
            write_atomically(path, temp, data).await?;
            Ok(())
        }
    }
}
