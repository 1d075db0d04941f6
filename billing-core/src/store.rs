//! Whole-document JSON snapshot store.
//!
//! The four collections live in one serialized document that is always read
//! and written as a whole. Persistence is availability-over-durability by
//! design: an unreadable file degrades to an empty snapshot and a failed
//! write is logged and swallowed, never raised to the caller.

use crate::error::AppError;
use crate::models::{Client, Invoice, Service, User};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, error, info};

/// The entire persisted state at a point in time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub clients: Vec<Client>,
    #[serde(default)]
    pub services: Vec<Service>,
    #[serde(default)]
    pub invoices: Vec<Invoice>,
}

fn next_id(ids: impl Iterator<Item = u64>) -> u64 {
    ids.max().map_or(1, |max| max + 1)
}

impl Snapshot {
    pub fn next_client_id(&self) -> u64 {
        next_id(self.clients.iter().map(|c| c.id))
    }

    pub fn next_service_id(&self) -> u64 {
        next_id(self.services.iter().map(|s| s.id))
    }

    pub fn next_invoice_id(&self) -> u64 {
        next_id(self.invoices.iter().map(|i| i.id))
    }

    pub fn next_user_id(&self) -> u64 {
        next_id(self.users.iter().map(|u| u.id))
    }
}

/// File-backed snapshot store with a single-writer serialization point.
///
/// Reads are plain whole-document loads; every mutation goes through
/// [`JsonStore::mutate`], which holds an async mutex across its
/// read-modify-write cycle so concurrent requests cannot clobber each
/// other's writes.
pub struct JsonStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the backing file with four empty collections if it does not
    /// exist yet. Must run before the first read.
    pub async fn ensure_data_file(&self) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        if !tokio::fs::try_exists(&self.path).await? {
            info!(path = %self.path.display(), "Initializing data file");
            self.save(&Snapshot::default()).await;
        }

        Ok(())
    }

    /// Read the entire document. A missing, unreadable or corrupt file is
    /// logged and degrades to an empty snapshot; this never fails.
    pub async fn load(&self) -> Snapshot {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "Failed to read data file");
                return Snapshot::default();
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "Failed to parse data file");
                Snapshot::default()
            }
        }
    }

    /// Serialize and replace the entire document. The bytes go to a sibling
    /// temp file first and move into place with a rename, so a concurrent
    /// lock-free `load` sees either the old document or the new one, never a
    /// partial write. A failed write is logged but not raised; persistence
    /// is fire-and-forget.
    pub async fn save(&self, snapshot: &Snapshot) {
        let bytes = match serde_json::to_vec_pretty(snapshot) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(error = %e, "Failed to serialize snapshot");
                return;
            }
        };

        let tmp = self.path.with_extension("json.tmp");
        if let Err(e) = tokio::fs::write(&tmp, bytes).await {
            error!(path = %tmp.display(), error = %e, "Failed to write data file");
            return;
        }
        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            error!(path = %self.path.display(), error = %e, "Failed to replace data file");
        }
    }

    /// Read-modify-write under the single-writer lock. The snapshot is
    /// persisted only when the mutation succeeds.
    pub async fn mutate<T, F>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut Snapshot) -> Result<T, AppError>,
    {
        let _guard = self.write_lock.lock().await;
        let mut snapshot = self.load().await;
        let result = f(&mut snapshot)?;
        self.save(&snapshot).await;
        Ok(result)
    }

    /// Insert default records into collections that are still empty.
    pub async fn seed(&self, users: Vec<User>, services: Vec<Service>) -> Result<(), AppError> {
        self.mutate(|snapshot| {
            if snapshot.users.is_empty() && !users.is_empty() {
                debug!(count = users.len(), "Seeding default users");
                snapshot.users = users;
            }
            if snapshot.services.is_empty() && !services.is_empty() {
                debug!(count = services.len(), "Seeding default services");
                snapshot.services = services;
            }
            Ok(())
        })
        .await
    }
}
