use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use shared_models::scheduling::Appointment;

use crate::error::StorageError;

/// Append-only log of booked appointments, stored as JSON Lines.
///
/// The in-memory copy is only updated after the line has reached the file, and
/// both happen under the write lock, so a reader sees either the whole record or
/// nothing of it. The commit runs on its own task: a caller that stops waiting
/// (a timeout, a dropped request) cannot leave a record on disk that memory
/// never saw.
#[derive(Debug)]
pub struct AppointmentLog {
    path: Option<PathBuf>,
    entries: Arc<RwLock<Vec<Appointment>>>,
}

impl AppointmentLog {
    /// A log that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            entries: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Opens (or lazily creates) the log file and loads existing records.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let entries = if fs::try_exists(&path)
            .await
            .map_err(|e| StorageError::io(&path, e))?
        {
            let raw = fs::read_to_string(&path)
                .await
                .map_err(|e| StorageError::io(&path, e))?;
            parse_lines(&path, &raw)?
        } else {
            Vec::new()
        };

        info!("Loaded {} booked appointments from {}", entries.len(), path.display());

        Ok(Self {
            path: Some(path),
            entries: Arc::new(RwLock::new(entries)),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub async fn snapshot(&self) -> Vec<Appointment> {
        self.entries.read().await.clone()
    }

    pub async fn on_date(&self, date: NaiveDate) -> Vec<Appointment> {
        self.entries
            .read()
            .await
            .iter()
            .filter(|appointment| appointment.date == date)
            .cloned()
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub async fn append(&self, appointment: Appointment) -> Result<(), StorageError> {
        let mut entries = Arc::clone(&self.entries).write_owned().await;
        let path = self.path.clone();

        let commit = tokio::spawn(async move {
            if let Some(path) = &path {
                let mut line = serde_json::to_string(&appointment)?;
                line.push('\n');
                write_line(path, &line).await?;
            }

            debug!("Appended appointment {} to log", appointment.booking_id);
            entries.push(appointment);
            Ok::<_, StorageError>(())
        });

        commit
            .await
            .map_err(|e| StorageError::Commit(e.to_string()))?
    }
}

/// Appends one line and syncs it. On failure the file is cut back to its
/// previous length so a partial record never outlives the error.
async fn write_line(path: &Path, line: &str) -> Result<(), StorageError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| StorageError::io(parent, e))?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map_err(|e| StorageError::io(path, e))?;
    let previous_len = file
        .metadata()
        .await
        .map_err(|e| StorageError::io(path, e))?
        .len();

    let written = match file.write_all(line.as_bytes()).await {
        Ok(()) => file.sync_data().await,
        Err(e) => Err(e),
    };

    if let Err(e) = written {
        warn!("Rolling back partial write to {}: {}", path.display(), e);
        if let Err(rollback) = file.set_len(previous_len).await {
            warn!("Rollback of {} failed: {}", path.display(), rollback);
        }
        return Err(StorageError::io(path, e));
    }

    Ok(())
}

fn parse_lines(path: &Path, raw: &str) -> Result<Vec<Appointment>, StorageError> {
    raw.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line).map_err(|source| StorageError::MalformedRecord {
                path: path.to_path_buf(),
                line: index + 1,
                source,
            })
        })
        .collect()
}
