use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use fs4::tokio::AsyncFileExt;
use thiserror::Error;
use tokio::{
    fs::File,
    io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt},
};
use tracing::{debug, warn};

use crate::utils::clock::Clock;

use super::entities::{EntryId, EntryValidationError, LogDraft, LogEntry, LogPatch};

const COLLECTION_EXTENSION: &str = "jsonl";

#[derive(Debug, Error)]
pub enum StorageError {
    /// Nothing was ever written for this owner. Callers treat this as an empty collection.
    #[error("log collection for `{0}` does not exist")]
    MissingCollection(Arc<str>),
    #[error("entry {0} not found")]
    NotFound(EntryId),
    #[error(transparent)]
    Invalid(#[from] EntryValidationError),
    #[error("storage io failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode entry: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Interface for abstracting persistence of log entries. Every operation is scoped to one
/// owner; entries of other owners are invisible to it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LogStorage: Send + Sync {
    async fn list(&self, owner: &str) -> Result<Vec<LogEntry>, StorageError>;

    /// Stores a new entry. Storage assigns the id and both timestamps.
    async fn create(&self, owner: &str, draft: LogDraft) -> Result<LogEntry, StorageError>;

    async fn update(
        &self,
        owner: &str,
        id: &EntryId,
        patch: LogPatch,
    ) -> Result<LogEntry, StorageError>;

    async fn delete(&self, owner: &str, id: &EntryId) -> Result<(), StorageError>;
}

/// The main realization of [LogStorage]. Each owner gets a file of json lines inside
/// `entries_dir`, one entry per line.
pub struct LogStorageImpl {
    entries_dir: PathBuf,
    clock: Box<dyn Clock>,
}

impl LogStorageImpl {
    pub fn new(entries_dir: PathBuf, clock: Box<dyn Clock>) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&entries_dir)?;

        Ok(Self { entries_dir, clock })
    }

    fn collection_path(&self, owner: &str) -> PathBuf {
        self.entries_dir
            .join(format!("{}.{COLLECTION_EXTENSION}", collection_file_stem(owner)))
    }

    async fn read_collection(&self, owner: &str) -> Result<Vec<LogEntry>, StorageError> {
        let path = self.collection_path(owner);
        debug!("Reading collection {path:?}");

        let mut file = match File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::MissingCollection(owner.into()))
            }
            Err(e) => return Err(e.into()),
        };

        file.lock_shared()?;
        let result = read_lines(&mut file, &path).await;
        file.unlock_async().await?;

        Ok(result?
            .into_iter()
            .filter(|v| &*v.user_id == owner)
            .collect())
    }

    /// Runs `change` against every line of the collection under an exclusive lock and writes
    /// the result back. Lines `change` didn't select are written back byte for byte.
    async fn rewrite_collection<T>(
        &self,
        owner: &str,
        change: impl FnOnce(&mut Vec<StoredLine>) -> Result<T, StorageError>,
    ) -> Result<T, StorageError> {
        let path = self.collection_path(owner);
        let mut file = match File::options().read(true).write(true).open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::MissingCollection(owner.into()))
            }
            Err(e) => return Err(e.into()),
        };

        // Semi-safe acquire-release for a file
        file.lock_exclusive()?;
        let result = rewrite_with_file(&mut file, &path, change).await;
        file.unlock_async().await?;
        result
    }
}

#[async_trait]
impl LogStorage for LogStorageImpl {
    async fn list(&self, owner: &str) -> Result<Vec<LogEntry>, StorageError> {
        self.read_collection(owner).await
    }

    async fn create(&self, owner: &str, draft: LogDraft) -> Result<LogEntry, StorageError> {
        draft.validate()?;
        let entry = LogEntry::from_draft(EntryId::generate(), owner.into(), draft, self.clock.time());

        let mut line = serde_json::to_vec(&entry)?;
        line.push(b'\n');

        let path = self.collection_path(owner);
        let mut file = File::options()
            .create(true)
            .append(true)
            .open(&path)
            .await?;

        file.lock_exclusive()?;
        let written = async {
            file.write_all(&line).await?;
            file.flush().await
        }
        .await;
        file.unlock_async().await?;
        written?;

        debug!("Appended entry {} to {path:?}", entry.id);
        Ok(entry)
    }

    async fn update(
        &self,
        owner: &str,
        id: &EntryId,
        patch: LogPatch,
    ) -> Result<LogEntry, StorageError> {
        let now = self.clock.time();
        self.rewrite_collection(owner, |lines| {
            let entry = lines
                .iter_mut()
                .find_map(|v| v.select(owner, id))
                .ok_or_else(|| StorageError::NotFound(id.clone()))?;
            entry.apply(patch, now)?;
            Ok(entry.clone())
        })
        .await
    }

    async fn delete(&self, owner: &str, id: &EntryId) -> Result<(), StorageError> {
        self.rewrite_collection(owner, |lines| {
            let position = lines
                .iter()
                .position(|v| v.holds(owner, id))
                .ok_or_else(|| StorageError::NotFound(id.clone()))?;
            lines.remove(position);
            Ok(())
        })
        .await
    }
}

async fn read_lines(file: &mut File, path: &Path) -> Result<Vec<LogEntry>, std::io::Error> {
    let mut content = String::new();
    file.read_to_string(&mut content).await?;
    Ok(parse_lines(&content, path))
}

/// One line of a collection file. Entries degrade on decoding (unknown enum values, rows that
/// don't decode at all), so a line is re-encoded only when it was selected for a change.
struct StoredLine {
    raw: String,
    entry: Option<LogEntry>,
    changed: bool,
}

impl StoredLine {
    fn holds(&self, owner: &str, id: &EntryId) -> bool {
        self.entry
            .as_ref()
            .is_some_and(|v| &v.id == id && &*v.user_id == owner)
    }

    /// Entry of `owner` with `id`, marked to be re-encoded on write.
    fn select(&mut self, owner: &str, id: &EntryId) -> Option<&mut LogEntry> {
        if !self.holds(owner, id) {
            return None;
        }
        self.changed = true;
        self.entry.as_mut()
    }
}

async fn rewrite_with_file<T>(
    file: &mut File,
    path: &Path,
    change: impl FnOnce(&mut Vec<StoredLine>) -> Result<T, StorageError>,
) -> Result<T, StorageError> {
    let mut content = String::new();
    file.read_to_string(&mut content).await?;
    let mut lines = decode_lines(&content, path);

    let result = change(&mut lines)?;

    let mut buffer = Vec::<u8>::new();
    for line in &lines {
        match (&line.entry, line.changed) {
            (Some(entry), true) => serde_json::to_writer(&mut buffer, entry)?,
            _ => buffer.extend_from_slice(line.raw.as_bytes()),
        }
        buffer.push(b'\n');
    }

    file.rewind().await?;
    file.set_len(0).await?;
    file.write_all(&buffer).await?;
    file.flush().await?;
    Ok(result)
}

fn parse_lines(content: &str, path: &Path) -> Vec<LogEntry> {
    decode_lines(content, path)
        .into_iter()
        .filter_map(|v| v.entry)
        .collect()
}

fn decode_lines(content: &str, path: &Path) -> Vec<StoredLine> {
    content
        .lines()
        .filter(|v| !v.trim().is_empty())
        .map(|v| {
            let entry = match serde_json::from_str::<LogEntry>(v) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    // ignore illegal values. Might happen after an interrupted write
                    warn!(
                        "During parsing in path {:?} found illegal json string {}:  {e}",
                        path, v
                    );
                    None
                }
            };
            StoredLine {
                raw: v.to_string(),
                entry,
                changed: false,
            }
        })
        .collect()
}

/// Owner ids come from configuration, so only a conservative subset reaches the file name.
fn collection_file_stem(owner: &str) -> String {
    owner
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
