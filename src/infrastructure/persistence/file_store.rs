//! Append-only file log implementation of the link store.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::sync::Mutex;

use crate::domain::entities::Link;
use crate::domain::repositories::LinkStore;
use crate::error::StoreError;

/// Persisted form of a link: one JSON object per line, append-only.
///
/// `uuid` is a decimal sequence number starting at 1 and strictly increasing;
/// on reopen the counter resumes from the highest value seen during replay.
#[derive(Debug, Serialize, Deserialize)]
struct LogRecord {
    uuid: String,
    short_url: String,
    original_url: String,
}

struct FileStoreState {
    writer: BufWriter<File>,
    /// code -> link, rebuilt from the replay pass at open.
    index: HashMap<String, Link>,
    /// Highest sequence number written so far.
    counter: u64,
}

/// Write-ahead log store backed by a single append-only file.
///
/// Opening replays the whole log once, recovering the sequence counter and
/// building an in-memory index for lookups; afterwards the file is touched
/// only by appends. The log itself enforces no uniqueness - re-saving a code
/// appends a new record and the index keeps the latest mapping.
///
/// Writer, counter, and index share one async mutex so concurrent saves and
/// lookups serialize instead of observing torn state.
pub struct FileStore {
    path: PathBuf,
    state: Mutex<FileStoreState>,
}

impl FileStore {
    /// Opens the log at `path`, creating it when absent, and replays it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TransientIo`] when the file cannot be opened and
    /// [`StoreError::SchemaInit`] when any log line fails to decode - a
    /// partially unreadable log is fatal, only clean end-of-file terminates
    /// the replay.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        // Append handle first: creates the file so the replay open cannot race
        // a missing path.
        let write_file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&path)
            .await?;

        let (index, counter) = replay(&path).await?;
        tracing::info!(
            path = %path.display(),
            links = index.len(),
            counter,
            "replayed link log"
        );

        Ok(Self {
            path,
            state: Mutex::new(FileStoreState {
                writer: BufWriter::new(write_file),
                index,
                counter,
            }),
        })
    }

    /// Path of the underlying log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Decodes every record in the log, returning the code index and the highest
/// sequence number seen.
async fn replay(path: &Path) -> Result<(HashMap<String, Link>, u64), StoreError> {
    let read_file = File::open(path).await?;
    let mut lines = BufReader::new(read_file).lines();

    let mut index = HashMap::new();
    let mut counter = 0u64;
    let mut line_no = 0u64;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        if line.is_empty() {
            continue;
        }

        let record: LogRecord = serde_json::from_str(&line).map_err(|e| {
            StoreError::schema_init(format!(
                "log replay failed at line {line_no} of {}: {e}",
                path.display()
            ))
        })?;

        let sequence: u64 = record.uuid.parse().map_err(|e| {
            StoreError::schema_init(format!(
                "log replay failed at line {line_no} of {}: bad sequence id: {e}",
                path.display()
            ))
        })?;

        counter = counter.max(sequence);
        index.insert(
            record.short_url.clone(),
            Link::new(record.short_url, record.original_url, None),
        );
    }

    Ok((index, counter))
}

#[async_trait]
impl LinkStore for FileStore {
    /// Appends exactly one record with the next sequence number. Pure
    /// write-ahead append: no duplicate checking on either code or URL.
    async fn save_link(&self, link: &Link) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;

        let record = LogRecord {
            uuid: (state.counter + 1).to_string(),
            short_url: link.code.clone(),
            original_url: link.original_url.clone(),
        };

        let mut line = serde_json::to_vec(&record)?;
        line.push(b'\n');
        state.writer.write_all(&line).await?;
        state.writer.flush().await?;

        // Advance only after the record is written.
        state.counter += 1;
        state.index.insert(link.code.clone(), link.clone());

        Ok(())
    }

    /// One append per pair; an append failure leaves prior records durable.
    async fn save_links_batch(&self, links: &[Link]) -> Result<(), StoreError> {
        for link in links {
            self.save_link(link).await?;
        }
        Ok(())
    }

    async fn get_link(&self, code: &str) -> Result<Option<String>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .index
            .get(code)
            .map(|link| link.original_url.clone()))
    }

    /// Owners are not part of the wire format, so this view only covers links
    /// saved during the current process lifetime.
    async fn links_by_owner(
        &self,
        owner_id: &str,
    ) -> Result<HashMap<String, String>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .index
            .values()
            .filter(|link| link.owner_id.as_deref() == Some(owner_id))
            .map(|link| (link.code.clone(), link.original_url.clone()))
            .collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    /// Flushes buffered appends and syncs the log to disk.
    async fn close(&self) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        state.writer.flush().await?;
        state.writer.get_ref().sync_all().await?;
        Ok(())
    }
}
