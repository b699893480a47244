//! Append-only CSV file backing the cafe directory.

use std::fs::OpenOptions;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crudapps_cafes::{CafeEntry, HEADER};

use crate::StoreError;

/// CSV-backed cafe list.
///
/// The first line is the header; every later line is one cafe. Reads trim
/// whitespace around fields so files written as `a, b, c` stay readable.
#[derive(Debug, Clone)]
pub struct CafeFileStore {
    path: PathBuf,
    // Serializes appends from concurrent requests.
    lock: Arc<Mutex<()>>,
}

impl CafeFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// All rows including the header row (the page renders it as table head).
    ///
    /// A missing file reads as just the header.
    pub async fn rows(&self) -> Result<Vec<Vec<String>>, StoreError> {
        let store = self.clone();
        tokio::task::spawn_blocking(move || store.read_rows())
            .await
            .map_err(|e| StoreError::Task(e.to_string()))?
    }

    /// Append one cafe as a new last line.
    pub async fn append(&self, entry: CafeEntry) -> Result<(), StoreError> {
        let store = self.clone();
        tokio::task::spawn_blocking(move || store.append_blocking(&entry))
            .await
            .map_err(|e| StoreError::Task(e.to_string()))?
    }

    fn read_rows(&self) -> Result<Vec<Vec<String>>, StoreError> {
        let _guard = self.lock.lock().map_err(|e| StoreError::Task(e.to_string()))?;
        if !self.path.exists() {
            return Ok(vec![HEADER.iter().map(|h| h.to_string()).collect()]);
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(&self.path)?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            if record.iter().all(str::is_empty) {
                continue;
            }
            rows.push(record.iter().map(str::to_string).collect());
        }
        if rows.is_empty() {
            rows.push(HEADER.iter().map(|h| h.to_string()).collect());
        }
        Ok(rows)
    }

    fn append_blocking(&self, entry: &CafeEntry) -> Result<(), StoreError> {
        let _guard = self.lock.lock().map_err(|e| StoreError::Task(e.to_string()))?;

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)?;

        let len = file.metadata()?.len();
        if len > 0 {
            // A previous writer may have left the last line unterminated.
            file.seek(SeekFrom::Start(len - 1))?;
            let mut last = [0u8; 1];
            file.read_exact(&mut last)?;
            if last[0] != b'\n' {
                file.write_all(b"\n")?;
            }
        }

        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
        if len == 0 {
            writer.write_record(HEADER)?;
        }
        writer.write_record(entry.to_record())?;
        writer.flush()?;

        tracing::info!(cafe = %entry.name, path = %self.path.display(), "cafe appended");
        Ok(())
    }
}
