//! Append-only ranking journal with checksums
//!
//! Durable record of every store mutation: competitor creations and match
//! commits. State is rebuilt on startup by replaying the journal through
//! the rating engine, which is deterministic.
//!
//! # Binary Format (per entry)
//! ```text
//! [payload_len: u32]
//! [payload: bincode-serialized JournalRecord]
//! [checksum: u32]  // CRC32C over payload
//! ```
//!
//! A truncated or corrupt tail entry ends replay at the last good record;
//! everything before it is trusted.

use crc32c::crc32c;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

use types::ids::CompetitorId;
use types::matches::MatchRecord;

// ── Errors ──────────────────────────────────────────────────────────

#[derive(Error, Debug)]
pub enum JournalError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),
}

// ── Journal Record ──────────────────────────────────────────────────

/// One persisted store mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JournalRecord {
    /// A competitor was created with its initial rating.
    CompetitorCreated { id: CompetitorId, rating: i32 },
    /// A match was committed. Ratings are not stored: replay re-applies
    /// the Elo update, which is deterministic given the creation entries.
    MatchPlayed(MatchRecord),
}

// ── Writer ──────────────────────────────────────────────────────────

/// Append-only journal writer.
pub struct MatchJournal {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl MatchJournal {
    /// Open (or create) the journal at `path` for appending.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, JournalError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            writer: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record and flush it to the OS.
    ///
    /// The caller treats a failed append as a failed commit: nothing in
    /// memory may change unless this returns Ok.
    pub fn append(&mut self, record: &JournalRecord) -> Result<(), JournalError> {
        let payload =
            bincode::serialize(record).map_err(|e| JournalError::Serialization(e.to_string()))?;
        let checksum = crc32c(&payload);

        self.writer.write_all(&(payload.len() as u32).to_le_bytes())?;
        self.writer.write_all(&payload)?;
        self.writer.write_all(&checksum.to_le_bytes())?;
        self.writer.flush()?;
        self.writer.get_ref().sync_data()?;
        Ok(())
    }

    /// Read every intact record from the journal at `path`.
    ///
    /// A short or checksum-failing tail ends the read at the last good
    /// entry with a warning; a missing file reads as empty.
    pub fn read_all(path: impl AsRef<Path>) -> Result<Vec<JournalRecord>, JournalError> {
        let path = path.as_ref();
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut records = Vec::new();
        let mut offset = 0usize;

        while offset < bytes.len() {
            if offset + 4 > bytes.len() {
                warn!(path = %path.display(), offset, "truncated journal frame header, stopping replay");
                break;
            }
            let len = u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap()) as usize;
            let payload_start = offset + 4;
            let payload_end = payload_start + len;
            let frame_end = payload_end + 4;
            if frame_end > bytes.len() {
                warn!(path = %path.display(), offset, "truncated journal frame, stopping replay");
                break;
            }

            let payload = &bytes[payload_start..payload_end];
            let stored =
                u32::from_le_bytes(bytes[payload_end..frame_end].try_into().unwrap());
            if crc32c(payload) != stored {
                warn!(path = %path.display(), offset, "journal checksum mismatch, stopping replay");
                break;
            }

            match bincode::deserialize::<JournalRecord>(payload) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!(path = %path.display(), offset, error = %e, "undecodable journal record, stopping replay");
                    break;
                }
            }
            offset = frame_end;
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::ids::CompetitorId;

    fn sample_match(sequence: u64) -> JournalRecord {
        JournalRecord::MatchPlayed(MatchRecord {
            sequence,
            winner: CompetitorId::new("alice"),
            loser: CompetitorId::new("bob"),
            draw: false,
            occurred_at: 1_708_123_456_789,
        })
    }

    #[test]
    fn append_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ranker.journal");

        let created = JournalRecord::CompetitorCreated {
            id: CompetitorId::new("alice"),
            rating: 1000,
        };
        {
            let mut journal = MatchJournal::open(&path).unwrap();
            journal.append(&created).unwrap();
            journal.append(&sample_match(1)).unwrap();
        }

        let records = MatchJournal::read_all(&path).unwrap();
        assert_eq!(records, vec![created, sample_match(1)]);
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let records = MatchJournal::read_all(dir.path().join("absent.journal")).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn corrupt_tail_is_truncated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ranker.journal");

        {
            let mut journal = MatchJournal::open(&path).unwrap();
            journal.append(&sample_match(1)).unwrap();
            journal.append(&sample_match(2)).unwrap();
        }

        // Flip a byte inside the last frame's checksum.
        let mut bytes = std::fs::read(&path).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;
        std::fs::write(&path, &bytes).unwrap();

        let records = MatchJournal::read_all(&path).unwrap();
        assert_eq!(records, vec![sample_match(1)]);
    }

    #[test]
    fn reopening_appends_after_existing_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ranker.journal");

        {
            let mut journal = MatchJournal::open(&path).unwrap();
            journal.append(&sample_match(1)).unwrap();
        }
        {
            let mut journal = MatchJournal::open(&path).unwrap();
            journal.append(&sample_match(2)).unwrap();
        }

        let records = MatchJournal::read_all(&path).unwrap();
        assert_eq!(records.len(), 2);
    }
}
