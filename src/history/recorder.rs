//! Compact history of resident replacements.

use std::io::{self, Read, Write};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// One resident replacement.
///
/// `resident` is the vector that was displaced at this point of the run and
/// `alive` the number of consecutive generations it had survived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Position in the sequence of replacements (0, 1, 2, ...).
    pub sequence_index: usize,
    /// Generations the displaced resident survived.
    pub alive: u64,
    /// The displaced resident.
    pub resident: Arc<[f64]>,
}

/// Run-length encoded record of every resident that was displaced during a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CompactHistory {
    entries: Vec<HistoryEntry>,
}

impl CompactHistory {
    /// Build from entries, checking ordering, run lengths and vector lengths.
    pub fn from_entries(entries: Vec<HistoryEntry>) -> Result<Self, HistoryError> {
        let dimension = entries.first().map(|e| e.resident.len());
        for (expected, entry) in entries.iter().enumerate() {
            if entry.sequence_index != expected {
                return Err(HistoryError::OutOfOrder {
                    expected,
                    found: entry.sequence_index,
                });
            }
            if entry.alive == 0 {
                return Err(HistoryError::ZeroAlive {
                    sequence_index: entry.sequence_index,
                });
            }
            if Some(entry.resident.len()) != dimension {
                return Err(HistoryError::DimensionMismatch {
                    sequence_index: entry.sequence_index,
                });
            }
        }
        Ok(Self { entries })
    }

    /// Entries in sequence order.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Iterate entries in sequence order.
    pub fn iter(&self) -> std::slice::Iter<'_, HistoryEntry> {
        self.entries.iter()
    }

    /// Number of recorded replacements.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Generations covered: the sum of every entry's `alive` count.
    ///
    /// Equals the generation of the last recorded replacement.
    pub fn total_generations(&self) -> u64 {
        self.entries.iter().map(|e| e.alive).sum()
    }

    /// Take ownership of the entries.
    pub fn into_entries(self) -> Vec<HistoryEntry> {
        self.entries
    }

    /// Write as JSON.
    pub fn write_json<W: Write>(&self, writer: W) -> io::Result<()> {
        serde_json::to_writer(writer, self).map_err(io::Error::from)
    }

    /// Read from JSON, validating the entries.
    pub fn read_json<R: Read>(reader: R) -> io::Result<Self> {
        let raw: RawHistory = serde_json::from_reader(reader).map_err(io::Error::from)?;
        Self::from_entries(raw.entries)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

impl<'de> Deserialize<'de> for CompactHistory {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = RawHistory::deserialize(deserializer)?;
        Self::from_entries(raw.entries).map_err(serde::de::Error::custom)
    }
}

#[derive(Deserialize)]
struct RawHistory {
    entries: Vec<HistoryEntry>,
}

impl<'a> IntoIterator for &'a CompactHistory {
    type Item = &'a HistoryEntry;
    type IntoIter = std::slice::Iter<'a, HistoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Builds a [`CompactHistory`] as a run progresses.
#[derive(Debug, Default)]
pub struct HistoryRecorder {
    entries: Vec<HistoryEntry>,
    last_invasion: u64,
}

impl HistoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `displaced` was replaced at `generation`.
    ///
    /// Generations must be strictly increasing across calls and every
    /// displaced vector must have the length of the first one.
    pub fn record_invasion(&mut self, generation: u64, displaced: Vec<f64>) -> Result<(), HistoryError> {
        if generation <= self.last_invasion {
            return Err(HistoryError::NonIncreasingGeneration {
                generation,
                last_invasion: self.last_invasion,
            });
        }
        if let Some(first) = self.entries.first() {
            if first.resident.len() != displaced.len() {
                return Err(HistoryError::DimensionMismatch {
                    sequence_index: self.entries.len(),
                });
            }
        }
        self.entries.push(HistoryEntry {
            sequence_index: self.entries.len(),
            alive: generation - self.last_invasion,
            resident: displaced.into(),
        });
        self.last_invasion = generation;
        Ok(())
    }

    /// Generation of the most recent invasion (0 before the first).
    pub fn last_invasion(&self) -> u64 {
        self.last_invasion
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finish recording.
    pub fn finish(self) -> CompactHistory {
        CompactHistory {
            entries: self.entries,
        }
    }
}

/// Compact history validation errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HistoryError {
    #[error("Entry out of order: expected sequence index {expected}, found {found}")]
    OutOfOrder { expected: usize, found: usize },
    #[error("Entry {sequence_index} has an alive count of zero")]
    ZeroAlive { sequence_index: usize },
    #[error("Entry {sequence_index} has a different vector length than entry 0")]
    DimensionMismatch { sequence_index: usize },
    #[error("Invasion at generation {generation} does not follow the last one at {last_invasion}")]
    NonIncreasingGeneration { generation: u64, last_invasion: u64 },
}
