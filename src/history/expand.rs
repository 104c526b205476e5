//! Expansion of a compact history into per-generation snapshots.

use std::collections::VecDeque;
use std::sync::Arc;

use super::recorder::{CompactHistory, HistoryEntry};

/// A resident snapshot at a given generation.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub generation: u64,
    pub resident: Arc<[f64]>,
}

/// Generation-indexed resident snapshots, strictly increasing in generation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DenseHistory {
    frames: Vec<Frame>,
}

impl DenseHistory {
    /// Expand `compact` into a snapshot at every generation that is a multiple
    /// of `record_every`. A stride of 0 is treated as 1.
    ///
    /// Generation 0 holds the run's initial resident. Snapshots share storage
    /// with the compact entries.
    pub fn expand(compact: &CompactHistory, record_every: u64) -> Self {
        let record_every = record_every.max(1);
        let total_generations = compact.total_generations();
        let mut frames = Vec::with_capacity((total_generations / record_every) as usize + 1);

        let mut pending: VecDeque<&HistoryEntry> = compact.iter().collect();
        let mut head = pending.pop_front();
        let mut remaining = head.map_or(0, |e| e.alive);

        for generation in 0..total_generations {
            let Some(entry) = head else {
                break;
            };
            if generation % record_every == 0 {
                frames.push(Frame {
                    generation,
                    resident: Arc::clone(&entry.resident),
                });
            }
            remaining -= 1;
            if remaining == 0 {
                head = pending.pop_front();
                remaining = head.map_or(0, |e| e.alive);
            }
        }

        Self { frames }
    }

    /// Keep roughly `approximate_frames` evenly spaced frames.
    ///
    /// The stride is `len / approximate_frames` (at least 1), starting from
    /// the first frame.
    pub fn downsample(&self, approximate_frames: usize) -> Self {
        let interval = (self.frames.len() / approximate_frames.max(1)).max(1);
        Self {
            frames: self.frames.iter().step_by(interval).cloned().collect(),
        }
    }

    /// Frames in generation order.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Frame> {
        self.frames.iter()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Recorded generation indices.
    pub fn generations(&self) -> impl Iterator<Item = u64> + '_ {
        self.frames.iter().map(|f| f.generation)
    }

    /// Snapshot recorded exactly at `generation`.
    pub fn get(&self, generation: u64) -> Option<&Arc<[f64]>> {
        self.frames
            .binary_search_by_key(&generation, |f| f.generation)
            .ok()
            .map(|i| &self.frames[i].resident)
    }

    /// Latest snapshot recorded at or before `generation`.
    pub fn resident_at(&self, generation: u64) -> Option<&Arc<[f64]>> {
        let idx = self.frames.partition_point(|f| f.generation <= generation);
        idx.checked_sub(1).map(|i| &self.frames[i].resident)
    }

    /// Re-derive run lengths from consecutive snapshots of the same entry.
    ///
    /// Runs are split where the shared storage changes, so two entries
    /// holding equal values stay separate. Alive counts are measured in
    /// frames, so for a history expanded with a stride of 1 this reproduces
    /// the compact entries.
    pub fn recompress(&self) -> CompactHistory {
        let mut entries: Vec<HistoryEntry> = Vec::new();
        for frame in &self.frames {
            match entries.last_mut() {
                Some(last) if Arc::ptr_eq(&last.resident, &frame.resident) => last.alive += 1,
                _ => entries.push(HistoryEntry {
                    sequence_index: entries.len(),
                    alive: 1,
                    resident: Arc::clone(&frame.resident),
                }),
            }
        }
        // Entries are built in order with positive run lengths.
        CompactHistory::from_entries(entries).unwrap_or_default()
    }
}

impl<'a> IntoIterator for &'a DenseHistory {
    type Item = &'a Frame;
    type IntoIter = std::slice::Iter<'a, Frame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

/// Expand a compact history with the given stride.
pub fn expand_history(compact: &CompactHistory, record_every: u64) -> DenseHistory {
    DenseHistory::expand(compact, record_every)
}

/// Downsample a dense history to roughly `approximate_frames` frames.
pub fn downsample(dense: &DenseHistory, approximate_frames: usize) -> DenseHistory {
    dense.downsample(approximate_frames)
}
