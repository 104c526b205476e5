//! Evolutionary history recording and expansion.
//!
//! A run does not store every generation. It stores one [`HistoryEntry`] per
//! invasion: the displaced resident plus the number of generations it was
//! alive. Consumers that need per-generation snapshots (plotting, video
//! export) expand the compact form into a [`DenseHistory`] afterwards.
//!
//! ```text
//! Compact:  [ r0 x3 ][ r1 x1 ][ r2 x4 ]
//! Dense:    g0 g1 g2 | g3 | g4 g5 g6 g7
//!           r0 r0 r0 | r1 | r2 r2 r2 r2
//! ```
//!
//! The sum of `alive` counts equals the generation of the last invasion.
//! Residents are shared immutable slices, so expanded snapshots never copy
//! and can never be altered after the fact.

mod expand;
mod recorder;

pub use expand::{DenseHistory, Frame, downsample, expand_history};
pub use recorder::{CompactHistory, HistoryEntry, HistoryError, HistoryRecorder};
