//! Records of previous planning cycles.

use crate::obstacle::{ObstacleSet, StopDecision};
use crate::path::DiscretizedPath;
use std::collections::VecDeque;

/// The number of cycles a [FrameHistory] retains by default.
const DEFAULT_CAPACITY: usize = 4;

/// What a planning cycle produced.
#[derive(Clone, Debug, Default)]
pub struct HistoryFrame {
    /// The sequence number of the cycle.
    pub seq: usize,
    /// The path planned during the cycle.
    pub planned_path: DiscretizedPath,
    /// The obstacles seen during the cycle, with the decisions made for them.
    pub obstacles: ObstacleSet,
}

impl HistoryFrame {
    pub fn new(seq: usize, planned_path: DiscretizedPath, obstacles: ObstacleSet) -> Self {
        Self {
            seq,
            planned_path,
            obstacles,
        }
    }

    /// Returns an iterator over the stop decisions made during the cycle.
    pub fn stop_decisions(&self) -> impl Iterator<Item = &StopDecision> {
        self.obstacles.iter().filter_map(|obstacle| obstacle.stop.as_ref())
    }
}

/// Provides access to previous planning cycles.
pub trait HistoryStore {
    /// The most recently recorded cycle, if there is one.
    fn latest(&self) -> Option<&HistoryFrame>;
}

/// A bounded record of the most recent planning cycles.
#[derive(Clone, Debug)]
pub struct FrameHistory {
    capacity: usize,
    frames: VecDeque<HistoryFrame>,
}

impl FrameHistory {
    /// Creates an empty history with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an empty history which retains up to `capacity` cycles.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            frames: VecDeque::with_capacity(capacity),
        }
    }

    /// Records a cycle, evicting the oldest if the history is full.
    pub fn push(&mut self, frame: HistoryFrame) {
        if self.frames.len() == self.capacity {
            self.frames.pop_front();
        }
        self.frames.push_back(frame);
    }

    /// Gets a recorded cycle by its sequence number.
    pub fn find(&self, seq: usize) -> Option<&HistoryFrame> {
        self.frames.iter().find(|frame| frame.seq == seq)
    }

    /// Forgets every recorded cycle.
    pub fn clear(&mut self) {
        self.frames.clear();
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl Default for FrameHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStore for FrameHistory {
    fn latest(&self) -> Option<&HistoryFrame> {
        self.frames.back()
    }
}

impl HistoryStore for Option<HistoryFrame> {
    fn latest(&self) -> Option<&HistoryFrame> {
        self.as_ref()
    }
}
