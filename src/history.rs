// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Silicon Thermal Simulation Suite ("The Die") - History Recorder

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::config::HISTORY_INTERVAL;
use crate::types::HistorySample;

/// Samples the state every `HISTORY_INTERVAL` simulated seconds into a
/// bounded FIFO. The buffer itself lives in `SimulationState` so consumers
/// see it in every snapshot; the recorder only owns the sampling clock.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryRecorder {
    capacity: usize,
    timer: f64,
}

impl HistoryRecorder {
    pub fn new(capacity: usize) -> Self {
        Self { capacity: capacity.max(1), timer: 0.0 }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Simulated seconds accumulated since the last sample.
    pub fn elapsed(&self) -> f64 {
        self.timer
    }

    /// Advance the sampling clock by `dt`; push `sample` if an interval
    /// elapsed. Returns whether a sample was taken.
    pub fn record(&mut self, buffer: &mut VecDeque<HistorySample>, sample: HistorySample, dt: f64) -> bool {
        self.timer += dt;
        if self.timer < HISTORY_INTERVAL {
            return false;
        }
        self.timer = 0.0;
        buffer.push_back(sample);
        self.trim(buffer);
        true
    }

    /// Drop oldest samples until the buffer fits.
    pub fn trim(&self, buffer: &mut VecDeque<HistorySample>) {
        while buffer.len() > self.capacity {
            buffer.pop_front();
        }
    }
}
