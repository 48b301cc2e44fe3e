//! Per-subject sample sequences: the unit of truth handed to the aggregator.
//! Appends enforce strictly increasing timestamps per key; out-of-order and
//! duplicate-timestamp samples are rejected and counted, never thrown. Once a
//! sequence is closed it is read-only.

use std::collections::HashMap;

use crate::models::EmotionSample;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_warn;

#[derive(Debug, Default)]
struct SampleSequence {
    samples: Vec<EmotionSample>,
    closed: bool,
}

#[derive(Debug, Default)]
pub struct SampleBuffer {
    sequences: HashMap<String, SampleSequence>,
    rejected: u64,
}

impl SampleBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sample to the sequence for `key`. Returns false (and counts
    /// the rejection) when the sequence is closed or the timestamp does not
    /// advance past the last appended one.
    pub fn append(&mut self, key: &str, sample: EmotionSample) -> bool {
        let sequence = self.sequences.entry(key.to_string()).or_default();

        if sequence.closed {
            self.rejected += 1;
            log_warn!("rejected sample for closed sequence {}", key);
            return false;
        }

        if let Some(last) = sequence.samples.last() {
            if sample.timestamp_ms <= last.timestamp_ms {
                self.rejected += 1;
                log_warn!(
                    "rejected out-of-order sample for {} ({}ms after {}ms)",
                    key,
                    sample.timestamp_ms,
                    last.timestamp_ms
                );
                return false;
            }
        }

        sequence.samples.push(sample);
        true
    }

    /// Mark one sequence read-only.
    pub fn close(&mut self, key: &str) {
        if let Some(sequence) = self.sequences.get_mut(key) {
            sequence.closed = true;
        }
    }

    /// Mark every sequence read-only. Called when the session ends, before
    /// any aggregation snapshot is taken.
    pub fn close_all(&mut self) {
        for sequence in self.sequences.values_mut() {
            sequence.closed = true;
        }
    }

    /// Immutable snapshot of all sequences for an aggregation run. Appends
    /// arriving after the snapshot are excluded from that run by
    /// construction.
    pub fn snapshot(&self) -> Vec<Vec<EmotionSample>> {
        let mut keys: Vec<&String> = self.sequences.keys().collect();
        keys.sort();
        keys.into_iter()
            .map(|key| self.sequences[key].samples.clone())
            .collect()
    }

    pub fn rejected_count(&self) -> u64 {
        self.rejected
    }

    pub fn sample_count(&self) -> usize {
        self.sequences.values().map(|s| s.samples.len()).sum()
    }
}
