//! Gapless playback scheduling.
//!
//! Audio arrives in chunks faster than realtime. Each chunk is scheduled at
//! `max(end of previous chunk, now)` so consecutive chunks play seamlessly
//! but a chunk arriving after a silence starts immediately instead of in
//! the past. The scheduler tracks live sources so an interruption can stop
//! them all at once.

use std::time::Instant;

/// A clock for playback timestamps, in seconds.
///
/// Abstracted so tests can drive virtual time.
pub trait OutputClock {
    fn now(&self) -> f64;
}

/// Wall-clock seconds since construction.
#[derive(Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputClock for MonotonicClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Identifier of a scheduled playback source.
pub type SourceId = u64;

#[derive(Debug, Clone, Copy)]
struct ScheduledSource {
    id: SourceId,
    start: f64,
    duration: f64,
}

/// Tracks where the next chunk starts and which sources are still live.
#[derive(Debug, Default)]
pub struct PlaybackScheduler {
    next_start: f64,
    next_id: SourceId,
    active: Vec<ScheduledSource>,
}

impl PlaybackScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a chunk of the given duration. Returns the source id and
    /// its start time: the end of the previous chunk, or `now` if the
    /// queue has drained.
    pub fn schedule(&mut self, duration: f64, now: f64) -> (SourceId, f64) {
        self.prune(now);
        let start = self.next_start.max(now);
        let id = self.next_id;
        self.next_id += 1;
        self.active.push(ScheduledSource { id, start, duration });
        self.next_start = start + duration;
        (id, start)
    }

    /// Stop everything. Returns the ids of sources that were still live;
    /// the next chunk scheduled after this starts fresh at `now`.
    pub fn interrupt(&mut self) -> Vec<SourceId> {
        self.next_start = 0.0;
        self.active.drain(..).map(|s| s.id).collect()
    }

    /// Forget a source that finished playing on its own.
    pub fn source_ended(&mut self, id: SourceId) {
        self.active.retain(|s| s.id != id);
    }

    /// Ids of sources still scheduled or playing.
    pub fn active_sources(&self) -> Vec<SourceId> {
        self.active.iter().map(|s| s.id).collect()
    }

    fn prune(&mut self, now: f64) {
        self.active.retain(|s| s.start + s.duration > now);
    }
}
