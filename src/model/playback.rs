//! Playback state owned by the playback clock

use super::types::{PlayerPhase, Speed};

/// Canonical mutable playback state. There is exactly one instance per
/// active player; it is owned by the `PlaybackClock` and mutated only
/// through its operations. Other components read snapshots of it.
///
/// `current_time` is kept in the backend's own time domain (the value the
/// adapter last reported); the clock converts to the normalized caption
/// domain at the point of use.
#[derive(Clone, Debug)]
pub struct PlaybackState {
    pub current_time: f64,
    pub speed: Speed,
    /// Duration in the backend's time domain; `None` until either the
    /// backend or the configured fallback can provide it.
    pub duration: Option<f64>,
    pub phase: PlayerPhase,
    /// Trim-in point, normalized seconds. Cleared together with `end_time`
    /// when the trim region fires.
    pub start_time: Option<f64>,
    /// Trim-out point, normalized seconds. Reaching it pauses playback
    /// exactly once.
    pub end_time: Option<f64>,
}

impl PlaybackState {
    pub fn new(speed: Speed, start_time: Option<f64>, end_time: Option<f64>) -> Self {
        Self {
            current_time: 0.0,
            speed,
            duration: None,
            phase: PlayerPhase::Unstarted,
            start_time,
            end_time,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.phase == PlayerPhase::Playing
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new(Speed::default(), None, None)
    }
}
