//! Wall-clock media timeline shared by the backend variants
//!
//! Tracks the normalized (1.0x) media position: while playing, the
//! position advances at `rate` normalized seconds per wall second, clamped
//! to the media duration. Reads extrapolate from the last materialized
//! position instead of ticking on a timer.

use std::sync::Mutex;

use tokio::time::Instant;

struct TimelineInner {
    /// Normalized position at `last_update`.
    position: f64,
    rate: f64,
    playing: bool,
    last_update: Instant,
    duration: f64,
}

pub(super) struct MediaTimeline {
    inner: Mutex<TimelineInner>,
}

impl MediaTimeline {
    pub fn new(duration: f64) -> Self {
        Self {
            inner: Mutex::new(TimelineInner {
                position: 0.0,
                rate: 1.0,
                playing: false,
                last_update: Instant::now(),
                duration: duration.max(0.0),
            }),
        }
    }

    fn extrapolate(inner: &TimelineInner) -> f64 {
        if inner.playing {
            let elapsed = inner.last_update.elapsed().as_secs_f64();
            (inner.position + elapsed * inner.rate).min(inner.duration)
        } else {
            inner.position.min(inner.duration)
        }
    }

    /// Fold the elapsed wall time into `position` so a subsequent state
    /// change starts from the current point.
    fn materialize(inner: &mut TimelineInner) {
        inner.position = Self::extrapolate(inner);
        inner.last_update = Instant::now();
    }

    pub fn position(&self) -> f64 {
        let inner = self.inner.lock().unwrap();
        Self::extrapolate(&inner)
    }

    pub fn duration(&self) -> f64 {
        self.inner.lock().unwrap().duration
    }

    pub fn rate(&self) -> f64 {
        self.inner.lock().unwrap().rate
    }

    pub fn playing(&self) -> bool {
        self.inner.lock().unwrap().playing
    }

    pub fn set_playing(&self, playing: bool) {
        let mut inner = self.inner.lock().unwrap();
        Self::materialize(&mut inner);
        inner.playing = playing;
    }

    /// Seek to a normalized position, clamped to the media bounds.
    pub fn seek(&self, position: f64) {
        let mut inner = self.inner.lock().unwrap();
        inner.position = position.clamp(0.0, inner.duration);
        inner.last_update = Instant::now();
    }

    /// Change the playback rate without moving the normalized position.
    pub fn set_rate(&self, rate: f64) {
        let mut inner = self.inner.lock().unwrap();
        Self::materialize(&mut inner);
        inner.rate = rate;
    }

    /// True exactly once when playback has run into the end of the media;
    /// the timeline stops itself so the caller can report the transition.
    pub fn poll_ended(&self) -> bool {
        let mut inner = self.inner.lock().unwrap();
        if inner.playing && Self::extrapolate(&inner) >= inner.duration {
            Self::materialize(&mut inner);
            inner.playing = false;
            true
        } else {
            false
        }
    }
}
