//! Playback clock: canonical playback state and time-domain conversion
//!
//! Owns the single `PlaybackState` instance. Converts the backend's raw
//! time reports into the normalized caption domain, applies speed changes
//! with duplicate suppression, and validates/clears the trim region.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::backend::PlayerBackend;
use crate::events::{EventBus, PlayerEvent};
use crate::model::{PlaybackState, PlayerPhase, Speed};

/// Fixed offset compensating for backend dispatch delay between a time
/// report and the caption lookup, in milliseconds.
const CAPTION_LATENCY_MS: u64 = 100;

/// Re-express `time` from one speed's timeline into another's.
pub fn convert(time: f64, from: f64, to: f64) -> f64 {
    time * from / to
}

#[derive(Clone)]
pub struct PlaybackClock {
    state: Arc<Mutex<PlaybackState>>,
    backend: Arc<dyn PlayerBackend>,
    bus: EventBus,
    /// Secondary duration source (normalized seconds) while the backend
    /// still reports zero.
    duration_hint: Option<f64>,
    trim_validated: Arc<AtomicBool>,
}

impl PlaybackClock {
    pub fn new(
        state: Arc<Mutex<PlaybackState>>,
        backend: Arc<dyn PlayerBackend>,
        bus: EventBus,
        duration_hint: Option<f64>,
    ) -> Self {
        Self {
            state,
            backend,
            bus,
            duration_hint,
            trim_validated: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn current_time(&self) -> f64 {
        self.state.lock().unwrap().current_time
    }

    pub fn set_current_time(&self, time: f64) {
        self.state.lock().unwrap().current_time = time;
    }

    pub fn speed(&self) -> Speed {
        self.state.lock().unwrap().speed
    }

    pub fn phase(&self) -> PlayerPhase {
        self.state.lock().unwrap().phase
    }

    pub fn set_phase(&self, phase: PlayerPhase) {
        self.state.lock().unwrap().phase = phase;
    }

    pub fn is_playing(&self) -> bool {
        self.state.lock().unwrap().is_playing()
    }

    pub fn trim_bounds(&self) -> (Option<f64>, Option<f64>) {
        let state = self.state.lock().unwrap();
        (state.start_time, state.end_time)
    }

    /// Duration in the backend's time domain: the backend's report when it
    /// has one, otherwise the configured hint re-expressed into the
    /// backend domain. The result is also recorded on the playback state.
    pub fn refresh_duration(&self) -> Option<f64> {
        let reported = self.backend.duration();
        let duration = if reported > 0.0 {
            Some(reported)
        } else {
            self.duration_hint.map(|hint| self.from_normalized(hint))
        };

        self.state.lock().unwrap().duration = duration;
        duration
    }

    /// Backend-domain seconds -> normalized caption-domain seconds.
    pub fn to_normalized(&self, time: f64) -> f64 {
        if self.backend.normalized_time_domain() {
            time
        } else {
            convert(time, self.speed().factor(), 1.0)
        }
    }

    /// Normalized seconds -> backend-domain seconds.
    pub fn from_normalized(&self, time: f64) -> f64 {
        if self.backend.normalized_time_domain() {
            time
        } else {
            convert(time, 1.0, self.speed().factor())
        }
    }

    /// Caption lookup key for a raw backend time report: normalized
    /// milliseconds plus the fixed dispatch-latency offset.
    pub fn caption_query_ms(&self, time: f64) -> u64 {
        let normalized = self.to_normalized(time).max(0.0);
        (normalized * 1000.0).round() as u64 + CAPTION_LATENCY_MS
    }

    /// Backend-domain seek target for a caption authored at `start_ms`.
    pub fn caption_seek_seconds(&self, start_ms: u64) -> f64 {
        self.from_normalized(start_ms as f64 / 1000.0)
    }

    /// Apply a speed change. Suppresses duplicates: a second call with the
    /// current speed performs no backend call and emits no event.
    ///
    /// On the non-normalized backend the stored current time is
    /// re-expressed into the new speed's timeline; the backend itself
    /// preserves the media position across a rate change, so no seek is
    /// issued. The trim bounds are normalized seconds and stay untouched.
    pub fn on_speed_change(&self, new_speed: Speed, is_external: bool) {
        let (old_speed, event_time) = {
            let mut state = self.state.lock().unwrap();
            if state.speed == new_speed {
                tracing::debug!(speed = new_speed.as_str(), "Speed unchanged, ignoring");
                return;
            }

            let old_speed = state.speed;
            let event_time = state.current_time;
            if !self.backend.normalized_time_domain() {
                state.current_time =
                    convert(state.current_time, old_speed.factor(), new_speed.factor());
            }
            state.speed = new_speed;
            (old_speed, event_time)
        };

        tracing::info!(
            old_speed = old_speed.as_str(),
            new_speed = new_speed.as_str(),
            is_external,
            "Changing playback speed"
        );
        self.bus.emit(PlayerEvent::SpeedChange {
            current_time: event_time,
            old_speed,
            new_speed,
        });
        self.backend.set_playback_rate(new_speed.factor());
    }

    /// One-time trim validation once the duration is known. An
    /// out-of-range `end_time` is reset to `None` (trim must never
    /// truncate the media); an out-of-range `start_time` is dropped.
    /// Returns the backend-domain target of the single initial seek to a
    /// valid `start_time`.
    pub fn validate_trim(&self, backend_duration: f64) -> Option<f64> {
        if backend_duration <= 0.0 || self.trim_validated.swap(true, Ordering::SeqCst) {
            return None;
        }

        let duration = self.to_normalized(backend_duration);
        let mut state = self.state.lock().unwrap();

        if let Some(end) = state.end_time {
            let floor = state.start_time.unwrap_or(0.0);
            if end <= floor || end > duration {
                tracing::warn!(end, duration, "End time out of range, trim disabled");
                state.end_time = None;
            }
        }

        if let Some(start) = state.start_time {
            if start <= 0.0 || start >= duration {
                tracing::warn!(start, duration, "Start time out of range, ignoring");
                state.start_time = None;
            }
        }

        let start = state.start_time;
        let speed = state.speed;
        drop(state);

        start.map(|start| {
            if self.backend.normalized_time_domain() {
                start
            } else {
                convert(start, 1.0, speed.factor())
            }
        })
    }

    /// Whether the backend-domain `time` has reached the trim-out point.
    pub fn trim_end_reached(&self, time: f64) -> bool {
        let end = self.state.lock().unwrap().end_time;
        match end {
            Some(end) => self.to_normalized(time) >= end,
            None => false,
        }
    }

    /// One-shot trim: both bounds are cleared when the region fires.
    pub fn clear_trim(&self) {
        let mut state = self.state.lock().unwrap();
        state.start_time = None;
        state.end_time = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::fake::FakeBackend;
    use crate::events::EmittedEvent;

    fn clock_with(
        normalized: bool,
        duration_hint: Option<f64>,
    ) -> (PlaybackClock, Arc<FakeBackend>, Arc<Mutex<Vec<PlayerEvent>>>) {
        let backend = Arc::new(FakeBackend::new(normalized));
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        bus.subscribe(move |e: &EmittedEvent| sink.lock().unwrap().push(e.event.clone()));

        let state = Arc::new(Mutex::new(PlaybackState::default()));
        let clock = PlaybackClock::new(state, backend.clone(), bus, duration_hint);
        (clock, backend, seen)
    }

    #[test]
    fn convert_round_trips_for_all_speed_pairs() {
        for a in Speed::ALL {
            for b in Speed::ALL {
                let t = 63.7;
                let back = convert(convert(t, a.factor(), b.factor()), b.factor(), a.factor());
                assert!((back - t).abs() < 1e-9, "{a:?} -> {b:?}");
            }
        }
    }

    #[test]
    fn speed_change_emits_exactly_one_event_and_backend_call() {
        let (clock, backend, seen) = clock_with(true, None);
        clock.set_current_time(60.0);

        clock.on_speed_change(Speed::X0_75, false);
        clock.on_speed_change(Speed::X0_75, false);

        assert_eq!(
            *seen.lock().unwrap(),
            vec![PlayerEvent::SpeedChange {
                current_time: 60.0,
                old_speed: Speed::X1_00,
                new_speed: Speed::X0_75,
            }]
        );
        assert_eq!(*backend.rate_calls.lock().unwrap(), vec![0.75]);
        // Normalized backend: perceived position needs no re-expression.
        assert_eq!(clock.current_time(), 60.0);
    }

    #[test]
    fn speed_change_re_expresses_time_on_the_scaled_backend() {
        let (clock, backend, _seen) = clock_with(false, None);
        clock.set_current_time(60.0);

        clock.on_speed_change(Speed::X0_75, false);

        assert!((clock.current_time() - 80.0).abs() < 1e-9);
        // No seek: the backend keeps its media position across rate changes.
        assert!(backend.seek_calls.lock().unwrap().is_empty());
    }

    #[test]
    fn speed_change_leaves_trim_bounds_alone() {
        let (clock, _backend, _seen) = clock_with(false, None);
        {
            let (start, end) = clock.trim_bounds();
            assert_eq!((start, end), (None, None));
        }
        clock.state.lock().unwrap().start_time = Some(10.0);
        clock.state.lock().unwrap().end_time = Some(50.0);

        clock.on_speed_change(Speed::X1_50, false);
        assert_eq!(clock.trim_bounds(), (Some(10.0), Some(50.0)));
    }

    #[test]
    fn out_of_range_end_time_is_reset_once_duration_is_known() {
        let (clock, backend, _seen) = clock_with(true, None);
        clock.state.lock().unwrap().end_time = Some(100_000.0);
        backend.set_media_duration(125.0);

        assert_eq!(clock.validate_trim(125.0), None);
        assert_eq!(clock.trim_bounds().1, None);
    }

    #[test]
    fn valid_trim_survives_validation_and_requests_the_initial_seek() {
        let (clock, _backend, _seen) = clock_with(true, None);
        {
            let mut state = clock.state.lock().unwrap();
            state.start_time = Some(10.0);
            state.end_time = Some(50.0);
        }

        assert_eq!(clock.validate_trim(125.0), Some(10.0));
        assert_eq!(clock.trim_bounds(), (Some(10.0), Some(50.0)));
        // Validation is one-shot.
        assert_eq!(clock.validate_trim(125.0), None);
    }

    #[test]
    fn trim_end_detection_uses_the_normalized_domain() {
        let (clock, _backend, _seen) = clock_with(false, None);
        clock.state.lock().unwrap().end_time = Some(60.0);
        clock.state.lock().unwrap().speed = Speed::X0_75;

        // 79 scaled seconds at 0.75x are 59.25 normalized seconds.
        assert!(!clock.trim_end_reached(79.0));
        assert!(clock.trim_end_reached(80.0));
    }

    #[test]
    fn caption_queries_convert_and_offset() {
        let (clock, _backend, _seen) = clock_with(true, None);
        assert_eq!(clock.caption_query_ms(60.0), 60_100);

        let (clock, _backend, _seen) = clock_with(false, None);
        clock.state.lock().unwrap().speed = Speed::X0_75;
        // 80 scaled seconds at 0.75x are 60 normalized seconds.
        assert_eq!(clock.caption_query_ms(80.0), 60_100);
        assert!((clock.caption_seek_seconds(60_000) - 80.0).abs() < 1e-9);
    }

    #[test]
    fn duration_falls_back_to_the_configured_hint() {
        let (clock, backend, _seen) = clock_with(false, Some(120.0));
        clock.state.lock().unwrap().speed = Speed::X1_50;

        // Backend has no duration yet: the hint, re-expressed to the
        // backend's scaled domain.
        let duration = clock.refresh_duration().unwrap();
        assert!((duration - 80.0).abs() < 1e-9);

        backend.set_media_duration(90.0);
        assert_eq!(clock.refresh_duration(), Some(90.0));

        let (clock, _backend, _seen) = clock_with(true, None);
        assert_eq!(clock.refresh_duration(), None);
    }
}
