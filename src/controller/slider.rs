//! Seek slider controller
//!
//! Implements the frozen-drag protocol: while a drag is live, and for a
//! short settle window after it ends, clock-driven updates must not move
//! the slider. The settle window absorbs the backend's delayed time report
//! that would otherwise overwrite the user's just-chosen position.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::model::{SliderRange, SliderState};
use crate::timer::DelayedTask;

/// How long after a drag ends clock updates stay suppressed.
const SETTLE_WINDOW: Duration = Duration::from_millis(200);

const ENDED_DESCRIPTION: &str = "video ended";

#[derive(Clone)]
pub struct ProgressSlider {
    state: Arc<Mutex<SliderState>>,
    settle: DelayedTask,
}

impl ProgressSlider {
    pub fn new(state: Arc<Mutex<SliderState>>) -> Self {
        Self {
            state,
            settle: DelayedTask::new(),
        }
    }

    pub fn value_ms(&self) -> u64 {
        self.state.lock().unwrap().value_ms
    }

    /// A drag move: freeze the slider and show the dragged position.
    pub fn on_slide(&self, value_ms: u64) {
        let mut state = self.state.lock().unwrap();
        state.frozen = true;
        state.value_ms = value_ms;
        state.time_description = time_description(value_ms);
    }

    /// Drag release: keep the final position frozen, then thaw after the
    /// settle window. A new drag before the window elapses re-arms it.
    pub fn on_stop(&self, value_ms: u64) {
        {
            let mut state = self.state.lock().unwrap();
            state.frozen = true;
            state.value_ms = value_ms;
            state.time_description = time_description(value_ms);
        }

        let state = self.state.clone();
        self.settle.schedule(SETTLE_WINDOW, move || {
            state.lock().unwrap().frozen = false;
        });
    }

    /// Clock-driven update; a strict no-op while frozen.
    pub fn update_play_time(&self, time: f64, duration: f64) {
        let mut state = self.state.lock().unwrap();
        if state.frozen {
            return;
        }

        state.max_ms = (duration.max(0.0).floor() as u64) * 1000;
        state.value_ms = (time.max(0.0).floor() as u64) * 1000;
        if !state.ended {
            state.time_description = time_description(state.value_ms);
        }
    }

    /// Signal (or clear) the "playback stopped" state for assistive
    /// technology: the description is replaced and focus is requested on
    /// the handle; resuming play reverts it.
    pub fn notify_end(&self, ended: bool) {
        let mut state = self.state.lock().unwrap();
        state.ended = ended;
        state.time_description = if ended {
            ENDED_DESCRIPTION.to_string()
        } else {
            time_description(state.value_ms)
        };
    }

    /// Recompute the highlighted trim sub-range. `domain_scale` re-expresses
    /// the normalized bounds into the backend's domain (1.0 on the
    /// normalized backend, 1/speed on the scaled one). No range is shown
    /// without a duration or when the region spans the whole track.
    pub fn update_trim_region(
        &self,
        start_time: Option<f64>,
        end_time: Option<f64>,
        duration: f64,
        domain_scale: f64,
    ) {
        let mut state = self.state.lock().unwrap();
        if duration <= 0.0 {
            return;
        }

        let mut start = start_time.unwrap_or(0.0);
        if start > duration {
            start = 0.0;
        } else {
            start *= domain_scale;
        }

        let end = match end_time {
            None => duration,
            Some(end) if end > duration => duration,
            Some(end) => end * domain_scale,
        };

        if start == 0.0 && end == duration {
            state.range = None;
            return;
        }

        let step = 100.0 / duration;
        let left_pct = start * step;
        state.range = Some(SliderRange {
            left_pct,
            width_pct: end * step - left_pct,
        });
    }
}

impl super::Pausable for ProgressSlider {
    fn on_play(&self) {
        // Resuming playback reverts the "video ended" notification.
        self.notify_end(false);
    }

    fn on_pause(&self) {}
}

/// Human-readable position, e.g. "1 hour 2 minutes 3 seconds". Leading
/// zero-valued units are omitted; inner zeroes are spelled out so the
/// phrase stays unambiguous.
pub fn time_description(value_ms: u64) -> String {
    let total_seconds = value_ms / 1000;
    let seconds = total_seconds % 60;
    let minutes = (total_seconds / 60) % 60;
    let hours = total_seconds / 3600;

    let unit = |count: u64, singular: &str, plural: &str| {
        if count == 1 {
            format!("{count} {singular}")
        } else {
            format!("{count} {plural}")
        }
    };

    if hours > 0 {
        format!(
            "{} {} {}",
            unit(hours, "hour", "hours"),
            unit(minutes, "minute", "minutes"),
            unit(seconds, "second", "seconds")
        )
    } else if minutes > 0 {
        format!(
            "{} {}",
            unit(minutes, "minute", "minutes"),
            unit(seconds, "second", "seconds")
        )
    } else {
        unit(seconds, "second", "seconds")
    }
}
