//! Scriptable backend used by controller tests

use std::sync::Mutex;

use super::{BackendState, PlayerBackend};

#[derive(Default)]
pub struct FakeBackend {
    pub normalized: bool,
    pub time: Mutex<f64>,
    pub media_duration: Mutex<f64>,
    pub state: Mutex<Option<BackendState>>,
    pub volume: Mutex<u32>,
    pub rate_calls: Mutex<Vec<f64>>,
    pub seek_calls: Mutex<Vec<f64>>,
    pub play_calls: Mutex<u32>,
    pub pause_calls: Mutex<u32>,
}

impl FakeBackend {
    pub fn new(normalized: bool) -> Self {
        Self {
            normalized,
            ..Self::default()
        }
    }

    pub fn set_time(&self, time: f64) {
        *self.time.lock().unwrap() = time;
    }

    pub fn set_media_duration(&self, duration: f64) {
        *self.media_duration.lock().unwrap() = duration;
    }
}

impl PlayerBackend for FakeBackend {
    fn play(&self) {
        *self.play_calls.lock().unwrap() += 1;
    }

    fn pause(&self) {
        *self.pause_calls.lock().unwrap() += 1;
    }

    fn seek_to(&self, seconds: f64, _allow_seek_ahead: bool) {
        self.seek_calls.lock().unwrap().push(seconds);
        *self.time.lock().unwrap() = seconds;
    }

    fn current_time(&self) -> f64 {
        *self.time.lock().unwrap()
    }

    fn duration(&self) -> f64 {
        *self.media_duration.lock().unwrap()
    }

    fn set_playback_rate(&self, rate: f64) {
        self.rate_calls.lock().unwrap().push(rate);
    }

    fn set_volume(&self, level: u32) {
        *self.volume.lock().unwrap() = level.min(100);
    }

    fn volume(&self) -> f64 {
        f64::from(*self.volume.lock().unwrap())
    }

    fn player_state(&self) -> BackendState {
        self.state.lock().unwrap().unwrap_or(BackendState::Unstarted)
    }

    fn normalized_time_domain(&self) -> bool {
        self.normalized
    }
}
