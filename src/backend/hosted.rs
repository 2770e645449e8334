//! Hosted streaming backend
//!
//! Models the embedded player of a hosted streaming service: it becomes
//! usable only after an asynchronous ready handshake, reports no duration
//! until then, and reports/accepts time in the normalized (1.0x) domain no
//! matter which playback rate is configured.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::timeline::MediaTimeline;
use super::{BackendEvent, BackendEventSender, BackendState, PlayerBackend};

const READY_DELAY: Duration = Duration::from_millis(300);
const DEFAULT_QUALITY: &str = "hd720";

pub struct HostedBackend {
    timeline: MediaTimeline,
    volume: Mutex<u32>,
    state: Mutex<BackendState>,
    ready: Arc<AtomicBool>,
    started: AtomicBool,
    tx: BackendEventSender,
}

impl HostedBackend {
    pub fn new(media_duration: f64, tx: BackendEventSender) -> Self {
        let ready = Arc::new(AtomicBool::new(false));

        let ready_flag = ready.clone();
        let ready_tx = tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(READY_DELAY).await;
            ready_flag.store(true, Ordering::SeqCst);
            let _ = ready_tx.send(BackendEvent::Ready);
            let _ = ready_tx.send(BackendEvent::PlaybackQualityChange(
                DEFAULT_QUALITY.to_string(),
            ));
        });

        Self {
            timeline: MediaTimeline::new(media_duration),
            volume: Mutex::new(100),
            state: Mutex::new(BackendState::Unstarted),
            ready,
            started: AtomicBool::new(false),
            tx,
        }
    }

    fn check_ended(&self) {
        if self.timeline.poll_ended() {
            *self.state.lock().unwrap() = BackendState::Ended;
            let _ = self.tx.send(BackendEvent::StateChange(BackendState::Ended));
        }
    }
}

impl PlayerBackend for HostedBackend {
    fn play(&self) {
        if !self.ready.load(Ordering::SeqCst) {
            tracing::debug!("Hosted player not ready, ignoring play");
            return;
        }

        let mut state = self.state.lock().unwrap();
        if *state == BackendState::Playing {
            return;
        }
        if *state == BackendState::Ended {
            self.timeline.seek(0.0);
        }

        if !self.started.swap(true, Ordering::SeqCst) {
            let _ = self
                .tx
                .send(BackendEvent::StateChange(BackendState::Buffering));
        }

        self.timeline.set_playing(true);
        *state = BackendState::Playing;
        let _ = self
            .tx
            .send(BackendEvent::StateChange(BackendState::Playing));
    }

    fn pause(&self) {
        let mut state = self.state.lock().unwrap();
        if *state != BackendState::Playing {
            return;
        }

        self.timeline.set_playing(false);
        *state = BackendState::Paused;
        let _ = self.tx.send(BackendEvent::StateChange(BackendState::Paused));
    }

    fn seek_to(&self, seconds: f64, allow_seek_ahead: bool) {
        tracing::trace!(seconds, allow_seek_ahead, "Hosted seek");
        self.timeline.seek(seconds);
    }

    fn current_time(&self) -> f64 {
        self.check_ended();
        self.timeline.position()
    }

    fn duration(&self) -> f64 {
        // Unknown until the ready handshake completes.
        if self.ready.load(Ordering::SeqCst) {
            self.timeline.duration()
        } else {
            0.0
        }
    }

    fn set_playback_rate(&self, rate: f64) {
        if (rate - self.timeline.rate()).abs() < f64::EPSILON {
            return;
        }
        self.timeline.set_rate(rate);
    }

    fn set_volume(&self, level: u32) {
        *self.volume.lock().unwrap() = level.min(100);
    }

    fn volume(&self) -> f64 {
        f64::from(*self.volume.lock().unwrap())
    }

    fn player_state(&self) -> BackendState {
        self.check_ended();
        *self.state.lock().unwrap()
    }

    fn normalized_time_domain(&self) -> bool {
        true
    }
}
