//! Native media element backend
//!
//! Models a native media element whose timeline is re-expressed by the
//! playback rate: at rate `r` the element reports position and duration
//! divided by `r` (total play time changes with speed), so reported values
//! need conversion before they can be compared to caption timestamps.

use std::sync::Mutex;

use super::timeline::MediaTimeline;
use super::{BackendEvent, BackendEventSender, BackendState, PlayerBackend};

pub struct NativeBackend {
    timeline: MediaTimeline,
    volume: Mutex<u32>,
    state: Mutex<BackendState>,
    tx: BackendEventSender,
}

impl NativeBackend {
    pub fn new(media_duration: f64, tx: BackendEventSender) -> Self {
        // Metadata is available as soon as the element is attached.
        let _ = tx.send(BackendEvent::Ready);

        Self {
            timeline: MediaTimeline::new(media_duration),
            volume: Mutex::new(100),
            state: Mutex::new(BackendState::Unstarted),
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

impl PlayerBackend for NativeBackend {
    fn play(&self) {
        let mut state = self.state.lock().unwrap();
        if *state == BackendState::Playing {
            return;
        }
        if *state == BackendState::Ended {
            self.timeline.seek(0.0);
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
        tracing::trace!(seconds, allow_seek_ahead, "Native seek");
        self.timeline.seek(seconds * self.timeline.rate());
    }

    fn current_time(&self) -> f64 {
        self.check_ended();
        self.timeline.position() / self.timeline.rate()
    }

    fn duration(&self) -> f64 {
        self.timeline.duration() / self.timeline.rate()
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
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn backend(duration: f64) -> (NativeBackend, mpsc::UnboundedReceiver<BackendEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (NativeBackend::new(duration, tx), rx)
    }

    #[tokio::test(start_paused = true)]
    async fn is_ready_immediately() {
        let (_backend, mut rx) = backend(100.0);
        assert_eq!(rx.recv().await, Some(BackendEvent::Ready));
    }

    #[tokio::test(start_paused = true)]
    async fn reports_time_and_duration_scaled_by_rate() {
        let (backend, _rx) = backend(100.0);
        backend.set_playback_rate(0.75);
        backend.play();

        // The scaled timeline advances at wall-clock speed: 6 wall seconds
        // at 0.75x cover 4.5 normalized seconds, reported as 6.0.
        tokio::time::advance(Duration::from_secs(6)).await;
        assert!((backend.current_time() - 6.0).abs() < 1e-6);
        assert!((backend.duration() - 100.0 / 0.75).abs() < 1e-6);
    }

    #[tokio::test(start_paused = true)]
    async fn seeks_in_its_own_scaled_domain() {
        let (backend, _rx) = backend(100.0);
        backend.set_playback_rate(0.75);
        backend.seek_to(60.0, true);
        assert!((backend.current_time() - 60.0).abs() < 1e-6);
    }

    #[tokio::test(start_paused = true)]
    async fn rate_change_rescales_the_reported_position() {
        let (backend, _rx) = backend(100.0);
        backend.set_playback_rate(0.75);
        backend.seek_to(60.0, true);

        backend.set_playback_rate(1.5);
        // Normalized position is preserved, so the report shrinks by
        // old/new: 60 * 0.75 / 1.5.
        assert!((backend.current_time() - 30.0).abs() < 1e-6);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_freezes_the_report() {
        let (backend, _rx) = backend(100.0);
        backend.play();
        tokio::time::advance(Duration::from_secs(4)).await;
        backend.pause();
        tokio::time::advance(Duration::from_secs(60)).await;
        assert!((backend.current_time() - 4.0).abs() < 1e-6);
        assert_eq!(backend.player_state(), BackendState::Paused);
    }
}
