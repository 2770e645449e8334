//! Backend lifecycle event listener

use crate::backend::{BackendEvent, BackendEventReceiver, BackendState};
use crate::events::PlayerEvent;
use crate::model::PlayerPhase;

use super::{Pausable, PlayerController};

impl PlayerController {
    /// Consume the backend's event stream for the lifetime of the player.
    pub fn start_backend_listener(&self, mut events: BackendEventReceiver) {
        let controller = self.clone();
        tracing::info!("Starting backend event listener");

        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                if controller.should_quit() {
                    tracing::debug!("Backend event listener shutting down");
                    break;
                }
                controller.handle_backend_event(event);
            }
        });
    }

    pub(crate) fn handle_backend_event(&self, event: BackendEvent) {
        match event {
            BackendEvent::Ready => self.on_ready(),
            BackendEvent::StateChange(state) => self.on_state_change(state),
            BackendEvent::PlaybackQualityChange(quality) => {
                tracing::debug!(%quality, "Playback quality changed");
                self.ui.lock().unwrap().quality = Some(quality);
            }
        }
    }

    fn on_ready(&self) {
        tracing::info!("Backend ready");
        self.bus.emit(PlayerEvent::LoadVideo);

        // Push the configured volume and rate down to the backend; no
        // autoplay.
        let volume = self.ui.lock().unwrap().volume;
        self.backend.set_volume(volume);
        self.backend.set_playback_rate(self.clock.speed().factor());

        // Prime duration-dependent state (trim validation, slider max).
        self.update();
    }

    fn on_state_change(&self, state: BackendState) {
        tracing::debug!(?state, "Backend state change");
        match state {
            BackendState::Playing => self.on_play(),
            BackendState::Paused => self.on_pause(),
            BackendState::Ended => self.on_ended(),
            BackendState::Buffering | BackendState::Unstarted => {}
        }
    }

    fn pausables(&self) -> [&dyn Pausable; 2] {
        [&self.captions, &self.slider]
    }

    fn on_play(&self) {
        self.clock.set_phase(PlayerPhase::Playing);
        for component in self.pausables() {
            component.on_play();
        }
        self.bus.emit(PlayerEvent::PlayVideo {
            current_time: self.clock.current_time(),
        });
        self.start_ticker();
    }

    fn on_pause(&self) {
        self.stop_ticker();
        self.clock.set_phase(PlayerPhase::Paused);
        for component in self.pausables() {
            component.on_pause();
        }
        self.bus.emit(PlayerEvent::PauseVideo {
            current_time: self.clock.current_time(),
        });
    }

    fn on_ended(&self) {
        self.stop_ticker();
        self.clock.set_phase(PlayerPhase::Ended);
        for component in self.pausables() {
            component.on_pause();
        }
        self.slider.notify_end(true);
    }
}
