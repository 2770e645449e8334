//! Aggregate player model and per-frame snapshots

use std::sync::{Arc, Mutex};

use super::captions::CaptionPanelState;
use super::playback::PlaybackState;
use super::slider::SliderState;
use super::types::{Speed, UiState};
use crate::config::PlayerConfig;

/// All mutable player state, each sub-state individually shareable.
///
/// Controllers receive clones of only the arcs they own or observe — the
/// aggregate itself is never threaded through them.
pub struct PlayerModel {
    pub playback: Arc<Mutex<PlaybackState>>,
    pub slider: Arc<Mutex<SliderState>>,
    pub captions: Arc<Mutex<CaptionPanelState>>,
    pub ui: Arc<Mutex<UiState>>,
    pub should_quit: Arc<Mutex<bool>>,
}

impl PlayerModel {
    pub fn new(config: &PlayerConfig) -> Self {
        let speed = Speed::parse(&config.speed).unwrap_or_else(|| {
            tracing::warn!(speed = %config.speed, "Unknown speed in config, falling back to 1.0");
            Speed::X1_00
        });

        let ui = UiState {
            media_title: config.title.clone(),
            volume: config.volume.min(100),
            ..UiState::default()
        };

        Self {
            playback: Arc::new(Mutex::new(PlaybackState::new(
                speed,
                config.start_time,
                config.end_time,
            ))),
            slider: Arc::new(Mutex::new(SliderState::default())),
            captions: Arc::new(Mutex::new(CaptionPanelState::default())),
            ui: Arc::new(Mutex::new(ui)),
            should_quit: Arc::new(Mutex::new(false)),
        }
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            playback: self.playback.lock().unwrap().clone(),
            slider: self.slider.lock().unwrap().clone(),
            captions: self.captions.lock().unwrap().clone(),
            ui: self.ui.lock().unwrap().clone(),
        }
    }

    pub fn should_quit(&self) -> bool {
        *self.should_quit.lock().unwrap()
    }
}

/// Immutable view of the model taken once per rendered frame.
#[derive(Clone)]
pub struct PlayerSnapshot {
    pub playback: PlaybackState,
    pub slider: SliderState,
    pub captions: CaptionPanelState,
    pub ui: UiState,
}
