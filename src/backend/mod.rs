//! Playback backend adapters
//!
//! A uniform play/pause/seek/rate/volume contract over the two backend
//! variants, organized into submodules:
//!
//! - `timeline`: shared wall-clock media timeline
//! - `hosted`: hosted streaming variant (normalized 1.0x time domain)
//! - `native`: native media element variant (speed-scaled time domain)
//!
//! The variants disagree on their time domain; `normalized_time_domain`
//! is fixed per variant so upstream conversion stays deterministic.

#[cfg(test)]
pub(crate) mod fake;
mod hosted;
mod native;
mod timeline;

pub use hosted::HostedBackend;
pub use native::NativeBackend;

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::{BackendKind, PlayerConfig};

/// Raw state reported by a backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendState {
    Unstarted,
    Playing,
    Paused,
    Ended,
    Buffering,
}

/// Lifecycle events emitted by a backend.
#[derive(Clone, Debug, PartialEq)]
pub enum BackendEvent {
    Ready,
    StateChange(BackendState),
    PlaybackQualityChange(String),
}

pub type BackendEventSender = mpsc::UnboundedSender<BackendEvent>;
pub type BackendEventReceiver = mpsc::UnboundedReceiver<BackendEvent>;

/// Uniform command surface over a wrapped player backend. No method blocks
/// the calling task; side effects are confined to the wrapped backend.
pub trait PlayerBackend: Send + Sync {
    fn play(&self);
    fn pause(&self);
    /// Seek in the backend's own time domain. `allow_seek_ahead` mirrors
    /// hosted players that may refuse to jump past the buffered range.
    fn seek_to(&self, seconds: f64, allow_seek_ahead: bool);
    fn current_time(&self) -> f64;
    /// 0.0 while the duration is still unknown; callers fall back to a
    /// secondary duration source.
    fn duration(&self) -> f64;
    fn set_playback_rate(&self, rate: f64);
    fn set_volume(&self, level: u32);
    fn volume(&self) -> f64;
    fn player_state(&self) -> BackendState;
    /// Whether reported/accepted times are already in the normalized
    /// (1.0x, caption-authored) domain.
    fn normalized_time_domain(&self) -> bool;
}

/// Media length backends simulate when the config carries no duration.
const FALLBACK_MEDIA_DURATION: f64 = 300.0;

/// Construct the configured backend variant plus its event stream.
pub fn create(config: &PlayerConfig) -> (Arc<dyn PlayerBackend>, BackendEventReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    let media_duration = config.duration.unwrap_or(FALLBACK_MEDIA_DURATION);

    let backend: Arc<dyn PlayerBackend> = match config.backend {
        BackendKind::Hosted => Arc::new(HostedBackend::new(media_duration, tx)),
        BackendKind::Native => Arc::new(NativeBackend::new(media_duration, tx)),
    };

    (backend, rx)
}
