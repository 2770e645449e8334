//! Model module - Player state and data types
//!
//! This module contains the data structures and state for the player.
//! It is organized into submodules by responsibility:
//!
//! - `types`: Core type definitions (speeds, phases, UI state)
//! - `playback`: Canonical playback state owned by the clock
//! - `captions`: Caption track parsing and timeline lookup
//! - `slider`: Seek slider state and the frozen invariant
//! - `app_model`: Aggregate model and per-frame snapshots

mod app_model;
mod captions;
mod playback;
mod slider;
mod types;

// Re-export all public types for convenient access
pub use types::{PlayerPhase, SeekKind, Speed, UiState};

pub use captions::{CaptionDocument, CaptionEntry, CaptionPanelState, CaptionTrack};

pub use playback::PlaybackState;

pub use slider::{SliderRange, SliderState};

pub use app_model::{PlayerModel, PlayerSnapshot};
