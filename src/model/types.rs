//! Core type definitions for the player

use crate::resizer::ElementPlacement;

/// Playback rates offered by the speed menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Speed {
    X0_75,
    X1_00,
    X1_25,
    X1_50,
}

impl Speed {
    pub const ALL: [Speed; 4] = [Speed::X0_75, Speed::X1_00, Speed::X1_25, Speed::X1_50];

    pub fn factor(self) -> f64 {
        match self {
            Speed::X0_75 => 0.75,
            Speed::X1_00 => 1.0,
            Speed::X1_25 => 1.25,
            Speed::X1_50 => 1.5,
        }
    }

    /// Canonical label, as carried in analytics events.
    pub fn as_str(self) -> &'static str {
        match self {
            Speed::X0_75 => "0.75",
            Speed::X1_00 => "1.0",
            Speed::X1_25 => "1.25",
            Speed::X1_50 => "1.50",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "0.75" => Some(Speed::X0_75),
            "1.0" | "1" | "1.00" => Some(Speed::X1_00),
            "1.25" => Some(Speed::X1_25),
            "1.5" | "1.50" => Some(Speed::X1_50),
            _ => None,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Speed::X0_75 => Speed::X1_00,
            Speed::X1_00 => Speed::X1_25,
            Speed::X1_25 => Speed::X1_50,
            Speed::X1_50 => Speed::X1_50,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Speed::X0_75 => Speed::X0_75,
            Speed::X1_00 => Speed::X0_75,
            Speed::X1_25 => Speed::X1_00,
            Speed::X1_50 => Speed::X1_25,
        }
    }
}

impl Default for Speed {
    fn default() -> Self {
        Speed::X1_00
    }
}

/// Playback state machine phase, driven by backend state changes and
/// explicit play/pause calls from the UI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PlayerPhase {
    #[default]
    Unstarted,
    Playing,
    Paused,
    Ended,
}

/// Origin of a seek request, carried in the `seek_video` event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeekKind {
    SlideSeek,
    CaptionSeek,
}

impl SeekKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SeekKind::SlideSeek => "onSlideSeek",
            SeekKind::CaptionSeek => "onCaptionSeek",
        }
    }
}

/// UI state for the player chrome
#[derive(Clone)]
pub struct UiState {
    pub media_title: String,
    pub fullscreen: bool,
    /// Placement of the video surface inside its container, recomputed by
    /// the resizer on resize/fullscreen changes.
    pub video_area: Option<ElementPlacement>,
    pub volume: u32,
    pub quality: Option<String>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            media_title: "Untitled media".to_string(),
            fullscreen: false,
            video_area: None,
            volume: 100,
            quality: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_labels_round_trip() {
        for speed in Speed::ALL {
            assert_eq!(Speed::parse(speed.as_str()), Some(speed));
        }
    }

    #[test]
    fn speed_menu_clamps_at_both_ends() {
        assert_eq!(Speed::X1_50.next(), Speed::X1_50);
        assert_eq!(Speed::X0_75.prev(), Speed::X0_75);
        assert_eq!(Speed::X1_00.next(), Speed::X1_25);
    }
}
