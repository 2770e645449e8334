//! View module - UI rendering
//!
//! This module handles all UI rendering for the player using ratatui.
//! It is organized into submodules by component type:
//!
//! - `utils`: Shared utility functions (time formatting)
//! - `layout`: Frame layout and the video surface
//! - `captions`: Caption panel rendering
//! - `progress`: Seek slider and status line rendering

pub mod captions;
pub mod layout;
pub mod progress;
pub mod utils;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::model::PlayerSnapshot;

pub struct PlayerView;

impl PlayerView {
    pub fn render(frame: &mut Frame, snapshot: &PlayerSnapshot) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),                            // Video + captions
                Constraint::Length(layout::PROGRESS_ROWS),     // Slider + status
            ])
            .split(frame.area());

        let captions_visible = snapshot.captions.panel_visible() && !snapshot.ui.fullscreen;

        if captions_visible {
            let main_chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([
                    Constraint::Percentage(100 - layout::CAPTION_PANEL_PERCENT),
                    Constraint::Percentage(layout::CAPTION_PANEL_PERCENT),
                ])
                .split(chunks[0]);

            layout::render_video_surface(frame, main_chunks[0], snapshot);
            captions::render_caption_panel(frame, main_chunks[1], &snapshot.captions);
        } else {
            layout::render_video_surface(frame, chunks[0], snapshot);
        }

        progress::render_progress_bar(frame, chunks[1], snapshot);
    }
}
