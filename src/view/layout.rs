//! Frame layout and the fitted video surface

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Padding, Paragraph},
    Frame,
};

use crate::model::{PlayerPhase, PlayerSnapshot};
use crate::resizer::Size;

/// Rows reserved at the bottom for the slider and the status line.
pub const PROGRESS_ROWS: u16 = 5;

/// Caption panel share of the frame width while visible.
pub const CAPTION_PANEL_PERCENT: u16 = 30;

/// The container the resizer fits the video surface into, given the
/// current terminal size and chrome.
pub fn video_container(
    width: u16,
    height: u16,
    captions_visible: bool,
    fullscreen: bool,
) -> Size {
    let height = f64::from(height.saturating_sub(PROGRESS_ROWS));
    let width = f64::from(width);

    if fullscreen || !captions_visible {
        Size::new(width, height)
    } else {
        Size::new(
            width * f64::from(100 - CAPTION_PANEL_PERCENT) / 100.0,
            height,
        )
    }
}

pub fn render_video_surface(frame: &mut Frame, area: Rect, snapshot: &PlayerSnapshot) {
    let surface = snapshot
        .ui
        .video_area
        .map(|placement| placement_rect(placement, area))
        .unwrap_or(area);

    let phase_symbol = match snapshot.playback.phase {
        PlayerPhase::Playing => "▶",
        PlayerPhase::Paused => "⏸",
        PlayerPhase::Ended => "■",
        PlayerPhase::Unstarted => "…",
    };

    let mut status = format!("{} {}", phase_symbol, snapshot.ui.media_title);
    if let Some(quality) = &snapshot.ui.quality {
        status.push_str(&format!(" [{}]", quality));
    }

    let surface_block = Paragraph::new(Line::from(status).centered())
        .style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", snapshot.ui.media_title))
                .padding(Padding::vertical(surface.height.saturating_sub(3) / 2)),
        );
    frame.render_widget(surface_block, surface);
}

/// Clamp a fractional placement into the chunk the layout allocated. The
/// width-only fit can overflow vertically; the overflow is cropped evenly.
fn placement_rect(placement: crate::resizer::ElementPlacement, area: Rect) -> Rect {
    let left = placement.left.max(0.0) as u16;
    let top = placement.top.max(0.0) as u16;
    let width = placement.width.min(f64::from(area.width)) as u16;
    let height = placement.height.min(f64::from(area.height)) as u16;

    Rect {
        x: area.x.saturating_add(left).min(area.right()),
        y: area.y.saturating_add(top).min(area.bottom()),
        width,
        height,
    }
    .intersection(area)
}
