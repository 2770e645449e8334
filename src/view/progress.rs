//! Seek slider and status line rendering

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::model::{PlayerPhase, PlayerSnapshot};

use super::utils::format_duration;

pub fn render_progress_bar(frame: &mut Frame, area: Rect, snapshot: &PlayerSnapshot) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(2)])
        .split(area);

    let slider = &snapshot.slider;

    let phase_text = match snapshot.playback.phase {
        PlayerPhase::Playing => "▶ playing",
        PlayerPhase::Paused => "⏸ paused",
        PlayerPhase::Ended => "■ ended",
        PlayerPhase::Unstarted => "… loading",
    };

    let time_str = format!(
        "{} / {}",
        format_duration(slider.value_ms),
        format_duration(slider.max_ms)
    );

    let mut footer = format!(
        " speed {}x | vol {}% ",
        snapshot.playback.speed.as_str(),
        snapshot.ui.volume
    );
    if let Some(range) = slider.range {
        footer.push_str(&format!(
            "| clip {:.0}%–{:.0}% ",
            range.left_pct,
            range.left_pct + range.width_pct
        ));
    }

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", phase_text))
                .title_bottom(Line::from(footer).right_aligned()),
        )
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(slider.ratio())
        .label(time_str);
    frame.render_widget(gauge, chunks[0]);

    // The slider's spoken position (or its "video ended" notification).
    let description_style = if slider.ended {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let description = Paragraph::new(format!(" {}", slider.time_description))
        .style(description_style);
    frame.render_widget(description, chunks[1]);
}
