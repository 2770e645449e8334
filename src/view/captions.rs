//! Caption panel rendering

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState, Padding},
    Frame,
};

use crate::model::CaptionPanelState;

pub fn render_caption_panel(frame: &mut Frame, area: Rect, captions: &CaptionPanelState) {
    let Some(track) = &captions.track else {
        return;
    };

    let items: Vec<ListItem> = track
        .entries()
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let style = if captions.current_index == Some(i) {
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD)
            } else if captions.selected_index == Some(i) {
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            ListItem::new(entry.text.clone()).style(style)
        })
        .collect();

    let area = clamp_height(area, captions.panel_height);

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Transcript ")
            .padding(Padding::horizontal(1)),
    );

    // While playing, the list follows the active cue; when paused, a
    // keyboard selection takes precedence over it.
    let follow = if captions.playing {
        captions.current_index.or(captions.selected_index)
    } else {
        captions.selected_index.or(captions.current_index)
    };
    let mut list_state = ListState::default();
    list_state.select(follow);

    frame.render_stateful_widget(list, area, &mut list_state);
}

/// Keep the panel no taller than the height the resizer computed for it.
fn clamp_height(area: Rect, panel_height: u16) -> Rect {
    if panel_height == 0 || panel_height >= area.height {
        area
    } else {
        Rect {
            height: panel_height,
            ..area
        }
    }
}
