//! Key event handling

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::{PlayerController, SEEK_STEP_SECONDS};

impl PlayerController {
    pub fn handle_key_event(&self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        // Any interaction counts as activity for the transient caption
        // panel.
        self.captions.auto_show();

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => self.quit(),
            KeyCode::Char('c') | KeyCode::Char('C')
                if key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                self.quit()
            }
            KeyCode::Char(' ') | KeyCode::Char('k') => self.toggle_playback(),
            KeyCode::Left => self.slide_by(-SEEK_STEP_SECONDS),
            KeyCode::Right => self.slide_by(SEEK_STEP_SECONDS),
            KeyCode::Up => self.volume_up(),
            KeyCode::Down => self.volume_down(),
            KeyCode::Char('>') | KeyCode::Char(']') => self.speed_up(),
            KeyCode::Char('<') | KeyCode::Char('[') => self.speed_down(),
            KeyCode::Char('c') | KeyCode::Char('C') => self.toggle_captions(),
            KeyCode::Char('f') | KeyCode::Char('F') => self.toggle_fullscreen(),
            KeyCode::PageUp => self.caption_select(-1),
            KeyCode::PageDown => self.caption_select(1),
            KeyCode::Enter => self.caption_seek_selected(),
            _ => {}
        }
    }
}
