//! Caption panel synchronization
//!
//! Fetches the caption track (last-request-wins, fixed timeout), resolves
//! the active cue against the clock's normalized queries, and manages the
//! transient auto-show/auto-hide of the panel while captions are toggled
//! off.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};

use crate::events::{EventBus, PlayerEvent};
use crate::model::{CaptionPanelState, CaptionTrack};
use crate::timer::DelayedTask;

const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Idle period after which an auto-shown panel hides again.
const FADE_OUT_TIMEOUT: Duration = Duration::from_millis(1400);

#[derive(Clone)]
pub struct CaptionSync {
    state: Arc<Mutex<CaptionPanelState>>,
    bus: EventBus,
    hide_timer: DelayedTask,
    fetch_token: Arc<AtomicU64>,
    autohide: bool,
}

impl CaptionSync {
    pub fn new(state: Arc<Mutex<CaptionPanelState>>, bus: EventBus, autohide: bool) -> Self {
        Self {
            state,
            bus,
            hide_timer: DelayedTask::new(),
            fetch_token: Arc::new(AtomicU64::new(0)),
            autohide,
        }
    }

    /// Fetch and install the caption track. Any previously issued fetch is
    /// superseded: its response will fail the token comparison and be
    /// dropped. Failure of any kind disables the caption UI; there is no
    /// automatic retry.
    pub async fn fetch(&self, client: reqwest::Client, url: String) {
        let token = self.begin_fetch();
        tracing::debug!(%url, token, "Fetching captions");

        let result = Self::fetch_track(client, &url).await;
        self.apply_fetch(token, result);
    }

    async fn fetch_track(client: reqwest::Client, url: &str) -> Result<CaptionTrack> {
        let request = async {
            let response = client
                .get(url)
                .timeout(FETCH_TIMEOUT)
                .send()
                .await?
                .error_for_status()?;
            let raw = response.text().await?;
            CaptionTrack::parse(&raw)
        };

        tokio::time::timeout(FETCH_TIMEOUT, request)
            .await
            .context("caption fetch timed out")?
    }

    /// Issue a new request token, invalidating all in-flight fetches.
    pub(crate) fn begin_fetch(&self) -> u64 {
        self.fetch_token.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub(crate) fn apply_fetch(&self, token: u64, result: Result<CaptionTrack>) {
        if token != self.fetch_token.load(Ordering::SeqCst) {
            tracing::debug!(token, "Dropping stale caption response");
            return;
        }

        let mut state = self.state.lock().unwrap();
        match result {
            Ok(track) => {
                tracing::info!(cues = track.len(), "Caption track loaded");
                state.track = Some(Arc::new(track));
                state.available = true;
                state.current_index = None;
                state.selected_index = None;
            }
            Err(error) => {
                tracing::warn!(error = %error, "Caption fetch failed, hiding caption UI");
                state.track = None;
                state.available = false;
                state.current_index = None;
                state.selected_index = None;
            }
        }
    }

    /// Resolve the active cue for a normalized query. Edge-triggered: the
    /// panel revision only advances when the resolved index changes, so
    /// per-tick calls with an unchanged index are free.
    pub fn update_play_time(&self, query_ms: u64) {
        let mut state = self.state.lock().unwrap();
        let Some(track) = state.track.clone() else {
            return;
        };

        if let Some(index) = track.search(query_ms) {
            if state.current_index != Some(index) {
                state.current_index = Some(index);
                state.revision = state.revision.wrapping_add(1);
            }
        }
    }

    /// CC toggle. Returns the new hidden flag, or `None` when no track is
    /// loaded (the control is not shown at all then).
    pub fn toggle(&self, current_time: f64) -> Option<bool> {
        let hidden = {
            let mut state = self.state.lock().unwrap();
            if !state.available {
                return None;
            }
            state.hidden = !state.hidden;
            state.shown_transient = false;
            state.hidden
        };

        if hidden {
            self.hide_timer.cancel();
            self.bus.emit(PlayerEvent::HideTranscript { current_time });
        } else {
            self.bus.emit(PlayerEvent::ShowTranscript { current_time });
        }
        Some(hidden)
    }

    /// User activity: while captions are toggled off, surface the panel
    /// transiently and arm (or re-arm) the auto-hide timer.
    pub fn auto_show(&self) {
        {
            let mut state = self.state.lock().unwrap();
            if !state.available || !state.hidden {
                return;
            }
            state.shown_transient = true;
        }

        if self.autohide {
            let state = self.state.clone();
            self.hide_timer.schedule(FADE_OUT_TIMEOUT, move || {
                state.lock().unwrap().shown_transient = false;
            });
        }
    }

    /// Keyboard cue selection, clamped to the track bounds.
    pub fn select(&self, delta: i64) {
        let mut state = self.state.lock().unwrap();
        let Some(track) = state.track.clone() else {
            return;
        };

        let anchor = state
            .selected_index
            .or(state.current_index)
            .unwrap_or(0) as i64;
        let index = (anchor + delta).clamp(0, track.len() as i64 - 1) as usize;
        state.selected_index = Some(index);
    }

    /// Start time of the cue the user selected, if any.
    pub fn selected_start_ms(&self) -> Option<u64> {
        let state = self.state.lock().unwrap();
        let track = state.track.clone()?;
        let index = state.selected_index?;
        track.get(index).map(|entry| entry.start_ms)
    }

    pub fn set_panel_height(&self, height: u16) {
        self.state.lock().unwrap().panel_height = height;
    }

    pub fn panel_visible(&self) -> bool {
        self.state.lock().unwrap().panel_visible()
    }
}

impl super::Pausable for CaptionSync {
    fn on_play(&self) {
        let mut state = self.state.lock().unwrap();
        if state.available {
            state.playing = true;
        }
    }

    fn on_pause(&self) {
        let mut state = self.state.lock().unwrap();
        if state.available {
            state.playing = false;
        }
    }
}
