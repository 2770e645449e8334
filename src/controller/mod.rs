//! Controller module - Playback orchestration and event handling
//!
//! This module keeps the backend, the seek slider and the caption track
//! mutually consistent. It is organized into submodules by responsibility:
//!
//! - `clock`: canonical playback state and time-domain conversion
//! - `slider`: frozen-drag seek slider protocol
//! - `captions`: caption fetch and active-cue synchronization
//! - `backend_events`: backend lifecycle event listener
//! - `input`: key event handling

mod backend_events;
mod captions;
mod clock;
mod input;
mod slider;

pub use captions::CaptionSync;
pub use clock::{convert, PlaybackClock};
pub use slider::{time_description, ProgressSlider};

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::backend::PlayerBackend;
use crate::config::PlayerConfig;
use crate::events::{EventBus, PlayerEvent};
use crate::model::{PlayerModel, SeekKind, UiState};
use crate::resizer::{AlignMode, ResizeConfig, Resizer, Size};
use crate::view::layout::video_container;

/// Polling period for backend time reports while playing.
const UPDATE_INTERVAL: Duration = Duration::from_millis(200);

/// Terminal cells are roughly twice as tall as they are wide; the
/// configured video ratio is widened accordingly before fitting in cell
/// units.
const CELL_ASPECT: f64 = 2.0;

const SEEK_STEP_SECONDS: f64 = 5.0;
const VOLUME_STEP: i32 = 5;

/// Narrow capability surface for components that follow play/pause
/// transitions; the clock fans state changes out through it.
pub(crate) trait Pausable {
    fn on_play(&self);
    fn on_pause(&self);
}

#[derive(Clone)]
pub struct PlayerController {
    pub(crate) clock: PlaybackClock,
    pub(crate) slider: ProgressSlider,
    pub(crate) captions: CaptionSync,
    ui: Arc<Mutex<UiState>>,
    should_quit: Arc<Mutex<bool>>,
    backend: Arc<dyn PlayerBackend>,
    bus: EventBus,
    resizer: Arc<Mutex<Resizer>>,
    ticker: Arc<Mutex<Option<JoinHandle<()>>>>,
    terminal_size: Arc<Mutex<(u16, u16)>>,
}

impl PlayerController {
    pub fn new(
        model: &PlayerModel,
        backend: Arc<dyn PlayerBackend>,
        bus: EventBus,
        config: &PlayerConfig,
    ) -> Self {
        let clock = PlaybackClock::new(
            model.playback.clone(),
            backend.clone(),
            bus.clone(),
            config.duration,
        );
        let slider = ProgressSlider::new(model.slider.clone());
        let captions = CaptionSync::new(
            model.captions.clone(),
            bus.clone(),
            config.autohide_captions,
        );
        if config.hide_captions {
            model.captions.lock().unwrap().hidden = true;
        }

        let mut resizer = Resizer::new(
            Size::new(80.0, 24.0),
            Size::new(16.0, 9.0),
            ResizeConfig {
                container_ratio: None,
                element_ratio: Some(config.element_ratio * CELL_ASPECT),
            },
        );

        // Persistent alignment subscribers: the stored surface placement,
        // and the caption panel height that depends on it.
        let ui_for_align = model.ui.clone();
        resizer.callbacks().add(move |placement| {
            ui_for_align.lock().unwrap().video_area = Some(placement);
        });
        let captions_for_align = model.captions.clone();
        resizer.callbacks().add(move |placement| {
            captions_for_align.lock().unwrap().panel_height = placement.height.max(0.0) as u16;
        });
        resizer.callbacks().once(|placement| {
            tracing::debug!(
                width = placement.width,
                height = placement.height,
                "Initial surface alignment"
            );
        });

        Self {
            clock,
            slider,
            captions,
            ui: model.ui.clone(),
            should_quit: model.should_quit.clone(),
            backend,
            bus,
            resizer: Arc::new(Mutex::new(resizer)),
            ticker: Arc::new(Mutex::new(None)),
            terminal_size: Arc::new(Mutex::new((80, 24))),
        }
    }

    pub fn should_quit(&self) -> bool {
        *self.should_quit.lock().unwrap()
    }

    pub fn quit(&self) {
        *self.should_quit.lock().unwrap() = true;
    }

    // ========================================================================
    // Playback
    // ========================================================================

    pub fn play(&self) {
        self.backend.play();
    }

    pub fn pause(&self) {
        self.backend.pause();
    }

    pub fn toggle_playback(&self) {
        let is_playing = self.clock.is_playing();
        tracing::debug!(is_playing, "Toggling playback");
        if is_playing {
            self.pause();
        } else {
            self.play();
        }
    }

    pub fn speed_up(&self) {
        self.clock.on_speed_change(self.clock.speed().next(), false);
    }

    pub fn speed_down(&self) {
        self.clock.on_speed_change(self.clock.speed().prev(), false);
    }

    pub fn volume_up(&self) {
        self.change_volume(VOLUME_STEP);
    }

    pub fn volume_down(&self) {
        self.change_volume(-VOLUME_STEP);
    }

    fn change_volume(&self, delta: i32) {
        let volume = {
            let mut ui = self.ui.lock().unwrap();
            ui.volume = (ui.volume as i32 + delta).clamp(0, 100) as u32;
            ui.volume
        };
        self.backend.set_volume(volume);
    }

    // ========================================================================
    // Polling and fan-out
    // ========================================================================

    /// Arm the polling ticker. Any previous ticker is aborted first so two
    /// tick loops can never overlap.
    pub(crate) fn start_ticker(&self) {
        let controller = self.clone();
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(UPDATE_INTERVAL);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                controller.update();
            }
        });

        if let Some(previous) = self.ticker.lock().unwrap().replace(task) {
            previous.abort();
        }
    }

    pub(crate) fn stop_ticker(&self) {
        if let Some(task) = self.ticker.lock().unwrap().take() {
            task.abort();
        }
    }

    /// One polling tick: read the backend time and fan it out. A
    /// non-finite report means the backend is not ready; the tick is
    /// skipped entirely.
    pub(crate) fn update(&self) {
        let time = self.backend.current_time();
        if !time.is_finite() {
            tracing::debug!("Backend time not available, skipping tick");
            return;
        }
        self.update_play_time(time);
    }

    /// Fan a time report out to the trim check, the caption sync and the
    /// slider — in that order.
    pub(crate) fn update_play_time(&self, time: f64) {
        let duration = self.clock.refresh_duration();

        let mut time = time;
        if let Some(duration) = duration {
            if let Some(target) = self.clock.validate_trim(duration) {
                tracing::debug!(seek_to = target, "Initial seek to trim start");
                self.backend.seek_to(target, true);
                time = target;
            }
        }

        self.clock.set_current_time(time);

        if self.clock.trim_end_reached(time) {
            tracing::info!(time, "Trim end reached, pausing");
            self.backend.pause();
            self.clock.clear_trim();
            self.slider.notify_end(true);
            self.bus.emit(PlayerEvent::EndedByTrim { current_time: time });
        }

        self.captions
            .update_play_time(self.clock.caption_query_ms(time));

        let duration = duration.unwrap_or(0.0);
        self.slider.update_play_time(time, duration);

        let (start, end) = self.clock.trim_bounds();
        let scale = if self.backend.normalized_time_domain() {
            1.0
        } else {
            1.0 / self.clock.speed().factor()
        };
        self.slider.update_trim_region(start, end, duration, scale);
    }

    // ========================================================================
    // Seeking
    // ========================================================================

    /// Definitive seek: report it, command the backend, and update the
    /// dependents immediately rather than waiting for the next tick.
    pub fn seek(&self, kind: SeekKind, new_time: f64) {
        let old_time = self.clock.current_time();
        tracing::debug!(old_time, new_time, kind = kind.as_str(), "Seeking");
        self.bus.emit(PlayerEvent::SeekVideo {
            old_time,
            new_time,
            kind,
        });
        self.backend.seek_to(new_time, true);
        self.clock.set_current_time(new_time);
        self.update_play_time(new_time);
    }

    /// A keyboard nudge of the slider: one drag move plus its release.
    pub fn slide_by(&self, delta_seconds: f64) {
        let Some(duration) = self.clock.refresh_duration() else {
            return;
        };

        let current = self.slider.value_ms() as f64 / 1000.0;
        let target = (current + delta_seconds).clamp(0.0, duration.floor());
        let target_ms = (target.floor() as u64) * 1000;

        self.slider.on_slide(target_ms);
        self.seek(SeekKind::SlideSeek, target);
        self.slider.on_stop(target_ms);
    }

    // ========================================================================
    // Captions
    // ========================================================================

    pub fn start_caption_fetch(&self, url: String) {
        let captions = self.captions.clone();
        tokio::spawn(async move {
            captions.fetch(reqwest::Client::new(), url).await;
        });
    }

    pub fn toggle_captions(&self) {
        if self.captions.toggle(self.clock.current_time()).is_none() {
            return;
        }

        // The panel opening or closing changes the container width; refit
        // by width only, as long as fullscreen isn't pinning the layout.
        if !self.ui.lock().unwrap().fullscreen {
            let container = self.current_container();
            let placement = {
                let mut resizer = self.resizer.lock().unwrap();
                resizer.set_container(container);
                resizer.align_by_width_only()
            };
            self.ui.lock().unwrap().video_area = Some(placement);
            self.captions
                .set_panel_height(placement.height.max(0.0) as u16);
        }
    }

    pub fn caption_select(&self, delta: i64) {
        self.captions.select(delta);
    }

    pub fn caption_seek_selected(&self) {
        if let Some(start_ms) = self.captions.selected_start_ms() {
            let target = self.clock.caption_seek_seconds(start_ms);
            self.seek(SeekKind::CaptionSeek, target);
        }
    }

    // ========================================================================
    // Layout
    // ========================================================================

    pub fn handle_resize(&self, width: u16, height: u16) {
        *self.terminal_size.lock().unwrap() = (width, height);
        self.realign();
    }

    pub fn toggle_fullscreen(&self) {
        let fullscreen = {
            let mut ui = self.ui.lock().unwrap();
            ui.fullscreen = !ui.fullscreen;
            ui.fullscreen
        };
        tracing::debug!(fullscreen, "Fullscreen toggled");

        {
            let mut resizer = self.resizer.lock().unwrap();
            if fullscreen {
                resizer.set_mode(AlignMode::Auto);
            } else {
                resizer.set_mode(AlignMode::Width);
            }
        }
        self.realign();
    }

    fn current_container(&self) -> Size {
        let (width, height) = *self.terminal_size.lock().unwrap();
        let fullscreen = self.ui.lock().unwrap().fullscreen;
        video_container(width, height, self.captions.panel_visible(), fullscreen)
    }

    fn realign(&self) {
        let container = self.current_container();
        let mut resizer = self.resizer.lock().unwrap();
        resizer.set_container(container);
        resizer.align();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::fake::FakeBackend;
    use crate::events::EmittedEvent;
    use crate::model::{PlayerModel, PlayerPhase};

    struct Harness {
        controller: PlayerController,
        model: PlayerModel,
        backend: Arc<FakeBackend>,
        events: Arc<Mutex<Vec<PlayerEvent>>>,
    }

    fn harness(configure: impl FnOnce(&mut PlayerConfig)) -> Harness {
        let mut config = PlayerConfig::default();
        configure(&mut config);

        let backend = Arc::new(FakeBackend::new(true));
        let bus = EventBus::new();
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        bus.subscribe(move |e: &EmittedEvent| sink.lock().unwrap().push(e.event.clone()));

        let model = PlayerModel::new(&config);
        let controller = PlayerController::new(&model, backend.clone(), bus, &config);
        Harness {
            controller,
            model,
            backend,
            events,
        }
    }

    #[test]
    fn out_of_range_trim_is_corrected_on_the_first_tick() {
        let h = harness(|c| c.end_time = Some(100_000.0));
        h.backend.set_media_duration(125.0);
        h.backend.set_time(3.0);

        h.controller.update();

        let playback = h.model.playback.lock().unwrap();
        assert_eq!(playback.end_time, None);
        assert_eq!(playback.duration, Some(125.0));
        assert_eq!(*h.backend.pause_calls.lock().unwrap(), 0);
    }

    #[test]
    fn reaching_the_trim_end_pauses_once_and_clears_the_region() {
        let h = harness(|c| c.end_time = Some(2.0));
        h.backend.set_media_duration(125.0);
        h.backend.set_time(2.05);

        h.controller.update();

        assert_eq!(*h.backend.pause_calls.lock().unwrap(), 1);
        assert_eq!(h.model.playback.lock().unwrap().end_time, None);
        assert!(h.model.slider.lock().unwrap().ended);
        assert!(h
            .events
            .lock()
            .unwrap()
            .contains(&PlayerEvent::EndedByTrim { current_time: 2.05 }));

        // One-shot: the region is gone, later ticks play on normally.
        h.backend.set_time(2.6);
        h.controller.update();
        assert_eq!(*h.backend.pause_calls.lock().unwrap(), 1);
    }

    #[test]
    fn a_valid_start_time_triggers_exactly_one_initial_seek() {
        let h = harness(|c| {
            c.start_time = Some(10.0);
            c.end_time = Some(50.0);
        });
        h.backend.set_media_duration(125.0);

        h.controller.update();
        assert_eq!(*h.backend.seek_calls.lock().unwrap(), vec![10.0]);

        h.controller.update();
        assert_eq!(h.backend.seek_calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn non_finite_backend_time_skips_the_whole_tick() {
        let h = harness(|_| {});
        h.backend.set_media_duration(125.0);
        h.backend.set_time(f64::NAN);

        h.controller.update();

        assert_eq!(h.model.slider.lock().unwrap().value_ms, 0);
        assert_eq!(h.model.playback.lock().unwrap().current_time, 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn a_drag_survives_the_stale_tick_that_follows_it() {
        let h = harness(|_| {});
        h.backend.set_media_duration(125.0);
        h.backend.set_time(58.0);

        // Drag to 60 and release; the seek lands on the backend.
        h.controller.slide_by(60.0);
        assert_eq!(*h.backend.seek_calls.lock().unwrap(), vec![60.0]);
        assert_eq!(h.model.slider.lock().unwrap().value_ms, 60_000);

        // A stale report from before the seek arrives within the settle
        // window and must not win.
        h.backend.set_time(58.0);
        h.controller.update();
        assert_eq!(h.model.slider.lock().unwrap().value_ms, 60_000);

        // After the settle window, reports flow again.
        tokio::time::sleep(Duration::from_millis(250)).await;
        h.backend.set_time(61.0);
        h.controller.update();
        assert_eq!(h.model.slider.lock().unwrap().value_ms, 61_000);
    }

    #[tokio::test(start_paused = true)]
    async fn slide_emits_the_seek_event_with_both_times() {
        let h = harness(|_| {});
        h.backend.set_media_duration(125.0);
        h.backend.set_time(30.0);
        h.controller.update();

        h.controller.slide_by(5.0);

        let events = h.events.lock().unwrap();
        assert!(events.contains(&PlayerEvent::SeekVideo {
            old_time: 30.0,
            new_time: 35.0,
            kind: SeekKind::SlideSeek,
        }));
    }

    #[tokio::test(start_paused = true)]
    async fn backend_state_changes_drive_the_phase_machine() {
        let h = harness(|_| {});
        h.backend.set_media_duration(125.0);

        h.controller.handle_backend_event(crate::backend::BackendEvent::Ready);
        assert!(h.events.lock().unwrap().contains(&PlayerEvent::LoadVideo));

        h.controller
            .handle_backend_event(crate::backend::BackendEvent::StateChange(
                crate::backend::BackendState::Playing,
            ));
        assert_eq!(h.model.playback.lock().unwrap().phase, PlayerPhase::Playing);
        h.controller.stop_ticker();

        h.controller
            .handle_backend_event(crate::backend::BackendEvent::StateChange(
                crate::backend::BackendState::Paused,
            ));
        assert_eq!(h.model.playback.lock().unwrap().phase, PlayerPhase::Paused);

        let events = h.events.lock().unwrap();
        assert!(events
            .iter()
            .any(|e| matches!(e, PlayerEvent::PlayVideo { .. })));
        assert!(events
            .iter()
            .any(|e| matches!(e, PlayerEvent::PauseVideo { .. })));
    }

    #[test]
    fn quality_changes_land_in_the_ui_state() {
        let h = harness(|_| {});
        h.controller
            .handle_backend_event(crate::backend::BackendEvent::PlaybackQualityChange(
                "hd720".to_string(),
            ));
        assert_eq!(
            h.model.ui.lock().unwrap().quality.as_deref(),
            Some("hd720")
        );
    }
}
