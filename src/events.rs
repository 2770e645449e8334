//! Upward analytics events
//!
//! The sync core reports what happened (loads, play/pause, seeks, speed
//! changes, transcript toggles) to external collaborators through a typed
//! observer bus. Subscriptions are persistent or one-shot and explicitly
//! removable; the default sink logs events through `tracing`.

use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};

use crate::model::{SeekKind, Speed};

#[derive(Clone, Debug, PartialEq)]
pub enum PlayerEvent {
    LoadVideo,
    PlayVideo { current_time: f64 },
    PauseVideo { current_time: f64 },
    SeekVideo { old_time: f64, new_time: f64, kind: SeekKind },
    SpeedChange { current_time: f64, old_speed: Speed, new_speed: Speed },
    ShowTranscript { current_time: f64 },
    HideTranscript { current_time: f64 },
    /// Playback stopped because the trim-out point was reached; distinct
    /// from natural end of media.
    EndedByTrim { current_time: f64 },
}

#[derive(Clone, Debug)]
pub struct EmittedEvent {
    pub at: DateTime<Utc>,
    pub event: PlayerEvent,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubscriptionId(u64);

struct Subscriber {
    id: SubscriptionId,
    once: bool,
    callback: Box<dyn Fn(&EmittedEvent) + Send>,
}

#[derive(Clone, Default)]
pub struct EventBus {
    inner: Arc<Mutex<BusInner>>,
}

#[derive(Default)]
struct BusInner {
    subscribers: Vec<Subscriber>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&EmittedEvent) + Send + 'static,
    {
        self.push(false, Box::new(callback))
    }

    /// Subscribe for a single event; the subscription removes itself after
    /// the first delivery.
    pub fn subscribe_once<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&EmittedEvent) + Send + 'static,
    {
        self.push(true, Box::new(callback))
    }

    fn push(&self, once: bool, callback: Box<dyn Fn(&EmittedEvent) + Send>) -> SubscriptionId {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let id = SubscriptionId(inner.next_id);
        inner.subscribers.push(Subscriber { id, once, callback });
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        let mut inner = self.inner.lock().unwrap();
        inner.subscribers.retain(|s| s.id != id);
    }

    /// Deliver `event` to all subscribers in subscription order.
    /// Callbacks must not subscribe or emit from within delivery.
    pub fn emit(&self, event: PlayerEvent) {
        let emitted = EmittedEvent {
            at: Utc::now(),
            event,
        };

        let mut inner = self.inner.lock().unwrap();
        for sub in &inner.subscribers {
            (sub.callback)(&emitted);
        }
        inner.subscribers.retain(|s| !s.once);
    }
}

/// Default event sink: structured tracing log lines, one per event.
pub fn install_tracing_sink(bus: &EventBus) {
    bus.subscribe(|emitted| match &emitted.event {
        PlayerEvent::LoadVideo => {
            tracing::info!(event = "load_video", "Player event");
        }
        PlayerEvent::PlayVideo { current_time } => {
            tracing::info!(event = "play_video", current_time, "Player event");
        }
        PlayerEvent::PauseVideo { current_time } => {
            tracing::info!(event = "pause_video", current_time, "Player event");
        }
        PlayerEvent::SeekVideo {
            old_time,
            new_time,
            kind,
        } => {
            tracing::info!(
                event = "seek_video",
                old_time,
                new_time,
                r#type = kind.as_str(),
                "Player event"
            );
        }
        PlayerEvent::SpeedChange {
            current_time,
            old_speed,
            new_speed,
        } => {
            tracing::info!(
                event = "speed_change_video",
                current_time,
                old_speed = old_speed.as_str(),
                new_speed = new_speed.as_str(),
                "Player event"
            );
        }
        PlayerEvent::ShowTranscript { current_time } => {
            tracing::info!(event = "show_transcript", current_time, "Player event");
        }
        PlayerEvent::HideTranscript { current_time } => {
            tracing::info!(event = "hide_transcript", current_time, "Player event");
        }
        PlayerEvent::EndedByTrim { current_time } => {
            tracing::info!(event = "ended_by_trim", current_time, "Player event");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capture(bus: &EventBus) -> Arc<Mutex<Vec<PlayerEvent>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        bus.subscribe(move |e| sink.lock().unwrap().push(e.event.clone()));
        seen
    }

    #[test]
    fn delivers_in_subscription_order() {
        let bus = EventBus::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second"] {
            let order = order.clone();
            bus.subscribe(move |_| order.lock().unwrap().push(tag));
        }

        bus.emit(PlayerEvent::LoadVideo);
        assert_eq!(*order.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn once_subscribers_fire_a_single_time() {
        let bus = EventBus::new();
        let count = Arc::new(Mutex::new(0u32));
        let counter = count.clone();
        bus.subscribe_once(move |_| *counter.lock().unwrap() += 1);

        bus.emit(PlayerEvent::LoadVideo);
        bus.emit(PlayerEvent::LoadVideo);
        assert_eq!(*count.lock().unwrap(), 1);
    }

    #[test]
    fn unsubscribed_callbacks_stop_receiving() {
        let bus = EventBus::new();
        let seen = capture(&bus);
        let count = Arc::new(Mutex::new(0u32));
        let counter = count.clone();
        let id = bus.subscribe(move |_| *counter.lock().unwrap() += 1);

        bus.emit(PlayerEvent::LoadVideo);
        bus.unsubscribe(id);
        bus.emit(PlayerEvent::PlayVideo { current_time: 1.0 });

        assert_eq!(*count.lock().unwrap(), 1);
        assert_eq!(seen.lock().unwrap().len(), 2);
    }
}
