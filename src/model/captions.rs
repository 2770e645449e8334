//! Caption track parsing, validation and timeline lookup

use std::sync::Arc;

use anyhow::{bail, Result};
use serde::Deserialize;

/// One caption cue. Cues have no explicit end: a cue stays active until the
/// next cue starts or the track runs out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaptionEntry {
    pub start_ms: u64,
    pub text: String,
}

/// Wire format of the caption resource: two parallel arrays, equal length,
/// `start` sorted non-decreasing.
#[derive(Debug, Deserialize)]
pub struct CaptionDocument {
    pub text: Vec<String>,
    pub start: Vec<u64>,
}

/// Immutable, sorted caption timeline. Built once per successful fetch and
/// replaced wholesale by the next fetch; never patched in place.
#[derive(Debug)]
pub struct CaptionTrack {
    entries: Vec<CaptionEntry>,
}

impl CaptionTrack {
    pub fn from_document(doc: CaptionDocument) -> Result<Self> {
        if doc.text.is_empty() || doc.start.is_empty() {
            bail!("caption document is empty");
        }
        if doc.text.len() != doc.start.len() {
            bail!(
                "caption arrays disagree: {} texts vs {} start times",
                doc.text.len(),
                doc.start.len()
            );
        }
        if doc.start.windows(2).any(|w| w[0] > w[1]) {
            bail!("caption start times are not sorted");
        }

        let entries = doc
            .start
            .into_iter()
            .zip(doc.text)
            .map(|(start_ms, text)| CaptionEntry { start_ms, text })
            .collect();

        Ok(Self { entries })
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let doc: CaptionDocument = serde_json::from_str(raw)?;
        Self::from_document(doc)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[CaptionEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&CaptionEntry> {
        self.entries.get(index)
    }

    /// Index of the cue active at `query_ms`: the greatest `i` with
    /// `entries[i].start_ms <= query_ms`. `None` when the query precedes
    /// the first cue; the last index when the query runs past the end of
    /// the track. O(log n).
    pub fn search(&self, query_ms: u64) -> Option<usize> {
        if query_ms < self.entries[0].start_ms {
            return None;
        }

        let (mut min, mut max) = (0usize, self.entries.len() - 1);
        while min < max {
            let mid = (min + max).div_ceil(2);
            if query_ms < self.entries[mid].start_ms {
                max = mid - 1;
            } else {
                min = mid;
            }
        }

        Some(min)
    }
}

/// Caption panel state shared between the caption sync controller and the
/// view. The track is behind an `Arc` so per-frame snapshots stay cheap.
#[derive(Clone, Default)]
pub struct CaptionPanelState {
    pub track: Option<Arc<CaptionTrack>>,
    /// Index of the active cue; edge-triggered by the sync controller.
    pub current_index: Option<usize>,
    /// Bumped on every active-cue change; the view scrolls when it moves.
    pub revision: u64,
    /// Cue selected by keyboard navigation, seek target on activation.
    pub selected_index: Option<usize>,
    /// False until a fetch succeeds, or again after the track is torn down.
    /// While false the panel and its toggle control stay hidden.
    pub available: bool,
    /// User toggle (the CC button): captions switched off.
    pub hidden: bool,
    /// Transient visibility while `hidden` is set; user activity shows the
    /// panel and an auto-hide timer clears this again.
    pub shown_transient: bool,
    pub playing: bool,
    /// Panel height in rows, recomputed via the resizer callback.
    pub panel_height: u16,
}

impl CaptionPanelState {
    pub fn panel_visible(&self) -> bool {
        self.available && (!self.hidden || self.shown_transient)
    }
}
