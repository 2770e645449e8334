//! Seek slider state

/// Highlighted sub-range of the slider marking an active trim region, in
/// percent of the track width.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SliderRange {
    pub left_pct: f64,
    pub width_pct: f64,
}

/// State of the seek slider, owned by the `ProgressSlider` controller.
///
/// `frozen == true` is the exclusivity invariant: while a drag is live (and
/// for a short settle window after it ends) clock-driven updates must not
/// write `value_ms`/`max_ms`.
#[derive(Clone, Debug)]
pub struct SliderState {
    pub value_ms: u64,
    pub max_ms: u64,
    pub frozen: bool,
    /// Human-readable position, e.g. "1 hour 2 minutes 3 seconds"; exposed
    /// for assistive technology and recomputed on every value change.
    pub time_description: String,
    /// Set when playback stopped at natural end or trim end; the
    /// description is replaced and focus is requested on the handle.
    pub ended: bool,
    pub range: Option<SliderRange>,
}

impl Default for SliderState {
    fn default() -> Self {
        Self {
            value_ms: 0,
            max_ms: 0,
            frozen: false,
            time_description: "0 seconds".to_string(),
            ended: false,
            range: None,
        }
    }
}

impl SliderState {
    pub fn ratio(&self) -> f64 {
        if self.max_ms == 0 {
            0.0
        } else {
            (self.value_ms as f64 / self.max_ms as f64).clamp(0.0, 1.0)
        }
    }
}
