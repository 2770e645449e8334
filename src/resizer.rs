//! Aspect-ratio preserving surface fitting
//!
//! Fits the video surface into its container without distorting the
//! backend's rendering ratio, centering on the non-fitted axis
//! (letterbox/pillarbox). Recomputed on window resize and fullscreen
//! toggles; dependents (the caption panel height, the stored UI placement)
//! subscribe through the callback list.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AlignMode {
    #[default]
    Auto,
    Width,
    Height,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    fn ratio(self) -> f64 {
        self.width / self.height
    }
}

/// Computed placement of the element inside its container.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElementPlacement {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ElementPlacement {
    pub fn ratio(&self) -> f64 {
        self.width / self.height
    }
}

/// Fixed ratio overrides; when absent, ratios are measured from the current
/// container/element dimensions on every alignment pass.
#[derive(Clone, Copy, Debug, Default)]
pub struct ResizeConfig {
    pub container_ratio: Option<f64>,
    pub element_ratio: Option<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CallbackId(u64);

struct Callback {
    id: CallbackId,
    once: bool,
    f: Box<dyn FnMut(ElementPlacement) + Send>,
}

/// Ordered alignment-callback list with persistent and one-shot entries.
/// Callbacks receive the placement just computed by `align`.
#[derive(Default)]
pub struct CallbackList {
    entries: Vec<Callback>,
    next_id: u64,
}

impl CallbackList {
    pub fn add<F: FnMut(ElementPlacement) + Send + 'static>(&mut self, f: F) -> CallbackId {
        self.push(false, Box::new(f))
    }

    /// Auto-removed after its first invocation.
    pub fn once<F: FnMut(ElementPlacement) + Send + 'static>(&mut self, f: F) -> CallbackId {
        self.push(true, Box::new(f))
    }

    fn push(&mut self, once: bool, f: Box<dyn FnMut(ElementPlacement) + Send>) -> CallbackId {
        self.next_id += 1;
        let id = CallbackId(self.next_id);
        self.entries.push(Callback { id, once, f });
        id
    }

    pub fn remove(&mut self, id: CallbackId) {
        self.entries.retain(|c| c.id != id);
    }

    pub fn remove_all(&mut self) {
        self.entries.clear();
    }

    fn fire(&mut self, placement: ElementPlacement) {
        for cb in &mut self.entries {
            (cb.f)(placement);
        }
        self.entries.retain(|c| !c.once);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

pub struct Resizer {
    container: Size,
    element: Size,
    config: ResizeConfig,
    mode: AlignMode,
    callbacks: CallbackList,
}

impl Resizer {
    pub fn new(container: Size, element: Size, config: ResizeConfig) -> Self {
        Self {
            container,
            element,
            config,
            mode: AlignMode::Auto,
            callbacks: CallbackList::default(),
        }
    }

    pub fn set_container(&mut self, container: Size) {
        self.container = container;
    }

    /// Change the alignment rule and realign immediately.
    pub fn set_mode(&mut self, mode: AlignMode) -> ElementPlacement {
        self.mode = mode;
        self.align()
    }

    pub fn callbacks(&mut self) -> &mut CallbackList {
        &mut self.callbacks
    }

    fn ratios(&self) -> (f64, f64) {
        let container_ratio = self.config.container_ratio.unwrap_or_else(|| self.container.ratio());
        let element_ratio = self.config.element_ratio.unwrap_or_else(|| self.element.ratio());
        (container_ratio, element_ratio)
    }

    /// Fit the element per the current mode and notify subscribers.
    ///
    /// Auto mode: a container wider than the element's shape fits by
    /// height (pillarbox), otherwise by width (letterbox).
    pub fn align(&mut self) -> ElementPlacement {
        let placement = match self.mode {
            AlignMode::Height => self.fit_height(),
            AlignMode::Width => self.fit_width(),
            AlignMode::Auto => {
                let (container_ratio, element_ratio) = self.ratios();
                if container_ratio >= element_ratio {
                    self.fit_height()
                } else {
                    self.fit_width()
                }
            }
        };

        self.callbacks.fire(placement);
        placement
    }

    /// Width-only fit, bypassing the mode and the callback list (used when
    /// the caption panel opens or closes outside fullscreen).
    pub fn align_by_width_only(&mut self) -> ElementPlacement {
        self.fit_width()
    }

    fn fit_width(&self) -> ElementPlacement {
        let (_, element_ratio) = self.ratios();
        let height = self.container.width / element_ratio;
        ElementPlacement {
            left: 0.0,
            top: 0.5 * (self.container.height - height),
            width: self.container.width,
            height,
        }
    }

    fn fit_height(&self) -> ElementPlacement {
        let (_, element_ratio) = self.ratios();
        let width = self.container.height * element_ratio;
        ElementPlacement {
            left: 0.5 * (self.container.width - width),
            top: 0.0,
            width,
            height: self.container.height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    const TOLERANCE: f64 = 1e-9;

    fn resizer(container: (f64, f64), element: (f64, f64)) -> Resizer {
        Resizer::new(
            Size::new(container.0, container.1),
            Size::new(element.0, element.1),
            ResizeConfig::default(),
        )
    }

    fn assert_centered(placement: ElementPlacement, container: Size) {
        let right_gap = container.width - placement.width - placement.left;
        let bottom_gap = container.height - placement.height - placement.top;
        assert!((placement.left - right_gap).abs() < TOLERANCE);
        assert!((placement.top - bottom_gap).abs() < TOLERANCE);
    }

    #[test]
    fn alignment_preserves_element_ratio_and_centering() {
        let cases = [
            ((1920.0, 1080.0), (4.0, 3.0)),
            ((1280.0, 1024.0), (16.0, 9.0)),
            ((640.0, 480.0), (21.0, 9.0)),
            ((500.0, 900.0), (16.0, 9.0)),
        ];

        for (container, element) in cases {
            let mut r = resizer(container, element);
            let placement = r.align();
            let element_ratio = element.0 / element.1;

            assert!((placement.ratio() - element_ratio).abs() < TOLERANCE);
            assert_centered(placement, Size::new(container.0, container.1));
            assert!(placement.width <= container.0 + TOLERANCE);
            assert!(placement.height <= container.1 + TOLERANCE);
        }
    }

    #[test]
    fn auto_mode_picks_the_letterbox_or_pillarbox_side() {
        // Container wider than the element shape: fit by height, pillarbox.
        let mut wide = resizer((2000.0, 500.0), (16.0, 9.0));
        let placement = wide.align();
        assert!((placement.height - 500.0).abs() < TOLERANCE);
        assert!(placement.left > 0.0);
        assert!((placement.top).abs() < TOLERANCE);

        // Container narrower: fit by width, letterbox.
        let mut narrow = resizer((500.0, 2000.0), (16.0, 9.0));
        let placement = narrow.align();
        assert!((placement.width - 500.0).abs() < TOLERANCE);
        assert!(placement.top > 0.0);
        assert!((placement.left).abs() < TOLERANCE);
    }

    #[test]
    fn explicit_modes_override_the_ratio_comparison() {
        let mut r = resizer((2000.0, 500.0), (16.0, 9.0));
        let placement = r.set_mode(AlignMode::Width);
        assert!((placement.width - 2000.0).abs() < TOLERANCE);
        // Width fit in a short container overflows vertically and centers
        // the overflow.
        assert!(placement.top < 0.0);

        let placement = r.set_mode(AlignMode::Height);
        assert!((placement.height - 500.0).abs() < TOLERANCE);
    }

    #[test]
    fn configured_ratios_take_precedence_over_measured_ones() {
        let mut r = Resizer::new(
            Size::new(1000.0, 1000.0),
            Size::new(123.0, 7.0),
            ResizeConfig {
                container_ratio: None,
                element_ratio: Some(2.0),
            },
        );
        let placement = r.align();
        assert!((placement.ratio() - 2.0).abs() < TOLERANCE);
    }

    #[test]
    fn callbacks_fire_in_order_and_once_entries_drop_out() {
        let mut r = resizer((1000.0, 600.0), (16.0, 9.0));
        let log: Arc<Mutex<Vec<&'static str>>> = Arc::new(Mutex::new(Vec::new()));

        let l = log.clone();
        r.callbacks().add(move |_| l.lock().unwrap().push("persistent"));
        let l = log.clone();
        r.callbacks().once(move |_| l.lock().unwrap().push("once"));

        r.align();
        r.align();

        assert_eq!(
            *log.lock().unwrap(),
            vec!["persistent", "once", "persistent"]
        );
    }

    #[test]
    fn removed_callbacks_no_longer_fire() {
        let mut r = resizer((1000.0, 600.0), (16.0, 9.0));
        let count = Arc::new(Mutex::new(0u32));

        let c = count.clone();
        let id = r.callbacks().add(move |_| *c.lock().unwrap() += 1);
        r.align();
        r.callbacks().remove(id);
        r.align();

        assert_eq!(*count.lock().unwrap(), 1);
        assert_eq!(r.callbacks().len(), 0);

        let c = count.clone();
        r.callbacks().add(move |_| *c.lock().unwrap() += 1);
        r.callbacks().remove_all();
        r.align();
        assert_eq!(*count.lock().unwrap(), 1);
    }

    #[test]
    fn width_only_alignment_skips_callbacks() {
        let mut r = resizer((1000.0, 600.0), (16.0, 9.0));
        let count = Arc::new(Mutex::new(0u32));
        let c = count.clone();
        r.callbacks().add(move |_| *c.lock().unwrap() += 1);

        let placement = r.align_by_width_only();
        assert!((placement.width - 1000.0).abs() < TOLERANCE);
        assert_eq!(*count.lock().unwrap(), 0);
    }
}
