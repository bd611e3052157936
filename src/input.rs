//! Normalization of heterogeneous scroll input into one signed scalar.

/// Pixel-equivalent scale applied to stepped wheel deltas (line-based wheels
/// report small integer step counts).
pub const WHEEL_DETAIL_SCALE: f64 = 10.0;

/// Fixed sensitivity multiplier for single-touch drags.
pub const TOUCH_SENSITIVITY: f64 = 5.0;

/// Already-captured wheel/trackpad event data. The two source conventions are
/// a magnitude-with-sign field (`wheel_delta`) and a stepped-detail field
/// (`detail`); either may be absent depending on the producing browser family.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WheelEvent {
    pub wheel_delta: Option<f64>,
    pub detail: Option<f64>,
}

impl WheelEvent {
    /// The normalized signed delta. `wheel_delta` wins when present (negated,
    /// so the intuitive up/left direction decreases the offset), else
    /// `detail` scaled to pixel-equivalent motion. Selection is by field
    /// presence, so a present-but-zero `wheel_delta` does not fall through.
    /// An event carrying neither field yields zero.
    pub fn delta(&self) -> f64 {
        if let Some(wheel_delta) = self.wheel_delta {
            -wheel_delta
        } else if let Some(detail) = self.detail {
            detail * WHEEL_DETAIL_SCALE
        } else {
            tracing::trace!("wheel event carries no recognizable delta field");
            0.0
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchPoint {
    pub x: f64,
    pub y: f64,
}

impl TouchPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// What a completed touch sequence amounted to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchGesture {
    /// No movement between start and end; hosts typically synthesize a click.
    Tap,
    Drag,
}

/// Tracks one single-touch sequence and folds its 2D motion onto the scroll
/// axis: `(dx - dy) * 5`, so horizontal and vertical motion oppose each other
/// and a perfectly diagonal drag cancels out.
#[derive(Debug, Default)]
pub struct TouchTracker {
    prev: Option<TouchPoint>,
    moved: bool,
}

impl TouchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, point: TouchPoint) {
        self.prev = Some(point);
        self.moved = false;
    }

    /// Advance to `point` and return the normalized delta. `None` when no
    /// touch is in progress.
    pub fn drag(&mut self, point: TouchPoint) -> Option<f64> {
        let prev = self.prev?;
        self.moved = true;
        let delta = ((point.x - prev.x) - (point.y - prev.y)) * TOUCH_SENSITIVITY;
        self.prev = Some(point);
        Some(delta)
    }

    /// Record that movement happened without advancing the previous point.
    /// Used when a drag is gated: the tap state still clears, but the next
    /// accepted drag measures from the frozen coordinates.
    pub fn mark_moved(&mut self) {
        if self.prev.is_some() {
            self.moved = true;
        }
    }

    /// Finish the sequence. `None` when no touch was in progress.
    pub fn end(&mut self) -> Option<TouchGesture> {
        let started = self.prev.take().is_some();
        let moved = std::mem::take(&mut self.moved);
        started.then(|| if moved { TouchGesture::Drag } else { TouchGesture::Tap })
    }
}

/// Browser family delivering the raw events, as far as the capture layer
/// can tell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Engine {
    Blink,
    Gecko,
    WebKit,
    Other,
}

/// Whether the capture layer should suppress the default scroll action for a
/// wheel event. Gecko stops reporting wheel deltas once the default action is
/// suppressed, so it is the one family left unsuppressed.
pub fn suppress_default(engine: Engine) -> bool {
    engine != Engine::Gecko
}
