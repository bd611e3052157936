use crate::{
    error::{RigError, RigResult},
    events::{EventKind, FrameEvent, SubscriptionId},
    figure::{Figure, FigureOptions},
    input::{TouchGesture, TouchPoint, TouchTracker, WheelEvent},
    keyframe::KeyframeMap,
    style::{ContentTarget, RenderTarget},
};

/// Cadence of the programmatic scroll animation, in milliseconds. The host
/// is expected to call [`Frame::tick`] at this interval.
pub const TICK_MS: u64 = 50;

/// Cooperative gate consulted by every input path before mutation. Replaces
/// a pair of independent locked/animating booleans; `resume_locked` records
/// a lock taken or released mid-animation so it survives completion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollPhase {
    Idle,
    Locked,
    Animating { resume_locked: bool },
}

impl ScrollPhase {
    /// Wheel and touch deltas are accepted only here.
    pub fn accepts_input(self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_animating(self) -> bool {
        matches!(self, Self::Animating { .. })
    }

    pub fn is_locked(self) -> bool {
        matches!(self, Self::Locked)
    }
}

/// Scroll state owned by a [`Frame`]. `offset >= 0` always on the input
/// path, and `offset <= max` whenever `max` is set; direct `set_offset` and
/// `jump_to` are unclamped.
#[derive(Clone, Copy, Debug)]
pub struct ScrollState {
    offset: f64,
    max: Option<f64>,
    phase: ScrollPhase,
    on_goal: bool,
}

impl ScrollState {
    fn new(max: Option<f64>) -> Self {
        Self {
            offset: 0.0,
            max,
            phase: ScrollPhase::Idle,
            on_goal: false,
        }
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn max(&self) -> Option<f64> {
        self.max
    }

    pub fn phase(&self) -> ScrollPhase {
        self.phase
    }

    /// True iff the offset is exactly equal to the configured maximum.
    pub fn on_goal(&self) -> bool {
        self.on_goal
    }

    fn clamp(&self, candidate: f64) -> f64 {
        let lower = candidate.max(0.0);
        match self.max {
            Some(max) => lower.min(max),
            None => lower,
        }
    }
}

/// Construction options for [`Frame`].
#[derive(Default)]
pub struct FrameOptions {
    /// Upper scroll bound (the "goal"). `None` means unbounded.
    pub max_offset: Option<f64>,
    /// Surface holding the scrolled content, moved by `-offset` px.
    pub content: Option<Box<dyn ContentTarget>>,
}

/// Handle to a figure registered on a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FigureId(usize);

struct Subscriber {
    id: SubscriptionId,
    kind: EventKind,
    handler: Box<dyn FnMut(&FrameEvent)>,
}

struct AutoScroll {
    target: f64,
    ticks_left: u64,
    on_complete: Option<Box<dyn FnOnce()>>,
}

struct QueuedJump {
    target: f64,
    on_complete: Box<dyn FnOnce()>,
}

/// Single authority over the scroll offset. Normalizes input into deltas,
/// clamps and applies them, fans the new offset out to registered figures
/// and subscribers, and drives tick-sliced programmatic scrolling.
pub struct Frame {
    state: ScrollState,
    content: Option<Box<dyn ContentTarget>>,
    figures: Vec<Figure>,
    subscribers: Vec<Subscriber>,
    next_subscription: u64,
    touch: TouchTracker,
    auto: Option<AutoScroll>,
    queued_jumps: Vec<QueuedJump>,
}

impl Frame {
    pub fn new(options: FrameOptions) -> RigResult<Self> {
        if let Some(max) = options.max_offset
            && (!max.is_finite() || max < 0.0)
        {
            return Err(RigError::validation(
                "max offset must be finite and non-negative",
            ));
        }
        Ok(Self {
            state: ScrollState::new(options.max_offset),
            content: options.content,
            figures: Vec::new(),
            subscribers: Vec::new(),
            next_subscription: 0,
            touch: TouchTracker::new(),
            auto: None,
            queued_jumps: Vec::new(),
        })
    }

    pub fn state(&self) -> ScrollState {
        self.state
    }

    pub fn offset(&self) -> f64 {
        self.state.offset
    }

    pub fn phase(&self) -> ScrollPhase {
        self.state.phase
    }

    pub fn on_goal(&self) -> bool {
        self.state.on_goal
    }

    pub fn figure_count(&self) -> usize {
        self.figures.len()
    }

    pub fn figure(&self, id: FigureId) -> Option<&Figure> {
        self.figures.get(id.0)
    }

    /// Register a figure bound to this frame's offset stream. The figure is
    /// rendered immediately at offset zero, not the live offset.
    pub fn register_figure(
        &mut self,
        target: Box<dyn RenderTarget>,
        map: KeyframeMap,
        options: FigureOptions,
    ) -> FigureId {
        let mut figure = Figure::new(target, map, options);
        figure.update(0.0);
        self.figures.push(figure);
        FigureId(self.figures.len() - 1)
    }

    pub fn subscribe(
        &mut self,
        kind: EventKind,
        handler: impl FnMut(&FrameEvent) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push(Subscriber {
            id,
            kind,
            handler: Box::new(handler),
        });
        id
    }

    /// Returns whether a subscription with this id existed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        self.subscribers.len() != before
    }

    /// Normalize a wheel event and apply it as a delta. Gated like any other
    /// input; malformed events reduce to a zero delta and change nothing.
    pub fn handle_wheel(&mut self, event: &WheelEvent) {
        self.apply_delta(event.delta());
    }

    pub fn touch_start(&mut self, point: TouchPoint) {
        self.touch.start(point);
    }

    /// Advance a single-touch drag. Returns the applied delta (zero when
    /// gated or when no touch is in progress). Gating happens before the
    /// tracker advances, so coordinates stay frozen while locked/animating.
    pub fn touch_move(&mut self, point: TouchPoint) -> f64 {
        self.touch.mark_moved();
        if !self.state.phase.accepts_input() {
            return 0.0;
        }
        let Some(delta) = self.touch.drag(point) else {
            return 0.0;
        };
        self.apply_delta(delta);
        delta
    }

    /// Finish a touch sequence. Tap-vs-drag is reported so the host can
    /// synthesize a click for taps.
    pub fn touch_end(&mut self) -> Option<TouchGesture> {
        self.touch.end()
    }

    /// Clamp `offset + delta` to `[0, max]` and apply it. Silent no-op
    /// unless the phase is `Idle`.
    pub fn apply_delta(&mut self, delta: f64) {
        if !self.state.phase.accepts_input() {
            return;
        }
        let candidate = self.state.clamp(self.state.offset + delta);
        self.set_offset(candidate);
    }

    /// Unconditionally set the offset, push it to the content target, update
    /// every figure in registration order, notify `Scroll` subscribers in
    /// subscription order, then evaluate the goal edge. Goal comparison is
    /// exact equality: callers must land exactly on `max`.
    pub fn set_offset(&mut self, value: f64) {
        self.state.offset = value;
        if let Some(content) = &mut self.content {
            content.set_content_offset(-value);
        }
        for figure in &mut self.figures {
            figure.update(value);
        }
        Self::emit(&mut self.subscribers, FrameEvent::Scroll(value));

        let at_goal = self.state.max.is_some_and(|max| value == max);
        if !self.state.on_goal && at_goal {
            self.state.on_goal = true;
            Self::emit(&mut self.subscribers, FrameEvent::ArriveGoal);
        } else if self.state.on_goal && !at_goal {
            self.state.on_goal = false;
            Self::emit(&mut self.subscribers, FrameEvent::LeaveGoal);
        }
    }

    /// Block input-driven offset changes. Taken mid-animation, the lock is
    /// remembered and restored when the animation completes; programmatic
    /// motion itself is never gated by locks.
    pub fn lock(&mut self) {
        self.state.phase = match self.state.phase {
            ScrollPhase::Animating { .. } => ScrollPhase::Animating {
                resume_locked: true,
            },
            _ => ScrollPhase::Locked,
        };
    }

    pub fn unlock(&mut self) {
        self.state.phase = match self.state.phase {
            ScrollPhase::Animating { .. } => ScrollPhase::Animating {
                resume_locked: false,
            },
            _ => ScrollPhase::Idle,
        };
    }

    /// Start a programmatic animated scroll toward `target`. Returns `false`
    /// (and stores nothing) while an animation is already running; there is
    /// no queue. A zero duration defers one tick and then applies the jump
    /// instantaneously; a positive duration is sliced into
    /// `max(1, duration_ms / TICK_MS)` ticks, each advancing by the
    /// remaining distance divided by the ticks left. Recomputing from the
    /// live offset each tick makes the motion an exponential ease toward
    /// the target rather than strict linear interpolation.
    #[tracing::instrument(skip(self, on_complete))]
    pub fn jump_to(
        &mut self,
        target: f64,
        duration_ms: u64,
        on_complete: impl FnOnce() + 'static,
    ) -> bool {
        if self.state.phase.is_animating() {
            return false;
        }
        if duration_ms == 0 {
            self.queued_jumps.push(QueuedJump {
                target,
                on_complete: Box::new(on_complete),
            });
            return true;
        }

        let ticks = (duration_ms / TICK_MS).max(1);
        let resume_locked = self.state.phase.is_locked();
        self.state.phase = ScrollPhase::Animating { resume_locked };
        self.auto = Some(AutoScroll {
            target,
            ticks_left: ticks,
            on_complete: Some(Box::new(on_complete)),
        });
        true
    }

    /// One 50 ms scheduling tick: drains deferred instantaneous jumps, then
    /// advances the active animation by one step. The final step snaps
    /// exactly to the target, restores the idle/locked phase, and invokes
    /// the completion callback.
    pub fn tick(&mut self) {
        for jump in std::mem::take(&mut self.queued_jumps) {
            self.set_offset(jump.target);
            (jump.on_complete)();
        }

        let Some(mut auto) = self.auto.take() else {
            return;
        };

        if auto.ticks_left <= 1 {
            self.set_offset(auto.target);
            self.finish_animation();
            if let Some(on_complete) = auto.on_complete.take() {
                on_complete();
            }
            return;
        }

        let step = (auto.target - self.state.offset) / auto.ticks_left as f64;
        auto.ticks_left -= 1;
        self.set_offset(self.state.offset + step);
        self.auto = Some(auto);
    }

    /// Drop the active animation and any deferred jumps without snapping to
    /// the target and without invoking completion callbacks.
    pub fn cancel_jump(&mut self) {
        self.queued_jumps.clear();
        if self.auto.take().is_some() {
            self.finish_animation();
        }
    }

    fn finish_animation(&mut self) {
        self.state.phase = match self.state.phase {
            ScrollPhase::Animating { resume_locked: true } => ScrollPhase::Locked,
            _ => ScrollPhase::Idle,
        };
    }

    fn emit(subscribers: &mut [Subscriber], event: FrameEvent) {
        let kind = event.kind();
        for sub in subscribers.iter_mut().filter(|s| s.kind == kind) {
            (sub.handler)(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn bounded(max: f64) -> Frame {
        Frame::new(FrameOptions {
            max_offset: Some(max),
            content: None,
        })
        .unwrap()
    }

    fn unbounded() -> Frame {
        Frame::new(FrameOptions::default()).unwrap()
    }

    fn record_events(frame: &mut Frame, kind: EventKind) -> Rc<RefCell<Vec<FrameEvent>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        frame.subscribe(kind, move |ev| sink.borrow_mut().push(*ev));
        log
    }

    #[test]
    fn rejects_invalid_max() {
        for max in [f64::NAN, f64::INFINITY, -1.0] {
            assert!(
                Frame::new(FrameOptions {
                    max_offset: Some(max),
                    content: None,
                })
                .is_err()
            );
        }
    }

    #[test]
    fn delta_is_clamped_to_bounds() {
        let mut frame = bounded(100.0);
        frame.apply_delta(-50.0);
        assert_eq!(frame.offset(), 0.0);
        frame.apply_delta(250.0);
        assert_eq!(frame.offset(), 100.0);
        frame.apply_delta(-30.0);
        assert_eq!(frame.offset(), 70.0);
    }

    #[test]
    fn unbounded_frame_only_clamps_below() {
        let mut frame = unbounded();
        frame.apply_delta(1e9);
        assert_eq!(frame.offset(), 1e9);
        frame.apply_delta(-2e9);
        assert_eq!(frame.offset(), 0.0);
    }

    #[test]
    fn wheel_event_moves_offset() {
        let mut frame = bounded(1000.0);
        frame.handle_wheel(&WheelEvent {
            wheel_delta: Some(-120.0),
            detail: None,
        });
        assert_eq!(frame.offset(), 120.0);
        // Unrecognized shape: zero delta, no movement.
        frame.handle_wheel(&WheelEvent::default());
        assert_eq!(frame.offset(), 120.0);
    }

    #[test]
    fn goal_events_fire_on_edges_only() {
        let mut frame = bounded(100.0);
        let arrivals = record_events(&mut frame, EventKind::ArriveGoal);
        let departures = record_events(&mut frame, EventKind::LeaveGoal);

        frame.set_offset(100.0);
        frame.set_offset(100.0); // still on goal, must not re-fire
        assert_eq!(arrivals.borrow().len(), 1);
        assert_eq!(departures.borrow().len(), 0);
        assert!(frame.on_goal());

        frame.set_offset(99.0);
        assert_eq!(departures.borrow().len(), 1);
        assert!(!frame.on_goal());

        frame.set_offset(100.0);
        assert_eq!(arrivals.borrow().len(), 2);
    }

    #[test]
    fn near_goal_is_not_goal() {
        let mut frame = bounded(100.0);
        let arrivals = record_events(&mut frame, EventKind::ArriveGoal);
        frame.set_offset(99.999_999);
        assert!(arrivals.borrow().is_empty());
    }

    #[test]
    fn scroll_subscribers_run_in_subscription_order() {
        let mut frame = unbounded();
        let order = Rc::new(RefCell::new(Vec::new()));
        for tag in ["a", "b", "c"] {
            let sink = Rc::clone(&order);
            frame.subscribe(EventKind::Scroll, move |_| sink.borrow_mut().push(tag));
        }
        frame.set_offset(1.0);
        assert_eq!(*order.borrow(), vec!["a", "b", "c"]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let mut frame = unbounded();
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let id = frame.subscribe(EventKind::Scroll, move |ev| sink.borrow_mut().push(*ev));

        frame.set_offset(1.0);
        assert!(frame.unsubscribe(id));
        assert!(!frame.unsubscribe(id));
        frame.set_offset(2.0);
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn lock_gates_input_but_not_set_offset() {
        let mut frame = bounded(100.0);
        frame.lock();
        assert!(frame.phase().is_locked());

        frame.apply_delta(10.0);
        assert_eq!(frame.offset(), 0.0);

        frame.set_offset(5.0);
        assert_eq!(frame.offset(), 5.0);

        frame.unlock();
        frame.apply_delta(10.0);
        assert_eq!(frame.offset(), 15.0);
    }

    #[test]
    fn touch_drag_is_gated_with_frozen_coordinates() {
        let mut frame = unbounded();
        frame.touch_start(TouchPoint::new(100.0, 0.0));

        frame.lock();
        assert_eq!(frame.touch_move(TouchPoint::new(110.0, 0.0)), 0.0);
        assert_eq!(frame.offset(), 0.0);

        // After unlocking, the next drag measures from the frozen start
        // point, so the whole accumulated distance applies at once.
        frame.unlock();
        assert_eq!(frame.touch_move(TouchPoint::new(120.0, 0.0)), 100.0);
        assert_eq!(frame.offset(), 100.0);

        // Movement while locked still counts against tap detection.
        assert_eq!(frame.touch_end(), Some(TouchGesture::Drag));
    }

    #[test]
    fn touch_tap_reported_on_end() {
        let mut frame = unbounded();
        frame.touch_start(TouchPoint::new(5.0, 5.0));
        assert_eq!(frame.touch_end(), Some(TouchGesture::Tap));
        assert_eq!(frame.touch_end(), None);
    }

    #[test]
    fn jump_converges_in_floor_duration_over_tick_ms_ticks() {
        let mut frame = unbounded();
        let done = Rc::new(RefCell::new(0u32));
        let flag = Rc::clone(&done);
        assert!(frame.jump_to(1000.0, 200, move || *flag.borrow_mut() += 1));
        assert!(frame.phase().is_animating());

        // 200ms / 50ms = 4 ticks; uninterrupted, the self-correcting step
        // degenerates to linear motion.
        frame.tick();
        assert_eq!(frame.offset(), 250.0);
        frame.tick();
        assert_eq!(frame.offset(), 500.0);
        frame.tick();
        assert_eq!(frame.offset(), 750.0);
        assert!(frame.phase().is_animating());
        assert_eq!(*done.borrow(), 0);

        frame.tick();
        assert_eq!(frame.offset(), 1000.0);
        assert_eq!(frame.phase(), ScrollPhase::Idle);
        assert_eq!(*done.borrow(), 1);

        // Further ticks are inert and must not re-fire completion.
        frame.tick();
        assert_eq!(*done.borrow(), 1);
        assert_eq!(frame.offset(), 1000.0);
    }

    #[test]
    fn jump_lands_exactly_on_goal() {
        let mut frame = bounded(1000.0);
        let arrivals = record_events(&mut frame, EventKind::ArriveGoal);
        frame.jump_to(1000.0, 150, || {});
        for _ in 0..3 {
            frame.tick();
        }
        assert_eq!(frame.offset(), 1000.0);
        assert_eq!(arrivals.borrow().len(), 1);
    }

    #[test]
    fn concurrent_jump_is_rejected() {
        let mut frame = unbounded();
        let first_done = Rc::new(RefCell::new(false));
        let first_flag = Rc::clone(&first_done);
        assert!(frame.jump_to(100.0, 100, move || *first_flag.borrow_mut() = true));

        let second_done = Rc::new(RefCell::new(false));
        let second_flag = Rc::clone(&second_done);
        assert!(!frame.jump_to(999.0, 100, move || *second_flag.borrow_mut() = true));

        frame.tick();
        frame.tick();
        assert_eq!(frame.offset(), 100.0);
        assert!(*first_done.borrow());
        assert!(!*second_done.borrow());
    }

    #[test]
    fn input_is_ignored_while_animating() {
        let mut frame = unbounded();
        frame.jump_to(100.0, 100, || {});
        frame.apply_delta(5000.0);
        assert_eq!(frame.offset(), 0.0);
        frame.tick();
        assert_eq!(frame.offset(), 50.0);
    }

    #[test]
    fn zero_duration_jump_defers_one_tick() {
        let mut frame = unbounded();
        let done = Rc::new(RefCell::new(false));
        let flag = Rc::clone(&done);
        assert!(frame.jump_to(300.0, 0, move || *flag.borrow_mut() = true));

        // Not applied yet, and not animating: input still flows.
        assert_eq!(frame.offset(), 0.0);
        assert!(!frame.phase().is_animating());
        frame.apply_delta(10.0);
        assert_eq!(frame.offset(), 10.0);

        frame.tick();
        assert_eq!(frame.offset(), 300.0);
        assert!(*done.borrow());
    }

    #[test]
    fn sub_tick_duration_snaps_on_first_tick() {
        let mut frame = unbounded();
        frame.jump_to(40.0, 30, || {});
        assert!(frame.phase().is_animating());
        frame.tick();
        assert_eq!(frame.offset(), 40.0);
        assert_eq!(frame.phase(), ScrollPhase::Idle);
    }

    #[test]
    fn lock_taken_mid_animation_survives_completion() {
        let mut frame = unbounded();
        frame.jump_to(100.0, 100, || {});
        frame.lock();
        assert!(frame.phase().is_animating());

        frame.tick();
        frame.tick();
        assert_eq!(frame.offset(), 100.0);
        assert_eq!(frame.phase(), ScrollPhase::Locked);

        frame.apply_delta(10.0);
        assert_eq!(frame.offset(), 100.0);
    }

    #[test]
    fn jump_from_locked_frame_restores_lock() {
        let mut frame = unbounded();
        frame.lock();
        assert!(frame.jump_to(50.0, TICK_MS, || {}));
        frame.tick();
        assert_eq!(frame.offset(), 50.0);
        assert_eq!(frame.phase(), ScrollPhase::Locked);
    }

    #[test]
    fn unlock_mid_animation_clears_pending_lock() {
        let mut frame = unbounded();
        frame.lock();
        frame.jump_to(50.0, TICK_MS, || {});
        frame.unlock();
        frame.tick();
        assert_eq!(frame.phase(), ScrollPhase::Idle);
    }

    #[test]
    fn cancel_drops_animation_without_completion() {
        let mut frame = unbounded();
        let done = Rc::new(RefCell::new(false));
        let flag = Rc::clone(&done);
        frame.jump_to(1000.0, 200, move || *flag.borrow_mut() = true);
        frame.tick();
        assert_eq!(frame.offset(), 250.0);

        frame.cancel_jump();
        assert_eq!(frame.phase(), ScrollPhase::Idle);
        frame.tick();
        assert_eq!(frame.offset(), 250.0);
        assert!(!*done.borrow());
    }

    #[test]
    fn cancel_drops_deferred_jumps() {
        let mut frame = unbounded();
        let done = Rc::new(RefCell::new(false));
        let flag = Rc::clone(&done);
        frame.jump_to(300.0, 0, move || *flag.borrow_mut() = true);
        frame.cancel_jump();
        frame.tick();
        assert_eq!(frame.offset(), 0.0);
        assert!(!*done.borrow());
    }

    #[test]
    fn content_target_receives_negated_offset() {
        struct ContentSpy(Rc<RefCell<Vec<f64>>>);
        impl ContentTarget for ContentSpy {
            fn set_content_offset(&mut self, offset_px: f64) {
                self.0.borrow_mut().push(offset_px);
            }
        }

        let log = Rc::new(RefCell::new(Vec::new()));
        let mut frame = Frame::new(FrameOptions {
            max_offset: None,
            content: Some(Box::new(ContentSpy(Rc::clone(&log)))),
        })
        .unwrap();

        frame.set_offset(120.0);
        assert_eq!(*log.borrow(), vec![-120.0]);
    }
}
