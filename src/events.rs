/// Notifications published by a [`Frame`](crate::Frame). Dispatch is
/// synchronous, in subscription order, and scoped to the owning frame;
/// there is no global bus.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameEvent {
    /// The offset changed (carries the new value).
    Scroll(f64),
    /// The offset just became exactly equal to the configured maximum.
    ArriveGoal,
    /// The offset just stopped being equal to the configured maximum.
    LeaveGoal,
}

impl FrameEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Scroll(_) => EventKind::Scroll,
            Self::ArriveGoal => EventKind::ArriveGoal,
            Self::LeaveGoal => EventKind::LeaveGoal,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Scroll,
    ArriveGoal,
    LeaveGoal,
}

/// Handle returned by [`Frame::subscribe`](crate::Frame::subscribe),
/// usable to unsubscribe later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);
