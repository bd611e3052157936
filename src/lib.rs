#![forbid(unsafe_code)]

pub mod ease;
pub mod error;
pub mod events;
pub mod figure;
pub mod frame;
pub mod input;
pub mod keyframe;
pub mod style;

pub use ease::Ease;
pub use error::{RigError, RigResult};
pub use events::{EventKind, FrameEvent, SubscriptionId};
pub use figure::{AfterPolicy, Figure, FigureOptions};
pub use frame::{FigureId, Frame, FrameOptions, ScrollPhase, ScrollState, TICK_MS};
pub use input::{Engine, TouchGesture, TouchPoint, TouchTracker, WheelEvent};
pub use keyframe::{Keyframe, KeyframeMap};
pub use style::{ContentTarget, Lerp, RenderTarget, Style};
