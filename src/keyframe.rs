use crate::{
    error::{RigError, RigResult},
    style::Style,
};

/// One declared set of visual values anchored to a scroll offset.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Keyframe {
    pub scroll: f64,
    #[serde(flatten)]
    pub style: Style,
}

impl Keyframe {
    pub fn new(scroll: f64, style: Style) -> Self {
        Self { scroll, style }
    }
}

/// Ordered keyframe sequence for one figure. Validated at construction:
/// non-empty, finite scroll values, non-decreasing order. Immutable after.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Vec<Keyframe>", into = "Vec<Keyframe>")]
pub struct KeyframeMap {
    keys: Vec<Keyframe>,
}

impl KeyframeMap {
    pub fn new(keys: Vec<Keyframe>) -> RigResult<Self> {
        if keys.is_empty() {
            return Err(RigError::validation(
                "keyframe map must contain at least one keyframe",
            ));
        }
        if keys.iter().any(|k| !k.scroll.is_finite()) {
            return Err(RigError::validation(
                "keyframe scroll values must be finite",
            ));
        }
        if !keys.windows(2).all(|w| w[0].scroll <= w[1].scroll) {
            return Err(RigError::validation(
                "keyframe scroll values must be non-decreasing",
            ));
        }
        Ok(Self { keys })
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        false // the constructor rejects empty maps
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Keyframe> {
        self.keys.iter()
    }

    pub fn first(&self) -> &Keyframe {
        &self.keys[0]
    }

    pub fn last(&self) -> &Keyframe {
        &self.keys[self.keys.len() - 1]
    }

    /// The consecutive pair with `prev.scroll < offset <= next.scroll`.
    /// Left-exclusive, right-inclusive: a boundary offset belongs to the
    /// segment ending at it.
    pub fn segment(&self, offset: f64) -> Option<(&Keyframe, &Keyframe)> {
        self.keys
            .windows(2)
            .find(|w| w[0].scroll < offset && offset <= w[1].scroll)
            .map(|w| (&w[0], &w[1]))
    }
}

impl TryFrom<Vec<Keyframe>> for KeyframeMap {
    type Error = RigError;

    fn try_from(keys: Vec<Keyframe>) -> RigResult<Self> {
        Self::new(keys)
    }
}

impl From<KeyframeMap> for Vec<Keyframe> {
    fn from(map: KeyframeMap) -> Self {
        map.keys
    }
}
