use crate::{
    ease::Ease,
    keyframe::KeyframeMap,
    style::{Lerp, RenderTarget, Style},
};

/// What happens past the last keyframe. Before the first keyframe the
/// element is always hidden, regardless of policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AfterPolicy {
    /// Element is not rendered past the mapped range.
    #[default]
    Hide,
    /// Element stays pinned to the last keyframe's values.
    Fit,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FigureOptions {
    pub after: AfterPolicy,
    /// Easing applied to local segment progress before interpolation.
    pub ease: Ease,
}

impl Default for FigureOptions {
    fn default() -> Self {
        Self {
            after: AfterPolicy::Hide,
            ease: Ease::InQuart,
        }
    }
}

/// One visual element plus its keyframe map and out-of-range policy. Maps a
/// scroll offset to a style and pushes it at the render target; holds no
/// state between updates beyond the immutable map.
pub struct Figure {
    target: Box<dyn RenderTarget>,
    map: KeyframeMap,
    after: AfterPolicy,
    ease: Ease,
}

impl Figure {
    pub fn new(target: Box<dyn RenderTarget>, map: KeyframeMap, options: FigureOptions) -> Self {
        Self {
            target,
            map,
            after: options.after,
            ease: options.ease,
        }
    }

    pub fn keyframes(&self) -> &KeyframeMap {
        &self.map
    }

    pub fn after(&self) -> AfterPolicy {
        self.after
    }

    pub fn update(&mut self, offset: f64) {
        let first = self.map.first();
        let last = self.map.last();

        if offset < first.scroll {
            self.target.hide();
            return;
        }
        if offset > last.scroll {
            match self.after {
                AfterPolicy::Hide => self.target.hide(),
                AfterPolicy::Fit => {
                    self.target.show();
                    self.target.apply(&last.style);
                }
            }
            return;
        }

        self.target.show();

        // Exact match on the first keyframe bypasses interpolation; every
        // other in-range offset belongs to the segment ending at it.
        if offset == first.scroll {
            self.target.apply(&first.style);
            return;
        }

        if let Some((prev, next)) = self.map.segment(offset) {
            let t = (offset - prev.scroll) / (next.scroll - prev.scroll);
            let style = Style::lerp(&prev.style, &next.style, self.ease.apply(t));
            self.target.apply(&style);
        }
    }
}
