pub trait Lerp: Sized {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

/// One set of visual properties for a figure. Every field is optional; an
/// absent field is never interpolated and never applied (in particular it is
/// not defaulted to zero).
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Style {
    /// Horizontal position, percent of the containing surface.
    #[serde(rename = "x", skip_serializing_if = "Option::is_none")]
    pub x_pct: Option<f64>,
    /// Vertical position, percent of the containing surface.
    #[serde(rename = "y", skip_serializing_if = "Option::is_none")]
    pub y_pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(rename = "rotation", skip_serializing_if = "Option::is_none")]
    pub rotation_deg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
}

impl Style {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Rotation and scale composed into a single transform string, only
    /// including the components that are present. `None` when neither is.
    pub fn transform_css(&self) -> Option<String> {
        let mut parts: Vec<String> = Vec::new();
        if let Some(r) = self.rotation_deg {
            parts.push(format!("rotate({r}deg)"));
        }
        if let Some(s) = self.scale {
            parts.push(format!("scale({s})"));
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

// A field absent on either endpoint stays absent in the result; interpolation
// never invents a default for the missing side.
impl Lerp for Style {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            x_pct: fade(a.x_pct, b.x_pct, t),
            y_pct: fade(a.y_pct, b.y_pct, t),
            opacity: fade(a.opacity, b.opacity, t),
            rotation_deg: fade(a.rotation_deg, b.rotation_deg, t),
            scale: fade(a.scale, b.scale, t),
        }
    }
}

fn fade(a: Option<f64>, b: Option<f64>, t: f64) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a + (b - a) * t),
        _ => None,
    }
}

/// Surface a figure renders into. Percent positions assume the surface is
/// absolutely positioned inside a fixed container.
pub trait RenderTarget {
    /// Apply the present fields of `style`; absent fields are left untouched.
    fn apply(&mut self, style: &Style);
    fn show(&mut self);
    fn hide(&mut self);
}

/// Surface holding the scrolled content itself. Receives the content
/// translation in pixels (the negative of the scroll offset).
pub trait ContentTarget {
    fn set_content_offset(&mut self, offset_px: f64);
}
