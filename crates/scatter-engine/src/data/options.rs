use super::attribute::Attribute;

pub const DEFAULT_COLOR: &str = "#000000";
pub const DEFAULT_SIZE: f32 = 5.0;
pub const DEFAULT_OPACITY: f32 = 1.0;
pub const DEFAULT_STROKE_COLOR: &str = "#FFFFFF";
pub const DEFAULT_STROKE_WIDTH: f32 = 0.0;

/// Per-point styling accepted by `set_data`.
///
/// Every field is either a single value broadcast to all points or one value
/// per point. Sizes and stroke widths are in physical pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct SetDataOptions {
    /// Fill colors as hex strings.
    pub colors: Attribute<String>,
    /// Quad edge length (diameter of the marker).
    pub sizes: Attribute<f32>,
    /// Alpha for both fill and stroke.
    pub opacity: Attribute<f32>,
    pub stroke_colors: Attribute<String>,
    pub stroke_widths: Attribute<f32>,
}

impl Default for SetDataOptions {
    fn default() -> Self {
        Self {
            colors: Attribute::from(DEFAULT_COLOR),
            sizes: Attribute::Uniform(DEFAULT_SIZE),
            opacity: Attribute::Uniform(DEFAULT_OPACITY),
            stroke_colors: Attribute::from(DEFAULT_STROKE_COLOR),
            stroke_widths: Attribute::Uniform(DEFAULT_STROKE_WIDTH),
        }
    }
}

impl SetDataOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_colors(mut self, colors: impl Into<Attribute<String>>) -> Self {
        self.colors = colors.into();
        self
    }

    pub fn with_sizes(mut self, sizes: impl Into<Attribute<f32>>) -> Self {
        self.sizes = sizes.into();
        self
    }

    pub fn with_opacity(mut self, opacity: impl Into<Attribute<f32>>) -> Self {
        self.opacity = opacity.into();
        self
    }

    pub fn with_stroke_colors(mut self, colors: impl Into<Attribute<String>>) -> Self {
        self.stroke_colors = colors.into();
        self
    }

    pub fn with_stroke_widths(mut self, widths: impl Into<Attribute<f32>>) -> Self {
        self.stroke_widths = widths.into();
        self
    }
}
