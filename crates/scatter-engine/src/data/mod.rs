//! Attribute normalization.
//!
//! Pure functions that turn caller input (points in either accepted shape,
//! hex colors, scalar or per-point attributes) into flat `f32` arrays laid out
//! the way the vertex slots consume them. Nothing here touches the GPU.

mod attribute;
mod color;
mod options;
mod points;

pub use attribute::Attribute;
pub use color::{expand_colors, HexColor};
pub use options::{
    SetDataOptions, DEFAULT_COLOR, DEFAULT_OPACITY, DEFAULT_SIZE, DEFAULT_STROKE_COLOR,
    DEFAULT_STROKE_WIDTH,
};
pub use points::{normalize_points, DataBounds, NormalizedGeometry, PointSet, CLIP_MARGIN};

use crate::error::Result;

/// Expands sizes to `n` floats, clamping negatives to zero.
pub fn expand_sizes(sizes: &Attribute<f32>, n: usize) -> Result<Vec<f32>> {
    expand_non_negative(sizes, "sizes", n)
}

fn expand_non_negative(attr: &Attribute<f32>, attribute: &'static str, n: usize) -> Result<Vec<f32>> {
    Ok(attr
        .expand(attribute, n)?
        .into_iter()
        .map(|v| v.max(0.0))
        .collect())
}

/// Every per-point array for one `set_data` call, validated together.
///
/// Built before any GPU buffer is touched so that a bad attribute leaves the
/// previously uploaded data intact.
#[derive(Debug, Clone, PartialEq)]
pub struct PointData {
    pub geometry: NormalizedGeometry,
    /// RGBA per point.
    pub colors: Vec<f32>,
    pub sizes: Vec<f32>,
    /// RGBA per point.
    pub stroke_colors: Vec<f32>,
    pub stroke_widths: Vec<f32>,
}

impl PointData {
    pub fn prepare(points: &PointSet, options: &SetDataOptions) -> Result<Self> {
        let geometry = normalize_points(points)?;
        let n = geometry.point_count();

        let colors = color::expand_colors_named(&options.colors, "colors", &options.opacity, n)?;
        let sizes = expand_sizes(&options.sizes, n)?;
        let stroke_colors = color::expand_colors_named(
            &options.stroke_colors,
            "strokeColors",
            &options.opacity,
            n,
        )?;
        let stroke_widths = expand_non_negative(&options.stroke_widths, "strokeWidths", n)?;

        Ok(Self {
            geometry,
            colors,
            sizes,
            stroke_colors,
            stroke_widths,
        })
    }

    #[inline]
    pub fn point_count(&self) -> usize {
        self.geometry.point_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScatterError;

    #[test]
    fn sizes_broadcast_and_clamp() {
        assert_eq!(expand_sizes(&Attribute::Uniform(5.0), 3).unwrap(), vec![5.0; 3]);
        assert_eq!(
            expand_sizes(&Attribute::PerPoint(vec![-2.0, 4.0]), 2).unwrap(),
            vec![0.0, 4.0]
        );
    }

    #[test]
    fn sizes_length_mismatch() {
        let err = expand_sizes(&Attribute::PerPoint(vec![1.0]), 2).unwrap_err();
        assert!(matches!(err, ScatterError::Cardinality { attribute: "sizes", .. }));
    }

    #[test]
    fn prepare_with_defaults() {
        let data = PointData::prepare(&PointSet::pairs(vec![[0.0, 0.0], [1.0, 1.0]]), &SetDataOptions::default())
            .unwrap();
        assert_eq!(data.point_count(), 2);
        assert_eq!(data.colors, vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
        assert_eq!(data.sizes, vec![5.0, 5.0]);
        assert_eq!(data.stroke_colors, vec![1.0; 8]);
        assert_eq!(data.stroke_widths, vec![0.0, 0.0]);
    }

    #[test]
    fn stroke_colors_share_opacity() {
        let options = SetDataOptions::new()
            .with_opacity(vec![0.5f32, 0.25])
            .with_stroke_colors("#FF0000");
        let data = PointData::prepare(&PointSet::pairs(vec![[0.0, 0.0], [1.0, 1.0]]), &options).unwrap();
        assert_eq!(&data.stroke_colors[..4], &[1.0, 0.0, 0.0, 0.5]);
        assert_eq!(data.stroke_colors[7], 0.25);
    }

    #[test]
    fn stroke_width_mismatch_is_named() {
        let options = SetDataOptions::new().with_stroke_widths(vec![1.0f32, 2.0, 3.0]);
        let err = PointData::prepare(&PointSet::pairs(vec![[0.0, 0.0]]), &options).unwrap_err();
        assert_eq!(
            err,
            ScatterError::Cardinality { attribute: "strokeWidths", expected: 1, actual: 3 }
        );
    }

    #[test]
    fn bad_hex_is_a_format_error() {
        let options = SetDataOptions::new().with_colors("not-a-color");
        let err = PointData::prepare(&PointSet::pairs(vec![[0.0, 0.0]]), &options).unwrap_err();
        assert!(matches!(err, ScatterError::Format(_)));
    }
}
