use crate::error::{Result, ScatterError};

/// Fraction of clip space used by normalized geometry.
///
/// Points are mapped to `[-0.9, 0.9]` so that quads on the data extremes stay
/// on screen.
pub const CLIP_MARGIN: f32 = 0.9;

/// Input point set in one of the two accepted shapes.
///
/// Both shapes produce identical [`NormalizedGeometry`] for the same points.
#[derive(Debug, Clone, PartialEq)]
pub enum PointSet {
    /// Parallel coordinate columns; `xs[i]` pairs with `ys[i]`.
    Columns { xs: Vec<f32>, ys: Vec<f32> },
    /// One `[x, y]` pair per point.
    Pairs(Vec<[f32; 2]>),
}

impl PointSet {
    #[inline]
    pub fn columns(xs: Vec<f32>, ys: Vec<f32>) -> Self {
        Self::Columns { xs, ys }
    }

    #[inline]
    pub fn pairs(pairs: Vec<[f32; 2]>) -> Self {
        Self::Pairs(pairs)
    }

    /// Resolves the shape into a single pair list.
    ///
    /// Columns of unequal length and non-finite coordinates are rejected.
    fn resolve(&self) -> Result<Vec<[f32; 2]>> {
        let pairs = match self {
            Self::Pairs(pairs) => pairs.clone(),
            Self::Columns { xs, ys } => {
                if xs.len() != ys.len() {
                    return Err(ScatterError::Format(format!(
                        "coordinate columns differ in length (x: {}, y: {})",
                        xs.len(),
                        ys.len()
                    )));
                }
                xs.iter().zip(ys).map(|(&x, &y)| [x, y]).collect()
            }
        };

        if let Some(i) = pairs.iter().position(|[x, y]| !x.is_finite() || !y.is_finite()) {
            return Err(ScatterError::Format(format!(
                "point {i} has a non-finite coordinate"
            )));
        }

        Ok(pairs)
    }
}

impl From<Vec<[f32; 2]>> for PointSet {
    fn from(pairs: Vec<[f32; 2]>) -> Self {
        Self::Pairs(pairs)
    }
}

impl From<&[[f32; 2]]> for PointSet {
    fn from(pairs: &[[f32; 2]]) -> Self {
        Self::Pairs(pairs.to_vec())
    }
}

impl<const N: usize> From<[[f32; 2]; N]> for PointSet {
    fn from(pairs: [[f32; 2]; N]) -> Self {
        Self::Pairs(pairs.to_vec())
    }
}

impl From<(Vec<f32>, Vec<f32>)> for PointSet {
    fn from((xs, ys): (Vec<f32>, Vec<f32>)) -> Self {
        Self::Columns { xs, ys }
    }
}

/// Per-axis extent of the raw input.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DataBounds {
    pub x_min: f32,
    pub x_max: f32,
    pub y_min: f32,
    pub y_max: f32,
}

/// Clip-space positions, two floats per point.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedGeometry {
    positions: Vec<f32>,
    /// `None` for an empty point set.
    bounds: Option<DataBounds>,
}

impl NormalizedGeometry {
    /// Flat `[x0, y0, x1, y1, ...]` buffer.
    #[inline]
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    #[inline]
    pub fn bounds(&self) -> Option<DataBounds> {
        self.bounds
    }

    #[inline]
    pub fn point_count(&self) -> usize {
        self.positions.len() / 2
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Maps a point set into clip space.
///
/// Each axis is mapped independently with
/// `((v - min) / range * 2 - 1) * CLIP_MARGIN`, where a zero range is
/// replaced by `1` so constant axes and single points stay finite.
pub fn normalize_points(points: &PointSet) -> Result<NormalizedGeometry> {
    let pairs = points.resolve()?;

    let Some(bounds) = bounds_of(&pairs) else {
        return Ok(NormalizedGeometry {
            positions: Vec::new(),
            bounds: None,
        });
    };

    let x_range = axis_range(bounds.x_min, bounds.x_max);
    let y_range = axis_range(bounds.y_min, bounds.y_max);

    let mut positions = Vec::with_capacity(pairs.len() * 2);
    for [x, y] in pairs {
        positions.push(to_clip(x, bounds.x_min, x_range));
        positions.push(to_clip(y, bounds.y_min, y_range));
    }

    Ok(NormalizedGeometry {
        positions,
        bounds: Some(bounds),
    })
}

fn bounds_of(pairs: &[[f32; 2]]) -> Option<DataBounds> {
    let [x0, y0] = *pairs.first()?;
    let init = DataBounds {
        x_min: x0,
        x_max: x0,
        y_min: y0,
        y_max: y0,
    };

    Some(pairs.iter().fold(init, |b, &[x, y]| DataBounds {
        x_min: b.x_min.min(x),
        x_max: b.x_max.max(x),
        y_min: b.y_min.min(y),
        y_max: b.y_max.max(y),
    }))
}

/// Computed in f64: `max - min` of two finite f32 values can overflow f32.
#[inline]
fn axis_range(min: f32, max: f32) -> f64 {
    let range = f64::from(max) - f64::from(min);
    if range == 0.0 { 1.0 } else { range }
}

#[inline]
fn to_clip(v: f32, min: f32, range: f64) -> f32 {
    (((f64::from(v) - f64::from(min)) / range * 2.0 - 1.0) * f64::from(CLIP_MARGIN)) as f32
}
