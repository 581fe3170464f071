use crate::error::{Result, ScatterError};

/// A per-point attribute: one value for every point, or exactly one value per point.
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute<T> {
    /// Broadcast to all points.
    Uniform(T),
    /// One entry per point; the length must equal the point count.
    PerPoint(Vec<T>),
}

impl<T: Clone> Attribute<T> {
    /// Expands to exactly `n` values.
    ///
    /// `attribute` names the input in the error raised when a per-point
    /// sequence has the wrong length. Sequences are never truncated or padded.
    pub fn expand(&self, attribute: &'static str, n: usize) -> Result<Vec<T>> {
        match self {
            Self::Uniform(v) => Ok(vec![v.clone(); n]),
            Self::PerPoint(values) if values.len() == n => Ok(values.clone()),
            Self::PerPoint(values) => Err(ScatterError::Cardinality {
                attribute,
                expected: n,
                actual: values.len(),
            }),
        }
    }
}

impl From<f32> for Attribute<f32> {
    fn from(v: f32) -> Self {
        Self::Uniform(v)
    }
}

impl From<Vec<f32>> for Attribute<f32> {
    fn from(values: Vec<f32>) -> Self {
        Self::PerPoint(values)
    }
}

impl From<&[f32]> for Attribute<f32> {
    fn from(values: &[f32]) -> Self {
        Self::PerPoint(values.to_vec())
    }
}

impl From<&str> for Attribute<String> {
    fn from(v: &str) -> Self {
        Self::Uniform(v.to_owned())
    }
}

impl From<String> for Attribute<String> {
    fn from(v: String) -> Self {
        Self::Uniform(v)
    }
}

impl From<Vec<String>> for Attribute<String> {
    fn from(values: Vec<String>) -> Self {
        Self::PerPoint(values)
    }
}

impl From<Vec<&str>> for Attribute<String> {
    fn from(values: Vec<&str>) -> Self {
        Self::PerPoint(values.into_iter().map(str::to_owned).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_broadcasts() {
        let v = Attribute::Uniform(3.5f32).expand("sizes", 4).unwrap();
        assert_eq!(v, vec![3.5; 4]);
    }

    #[test]
    fn uniform_broadcast_to_zero_points_is_empty() {
        assert!(Attribute::Uniform(1.0f32).expand("sizes", 0).unwrap().is_empty());
    }

    #[test]
    fn per_point_passes_through() {
        let v = Attribute::PerPoint(vec![1.0f32, 2.0]).expand("sizes", 2).unwrap();
        assert_eq!(v, vec![1.0, 2.0]);
    }

    #[test]
    fn per_point_length_mismatch_fails() {
        let err = Attribute::PerPoint(vec![1.0f32, 2.0, 3.0]).expand("sizes", 2).unwrap_err();
        assert_eq!(
            err,
            ScatterError::Cardinality { attribute: "sizes", expected: 2, actual: 3 }
        );
    }

    #[test]
    fn string_conversions() {
        assert_eq!(Attribute::from("#fff"), Attribute::Uniform("#fff".to_owned()));
        assert_eq!(
            Attribute::from(vec!["#000", "#111"]),
            Attribute::PerPoint(vec!["#000".to_owned(), "#111".to_owned()])
        );
    }
}
