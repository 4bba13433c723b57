//! Polyline to segment conversion.

use crate::path::UvRange;
use crate::util::{direction_angle, InvalidPathError, Result, Vec2};

/// One straight piece of a path between two consecutive points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub start: Vec2,
    pub end: Vec2,
    /// Euclidean length in world units
    pub length: f32,
    /// Direction of `end - start` in `[0, 2π)`
    pub angle: f32,
    /// Slice of the path's [0, 1] texture axis, set by [`parameterize`](crate::path::parameterize)
    pub uv: UvRange,
}

impl Segment {
    pub fn new(start: Vec2, end: Vec2) -> Self {
        let d = end - start;
        Self {
            start,
            end,
            length: d.length(),
            angle: direction_angle(d),
            uv: UvRange::default(),
        }
    }

    #[inline]
    pub fn direction(&self) -> Vec2 {
        self.end - self.start
    }

    #[inline]
    pub fn midpoint(&self) -> Vec2 {
        (self.start + self.end) * 0.5
    }

    /// Coincident endpoints; renders as an invisible zero-area quad.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.length == 0.0
    }
}

/// Segments of a path plus their summed length.
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentedPath {
    pub segments: Vec<Segment>,
    pub total_length: f32,
}

impl SegmentedPath {
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    /// Number of zero-length segments.
    pub fn degenerate_count(&self) -> usize {
        self.segments.iter().filter(|s| s.is_degenerate()).count()
    }
}

/// Split a point list into N-1 segments and sum their lengths.
///
/// Zero-length segments from repeated points are kept.
pub fn segment_path(points: &[Vec2]) -> Result<SegmentedPath> {
    if points.len() < 2 {
        return Err(InvalidPathError::TooFewPoints(points.len()).into());
    }
    if let Some(i) = points.iter().position(|p| !p.is_finite()) {
        return Err(InvalidPathError::NonFinitePoint(i).into());
    }

    let segments: Vec<Segment> = points.windows(2).map(|w| Segment::new(w[0], w[1])).collect();
    let total_length: f32 = segments.iter().map(|s| s.length).sum();
    // an infinite length would turn every UV slice into NaN
    if !total_length.is_finite() {
        return Err(InvalidPathError::LengthOverflow.into());
    }

    Ok(SegmentedPath { segments, total_length })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::Error;

    fn pts(v: &[(f32, f32)]) -> Vec<Vec2> {
        v.iter().map(|&(x, y)| Vec2::new(x, y)).collect()
    }

    #[test]
    fn test_n_minus_one_segments() {
        for n in 2..10 {
            let points: Vec<Vec2> = (0..n).map(|i| Vec2::new(i as f32, (i * i) as f32)).collect();
            assert_eq!(segment_path(&points).unwrap().len(), n - 1);
        }
    }

    #[test]
    fn test_total_length_matches_pairwise_sum() {
        let points = pts(&[(0.0, 0.0), (3.0, 4.0), (3.0, 10.0), (-2.0, 10.0)]);
        let seg = segment_path(&points).unwrap();

        let mut direct = 0.0f32;
        for i in 0..points.len() - 1 {
            let dx = points[i + 1].x - points[i].x;
            let dy = points[i + 1].y - points[i].y;
            direct += (dx * dx + dy * dy).sqrt();
        }
        assert!((seg.total_length - direct).abs() < 1e-5);
        assert!((seg.total_length - 16.0).abs() < 1e-5);

        let summed: f32 = seg.iter().map(|s| s.length).sum();
        assert_eq!(summed, seg.total_length);
    }

    #[test]
    fn test_segment_attributes() {
        let s = Segment::new(Vec2::new(1.0, 1.0), Vec2::new(1.0, 3.0));
        assert_eq!(s.length, 2.0);
        assert!((s.angle - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert_eq!(s.midpoint(), Vec2::new(1.0, 2.0));
        assert!(!s.is_degenerate());
    }

    #[test]
    fn test_duplicate_points_tolerated() {
        let seg = segment_path(&pts(&[(0.0, 0.0), (3.0, 4.0), (3.0, 4.0)])).unwrap();
        assert_eq!(seg.len(), 2);
        assert_eq!(seg.segments[0].length, 5.0);
        assert_eq!(seg.segments[1].length, 0.0);
        assert_eq!(seg.degenerate_count(), 1);
    }

    #[test]
    fn test_too_few_points() {
        for points in [vec![], pts(&[(0.0, 0.0)])] {
            let err = segment_path(&points).unwrap_err();
            assert!(matches!(
                err,
                Error::InvalidPath(InvalidPathError::TooFewPoints(n)) if n == points.len()
            ));
        }
    }

    #[test]
    fn test_non_finite_point() {
        let err = segment_path(&pts(&[(0.0, 0.0), (f32::NAN, 1.0)])).unwrap_err();
        assert!(matches!(err, Error::InvalidPath(InvalidPathError::NonFinitePoint(1))));
    }

    #[test]
    fn test_length_overflow() {
        // one segment longer than f32::MAX
        let err = segment_path(&pts(&[(-3e38, 0.0), (3e38, 0.0), (3e38, 1.0)])).unwrap_err();
        assert_eq!(err.as_invalid_path(), Some(&InvalidPathError::LengthOverflow));

        // finite coordinates whose squared distance exceeds f32::MAX
        let err = segment_path(&pts(&[(0.0, 0.0), (1.0e20, 0.0)])).unwrap_err();
        assert_eq!(err.as_invalid_path(), Some(&InvalidPathError::LengthOverflow));
    }
}
