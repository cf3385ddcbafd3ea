use glam::DVec2;
use rand::Rng;

/// Identifier for a node in a [`crate::network::VeinNetwork`].
///
/// This is an index into `VeinNetwork::nodes`. Nodes are never removed,
/// so an id stays valid for the lifetime of the network.
pub type NodeId = usize;

/// Identifier for an attractor in a [`crate::attractor::AttractorField`].
///
/// Attractor ids are positional and shift whenever the field is purged,
/// so they are only meaningful until the next purge.
pub type AttractorId = usize;

/// Axis-aligned rectangle spanning `min..max`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub min: DVec2,
    pub max: DVec2,
}

impl Rect {
    pub fn new(min: DVec2, max: DVec2) -> Self {
        Self { min, max }
    }

    /// Rectangle anchored at the origin, e.g. a `width` x `height` canvas.
    pub fn from_size(width: f64, height: f64) -> Self {
        Self::new(DVec2::ZERO, DVec2::new(width, height))
    }

    /// Smallest rectangle containing every point, or `None` for no points.
    pub fn bounding(points: &[DVec2]) -> Option<Self> {
        let first = *points.first()?;
        let rect = points.iter().fold(Self::new(first, first), |r, &p| {
            Self::new(r.min.min(p), r.max.max(p))
        });
        Some(rect)
    }

    fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> DVec2 {
        (self.min + self.max) * 0.5
    }

    /// `true` when the rectangle has no finite interior to sample from.
    ///
    /// Infinite or NaN corners, and extents that overflow `f64`, count as
    /// empty.
    pub fn is_empty(&self) -> bool {
        let (w, h) = (self.width(), self.height());
        !(w > 0.0 && h > 0.0 && w.is_finite() && h.is_finite())
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }

    /// Draws a uniformly distributed point in `min..max`.
    ///
    /// ### Panics
    /// Panics if the rectangle [`is_empty`](Self::is_empty).
    pub fn random_point(&self, rng: &mut impl Rng) -> DVec2 {
        DVec2::new(
            rng.random_range(self.min.x..self.max.x),
            rng.random_range(self.min.y..self.max.y),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn bounding_covers_all_points() {
        let pts = [
            DVec2::new(1.0, 5.0),
            DVec2::new(-2.0, 3.0),
            DVec2::new(4.0, -1.0),
        ];
        let r = Rect::bounding(&pts).unwrap();
        assert_eq!(r.min, DVec2::new(-2.0, -1.0));
        assert_eq!(r.max, DVec2::new(4.0, 5.0));
        assert!(Rect::bounding(&[]).is_none());
    }

    #[test]
    fn empty_and_intersects() {
        let a = Rect::from_size(10.0, 10.0);
        let b = Rect::new(DVec2::new(5.0, 5.0), DVec2::new(20.0, 20.0));
        let c = Rect::new(DVec2::new(11.0, 0.0), DVec2::new(12.0, 1.0));

        assert!(!a.is_empty());
        assert!(Rect::from_size(0.0, 5.0).is_empty());
        assert!(Rect::from_size(f64::INFINITY, 5.0).is_empty());
        assert!(Rect::from_size(f64::NAN, 5.0).is_empty());
        // Finite corners whose span overflows.
        assert!(Rect::new(DVec2::splat(-1e308), DVec2::splat(1e308)).is_empty());
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
        assert_eq!(a.center(), DVec2::new(5.0, 5.0));
    }

    #[test]
    fn random_point_stays_inside() {
        let mut rng = StdRng::seed_from_u64(7);
        let r = Rect::new(DVec2::new(-3.0, 2.0), DVec2::new(4.0, 9.0));
        for _ in 0..500 {
            let p = r.random_point(&mut rng);
            assert!(p.x >= r.min.x && p.x < r.max.x);
            assert!(p.y >= r.min.y && p.y < r.max.y);
        }
    }
}
