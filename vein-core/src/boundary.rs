//! Closed boundary shape that attractors are sampled inside.
//!
//! The shape is a polygon approximating a closed cubic Bézier curve. It is
//! built once and never mutated afterwards.

use crate::error::{Result, SimulationError};
use crate::types::Rect;
use glam::DVec2;

/// How [`BoundaryShape::contains`] classifies a point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ContainmentRule {
    /// Inside when the point lies on the same side of every edge.
    ///
    /// Only correct for convex polygons.
    CrossSign,
    /// Inside when the winding number is non-zero, or the point lies on
    /// the outline.
    #[default]
    Winding,
}

/// Evaluates a cubic Bézier curve at parameter `t`.
pub fn cubic_bezier_point(p: &[DVec2; 4], t: f64) -> DVec2 {
    let u = 1.0 - t;
    p[0] * (u * u * u) + p[1] * (3.0 * u * u * t) + p[2] * (3.0 * u * t * t) + p[3] * (t * t * t)
}

/// Polygon approximation of a closed curve.
#[derive(Clone, Debug)]
pub struct BoundaryShape {
    vertices: Vec<DVec2>,
    bounds: Rect,
    rule: ContainmentRule,
}

impl BoundaryShape {
    /// Samples a closed cubic Bézier at `sample_count` evenly spaced
    /// parameters in `[0, 1)`.
    ///
    /// ### Parameters
    /// - `control_points` - The four Bézier control points. The first and
    ///   last point should coincide for the curve to be closed.
    /// - `sample_count` - Number of polygon vertices to produce.
    ///
    /// ### Errors
    /// - [`SimulationError::InvalidBoundary`] if `sample_count < 3`.
    /// - [`SimulationError::DegenerateBoundary`] if the sampled polygon
    ///   encloses no area.
    pub fn build(control_points: &[DVec2; 4], sample_count: usize) -> Result<Self> {
        if sample_count < 3 {
            return Err(SimulationError::InvalidBoundary {
                vertices: sample_count,
            });
        }

        let delta = 1.0 / sample_count as f64;
        let vertices = (0..sample_count)
            .map(|i| cubic_bezier_point(control_points, i as f64 * delta))
            .collect();

        Self::from_vertices(vertices)
    }

    /// Builds a boundary from an explicit list of polygon vertices.
    ///
    /// ### Errors
    /// - [`SimulationError::InvalidBoundary`] for fewer than 3 vertices.
    /// - [`SimulationError::DegenerateBoundary`] if the polygon has zero area.
    pub fn from_vertices(vertices: Vec<DVec2>) -> Result<Self> {
        let Some(bounds) = Rect::bounding(&vertices).filter(|_| vertices.len() >= 3) else {
            return Err(SimulationError::InvalidBoundary {
                vertices: vertices.len(),
            });
        };

        let shape = Self {
            vertices,
            bounds,
            rule: ContainmentRule::default(),
        };

        if shape.area() == 0.0 {
            return Err(SimulationError::DegenerateBoundary);
        }
        Ok(shape)
    }

    /// Returns the same shape classified with a different rule.
    pub fn with_rule(mut self, rule: ContainmentRule) -> Self {
        self.rule = rule;
        self
    }

    pub fn rule(&self) -> ContainmentRule {
        self.rule
    }

    pub fn vertices(&self) -> &[DVec2] {
        &self.vertices
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Unsigned polygon area (shoelace formula).
    pub fn area(&self) -> f64 {
        let twice: f64 = self.edges().map(|(a, b)| a.perp_dot(b)).sum();
        twice.abs() * 0.5
    }

    /// `true` when every turn along the outline bends the same way.
    ///
    /// Collinear vertices are ignored. The [`ContainmentRule::CrossSign`]
    /// rule is only reliable for convex shapes.
    pub fn is_convex(&self) -> bool {
        let n = self.vertices.len();
        let mut pos = false;
        let mut neg = false;
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            let c = self.vertices[(i + 2) % n];
            let turn = (b - a).perp_dot(c - b);
            pos |= turn > 0.0;
            neg |= turn < 0.0;
        }
        !(pos && neg)
    }

    /// Iterates over polygon edges, closing the last vertex back to the first.
    pub fn edges(&self) -> impl Iterator<Item = (DVec2, DVec2)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Returns `true` if `p` is inside the shape. Vertices always count as
    /// inside.
    pub fn contains(&self, p: DVec2) -> bool {
        match self.rule {
            ContainmentRule::CrossSign => self.contains_cross_sign(p),
            ContainmentRule::Winding => self.contains_winding(p),
        }
    }

    fn contains_cross_sign(&self, p: DVec2) -> bool {
        let mut pos = 0usize;
        let mut neg = 0usize;

        for (a, b) in self.edges() {
            if p == a {
                return true;
            }

            let d = (p - a).perp_dot(b - a);
            if d > 0.0 {
                pos += 1;
            } else if d < 0.0 {
                neg += 1;
            }

            // A sign change means the point crossed to the other side of an edge.
            if pos > 0 && neg > 0 {
                return false;
            }
        }
        true
    }

    fn contains_winding(&self, p: DVec2) -> bool {
        let mut winding = 0i32;

        for (a, b) in self.edges() {
            let side = (b - a).perp_dot(p - a);

            if p == a || (side == 0.0 && on_segment(a, b, p)) {
                return true;
            }

            if a.y <= p.y {
                if b.y > p.y && side > 0.0 {
                    winding += 1;
                }
            } else if b.y <= p.y && side < 0.0 {
                winding -= 1;
            }
        }
        winding != 0
    }
}

/// `p` is assumed collinear with `a`-`b`; checks it lies between them.
fn on_segment(a: DVec2, b: DVec2, p: DVec2) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}
