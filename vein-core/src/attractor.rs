use crate::boundary::BoundaryShape;
use crate::error::{Result, SimulationError};
use crate::network::VeinNode;
use crate::types::Rect;
use glam::DVec2;
use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Attractor {
    pub pos: DVec2,
}

/// The set of active attractors ("auxins").
#[derive(Clone, Debug, Default)]
pub struct AttractorField {
    pub points: Vec<Attractor>,
}

impl AttractorField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_positions(positions: Vec<DVec2>) -> Self {
        let points = positions.into_iter().map(|pos| Attractor { pos }).collect();
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn push(&mut self, pos: DVec2) {
        self.points.push(Attractor { pos });
    }

    pub fn extend(&mut self, positions: impl IntoIterator<Item = DVec2>) {
        self.points
            .extend(positions.into_iter().map(|pos| Attractor { pos }));
    }

    pub fn positions(&self) -> impl Iterator<Item = DVec2> + '_ {
        self.points.iter().map(|a| a.pos)
    }

    /// Rejection-samples `count` points inside `boundary`.
    ///
    /// Candidates are drawn uniformly from `bounds` and kept only when the
    /// boundary contains them. At most `max_attempts` candidates are drawn
    /// in total.
    ///
    /// ### Errors
    /// [`SimulationError::DegenerateSampling`] if `bounds` is empty, does not
    /// overlap the boundary, or the attempt budget runs out before `count`
    /// points were accepted.
    pub fn sample(
        boundary: &BoundaryShape,
        count: usize,
        bounds: Rect,
        rng: &mut impl Rng,
        max_attempts: u64,
    ) -> Result<Vec<DVec2>> {
        let degenerate = |accepted, attempts| SimulationError::DegenerateSampling {
            requested: count,
            accepted,
            attempts,
        };

        if count == 0 {
            return Ok(Vec::new());
        }
        if bounds.is_empty() || !bounds.intersects(&boundary.bounds()) {
            return Err(degenerate(0, 0));
        }

        let mut accepted = Vec::with_capacity(count);
        let mut attempts = 0u64;
        while accepted.len() < count {
            if attempts >= max_attempts {
                return Err(degenerate(accepted.len(), attempts));
            }
            attempts += 1;

            let p = bounds.random_point(rng);
            if boundary.contains(p) {
                accepted.push(p);
            }
        }
        Ok(accepted)
    }

    /// Removes every attractor closer than `removal_radius` to any node.
    ///
    /// Survivors keep their relative order. Returns the number removed.
    pub fn purge(&mut self, nodes: &[VeinNode], removal_radius: f64) -> usize {
        let before = self.points.len();
        self.points.retain(|a| {
            !nodes
                .iter()
                .any(|n| a.pos.distance(n.pos) < removal_radius)
        });
        before - self.points.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn triangle() -> BoundaryShape {
        BoundaryShape::from_vertices(vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(10.0, 0.0),
            DVec2::new(5.0, 10.0),
        ])
        .unwrap()
    }

    fn node_at(x: f64, y: f64) -> VeinNode {
        VeinNode::new_root(DVec2::new(x, y))
    }

    #[test]
    fn sample_returns_only_contained_points() {
        let boundary = triangle();
        let mut rng = StdRng::seed_from_u64(1);

        let pts =
            AttractorField::sample(&boundary, 200, Rect::from_size(10.0, 10.0), &mut rng, 100_000)
                .unwrap();

        assert_eq!(pts.len(), 200);
        assert!(pts.iter().all(|&p| boundary.contains(p)));
    }

    #[test]
    fn sample_zero_is_a_no_op() {
        let mut rng = StdRng::seed_from_u64(1);
        let pts = AttractorField::sample(&triangle(), 0, Rect::from_size(0.0, 0.0), &mut rng, 0)
            .unwrap();
        assert!(pts.is_empty());
    }

    #[test]
    fn sample_rejects_bounds_away_from_boundary() {
        let mut rng = StdRng::seed_from_u64(1);
        let far = Rect::new(DVec2::new(100.0, 100.0), DVec2::new(200.0, 200.0));

        let err = AttractorField::sample(&triangle(), 3, far, &mut rng, 1000).unwrap_err();
        assert_eq!(
            err,
            SimulationError::DegenerateSampling {
                requested: 3,
                accepted: 0,
                attempts: 0
            }
        );
    }

    #[test]
    fn sample_rejects_non_finite_bounds() {
        let mut rng = StdRng::seed_from_u64(1);
        let overflowing = Rect::new(DVec2::splat(-1e308), DVec2::splat(1e308));
        let unbounded = Rect::new(DVec2::ZERO, DVec2::new(f64::INFINITY, 600.0));

        for bounds in [overflowing, unbounded] {
            let err = AttractorField::sample(&triangle(), 2, bounds, &mut rng, 1000).unwrap_err();
            assert_eq!(
                err,
                SimulationError::DegenerateSampling {
                    requested: 2,
                    accepted: 0,
                    attempts: 0
                }
            );
        }
    }

    #[test]
    fn sample_gives_up_after_attempt_budget() {
        let mut rng = StdRng::seed_from_u64(1);
        // Overlaps the triangle's bounding box but lies entirely outside the triangle.
        let corner = Rect::new(DVec2::new(0.0, 9.0), DVec2::new(1.0, 10.0));

        let err = AttractorField::sample(&triangle(), 1, corner, &mut rng, 50).unwrap_err();
        assert_eq!(
            err,
            SimulationError::DegenerateSampling {
                requested: 1,
                accepted: 0,
                attempts: 50
            }
        );
    }

    #[test]
    fn purge_removes_attractor_on_node() {
        let mut field = AttractorField::from_positions(vec![DVec2::new(3.0, 4.0)]);
        let removed = field.purge(&[node_at(3.0, 4.0)], 1.0);

        assert_eq!(removed, 1);
        assert!(field.is_empty());
    }

    #[test]
    fn purge_keeps_attractors_at_exact_radius() {
        let mut field = AttractorField::from_positions(vec![
            DVec2::new(1.0, 0.0),
            DVec2::new(0.5, 0.0),
            DVec2::new(0.0, 2.0),
        ]);

        let removed = field.purge(&[node_at(0.0, 0.0)], 1.0);

        assert_eq!(removed, 1);
        let left: Vec<DVec2> = field.positions().collect();
        assert_eq!(left, vec![DVec2::new(1.0, 0.0), DVec2::new(0.0, 2.0)]);
    }

    #[test]
    fn purge_survivors_are_outside_every_radius() {
        let mut rng = StdRng::seed_from_u64(9);
        let area = Rect::from_size(50.0, 50.0);
        let mut field = AttractorField::from_positions(
            (0..300).map(|_| area.random_point(&mut rng)).collect(),
        );
        let nodes: Vec<VeinNode> = (0..10)
            .map(|_| VeinNode::new_root(area.random_point(&mut rng)))
            .collect();

        field.purge(&nodes, 6.0);

        for a in &field.points {
            for n in &nodes {
                assert!(a.pos.distance(n.pos) >= 6.0);
            }
        }
    }

    #[test]
    fn purge_without_nodes_keeps_everything() {
        let mut field = AttractorField::from_positions(vec![DVec2::ZERO, DVec2::ONE]);
        assert_eq!(field.purge(&[], 10.0), 0);
        assert_eq!(field.len(), 2);
    }
}
