use crate::error::{Result, SimulationError};
use crate::types::Rect;
use glam::DVec2;

/// Runtime-adjustable simulation and overlay settings.
///
/// The `show_*` flags are not read by the simulation itself; they travel
/// with the rest of the settings so a front end can edit everything in one
/// place.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Settings {
    /// Radius of a vein node. Growth steps are twice this long.
    pub node_radius: f64,
    /// Drawing radius of an attractor.
    pub attractor_radius: f64,
    /// Attractors closer than this to any node are removed.
    pub removal_radius: f64,
    pub attractors_per_step: usize,
    /// Rectangle that attractor candidates are drawn from.
    pub sampling_bounds: Rect,
    /// Candidate budget per requested attractor before sampling gives up.
    pub sample_attempts_per_point: u64,

    pub show_auxins: bool,
    pub show_direction: bool,
    pub show_removal_radius: bool,
    pub show_closest_assignment: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            node_radius: 2.0,
            attractor_radius: 3.0,
            removal_radius: 8.0,
            attractors_per_step: 1,
            sampling_bounds: Rect::from_size(400.0, 600.0),
            sample_attempts_per_point: 10_000,
            show_auxins: true,
            show_direction: true,
            show_removal_radius: false,
            show_closest_assignment: true,
        }
    }
}

impl Settings {
    /// Checks the values the simulation step depends on.
    pub fn validate(&self) -> Result<()> {
        let invalid = |name, reason| Err(SimulationError::InvalidSetting { name, reason });

        if !(self.node_radius > 0.0) {
            return invalid("node_radius", "must be positive");
        }
        if !(self.removal_radius > 0.0) {
            return invalid("removal_radius", "must be positive");
        }
        if self.attractors_per_step == 0 {
            return invalid("attractors_per_step", "must be at least 1");
        }
        if self.sample_attempts_per_point == 0 {
            return invalid("sample_attempts_per_point", "must be at least 1");
        }
        Ok(())
    }

    /// `true` when attractors can survive next to a freshly grown node,
    /// which keeps pulling it in place.
    pub fn may_stall(&self) -> bool {
        self.removal_radius <= self.node_radius
    }

    /// Total candidate budget for one sampling pass.
    pub fn sample_attempt_budget(&self) -> u64 {
        self.sample_attempts_per_point
            .saturating_mul(self.attractors_per_step as u64)
    }
}

/// Geometry of the leaf that veins grow in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LeafShape {
    /// Control points of the closed cubic Bézier outline.
    pub control_points: [DVec2; 4],
    pub vertex_count: usize,
    /// Position of the first vein node.
    pub origin: DVec2,
    pub canvas: Rect,
}

impl Default for LeafShape {
    fn default() -> Self {
        let (width, height) = (400.0, 600.0);
        let tip = DVec2::new(width / 2.0, height * 0.03);
        Self {
            control_points: [
                tip,
                DVec2::new(-300.0, height + 150.0),
                DVec2::new(width + 300.0, height + 150.0),
                tip,
            ],
            vertex_count: 30,
            origin: DVec2::new(width / 2.0, height * 7.0 / 8.0),
            canvas: Rect::from_size(width, height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(Settings::default().validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_non_positive_values() {
        let mut s = Settings::default();
        s.node_radius = 0.0;
        assert!(matches!(
            s.validate(),
            Err(SimulationError::InvalidSetting {
                name: "node_radius",
                ..
            })
        ));

        let mut s = Settings::default();
        s.removal_radius = f64::NAN;
        assert!(matches!(
            s.validate(),
            Err(SimulationError::InvalidSetting {
                name: "removal_radius",
                ..
            })
        ));

        let mut s = Settings::default();
        s.attractors_per_step = 0;
        assert!(s.validate().is_err());
    }

    #[test]
    fn may_stall_when_removal_does_not_exceed_node_radius() {
        let mut s = Settings::default();
        assert!(!s.may_stall());

        s.removal_radius = s.node_radius;
        assert!(s.may_stall());
        assert_eq!(s.validate(), Ok(()));
    }

    #[test]
    fn attempt_budget_scales_with_count() {
        let mut s = Settings::default();
        s.attractors_per_step = 4;
        s.sample_attempts_per_point = 25;
        assert_eq!(s.sample_attempt_budget(), 100);

        s.sample_attempts_per_point = u64::MAX;
        assert_eq!(s.sample_attempt_budget(), u64::MAX);
    }

    #[test]
    fn default_leaf_matches_canvas() {
        let leaf = LeafShape::default();
        assert_eq!(leaf.control_points[0], DVec2::new(200.0, 18.0));
        assert_eq!(leaf.control_points[0], leaf.control_points[3]);
        assert_eq!(leaf.origin, DVec2::new(200.0, 525.0));
        assert_eq!(leaf.canvas, Rect::from_size(400.0, 600.0));
    }
}
