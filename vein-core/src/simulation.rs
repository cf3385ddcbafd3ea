//! Simulation state and the discrete growth step.
//!
//! One call to [`SimulationState::step`] runs:
//! 1. sampling — new attractors are rejection-sampled inside the boundary;
//! 2. purging — attractors within the removal radius of a node are removed;
//! 3. assignment — every attractor is assigned to its nearest node;
//! 4. directions — every node averages the pull of its attractors;
//! 5. growth — every pulled node spawns one child;
//! 6. assignment and directions again, so they reflect the new nodes.

use crate::{
    assignment::Assignment,
    attractor::{Attractor, AttractorField},
    boundary::BoundaryShape,
    config::{LeafShape, Settings},
    error::Result,
    network::{VeinNetwork, VeinNode, assign_closest},
    types::NodeId,
};
use glam::DVec2;
use log::{debug, info, warn};
use rand::Rng;

/// Counts produced by one or more simulation steps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepReport {
    pub steps: usize,
    pub sampled: usize,
    pub purged: usize,
    pub grown: usize,
    /// Node total after the last step.
    pub nodes: usize,
    /// Active attractor total after the last step.
    pub attractors: usize,
}

impl StepReport {
    /// Folds a later report into this one.
    pub fn merge(&mut self, later: &StepReport) {
        self.steps += later.steps;
        self.sampled += later.sampled;
        self.purged += later.purged;
        self.grown += later.grown;
        self.nodes = later.nodes;
        self.attractors = later.attractors;
    }
}

/// Everything the simulation mutates, owned in one place.
#[derive(Clone, Debug)]
pub struct SimulationState {
    boundary: BoundaryShape,
    network: VeinNetwork,
    field: AttractorField,
    assignment: Assignment,
    last_new_ids: Vec<NodeId>,
    steps: u64,
}

impl SimulationState {
    /// Builds the boundary from a closed Bézier and seeds one node at `origin`.
    pub fn initialize(
        control_points: &[DVec2; 4],
        vertex_count: usize,
        origin: DVec2,
    ) -> Result<Self> {
        let boundary = BoundaryShape::build(control_points, vertex_count)?;
        Ok(Self::new(boundary, origin))
    }

    pub fn from_leaf(leaf: &LeafShape) -> Result<Self> {
        Self::initialize(&leaf.control_points, leaf.vertex_count, leaf.origin)
    }

    pub fn new(boundary: BoundaryShape, origin: DVec2) -> Self {
        if !boundary.contains(origin) {
            warn!("seed node {origin} lies outside the boundary");
        }
        info!(
            "initialized simulation: {} boundary vertices, seed at {origin}",
            boundary.vertices().len()
        );

        let network = VeinNetwork::new(origin);
        let assignment = Assignment::with_len(network.len(), 0);
        Self {
            boundary,
            network,
            field: AttractorField::new(),
            assignment,
            last_new_ids: Vec::new(),
            steps: 0,
        }
    }

    /// Advances the simulation by a single step.
    ///
    /// ### Errors
    /// Fails on invalid settings or when sampling cannot place the requested
    /// attractors. In both cases the state is left unchanged.
    pub fn step(&mut self, settings: &Settings, rng: &mut impl Rng) -> Result<StepReport> {
        check_settings(settings)?;
        self.step_unchecked(settings, rng)
    }

    /// Runs `count` steps back to back, stopping at the first error.
    ///
    /// Settings are checked once up front, so nothing runs when they are
    /// invalid.
    pub fn advance(
        &mut self,
        count: usize,
        settings: &Settings,
        rng: &mut impl Rng,
    ) -> Result<StepReport> {
        check_settings(settings)?;

        let mut total = StepReport {
            nodes: self.network.len(),
            attractors: self.field.len(),
            ..StepReport::default()
        };
        for _ in 0..count {
            let report = self.step_unchecked(settings, rng)?;
            total.merge(&report);
        }
        Ok(total)
    }

    fn step_unchecked(&mut self, settings: &Settings, rng: &mut impl Rng) -> Result<StepReport> {
        let sampled = AttractorField::sample(
            &self.boundary,
            settings.attractors_per_step,
            settings.sampling_bounds,
            rng,
            settings.sample_attempt_budget(),
        )
        .inspect_err(|e| warn!("step {} aborted: {e}", self.steps + 1))?;

        let sampled_count = sampled.len();
        self.field.extend(sampled);

        let purged = self.field.purge(&self.network.nodes, settings.removal_radius);

        self.refresh();
        let new_ids = self.network.grow(settings.node_radius);
        self.refresh();

        self.steps += 1;
        let report = StepReport {
            steps: 1,
            sampled: sampled_count,
            purged,
            grown: new_ids.len(),
            nodes: self.network.len(),
            attractors: self.field.len(),
        };
        self.last_new_ids = new_ids;

        debug!("step {}: {report:?}", self.steps);
        Ok(report)
    }

    /// Recomputes the nearest-node assignment and every growth direction.
    pub fn refresh(&mut self) {
        self.assignment = assign_closest(&self.network.nodes, &self.field.points);
        self.network
            .compute_directions(&self.assignment, &self.field.points);
    }

    /// Places an attractor directly, bypassing sampling and the boundary.
    pub fn insert_attractor(&mut self, pos: DVec2) {
        self.field.push(pos);
        self.refresh();
    }

    /// Removes reached attractors without sampling or growing.
    pub fn purge(&mut self, removal_radius: f64) -> usize {
        let purged = self.field.purge(&self.network.nodes, removal_radius);
        self.refresh();
        purged
    }

    pub fn boundary(&self) -> &BoundaryShape {
        &self.boundary
    }

    pub fn nodes(&self) -> &[VeinNode] {
        &self.network.nodes
    }

    pub fn network(&self) -> &VeinNetwork {
        &self.network
    }

    pub fn attractors(&self) -> &[Attractor] {
        &self.field.points
    }

    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    /// Positions of the attractors currently pulling on `node`.
    pub fn assigned_attractors(&self, node: NodeId) -> impl Iterator<Item = DVec2> + '_ {
        self.assignment
            .attractors_of(node)
            .iter()
            .map(|&a| self.field.points[a].pos)
    }

    /// Nodes created by the most recent step.
    pub fn last_new_ids(&self) -> &[NodeId] {
        &self.last_new_ids
    }

    /// Number of completed steps.
    pub fn steps(&self) -> u64 {
        self.steps
    }
}

/// Validates `settings` and warns about values that stall growth.
fn check_settings(settings: &Settings) -> Result<()> {
    settings.validate()?;
    if settings.may_stall() {
        warn!(
            "removal radius {} does not exceed node radius {}; growth may not converge",
            settings.removal_radius, settings.node_radius
        );
    }
    Ok(())
}
