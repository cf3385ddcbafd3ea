//! Interactive leaf venation viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns the simulation state
//! (leaf boundary, vein network, attractors, settings) and implements
//! [`eframe::App`] to render and drive the simulation through an egui UI.

use eframe::App;
use egui::Color32;
use glam::DVec2;
use log::{debug, error};
use rand::rng;
use vein_core::{LeafShape, Settings, SimulationError, SimulationState, types::NodeId};

/// Steps performed by the fast-forward button.
const FAST_FORWARD_STEPS: usize = 500;
/// Screen length of a growth direction arrow at zoom 1.
const DIRECTION_LENGTH: f32 = 20.0;

const BACKGROUND_COLOR: Color32 = Color32::from_rgb(107, 142, 35);
const LEAF_COLOR: Color32 = Color32::from_rgb(0, 100, 0);
const VEIN_COLOR: Color32 = Color32::from_rgb(50, 205, 50);
const VEIN_CORE_COLOR: Color32 = Color32::from_rgb(173, 255, 47);
const AUXIN_COLOR: Color32 = Color32::RED;
const DIRECTION_COLOR: Color32 = Color32::from_rgb(128, 0, 128);
/// Nodes grown by the most recent step.
const NEW_VEIN_COLOR: Color32 = Color32::from_rgb(255, 215, 0);

/// Main application state for the interactive viewer.
///
/// [`Viewer`] glues together:
/// - The simulation core: [`SimulationState`] and its [`Settings`].
/// - The leaf geometry the simulation is (re)built from.
/// - View state (pan/zoom) and the last error, shown in the status bar.
///
/// Nothing advances on its own: every step comes from the Step button,
/// the space key or the fast-forward button.
pub struct Viewer {
    state: SimulationState,
    leaf: LeafShape,
    settings: Settings,

    rng: rand::rngs::ThreadRng,

    zoom: f32,
    pan: egui::Vec2,

    feedback: Option<String>,
}

impl Viewer {
    /// Creates a viewer for the default leaf with a single seed node.
    ///
    /// ### Errors
    /// Returns an error if the default leaf outline cannot be built.
    pub fn new() -> Result<Self, SimulationError> {
        let leaf = LeafShape::default();
        let state = SimulationState::from_leaf(&leaf)?;

        Ok(Self {
            state,
            leaf,
            settings: Settings::default(),
            rng: rng(),
            zoom: 1.0,
            pan: egui::vec2(0.0, 0.0),
            feedback: None,
        })
    }

    /// Rebuilds the simulation from the leaf geometry, keeping settings
    /// and camera.
    fn reset(&mut self) {
        match SimulationState::from_leaf(&self.leaf) {
            Ok(state) => {
                self.state = state;
                self.feedback = None;
            }
            Err(e) => self.report_error(e),
        }
    }

    /// Runs `count` simulation steps with the current settings.
    ///
    /// On failure the steps completed so far are kept and the error is
    /// shown in the status bar.
    fn run_steps(&mut self, count: usize) {
        match self.state.advance(count, &self.settings, &mut self.rng) {
            Ok(report) => {
                debug!("ran {} steps: {report:?}", report.steps);
                self.feedback = None;
            }
            Err(e) => self.report_error(e),
        }
    }

    fn report_error(&mut self, e: SimulationError) {
        error!("simulation stopped: {e}");
        self.feedback = Some(e.to_string());
    }

    /// Converts a leaf-space position to screen-space.
    ///
    /// The leaf canvas is centered in `rect`, scaled by `zoom` and offset
    /// by `pan`. Both spaces have y pointing down.
    fn world_to_screen(&self, p: DVec2, rect: egui::Rect) -> egui::Pos2 {
        let local = p - self.leaf.canvas.center();
        rect.center() + egui::vec2(local.x as f32, local.y as f32) * self.zoom + self.pan
    }

    /// Inverse of [`Viewer::world_to_screen`], up to rounding.
    fn screen_to_world(&self, p: egui::Pos2, rect: egui::Rect) -> DVec2 {
        let local = (p - rect.center() - self.pan) / self.zoom;
        self.leaf.canvas.center() + DVec2::new(local.x as f64, local.y as f64)
    }

    /// Builds the top panel UI (stepping, reset, zoom).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Step").clicked() {
                    self.run_steps(1);
                }

                if ui
                    .button(format!("⏩ Fast-forward ×{FAST_FORWARD_STEPS}"))
                    .clicked()
                {
                    self.run_steps(FAST_FORWARD_STEPS);
                }

                if ui.button("Reset").clicked() {
                    self.reset();
                }

                ui.separator();
                ui.add(egui::Slider::new(&mut self.zoom, 0.1..=10.0).text("Zoom"));
                ui.label("Space: step");
            });
        });
    }

    /// Builds the bottom status bar (counters and the last error).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("steps = {}", self.state.steps()));
                ui.label(format!("attractors = {}", self.state.attractors().len()));
                ui.label(format!("nodes = {}", self.state.nodes().len()));
                if let Some(msg) = &self.feedback {
                    ui.separator();
                    ui.colored_label(Color32::LIGHT_RED, msg);
                }
            });
        });
    }

    /// Builds the right-hand panel for simulation settings and overlays.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Settings");

                ui.separator();
                ui.label("Radii");
                ui.add(egui::Slider::new(&mut self.settings.node_radius, 0.5..=20.0).text("vein"));
                ui.add(
                    egui::Slider::new(&mut self.settings.attractor_radius, 0.5..=20.0)
                        .text("auxin"),
                );
                ui.add(
                    egui::Slider::new(&mut self.settings.removal_radius, 0.5..=100.0)
                        .text("removal"),
                );

                ui.separator();
                ui.label("Sampling");
                ui.add(
                    egui::Slider::new(&mut self.settings.attractors_per_step, 1..=50)
                        .text("auxins / step"),
                );

                ui.separator();
                ui.label("Overlays");
                ui.checkbox(&mut self.settings.show_auxins, "Show auxins");
                ui.checkbox(&mut self.settings.show_removal_radius, "Show removal radius");
                ui.checkbox(&mut self.settings.show_closest_assignment, "Show closest node");
                ui.checkbox(&mut self.settings.show_direction, "Show direction");

                ui.separator();
                if ui.button("Reset settings to default").clicked() {
                    self.settings = Settings::default();
                }
            });
    }

    /// Builds the central panel where the leaf is drawn and panned/zoomed.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(BACKGROUND_COLOR))
            .show(ctx, |ui| {
                let response = ui.allocate_response(ui.available_size(), egui::Sense::drag());
                let rect = response.rect;
                let painter = ui.painter_at(rect);

                if response.dragged() {
                    self.pan += response.drag_delta();
                }

                // Zoom around the mouse cursor.
                let scroll = ui.ctx().input(|i| i.raw_scroll_delta.y);
                if scroll != 0.0 {
                    let pointer_screen = response.hover_pos().unwrap_or(rect.center());
                    let world_before = self.screen_to_world(pointer_screen, rect);

                    let factor = (1.0 + scroll * 0.001).clamp(0.5, 2.0);
                    self.zoom = (self.zoom * factor).clamp(0.1, 10.0);

                    let screen_after = self.world_to_screen(world_before, rect);
                    self.pan += pointer_screen - screen_after;
                }

                self.paint(&painter, rect);
            });
    }

    /// Fill color of a vein node; nodes from the latest step stand out.
    fn node_color(&self, id: NodeId) -> Color32 {
        if self.state.last_new_ids().contains(&id) {
            NEW_VEIN_COLOR
        } else {
            VEIN_COLOR
        }
    }

    /// Draws the leaf, attractors, veins and the enabled overlays.
    fn paint(&self, painter: &egui::Painter, rect: egui::Rect) {
        let to_screen = |p: DVec2| self.world_to_screen(p, rect);
        let scale = |r: f64| r as f32 * self.zoom;

        let outline: Vec<egui::Pos2> = self
            .state
            .boundary()
            .vertices()
            .iter()
            .map(|&v| to_screen(v))
            .collect();
        painter.add(leaf_shape(outline, self.state.boundary().is_convex()));

        if self.settings.show_auxins {
            for a in self.state.attractors() {
                let p = to_screen(a.pos);
                painter.circle_filled(p, scale(self.settings.attractor_radius), AUXIN_COLOR);
                if self.settings.show_removal_radius {
                    painter.circle_stroke(
                        p,
                        scale(self.settings.removal_radius),
                        egui::Stroke::new(2.0, AUXIN_COLOR),
                    );
                }
            }
        }

        let nodes = self.state.nodes();
        for node in nodes {
            if let Some(parent) = node.parent {
                painter.line_segment(
                    [to_screen(nodes[parent].pos), to_screen(node.pos)],
                    egui::Stroke::new(scale(self.settings.node_radius), VEIN_COLOR),
                );
            }
        }

        for (id, node) in nodes.iter().enumerate() {
            let p = to_screen(node.pos);
            painter.circle_filled(p, scale(self.settings.node_radius), self.node_color(id));
            painter.circle_filled(p, scale(self.settings.node_radius / 2.0), VEIN_CORE_COLOR);

            if self.settings.show_closest_assignment {
                for a in self.state.assigned_attractors(id) {
                    painter.line_segment([p, to_screen(a)], egui::Stroke::new(1.0, AUXIN_COLOR));
                }
            }

            if self.settings.show_direction && node.is_growing() {
                let d = node.direction * (DIRECTION_LENGTH * self.zoom) as f64;
                painter.arrow(
                    p,
                    egui::vec2(d.x as f32, d.y as f32),
                    egui::Stroke::new(3.0, DIRECTION_COLOR),
                );
            }
        }
    }
}

/// Leaf outline as an egui shape.
///
/// egui only fills convex polygons correctly, so other outlines are
/// stroked instead of filled.
fn leaf_shape(outline: Vec<egui::Pos2>, convex: bool) -> egui::Shape {
    if convex {
        egui::Shape::convex_polygon(outline, LEAF_COLOR, egui::Stroke::NONE)
    } else {
        egui::Shape::closed_line(outline, egui::Stroke::new(2.0, LEAF_COLOR))
    }
}

impl App for Viewer {
    /// eframe callback that handles keyboard input and builds all panels
    /// for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.key_pressed(egui::Key::Space)) {
            self.run_steps(1);
        }

        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
    }
}
