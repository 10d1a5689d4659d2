use egui_macroquad::egui;
use neuro_racer::simulation::evolution::{Population, Trainer};

/// Width of the side panel; the world is drawn in the remaining area.
pub const STATS_PANEL_WIDTH: f32 = 260.0;

pub struct UIState {
    pub ticks_per_frame: u32,
    pub paused: bool,
    pub rendering_enabled: bool,
    pub status_message: Option<String>,
}

impl UIState {
    pub fn new(ticks_per_frame: u32) -> Self {
        Self {
            ticks_per_frame: ticks_per_frame.max(1),
            paused: false,
            rendering_enabled: true,
            status_message: None,
        }
    }
}

pub fn draw_ui(state: &mut UIState, trainer: &Trainer<Population>) {
    egui_macroquad::ui(|egui_ctx| {
        let mut visuals = egui::Visuals::dark();
        visuals.override_text_color = Some(egui::Color32::from_rgb(240, 240, 240));
        egui_ctx.set_visuals(visuals);

        super::stats::draw_stats_panel(egui_ctx, state, trainer);
    });
}

pub fn process_egui() {
    egui_macroquad::draw();
}
