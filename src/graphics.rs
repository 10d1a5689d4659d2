use geo::Point;
use macroquad::prelude::*;
use neuro_racer::simulation::agent::Agent;
use neuro_racer::simulation::params::Params;

use crate::ui::STATS_PANEL_WIDTH;

const RAY_COLOR: Color = Color::new(0.0, 1.0, 0.0, 1.0);
const AGENT_COLOR: Color = Color::new(0.85, 0.1, 0.1, 1.0);

/// Screen width left of the stats panel.
fn view_width() -> f32 {
    (screen_width() - STATS_PANEL_WIDTH).max(1.0)
}

/// World to screen scaling. The panel-free area of the window shows the whole world.
trait ToScreen {
    type Output;
    fn to_screen(&self, params: &Params) -> Self::Output;
}

impl ToScreen for Point<f32> {
    type Output = Vec2;
    fn to_screen(&self, params: &Params) -> Vec2 {
        vec2(
            self.x() * view_width() / params.world_width,
            self.y() * screen_height() / params.world_height,
        )
    }
}

impl ToScreen for f32 {
    type Output = f32;
    fn to_screen(&self, params: &Params) -> f32 {
        let scale_x = view_width() / params.world_width;
        let scale_y = screen_height() / params.world_height;
        self * scale_x.min(scale_y)
    }
}

pub fn draw_track(texture: &Texture2D) {
    draw_texture_ex(
        texture,
        0.0,
        0.0,
        WHITE,
        DrawTextureParams {
            dest_size: Some(vec2(view_width(), screen_height())),
            ..Default::default()
        },
    );
}

pub fn draw_agents(agents: &[Agent], params: &Params) {
    let size = params.agent_size.to_screen(params);

    for agent in agents.iter().filter(|a| a.alive) {
        let center = agent.center(params).to_screen(params);

        draw_rectangle_ex(
            center.x,
            center.y,
            size,
            size * 0.5,
            DrawRectangleParams {
                offset: vec2(0.5, 0.5),
                rotation: agent.heading.to_radians(),
                color: AGENT_COLOR,
            },
        );

        for end in agent.sensor_endpoints(params) {
            let end = end.to_screen(params);
            draw_line(center.x, center.y, end.x, end.y, 1.0, RAY_COLOR);
            draw_circle(end.x, end.y, 3.0, RAY_COLOR);
        }
    }
}

pub fn draw_alive_count(alive: usize) {
    draw_text(&format!("Alive: {alive}"), 10.0, 26.0, 26.0, BLACK);
}
