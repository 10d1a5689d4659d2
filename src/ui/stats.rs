use egui_macroquad::egui;
use egui_plot::{Legend, Line, Plot, PlotPoints};
use neuro_racer::simulation::evolution::{Optimizer, Population, Trainer};
use neuro_racer::simulation::statistics::Statistics;

use super::ui::{STATS_PANEL_WIDTH, UIState};

pub(super) fn draw_stats_panel(
    egui_ctx: &egui::Context,
    state: &mut UIState,
    trainer: &Trainer<Population>,
) {
    let population = trainer.optimizer();
    let runner = trainer.runner();
    let params = trainer.params();

    egui::SidePanel::right("stats_panel")
        .exact_width(STATS_PANEL_WIDTH)
        .resizable(false)
        .show(egui_ctx, |ui| {
            ui.heading("Training");
            ui.separator();

            ui.horizontal(|ui| {
                let pause_text = if state.paused { "▶ Resume" } else { "⏸ Pause" };
                if ui.button(pause_text).clicked() {
                    state.paused = !state.paused;
                }
                let render_text = if state.rendering_enabled {
                    "🎨 Rendering: ON"
                } else {
                    "🎨 Rendering: OFF"
                };
                if ui.button(render_text).clicked() {
                    state.rendering_enabled = !state.rendering_enabled;
                }
            });

            ui.label("Ticks per frame");
            ui.add(egui::Slider::new(&mut state.ticks_per_frame, 1..=60));

            if let Some(ref msg) = state.status_message {
                ui.label(msg);
            }

            ui.separator();
            ui.label(format!(
                "Generation: {}/{}",
                population.generation() + 1,
                population.params().max_generations
            ));
            ui.label(format!("Tick: {}/{}", runner.ticks(), params.frame_cap));
            ui.label(format!("Alive: {}/{}", runner.alive(), runner.agents().len()));

            let leader = trainer
                .fitness()
                .iter()
                .map(|f| f.value)
                .fold(f64::NEG_INFINITY, f64::max);
            if leader.is_finite() {
                ui.label(format!("Leader fitness: {leader:.1}"));
            }

            let statistics = population.statistics();
            if let Some(last) = statistics.last() {
                ui.separator();
                ui.label(format!(
                    "Last generation: best {:.1}, mean {:.1} ± {:.1}",
                    last.best, last.mean, last.stdev
                ));
            }
            if let Some(best) = statistics.best_ever() {
                ui.label(format!("Best ever: {best:.1}"));
            }

            ui.separator();
            draw_fitness_plot(ui, statistics);
        });
}

fn draw_fitness_plot(ui: &mut egui::Ui, statistics: &Statistics) {
    if statistics.history().is_empty() {
        ui.label("Waiting for the first generation...");
        return;
    }

    Plot::new("fitness_plot")
        .height(180.0)
        .show_axes([true, true])
        .legend(Legend::default())
        .label_formatter(|name, value| {
            format!("{}\nGeneration: {:.0}\nFitness: {:.1}", name, value.x, value.y)
        })
        .show(ui, |plot_ui| {
            let best: PlotPoints = statistics.best_series().into();
            plot_ui.line(
                Line::new(best)
                    .color(egui::Color32::from_rgb(255, 100, 100))
                    .name("Best"),
            );

            let mean: PlotPoints = statistics.mean_series().into();
            plot_ui.line(
                Line::new(mean)
                    .color(egui::Color32::from_rgb(100, 150, 255))
                    .name("Mean"),
            );
        });
}
