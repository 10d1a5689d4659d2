// UI module - egui overlay for the training window

mod stats;
mod ui;

// Re-export the public interface
pub use ui::{STATS_PANEL_WIDTH, UIState, draw_ui, process_egui};
