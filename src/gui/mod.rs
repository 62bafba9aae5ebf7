//! Floating always-on-top panel built with egui/eframe

pub mod color;
pub mod components;
pub mod constants;
pub mod panel;

pub use panel::run_panel;
