//! Load dialog: open a JSON file, paste JSON text, or read it from the clipboard

use std::path::PathBuf;

use eframe::egui;
use tracing::info;

use crate::gui::constants::*;

/// Where the next document should come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadRequest {
    File(PathBuf),
    Text(String),
    Clipboard,
}

#[derive(Debug, Default)]
pub struct LoadDialog {
    open: bool,
    paste_text: String,
}

impl LoadDialog {
    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.paste_text.clear();
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn ui(&mut self, ctx: &egui::Context) -> Option<LoadRequest> {
        if !self.open {
            return None;
        }

        let mut request = None;
        let mut cancel = false;

        egui::Window::new("Load JSON")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    if ui.button("\u{1F4C2} Open File").clicked() {
                        let picked = rfd::FileDialog::new()
                            .add_filter("JSON", &["json"])
                            .set_title("Open JSON")
                            .pick_file();
                        match picked {
                            Some(path) => request = Some(LoadRequest::File(path)),
                            None => info!("File dialog cancelled"),
                        }
                    }
                    if ui.button("\u{1F4CB} From Clipboard").clicked() {
                        request = Some(LoadRequest::Clipboard);
                    }
                });

                ui.add_space(ITEM_SPACING);
                ui.label("Or paste JSON:");
                ui.add(
                    egui::TextEdit::multiline(&mut self.paste_text)
                        .code_editor()
                        .desired_rows(8)
                        .desired_width(f32::INFINITY),
                );
                ui.add_space(ITEM_SPACING);

                ui.horizontal(|ui| {
                    if ui.button("Load").clicked() {
                        request = Some(LoadRequest::Text(self.paste_text.clone()));
                    }
                    if ui.button("Cancel").clicked() {
                        cancel = true;
                    }
                });
            });

        if cancel {
            self.close();
        }
        request
    }
}
