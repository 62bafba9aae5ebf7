//! Main panel: owns the sequence controller and renders its snapshots

use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use eframe::{egui, CreationContext, NativeOptions};
use serde_json::Value;
use tracing::{error, info, warn};

use super::components::array_picker::{ArrayPicker, PickerOutcome};
use super::components::load_dialog::{LoadDialog, LoadRequest};
use super::components::record_list::{self, RecordListState};
use super::components::settings_panel::SettingsPanel;
use super::constants::*;
use crate::clipboard::SystemClipboard;
use crate::config::{DisplayPreferences, SessionConfig};
use crate::dispatch::{dispatch, Action};
use crate::error::LoadError;
use crate::hotkeys::HotkeyCommand;
use crate::record::Record;
use crate::resolver::{self, Resolution};
use crate::sequence::{CopyOutcome, SequenceController};
use crate::view::row_views;

struct StatusMessage {
    text: String,
    color: egui::Color32,
}

struct PanelApp {
    controller: SequenceController,
    clipboard: SystemClipboard,
    prefs: DisplayPreferences,
    /// `None` when global hotkeys are unavailable; the panel then reads the
    /// same shortcuts from its own input while focused
    hotkeys: Option<Receiver<HotkeyCommand>>,
    load_dialog: LoadDialog,
    picker: Option<ArrayPicker>,
    settings: SettingsPanel,
    record_list: RecordListState,
    status_message: Option<StatusMessage>,
    copied_at: Option<Instant>,
    applied_dark_mode: Option<bool>,
}

impl PanelApp {
    fn new(_cc: &CreationContext<'_>, hotkeys: Option<Receiver<HotkeyCommand>>, initial_file: Option<PathBuf>) -> Self {
        info!("Initializing panel");

        let mut app = Self {
            controller: SequenceController::default(),
            clipboard: SystemClipboard::new(),
            prefs: DisplayPreferences::load(),
            hotkeys,
            load_dialog: LoadDialog::default(),
            picker: None,
            settings: SettingsPanel::default(),
            record_list: RecordListState::default(),
            status_message: None,
            copied_at: None,
            applied_dark_mode: None,
        };

        if let Some(path) = initial_file {
            app.load(LoadRequest::File(path));
        }

        app
    }

    fn set_status(&mut self, text: impl Into<String>, color: egui::Color32) {
        self.status_message = Some(StatusMessage {
            text: text.into(),
            color,
        });
    }

    fn report_load_error(&mut self, err: &LoadError) {
        warn!(error = %err, "Load failed");
        self.set_status(err.to_string(), STATUS_ERROR);
    }

    /// Read a document from the requested source; true once records are
    /// installed or the array picker is showing
    fn load(&mut self, request: LoadRequest) -> bool {
        let document = match request {
            LoadRequest::File(path) => resolver::load_path(&path),
            LoadRequest::Text(text) => resolver::parse_document(&text),
            LoadRequest::Clipboard => match self.clipboard.get_text() {
                Ok(text) => resolver::parse_document(&text),
                Err(e) => {
                    warn!(error = ?e, "Failed to read clipboard");
                    self.set_status("Clipboard is empty or unreadable", STATUS_ERROR);
                    return false;
                }
            },
        };

        match document {
            Ok(document) => self.accept_document(document),
            Err(e) => {
                self.report_load_error(&e);
                false
            }
        }
    }

    fn accept_document(&mut self, document: Value) -> bool {
        match resolver::resolve(&document) {
            Ok(Resolution::Ready { config, records }) => {
                self.install(records, config);
                true
            }
            Ok(Resolution::NeedsSelection { candidates }) => {
                info!(candidates = candidates.len(), "Document needs array selection");
                self.picker = Some(ArrayPicker::new(document, candidates));
                true
            }
            Err(e) => {
                self.report_load_error(&e);
                false
            }
        }
    }

    fn install(&mut self, records: Vec<Record>, config: SessionConfig) {
        let count = records.len();
        self.controller.load(records, config);
        self.record_list = RecordListState::default();
        self.settings.close();
        let (outcome, _) = self.controller.copy_current_value(&mut self.clipboard);
        self.note_copy(outcome);
        if count == 0 {
            self.set_status("Loaded, but the array is empty", STATUS_WARN);
        } else {
            self.set_status(format!("Loaded {count} records"), STATUS_OK);
        }
    }

    fn note_copy(&mut self, outcome: CopyOutcome) {
        match outcome {
            CopyOutcome::Copied(_) => self.copied_at = Some(Instant::now()),
            CopyOutcome::Failed => self.set_status("Clipboard unavailable", STATUS_ERROR),
            CopyOutcome::NothingToCopy => {}
        }
    }

    fn run(&mut self, action: Action) {
        match dispatch(&mut self.controller, &mut self.clipboard, &self.prefs, action) {
            Ok(Some(outcome)) => self.note_copy(outcome),
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, "Action failed");
                self.set_status(e.to_string(), STATUS_ERROR);
            }
        }
    }

    fn poll_hotkeys(&mut self) {
        let commands: Vec<HotkeyCommand> = match &self.hotkeys {
            Some(rx) => rx.try_iter().collect(),
            None => return,
        };
        for command in commands {
            info!(command = ?command, "Received hotkey command");
            self.run(command.into());
        }
    }

    fn handle_local_shortcuts(&mut self, ctx: &egui::Context) {
        if self.load_dialog.is_open() || self.picker.is_some() {
            return;
        }
        let commands: Vec<HotkeyCommand> = ctx.input(|i| {
            i.events
                .iter()
                .filter_map(|event| match event {
                    egui::Event::Key {
                        key,
                        pressed: true,
                        repeat: false,
                        modifiers,
                        ..
                    } => local_command(*key, modifiers.ctrl || modifiers.command),
                    _ => None,
                })
                .collect()
        });
        for command in commands {
            self.run(command.into());
        }
    }

    fn apply_visuals(&mut self, ctx: &egui::Context) {
        if self.applied_dark_mode != Some(self.prefs.dark_mode) {
            ctx.set_visuals(if self.prefs.dark_mode {
                egui::Visuals::dark()
            } else {
                egui::Visuals::light()
            });
            self.applied_dark_mode = Some(self.prefs.dark_mode);
        }
    }

    fn open_settings(&mut self) {
        let fields = self
            .controller
            .records()
            .first()
            .map(Record::field_names)
            .unwrap_or_default();
        self.settings.open(self.controller.config(), fields);
    }

    fn header_ui(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.horizontal(|ui| {
            let title = ui.add(
                egui::Label::new(egui::RichText::new(APP_TITLE).strong())
                    .sense(egui::Sense::click_and_drag()),
            );
            if title.drag_started() {
                ctx.send_viewport_cmd(egui::ViewportCommand::StartDrag);
            }

            let state = self.controller.state();
            let counter = if self.controller.is_empty() {
                "0/0".to_string()
            } else {
                format!("{}/{}", state.record_index + 1, self.controller.total())
            };
            ui.weak(counter);

            let flashing = self
                .copied_at
                .is_some_and(|at| at.elapsed() < Duration::from_millis(COPY_FLASH_MS));
            if flashing {
                ui.colored_label(STATUS_OK, "\u{2714} Copied");
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.small_button("\u{2715}").on_hover_text("Close").clicked() {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
                if ui.small_button("\u{2013}").on_hover_text("Minimize").clicked() {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Minimized(true));
                }
                if ui.small_button("\u{2699}").on_hover_text("Settings").clicked() {
                    if self.settings.is_open() {
                        self.settings.close();
                    } else {
                        self.open_settings();
                    }
                }
                if ui.small_button("\u{1F4C2}").on_hover_text("Load JSON").clicked() {
                    self.load_dialog.open();
                }
            });
        });
    }

    fn copy_indicator_ui(&self, ui: &mut egui::Ui) {
        let Some(preview) = self.controller.copy_preview() else {
            return;
        };
        ui.group(|ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.weak(format!("{}/{}", preview.position, preview.count));
                ui.label(egui::RichText::new(truncate(&preview.current.value, PREVIEW_MAX_CHARS)).strong())
                    .on_hover_text(format!("{}: {}", preview.current.field, preview.current.value));
            });
            if let Some(next) = &preview.next {
                ui.horizontal(|ui| {
                    ui.weak("next");
                    ui.weak(truncate(&next.value, PREVIEW_MAX_CHARS))
                        .on_hover_text(format!("{}: {}", next.field, next.value));
                });
            }
        });
    }

    fn status_ui(&mut self, ui: &mut egui::Ui) {
        let mut dismiss = false;
        if let Some(message) = &self.status_message {
            ui.horizontal(|ui| {
                ui.colored_label(message.color, &message.text);
                if ui.small_button("\u{00D7}").clicked() {
                    dismiss = true;
                }
            });
        }
        if dismiss {
            self.status_message = None;
        }
    }

    fn body_ui(&mut self, ui: &mut egui::Ui) {
        if self.settings.is_open() {
            let outcome = self.settings.ui(ui, &mut self.prefs);
            if outcome.prefs_changed {
                self.prefs.validate_and_clamp();
                if let Err(e) = self.prefs.save() {
                    error!(error = ?e, "Failed to save preferences");
                    self.set_status(format!("Failed to save preferences: {e}"), STATUS_ERROR);
                }
            }
            if let Some(patch) = outcome.apply {
                self.run(Action::ApplySettings(patch));
            }
            return;
        }

        if self.controller.is_empty() {
            ui.add_space(SECTION_SPACING);
            ui.vertical_centered(|ui| {
                ui.label("No data loaded");
                ui.add_space(ITEM_SPACING);
                if ui.button("\u{1F4C2} Load JSON").clicked() {
                    self.load_dialog.open();
                }
                ui.add_space(ITEM_SPACING);
                ui.label(egui::RichText::new("F9: copy and advance").small().weak());
                ui.label(egui::RichText::new("Ctrl+\u{2191}/\u{2193}: rows  Ctrl+\u{2190}/\u{2192}: fields").small().weak());
            });
            return;
        }

        let rows = row_views(&self.controller.snapshot());
        let actions = record_list::ui(ui, &rows, f32::from(self.prefs.font_size), &mut self.record_list);
        for action in actions {
            self.run(action);
        }
    }

    fn dialogs_ui(&mut self, ctx: &egui::Context) {
        if let Some(request) = self.load_dialog.ui(ctx) {
            if self.load(request) {
                self.load_dialog.close();
            }
        }

        let outcome = match self.picker.as_mut() {
            Some(picker) => picker.ui(ctx),
            None => return,
        };
        match outcome {
            PickerOutcome::Pending => {}
            PickerOutcome::Cancel => {
                info!("Array selection cancelled");
                self.picker = None;
            }
            PickerOutcome::Apply(selection) => {
                let Some(picker) = self.picker.take() else {
                    return;
                };
                let (document, candidates) = picker.into_parts();
                match resolver::apply_user_selection(&document, &candidates, selection) {
                    Ok(Resolution::Ready { config, records }) => self.install(records, config),
                    Ok(Resolution::NeedsSelection { .. }) => {
                        warn!("Array selection did not resolve the document");
                    }
                    Err(e) => self.report_load_error(&e),
                }
            }
        }
    }
}

impl eframe::App for PanelApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_hotkeys();
        if self.hotkeys.is_none() {
            self.handle_local_shortcuts(ctx);
        }
        self.apply_visuals(ctx);

        let opacity = f32::from(self.prefs.opacity_percent) / 100.0;
        let frame = egui::Frame::central_panel(&ctx.style()).fill(ctx.style().visuals.panel_fill.gamma_multiply(opacity));

        egui::CentralPanel::default().frame(frame).show(ctx, |ui| {
            self.header_ui(ui, ctx);
            ui.separator();
            self.copy_indicator_ui(ui);
            self.status_ui(ui);
            ui.add_space(ROW_SPACING);
            self.body_ui(ui);
        });

        self.dialogs_ui(ctx);

        // Hotkeys arrive from other threads while the window is unfocused
        ctx.request_repaint_after(Duration::from_millis(HOTKEY_POLL_INTERVAL_MS));
    }

    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        [0.0, 0.0, 0.0, 0.0]
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Panel exiting");
    }
}

/// In-window equivalent of the global hotkeys
fn local_command(key: egui::Key, ctrl: bool) -> Option<HotkeyCommand> {
    match (key, ctrl) {
        (egui::Key::F9, _) => Some(HotkeyCommand::Advance),
        (egui::Key::ArrowUp, true) => Some(HotkeyCommand::PrevRecord),
        (egui::Key::ArrowDown, true) => Some(HotkeyCommand::NextRecord),
        (egui::Key::ArrowLeft, true) => Some(HotkeyCommand::PrevField),
        (egui::Key::ArrowRight, true) => Some(HotkeyCommand::NextField),
        (egui::Key::Space, true) => Some(HotkeyCommand::QuickAdvance),
        _ => None,
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
        cut.push('\u{2026}');
        cut
    }
}

pub fn run_panel(hotkeys: Option<Receiver<HotkeyCommand>>, initial_file: Option<PathBuf>) -> Result<()> {
    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([WINDOW_WIDTH, WINDOW_HEIGHT])
            .with_min_inner_size([WINDOW_MIN_WIDTH, WINDOW_MIN_HEIGHT])
            .with_decorations(false)
            .with_transparent(true)
            .with_window_level(egui::viewport::WindowLevel::AlwaysOnTop)
            .with_title(APP_TITLE),
        ..Default::default()
    };

    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(move |cc| Ok(Box::new(PanelApp::new(cc, hotkeys, initial_file)))),
    )
    .map_err(|err| anyhow!("Failed to launch panel: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_shortcuts_match_global_hotkeys() {
        assert_eq!(local_command(egui::Key::F9, false), Some(HotkeyCommand::Advance));
        assert_eq!(local_command(egui::Key::ArrowDown, true), Some(HotkeyCommand::NextRecord));
        assert_eq!(local_command(egui::Key::Space, true), Some(HotkeyCommand::QuickAdvance));
        assert_eq!(local_command(egui::Key::ArrowDown, false), None);
        assert_eq!(local_command(egui::Key::A, true), None);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd\u{2026}");
        assert_eq!(truncate("ééééé", 5), "ééééé");
    }
}
