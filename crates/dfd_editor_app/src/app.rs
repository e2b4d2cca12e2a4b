// SPDX-License-Identifier: MIT OR Apache-2.0
//! The editor application: panel layout, menus, and hotkeys.

use crate::canvas::DiagramCanvas;
use crate::commands;
use crate::panels::{HelpOverlay, LabelTypeEditor, ToolPalette};
use crate::state::EditorState;
use crate::tools::{EdgeDraft, Tool};
use egui::{Key, KeyboardShortcut, Modifiers};

const SAVE: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::S);
const SAVE_AS: KeyboardShortcut =
    KeyboardShortcut::new(Modifiers::COMMAND.plus(Modifiers::SHIFT), Key::S);
const OPEN: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::O);
const NEW: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::N);

/// The top-level application.
pub struct EditorApp {
    state: EditorState,
    tool: Tool,
    edge_draft: EdgeDraft,
    canvas: DiagramCanvas,
    show_label_editor: bool,
    show_help: bool,
    window_title: String,
}

impl EditorApp {
    /// Create the application with the default diagram loaded.
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self {
            state: EditorState::new(),
            tool: Tool::default(),
            edge_draft: EdgeDraft::default(),
            canvas: DiagramCanvas::default(),
            show_label_editor: true,
            show_help: false,
            window_title: String::new(),
        }
    }

    fn handle_hotkeys(&mut self, ctx: &egui::Context) {
        // Save-as first so its shortcut isn't swallowed by plain save.
        if ctx.input_mut(|i| i.consume_shortcut(&SAVE_AS)) {
            commands::save_as(&mut self.state);
        } else if ctx.input_mut(|i| i.consume_shortcut(&SAVE)) {
            commands::save(&mut self.state);
        }
        if ctx.input_mut(|i| i.consume_shortcut(&OPEN)) {
            commands::open(&mut self.state);
        }
        if ctx.input_mut(|i| i.consume_shortcut(&NEW)) {
            commands::load_default_diagram(&mut self.state);
        }

        if ctx.input(|i| i.key_pressed(Key::Escape)) {
            self.tool = Tool::Select;
            self.edge_draft.reset();
        }

        // Delete only when no text field has focus.
        let delete_pressed = ctx
            .input(|i| i.key_pressed(Key::Delete) || i.key_pressed(Key::Backspace));
        if delete_pressed && !ctx.wants_keyboard_input() {
            self.delete_selection();
        }
    }

    fn delete_selection(&mut self) {
        if self.state.selection.is_empty() {
            return;
        }
        let removed = self.state.document.remove_elements(&self.state.selection);
        self.state.selection.clear();
        if removed > 0 {
            self.state.mark_dirty();
            tracing::debug!(removed, "Deleted selected elements");
        }
    }

    fn menu_bar(&mut self, ui: &mut egui::Ui) {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("New (default diagram)").clicked() {
                    commands::load_default_diagram(&mut self.state);
                    ui.close_menu();
                }
                if ui.button("Open…").clicked() {
                    commands::open(&mut self.state);
                    ui.close_menu();
                }
                ui.separator();
                if ui.button("Save").clicked() {
                    commands::save(&mut self.state);
                    ui.close_menu();
                }
                if ui.button("Save As…").clicked() {
                    commands::save_as(&mut self.state);
                    ui.close_menu();
                }
            });
            ui.menu_button("View", |ui| {
                ui.checkbox(&mut self.show_label_editor, "Label types");
                ui.checkbox(&mut self.show_help, "Help");
            });
        });
    }

    fn sync_window_title(&mut self, ctx: &egui::Context) {
        let name = self
            .state
            .current_path
            .as_deref()
            .and_then(|path| path.file_name())
            .map_or_else(|| "untitled".to_string(), |name| name.to_string_lossy().into_owned());
        let marker = if self.state.is_dirty() { "*" } else { "" };
        let title = format!("DFD Editor - {name}{marker}");
        if title != self.window_title {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title.clone()));
            self.window_title = title;
        }
    }
}

impl eframe::App for EditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_hotkeys(ctx);

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| self.menu_bar(ui));

        egui::SidePanel::left("tool_palette")
            .resizable(false)
            .default_width(160.0)
            .show(ctx, |ui| {
                ToolPalette::ui(ui, &mut self.tool, &mut self.edge_draft);
            });

        if self.show_label_editor {
            egui::SidePanel::right("label_types")
                .default_width(220.0)
                .show(ctx, |ui| {
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        LabelTypeEditor::ui(ui, &mut self.state.label_types);
                    });
                });
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::canvas(&ctx.style()))
            .show(ctx, |ui| {
                self.canvas
                    .ui(ui, &mut self.state, &mut self.tool, &mut self.edge_draft);
            });

        HelpOverlay::ui(ctx, &mut self.show_help);

        self.sync_window_title(ctx);
    }
}
