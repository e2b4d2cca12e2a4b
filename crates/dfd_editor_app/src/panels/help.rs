// SPDX-License-Identifier: MIT OR Apache-2.0
//! The help overlay.

/// Floating window listing the editor hotkeys.
pub struct HelpOverlay;

impl HelpOverlay {
    /// Render the overlay while `open` is set.
    pub fn ui(ctx: &egui::Context, open: &mut bool) {
        egui::Window::new("Help")
            .open(open)
            .resizable(false)
            .show(ctx, |ui| {
                egui::Grid::new("help_hotkeys").num_columns(2).show(ui, |ui| {
                    for (keys, action) in [
                        ("Ctrl+S", "Save diagram"),
                        ("Ctrl+Shift+S", "Save diagram as"),
                        ("Ctrl+O", "Open diagram"),
                        ("Ctrl+N", "Load the default diagram"),
                        ("Del", "Delete selected elements"),
                        ("Esc", "Cancel the active tool"),
                        ("Shift+Click", "Add to the selection"),
                        ("Double-click", "Edit the element's text"),
                        ("Right drag", "Pan the canvas"),
                    ] {
                        ui.monospace(keys);
                        ui.label(action);
                        ui.end_row();
                    }
                });
            });
    }
}
