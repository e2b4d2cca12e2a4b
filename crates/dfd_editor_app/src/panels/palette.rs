// SPDX-License-Identifier: MIT OR Apache-2.0
//! The tool palette panel.

use crate::tools::{EdgeDraft, NodeKind, Tool};

/// Side panel listing the editing tools.
pub struct ToolPalette;

impl ToolPalette {
    /// Render the palette.
    pub fn ui(ui: &mut egui::Ui, tool: &mut Tool, edge_draft: &mut EdgeDraft) {
        ui.heading("Tools");
        ui.separator();

        let entries = [
            Tool::Select,
            Tool::AddNode(NodeKind::Storage),
            Tool::AddNode(NodeKind::InputOutput),
            Tool::AddNode(NodeKind::Function),
            Tool::AddEdge,
        ];
        for entry in entries {
            let active = *tool == entry;
            if ui.selectable_label(active, entry.display_name()).clicked() {
                // Clicking the active tool deactivates it back to selection.
                *tool = if active { Tool::Select } else { entry };
                edge_draft.reset();
            }
        }

        if *tool == Tool::AddEdge {
            ui.separator();
            ui.small(match edge_draft.source() {
                Some(_) => "Click the target node",
                None => "Click the source node",
            });
        }
    }
}
