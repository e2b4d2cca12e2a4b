// SPDX-License-Identifier: MIT OR Apache-2.0
//! The label-type editor panel.
//!
//! Structural changes (add/remove) go through the registry operations;
//! in-place text edits are followed by an explicit change notification.

use dfd_editor_model::{generate_id, LabelType, LabelTypeRegistry, LabelTypeValue};

/// Side panel for editing the session's label types.
pub struct LabelTypeEditor;

impl LabelTypeEditor {
    /// Render the editor.
    pub fn ui(ui: &mut egui::Ui, registry: &mut LabelTypeRegistry) {
        ui.heading("Label Types");
        ui.separator();

        let ids: Vec<String> = registry
            .label_types()
            .iter()
            .map(|label_type| label_type.id.clone())
            .collect();

        let mut changed = false;
        let mut remove_type: Option<String> = None;

        for id in &ids {
            let Some(label_type) = registry.label_type_mut(id) else {
                continue;
            };

            ui.horizontal(|ui| {
                changed |= ui
                    .add(
                        egui::TextEdit::singleline(&mut label_type.name)
                            .hint_text("Label Type Name"),
                    )
                    .changed();
                if ui.small_button("✖").clicked() {
                    remove_type = Some(id.clone());
                }
            });

            let mut remove_value: Option<usize> = None;
            for (index, value) in label_type.values.iter_mut().enumerate() {
                ui.horizontal(|ui| {
                    ui.add_space(16.0);
                    changed |= ui
                        .add(
                            egui::TextEdit::singleline(&mut value.text)
                                .hint_text("Value")
                                .desired_width(120.0),
                        )
                        .changed();
                    if ui.small_button("−").clicked() {
                        remove_value = Some(index);
                    }
                });
            }
            if let Some(index) = remove_value {
                label_type.values.remove(index);
                changed = true;
            }

            ui.horizontal(|ui| {
                ui.add_space(16.0);
                if ui.small_button("+ Value").clicked() {
                    label_type.values.push(LabelTypeValue {
                        id: generate_id("label-type-value"),
                        text: String::new(),
                    });
                    changed = true;
                }
            });
            ui.separator();
        }

        if changed {
            registry.notify_changed();
        }
        if let Some(id) = remove_type {
            registry.unregister_label_type(&id);
        }

        if ui.button("+ Label Type").clicked() {
            registry.register_label_type(LabelType {
                id: generate_id("label-type"),
                name: String::new(),
                values: vec![LabelTypeValue {
                    id: generate_id("label-type-value"),
                    text: "Value".to_string(),
                }],
            });
        }
    }
}
