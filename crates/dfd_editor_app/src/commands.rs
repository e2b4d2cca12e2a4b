// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor commands: save, load, and the default diagram.
//!
//! All failures are terminal for the triggering action and surfaced via the
//! log; the in-memory document is never touched by a failed load.

use crate::state::{default_label_types, EditorState};
use dfd_editor_model::{persist, process_tree, Document, TreeMode};
use std::path::{Path, PathBuf};

/// Replace the session content with the hard-coded default diagram and the
/// sample label types.
pub fn load_default_diagram(state: &mut EditorState) {
    let mut document = Document::default_diagram();
    process_tree(document.root_mut(), TreeMode::Expand, &state.registry);

    state.document = document;
    state.label_types.clear_label_types();
    for label_type in default_label_types() {
        state.label_types.register_label_type(label_type);
    }
    state.selection.clear();
    state.current_path = None;
    state.clear_dirty();
    tracing::info!("Default diagram loaded");
}

/// Save to the given path.
pub fn save_diagram(state: &mut EditorState, path: &Path) {
    let result = persist::save_file(
        path,
        &state.document,
        state.label_types.label_types(),
        &state.registry,
    );
    match result {
        Ok(()) => {
            state.current_path = Some(path.to_path_buf());
            state.clear_dirty();
            tracing::info!(path = %path.display(), "Diagram saved");
        }
        Err(error) => {
            tracing::error!(path = %path.display(), %error, "Error saving diagram");
        }
    }
}

/// Save to the current path, falling back to a save dialog for fresh
/// documents.
pub fn save(state: &mut EditorState) {
    match state.current_path.clone() {
        Some(path) => save_diagram(state, &path),
        None => save_as(state),
    }
}

/// Ask for a target file, then save. Cancelling the dialog is not an error.
pub fn save_as(state: &mut EditorState) {
    let Some(path) = save_dialog(state.current_path.as_deref()) else {
        tracing::debug!("Save dialog cancelled");
        return;
    };
    save_diagram(state, &path);
}

/// Load from the given path. On failure the previous document stays
/// displayed.
pub fn load_diagram(state: &mut EditorState, path: &Path) {
    match persist::load_file(path, &state.registry) {
        Ok((document, label_types)) => {
            state.document = document;
            state.label_types.clear_label_types();
            for label_type in label_types {
                state.label_types.register_label_type(label_type);
            }
            state.selection.clear();
            state.current_path = Some(path.to_path_buf());
            state.clear_dirty();
            tracing::info!(path = %path.display(), "Diagram loaded");
        }
        Err(error) => {
            tracing::error!(path = %path.display(), %error, "Error loading diagram");
        }
    }
}

/// Ask for a file, then load it. Cancelling the dialog is not an error.
pub fn open(state: &mut EditorState) {
    let Some(path) = open_dialog() else {
        tracing::debug!("Open dialog cancelled");
        return;
    };
    load_diagram(state, &path);
}

fn open_dialog() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter("Diagram", &["json"])
        .pick_file()
}

fn save_dialog(current: Option<&Path>) -> Option<PathBuf> {
    let mut dialog = rfd::FileDialog::new().add_filter("Diagram", &["json"]);
    dialog = match current.and_then(Path::file_name) {
        Some(name) => dialog.set_file_name(name.to_string_lossy()),
        None => dialog.set_file_name("diagram.json"),
    };
    dialog.save_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dfd_editor_model::tags;

    fn temp_path(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("dfd-editor-cmd-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    #[test]
    fn save_then_load_round_trips_through_the_file_system() {
        let mut state = EditorState::new();
        let path = temp_path("roundtrip.json");

        save_diagram(&mut state, &path);
        assert_eq!(state.current_path.as_deref(), Some(path.as_path()));
        assert!(!state.is_dirty());

        let saved_children = state.document.root().children.len();
        load_default_diagram(&mut state);
        load_diagram(&mut state, &path);
        assert_eq!(state.document.root().children.len(), saved_children);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn failed_load_keeps_the_previous_document() {
        let mut state = EditorState::new();
        let path = temp_path("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let before = state.document.clone();
        load_diagram(&mut state, &path);

        assert_eq!(state.document, before);
        assert!(state.current_path.is_none());
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn default_diagram_resets_path_selection_and_label_types() {
        let mut state = EditorState::new();
        state.selection.insert("x".to_string());
        state.current_path = Some(PathBuf::from("/tmp/old.json"));
        state.label_types.clear_label_types();

        load_default_diagram(&mut state);

        assert!(state.selection.is_empty());
        assert!(state.current_path.is_none());
        assert_eq!(state.label_types.label_types().len(), 2);
        assert!(state
            .document
            .root()
            .children
            .iter()
            .any(|child| child.type_tag == tags::ARROW_EDGE));
    }
}
