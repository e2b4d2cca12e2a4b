// SPDX-License-Identifier: MIT OR Apache-2.0
//! Session-wide editor state.

use dfd_editor_model::{
    default_registry, generate_id, Document, ElementRegistry, LabelType, LabelTypeRegistry,
    LabelTypeValue, Subscription,
};
use std::cell::Cell;
use std::collections::HashSet;
use std::path::PathBuf;
use std::rc::Rc;

/// Everything the editor session owns: the document, the registries, the
/// selection, and the unsaved-changes flag.
pub struct EditorState {
    /// The diagram being edited (always in expanded form).
    pub document: Document,
    /// Element-type registration table, built once at startup.
    pub registry: ElementRegistry,
    /// Session-scoped label types.
    pub label_types: LabelTypeRegistry,
    /// Ids of the currently selected top-level elements.
    pub selection: HashSet<String>,
    /// File the document was loaded from / last saved to.
    pub current_path: Option<PathBuf>,
    dirty: Rc<Cell<bool>>,
    // Keeps the dirty-flag observer identifiable should the state ever want
    // to detach it.
    _label_types_subscription: Subscription,
}

impl EditorState {
    /// Create the session state with the default diagram loaded.
    pub fn new() -> Self {
        let registry = default_registry();
        let mut label_types = LabelTypeRegistry::new();

        // Any label-type mutation marks the session dirty.
        let dirty = Rc::new(Cell::new(false));
        let flag = Rc::clone(&dirty);
        let subscription = label_types.on_update(move || flag.set(true));

        let mut state = Self {
            document: Document::new(),
            registry,
            label_types,
            selection: HashSet::new(),
            current_path: None,
            dirty,
            _label_types_subscription: subscription,
        };
        crate::commands::load_default_diagram(&mut state);
        state
    }

    /// Whether there are unsaved changes.
    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// Mark the session as having unsaved changes.
    pub fn mark_dirty(&self) {
        self.dirty.set(true);
    }

    /// Reset the unsaved-changes flag (after a save or a fresh load).
    pub fn clear_dirty(&self) {
        self.dirty.set(false);
    }
}

/// The two sample label types every fresh session starts with.
pub fn default_label_types() -> Vec<LabelType> {
    let values = |texts: &[&str]| {
        texts
            .iter()
            .map(|text| LabelTypeValue {
                id: generate_id("label-type-value"),
                text: (*text).to_string(),
            })
            .collect()
    };
    vec![
        LabelType {
            id: generate_id("label-type"),
            name: "Test Label".to_string(),
            values: values(&["Value1", "Value2"]),
        },
        LabelType {
            id: generate_id("label-type"),
            name: "Test Label 2".to_string(),
            values: values(&["Foo", "Bar", "Baz"]),
        },
    ]
}
